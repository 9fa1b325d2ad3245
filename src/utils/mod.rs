pub mod code_generator;
pub mod draw_engine;
pub mod validation;

pub use code_generator::{
    generate_capability_token, generate_event_code, generate_pin, is_event_code_shaped,
    is_token_shaped,
};
pub use draw_engine::{DrawEngine, is_derangement};
pub use validation::*;
