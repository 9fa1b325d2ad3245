pub mod common;
pub mod draw;
pub mod event;
pub mod links;
pub mod participant;

pub use common::*;
pub use draw::*;
pub use event::*;
pub use links::*;
pub use participant::*;
