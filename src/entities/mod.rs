pub mod draws;
pub mod events;
pub mod participants;

pub use draws as draw_entity;
pub use events as event_entity;
pub use events::EventState;
pub use participants as participant_entity;
