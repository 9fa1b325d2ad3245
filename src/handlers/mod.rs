pub mod admin;
pub mod event;
pub mod health;
pub mod participant;

pub use admin::admin_config;
pub use event::event_config;
pub use health::health_config;
pub use participant::participant_config;
