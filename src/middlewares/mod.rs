pub mod access_log;
pub mod cors;

pub use access_log::create_access_logger;
pub use cors::create_cors;
