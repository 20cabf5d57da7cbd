//! Core types - pure abstractions shared across the codebase.

mod environment;
pub mod headers;
mod state;

pub use environment::Environment;
pub use headers::ResponseHeaders;
pub use state::{is_shutdown, register_server, setup_shutdown_handler};
