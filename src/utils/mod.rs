//! Utility modules for the asset host.

pub mod mime;
pub mod path;
