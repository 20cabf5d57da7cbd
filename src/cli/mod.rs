//! Command-line interface module.

mod args;
pub mod check;
pub mod serve;

pub use args::{Cli, Commands, HostArgs};
