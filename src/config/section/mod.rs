//! Configuration section definitions.
//!
//! Each module corresponds to a section in `spa-host.toml`:
//!
//! | Module  | TOML Section | Purpose                                  |
//! |---------|--------------|------------------------------------------|
//! | `host`  | `[host]`     | Web root, environment, manifest override |
//! | `mount` | `[[mount]]`  | Single-page app mounts                   |
//! | `serve` | `[serve]`    | HTTP server                              |

mod host;
mod mount;
mod serve;

pub use host::HostConfig;
pub use mount::MountConfig;
pub use serve::ServeConfig;
