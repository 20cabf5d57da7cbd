//! Config field path used to address diagnostics.

use owo_colors::OwoColorize;
use std::fmt;

/// A dotted path into `spa-host.toml`, e.g. `serve.port`.
///
/// Sections declare their fields as associated constants:
///
/// ```ignore
/// impl ServeConfig {
///     const PORT: FieldPath = FieldPath::new("serve.port");
/// }
///
/// diag.error(Self::PORT, "must be between 1 and 65535");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}
