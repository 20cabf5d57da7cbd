//! Content-encoding negotiation for precompressed assets.
//!
//! Given a request path and the client's `Accept-Encoding`, decide whether a
//! sibling `path.br` / `path.gz` should be served instead. The decision is a
//! plain value ([`Negotiation`]); callers apply it to the request path and
//! response headers explicitly before the file is resolved.
//!
//! # Selection rules
//!
//! Entries are scanned in header order while tracking the current selection
//! and its quality:
//!
//! | Entry                         | Effect                                              |
//! |-------------------------------|-----------------------------------------------------|
//! | `q = 0`, or below current     | ignored                                             |
//! | above current, known coding   | selected if its variant exists, else ignored        |
//! | equal to current              | tie-break through the preference order `br, gzip`   |
//! | `*`                           | first preferred coding whose variant exists         |
//! | `identity`                    | clears the selection at that quality                |
//!
//! A variant is never selected unless `exists(path + ext)` confirmed it.

mod header;

pub use header::{QualityItem, parse_quality_list};

use crate::core::ResponseHeaders;
use crate::core::headers::names::{CONTENT_ENCODING, VARY};
use std::borrow::Cow;

const WILDCARD: &str = "*";
const IDENTITY: &str = "identity";

/// Content coding with a precompressed file variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    Brotli,
    Gzip,
}

impl Encoding {
    /// Preference order used to break quality ties and resolve `*`.
    pub const PREFERENCE: [Self; 2] = [Self::Brotli, Self::Gzip];

    /// `Content-Encoding` token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Brotli => "br",
            Self::Gzip => "gzip",
        }
    }

    /// Suffix appended to the original path to find the variant.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Brotli => ".br",
            Self::Gzip => ".gz",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::PREFERENCE
            .into_iter()
            .find(|e| e.token().eq_ignore_ascii_case(token))
    }
}

/// Outcome of negotiating one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Negotiation {
    selected: Option<Encoding>,
}

impl Negotiation {
    /// Serve the original resource.
    pub const UNCHANGED: Self = Self { selected: None };

    pub const fn selected(&self) -> Option<Encoding> {
        self.selected
    }

    pub const fn is_unchanged(&self) -> bool {
        self.selected.is_none()
    }

    /// Path the file server should resolve.
    pub fn rewritten_path<'a>(&self, path: &'a str) -> Cow<'a, str> {
        match self.selected {
            Some(encoding) => Cow::Owned(format!("{path}{}", encoding.extension())),
            None => Cow::Borrowed(path),
        }
    }

    /// Rewrite the request path and set `Content-Encoding`/`Vary`.
    ///
    /// No-op when nothing was selected. `Vary` is merged, never replaced.
    pub fn apply(&self, path: &mut String, headers: &mut ResponseHeaders) {
        let Some(encoding) = self.selected else {
            return;
        };
        *path = self.rewritten_path(path).into_owned();
        headers.set(CONTENT_ENCODING, encoding.token());
        headers.append_list(VARY, CONTENT_ENCODING);
    }
}

/// Decide which variant of `path` to serve.
///
/// `exists` answers whether a logical path is present in the active asset
/// namespace; it is only asked about `path + ext` candidates.
pub fn negotiate<F>(path: &str, accept_encoding: Option<&str>, exists: F) -> Negotiation
where
    F: Fn(&str) -> bool,
{
    let Some(accept) = accept_encoding.filter(|v| !v.trim().is_empty()) else {
        return Negotiation::UNCHANGED;
    };
    let Some(items) = parse_quality_list(accept).filter(|items| !items.is_empty()) else {
        return Negotiation::UNCHANGED;
    };

    let variant_exists = |encoding: Encoding| exists(&format!("{path}{}", encoding.extension()));

    let mut selected: Option<Encoding> = None;
    let mut selected_q = 0.0_f64;

    for QualityItem { token, quality } in &items {
        let (token, quality) = (token.as_str(), *quality);
        if quality <= 0.0 || quality < selected_q {
            continue;
        }

        if quality == selected_q {
            selected = pick_preferred(selected, token, &variant_exists);
        } else if let Some(encoding) = Encoding::from_token(token)
            && variant_exists(encoding)
        {
            selected = Some(encoding);
            selected_q = quality;
        }

        if token == WILDCARD {
            selected = pick_preferred(None, token, &variant_exists);
            selected_q = quality;
        }

        if token == IDENTITY {
            selected = None;
            selected_q = quality;
        }
    }

    Negotiation { selected }
}

/// Walk the preference order: keep `current` if it comes first, otherwise
/// take the first coding named by `token` (any, for `*`) whose variant exists.
fn pick_preferred(
    current: Option<Encoding>,
    token: &str,
    variant_exists: &impl Fn(Encoding) -> bool,
) -> Option<Encoding> {
    for preferred in Encoding::PREFERENCE {
        if current == Some(preferred) {
            return current;
        }
        if (token == WILDCARD || token == preferred.token()) && variant_exists(preferred) {
            return Some(preferred);
        }
    }
    None
}
