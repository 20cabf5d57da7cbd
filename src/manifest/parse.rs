//! Static web assets manifest parsing.
//!
//! ```xml
//! <StaticWebAssets Version="1.0">
//!   <ContentRoot BasePath="_content/lib" Path="/src/lib/wwwroot/" />
//!   <ContentRoot BasePath=".private/spa1" Path="/src/spa1/wwwroot/" />
//! </StaticWebAssets>
//! ```

use super::ContentRootMapping;
use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use std::io::BufRead;
use std::path::PathBuf;
use thiserror::Error;

const ROOT_ELEMENT: &[u8] = b"StaticWebAssets";
const CONTENT_ROOT_ELEMENT: &[u8] = b"ContentRoot";
const SUPPORTED_VERSION: &str = "1.0";

/// Manifest loading errors.
///
/// Never fatal: the loader logs them and falls back to direct web-root mode.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed manifest XML")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute in manifest")]
    Attribute(#[from] AttrError),

    #[error("invalid value for attribute `{0}`: {1}")]
    Value(&'static str, String),

    #[error("unexpected element `{0}`")]
    UnexpectedElement(String),

    #[error("unsupported manifest version `{0}`, expected `1.0`")]
    UnsupportedVersion(String),

    #[error("`ContentRoot` is missing the `{0}` attribute")]
    MissingAttribute(&'static str),

    #[error("manifest has no `StaticWebAssets` root element")]
    MissingRoot,
}

/// Parse a manifest into content root mappings, in document order.
///
/// A `ContentRoot` without `Path` yields an empty physical path; whether that
/// matters is decided when a namespace actually uses the mapping.
pub fn parse_manifest<R: BufRead>(input: R) -> Result<Vec<ContentRootMapping>, ManifestError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut mappings = Vec::new();
    let mut seen_root = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                ROOT_ELEMENT if !seen_root => {
                    let version = attribute(&e, "Version", reader.decoder())?.unwrap_or_default();
                    if version != SUPPORTED_VERSION {
                        return Err(ManifestError::UnsupportedVersion(version));
                    }
                    seen_root = true;
                }
                CONTENT_ROOT_ELEMENT if seen_root => {
                    let base_path = attribute(&e, "BasePath", reader.decoder())?
                        .ok_or(ManifestError::MissingAttribute("BasePath"))?;
                    let physical_path =
                        attribute(&e, "Path", reader.decoder())?.unwrap_or_default();
                    mappings.push(ContentRootMapping::new(base_path, physical_path));
                }
                other => {
                    return Err(ManifestError::UnexpectedElement(
                        String::from_utf8_lossy(other).into_owned(),
                    ));
                }
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(ManifestError::MissingRoot);
    }
    Ok(mappings)
}

fn attribute(
    element: &BytesStart<'_>,
    name: &'static str,
    decoder: Decoder,
) -> Result<Option<String>, ManifestError> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr
                .decode_and_unescape_value(decoder)
                .map_err(|e| ManifestError::Value(name, e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
