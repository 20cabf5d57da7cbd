//! MIME type detection utilities.
//!
//! [`ContentTypeMap`] is built once at startup from the base extension table
//! plus explicit overrides, then shared read-only by the responders.

use rustc_hash::FxHashMap;
use std::path::Path;

/// Common MIME type constants.
pub mod types {
    // Text
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";
    pub const MARKDOWN: &str = "text/markdown; charset=utf-8";
    pub const CSV: &str = "text/csv; charset=utf-8";

    // Web app
    pub const MANIFEST: &str = "application/manifest+json";
    pub const SOURCE_MAP: &str = "application/json";

    // Documents
    pub const PDF: &str = "application/pdf";

    // Binary
    pub const OCTET_STREAM: &str = "application/octet-stream";
    pub const WASM: &str = "application/wasm";
    pub const ZIP: &str = "application/zip";
    pub const GZIP: &str = "application/gzip";

    // Images
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const AVIF: &str = "image/avif";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";
    pub const BMP: &str = "image/bmp";

    // Audio / Video
    pub const MP3: &str = "audio/mpeg";
    pub const WAV: &str = "audio/wav";
    pub const OGG_AUDIO: &str = "audio/ogg";
    pub const MP4: &str = "video/mp4";
    pub const WEBM: &str = "video/webm";

    // Fonts
    pub const WOFF: &str = "font/woff";
    pub const WOFF2: &str = "font/woff2";
    pub const TTF: &str = "font/ttf";
    pub const OTF: &str = "font/otf";
    pub const EOT: &str = "application/vnd.ms-fontobject";
}

/// Extensions served as opaque bytes under the framework path segment.
///
/// `.br` has no registered type of its own; assemblies and debug symbols
/// must never be sniffed by the browser.
pub const FRAMEWORK_OVERRIDES: &[(&str, &str)] = &[
    (".dll", types::OCTET_STREAM),
    (".pdb", types::OCTET_STREAM),
    (".br", types::OCTET_STREAM),
];

/// Extensions of precompressed variants.
const COMPRESSED_EXTENSIONS: &[&str] = &["gz", "br"];

/// Base extension table. Expects a lowercase extension without the dot.
fn base_lookup(ext: &str) -> Option<&'static str> {
    let mime = match ext {
        // Web / Text
        "html" | "htm" => types::HTML,
        "css" => types::CSS,
        "js" | "mjs" | "cjs" => types::JAVASCRIPT,
        "json" => types::JSON,
        "map" => types::SOURCE_MAP,
        "webmanifest" => types::MANIFEST,
        "xml" => types::XML,
        "csv" => types::CSV,
        "txt" => types::PLAIN,
        "md" => types::MARKDOWN,

        // Images
        "svg" => types::SVG,
        "png" => types::PNG,
        "jpg" | "jpeg" => types::JPEG,
        "gif" => types::GIF,
        "webp" => types::WEBP,
        "avif" => types::AVIF,
        "ico" => types::ICO,
        "bmp" => types::BMP,

        // Audio / Video
        "mp3" => types::MP3,
        "wav" => types::WAV,
        "ogg" | "oga" => types::OGG_AUDIO,
        "mp4" | "m4v" => types::MP4,
        "webm" => types::WEBM,

        // Fonts
        "woff" => types::WOFF,
        "woff2" => types::WOFF2,
        "ttf" => types::TTF,
        "otf" => types::OTF,
        "eot" => types::EOT,

        // Documents / Binary
        "pdf" => types::PDF,
        "wasm" => types::WASM,
        "zip" => types::ZIP,
        "gz" | "gzip" => types::GZIP,

        _ => return None,
    };
    Some(mime)
}

/// Lowercased extension of the last path segment, without the dot.
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Immutable extension → content type map.
#[derive(Debug, Clone, Default)]
pub struct ContentTypeMap {
    overrides: FxHashMap<String, &'static str>,
}

impl ContentTypeMap {
    /// Base table only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Base table plus `overrides`, which win over the base entries.
    ///
    /// Keys may be given with or without the leading dot.
    pub fn with_overrides<'a>(overrides: impl IntoIterator<Item = (&'a str, &'static str)>) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(ext, mime)| (ext.trim_start_matches('.').to_ascii_lowercase(), mime))
            .collect();
        Self { overrides }
    }

    /// Map used for the framework path segment.
    pub fn framework() -> Self {
        Self::with_overrides(FRAMEWORK_OVERRIDES.iter().copied())
    }

    /// Content type for a file name or path, if the extension is known.
    pub fn lookup(&self, name: &str) -> Option<&'static str> {
        let ext = extension_of(name)?;
        self.overrides
            .get(&ext)
            .copied()
            .or_else(|| base_lookup(&ext))
    }

    /// Content type for a file name or path, falling back to octet-stream.
    pub fn for_path(&self, name: &str) -> &'static str {
        self.lookup(name).unwrap_or(types::OCTET_STREAM)
    }
}

/// Content type to report for a served file.
///
/// A precompressed variant (`x.js.gz`, `x.wasm.br`) reports the type of the
/// original resource. When the original name has no known type the
/// variant's own type is kept.
pub fn served_content_type(map: &ContentTypeMap, served_path: &str) -> &'static str {
    let is_compressed = extension_of(served_path)
        .is_some_and(|ext| COMPRESSED_EXTENSIONS.contains(&ext.as_str()));

    if is_compressed
        && let Some(original) = Path::new(served_path).file_stem().and_then(|s| s.to_str())
        && let Some(mime) = map.lookup(original)
    {
        return mime;
    }

    map.for_path(served_path)
}
