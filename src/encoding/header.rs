//! Quality-list parsing for `Accept-Encoding`.
//!
//! ```text
//! Accept-Encoding: br;q=1.0, gzip;q=0.8, *;q=0.1
//! ```

/// One entry of a quality list.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityItem {
    /// Lowercased coding token (`br`, `gzip`, `identity`, `*`, ...).
    pub token: String,
    /// Weight in `[0, 1]`; 1 when the entry carries no `q` parameter.
    pub quality: f64,
}

/// Parse a comma-separated quality list.
///
/// Empty entries are skipped. Returns `None` if any entry is malformed:
/// invalid token characters, a parameter other than `q`, a repeated `q`,
/// or a qvalue outside `[0, 1]`.
pub fn parse_quality_list(value: &str) -> Option<Vec<QualityItem>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_item)
        .collect()
}

fn parse_item(entry: &str) -> Option<QualityItem> {
    let mut parts = entry.split(';');
    let token = parts.next()?.trim();
    if !is_token(token) {
        return None;
    }

    let mut quality = None;
    for param in parts {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("q") || quality.is_some() {
            return None;
        }
        quality = Some(parse_qvalue(value.trim())?);
    }

    Some(QualityItem {
        token: token.to_ascii_lowercase(),
        quality: quality.unwrap_or(1.0),
    })
}

/// RFC 9110 `qvalue`: `0[.ddd]` or `1[.000]`.
fn parse_qvalue(value: &str) -> Option<f64> {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    if fraction.len() > 3 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match whole {
        "0" if fraction.is_empty() => Some(0.0),
        "0" => {
            let digits: u16 = fraction.parse().ok()?;
            Some(f64::from(digits) / 10_f64.powi(fraction.len() as i32))
        }
        "1" if fraction.bytes().all(|b| b == b'0') => Some(1.0),
        _ => None,
    }
}

/// RFC 9110 `token`: one or more `tchar`.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^'
                        | b'_' | b'`' | b'|' | b'~'
                )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(token: &str, quality: f64) -> QualityItem {
        QualityItem {
            token: token.to_string(),
            quality,
        }
    }

    #[test]
    fn test_parse_simple_list() {
        let items = parse_quality_list("br;q=1.0, gzip;q=0.8").unwrap();
        assert_eq!(items, vec![item("br", 1.0), item("gzip", 0.8)]);
    }

    #[test]
    fn test_parse_default_quality_and_case() {
        let items = parse_quality_list("GZIP, Br ;Q=0.5").unwrap();
        assert_eq!(items, vec![item("gzip", 1.0), item("br", 0.5)]);
    }

    #[test]
    fn test_parse_skips_empty_entries() {
        let items = parse_quality_list(" , gzip,,").unwrap();
        assert_eq!(items, vec![item("gzip", 1.0)]);

        assert_eq!(parse_quality_list(", ,"), Some(Vec::new()));
    }

    #[test]
    fn test_parse_wildcard_and_identity() {
        let items = parse_quality_list("*;q=0.1, identity;q=0").unwrap();
        assert_eq!(items, vec![item("*", 0.1), item("identity", 0.0)]);
    }

    #[test]
    fn test_parse_rejects_bad_qvalue() {
        assert_eq!(parse_quality_list("gzip;q=1.5"), None);
        assert_eq!(parse_quality_list("gzip;q=-0.1"), None);
        assert_eq!(parse_quality_list("gzip;q=abc"), None);
        assert_eq!(parse_quality_list("gzip;q="), None);
        assert_eq!(parse_quality_list("gzip;q=0.5;q=0.6"), None);
    }

    #[test]
    fn test_parse_qvalue_grammar() {
        assert_eq!(parse_quality_list("gzip;q=.5"), None);
        assert_eq!(parse_quality_list("gzip;q=0.12345"), None);
        assert_eq!(parse_quality_list("gzip;q=00.5"), None);
        assert_eq!(parse_quality_list("gzip;q=1.001"), None);

        let items = parse_quality_list("br;q=1.000, gzip;q=0., *;q=0.125").unwrap();
        assert_eq!(items, vec![item("br", 1.0), item("gzip", 0.0), item("*", 0.125)]);
    }

    #[test]
    fn test_parse_rejects_bad_token_or_param() {
        assert_eq!(parse_quality_list("gz ip"), None);
        assert_eq!(parse_quality_list("gzip;level=9"), None);
        assert_eq!(parse_quality_list("gzip;"), None);
        assert_eq!(parse_quality_list(";q=1"), None);
        assert_eq!(parse_quality_list("br, \"gzip\""), None);
    }
}
