//! HTTP response handlers.

use crate::core::ResponseHeaders;
use crate::core::headers::names::{ACCEPT_RANGES, CONTENT_RANGE, CONTENT_TYPE};
use crate::mount::ServePlan;
use crate::utils::mime::types::PLAIN;
use anyhow::{Result, anyhow};
use std::io::{self, Read, Seek, SeekFrom};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Stream a planned asset, honoring HEAD and single byte ranges.
pub fn respond_asset(request: Request, plan: ServePlan) -> Result<()> {
    let ServePlan {
        file,
        content_type,
        mut headers,
        ..
    } = plan;

    headers.set(CONTENT_TYPE, content_type);
    headers.set(ACCEPT_RANGES, "bytes");

    let range = get_range_header(&request).map(|range| parse_range(&range, file.len));

    match range {
        Some(Some((start, end))) => {
            let length = end - start + 1;
            headers.set(CONTENT_RANGE, format!("bytes {start}-{end}/{}", file.len));
            if is_head_request(&request) {
                return send_head(request, 206, &headers, length);
            }

            let mut file = file.file;
            file.seek(SeekFrom::Start(start))?;
            send_reader(request, 206, &headers, file.take(length), length)
        }
        Some(None) => {
            let mut headers = ResponseHeaders::new();
            headers.set(CONTENT_RANGE, format!("bytes */{}", file.len));
            send_text(request, 416, headers, "416 Range Not Satisfiable")
        }
        None if is_head_request(&request) => send_head(request, 200, &headers, file.len),
        None => send_reader(request, 200, &headers, file.file, file.len),
    }
}

/// Parse a `bytes=start-end` range against a file of `file_size` bytes.
///
/// Returns `None` when the range cannot be satisfied. Multiple ranges are
/// not supported; only the first one is honored.
fn parse_range(range: &str, file_size: u64) -> Option<(u64, u64)> {
    if file_size == 0 {
        return None;
    }
    let last = file_size - 1;

    let range = range.trim();
    let range = range.strip_prefix("bytes=")?;
    let range = range.split(',').next()?.trim();
    let (start, end) = range.split_once('-')?;
    let (start, end) = (start.trim(), end.trim());

    let (start, end) = match (start.is_empty(), end.is_empty()) {
        // "0-499"
        (false, false) => (start.parse().ok()?, end.parse::<u64>().ok()?.min(last)),
        // "500-"
        (false, true) => (start.parse().ok()?, last),
        // "-500" (last 500 bytes)
        (true, false) => {
            let suffix: u64 = end.parse().ok()?;
            if suffix == 0 {
                return None;
            }
            (file_size.saturating_sub(suffix), last)
        }
        (true, true) => return None,
    };

    (start <= end).then_some((start, end))
}

/// Extract Range header from request.
fn get_range_header(request: &Request) -> Option<String> {
    header_value(request, crate::core::headers::names::RANGE)
}

/// First value of a request header, compared case-insensitively.
pub fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.to_string())
}

/// Every value of a list header, joined as one comma list.
///
/// Clients may split a list header across several field lines.
pub fn header_list_value(request: &Request, name: &str) -> Option<String> {
    let values: Vec<&str> = request
        .headers()
        .iter()
        .filter(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
        .collect();
    (!values.is_empty()).then(|| values.join(", "))
}

/// Respond with 404 Not Found.
pub fn respond_not_found(request: Request) -> Result<()> {
    send_text(request, 404, ResponseHeaders::new(), "404 Not Found")
}

/// Respond with 405 Method Not Allowed.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let mut headers = ResponseHeaders::new();
    headers.set("Allow", "GET, HEAD");
    send_text(request, 405, headers, "405 Method Not Allowed")
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_text(request, 503, ResponseHeaders::new(), "503 Service Unavailable")
}

pub fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

pub fn is_read_request(request: &Request) -> bool {
    matches!(request.method(), Method::Get | Method::Head)
}

fn send_head(request: Request, status: u16, headers: &ResponseHeaders, length: u64) -> Result<()> {
    send_reader(request, status, headers, io::empty(), length)
}

fn send_reader<R: Read>(
    request: Request,
    status: u16,
    headers: &ResponseHeaders,
    body: R,
    length: u64,
) -> Result<()> {
    let length = usize::try_from(length)?;
    let response = Response::new(
        StatusCode(status),
        to_tiny_headers(headers)?,
        body,
        Some(length),
        None,
    );
    request.respond(response)?;
    Ok(())
}

fn send_text(
    request: Request,
    status: u16,
    mut headers: ResponseHeaders,
    body: &'static str,
) -> Result<()> {
    headers.set(CONTENT_TYPE, PLAIN);
    if is_head_request(&request) {
        return send_head(request, status, &headers, body.len() as u64);
    }
    send_reader(request, status, &headers, body.as_bytes(), body.len() as u64)
}

fn to_tiny_headers(headers: &ResponseHeaders) -> Result<Vec<Header>> {
    headers
        .iter()
        .map(|(name, value)| {
            Header::from_bytes(name.as_bytes(), value.as_bytes())
                .map_err(|()| anyhow!("invalid response header `{name}: {value}`"))
        })
        .collect()
}
