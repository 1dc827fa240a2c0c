//! HTTP response building module
//!
//! Assembles final responses from dispatch results. Every builder applies
//! the CORS echo when the request carried an `Origin`; cache headers are
//! only attached where the caching policy calls for them (icon payloads
//! and preflight responses).

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::Response;

use chrono::{DateTime, Utc};

use super::cache::{self, CommonHeaders, CorsEcho};
use crate::icons::IconPayload;

/// Apply the CORS echo headers to a response under construction
fn apply_cors(mut builder: Builder, cors: Option<&CorsEcho>) -> Builder {
    if let Some(cors) = cors {
        builder = builder
            .header("Access-Control-Allow-Origin", cors.origin.as_str())
            .header("Access-Control-Allow-Credentials", "true")
            .header("Access-Control-Max-Age", cors.max_age);
    }
    builder
}

/// Build an error response
///
/// Fixed short bodies for 400 and 404; any other status is forwarded with
/// an empty body.
pub fn build_error_response(status: u16, cors: Option<&CorsEcho>) -> Response<Full<Bytes>> {
    let body = match status {
        400 => "Bad request",
        404 => "Not found",
        _ => "",
    };
    let mut builder = Response::builder().status(status);
    if !body.is_empty() {
        builder = builder.header("Content-Type", "text/plain; charset=utf-8");
    }
    apply_cors(builder, cors)
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error("error", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the 301 homepage redirect, empty body
pub fn build_redirect_response(location: &str, cors: Option<&CorsEcho>) -> Response<Full<Bytes>> {
    apply_cors(Response::builder().status(301).header("Location", location), cors)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a bare 304 Not Modified response: no body, no content headers
pub fn build_not_modified_response(cors: Option<&CorsEcho>) -> Response<Full<Bytes>> {
    apply_cors(Response::builder().status(304), cors)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the plain-text version banner response
pub fn build_version_response(banner: String, cors: Option<&CorsEcho>) -> Response<Full<Bytes>> {
    apply_cors(
        Response::builder()
            .status(200)
            .header("Content-Type", "text/plain; charset=utf-8"),
        cors,
    )
    .body(Full::new(Bytes::from(banner)))
    .unwrap_or_else(|e| {
        log_build_error("version", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build a 200 icon payload response
///
/// `attachment` carries the filename for `Content-Disposition` and is only
/// set when the request asked for a download and the payload has one.
pub fn build_icon_response(
    payload: IconPayload,
    last_modified: Option<DateTime<Utc>>,
    headers: &CommonHeaders,
    attachment: Option<&str>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&payload.body);

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", payload.content_type.as_str())
        .header("ETag", etag);

    if let Some(time) = last_modified {
        builder = builder.header("Last-Modified", cache::format_http_date(time));
    }
    if let Some(value) = &headers.cache_control {
        builder = builder.header("Cache-Control", value.as_str());
    }
    if headers.pragma_cache {
        builder = builder.header("Pragma", "cache");
    }
    if let Some(filename) = attachment {
        builder = builder.header(
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        );
    }

    apply_cors(builder, headers.cors.as_ref())
        .body(Full::new(Bytes::from(payload.body)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the OPTIONS preflight response
///
/// Allowed methods are echoed only when the request declared
/// `Access-Control-Request-Method`; requested headers are echoed verbatim.
/// Cache headers are always attached here, regardless of request
/// no-cache hints.
pub fn build_preflight_response(
    method_requested: bool,
    requested_headers: Option<&str>,
    cache_control: &str,
    pragma_cache: bool,
    cors: Option<&CorsEcho>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(200);

    if method_requested {
        builder = builder.header("Access-Control-Allow-Methods", "GET, POST, OPTIONS");
    }
    if let Some(headers) = requested_headers {
        builder = builder.header("Access-Control-Allow-Headers", headers);
    }
    builder = builder.header("Cache-Control", cache_control);
    if pragma_cache {
        builder = builder.header("Pragma", "cache");
    }

    apply_cors(builder, cors)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
