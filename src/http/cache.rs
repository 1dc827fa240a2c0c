//! HTTP cache control module
//!
//! `ETag` generation, HTTP date handling, the `If-Modified-Since`
//! short-circuit policy, and construction of the outgoing cache and CORS
//! header values.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::config::CacheConfig;

/// Generate `ETag` using fast hashing
///
/// Uniqueness-for-caching is all that matters here, so a non-cryptographic
/// hash is fine.
///
/// # Returns
/// Quoted `ETag` string, e.g., `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Parse an HTTP date header value
///
/// Accepts RFC 1123 / RFC 2822 dates (`Sun, 06 Nov 1994 08:49:37 GMT`) with
/// an asctime fallback. Returns `None` for anything unparseable.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc2822(value) {
        return Some(t.with_timezone(&Utc));
    }
    // asctime form: "Sun Nov  6 08:49:37 1994", always UTC
    NaiveDateTime::parse_from_str(value, "%a %b %e %H:%M:%S %Y")
        .ok()
        .map(|t| t.and_utc())
}

/// Format a timestamp as an HTTP date (`Last-Modified` style)
pub fn format_http_date(t: DateTime<Utc>) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Decide whether a conditional GET can be answered with a bare 304
///
/// The client's `If-Modified-Since` timestamp must be at least `ttl`
/// seconds in the past. This is deliberately conservative: freshness is
/// judged against the TTL window, not the resource's real modification
/// time, which avoids a registry lookup on every conditional request.
/// A malformed date is not trusted and the request is served fresh.
pub fn should_short_circuit(
    if_modified_since: Option<&str>,
    ttl_seconds: u64,
    now: DateTime<Utc>,
) -> bool {
    let Some(raw) = if_modified_since else {
        return false;
    };
    let Some(t) = parse_http_date(raw) else {
        return false;
    };
    let ttl = Duration::seconds(i64::try_from(ttl_seconds).unwrap_or(i64::MAX));
    t <= now - ttl
}

/// Check whether the inbound request opted out of caching
///
/// `no-cache` is matched as a case-sensitive substring of either header,
/// and suppresses the outgoing `Cache-Control`/`Pragma` pair.
pub fn wants_no_cache(pragma: Option<&str>, cache_control: Option<&str>) -> bool {
    pragma.is_some_and(|v| v.contains("no-cache"))
        || cache_control.is_some_and(|v| v.contains("no-cache"))
}

/// Compose the outgoing `Cache-Control` header value
///
/// `min-refresh` is only emitted when configured non-zero.
pub fn cache_control_value(cache: &CacheConfig) -> String {
    let scope = if cache.private { "private" } else { "public" };
    let mut value = format!("{scope}, max-age={}", cache.ttl);
    if cache.min_refresh > 0 {
        value.push_str(&format!(", min-refresh={}", cache.min_refresh));
    }
    value
}

/// CORS echo headers derived from the request `Origin`
#[derive(Debug, Clone)]
pub struct CorsEcho {
    pub origin: String,
    pub max_age: u64,
}

/// Cache and CORS headers shared by every response to a request
#[derive(Debug, Clone)]
pub struct CommonHeaders {
    /// `Cache-Control` value; `None` when the client asked for no-cache
    pub cache_control: Option<String>,
    /// `Pragma: cache`, sent only for public caches
    pub pragma_cache: bool,
    pub cors: Option<CorsEcho>,
}

impl CommonHeaders {
    /// Negotiate outgoing headers from config and request headers
    pub fn negotiate(cache: &CacheConfig, origin: Option<&str>, suppress_cache: bool) -> Self {
        let cache_control = if suppress_cache {
            None
        } else {
            Some(cache_control_value(cache))
        };
        Self {
            pragma_cache: cache_control.is_some() && !cache.private,
            cache_control,
            cors: origin.map(|o| CorsEcho {
                origin: o.to_string(),
                max_age: cache.ttl,
            }),
        }
    }
}
