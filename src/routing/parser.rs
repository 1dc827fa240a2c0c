//! URL parser module
//!
//! Decomposes a mount-stripped request path into a `Route`. The grammar,
//! segment by segment:
//!
//! ```text
//! ""                      -> Home (redirect)
//! "version"               -> Version banner
//! "{prefix}:{icon}.svg"   -> Icon
//! "{prefix}-{icon...}.svg"-> Icon (icon may itself contain hyphens)
//! "{prefix}.js|json"      -> Icon with the fixed icon query "icons"
//! "{prefix}/{icon}.{ext}" -> Icon, ext one of svg/js/json
//! ```
//!
//! Exactly one `.` separates body and extension, the body is restricted to
//! `[a-z0-9:/-]`, and at most two `/` segments are allowed. For a single
//! `svg` segment the `:` form is tried first; the `-` form is the fallback
//! and re-joins everything after the first token, so `a-b-c.svg` parses as
//! prefix `a`, icon `b-c`.

/// Recognized extensions for icon routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    Svg,
    Js,
    Json,
}

impl Extension {
    fn from_path(ext: &str) -> Option<Self> {
        match ext {
            "svg" => Some(Self::Svg),
            "js" => Some(Self::Js),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A fully decomposed icon request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRequest {
    pub prefix: String,
    pub icon_query: String,
    pub extension: Extension,
}

/// Routed form of a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Empty path, redirected to the project homepage
    Home,
    /// Literal `version` path
    Version,
    /// Icon dispatch
    Icon(IconRequest),
}

/// Path rejection reasons
///
/// `BadFormat` covers syntactically malformed paths, `NotFound` covers
/// well-formed paths that match no supported route shape. Policy maps both
/// to HTTP 404; 400 is reserved and never produced by this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    BadFormat,
    NotFound,
}

impl ParseError {
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::BadFormat | Self::NotFound => 404,
        }
    }
}

/// Parse a mount-stripped request path into a `Route`
pub fn parse(path: &str) -> Result<Route, ParseError> {
    if path.is_empty() {
        return Ok(Route::Home);
    }
    if path == "version" {
        return Ok(Route::Version);
    }

    let (body, extension) = split_extension(path)?;
    if !is_valid_body(body) {
        return Err(ParseError::BadFormat);
    }

    let segments: Vec<&str> = body.split('/').collect();
    match segments.as_slice() {
        [single] => parse_single_segment(single, extension),
        [prefix, icon] => Ok(Route::Icon(IconRequest {
            prefix: (*prefix).to_string(),
            icon_query: (*icon).to_string(),
            extension,
        })),
        _ => Err(ParseError::NotFound),
    }
}

/// Split on the extension separator; exactly one `.` is required
fn split_extension(path: &str) -> Result<(&str, Extension), ParseError> {
    let mut parts = path.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(body), Some(ext), None) => {
            Extension::from_path(ext).map_or(Err(ParseError::NotFound), |e| Ok((body, e)))
        }
        _ => Err(ParseError::BadFormat),
    }
}

/// Path body character class: `[a-z0-9:/-]+`
fn is_valid_body(body: &str) -> bool {
    !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, ':' | '/' | '-'))
}

/// Parse a one-segment body: `prefix:icon.svg`, `prefix-icon.svg`,
/// `prefix.js`, or `prefix.json`
fn parse_single_segment(segment: &str, extension: Extension) -> Result<Route, ParseError> {
    match extension {
        Extension::Svg => {
            let colon_parts: Vec<&str> = segment.split(':').collect();
            match colon_parts.as_slice() {
                [prefix, icon] => Ok(Route::Icon(IconRequest {
                    prefix: (*prefix).to_string(),
                    icon_query: (*icon).to_string(),
                    extension,
                })),
                // No colon: fall back to the hyphen form. The icon name may
                // itself contain hyphens, so everything after the first token
                // is re-joined.
                [single] => {
                    let mut hyphen_parts = single.split('-');
                    let prefix = hyphen_parts.next().unwrap_or_default();
                    let rest: Vec<&str> = hyphen_parts.collect();
                    if rest.is_empty() {
                        return Err(ParseError::NotFound);
                    }
                    Ok(Route::Icon(IconRequest {
                        prefix: prefix.to_string(),
                        icon_query: rest.join("-"),
                        extension,
                    }))
                }
                // More than one colon matches neither form
                _ => Err(ParseError::NotFound),
            }
        }
        // Shorthand collection request: prefix.js / prefix.json
        Extension::Js | Extension::Json => Ok(Route::Icon(IconRequest {
            prefix: segment.to_string(),
            icon_query: "icons".to_string(),
            extension,
        })),
    }
}
