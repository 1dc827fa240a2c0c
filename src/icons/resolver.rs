//! Filesystem icon resolver module
//!
//! Answers icon queries from collection JSON files located by the
//! registry. This is deliberately the thinnest operable resolver: icons
//! are served in a fixed `<svg>` envelope straight from the stored body,
//! and collection requests serve the file bytes (optionally wrapped in a
//! loader callback for `.js`). Color/rotation/flip transforms and alias
//! resolution are out of scope.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::logger;
use crate::routing::Extension;

use super::{CollectionInfo, IconPayload, IconResolver, QueryOutcome, Registry};

/// Dimension used when neither the icon nor the collection declares one
const DEFAULT_DIMENSION: u32 = 16;

/// Default JSONP wrapper for `.js` collection requests
const DEFAULT_CALLBACK: &str = "SimpleSVG._loaderCallback";

/// Collection file shape, limited to the fields this resolver reads
#[derive(Debug, Deserialize)]
struct CollectionDoc {
    icons: HashMap<String, IconRecord>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct IconRecord {
    body: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

/// Filesystem-backed icon resolver
pub struct FsIconResolver {
    registry: Registry,
}

impl FsIconResolver {
    pub const fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

impl IconResolver for FsIconResolver {
    fn resolve_collection(&self, prefix: &str) -> Option<CollectionInfo> {
        self.registry.find(prefix).cloned()
    }

    fn query(
        &self,
        prefix: &str,
        icon_query: &str,
        extension: Extension,
        params: &HashMap<String, String>,
    ) -> QueryOutcome {
        let Some(info) = self.registry.find(prefix) else {
            return QueryOutcome::Status(404);
        };

        match extension {
            Extension::Svg => match read_collection(&info.path) {
                Some(data) => svg_outcome(&data, icon_query),
                None => QueryOutcome::Status(404),
            },
            Extension::Json | Extension::Js if icon_query == "icons" => {
                let Some(data) = read_collection(&info.path) else {
                    return QueryOutcome::Status(404);
                };
                match extension {
                    Extension::Js => js_outcome(data, params.get("callback").map(String::as_str)),
                    _ => QueryOutcome::Payload(IconPayload {
                        body: data,
                        content_type: "application/json; charset=utf-8".to_string(),
                        filename: Some(format!("{prefix}.json")),
                    }),
                }
            }
            // Any other query shape is an unknown route within the collection
            _ => QueryOutcome::Status(404),
        }
    }
}

/// Read a collection file, logging failures
fn read_collection(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(data) => Some(data),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read collection '{}': {e}",
                path.display()
            ));
            None
        }
    }
}

/// Look up an icon and wrap its stored body in an `<svg>` envelope
fn svg_outcome(data: &[u8], icon: &str) -> QueryOutcome {
    let doc: CollectionDoc = match serde_json::from_slice(data) {
        Ok(doc) => doc,
        Err(e) => {
            logger::log_error(&format!("Invalid collection JSON: {e}"));
            return QueryOutcome::Status(404);
        }
    };
    let Some(record) = doc.icons.get(icon) else {
        return QueryOutcome::Status(404);
    };

    let width = record.width.or(doc.width).unwrap_or(DEFAULT_DIMENSION);
    let height = record.height.or(doc.height).unwrap_or(DEFAULT_DIMENSION);
    let body = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">{}</svg>",
        record.body
    );

    QueryOutcome::Payload(IconPayload {
        body: body.into_bytes(),
        content_type: "image/svg+xml; charset=utf-8".to_string(),
        filename: Some(format!("{icon}.svg")),
    })
}

/// Wrap collection JSON in the loader callback for `.js` requests
///
/// A caller-supplied callback must look like a dotted identifier; anything
/// else is a bad request.
fn js_outcome(data: Vec<u8>, callback: Option<&str>) -> QueryOutcome {
    let callback = match callback {
        Some(value) if is_valid_callback(value) => value,
        Some(_) => return QueryOutcome::Status(400),
        None => DEFAULT_CALLBACK,
    };

    let mut body = Vec::with_capacity(callback.len() + data.len() + 2);
    body.extend_from_slice(callback.as_bytes());
    body.push(b'(');
    body.extend_from_slice(&data);
    body.extend_from_slice(b")");

    QueryOutcome::Payload(IconPayload {
        body,
        content_type: "application/javascript; charset=utf-8".to_string(),
        filename: None,
    })
}

fn is_valid_callback(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "width": 24,
        "height": 24,
        "icons": {
            "home": { "body": "<path d=\"M0 0h24v24H0z\"/>" },
            "tiny": { "body": "<path d=\"M0 0\"/>", "width": 8, "height": 8 }
        }
    }"#;

    #[test]
    fn test_svg_outcome_uses_collection_dimensions() {
        let QueryOutcome::Payload(payload) = svg_outcome(COLLECTION.as_bytes(), "home") else {
            panic!("expected payload");
        };
        let body = String::from_utf8(payload.body).expect("utf8 svg");
        assert!(body.starts_with("<svg "));
        assert!(body.contains("width=\"24\""));
        assert!(body.contains("viewBox=\"0 0 24 24\""));
        assert!(body.contains("<path d=\"M0 0h24v24H0z\"/>"));
        assert_eq!(payload.content_type, "image/svg+xml; charset=utf-8");
        assert_eq!(payload.filename.as_deref(), Some("home.svg"));
    }

    #[test]
    fn test_svg_outcome_icon_dimensions_win() {
        let QueryOutcome::Payload(payload) = svg_outcome(COLLECTION.as_bytes(), "tiny") else {
            panic!("expected payload");
        };
        let body = String::from_utf8(payload.body).expect("utf8 svg");
        assert!(body.contains("width=\"8\""));
        assert!(body.contains("height=\"8\""));
    }

    #[test]
    fn test_svg_outcome_unknown_icon() {
        assert!(matches!(
            svg_outcome(COLLECTION.as_bytes(), "missing"),
            QueryOutcome::Status(404)
        ));
    }

    #[test]
    fn test_svg_outcome_invalid_json() {
        assert!(matches!(
            svg_outcome(b"not json", "home"),
            QueryOutcome::Status(404)
        ));
    }

    #[test]
    fn test_js_outcome_default_callback() {
        let QueryOutcome::Payload(payload) = js_outcome(b"{}".to_vec(), None) else {
            panic!("expected payload");
        };
        assert_eq!(payload.body, b"SimpleSVG._loaderCallback({})");
        assert_eq!(payload.content_type, "application/javascript; charset=utf-8");
        assert!(payload.filename.is_none());
    }

    #[test]
    fn test_js_outcome_custom_callback() {
        let QueryOutcome::Payload(payload) =
            js_outcome(b"{}".to_vec(), Some("window.loadIcons")) else {
            panic!("expected payload");
        };
        assert_eq!(payload.body, b"window.loadIcons({})");
    }

    #[test]
    fn test_js_outcome_rejects_bad_callback() {
        assert!(matches!(
            js_outcome(b"{}".to_vec(), Some("alert(1);//")),
            QueryOutcome::Status(400)
        ));
        assert!(matches!(
            js_outcome(b"{}".to_vec(), Some("")),
            QueryOutcome::Status(400)
        ));
    }
}
