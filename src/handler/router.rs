//! Request routing dispatch module
//!
//! Per-request order of operations: CORS echo from `Origin`, `OPTIONS`
//! preflight, mount-path stripping, URL parsing, then dispatch. The
//! conditional-GET short-circuit applies to icon routes only and runs
//! before any resolver call.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use chrono::Utc;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};

use crate::config::AppState;
use crate::handler::version;
use crate::http::cache::{self, CommonHeaders, CorsEcho};
use crate::http;
use crate::icons::QueryOutcome;
use crate::logger;
use crate::routing::{self, IconRequest, Route};

/// Request context: the header values and query parameters the dispatch
/// logic needs, extracted once
pub struct RequestContext {
    pub origin: Option<String>,
    pub pragma: Option<String>,
    pub cache_control: Option<String>,
    pub if_modified_since: Option<String>,
    pub preflight_method_requested: bool,
    pub preflight_headers: Option<String>,
    pub params: HashMap<String, String>,
}

impl RequestContext {
    fn from_request(req: &Request<hyper::body::Incoming>) -> Self {
        let params = req
            .uri()
            .query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();

        Self {
            origin: header_string(req, "origin"),
            pragma: header_string(req, "pragma"),
            cache_control: header_string(req, "cache-control"),
            if_modified_since: header_string(req, "if-modified-since"),
            preflight_method_requested: req
                .headers()
                .contains_key("access-control-request-method"),
            preflight_headers: header_string(req, "access-control-request-headers"),
            params,
        }
    }

    fn cors(&self, max_age: u64) -> Option<CorsEcho> {
        self.origin.as_ref().map(|origin| CorsEcho {
            origin: origin.clone(),
            max_age,
        })
    }
}

fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let access_log = state.config.logging.access_log;
    if access_log {
        logger::log_request(&method, &uri);
    }

    let ctx = RequestContext::from_request(&req);
    let cors = ctx.cors(state.config.cache.ttl);

    let response = if method == Method::OPTIONS {
        http::build_preflight_response(
            ctx.preflight_method_requested,
            ctx.preflight_headers.as_deref(),
            &cache::cache_control_value(&state.config.cache),
            !state.config.cache.private,
            cors.as_ref(),
        )
    } else {
        let path = strip_mount(uri.path(), &state.config.server.mount_path);
        route_request(path, &ctx, &state, cors.as_ref())
    };

    if access_log {
        let body_bytes = response.body().size_hint().exact().unwrap_or(0);
        logger::log_response(
            response.status().as_u16(),
            usize::try_from(body_bytes).unwrap_or(usize::MAX),
        );
    }

    Ok(response)
}

/// Strip the deployment prefix so routing is mount-independent
fn strip_mount<'a>(path: &'a str, mount_path: &str) -> &'a str {
    path.strip_prefix(mount_path)
        .unwrap_or(path)
        .trim_start_matches('/')
}

/// Route a mount-stripped path and build the response
fn route_request(
    path: &str,
    ctx: &RequestContext,
    state: &AppState,
    cors: Option<&CorsEcho>,
) -> Response<Full<Bytes>> {
    match routing::parse(path) {
        Err(e) => http::build_error_response(e.http_status(), cors),
        Ok(Route::Home) => {
            http::build_redirect_response(&state.config.http.home_redirect, cors)
        }
        Ok(Route::Version) => http::build_version_response(
            version::banner(&state.config.http.product_name, state.region.as_deref()),
            cors,
        ),
        Ok(Route::Icon(icon)) => dispatch_icon(&icon, ctx, state, cors),
    }
}

/// Dispatch an icon route through the resolver
fn dispatch_icon(
    icon: &IconRequest,
    ctx: &RequestContext,
    state: &AppState,
    cors: Option<&CorsEcho>,
) -> Response<Full<Bytes>> {
    // Conditional GET: answered from the TTL window alone, before any
    // collaborator call.
    if cache::should_short_circuit(
        ctx.if_modified_since.as_deref(),
        state.config.cache.ttl,
        Utc::now(),
    ) {
        return http::build_not_modified_response(cors);
    }

    let Some(collection) = state.resolver.resolve_collection(&icon.prefix) else {
        return http::build_error_response(404, cors);
    };

    match state
        .resolver
        .query(&icon.prefix, &icon.icon_query, icon.extension, &ctx.params)
    {
        // Resolver-reported status forwarded verbatim
        QueryOutcome::Status(status) => http::build_error_response(status, cors),
        QueryOutcome::Payload(payload) => {
            let suppress =
                cache::wants_no_cache(ctx.pragma.as_deref(), ctx.cache_control.as_deref());
            let headers =
                CommonHeaders::negotiate(&state.config.cache, ctx.origin.as_deref(), suppress);
            let attachment = if wants_download(&ctx.params) {
                payload.filename.clone()
            } else {
                None
            };
            http::build_icon_response(
                payload,
                collection.last_modified,
                &headers,
                attachment.as_deref(),
            )
        }
    }
}

/// `download` must equal `"1"` or `"true"` exactly; no boolean coercion
fn wants_download(params: &HashMap<String, String>) -> bool {
    params
        .get("download")
        .is_some_and(|v| v == "1" || v == "true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::icons::{CollectionInfo, IconPayload, IconResolver};
    use crate::routing::Extension;
    use std::path::PathBuf;

    /// Resolver with a single collection `mdi` holding a single icon `home`
    struct MockResolver;

    impl IconResolver for MockResolver {
        fn resolve_collection(&self, prefix: &str) -> Option<CollectionInfo> {
            (prefix == "mdi").then(|| CollectionInfo {
                path: PathBuf::from("mdi.json"),
                last_modified: Some(Utc::now()),
            })
        }

        fn query(
            &self,
            _prefix: &str,
            icon_query: &str,
            extension: Extension,
            _params: &HashMap<String, String>,
        ) -> QueryOutcome {
            match (icon_query, extension) {
                ("home", Extension::Svg) => QueryOutcome::Payload(IconPayload {
                    body: b"<svg>home</svg>".to_vec(),
                    content_type: "image/svg+xml; charset=utf-8".to_string(),
                    filename: Some("home.svg".to_string()),
                }),
                ("icons", _) => QueryOutcome::Payload(IconPayload {
                    body: b"{}".to_vec(),
                    content_type: "application/json; charset=utf-8".to_string(),
                    filename: Some("mdi.json".to_string()),
                }),
                ("teapot", Extension::Svg) => QueryOutcome::Status(418),
                _ => QueryOutcome::Status(404),
            }
        }
    }

    fn test_state() -> AppState {
        let config = Config::load_from("nonexistent-config").expect("defaults should load");
        AppState::new(config, Arc::new(MockResolver), Some("us-east".to_string()))
    }

    fn empty_ctx() -> RequestContext {
        RequestContext {
            origin: None,
            pragma: None,
            cache_control: None,
            if_modified_since: None,
            preflight_method_requested: false,
            preflight_headers: None,
            params: HashMap::new(),
        }
    }

    fn header<'a>(resp: &'a Response<Full<Bytes>>, name: &str) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_strip_mount() {
        assert_eq!(strip_mount("/mdi/home.svg", "/"), "mdi/home.svg");
        assert_eq!(strip_mount("/icons/mdi/home.svg", "/icons"), "mdi/home.svg");
        assert_eq!(strip_mount("/", "/"), "");
        assert_eq!(strip_mount("/version", "/"), "version");
    }

    #[test]
    fn test_wants_download() {
        let mut params = HashMap::new();
        assert!(!wants_download(&params));
        params.insert("download".to_string(), "1".to_string());
        assert!(wants_download(&params));
        params.insert("download".to_string(), "true".to_string());
        assert!(wants_download(&params));
        params.insert("download".to_string(), "yes".to_string());
        assert!(!wants_download(&params));
    }

    #[test]
    fn test_home_redirect() {
        let state = test_state();
        let resp = route_request("", &empty_ctx(), &state, None);
        assert_eq!(resp.status(), 301);
        assert_eq!(header(&resp, "Location"), Some("https://simplesvg.com/"));
    }

    #[test]
    fn test_version_banner_includes_region() {
        let state = test_state();
        let resp = route_request("version", &empty_ctx(), &state, None);
        assert_eq!(resp.status(), 200);
        assert_eq!(header(&resp, "Content-Type"), Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn test_icon_dispatch() {
        let state = test_state();
        let resp = route_request("mdi:home.svg", &empty_ctx(), &state, None);
        assert_eq!(resp.status(), 200);
        assert_eq!(
            header(&resp, "Content-Type"),
            Some("image/svg+xml; charset=utf-8")
        );
        assert!(header(&resp, "ETag").is_some());
        assert!(header(&resp, "Last-Modified").is_some());
        assert_eq!(
            header(&resp, "Cache-Control"),
            Some("public, max-age=604800, min-refresh=86400")
        );
        assert_eq!(header(&resp, "Pragma"), Some("cache"));
    }

    #[test]
    fn test_icon_dispatch_is_idempotent() {
        let state = test_state();
        let first = route_request("mdi:home.svg", &empty_ctx(), &state, None);
        let second = route_request("mdi:home.svg", &empty_ctx(), &state, None);
        assert_eq!(first.headers().get("ETag"), second.headers().get("ETag"));
    }

    #[test]
    fn test_unknown_prefix_is_not_found() {
        let state = test_state();
        let resp = route_request("unknown:home.svg", &empty_ctx(), &state, None);
        assert_eq!(resp.status(), 404);
    }

    #[test]
    fn test_resolver_status_is_forwarded_verbatim() {
        let state = test_state();
        let resp = route_request("mdi:teapot.svg", &empty_ctx(), &state, None);
        assert_eq!(resp.status(), 418);
    }

    #[test]
    fn test_parse_failure_is_not_found() {
        let state = test_state();
        let resp = route_request("a/b/c.svg", &empty_ctx(), &state, None);
        assert_eq!(resp.status(), 404);
    }

    #[test]
    fn test_stale_conditional_get_short_circuits() {
        let state = test_state();
        let mut ctx = empty_ctx();
        // Two weeks old, well past the one-week default TTL
        let stale = Utc::now() - chrono::Duration::seconds(14 * 86_400);
        ctx.if_modified_since = Some(cache::format_http_date(stale));
        let resp = route_request("mdi:home.svg", &ctx, &state, None);
        assert_eq!(resp.status(), 304);
    }

    #[test]
    fn test_fresh_conditional_get_serves_body() {
        let state = test_state();
        let mut ctx = empty_ctx();
        let recent = Utc::now() - chrono::Duration::seconds(60);
        ctx.if_modified_since = Some(cache::format_http_date(recent));
        let resp = route_request("mdi:home.svg", &ctx, &state, None);
        assert_eq!(resp.status(), 200);
    }

    #[test]
    fn test_no_cache_suppresses_cache_headers() {
        let state = test_state();
        let mut ctx = empty_ctx();
        ctx.pragma = Some("no-cache".to_string());
        let resp = route_request("mdi:home.svg", &ctx, &state, None);
        assert_eq!(resp.status(), 200);
        assert!(header(&resp, "Cache-Control").is_none());
        assert!(header(&resp, "Pragma").is_none());
    }

    #[test]
    fn test_download_param_sets_disposition() {
        let state = test_state();
        let mut ctx = empty_ctx();
        ctx.params
            .insert("download".to_string(), "true".to_string());
        let resp = route_request("mdi:home.svg", &ctx, &state, None);
        assert_eq!(
            header(&resp, "Content-Disposition"),
            Some("attachment; filename=\"home.svg\"")
        );
    }

    #[test]
    fn test_collection_shorthand_route() {
        let state = test_state();
        let resp = route_request("mdi.json", &empty_ctx(), &state, None);
        assert_eq!(resp.status(), 200);
        assert_eq!(
            header(&resp, "Content-Type"),
            Some("application/json; charset=utf-8")
        );
    }
}
