//! HTTP protocol layer module
//!
//! Cache negotiation and response building, decoupled from routing and
//! icon resolution.

pub mod cache;
pub mod response;

pub use cache::{CommonHeaders, CorsEcho};
pub use response::{
    build_error_response, build_icon_response, build_not_modified_response,
    build_preflight_response, build_redirect_response, build_version_response,
};
