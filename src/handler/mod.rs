//! Request handler module
//!
//! Entry point for HTTP request processing: preflight handling, path
//! parsing, dispatch to the icon resolver, and the version banner.

pub mod router;
pub mod version;

// Re-export main entry point
pub use router::handle_request;
