//! Icon collection module
//!
//! The collaborator boundary consumed by the request router. The router
//! only ever talks to the `IconResolver` trait; the filesystem-backed
//! implementation in this module locates collection files on disk and
//! answers icon queries from their contents.

pub mod registry;
pub mod resolver;

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::routing::Extension;

pub use registry::Registry;
pub use resolver::FsIconResolver;

/// A rendered artifact ready to be sent to the client
#[derive(Debug, Clone)]
pub struct IconPayload {
    pub body: Vec<u8>,
    pub content_type: String,
    /// Suggested download filename, when one makes sense for the artifact
    pub filename: Option<String>,
}

/// Outcome of an icon query
///
/// A failed query carries the HTTP status to forward verbatim; the type
/// system keeps payloads and error codes apart.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    Payload(IconPayload),
    Status(u16),
}

/// Resolved collection location and freshness information
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub path: PathBuf,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Icon resolution collaborator
///
/// Calls are synchronous and may block on I/O; the handler treats them as
/// terminal for the request, with no retries.
pub trait IconResolver: Send + Sync {
    /// Map a collection prefix to its on-disk location, if known
    fn resolve_collection(&self, prefix: &str) -> Option<CollectionInfo>;

    /// Answer an icon query against a collection
    ///
    /// Query parameters are forwarded opaquely from the request URL.
    fn query(
        &self,
        prefix: &str,
        icon_query: &str,
        extension: Extension,
        params: &HashMap<String, String>,
    ) -> QueryOutcome;
}
