//! Collection registry module
//!
//! Scans the configured directories for `{prefix}.json` collection files
//! and records each collection's path and modification time. The scan runs
//! once at startup; the resulting map is read-only afterwards.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::IconsConfig;
use crate::logger;

use super::CollectionInfo;

/// Registry of known icon collections, keyed by prefix
pub struct Registry {
    collections: HashMap<String, CollectionInfo>,
}

impl Registry {
    /// Scan all configured collection directories
    ///
    /// The premade set is included only when `serve_default_icons` is on.
    /// Unreadable directories are logged and skipped.
    pub fn scan(config: &IconsConfig) -> Self {
        let mut collections = HashMap::new();

        if config.serve_default_icons {
            scan_dir(Path::new(&config.default_icons_dir), &mut collections);
        }
        for dir in &config.custom_icons_dirs {
            scan_dir(Path::new(dir), &mut collections);
        }

        Self { collections }
    }

    /// Look up a collection by prefix
    pub fn find(&self, prefix: &str) -> Option<&CollectionInfo> {
        self.collections.get(prefix)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    #[cfg(test)]
    fn from_entries(entries: Vec<(String, CollectionInfo)>) -> Self {
        Self {
            collections: entries.into_iter().collect(),
        }
    }
}

/// Add every collection file in `dir` to the map
///
/// A collection file is `{prefix}.json` with no extra dots; names starting
/// with `.` or `_` are reserved and skipped.
fn scan_dir(dir: &Path, collections: &mut HashMap<String, CollectionInfo>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            logger::log_warning(&format!(
                "Skipping icon directory '{}': {e}",
                dir.display()
            ));
            return;
        }
    };

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(prefix) = collection_prefix(name) else {
            continue;
        };
        let path = entry.path();
        collections.insert(
            prefix.to_string(),
            CollectionInfo {
                last_modified: file_mtime(&path),
                path,
            },
        );
    }
}

/// Extract the collection prefix from a file name, if it is a collection
fn collection_prefix(file_name: &str) -> Option<&str> {
    if file_name.starts_with('.') || file_name.starts_with('_') {
        return None;
    }
    let mut parts = file_name.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(prefix), Some("json"), None) if !prefix.is_empty() => Some(prefix),
        _ => None,
    }
}

/// Read a file's modification time as a UTC timestamp
fn file_mtime(path: &Path) -> Option<DateTime<Utc>> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified))
}
