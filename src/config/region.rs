//! Region detection module
//!
//! Resolves the optional deployment region shown in the version banner.
//! The value comes from the `region` environment variable, falling back to
//! a trusted local `region.txt` file. Detection runs once at startup; the
//! result is injected into `AppState` and never re-read mid-request.

use std::path::Path;

const REGION_ENV: &str = "region";
const MAX_REGION_LEN: usize = 10;

/// Detect the deployment region from the environment or a local file
pub fn detect(region_file: &Path) -> Option<String> {
    if let Ok(value) = std::env::var(REGION_ENV) {
        if is_valid_region(&value) {
            return Some(value);
        }
        return None;
    }

    let contents = std::fs::read_to_string(region_file).ok()?;
    let region = contents.trim();
    if is_valid_region(region) {
        Some(region.to_string())
    } else {
        None
    }
}

/// Check that a region identifier is safe to echo into a response body
///
/// Must match `^[a-z0-9_-]+$` and be at most 10 characters.
pub fn is_valid_region(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_REGION_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_regions() {
        assert!(is_valid_region("us-east"));
        assert!(is_valid_region("eu_west_1"));
        assert!(is_valid_region("ap1"));
    }

    #[test]
    fn test_invalid_regions() {
        assert!(!is_valid_region(""));
        assert!(!is_valid_region("US-EAST"));
        assert!(!is_valid_region("us east"));
        assert!(!is_valid_region("region-name-too-long"));
        assert!(!is_valid_region("us.east"));
    }
}
