//! Version banner module
//!
//! Composes the plain-text banner served on the `version` path.

/// Compose the version banner
///
/// `"{product} version {version} (Rust[, {region}])"` — the region clause
/// is only present when a region was detected at startup.
pub fn banner(product: &str, region: Option<&str>) -> String {
    let mut banner = format!("{product} version {} (Rust", env!("CARGO_PKG_VERSION"));
    if let Some(region) = region {
        banner.push_str(", ");
        banner.push_str(region);
    }
    banner.push(')');
    banner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_with_region() {
        let banner = banner("SimpleSVG CDN", Some("us-east"));
        assert!(banner.starts_with("SimpleSVG CDN version "));
        assert!(banner.ends_with(" (Rust, us-east)"));
    }

    #[test]
    fn test_banner_without_region() {
        let banner = banner("SimpleSVG CDN", None);
        assert!(banner.ends_with(" (Rust)"));
        assert!(!banner.contains(','));
    }
}
