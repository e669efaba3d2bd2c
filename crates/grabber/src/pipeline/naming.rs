//! Archive filename derivation

use regex::Regex;

use crate::pipeline::config::GrabConfig;

/// Pattern the hosting site uses for chapter media URLs
const SLUG_PATTERN: &str = r"/audio/([^/]+)/\d";

/// Extract the book slug from a chapter media URL
pub fn extract_slug(url: &str) -> Option<String> {
    let re = Regex::new(SLUG_PATTERN).ok()?;
    re.captures(url).map(|c| c[1].to_string())
}

/// Derive the archive filename from the first resolved URL
///
/// Best-effort: the slug pattern is tied to one site's URL scheme, so a
/// URL that does not follow it falls back to the configured name.
pub fn derive_archive_name(config: &GrabConfig, urls: &[String]) -> String {
    urls.first()
        .and_then(|url| extract_slug(url))
        .map(|slug| format!("{}.zip", slug))
        .unwrap_or_else(|| config.fallback_archive_name.clone())
}
