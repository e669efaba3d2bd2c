//! Configuration types for the grab pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a complete grab run
///
/// Everything the pipeline needs to know about the host page (selectors,
/// attribute names), the download policy, and archive naming lives here,
/// so no component ever reaches for implicit page globals.
#[derive(Debug, Clone)]
pub struct GrabConfig {
    /// CSS selector matching every playlist track entry
    pub track_selector: String,
    /// Attribute the host page populates with the revealed media URL
    pub reveal_attribute: String,
    /// CSS selector for the page loading indicator
    pub loading_selector: String,
    /// Attribute watched on the loading indicator
    pub loading_attribute: String,
    /// Substring of the loading attribute that marks the indicator as hidden
    pub loading_hidden_marker: String,
    /// Number of leading playlist entries to discard (promotional items)
    pub skip_leading: usize,
    /// Maximum simultaneous in-flight downloads
    pub max_concurrent: usize,
    pub max_retries: usize,
    /// Initial delay between retries (doubles each retry)
    pub retry_delay: Duration,
    /// Maximum retry delay cap (prevents exponential backoff from getting too long)
    pub max_retry_delay: Duration,
    /// How long to wait for the loading indicator to clear
    pub load_timeout: Duration,
    /// How long to wait for a single track's URL to be revealed
    pub reveal_timeout: Duration,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Referer sent with every track request (the player page URL)
    pub referer: Option<String>,
    /// Archive entry name prefix
    pub entry_prefix: String,
    /// Archive entry name extension
    pub entry_extension: String,
    /// Archive filename used when no slug can be derived
    pub fallback_archive_name: String,
}

impl GrabConfig {
    /// Calculate retry delay for the given attempt using exponential backoff
    pub fn get_retry_delay(&self, attempt: usize) -> Duration {
        let delay = self.retry_delay.as_millis() as u64 * 2_u64.pow(attempt as u32);
        Duration::from_millis(delay.min(self.max_retry_delay.as_millis() as u64))
    }

    /// Overlay a site profile onto this configuration
    pub fn apply_profile(&mut self, profile: &SiteProfile) {
        if let Some(ref v) = profile.track_selector {
            self.track_selector = v.clone();
        }
        if let Some(ref v) = profile.reveal_attribute {
            self.reveal_attribute = v.clone();
        }
        if let Some(ref v) = profile.loading_selector {
            self.loading_selector = v.clone();
        }
        if let Some(ref v) = profile.loading_attribute {
            self.loading_attribute = v.clone();
        }
        if let Some(ref v) = profile.loading_hidden_marker {
            self.loading_hidden_marker = v.clone();
        }
        if let Some(v) = profile.skip_leading {
            self.skip_leading = v;
        }
        if let Some(ref v) = profile.entry_prefix {
            self.entry_prefix = v.clone();
        }
        if let Some(ref v) = profile.entry_extension {
            self.entry_extension = v.clone();
        }
        if let Some(ref v) = profile.fallback_archive_name {
            self.fallback_archive_name = v.clone();
        }
    }
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            track_selector: "#audio_content .simp-playlist .simp-source".to_string(),
            reveal_attribute: "data-src".to_string(),
            loading_selector: "#loading-message-element".to_string(),
            loading_attribute: "style".to_string(),
            loading_hidden_marker: "display: none".to_string(),
            skip_leading: 1,
            max_concurrent: 3,
            max_retries: 3,
            retry_delay: Duration::from_millis(1000), // Start with 1 second
            max_retry_delay: Duration::from_secs(60), // Cap at 1 minute
            load_timeout: Duration::from_secs(120),
            reveal_timeout: Duration::from_secs(20),
            request_timeout: Duration::from_secs(600),
            user_agent: "chaptergrab/0.1.0".to_string(),
            referer: None,
            entry_prefix: "track_".to_string(),
            entry_extension: "mp3".to_string(),
            fallback_archive_name: "audiobook.zip".to_string(),
        }
    }
}

/// Per-site overrides loadable from a JSON profile
///
/// Only the page-structure and naming knobs are site-specific; download
/// policy stays in [`GrabConfig`]. Absent fields leave the defaults alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    pub track_selector: Option<String>,
    pub reveal_attribute: Option<String>,
    pub loading_selector: Option<String>,
    pub loading_attribute: Option<String>,
    pub loading_hidden_marker: Option<String>,
    pub skip_leading: Option<usize>,
    pub entry_prefix: Option<String>,
    pub entry_extension: Option<String>,
    pub fallback_archive_name: Option<String>,
}
