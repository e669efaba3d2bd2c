//! Main entry point for the grab pipeline
//!
//! This module provides the primary `Grabber` interface that users
//! interact with. The call chain flows as follows:
//!
//! User Code
//! ↓
//! Grabber (this file)
//! ↓
//! resolver::resolve_track_urls → pool::download_tracks →
//! archive::assemble_archive → naming::derive_archive_name → ArchiveSink

use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::pipeline::{
    archive::assemble_archive,
    config::GrabConfig,
    error::{GrabError, Result},
    metrics::GrabMetrics,
    naming::derive_archive_name,
    page::{await_attribute, PlayerPage},
    pool::download_tracks,
    progress::ProgressCallback,
    resolver::resolve_track_urls,
    sink::ArchiveSink,
};

/// Summary of a completed grab run
#[derive(Debug, Clone)]
pub struct GrabReport {
    pub track_count: usize,
    pub archive_name: String,
    pub archive_size: u64,
}

/// One-shot audiobook grab pipeline
///
/// Owns the HTTP client, configuration, and metrics. A single instance
/// runs at most one pipeline at a time: a second `run` while one is
/// active is rejected rather than starting an overlapping flow.
pub struct Grabber {
    client: Client,
    config: GrabConfig,
    metrics: Arc<GrabMetrics>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when a run ends, successfully or not
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Grabber {
    /// Create a new grabber with its HTTP client built from the config
    pub fn new(config: GrabConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| GrabError::Internal(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            metrics: Arc::new(GrabMetrics::default()),
            in_flight: AtomicBool::new(false),
        })
    }

    /// Get access to built-in performance metrics
    pub fn metrics(&self) -> &GrabMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &GrabConfig {
        &self.config
    }

    /// Run the complete pipeline once
    ///
    /// Waits for the page to finish loading, resolves every track URL by
    /// simulated interaction, downloads them with bounded concurrency,
    /// assembles the archive, and saves it through the sink. Invoking
    /// `run` again while a run is active returns
    /// [`GrabError::AlreadyRunning`]; the instance accepts a new run once
    /// the save step completes or the run fails.
    pub async fn run(
        &self,
        page: &dyn PlayerPage,
        sink: &dyn ArchiveSink,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<GrabReport> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(GrabError::AlreadyRunning);
        }
        let _guard = FlightGuard(&self.in_flight);

        self.wait_for_player_load(page).await?;
        info!("Player loaded, resolving track URLs");

        let urls = resolve_track_urls(page, &self.config, progress_callback.clone()).await?;
        if urls.is_empty() {
            return Err(GrabError::EmptyPlaylist {
                selector: self.config.track_selector.clone(),
            });
        }
        self.metrics.record_tracks_revealed(urls.len() as u64);

        let tracks = download_tracks(
            &self.client,
            &self.config,
            &self.metrics,
            &urls,
            progress_callback.clone(),
        )
        .await?;

        let archive = assemble_archive(&self.config, &tracks, progress_callback)?;
        let archive_name = derive_archive_name(&self.config, &urls);

        let archive_size = sink.save(&archive_name, &archive).await?;
        self.metrics.record_archive_written();

        info!(
            "Saved {} ({} tracks, {} bytes)",
            archive_name,
            tracks.len(),
            archive_size
        );
        Ok(GrabReport {
            track_count: tracks.len(),
            archive_name,
            archive_size,
        })
    }

    /// Wait for the page loading indicator to clear
    ///
    /// The watch primitive only reports changes, so the current state is
    /// checked separately: an indicator already hidden needs no wait.
    /// Subscribing before that check keeps a change landing in between
    /// from being lost.
    async fn wait_for_player_load(&self, page: &dyn PlayerPage) -> Result<()> {
        let config = &self.config;
        let hidden = |value: &str| value.contains(config.loading_hidden_marker.as_str());

        let watch = page
            .watch_attribute(&config.loading_selector, 0, &config.loading_attribute)
            .await?;

        let current = page
            .attribute(&config.loading_selector, 0, &config.loading_attribute)
            .await?;
        if let Some(value) = current {
            if hidden(&value) {
                debug!("Loading indicator already hidden");
                return Ok(());
            }
        }

        await_attribute(
            watch,
            &config.loading_selector,
            &config.loading_attribute,
            hidden,
            config.load_timeout,
        )
        .await?;

        Ok(())
    }
}
