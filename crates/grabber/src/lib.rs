//! Grabber Library
//!
//! This library automates downloading audiobook chapters from a web audio
//! player page. The host page only reveals each chapter's media URL after a
//! simulated click on its playlist entry, so the pipeline drives the page
//! one track at a time, downloads the revealed URLs with bounded
//! concurrency, bundles the results into a store-only zip archive, and
//! hands the archive to a save sink.
//!
//! Page access and archive persistence are capability traits
//! ([`PlayerPage`], [`ArchiveSink`]); the library itself never touches a
//! browser or the terminal, which keeps the pipeline testable against
//! in-memory fakes.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use grabber::{GrabConfig, Grabber};
//!
//! # fn example() -> grabber::Result<()> {
//! let mut config = GrabConfig::default();
//! config.max_concurrent = 4;
//! config.referer = Some("https://example.com/audiobook/some-title".to_string());
//!
//! let grabber = Grabber::new(config)?;
//!
//! // Drive it with a PlayerPage adapter and an ArchiveSink:
//! // let report = grabber.run(&page, &sink, None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Sequential track reveal**: one simulated click at a time, matching
//!   the player's one-active-disclosure behavior
//! - **Bounded downloads**: configurable maximum in-flight requests with
//!   per-request retry and exponential backoff
//! - **Deterministic archives**: store-only zip, entries in playback order,
//!   byte-identical output for identical inputs
//! - **Progress tracking**: reveal, per-slot download, and archive events
//! - **Single-flight runs**: re-entrant invocations are rejected while a
//!   run is active

pub mod pipeline;

// Re-export commonly used types for convenience
pub use pipeline::{
    ArchiveSink, AttributeWatch, ConsoleProgressReporter, FsSink, GrabConfig,
    GrabError, GrabMetrics, GrabMetricsSnapshot, GrabReport, Grabber,
    IntoProgressCallback, NullProgressReporter, PlayerPage, ProgressCallback,
    ProgressEvent, ProgressReporter, Result, SiteProfile,
};
