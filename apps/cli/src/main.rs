//! chaptergrab: download audiobook chapters from a web player page
//!
//! Launches Chromium, navigates to the player page, and runs the grab
//! pipeline over it: reveal every chapter's media URL by simulated
//! playlist clicks, download the chapters with bounded concurrency, and
//! bundle them into a zip archive on disk.

mod cdp;
mod term;

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use clap::Parser;
use futures::StreamExt;
use grabber::{
    FsSink, GrabConfig, Grabber, IntoProgressCallback, NullProgressReporter, SiteProfile,
};
use std::path::PathBuf;
use tracing::info;

use crate::cdp::CdpPlayerPage;
use crate::term::TermReporter;

#[derive(Parser, Debug)]
#[command(name = "chaptergrab", version, about)]
struct Args {
    /// URL of the audiobook player page
    page_url: String,

    /// Directory the archive is saved into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// JSON site profile overriding selectors and naming
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Maximum simultaneous downloads
    #[arg(long)]
    concurrency: Option<usize>,

    /// Suppress the progress display
    #[arg(long)]
    quiet: bool,

    /// Run the browser with a visible window
    #[arg(long)]
    headful: bool,
}

fn load_config(args: &Args) -> Result<GrabConfig> {
    let mut config = GrabConfig::default();
    if let Some(ref path) = args.profile {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read profile {}", path.display()))?;
        let profile: SiteProfile = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse profile {}", path.display()))?;
        config.apply_profile(&profile);
    }
    if let Some(concurrency) = args.concurrency {
        config.max_concurrent = concurrency;
    }
    config.referer = Some(args.page_url.clone());
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let slot_count = config.max_concurrent;

    let mut builder = BrowserConfig::builder()
        .no_sandbox()
        .window_size(1280, 720)
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-gpu");
    if args.headful {
        builder = builder.with_head();
    }
    let browser_config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build browser config: {}", e))?;

    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .context("failed to launch browser")?;
    let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

    let page = browser
        .new_page("about:blank")
        .await
        .context("failed to open a page")?;
    info!("Navigating to {}", args.page_url);
    page.goto(args.page_url.as_str())
        .await
        .context("failed to navigate to the player page")?;
    page.wait_for_navigation()
        .await
        .context("player page never finished loading")?;

    let player = CdpPlayerPage::new(page.clone());
    let sink = FsSink::new(&args.output);
    let progress = if args.quiet {
        NullProgressReporter.into_callback()
    } else {
        TermReporter::new(slot_count).into_callback()
    };

    let grabber = Grabber::new(config)?;
    let result = grabber.run(&player, &sink, Some(progress)).await;

    drop(page);
    drop(browser);
    handler_task.abort();

    let report = result?;
    let metrics = grabber.metrics().snapshot();
    println!(
        "Saved {} ({} tracks, {} bytes, {} retries)",
        sink.path_for(&report.archive_name).display(),
        report.track_count,
        report.archive_size,
        metrics.retries_attempted
    );

    Ok(())
}
