//! Track URL resolution by simulated playlist interaction

use tracing::{debug, info};

use crate::pipeline::{
    config::GrabConfig,
    error::{GrabError, Result},
    page::{await_attribute, PlayerPage},
    progress::{ProgressCallback, ProgressEvent},
};

/// Resolve every track's media URL by walking the playlist in document order
///
/// Each simulated click triggers the host page's own reveal logic, which
/// populates the track's URL attribute asynchronously. The player only
/// supports one active disclosure at a time, so the loop is strictly
/// sequential: a track's reveal must complete before the next click.
/// The first `skip_leading` entries are discarded afterwards.
pub async fn resolve_track_urls(
    page: &dyn PlayerPage,
    config: &GrabConfig,
    progress_callback: Option<ProgressCallback>,
) -> Result<Vec<String>> {
    let total = page.element_count(&config.track_selector).await?;
    if total == 0 {
        return Err(GrabError::EmptyPlaylist {
            selector: config.track_selector.clone(),
        });
    }
    debug!("Found {} playlist entries", total);

    if let Some(ref callback) = progress_callback {
        callback(ProgressEvent::RevealStarted { total });
    }

    let mut urls = Vec::with_capacity(total);
    for index in 0..total {
        // Subscribe before dispatching the click so a reveal that lands
        // immediately is not missed.
        let watch = page
            .watch_attribute(&config.track_selector, index, &config.reveal_attribute)
            .await?;
        page.click(&config.track_selector, index).await?;

        let url = await_attribute(
            watch,
            &config.track_selector,
            &config.reveal_attribute,
            |value| !value.is_empty(),
            config.reveal_timeout,
        )
        .await?;

        debug!("Track {}/{} revealed", index + 1, total);
        urls.push(url);

        if let Some(ref callback) = progress_callback {
            callback(ProgressEvent::RevealProgress {
                current: index + 1,
                total,
            });
        }
    }

    // The site always inserts the promotional entries first.
    let kept = urls.split_off(config.skip_leading.min(urls.len()));
    info!(
        "Resolved {} track URLs ({} leading entries skipped)",
        kept.len(),
        urls.len()
    );
    Ok(kept)
}
