//! Bounded-concurrency track downloads

use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::pipeline::{
    config::GrabConfig,
    error::{GrabError, Result},
    metrics::GrabMetrics,
    progress::{ProgressCallback, ProgressEvent},
};

/// Free-list of UI slots for attributing progress rows to concurrent
/// downloads. Presentation only; carries no synchronization meaning.
struct SlotPool {
    free: Mutex<Vec<usize>>,
}

impl SlotPool {
    fn new(size: usize) -> Self {
        Self {
            free: Mutex::new((0..size).rev().collect()),
        }
    }

    fn acquire(&self) -> usize {
        self.free.lock().unwrap().pop().unwrap_or(0)
    }

    fn release(&self, slot: usize) {
        self.free.lock().unwrap().push(slot);
    }
}

/// Download every URL with at most `max_concurrent` requests in flight
///
/// Downloads may complete out of order, but each result is re-associated
/// to its originating index, so the returned buffers are always in input
/// order. The aggregate completion count advances once per finished
/// request regardless of completion order. The first unrecoverable (or
/// retry-exhausted) failure aborts the whole batch, dropping any sibling
/// requests still in flight.
pub async fn download_tracks(
    client: &Client,
    config: &GrabConfig,
    metrics: &GrabMetrics,
    urls: &[String],
    progress_callback: Option<ProgressCallback>,
) -> Result<Vec<Vec<u8>>> {
    let total = urls.len();
    let max_concurrent = config.max_concurrent.max(1);
    debug!(
        "Starting download of {} tracks with max_concurrent={}",
        total, max_concurrent
    );

    let slots = SlotPool::new(max_concurrent);
    let completed = AtomicUsize::new(0);

    let mut results: Vec<Option<Vec<u8>>> = Vec::with_capacity(total);
    results.resize_with(total, || None);

    let mut fetches = stream::iter(urls.iter().enumerate())
        .map(|(index, url)| {
            let progress_cb = progress_callback.clone();
            let slots = &slots;
            let completed = &completed;
            async move {
                let slot = slots.acquire();
                let result =
                    download_with_retry(client, config, metrics, index, slot, url, progress_cb.clone())
                        .await;
                slots.release(slot);

                if result.is_ok() {
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(ref callback) = progress_cb {
                        callback(ProgressEvent::DownloadComplete {
                            index,
                            slot,
                            completed: done,
                            total,
                        });
                    }
                }
                (index, result)
            }
        })
        .buffer_unordered(max_concurrent);

    while let Some((index, result)) = fetches.next().await {
        match result {
            Ok(bytes) => results[index] = Some(bytes),
            Err(e) => {
                if let Some(ref callback) = progress_callback {
                    callback(ProgressEvent::Error {
                        index: Some(index),
                        error: e.to_string(),
                    });
                }
                return Err(e);
            }
        }
    }
    drop(fetches);

    results
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| {
                GrabError::Internal(format!("no download result recorded for track {}", index))
            })
        })
        .collect()
}

/// Download a single track with retry logic and exponential backoff
async fn download_with_retry(
    client: &Client,
    config: &GrabConfig,
    metrics: &GrabMetrics,
    index: usize,
    slot: usize,
    url: &str,
    progress_callback: Option<ProgressCallback>,
) -> Result<Vec<u8>> {
    metrics.record_download_started();

    let mut last_error = None;
    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            metrics.record_retry();

            if let Some(ref callback) = progress_callback {
                callback(ProgressEvent::RetryAttempt {
                    index,
                    attempt,
                    max_attempts: config.max_retries,
                });
            }

            tokio::time::sleep(config.get_retry_delay(attempt - 1)).await;
        }

        match fetch_track(client, config, index, slot, url, progress_callback.clone()).await {
            Ok(bytes) => {
                metrics.record_download_completed(bytes.len() as u64);
                return Ok(bytes);
            }
            Err(e) => {
                if !e.is_recoverable() {
                    debug!(
                        "Track {} error is not recoverable, failing immediately: {}",
                        index + 1,
                        e
                    );
                    metrics.record_download_failed();
                    return Err(e);
                }
                warn!("Track {} attempt {} failed: {}", index + 1, attempt + 1, e);
                last_error = Some(e);
            }
        }
    }

    metrics.record_download_failed();
    Err(GrabError::MaxRetriesExceeded {
        track: index + 1,
        max_retries: config.max_retries,
        last_error: last_error
            .map_or_else(|| "no error recorded".to_string(), |e| e.to_string()),
    })
}

/// Fetch a single track URL into memory, streaming with progress
async fn fetch_track(
    client: &Client,
    config: &GrabConfig,
    index: usize,
    slot: usize,
    url: &str,
    progress_callback: Option<ProgressCallback>,
) -> Result<Vec<u8>> {
    url::Url::parse(url).map_err(|e| GrabError::InvalidUrl {
        url: url.to_string(),
        source: e,
    })?;

    // The host CDN expects the same headers the in-page player sends.
    let mut request = client.get(url).header("Range", "bytes=0-");
    if let Some(ref referer) = config.referer {
        request = request.header("Referer", referer.as_str());
    }

    let response = request.send().await.map_err(|e| GrabError::HttpRequest {
        url: url.to_string(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() && status != reqwest::StatusCode::PARTIAL_CONTENT {
        return Err(GrabError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let total_size = response.content_length();
    if let Some(ref callback) = progress_callback {
        callback(ProgressEvent::DownloadStarted {
            index,
            slot,
            url: url.to_string(),
            total_size,
        });
    }

    let mut stream = response.bytes_stream();
    let mut body: Vec<u8> = Vec::new();
    let start_time = std::time::Instant::now();
    let mut last_progress_time = start_time;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| GrabError::HttpRequest {
            url: url.to_string(),
            source: e,
        })?;
        body.extend_from_slice(&chunk);

        // Report progress at most every 100ms to avoid spam
        let now = std::time::Instant::now();
        if now.duration_since(last_progress_time).as_millis() >= 100 {
            if let Some(ref callback) = progress_callback {
                let elapsed = start_time.elapsed().as_secs_f64();
                let speed = if elapsed > 0.0 {
                    body.len() as f64 / elapsed
                } else {
                    0.0
                };

                callback(ProgressEvent::DownloadProgress {
                    index,
                    slot,
                    downloaded: body.len() as u64,
                    total: total_size,
                    speed_bps: speed,
                });
            }
            last_progress_time = now;
        }
    }

    debug!("Track {} downloaded: {} bytes", index + 1, body.len());
    Ok(body)
}
