//! Progress tracking and reporting for grab runs

use std::sync::Arc;

/// Progress callback for pipeline operations
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Events emitted while a grab run advances
///
/// `slot` on the download events is a UI attribution index in
/// `0..max_concurrent`; slots are reused as earlier downloads finish.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    RevealStarted {
        total: usize,
    },
    RevealProgress {
        current: usize,
        total: usize,
    },
    DownloadStarted {
        index: usize,
        slot: usize,
        url: String,
        total_size: Option<u64>,
    },
    DownloadProgress {
        index: usize,
        slot: usize,
        downloaded: u64,
        total: Option<u64>,
        speed_bps: f64,
    },
    DownloadComplete {
        index: usize,
        slot: usize,
        completed: usize,
        total: usize,
    },
    RetryAttempt {
        index: usize,
        attempt: usize,
        max_attempts: usize,
    },
    ArchiveStarted {
        entries: usize,
    },
    ArchiveComplete {
        bytes: u64,
    },
    Error {
        index: Option<usize>,
        error: String,
    },
}

/// Trait for progress reporting with more granular control
pub trait ProgressReporter: Send + Sync {
    fn on_reveal_started(&self, _total: usize) {}
    fn on_reveal_progress(&self, _current: usize, _total: usize) {}
    fn on_download_started(&self, _index: usize, _slot: usize, _url: &str, _total_size: Option<u64>) {}
    fn on_download_progress(
        &self,
        _index: usize,
        _slot: usize,
        _downloaded: u64,
        _total: Option<u64>,
        _speed_bps: f64,
    ) {
    }
    fn on_download_complete(&self, _index: usize, _slot: usize, _completed: usize, _total: usize) {}
    fn on_retry_attempt(&self, _index: usize, _attempt: usize, _max_attempts: usize) {}
    fn on_archive_started(&self, _entries: usize) {}
    fn on_archive_complete(&self, _bytes: u64) {}
    fn on_error(&self, _index: Option<usize>, _error: &str) {}
}

/// Extension trait to convert ProgressReporter to ProgressCallback
pub trait IntoProgressCallback {
    fn into_callback(self) -> ProgressCallback;
}

impl<T: ProgressReporter + 'static> IntoProgressCallback for T {
    fn into_callback(self) -> ProgressCallback {
        Arc::new(move |event| match event {
            ProgressEvent::RevealStarted { total } => {
                self.on_reveal_started(total);
            }
            ProgressEvent::RevealProgress { current, total } => {
                self.on_reveal_progress(current, total);
            }
            ProgressEvent::DownloadStarted { index, slot, url, total_size } => {
                self.on_download_started(index, slot, &url, total_size);
            }
            ProgressEvent::DownloadProgress { index, slot, downloaded, total, speed_bps } => {
                self.on_download_progress(index, slot, downloaded, total, speed_bps);
            }
            ProgressEvent::DownloadComplete { index, slot, completed, total } => {
                self.on_download_complete(index, slot, completed, total);
            }
            ProgressEvent::RetryAttempt { index, attempt, max_attempts } => {
                self.on_retry_attempt(index, attempt, max_attempts);
            }
            ProgressEvent::ArchiveStarted { entries } => {
                self.on_archive_started(entries);
            }
            ProgressEvent::ArchiveComplete { bytes } => {
                self.on_archive_complete(bytes);
            }
            ProgressEvent::Error { index, error } => {
                self.on_error(index, &error);
            }
        })
    }
}

/// Simple console progress reporter implementation
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter {
    pub verbose: bool,
}

impl ConsoleProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn on_reveal_started(&self, total: usize) {
        println!("Revealing {} track URLs...", total);
    }

    fn on_reveal_progress(&self, current: usize, total: usize) {
        if self.verbose {
            println!("Revealed track {}/{}", current, total);
        }
    }

    fn on_download_started(&self, index: usize, _slot: usize, url: &str, total_size: Option<u64>) {
        if self.verbose {
            match total_size {
                Some(size) => println!("Downloading track {}: {} ({} bytes)", index + 1, url, size),
                None => println!("Downloading track {}: {}", index + 1, url),
            }
        }
    }

    fn on_download_progress(
        &self,
        index: usize,
        _slot: usize,
        downloaded: u64,
        total: Option<u64>,
        speed_bps: f64,
    ) {
        if self.verbose {
            let speed_mb = speed_bps / 1_000_000.0;
            match total {
                Some(total) => {
                    let percent = (downloaded as f64 / total as f64) * 100.0;
                    println!(
                        "Track {}: {:.1}% ({}/{} bytes, {:.1} MB/s)",
                        index + 1,
                        percent,
                        downloaded,
                        total,
                        speed_mb
                    );
                }
                None => {
                    println!(
                        "Track {}: {} bytes downloaded ({:.1} MB/s)",
                        index + 1,
                        downloaded,
                        speed_mb
                    );
                }
            }
        }
    }

    fn on_download_complete(&self, _index: usize, _slot: usize, completed: usize, total: usize) {
        println!("Downloaded track {}/{}", completed, total);
    }

    fn on_retry_attempt(&self, index: usize, attempt: usize, max_attempts: usize) {
        println!("Retry {}/{} for track {}", attempt, max_attempts, index + 1);
    }

    fn on_archive_started(&self, entries: usize) {
        println!("Creating archive with {} entries...", entries);
    }

    fn on_archive_complete(&self, bytes: u64) {
        println!("Archive complete: {} bytes", bytes);
    }

    fn on_error(&self, index: Option<usize>, error: &str) {
        match index {
            Some(index) => eprintln!("Error on track {}: {}", index + 1, error),
            None => eprintln!("Error: {}", error),
        }
    }
}

/// Null progress reporter that does nothing
#[derive(Debug, Default)]
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {}
