//! Terminal progress display

use grabber::ProgressReporter;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress bars for a grab run: one overall bar plus one row per
/// download slot, reused as earlier downloads finish.
pub struct TermReporter {
    _multi: MultiProgress,
    main: ProgressBar,
    slots: Vec<ProgressBar>,
}

impl TermReporter {
    pub fn new(slot_count: usize) -> Self {
        let multi = MultiProgress::new();

        let main = multi.add(ProgressBar::new(0));
        main.set_style(
            ProgressStyle::default_bar()
                .template("{msg:<26} [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap()
                .progress_chars("█▓░"),
        );

        let slot_style = ProgressStyle::default_bar()
            .template("  {msg:<24} [{bar:40.green/blue}] {bytes}/{total_bytes}")
            .unwrap()
            .progress_chars("█▓░");
        let slots = (0..slot_count)
            .map(|_| {
                let bar = multi.add(ProgressBar::new(0));
                bar.set_style(slot_style.clone());
                bar
            })
            .collect();

        Self {
            _multi: multi,
            main,
            slots,
        }
    }
}

impl ProgressReporter for TermReporter {
    fn on_reveal_started(&self, total: usize) {
        self.main.set_length(total as u64);
        self.main.set_position(0);
        self.main.set_message("revealing track URLs");
    }

    fn on_reveal_progress(&self, current: usize, _total: usize) {
        self.main.set_position(current as u64);
    }

    fn on_download_started(&self, index: usize, slot: usize, _url: &str, total_size: Option<u64>) {
        if let Some(bar) = self.slots.get(slot) {
            bar.reset();
            bar.set_length(total_size.unwrap_or(0));
            bar.set_message(format!("track {}", index + 1));
        }
    }

    fn on_download_progress(
        &self,
        _index: usize,
        slot: usize,
        downloaded: u64,
        total: Option<u64>,
        _speed_bps: f64,
    ) {
        if let Some(bar) = self.slots.get(slot) {
            if let Some(total) = total {
                bar.set_length(total);
            }
            bar.set_position(downloaded);
        }
    }

    fn on_download_complete(&self, _index: usize, slot: usize, completed: usize, total: usize) {
        if let Some(bar) = self.slots.get(slot) {
            bar.set_position(bar.length().unwrap_or(0));
            bar.set_message(String::new());
        }
        self.main.set_length(total as u64);
        self.main.set_position(completed as u64);
        self.main.set_message("downloading");
    }

    fn on_retry_attempt(&self, index: usize, attempt: usize, max_attempts: usize) {
        self.main.println(format!(
            "retry {}/{} for track {}",
            attempt,
            max_attempts,
            index + 1
        ));
    }

    fn on_archive_started(&self, entries: usize) {
        self.main.set_message(format!("archiving {} tracks", entries));
    }

    fn on_archive_complete(&self, bytes: u64) {
        for bar in &self.slots {
            bar.finish_and_clear();
        }
        self.main
            .finish_with_message(format!("archive ready ({} bytes)", bytes));
    }

    fn on_error(&self, index: Option<usize>, error: &str) {
        match index {
            Some(index) => self
                .main
                .println(format!("error on track {}: {}", index + 1, error)),
            None => self.main.println(format!("error: {}", error)),
        }
    }
}
