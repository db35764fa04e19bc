//! Hole pixel progress for one or more images being filled

use crate::io::configuration::{MAX_VISIBLE_FILE_BARS, PROGRESS_BAR_WIDTH};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::debug;
use std::path::Path;
use std::time::Duration;

/// Fill progress of a single image
#[derive(Debug, Clone, PartialEq, Eq)]
struct FileProgress {
    name: String,
    filled: usize,
    holes: usize,
    finished: Option<Duration>,
}

impl FileProgress {
    fn label(&self) -> String {
        match self.finished {
            Some(elapsed) => format!("✓ {} ({:.1}s)", self.name, elapsed.as_secs_f64()),
            None => self.name.clone(),
        }
    }
}

/// Shows filled hole pixels per image, plus a running pixel total when
/// several images are processed
///
/// Only the most recently started images keep a bar of their own.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    total_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    files: Vec<Option<FileProgress>>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

fn pixel_style() -> ProgressStyle {
    let template = format!("{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{msg}}");
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
}

fn total_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Pixels: {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

impl ProgressManager {
    /// Create a manager with no bars
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            total_bar: None,
            file_bars: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Create the bars for `file_count` images
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > 1 {
            let total = ProgressBar::new(0);
            total.set_style(total_style());
            self.total_bar = Some(self.multi_progress.add(total));
        }
        for _ in 0..file_count.min(MAX_VISIBLE_FILE_BARS) {
            let bar = ProgressBar::new(0);
            bar.set_style(pixel_style());
            self.file_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Start tracking image `index` with `hole_pixels` left to fill
    pub fn start_file(&mut self, index: usize, path: &Path, hole_pixels: usize) {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.files.len() {
            self.files.resize(index + 1, None);
        }
        if let Some(slot) = self.files.get_mut(index) {
            *slot = Some(FileProgress {
                name,
                filled: 0,
                holes: hole_pixels,
                finished: None,
            });
        }
        if let Some(ref total) = self.total_bar {
            total.inc_length(hole_pixels as u64);
        }
        self.redraw();
    }

    /// Report how many hole pixels of image `index` are filled so far
    pub fn update_filled(&mut self, index: usize, filled_pixels: usize) {
        let Some(Some(file)) = self.files.get_mut(index) else {
            return;
        };
        file.filled = filled_pixels.min(file.holes);
        if let Some(ref total) = self.total_bar {
            total.set_position(self.total_progress().0 as u64);
        }
        self.redraw();
    }

    /// Mark image `index` as done
    ///
    /// Images stopped by the iteration cap keep their last filled count.
    pub fn complete_file(&mut self, index: usize, elapsed: Duration) {
        if let Some(Some(file)) = self.files.get_mut(index) {
            file.finished = Some(elapsed);
        }
        self.redraw();
    }

    /// Filled and total hole pixels recorded for image `index`
    pub fn file_progress(&self, index: usize) -> Option<(usize, usize)> {
        self.files
            .get(index)
            .and_then(Option::as_ref)
            .map(|file| (file.filled, file.holes))
    }

    /// Filled and total hole pixels across all started images
    pub fn total_progress(&self) -> (usize, usize) {
        self.files
            .iter()
            .flatten()
            .fold((0, 0), |(filled, holes), file| (filled + file.filled, holes + file.holes))
    }

    /// Remove every bar from the terminal
    pub fn finish(&self) {
        if let Some(ref total) = self.total_bar {
            total.finish();
        }
        if let Err(err) = self.multi_progress.clear() {
            debug!("Could not clear progress bars: {err}");
        }
    }

    fn redraw(&self) {
        let started: Vec<&FileProgress> = self.files.iter().flatten().collect();
        let visible = started
            .get(started.len().saturating_sub(self.file_bars.len())..)
            .unwrap_or(&[]);

        for (position, bar) in self.file_bars.iter().enumerate() {
            match visible.get(position) {
                Some(file) => {
                    let width = file.holes.to_string().len();
                    bar.set_length(file.holes as u64);
                    bar.set_position(file.filled as u64);
                    bar.set_prefix(file.label());
                    bar.set_message(format!("{:>width$}/{} px", file.filled, file.holes));
                }
                None => {
                    bar.set_length(0);
                    bar.set_position(0);
                    bar.set_prefix(String::new());
                    bar.set_message(String::new());
                }
            }
        }
    }
}
