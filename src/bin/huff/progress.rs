//! Progress display for reading input files and human readable sizes for the report.
//!
//! The bar itself is drawn by the `indicatif` crate, see <https://docs.rs/indicatif>

use std::io::Read;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

/// Wraps a reader and advances a progress bar by every byte read from it.
///
/// The bar is cleared once `total` bytes went through.
pub struct ProgressMonitor<R: Read> {
    reader: R,
    total: u64,
    read: u64,
    progress_bar: ProgressBar,
}

impl<R: Read> ProgressMonitor<R> {
    pub fn new(reader: R, total: u64) -> Self {
        // https://docs.rs/indicatif/latest/indicatif/index.html#templates
        let style = ProgressStyle::with_template("{wide_bar} {binary_bytes}/{binary_total_bytes}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let progress_bar = ProgressBar::new(total).with_style(style);
        // Reading is quick for most inputs, so don't redraw more often than needed
        progress_bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(8));
        Self {
            reader,
            total,
            read: 0,
            progress_bar,
        }
    }

    fn update(&mut self, delta: u64) {
        self.read += delta;
        self.progress_bar.inc(delta);
        if self.read >= self.total && !self.progress_bar.is_finished() {
            self.progress_bar.finish_and_clear();
            debug!(
                "read {} in {}",
                fmt_size(self.read),
                fmt_duration(self.progress_bar.elapsed())
            );
        }
    }
}

impl<R: Read> Read for ProgressMonitor<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let out = self.reader.read(buf)?;
        self.update(out as u64);
        Ok(out)
    }
}

/// Converts a quantity in bytes to a human readable size, "KiB, MiB, GiB, etc"
pub fn fmt_size(size_in_bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut size = size_in_bytes as f64;
    let mut unit_index = 0;
    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }
    if unit_index == 0 {
        format!("{}B", size_in_bytes)
    } else {
        format!("{:.2}{}", size, UNITS[unit_index])
    }
}

/// `after` as a percentage of `before`
pub fn fmt_ratio(before: usize, after: usize) -> String {
    if before == 0 {
        return "-".to_owned();
    }
    format!("{:.2}%", after as f64 / before as f64 * 100.0)
}

fn fmt_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let whole_secs = duration.as_secs();
        format!("{}m {}s", whole_secs / 60, whole_secs % 60)
    }
}
