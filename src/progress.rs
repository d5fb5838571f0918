//! Byte-based progress display for the execution loop.

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% (rem: {eta_precise})";

/// Progress over one script file, driven by consumed statement bytes.
///
/// The byte counts from the splitter leave out line separators, so the bar
/// may stop short of 100% before `finish` is called.
pub struct FileProgress {
    bar: Option<ProgressBar>,
}

impl FileProgress {
    /// No bar is drawn when disabled or when the file size is unknown.
    pub fn new(enabled: bool, file: usize, file_count: usize, total_bytes: Option<u64>) -> Self {
        let Some(total_bytes) = total_bytes.filter(|_| enabled) else {
            return Self { bar: None };
        };

        let bar = ProgressBar::new(total_bytes);
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.set_prefix(format!("File {} / {}", file + 1, file_count));
        Self { bar: Some(bar) }
    }

    pub fn set_position(&self, bytes: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(bytes);
        }
    }

    /// Run `f` with the bar hidden so log lines do not tear it.
    pub fn suspend<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for FileProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_needs_a_known_size() {
        let test_cases = vec![
            (true, Some(100), true),
            (true, None, false),
            (false, Some(100), false),
            (false, None, false),
        ];

        for (enabled, size, drawn) in test_cases {
            let progress = FileProgress::new(enabled, 0, 1, size);
            assert_eq!(progress.bar.is_some(), drawn, "enabled: {enabled}, size: {size:?}");
        }
    }
}
