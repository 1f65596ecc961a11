//! Scan progress reporting.

use std::io::Write;
use std::time::{Duration, Instant};

use unicode_width::UnicodeWidthChar;

/// Width used when the terminal size cannot be determined.
pub const DEFAULT_WIDTH: u16 = 80;

/// Columns left free at the end of the status line.
pub const DEFAULT_MARGIN: u16 = 2;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Number of files sized so far.
    pub files_scanned: u64,
    /// Number of folders entered so far.
    pub folders_scanned: u64,
    /// Total bytes counted so far.
    pub bytes_scanned: u64,
    /// Remote path currently being visited.
    pub current_path: String,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            files_scanned: 0,
            folders_scanned: 0,
            bytes_scanned: 0,
            current_path: String::new(),
            elapsed: Duration::ZERO,
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver of progress events.
///
/// Reporting is purely observational: implementations must not fail the scan.
pub trait ProgressReporter {
    /// Called once per entry, before it is classified.
    fn report(&mut self, progress: &ScanProgress);

    /// Called once after the scan ends, successfully or not.
    fn finish(&mut self) {}
}

impl<R: ProgressReporter + ?Sized> ProgressReporter for &mut R {
    fn report(&mut self, progress: &ScanProgress) {
        (**self).report(progress);
    }

    fn finish(&mut self) {
        (**self).finish();
    }
}

/// Reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _progress: &ScanProgress) {}
}

/// Single, continuously overwritten terminal status line.
///
/// Each report rewrites the line as `Scanning: {path}`, padded or cut to the
/// terminal width minus a margin, without a trailing newline.
pub struct StatusLine<W: Write> {
    out: W,
    margin: u16,
    fixed_width: Option<u16>,
    dirty: bool,
}

impl<W: Write> StatusLine<W> {
    /// Status line sized to the live terminal width.
    pub fn new(out: W) -> Self {
        Self {
            out,
            margin: DEFAULT_MARGIN,
            fixed_width: None,
            dirty: false,
        }
    }

    /// Status line with a fixed width instead of the terminal's.
    pub fn with_width(out: W, width: u16) -> Self {
        Self {
            fixed_width: Some(width),
            ..Self::new(out)
        }
    }

    /// Set the number of columns kept free at the end of the line.
    pub fn margin(mut self, margin: u16) -> Self {
        self.margin = margin;
        self
    }

    /// Consume the reporter, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn width(&self) -> u16 {
        self.fixed_width
            .or_else(|| crossterm::terminal::size().ok().map(|(cols, _)| cols))
            .filter(|cols| *cols > 0)
            .unwrap_or(DEFAULT_WIDTH)
    }

    fn render(&self, current_path: &str) -> String {
        let columns = usize::from(self.width().saturating_sub(self.margin));
        fit_to_width(&format!("Scanning: {current_path}"), columns)
    }
}

impl<W: Write> ProgressReporter for StatusLine<W> {
    fn report(&mut self, progress: &ScanProgress) {
        let line = self.render(&progress.current_path);
        let written = write!(self.out, "\r{line}").and_then(|()| self.out.flush());
        if let Err(err) = written {
            tracing::trace!(error = %err, "status line write failed");
        }
        self.dirty = true;
    }

    fn finish(&mut self) {
        if !self.dirty {
            return;
        }
        let blank = " ".repeat(usize::from(self.width().saturating_sub(self.margin)));
        let written = write!(self.out, "\r{blank}\r").and_then(|()| self.out.flush());
        if let Err(err) = written {
            tracing::trace!(error = %err, "status line clear failed");
        }
        self.dirty = false;
    }
}

/// Pad with spaces or cut `text` so it spans exactly `columns` display cells.
pub fn fit_to_width(text: &str, columns: usize) -> String {
    let mut fitted = String::with_capacity(columns);
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > columns {
            break;
        }
        fitted.push(ch);
        used += w;
    }
    fitted.extend(std::iter::repeat_n(' ', columns - used));
    fitted
}

/// Internal progress tracker with timing.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    current: ScanProgress,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            current: ScanProgress::new(),
        }
    }

    pub fn record_file(&mut self, size: u64) {
        self.current.files_scanned += 1;
        self.current.bytes_scanned += size;
    }

    pub fn record_folder(&mut self) {
        self.current.folders_scanned += 1;
    }

    pub fn visit(&mut self, path: &str) -> &ScanProgress {
        self.current.current_path.clear();
        self.current.current_path.push_str(path);
        self.current.elapsed = self.start_time.elapsed();
        &self.current
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
