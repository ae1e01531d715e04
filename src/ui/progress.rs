use colored::Colorize;
use console::Term;
use std::io::Write;
use std::time::Duration;

/// Default number of bar character slots (not including the pipes)
pub const DEFAULT_BAR_WIDTH: usize = 30;

const FILLED_BLOCK: &str = "█";
const EMPTY_BLOCK: &str = "░";

/// One progress notification, emitted before a pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent<'a> {
    pub label: &'a str,
    /// 1-based index of the pass about to run
    pub index: usize,
    pub total: usize,
    pub elapsed: Duration,
    pub remaining: Duration,
}

pub trait ProgressReporter {
    fn on_progress(&mut self, event: &ProgressEvent<'_>);
}

/// Single-line progress bar redrawn in place with `\r`.
pub struct TerminalReporter<W: Write = Term> {
    out: W,
    width: usize,
    color: bool,
}

impl TerminalReporter<Term> {
    /// Reporter on stdout; colours only when stdout is a terminal.
    pub fn stdout(width: usize) -> Self {
        let term = Term::stdout();
        let color = cfg!(feature = "color-output") && term.is_term();
        Self::new(term, width, color)
    }
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W, width: usize, color: bool) -> Self {
        Self {
            out,
            width: width.max(1),
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressReporter for TerminalReporter<W> {
    fn on_progress(&mut self, event: &ProgressEvent<'_>) {
        let line = if self.color {
            // clear the whole line first; labels differ in length
            format!("\x1b[2K\r{}", render_colored(event, self.width))
        } else {
            format!("\r{}", render_line(event, self.width))
        };

        self.out.write_all(line.as_bytes()).ok();
        if event.index >= event.total {
            self.out.write_all(b"\n").ok();
        }
        self.out.flush().ok();
    }
}

/// Number of filled slots for `index/total` on a bar of `width` slots.
pub(crate) fn filled_slots(index: usize, total: usize, width: usize) -> usize {
    if total == 0 {
        return 0;
    }
    (width * index.min(total)) / total
}

pub(crate) fn render_bar(index: usize, total: usize, width: usize) -> String {
    let filled = filled_slots(index, total, width);
    FILLED_BLOCK.repeat(filled) + &EMPTY_BLOCK.repeat(width - filled)
}

/// Plain rendering: `label |████░░░| i/N ⏱ HH:MM:SS ↗ HH:MM:SS`
pub fn render_line(event: &ProgressEvent<'_>, width: usize) -> String {
    format!(
        "{} |{}| {}/{} ⏱ {} ↗ {}",
        event.label,
        render_bar(event.index, event.total, width),
        event.index,
        event.total,
        format_hms(event.elapsed),
        format_hms(event.remaining)
    )
}

fn render_colored(event: &ProgressEvent<'_>, width: usize) -> String {
    let filled = filled_slots(event.index, event.total, width);
    format!(
        "{} |{}{}| {}/{} ⏱ {} ↗ {}",
        event.label.bold(),
        FILLED_BLOCK.repeat(filled).green().bold(),
        EMPTY_BLOCK.repeat(width - filled).bright_black(),
        event.index,
        event.total,
        format_hms(event.elapsed).cyan(),
        format_hms(event.remaining).cyan()
    )
}

/// Format a duration as HH:MM:SS, truncated to whole seconds
pub fn format_hms(d: Duration) -> String {
    let secs = d.as_secs();
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}
