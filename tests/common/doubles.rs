use disk_cleaner::runner::Clock;
use disk_cleaner::ui::progress::{ProgressEvent, ProgressReporter};
use disk_cleaner::{CommandExecutor, Interrupt, ShellCommand};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub struct ManualClock {
    base: Instant,
    offset: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, d: Duration) {
        self.offset.set(self.offset.get() + d);
    }

    #[allow(dead_code)]
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Executor double: every command costs `cost` of virtual time.
pub struct RecordingExecutor<'a> {
    clock: &'a ManualClock,
    cost: Duration,
    fail_if_contains: Option<String>,
    pub calls: RefCell<Vec<String>>,
    /// Scratch targets seen while a pass was running.
    pub targets: RefCell<Vec<PathBuf>>,
}

impl<'a> RecordingExecutor<'a> {
    pub fn new(clock: &'a ManualClock, cost: Duration) -> Self {
        Self {
            clock,
            cost,
            fail_if_contains: None,
            calls: RefCell::new(Vec::new()),
            targets: RefCell::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_if_contains = Some(needle.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl CommandExecutor for RecordingExecutor<'_> {
    fn execute(&self, command: &ShellCommand) -> bool {
        let line = command.to_string();
        self.clock.advance(self.cost);

        if command.program() == "dd" {
            let target = command
                .args()
                .iter()
                .find_map(|a| a.strip_prefix("of="))
                .map(PathBuf::from);
            if let Some(target) = target {
                let _ = std::fs::write(&target, b"scratch");
                self.targets.borrow_mut().push(target);
            }
        }

        let ok = match &self.fail_if_contains {
            Some(needle) => !line.contains(needle.as_str()),
            None => true,
        };
        self.calls.borrow_mut().push(line);
        ok
    }
}

/// (label, index, total, elapsed, remaining)
pub type RecordedEvent = (String, usize, usize, Duration, Duration);

#[derive(Default)]
pub struct RecordingReporter {
    pub events: Vec<RecordedEvent>,
    interrupt_at: Option<(usize, Interrupt)>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise `interrupt` once the event for pass `index` has been reported.
    #[allow(dead_code)]
    pub fn interrupt_after(index: usize, interrupt: Interrupt) -> Self {
        Self {
            events: Vec::new(),
            interrupt_at: Some((index, interrupt)),
        }
    }

    #[allow(dead_code)]
    pub fn indices(&self) -> Vec<usize> {
        self.events.iter().map(|e| e.1).collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn on_progress(&mut self, event: &ProgressEvent<'_>) {
        self.events.push((
            event.label.to_string(),
            event.index,
            event.total,
            event.elapsed,
            event.remaining,
        ));
        if let Some((at, interrupt)) = &self.interrupt_at {
            if event.index == *at {
                interrupt.set();
            }
        }
    }
}
