// Pass runner - drives a pass plan to completion with live progress/ETA
//
// One run: validate the plan, fix the start time, then for each pass report
// progress, execute the action, wait the plan's delay. Individual pass failures
// are logged and counted, never propagated. Only an operator interrupt or a
// setup fault ends a run early.

pub mod eta;
pub mod pass;

pub use pass::{FillSource, OverwriteSpec, PassAction, PassDescriptor, PassPlan};

use crate::exec::{CommandExecutor, ShellCommand};
use crate::scratch::ScratchFile;
use crate::ui::progress::{ProgressEvent, ProgressReporter};
use crate::{CleanerResult, Interrupt};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How often the inter-pass delay checks for an interrupt.
const INTERRUPT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Time source for a run. Swapped for a manual clock in tests.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running(usize),
    Completed,
    Cancelled,
    Failed,
}

/// Per-run bookkeeping. Created when a run starts, dropped when it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    start: Instant,
    pass_index: usize,
    total_passes: usize,
}

impl RunState {
    fn begin(start: Instant, total_passes: usize) -> Self {
        Self {
            start,
            pass_index: 0,
            total_passes,
        }
    }

    pub fn pass_index(&self) -> usize {
        self.pass_index
    }

    pub fn total_passes(&self) -> usize {
        self.total_passes
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start)
    }

    fn advance(&mut self) {
        debug_assert!(self.pass_index < self.total_passes);
        self.pass_index = (self.pass_index + 1).min(self.total_passes);
    }

    fn summary(&self, now: Instant, failed_passes: usize) -> RunSummary {
        RunSummary {
            total_duration: self.elapsed(now),
            passes_run: self.pass_index,
            total_passes: self.total_passes,
            failed_passes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total_duration: Duration,
    pub passes_run: usize,
    pub total_passes: usize,
    pub failed_passes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RunSummary),
    Cancelled(RunSummary),
}

impl RunOutcome {
    pub fn summary(&self) -> &RunSummary {
        match self {
            RunOutcome::Completed(s) | RunOutcome::Cancelled(s) => s,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    pub fn phase(&self) -> RunPhase {
        match self {
            RunOutcome::Completed(_) => RunPhase::Completed,
            RunOutcome::Cancelled(_) => RunPhase::Cancelled,
        }
    }
}

pub struct PassRunner<'a> {
    executor: &'a dyn CommandExecutor,
    clock: &'a dyn Clock,
    interrupt: Interrupt,
    scratch_dir: PathBuf,
}

impl<'a> PassRunner<'a> {
    pub fn new(
        executor: &'a dyn CommandExecutor,
        clock: &'a dyn Clock,
        interrupt: Interrupt,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executor,
            clock,
            interrupt,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Execute every pass of `plan` in order, reporting before each one.
    ///
    /// Returns a configuration error without touching anything if the plan is
    /// empty or has zero-sized passes. Otherwise the run ends as
    /// [`RunOutcome::Completed`] or, on interrupt, [`RunOutcome::Cancelled`].
    pub fn run(
        &self,
        plan: &PassPlan,
        reporter: &mut dyn ProgressReporter,
    ) -> CleanerResult<RunOutcome> {
        plan.validate()?;

        let total = plan.len();
        let mut state = RunState::begin(self.clock.now(), total);
        let mut failed_passes = 0;
        let mut phase = RunPhase::Idle;
        transition(&mut phase, RunPhase::Running(0));

        tracing::info!(plan = %plan.name(), passes = total, delay = ?plan.delay(), "Starting run");

        for pass in plan.passes() {
            if self.interrupt.is_set() {
                return Ok(self.cancel(&mut phase, &state, failed_passes));
            }

            let index = state.pass_index + 1;
            let elapsed = state.elapsed(self.clock.now());
            reporter.on_progress(&ProgressEvent {
                label: pass.label(),
                index,
                total,
                elapsed,
                remaining: eta::estimate_remaining(elapsed, index, total),
            });

            let succeeded = match self.execute(plan, pass) {
                Ok(succeeded) => succeeded,
                Err(e) => {
                    transition(&mut phase, RunPhase::Failed);
                    tracing::error!(plan = %plan.name(), pass = index, error = %e, "Run failed");
                    return Err(e);
                }
            };
            if !succeeded {
                failed_passes += 1;
                tracing::warn!(
                    plan = %plan.name(),
                    pass = index,
                    label = %pass.label(),
                    "Pass action failed, continuing"
                );
            }

            state.advance();
            transition(&mut phase, RunPhase::Running(state.pass_index));

            if !self.pause(plan.delay()) {
                return Ok(self.cancel(&mut phase, &state, failed_passes));
            }
        }

        transition(&mut phase, RunPhase::Completed);
        let summary = state.summary(self.clock.now(), failed_passes);
        tracing::info!(
            plan = %plan.name(),
            failed = summary.failed_passes,
            duration = %humantime::format_duration(whole_seconds(summary.total_duration)),
            "Run completed"
        );

        Ok(RunOutcome::Completed(summary))
    }

    fn execute(&self, plan: &PassPlan, pass: &PassDescriptor) -> CleanerResult<bool> {
        match pass.action() {
            PassAction::Shell(commands) => Ok(self.run_all(commands)),
            PassAction::Overwrite(spec) => {
                let scratch = ScratchFile::acquire(&self.scratch_dir, plan.scratch_name())?;
                Ok(self.run_all(&spec.commands(scratch.path())))
            }
        }
    }

    // Every command runs even after an earlier one failed.
    fn run_all(&self, commands: &[ShellCommand]) -> bool {
        commands
            .iter()
            .fold(true, |ok, command| self.executor.execute(command) && ok)
    }

    /// Wait out the inter-pass delay. False if an interrupt arrived.
    fn pause(&self, delay: Duration) -> bool {
        let mut left = delay;
        while !left.is_zero() {
            if self.interrupt.is_set() {
                return false;
            }
            let step = left.min(INTERRUPT_POLL_INTERVAL);
            self.clock.sleep(step);
            left -= step;
        }
        !self.interrupt.is_set()
    }

    fn cancel(&self, phase: &mut RunPhase, state: &RunState, failed_passes: usize) -> RunOutcome {
        transition(phase, RunPhase::Cancelled);
        let summary = state.summary(self.clock.now(), failed_passes);
        tracing::warn!(
            passes_run = summary.passes_run,
            total = summary.total_passes,
            "Run cancelled by operator"
        );
        RunOutcome::Cancelled(summary)
    }
}

fn transition(phase: &mut RunPhase, next: RunPhase) {
    tracing::trace!(from = ?*phase, to = ?next, "Run phase");
    *phase = next;
}

fn whole_seconds(d: Duration) -> Duration {
    Duration::from_secs(d.as_secs())
}
