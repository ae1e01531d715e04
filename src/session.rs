// One interactive cleaning session
//
// Selection, free-space check, plan building, the confirmation gate and the
// run itself. The binary supplies the terminal and the real capabilities;
// tests supply buffers, a fixed probe and a mock executor.

use crate::disk::SpaceProbe;
use crate::methods::CleaningMethod;
use crate::runner::{Clock, PassRunner, RunOutcome};
use crate::settings::CleanerConfig;
use crate::ui::progress::ProgressReporter;
use crate::ui::prompt;
use crate::{CleanerError, CleanerResult, CommandExecutor, Interrupt};
use chrono::{DateTime, Utc};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The operator did not confirm; no pass ran and no run state was created.
    Declined(CleaningMethod),
    Finished(FinishedRun),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedRun {
    pub method: CleaningMethod,
    pub started_at: DateTime<Utc>,
    pub outcome: RunOutcome,
    pub scratch_size_mb: Option<u64>,
}

pub struct CleaningSession<'a> {
    config: &'a CleanerConfig,
    executor: &'a dyn CommandExecutor,
    probe: &'a dyn SpaceProbe,
    clock: &'a dyn Clock,
    interrupt: Interrupt,
}

impl<'a> CleaningSession<'a> {
    pub fn new(
        config: &'a CleanerConfig,
        executor: &'a dyn CommandExecutor,
        probe: &'a dyn SpaceProbe,
        clock: &'a dyn Clock,
        interrupt: Interrupt,
    ) -> Self {
        Self {
            config,
            executor,
            probe,
            clock,
            interrupt,
        }
    }

    /// Take one selection through to a finished or cancelled run.
    ///
    /// `selection` skips the menu prompt. The plan is built before the operator
    /// is asked anything, so configuration errors never follow a "yes".
    pub fn run<R: BufRead, W: Write>(
        &self,
        selection: Option<&str>,
        input: &mut R,
        output: &mut W,
        reporter: &mut dyn ProgressReporter,
    ) -> CleanerResult<SessionOutcome> {
        let token = match selection {
            Some(token) => token.to_string(),
            None => prompt::read_selection(input, output)?,
        };
        self.check_interrupt()?;
        let method = CleaningMethod::from_selection(&token)?;

        let free_mb = self.probe.free_mb();
        let mut plan = method.build_plan(free_mb, self.config.max_scratch_mb)?;
        plan.scale_delay(self.config.delay_scale);

        let mut scratch_size_mb = None;
        if plan.is_destructive() {
            writeln!(output, "Free space: {} MB", free_mb)?;
            let confirmed = prompt::confirm_destructive(input, output)?;
            self.check_interrupt()?;
            if !confirmed {
                tracing::info!(method = %method.slug(), "Confirmation declined");
                return Ok(SessionOutcome::Declined(method));
            }
            scratch_size_mb = Some(method.scratch_size_mb(free_mb, self.config.max_scratch_mb)?);
        }
        writeln!(output, " {}", method.heading())?;
        output.flush()?;

        let runner = PassRunner::new(
            self.executor,
            self.clock,
            self.interrupt.clone(),
            &self.config.scratch_dir,
        );
        let started_at = Utc::now();
        let outcome = runner.run(&plan, reporter)?;

        Ok(SessionOutcome::Finished(FinishedRun {
            method,
            started_at,
            outcome,
            scratch_size_mb,
        }))
    }

    fn check_interrupt(&self) -> CleanerResult<()> {
        if self.interrupt.is_set() {
            return Err(CleanerError::Interrupted);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
