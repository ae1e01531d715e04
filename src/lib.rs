pub mod disk;
pub mod exec;
pub mod methods;
pub mod report;
pub mod runner;
pub mod scratch;
pub mod session;
pub mod settings;
pub mod telemetry;
pub mod ui;

// Re-export the runner surface for convenience
pub use settings::CleanerConfig;
pub use exec::{CommandExecutor, DryRunExecutor, ShellCommand, SystemExecutor};
pub use methods::CleaningMethod;
pub use session::{CleaningSession, FinishedRun, SessionOutcome};
pub use runner::{
    Clock, PassAction, PassDescriptor, PassPlan, PassRunner, RunOutcome, RunPhase, RunSummary,
    SystemClock,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Operator interrupt flag shared between the SIGINT handler and the runner.
///
/// Cloning hands out another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the interrupt flag
    pub fn set(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check if an interrupt has been received
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Underlying flag, for `signal_hook::flag` registration.
    pub fn as_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cannot proceed: {0}")]
    Configuration(String),

    #[error("Cannot proceed: insufficient free space ({available_mb} MB available)")]
    InsufficientSpace { available_mb: u64 },

    #[error("Invalid choice: {0}")]
    InvalidSelection(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl CleanerError {
    /// True for errors raised before a run starts because the pass list can't be built.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CleanerError::Configuration(_) | CleanerError::InsufficientSpace { .. }
        )
    }
}

impl From<serde_json::Error> for CleanerError {
    fn from(err: serde_json::Error) -> Self {
        CleanerError::Report(err.to_string())
    }
}

pub type CleanerResult<T> = Result<T, CleanerError>;
