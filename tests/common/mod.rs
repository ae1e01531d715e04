/// Shared doubles for integration tests
///
/// - `ManualClock`: virtual time, `sleep` advances instead of blocking
/// - `RecordingExecutor`: records commands, simulates `dd of=` writes
/// - `RecordingReporter`: captures progress events, can fire an interrupt
pub mod doubles;
