use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Installs the stderr tracing subscriber (if one is not already active).
///
/// `RUST_LOG` wins when set. Otherwise the level is `debug` with `--debug` and
/// `warn` by default, so log lines stay out of the progress bar's way.
pub fn init_tracing(debug: bool) {
    if TRACING_INIT.get().is_some() {
        return;
    }

    let fallback = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .with_writer(std::io::stderr)
        .try_init();

    let _ = TRACING_INIT.set(());
}
