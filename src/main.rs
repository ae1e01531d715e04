use anyhow::Result;
use clap::Parser;
use disk_cleaner::disk::SystemSpaceProbe;
use disk_cleaner::report::RunReport;
use disk_cleaner::ui::menu;
use disk_cleaner::ui::progress::{format_hms, TerminalReporter};
use disk_cleaner::*;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_INVALID_SELECTION: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "disk-cleaner")]
#[command(about = "Menu-driven disk cleaning with multi-pass scratch overwrite and live progress")]
#[command(version)]
struct Cli {
    /// Method number (1-11) or name (e.g. "paranoid"); prompts when omitted
    method: Option<String>,

    /// Print the method menu and exit
    #[arg(long)]
    list: bool,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log the commands instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    telemetry::init_tracing(cli.debug);

    if !is_root() {
        println!("[!] For full functionality run with sudo!");
    }

    match run(&cli) {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<CleanerError>() {
            Some(CleanerError::InvalidSelection(_)) => {
                eprintln!("[!] {}", e);
                ExitCode::from(EXIT_INVALID_SELECTION)
            }
            Some(CleanerError::Interrupted) => {
                println!("\n\n[!] Stopped by user");
                ExitCode::from(EXIT_INTERRUPTED)
            }
            _ => {
                eprintln!("\n\n[!] Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = CleanerConfig::load(cli.config.as_deref())?;
    tracing::debug!(?config, "Configuration loaded");

    println!("{}", menu::BANNER);
    print!("{}", menu::render_menu());
    if cli.list {
        return Ok(ExitCode::SUCCESS);
    }

    let executor: Box<dyn CommandExecutor> = if cli.dry_run {
        Box::new(DryRunExecutor)
    } else {
        Box::new(SystemExecutor::new(config.show_command_output))
    };
    let probe = SystemSpaceProbe::new(&config.space_probe_path);
    let clock = SystemClock;

    let interrupt = Interrupt::new();
    setup_signal_handlers(&interrupt)?;

    let session = CleaningSession::new(&config, executor.as_ref(), &probe, &clock, interrupt);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let mut reporter = TerminalReporter::stdout(config.bar_width);

    let run = match session.run(cli.method.as_deref(), &mut input, &mut output, &mut reporter)? {
        SessionOutcome::Declined(_) => {
            println!("Operation cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
        SessionOutcome::Finished(run) => run,
    };

    if let Some(path) = &cli.report {
        RunReport::new(run.method, run.started_at, &run.outcome, run.scratch_size_mb)?
            .save(path)?;
    }

    match run.outcome {
        RunOutcome::Completed(summary) => {
            println!("\n[!] Cleaning completed!");
            println!("⏱️ Total time: {}", format_hms(summary.total_duration));
            if summary.failed_passes > 0 {
                println!(
                    "[!] {} of {} passes reported failures (best effort, continued)",
                    summary.failed_passes, summary.total_passes
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Cancelled(_) => Err(CleanerError::Interrupted.into()),
    }
}

fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

// Signal handler for graceful shutdown
//
// First Ctrl+C raises the interrupt flag so the current pass can finish and
// remove its scratch file; a second one exits immediately.
fn setup_signal_handlers(interrupt: &Interrupt) -> Result<()> {
    use signal_hook::consts::SIGINT;
    use signal_hook::flag;

    flag::register_conditional_shutdown(SIGINT, i32::from(EXIT_INTERRUPTED), interrupt.as_flag())?;
    flag::register(SIGINT, interrupt.as_flag())?;

    Ok(())
}
