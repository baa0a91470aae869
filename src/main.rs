use std::io;
use std::process;

use anyhow::Result;
use clap::Parser;

use termsaver::cli::{self, Cli};
use termsaver::config::Settings;
use termsaver::error::exit_code_for;
use termsaver::screen::lifecycle::Lifecycle;
use termsaver::screen::{registry, Interrupt, SleepPacer};
use termsaver::terminal::TerminalGuard;
use termsaver::ui;

fn main() {
    #[cfg(windows)]
    let _ = colored::control::set_virtual_terminal(true);

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match cli::option_error(&err) {
            Some(option_err) => {
                let code = option_err.exit_code();
                ui::report_error(&option_err.into(), false);
                process::exit(code);
            }
            None => err.exit(),
        },
    };

    init_logging(cli.verbose);

    let verbose = cli.verbose;
    if let Err(err) = run(cli) {
        ui::report_error(&err, verbose);
        process::exit(exit_code_for(&err));
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("TERMSAVER_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("termsaver={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(cli.config.as_deref())?;

    let command = registry::select(cli.screen, cli.random, &settings, &mut rand::thread_rng())?;
    let Some(command) = command else {
        ui::print_usage();
        return Ok(());
    };

    let mut screen = registry::build(command, &settings)?;

    let interrupt = Interrupt::new();
    interrupt.install()?;
    let pacer = SleepPacer::new(interrupt);

    let _guard = TerminalGuard::acquire()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    Lifecycle::new(&pacer).run(screen.as_mut(), &mut out)?;
    Ok(())
}
