use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use textcheck::checker::strategy::{self, CheckOutcome};
use textcheck::cli::output::{display_for, Display, OutputFormat};
use textcheck::clipboard::{self, Clipboard};
use textcheck::config::Strategy;
use textcheck::{CheckError, Config, TextStatistics};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "textcheck")]
#[command(version, about = "Count characters and check spelling", long_about = None)]
struct Cli {
    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text", global = true)]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (overrides .textcheck.toml and the global config)
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count characters, words, sentences and lines
    Stats {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Check spelling with the remote spell checker
    Check {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// How to check: call the service (api) or open a checker website (redirect)
        #[arg(short, long)]
        strategy: Option<Strategy>,

        /// Exit with code 0 even if errors are found
        #[arg(long)]
        no_fail: bool,
    },
    /// Copy text to the clipboard
    Copy {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "textcheck", &mut io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose, cli.quiet);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let colored = !cli.no_color;
    let display = display_for(cli.format, colored);
    debug!(format = %cli.format, colored, "CLI initialized");

    match command {
        Commands::Stats { file } => {
            let text = read_input(file.as_deref())?;
            display.show_statistics(&TextStatistics::compute(&text));
        }
        Commands::Check {
            file,
            strategy,
            no_fail,
        } => {
            let config = Config::load(cli.config.as_deref(), strategy)?;
            let text = read_input(file.as_deref())?;
            let found_errors = run_check(&config, &text, display.as_ref())?;
            if found_errors && !no_fail {
                std::process::exit(1);
            }
        }
        Commands::Copy { file } => {
            let text = read_input(file.as_deref())?;
            match clipboard::default_clipboard().copy(&text) {
                Ok(()) => display.show_copied(text.chars().count()),
                Err(e) => {
                    display.show_failure(&CheckError::Clipboard(e));
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Run the configured check strategy; returns whether anything needs attention
fn run_check(config: &Config, text: &str, display: &dyn Display) -> Result<bool> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        let outcome = match strategy::from_config(config) {
            Ok(strategy) => strategy.run(text, display, &cancel).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(CheckOutcome::Checked(result)) => {
                display.show_result(&result);
                Ok(result.total_error_count > 0)
            }
            Ok(CheckOutcome::Redirected { .. }) => Ok(false),
            Err(e) => {
                debug!(error = %e, "spell check failed");
                display.show_failure(&e);
                Ok(true)
            }
        }
    })
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
