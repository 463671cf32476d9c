mod terminal;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use luapad_core::{CompletionStatus, PlaygroundConfig, Shell, help, samples};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const INTERRUPT_HINT: &str = "\n^C stopping; press Enter if waiting at the prompt, Ctrl-C again to quit";

#[derive(Parser)]
#[command(name = "luapad", version, about = "Lua playground in the terminal")]
struct Cli {
    /// YAML config file (defaults to $LUAPAD_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Lua file (or the sample program); stdin lines answer io_read()
    ///
    /// Ctrl-C stops a running script. At the `> ` prompt the stop takes effect once Enter is
    /// pressed; a second Ctrl-C quits immediately.
    Run {
        file: Option<PathBuf>,
    },
    /// Save a Lua file (or the sample program) as a .lua file
    Export {
        file: Option<PathBuf>,
        /// Target file or directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Print the sample program
    Sample,
    /// Print the playground guide
    Guide,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PlaygroundConfig::resolve(cli.config.as_deref()).context("loading config")?;

    match cli.command {
        Commands::Run { file } => {
            let mut shell = Shell::new(config);
            if let Some(path) = &file {
                shell
                    .import_file(path)
                    .with_context(|| format!("importing {}", path.display()))?;
            }

            // First Ctrl-C stops the script; a second one (e.g. while blocked on stdin) exits.
            let cancel = shell.cancel_handle();
            tokio::spawn(async move {
                let mut presses = 0u32;
                while tokio::signal::ctrl_c().await.is_ok() {
                    presses += 1;
                    cancel.cancel();
                    if presses > 1 {
                        std::process::exit(130);
                    }
                    eprintln!("{}", INTERRUPT_HINT);
                }
            });

            let shell = tokio::task::spawn_blocking(move || -> Result<Shell> {
                let stdin = std::io::stdin();
                let mut stdout = std::io::stdout();
                terminal::run_program(&mut shell, stdin.lock(), &mut stdout)?;
                Ok(shell)
            })
            .await
            .context("script runner panicked")??;

            let failed = shell
                .console()
                .last_completion()
                .is_some_and(|c| c.status == CompletionStatus::Error);
            Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
        Commands::Export { file, out } => {
            let mut shell = Shell::new(config);
            if let Some(path) = &file {
                shell
                    .import_file(path)
                    .with_context(|| format!("importing {}", path.display()))?;
            }
            let written = shell.export_to(&out)?;
            println!("{}", written.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Sample => {
            println!("{}", samples::GUESSING_GAME);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Guide => {
            print!("{}", help::GUIDE);
            Ok(ExitCode::SUCCESS)
        }
    }
}
