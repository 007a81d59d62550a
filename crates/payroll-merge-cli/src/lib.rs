mod config;
mod console;
mod exit_codes;
mod show;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{CommandFactory as _, Parser, Subcommand};
use payroll_merge::{Diagnostics, PayrollError, Phase};

use crate::config::Config;
use crate::console::Console;
use crate::show::Palette;

#[derive(Parser)]
#[command(
    name = "payroll-merge",
    about = "Merge payroll exports into the retirement provider's upload workbook"
)]
#[command(disable_help_subcommand = true)]
struct Args {
    /// Config file. Defaults to payroll-merge.toml or .payroll-merge.toml in the current directory.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Exit without waiting for a key press
    #[arg(long, global = true)]
    no_pause: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Add new employees, merge every source and save the workbook (default)
    Run,
    /// Show employee discrepancies without changing the workbook
    Diff,
    /// Show which files would be used and exit
    Locate,
}

pub fn run(args: impl IntoIterator<Item = String>) -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "payroll_merge=info,payroll_merge_cli=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    clap_complete::CompleteEnv::with_factory(Args::command).complete();

    let args = Args::parse_from(args);
    let console = Console::new(!args.no_pause);
    let palette = Palette::detect();
    let mut diagnostics = Diagnostics::default();

    match execute(&args, &mut diagnostics, &palette) {
        Ok(debug) => {
            if debug {
                show::print_diagnostics(&diagnostics);
            }
            console.pause("PRESS ANY KEY TO CLOSE");
            ExitCode::from(exit_codes::EXIT_SUCCESS)
        }
        Err(err) => {
            tracing::debug!(phase = ?diagnostics.phase, "run failed");
            if let Some(report) = show::unsaved_report(&diagnostics, &palette) {
                print!("{report}");
                println!();
            }
            let code = match err.downcast_ref::<PayrollError>() {
                Some(known) => {
                    show::print_error(known, &palette);
                    console.pause("PRESS ANY KEY TO CLOSE");
                    exit_codes::for_error(known)
                }
                None => {
                    show::print_unclassified(&err, &palette);
                    if console.wants_debug() {
                        show::print_diagnostics(&diagnostics);
                        console.pause("PRESS ANY KEY TO CLOSE");
                    }
                    exit_codes::EXIT_ERROR
                }
            };
            ExitCode::from(code)
        }
    }
}

/// Returns whether the config asks for the debug values after a successful run.
fn execute(args: &Args, diagnostics: &mut Diagnostics, palette: &Palette) -> Result<bool> {
    let config_path = config_path(args.config.as_deref())?;
    diagnostics.config = Some(config_path.clone());
    let (base_dir, config) = Config::load_from_file(&config_path)?;

    diagnostics.phase = Phase::Locate;
    let job = config.merge_job(&base_dir, diagnostics)?;

    match args.command.unwrap_or(Commands::Run) {
        Commands::Locate => print!("{}", show::located_report(diagnostics)),
        Commands::Diff => {
            let state = job.read(diagnostics)?;
            diagnostics.phase = Phase::Reconcile;
            let result = state.reconcile();
            diagnostics.reconcile = Some(result.clone());
            print!("{}", show::discrepancy_report(&result, false, palette));
        }
        Commands::Run => {
            let (result, summary) = job.run(diagnostics)?;
            print!("{}", show::discrepancy_report(&result, true, palette));
            println!();
            print!("{}", show::merge_report(&summary, &job.target.path, palette));

            if config.target.open_when_done {
                open::that(&job.target.path).with_context(|| {
                    format!("Failed to open \"{}\"", job.target.path.display())
                })?;
            }
        }
    }

    Ok(config.debug.active)
}

fn config_path(arg: Option<&Path>) -> Result<PathBuf, PayrollError> {
    if let Some(path) = arg {
        return Ok(path.to_owned());
    }
    Config::find()
        .map(ToOwned::to_owned)
        .ok_or_else(|| PayrollError::Config {
            path: PathBuf::from("payroll-merge.toml"),
            message: "no config file found in the current directory, pass one with --config"
                .to_string(),
        })
}
