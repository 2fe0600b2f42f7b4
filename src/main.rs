use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use colored::*;
use std::process;

use qmdlint_lib::config::{self, Config};
use qmdlint_lib::exit_codes::{self, exit};
use qmdlint_lib::file_processor::{gather_qmd_files, try_convert_file};
use qmdlint_lib::linters::{FixedLineLength, LineLengthDetector, LineLengthSource, LintRunner, LinterRegistry, RunnerError};

mod cli_types;

use cli_types::{CheckArgs, ConvertArgs};

#[derive(Parser)]
#[command(name = "qmdlint", author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<String>,

    /// Show detailed output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Command to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run linters on the Python chunks of Quarto documents
    Check(CheckArgs),
    /// Convert one Quarto document into a line-aligned Python file
    Convert(ConvertArgs),
    /// List the supported linters
    Linters,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match config::load_config(cli.config.as_deref()) {
        Ok(config) => Ok(config),
        // Only an explicitly requested config file is fatal
        Err(e) if cli.config.is_none() => {
            log::warn!("Ignoring discovered configuration: {e}");
            Ok(Config::default())
        }
        Err(e) => Err(e).context("Failed to load configuration"),
    }
}

fn run_check(cli: &Cli, args: &CheckArgs) -> anyhow::Result<i32> {
    let config = load_config(cli)?;
    let registry = LinterRegistry::new();

    let linters = if args.linters.is_empty() {
        config.linters.clone()
    } else {
        args.linters.clone()
    };
    if linters.is_empty() {
        bail!("No linters specified. Pass --linters or set `linters` in .qmdlint.toml");
    }

    let line_length: Box<dyn LineLengthSource> = match args.max_line_length.or(config.max_line_length) {
        Some(limit) => Box::new(FixedLineLength(limit)),
        None => Box::new(LineLengthDetector::from_current_dir()),
    };
    let keep_temp_files = args.keep_temp || config.keep_temp_files;

    // Every linter is validated before any document is touched
    let runners = linters
        .iter()
        .map(|name| LintRunner::for_linter(name, &registry, line_length.as_ref(), keep_temp_files))
        .collect::<Result<Vec<_>, _>>()?;

    let mut exclude = config.exclude.clone();
    exclude.extend(args.exclude.iter().cloned());
    let files = gather_qmd_files(&args.paths, &exclude)?;
    if files.is_empty() {
        eprintln!("{}: No .qmd files found", "Error".red().bold());
        return Ok(exit_codes::TOOL_ERROR);
    }

    let mut had_tool_error = false;
    let mut had_violations = false;

    for runner in &runners {
        if !cli.quiet {
            println!("{}", format!("=========== {} ===========", runner.linter()).bold());
        }

        for file in &files {
            if cli.verbose {
                println!("Checking {} with {}", file.display(), runner.linter());
            }

            match runner.run(file) {
                Ok(outcome) => {
                    if !outcome.output.trim().is_empty() {
                        print!("{}", outcome.output);
                        if !outcome.output.ends_with('\n') {
                            println!();
                        }
                    }
                    had_violations |= !outcome.success();
                }
                Err(e @ RunnerError::ToolNotFound { .. }) => {
                    eprintln!("{}: {}", "Error".red().bold(), e);
                    had_tool_error = true;
                    break;
                }
                Err(e) => {
                    eprintln!("{}: {}", "Error".red().bold(), e);
                    had_tool_error = true;
                }
            }
        }
    }

    Ok(exit_codes::for_run(had_tool_error, had_violations))
}

fn run_convert(cli: &Cli, args: &ConvertArgs) -> i32 {
    match try_convert_file(&args.input, &args.linter, args.output.as_deref(), cli.verbose) {
        Some(converted) => {
            if !cli.quiet && !cli.verbose {
                println!("{}", converted.output_path.display());
            }
            exit_codes::SUCCESS
        }
        None => exit_codes::TOOL_ERROR,
    }
}

fn run_linters(cli: &Cli) -> i32 {
    let registry = LinterRegistry::new();
    for name in registry.list() {
        if cli.quiet {
            println!("{name}");
            continue;
        }

        let Some(linter) = registry.get(name) else {
            continue;
        };
        let mut notes = Vec::new();
        if linter.uses_noqa {
            notes.push("noqa");
        }
        if !linter.preserves_line_count {
            notes.push("compact output");
        }
        let notes = if notes.is_empty() {
            String::new()
        } else {
            format!(" ({})", notes.join(", "))
        };
        println!("{} {}{}", format!("{name:<12}").bold(), linter.command.join(" "), notes.dimmed());
    }
    exit_codes::SUCCESS
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Check(args) => run_check(&cli, args),
        Commands::Convert(args) => Ok(run_convert(&cli, args)),
        Commands::Linters => Ok(run_linters(&cli)),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}: {e:#}", "Error".red().bold());
            exit::tool_error();
        }
    }
}
