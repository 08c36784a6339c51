use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use marksheet::config::Config;
use marksheet::marksheet::{compute_marksheet, rescale_totals, Marksheet};
use marksheet::snapshot::Snapshot;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_PRECONDITION: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    /// Aligned table for the terminal
    #[default]
    Table,
    /// Tab-separated values
    Tsv,
    /// Full marksheet structure as JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute and print a ranked marksheet from a score file (.csv or .json)
    Compute {
        /// Score file with one row per student
        scores: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,

        /// Rescale the displayed Total so the top student shows this value
        #[arg(long)]
        rescale_total: Option<f64>,

        /// Save the inputs and result to a snapshot file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print a previously saved snapshot
    Show {
        /// Snapshot file written by `compute --save`
        snapshot: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Validate the config file and exit
    Check,
    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "marksheet")]
#[command(about = "Compute ranked school marksheets from raw scores", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/marksheet/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    // init runs before loading so a broken or missing config can be replaced
    if let Commands::Init { force } = cli.command {
        match marksheet::config::write_starter_config(config_path, force) {
            Ok(path) => {
                println!("Wrote starter config to {}", path.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    let config = match marksheet::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = marksheet::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let code = match cli.command {
        Commands::Compute {
            scores,
            format,
            rescale_total,
            save,
        } => run_compute(config, &scores, format, rescale_total, save),
        Commands::Show { snapshot, format } => run_show(&snapshot, format),
        Commands::Check => {
            println!(
                "Config OK: {} subject(s), {} combined group(s), grading {}",
                config.marksheet.subjects.len(),
                config.marksheet.combined.len(),
                if config.marksheet.grading.enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            EXIT_SUCCESS
        }
        Commands::Init { .. } => EXIT_SUCCESS,
    };

    std::process::exit(code);
}

fn run_compute(
    config: Config,
    scores: &std::path::Path,
    format: OutputFormat,
    rescale_total: Option<f64>,
    save: Option<PathBuf>,
) -> i32 {
    let table = match marksheet::input::load_scores(scores) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            return EXIT_INPUT;
        }
    };

    let computed = match compute_marksheet(&table, &config.marksheet) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_PRECONDITION;
        }
    };

    if let Some(target) = rescale_total {
        if target.is_nan() || target <= 0.0 {
            eprintln!("Error: --rescale-total must be positive, got {}", target);
            return EXIT_INPUT;
        }
    }

    let displayed = match rescale_total.or(config.display.rescale_total) {
        Some(target) => rescale_totals(&computed, target, &config.marksheet.exclusion),
        None => computed.clone(),
    };

    if let Some(path) = save {
        let snapshot = Snapshot::new(config, table, computed);
        if let Err(e) = marksheet::snapshot::save_snapshot(&path, &snapshot) {
            eprintln!("Error: {:#}", e);
            return EXIT_INPUT;
        }
        log::info!("Snapshot saved to {}", path.display());
    }

    print_marksheet(&displayed, format)
}

fn run_show(path: &std::path::Path, format: OutputFormat) -> i32 {
    let snapshot = match marksheet::snapshot::load_snapshot(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            return EXIT_INPUT;
        }
    };

    log::debug!(
        "Snapshot saved at {} with {} students",
        snapshot.saved_at,
        snapshot.marksheet.rows.len()
    );

    let displayed = match snapshot.config.display.rescale_total {
        Some(target) => rescale_totals(
            &snapshot.marksheet,
            target,
            &snapshot.config.marksheet.exclusion,
        ),
        None => snapshot.marksheet,
    };

    print_marksheet(&displayed, format)
}

fn print_marksheet(sheet: &Marksheet, format: OutputFormat) -> i32 {
    match format {
        OutputFormat::Table => {
            let use_colors = marksheet::output::should_use_colors();
            println!(
                "{}",
                marksheet::output::format_marksheet_table(sheet, use_colors)
            );
        }
        OutputFormat::Tsv => println!("{}", marksheet::output::format_tsv(sheet)),
        OutputFormat::Json => match marksheet::output::format_json(sheet) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                return EXIT_INPUT;
            }
        },
    }
    EXIT_SUCCESS
}
