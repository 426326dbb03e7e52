use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use cdm_runner::config::{default_config_path, load_config_or_default};
use cdm_runner::report::load_report;
use cdm_runner::{RunMode, RunnerConfig, RunnerError, ScoreOptions, score_runs};

#[derive(Parser)]
#[command(name = "cdm-eval")]
#[command(about = "Score clinical decision-making benchmark runs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to <config dir>/cdm-eval/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate recorded runs and write per-case results
    Score {
        /// Benchmark dataset JSON file
        #[arg(long)]
        cases: Option<PathBuf>,

        /// JSONL file of {hadm_id, output} records
        #[arg(long)]
        runs: PathBuf,

        /// JSONL file results are written to (overwritten)
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long, value_enum)]
        mode: Option<RunMode>,

        /// Evaluate only the first N cases
        #[arg(long)]
        num_cases: Option<usize>,

        /// Write the run summary as JSON to this file
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Print per-pathology score averages of a results file
    Report {
        results: PathBuf,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<PathBuf>) -> Result<RunnerConfig> {
    let path = match path {
        Some(path) => path,
        None => default_config_path()?,
    };
    load_config_or_default(&path)
        .wrap_err_with(|| format!("failed to load config from {}", path.display()))
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.json);

    match cli.command {
        Command::Score {
            cases,
            runs,
            out,
            mode,
            num_cases,
            summary,
        } => {
            let config = load_config(cli.config)?;
            let options = ScoreOptions {
                cases_path: cases
                    .or(config.benchmark_path)
                    .ok_or(RunnerError::MissingSetting("benchmark_path (--cases)"))?,
                runs_path: runs,
                out_path: out
                    .or(config.results_path)
                    .ok_or(RunnerError::MissingSetting("results_path (--out)"))?,
                mode: mode.unwrap_or(config.mode),
                num_cases: num_cases.or(config.num_cases),
                summary_path: summary,
            };
            let summary = score_runs(&options)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Report { results } => {
            let report = load_report(&results)
                .wrap_err_with(|| format!("failed to read results from {}", results.display()))?;
            if report.is_empty() {
                tracing::warn!(path = %results.display(), "no scored results found");
            }
            print!("{report}");
        }
    }

    Ok(())
}
