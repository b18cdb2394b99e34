use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use cf_core::core::{
    grade_dataset, run_sweep, Dataset, Gateway, ResolvedSweep, SweepOutcome, SweepParams,
    TaskType, TemplateCatalog,
};
use cf_runner::backends::BackendRegistry;
use cf_runner::bootstrap::{self, RuntimeConfig};
use cf_runner::config::AppConfig;
use cf_runner::confirm::StdinConfirm;

#[derive(Parser)]
#[command(
    name = "cotforge",
    about = "Chain-of-Thought rationale generation for multiple-choice QA datasets"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to the configuration file.
    #[arg(short, long, default_value = "cotforge.toml", global = true)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Generate CoTs and extracted answers for a dataset.
    Run {
        /// Dataset JSON: a list of items or named splits of items.
        #[arg(long)]
        dataset: PathBuf,
        /// Template catalog JSON.
        #[arg(long)]
        templates: PathBuf,
        /// Where to write the updated dataset; defaults to the input path.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Skip the interactive cost confirmation.
        #[arg(long)]
        yes: bool,
    },
    /// Fill in correct answers on generated records and report accuracy.
    Grade {
        #[arg(long)]
        dataset: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate configuration file and exit.
    Validate,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_file(&cli.config)
        .with_context(|| format!("reading config {}", cli.config.display()))?;
    let runtime = bootstrap::into_runtime(config)?;
    init_tracing(&runtime);

    match cli.command {
        Command::Run {
            dataset,
            templates,
            output,
            yes,
        } => run_generate(&runtime, &dataset, &templates, output.as_deref(), yes),
        Command::Grade { dataset, output } => run_grade(&dataset, output.as_deref()),
        Command::Validate => {
            println!("Config valid: {}", cli.config.display());
            Ok(())
        }
    }
}

fn init_tracing(runtime: &RuntimeConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(runtime.log_level.clone()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if runtime.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run_generate(
    runtime: &RuntimeConfig,
    dataset_path: &Path,
    templates_path: &Path,
    output: Option<&Path>,
    yes: bool,
) -> anyhow::Result<()> {
    let catalog_text = std::fs::read_to_string(templates_path)
        .with_context(|| format!("reading templates {}", templates_path.display()))?;
    let catalog = TemplateCatalog::from_json(&catalog_text)
        .with_context(|| format!("parsing templates {}", templates_path.display()))?;

    let dataset_text = std::fs::read_to_string(dataset_path)
        .with_context(|| format!("reading dataset {}", dataset_path.display()))?;
    let mut dataset = Dataset::from_json(&dataset_text)?;

    let params = SweepParams {
        sweep: ResolvedSweep::resolve(
            runtime.idx_range,
            &runtime.instruction_keys,
            &runtime.cot_trigger_keys,
            &runtime.answer_extraction_keys,
            &catalog,
        ),
        author: runtime.author.clone(),
        api_service: runtime.api_service.clone(),
        model: runtime.model.clone(),
        warn: runtime.warn && !yes,
    };

    let gateway = if runtime.debug {
        info!("debug mode: completions are mocked, no API calls are made");
        Gateway::debug()
    } else {
        let registry =
            BackendRegistry::from_runtime(&runtime.backends, reqwest::blocking::Client::new());
        let backend = registry
            .take(&runtime.api_service)
            .with_context(|| format!("backend {} not configured", runtime.api_service))?;
        Gateway::live(backend, runtime.api_time_interval)
    };

    let outcome = run_sweep(&mut dataset, &catalog, &params, &gateway, &StdinConfirm)?;
    match outcome {
        SweepOutcome::Declined => {
            info!("sweep declined, dataset left untouched");
        }
        SweepOutcome::Completed(cost) => {
            info!(
                n_samples = cost.n_samples,
                n_cot_calls = cost.n_cot_calls,
                n_extraction_calls = cost.n_extraction_calls,
                n_total = cost.n_total,
                "sweep completed"
            );
            write_dataset(&dataset, output.unwrap_or(dataset_path))?;
        }
    }
    Ok(())
}

fn run_grade(dataset_path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let dataset_text = std::fs::read_to_string(dataset_path)
        .with_context(|| format!("reading dataset {}", dataset_path.display()))?;
    let mut dataset = Dataset::from_json(&dataset_text)?;

    let summary = grade_dataset(TaskType::MultipleChoice, &mut dataset)?;
    match summary.accuracy() {
        Some(accuracy) => println!(
            "Graded {} extracted answers: {} correct ({:.1}%)",
            summary.graded,
            summary.correct,
            accuracy * 100.0
        ),
        None => println!("Nothing to grade: no labeled items with extracted answers."),
    }

    write_dataset(&dataset, output.unwrap_or(dataset_path))
}

fn write_dataset(dataset: &Dataset, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(dataset)?;
    std::fs::write(path, json).with_context(|| format!("writing dataset {}", path.display()))?;
    info!(path = %path.display(), "dataset written");
    Ok(())
}
