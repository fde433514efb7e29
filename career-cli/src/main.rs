//! Career Compass - command-line interface
//! Trains the model bundle offline and runs local predictions against it

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use career_core::prelude::*;
use career_core::report::wrap_text;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "career")]
#[command(author = "Career Compass Contributors")]
#[command(version)]
#[command(about = "Career Compass - career role recommendation", long_about = None)]
struct Cli {
    /// Show library logs (info level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the classifier and write the model bundle
    Train {
        /// Training CSV (overrides `[training] dataset`)
        #[arg(short, long, value_name = "PATH")]
        dataset: Option<PathBuf>,

        /// Output directory for the bundle
        #[arg(short, long, value_name = "DIR", env = "CAREER_ARTIFACTS")]
        artifacts: Option<PathBuf>,

        /// Configuration file (career.toml)
        #[arg(short, long, value_name = "PATH", env = "CAREER_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Recommend a role for one candidate
    Predict {
        /// Model bundle directory
        #[arg(short, long, value_name = "DIR", env = "CAREER_ARTIFACTS")]
        artifacts: Option<PathBuf>,

        /// Configuration file (career.toml)
        #[arg(short, long, value_name = "PATH", env = "CAREER_CONFIG")]
        config: Option<PathBuf>,

        /// Field value, repeatable (e.g. --field "certifications=python")
        #[arg(short, long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,

        /// JSON object of field values; --field entries override it
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Also write the PDF report to this path
        #[arg(long, value_name = "OUT")]
        pdf: Option<PathBuf>,
    },

    /// List the role catalog
    Roles {
        /// Configuration file (career.toml)
        #[arg(short, long, value_name = "PATH", env = "CAREER_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Summarize a model bundle
    Info {
        /// Model bundle directory
        #[arg(short, long, value_name = "DIR", env = "CAREER_ARTIFACTS")]
        artifacts: Option<PathBuf>,

        /// Configuration file (career.toml)
        #[arg(short, long, value_name = "PATH", env = "CAREER_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Train {
            dataset,
            artifacts,
            config,
        } => {
            if let Err(e) = train_command(dataset, artifacts, config.as_deref()) {
                eprintln!("{} {:#}", "error:".red().bold(), e);
                std::process::exit(1);
            }
        }

        Commands::Predict {
            artifacts,
            config,
            fields,
            input,
            pdf,
        } => {
            if let Err(e) = predict_command(
                artifacts.as_deref(),
                config.as_deref(),
                &fields,
                input.as_deref(),
                pdf.as_deref(),
            ) {
                eprintln!("{} {:#}", "error:".red().bold(), e);
                std::process::exit(1);
            }
        }

        Commands::Roles { config } => {
            if let Err(e) = roles_command(config.as_deref()) {
                eprintln!("{} {:#}", "error:".red().bold(), e);
                std::process::exit(1);
            }
        }

        Commands::Info { artifacts, config } => {
            if let Err(e) = info_command(artifacts.as_deref(), config.as_deref()) {
                eprintln!("{} {:#}", "error:".red().bold(), e);
                std::process::exit(1);
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "career_core=info" } else { "career_core=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<CareerConfig> {
    CareerConfig::load(path).context("failed to load configuration")
}

fn train_command(
    dataset: Option<PathBuf>,
    artifacts: Option<PathBuf>,
    config: Option<&Path>,
) -> Result<()> {
    let config = load_config(config)?;
    let mut training = config.training.clone();
    if let Some(dataset) = dataset {
        training.dataset = dataset;
    }
    let out_dir = artifacts.unwrap_or_else(|| config.artifacts.dir.clone());

    println!(
        "{} {} (target: {})",
        "  Training".green().bold(),
        training.dataset.display().to_string().cyan(),
        training.target_column.cyan()
    );

    let summary = TrainingPipeline::new(training)
        .run_and_save(&out_dir)
        .context("training failed")?;

    println!(
        "{} {} rows, {} after oversampling ({} train / {} test)",
        "      Data".green().bold(),
        summary.rows,
        summary.resampled_rows,
        summary.train_rows,
        summary.test_rows
    );
    println!(
        "{} {} features, {} roles",
        "  Features".green().bold(),
        summary.n_features,
        summary.n_classes
    );
    println!();
    println!("{} {:.4}", "Model Accuracy:".bold(), summary.accuracy);
    println!();
    println!("{}", "Classification Report:".bold());
    print!("{}", summary.report);
    println!();
    println!(
        "{} {}",
        "     Saved".green().bold(),
        out_dir.display().to_string().cyan()
    );

    Ok(())
}

/// Split a `NAME=VALUE` argument at the first `=`.
fn parse_field(arg: &str) -> Result<(String, FieldValue)> {
    let Some((name, value)) = arg.split_once('=') else {
        bail!("invalid --field '{arg}', expected NAME=VALUE");
    };
    if name.is_empty() {
        bail!("invalid --field '{arg}', field name is empty");
    }
    Ok((name.to_string(), FieldValue::parse(value)))
}

/// Read a JSON object of field values.
fn read_input(path: &Path) -> Result<Record> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    let Some(object) = value.as_object() else {
        bail!("{} must contain a JSON object of field values", path.display());
    };

    let mut record = Record::new();
    for (name, value) in object {
        let Some(field) = FieldValue::from_json(value) else {
            bail!("field '{name}' must be a number, string or boolean");
        };
        record.insert(name.as_str(), field);
    }
    Ok(record)
}

fn build_record(fields: &[String], input: Option<&Path>) -> Result<Record> {
    let mut record = match input {
        Some(path) => read_input(path)?,
        None => Record::new(),
    };
    for arg in fields {
        let (name, value) = parse_field(arg)?;
        record.insert(name, value);
    }
    if record.is_empty() {
        bail!("no input fields; pass --field NAME=VALUE or --input FILE.json");
    }
    Ok(record)
}

fn predict_command(
    artifacts: Option<&Path>,
    config: Option<&Path>,
    fields: &[String],
    input: Option<&Path>,
    pdf: Option<&Path>,
) -> Result<()> {
    let config = load_config(config)?;
    let record = build_record(fields, input)?;

    let service = InferenceService::from_config(&config, artifacts)
        .context("failed to load the model bundle")?;
    let rec = service.recommend(&record).context("prediction failed")?;
    let report = rec.report();

    println!("{}", report.title().bold());
    for (heading, body) in report.sections() {
        println!();
        println!("{}", heading.cyan().bold());
        for line in wrap_text(body, 78) {
            println!("  {line}");
        }
    }

    if let Some(out) = pdf {
        let bytes = report.to_pdf().context("failed to render PDF")?;
        fs::write(out, bytes).with_context(|| format!("failed to write {}", out.display()))?;
        println!();
        println!(
            "{} {}",
            "     Wrote".green().bold(),
            out.display().to_string().cyan()
        );
    }

    Ok(())
}

fn roles_command(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let catalog = RoleCatalog::load(config.inference.roles_path())
        .context("failed to load role catalog")?;

    println!("{} {} roles", "Catalog:".bold(), catalog.len());
    println!();
    for (name, info) in catalog.iter() {
        println!("{}", name.cyan().bold());
        for line in wrap_text(&info.skills, 74) {
            println!("    {line}");
        }
    }
    Ok(())
}

fn info_command(artifacts: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let dir = artifacts.unwrap_or(&config.artifacts.dir);
    let bundle = TrainedArtifacts::load(dir)
        .with_context(|| format!("failed to load bundle from {}", dir.display()))?;

    println!("{} {}", "Bundle:".bold(), dir.display().to_string().cyan());
    println!("  Features:  {}", bundle.feature_columns.len());
    println!("  Trees:     {}", bundle.classifier.trees().len());
    println!("  Roles:     {}", bundle.label_codec.len());
    match &bundle.manifest {
        Some(manifest) => {
            println!("  Format:    v{}", manifest.format_version);
            if let Some(acc) = manifest.test_accuracy {
                println!("  Accuracy:  {acc:.4}");
            }
        }
        None => println!("  Format:    {}", "no manifest".yellow()),
    }
    println!();
    println!("{}", "Roles:".bold());
    for class in bundle.label_codec.classes() {
        println!("  {class}");
    }
    Ok(())
}
