//! Probegen CLI.
//!
//! Generates list-task prompt cases, evaluates them against the built-in
//! mock model, and extracts minimal contrastive failure pairs.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use probegen::{
    collect_failure_modes, list_family, MockModel, ProbeConfig, PromptFamily, TaskKind, Value,
    WrapKind,
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "probegen")]
#[command(version)]
#[command(about = "Generate and score list-task prompts against a text model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GenerateArgs {
    /// Config file path (probegen.toml is picked up automatically)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed override
    #[arg(short, long)]
    seed: Option<u64>,

    /// Cases per task x wrap combination
    #[arg(short, long, default_value = "1")]
    num: usize,

    /// Restrict to one task (e.g. "append")
    #[arg(long)]
    task: Option<String>,

    /// Restrict to one wrap (e.g. "plain")
    #[arg(long)]
    wrap: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate prompt cases and write them as JSONL
    Gen {
        #[command(flatten)]
        generate: GenerateArgs,

        /// Output file path
        #[arg(short, long, default_value = "cases.jsonl")]
        output: PathBuf,
    },

    /// Generate cases, evaluate them, and print the report
    Eval {
        #[command(flatten)]
        generate: GenerateArgs,

        /// Success key override ("exact_match" or "substring")
        #[arg(long)]
        key: Option<String>,

        /// Optional JSONL output of per-case results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate, then print minimal contrastive pairs around a pivot input
    Contrast {
        #[command(flatten)]
        generate: GenerateArgs,

        /// Pivot input position
        #[arg(short, long)]
        pivot: usize,

        /// Success key override ("exact_match" or "substring")
        #[arg(long)]
        key: Option<String>,
    },
}

/// One JSONL row per generated case.
#[derive(Serialize)]
struct CaseRow<'a> {
    task_id: &'a str,
    task: &'static str,
    wrap: Option<&'static str>,
    inputs: &'a [Value],
    ground_truth: &'a Value,
    prompt: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Gen { generate, output } => cmd_gen(&generate, &output),
        Commands::Eval {
            generate,
            key,
            output,
        } => cmd_eval(&generate, key.as_deref(), output.as_deref()),
        Commands::Contrast {
            generate,
            pivot,
            key,
        } => cmd_contrast(&generate, pivot, key.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<ProbeConfig> {
    match path {
        Some(path) => {
            ProbeConfig::load(path).with_context(|| format!("loading {}", path.display()))
        }
        None => {
            let default = Path::new("probegen.toml");
            if default.exists() {
                ProbeConfig::load(default).context("loading probegen.toml")
            } else {
                Ok(ProbeConfig::default())
            }
        }
    }
}

/// Build the list family and generate the requested batch.
fn build_cases(args: &GenerateArgs) -> Result<(ProbeConfig, PromptFamily)> {
    let config = load_config(args.config.as_deref())?;
    let seed = args.seed.unwrap_or(config.seed.0);
    let mut family = list_family(&config.family, seed);

    let kinds: Vec<TaskKind> = match &args.task {
        Some(name) => vec![name.parse()?],
        None => family.kinds().collect(),
    };
    let wraps: Vec<WrapKind> = match &args.wrap {
        Some(name) => vec![name.parse()?],
        None => family.wraps().to_vec(),
    };

    for &kind in &kinds {
        for &wrap in &wraps {
            family
                .generate(kind, wrap, args.num)
                .with_context(|| format!("generating {} x {}", kind, wrap))?;
        }
    }
    Ok((config, family))
}

fn cmd_gen(args: &GenerateArgs, output: &Path) -> Result<()> {
    let (_config, family) = build_cases(args)?;

    let file = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    for case in family.cases() {
        let row = CaseRow {
            task_id: case.task_id(),
            task: case.kind().name(),
            wrap: case.wrap().map(WrapKind::name),
            inputs: case.inputs(),
            ground_truth: case.ground_truth(),
            prompt: case.prompt(),
        };
        writeln!(writer, "{}", serde_json::to_string(&row)?)?;
    }
    writer.flush()?;

    println!(
        "Wrote {} cases to {}",
        family.cases().len(),
        output.display()
    );
    Ok(())
}

fn cmd_eval(args: &GenerateArgs, key: Option<&str>, output: Option<&Path>) -> Result<()> {
    let (config, mut family) = build_cases(args)?;
    let mut options = config.eval;
    if let Some(key) = key {
        options.success_key = key.parse()?;
    }

    let report = family.evaluate_all(&MockModel::new(), options);
    println!("{}", report);

    if let Some(output) = output {
        let file =
            File::create(output).with_context(|| format!("creating {}", output.display()))?;
        let mut writer = BufWriter::new(file);
        for record in &report.records {
            writeln!(writer, "{}", serde_json::to_string(record)?)?;
        }
        writer.flush()?;
        println!("Wrote {} result rows to {}", report.total, output.display());
    }
    Ok(())
}

fn cmd_contrast(args: &GenerateArgs, pivot: usize, key: Option<&str>) -> Result<()> {
    let (config, mut family) = build_cases(args)?;
    let mut options = config.eval;
    if let Some(key) = key {
        options.success_key = key.parse()?;
    }

    let report = family.evaluate_all(&MockModel::new(), options);
    println!("{}", report.summary());

    let pairs = collect_failure_modes(family.cases(), pivot, options.success_key);
    println!(
        "{} contrastive pairs at pivot index {}",
        pairs.len(),
        pivot
    );
    for (clean, corrupted) in &pairs {
        println!(
            "  {} (pivot {}) vs {} (pivot {})",
            clean.task_id(),
            clean.inputs()[pivot],
            corrupted.task_id(),
            corrupted.inputs()[pivot]
        );
    }
    Ok(())
}
