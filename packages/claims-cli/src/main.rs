//! Claims CLI
//!
//! Answers questions about, summarizes, and analyzes synthetic insurance
//! claims stored on disk, using hosted models for the language tasks.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod context;
mod generate;
mod inference;
mod output;
mod pipeline;
#[cfg(test)]
mod testing;

use context::AppContext;
use pipeline::{Operation, Request};

#[derive(Parser)]
#[command(name = "claims")]
#[command(about = "Question answering and analysis over synthetic insurance claims")]
#[command(version)]
struct Cli {
    /// Configuration file [default: claims.toml, if present]
    #[arg(long, global = true, env = "CLAIMS_CONFIG")]
    config: Option<PathBuf>,

    /// Only print results and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an operation by name (qa, advanced_qa, summary, analysis)
    Run {
        operation: String,

        #[command(flatten)]
        target: Target,

        /// Question for qa / advanced_qa
        question: Vec<String>,
    },

    /// Extractive question answering over one claim
    Qa {
        #[command(flatten)]
        target: Target,

        question: Vec<String>,
    },

    /// Answer with reasoning from the chat model
    AdvancedQa {
        #[command(flatten)]
        target: Target,

        question: Vec<String>,
    },

    /// Summarize one claim
    Summary {
        #[command(flatten)]
        target: Target,
    },

    /// Aggregate report over every claim of a patient
    Analysis {
        /// Patient identifier (e.g. PA-12345)
        #[arg(short, long)]
        patient: String,
    },

    /// List patients, or the claims of one patient
    List {
        #[arg(short, long)]
        patient: Option<String>,
    },

    /// Write the synthetic demo corpus into the claim store
    Generate {
        /// Store directory (defaults to the configured data path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct Target {
    /// Patient identifier (e.g. PA-12345)
    #[arg(short, long)]
    patient: String,

    /// Claim identifier (e.g. CLM153910000)
    #[arg(short, long)]
    claim: Option<String>,
}

impl Target {
    fn request(self, operation: Operation, question: Vec<String>) -> Request {
        Request {
            operation,
            patient_id: self.patient,
            claim_id: self.claim,
            question: question.join(" "),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else {
        "warn,claims=info,claims_cli=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext::new(cli.config.as_deref(), cli.quiet, cli.json)?;

    let request = match cli.command {
        Commands::Run {
            operation,
            target,
            question,
        } => {
            let operation: Operation = operation.parse()?;
            target.request(operation, question)
        }
        Commands::Qa { target, question } => target.request(Operation::Qa, question),
        Commands::AdvancedQa { target, question } => {
            target.request(Operation::AdvancedQa, question)
        }
        Commands::Summary { target } => target.request(Operation::Summary, Vec::new()),
        Commands::Analysis { patient } => Request::new(Operation::Analysis, patient),
        Commands::List { patient } => return list(&ctx, patient),
        Commands::Generate { output, seed } => return generate(&ctx, output, seed),
    };

    let pipeline = ctx.pipeline(request.operation)?;
    let outcome = pipeline
        .run(&request)
        .await
        .with_context(|| format!("{} failed", request.operation))?;
    ctx.emit(&outcome)
}

fn list(ctx: &AppContext, patient: Option<String>) -> Result<()> {
    let store = ctx.store();
    let (header, ids) = match patient {
        Some(patient_id) => {
            let ids = store.list_claims(&patient_id)?;
            (format!("Claims for patient {patient_id}"), ids)
        }
        None => (
            format!("Patients in {}", store.base_dir().display()),
            store.list_patients()?,
        ),
    };

    if ctx.json {
        return ctx.emit_json(&ids);
    }
    ctx.print_header(&header);
    for id in ids {
        println!("  {id}");
    }
    Ok(())
}

fn generate(ctx: &AppContext, output: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    let store = match output {
        Some(dir) => claims::ClaimStore::new(dir),
        None => ctx.store(),
    };
    ctx.print_info(&format!(
        "Generating synthetic claims in {}",
        store.base_dir().display()
    ));

    let today = chrono::Local::now().date_naive();
    let records = generate::write_corpus(&store, seed, today)?;

    ctx.print_success(&format!("Wrote {} claims", records.len()));
    Ok(())
}
