//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{lifecycle, report, summary};
use crate::storage::{Config, Vault};

#[derive(Parser)]
#[command(name = "memoir")]
#[command(author, version, about = "Question/answer tracking inside a markdown vault")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Vault root directory (overrides configuration)
    #[arg(long, global = true, env = "MEMOIR_VAULT")]
    pub vault: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the vault skeleton (profile document, topics directory)
    Init {
        /// Path to initialize (defaults to the configured vault, then ".")
        path: Option<PathBuf>,
    },

    /// Show the question that would be presented next, without writes
    Next,

    /// Select the next question and mark it pending for presentation
    Ask,

    /// Resolve a question with an answer
    Answer {
        /// Question text (defaults to the outstanding pending question)
        #[arg(long, short = 'q')]
        question: Option<String>,

        /// Record the positive answer (the yes-label unless --text is given)
        #[arg(long)]
        yes: bool,

        /// Record the negative answer
        #[arg(long)]
        no: bool,

        /// Free-text answer; implies --yes
        #[arg(long, short = 't')]
        text: Option<String>,
    },

    /// Skip a question permanently
    Skip {
        /// Question text (defaults to the outstanding pending question)
        #[arg(long, short = 'q')]
        question: Option<String>,
    },

    /// Revert a pending question back to unanswered
    Revert {
        /// Question text (defaults to the outstanding pending question)
        #[arg(long, short = 'q')]
        question: Option<String>,
    },

    /// Revert every pending question (crash recovery)
    Recover,

    /// Show the outstanding pending question, if any
    Pending,

    /// List upcoming unanswered questions in selection order
    List {
        /// Maximum number of questions to show
        #[arg(long, short = 'n', default_value = "10")]
        limit: usize,
    },

    /// Show answered questions for a date
    Answers {
        /// Date to query (defaults to today, falling back to yesterday)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print only the number of answers
        #[arg(long)]
        count: bool,
    },

    /// Write the daily portrait document for a date
    Summary {
        /// Date to summarize (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print the portrait instead of writing it into the vault
        #[arg(long)]
        stdout: bool,
    },

    /// Show per-topic question counts
    Status,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("Memoir starting");
    let config = Config::load()?;

    if let Commands::Init { path } = &cli.command {
        let root = path
            .clone()
            .or_else(|| config.resolve_vault(cli.vault.as_deref()).ok())
            .unwrap_or_else(|| PathBuf::from("."));

        output.verbose_ctx("init", &format!("Initializing vault at: {}", root.display()));
        let vault = Vault::init(&root, &config)?;
        output.success(&format!("Initialized vault at {}", vault.root().display()));

        output.verbose("Command completed successfully");
        return Ok(());
    }

    let root = config.resolve_vault(cli.vault.as_deref())?;
    let vault = Vault::open(&root, &config)?;
    output.verbose_ctx("vault", &format!("Using vault at: {}", vault.root().display()));

    match cli.command {
        Commands::Init { .. } => unreachable!("handled above"),

        Commands::Next => lifecycle::next(&vault, &output)?,
        Commands::Ask => lifecycle::ask(&vault, &output)?,

        Commands::Answer {
            question,
            yes,
            no,
            text,
        } => lifecycle::answer(&vault, &output, question.as_deref(), yes, no, text)?,

        Commands::Skip { question } => lifecycle::skip(&vault, &output, question.as_deref())?,
        Commands::Revert { question } => lifecycle::revert(&vault, &output, question.as_deref())?,
        Commands::Recover => lifecycle::recover(&vault, &output)?,
        Commands::Pending => lifecycle::pending(&vault, &output)?,
        Commands::List { limit } => lifecycle::list(&vault, &output, limit)?,

        Commands::Answers { date, count } => report::answers(&vault, &output, date, count)?,
        Commands::Summary { date, stdout } => {
            summary::run(&vault, &output, &config, date, stdout)?
        }
        Commands::Status => report::status(&vault, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}
