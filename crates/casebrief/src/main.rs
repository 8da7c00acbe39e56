use anyhow::{Context, Result};
use casebrief::pipeline;
use casebrief_common::{logger, AppConfig};
use casebrief_llm::GeminiClient;
use casebrief_source::{DocumentSource, FileSource, KanoonClient, KanoonSource, KanoonTarget};
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "casebrief")]
#[command(about = "casebrief - role-based summaries of Indian court judgments", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize one case document
    Summarize {
        #[command(flatten)]
        input: InputArgs,

        /// Audience: public, student or lawyer (anything else gives a concise summary)
        #[arg(long)]
        role: Option<String>,

        /// Maximum characters per chunk
        #[arg(long)]
        max_chars: Option<usize>,

        /// Attempts per chunk on server errors
        #[arg(long)]
        max_retries: Option<u32>,

        /// Chunks summarized at the same time
        #[arg(long)]
        concurrency: Option<usize>,

        /// Gemini model name
        #[arg(long)]
        model: Option<String>,

        /// Write the summary to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Emit the summary with per-chunk details as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search Indian Kanoon and list matching documents
    Search {
        /// Search query, e.g. "Article 21 right to life"
        query: String,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// Local case file (.txt, .html)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Search Indian Kanoon and summarize the first result
    #[arg(long)]
    query: Option<String>,

    /// Indian Kanoon document id
    #[arg(long)]
    doc_id: Option<u64>,
}

/// Ask for a role on the terminal when none was configured
fn prompt_role() -> Result<String> {
    let mut stderr = std::io::stderr();
    write!(stderr, "Enter role (public / student / lawyer): ")?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_lowercase())
}

fn build_source(input: InputArgs, config: &AppConfig) -> Result<Box<dyn DocumentSource>> {
    let source: Box<dyn DocumentSource> = match (input.file, input.query, input.doc_id) {
        (Some(path), _, _) => Box::new(FileSource::new(path)),
        (_, Some(query), _) => Box::new(KanoonSource::new(
            KanoonClient::from_config(config)?,
            KanoonTarget::Query(query),
        )),
        (_, _, Some(tid)) => Box::new(KanoonSource::new(
            KanoonClient::from_config(config)?,
            KanoonTarget::DocId(tid),
        )),
        (None, None, None) => anyhow::bail!("One of --file, --query or --doc-id is required"),
    };
    Ok(source)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    logger::setup_logging(&config)?;

    match cli.command {
        Commands::Summarize {
            input,
            role,
            max_chars,
            max_retries,
            concurrency,
            model,
            output,
            json,
        } => {
            // CLI flags override file and environment settings
            if let Some(role) = role {
                config.role = role;
            } else if config.role.trim().is_empty() && std::io::stdin().is_terminal() {
                config.role = prompt_role()?;
            }
            if let Some(max_chars) = max_chars {
                config.max_chars = max_chars;
            }
            if let Some(max_retries) = max_retries {
                config.max_retries = max_retries;
            }
            if let Some(concurrency) = concurrency {
                config.concurrency = concurrency;
            }
            if let Some(model) = model {
                config.llm_model = model;
            }
            config.validate()?;

            let source = build_source(input, &config)?;
            let client = Arc::new(GeminiClient::from_config(&config)?);

            tracing::info!("casebrief starting: model={}, role={}", config.llm_model, config.role);
            let summary = pipeline::run(&config, source.as_ref(), client).await?;

            let rendered = if json {
                serde_json::to_string_pretty(&summary)?
            } else {
                summary.text
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!("Summary written to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }
        Commands::Search { query } => {
            let client = KanoonClient::from_config(&config)?;
            let hits = client.search(&query).await?;

            if hits.is_empty() {
                println!("No documents found for '{}'", query);
            }
            for hit in hits {
                if hit.source.is_empty() {
                    println!("{}\t{}", hit.tid, hit.title);
                } else {
                    println!("{}\t{} ({})", hit.tid, hit.title, hit.source);
                }
            }
        }
    }

    Ok(())
}
