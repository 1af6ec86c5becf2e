use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sentinel_ai::{Embedder, EmbeddingProvider};
use sentinel_core::SentinelConfig;
use sentinel_engine::{DocumentKind, Engine, build_prompt, intake};
use sentinel_remote::{GeminiClient, KeyRing};
use sentinel_store::KnowledgeBase;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod display;

#[derive(Debug, Parser)]
#[command(name = "sentinel", version, about = "Employment contract compliance checks and Q&A under Indian law")]
struct Cli {
    /// TOML config file.
    #[arg(long, env = "SENTINEL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Statute corpus file (defaults to the built-in corpus).
    #[arg(long, env = "SENTINEL_STATUTES", global = true)]
    statutes: Option<PathBuf>,

    /// Reference clause corpus file (defaults to the built-in corpus).
    #[arg(long, env = "SENTINEL_REFERENCES", global = true)]
    references: Option<PathBuf>,

    /// Comma-separated provider API keys, tried in rotation.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify every clause and print the compliance report.
    Validate { file: PathBuf },
    /// Run the rule-based risk scan.
    Scan { file: PathBuf },
    /// Analyse a salary annexure: breakdown, PF check, and key answers.
    Salary { file: PathBuf },
    /// Load a contract and answer a question about it.
    Ask { file: PathBuf, question: String },
    /// Print the retrieved context and prompt without calling the provider.
    Prompt { file: PathBuf, question: String },
    /// Show corpus sizes and embedding sources.
    Corpus,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("sentinel v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => SentinelConfig::load(path).context("loading config")?,
        None => SentinelConfig::default(),
    };

    match &cli.command {
        Command::Validate { file } => {
            let raw = read_document(file)?;
            let document = intake::prepare(&raw, &config.classifier)?;
            let engine = build_engine(&cli, config, false).await?;
            let report = engine.validate_document(&document.clauses, &document.text);
            emit(cli.json, &report, display::print_report)?;
        }
        Command::Scan { file } => {
            let raw = read_document(file)?;
            let document = intake::prepare(&raw, &config.classifier)?;
            let engine = build_engine(&cli, config, true).await?;
            let scan = engine.scan(&document.clauses).await;
            emit(cli.json, &scan, display::print_scan)?;
        }
        Command::Salary { file } => {
            let raw = read_document(file)?;
            let engine = build_engine(&cli, config, true).await?;
            let session = engine.open_session();
            let report = engine.analyze_salary(session, &raw).await?;
            emit(cli.json, &report, display::print_salary)?;
        }
        Command::Ask { file, question } => {
            let raw = read_document(file)?;
            let engine = build_engine(&cli, config, true).await?;
            let session = engine.open_session();
            engine.load_contract(session, &raw).await?;
            let answer = engine.ask(session, question).await?;
            emit(cli.json, &answer, display::print_answer)?;
        }
        Command::Prompt { file, question } => {
            let raw = read_document(file)?;
            let engine = build_engine(&cli, config, true).await?;
            let session = engine.open_session();
            engine.load_contract(session, &raw).await?;
            let bundle = engine.retrieve_context(session, question).await?;
            let prompt = build_prompt(question, &bundle);
            if cli.json {
                print_json(&serde_json::json!({ "context": bundle, "prompt": prompt }))?;
            } else {
                display::print_bundle(&bundle);
                println!("{prompt}");
            }
        }
        Command::Corpus => {
            let engine = build_engine(&cli, config, true).await?;
            let stats = engine.corpus_stats();
            emit(cli.json, &stats, |s| display::print_corpus_stats(s))?;
        }
    }

    Ok(())
}

fn read_document(path: &Path) -> anyhow::Result<String> {
    DocumentKind::from_path(path)?;
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Build the engine, with the remote provider when keys are configured and
/// `remote` is set.
async fn build_engine(cli: &Cli, config: SentinelConfig, remote: bool) -> anyhow::Result<Engine> {
    let keys = cli
        .api_key
        .as_deref()
        .map(KeyRing::from_list)
        .filter(|k| !k.is_empty());

    let client = match keys {
        Some(keys) if remote => Some(Arc::new(
            GeminiClient::new(&config.provider, keys).context("building provider client")?,
        )),
        _ => None,
    };

    let embedder = match &client {
        Some(c) => {
            let provider: Arc<dyn EmbeddingProvider> = c.clone();
            Embedder::new(Some(provider), &config.provider)
        }
        None => Embedder::hash_only(config.provider.dimension),
    };
    if client.is_none() && remote {
        tracing::warn!("no API key configured, using hash embeddings and fallback answers");
    }

    let knowledge = KnowledgeBase::load(cli.statutes.as_deref(), cli.references.as_deref(), &embedder)
        .await
        .context("loading corpora")?;

    let engine = Engine::new(config, embedder, knowledge);
    Ok(match client {
        Some(c) => engine.with_completer(c),
        None => engine,
    })
}

fn emit<T: Serialize + ?Sized>(json: bool, value: &T, print: impl Fn(&T)) -> anyhow::Result<()> {
    if json {
        print_json(value)
    } else {
        print(value);
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serializing output")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_json_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["sentinel", "validate", "offer.txt", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Validate { ref file } if file == Path::new("offer.txt")));
    }

    #[test]
    fn ask_takes_file_and_question() {
        let cli = Cli::try_parse_from(["sentinel", "ask", "offer.md", "Is there a notice period?"]).unwrap();
        match cli.command {
            Command::Ask { question, .. } => assert_eq!(question, "Is there a notice period?"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn salary_takes_a_file() {
        let cli = Cli::try_parse_from(["sentinel", "salary", "annexure.txt"]).unwrap();
        assert!(matches!(cli.command, Command::Salary { ref file } if file == Path::new("annexure.txt")));
    }

    #[test]
    fn pdf_is_rejected_before_reading() {
        let err = read_document(Path::new("/nonexistent/offer.pdf")).unwrap_err();
        assert!(err.to_string().contains("unsupported document kind 'pdf'"));
    }
}
