//! Mediaminer command-line tool
//!
//! Guesses identities from filenames, or runs the full miner over a list of
//! files and prints the resulting SPARQL updates to stdout.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mediaminer::{Controller, KbConfig, MinerConfig, QueueItem, SparqlWriterSink, VecQueue};
use mediaminer_core::IdentityGuesser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser)]
#[command(name = "mediaminer")]
#[command(about = "Look up video metadata in a remote knowledge base")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Knowledge-base API root
    #[arg(long, env = "MEDIAMINER_KB_URL")]
    kb_url: Option<String>,

    /// API key sent with every request
    #[arg(long, env = "MEDIAMINER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Language of returned text
    #[arg(short, long, env = "MEDIAMINER_LANGUAGE", default_value = "en")]
    language: String,

    /// Per-request timeout in seconds (0 disables it)
    #[arg(long, env = "MEDIAMINER_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Graph the updates are written into
    #[arg(short, long, env = "MEDIAMINER_GRAPH")]
    graph: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the identity guessed from each filename as JSON
    Guess {
        /// Video files (paths or file:// URIs)
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Mine metadata for each file and print SPARQL updates
    Run {
        /// Video files (paths or file:// URIs)
        #[arg(required = true)]
        files: Vec<String>,
    },
}

impl Cli {
    fn miner_config(&self) -> MinerConfig {
        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));
        let mut kb = KbConfig::new()
            .with_api_key(self.api_key.clone())
            .with_language(&self.language)
            .with_timeout(timeout);
        if let Some(url) = &self.kb_url {
            kb = kb.with_base_url(url);
        }

        let config = MinerConfig::new().with_kb(kb);
        match &self.graph {
            Some(graph) => config.with_graph(graph),
            None => config,
        }
    }
}

#[derive(Serialize)]
struct GuessLine<'a> {
    uri: &'a str,
    title: &'a str,
    season: u32,
    episode: u32,
}

/// Turns a command-line argument into a `file://` URI.
fn to_uri(arg: &str) -> Result<String> {
    if arg.contains("://") {
        return Ok(arg.to_string());
    }
    let path = Path::new(arg);
    let absolute: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to read current directory")?
            .join(path)
    };

    let mut uri = String::from("file://");
    for component in absolute.components() {
        if let Component::Normal(part) = component {
            uri.push('/');
            uri.push_str(&urlencoding::encode(&part.to_string_lossy()));
        }
    }
    Ok(uri)
}

/// Subject the updates for `uri` are attached to.
fn urn_for(uri: &str) -> String {
    format!("urn:mediaminer:file:{}", urlencoding::encode(uri))
}

fn guess(files: &[String]) -> Result<()> {
    let guesser = IdentityGuesser::new()?;
    for file in files {
        let uri = to_uri(file)?;
        let identity = guesser.guess_uri(&uri);
        let line = GuessLine {
            uri: &uri,
            title: &identity.title,
            season: identity.season,
            episode: identity.episode,
        };
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}

async fn run(config: &MinerConfig, files: &[String]) -> Result<()> {
    let sink = Arc::new(SparqlWriterSink::new(std::io::stdout()));
    let mut controller = Controller::with_http(config, sink)?;

    let handle = controller.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, finishing after the current file");
            handle.pause();
        }
    });

    let mut queue = VecQueue::default();
    for file in files {
        let uri = to_uri(file)?;
        let urn = urn_for(&uri);
        queue.push(QueueItem::new(uri, urn));
    }

    let report = controller.drain(&mut queue).await;
    info!(
        processed = report.processed,
        succeeded = report.succeeded,
        failed = report.failed,
        "done"
    );

    if report.failed > 0 {
        anyhow::bail!("{} of {} files failed", report.failed, report.processed);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.miner_config();

    match &cli.command {
        Commands::Guess { files } => guess(files),
        Commands::Run { files } => run(&config, files).await,
    }
}
