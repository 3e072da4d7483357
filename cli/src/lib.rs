use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lookup_core::{SearchConfig, SearchServer};

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "lookup")]
#[command(about = "Top-5 occurrence lookup over an in-memory document base", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a base from the documents file and answer every query in the queries file
    Search {
        /// Documents, one per line
        #[arg(long)]
        docs: PathBuf,
        /// Queries, one per line; `-` reads stdin
        #[arg(long, default_value = "-")]
        queries: String,
        /// Result file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        tuning: Tuning,
    },
    /// Build a base and report its size
    Stats {
        /// Documents, one per line
        #[arg(long)]
        docs: PathBuf,
    },
}

#[derive(Args, Default)]
pub struct Tuning {
    /// JSON file with `page_size` and `top_k`
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Queries per worker thread
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Documents reported per query
    #[arg(long)]
    pub top_k: Option<usize>,
}

impl Tuning {
    pub fn resolve(&self) -> Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("opening config {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SearchConfig::default(),
        };
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        Ok(config)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Search { docs, queries, output, tuning } => {
            let config = tuning.resolve()?;
            let server = load_base(&docs, config)?;
            let queries = open_queries(&queries)?;
            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    run_round(&server, queries, BufWriter::new(file))
                }
                None => run_round(&server, queries, io::stdout().lock()),
            }
        }
        Commands::Stats { docs } => {
            let server = load_base(&docs, SearchConfig::default())?;
            println!("documents: {}", server.document_count());
            println!("distinct words: {}", server.word_count());
            Ok(())
        }
    }
}

fn load_base(docs: &Path, config: SearchConfig) -> Result<SearchServer> {
    let start = Instant::now();
    let file = File::open(docs).with_context(|| format!("opening {}", docs.display()))?;
    let server = SearchServer::from_documents(BufReader::new(file), config)?;
    tracing::info!(
        documents = server.document_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "document base loaded"
    );
    Ok(server)
}

fn open_queries(queries: &str) -> Result<Box<dyn BufRead>> {
    if queries == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(queries).with_context(|| format!("opening {queries}"))?;
    Ok(Box::new(BufReader::new(file)))
}

fn run_round<W: Write>(server: &SearchServer, queries: Box<dyn BufRead>, output: W) -> Result<()> {
    let start = Instant::now();
    server.add_queries_stream(queries, output).context("query round failed")?;
    tracing::info!(
        page_size = server.config().page_size,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "query round complete"
    );
    Ok(())
}
