use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pagechunk::{
    content_hash, discover_documents, Assembler, Chunk, ChunkReport, ChunkStore, ChunkerConfig,
    ConfigOverrides, DocumentRecord, OversizedPagePolicy, SourceRegistry,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "pagechunk", version)]
#[command(about = "Split extracted document pages into bounded, overlapping chunks", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chunk a document, or every supported document under a directory
    Chunk {
        path: PathBuf,

        /// Maximum estimated tokens per chunk [env: MAX_TOKENS, default 700]
        #[arg(long)]
        max_tokens: Option<usize>,

        /// Units carried into the next chunk [env: OVERLAP_SENTENCES, default 1]
        #[arg(long)]
        overlap: Option<usize>,

        /// detached | flush_buffer [env: OVERSIZED_PAGE_POLICY]
        #[arg(long)]
        oversized_page: Option<OversizedPagePolicy>,

        /// Print chunks as JSON
        #[arg(long)]
        json: bool,

        /// SQLite file to store chunks in. An unchanged file at the same path
        /// keeps its document id
        #[arg(long)]
        store: Option<PathBuf>,

        /// Identifier to store the document under (single document only)
        #[arg(long)]
        document_id: Option<String>,
    },

    /// Print the stored chunks of a document in order
    Show {
        db: PathBuf,
        document_id: String,

        #[arg(long)]
        json: bool,
    },

    /// Summarize a chunk store
    Stats { db: PathBuf },
}

#[derive(Serialize)]
struct DocumentOutput {
    document_id: String,
    source: String,
    report: ChunkReport,
    chunks: Vec<Chunk>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Chunk {
            path,
            max_tokens,
            overlap,
            oversized_page,
            json,
            store,
            document_id,
        } => {
            let config = ChunkerConfig::from_env_with(ConfigOverrides {
                max_tokens,
                overlap_units: overlap,
                oversized_page,
            })
            .context("Invalid chunker configuration")?;

            run_chunk(&path, config, json, store.as_deref(), document_id)
        }
        Command::Show {
            db,
            document_id,
            json,
        } => run_show(&db, &document_id, json),
        Command::Stats { db } => run_stats(&db),
    }
}

fn run_chunk(
    path: &Path,
    config: ChunkerConfig,
    json: bool,
    store_path: Option<&Path>,
    document_id: Option<String>,
) -> Result<()> {
    let start_time = Instant::now();
    let registry = SourceRegistry::new();
    let assembler = Assembler::new(config)?;

    let documents = discover_documents(path, &registry)
        .context(format!("Failed to read {}", path.display()))?;

    if document_id.is_some() && documents.len() > 1 {
        bail!(
            "--document-id needs a single document, found {} under {}",
            documents.len(),
            path.display()
        );
    }

    let mut store = match store_path {
        Some(db) => Some(open_store(db)?),
        None => None,
    };

    info!(
        documents = documents.len(),
        max_tokens = config.max_tokens,
        overlap = config.overlap_units,
        "chunking"
    );

    let mut outputs = Vec::new();

    for document in &documents {
        let source = document.display().to_string();
        let pages = registry
            .load(document)
            .context(format!("Failed to load pages from {}", source))?;
        let chunks = assembler
            .assemble(&pages)
            .context(format!("Failed to chunk {}", source))?;
        let report = ChunkReport::from_chunks(&chunks, config.max_tokens);

        if report.over_budget > 0 {
            warn!(
                document = %source,
                chunks = report.over_budget,
                "chunks exceed the token budget because a single sentence is too long"
            );
        }

        let id = match &mut store {
            Some(store) => {
                // Re-chunking an unchanged file replaces its earlier run
                let id = match &document_id {
                    Some(id) => id.clone(),
                    None => store
                        .find_matching(&source, &content_hash(&pages))?
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                };
                store.insert_document(&DocumentRecord::new(&id, &source, &pages))?;
                store.insert_chunks(&id, &chunks)?;
                id
            }
            None => document_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        };

        outputs.push(DocumentOutput {
            document_id: id,
            source,
            report,
            chunks,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
        return Ok(());
    }

    for output in &outputs {
        print_document(output);
    }

    let total_chunks: usize = outputs.iter().map(|o| o.report.chunk_count).sum();
    let total_tokens: usize = outputs.iter().map(|o| o.report.total_tokens).sum();
    println!("=== Run Statistics ===");
    println!("Documents:            {}", outputs.len());
    println!("Total chunks:         {}", total_chunks);
    println!("Total tokens:         {}", total_tokens);
    println!(
        "Avg tokens/chunk:     {:.1}",
        if total_chunks > 0 {
            total_tokens as f64 / total_chunks as f64
        } else {
            0.0
        }
    );
    println!("Max tokens/chunk:     {}", config.max_tokens);
    println!("Overlap units:        {}", config.overlap_units);
    if let Some(db) = store_path {
        println!("Stored in:            {}", db.display());
    }
    println!("Total execution:      {:.3}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

fn print_document(output: &DocumentOutput) {
    println!(
        "{} [{}] - {} chunks, avg {:.0} tokens/chunk",
        output.source, output.document_id, output.report.chunk_count, output.report.avg_tokens
    );
    for chunk in &output.chunks {
        print_chunk(chunk);
    }
    println!();
}

fn print_chunk(chunk: &Chunk) {
    let preview: String = chunk.text.chars().take(72).collect();
    let ellipsis = if chunk.text.chars().count() > 72 { "…" } else { "" };
    println!(
        "  #{:<3} pages {}-{} ({} tokens): {}{}",
        chunk.order, chunk.start_page, chunk.end_page, chunk.token_count, preview, ellipsis
    );
}

fn open_store(db: &Path) -> Result<ChunkStore> {
    let path = db
        .to_str()
        .context(format!("Database path is not valid UTF-8: {}", db.display()))?;
    ChunkStore::open(path)
}

fn run_show(db: &Path, document_id: &str, json: bool) -> Result<()> {
    let store = open_store(db)?;
    let Some(document) = store.get_document(document_id)? else {
        bail!("No document {} in {}", document_id, db.display());
    };
    let chunks = store.get_chunks(document_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
        return Ok(());
    }

    println!(
        "{} [{}] - {} pages, {} chunks, stored {}",
        document.source,
        document.id,
        document.page_count,
        chunks.len(),
        document.created_at
    );
    for chunk in &chunks {
        print_chunk(chunk);
    }
    Ok(())
}

fn run_stats(db: &Path) -> Result<()> {
    let store = open_store(db)?;
    let stats = store.get_stats()?;

    println!("=== Store Statistics ===");
    println!("Documents:            {}", stats.document_count);
    println!("Chunks:               {}", stats.chunk_count);
    println!("Total tokens:         {}", stats.total_tokens);

    for document in store.list_documents()? {
        println!(
            "  {} {} ({} pages, {})",
            document.id, document.source, document.page_count, document.created_at
        );
    }
    Ok(())
}
