use std::collections::HashSet;
use std::env;

use indicatif::{ProgressBar, ProgressStyle};

use docchat_chat::{OpenAiChat, DEFAULT_CHAT_MODEL};
use docchat_core::chunker::ChunkOptions;
use docchat_core::config::{expand_path, Config};
use docchat_core::types::{ChatMessage, Role};
use docchat_embed::{default_provider, DEFAULT_BASE_URL};
use docchat_pipeline::{list_documents, ChatEngine, IngestPipeline};
use docchat_vector::ChromaStore;

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <ingest|chat> [args...]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn chunk_options(config: &Config) -> ChunkOptions {
    let defaults = ChunkOptions::default();
    ChunkOptions {
        max_chunk_size: config.get_or("chunking.max_chunk_size", defaults.max_chunk_size),
        overlap: config.get_or("chunking.overlap", defaults.overlap),
    }
}

async fn connect_store(config: &Config) -> anyhow::Result<ChromaStore> {
    let url: String = config.get_or("chroma.url", "http://localhost:8000".to_string());
    let collection: String = config.get_or("chroma.collection", "documents".to_string());
    Ok(ChromaStore::connect(&url, &collection).await?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let (cmd, args) = parse_args();
    let rt = tokio::runtime::Runtime::new()?;

    match cmd.as_str() {
        "ingest" => {
            let target = args.first().map(expand_path).unwrap_or_else(|| {
                let dir: String = config.get_or("data.docs_dir", "./docs".to_string());
                expand_path(dir)
            });
            rt.block_on(async {
                let embedder = default_provider(&config)?;
                let store = connect_store(&config).await?;
                let pipeline = IngestPipeline::new(embedder, store, chunk_options(&config));

                if target.is_dir() {
                    let files = list_documents(&target);
                    if files.is_empty() {
                        println!("No ingestable files under {}.", target.display());
                        return Ok(());
                    }
                    let pb = ProgressBar::new(files.len() as u64);
                    pb.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")?
                            .progress_chars("#>-"),
                    );
                    let mut total_chunks = 0usize;
                    for file in files {
                        pb.set_message(file.display().to_string());
                        let report = pipeline.ingest_file(&file).await?;
                        total_chunks += report.chunk_count;
                        pb.inc(1);
                    }
                    pb.finish_with_message("ingest complete");
                    println!("Ingested {} chunks", total_chunks);
                } else {
                    let report = pipeline.ingest_file(&target).await?;
                    println!("Ingested '{}' as {} chunks", report.source, report.chunk_count);
                }
                Ok::<_, anyhow::Error>(())
            })?;
        }
        "chat" => {
            let question = args.first().cloned().unwrap_or_else(|| {
                eprintln!("Usage: docchat chat \"<question>\"");
                std::process::exit(1)
            });
            rt.block_on(async {
                let embedder = default_provider(&config)?;
                let store = connect_store(&config).await?;
                let api_key: String = config.get("openai.api_key")?;
                let model: String = config.get_or("chat.model", DEFAULT_CHAT_MODEL.to_string());
                let base_url: String =
                    config.get_or("openai.base_url", DEFAULT_BASE_URL.to_string());
                let chat = OpenAiChat::new(api_key, model, base_url);

                let engine = ChatEngine::new(embedder, store, chat);
                let reply = engine
                    .answer(&[ChatMessage {
                        role: Role::User,
                        content: question,
                    }])
                    .await?;

                println!("{}", reply.response);
                if !reply.sources.is_empty() {
                    println!();
                    println!("Sources:");
                    let mut seen = HashSet::new();
                    for chunk in &reply.sources {
                        let label = format!(
                            "{} (lines {}-{})",
                            chunk.metadata.source,
                            chunk.metadata.start_line,
                            chunk.metadata.end_line
                        );
                        if seen.insert(label.clone()) {
                            println!("  - {}", label);
                        }
                    }
                }
                Ok::<_, anyhow::Error>(())
            })?;
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            std::process::exit(1);
        }
    }
    Ok(())
}
