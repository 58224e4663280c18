use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use precis_common::observability::init_logging;
use precis_core::{Analysis, SentenceExtractor, Summary, checked_count};
use precis_web::PageFetcher;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

mod wiring;

#[derive(Parser)]
#[command(name = "precis", version, about = "Extractive abstracts of web pages")]
struct Cli {
    /// YAML configuration file (default: ./precis.yaml when present)
    #[arg(short, long, global = true, env = "PRECIS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Listen address, overrides `server.bind`
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Summarize one page and print the result as JSON
    Summarize(SummarizeArgs),
}

#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "html"])))]
struct SummarizeArgs {
    /// Page to fetch
    #[arg(long)]
    url: Option<String>,
    /// Local HTML file
    #[arg(long)]
    html: Option<PathBuf>,
    /// Sentences in the classic abstract, overrides `summarizer.abstract_size`
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    abstract_size: Option<i64>,
    /// Also print the page title, scored sentences and the word weight table
    #[arg(long)]
    explain: bool,
}

#[derive(Serialize)]
struct Explained<'a> {
    title: Option<String>,
    summary: &'a Summary,
    analysis: Option<Analysis>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg = wiring::load_config(cli.config.as_deref())?;

    // 2) Logging from the same config
    let log_path = init_logging(cfg.logging.to_log_config("precis"))?;
    tracing::debug!(log_path = %log_path.display(), "app.logging_ready");

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| cfg.server.bind.clone());
            let state = wiring::build_state(&cfg).await?;
            precis_server::start_server(Arc::new(state), &bind).await
        }
        Commands::Summarize(args) => summarize(&cfg, args).await,
    }
}

async fn summarize(cfg: &precis_config::PrecisConfig, args: SummarizeArgs) -> Result<()> {
    let extractor = wiring::build_extractor(cfg)?;
    let abstract_size = match args.abstract_size {
        Some(raw) => checked_count("abstract_size", raw)?,
        None => extractor.config().abstract_size,
    };

    let html = match (&args.url, &args.html) {
        (Some(raw), _) => {
            let url = precis_web::validate_url(raw)?;
            wiring::build_fetcher(cfg)?.fetch(&url).await?
        }
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        (None, None) => anyhow::bail!("either --url or --html is required"),
    };

    println!("{}", render(&extractor, &html, abstract_size, args.explain)?);
    Ok(())
}

fn render(
    extractor: &SentenceExtractor,
    html: &str,
    abstract_size: usize,
    explain: bool,
) -> Result<String> {
    let blocks = precis_web::paragraphs(html);
    let summary = extractor.summarize_with(&blocks, abstract_size);
    tracing::info!(
        paragraphs = blocks.len(),
        too_short = summary.is_too_short(),
        "app.summarize.done"
    );

    let out = if explain {
        serde_json::to_string_pretty(&Explained {
            title: precis_web::title(html),
            summary: &summary,
            analysis: extractor.analyze(&blocks),
        })?
    } else {
        serde_json::to_string_pretty(&summary)?
    };
    Ok(out)
}
