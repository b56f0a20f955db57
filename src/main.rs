use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use lyricstat::analysis;
use lyricstat::collect::{ArtistQuery, Collector, Dataset};
use lyricstat::config::{self, Config};
use lyricstat::genius::{self, GeniusClient};
use lyricstat::storage::Storage;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lyricstat", version, about = "Per-album lyric statistics from Genius")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Genius client access token (overrides config and environment).
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct ArtistArgs {
    /// Artist name, exactly as Genius spells it.
    #[arg(long)]
    artist: Option<String>,

    /// Album to keep (repeatable). Defaults to artist.albums from config.
    #[arg(long = "album")]
    albums: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Collect the dataset (or load it from cache) and print a summary.
    Collect {
        #[command(flatten)]
        who: ArtistArgs,
        /// Ignore the cached dataset and collect again.
        #[arg(long)]
        refresh: bool,
    },
    /// List songs where the artist is the primary artist, without scraping.
    Songs {
        #[command(flatten)]
        who: ArtistArgs,
    },
    /// Print the cached dataset as JSON.
    Show {
        #[command(flatten)]
        who: ArtistArgs,
    },
    /// Print lexical richness per album, plus sentiment and topic mentions
    /// when their model outputs are given.
    Analyze {
        #[command(flatten)]
        who: ArtistArgs,
        /// JSON object mapping song URL to one compound score per lyric line.
        #[arg(long)]
        sentiment: Option<PathBuf>,
        /// JSON file with `labels` and per-song `weights` from a topic model.
        #[arg(long)]
        topics: Option<PathBuf>,
    },
    /// Remove the cached dataset.
    Forget {
        #[command(flatten)]
        who: ArtistArgs,
    },
}

#[derive(Debug, Deserialize)]
struct TopicModel {
    labels: Vec<String>,
    weights: Vec<Vec<f64>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let token = cli.token;

    match cli.command {
        Command::Collect { who, refresh } => {
            let query = cfg.query(who.artist, who.albums)?;
            let dataset = load_or_collect(&cfg, token, &query, refresh).await?;
            print_summary(&dataset, &query);
        }
        Command::Songs { who } => {
            let query = cfg.query(who.artist, who.albums)?;
            let client = make_client(&cfg, token)?;
            let id = genius::resolve_artist_id(&client, &query.artist_name).await?;
            let songs = genius::list_artist_songs(&client, &id, cfg.genius.per_page).await?;
            for (i, s) in songs.iter().enumerate() {
                println!("{:03}. {}  ({})", i + 1, s.title, s.url);
            }
        }
        Command::Show { who } => {
            let query = cfg.query(who.artist, who.albums)?;
            let storage = Storage::open(&cfg.cache_path())?;
            let dataset = storage
                .load(&query.artist_name)?
                .with_context(|| format!("no cached dataset for '{}'", query.artist_name))?;
            println!("{}", serde_json::to_string_pretty(&dataset)?);
        }
        Command::Analyze {
            who,
            sentiment,
            topics,
        } => {
            let query = cfg.query(who.artist, who.albums)?;
            let dataset = load_or_collect(&cfg, token, &query, false).await?;
            print_richness(&dataset, &query);
            if let Some(path) = sentiment {
                print_sentiment(&dataset, &query, &path)?;
            }
            if let Some(path) = topics {
                print_topics(&dataset, &query, &path)?;
            }
        }
        Command::Forget { who } => {
            let query = cfg.query(who.artist, who.albums)?;
            let mut storage = Storage::open(&cfg.cache_path())?;
            if storage.forget(&query.artist_name)? {
                println!("Removed cached dataset for '{}'.", query.artist_name);
            } else {
                println!("Nothing cached for '{}'.", query.artist_name);
            }
        }
    }

    Ok(())
}

fn make_client(cfg: &Config, token: Option<String>) -> anyhow::Result<GeniusClient> {
    let token = cfg.token(token)?;
    GeniusClient::new(&cfg.client_options(token))
}

async fn load_or_collect(
    cfg: &Config,
    token: Option<String>,
    query: &ArtistQuery,
    refresh: bool,
) -> anyhow::Result<Dataset> {
    let mut storage = Storage::open(&cfg.cache_path())?;
    if !refresh && let Some(dataset) = storage.load(&query.artist_name)? {
        info!("using cached dataset for '{}' ({} songs)", query.artist_name, dataset.len());
        return Ok(dataset);
    }

    let collector = Collector::new(make_client(cfg, token)?, &cfg.collect_options())?;
    let dataset = collector
        .collect(query)
        .await
        .with_context(|| format!("collect '{}'", query.artist_name))?;

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    storage.store(&query.artist_name, &dataset, now)?;
    Ok(dataset)
}

fn print_summary(dataset: &Dataset, query: &ArtistQuery) {
    println!("{}: {} songs", query.artist_name, dataset.len());
    for (album, songs) in dataset.by_album(&query.album_allowlist) {
        println!("  {:<40} {:>4}", album, songs.len());
    }
}

fn print_richness(dataset: &Dataset, query: &ArtistQuery) {
    println!("{:<40} {:>6} {:>8} {:>9}", "Album", "Songs", "Words", "Richness");
    let counts = dataset.by_album(&query.album_allowlist);
    for (r, (_, songs)) in analysis::lexical_richness(dataset, &query.album_allowlist)
        .iter()
        .zip(counts)
    {
        let richness = r
            .richness
            .map(|v| format!("{v:.1}%"))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<40} {:>6} {:>8} {:>9}", r.album, songs.len(), r.total_words, richness);
    }
}

fn print_sentiment(dataset: &Dataset, query: &ArtistQuery, path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let scores: analysis::LineScores =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    let rows = analysis::sentiment_from_scores(dataset, &query.album_allowlist, &scores)?;

    println!();
    println!("{:<40} {:>6} {:>9} {:>9} {:>9}", "Album", "Lines", "Positive", "Neutral", "Negative");
    for r in rows {
        println!(
            "{:<40} {:>6} {:>8.1}% {:>8.1}% {:>8.1}%",
            r.album, r.lines, r.positive, r.neutral, r.negative
        );
    }
    Ok(())
}

fn print_topics(dataset: &Dataset, query: &ArtistQuery, path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let model: TopicModel =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    let rows = analysis::topic_prevalence(dataset, &query.album_allowlist, &model.weights, &model.labels)?;

    println!();
    print!("{:<40}", "Album");
    for label in &model.labels {
        print!(" {:>12}", label);
    }
    println!();
    for row in rows {
        print!("{:<40}", row.album);
        for n in row.mentions {
            print!(" {:>12}", n);
        }
        println!();
    }
    Ok(())
}
