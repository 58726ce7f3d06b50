//! anistream command line: browse the catalog and resolve playable
//! streams with ordered provider fallback.

mod sink;

use std::sync::Arc;

use anistream_core::catalog::CatalogClient;
use anistream_core::config::Config;
use anistream_core::logging::init_logging;
use anistream_core::model::{Title, TitleId};
use anistream_core::provider::{ProviderRegistry, RegisteredProvider, StreamProvider};
use anistream_core::session::{PlaybackController, SessionEvent, SessionPhase};
use anistream_providers::{AniListCatalog, ConsumetProvider};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use crate::sink::HandoffSink;

#[derive(Parser)]
#[command(name = "anistream", version, about = "Resolve anime streams with provider fallback")]
struct Cli {
    /// Path to a YAML config file.
    #[arg(short, long, env = "ANISTREAM_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show trending and popular titles.
    Browse,
    /// Search the catalog.
    Search { query: String },
    /// Show detail for one title.
    Info { title_id: i64 },
    /// Resolve a playable stream for a title.
    Play {
        title_id: i64,
        /// Episode number to play; defaults to the first.
        #[arg(short, long)]
        episode: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Err(problems) = config.validate() {
        anyhow::bail!("invalid configuration:\n  {}", problems.join("\n  "));
    }
    init_logging(&config.logging)?;

    let catalog: Arc<dyn CatalogClient> = Arc::new(AniListCatalog::new(config.catalog.url.clone()));

    match cli.command {
        Command::Browse => browse(catalog.as_ref()).await,
        Command::Search { query } => search(catalog.as_ref(), &query).await,
        Command::Info { title_id } => info(catalog.as_ref(), TitleId(title_id)).await,
        Command::Play { title_id, episode } => {
            play(&config, catalog, TitleId(title_id), episode).await
        }
    }
}

async fn browse(catalog: &dyn CatalogClient) -> anyhow::Result<()> {
    let (trending, popular) = tokio::try_join!(catalog.trending(), catalog.popular())
        .context("fetching catalog listings")?;

    println!("Trending");
    print_titles(&trending);
    println!();
    println!("Popular");
    print_titles(&popular);
    Ok(())
}

async fn search(catalog: &dyn CatalogClient, query: &str) -> anyhow::Result<()> {
    let results = catalog
        .search(query)
        .await
        .with_context(|| format!("searching for {query:?}"))?;

    if results.is_empty() {
        println!("No results for {query:?}");
    } else {
        print_titles(&results);
    }
    Ok(())
}

async fn info(catalog: &dyn CatalogClient, id: TitleId) -> anyhow::Result<()> {
    let detail = catalog
        .info(id)
        .await
        .with_context(|| format!("fetching detail for title {id}"))?;

    if let Some(name) = detail.display_name {
        println!("{name}");
    }
    if let Some(count) = detail.episode_count_hint {
        println!("Episodes: {count}");
    }
    if let Some(description) = detail.description {
        println!("{description}");
    }
    Ok(())
}

async fn play(
    config: &Config,
    catalog: Arc<dyn CatalogClient>,
    id: TitleId,
    episode_number: Option<u32>,
) -> anyhow::Result<()> {
    let registry = Arc::new(build_registry(config)?);
    let mut controller = PlaybackController::new(
        registry,
        catalog,
        Arc::new(HandoffSink),
        config.retry.policy(),
    );
    let (tx, mut rx) = mpsc::unbounded_channel();
    controller.set_event_sender(tx);

    controller.open_title(Title::from_id(id)).await;

    if let Some(number) = episode_number {
        let episode = controller
            .snapshot()
            .episodes
            .iter()
            .find(|e| e.number == number)
            .map(|e| e.id.clone())
            .with_context(|| format!("title {id} has no episode {number}"))?;
        controller.load_episode(episode).await;
    }

    while let Ok(event) = rx.try_recv() {
        report(&event);
    }

    let snapshot = controller.snapshot();
    match snapshot.phase {
        SessionPhase::Playing => Ok(()),
        SessionPhase::ErrorTerminal => {
            anyhow::bail!("no provider could supply a playable stream")
        }
        phase => anyhow::bail!("session ended in unexpected phase {phase:?}"),
    }
}

fn build_registry(config: &Config) -> anyhow::Result<ProviderRegistry> {
    let entries = config
        .providers
        .iter()
        .map(|provider| RegisteredProvider {
            descriptor: provider.descriptor(),
            provider: Arc::new(ConsumetProvider::new(
                provider.episodes_url.clone(),
                provider.watch_url.clone(),
            )) as Arc<dyn StreamProvider>,
        })
        .collect();
    ProviderRegistry::new(entries).context("building provider registry")
}

fn print_titles(titles: &[Title]) {
    for title in titles {
        match title.episode_count_hint {
            Some(count) => println!("  {}  {} ({count} eps)", title.id, title.display_name),
            None => println!("  {}  {}", title.id, title.display_name),
        }
    }
}

fn report(event: &SessionEvent) {
    match event {
        SessionEvent::EpisodesLoaded {
            count,
            placeholders,
            ..
        } => {
            if *placeholders {
                println!("No episode catalog available; assuming {count} episodes");
            } else {
                println!("{count} episodes");
            }
        }
        SessionEvent::PlaybackStarted {
            episode, provider, ..
        } => {
            println!("Playing {episode} via {provider}");
        }
        SessionEvent::ProviderFallback {
            from_provider,
            to_provider,
            ..
        } => {
            println!("{from_provider} failed, trying {to_provider}");
        }
        SessionEvent::SessionFailed {
            attempts,
            external_url,
        } => {
            println!("All providers failed:");
            for attempt in attempts {
                println!("  {}: {:?}", attempt.provider_name, attempt.outcome);
            }
            println!("Try the provider site directly: {external_url}");
        }
        SessionEvent::RetryScheduled { .. } | SessionEvent::SessionClosed => {}
    }
}
