//! Dex Explorer - command line front end
//!
//! Resolves one catalog page (or one entity) through the cached explorer
//! and prints it as JSON.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dex_explorer::domain::value_objects::is_known_category;
use dex_explorer::{AppConfig, AppState, EntityId, QueryParams};

#[derive(Debug, Parser)]
#[command(name = "dex-explorer", about = "Browse the PokeAPI creature catalog")]
struct Cli {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Restrict the list to one category (type)
    #[arg(long = "type")]
    category: Option<String>,

    /// Search by exact name/id, then by name fragment
    #[arg(long)]
    search: Option<String>,

    /// Show the details of one entity instead of a page
    #[arg(long, conflicts_with_all = ["category", "search", "page"])]
    id: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dex_explorer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Catalog API: {}", config.api_base_url);
    tracing::info!("  Page size: {}", config.page_size);

    let state = AppState::new(config);

    let output = if let Some(id) = cli.id {
        let query = state.explorer.details(Some(EntityId::new(id))).await;
        match (query.data, query.error) {
            (Some(entity), _) => serde_json::to_string_pretty(entity.as_ref())?,
            (None, Some(e)) => anyhow::bail!("Failed to load entity {}: {}", id, e),
            (None, None) => anyhow::bail!("No data for entity {}", id),
        }
    } else {
        if let Some(category) = cli.category.as_deref() {
            if !is_known_category(category) {
                tracing::warn!("Unknown category '{}'", category);
            }
        }
        let mut params =
            QueryParams::first_page(state.config.page_size).with_category(cli.category);
        if let Some(search) = cli.search {
            params = params.with_search(search);
        }
        let params = params.with_page(cli.page);

        let query = state.explorer.list_page(params.clone()).await;
        match (query.data, query.error) {
            (Some(page), _) => {
                tracing::info!(
                    "Page {}: {} of {} entities (next: {}, previous: {})",
                    params.page,
                    page.items.len(),
                    page.total,
                    page.has_next,
                    page.has_previous
                );
                serde_json::to_string_pretty(page.as_ref())?
            }
            (None, Some(e)) => anyhow::bail!("Failed to load page {}: {}", params.page, e),
            (None, None) => anyhow::bail!("No data for page {}", params.page),
        }
    };

    println!("{}", output);

    Ok(())
}
