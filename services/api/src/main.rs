use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use api::AppState;
use catalog::FilterCriteria;
use common::{ClientConfig, HttpTransport};

#[derive(Parser, Debug)]
#[command(name = "retrorewind")]
#[command(about = "Search the games and movies catalogs", long_about = None)]
struct Cli {
    /// Title to search for
    query: String,

    /// Game, Movie or All
    media_type: Option<String>,

    /// Earliest release year (inclusive)
    year_from: Option<String>,

    /// Latest release year (inclusive)
    year_to: Option<String>,

    /// Case-insensitive platform name fragment
    platform: Option<String>,
}

impl Cli {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_inputs(
            self.media_type.as_deref().unwrap_or(""),
            self.year_from.as_deref().unwrap_or(""),
            self.year_to.as_deref().unwrap_or(""),
            self.platform.as_deref().unwrap_or(""),
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if cli.query.trim().is_empty() {
        anyhow::bail!("query must not be empty");
    }

    let config = ClientConfig::from_env()?;
    info!("Using backend at {}", config.base_url);
    let transport = HttpTransport::new(&config)?;

    let mut app = AppState::new(transport);
    app.search.set_criteria(cli.criteria());
    app.run_search(&cli.query).await;

    if let Some(notice) = app.search.notice() {
        println!("{notice}");
    }
    for item in app.search.items() {
        let year = item.year.as_deref().unwrap_or(catalog::UNKNOWN_YEAR);
        let platforms = item.platforms.join(", ");
        println!("[{}] {} ({}) {}", item.media_type, item.title, year, platforms);
    }
    info!("{} results", app.search.items().len());

    Ok(())
}
