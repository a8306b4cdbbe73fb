use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nces_client::{HtmlParser, ReqwestFetcher};
use nces_core::{
    LocationHints, NcesId, ProfileService, Resolution, ResolverConfig, SearchQuery, SourceType,
};

#[derive(Parser)]
#[command(name = "nces", version, about = "Look up schools in the NCES directories")]
struct Cli {
    /// HTTP request timeout in seconds
    #[arg(long, global = true, env = "NCES_TIMEOUT_SECS", default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a school name and location to its NCES identifier
    Resolve(SearchArgs),

    /// Resolve a school and print its full profile
    Profile(SearchArgs),

    /// Print the profile of a school whose NCES identifier is known
    Lookup {
        /// NCES school identifier
        #[arg(long)]
        id: String,

        /// Directory the identifier belongs to (public or private)
        #[arg(long)]
        source: SourceType,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// School name as it appears in the directory
    #[arg(short, long)]
    name: String,

    #[arg(long)]
    city: Option<String>,

    /// Two-letter state abbreviation
    #[arg(long)]
    state: Option<String>,

    /// Five-digit ZIP code
    #[arg(long)]
    zip: Option<String>,

    /// Directory to search first; public falls back to private
    #[arg(long, default_value = "public")]
    source: SourceType,

    /// Maximum listing pages fetched per directory
    #[arg(long, env = "NCES_MAX_PAGES")]
    max_pages: Option<usize>,
}

impl SearchArgs {
    fn query(&self) -> Result<SearchQuery> {
        let hints = LocationHints::new(
            self.city.as_deref(),
            self.state.as_deref(),
            self.zip.as_deref(),
        );
        SearchQuery::new(&self.name, hints, self.source).map_err(|e| anyhow::anyhow!(e))
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nces=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let fetcher = ReqwestFetcher::with_timeout(Duration::from_secs(cli.timeout))
        .context("Failed to create HTTP client")?;
    tracing::debug!(timeout_secs = fetcher.timeout_secs(), "HTTP client ready");

    match cli.command {
        Commands::Resolve(args) => {
            let service = build_service(fetcher, args.max_pages)?;
            cmd_resolve(&service, &args.query()?).await
        }
        Commands::Profile(args) => {
            let service = build_service(fetcher, args.max_pages)?;
            cmd_profile(&service, &args.query()?).await
        }
        Commands::Lookup { id, source } => {
            let service = build_service(fetcher, None)?;
            let id = NcesId::parse(&id).context("NCES identifier must not be blank")?;
            cmd_lookup(&service, source, &id).await
        }
    }
}

type Service = ProfileService<ReqwestFetcher, HtmlParser>;

fn build_service(fetcher: ReqwestFetcher, max_pages: Option<usize>) -> Result<Service> {
    let mut config = ResolverConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    if let Some(max_pages) = max_pages {
        config = config
            .with_max_pages(max_pages)
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    Ok(ProfileService::new(fetcher, HtmlParser, config))
}

async fn cmd_resolve(service: &Service, query: &SearchQuery) -> Result<ExitCode> {
    let resolution = service
        .resolver()
        .resolve(query)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    match resolution {
        Resolution::NotFound => Ok(not_found(query)),
        found => {
            println!("{}", serde_json::to_string_pretty(&found)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn cmd_profile(service: &Service, query: &SearchQuery) -> Result<ExitCode> {
    let profile = service
        .resolve_profile(query)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    match profile {
        Some(profile) => {
            println!("{}", serde_json::to_string_pretty(&profile)?);
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(not_found(query)),
    }
}

async fn cmd_lookup(service: &Service, source: SourceType, id: &NcesId) -> Result<ExitCode> {
    let profile = service
        .fetch_profile(source, id)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(ExitCode::SUCCESS)
}

fn not_found(query: &SearchQuery) -> ExitCode {
    println!("No NCES school found for \"{}\"", query.name);
    ExitCode::FAILURE
}
