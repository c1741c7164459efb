use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use buyphase::api::{build_router, state::AppState};
use buyphase::cache::ReportCache;
use buyphase::config::AppConfig;
use buyphase::grid::{DataSource, GridClient, GridDataSource};
use buyphase::models::{FieldSupport, TeamRef};
use buyphase::normalize::{parse_offline, TeamMatcher};
use buyphase::report::{analyze_games, fetch_report, render_text, ScoutingReport};

#[derive(Parser)]
#[command(name = "buyphase")]
#[command(about = "Valorant opponent scouting reports from GRID match data")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List teams available for scouting
    Teams,

    /// Build a scouting report for a team
    Report {
        /// GRID team id
        #[arg(long)]
        team: String,

        /// Ignore any cached report
        #[arg(long)]
        refresh: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze games from a local JSON file without contacting GRID
    Analyze {
        /// Normalized games or raw series state JSON
        #[arg(long)]
        input: PathBuf,

        /// Team to scout; required for raw series state
        #[arg(long)]
        team: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Remove every cached report
    ClearCache,
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn grid_source(config: &AppConfig) -> Result<GridDataSource> {
    let client = GridClient::from_config(&config.grid).context("Failed to create GRID client")?;
    Ok(GridDataSource::new(client, &config.grid))
}

fn print_report(report: &ScoutingReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render_text(report));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting buyphase v{}", env!("CARGO_PKG_VERSION"));

    let cache = ReportCache::new(config.cache_dir(), config.cache.ttl());

    match cli.command {
        Commands::Teams => {
            let source = grid_source(&config)?;
            let directory = source.list_teams().await?;

            match &directory.tournament {
                Some(t) => println!("{} ({} teams)", t.name, directory.teams.len()),
                None => println!("{} teams", directory.teams.len()),
            }
            for team in &directory.teams {
                println!("  {:>8}  {}", team.id, team.name);
            }
        }
        Commands::Report {
            team,
            refresh,
            json,
        } => {
            let source = grid_source(&config)?;
            let cached = fetch_report(&source, &cache, &team, refresh).await?;
            if cached.from_cache {
                tracing::info!("Report served from cache (use --refresh to rebuild)");
            }
            print_report(&cached.report, json)?;
        }
        Commands::Analyze { input, team, json } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let matcher = team.as_deref().map(|id| TeamMatcher::new(id).with_name(id));
            let games = parse_offline(&text, matcher.as_ref())?;

            let team_id = team.unwrap_or_else(|| "local".to_string());
            let team = TeamRef {
                id: team_id.clone(),
                name: team_id,
                logo_url: None,
            };
            let report = analyze_games(team, &games, FieldSupport::Unknown, 0);
            print_report(&report, json)?;
        }
        Commands::Serve { host, port } => {
            let source: Arc<dyn DataSource> = Arc::new(grid_source(&config)?);
            let state = AppState::new(source, cache)
                .with_cors_origin(config.server.cors_origin.clone());
            let app = build_router(state);

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::ClearCache => {
            let removed = cache.clear().await?;
            println!("Removed {} cached reports from {}", removed, cache.dir().display());
        }
    }

    Ok(())
}
