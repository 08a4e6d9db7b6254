//! CLI entry point for the FPL league statistics tool.
//!
//! Provides subcommands for fetching a league's season from the FPL API,
//! building the player name mapping, and running the season analysis.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use fpl_league_stats::analyzers::analyzer::{AnalyzeOptions, analyze};
use fpl_league_stats::analyzers::forecast::DEFAULT_WEEKS_AHEAD;
use fpl_league_stats::collector::collect_season;
use fpl_league_stats::config::{DEFAULT_BASE_URL, FetchConfig};
use fpl_league_stats::fetch::auth::HeaderAuth;
use fpl_league_stats::fetch::{BasicClient, HttpClient, fetch_bytes};
use fpl_league_stats::infra::fpl::client::FplClient;
use fpl_league_stats::output::{print_json, write_json, write_season_csv};
use fpl_league_stats::players::identities_from_bootstrap;
use fpl_league_stats::record::SEASON_GAMEWEEKS;
use fpl_league_stats::report::season_label;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "fpl_league_stats")]
#[command(about = "Season statistics and awards for an FPL classic league", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every team's gameweeks from the FPL API into a season CSV
    Fetch {
        /// Classic league id
        #[arg(long, env = "FPL_LEAGUE_ID")]
        league_id: u64,

        /// Session cookie of a logged-in FPL account
        #[arg(long, env = "FPL_COOKIE", hide_env_values = true)]
        cookie: Option<String>,

        /// Season CSV to write (a .gz extension compresses it)
        #[arg(short, long, default_value = "csv/fpl_season_data.csv")]
        output: PathBuf,

        /// Number of gameweeks to fetch, starting at 1
        #[arg(short = 'n', long, default_value_t = SEASON_GAMEWEEKS)]
        num_gameweeks: u32,

        /// Pause after every request, in milliseconds
        #[arg(long, default_value_t = 300)]
        delay_ms: u64,

        /// Retries for rate-limited or failed requests
        #[arg(long, default_value_t = 3)]
        max_retries: u32,

        #[arg(long, env = "FPL_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,
    },
    /// Build the player id to name mapping from bootstrap-static data
    MapPlayers {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL", default_value = "https://fantasy.premierleague.com/api/bootstrap-static/")]
        source: String,

        /// Mapping file to write
        #[arg(short, long, default_value = "json/players.json")]
        output: PathBuf,
    },
    /// Compute season statistics, forecasts and awards
    Analyze {
        /// Season CSV produced by `fetch`
        #[arg(short, long, default_value = "csv/fpl_season_data.csv")]
        season: PathBuf,

        /// Player mapping produced by `map-players`
        #[arg(short, long, default_value = "json/players.json")]
        players: PathBuf,

        /// Directory for the JSON tables and the awards document
        #[arg(short = 'd', long, default_value = "output")]
        output_dir: PathBuf,

        /// Gameweeks to forecast
        #[arg(short, long, default_value_t = DEFAULT_WEEKS_AHEAD)]
        weeks_ahead: u32,

        /// Season label for the awards document, e.g. 2025/2026
        #[arg(long)]
        label: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/fpl_league_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fpl_league_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            league_id,
            cookie,
            output,
            num_gameweeks,
            delay_ms,
            max_retries,
            base_url,
        } => {
            let mut config = FetchConfig::new(league_id, num_gameweeks);
            config.base_url = base_url;
            config.request_delay = Duration::from_millis(delay_ms);
            config.max_retries = max_retries;

            let http = BasicClient::new(config.timeout).context("building HTTP client")?;
            match cookie.filter(|c| !c.trim().is_empty()) {
                Some(cookie) => {
                    let http = HeaderAuth::cookie(http, cookie.trim())
                        .context("FPL_COOKIE is not a valid header value")?;
                    fetch_season(http, config, &output).await?;
                }
                None => {
                    warn!("FPL_COOKIE not set, private leagues will be rejected");
                    fetch_season(http, config, &output).await?;
                }
            }
        }
        Commands::MapPlayers { source, output } => {
            let bytes = fetcher(&source).await?;
            let players = identities_from_bootstrap(&bytes)?;
            let dir = output.parent().unwrap_or(Path::new("."));
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            let name = output
                .file_name()
                .and_then(OsStr::to_str)
                .context("output must name a file")?;
            let path = write_json(dir, name, &players)?;
            info!(players = players.len(), path = %path.display(), "Saved player mapping");
        }
        Commands::Analyze {
            season,
            players,
            output_dir,
            weeks_ahead,
            label,
        } => {
            let options = AnalyzeOptions {
                weeks_ahead,
                season: label.unwrap_or_else(|| season_label(Utc::now().date_naive())),
            };
            analyze(&season, &players, &output_dir, &options)?;
        }
    }

    Ok(())
}

/// Collects the season through `http` and writes the season table.
#[tracing::instrument(skip(http, config, output), fields(league_id = config.league_id, output = %output.display()))]
async fn fetch_season<C: HttpClient>(http: C, config: FetchConfig, output: &Path) -> Result<()> {
    let api = FplClient::new(http, config.clone());
    let season = collect_season(&api, &config).await?;

    write_season_csv(output, &season.records)?;
    if !season.skipped.is_empty() {
        warn!(count = season.skipped.len(), "Some gameweeks are missing from season data");
        print_json(&season.skipped)?;
    }
    info!(rows = season.records.len(), skipped = season.skipped.len(), "Season fetch complete");
    Ok(())
}

/// Loads data from a local file path or fetches it over HTTP.
#[tracing::instrument]
async fn fetcher(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new(Duration::from_secs(30))?;
        fetch_bytes(&client, source).await?
    } else {
        std::fs::read(source).with_context(|| format!("reading {source}"))?
    };
    Ok(bytes)
}
