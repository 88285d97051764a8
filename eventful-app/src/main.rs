use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use eventful_common::observability::{LogConfig, init_logging};
use eventful_config::{EventfulConfig, EventfulConfigLoader};
use eventful_search::{DateFilterPolicy, EventfulClient, SearchQuery};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "eventful", about = "Search Eventful for upcoming events")]
struct Cli {
    /// YAML config file; `EVENTFUL__*` env vars override it.
    #[arg(long, env = "EVENTFUL_CONFIG", default_value = "eventful.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print the result page as JSON
    Search(SearchArgs),
}

#[derive(clap::Args)]
struct SearchArgs {
    #[arg(long, short)]
    keywords: String,
    /// Date expression, e.g. "Future" or "This Week"
    #[arg(long, default_value = "")]
    date: String,
    #[arg(long, short)]
    location: Option<String>,
    /// Radius in miles around the location
    #[arg(long, allow_negative_numbers = true)]
    within: Option<i64>,
    /// relevance, date, popularity, title or venue_name
    #[arg(long)]
    sort_order: Option<String>,
    /// Overrides `date_filter_policy` from the config
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Legacy,
    WhenPresent,
}

impl From<PolicyArg> for DateFilterPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Legacy => Self::Legacy,
            PolicyArg::WhenPresent => Self::WhenPresent,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg: EventfulConfig = EventfulConfigLoader::new()
        .with_optional_file(&cli.config)
        .load()?;

    // 2) Logging from the config's `logging` block
    let log_path = init_logging(LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.stderr.unwrap_or(false),
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone().unwrap_or_else(|| "info".into()),
        ..LogConfig::default()
    })?;
    tracing::debug!(log_path = %log_path.display(), "eventful.startup");

    match cli.command {
        Commands::Search(args) => run_search(&cfg, args).await,
    }
}

async fn run_search(cfg: &EventfulConfig, args: SearchArgs) -> Result<()> {
    let client = build_client(cfg, args.policy.map(Into::into))?;
    let query = SearchQuery::new(args.keywords)
        .date(args.date)
        .location(
            args.location
                .or_else(|| cfg.defaults.location.clone())
                .unwrap_or_default(),
        )
        .radius(args.within.or(cfg.defaults.within).unwrap_or(0))
        .sort_order(
            args.sort_order
                .or_else(|| cfg.defaults.sort_order.clone())
                .unwrap_or_else(|| "relevance".into()),
        );

    let page = client.search(&query).await?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

fn build_client(cfg: &EventfulConfig, policy: Option<DateFilterPolicy>) -> Result<EventfulClient> {
    let client = match cfg.timeout_secs {
        Some(secs) => EventfulClient::with_timeout(cfg.api_key.trim(), Duration::from_secs(secs))?,
        None => EventfulClient::new(cfg.api_key.trim())?,
    };
    Ok(client
        .with_endpoint(&cfg.endpoint)?
        .with_date_filter_policy(policy.unwrap_or(cfg.date_filter_policy)))
}
