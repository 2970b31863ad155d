use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docsearch_client::{
    ClientConfig, SearchFilter, SearchOrchestrator, SearchOutcome, SuggestionLookup,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Legal document search client", long_about = None)]
struct Args {
    /// Backend origin
    #[arg(long, env = "DOCSEARCH_BASE_URL", default_value = docsearch_client::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory for search history and metrics
    #[arg(long, env = "DOCSEARCH_DATA_DIR", default_value = ".docsearch")]
    data_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search documents
    Search {
        query: String,
        #[arg(short, long)]
        jurisdiction: Vec<String>,
        #[arg(short = 't', long = "type")]
        document_type: Vec<String>,
        #[arg(short, long)]
        court: Vec<String>,
        #[arg(long)]
        min_confidence: Option<f64>,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Fetch query suggestions for a prefix
    Suggest { prefix: String },
    /// Show recent searches
    History,
    /// Erase search history
    ClearHistory,
    /// Show search telemetry
    Metrics,
    /// Source health dashboard
    Health {
        #[arg(long)]
        source: Option<String>,
    },
    /// Backend system status
    Status,
    /// Search pattern analytics
    Patterns {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

fn print_outcome(outcome: &SearchOutcome) {
    let page = outcome.page();
    println!(
        "[{}] {} results, page {}/{}",
        outcome.kind(),
        page.total_count,
        page.page,
        page.total_pages
    );
    println!();

    for doc in &page.documents {
        println!(
            "{}\t{}\t{}",
            doc.id,
            doc.jurisdiction.as_deref().unwrap_or("-"),
            doc.title
        );
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::default()
        .with_base_url(args.base_url)
        .with_data_dir(args.data_dir);
    config.request_timeout = Duration::from_secs(args.timeout_secs);

    let client = SearchOrchestrator::open(config).context("Failed to open client state")?;

    match args.command {
        Command::Search {
            query,
            jurisdiction,
            document_type,
            court,
            min_confidence,
            page,
        } => {
            let mut filter = SearchFilter::new(query);
            filter.jurisdictions.extend(jurisdiction);
            filter.document_types.extend(document_type);
            filter.courts.extend(court);
            filter.min_confidence_score = min_confidence;

            match client.search(filter, page).await {
                Some(outcome) => print_outcome(&outcome),
                None => println!("Query must be at least 2 characters"),
            }
        }
        Command::Suggest { prefix } => {
            let mut updates = client.subscribe_suggestions();
            let suggestions = match client.get_suggestions(&prefix) {
                SuggestionLookup::Ready(list) => list,
                SuggestionLookup::Pending => {
                    updates.changed().await.context("Suggestion channel closed")?;
                    let update = updates.borrow().clone();
                    update.suggestions
                }
            };
            for suggestion in suggestions {
                println!("{}", suggestion);
            }
        }
        Command::History => {
            for entry in client.history() {
                println!(
                    "{}\t{}\t{} results\t{:.0} ms",
                    entry.created_at.format("%Y-%m-%d %H:%M:%S"),
                    entry.query,
                    entry.result_count,
                    entry.execution_time_ms
                );
            }
        }
        Command::ClearHistory => {
            client.clear_history()?;
            println!("Search history cleared");
        }
        Command::Metrics => {
            let metrics = client.metrics();
            println!("Total searches:      {}", metrics.total_searches);
            println!("Successful searches: {}", metrics.successful_searches);
            println!("Success rate:        {:.1}%", metrics.success_rate() * 100.0);
            println!("Average response:    {:.1} ms", metrics.average_response_time_ms);
            println!("Last response:       {:.1} ms", metrics.last_execution_time_ms);
        }
        Command::Health { source } => {
            let monitoring = client.monitoring();
            let payload = match source {
                Some(id) => monitoring.source_health_for(&id).await?,
                None => monitoring.source_health().await?,
            };
            print_json(&payload)?;
        }
        Command::Status => print_json(&client.monitoring().system_status().await?)?,
        Command::Patterns { days } => print_json(&client.monitoring().search_patterns(days).await?)?,
    }

    Ok(())
}
