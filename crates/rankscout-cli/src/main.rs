use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use rankscout_core::QueryType;
use rankscout_engine::summarize::{SummarizationQueue, SummarizerClient};
use rankscout_engine::{TaskOrchestrator, WorkflowContext};
use rankscout_provider::{ProviderClient, ProviderCodes, RateLimiter};

#[derive(Debug, Parser)]
#[command(name = "rankscout")]
#[command(about = "SEO research orchestration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a research workflow end to end.
    Research {
        #[command(subcommand)]
        research: ResearchCommand,
    },
    /// Show a query's status, tasks, datasets, and insight.
    Status {
        /// Query id returned by a research command.
        query_id: Uuid,
    },
    /// List the most recent research queries.
    Recent {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[derive(Debug, Subcommand)]
enum ResearchCommand {
    /// Discover and score keywords from seed terms.
    Keywords(KeywordsArgs),
    /// Analyze the results page for one keyword.
    Serp(SerpArgs),
    /// Profile competitors and classify keyword gaps.
    Competitors(CompetitorsArgs),
}

#[derive(Debug, Args)]
struct KeywordsArgs {
    /// Seed keyword; repeat for several.
    #[arg(long = "seed", required = true)]
    seeds: Vec<String>,
    /// Drop keywords below this monthly search volume.
    #[arg(long)]
    min_volume: Option<i64>,
    /// Cap the number of keyword ideas requested.
    #[arg(long)]
    limit: Option<u32>,
    /// Also run the AI summarization stage.
    #[arg(long)]
    deep: bool,
}

#[derive(Debug, Args)]
struct SerpArgs {
    #[arg(long)]
    keyword: String,
    /// Also run the AI summarization stage.
    #[arg(long)]
    deep: bool,
}

#[derive(Debug, Args)]
struct CompetitorsArgs {
    /// Your own domain.
    #[arg(long)]
    target: String,
    /// Competitor domain; repeat for several.
    #[arg(long = "competitor", required = true)]
    competitors: Vec<String>,
    /// Also run the AI summarization stage.
    #[arg(long)]
    deep: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = rankscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = rankscout_db::PoolConfig::from_app_config(&config);
    let pool = rankscout_db::connect_pool(&config.database_url, pool_config).await?;
    rankscout_db::run_migrations(&pool).await?;

    let provider = ProviderClient::with_base_url(
        &config.provider_login,
        &config.provider_password,
        config.provider_timeout_secs,
        ProviderCodes {
            success: config.provider_success_code,
            error_threshold: config.provider_error_threshold,
        },
        &config.provider_base_url,
    )?;
    let limiter = RateLimiter::new(config.rate_limit_per_minute, config.rate_limit_per_hour);
    let orchestrator = Arc::new(TaskOrchestrator::new(provider, limiter));

    let summarizer = SummarizationQueue::new(SummarizerClient::new(
        &config.summarizer_base_url,
        config.summarizer_api_key.clone(),
        &config.summarizer_model,
        config.summarizer_timeout_secs,
    )?);

    let _scheduler = rankscout_engine::build_scheduler(
        Arc::clone(&orchestrator),
        summarizer.clone(),
        Duration::from_secs(config.ledger_retention_secs),
    )
    .await?;

    let ctx = WorkflowContext {
        pool: pool.clone(),
        orchestrator,
        summarizer,
    };

    let cli = Cli::parse();
    match cli.command {
        Commands::Research { research } => {
            let (query_type, params) = build_request(research);
            tracing::info!(query_type = %query_type, "starting research run");
            let query = rankscout_engine::run_query(&ctx, query_type, params).await?;
            print_query(&query);
            if query.status == "failed" {
                anyhow::bail!("query {} failed", query.id);
            }
        }
        Commands::Status { query_id } => {
            let query = rankscout_db::get_research_query(&pool, query_id).await?;
            print_query(&query);
            for task in rankscout_db::list_tasks_for_query(&pool, query_id).await? {
                println!(
                    "task {} [{}] status={} provider_id={}",
                    task.id, task.kind, task.status, task.provider_task_id
                );
            }
            for dataset in rankscout_db::list_datasets_for_query(&pool, query_id).await? {
                println!("dataset: {} ({})", dataset.name, dataset.kind);
                println!("{}", serde_json::to_string_pretty(&dataset.data)?);
            }
            if let Some(insight) = rankscout_db::get_insight_for_query(&pool, query_id).await? {
                println!("insight: {}", insight.summary);
            }
        }
        Commands::Recent { limit } => {
            for query in rankscout_db::list_recent_queries(&pool, limit).await? {
                print_query(&query);
            }
        }
    }

    Ok(())
}

fn build_request(research: ResearchCommand) -> (QueryType, serde_json::Value) {
    match research {
        ResearchCommand::Keywords(args) => (
            QueryType::KeywordDiscovery,
            serde_json::json!({
                "seed_keywords": args.seeds,
                "min_search_volume": args.min_volume,
                "limit": args.limit,
                "depth": depth(args.deep),
            }),
        ),
        ResearchCommand::Serp(args) => (
            QueryType::SerpAnalysis,
            serde_json::json!({
                "keyword": args.keyword,
                "depth": depth(args.deep),
            }),
        ),
        ResearchCommand::Competitors(args) => (
            QueryType::CompetitorResearch,
            serde_json::json!({
                "target": args.target,
                "competitors": args.competitors,
                "depth": depth(args.deep),
            }),
        ),
    }
}

fn depth(deep: bool) -> &'static str {
    if deep {
        "deep"
    } else {
        "standard"
    }
}

fn print_query(query: &rankscout_db::ResearchQueryRow) {
    println!(
        "query {} [{}] status={} progress={}%",
        query.id, query.query_type, query.status, query.progress
    );
    if let Some(error) = &query.error_message {
        println!("error: {error}");
    }
}
