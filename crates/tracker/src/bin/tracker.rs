use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use storage::{
    Database, UserStore,
    dto::sync::SyncReport,
    models::TierWeights,
    services::{baseline, leaderboard},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracker::{DEFAULT_GRAPHQL_URL, LeetCodeClient, SyncContext, SyncOptions};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "LeetCode progress tracker: sync, reset and inspect the leaderboard", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "LEETCODE_GRAPHQL_URL", default_value = DEFAULT_GRAPHQL_URL)]
    graphql_url: String,

    /// Minimum spacing between LeetCode calls
    #[arg(long, env = "RATE_LIMIT_DELAY_MS", default_value_t = 1000)]
    delay_ms: u64,

    #[arg(long, env = "SYNC_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a user's counts without storing anything
    Fetch { username: String },
    #[command(flatten)]
    Stored(StoredCommand),
}

/// Commands that need the database.
#[derive(Subcommand)]
enum StoredCommand {
    /// Refresh every tracked user
    SyncAll,
    /// Refresh one user by id
    SyncUser { id: Uuid },
    /// Set every baseline to the current counts
    ResetBaselines,
    /// Print the leaderboard
    List {
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },
    /// Enroll a user
    Add {
        display_name: String,
        username: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tracker={},storage={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = LeetCodeClient::new(cli.graphql_url.clone())?;
    let options = SyncOptions {
        concurrency: cli.concurrency.max(1),
        min_interval: Duration::from_millis(cli.delay_ms),
    };

    match cli.command {
        Commands::Fetch { username } => handle_fetch(&client, &username).await?,
        Commands::Stored(command) => {
            let database_url = cli
                .database_url
                .as_deref()
                .ok_or("DATABASE_URL is required for this command")?;
            handle_stored(command, database_url, client, options).await?;
        }
    }

    Ok(())
}

async fn handle_fetch(
    client: &LeetCodeClient,
    username: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = client.fetch_stats(username).await?;
    println!(
        "{}: easy {}, medium {}, hard {} (total {}, ranking {})",
        username,
        stats.counts.easy,
        stats.counts.medium,
        stats.counts.hard,
        stats.total_solved.unwrap_or_else(|| stats.counts.total()),
        stats
            .ranking
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    Ok(())
}

async fn handle_stored(
    command: StoredCommand,
    database_url: &str,
    client: LeetCodeClient,
    options: SyncOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::new(database_url).await?;
    db.run_migrations().await?;
    let store: Arc<dyn UserStore> = Arc::new(db.user_store());
    let ctx = SyncContext::new(store.clone(), Arc::new(client), options);

    match command {
        StoredCommand::SyncAll => {
            let report = ctx.sync_store().await?;
            print_report("Sync", &report);
        }
        StoredCommand::SyncUser { id } => {
            let user = ctx.sync_user(id).await?;
            println!(
                "{} ({}): easy {}, medium {}, hard {}",
                user.display_name,
                user.external_username,
                user.current.easy,
                user.current.medium,
                user.current.hard
            );
        }
        StoredCommand::ResetBaselines => {
            let report = baseline::reset_store_baselines(store.as_ref()).await?;
            print_report("Baseline reset", &report);
        }
        StoredCommand::List { limit } => {
            let users = store.list().await?;
            let view = leaderboard::project(&users, &TierWeights::default())?.page(0, limit);
            println!("{} tracked users", view.total_users);
            for entry in &view.entries {
                println!(
                    "{:>4}. {:<24} {:<20} {:>6}",
                    entry.rank, entry.display_name, entry.external_username, entry.score
                );
            }
        }
        StoredCommand::Add {
            display_name,
            username,
        } => {
            let user = ctx.enroll(&display_name, &username).await?;
            println!(
                "Enrolled {} ({}) as {}",
                user.display_name, user.external_username, user.id
            );
        }
    }

    Ok(())
}

fn print_report(label: &str, report: &SyncReport) {
    println!(
        "{} finished: {} updated, {} failed",
        label, report.updated_count, report.failed_count
    );
    for error in &report.errors {
        println!("  {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_needs_no_database() {
        let cli = Cli::try_parse_from(["tracker", "fetch", "alice"]).unwrap();
        assert!(matches!(cli.command, Commands::Fetch { ref username } if username == "alice"));
    }

    #[test]
    fn test_stored_commands_are_flattened() {
        let cli = Cli::try_parse_from(["tracker", "sync-all"]).unwrap();
        assert!(matches!(cli.command, Commands::Stored(StoredCommand::SyncAll)));

        let cli = Cli::try_parse_from(["tracker", "list", "--limit", "5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Stored(StoredCommand::List { limit: 5 })
        ));

        assert!(Cli::try_parse_from(["tracker", "stored", "sync-all"]).is_err());
    }
}
