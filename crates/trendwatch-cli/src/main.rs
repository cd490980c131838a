mod display;
mod extract;
mod menu;
mod query;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "trendwatch")]
#[command(about = "Marketing trend monitoring: collect, score, store, and report")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect trends from every configured source, score and store them, and
    /// write charts plus an HTML report
    Extract,
    /// Print the keyword-level summary of the last 7 days
    Summary {
        /// Number of keywords to show
        #[arg(long, default_value_t = query::DEFAULT_TOP_N)]
        top: usize,
    },
    /// Query and maintain the trend store
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Interactive store utility menu
    Menu,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Recent trends ranked by volume + engagement
    Recent {
        #[arg(long, default_value_t = query::DEFAULT_RECENT_DAYS)]
        days: u32,
        #[arg(long, default_value_t = query::DEFAULT_RECENT_LIMIT)]
        limit: u32,
    },
    /// Whole-store statistics
    Stats,
    /// Trends whose keyword contains the given text
    Search { query: String },
    /// Most frequent keywords in a trailing window
    Top {
        #[arg(long, default_value_t = query::DEFAULT_RECENT_DAYS)]
        days: u32,
        #[arg(long, default_value_t = query::DEFAULT_TOP_N)]
        top: usize,
    },
    /// Export a trailing window to CSV
    Export {
        #[arg(long, default_value = query::DEFAULT_EXPORT_FILE)]
        output: PathBuf,
        #[arg(long, default_value_t = query::DEFAULT_EXPORT_DAYS)]
        days: u32,
    },
    /// Delete trends older than the given number of days
    Purge {
        #[arg(long, default_value_t = query::DEFAULT_PURGE_DAYS)]
        days: u32,
        /// Delete without asking; without it only the count is shown
        #[arg(long)]
        yes: bool,
    },
    /// Copy the whole database to a backup file
    Backup {
        /// Backup file (defaults to trends_backup_YYYYMMDD_HHMMSS.db)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List generated reports
    Reports {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("no command given; try `trendwatch extract` or `trendwatch --help`");
        return Ok(());
    };

    let config = trendwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = trendwatch_db::open_store(&config.database_path).await?;

    match command {
        Commands::Extract => {
            extract::run_extract(&pool, &config).await?;
            query::print_summary(&pool, query::DEFAULT_TOP_N).await?;
        }
        Commands::Summary { top } => query::print_summary(&pool, top).await?,
        Commands::Db { command } => run_db_command(&pool, command).await?,
        Commands::Menu => {
            let stdin = std::io::stdin();
            menu::run_menu(&pool, &mut stdin.lock()).await?;
        }
    }

    pool.close().await;
    Ok(())
}

async fn run_db_command(pool: &sqlx::SqlitePool, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Recent { days, limit } => query::print_recent(pool, days, limit).await,
        DbCommands::Stats => query::print_stats(pool).await,
        DbCommands::Search { query: text } => query::print_search(pool, &text).await,
        DbCommands::Top { days, top } => query::print_top_keywords(pool, days, top).await,
        DbCommands::Export { output, days } => query::export(pool, &output, days).await.map(drop),
        DbCommands::Purge { days, yes } => {
            let count = query::count_old(pool, days).await?;
            if count == 0 {
                println!("no trends older than {days} days found");
            } else if yes {
                query::purge(pool, days).await?;
            } else {
                println!("{count} trends older than {days} days; re-run with --yes to delete them");
            }
            Ok(())
        }
        DbCommands::Backup { output } => query::backup(pool, output).await,
        DbCommands::Reports { limit } => query::print_reports(pool, limit).await,
    }
}

#[cfg(test)]
mod tests;
