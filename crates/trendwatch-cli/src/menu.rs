//! Interactive store utility menu.
//!
//! Reads choices and parameters line by line from any [`BufRead`]. A blank or
//! unparsable numeric answer falls back to the documented default. End of
//! input exits the menu.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use sqlx::SqlitePool;

use crate::display::rule;
use crate::query;

const MENU: &str = "\
1. View recent trends
2. Show database statistics
3. Search trends
4. View top keywords
5. Export to CSV
6. Clean old data
7. Backup database
8. Exit";

/// Run the menu loop until the user exits or input ends.
///
/// # Errors
///
/// Returns an error if reading input fails or a store action fails.
pub(crate) async fn run_menu<R: BufRead>(pool: &SqlitePool, input: &mut R) -> anyhow::Result<()> {
    loop {
        println!();
        rule(60);
        println!("TRENDWATCH DATABASE UTILITIES");
        rule(60);
        println!("{MENU}");

        let Some(choice) = prompt(input, "\nEnter your choice (1-8): ")? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => {
                let days = ask_number(
                    input,
                    "Enter number of days (default 7): ",
                    query::DEFAULT_RECENT_DAYS,
                )?;
                let limit = ask_number(
                    input,
                    "Enter max results (default 50): ",
                    query::DEFAULT_RECENT_LIMIT,
                )?;
                query::print_recent(pool, days, limit).await?;
            }
            "2" => query::print_stats(pool).await?,
            "3" => {
                let text = prompt(input, "Enter search term: ")?.unwrap_or_default();
                if text.is_empty() {
                    println!("Search term cannot be empty.");
                } else {
                    query::print_search(pool, &text).await?;
                }
            }
            "4" => {
                let days = ask_number(
                    input,
                    "Enter number of days (default 7): ",
                    query::DEFAULT_RECENT_DAYS,
                )?;
                let top_n = ask_number(
                    input,
                    "Enter number of top keywords (default 20): ",
                    query::DEFAULT_TOP_N,
                )?;
                query::print_top_keywords(pool, days, top_n).await?;
            }
            "5" => {
                let file = prompt(input, "Enter filename (default trends_export.csv): ")?
                    .filter(|f| !f.is_empty())
                    .unwrap_or_else(|| query::DEFAULT_EXPORT_FILE.to_string());
                let days = ask_number(
                    input,
                    "Enter number of days (default 30): ",
                    query::DEFAULT_EXPORT_DAYS,
                )?;
                recover(query::export(pool, &PathBuf::from(file), days).await)?;
            }
            "6" => clean_old(pool, input).await?,
            "7" => {
                let file = prompt(input, "Enter backup filename (or press Enter for auto): ")?
                    .filter(|f| !f.is_empty())
                    .map(PathBuf::from);
                recover(query::backup(pool, file).await)?;
            }
            "8" => {
                println!("Exiting... Goodbye!");
                return Ok(());
            }
            other => {
                println!("Invalid choice '{other}'. Please enter a number from 1 to 8.");
                continue;
            }
        }

        if prompt(input, "\nPress Enter to continue...")?.is_none() {
            return Ok(());
        }
    }
}

async fn clean_old<R: BufRead>(pool: &SqlitePool, input: &mut R) -> anyhow::Result<()> {
    let days = ask_number(
        input,
        "Delete trends older than how many days? (default 90): ",
        query::DEFAULT_PURGE_DAYS,
    )?;

    let count = query::count_old(pool, days).await?;
    if count == 0 {
        println!("No trends older than {days} days found.");
        return Ok(());
    }

    let answer = prompt(
        input,
        &format!("This will delete {count} trends older than {days} days. Continue? (yes/no): "),
    )?;
    if answer.as_deref().is_some_and(confirm_yes) {
        query::purge(pool, days).await?;
    } else {
        println!("Operation cancelled.");
    }
    Ok(())
}

/// Report a failed export or backup and keep the menu running. Store and
/// input failures still end the session.
fn recover<T>(result: anyhow::Result<T>) -> anyhow::Result<()> {
    let Err(err) = result else {
        return Ok(());
    };
    let recoverable = matches!(
        err.downcast_ref::<trendwatch_db::DbError>(),
        Some(trendwatch_db::DbError::BackupExists(_))
    ) || err.downcast_ref::<trendwatch_report::ReportError>().is_some();

    if recoverable {
        tracing::warn!(error = %err, "menu action failed");
        println!("Error: {err}");
        Ok(())
    } else {
        Err(err)
    }
}

/// Print `message` and read one trimmed line. `None` at end of input.
fn prompt<R: BufRead>(input: &mut R, message: &str) -> anyhow::Result<Option<String>> {
    print!("{message}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn ask_number<R: BufRead, T: FromStr>(
    input: &mut R,
    message: &str,
    default: T,
) -> anyhow::Result<T> {
    let answer = prompt(input, message)?;
    Ok(parse_or_default(answer.as_deref(), default))
}

pub(crate) fn parse_or_default<T: FromStr>(answer: Option<&str>, default: T) -> T {
    answer
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .and_then(|a| a.parse().ok())
        .unwrap_or(default)
}

pub(crate) fn confirm_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}
