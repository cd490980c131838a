use super::*;

#[test]
fn parses_extract_command() {
    let cli = Cli::try_parse_from(["trendwatch", "extract"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Extract)));
}

#[test]
fn summary_top_defaults_and_overrides() {
    let cli = Cli::try_parse_from(["trendwatch", "summary"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Summary { top: 20 })
    ));

    let cli = Cli::try_parse_from(["trendwatch", "summary", "--top", "5"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Summary { top: 5 })));
}

#[test]
fn db_recent_uses_defaults() {
    let cli = Cli::try_parse_from(["trendwatch", "db", "recent"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Recent { days: 7, limit: 50 }
        })
    ));
}

#[test]
fn db_stats_parses() {
    let cli = Cli::try_parse_from(["trendwatch", "db", "stats"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Stats
        })
    ));
}

#[test]
fn db_search_takes_positional_query() {
    let cli = Cli::try_parse_from(["trendwatch", "db", "search", "email marketing"]).unwrap();
    match cli.command {
        Some(Commands::Db {
            command: DbCommands::Search { query },
        }) => assert_eq!(query, "email marketing"),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn db_search_requires_query() {
    assert!(Cli::try_parse_from(["trendwatch", "db", "search"]).is_err());
}

#[test]
fn db_top_overrides() {
    let cli =
        Cli::try_parse_from(["trendwatch", "db", "top", "--days", "30", "--top", "10"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Top { days: 30, top: 10 }
        })
    ));
}

#[test]
fn db_export_defaults_to_trends_export_csv() {
    let cli = Cli::try_parse_from(["trendwatch", "db", "export"]).unwrap();
    match cli.command {
        Some(Commands::Db {
            command: DbCommands::Export { output, days },
        }) => {
            assert_eq!(output, PathBuf::from("trends_export.csv"));
            assert_eq!(days, 30);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn db_purge_is_dry_without_yes() {
    let cli = Cli::try_parse_from(["trendwatch", "db", "purge"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Purge {
                days: 90,
                yes: false
            }
        })
    ));

    let cli = Cli::try_parse_from(["trendwatch", "db", "purge", "--days", "30", "--yes"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Purge {
                days: 30,
                yes: true
            }
        })
    ));
}

#[test]
fn db_backup_output_is_optional() {
    let cli = Cli::try_parse_from(["trendwatch", "db", "backup"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Backup { output: None }
        })
    ));
}

#[test]
fn db_reports_limit_defaults_to_twenty() {
    let cli = Cli::try_parse_from(["trendwatch", "db", "reports"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Reports { limit: 20 }
        })
    ));
}

#[test]
fn parses_menu_command() {
    let cli = Cli::try_parse_from(["trendwatch", "menu"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Menu)));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["trendwatch"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn negative_days_are_rejected() {
    assert!(Cli::try_parse_from(["trendwatch", "db", "recent", "--days", "-3"]).is_err());
}

#[test]
fn help_renders_without_configuration() {
    let err = Cli::try_parse_from(["trendwatch", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    assert!(err.to_string().contains("db"));
}
