//! autocat CLI - Transaction auto-categorization
//!
//! Usage:
//!   autocat init                         Initialize database and seed rules
//!   autocat rules add Continente ...     Add a rule
//!   autocat classify "Compras Continente" --amount 42.5
//!   autocat learn "Wells farmácia"       Confirm a suggestion and learn a rule
//!   autocat serve --port 3000            Start web server

mod cli;
mod commands;


use anyhow::Result;
use autocat_core::{NewRule, Settings};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let settings = Settings::load()?;
    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| settings.database_path.clone());

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path, cli.no_encrypt),
        Commands::Rules { action } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            match action {
                None => commands::cmd_rules_list(&db, false),
                Some(RulesAction::List { all }) => commands::cmd_rules_list(&db, all),
                Some(RulesAction::Add {
                    pattern,
                    name,
                    pattern_type,
                    entity,
                    category,
                    subcategory,
                    tags,
                    confidence,
                    priority,
                }) => {
                    let pattern_type = commands::parse_pattern_type(&pattern_type)?;
                    commands::cmd_rules_add(
                        &db,
                        NewRule {
                            name: name.unwrap_or_default(),
                            pattern,
                            pattern_type,
                            entity,
                            category,
                            subcategory,
                            tags,
                            confidence,
                            priority,
                        },
                    )
                    .map(|_| ())
                }
                Some(RulesAction::Show { id }) => commands::cmd_rules_show(&db, id),
                Some(RulesAction::Deactivate { id }) => commands::cmd_rules_deactivate(&db, id),
                Some(RulesAction::Import { file }) => {
                    commands::cmd_rules_import(&db, &file).map(|_| ())
                }
                Some(RulesAction::Test { description }) => {
                    commands::cmd_rules_test(&db, &description)
                }
            }
        }
        Commands::Classify {
            description,
            amount,
            json,
        } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            commands::cmd_classify(&db, &description, amount, json)
        }
        Commands::Learn {
            description,
            amount,
            reject,
        } => {
            let db = commands::open_db(&db_path, cli.no_encrypt)?;
            commands::cmd_learn(&db, &description, amount, !reject).map(|_| ())
        }
        Commands::Serve {
            port,
            host,
            no_auth,
        } => commands::cmd_serve(&db_path, &host, port, no_auth, cli.no_encrypt, settings).await,
    }
}
