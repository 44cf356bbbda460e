//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// autocat - Suggest categories for transactions and learn from confirmations
#[derive(Parser)]
#[command(name = "autocat")]
#[command(about = "Transaction auto-categorization engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to the `database.path` setting)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set AUTOCAT_DB_KEY environment variable with your passphrase.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and seed the default rules
    Init,

    /// Manage classification rules
    Rules {
        #[command(subcommand)]
        action: Option<RulesAction>,
    },

    /// Suggest a classification for a transaction description
    Classify {
        /// Transaction description
        description: String,

        /// Transaction amount
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        amount: f64,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a description and record your decision on the suggestion
    Learn {
        /// Transaction description
        description: String,

        /// Transaction amount
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        amount: f64,

        /// Reject the suggestion instead of confirming it (nothing is learned)
        #[arg(long)]
        reject: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, requests need "Authorization: Bearer <key>" with a key
        /// from AUTOCAT_API_KEYS.
        #[arg(long)]
        no_auth: bool,
    },
}

#[derive(Subcommand)]
pub enum RulesAction {
    /// List rules in match order
    List {
        /// Include inactive rules
        #[arg(long)]
        all: bool,
    },

    /// Add a new rule
    Add {
        /// Pattern to match against transaction descriptions
        pattern: String,
        /// Display name (defaults to the pattern)
        #[arg(long)]
        name: Option<String>,
        /// Pattern type: contains, starts_with, exact, regex
        #[arg(long = "type", default_value = "contains")]
        pattern_type: String,
        #[arg(long)]
        entity: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        subcategory: Option<String>,
        /// Tag to propose (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Confidence between 0 and 1
        #[arg(long, default_value = "0.9")]
        confidence: f64,
        /// Rule priority (higher = checked first)
        #[arg(long, default_value = "10")]
        priority: i32,
    },

    /// Show a single rule
    Show {
        /// Rule ID
        id: i64,
    },

    /// Deactivate a rule (kept for history)
    Deactivate {
        /// Rule ID
        id: i64,
    },

    /// Import rules from a TOML file with a [[rules]] list
    Import {
        /// Rules file
        file: PathBuf,
    },

    /// Test which rules match a description
    Test {
        /// Description to test
        description: String,
    },
}
