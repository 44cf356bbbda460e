//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database and seed the default rules

use std::path::Path;

use anyhow::{Context, Result};
use autocat_core::{store::seed_default_rules, Database};
use tracing::debug;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    debug!(path = path_str, encrypted = !no_encrypt, "Opening database");
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    seed_rules(&db)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Review rules: autocat rules list");
    println!("  2. Try a description: autocat classify \"Compras Continente\"");
    println!("  3. Start web API: autocat serve");

    Ok(())
}

/// Seed the default rules into an empty database
pub fn seed_rules(db: &Database) -> Result<usize> {
    let seeded = seed_default_rules(db).context("Failed to seed default rules")?;
    if seeded > 0 {
        println!("   Seeded {} default rules", seeded);
    } else {
        println!("   Rules already present, skipped seeding");
    }
    Ok(seeded)
}
