//! Server command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use autocat_core::{RuleStore, Settings};
use autocat_server::{parse_api_keys, ServerConfig};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    settings: Settings,
) -> Result<()> {
    println!("🚀 Starting autocat web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);

    // Parse API keys from environment (comma-separated)
    let api_keys = parse_api_keys(&std::env::var("AUTOCAT_API_KEYS").unwrap_or_default());

    // Parse allowed CORS origins (comma-separated)
    let allowed_origins: Vec<String> = std::env::var("AUTOCAT_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if api_keys.is_empty() {
        println!("   ⚠️  No API keys configured (AUTOCAT_API_KEYS), API calls will be rejected");
    } else {
        println!(
            "   🔑 API keys: {} configured (AUTOCAT_API_KEYS)",
            api_keys.len()
        );
    }

    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }

    let db = open_db(db_path, no_encrypt)?;
    println!("   Rules: {} active", db.active_rules()?.len());
    println!();
    println!("   Press Ctrl+C to stop");

    let config = ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        api_keys,
    };

    let store: Arc<dyn RuleStore> = Arc::new(db);
    autocat_server::serve(store, host, port, config, settings).await
}
