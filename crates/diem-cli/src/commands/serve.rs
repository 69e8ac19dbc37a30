//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    static_dir: Option<&Path>,
    prefs_path: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Diem web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // user:key pairs, comma-separated
    let api_keys =
        diem_server::parse_api_keys(&std::env::var("DIEM_API_KEYS").unwrap_or_default());

    let identity_header = std::env::var("DIEM_IDENTITY_HEADER")
        .ok()
        .map(|h| h.trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| diem_server::DEFAULT_IDENTITY_HEADER.to_string());

    let allowed_origins: Vec<String> = std::env::var("DIEM_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
        println!("      All requests act as user '{}'", diem_server::LOCAL_USER);
    } else {
        println!("   🔒 Authentication: {} header", identity_header);
        if !api_keys.is_empty() {
            println!(
                "   🔑 API keys: {} configured (DIEM_API_KEYS)",
                api_keys.len()
            );
        }
    }
    if !allowed_origins.is_empty() {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }

    let db = open_db(db_path, no_encrypt)?;
    let static_dir_str = static_dir
        .map(|p| p.to_str().context("Static directory path is not valid UTF-8"))
        .transpose()?;

    let config = diem_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        api_keys,
        identity_header,
        preferences_path: prefs_path
            .map(Path::to_path_buf)
            .or_else(diem_core::preferences::default_preferences_path),
    };

    diem_server::serve(db, host, port, static_dir_str, config).await
}
