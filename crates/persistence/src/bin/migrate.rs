#![deny(warnings)]

use anyhow::Context;
use persistence::{default_sqlite_url, SqliteStore};

/// Create the save database and print the saves it already holds.
///
/// The database URL comes from the first argument, then `SAVE_DB_URL`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SAVE_DB_URL").ok())
        .unwrap_or_else(|| default_sqlite_url().to_string());

    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"));
    if let Some(parent) = path.and_then(|p| std::path::Path::new(p).parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let store = SqliteStore::connect(&url)
        .await
        .with_context(|| format!("opening {url}"))?;
    store.migrate().await.context("applying schema")?;
    let saves = store.list().await?;
    println!("DB migrated at {url} ({} saves)", saves.len());
    for s in saves {
        println!("  {:<28} {:<20} {} cash {}", s.key, s.company, s.game_date, s.cash);
    }
    Ok(())
}
