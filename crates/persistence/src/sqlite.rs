//! SQLite-backed save slots.
//!
//! Each row holds the JSON snapshot plus a little metadata (company, game
//! date, cash in cents) so saves can be listed without decoding them.

use crate::{decimal_to_cents_i64, decode, encode, PersistError, SaveGame};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sim_core::dates;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Executor, Row};
use std::str::FromStr;
use tracing::{info, warn};

/// Listing entry for one stored save.
#[derive(Clone, Debug, PartialEq)]
pub struct SaveSummary {
    pub key: String,
    pub company: String,
    pub game_date: NaiveDate,
    pub cash: Decimal,
}

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url`.
    pub async fn connect(url: &str) -> Result<Self, PersistError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self { pool })
    }

    /// A private in-memory database; it lives as long as its one connection.
    pub async fn in_memory() -> Result<Self, PersistError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Create the schema if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), PersistError> {
        self.pool
            .execute(include_str!("../migrations/001_saves.sql"))
            .await?;
        Ok(())
    }

    pub async fn put(&self, key: &str, save: &SaveGame) -> Result<(), PersistError> {
        let payload = encode(save)?;
        sqlx::query(
            "INSERT INTO saves (key, company, game_date, cash_cents, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(key) DO UPDATE SET
                company = excluded.company,
                game_date = excluded.game_date,
                cash_cents = excluded.cash_cents,
                payload = excluded.payload,
                updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(save.player.company_name.as_str())
        .bind(dates::to_iso(save.game_date))
        .bind(decimal_to_cents_i64(save.player.cash))
        .bind(payload)
        .execute(&self.pool)
        .await?;
        info!(key, company = %save.player.company_name, "save written");
        Ok(())
    }

    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, PersistError> {
        let row = sqlx::query("SELECT payload FROM saves WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(match row {
            Some(row) => Some(row.try_get("payload")?),
            None => None,
        })
    }

    /// Decode the save under `key`; an unreadable one is deleted.
    pub async fn load(&self, key: &str) -> Result<Option<SaveGame>, PersistError> {
        let Some(raw) = self.get_raw(key).await? else {
            return Ok(None);
        };
        match decode(&raw) {
            Ok(save) => Ok(Some(save)),
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable save");
                self.remove(key).await?;
                Ok(None)
            }
        }
    }

    /// Returns whether a row was deleted.
    pub async fn remove(&self, key: &str) -> Result<bool, PersistError> {
        let done = sqlx::query("DELETE FROM saves WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    /// Stored saves, most recently written first.
    pub async fn list(&self) -> Result<Vec<SaveSummary>, PersistError> {
        let rows = sqlx::query(
            "SELECT key, company, game_date, cash_cents FROM saves
             ORDER BY updated_at DESC, key",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let key: String = row.try_get("key")?;
            let raw_date: String = row.try_get("game_date")?;
            let Some(game_date) = dates::parse_iso(&raw_date) else {
                warn!(key = %key, date = %raw_date, "save has an unreadable date; not listed");
                continue;
            };
            let cents: i64 = row.try_get("cash_cents")?;
            out.push(SaveSummary {
                key,
                company: row.try_get("company")?,
                game_date,
                cash: Decimal::new(cents, 2),
            });
        }
        Ok(out)
    }
}
