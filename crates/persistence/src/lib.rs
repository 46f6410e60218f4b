#![deny(warnings)]

//! Save games: the snapshot type, its JSON codec and keyed stores.
//!
//! A save is one JSON document stored under [`SAVE_KEY`]. Dates are written
//! as ISO-8601 timestamps and revived on load. Loading never fails on bad
//! data: a corrupt snapshot is discarded and reported as "no save".

pub mod sqlite;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sim_core::{
    dates, ActiveGameEvent, Alliance, Competitor, IdAllocator, Network, Player, ValidationError,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

pub use sqlite::{SaveSummary, SqliteStore};

/// Key the single save slot is stored under.
pub const SAVE_KEY: &str = "air-management-savegame";

/// Returns the default SQLite URL used for local saves.
pub fn default_sqlite_url() -> &'static str {
    "sqlite://./saves/main.db"
}

fn default_speed() -> u8 {
    1
}

/// Everything needed to resume a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    pub player: Player,
    pub competitors: Vec<Competitor>,
    #[serde(default)]
    pub alliances: Vec<Alliance>,
    #[serde(with = "dates::iso")]
    pub game_date: NaiveDate,
    /// Calendar month (1-12) of the last settlement.
    pub last_processed_month: u32,
    #[serde(default)]
    pub active_events: Vec<ActiveGameEvent>,
    #[serde(default)]
    pub event_history: Vec<ActiveGameEvent>,
    /// Last non-zero game speed.
    #[serde(default = "default_speed")]
    pub last_speed: u8,
    #[serde(default)]
    pub ids: IdAllocator,
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("malformed save: {0}")]
    Json(#[from] serde_json::Error),
    #[error("inconsistent save: {0}")]
    Inconsistent(#[from] ValidationError),
    #[error("storage I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl PersistError {
    /// Whether the stored data itself is bad (as opposed to the storage).
    pub fn is_corrupt(&self) -> bool {
        matches!(self, PersistError::Json(_) | PersistError::Inconsistent(_))
    }
}

pub fn encode(save: &SaveGame) -> Result<String, PersistError> {
    Ok(serde_json::to_string(save)?)
}

/// Parse a snapshot, check its assignment invariants and re-clamp stats.
///
/// Id counters are bumped past every id found in the snapshot, so saves
/// written without counters keep issuing fresh ids.
pub fn decode(raw: &str) -> Result<SaveGame, PersistError> {
    let mut save: SaveGame = serde_json::from_str(raw)?;
    check_network(&save.player.company_name, &save.player.network)?;
    for comp in &save.competitors {
        check_network(comp.id.as_str(), &comp.network)?;
    }
    save.player.normalize_stats();

    let networks = std::iter::once(&save.player.network)
        .chain(save.competitors.iter().map(|c| &c.network));
    for net in networks {
        for aircraft in net.fleet() {
            save.ids.reserve_aircraft_above(aircraft.id);
        }
        for route in net.routes() {
            save.ids.reserve_route(&route.id);
        }
    }
    for alliance in &save.alliances {
        save.ids.reserve_alliance(&alliance.id);
    }
    Ok(save)
}

fn check_network(owner: &str, net: &Network) -> Result<(), ValidationError> {
    if net.is_consistent() {
        Ok(())
    } else {
        Err(ValidationError::InconsistentAssignment(owner.to_string()))
    }
}

/// Whole cents, saturating at the `i64` bounds.
pub fn decimal_to_cents_i64(value: Decimal) -> i64 {
    value
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.round().to_i64())
        .unwrap_or(if value.is_sign_negative() { i64::MIN } else { i64::MAX })
}

/// A string-keyed blob store.
pub trait SaveStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

/// Volatile store, used by tests and headless runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per entry inside a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SaveStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        match std::fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

pub fn save_to<S: SaveStore + ?Sized>(store: &mut S, save: &SaveGame) -> Result<(), PersistError> {
    store.set(SAVE_KEY, encode(save)?)?;
    debug!(company = %save.player.company_name, date = %save.game_date, "game saved");
    Ok(())
}

/// Load the saved game, discarding it if it cannot be decoded.
///
/// Only storage failures are returned as errors.
pub fn load_or_discard<S: SaveStore + ?Sized>(store: &mut S) -> Result<Option<SaveGame>, PersistError> {
    let Some(raw) = store.get(SAVE_KEY)? else {
        return Ok(None);
    };
    match decode(&raw) {
        Ok(save) => Ok(Some(save)),
        Err(e) => {
            warn!(error = %e, "discarding unreadable save");
            store.remove(SAVE_KEY)?;
            Ok(None)
        }
    }
}
