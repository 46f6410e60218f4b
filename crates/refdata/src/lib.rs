#![deny(warnings)]

//! Built-in reference tables and the YAML catalog loader.
//!
//! The default tables ship as YAML under `assets/` and are embedded at
//! compile time. A catalog directory may override any of the five files;
//! missing files fall back to the built-in table.

use serde::de::DeserializeOwned;
use sim_core::{Catalog, ValidationError};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

pub const AIRCRAFT_FILE: &str = "aircraft.yaml";
pub const AIRPORTS_FILE: &str = "airports.yaml";
pub const EVENTS_FILE: &str = "events.yaml";
pub const RESEARCH_FILE: &str = "research.yaml";
pub const CAMPAIGNS_FILE: &str = "campaigns.yaml";

const AIRCRAFT_YAML: &str = include_str!("../assets/aircraft.yaml");
const AIRPORTS_YAML: &str = include_str!("../assets/airports.yaml");
const EVENTS_YAML: &str = include_str!("../assets/events.yaml");
const RESEARCH_YAML: &str = include_str!("../assets/research.yaml");
const CAMPAIGNS_YAML: &str = include_str!("../assets/campaigns.yaml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid yaml in {file}: {msg}")]
    Yaml { file: String, msg: String },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e.to_string())
    }
}

fn parse<T: DeserializeOwned>(file: &str, text: &str) -> Result<Vec<T>, CatalogError> {
    serde_yaml::from_str(text).map_err(|e| CatalogError::Yaml {
        file: file.to_string(),
        msg: e.to_string(),
    })
}

/// The embedded default catalog.
pub fn builtin() -> Result<Catalog, CatalogError> {
    let catalog = Catalog {
        aircraft: parse(AIRCRAFT_FILE, AIRCRAFT_YAML)?,
        airports: parse(AIRPORTS_FILE, AIRPORTS_YAML)?,
        events: parse(EVENTS_FILE, EVENTS_YAML)?,
        research: parse(RESEARCH_FILE, RESEARCH_YAML)?,
        campaigns: parse(CAMPAIGNS_FILE, CAMPAIGNS_YAML)?,
    };
    catalog.validate()?;
    Ok(catalog)
}

fn read_or_builtin<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    fallback: &str,
) -> Result<Vec<T>, CatalogError> {
    let path = dir.join(file);
    if !path.exists() {
        return parse(file, fallback);
    }
    let text = fs::read_to_string(&path)?;
    info!(path = %path.display(), "catalog table override");
    parse(file, &text)
}

/// Load a catalog from `dir`, using the built-in table for every missing file.
pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Catalog, CatalogError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        warn!(dir = %dir.display(), "catalog directory not found; using built-in tables");
        return builtin();
    }
    let catalog = Catalog {
        aircraft: read_or_builtin(dir, AIRCRAFT_FILE, AIRCRAFT_YAML)?,
        airports: read_or_builtin(dir, AIRPORTS_FILE, AIRPORTS_YAML)?,
        events: read_or_builtin(dir, EVENTS_FILE, EVENTS_YAML)?,
        research: read_or_builtin(dir, RESEARCH_FILE, RESEARCH_YAML)?,
        campaigns: read_or_builtin(dir, CAMPAIGNS_FILE, CAMPAIGNS_YAML)?,
    };
    catalog.validate()?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sim_core::{AirportId, ModelId, ResearchId};
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("refdata-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn builtin_tables_parse_and_validate() {
        let cat = builtin().unwrap();
        assert_eq!(cat.aircraft.len(), 8);
        assert_eq!(cat.events.len(), 9);
        assert_eq!(cat.research.len(), 7);
        assert_eq!(cat.campaigns.len(), 5);
        assert!(cat.airports.len() >= 50);

        let b737 = cat.model(&ModelId::from("B737")).unwrap();
        assert_eq!(b737.seats, 162);
        assert_eq!(b737.price, Decimal::new(106_100_000, 0));

        let jfk = cat.airport(&AirportId::from("JFK")).unwrap();
        assert_eq!(jfk.region, "North America");
        assert_eq!(jfk.size, 5);

        let fe2 = cat
            .research_project(&ResearchId::from("fuel_efficiency_2"))
            .unwrap();
        assert_eq!(fe2.prerequisites, vec![ResearchId::from("fuel_efficiency_1")]);
    }

    #[test]
    fn builtin_events_carry_effects() {
        let cat = builtin().unwrap();
        let ash = cat
            .events
            .iter()
            .find(|e| e.id.as_str() == "volcanic_ash_europe")
            .unwrap();
        assert_eq!(ash.effects.airport_effects.iter().filter(|a| a.closed).count(), 4);
        let award = cat.events.iter().find(|e| e.id.as_str() == "safety_award").unwrap();
        assert!(award.is_instantaneous());
        assert_eq!(award.effects.cash, Some(Decimal::new(10_000_000, 0)));
    }

    #[test]
    fn override_file_replaces_one_table() {
        let dir = scratch_dir("override");
        fs::write(
            dir.join(AIRCRAFT_FILE),
            "- { id: DASH8, name: Dash 8, price: 30000000, seats: 78, range_km: 2000, monthly_maintenance: 70000, fuel_burn: 2.4 }\n",
        )
        .unwrap();
        let cat = load_dir(&dir).unwrap();
        assert_eq!(cat.aircraft.len(), 1);
        assert_eq!(cat.aircraft[0].id.as_str(), "DASH8");
        assert_eq!(cat.events.len(), 9);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn bad_yaml_names_the_file() {
        let dir = scratch_dir("bad");
        fs::write(dir.join(EVENTS_FILE), "- id: [unterminated\n").unwrap();
        match load_dir(&dir) {
            Err(CatalogError::Yaml { file, .. }) => assert_eq!(file, EVENTS_FILE),
            other => panic!("unexpected: {other:?}"),
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_table_is_rejected() {
        let dir = scratch_dir("invalid");
        fs::write(
            dir.join(AIRPORTS_FILE),
            "- { id: XXX, name: X, city: X, country: X, region: Asia, lat: 0, lon: 0, size: 9 }\n",
        )
        .unwrap();
        assert!(matches!(
            load_dir(&dir),
            Err(CatalogError::Invalid(ValidationError::AirportSizeOutOfRange { .. }))
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_dir_falls_back_to_builtin() {
        let cat = load_dir("/definitely/not/here").unwrap();
        assert_eq!(cat, builtin().unwrap());
    }
}
