//! Immutable reference tables consulted by identifier.

use crate::effects::{GameEvent, MarketingCampaign, ResearchProject};
use crate::fleet::AircraftModel;
use crate::geo::Airport;
use crate::ids::{AirportId, CampaignId, ModelId, ResearchId};
use crate::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Aircraft models, airports, events, research and campaigns known to a game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub aircraft: Vec<AircraftModel>,
    pub airports: Vec<Airport>,
    pub events: Vec<GameEvent>,
    pub research: Vec<ResearchProject>,
    pub campaigns: Vec<MarketingCampaign>,
}

impl Catalog {
    pub fn model(&self, id: &ModelId) -> Option<&AircraftModel> {
        self.aircraft.iter().find(|m| &m.id == id)
    }

    pub fn airport(&self, id: &AirportId) -> Option<&Airport> {
        self.airports.iter().find(|a| &a.id == id)
    }

    pub fn research_project(&self, id: &ResearchId) -> Option<&ResearchProject> {
        self.research.iter().find(|r| &r.id == id)
    }

    pub fn campaign(&self, id: &CampaignId) -> Option<&MarketingCampaign> {
        self.campaigns.iter().find(|c| &c.id == id)
    }

    /// Check ids are unique and every entry is within its documented bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        unique(self.aircraft.iter().map(|m| m.id.as_str()))?;
        unique(self.airports.iter().map(|a| a.id.as_str()))?;
        unique(self.events.iter().map(|e| e.id.as_str()))?;
        unique(self.research.iter().map(|r| r.id.as_str()))?;
        unique(self.campaigns.iter().map(|c| c.id.as_str()))?;

        for m in &self.aircraft {
            if m.seats == 0 {
                return Err(ValidationError::NonPositiveCapacity(m.id.0.clone()));
            }
            if m.price < Decimal::ZERO || m.monthly_maintenance < Decimal::ZERO {
                return Err(ValidationError::NegativeMoney(m.id.0.clone()));
            }
            if !(m.range_km.is_finite() && m.range_km > 0.0 && m.fuel_burn.is_finite() && m.fuel_burn >= 0.0) {
                return Err(ValidationError::NonFinite(m.id.0.clone()));
            }
        }
        for a in &self.airports {
            if !(1..=5).contains(&a.size) {
                return Err(ValidationError::AirportSizeOutOfRange {
                    id: a.id.0.clone(),
                    size: a.size,
                });
            }
            if !((-90.0..=90.0).contains(&a.lat) && (-180.0..=180.0).contains(&a.lon)) {
                return Err(ValidationError::InvalidCoordinates(a.id.0.clone()));
            }
        }
        for e in &self.events {
            let fx = &e.effects;
            let multipliers = [fx.income_modifier, fx.expense_modifier, fx.fuel_price_modifier]
                .into_iter()
                .chain(fx.airport_effects.iter().map(|a| a.demand_multiplier))
                .flatten();
            for m in multipliers {
                if !(m.is_finite() && m > 0.0) {
                    return Err(ValidationError::NonPositiveMultiplier(e.id.0.clone()));
                }
            }
        }
        for r in &self.research {
            if r.cost < Decimal::ZERO {
                return Err(ValidationError::NegativeMoney(r.id.0.clone()));
            }
            for p in &r.prerequisites {
                if self.research_project(p).is_none() {
                    return Err(ValidationError::MissingPrerequisite {
                        project: r.id.0.clone(),
                        prerequisite: p.0.clone(),
                    });
                }
            }
        }
        for c in &self.campaigns {
            if c.cost < Decimal::ZERO {
                return Err(ValidationError::NegativeMoney(c.id.0.clone()));
            }
            if let Some(rd) = &c.effects.regional_demand {
                if !(rd.multiplier.is_finite() && rd.multiplier > 0.0) {
                    return Err(ValidationError::NonPositiveMultiplier(c.id.0.clone()));
                }
            }
        }
        Ok(())
    }
}

fn unique<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}
