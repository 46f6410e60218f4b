//! Catalog entries that perturb the simulation, and their time-bound
//! active instances: game events, research projects and marketing campaigns.

use crate::dates;
use crate::ids::{AirportId, CampaignId, EventId, ResearchId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How an event reads to the player. Does not change the maths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPolarity {
    Positive,
    Negative,
    Neutral,
}

/// Per-airport effect carried by an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirportEffect {
    pub airport: AirportId,
    /// Scales demand on routes touching `airport`.
    #[serde(default)]
    pub demand_multiplier: Option<f64>,
    /// A closed airport suspends every route that touches it.
    #[serde(default)]
    pub closed: bool,
}

/// Everything an event can do. Unset fields have no effect.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameEventEffect {
    /// One-shot cash delta applied when the event fires.
    pub cash: Option<Decimal>,
    /// One-shot satisfaction delta applied when the event fires.
    pub satisfaction: Option<f64>,
    /// Scales the month's expense total while active.
    pub expense_modifier: Option<f64>,
    /// Scales the month's income total while active.
    pub income_modifier: Option<f64>,
    pub fuel_price_modifier: Option<f64>,
    pub airport_effects: Vec<AirportEffect>,
}

/// Catalog entry for a random world event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub polarity: EventPolarity,
    /// 0 for instantaneous events.
    pub duration_days: u32,
    #[serde(default)]
    pub effects: GameEventEffect,
}

impl GameEvent {
    pub fn is_instantaneous(&self) -> bool {
        self.duration_days == 0
    }
}

/// Lifecycle phase of a bound event on a given day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventPhase {
    Scheduled,
    Active,
    Expired,
}

/// A catalog event bound to concrete dates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveGameEvent {
    pub event: GameEvent,
    #[serde(with = "dates::iso")]
    pub start: NaiveDate,
    /// First day the event no longer applies.
    #[serde(with = "dates::iso")]
    pub expiry: NaiveDate,
}

impl ActiveGameEvent {
    /// Schedule `event` from `start` for its full duration.
    pub fn bind(event: GameEvent, start: NaiveDate) -> Self {
        let expiry = dates::add_days(start, event.duration_days);
        Self {
            event,
            start,
            expiry,
        }
    }

    pub fn phase_on(&self, date: NaiveDate) -> EventPhase {
        if date < self.start {
            EventPhase::Scheduled
        } else if date < self.expiry {
            EventPhase::Active
        } else {
            EventPhase::Expired
        }
    }

    /// Airports this event closes.
    pub fn closures(&self) -> impl Iterator<Item = &AirportId> + '_ {
        self.event
            .effects
            .airport_effects
            .iter()
            .filter(|e| e.closed)
            .map(|e| &e.airport)
    }
}

/// Permanent gains granted when research completes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchEffect {
    /// Multiplies the effective fuel price; below 1 is an improvement.
    pub fuel_efficiency_modifier: Option<f64>,
    pub maintenance_modifier: Option<f64>,
    /// Multiplies base demand on every route.
    pub base_demand_modifier: Option<f64>,
    pub satisfaction: Option<f64>,
    pub service_quality: Option<f64>,
    pub cash: Option<Decimal>,
}

/// Catalog entry for a research project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResearchProject {
    pub id: ResearchId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: Decimal,
    pub duration_days: u32,
    #[serde(default)]
    pub effects: ResearchEffect,
    /// Projects that must be completed before this one can start.
    #[serde(default)]
    pub prerequisites: Vec<ResearchId>,
}

/// The project currently under way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveResearch {
    pub project: ResearchProject,
    #[serde(with = "dates::iso")]
    pub start: NaiveDate,
}

impl ActiveResearch {
    pub fn completes_on(&self) -> NaiveDate {
        dates::add_days(self.start, self.project.duration_days)
    }

    pub fn is_complete(&self, today: NaiveDate) -> bool {
        today >= self.completes_on()
    }
}

/// Demand boost for routes touching one region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionalDemand {
    /// Matched against the region of either route endpoint.
    pub region: String,
    pub multiplier: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignEffect {
    /// Applied once, at activation.
    pub brand_awareness: Option<f64>,
    /// Applied continuously while the campaign runs.
    pub regional_demand: Option<RegionalDemand>,
}

/// Catalog entry for a paid marketing campaign.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketingCampaign {
    pub id: CampaignId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: Decimal,
    pub duration_days: u32,
    #[serde(default)]
    pub effects: CampaignEffect,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveCampaign {
    pub campaign: MarketingCampaign,
    #[serde(with = "dates::iso")]
    pub start: NaiveDate,
    #[serde(with = "dates::iso")]
    pub expiry: NaiveDate,
}

impl ActiveCampaign {
    pub fn launch(campaign: MarketingCampaign, start: NaiveDate) -> Self {
        let expiry = dates::add_days(start, campaign.duration_days);
        Self {
            campaign,
            start,
            expiry,
        }
    }

    pub fn is_running(&self, today: NaiveDate) -> bool {
        today < self.expiry
    }
}
