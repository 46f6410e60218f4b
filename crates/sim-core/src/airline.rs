//! Airlines: the player, AI competitors and alliances between them.

use crate::dates;
use crate::effects::{ActiveCampaign, ActiveResearch};
use crate::fleet::Network;
use crate::ids::{AirlineRef, AirportId, AllianceId, CompetitorId, ResearchId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Jet fuel price in USD per litre before any modifier.
pub const BASE_FUEL_PRICE: f64 = 1.2;

pub const SATISFACTION_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const SERVICE_QUALITY_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const BRAND_AWARENESS_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const ON_TIME_RANGE: RangeInclusive<f64> = 70.0..=99.0;

fn clamp_to(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

/// Multiplicative modifiers accumulated from completed research.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResearchModifiers {
    /// Applied to the fuel price at settlement.
    pub fuel_efficiency: f64,
    /// Applied to fleet maintenance.
    pub maintenance: f64,
    /// Applied to every route's base demand.
    pub base_demand: f64,
}

impl Default for ResearchModifiers {
    fn default() -> Self {
        Self {
            fuel_efficiency: 1.0,
            maintenance: 1.0,
            base_demand: 1.0,
        }
    }
}

/// A month's expenses by category, after modifiers and rounding.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub maintenance: Decimal,
    pub fuel: Decimal,
    pub airport_fees: Decimal,
    pub salaries: Decimal,
    /// Sum of the four categories.
    pub total: Decimal,
}

/// One month's entry in the player's financial history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    /// Last day of the settled month.
    #[serde(with = "dates::iso")]
    pub month: NaiveDate,
    pub income: Decimal,
    pub expenses: ExpenseBreakdown,
}

impl FinancialReport {
    pub fn profit(&self) -> Decimal {
        self.income - self.expenses.total
    }
}

fn default_service_quality() -> f64 {
    70.0
}

fn default_on_time() -> f64 {
    95.0
}

/// The player's airline.
///
/// Satisfaction, service quality, brand awareness and on-time performance are
/// private so every write goes through a clamping setter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub company_name: String,
    /// Signed; going negative ends the game.
    pub cash: Decimal,
    /// Owned aircraft and open routes.
    pub network: Network,
    satisfaction: f64,
    #[serde(default = "default_service_quality")]
    service_quality: f64,
    #[serde(default = "default_on_time")]
    on_time_performance: f64,
    brand_awareness: f64,
    /// Fuel price used by the most recent settlement.
    pub fuel_price: f64,
    /// Home airport; routes touching it pay reduced fees.
    pub hub: Option<AirportId>,
    #[serde(default)]
    pub financial_history: Vec<FinancialReport>,
    #[serde(default)]
    pub last_month_income: Option<Decimal>,
    #[serde(default)]
    pub last_month_expense: Option<Decimal>,
    #[serde(default)]
    pub active_research: Option<ActiveResearch>,
    #[serde(default)]
    pub completed_research: Vec<ResearchId>,
    #[serde(default)]
    pub research_modifiers: ResearchModifiers,
    #[serde(default)]
    pub active_campaigns: Vec<ActiveCampaign>,
    #[serde(default)]
    pub alliance: Option<AllianceId>,
}

impl Player {
    pub fn new(company_name: impl Into<String>, cash: Decimal) -> Self {
        Self {
            company_name: company_name.into(),
            cash,
            network: Network::new(),
            satisfaction: 70.0,
            service_quality: default_service_quality(),
            on_time_performance: default_on_time(),
            brand_awareness: 20.0,
            fuel_price: BASE_FUEL_PRICE,
            hub: None,
            financial_history: Vec::new(),
            last_month_income: None,
            last_month_expense: None,
            active_research: None,
            completed_research: Vec::new(),
            research_modifiers: ResearchModifiers::default(),
            active_campaigns: Vec::new(),
            alliance: None,
        }
    }

    pub fn satisfaction(&self) -> f64 {
        self.satisfaction
    }

    pub fn set_satisfaction(&mut self, value: f64) {
        self.satisfaction = clamp_to(value, &SATISFACTION_RANGE);
    }

    pub fn adjust_satisfaction(&mut self, delta: f64) {
        self.set_satisfaction(self.satisfaction + delta);
    }

    pub fn service_quality(&self) -> f64 {
        self.service_quality
    }

    pub fn set_service_quality(&mut self, value: f64) {
        self.service_quality = clamp_to(value, &SERVICE_QUALITY_RANGE);
    }

    pub fn on_time_performance(&self) -> f64 {
        self.on_time_performance
    }

    pub fn set_on_time_performance(&mut self, value: f64) {
        self.on_time_performance = clamp_to(value, &ON_TIME_RANGE);
    }

    pub fn brand_awareness(&self) -> f64 {
        self.brand_awareness
    }

    pub fn set_brand_awareness(&mut self, value: f64) {
        self.brand_awareness = clamp_to(value, &BRAND_AWARENESS_RANGE);
    }

    /// Re-clamp every bounded stat; used after deserializing old saves.
    pub fn normalize_stats(&mut self) {
        self.set_satisfaction(self.satisfaction);
        self.set_service_quality(self.service_quality);
        self.set_on_time_performance(self.on_time_performance);
        self.set_brand_awareness(self.brand_awareness);
    }

    pub fn has_completed(&self, id: &ResearchId) -> bool {
        self.completed_research.contains(id)
    }
}

/// An AI-controlled airline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    /// Display colour, e.g. "#F97316".
    pub color: String,
    pub cash: Decimal,
    pub network: Network,
    #[serde(default)]
    pub alliance: Option<AllianceId>,
}

impl Competitor {
    /// This competitor as an alliance member.
    pub fn member_ref(&self) -> AirlineRef {
        AirlineRef::Competitor(self.id.clone())
    }

    /// Whether this competitor shares `alliance` (false when either is unaligned).
    pub fn is_allied_with(&self, alliance: Option<&AllianceId>) -> bool {
        matches!((self.alliance.as_ref(), alliance), (Some(a), Some(b)) if a == b)
    }
}

/// A named group of airlines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alliance {
    pub id: AllianceId,
    pub name: String,
    members: Vec<AirlineRef>,
}

impl Alliance {
    pub fn new(id: AllianceId, name: impl Into<String>, founders: impl IntoIterator<Item = AirlineRef>) -> Self {
        let mut alliance = Self {
            id,
            name: name.into(),
            members: Vec::new(),
        };
        for m in founders {
            alliance.add_member(m);
        }
        alliance
    }

    pub fn members(&self) -> &[AirlineRef] {
        &self.members
    }

    /// Append `member` unless already present; returns whether it was added.
    pub fn add_member(&mut self, member: AirlineRef) -> bool {
        if self.members.contains(&member) {
            return false;
        }
        self.members.push(member);
        true
    }

    /// Returns whether `member` was present.
    pub fn remove_member(&mut self, member: &AirlineRef) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != member);
        self.members.len() != before
    }

    pub fn contains(&self, member: &AirlineRef) -> bool {
        self.members.contains(member)
    }

    /// An alliance needs at least two members to exist.
    pub fn is_viable(&self) -> bool {
        self.members.len() >= 2
    }

    /// Competitor members, in join order.
    pub fn competitor_members(&self) -> impl Iterator<Item = &CompetitorId> + '_ {
        self.members.iter().filter_map(|m| match m {
            AirlineRef::Competitor(id) => Some(id),
            AirlineRef::Player => None,
        })
    }
}
