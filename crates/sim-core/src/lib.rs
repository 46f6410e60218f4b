#![deny(warnings)]

//! Core domain models and invariants for the airline simulation.
//!
//! This crate defines the serializable state shared by every other crate:
//! airports and aircraft, the player and AI airlines, events, research and
//! marketing entries, plus the injectable random source and date codec.

pub mod airline;
pub mod catalog;
pub mod config;
pub mod dates;
pub mod effects;
pub mod fleet;
pub mod geo;
pub mod ids;
pub mod rng;

pub use airline::{
    Alliance, Competitor, ExpenseBreakdown, FinancialReport, Player, ResearchModifiers,
    BASE_FUEL_PRICE,
};
pub use catalog::Catalog;
pub use config::SimConfig;
pub use effects::{
    ActiveCampaign, ActiveGameEvent, ActiveResearch, AirportEffect, CampaignEffect, EventPhase,
    EventPolarity, GameEvent, GameEventEffect, MarketingCampaign, RegionalDemand, ResearchEffect,
    ResearchProject,
};
pub use fleet::{AircraftInstance, AircraftModel, AircraftStatus, AssignmentError, Network, Route};
pub use geo::{great_circle_km, route_base_demand, Airport};
pub use ids::{
    AircraftId, AirlineRef, AirportId, AllianceId, CampaignId, CompetitorId, EventId, IdAllocator,
    ModelId, ResearchId, RouteId,
};
pub use rng::{RandomSource, ScriptedRandom};

use thiserror::Error;

/// Validation errors for reference data and loaded state.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Two entries of one table share an id.
    #[error("duplicate id: {0}")]
    DuplicateId(String),
    /// Airport size class outside 1..=5.
    #[error("airport {id} has size {size}, expected 1..=5")]
    AirportSizeOutOfRange { id: String, size: u8 },
    #[error("airport {0} has coordinates outside the globe")]
    InvalidCoordinates(String),
    /// An aircraft model with zero seats.
    #[error("aircraft {0} has no seats")]
    NonPositiveCapacity(String),
    #[error("negative monetary value in {0}")]
    NegativeMoney(String),
    /// NaN, infinite, or a non-positive range.
    #[error("non-finite numeric value in {0}")]
    NonFinite(String),
    /// Multipliers must be finite and strictly positive.
    #[error("invalid multiplier in {0}")]
    NonPositiveMultiplier(String),
    /// A prerequisite that names no catalog project.
    #[error("research {project} requires unknown project {prerequisite}")]
    MissingPrerequisite {
        project: String,
        prerequisite: String,
    },
    /// Aircraft status and route assignment disagree.
    #[error("inconsistent aircraft assignment in {0}")]
    InconsistentAssignment(String),
}
