//! Identifier newtypes and the session-wide id allocator.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// IATA-style airport code, e.g. "ICN".
    AirportId
);
string_id!(
    /// Aircraft catalog model id, e.g. "A320".
    ModelId
);
string_id!(RouteId);
string_id!(CompetitorId);
string_id!(AllianceId);
string_id!(EventId);
string_id!(ResearchId);
string_id!(CampaignId);

/// Unique id of an owned aircraft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AircraftId(pub u64);

impl fmt::Display for AircraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An airline taking part in the market: the player or one AI competitor.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirlineRef {
    Player,
    Competitor(CompetitorId),
}

/// Monotonic counters for everything the engine creates at runtime.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next_aircraft: u64,
    next_route: u64,
    next_alliance: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aircraft(&mut self) -> AircraftId {
        self.next_aircraft += 1;
        AircraftId(self.next_aircraft)
    }

    /// Route ids read `<prefix>-<origin>-<destination>-<seq>`; the player uses no prefix.
    pub fn route(
        &mut self,
        prefix: Option<&str>,
        origin: &AirportId,
        destination: &AirportId,
    ) -> RouteId {
        self.next_route += 1;
        match prefix {
            Some(p) => RouteId(format!("{p}-{origin}-{destination}-{}", self.next_route)),
            None => RouteId(format!("{origin}-{destination}-{}", self.next_route)),
        }
    }

    pub fn alliance(&mut self, owner: &str) -> AllianceId {
        self.next_alliance += 1;
        AllianceId(format!("alliance-{owner}-{}", self.next_alliance))
    }

    /// Make sure future aircraft ids never collide with ones already issued.
    pub fn reserve_aircraft_above(&mut self, id: AircraftId) {
        self.next_aircraft = self.next_aircraft.max(id.0);
    }

    /// Skip past the trailing sequence number of an existing route id.
    pub fn reserve_route(&mut self, id: &RouteId) {
        if let Some(seq) = id.as_str().rsplit('-').next().and_then(|s| s.parse::<u64>().ok()) {
            self.next_route = self.next_route.max(seq);
        }
    }

    /// Skip past the counter of an existing alliance id.
    pub fn reserve_alliance(&mut self, id: &AllianceId) {
        if let Some(n) = id.as_str().rsplit('-').next().and_then(|s| s.parse::<u64>().ok()) {
            self.next_alliance = self.next_alliance.max(n);
        }
    }
}
