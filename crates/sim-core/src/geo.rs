//! Airports, great-circle distance and the route demand formula.

use crate::ids::AirportId;
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Static airport reference entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub id: AirportId,
    pub name: String,
    pub city: String,
    pub country: String,
    /// Region tag used by regional marketing campaigns, e.g. "Europe".
    pub region: String,
    pub lat: f64,
    pub lon: f64,
    /// Size class 1 (small) to 5 (mega-hub).
    pub size: u8,
}

/// Haversine distance in kilometres.
pub fn great_circle_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

impl Airport {
    pub fn distance_km(&self, other: &Airport) -> f64 {
        great_circle_km(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Daily demand potential of a new route, fixed at creation time.
///
/// `max(20, round(size_o * size_d * 20 + (5000 - distance) / 10))`
pub fn route_base_demand(origin: &Airport, destination: &Airport, distance_km: f64) -> u32 {
    let raw = f64::from(origin.size) * f64::from(destination.size) * 20.0
        + (5000.0 - distance_km) / 10.0;
    raw.round().max(20.0) as u32
}
