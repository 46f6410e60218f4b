//! Aircraft, routes and the network that ties them together.
//!
//! An airline's fleet and routes live in one [`Network`]. Aircraft status and
//! `Route::aircraft` are only ever changed together through
//! [`Network::assign`] / [`Network::unassign`], so an in-service aircraft is
//! always referenced by exactly one route and vice versa.

use crate::dates;
use crate::ids::{AircraftId, AirportId, ModelId, RouteId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Static aircraft catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AircraftModel {
    pub id: ModelId,
    pub name: String,
    #[serde(default)]
    pub manufacturer: String,
    /// Purchase price in USD.
    pub price: Decimal,
    pub seats: u32,
    pub range_km: f64,
    /// Monthly maintenance in USD.
    pub monthly_maintenance: Decimal,
    /// Fuel burn in litres per km.
    pub fuel_burn: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AircraftStatus {
    Idle,
    InService(RouteId),
}

/// One owned aircraft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AircraftInstance {
    pub id: AircraftId,
    pub model: ModelId,
    #[serde(with = "dates::iso")]
    pub purchase_date: NaiveDate,
    status: AircraftStatus,
}

impl AircraftInstance {
    /// A freshly delivered, idle aircraft.
    pub fn new(id: AircraftId, model: ModelId, purchase_date: NaiveDate) -> Self {
        Self {
            id,
            model,
            purchase_date,
            status: AircraftStatus::Idle,
        }
    }

    pub fn status(&self) -> &AircraftStatus {
        &self.status
    }

    pub fn is_idle(&self) -> bool {
        self.status == AircraftStatus::Idle
    }

    pub fn route(&self) -> Option<&RouteId> {
        match &self.status {
            AircraftStatus::InService(r) => Some(r),
            AircraftStatus::Idle => None,
        }
    }

    pub fn age_years(&self, today: NaiveDate) -> f64 {
        dates::years_between(self.purchase_date, today)
    }
}

/// A connection between two airports operated by one airline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub origin: AirportId,
    pub destination: AirportId,
    pub distance_km: f64,
    pub ticket_price: Decimal,
    /// Daily demand potential, fixed when the route is opened.
    pub base_demand: u32,
    aircraft: Option<AircraftId>,
}

impl Route {
    /// An unassigned route.
    pub fn new(
        id: RouteId,
        origin: AirportId,
        destination: AirportId,
        distance_km: f64,
        ticket_price: Decimal,
        base_demand: u32,
    ) -> Self {
        Self {
            id,
            origin,
            destination,
            distance_km,
            ticket_price,
            base_demand,
            aircraft: None,
        }
    }

    pub fn aircraft(&self) -> Option<AircraftId> {
        self.aircraft
    }

    /// Same unordered airport pair.
    pub fn connects(&self, a: &AirportId, b: &AirportId) -> bool {
        (&self.origin == a && &self.destination == b)
            || (&self.origin == b && &self.destination == a)
    }

    pub fn touches(&self, airport: &AirportId) -> bool {
        &self.origin == airport || &self.destination == airport
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AssignmentError {
    #[error("route not found: {0}")]
    UnknownRoute(RouteId),
    #[error("aircraft not found: {0}")]
    UnknownAircraft(AircraftId),
    #[error("aircraft {0} is in service")]
    AircraftInService(AircraftId),
    #[error("route id already in use: {0}")]
    DuplicateRoute(RouteId),
}

/// Fleet plus routes of one airline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    fleet: Vec<AircraftInstance>,
    routes: Vec<Route>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fleet(&self) -> &[AircraftInstance] {
        &self.fleet
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn aircraft(&self, id: AircraftId) -> Option<&AircraftInstance> {
        self.fleet.iter().find(|a| a.id == id)
    }

    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.routes.iter().find(|r| &r.id == id)
    }

    /// The aircraft flying `route`, if any.
    pub fn assigned_to(&self, route: &Route) -> Option<&AircraftInstance> {
        route.aircraft.and_then(|id| self.aircraft(id))
    }

    /// Routes with an aircraft, paired with that aircraft.
    pub fn operating(&self) -> impl Iterator<Item = (&Route, &AircraftInstance)> + '_ {
        self.routes
            .iter()
            .filter_map(move |r| self.assigned_to(r).map(|a| (r, a)))
    }

    pub fn first_idle(&self) -> Option<&AircraftInstance> {
        self.fleet.iter().find(|a| a.is_idle())
    }

    pub fn serves_pair(&self, a: &AirportId, b: &AirportId) -> bool {
        self.routes.iter().any(|r| r.connects(a, b))
    }

    pub fn serves_airport(&self, airport: &AirportId) -> bool {
        self.routes.iter().any(|r| r.touches(airport))
    }

    pub fn add_aircraft(&mut self, aircraft: AircraftInstance) {
        debug!(aircraft = %aircraft.id, model = %aircraft.model, "aircraft added to fleet");
        self.fleet.push(AircraftInstance {
            status: AircraftStatus::Idle,
            ..aircraft
        });
    }

    /// Remove an idle aircraft from the fleet.
    pub fn remove_idle_aircraft(
        &mut self,
        id: AircraftId,
    ) -> Result<AircraftInstance, AssignmentError> {
        let idx = self
            .fleet
            .iter()
            .position(|a| a.id == id)
            .ok_or(AssignmentError::UnknownAircraft(id))?;
        if !self.fleet[idx].is_idle() {
            return Err(AssignmentError::AircraftInService(id));
        }
        Ok(self.fleet.remove(idx))
    }

    /// Open a route. Any aircraft reference on `route` is dropped.
    pub fn add_route(&mut self, route: Route) -> Result<(), AssignmentError> {
        if self.route(&route.id).is_some() {
            return Err(AssignmentError::DuplicateRoute(route.id));
        }
        self.routes.push(Route {
            aircraft: None,
            ..route
        });
        Ok(())
    }

    /// Close a route, releasing its aircraft back to idle.
    pub fn remove_route(&mut self, id: &RouteId) -> Result<Route, AssignmentError> {
        self.unassign(id)?;
        let idx = self
            .routes
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| AssignmentError::UnknownRoute(id.clone()))?;
        Ok(self.routes.remove(idx))
    }

    pub fn set_ticket_price(&mut self, id: &RouteId, price: Decimal) -> Result<(), AssignmentError> {
        let route = self
            .routes
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| AssignmentError::UnknownRoute(id.clone()))?;
        route.ticket_price = price;
        Ok(())
    }

    /// Put `aircraft` on `route`.
    ///
    /// The route's previous aircraft (if any) goes idle, and so does the
    /// aircraft's previous route (if any). Nothing changes on error.
    pub fn assign(&mut self, route_id: &RouteId, aircraft_id: AircraftId) -> Result<(), AssignmentError> {
        let route_idx = self
            .routes
            .iter()
            .position(|r| &r.id == route_id)
            .ok_or_else(|| AssignmentError::UnknownRoute(route_id.clone()))?;
        let aircraft_idx = self
            .fleet
            .iter()
            .position(|a| a.id == aircraft_id)
            .ok_or(AssignmentError::UnknownAircraft(aircraft_id))?;

        if let Some(previous_route) = self.fleet[aircraft_idx].route().cloned() {
            if &previous_route == route_id {
                return Ok(());
            }
            self.unassign(&previous_route)?;
        }
        self.unassign(route_id)?;

        self.fleet[aircraft_idx].status = AircraftStatus::InService(route_id.clone());
        self.routes[route_idx].aircraft = Some(aircraft_id);
        debug!(route = %route_id, aircraft = %aircraft_id, "aircraft assigned");
        Ok(())
    }

    /// Take the aircraft off `route`, returning its id.
    pub fn unassign(&mut self, route_id: &RouteId) -> Result<Option<AircraftId>, AssignmentError> {
        let route = self
            .routes
            .iter_mut()
            .find(|r| &r.id == route_id)
            .ok_or_else(|| AssignmentError::UnknownRoute(route_id.clone()))?;
        let released = route.aircraft.take();
        if let Some(id) = released {
            if let Some(a) = self.fleet.iter_mut().find(|a| a.id == id) {
                a.status = AircraftStatus::Idle;
            }
            debug!(route = %route_id, aircraft = %id, "aircraft unassigned");
        }
        Ok(released)
    }

    /// Check the aircraft/route back-references agree in both directions.
    pub fn is_consistent(&self) -> bool {
        let routes_ok = self.routes.iter().all(|r| match r.aircraft {
            None => true,
            Some(id) => self
                .aircraft(id)
                .is_some_and(|a| a.route() == Some(&r.id)),
        });
        let fleet_ok = self.fleet.iter().all(|a| match a.route() {
            None => true,
            Some(rid) => {
                self.routes
                    .iter()
                    .filter(|r| r.aircraft == Some(a.id))
                    .count()
                    == 1
                    && self.route(rid).is_some_and(|r| r.aircraft == Some(a.id))
            }
        });
        routes_ok && fleet_ok
    }
}
