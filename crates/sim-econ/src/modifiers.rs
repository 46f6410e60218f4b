//! Folds active events and campaigns into scalar multipliers.

use sim_core::{ActiveCampaign, ActiveGameEvent, AirportId};
use std::collections::{BTreeMap, BTreeSet};

/// Multipliers in effect for one settlement or projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Modifiers {
    pub income: f64,
    pub expense: f64,
    pub fuel_price: f64,
    pub airport_demand: BTreeMap<AirportId, f64>,
    pub regional_demand: BTreeMap<String, f64>,
    pub closed_airports: BTreeSet<AirportId>,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            income: 1.0,
            expense: 1.0,
            fuel_price: 1.0,
            airport_demand: BTreeMap::new(),
            regional_demand: BTreeMap::new(),
            closed_airports: BTreeSet::new(),
        }
    }
}

impl Modifiers {
    /// Event demand multiplier for `airport` (1 when untouched).
    pub fn airport_demand(&self, airport: &AirportId) -> f64 {
        self.airport_demand.get(airport).copied().unwrap_or(1.0)
    }

    /// Campaign demand multiplier for `region` (1 when untouched).
    pub fn regional_demand(&self, region: &str) -> f64 {
        self.regional_demand.get(region).copied().unwrap_or(1.0)
    }

    pub fn is_closed(&self, airport: &AirportId) -> bool {
        self.closed_airports.contains(airport)
    }
}

/// Compile the multipliers for the given active events and campaigns.
///
/// Missing multipliers count as 1; several entries on the same key multiply.
pub fn compile(events: &[ActiveGameEvent], campaigns: &[ActiveCampaign]) -> Modifiers {
    let mut out = Modifiers::default();
    for active in events {
        let fx = &active.event.effects;
        out.income *= fx.income_modifier.unwrap_or(1.0);
        out.expense *= fx.expense_modifier.unwrap_or(1.0);
        out.fuel_price *= fx.fuel_price_modifier.unwrap_or(1.0);
        for ae in &fx.airport_effects {
            if let Some(m) = ae.demand_multiplier {
                *out.airport_demand.entry(ae.airport.clone()).or_insert(1.0) *= m;
            }
        }
    }
    for active in campaigns {
        if let Some(rd) = &active.campaign.effects.regional_demand {
            *out.regional_demand.entry(rd.region.clone()).or_insert(1.0) *= rd.multiplier;
        }
    }
    out.closed_airports = closed_airports(events);
    out
}

/// Airports closed by any of `events`.
pub fn closed_airports(events: &[ActiveGameEvent]) -> BTreeSet<AirportId> {
    events
        .iter()
        .flat_map(|e| e.closures())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use sim_core::{
        AirportEffect, CampaignEffect, EventPolarity, GameEvent, GameEventEffect,
        MarketingCampaign, RegionalDemand,
    };

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn event(id: &str, effects: GameEventEffect) -> ActiveGameEvent {
        ActiveGameEvent::bind(
            GameEvent {
                id: id.into(),
                title: id.to_string(),
                description: String::new(),
                polarity: EventPolarity::Neutral,
                duration_days: 30,
                effects,
            },
            day(),
        )
    }

    fn campaign(region: &str, multiplier: f64) -> ActiveCampaign {
        ActiveCampaign::launch(
            MarketingCampaign {
                id: format!("promo-{region}").as_str().into(),
                name: "Promo".into(),
                description: String::new(),
                cost: Decimal::ZERO,
                duration_days: 60,
                effects: CampaignEffect {
                    brand_awareness: None,
                    regional_demand: Some(RegionalDemand {
                        region: region.to_string(),
                        multiplier,
                    }),
                },
            },
            day(),
        )
    }

    #[test]
    fn empty_input_is_neutral() {
        assert_eq!(compile(&[], &[]), Modifiers::default());
    }

    #[test]
    fn multipliers_compose_multiplicatively() {
        let events = vec![
            event(
                "boom",
                GameEventEffect {
                    income_modifier: Some(1.15),
                    ..Default::default()
                },
            ),
            event(
                "sports",
                GameEventEffect {
                    income_modifier: Some(1.25),
                    fuel_price_modifier: Some(1.5),
                    ..Default::default()
                },
            ),
        ];
        let m = compile(&events, &[]);
        assert!((m.income - 1.15 * 1.25).abs() < 1e-12);
        assert_eq!(m.fuel_price, 1.5);
        assert_eq!(m.expense, 1.0);
    }

    #[test]
    fn airport_and_region_maps() {
        let events = vec![
            event(
                "olympics",
                GameEventEffect {
                    airport_effects: vec![AirportEffect {
                        airport: "CDG".into(),
                        demand_multiplier: Some(2.5),
                        closed: false,
                    }],
                    ..Default::default()
                },
            ),
            event(
                "strike",
                GameEventEffect {
                    airport_effects: vec![AirportEffect {
                        airport: "JFK".into(),
                        demand_multiplier: None,
                        closed: true,
                    }],
                    ..Default::default()
                },
            ),
        ];
        let campaigns = vec![campaign("Europe", 1.15), campaign("Europe", 1.1)];
        let m = compile(&events, &campaigns);
        assert_eq!(m.airport_demand(&"CDG".into()), 2.5);
        assert_eq!(m.airport_demand(&"ICN".into()), 1.0);
        assert!((m.regional_demand("Europe") - 1.15 * 1.1).abs() < 1e-12);
        assert_eq!(m.regional_demand("Asia"), 1.0);
        assert!(m.is_closed(&"JFK".into()));
        assert!(!m.is_closed(&"CDG".into()));
        assert_eq!(closed_airports(&events).len(), 1);
    }

    proptest! {
        #[test]
        fn compile_is_pure(income in 0.1f64..3.0, fuel in 0.1f64..3.0, region in 0.5f64..2.0) {
            let events = vec![event("e", GameEventEffect {
                income_modifier: Some(income),
                fuel_price_modifier: Some(fuel),
                ..Default::default()
            })];
            let campaigns = vec![campaign("Asia", region)];
            let a = compile(&events, &campaigns);
            let b = compile(&events, &campaigns);
            prop_assert_eq!(a, b);
        }
    }
}
