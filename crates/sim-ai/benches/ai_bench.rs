use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use sim_core::{AircraftId, AircraftInstance, Competitor, IdAllocator, Network, Player};

fn rivals(catalog: &sim_core::Catalog, n: usize) -> Vec<Competitor> {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..n)
        .map(|i| {
            let mut network = Network::new();
            for (j, model) in catalog.aircraft.iter().take(4).enumerate() {
                let id = AircraftId((i * 100 + j) as u64 + 1);
                network.add_aircraft(AircraftInstance::new(id, model.id.clone(), date));
            }
            Competitor {
                id: format!("ai-{i}").as_str().into(),
                name: format!("Rival {i} Airlines"),
                color: "#000000".into(),
                cash: Decimal::new(400_000_000, 0),
                network,
                alliance: None,
            }
        })
        .collect()
}

fn bench_ai_months(c: &mut Criterion) {
    let catalog = refdata::builtin().unwrap();
    let player = Player::new("Bench Air", Decimal::new(500_000_000, 0));
    let start = rivals(&catalog, 8);
    c.bench_function("ai 8 rivals x 12 months", |b| {
        b.iter(|| {
            let mut ids = IdAllocator::new();
            ids.reserve_aircraft_above(AircraftId(10_000));
            let mut rng = sim_core::rng::seeded(42);
            let mut current = start.clone();
            for month in 2..=12 {
                let ctx = sim_ai::AiContext {
                    player: &player,
                    catalog: &catalog,
                    date: chrono::NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
                    days_in_month: 30,
                    fuel_price: 1.2,
                };
                current = sim_ai::advance_competitors(&current, &ctx, &mut ids, &mut rng).competitors;
            }
            black_box(current)
        })
    });
}

criterion_group!(benches, bench_ai_months);
criterion_main!(benches);
