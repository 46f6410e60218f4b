use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sim_core::SimConfig;
use sim_runtime::{GameSession, GameState};

fn bench_session_year(c: &mut Criterion) {
    let catalog = refdata::builtin().unwrap();
    c.bench_function("session 12 months, 4 routes", |b| {
        b.iter(|| {
            let mut session = GameSession::new_game(catalog.clone(), SimConfig::default(), "Bench Air");
            for (model, from, to) in [
                ("B737", "ICN", "HND"),
                ("A320", "ICN", "PEK"),
                ("B787", "JFK", "LHR"),
                ("E190", "LHR", "CDG"),
            ] {
                let aircraft = session.purchase_aircraft(&model.into()).unwrap();
                let route = session.create_route(&from.into(), &to.into()).unwrap();
                session.assign_aircraft(&route, aircraft).unwrap();
            }
            for _ in 0..12 {
                session.run_month();
                if session.state() == GameState::GameOver {
                    break;
                }
            }
            black_box(session.player().cash)
        })
    });
}

criterion_group!(benches, bench_session_year);
criterion_main!(benches);
