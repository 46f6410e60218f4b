#![deny(warnings)]

//! Headless driver: runs a game for a number of months with every notice
//! acknowledged automatically and prints the resulting KPIs.

use anyhow::{bail, Context, Result};
use persistence::FileStore;
use sim_core::{dates, Catalog, SimConfig};
use sim_runtime::{GameSession, GameState, Notice};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    catalog: Option<PathBuf>,
    save: Option<PathBuf>,
    months: Option<u32>,
    seed: Option<u64>,
    company: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = || it.next().with_context(|| format!("{arg} needs a value"));
        match arg.as_str() {
            "--config" => args.config = Some(value()?.into()),
            "--catalog" => args.catalog = Some(value()?.into()),
            "--save" => args.save = Some(value()?.into()),
            "--months" => args.months = Some(value()?.parse().context("--months")?),
            "--seed" => args.seed = Some(value()?.parse().context("--seed")?),
            "--company" => args.company = Some(value()?),
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_yaml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }
    Ok(config)
}

fn load_catalog(args: &Args) -> Result<Catalog> {
    Ok(match &args.catalog {
        Some(dir) => refdata::load_dir(dir).with_context(|| format!("catalog in {}", dir.display()))?,
        None => refdata::builtin()?,
    })
}

/// A single B737 on ICN-HND so a fresh game has something to settle.
fn open_starter_route(session: &mut GameSession) -> Result<()> {
    let aircraft = session.purchase_aircraft(&"B737".into())?;
    let route = session.create_route(&"ICN".into(), &"HND".into())?;
    session.assign_aircraft(&route, aircraft)?;
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args()?;
    let config = load_config(&args)?;
    let catalog = load_catalog(&args)?;
    let company = args.company.clone().unwrap_or_else(|| "SkyCo".to_string());
    let months = args.months.unwrap_or(12);
    info!(?args, seed = config.rng_seed, "starting CLI");

    let mut store = args.save.as_ref().map(FileStore::new);
    let resumed = match store.as_mut() {
        Some(store) => GameSession::load(store, catalog.clone(), config.clone())?,
        None => None,
    };
    let mut session = match resumed {
        Some(session) => session,
        None => {
            let mut session = GameSession::new_game(catalog, config, &company);
            open_starter_route(&mut session)?;
            session
        }
    };

    for _ in 0..months {
        for notice in session.run_month() {
            match notice {
                Notice::MonthlyReport(r) => println!(
                    "{} | income: ${} | expenses: ${} | profit: ${}",
                    dates::to_iso(r.month),
                    r.income,
                    r.expenses.total,
                    r.profit()
                ),
                Notice::Event(e) => info!(event = %e.event.title, until = %e.expiry, "event"),
                Notice::ResearchCompleted(p) => info!(project = %p.name, "research completed"),
            }
        }
        if session.state() == GameState::GameOver {
            println!("GAME OVER on {}", dates::to_iso(session.date()));
            break;
        }
    }

    let p = session.player();
    println!(
        "KPI | date: {} | cash: ${} | fleet: {} | routes: {} | satisfaction: {:.1} | on-time: {:.1}% | brand: {:.1}",
        dates::to_iso(session.date()),
        p.cash,
        p.network.fleet().len(),
        p.network.routes().len(),
        p.satisfaction(),
        p.on_time_performance(),
        p.brand_awareness()
    );
    for r in session.rankings() {
        println!(
            "#{} {} | cash: ${} | fleet: {} | routes: {} | score: {}",
            r.overall_rank, r.name, r.cash, r.fleet_size, r.route_count, r.overall_score
        );
    }

    if let Some(store) = store.as_mut() {
        if session.save(store)? {
            info!("game saved");
        }
    }
    Ok(())
}
