//! strategy-sim — replay a queue scenario through the selection strategy.
//!
//! Loads a TOML scenario, then acts as the pool engine: evaluate, dequeue
//! the selected job, repeat until the queue is empty. Prints the dispatch
//! order, or a JSON report with `--json`.
//!
//! Weight precedence, field by field: CLI flags, then the scenario's
//! `[strategy]` section, then `STRATEGY_*` environment variables
//! (profile-aware, `.env` honoured). A weight missing from every layer keeps
//! its default of 1.0.

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use jobpick_core::{Config, load_dotenv};
use jobpick_strategy::strategy::{age, declared_priority};
use jobpick_strategy::{
    Scenario, ScoringPolicy, SelectionMetrics, SharedStrategy, StrategyConfig, StrategyOverrides,
    dispatch_order,
};

// ── CLI ─────────────────────────────────────────────────────────────

/// Replay a queued-job scenario and print the order jobs would be dispatched in.
#[derive(Parser, Debug)]
#[command(name = "strategy-sim", version, about)]
struct Cli {
    /// Path to the scenario TOML file.
    #[arg(long, env = "STRATEGY_SCENARIO")]
    scenario: PathBuf,

    /// Override the age weight.
    #[arg(long)]
    age_factor: Option<f64>,

    /// Override the priority weight.
    #[arg(long)]
    priority_factor: Option<f64>,

    /// Override the scoring policy (normalized | integer).
    #[arg(long)]
    policy: Option<ScoringPolicy>,

    /// Print a JSON report instead of a plain listing.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct DispatchEntry {
    position: usize,
    job: String,
    waited_ms: u64,
    priority: i64,
    id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
struct Report {
    config: StrategyConfig,
    order: Vec<DispatchEntry>,
    metrics: SelectionMetrics,
}

fn resolve_config(cli: &Cli, scenario: &Scenario) -> anyhow::Result<StrategyConfig> {
    let overrides = StrategyOverrides {
        age_factor: cli.age_factor,
        priority_factor: cli.priority_factor,
        policy: cli.policy,
    }
    .or(scenario.strategy);

    let base = if overrides.is_complete() {
        StrategyConfig::default()
    } else {
        let env = Config::from_env()?;
        env.log_summary();
        StrategyConfig::from_env_config(&env.strategy)?
    };

    let config = overrides.apply(base);
    config.validate()?;
    Ok(config)
}

// ── main ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let cli = Cli::parse();

    let scenario = Scenario::from_file(&cli.scenario)?;
    info!(
        path = %cli.scenario.display(),
        jobs = scenario.jobs.len(),
        "loaded scenario"
    );

    let config = resolve_config(&cli, &scenario)?;
    info!(
        age_factor = config.age_factor,
        priority_factor = config.priority_factor,
        policy = %config.policy,
        "strategy configured"
    );

    let strategy = SharedStrategy::new(config)?;
    let start = Utc::now();
    let order = dispatch_order(&strategy, scenario.snapshots(start));

    let entries: Vec<DispatchEntry> = order
        .iter()
        .enumerate()
        .map(|(i, job)| DispatchEntry {
            position: i + 1,
            job: job.header().to_string(),
            waited_ms: age(job, start).as_millis() as u64,
            priority: declared_priority(job),
            id: job.job().id(),
        })
        .collect();
    let dispatched = entries.len();

    if cli.json {
        let report = Report {
            config,
            order: entries,
            metrics: strategy.metrics(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for entry in &entries {
            let id = entry.id.map(|id| id.to_string()).unwrap_or_default();
            println!(
                "{:>3}. {:<24} waited {:>8}ms  priority {:<4} {}",
                entry.position, entry.job, entry.waited_ms, entry.priority, id
            );
        }
    }

    info!(dispatched, "simulation complete");
    Ok(())
}
