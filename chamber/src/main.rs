use chamber::{bench_step, build_scenario, ScenarioConfig, Snapshot, Vec2};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, long, default_value = "default.yaml")]
    file_name: String,

    /// Wall-clock seconds to run the chamber for
    #[arg(short, long, default_value_t = 10.0)]
    seconds: f64,

    /// Snapshot reports per second
    #[arg(long, default_value_t = 1.0)]
    report_hz: f64,

    /// Time single steps over a range of sizes instead of running a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let text = fs::read_to_string(&config_path)
        .with_context(|| format!("reading scenario {}", config_path.display()))?;
    let scenario_cfg = ScenarioConfig::from_yaml(&text)
        .with_context(|| format!("parsing scenario {}", config_path.display()))?;

    log::debug!("{:?}", scenario_cfg);

    Ok(scenario_cfg)
}

/// What a renderer would draw, reduced to a log line
fn report(snapshot: &Snapshot) {
    let drawn = snapshot.extrapolated();
    let centroid = if drawn.is_empty() {
        Vec2::zeros()
    } else {
        drawn.iter().fold(Vec2::zeros(), |acc, p| acc + p.position) / drawn.len() as f64
    };
    let momentum = snapshot.total_momentum();

    log::info!(
        "{} particles, mass {:.4e}, momentum [{:.4e}, {:.4e}], centroid [{:.2}, {:.2}], {:.1} ms since update",
        drawn.len(),
        snapshot.total_mass(),
        momentum.x,
        momentum.y,
        centroid.x,
        centroid.y,
        snapshot.seconds_since_update * 1000.0,
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.bench {
        bench_step(&[100, 200, 400, 800, 1600], &[1, 4, 16, 100], 5)?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let chamber = build_scenario(&scenario_cfg).context("building scenario")?;

    let running = chamber.spawn().context("starting chamber thread")?;
    let handle = running.handle();

    let period = Duration::from_secs_f64(1.0 / args.report_hz.max(1.0e-3));
    let deadline = Instant::now() + Duration::from_secs_f64(args.seconds.max(0.0));
    while Instant::now() < deadline {
        thread::sleep(period.min(deadline.saturating_duration_since(Instant::now())));
        report(&handle.snapshot());
    }

    let chamber = running
        .stop()
        .map_err(|_| anyhow::anyhow!("chamber thread panicked"))?;
    log::info!("finished with {} particles", chamber.len());

    Ok(())
}
