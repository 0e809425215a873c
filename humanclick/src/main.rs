use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use humanclick_lib::hotkey::KeyOrButtonId;
use humanclick_lib::input::EnigoActuator;
use humanclick_lib::session::{ClickController, ControlHandle, UiCommand};
use humanclick_lib::state::{ClickerConfig, ClickerEvent, StateManager};
use humanclick_lib::stats::IntervalStats;
use humanclick_lib::timing::{TimingRandomizer, set_rate, validate_rate};
use humanclick_lib::utils::logging::init_logging;

/// hotkey-toggled auto clicker with human-like timing
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// listen for the toggle binding and click while running (build with `--features hooks`)
    Run {
        /// JSON config file
        #[clap(short = 'c', long)]
        config: Option<PathBuf>,

        /// clicks per second (1-20)
        #[clap(long)]
        cps: Option<f64>,

        /// enable pointer jitter
        #[clap(long)]
        jitter: bool,

        /// toggle binding, e.g. "key:F6" or "button:Middle"
        #[clap(short = 't', long)]
        toggle: Option<KeyOrButtonId>,

        /// record the toggle binding from the next key or button press
        #[clap(long)]
        record: bool,
    },

    /// print statistics of randomized intervals without clicking
    Simulate {
        /// clicks per second (1-20)
        #[clap(long, default_value_t = 10.0)]
        cps: f64,

        /// number of intervals to draw
        #[clap(short = 'n', long, default_value_t = 10_000)]
        count: usize,

        /// fixed seed for reproducible output
        #[clap(long)]
        seed: Option<u64>,

        /// print statistics as JSON
        #[clap(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            config,
            cps,
            jitter,
            toggle,
            record,
        } => {
            let mut config = match config {
                Some(path) => ClickerConfig::load(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => ClickerConfig::default(),
            };
            if let Some(cps) = cps {
                config = config.with_rate(validate_rate(cps)?);
            }
            if jitter {
                config = config.with_jitter(true);
            }
            if toggle.is_some() {
                config = config.with_toggle_binding(toggle);
            }
            config.validate()?;

            run(config, record).await
        }
        Command::Simulate {
            cps,
            count,
            seed,
            json,
        } => simulate(cps, count, seed, json),
    }
}

async fn run(config: ClickerConfig, record: bool) -> Result<()> {
    let state = Arc::new(StateManager::new());
    let mut events = state.subscribe();

    let (controller, handle) =
        ClickController::new(&config, EnigoActuator::factory(), Arc::clone(&state));
    let controller_task = controller.spawn();

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match &event {
                ClickerEvent::Error(ctx) => {
                    tracing::error!(code = ?ctx.code, message = %ctx.message, "Clicker error")
                }
                other => tracing::info!(event = ?other, "Clicker event"),
            }
        }
    });

    start_input_capture(&handle)?;

    match &config.toggle_binding {
        Some(binding) => tracing::info!(toggle = %binding.label(), cps = config.rate_cps, "Ready"),
        None => tracing::warn!("No toggle binding configured"),
    }
    if record {
        handle.send(UiCommand::RequestRecordToggleKey)?;
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    tracing::info!("Shutting down");

    handle.shutdown().await?;
    controller_task.await?;
    Ok(())
}

#[cfg(feature = "hooks")]
fn start_input_capture(handle: &ControlHandle) -> Result<()> {
    let handle = handle.clone();
    humanclick_lib::hotkey::spawn_input_capture(move |event| {
        if let Err(e) = handle.input(event) {
            tracing::debug!(error = %e, "Dropping input event");
        }
    })?;
    Ok(())
}

#[cfg(not(feature = "hooks"))]
fn start_input_capture(_handle: &ControlHandle) -> Result<()> {
    Err(humanclick_lib::hotkey::HotkeyError::CaptureUnavailable.into())
}

fn simulate(cps: f64, count: usize, seed: Option<u64>, json: bool) -> Result<()> {
    let base = set_rate(validate_rate(cps)?);
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let intervals = TimingRandomizer::with_rng(base, rng).simulate(count);
    let stats = IntervalStats::from_intervals(&intervals)
        .context("at least two intervals are needed for statistics")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Target CPS:   {:.2}", cps);
    println!("Intervals:    {}", stats.count);
    println!("Actual CPS:   {:.3}", stats.cps);
    println!("Mean:         {:.4}s", stats.mean);
    println!("Median:       {:.4}s", stats.median);
    println!("Std dev:      {:.4}s", stats.std_dev);
    println!("Min / Max:    {:.4}s / {:.4}s", stats.min, stats.max);
    println!("IQR:          {:.4}s", stats.iqr);
    println!("Skewness:     {:.3}", stats.skewness);
    println!("Kurtosis:     {:.3}", stats.kurtosis);
    println!("CV:           {:.3}", stats.coefficient_of_variation);
    println!();
    for p in &stats.percentiles {
        println!("  p{:<3} {:.4}s", p.percentile, p.value);
    }

    Ok(())
}
