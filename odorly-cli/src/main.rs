//! Odor.ly - simulated body odor telemetry
//! Command-line interface for running the simulator and exporting its log

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::*;
use odorly_core::rng::NoiseSource;
use odorly_core::{EntropySource, LogEntry, OdorSimulator, OdorStatus, SimulatorConfig};
use odorly_geiger::{GeigerScheduler, RateConfig};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Parser)]
#[command(name = "odorly")]
#[command(author = "Odorly Contributors")]
#[command(version)]
#[command(about = "Odor.ly - simulated body odor telemetry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulator live, printing one line per tick
    Run {
        /// Seed for the noise source (omit for entropy)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Stop after this many ticks (omit to run until Ctrl-C)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Tick interval in milliseconds (default: 2000-2600, drawn once)
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Emit geiger clicks alongside the telemetry
        #[arg(short, long)]
        geiger: bool,
    },

    /// Run the simulator headless and write the log as CSV
    Export {
        /// Number of ticks to simulate
        #[arg(short, long, default_value_t = 100)]
        ticks: u64,

        /// Seed for the noise source (omit for entropy)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output CSV file
        #[arg(short, long, default_value = "bo-ometer-log.csv")]
        output: PathBuf,
    },

    /// Show simulator constants and classification thresholds
    Info,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            seed,
            ticks,
            interval_ms,
            geiger,
        } => run_command(seed, ticks, interval_ms, geiger).await,
        Commands::Export {
            ticks,
            seed,
            output,
        } => export_command(ticks, seed, &output),
        Commands::Info => {
            print_info();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn noise_for(seed: Option<u64>) -> EntropySource {
    match seed {
        Some(seed) => EntropySource::seeded(seed),
        None => EntropySource::new(),
    }
}

// ============================================================================
// Live run
// ============================================================================

async fn run_command(
    seed: Option<u64>,
    ticks: Option<u64>,
    interval_ms: Option<u64>,
    geiger: bool,
) -> Result<()> {
    let mut sim = OdorSimulator::new(noise_for(seed));

    // The session tick period is drawn once, like the original dashboard
    let period = match interval_ms {
        Some(ms) => Duration::from_millis(ms.max(1)),
        None => {
            let mut noise = noise_for(seed.map(|s| s.wrapping_add(1)));
            Duration::from_millis(2000 + (noise.uniform() * 600.0) as u64)
        }
    };

    let (p_bo_tx, p_bo_rx) = watch::channel(sim.frame().p_bo_pct());
    let mut scheduler = GeigerScheduler::with_noise(
        RateConfig::default(),
        p_bo_rx,
        noise_for(seed.map(|s| s.wrapping_add(2))),
    )?;

    if geiger {
        let mut clicks = scheduler.subscribe();
        scheduler.start();
        tokio::spawn(async move {
            while clicks.recv().await.is_ok() {
                println!("{}", "  *click*".dimmed());
            }
        });
    }

    println!(
        "{} (period {:?}, {})",
        "Odor.ly simulator running".green().bold(),
        period,
        if geiger { "geiger on" } else { "geiger off" }
    );

    let mut ticker = tokio::time::interval(period);
    ticker.tick().await;
    let mut done: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let entry = sim.advance();
                p_bo_tx.send_replace(entry.p_bo_pct);
                print_entry(&entry);

                done += 1;
                if ticks.is_some_and(|t| done >= t) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    scheduler.stop();
    println!(
        "{} {} ticks, {} entries retained",
        "Done:".green().bold(),
        done,
        sim.log().len()
    );

    Ok(())
}

fn print_entry(entry: &LogEntry) {
    let status = OdorStatus::from_percent(entry.p_bo_pct);
    let label = match status {
        OdorStatus::Fresh => status.label().green(),
        OdorStatus::Funky => status.label().yellow(),
        OdorStatus::Toxic => status.label().red().bold(),
    };

    println!(
        "{}  IAQ {:>6.2}  T {:>5.2}°C  RH {:>5.2}%  R {:>6}Ω  acc {}  BO {:>5.1}%  {}",
        entry
            .timestamp
            .format("%H:%M:%S%.3f")
            .to_string()
            .dimmed(),
        entry.iaq,
        entry.temperature_c,
        entry.humidity_pct,
        entry.gas_ohm.round() as i64,
        entry.accuracy,
        entry.p_bo_pct,
        label,
    );
}

// ============================================================================
// Headless export
// ============================================================================

fn export_command(ticks: u64, seed: Option<u64>, output: &PathBuf) -> Result<()> {
    if ticks == 0 {
        bail!("Tick count must be > 0");
    }

    let mut sim = OdorSimulator::new(noise_for(seed));
    for _ in 0..ticks {
        sim.advance();
    }

    fs::write(output, sim.log().to_csv())?;

    println!(
        "{} {} ticks to {}",
        "Exported".green().bold(),
        ticks,
        output.display().to_string().cyan()
    );

    Ok(())
}

// ============================================================================
// Info
// ============================================================================

fn print_info() {
    let config = SimulatorConfig::default();
    let rate = RateConfig::default();

    println!("{}", "Odor.ly simulator".bold());
    println!();
    println!("{}", "Simulation:".bold());
    println!("  drift sigma:        {}", config.drift_sigma);
    println!("  burst probability:  {}", config.burst_probability);
    println!(
        "  burst jump:         {} + U(0,1) * {}",
        config.burst_base, config.burst_span
    );
    println!("  IAQ alpha:          {}", config.iaq_alpha);
    println!("  BO alpha:           {}", config.bo_alpha);
    println!("  log capacity:       {}", config.log_capacity);
    println!();
    println!("{}", "Geiger:".bold());
    println!("  rate:               {} + {} * BO%", rate.base, rate.coupling);
    println!("  minimum interval:   {:?}", rate.min_interval);
    println!();
    println!("{}", "Status thresholds:".bold());
    println!("  {}:  BO < 33%", "Fresh".green());
    println!("  {}:  33% <= BO < 66%", "Funky".yellow());
    println!("  {}:  BO >= 66%", "TOXIC BO DETECTED".red().bold());
}
