//! Shared telemetry runtime for the API server.
//!
//! Owns the simulator behind an async mutex, drives it from a background
//! sampling task, and publishes the current odor probability (as a percent)
//! on a `watch` channel consumed by the geiger scheduler.

use std::sync::Arc;
use std::time::Duration;

use odorly_core::rng::NoiseSource;
use odorly_core::{EntropySource, OdorSimulator};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::models::{LogRow, TelemetrySnapshot};

/// Base sampling period before jitter, matching the original dashboard tick.
pub const BASE_PERIOD_MS: u64 = 2000;

/// Uniform jitter span added to the base period, drawn once per session.
pub const PERIOD_JITTER_MS: u64 = 600;

/// Draws the session sampling period: 2.0s plus up to 0.6s of jitter.
pub fn sample_period(noise: &mut impl NoiseSource) -> Duration {
    Duration::from_millis(BASE_PERIOD_MS + (noise.uniform() * PERIOD_JITTER_MS as f64) as u64)
}

/// Handle to the simulator shared between the sampler task and the handlers.
#[derive(Clone)]
pub struct TelemetryHandle {
    sim: Arc<Mutex<OdorSimulator<EntropySource>>>,
    p_bo_tx: Arc<watch::Sender<f64>>,
    sampler: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl TelemetryHandle {
    /// Creates the handle with a fresh simulator. A seed makes the noise
    /// sequence reproducible across runs.
    pub fn new(seed: Option<u64>) -> Self {
        let noise = match seed {
            Some(seed) => EntropySource::seeded(seed),
            None => EntropySource::new(),
        };
        let sim = OdorSimulator::new(noise);
        let (p_bo_tx, _) = watch::channel(sim.frame().p_bo_pct());

        Self {
            sim: Arc::new(Mutex::new(sim)),
            p_bo_tx: Arc::new(p_bo_tx),
            sampler: Arc::new(Mutex::new(None)),
        }
    }

    /// Subscribes to the published odor probability (percent).
    pub fn probability_feed(&self) -> watch::Receiver<f64> {
        self.p_bo_tx.subscribe()
    }

    /// Starts the background sampling task. A running sampler is cancelled
    /// first, so at most one task drives the simulator.
    pub async fn start_sampling(&self, period: Duration) {
        let mut guard = self.sampler.lock().await;
        if let Some(task) = guard.take() {
            task.abort();
        }

        let sim = Arc::clone(&self.sim);
        let p_bo_tx = Arc::clone(&self.p_bo_tx);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            // The first interval tick fires immediately; skip it so the
            // seed frame survives for one full period.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let mut sim = sim.lock().await;
                let entry = sim.advance();
                p_bo_tx.send_replace(entry.p_bo_pct);
            }
        });

        *guard = Some(handle);
    }

    /// Cancels the sampling task, if one is running.
    pub async fn shutdown(&self) {
        let mut guard = self.sampler.lock().await;
        if let Some(task) = guard.take() {
            task.abort();
        }
    }

    /// Current sensor state.
    pub async fn snapshot(&self) -> TelemetrySnapshot {
        let sim = self.sim.lock().await;
        let last_update = sim.log().latest().map(|entry| entry.timestamp);
        TelemetrySnapshot::from_frame(sim.frame(), sim.sample_count(), last_update)
    }

    /// Most recent `limit` log entries, oldest first.
    pub async fn recent(&self, limit: usize) -> (Vec<LogRow>, usize, usize) {
        let sim = self.sim.lock().await;
        let rows = sim
            .log()
            .recent(limit)
            .iter()
            .map(LogRow::from)
            .collect();
        (rows, sim.log().len(), sim.log().capacity())
    }

    /// Full log as CSV (header plus one row per entry).
    pub async fn export_csv(&self) -> String {
        let sim = self.sim.lock().await;
        sim.log().to_csv()
    }

    /// Deploys an artificial odor cloud and republishes the probability.
    pub async fn spritz(&self) -> TelemetrySnapshot {
        let mut sim = self.sim.lock().await;
        sim.spritz_test();
        self.p_bo_tx.send_replace(sim.frame().p_bo_pct());
        let last_update = sim.log().latest().map(|entry| entry.timestamp);
        TelemetrySnapshot::from_frame(sim.frame(), sim.sample_count(), last_update)
    }

    /// Nudges the odor probability by `delta` (0-1 scale) and republishes.
    pub async fn adjust(&self, delta: f64) -> TelemetrySnapshot {
        let mut sim = self.sim.lock().await;
        sim.adjust_probability(delta);
        self.p_bo_tx.send_replace(sim.frame().p_bo_pct());
        let last_update = sim.log().latest().map(|entry| entry.timestamp);
        TelemetrySnapshot::from_frame(sim.frame(), sim.sample_count(), last_update)
    }
}
