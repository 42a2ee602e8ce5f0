//! Testes do módulo odorly-geiger

use std::time::Duration;

use tokio::sync::watch;

use super::*;

fn fast_config() -> RateConfig {
    // Taxa alta para que testes acumulem cliques em poucos ms virtuais
    RateConfig {
        base: 200.0,
        coupling: 0.0,
        jitter_span: 0.0,
        min_rate: 0.01,
        min_interval: Duration::from_millis(1),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTES DA MÁQUINA DE ESTADOS
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_scheduler_starts_stopped() {
    let (_tx, rx) = watch::channel(0.0);
    let scheduler = GeigerScheduler::new(rx);
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
    assert!(!scheduler.is_running());
}

#[tokio::test]
async fn test_start_transitions_to_scheduled() {
    let (_tx, rx) = watch::channel(0.0);
    let mut scheduler = GeigerScheduler::new(rx);
    scheduler.start();
    assert_eq!(scheduler.state(), SchedulerState::Scheduled);
    scheduler.stop();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    let (_tx, rx) = watch::channel(0.0);
    let mut scheduler = GeigerScheduler::new(rx);
    scheduler.stop();
    scheduler.stop();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
}

#[tokio::test]
async fn test_restart_keeps_single_task() {
    let (_tx, rx) = watch::channel(0.0);
    let mut scheduler = GeigerScheduler::with_config(fast_config(), rx).unwrap();
    scheduler.start();
    scheduler.start();
    scheduler.start();
    assert_eq!(scheduler.state(), SchedulerState::Scheduled);
    scheduler.stop();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
}

#[tokio::test]
async fn test_invalid_config_rejected() {
    let (_tx, rx) = watch::channel(0.0);
    let config = RateConfig {
        base: -1.0,
        ..Default::default()
    };
    assert!(GeigerScheduler::with_config(config, rx).is_err());
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTES DO PROCESSO DE CLIQUES
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test(start_paused = true)]
async fn test_clicks_accumulate_while_scheduled() {
    let (_tx, rx) = watch::channel(0.0);
    let mut scheduler = GeigerScheduler::with_config(fast_config(), rx).unwrap();
    let counter = scheduler.counter();

    scheduler.start();
    tokio::time::sleep(Duration::from_millis(500)).await;
    scheduler.stop();

    // Com taxa de 200 cps e piso de 1 ms, 500 ms rendem dezenas de cliques
    assert!(counter.total() > 10, "expected clicks, got {}", counter.total());
}

#[tokio::test(start_paused = true)]
async fn test_no_clicks_after_stop() {
    let (_tx, rx) = watch::channel(0.0);
    let mut scheduler = GeigerScheduler::with_config(fast_config(), rx).unwrap();
    let counter = scheduler.counter();

    scheduler.start();
    tokio::time::sleep(Duration::from_millis(200)).await;
    scheduler.stop();

    let after_stop = counter.total();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(counter.total(), after_stop);
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_receive_click_events() {
    let (_tx, rx) = watch::channel(0.0);
    let mut scheduler = GeigerScheduler::with_config(fast_config(), rx).unwrap();
    let mut clicks = scheduler.subscribe();

    scheduler.start();
    let event = tokio::time::timeout(Duration::from_secs(5), clicks.recv())
        .await
        .expect("click within virtual 5s")
        .expect("channel open");
    assert!(event.seq >= 1);
    scheduler.stop();
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTES DE ACOPLAMENTO COM A PROBABILIDADE
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_nominal_rate_tracks_probability() {
    let (tx, rx) = watch::channel(0.0);
    let scheduler = GeigerScheduler::new(rx);

    assert!((scheduler.nominal_rate() - 0.8).abs() < 1e-12);

    tx.send_replace(100.0);
    assert!((scheduler.nominal_rate() - 6.8).abs() < 1e-12);

    tx.send_replace(50.0);
    assert!((scheduler.nominal_rate() - 3.8).abs() < 1e-12);
}

#[tokio::test(start_paused = true)]
async fn test_higher_probability_yields_more_clicks() {
    // Mesma configuração, probabilidades diferentes, mesma janela virtual
    let config = RateConfig {
        base: 0.8,
        coupling: 0.06,
        jitter_span: 0.0,
        min_rate: 0.01,
        min_interval: Duration::from_millis(1),
    };

    let (_tx_low, rx_low) = watch::channel(0.0);
    let mut low = GeigerScheduler::with_config(config.clone(), rx_low).unwrap();
    let low_counter = low.counter();
    low.start();
    tokio::time::sleep(Duration::from_secs(120)).await;
    low.stop();

    let (_tx_high, rx_high) = watch::channel(100.0);
    let mut high = GeigerScheduler::with_config(config, rx_high).unwrap();
    let high_counter = high.counter();
    high.start();
    tokio::time::sleep(Duration::from_secs(120)).await;
    high.stop();

    // Esperados ~96 vs ~816 cliques; a ordem não se inverte na prática
    assert!(
        high_counter.total() > low_counter.total() * 2,
        "high {} low {}",
        high_counter.total(),
        low_counter.total()
    );
}

#[tokio::test(start_paused = true)]
async fn test_seeded_noise_reproduces_click_totals() {
    use odorly_core::rng::EntropySource;

    async fn run_session() -> u64 {
        let (_tx, rx) = watch::channel(50.0);
        let mut scheduler =
            GeigerScheduler::with_noise(RateConfig::default(), rx, EntropySource::seeded(7))
                .unwrap();
        let counter = scheduler.counter();

        scheduler.start();
        tokio::time::sleep(Duration::from_secs(30)).await;
        scheduler.stop();
        counter.total()
    }

    let first = run_session().await;
    let second = run_session().await;
    assert!(first > 0, "expected clicks in 30 virtual seconds");
    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn test_constant_noise_clicks_at_fixed_cadence() {
    use odorly_core::rng::ConstantSource;

    // Sem jitter (u = 0.5) a taxa é base e o intervalo é ln(2)/rate, fixo
    let config = RateConfig {
        base: 1.0,
        coupling: 0.0,
        jitter_span: 0.0,
        min_rate: 0.01,
        min_interval: Duration::from_millis(1),
    };

    let (_tx, rx) = watch::channel(0.0);
    let mut scheduler =
        GeigerScheduler::with_noise(config, rx, ConstantSource(0.5)).unwrap();
    let counter = scheduler.counter();

    scheduler.start();
    // dt = ln 2 ≈ 0.6931 s; 10 intervalos cabem em 7 s, o 11º não
    tokio::time::sleep(Duration::from_secs(7)).await;
    scheduler.stop();

    assert_eq!(counter.total(), 10);
}
