//! Máquina de estados assíncrona do agendador
//!
//! Estados: {Stopped, Scheduled}. Em Scheduled existe exatamente um timer
//! pendente; `start` em um agendador já agendado cancela antes de reagendar,
//! e `stop` cancela incondicionalmente. O drop do agendador também cancela,
//! para que o teardown da view nunca deixe um timer disparando em contexto
//! destruído.

use odorly_core::rng::{EntropySource, NoiseSource};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::counter::ClickCounter;
use crate::error::GeigerResult;
use crate::rate::{click_rate, next_interval, RateConfig};

/// Capacidade do canal de eventos de clique
const CLICK_CHANNEL_CAPACITY: usize = 64;

/// Estado do agendador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    /// Nenhum timer pendente
    Stopped,
    /// Exatamente um timer pendente
    Scheduled,
}

/// Um clique emitido pelo processo de Poisson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    /// Número de sequência desde o início da task corrente
    pub seq: u64,
}

/// Agendador de cliques Geiger
///
/// Observa a probabilidade de odor (em percentual) por um canal `watch` e
/// emite cliques com intervalos exponenciais, reavaliando a taxa a cada
/// disparo.
#[derive(Debug)]
pub struct GeigerScheduler<R = EntropySource> {
    config: RateConfig,
    probability: watch::Receiver<f64>,
    counter: ClickCounter,
    clicks: broadcast::Sender<ClickEvent>,
    noise: R,
    task: Option<JoinHandle<()>>,
}

impl GeigerScheduler {
    /// Cria agendador parado com configuração padrão
    pub fn new(probability: watch::Receiver<f64>) -> Self {
        Self::with_config(RateConfig::default(), probability)
            .expect("Default RateConfig should be valid")
    }

    /// Cria agendador parado com configuração específica
    pub fn with_config(
        config: RateConfig,
        probability: watch::Receiver<f64>,
    ) -> GeigerResult<Self> {
        Self::with_noise(config, probability, EntropySource::new())
    }
}

impl<R: NoiseSource + Clone + 'static> GeigerScheduler<R> {
    /// Cria agendador parado com fonte de ruído injetada
    ///
    /// Cada `start` clona a fonte, de modo que reiniciar um agendador com
    /// fonte semeada reproduz a mesma sequência de intervalos.
    pub fn with_noise(
        config: RateConfig,
        probability: watch::Receiver<f64>,
        noise: R,
    ) -> GeigerResult<Self> {
        config.validate()?;
        let (clicks, _) = broadcast::channel(CLICK_CHANNEL_CAPACITY);

        Ok(Self {
            config,
            probability,
            counter: ClickCounter::new(),
            clicks,
            noise,
            task: None,
        })
    }
}

impl<R> GeigerScheduler<R> {
    /// Estado corrente da máquina
    pub fn state(&self) -> SchedulerState {
        if self.task.is_some() {
            SchedulerState::Scheduled
        } else {
            SchedulerState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Scheduled
    }

    /// Contador compartilhado de cliques
    pub fn counter(&self) -> ClickCounter {
        self.counter.clone()
    }

    /// Assina o fluxo de eventos de clique
    pub fn subscribe(&self) -> broadcast::Receiver<ClickEvent> {
        self.clicks.subscribe()
    }

    /// Taxa nominal (sem jitter) para a probabilidade corrente
    pub fn nominal_rate(&self) -> f64 {
        let pct = *self.probability.borrow();
        (self.config.base + self.config.coupling * pct).max(0.0)
    }

    /// Cancela o timer pendente, se houver
    pub fn stop(&mut self) {
        if let Some(handle) = self.task.take() {
            handle.abort();
        }
    }
}

impl<R: NoiseSource + Clone + 'static> GeigerScheduler<R> {
    /// Inicia (ou reinicia) o processo de cliques
    ///
    /// Se já houver timer pendente ele é cancelado antes do novo agendamento,
    /// garantindo um único timer por vez.
    pub fn start(&mut self) {
        self.stop();

        let config = self.config.clone();
        let mut probability = self.probability.clone();
        let counter = self.counter.clone();
        let clicks = self.clicks.clone();
        let mut noise = self.noise.clone();

        let handle = tokio::spawn(async move {
            let mut seq: u64 = 0;

            loop {
                let pct = *probability.borrow_and_update();
                let rate = click_rate(&config, pct, &mut noise);
                let dt = next_interval(&config, rate, &mut noise);
                tokio::time::sleep(dt).await;

                seq += 1;
                counter.record();
                // Sem assinantes o envio falha; o contador continua valendo
                let _ = clicks.send(ClickEvent { seq });
            }
        });

        self.task = Some(handle);
    }
}

impl<R> Drop for GeigerScheduler<R> {
    fn drop(&mut self) {
        self.stop();
    }
}
