//! Avanço estocástico do vetor de estado
//!
//! Um passeio aleatório dirige o alvo do IAQ; dois estágios de média móvel
//! exponencial em cascata (IAQ perseguindo o alvo, p_bo perseguindo o sinal
//! natural) desacoplam o ruído bruto da probabilidade exibida, produzindo um
//! sinal suave e crível sem hardware real.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{TelemetryError, TelemetryResult};
use crate::log::TelemetryLog;
use crate::rng::NoiseSource;
use crate::types::{LogEntry, SensorFrame, SensorLimits};

/// Constantes de suavização e de eventos do simulador
///
/// Os valores são ajuste cosmético herdado do painel original, preservados
/// como configuração em vez de semântica inferida.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Desvio padrão do drift gaussiano do alvo de IAQ
    pub drift_sigma: f64,
    /// Probabilidade de um burst de odor por tick
    pub burst_probability: f64,
    /// Salto mínimo de um burst
    pub burst_base: f64,
    /// Amplitude adicional uniforme de um burst
    pub burst_span: f64,
    /// Fator do filtro passa-baixa IAQ -> alvo
    pub iaq_alpha: f64,
    /// Desvio padrão do ruído de temperatura
    pub temperature_sigma: f64,
    /// Desvio padrão do ruído de umidade
    pub humidity_sigma: f64,
    /// Desvio padrão do ruído de resistência de gás
    pub gas_sigma: f64,
    /// Probabilidade de incremento do contador de acurácia por tick
    pub accuracy_probability: f64,
    /// Fator do segundo estágio de suavização (p_bo)
    pub bo_alpha: f64,
    /// Salto mínimo do alvo em um spritz test
    pub spritz_base: f64,
    /// Amplitude adicional uniforme de um spritz test
    pub spritz_span: f64,
    /// Acréscimo direto de p_bo em um spritz test
    pub spritz_bo_boost: f64,
    /// Capacidade do buffer de leituras
    pub log_capacity: usize,
    /// Limites físicos dos sinais
    pub limits: SensorLimits,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            drift_sigma: 1.2,
            burst_probability: 0.06,
            burst_base: 25.0,
            burst_span: 40.0,
            iaq_alpha: 0.18,
            temperature_sigma: 0.05,
            humidity_sigma: 0.4,
            gas_sigma: 5000.0,
            accuracy_probability: 0.2,
            bo_alpha: 0.2,
            spritz_base: 60.0,
            spritz_span: 40.0,
            spritz_bo_boost: 0.25,
            log_capacity: TelemetryLog::DEFAULT_CAPACITY,
            limits: SensorLimits::default(),
        }
    }
}

impl SimulatorConfig {
    fn validate(&self) -> TelemetryResult<()> {
        if !(0.0..=1.0).contains(&self.burst_probability) {
            return Err(TelemetryError::InvalidConfig(
                "Burst probability must be within [0, 1]".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.accuracy_probability) {
            return Err(TelemetryError::InvalidConfig(
                "Accuracy probability must be within [0, 1]".into(),
            ));
        }

        if self.iaq_alpha <= 0.0 || self.iaq_alpha > 1.0 {
            return Err(TelemetryError::InvalidConfig(
                "IAQ alpha must be within (0, 1]".into(),
            ));
        }

        if self.bo_alpha <= 0.0 || self.bo_alpha > 1.0 {
            return Err(TelemetryError::InvalidConfig(
                "BO alpha must be within (0, 1]".into(),
            ));
        }

        if self.drift_sigma < 0.0
            || self.temperature_sigma < 0.0
            || self.humidity_sigma < 0.0
            || self.gas_sigma < 0.0
        {
            return Err(TelemetryError::InvalidConfig(
                "Noise sigmas must be non-negative".into(),
            ));
        }

        if self.log_capacity == 0 {
            return Err(TelemetryError::InvalidConfig(
                "Log capacity must be > 0".into(),
            ));
        }

        Ok(())
    }
}

/// Sinal de odor natural derivado do IAQ pós-atualização
///
/// `clamp((iaq - 20) / 160, 0, 1)`: vale 0 em IAQ 20 e satura em 1 a partir
/// de IAQ 180.
pub fn natural_odor(iaq: f64) -> f64 {
    ((iaq - 20.0) / 160.0).clamp(0.0, 1.0)
}

/// Simulador de telemetria do Odor.ly
///
/// Possui o vetor de estado, o buffer de leituras e a fonte de ruído; um
/// tick consome sorteios em ordem fixa, de modo que uma fonte determinística
/// reproduz a sessão bit a bit.
#[derive(Debug, Clone)]
pub struct OdorSimulator<R: NoiseSource> {
    config: SimulatorConfig,
    frame: SensorFrame,
    log: TelemetryLog,
    noise: R,
    sample_count: u64,
}

impl<R: NoiseSource> OdorSimulator<R> {
    /// Cria simulador com configuração padrão
    pub fn new(noise: R) -> Self {
        Self::with_config(SimulatorConfig::default(), noise)
            .expect("Default SimulatorConfig should be valid")
    }

    /// Cria simulador com configuração específica
    pub fn with_config(config: SimulatorConfig, noise: R) -> TelemetryResult<Self> {
        config.validate()?;
        let log = TelemetryLog::new(config.log_capacity);

        Ok(Self {
            config,
            frame: SensorFrame::default(),
            log,
            noise,
            sample_count: 0,
        })
    }

    /// Estado atual
    pub fn frame(&self) -> &SensorFrame {
        &self.frame
    }

    /// Buffer de leituras
    pub fn log(&self) -> &TelemetryLog {
        &self.log
    }

    /// Configuração ativa
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Número de ticks executados
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Executa um tick da simulação e retorna a leitura capturada
    ///
    /// Ordem dos sorteios (fixa): drift do alvo (2 uniformes), teste de burst
    /// (1), magnitude do burst (1, apenas se disparar), ruído de temperatura
    /// (2), umidade (2), gás (2), teste de acurácia (1).
    pub fn advance(&mut self) -> LogEntry {
        let cfg = &self.config;
        let limits = &cfg.limits;

        // 1. Drift gaussiano do alvo
        let drift = self.noise.gaussian(0.0, cfg.drift_sigma);
        let (lo, hi) = limits.target_iaq;
        let mut target = (self.frame.target_iaq + drift).clamp(lo, hi);

        // 2. Burst intermitente de odor
        if self.noise.uniform() < cfg.burst_probability {
            let jump = cfg.burst_base + self.noise.uniform() * cfg.burst_span;
            let (lo, hi) = limits.burst_target_iaq;
            target = (target + jump).clamp(lo, hi);
        }
        self.frame.target_iaq = target;

        // 3. Primeiro estágio EMA: IAQ persegue o alvo
        let (lo, hi) = limits.iaq;
        self.frame.iaq =
            (self.frame.iaq + (target - self.frame.iaq) * cfg.iaq_alpha).clamp(lo, hi);

        // 4. Ruído independente nos sinais de clima
        let (lo, hi) = limits.temperature_c;
        self.frame.temperature_c = (self.frame.temperature_c
            + self.noise.gaussian(0.0, cfg.temperature_sigma))
        .clamp(lo, hi);

        let (lo, hi) = limits.humidity_pct;
        self.frame.humidity_pct =
            (self.frame.humidity_pct + self.noise.gaussian(0.0, cfg.humidity_sigma)).clamp(lo, hi);

        let (lo, hi) = limits.gas_ohm;
        self.frame.gas_ohm =
            (self.frame.gas_ohm + self.noise.gaussian(0.0, cfg.gas_sigma)).clamp(lo, hi);

        // 5. Convergência de calibração (monotônica, satura em 3)
        if self.frame.accuracy < limits.accuracy.1
            && self.noise.uniform() < cfg.accuracy_probability
        {
            self.frame.accuracy += 1;
        }

        // 6-7. Segundo estágio EMA: p_bo persegue o sinal natural
        let natural = natural_odor(self.frame.iaq);
        self.frame.p_bo =
            (self.frame.p_bo + (natural - self.frame.p_bo) * cfg.bo_alpha).clamp(0.0, 1.0);

        // 8. Captura da leitura
        self.sample_count += 1;
        let entry = LogEntry::capture(&self.frame, Utc::now());
        self.log.push(entry.clone());
        entry
    }

    /// Empurra alvo e probabilidade por deltas fornecidos, com clamp
    ///
    /// Ação manual de demonstração; é o único caminho pelo qual `p_bo` muda
    /// de forma descontínua.
    pub fn apply_spike(&mut self, delta_odor: f64, delta_target_iaq: f64) {
        let (lo, hi) = self.config.limits.burst_target_iaq;
        self.frame.target_iaq = (self.frame.target_iaq + delta_target_iaq).clamp(lo, hi);
        self.frame.p_bo = (self.frame.p_bo + delta_odor).clamp(0.0, 1.0);
    }

    /// Spritz test: nuvem de odor artificial
    ///
    /// Reposiciona o alvo bem acima do IAQ atual e dá um acréscimo direto à
    /// probabilidade, como o botão do painel original.
    pub fn spritz_test(&mut self) {
        let jump = self.config.spritz_base + self.noise.uniform() * self.config.spritz_span;
        let (lo, hi) = self.config.limits.burst_target_iaq;
        self.frame.target_iaq = (self.frame.iaq + jump).clamp(lo, hi);
        self.frame.p_bo = (self.frame.p_bo + self.config.spritz_bo_boost).clamp(0.0, 1.0);
    }

    /// Ajuste manual da probabilidade (botões BO +/-)
    pub fn adjust_probability(&mut self, delta: f64) {
        self.frame.p_bo = (self.frame.p_bo + delta).clamp(0.0, 1.0);
    }
}
