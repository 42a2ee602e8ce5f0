//! Função de taxa e sorteio de intervalos
//!
//! A parte pura do agendador: dado o percentual de odor e uma fonte de ruído,
//! calcula a taxa instantânea (cliques/segundo) e o próximo intervalo
//! exponencial. Separada do driver assíncrono para ser testável em síncrono.

use std::time::Duration;

use odorly_core::rng::NoiseSource;
use serde::{Deserialize, Serialize};

use crate::error::{GeigerError, GeigerResult};

/// Constantes da função de taxa
///
/// `rate = max(0, base + coupling * p_bo_pct + jitter)`, com jitter uniforme
/// em `[-jitter_span/2, +jitter_span/2]`. Valores herdados do painel original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateConfig {
    /// Cliques por segundo em repouso
    pub base: f64,
    /// Acoplamento com o percentual de odor
    pub coupling: f64,
    /// Largura total do jitter uniforme
    pub jitter_span: f64,
    /// Piso da taxa usado no sorteio exponencial (evita divisão por zero)
    pub min_rate: f64,
    /// Piso do intervalo entre cliques
    pub min_interval: Duration,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            base: 0.8,
            coupling: 0.06,
            jitter_span: 0.2,
            min_rate: 0.01,
            min_interval: Duration::from_millis(8),
        }
    }
}

impl RateConfig {
    pub fn validate(&self) -> GeigerResult<()> {
        if self.base < 0.0 {
            return Err(GeigerError::InvalidConfig(
                "Base rate must be non-negative".into(),
            ));
        }
        if self.jitter_span < 0.0 {
            return Err(GeigerError::InvalidConfig(
                "Jitter span must be non-negative".into(),
            ));
        }
        if self.min_rate <= 0.0 {
            return Err(GeigerError::InvalidConfig(
                "Minimum rate must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Taxa instantânea de cliques para um percentual de odor [0, 100]
pub fn click_rate<R: NoiseSource>(config: &RateConfig, p_bo_pct: f64, noise: &mut R) -> f64 {
    let jitter = (noise.uniform() - 0.5) * config.jitter_span;
    (config.base + config.coupling * p_bo_pct + jitter).max(0.0)
}

/// Sorteia o próximo intervalo entre cliques (exponencial, com pisos)
///
/// `dt = -ln(1 - u) / max(rate, min_rate)`, nunca abaixo de `min_interval`.
pub fn next_interval<R: NoiseSource>(config: &RateConfig, rate: f64, noise: &mut R) -> Duration {
    let u = noise.uniform();
    let dt_secs = -(1.0 - u).ln() / rate.max(config.min_rate);
    Duration::from_secs_f64(dt_secs).max(config.min_interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use odorly_core::rng::ConstantSource;

    #[test]
    fn test_rate_at_rest() {
        // Jitter 0 com fonte constante em 0.5
        let mut noise = ConstantSource(0.5);
        let rate = click_rate(&RateConfig::default(), 0.0, &mut noise);
        assert!((rate - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_rate_at_full_scale() {
        let mut noise = ConstantSource(0.5);
        let rate = click_rate(&RateConfig::default(), 100.0, &mut noise);
        assert!((rate - 6.8).abs() < 1e-12);
    }

    #[test]
    fn test_rate_jitter_bounds() {
        let config = RateConfig::default();
        let mut low = ConstantSource(0.0);
        let mut high = ConstantSource(0.9999);

        let rate_low = click_rate(&config, 0.0, &mut low);
        let rate_high = click_rate(&config, 0.0, &mut high);
        assert!((rate_low - 0.7).abs() < 1e-12);
        assert!(rate_high < 0.9 + 1e-6);
    }

    #[test]
    fn test_rate_never_negative() {
        let config = RateConfig {
            base: 0.0,
            ..Default::default()
        };
        let mut noise = ConstantSource(0.0); // jitter = -0.1
        let rate = click_rate(&config, 0.0, &mut noise);
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn test_interval_median_at_half_draw() {
        // u = 0.5 => dt = ln 2 / rate
        let mut noise = ConstantSource(0.5);
        let dt = next_interval(&RateConfig::default(), 0.8, &mut noise);
        assert!((dt.as_secs_f64() - (2.0_f64).ln() / 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_interval_floor() {
        let mut noise = ConstantSource(0.5);
        let dt = next_interval(&RateConfig::default(), 10_000.0, &mut noise);
        assert_eq!(dt, Duration::from_millis(8));
    }

    #[test]
    fn test_interval_uses_min_rate_when_rate_is_zero() {
        let mut noise = ConstantSource(0.5);
        let dt = next_interval(&RateConfig::default(), 0.0, &mut noise);
        // ln 2 / 0.01 = ~69.3 s: silêncio efetivo, mas finito
        assert!(dt.as_secs_f64() > 60.0);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let config = RateConfig {
            base: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RateConfig {
            min_rate: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
