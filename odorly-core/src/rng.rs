//! Fonte de ruído injetável
//!
//! A simulação nunca consome aleatoriedade ambiente diretamente: todo sorteio
//! passa pelo trait [`NoiseSource`], permitindo que testes injetem sequências
//! determinísticas e reproduzam um tick bit a bit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

/// Fonte de sorteios uniformes em `[0, 1)`
///
/// O sorteio gaussiano é derivado de dois sorteios uniformes via transformada
/// de Box-Muller, de modo que uma fonte determinística também determina os
/// desvios normais.
pub trait NoiseSource: Send {
    /// Sorteia um valor uniforme em `[0, 1)`
    fn uniform(&mut self) -> f64;

    /// Sorteia um desvio normal N(mu, sigma) via Box-Muller
    fn gaussian(&mut self, mu: f64, sigma: f64) -> f64 {
        let u = 1.0 - self.uniform();
        let v = self.uniform();
        mu + sigma * (-2.0 * u.ln()).sqrt() * (TAU * v).cos()
    }
}

/// Fonte de produção baseada em [`StdRng`]
///
/// Semeável para reprodutibilidade em demos e benchmarks.
#[derive(Debug, Clone)]
pub struct EntropySource {
    rng: StdRng,
}

impl EntropySource {
    /// Cria fonte semeada a partir da entropia do sistema
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Cria fonte com semente fixa
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseSource for EntropySource {
    fn uniform(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Fonte constante para testes determinísticos
///
/// Retorna sempre o mesmo valor; com `0.5` nenhum evento de burst ou de
/// incremento de acurácia dispara e o drift gaussiano é fixo.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSource(pub f64);

impl NoiseSource for ConstantSource {
    fn uniform(&mut self) -> f64 {
        self.0
    }
}

/// Fonte roteirizada para testes que precisam controlar sorteios individuais
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: std::collections::VecDeque<f64>,
    fallback: f64,
}

impl ScriptedSource {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0.5,
        }
    }

    /// Valor usado quando o roteiro se esgota (padrão: 0.5)
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }
}

impl NoiseSource for ScriptedSource {
    fn uniform(&mut self) -> f64 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}
