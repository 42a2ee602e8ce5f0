//! # odorly-core — Simulador de Telemetria Odor.ly
//!
//! Implementa o gerador de telemetria sintética que alimenta o painel Odor.ly:
//! um vetor de estado numérico (IAQ, temperatura, umidade, resistência de gás,
//! contador de acurácia) avançado a cada tick por um passeio aleatório com
//! dois estágios de suavização exponencial, derivando a probabilidade de odor
//! corporal exibida ao usuário.
//!
//! ## Sinais
//!
//! - **IAQ**: índice de qualidade do ar, sinal primário da simulação [5, 200]
//! - **p_bo**: probabilidade de odor corporal derivada e suavizada [0, 1]
//!
//! ## Exemplo
//!
//! ```rust
//! use odorly_core::{OdorSimulator, rng::EntropySource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut sim = OdorSimulator::new(EntropySource::seeded(42));
//! let entry = sim.advance();
//! assert!(entry.iaq >= 5.0 && entry.iaq <= 200.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Módulos
//!
//! - [`simulator`] - Avanço estocástico do vetor de estado
//! - [`log`] - Buffer circular de leituras e exportação CSV
//! - [`rng`] - Fonte de ruído injetável (determinística em testes)
//! - [`types`] - Tipos de dados de telemetria
//! - [`error`] - Tratamento de erros

pub mod error;
pub mod log;
pub mod rng;
pub mod simulator;
pub mod types;

pub use error::{TelemetryError, TelemetryResult};
pub use log::TelemetryLog;
pub use rng::{EntropySource, NoiseSource};
pub use simulator::{natural_odor, OdorSimulator, SimulatorConfig};
pub use types::{LogEntry, OdorStatus, SensorFrame, SensorLimits, SmellStrength};
