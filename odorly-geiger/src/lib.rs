//! # odorly-geiger — Agendador de Cliques Geiger
//!
//! Emite eventos discretos de "clique" a uma taxa variável derivada da
//! probabilidade de odor, para o efeito sonoro de contador Geiger do painel.
//!
//! ## Modelo
//!
//! Processo de Poisson com reavaliação instantânea da taxa: cada intervalo
//! entre cliques é sorteado de uma exponencial com a taxa corrente, e a taxa
//! é recalculada a cada disparo a partir da probabilidade mais recente. O
//! resultado é um processo de Poisson não homogêneo no tempo que acompanha o
//! sinal subjacente sem thinning.
//!
//! ## Exemplo
//!
//! ```ignore
//! use odorly_geiger::GeigerScheduler;
//! use tokio::sync::watch;
//!
//! let (tx, rx) = watch::channel(0.0);
//! let mut scheduler = GeigerScheduler::new(rx);
//! scheduler.start();
//! // ... tx.send_replace(55.0) conforme a simulação avança ...
//! scheduler.stop();
//! ```
//!
//! ## Módulos
//!
//! - [`rate`] - Função de taxa e sorteio de intervalos
//! - [`scheduler`] - Máquina de estados assíncrona {Stopped, Scheduled}
//! - [`counter`] - Janela rolante de CPS/CPM
//! - [`error`] - Tratamento de erros

pub mod counter;
pub mod error;
pub mod rate;
pub mod scheduler;

pub use counter::ClickCounter;
pub use error::{GeigerError, GeigerResult};
pub use rate::{click_rate, next_interval, RateConfig};
pub use scheduler::{ClickEvent, GeigerScheduler, SchedulerState};

#[cfg(test)]
mod tests;
