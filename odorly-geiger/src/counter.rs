//! Janela rolante de CPS/CPM
//!
//! Mantém os instantes dos cliques recentes para expor a taxa observada nas
//! unidades do painel: cliques por segundo (janela curta) e por minuto.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Janela usada para o CPS (média sobre os últimos segundos)
const CPS_WINDOW: Duration = Duration::from_secs(10);

/// Janela usada para o CPM
const CPM_WINDOW: Duration = Duration::from_secs(60);

/// Contador de cliques compartilhado entre o driver e os leitores
///
/// `record` é chamado pela task do agendador; `cps`/`cpm` por qualquer
/// leitor. A poda dos instantes antigos acontece nos dois lados.
#[derive(Debug, Clone, Default)]
pub struct ClickCounter {
    inner: Arc<CounterInner>,
}

#[derive(Debug, Default)]
struct CounterInner {
    total: AtomicU64,
    recent: Mutex<VecDeque<Instant>>,
}

impl ClickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra um clique agora
    pub fn record(&self) {
        self.inner.total.fetch_add(1, Ordering::Relaxed);
        let mut recent = self.inner.recent.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        recent.push_back(now);
        Self::prune(&mut recent, now);
    }

    /// Total de cliques desde a criação
    pub fn total(&self) -> u64 {
        self.inner.total.load(Ordering::Relaxed)
    }

    /// Cliques por segundo, média sobre a janela curta
    pub fn cps(&self) -> f64 {
        self.count_within(CPS_WINDOW) as f64 / CPS_WINDOW.as_secs_f64()
    }

    /// Cliques por minuto (contagem na janela de 60 s)
    pub fn cpm(&self) -> u64 {
        self.count_within(CPM_WINDOW)
    }

    fn count_within(&self, window: Duration) -> u64 {
        let mut recent = self.inner.recent.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        Self::prune(&mut recent, now);
        recent
            .iter()
            .filter(|t| now.duration_since(**t) <= window)
            .count() as u64
    }

    fn prune(recent: &mut VecDeque<Instant>, now: Instant) {
        while let Some(front) = recent.front() {
            if now.duration_since(*front) > CPM_WINDOW {
                recent.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_counts_records() {
        let counter = ClickCounter::new();
        assert_eq!(counter.total(), 0);
        for _ in 0..5 {
            counter.record();
        }
        assert_eq!(counter.total(), 5);
    }

    #[test]
    fn test_recent_clicks_visible_in_windows() {
        let counter = ClickCounter::new();
        for _ in 0..10 {
            counter.record();
        }
        assert_eq!(counter.cpm(), 10);
        assert!(counter.cps() > 0.0);
    }

    #[test]
    fn test_clone_shares_state() {
        let counter = ClickCounter::new();
        let other = counter.clone();
        counter.record();
        assert_eq!(other.total(), 1);
    }
}
