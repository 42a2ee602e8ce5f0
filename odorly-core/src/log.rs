//! Buffer circular de leituras e exportação CSV

use std::collections::VecDeque;

use crate::types::LogEntry;

/// Cabeçalho do CSV exportado pelo painel
pub const CSV_HEADER: &str = "timestamp,iaq,temp,humidity,gas_ohm,acc,p_bo";

/// Buffer circular de leituras com capacidade limitada
///
/// Ao exceder a capacidade, a leitura mais antiga é descartada (FIFO).
/// Não há persistência: o buffer vive e morre com a sessão.
#[derive(Debug, Clone)]
pub struct TelemetryLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl TelemetryLog {
    /// Capacidade padrão do painel original
    pub const DEFAULT_CAPACITY: usize = 1000;

    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(Self::DEFAULT_CAPACITY)),
            capacity,
        }
    }

    /// Anexa uma leitura, descartando a mais antiga se necessário
    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Leitura mais antiga ainda retida
    pub fn oldest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Leitura mais recente
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Itera em ordem de inserção
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Últimas `n` leituras em ordem de inserção
    pub fn recent(&self, n: usize) -> Vec<LogEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// Exporta o buffer completo como CSV (cabeçalho + uma linha por leitura)
    pub fn to_csv(&self) -> String {
        let mut csv = String::with_capacity(64 * (self.entries.len() + 1));
        csv.push_str(CSV_HEADER);
        for entry in &self.entries {
            csv.push('\n');
            csv.push_str(&entry.to_csv_row());
        }
        csv
    }
}

impl Default for TelemetryLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
