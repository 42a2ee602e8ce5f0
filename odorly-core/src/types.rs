//! Tipos de dados de telemetria

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Limites físicos de cada sinal simulado
///
/// Todo campo limitado permanece dentro destes intervalos após cada tick,
/// independentemente dos sorteios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorLimits {
    /// IAQ exibido [5, 200]
    pub iaq: (f64, f64),
    /// Alvo do passeio aleatório do IAQ [5, 180]
    pub target_iaq: (f64, f64),
    /// Alvo após um burst de odor [10, 200]
    pub burst_target_iaq: (f64, f64),
    /// Temperatura em °C [21, 29]
    pub temperature_c: (f64, f64),
    /// Umidade relativa em % [25, 70]
    pub humidity_pct: (f64, f64),
    /// Resistência do sensor de gás em ohms [20k, 200k]
    pub gas_ohm: (f64, f64),
    /// Contador de acurácia do sensor [0, 3]
    pub accuracy: (u8, u8),
}

impl Default for SensorLimits {
    fn default() -> Self {
        Self {
            iaq: (5.0, 200.0),
            target_iaq: (5.0, 180.0),
            burst_target_iaq: (10.0, 200.0),
            temperature_c: (21.0, 29.0),
            humidity_pct: (25.0, 70.0),
            gas_ohm: (20_000.0, 200_000.0),
            accuracy: (0, 3),
        }
    }
}

/// Vetor de estado do sensor simulado
///
/// Instância única, mutada apenas pelo simulador (um escritor lógico).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorFrame {
    /// Índice de qualidade do ar suavizado
    pub iaq: f64,

    /// Alvo que o IAQ persegue exponencialmente
    pub target_iaq: f64,

    /// Temperatura em graus Celsius
    pub temperature_c: f64,

    /// Umidade relativa (%)
    pub humidity_pct: f64,

    /// Resistência do sensor de gás (ohms)
    pub gas_ohm: f64,

    /// Contador de convergência de calibração (0-3)
    pub accuracy: u8,

    /// Probabilidade de odor corporal [0, 1]
    pub p_bo: f64,
}

impl SensorFrame {
    /// Probabilidade de odor como percentual [0, 100]
    pub fn p_bo_pct(&self) -> f64 {
        self.p_bo * 100.0
    }

    /// Verifica se todos os campos respeitam os limites dados
    pub fn within(&self, limits: &SensorLimits) -> bool {
        let (lo, hi) = limits.iaq;
        let iaq_ok = self.iaq >= lo && self.iaq <= hi;
        let (lo, hi) = limits.temperature_c;
        let temp_ok = self.temperature_c >= lo && self.temperature_c <= hi;
        let (lo, hi) = limits.humidity_pct;
        let hum_ok = self.humidity_pct >= lo && self.humidity_pct <= hi;
        let (lo, hi) = limits.gas_ohm;
        let gas_ok = self.gas_ohm >= lo && self.gas_ohm <= hi;
        let (lo, hi) = limits.accuracy;
        let acc_ok = self.accuracy >= lo && self.accuracy <= hi;
        let bo_ok = (0.0..=1.0).contains(&self.p_bo);

        iaq_ok && temp_ok && hum_ok && gas_ok && acc_ok && bo_ok
    }
}

impl Default for SensorFrame {
    /// Valores de partida da sessão (idênticos ao painel original)
    fn default() -> Self {
        Self {
            iaq: 25.0,
            target_iaq: 25.0,
            temperature_c: 24.5,
            humidity_pct: 45.0,
            gas_ohm: 80_000.0,
            accuracy: 0,
            p_bo: 0.05,
        }
    }
}

/// Classificação qualitativa da probabilidade de odor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OdorStatus {
    /// p_bo < 33%
    Fresh,
    /// 33% <= p_bo < 66%
    Funky,
    /// p_bo >= 66%
    Toxic,
}

impl OdorStatus {
    /// Classifica a partir do percentual [0, 100]
    pub fn from_percent(pct: f64) -> Self {
        if pct >= 66.0 {
            OdorStatus::Toxic
        } else if pct >= 33.0 {
            OdorStatus::Funky
        } else {
            OdorStatus::Fresh
        }
    }

    /// Rótulo exibido no painel
    pub fn label(&self) -> &'static str {
        match self {
            OdorStatus::Fresh => "Fresh",
            OdorStatus::Funky => "Funky",
            OdorStatus::Toxic => "TOXIC BO DETECTED",
        }
    }
}

/// Intensidade do odor derivada do IAQ bruto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmellStrength {
    /// IAQ < 50
    Low,
    /// 50 <= IAQ < 100
    Medium,
    /// IAQ >= 100
    Strong,
}

impl SmellStrength {
    /// Classifica a partir do IAQ atual
    pub fn from_iaq(iaq: f64) -> Self {
        if iaq >= 100.0 {
            SmellStrength::Strong
        } else if iaq >= 50.0 {
            SmellStrength::Medium
        } else {
            SmellStrength::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SmellStrength::Low => "Low",
            SmellStrength::Medium => "Medium",
            SmellStrength::Strong => "Strong",
        }
    }
}

/// Leitura imutável capturada em um tick da simulação
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Instante da captura (UTC)
    pub timestamp: DateTime<Utc>,

    /// IAQ pós-atualização
    pub iaq: f64,

    /// Temperatura (°C)
    pub temperature_c: f64,

    /// Umidade relativa (%)
    pub humidity_pct: f64,

    /// Resistência de gás (ohms)
    pub gas_ohm: f64,

    /// Contador de acurácia
    pub accuracy: u8,

    /// Probabilidade de odor em percentual [0, 100]
    pub p_bo_pct: f64,
}

impl LogEntry {
    /// Captura um snapshot do estado pós-tick
    pub fn capture(frame: &SensorFrame, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            iaq: frame.iaq,
            temperature_c: frame.temperature_c,
            humidity_pct: frame.humidity_pct,
            gas_ohm: frame.gas_ohm,
            accuracy: frame.accuracy,
            p_bo_pct: frame.p_bo_pct(),
        }
    }

    /// Linha CSV no formato do export original
    ///
    /// `timestamp,iaq,temp,humidity,gas_ohm,acc,p_bo` com duas casas para os
    /// sinais contínuos, ohms inteiros e percentual com uma casa.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{:.2},{:.2},{:.2},{},{},{:.1}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.iaq,
            self.temperature_c,
            self.humidity_pct,
            self.gas_ohm.round() as i64,
            self.accuracy,
            self.p_bo_pct,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_frame_matches_seed_values() {
        let frame = SensorFrame::default();
        assert_eq!(frame.iaq, 25.0);
        assert_eq!(frame.target_iaq, 25.0);
        assert_eq!(frame.temperature_c, 24.5);
        assert_eq!(frame.humidity_pct, 45.0);
        assert_eq!(frame.gas_ohm, 80_000.0);
        assert_eq!(frame.accuracy, 0);
        assert_eq!(frame.p_bo, 0.05);
    }

    #[test]
    fn test_default_frame_within_limits() {
        let frame = SensorFrame::default();
        assert!(frame.within(&SensorLimits::default()));
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(OdorStatus::from_percent(0.0), OdorStatus::Fresh);
        assert_eq!(OdorStatus::from_percent(32.9), OdorStatus::Fresh);
        assert_eq!(OdorStatus::from_percent(33.0), OdorStatus::Funky);
        assert_eq!(OdorStatus::from_percent(65.9), OdorStatus::Funky);
        assert_eq!(OdorStatus::from_percent(66.0), OdorStatus::Toxic);
        assert_eq!(OdorStatus::from_percent(100.0), OdorStatus::Toxic);
    }

    #[test]
    fn test_strength_thresholds() {
        assert_eq!(SmellStrength::from_iaq(25.0), SmellStrength::Low);
        assert_eq!(SmellStrength::from_iaq(50.0), SmellStrength::Medium);
        assert_eq!(SmellStrength::from_iaq(99.9), SmellStrength::Medium);
        assert_eq!(SmellStrength::from_iaq(100.0), SmellStrength::Strong);
    }

    #[test]
    fn test_csv_row_format() {
        let frame = SensorFrame::default();
        let ts = Utc.with_ymd_and_hms(2026, 1, 16, 12, 0, 0).unwrap();
        let entry = LogEntry::capture(&frame, ts);
        let row = entry.to_csv_row();
        assert_eq!(row, "2026-01-16T12:00:00.000Z,25.00,24.50,45.00,80000,0,5.0");
    }
}
