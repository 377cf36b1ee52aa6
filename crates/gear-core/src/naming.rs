//! Artifact Namer: nombres de archivo para outputs de stages.
//!
//! Formato `"{base}_{timestamp}.{ext}"` con timestamp de granularidad segundo.
//!
//! Limitación conocida de la estrategia `Timestamp`: dos nombres generados en
//! el mismo segundo colisionan y el segundo `save` sobrescribe al primero sin
//! aviso. La estrategia `Unique` (por defecto) añade un contador monótono de
//! proceso y el store abre en modo create-new, así que nunca sobrescribe.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::constants::{FALLBACK_BASE_NAME, TIMESTAMP_FORMAT};

/// Fuente de tiempo inyectable (permite nombres deterministas en tests).
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Reloj congelado en un instante fijo.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    /// Construye desde componentes locales; `None` si la fecha no existe.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        Local.with_ymd_and_hms(year, month, day, hour, min, sec).single().map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    /// Sólo timestamp; colisiona dentro del mismo segundo.
    Timestamp,
    /// Timestamp + contador monótono.
    #[default]
    Unique,
}

impl std::str::FromStr for NamingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timestamp" => Ok(Self::Timestamp),
            "unique" | "counter" => Ok(Self::Unique),
            other => Err(format!("unknown naming strategy '{other}'")),
        }
    }
}

#[derive(Debug)]
pub struct ArtifactNamer {
    strategy: NamingStrategy,
    clock: Arc<dyn Clock>,
    counter: AtomicU64,
}

impl ArtifactNamer {
    pub fn new(strategy: NamingStrategy, clock: Arc<dyn Clock>) -> Self {
        Self { strategy,
               clock,
               counter: AtomicU64::new(0) }
    }

    pub fn with_strategy(strategy: NamingStrategy) -> Self {
        Self::new(strategy, Arc::new(SystemClock))
    }

    pub fn strategy(&self) -> NamingStrategy {
        self.strategy
    }

    /// Genera un nombre a partir de `base` y `extension` (sin punto inicial).
    pub fn name(&self, base: &str, extension: &str) -> String {
        let base = sanitize_component(base);
        let ts = self.clock.now().format(TIMESTAMP_FORMAT).to_string();
        let stem = match self.strategy {
            NamingStrategy::Timestamp => format!("{base}_{ts}"),
            NamingStrategy::Unique => {
                let seq = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
                format!("{base}_{ts}_{seq}")
            }
        };
        let ext = extension.trim_start_matches('.');
        if ext.is_empty() { stem } else { format!("{stem}.{ext}") }
    }
}

impl Default for ArtifactNamer {
    fn default() -> Self {
        Self::with_strategy(NamingStrategy::default())
    }
}

/// Separa un nombre de archivo en (stem, extensión) tras quitar directorios.
pub fn split_file_name(file_name: &str) -> (String, String) {
    let flat = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    match flat.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), ext.to_string()),
        _ => (flat.to_string(), String::new()),
    }
}

/// Reduce `raw` a un único componente de ruta seguro.
fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw.chars()
                             .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
                             .collect();
    let cleaned = cleaned.replace("..", "_");
    let cleaned = cleaned.trim().trim_matches('.');
    if cleaned.is_empty() { FALLBACK_BASE_NAME.to_string() } else { cleaned.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed() -> Arc<dyn Clock> {
        Arc::new(FixedClock::at(2026, 10, 19, 10, 15, 0).expect("valid date"))
    }

    #[test]
    fn timestamp_strategy_is_deterministic_and_collides() {
        let namer = ArtifactNamer::new(NamingStrategy::Timestamp, fixed());
        let a = namer.name("gear1_heatmap", "png");
        let b = namer.name("gear1_heatmap", "png");
        assert_eq!(a, "gear1_heatmap_20261019101500.png");
        // limitación documentada: mismo segundo => mismo nombre
        assert_eq!(a, b);
    }

    #[test]
    fn unique_strategy_never_repeats_within_same_second() {
        let namer = ArtifactNamer::new(NamingStrategy::Unique, fixed());
        let a = namer.name("report", "json");
        let b = namer.name("report", "json");
        assert_eq!(a, "report_20261019101500_1.json");
        assert_eq!(b, "report_20261019101500_2.json");
    }

    #[test]
    fn empty_extension_has_no_trailing_dot() {
        let namer = ArtifactNamer::new(NamingStrategy::Timestamp, fixed());
        assert_eq!(namer.name("raw", ""), "raw_20261019101500");
    }

    #[test]
    fn base_is_flattened() {
        let namer = ArtifactNamer::new(NamingStrategy::Timestamp, fixed());
        assert_eq!(namer.name("../etc/passwd", "txt"), "__etc_passwd_20261019101500.txt");
        assert_eq!(namer.name("  ", "txt"), "artifact_20261019101500.txt");
    }

    #[test]
    fn split_handles_dirs_and_dotfiles() {
        assert_eq!(split_file_name("C:\\imgs\\gear1.png"), ("gear1".into(), "png".into()));
        assert_eq!(split_file_name("archive.tar.gz"), ("archive.tar".into(), "gz".into()));
        assert_eq!(split_file_name(".hidden"), (".hidden".into(), String::new()));
        assert_eq!(split_file_name("README"), ("README".into(), String::new()));
    }

    #[test]
    fn strategy_parses_from_env_strings() {
        assert_eq!("timestamp".parse::<NamingStrategy>(), Ok(NamingStrategy::Timestamp));
        assert_eq!(" Unique ".parse::<NamingStrategy>(), Ok(NamingStrategy::Unique));
        assert!("random".parse::<NamingStrategy>().is_err());
    }
}
