//! Contenido de los artifacts que generan los stages.
//!
//! Sólo nombre, almacenamiento y metadata son contractuales; los valores
//! concretos (categoría, área, confianza) son mock y no deterministas.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::params::Precision;

/// Conjunto finito de categorías de daño.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageCategory {
    SurfaceWear,
    Pitting,
    RootCrack,
    Spalling,
    ToothBreakage,
    NoDamage,
}

impl DamageCategory {
    pub const ALL: [DamageCategory; 6] = [Self::SurfaceWear,
                                          Self::Pitting,
                                          Self::RootCrack,
                                          Self::Spalling,
                                          Self::ToothBreakage,
                                          Self::NoDamage];

    pub fn is_damage(&self) -> bool {
        !matches!(self, Self::NoDamage)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SurfaceWear => "tooth surface wear",
            Self::Pitting => "pitting",
            Self::RootCrack => "tooth root crack",
            Self::Spalling => "spalling",
            Self::ToothBreakage => "tooth breakage",
            Self::NoDamage => "no damage",
        }
    }
}

/// Hallazgo de detección (va en `summary` y dentro del reporte).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionFinding {
    pub damage_type: DamageCategory,
    pub is_damage: bool,
    /// Porcentaje de superficie afectada.
    pub damage_area: f64,
    pub correlation: f64,
    pub confidence: f64,
    pub precision: Precision,
}

/// Reporte JSON persistido por el stage de detección.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub schema_version: u32,
    pub finding: DetectionFinding,
    pub description: String,
    pub images: Vec<String>,
    pub heatmap: String,
    pub detected_at: DateTime<Local>,
}

impl DetectionReport {
    pub const SCHEMA_VERSION: u32 = 1;
}
