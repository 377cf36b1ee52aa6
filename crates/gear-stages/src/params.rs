//! Parámetros tipados de los stages (JSON camelCase).

use std::fmt;

use gear_core::workspace::validate_flat_name;
use gear_core::WorkspaceError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Identificador de grupo de engranajes: acepta `"G1"` o `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Debe poder usarse como componente de ruta plano.
    pub fn validate(&self) -> Result<(), WorkspaceError> {
        validate_flat_name(&self.0, "group number")
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
        }
        Ok(match Raw::deserialize(d)? {
            Raw::Text(s) => GroupId::from(s.as_str()),
            Raw::Int(n) => GroupId(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    High,
    #[default]
    Medium,
    Low,
}

impl Precision {
    /// Valores no reconocidos se pliegan a `Medium`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }

    /// Latencia base simulada en ms.
    pub fn base_latency_ms(&self) -> u64 {
        match self {
            Self::High => 3000,
            Self::Medium => 2000,
            Self::Low => 1000,
        }
    }
}

impl<'de> Deserialize<'de> for Precision {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(v.as_str().map(Precision::parse_lenient).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionParams {
    #[serde(default)]
    pub precision: Precision,
    /// Semilla opcional para reproducir una corrida.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelingParams {
    #[serde(default, alias = "gearGroupNumber")]
    pub group_number: Option<GroupId>,
    #[serde(default)]
    pub is_damage: Option<bool>,
    /// Variante anterior: estado de daño tomado de un reporte de detección.
    #[serde(default)]
    pub detection_report: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParams {
    #[serde(default, alias = "groupNumber")]
    pub gear_group_number: Option<GroupId>,
    #[serde(default)]
    pub is_damage: Option<bool>,
}

pub(crate) fn require_group(group: Option<GroupId>, field: &str) -> Result<GroupId, WorkspaceError> {
    let group = group.ok_or_else(|| WorkspaceError::InvalidInput(format!("{field} is required")))?;
    group.validate()?;
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn precision_folds_unknown_to_medium() {
        let p: DetectionParams = serde_json::from_value(json!({"precision": "ultra"})).unwrap();
        assert_eq!(p.precision, Precision::Medium);
        let p: DetectionParams = serde_json::from_value(json!({"precision": 3})).unwrap();
        assert_eq!(p.precision, Precision::Medium);
        let p: DetectionParams = serde_json::from_value(json!({"precision": "HIGH"})).unwrap();
        assert_eq!(p.precision, Precision::High);
        let p: DetectionParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.precision, Precision::Medium);
    }

    #[test]
    fn group_accepts_text_or_integer() {
        let p: SimulationParams = serde_json::from_value(json!({"gearGroupNumber": 2, "isDamage": true})).unwrap();
        assert_eq!(p.gear_group_number, Some(GroupId::from("2")));
        let p: ModelingParams = serde_json::from_value(json!({"groupNumber": " G1 "})).unwrap();
        assert_eq!(p.group_number, Some(GroupId::from("G1")));
        let p: ModelingParams = serde_json::from_value(json!({"gearGroupNumber": "G3"})).unwrap();
        assert_eq!(p.group_number, Some(GroupId::from("G3")));
    }

    #[test]
    fn group_must_be_flat() {
        assert!(require_group(Some(GroupId::from("../x")), "groupNumber").is_err());
        assert!(require_group(None, "groupNumber").is_err());
        assert!(require_group(Some(GroupId::from("G1")), "groupNumber").is_ok());
    }
}
