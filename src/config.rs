//! Configuración de la aplicación.
//! Carga `.env` una sola vez y lee variables `GEARFLOW_*`. Valores inválidos
//! son errores (`AppError::Config`), no panics.
use std::env;
use std::path::PathBuf;

use gear_core::NamingStrategy;
use once_cell::sync::Lazy;

use crate::errors::AppError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenvy::dotenv(); // ignora error si no existe .env
});

/// Forzar carga temprana de .env.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

pub const DEFAULT_TEMPLATE_ROOT: &str = "./assets";
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Raíz del árbol de templates (`model/`, `cloudmap/`).
    pub template_root: PathBuf,
    pub naming: NamingStrategy,
    /// Factor de la latencia simulada de los stages (0 = sin espera).
    pub latency_scale: f64,
    pub max_upload_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { template_root: PathBuf::from(DEFAULT_TEMPLATE_ROOT),
               naming: NamingStrategy::default(),
               latency_scale: 1.0,
               max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        init_dotenv();
        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let mut cfg = Self::default();
        if let Some(root) = lookup("GEARFLOW_TEMPLATE_ROOT").filter(|v| !v.trim().is_empty()) {
            cfg.template_root = PathBuf::from(root);
        }
        if let Some(naming) = lookup("GEARFLOW_NAMING") {
            cfg.naming = naming.parse().map_err(|e: String| AppError::Config(format!("GEARFLOW_NAMING: {e}")))?;
        }
        if let Some(scale) = lookup("GEARFLOW_LATENCY_SCALE") {
            let parsed: f64 = scale.trim()
                                   .parse()
                                   .map_err(|_| AppError::Config(format!("GEARFLOW_LATENCY_SCALE: not a number '{scale}'")))?;
            if !parsed.is_finite() || parsed < 0.0 {
                return Err(AppError::Config(format!("GEARFLOW_LATENCY_SCALE must be >= 0, got {parsed}")));
            }
            cfg.latency_scale = parsed;
        }
        if let Some(max) = lookup("GEARFLOW_MAX_UPLOAD_BYTES") {
            cfg.max_upload_bytes =
                max.trim()
                   .parse()
                   .map_err(|_| AppError::Config(format!("GEARFLOW_MAX_UPLOAD_BYTES: not an integer '{max}'")))?;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn reads_all_keys() {
        let cfg = AppConfig::from_lookup(lookup(&[("GEARFLOW_TEMPLATE_ROOT", "/srv/assets"),
                                                  ("GEARFLOW_NAMING", "timestamp"),
                                                  ("GEARFLOW_LATENCY_SCALE", "0"),
                                                  ("GEARFLOW_MAX_UPLOAD_BYTES", "1024")])).unwrap();
        assert_eq!(cfg.template_root, PathBuf::from("/srv/assets"));
        assert_eq!(cfg.naming, NamingStrategy::Timestamp);
        assert_eq!(cfg.latency_scale, 0.0);
        assert_eq!(cfg.max_upload_bytes, 1024);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup(&[("GEARFLOW_NAMING", "random")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("GEARFLOW_LATENCY_SCALE", "-1")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("GEARFLOW_LATENCY_SCALE", "fast")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("GEARFLOW_MAX_UPLOAD_BYTES", "lots")])).is_err());
    }
}
