//! Errores de la capa de aplicación (configuración, binario, transporte).
use gear_core::WorkspaceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}
