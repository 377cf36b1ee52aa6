//! Errores del núcleo de workspace/artifacts.
//!
//! Taxonomía única compartida por workspace, store y stages. Es `Clone` +
//! `Serialize` para poder quedar registrada en el journal del proyecto.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum WorkspaceError {
    /// Campos ausentes o mal formados en la entrada.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Artifact o proyecto referenciado inexistente.
    #[error("not found: {0}")]
    NotFound(String),
    /// Creación duplicada de proyecto.
    #[error("project already exists: {0}")]
    AlreadyExists(String),
    /// Operación de stage/archivo antes de `create-project`.
    #[error("no active project")]
    NoActiveProject,
    /// Fallo de IO en disco o template ausente (`template missing: ...`).
    /// Los errores de IO entran por `WorkspaceError::storage`.
    #[error("storage failure: {0}")]
    StorageFailure(String),
}

/// Clase estable de un error, independiente del detalle interno.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    Client,
    Missing,
    Conflict,
    Precondition,
    Storage,
}

/// Prefijo usado para distinguir un template ausente dentro de `StorageFailure`.
pub const TEMPLATE_MISSING_PREFIX: &str = "template missing";

impl WorkspaceError {
    pub fn storage(context: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        Self::StorageFailure(format!("{context}: {err}"))
    }

    pub fn template_missing(path: &std::path::Path) -> Self {
        Self::StorageFailure(format!("{TEMPLATE_MISSING_PREFIX}: {}", path.display()))
    }

    pub fn is_template_missing(&self) -> bool {
        matches!(self, Self::StorageFailure(m) if m.starts_with(TEMPLATE_MISSING_PREFIX))
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidInput(_) => ErrorClass::Client,
            Self::NotFound(_) => ErrorClass::Missing,
            Self::AlreadyExists(_) => ErrorClass::Conflict,
            Self::NoActiveProject => ErrorClass::Precondition,
            Self::StorageFailure(_) => ErrorClass::Storage,
        }
    }

    /// Código numérico normalizado (coincide con el status HTTP).
    pub fn status_code(&self) -> u16 {
        match self.class() {
            ErrorClass::Client => 400,
            ErrorClass::Missing => 404,
            ErrorClass::Conflict => 409,
            ErrorClass::Precondition => 412,
            ErrorClass::Storage => 500,
        }
    }

    /// Mensaje apto para el cliente: nunca incluye texto de errores del SO.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidInput(m) => format!("invalid input: {m}"),
            Self::NotFound(name) => format!("not found: {name}"),
            Self::AlreadyExists(name) => format!("project already exists: {name}"),
            Self::NoActiveProject => "no active project".to_string(),
            Self::StorageFailure(_) if self.is_template_missing() => "template asset unavailable".to_string(),
            Self::StorageFailure(_) => "storage failure".to_string(),
        }
    }
}
