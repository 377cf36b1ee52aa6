//! Artifact: archivo con nombre dentro de un Workspace.
//!
//! El nombre es único dentro del listado plano del workspace. Un artifact
//! nunca se muta en sitio: re-subir o re-ejecutar produce un nombre nuevo.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub name: String,
    /// Alias `size` para el contrato de respuesta (`{name, size}`).
    #[serde(rename = "size")]
    pub size_bytes: u64,
    /// Digest blake3 (hex) de los bytes escritos; `None` en listados.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl Artifact {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self { name: name.into(),
               size_bytes,
               checksum: None }
    }

    pub fn with_checksum(mut self, checksum: String) -> Self {
        self.checksum = Some(checksum);
        self
    }
}

/// Metadata devuelta por `ArtifactStore::stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactStat {
    pub size_bytes: u64,
}
