//! Workspace: directorio raíz del proyecto activo.
//!
//! `Workspace` es un valor inmutable; cada operación lo captura al inicio y
//! resuelve rutas contra su `root`. `ActiveProject` es el único slot de
//! proyecto activo del proceso (semántica single-tenant): crear un proyecto
//! nuevo reemplaza el slot, pero las operaciones en vuelo conservan el
//! `Workspace` que capturaron.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::WorkspaceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    pub parent: PathBuf,
    pub root: PathBuf,
}

impl Workspace {
    /// Crea `{parent}/{name}`. Falla si el directorio ya existe.
    pub fn create(name: &str, parent: impl AsRef<Path>) -> Result<Self, WorkspaceError> {
        let name = name.trim();
        validate_flat_name(name, "projectName")?;
        let parent = parent.as_ref();
        if parent.as_os_str().is_empty() {
            return Err(WorkspaceError::InvalidInput("projectPath must not be empty".into()));
        }
        let root = parent.join(name);
        std::fs::create_dir_all(parent).map_err(|e| WorkspaceError::storage(format!("create {}", parent.display()), e))?;
        // create_dir (no _all): falla si ya existe, también ante creaciones concurrentes
        std::fs::create_dir(&root).map_err(|e| match e.kind() {
                                        io::ErrorKind::AlreadyExists => WorkspaceError::AlreadyExists(name.to_string()),
                                        _ => WorkspaceError::storage(format!("create {}", root.display()), e),
                                    })?;
        info!("workspace created at {}", root.display());
        Ok(Self { id: Uuid::new_v4(),
                  name: name.to_string(),
                  parent: parent.to_path_buf(),
                  root })
    }

    /// Abre un directorio existente como workspace (sin crear nada).
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, WorkspaceError> {
        let root: PathBuf = root.into();
        if !root.is_dir() {
            return Err(WorkspaceError::NotFound(root.display().to_string()));
        }
        let name = root.file_name()
                       .map(|n| n.to_string_lossy().into_owned())
                       .ok_or_else(|| WorkspaceError::InvalidInput(format!("not a project dir: {}", root.display())))?;
        let parent = root.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self { id: Uuid::new_v4(),
                  name,
                  parent,
                  root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join puro; no valida existencia.
    pub fn resolve(&self, artifact_name: &str) -> PathBuf {
        self.root.join(artifact_name)
    }

    /// El directorio raíz sigue presente en disco.
    pub fn is_live(&self) -> bool {
        self.root.is_dir()
    }
}

/// Un nombre plano: no vacío, sin separadores y distinto de `.`/`..`.
pub fn validate_flat_name(name: &str, field: &str) -> Result<(), WorkspaceError> {
    if name.is_empty() {
        return Err(WorkspaceError::InvalidInput(format!("{field} must not be empty")));
    }
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(WorkspaceError::InvalidInput(format!("{field} must be a plain file name: '{name}'")));
    }
    Ok(())
}

/// Slot del proyecto activo.
#[derive(Debug, Default)]
pub struct ActiveProject {
    slot: RwLock<Option<Workspace>>,
}

impl ActiveProject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crea el workspace y reemplaza atómicamente el proyecto activo.
    pub fn create(&self, name: &str, parent: impl AsRef<Path>) -> Result<Workspace, WorkspaceError> {
        let ws = Workspace::create(name, parent)?;
        self.replace(ws.clone());
        Ok(ws)
    }

    fn replace(&self, ws: Workspace) {
        let mut guard = match self.slot.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(prev) = guard.as_ref() {
            warn!("replacing active project {} ({}) with {}", prev.name, prev.root.display(), ws.root.display());
        }
        *guard = Some(ws);
    }

    pub fn current(&self) -> Result<Workspace, WorkspaceError> {
        let guard = match self.slot.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clone().ok_or(WorkspaceError::NoActiveProject)
    }
}
