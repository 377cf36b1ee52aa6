//! Artifact Store: primitivas de lectura/escritura acotadas a un Workspace.
//!
//! Todo acceso se re-resuelve contra `workspace.root` en el momento de la
//! llamada; el store no guarda rutas. El layout es plano (sin subdirectorios).

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use blake3::Hasher;
use log::{debug, info, warn};

use crate::constants::MAX_NAME_ATTEMPTS;
use crate::errors::WorkspaceError;
use crate::model::{Artifact, ArtifactStat};
use crate::naming::{split_file_name, ArtifactNamer, NamingStrategy};
use crate::workspace::{validate_flat_name, Workspace};

#[derive(Debug, Default)]
pub struct ArtifactStore {
    namer: ArtifactNamer,
    max_bytes: Option<u64>,
}

impl ArtifactStore {
    pub fn new(namer: ArtifactNamer) -> Self {
        Self { namer, max_bytes: None }
    }

    /// Límite de bytes para `save_upload`. Las escrituras de stages y las
    /// copias de templates no lo aplican.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    pub fn namer(&self) -> &ArtifactNamer {
        &self.namer
    }

    /// Guarda bajo un nombre derivado de `desired_file_name` (`gear1.png`).
    pub fn save<R: Read>(&self, ws: &Workspace, desired_file_name: &str, source: &mut R) -> Result<Artifact, WorkspaceError> {
        let (base, ext) = split_file_name(desired_file_name);
        self.save_as(ws, &base, &ext, source)
    }

    pub fn save_bytes(&self, ws: &Workspace, desired_file_name: &str, bytes: &[u8]) -> Result<Artifact, WorkspaceError> {
        self.save(ws, desired_file_name, &mut io::Cursor::new(bytes))
    }

    /// Igual que `save` pero acotado por `max_bytes`: datos del cliente.
    pub fn save_upload<R: Read>(&self, ws: &Workspace, desired_file_name: &str, source: &mut R) -> Result<Artifact, WorkspaceError> {
        let (base, ext) = split_file_name(desired_file_name);
        self.write_new(ws, &base, &ext, source, self.max_bytes)
    }

    /// Guarda con `base` y `ext` explícitos (outputs de stages).
    pub fn save_as<R: Read>(&self, ws: &Workspace, base: &str, ext: &str, source: &mut R) -> Result<Artifact, WorkspaceError> {
        self.write_new(ws, base, ext, source, None)
    }

    fn write_new<R: Read>(&self,
                          ws: &Workspace,
                          base: &str,
                          ext: &str,
                          source: &mut R,
                          limit: Option<u64>)
                          -> Result<Artifact, WorkspaceError> {
        let (name, mut file) = self.open_fresh(ws, base, ext)?;
        let path = ws.resolve(&name);
        match write_hashed(&mut file, source, limit) {
            Ok((size, checksum)) => {
                debug!("saved artifact {name} ({size} bytes)");
                Ok(Artifact::new(name, size).with_checksum(checksum))
            }
            Err(err) => {
                drop(file);
                let _ = std::fs::remove_file(&path);
                Err(err)
            }
        }
    }

    fn open_fresh(&self, ws: &Workspace, base: &str, ext: &str) -> Result<(String, File), WorkspaceError> {
        match self.namer.strategy() {
            NamingStrategy::Timestamp => {
                let name = self.namer.name(base, ext);
                let path = ws.resolve(&name);
                if path.exists() {
                    warn!("artifact name collision, overwriting {name}");
                }
                let file = File::create(&path).map_err(|e| WorkspaceError::storage(format!("write {name}"), e))?;
                Ok((name, file))
            }
            NamingStrategy::Unique => {
                for _ in 0..MAX_NAME_ATTEMPTS {
                    let name = self.namer.name(base, ext);
                    match OpenOptions::new().write(true).create_new(true).open(ws.resolve(&name)) {
                        Ok(file) => return Ok((name, file)),
                        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                        Err(e) => return Err(WorkspaceError::storage(format!("write {name}"), e)),
                    }
                }
                Err(WorkspaceError::StorageFailure(format!("could not allocate a unique name for '{base}'")))
            }
        }
    }

    /// Abre el artifact como stream de bytes.
    pub fn read(&self, ws: &Workspace, name: &str) -> Result<File, WorkspaceError> {
        let path = self.existing(ws, name)?;
        File::open(&path).map_err(|e| WorkspaceError::storage(format!("open {name}"), e))
    }

    pub fn read_bytes(&self, ws: &Workspace, name: &str) -> Result<Vec<u8>, WorkspaceError> {
        let mut buf = Vec::new();
        self.read(ws, name)?
            .read_to_end(&mut buf)
            .map_err(|e| WorkspaceError::storage(format!("read {name}"), e))?;
        Ok(buf)
    }

    pub fn delete(&self, ws: &Workspace, name: &str) -> Result<(), WorkspaceError> {
        let path = self.existing(ws, name)?;
        std::fs::remove_file(&path).map_err(|e| WorkspaceError::storage(format!("delete {name}"), e))?;
        info!("deleted artifact {name}");
        Ok(())
    }

    pub fn stat(&self, ws: &Workspace, name: &str) -> Result<ArtifactStat, WorkspaceError> {
        let path = self.existing(ws, name)?;
        let meta = std::fs::metadata(&path).map_err(|e| WorkspaceError::storage(format!("stat {name}"), e))?;
        Ok(ArtifactStat { size_bytes: meta.len() })
    }

    pub fn exists(&self, ws: &Workspace, name: &str) -> bool {
        validate_flat_name(name, "fileName").is_ok() && ws.resolve(name).is_file()
    }

    /// Listado plano (sólo archivos regulares), ordenado por nombre.
    pub fn list(&self, ws: &Workspace) -> Result<Vec<Artifact>, WorkspaceError> {
        let entries = std::fs::read_dir(ws.root()).map_err(|e| WorkspaceError::storage("list workspace", e))?;
        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| WorkspaceError::storage("list workspace", e))?;
            let meta = entry.metadata().map_err(|e| WorkspaceError::storage("list workspace", e))?;
            if meta.is_file() {
                out.push(Artifact::new(entry.file_name().to_string_lossy().into_owned(), meta.len()));
            }
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    /// Materializa un asset externo (template) dentro del workspace bajo un
    /// nombre nuevo. Un origen inexistente es `StorageFailure("template missing: ...")`.
    pub fn copy_external(&self, ws: &Workspace, source: &Path, base: &str, ext: &str) -> Result<Artifact, WorkspaceError> {
        if !source.is_file() {
            return Err(WorkspaceError::template_missing(source));
        }
        let mut file = File::open(source).map_err(|e| WorkspaceError::storage(format!("open {}", source.display()), e))?;
        let artifact = self.save_as(ws, base, ext, &mut file)?;
        debug!("copied {} -> {}", source.display(), artifact.name);
        Ok(artifact)
    }

    /// Si `res` es error, borra los artifacts ya escritos por la misma
    /// operación (todo o nada).
    pub fn discard_on_error<T>(&self,
                               ws: &Workspace,
                               written: &[&Artifact],
                               res: Result<T, WorkspaceError>)
                               -> Result<T, WorkspaceError> {
        if res.is_err() {
            for art in written {
                if let Err(e) = std::fs::remove_file(ws.resolve(&art.name)) {
                    warn!("could not discard {}: {e}", art.name);
                }
            }
        }
        res
    }

    fn existing(&self, ws: &Workspace, name: &str) -> Result<std::path::PathBuf, WorkspaceError> {
        validate_flat_name(name, "fileName")?;
        let path = ws.resolve(name);
        if !path.is_file() {
            return Err(WorkspaceError::NotFound(name.to_string()));
        }
        Ok(path)
    }
}

fn write_hashed<R: Read>(file: &mut File, source: &mut R, limit: Option<u64>) -> Result<(u64, String), WorkspaceError> {
    let mut hasher = Hasher::new();
    let mut buf = [0u8; 16 * 1024];
    let mut size: u64 = 0;
    loop {
        let n = source.read(&mut buf).map_err(|e| WorkspaceError::storage("read source", e))?;
        if n == 0 {
            break;
        }
        size += n as u64;
        if let Some(max) = limit {
            if size > max {
                return Err(WorkspaceError::InvalidInput(format!("artifact exceeds {max} bytes")));
            }
        }
        hasher.update(&buf[..n]);
        file.write_all(&buf[..n]).map_err(|e| WorkspaceError::storage("write", e))?;
    }
    file.sync_all().map_err(|e| WorkspaceError::storage("sync", e))?;
    Ok((size, hasher.finalize().to_hex().to_string()))
}
