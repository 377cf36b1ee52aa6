//! `GearService`: despacho de peticiones sobre el proyecto activo.
//!
//! Cada petición captura el `Workspace` activo una sola vez al comenzar; un
//! `create-project` concurrente no cambia la raíz de una operación en vuelo.

use std::io::Read;
use std::sync::Arc;

use gear_core::{run_stage, ActiveProject, Artifact, ArtifactNamer, ArtifactStore, ErrorClass, InMemoryJournal,
                ProjectEvent, ProjectEventKind, ProjectJournal, StageContext, StageDefinition, StageInput,
                StageResult, Workspace, WorkspaceError};
use gear_stages::{DetectionStage, LatencyProfile, ModelingStage, SimulationStage, TemplateTree};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::envelope::Response;
use super::request::{self, decode, CreateProjectBody, Endpoint, FileNameBody, Request};
use crate::config::AppConfig;

/// Cuál de los tres stages del pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSlot {
    Detection,
    Modeling,
    Simulation,
}

pub struct GearService {
    active: ActiveProject,
    store: ArtifactStore,
    journal: Arc<dyn ProjectJournal>,
    detection: Box<dyn StageDefinition>,
    modeling: Box<dyn StageDefinition>,
    simulation: Box<dyn StageDefinition>,
}

impl GearService {
    pub fn new(store: ArtifactStore, templates: TemplateTree, latency: LatencyProfile) -> Self {
        Self { active: ActiveProject::new(),
               store,
               journal: Arc::new(InMemoryJournal::new()),
               detection: Box::new(DetectionStage::new(latency)),
               modeling: Box::new(ModelingStage::new(templates.clone(), latency)),
               simulation: Box::new(SimulationStage::new(templates, latency)) }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        let store = ArtifactStore::new(ArtifactNamer::with_strategy(cfg.naming)).with_max_bytes(cfg.max_upload_bytes);
        Self::new(store,
                  TemplateTree::new(cfg.template_root.clone()),
                  LatencyProfile::new(cfg.latency_scale))
    }

    pub fn with_journal(mut self, journal: Arc<dyn ProjectJournal>) -> Self {
        self.journal = journal;
        self
    }

    /// Reemplaza la implementación de un stage (p. ej. un modelo real).
    pub fn with_stage(mut self, slot: StageSlot, stage: Box<dyn StageDefinition>) -> Self {
        match slot {
            StageSlot::Detection => self.detection = stage,
            StageSlot::Modeling => self.modeling = stage,
            StageSlot::Simulation => self.simulation = stage,
        }
        self
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn active(&self) -> &ActiveProject {
        &self.active
    }

    /// Punto de entrada único: nunca falla, los errores van en el envelope.
    pub fn handle(&self, req: Request) -> Response {
        let endpoint = req.endpoint();
        match self.dispatch(req) {
            Ok(resp) => resp,
            Err(err) => {
                match err.class() {
                    ErrorClass::Storage => error!("{endpoint} failed: {err}"),
                    _ => warn!("{endpoint} rejected: {err}"),
                }
                Response::error(&err)
            }
        }
    }

    fn dispatch(&self, req: Request) -> Result<Response, WorkspaceError> {
        match req {
            Request::CreateProject(body) => {
                let (name, path) = decode::<CreateProjectBody>(Endpoint::CreateProject, &body)?.into_parts()?;
                let ws = self.create_project(&name, &path)?;
                Ok(Response::ok("project created",
                                json!({ "projectName": ws.name, "projectPath": ws.parent, "root": ws.root })))
            }
            Request::DownloadFile { file_name } => {
                let name = request::require_file_name(file_name)?;
                let bytes = self.download(&name)?;
                Ok(Response::file(name, bytes))
            }
            Request::UploadFile { file_name, bytes } => {
                let art = self.upload(&file_name, &mut bytes.as_slice())?;
                Ok(Response::ok("file uploaded", to_data(&art)?))
            }
            Request::DeleteFile(body) => {
                let name = decode::<FileNameBody>(Endpoint::DeleteFile, &body)?.into_name()?;
                self.delete(&name)?;
                Ok(Response::ok("file deleted", json!({ "fileName": name })))
            }
            Request::AiDetection(body) => {
                let res = self.run(StageSlot::Detection, &request::detection_input(&body)?)?;
                Ok(Response::ok("detection finished", stage_data(&res)?))
            }
            Request::GeometryModeling(body) => {
                let res = self.run(StageSlot::Modeling, &request::modeling_input(&body)?)?;
                Ok(Response::ok("modeling finished", stage_data(&res)?))
            }
            Request::Simulation(body) => {
                let res = self.run(StageSlot::Simulation, &request::simulation_input(&body)?)?;
                Ok(Response::ok("simulation finished", stage_data(&res)?))
            }
            Request::ListFiles => {
                let files = self.list()?;
                Ok(Response::ok("files listed", json!({ "files": files })))
            }
            Request::ProjectInfo => {
                let ws = self.active.current()?;
                Ok(Response::ok("project info", to_data(&ws)?))
            }
            Request::ProjectLog => {
                let events = self.project_log()?;
                Ok(Response::ok("project log", json!({ "events": events })))
            }
        }
    }

    pub fn create_project(&self, name: &str, path: &str) -> Result<Workspace, WorkspaceError> {
        let ws = self.active.create(name, path)?;
        self.journal.append(ws.id,
                            ProjectEventKind::ProjectCreated { name: ws.name.clone(),
                                                               root: ws.root.display().to_string() });
        info!("active project is now {} ({})", ws.name, ws.root.display());
        Ok(ws)
    }

    pub fn upload<R: Read>(&self, file_name: &str, source: &mut R) -> Result<Artifact, WorkspaceError> {
        let ws = self.active.current()?;
        gear_core::workspace::validate_flat_name(file_name.trim(), "fileName")?;
        let art = self.store.save_upload(&ws, file_name.trim(), source)?;
        self.journal.append(ws.id,
                            ProjectEventKind::ArtifactStored { name: art.name.clone(),
                                                               size_bytes: art.size_bytes });
        info!("uploaded {file_name} as {}", art.name);
        Ok(art)
    }

    pub fn download(&self, name: &str) -> Result<Vec<u8>, WorkspaceError> {
        let ws = self.active.current()?;
        self.store.read_bytes(&ws, name)
    }

    pub fn delete(&self, name: &str) -> Result<(), WorkspaceError> {
        let ws = self.active.current()?;
        self.store.delete(&ws, name)?;
        self.journal.append(ws.id, ProjectEventKind::ArtifactDeleted { name: name.to_string() });
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Artifact>, WorkspaceError> {
        let ws = self.active.current()?;
        self.store.list(&ws)
    }

    pub fn project_log(&self) -> Result<Vec<ProjectEvent>, WorkspaceError> {
        let ws = self.active.current()?;
        Ok(self.journal.list(ws.id))
    }

    pub fn run(&self, slot: StageSlot, input: &StageInput) -> Result<StageResult, WorkspaceError> {
        let ws = self.active.current()?;
        let stage = match slot {
            StageSlot::Detection => self.detection.as_ref(),
            StageSlot::Modeling => self.modeling.as_ref(),
            StageSlot::Simulation => self.simulation.as_ref(),
        };
        let ctx = StageContext::new(&ws, &self.store);
        run_stage(stage, &ctx, input, self.journal.as_ref())
    }
}

/// `data` de un stage: una entrada por clave de salida, más `input` (eco) y
/// `output` (resumen del stage, si hay).
fn stage_data(res: &StageResult) -> Result<Value, WorkspaceError> {
    let mut data = Map::new();
    for (key, art) in &res.outputs {
        data.insert(key.clone(), to_data(art)?);
    }
    data.insert("input".into(), to_data(&res.input)?);
    if !res.summary.is_null() {
        data.insert("output".into(), res.summary.clone());
    }
    Ok(Value::Object(data))
}

fn to_data<T: Serialize>(value: &T) -> Result<Value, WorkspaceError> {
    serde_json::to_value(value).map_err(|e| WorkspaceError::StorageFailure(format!("encode response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn unencodable_data_is_storage_failure() {
        // claves no-string no se pueden representar en JSON
        let mut bad = BTreeMap::new();
        bad.insert((1u8, 2u8), "x");
        let err = to_data(&bad).unwrap_err();
        assert!(matches!(err, WorkspaceError::StorageFailure(_)));
        assert_eq!(Response::error(&err).status, 500);
    }

    #[test]
    fn stage_data_flattens_outputs() {
        let res = StageResult::new("simulation", StageInput::params_only(json!({"isDamage": true})))
            .with_output("stress_cloudmap", Artifact::new("s.png", 6))
            .with_summary(json!({"isDamage": true}));
        let data = stage_data(&res).unwrap();
        assert_eq!(data["stress_cloudmap"], json!({"name": "s.png", "size": 6}));
        assert_eq!(data["output"]["isDamage"], json!(true));
        assert_eq!(data["input"]["params"], json!({"isDamage": true}));
    }
}
