//! Endpoints y cuerpos de petición.
//!
//! Los stages usan la forma anidada `{"input": {...}}`; un cuerpo plano se
//! rechaza con `InvalidInput`.

use std::fmt;
use std::str::FromStr;

use gear_core::{StageInput, WorkspaceError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CreateProject,
    DownloadFile,
    UploadFile,
    DeleteFile,
    AiDetection,
    GeometryModeling,
    Simulation,
    ListFiles,
    ProjectInfo,
    ProjectLog,
}

impl Endpoint {
    pub const ALL: [Endpoint; 10] = [Self::CreateProject,
                                     Self::DownloadFile,
                                     Self::UploadFile,
                                     Self::DeleteFile,
                                     Self::AiDetection,
                                     Self::GeometryModeling,
                                     Self::Simulation,
                                     Self::ListFiles,
                                     Self::ProjectInfo,
                                     Self::ProjectLog];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateProject => "create-project",
            Self::DownloadFile => "download-file",
            Self::UploadFile => "upload-file",
            Self::DeleteFile => "delete-file",
            Self::AiDetection => "ai-detection",
            Self::GeometryModeling => "geometry-modeling",
            Self::Simulation => "simulation",
            Self::ListFiles => "list-files",
            Self::ProjectInfo => "project-info",
            Self::ProjectLog => "project-log",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter()
                 .find(|e| e.as_str() == s)
                 .ok_or_else(|| WorkspaceError::InvalidInput(format!("unknown endpoint '{s}'")))
    }
}

/// Petición ya separada de su transporte.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    CreateProject(Value),
    DownloadFile { file_name: Option<String> },
    UploadFile { file_name: String, bytes: Vec<u8> },
    DeleteFile(Value),
    AiDetection(Value),
    GeometryModeling(Value),
    Simulation(Value),
    ListFiles,
    ProjectInfo,
    ProjectLog,
}

impl Request {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::CreateProject(_) => Endpoint::CreateProject,
            Self::DownloadFile { .. } => Endpoint::DownloadFile,
            Self::UploadFile { .. } => Endpoint::UploadFile,
            Self::DeleteFile(_) => Endpoint::DeleteFile,
            Self::AiDetection(_) => Endpoint::AiDetection,
            Self::GeometryModeling(_) => Endpoint::GeometryModeling,
            Self::Simulation(_) => Endpoint::Simulation,
            Self::ListFiles => Endpoint::ListFiles,
            Self::ProjectInfo => Endpoint::ProjectInfo,
            Self::ProjectLog => Endpoint::ProjectLog,
        }
    }
}

pub(crate) fn decode<T: DeserializeOwned>(endpoint: Endpoint, body: &Value) -> Result<T, WorkspaceError> {
    serde_json::from_value(body.clone()).map_err(|e| WorkspaceError::InvalidInput(format!("{endpoint}: {e}")))
}

fn required(field: &str, value: Option<String>) -> Result<String, WorkspaceError> {
    value.filter(|v| !v.trim().is_empty())
         .ok_or_else(|| WorkspaceError::InvalidInput(format!("{field} is required")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectBody {
    #[serde(default)]
    project_name: Option<String>,
    #[serde(default)]
    project_path: Option<String>,
}

impl CreateProjectBody {
    pub fn into_parts(self) -> Result<(String, String), WorkspaceError> {
        Ok((required("projectName", self.project_name)?, required("projectPath", self.project_path)?))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNameBody {
    #[serde(default)]
    file_name: Option<String>,
}

impl FileNameBody {
    pub fn into_name(self) -> Result<String, WorkspaceError> {
        required("fileName", self.file_name)
    }
}

pub fn require_file_name(file_name: Option<String>) -> Result<String, WorkspaceError> {
    required("fileName", file_name)
}

#[derive(Debug, Deserialize)]
struct StageBody {
    #[serde(default)]
    input: Option<Map<String, Value>>,
}

fn stage_fields(endpoint: Endpoint, body: &Value) -> Result<Map<String, Value>, WorkspaceError> {
    let body: StageBody = decode(endpoint, body)?;
    body.input
        .ok_or_else(|| WorkspaceError::InvalidInput(format!("{endpoint}: body must be {{\"input\": {{...}}}}")))
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Result<Option<String>, WorkspaceError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(WorkspaceError::InvalidInput(format!("{key} must be a string, got {other}"))),
    }
}

/// `{"input": {"images": [...], "precision": "high"}}`
pub fn detection_input(body: &Value) -> Result<StageInput, WorkspaceError> {
    let mut fields = stage_fields(Endpoint::AiDetection, body)?;
    let images = match fields.remove("images") {
        Some(Value::Array(items)) => items.into_iter()
                                          .map(|v| match v {
                                              Value::String(s) => Ok(s),
                                              Value::Object(o) => o.get("name")
                                                                   .and_then(Value::as_str)
                                                                   .map(str::to_string)
                                                                   .ok_or_else(|| WorkspaceError::InvalidInput("image entry without name".into())),
                                              other => Err(WorkspaceError::InvalidInput(format!("invalid image entry {other}"))),
                                          })
                                          .collect::<Result<Vec<_>, _>>()?,
        None | Some(Value::Null) => Vec::new(),
        Some(other) => return Err(WorkspaceError::InvalidInput(format!("images must be an array, got {other}"))),
    };
    Ok(StageInput::new(images, Value::Object(fields)))
}

/// `{"input": {"groupNumber": 1, "isDamage": true}}`; `detectionReport`
/// (variante anterior) también se valida como artifact de entrada.
pub fn modeling_input(body: &Value) -> Result<StageInput, WorkspaceError> {
    let fields = stage_fields(Endpoint::GeometryModeling, body)?;
    let artifacts: Vec<String> = string_field(&fields, "detectionReport")?.into_iter().collect();
    Ok(StageInput::new(artifacts, Value::Object(fields)))
}

/// `{"input": {"gearGroupNumber": 1, "isDamage": true, "model": {"name": ...}}}`
pub fn simulation_input(body: &Value) -> Result<StageInput, WorkspaceError> {
    let mut fields = stage_fields(Endpoint::Simulation, body)?;
    let model = match fields.remove("model") {
        None | Some(Value::Null) => None,
        Some(Value::Object(m)) => match m.get("name") {
            Some(Value::String(name)) => Some(name.clone()),
            _ => return Err(WorkspaceError::InvalidInput("model.name must be a string".into())),
        },
        Some(Value::String(name)) => Some(name),
        Some(other) => return Err(WorkspaceError::InvalidInput(format!("invalid model reference {other}"))),
    };
    Ok(StageInput::new(model.into_iter().collect(), Value::Object(fields)))
}
