//! Forma JSON de una petición/respuesta para transportes de texto (`serve`).
//!
//! Petición: `{"endpoint": "upload-file", "body": {...}}`. Las subidas llevan
//! `contentBase64` o `path` (archivo local); las descargas se devuelven en
//! base64 dentro del envelope.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use gear_core::WorkspaceError;
use serde::Deserialize;
use serde_json::{json, Value};

use super::envelope::{Envelope, Response, ResponseBody};
use super::request::{decode, Endpoint, Request};

#[derive(Debug, Clone, Deserialize)]
pub struct WireRequest {
    pub endpoint: String,
    #[serde(default)]
    pub body: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadBody {
    file_name: Option<String>,
    #[serde(default)]
    content_base64: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DownloadBody {
    #[serde(default)]
    file_name: Option<String>,
}

impl WireRequest {
    pub fn into_request(self) -> Result<Request, WorkspaceError> {
        let endpoint: Endpoint = self.endpoint.parse()?;
        let body = self.body;
        Ok(match endpoint {
            Endpoint::CreateProject => Request::CreateProject(body),
            Endpoint::DownloadFile => {
                let q: DownloadBody = decode(endpoint, &body)?;
                Request::DownloadFile { file_name: q.file_name }
            }
            Endpoint::UploadFile => {
                let up: UploadBody = decode(endpoint, &body)?;
                let file_name = super::request::require_file_name(up.file_name)?;
                let bytes = match (up.content_base64, up.path) {
                    (Some(b64), _) => STANDARD.decode(b64.trim())
                                              .map_err(|e| WorkspaceError::InvalidInput(format!("contentBase64: {e}")))?,
                    (None, Some(path)) => std::fs::read(&path).map_err(|e| match e.kind() {
                                                                  std::io::ErrorKind::NotFound => WorkspaceError::NotFound(path.clone()),
                                                                  _ => WorkspaceError::storage(format!("read {path}"), e),
                                                              })?,
                    (None, None) => return Err(WorkspaceError::InvalidInput("upload needs contentBase64 or path".into())),
                };
                Request::UploadFile { file_name, bytes }
            }
            Endpoint::DeleteFile => Request::DeleteFile(body),
            Endpoint::AiDetection => Request::AiDetection(body),
            Endpoint::GeometryModeling => Request::GeometryModeling(body),
            Endpoint::Simulation => Request::Simulation(body),
            Endpoint::ListFiles => Request::ListFiles,
            Endpoint::ProjectInfo => Request::ProjectInfo,
            Endpoint::ProjectLog => Request::ProjectLog,
        })
    }
}

/// Convierte una línea JSON en petición; errores de parseo son `InvalidInput`.
pub fn parse_line(line: &str) -> Result<Request, WorkspaceError> {
    let wire: WireRequest =
        serde_json::from_str(line).map_err(|e| WorkspaceError::InvalidInput(format!("malformed request: {e}")))?;
    wire.into_request()
}

pub fn to_envelope(resp: Response) -> Envelope {
    match resp.body {
        ResponseBody::Json(env) => env,
        ResponseBody::File { name, bytes } => Envelope::ok("file downloaded",
                                                           json!({ "fileName": name,
                                                                   "size": bytes.len(),
                                                                   "contentBase64": STANDARD.encode(&bytes) })),
    }
}
