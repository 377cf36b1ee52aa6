//! Envelope de respuesta `{code, msg, data}`.
//!
//! `code` es numérico y coincide con el status: 200 éxito, 400/404/409/412/500
//! según la clase del error (ver `WorkspaceError::status_code`).

use gear_core::WorkspaceError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const CODE_OK: u16 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: u16,
    pub msg: String,
    pub data: Value,
}

impl Envelope {
    pub fn ok(msg: impl Into<String>, data: Value) -> Self {
        Self { code: CODE_OK,
               msg: msg.into(),
               data }
    }

    /// Sólo el mensaje público; el detalle interno se registra en el log.
    pub fn from_error(err: &WorkspaceError) -> Self {
        Self { code: err.status_code(),
               msg: err.public_message(),
               data: json!({}) }
    }

    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Envelope),
    /// Descarga: bytes del artifact con su nombre.
    File { name: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: ResponseBody,
}

impl Response {
    pub fn ok(msg: impl Into<String>, data: Value) -> Self {
        Self { status: CODE_OK,
               body: ResponseBody::Json(Envelope::ok(msg, data)) }
    }

    pub fn file(name: String, bytes: Vec<u8>) -> Self {
        Self { status: CODE_OK,
               body: ResponseBody::File { name, bytes } }
    }

    pub fn error(err: &WorkspaceError) -> Self {
        Self { status: err.status_code(),
               body: ResponseBody::Json(Envelope::from_error(err)) }
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        match &self.body {
            ResponseBody::Json(env) => Some(env),
            ResponseBody::File { .. } => None,
        }
    }
}
