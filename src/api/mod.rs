//! Interfaz de peticiones del pipeline, independiente del transporte.
//!
//! `GearService::handle` recibe un `Request` y devuelve un `Response` con el
//! envelope `{code, msg, data}` o los bytes de una descarga.

pub mod envelope;
pub mod request;
pub mod service;
pub mod wire;

pub use envelope::{Envelope, Response, ResponseBody, CODE_OK};
pub use request::{Endpoint, Request};
pub use service::{GearService, StageSlot};
