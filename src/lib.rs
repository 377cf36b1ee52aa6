//! gearflow: servicio de pipeline de inspección de engranajes.
//!
//! - `api`: peticiones/respuestas y `GearService` sobre el proyecto activo.
//! - `config`: configuración desde `.env` / variables `GEARFLOW_*`.
//! - `errors`: errores de la capa de aplicación.
//!
//! El núcleo (workspace, store, contrato de stages) vive en `gear-core` y los
//! stages concretos en `gear-stages`.

pub mod api;
pub mod config;
pub mod errors;

pub use api::{Endpoint, Envelope, GearService, Request, Response, ResponseBody, StageSlot};
pub use config::AppConfig;
pub use errors::AppError;
