//! Contrato de stages.
//!
//! - `StageDefinition`: interfaz neutral (params JSON) usada por el servicio.
//! - `TypedStage`: interfaz tipada con adaptador blanket a la neutral.
//! - `run_stage`: precondiciones + journal alrededor de una ejecución.

pub mod definition;
pub mod runner;
pub mod typed;

pub use definition::{StageContext, StageDefinition};
pub use runner::{check_artifacts, run_stage};
pub use typed::{decode_params, StageOutcome, TypedStage};
