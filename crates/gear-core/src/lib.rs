//! gear-core: workspace de proyecto y modelo de artifacts del pipeline.
//!
//! Un único proyecto activo define un directorio raíz (`Workspace`). Cada
//! stage consume artifacts nombrados de ese directorio y escribe artifacts
//! nuevos con nombres generados por `ArtifactNamer`, reportando nombre,
//! tamaño y checksum.
pub mod constants;
pub mod errors;
pub mod hashing;
pub mod journal;
pub mod model;
pub mod naming;
pub mod stage;
pub mod store;
pub mod workspace;

pub use errors::{ErrorClass, WorkspaceError};
pub use journal::{InMemoryJournal, ProjectEvent, ProjectEventKind, ProjectJournal};
pub use model::{Artifact, ArtifactStat, StageInput, StageResult};
pub use naming::{ArtifactNamer, Clock, FixedClock, NamingStrategy, SystemClock};
pub use stage::{run_stage, StageContext, StageDefinition, StageOutcome, TypedStage};
pub use store::ArtifactStore;
pub use workspace::{ActiveProject, Workspace};
