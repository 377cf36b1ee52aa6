//! Modelos neutrales (Artifact, StageInput, StageResult).

pub mod artifact;
pub mod stage_io;

pub use artifact::{Artifact, ArtifactStat};
pub use stage_io::{StageInput, StageResult};
