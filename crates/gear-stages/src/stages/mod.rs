//! Implementaciones de stages (detection / modeling / simulation).

pub mod detection;
pub mod modeling;
pub mod simulation;

pub use detection::DetectionStage;
pub use modeling::ModelingStage;
pub use simulation::SimulationStage;
