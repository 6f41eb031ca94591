//! Sector map generation core.
//!
//! Builds the directed, floor-by-floor node graph that drives
//! branching-path gameplay: weighted start points, a single boss node,
//! per-node gameplay types under floor restrictions, and anti-repetition
//! repair along every traced path. Rendering, input, and asset lookup live
//! with external collaborators; this crate exposes and consumes plain data.

pub mod config;
pub mod frontier;
pub mod model;
pub mod types;

mod activation;
mod error;
mod generator;
mod grid;
mod sampler;

pub use activation::{ActivationSink, NullSink};
pub use config::{
    EncounterTable, EncounterWeight, FloorOverride, GenerationConfig, NodeRestriction, TypeWeight,
};
pub use error::GenerationError;
pub use frontier::{Frontier, FrontierError};
pub use generator::MapGenerator;
pub use grid::Grid;
pub use model::{Node, SectorMap};
pub use types::{GridPos, NodeType, WorldPos};

/// Generates one sector map from `config` and `seed`.
pub fn generate(config: &GenerationConfig, seed: u64) -> Result<SectorMap, GenerationError> {
    MapGenerator::new(config.clone())?.generate(seed)
}
