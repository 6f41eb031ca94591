//! Coordinate and node-kind primitives shared across generation.

use serde::{Deserialize, Serialize};

/// Gameplay role assigned to a map cell.
///
/// `None` marks a cell whose type has not been assigned yet; generated maps
/// never contain it. `Boss` is placed explicitly at the reserved boss cell
/// and never appears in weight tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeType {
    None,
    NormalEncounter,
    EliteEncounter,
    Chest,
    RestSpot,
    Event,
    Merchant,
    Boss,
}

impl NodeType {
    /// Types that carry a weighted encounter payload sub-table.
    #[must_use]
    pub fn carries_encounter(self) -> bool {
        matches!(
            self,
            Self::NormalEncounter | Self::EliteEncounter | Self::Chest | Self::Event
        )
    }
}

/// Grid coordinate: `floor` is the progression axis (0 = start column,
/// `floors` = the boss column), `slot` the position within a floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub floor: u32,
    pub slot: u32,
}

/// 2D world-space position consumed by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}
