//! Public data model for generated sector maps.

use xxhash_rust::xxh3::xxh3_64;

use crate::grid::Grid;
use crate::types::{GridPos, NodeType, WorldPos};

/// One map cell after generation.
///
/// Coordinates are fixed at creation; the type is final once generation
/// returns. `incoming`/`outgoing` hold the path edges touching this node in
/// trace order, deduplicated.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub pos: GridPos,
    pub node_type: NodeType,
    pub activated: bool,
    /// Weighted encounter payload key, for the encounter-bearing types.
    pub encounter: Option<String>,
    /// Presentation anchor: cell center plus the configured cosmetic jitter.
    pub world_pos: WorldPos,
    pub incoming: Vec<GridPos>,
    pub outgoing: Vec<GridPos>,
}

impl Node {
    pub(crate) fn empty(pos: GridPos, world_pos: WorldPos) -> Self {
        Self {
            pos,
            node_type: NodeType::None,
            activated: false,
            encounter: None,
            world_pos,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}

/// Read-only view of one generated map. Wholesale replaced by the next
/// generation run; never mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct SectorMap {
    pub(crate) floors: u32,
    pub(crate) slots_per_floor: u32,
    pub(crate) grid: Grid<Node>,
    pub(crate) boss: GridPos,
    pub(crate) start_points: Vec<GridPos>,
}

impl SectorMap {
    /// Playable floor count; the grid holds one extra column for the boss.
    pub fn floors(&self) -> u32 {
        self.floors
    }

    pub fn slots_per_floor(&self) -> u32 {
        self.slots_per_floor
    }

    pub fn node(&self, pos: GridPos) -> Option<&Node> {
        self.grid.get(pos.floor, pos.slot)
    }

    /// All cells in `(floor, slot)`-major order, boss column included.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.grid.iter()
    }

    pub fn boss_pos(&self) -> GridPos {
        self.boss
    }

    pub fn boss(&self) -> &Node {
        self.node(self.boss)
            .expect("boss position is always inside the grid")
    }

    /// Distinct chosen start nodes in choice order: the initial selectable
    /// set for the presentation layer.
    pub fn start_points(&self) -> &[GridPos] {
        &self.start_points
    }

    pub fn world_position(&self, pos: GridPos) -> WorldPos {
        self.grid.world_position(pos.floor, pos.slot)
    }

    pub fn cell_of(&self, world: WorldPos) -> (i32, i32) {
        self.grid.cell_of(world)
    }

    /// Stable byte serialization of everything gameplay-relevant: types,
    /// activation, payloads, node positions, edges, boss, and start set.
    /// Two runs agree on these bytes iff they produced the same map.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.floors.to_le_bytes());
        bytes.extend(self.slots_per_floor.to_le_bytes());

        for node in self.nodes() {
            bytes.push(match node.node_type {
                NodeType::None => 0,
                NodeType::NormalEncounter => 1,
                NodeType::EliteEncounter => 2,
                NodeType::Chest => 3,
                NodeType::RestSpot => 4,
                NodeType::Event => 5,
                NodeType::Merchant => 6,
                NodeType::Boss => 7,
            });
            bytes.push(u8::from(node.activated));
            match &node.encounter {
                Some(id) => {
                    bytes.extend((id.len() as u32).to_le_bytes());
                    bytes.extend(id.as_bytes());
                }
                None => bytes.extend(0_u32.to_le_bytes()),
            }
            bytes.extend(node.world_pos.x.to_bits().to_le_bytes());
            bytes.extend(node.world_pos.y.to_bits().to_le_bytes());
            bytes.extend((node.outgoing.len() as u32).to_le_bytes());
            for target in &node.outgoing {
                bytes.extend(target.floor.to_le_bytes());
                bytes.extend(target.slot.to_le_bytes());
            }
        }

        bytes.extend(self.boss.floor.to_le_bytes());
        bytes.extend(self.boss.slot.to_le_bytes());
        bytes.extend((self.start_points.len() as u32).to_le_bytes());
        for start in &self.start_points {
            bytes.extend(start.slot.to_le_bytes());
        }
        bytes
    }

    /// `xxh3` digest of [`Self::canonical_bytes`], for replay-style
    /// determinism checks and quick map identity.
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
