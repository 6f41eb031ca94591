//! Selectable-node frontier advanced by player choices.
//!
//! Pure data on top of a generated map: the frontier starts at the chosen
//! start points and, on each selection, becomes the selected node's
//! successors. Presentation reacts to the returned set; the map itself is
//! never mutated.

use crate::model::SectorMap;
use crate::types::GridPos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierError {
    /// The selected position is not currently offered.
    NotSelectable,
    /// The selected position does not exist on the map.
    UnknownNode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frontier {
    selectable: Vec<GridPos>,
}

impl Frontier {
    /// Frontier at the start of a run: the map's chosen start points.
    #[must_use]
    pub fn new(map: &SectorMap) -> Self {
        Self { selectable: map.start_points().to_vec() }
    }

    #[must_use]
    pub fn selectable(&self) -> &[GridPos] {
        &self.selectable
    }

    #[must_use]
    pub fn is_selectable(&self, pos: GridPos) -> bool {
        self.selectable.contains(&pos)
    }

    /// Commits to `pos` and replaces the frontier with its successors. An
    /// empty result means the boss was just selected.
    pub fn select(&mut self, pos: GridPos, map: &SectorMap) -> Result<&[GridPos], FrontierError> {
        if !self.is_selectable(pos) {
            return Err(FrontierError::NotSelectable);
        }
        let node = map.node(pos).ok_or(FrontierError::UnknownNode)?;
        self.selectable = node.outgoing.clone();
        Ok(&self.selectable)
    }
}
