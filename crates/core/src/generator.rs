//! Sector map generation: grid build, per-node type assignment, path
//! tracing through the 3-slot neighbor window, sibling conflict
//! resolution, and consecutive-type repair.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::activation::{ActivationSink, ActivationTracker, NullSink};
use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::grid::Grid;
use crate::model::{Node, SectorMap};
use crate::types::{GridPos, NodeType, WorldPos};

/// Builds sector maps from a validated config. One `generate` call is one
/// atomic run: the map is assembled privately and only published on
/// success, and a fresh seeded RNG per call makes runs reproducible
/// byte-for-byte.
pub struct MapGenerator {
    config: GenerationConfig,
}

impl MapGenerator {
    /// Validates the config eagerly; structural problems never surface
    /// mid-run.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn generate(&self, seed: u64) -> Result<SectorMap, GenerationError> {
        self.generate_with_sink(seed, &mut NullSink)
    }

    /// Runs one full generation, pushing every activation-state change
    /// through `sink`.
    pub fn generate_with_sink(
        &self,
        seed: u64,
        sink: &mut dyn ActivationSink,
    ) -> Result<SectorMap, GenerationError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut run = GenerationRun::new(&self.config);

        run.assign_node_types(&mut rng)?;
        run.place_boss(sink);

        let mut paths = Vec::with_capacity(self.config.path_count as usize);
        for _ in 0..self.config.path_count {
            paths.push(run.trace_path(&mut rng, sink)?);
        }
        for path in &paths {
            run.repair_path(path, &mut rng)?;
        }

        Ok(run.finish(sink))
    }
}

/// Working state of a single run. Nodes are addressed by `(floor, slot)`
/// index pairs throughout; repairs go through the index, never through
/// aliased references.
struct GenerationRun<'a> {
    config: &'a GenerationConfig,
    grid: Grid<Node>,
    tracker: ActivationTracker,
    /// Distinct chosen start slots, in choice order.
    chosen_starts: Vec<u32>,
    boss: GridPos,
}

impl<'a> GenerationRun<'a> {
    fn new(config: &'a GenerationConfig) -> Self {
        let columns = config.floors + 1;
        let half_cell = config.cell_size * 0.5;
        let grid = Grid::new(
            columns as usize,
            config.slots_per_floor as usize,
            config.cell_size,
            config.origin,
            |x, y| {
                let center = WorldPos {
                    x: config.origin.x + x as f32 * config.cell_size + half_cell,
                    y: config.origin.y + y as f32 * config.cell_size + half_cell,
                };
                Node::empty(GridPos { floor: x, slot: y }, center)
            },
        );
        Self {
            config,
            grid,
            tracker: ActivationTracker::new(columns, config.slots_per_floor),
            chosen_starts: Vec::new(),
            boss: GridPos { floor: config.floors, slot: config.slots_per_floor / 2 },
        }
    }

    fn node(&self, pos: GridPos) -> Option<&Node> {
        self.grid.get(pos.floor, pos.slot)
    }

    fn node_mut(&mut self, pos: GridPos) -> Option<&mut Node> {
        self.grid.get_mut(pos.floor, pos.slot)
    }

    /// Assigns a type, payload, and jittered anchor to every playable cell.
    /// Per node the draw order is jitter, type, payload; keep it stable, it
    /// is part of the reproducibility contract.
    fn assign_node_types<R: Rng>(&mut self, rng: &mut R) -> Result<(), GenerationError> {
        for floor in 0..self.config.floors {
            for slot in 0..self.config.slots_per_floor {
                let (dx, dy) = self.jitter_offset(rng);
                let node_type = self.config.type_for_floor(floor + 1, None, rng)?;
                let encounter = self.config.encounter_payload(node_type, rng)?;
                if let Some(node) = self.grid.get_mut(floor, slot) {
                    node.node_type = node_type;
                    node.encounter = encounter;
                    node.world_pos.x += dx;
                    node.world_pos.y += dy;
                }
            }
        }
        Ok(())
    }

    /// Uniform point inside the jitter disc, by rejection. Radius zero
    /// draws nothing so disabling jitter does not shift the stream.
    fn jitter_offset<R: Rng>(&self, rng: &mut R) -> (f32, f32) {
        let radius = self.config.position_jitter_radius;
        if radius <= 0.0 {
            return (0.0, 0.0);
        }
        loop {
            let x = rng.gen_range(-1.0_f32..1.0);
            let y = rng.gen_range(-1.0_f32..1.0);
            if x * x + y * y <= 1.0 {
                return (x * radius, y * radius);
            }
        }
    }

    /// The boss occupies the reserved extra column and is visible from the
    /// start, independent of any path.
    fn place_boss(&mut self, sink: &mut dyn ActivationSink) {
        let boss = self.boss;
        if let Some(node) = self.node_mut(boss) {
            node.node_type = NodeType::Boss;
        }
        self.tracker.activate(boss, sink);
    }

    /// Traces one complete path from a start slot to the boss, activating
    /// every node it passes. Returns the path without the boss node.
    fn trace_path<R: Rng>(
        &mut self,
        rng: &mut R,
        sink: &mut dyn ActivationSink,
    ) -> Result<Vec<GridPos>, GenerationError> {
        let mut current = GridPos { floor: 0, slot: self.choose_start(rng) };
        self.tracker.activate(current, sink);
        let mut path = vec![current];

        while current.floor < self.config.floors - 1 {
            let window = self.neighbor_window(current);
            let next = window[rng.gen_range(0..window.len())];
            self.connect(current, next, rng)?;
            current = next;
            self.tracker.activate(current, sink);
            path.push(current);
        }

        let boss = self.boss;
        self.connect(current, boss, rng)?;
        Ok(path)
    }

    /// Start slot selection over three regimes on the distinct-start count:
    /// below the minimum, reject until an unchosen slot comes up; at the
    /// maximum, reuse a chosen one; in between, any slot goes.
    fn choose_start<R: Rng>(&mut self, rng: &mut R) -> u32 {
        let slots = self.config.slots_per_floor;
        let distinct = self.chosen_starts.len() as u32;

        let slot = if distinct < self.config.min_start_points {
            loop {
                let candidate = rng.gen_range(0..slots);
                if !self.chosen_starts.contains(&candidate) {
                    break candidate;
                }
            }
        } else if distinct >= self.config.max_start_points {
            self.chosen_starts[rng.gen_range(0..self.chosen_starts.len())]
        } else {
            rng.gen_range(0..slots)
        };

        if !self.chosen_starts.contains(&slot) {
            self.chosen_starts.push(slot);
        }
        slot
    }

    /// Adjacency window on the next floor: slots within one of the current
    /// slot, clamped to the grid. At most 3 candidates, never zero.
    fn neighbor_window(&self, from: GridPos) -> Vec<GridPos> {
        let next_floor = from.floor + 1;
        let lower = from.slot.saturating_sub(1);
        let upper = (from.slot + 1).min(self.config.slots_per_floor - 1);
        (lower..=upper)
            .map(|slot| GridPos { floor: next_floor, slot })
            .collect()
    }

    /// Records the directed edge `from -> to`, skipping duplicates
    /// entirely. A new edge into a non-boss node resolves sibling type
    /// conflicts: if another successor of `from` already carries the
    /// target's type, the target is re-rolled with that type excluded.
    /// Several colliding paths may re-roll the same node; the last write
    /// wins.
    fn connect<R: Rng>(
        &mut self,
        from: GridPos,
        to: GridPos,
        rng: &mut R,
    ) -> Result<(), GenerationError> {
        let already_connected = self
            .node(from)
            .is_some_and(|node| node.outgoing.contains(&to));
        if already_connected {
            return Ok(());
        }

        let target_type = self.node(to).map(|node| node.node_type);
        let conflict = match (self.node(from), target_type) {
            (Some(from_node), Some(target_type)) if target_type != NodeType::Boss => from_node
                .outgoing
                .iter()
                .any(|sibling| {
                    self.node(*sibling)
                        .is_some_and(|node| node.node_type == target_type)
                })
                .then_some(target_type),
            _ => None,
        };

        if let Some(node) = self.node_mut(from) {
            node.outgoing.push(to);
        }
        if let Some(node) = self.node_mut(to) {
            node.incoming.push(from);
        }

        if let Some(matching) = conflict {
            let replacement = self.config.type_for_floor(to.floor + 1, Some(matching), rng)?;
            if let Some(node) = self.node_mut(to) {
                node.node_type = replacement;
            }
        }
        Ok(())
    }

    /// Re-rolls any node whose type repeats its path predecessor while its
    /// restriction forbids consecutive occurrences. Types without a
    /// restriction entry repeat freely. `last_type` tracks the post-repair
    /// type, so a fixed node anchors the next comparison.
    fn repair_path<R: Rng>(&mut self, path: &[GridPos], rng: &mut R) -> Result<(), GenerationError> {
        let mut last_type = NodeType::None;
        for (index, &pos) in path.iter().enumerate() {
            let Some(mut current) = self.node(pos).map(|node| node.node_type) else {
                continue;
            };
            if index > 0 && current == last_type && self.forbids_consecutive(current) {
                current = self.config.type_for_floor(pos.floor + 1, Some(last_type), rng)?;
                if let Some(node) = self.node_mut(pos) {
                    node.node_type = current;
                }
            }
            last_type = current;
        }
        Ok(())
    }

    fn forbids_consecutive(&self, node_type: NodeType) -> bool {
        self.config
            .restriction(node_type)
            .is_some_and(|restriction| !restriction.allow_consecutive)
    }

    /// Seals the run: untouched cells are reported deactivated, flags land
    /// on the nodes, and the distinct start set becomes the view's initial
    /// selectable set.
    fn finish(mut self, sink: &mut dyn ActivationSink) -> SectorMap {
        self.tracker.prune_untouched(sink);
        for node in self.grid.iter_mut() {
            node.activated = self.tracker.is_activated(node.pos);
        }
        SectorMap {
            floors: self.config.floors,
            slots_per_floor: self.config.slots_per_floor,
            grid: self.grid,
            boss: self.boss,
            start_points: self
                .chosen_starts
                .iter()
                .map(|&slot| GridPos { floor: 0, slot })
                .collect(),
        }
    }
}
