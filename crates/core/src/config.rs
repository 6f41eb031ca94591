//! Generation configuration and the floor-eligibility queries built on it.
//!
//! Floor arguments to the query methods are *floor values*: one-based, the
//! way restriction and override tables are authored. The generator passes
//! `floor_index + 1` when assigning or re-rolling a node's type.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::sampler::pick_weighted;
use crate::types::{NodeType, WorldPos};

/// One row of the base type distribution. Row order is the sampler's
/// tie-break order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeWeight {
    pub node_type: NodeType,
    pub weight: f32,
}

/// Probabilistic forced-type rule for one floor, evaluated before the base
/// weight table. `probability` is in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloorOverride {
    pub floor: u32,
    pub target_type: NodeType,
    pub probability: f32,
}

/// Per-type floor constraints. A type with no restriction entry is
/// unrestricted: eligible on every floor and free to repeat along a path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRestriction {
    pub target_type: NodeType,
    /// First floor value the type may appear on.
    pub min_floor: u32,
    /// Single floor value the type must never appear on.
    pub excluded_floor: Option<u32>,
    /// Whether two adjacent path nodes may share this type.
    pub allow_consecutive: bool,
}

/// Weighted encounter payload entry; `id` is an opaque content key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterWeight {
    pub id: String,
    pub weight: f32,
}

/// Payload sub-table for one of the encounter-bearing node types.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterTable {
    pub node_type: NodeType,
    pub entries: Vec<EncounterWeight>,
}

/// Immutable input for one generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Playable floor count; the grid reserves one extra column for the boss.
    pub floors: u32,
    pub slots_per_floor: u32,
    pub min_start_points: u32,
    pub max_start_points: u32,
    pub path_count: u32,
    pub cell_size: f32,
    pub origin: WorldPos,
    /// Cosmetic per-node offset radius, sampled inside a disc. Zero disables.
    pub position_jitter_radius: f32,
    pub type_weights: Vec<TypeWeight>,
    pub floor_overrides: Vec<FloorOverride>,
    pub restrictions: Vec<NodeRestriction>,
    pub encounter_tables: Vec<EncounterTable>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            floors: 10,
            slots_per_floor: 5,
            min_start_points: 2,
            max_start_points: 3,
            path_count: 6,
            cell_size: 25.0,
            origin: WorldPos { x: 0.0, y: 0.0 },
            position_jitter_radius: 0.4,
            type_weights: vec![
                TypeWeight { node_type: NodeType::NormalEncounter, weight: 10.0 },
                TypeWeight { node_type: NodeType::EliteEncounter, weight: 4.0 },
                TypeWeight { node_type: NodeType::Chest, weight: 3.0 },
                TypeWeight { node_type: NodeType::RestSpot, weight: 3.0 },
                TypeWeight { node_type: NodeType::Event, weight: 4.0 },
                TypeWeight { node_type: NodeType::Merchant, weight: 2.0 },
            ],
            floor_overrides: vec![
                // Openers are always a plain fight.
                FloorOverride {
                    floor: 1,
                    target_type: NodeType::NormalEncounter,
                    probability: 1.0,
                },
                // A breather tends to show up right before the boss.
                FloorOverride { floor: 10, target_type: NodeType::RestSpot, probability: 0.35 },
            ],
            restrictions: vec![
                NodeRestriction {
                    target_type: NodeType::EliteEncounter,
                    min_floor: 4,
                    excluded_floor: None,
                    allow_consecutive: false,
                },
                NodeRestriction {
                    target_type: NodeType::RestSpot,
                    min_floor: 3,
                    excluded_floor: None,
                    allow_consecutive: false,
                },
                NodeRestriction {
                    target_type: NodeType::Merchant,
                    min_floor: 2,
                    excluded_floor: None,
                    allow_consecutive: false,
                },
                NodeRestriction {
                    target_type: NodeType::Chest,
                    min_floor: 2,
                    excluded_floor: Some(10),
                    allow_consecutive: false,
                },
            ],
            encounter_tables: vec![
                EncounterTable {
                    node_type: NodeType::NormalEncounter,
                    entries: vec![
                        EncounterWeight { id: String::from("encounter_patrol"), weight: 5.0 },
                        EncounterWeight { id: String::from("encounter_ambush"), weight: 3.0 },
                        EncounterWeight { id: String::from("encounter_nest"), weight: 2.0 },
                    ],
                },
                EncounterTable {
                    node_type: NodeType::EliteEncounter,
                    entries: vec![
                        EncounterWeight { id: String::from("elite_champion"), weight: 3.0 },
                        EncounterWeight { id: String::from("elite_warband"), weight: 2.0 },
                    ],
                },
                EncounterTable {
                    node_type: NodeType::Chest,
                    entries: vec![
                        EncounterWeight { id: String::from("chest_cache"), weight: 4.0 },
                        EncounterWeight { id: String::from("chest_hoard"), weight: 1.0 },
                    ],
                },
                EncounterTable {
                    node_type: NodeType::Event,
                    entries: vec![
                        EncounterWeight { id: String::from("event_traveler"), weight: 3.0 },
                        EncounterWeight { id: String::from("event_derelict"), weight: 2.0 },
                        EncounterWeight { id: String::from("event_shrine"), weight: 2.0 },
                    ],
                },
            ],
        }
    }
}

impl GenerationConfig {
    /// Restriction entry for `node_type`, if one was configured.
    #[must_use]
    pub fn restriction(&self, node_type: NodeType) -> Option<&NodeRestriction> {
        self.restrictions
            .iter()
            .find(|restriction| restriction.target_type == node_type)
    }

    /// Whether `node_type` may appear on `floor` (a one-based floor value).
    #[must_use]
    pub fn is_type_allowed(&self, node_type: NodeType, floor: u32) -> bool {
        match self.restriction(node_type) {
            Some(restriction) => {
                floor >= restriction.min_floor && restriction.excluded_floor != Some(floor)
            }
            None => true,
        }
    }

    /// Base weight rows still eligible on `floor`, in table order.
    #[must_use]
    pub fn allowed_types(&self, floor: u32) -> Vec<TypeWeight> {
        self.type_weights
            .iter()
            .copied()
            .filter(|row| self.is_type_allowed(row.node_type, floor))
            .collect()
    }

    /// Samples a node type for `floor`.
    ///
    /// Floor overrides run first: each matching rule gets an independent
    /// uniform draw and the first hit short-circuits, ignoring `excluding`.
    /// Otherwise the eligible weight rows (minus `excluding`) go through the
    /// weighted sampler. An empty candidate set is a configuration error.
    pub fn type_for_floor<R: Rng>(
        &self,
        floor: u32,
        excluding: Option<NodeType>,
        rng: &mut R,
    ) -> Result<NodeType, GenerationError> {
        for rule in &self.floor_overrides {
            if rule.floor == floor && rng.r#gen::<f32>() <= rule.probability {
                return Ok(rule.target_type);
            }
        }

        let candidates: Vec<TypeWeight> = self
            .allowed_types(floor)
            .into_iter()
            .filter(|row| Some(row.node_type) != excluding)
            .collect();
        if candidates.is_empty() {
            return Err(GenerationError::NoEligibleNodeType { floor });
        }

        let weights: Vec<f32> = candidates.iter().map(|row| row.weight).collect();
        pick_weighted(&candidates, &weights, rng).map(|row| row.node_type)
    }

    /// Draws an encounter payload for the four encounter-bearing types.
    /// Other types, and types with no configured table, yield `None`.
    pub fn encounter_payload<R: Rng>(
        &self,
        node_type: NodeType,
        rng: &mut R,
    ) -> Result<Option<String>, GenerationError> {
        if !node_type.carries_encounter() {
            return Ok(None);
        }
        let Some(table) = self
            .encounter_tables
            .iter()
            .find(|table| table.node_type == node_type)
        else {
            return Ok(None);
        };
        let weights: Vec<f32> = table.entries.iter().map(|entry| entry.weight).collect();
        pick_weighted(&table.entries, &weights, rng).map(|entry| Some(entry.id.clone()))
    }

    /// Structural validation, run before any generation starts. Runtime
    /// eligibility (a floor whose filtered candidate set turns out empty)
    /// is reported during generation instead, with the offending floor.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.floors == 0 {
            return Self::invalid("floors must be at least 1");
        }
        if self.slots_per_floor == 0 {
            return Self::invalid("slots_per_floor must be at least 1");
        }
        if self.path_count == 0 {
            return Self::invalid("path_count must be at least 1");
        }
        if self.max_start_points == 0 {
            return Self::invalid("max_start_points must be at least 1");
        }
        if self.min_start_points > self.max_start_points {
            return Self::invalid("min_start_points exceeds max_start_points");
        }
        if self.max_start_points > self.slots_per_floor {
            return Self::invalid("max_start_points exceeds slots_per_floor");
        }
        if !(self.cell_size > 0.0) {
            return Self::invalid("cell_size must be positive");
        }
        if !(self.position_jitter_radius >= 0.0) {
            return Self::invalid("position_jitter_radius must be non-negative");
        }
        if self.type_weights.is_empty() {
            return Self::invalid("type_weights must not be empty");
        }
        for row in &self.type_weights {
            if matches!(row.node_type, NodeType::Boss | NodeType::None) {
                return Self::invalid("type_weights must not contain Boss or None");
            }
            if !(row.weight >= 0.0) {
                return Self::invalid("type weights must be non-negative");
            }
        }
        for rule in &self.floor_overrides {
            if matches!(rule.target_type, NodeType::Boss | NodeType::None) {
                return Self::invalid("floor overrides must not target Boss or None");
            }
            if !(0.0..=1.0).contains(&rule.probability) {
                return Self::invalid("override probability must be within [0, 1]");
            }
        }
        for (index, restriction) in self.restrictions.iter().enumerate() {
            let duplicate = self.restrictions[..index]
                .iter()
                .any(|other| other.target_type == restriction.target_type);
            if duplicate {
                return Self::invalid("duplicate restriction for one node type");
            }
        }
        for (index, table) in self.encounter_tables.iter().enumerate() {
            if !table.node_type.carries_encounter() {
                return Self::invalid("encounter table keyed by a non-encounter type");
            }
            if self.encounter_tables[..index]
                .iter()
                .any(|other| other.node_type == table.node_type)
            {
                return Self::invalid("duplicate encounter table for one node type");
            }
            if table.entries.is_empty() {
                return Self::invalid("encounter table must not be empty");
            }
            let mut total = 0.0_f32;
            for entry in &table.entries {
                if !(entry.weight >= 0.0) {
                    return Self::invalid("encounter weights must be non-negative");
                }
                total += entry.weight;
            }
            if total <= 0.0 {
                return Self::invalid("encounter table weights must not sum to zero");
            }
        }
        Ok(())
    }

    fn invalid(reason: &str) -> Result<(), GenerationError> {
        Err(GenerationError::InvalidConfig(String::from(reason)))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn two_type_config() -> GenerationConfig {
        GenerationConfig {
            type_weights: vec![
                TypeWeight { node_type: NodeType::NormalEncounter, weight: 1.0 },
                TypeWeight { node_type: NodeType::Event, weight: 1.0 },
            ],
            floor_overrides: Vec::new(),
            restrictions: Vec::new(),
            encounter_tables: Vec::new(),
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GenerationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validation_rejects_structural_violations() {
        let violations: Vec<(&str, GenerationConfig)> = vec![
            ("floors", GenerationConfig { floors: 0, ..GenerationConfig::default() }),
            ("slots", GenerationConfig { slots_per_floor: 0, ..GenerationConfig::default() }),
            ("paths", GenerationConfig { path_count: 0, ..GenerationConfig::default() }),
            ("max zero", GenerationConfig {
                min_start_points: 0,
                max_start_points: 0,
                ..GenerationConfig::default()
            }),
            ("min over max", GenerationConfig {
                min_start_points: 4,
                max_start_points: 2,
                ..GenerationConfig::default()
            }),
            ("max over slots", GenerationConfig {
                max_start_points: 9,
                ..GenerationConfig::default()
            }),
            ("negative weight", GenerationConfig {
                type_weights: vec![TypeWeight {
                    node_type: NodeType::Chest,
                    weight: -1.0,
                }],
                ..GenerationConfig::default()
            }),
            ("boss weighted", GenerationConfig {
                type_weights: vec![TypeWeight { node_type: NodeType::Boss, weight: 1.0 }],
                ..GenerationConfig::default()
            }),
            ("empty weights", GenerationConfig {
                type_weights: Vec::new(),
                ..GenerationConfig::default()
            }),
            ("bad probability", GenerationConfig {
                floor_overrides: vec![FloorOverride {
                    floor: 2,
                    target_type: NodeType::Event,
                    probability: 1.5,
                }],
                ..GenerationConfig::default()
            }),
            ("merchant table", GenerationConfig {
                encounter_tables: vec![EncounterTable {
                    node_type: NodeType::Merchant,
                    entries: vec![EncounterWeight { id: String::from("x"), weight: 1.0 }],
                }],
                ..GenerationConfig::default()
            }),
            ("empty table", GenerationConfig {
                encounter_tables: vec![EncounterTable {
                    node_type: NodeType::Event,
                    entries: Vec::new(),
                }],
                ..GenerationConfig::default()
            }),
            ("zero-sum table", GenerationConfig {
                encounter_tables: vec![EncounterTable {
                    node_type: NodeType::Event,
                    entries: vec![EncounterWeight { id: String::from("x"), weight: 0.0 }],
                }],
                ..GenerationConfig::default()
            }),
        ];

        for (label, config) in violations {
            assert!(
                matches!(config.validate(), Err(GenerationError::InvalidConfig(_))),
                "expected {label} to be rejected"
            );
        }
    }

    #[test]
    fn restriction_floors_filter_the_weight_table() {
        let config = GenerationConfig {
            restrictions: vec![NodeRestriction {
                target_type: NodeType::Event,
                min_floor: 3,
                excluded_floor: Some(5),
                allow_consecutive: true,
            }],
            ..two_type_config()
        };

        assert!(!config.is_type_allowed(NodeType::Event, 2));
        assert!(config.is_type_allowed(NodeType::Event, 3));
        assert!(!config.is_type_allowed(NodeType::Event, 5));
        assert!(config.is_type_allowed(NodeType::Event, 6));
        // No restriction entry means unrestricted.
        assert!(config.is_type_allowed(NodeType::NormalEncounter, 1));

        let floor_two: Vec<NodeType> = config
            .allowed_types(2)
            .iter()
            .map(|row| row.node_type)
            .collect();
        assert_eq!(floor_two, vec![NodeType::NormalEncounter]);
    }

    #[test]
    fn certain_override_short_circuits_sampling() {
        let config = GenerationConfig {
            floor_overrides: vec![FloorOverride {
                floor: 4,
                target_type: NodeType::Merchant,
                probability: 1.0,
            }],
            ..two_type_config()
        };

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(
                config.type_for_floor(4, None, &mut rng),
                Ok(NodeType::Merchant)
            );
        }
        // Overrides win even over an exclusion of their own target.
        assert_eq!(
            config.type_for_floor(4, Some(NodeType::Merchant), &mut rng),
            Ok(NodeType::Merchant)
        );
    }

    #[test]
    fn excluding_a_type_removes_it_from_the_draw() {
        let config = two_type_config();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..100 {
            let picked = config
                .type_for_floor(1, Some(NodeType::NormalEncounter), &mut rng)
                .unwrap();
            assert_eq!(picked, NodeType::Event);
        }
    }

    #[test]
    fn exhausted_candidate_set_names_the_floor() {
        let config = GenerationConfig {
            type_weights: vec![TypeWeight { node_type: NodeType::Event, weight: 1.0 }],
            floor_overrides: Vec::new(),
            restrictions: Vec::new(),
            encounter_tables: Vec::new(),
            ..GenerationConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            config.type_for_floor(7, Some(NodeType::Event), &mut rng),
            Err(GenerationError::NoEligibleNodeType { floor: 7 })
        );
    }

    #[test]
    fn encounter_payload_only_exists_for_encounter_types() {
        let config = GenerationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        assert_eq!(config.encounter_payload(NodeType::Merchant, &mut rng), Ok(None));
        assert_eq!(config.encounter_payload(NodeType::RestSpot, &mut rng), Ok(None));
        assert_eq!(config.encounter_payload(NodeType::Boss, &mut rng), Ok(None));

        let payload = config
            .encounter_payload(NodeType::EliteEncounter, &mut rng)
            .unwrap()
            .unwrap();
        assert!(payload.starts_with("elite_"));
    }

    #[test]
    fn missing_table_yields_no_payload() {
        let config = two_type_config();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert_eq!(
            config.encounter_payload(NodeType::NormalEncounter, &mut rng),
            Ok(None)
        );
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = GenerationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: GenerationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: GenerationConfig = serde_json::from_str(r#"{"floors": 4}"#).unwrap();
        assert_eq!(config.floors, 4);
        assert_eq!(config.slots_per_floor, GenerationConfig::default().slots_per_floor);
    }
}
