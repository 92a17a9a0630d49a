//! Build/config input: the structured record the rotation-script front-end
//! produces. Loaded from JSON; the engine consumes it as-is.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::ability::{AbilityId, CastCondition};
use crate::combat::stats::StatBundle;

/// One chosen ability: identity, rank, optional cast-once flag and
/// eligibility condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityEntry {
    pub id: AbilityId,
    pub rank: u8,
    #[serde(default)]
    pub once: bool,
    #[serde(default)]
    pub condition: CastCondition,
}

/// Full build: base stats, mana, chosen abilities, the cast-priority queue
/// and the run-wide parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub stats: StatBundle,
    pub mana: f64,
    #[serde(default = "default_simulators")]
    pub simulators: u32,
    #[serde(default = "default_targets")]
    pub targets: u32,
    #[serde(default)]
    pub mitigation: f64,
    #[serde(default = "default_simulation_time_ms")]
    pub simulation_time_ms: i64,
    #[serde(default)]
    pub auto_attack: bool,
    #[serde(default)]
    pub debug: bool,
    pub abilities: Vec<AbilityEntry>,
    pub queue: Vec<AbilityId>,
}

fn default_simulators() -> u32 {
    1
}

fn default_targets() -> u32 {
    1
}

fn default_simulation_time_ms() -> i64 {
    300_000
}

/// Errors on the way from a build file to a constructed simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Io(message) => write!(f, "unable to read build: {message}"),
            BuildError::Parse(message) => write!(f, "unable to parse build: {message}"),
            BuildError::Invalid(message) => write!(f, "invalid build: {message}"),
        }
    }
}

impl std::error::Error for BuildError {}

/// Load a build from a JSON file.
pub fn load_build(path: impl AsRef<Path>) -> Result<BuildConfig, BuildError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|err| BuildError::Io(format!("'{}': {err}", path.display())))?;
    parse_build(&raw)
}

/// Parse a build from a JSON string.
pub fn parse_build(raw: &str) -> Result<BuildConfig, BuildError> {
    serde_json::from_str(raw).map_err(|err| BuildError::Parse(err.to_string()))
}

/// A small frost-mage build used by tests, benches and the CLI fallback.
pub fn sample_build() -> BuildConfig {
    BuildConfig {
        stats: StatBundle {
            mana_regen: 10.0,
            block: 0.0,
            min_damage: 100.0,
            max_damage: 150.0,
            critical: 0.15,
            haste: 0.15,
            attack_speed: 0.1,
        },
        mana: 300.0,
        simulators: 10,
        targets: 1,
        mitigation: 0.0,
        simulation_time_ms: 60_000,
        auto_attack: false,
        debug: false,
        abilities: vec![
            AbilityEntry {
                id: AbilityId::IceBolt,
                rank: 5,
                once: false,
                condition: CastCondition::default(),
            },
            AbilityEntry {
                id: AbilityId::IcicleOrb,
                rank: 5,
                once: false,
                condition: CastCondition::default(),
            },
            AbilityEntry {
                id: AbilityId::ChillingRadiance,
                rank: 3,
                once: false,
                condition: CastCondition::default(),
            },
            AbilityEntry {
                id: AbilityId::Enchant,
                rank: 4,
                once: true,
                condition: CastCondition::default(),
            },
        ],
        queue: vec![
            AbilityId::Enchant,
            AbilityId::ChillingRadiance,
            AbilityId::IcicleOrb,
            AbilityId::IceBolt,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_build_with_defaults() {
        let raw = r#"{
            "stats": {"min_damage": 100, "max_damage": 150},
            "mana": 300,
            "abilities": [{"id": 20, "rank": 3}],
            "queue": [20]
        }"#;
        let build = parse_build(raw).unwrap();
        assert_eq!(build.simulators, 1);
        assert_eq!(build.targets, 1);
        assert_eq!(build.simulation_time_ms, 300_000);
        assert_eq!(build.abilities[0].id, AbilityId::IceBolt);
        assert!(!build.abilities[0].once);
    }

    #[test]
    fn unknown_ability_id_is_a_parse_error() {
        let raw = r#"{
            "stats": {},
            "mana": 100,
            "abilities": [{"id": 999, "rank": 1}],
            "queue": []
        }"#;
        let err = parse_build(raw).unwrap_err();
        assert!(matches!(err, BuildError::Parse(_)));
    }

    #[test]
    fn conditions_round_trip() {
        let raw = r#"{
            "stats": {},
            "mana": 100,
            "abilities": [{
                "id": 80,
                "rank": 2,
                "condition": {"mana": {"value": 30, "negated": true}}
            }],
            "queue": [80]
        }"#;
        let build = parse_build(raw).unwrap();
        let condition = &build.abilities[0].condition;
        let mana = condition.mana.expect("mana condition");
        assert_eq!(mana.value, 30.0);
        assert!(mana.negated);

        let serialized = serde_json::to_string(&build).unwrap();
        let reparsed = parse_build(&serialized).unwrap();
        assert_eq!(reparsed, build);
    }

    #[test]
    fn sample_build_is_well_formed() {
        let build = sample_build();
        assert!(!build.abilities.is_empty());
        assert!(build
            .queue
            .iter()
            .all(|id| build.abilities.iter().any(|a| a.id == *id)));
    }
}
