pub mod ability;
pub mod aura;
pub mod enemy;
pub mod engine;
pub mod log;
pub mod player;
pub mod rng;
pub mod spellbook;
pub mod stats;

pub use ability::{
    Ability, AbilityId, AuraCondition, CastCondition, CooldownCondition, SpellEffect,
    ValueCondition, GLOBAL_COOLDOWN_MS,
};
pub use aura::{Aura, AuraBehavior, AuraEffect, AuraId, AuraTarget, DamageOverTime};
pub use enemy::{Enemy, TargetShuffle};
pub use engine::{
    AuraSnapshot, DamageAggregate, SimCtx, Simulation, SimulationParams, SimulationSummary,
    DEFAULT_CHUNK_TICKS, STEP_MS,
};
pub use log::{CombatLog, LogEntry, LogEventKind};
pub use player::{Player, CRITICAL_MULTIPLIER};
pub use rng::Rng;
pub use stats::{scale_by_haste, tick_interval_ms, StatBlock, StatBundle, StatKind};
