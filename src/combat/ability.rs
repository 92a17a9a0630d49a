//! Ability identities, cast state machine and cast-eligibility conditions.
//!
//! An ability is owned by exactly one player, built once from the build
//! entry at construction. Behavior (rank tables, impact side effects) lives
//! in [`crate::combat::spellbook`]; this module holds the per-instance
//! state: cooldown, flags, and the conditions gating a cast.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::aura::AuraId;
use crate::combat::spellbook;

/// Shared per-actor timer started by most casts. Items and a few utility
/// abilities bypass it.
pub const GLOBAL_COOLDOWN_MS: i64 = 1500;

/// Closed set of ability identities. Discriminants are the wire ids the
/// build input uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u32)]
pub enum AbilityId {
    // Warrior
    Slash = 0,
    CrescentSwipe = 1,
    UnholyWarcry = 2,
    CentrifugalLaceration = 3,
    ArmorReinforcement = 4,
    Taunt = 5,
    Charge = 6,
    CrusadersCourage = 7,
    ColossalReconstruction = 8,
    Bulwark = 9,
    Tempering = 10,
    // Mage
    IceBolt = 20,
    IcicleOrb = 21,
    ChillingRadiance = 22,
    Enchant = 23,
    ArcticAura = 24,
    HypothermicFrenzy = 25,
    IceShield = 26,
    Teleport = 27,
    // Archer
    SwiftShot = 40,
    PreciseShot = 41,
    Dash = 42,
    SerpentArrows = 43,
    PoisonArrows = 44,
    Invigorate = 45,
    Pathfinding = 46,
    CranialPunctures = 47,
    TemporalDilatation = 48,
    // Shaman
    Decay = 60,
    Plaguespreader = 61,
    SoulHarvest = 62,
    CanineHowl = 63,
    MimirsWell = 64,
    SpiritAnimal = 65,
    // Items
    ManaPotion = 80,
    TattooedSkull = 81,
}

impl AbilityId {
    pub const ALL: [AbilityId; 36] = [
        AbilityId::Slash,
        AbilityId::CrescentSwipe,
        AbilityId::UnholyWarcry,
        AbilityId::CentrifugalLaceration,
        AbilityId::ArmorReinforcement,
        AbilityId::Taunt,
        AbilityId::Charge,
        AbilityId::CrusadersCourage,
        AbilityId::ColossalReconstruction,
        AbilityId::Bulwark,
        AbilityId::Tempering,
        AbilityId::IceBolt,
        AbilityId::IcicleOrb,
        AbilityId::ChillingRadiance,
        AbilityId::Enchant,
        AbilityId::ArcticAura,
        AbilityId::HypothermicFrenzy,
        AbilityId::IceShield,
        AbilityId::Teleport,
        AbilityId::SwiftShot,
        AbilityId::PreciseShot,
        AbilityId::Dash,
        AbilityId::SerpentArrows,
        AbilityId::PoisonArrows,
        AbilityId::Invigorate,
        AbilityId::Pathfinding,
        AbilityId::CranialPunctures,
        AbilityId::TemporalDilatation,
        AbilityId::Decay,
        AbilityId::Plaguespreader,
        AbilityId::SoulHarvest,
        AbilityId::CanineHowl,
        AbilityId::MimirsWell,
        AbilityId::SpiritAnimal,
        AbilityId::ManaPotion,
        AbilityId::TattooedSkull,
    ];
}

impl TryFrom<u32> for AbilityId {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        AbilityId::ALL
            .into_iter()
            .find(|&id| id as u32 == value)
            .ok_or_else(|| format!("unknown ability id {value}"))
    }
}

impl From<AbilityId> for u32 {
    fn from(id: AbilityId) -> u32 {
        id as u32
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", spellbook::profile(*self).name)
    }
}

/// Result of the per-ability effect computation: the numbers a single cast
/// commits with. Damage is `base + uniform(min, max) * bonus_pct / 100`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpellEffect {
    pub base_damage: f64,
    pub bonus_damage: f64,
    pub cooldown_ms: i64,
    pub cast_time_ms: i64,
}

impl SpellEffect {
    pub fn has_damage(&self) -> bool {
        self.base_damage > 0.0 || self.bonus_damage > 0.0
    }
}

/// A threshold with an optional negation, e.g. "mana >= 30%" / "mana < 30%".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueCondition {
    pub value: f64,
    #[serde(default)]
    pub negated: bool,
}

/// Presence (or, negated, absence) of an aura on self or the primary target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuraCondition {
    pub aura: AuraId,
    #[serde(default)]
    pub negated: bool,
}

/// Cooldown state of another ability: holds while that ability is cooling
/// down, or (negated) while it is ready.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CooldownCondition {
    pub ability: AbilityId,
    #[serde(default)]
    pub negated: bool,
}

/// Cast-eligibility gate from the build input. All configured parts must
/// hold; an empty condition always passes. Failing is routine flow control,
/// not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastCondition {
    pub mana: Option<ValueCondition>,
    pub auras: Vec<AuraCondition>,
    pub cooldown: Option<CooldownCondition>,
}

impl CastCondition {
    pub fn is_empty(&self) -> bool {
        self.mana.is_none() && self.auras.is_empty() && self.cooldown.is_none()
    }
}

/// One ability instance owned by a player. Mutated every tick (cooldown
/// decay); never outlives its owner.
#[derive(Debug, Clone)]
pub struct Ability {
    pub id: AbilityId,
    pub rank: u8,
    pub name: String,
    pub cooldown_ms: i64,
    pub mana_cost: f64,
    pub triggers_global: bool,
    pub is_item: bool,
    pub is_aoe: bool,
    pub max_targets: u32,
    /// Skip this ability while the aura is already active, unless `forced`
    /// or `ignore_aura` exempts it.
    pub gating_aura: Option<AuraId>,
    pub forced: bool,
    pub ignore_aura: bool,
    /// Removed from the cast queue after the first successful cast.
    pub once: bool,
    pub condition: CastCondition,
}

impl Ability {
    /// Build an instance from a build entry. Rank bounds are checked here:
    /// a silently clamped rank would corrupt every later table lookup, so
    /// construction fails loudly instead.
    pub fn new(
        id: AbilityId,
        rank: u8,
        once: bool,
        condition: CastCondition,
    ) -> Result<Self, String> {
        let profile = spellbook::profile(id);
        if rank == 0 || rank > profile.max_rank {
            return Err(format!(
                "{} rank {} is out of bounds (1..={})",
                profile.name, rank, profile.max_rank
            ));
        }
        Ok(Self {
            id,
            rank,
            name: format!("{} {}", profile.name, rank),
            cooldown_ms: 0,
            mana_cost: spellbook::mana_cost(id, rank),
            triggers_global: profile.triggers_global,
            is_item: profile.is_item,
            is_aoe: profile.is_aoe,
            max_targets: profile.max_targets,
            gating_aura: profile.gating_aura,
            forced: profile.forced,
            ignore_aura: profile.ignore_aura,
            once,
            condition,
        })
    }

    /// Per-tick cooldown decay. Cooldown decreases by exactly the elapsed
    /// delta and is never tracked below zero.
    pub fn update(&mut self, diff_ms: i64) {
        if self.cooldown_ms > 0 {
            self.cooldown_ms = (self.cooldown_ms - diff_ms).max(0);
        }
    }

    pub fn ready(&self) -> bool {
        self.cooldown_ms <= 0
    }

    pub fn reduce_cooldown(&mut self, by_ms: i64) {
        self.cooldown_ms = (self.cooldown_ms - by_ms).max(0);
    }

    pub fn reset_cooldown(&mut self) {
        self.cooldown_ms = 0;
    }

    /// Whether the gating aura should block a cast right now. The gate only
    /// looks at aura presence; `forced` and `ignore_aura` exempt it.
    pub fn gated_by(&self, aura_present: impl Fn(AuraId) -> bool) -> bool {
        match self.gating_aura {
            Some(aura) if !self.forced && !self.ignore_aura => aura_present(aura),
            _ => false,
        }
    }
}
