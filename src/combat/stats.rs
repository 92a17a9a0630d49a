//! Stat channels and the three-layer stat block.
//!
//! Every actor carries a base layer (from the build), a flat bonus layer and
//! a percentage bonus layer. The bonus layers are written only by aura
//! application and removal; every contribution applied on activation is
//! reversed with identical magnitude on expiry.

use serde::{Deserialize, Serialize};

/// Closed set of stat channels. Keeping this an enum (rather than string
/// keys) makes an unknown channel a compile error instead of a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    ManaRegen,
    Block,
    MinDamage,
    MaxDamage,
    Critical,
    Haste,
    AttackSpeed,
}

impl StatKind {
    pub const ALL: [StatKind; 7] = [
        StatKind::ManaRegen,
        StatKind::Block,
        StatKind::MinDamage,
        StatKind::MaxDamage,
        StatKind::Critical,
        StatKind::Haste,
        StatKind::AttackSpeed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::ManaRegen => "mana_regen",
            StatKind::Block => "block",
            StatKind::MinDamage => "min_damage",
            StatKind::MaxDamage => "max_damage",
            StatKind::Critical => "critical",
            StatKind::Haste => "haste",
            StatKind::AttackSpeed => "attack_speed",
        }
    }
}

/// One value per stat channel. Used for base stats in build input and for
/// aura bonus payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBundle {
    pub mana_regen: f64,
    pub block: f64,
    pub min_damage: f64,
    pub max_damage: f64,
    pub critical: f64,
    pub haste: f64,
    pub attack_speed: f64,
}

impl StatBundle {
    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::ManaRegen => self.mana_regen,
            StatKind::Block => self.block,
            StatKind::MinDamage => self.min_damage,
            StatKind::MaxDamage => self.max_damage,
            StatKind::Critical => self.critical,
            StatKind::Haste => self.haste,
            StatKind::AttackSpeed => self.attack_speed,
        }
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut f64 {
        match kind {
            StatKind::ManaRegen => &mut self.mana_regen,
            StatKind::Block => &mut self.block,
            StatKind::MinDamage => &mut self.min_damage,
            StatKind::MaxDamage => &mut self.max_damage,
            StatKind::Critical => &mut self.critical,
            StatKind::Haste => &mut self.haste,
            StatKind::AttackSpeed => &mut self.attack_speed,
        }
    }

    pub fn is_zero(&self) -> bool {
        StatKind::ALL.iter().all(|&kind| self.get(kind) == 0.0)
    }
}

/// Base stats plus the two bonus layers auras write into.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatBlock {
    base: StatBundle,
    bonus: StatBundle,
    bonus_pct: StatBundle,
}

impl StatBlock {
    pub fn new(base: StatBundle) -> Self {
        Self {
            base,
            bonus: StatBundle::default(),
            bonus_pct: StatBundle::default(),
        }
    }

    /// Effective value: `(base + flat bonus) * (1 + percentage bonus)`.
    pub fn effective(&self, kind: StatKind) -> f64 {
        (self.base.get(kind) + self.bonus.get(kind)) * (1.0 + self.bonus_pct.get(kind))
    }

    pub fn base(&self, kind: StatKind) -> f64 {
        self.base.get(kind)
    }

    pub fn add_bonus(&mut self, kind: StatKind, amount: f64, percentage: bool) {
        let layer = if percentage {
            &mut self.bonus_pct
        } else {
            &mut self.bonus
        };
        *layer.get_mut(kind) += amount;
    }

    /// Inverse of [`add_bonus`](Self::add_bonus); callers pair the two with
    /// identical magnitude.
    pub fn remove_bonus(&mut self, kind: StatKind, amount: f64, percentage: bool) {
        let layer = if percentage {
            &mut self.bonus_pct
        } else {
            &mut self.bonus
        };
        *layer.get_mut(kind) -= amount;
    }
}

/// Haste-scaled time: `floor(base / (1 + haste))`. Monotone decreasing in
/// haste, so more haste never lengthens a cast or cooldown.
pub fn scale_by_haste(time_ms: i64, haste: f64) -> i64 {
    if time_ms <= 0 {
        return 0;
    }
    let haste = haste.max(0.0);
    (time_ms as f64 / (1.0 + haste)).floor() as i64
}

/// Periodic-tick interval: haste-scaled and quantized to the 100 ms step
/// grid so ticks land on simulation steps. `tick_seconds` is the unhasted
/// interval (e.g. 1.5 for a tick every 1.5 s).
pub fn tick_interval_ms(tick_seconds: f64, haste: f64) -> i64 {
    let haste = haste.max(0.0);
    ((tick_seconds * 10.0 / (1.0 + haste)).round() as i64) * 100
}
