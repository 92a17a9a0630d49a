//! Timed buffs and debuffs: stacking, periodic ticks, stat payload
//! bookkeeping.
//!
//! An aura instance is held by a player (self-buffs) or an enemy (debuffs,
//! keyed by the applying player). The owner handle is a plain player index,
//! never a reverse ownership edge. Stat bonuses applied on activation are
//! recorded on the instance and reversed exactly once on removal, so
//! apply/remove pairs can never drift.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::engine::SimCtx;
use crate::combat::player::Player;
use crate::combat::stats::{tick_interval_ms, StatBundle, StatKind};

/// Duration sentinel for passive (never-expiring) auras.
pub const PASSIVE_DURATION: i64 = -1;

/// Closed set of aura identities. Discriminants are the wire ids used by
/// build cast conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u32)]
pub enum AuraId {
    // Warrior
    CentrifugalLaceration = 1000,
    UnholyWarcry = 1001,
    ArmorReinforcement = 1002,
    CrusadersCourage = 1003,
    BulwarkBlock = 1004,
    // Mage
    IceboltSlow = 2000,
    IceboltFreeze = 2001,
    IceboltSurge = 2002,
    ChillingRadiance = 2003,
    Enchant = 2004,
    ArcticAura = 2005,
    HypothermicFrenzy = 2006,
    IceShield = 2007,
    // Archer
    SwiftShotInstant = 4000,
    PreciseShotInstant = 4001,
    PoisonArrows = 4002,
    Invigorate = 4003,
    Pathfinding = 4004,
    CranialPunctures = 4005,
    TemporalDilatation = 4006,
    // Shaman
    Decay = 6000,
    Plaguespreader = 6001,
    CanineHowl = 6002,
    MimirsWell = 6003,
    SpiritAnimal = 6004,
    // Items
    ManaPotion = 8000,
    TattooedSkull = 8001,
}

impl AuraId {
    pub const ALL: [AuraId; 27] = [
        AuraId::CentrifugalLaceration,
        AuraId::UnholyWarcry,
        AuraId::ArmorReinforcement,
        AuraId::CrusadersCourage,
        AuraId::BulwarkBlock,
        AuraId::IceboltSlow,
        AuraId::IceboltFreeze,
        AuraId::IceboltSurge,
        AuraId::ChillingRadiance,
        AuraId::Enchant,
        AuraId::ArcticAura,
        AuraId::HypothermicFrenzy,
        AuraId::IceShield,
        AuraId::SwiftShotInstant,
        AuraId::PreciseShotInstant,
        AuraId::PoisonArrows,
        AuraId::Invigorate,
        AuraId::Pathfinding,
        AuraId::CranialPunctures,
        AuraId::TemporalDilatation,
        AuraId::Decay,
        AuraId::Plaguespreader,
        AuraId::CanineHowl,
        AuraId::MimirsWell,
        AuraId::SpiritAnimal,
        AuraId::ManaPotion,
        AuraId::TattooedSkull,
    ];
}

impl TryFrom<u32> for AuraId {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        AuraId::ALL
            .into_iter()
            .find(|&id| id as u32 == value)
            .ok_or_else(|| format!("unknown aura id {value}"))
    }
}

impl From<AuraId> for u32 {
    fn from(id: AuraId) -> u32 {
        id as u32
    }
}

impl fmt::Display for AuraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Where an ability's aura payload lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuraTarget {
    /// Self-buff on the casting player.
    Owner,
    /// Debuff on the primary enemy, keyed by the casting player.
    PrimaryEnemy,
}

/// Periodic damage payload carried by a damage-over-time aura.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOverTime {
    pub base_damage: f64,
    /// Percentage of the owner's average damage per tick, or a flat amount
    /// when `triggered` is set.
    pub bonus_damage: f64,
    /// Unhasted tick interval in seconds.
    pub tick_seconds: f64,
    pub aoe: bool,
    pub max_targets: u32,
    /// Flat payload precomputed by the applying ability instead of scaling
    /// off the owner's damage stats.
    pub triggered: bool,
}

impl DamageOverTime {
    pub fn new(base_damage: f64, bonus_damage: f64, tick_seconds: f64) -> Self {
        Self {
            base_damage,
            bonus_damage,
            tick_seconds,
            aoe: false,
            max_targets: u32::MAX,
            triggered: false,
        }
    }
}

/// Custom per-aura behavior, dispatched explicitly instead of through a
/// subclass per effect.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum AuraBehavior {
    #[default]
    Generic,
    /// Instant-cast charges that refresh on expiry instead of dropping off,
    /// and may sit at zero stacks (recurring proc window).
    SurgeCharges { refresh_ms: i64 },
    /// Counts successful blocks over a fixed window and converts them into
    /// stacking retaliatory hits against the primary target.
    BlockRetaliation { window_ms: i64, damage_pct: f64 },
    /// Restores a flat amount of mana on every tick.
    ManaTick { interval_ms: i64, amount: f64 },
    /// Restores a percentage of max mana on every tick.
    ManaPercentTick { interval_ms: i64, fraction: f64 },
}

/// Full description of an aura application: identity, payload, stacking
/// rules, behavior. Produced by ability impact hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct AuraEffect {
    pub id: AuraId,
    pub name: &'static str,
    pub target: AuraTarget,
    pub duration_ms: i64,
    pub rank: u8,
    pub bonus_stats: Option<StatBundle>,
    pub bonus_stats_pct: Option<StatBundle>,
    pub damage: Option<DamageOverTime>,
    pub stackable: bool,
    pub apply_stacks: u32,
    pub max_stacks: u32,
    pub behavior: AuraBehavior,
}

impl AuraEffect {
    pub fn new(id: AuraId, name: &'static str, duration_ms: i64, rank: u8) -> Self {
        Self {
            id,
            name,
            target: AuraTarget::Owner,
            duration_ms,
            rank,
            bonus_stats: None,
            bonus_stats_pct: None,
            damage: None,
            stackable: false,
            apply_stacks: 1,
            max_stacks: 1,
            behavior: AuraBehavior::Generic,
        }
    }
}

/// One live aura instance on a holder's list.
#[derive(Debug, Clone)]
pub struct Aura {
    pub id: AuraId,
    pub name: &'static str,
    /// Index of the owning player. Non-owning handle; the holder's list owns
    /// the instance itself.
    pub owner: usize,
    pub duration_ms: i64,
    pub max_duration_ms: i64,
    pub rank: u8,
    pub passive: bool,
    pub to_remove: bool,
    stacks: u32,
    stackable: bool,
    max_stacks: u32,
    tick_timer_ms: i64,
    behavior_timer_ms: i64,
    /// Flat damage resolved per tick, frozen at application time from the
    /// owner's stats.
    damage_per_tick: f64,
    /// Exactly what was pushed into the owner's bonus layers, kept for the
    /// symmetric reversal on removal.
    applied_stats: StatBundle,
    applied_stats_pct: StatBundle,
    effect: AuraEffect,
}

impl Aura {
    /// Instantiate and immediately apply the payload to the owner.
    pub fn new(effect: AuraEffect, owner: &mut Player) -> Self {
        let mut aura = Self {
            id: effect.id,
            name: effect.name,
            owner: owner.id,
            duration_ms: 0,
            max_duration_ms: 0,
            rank: effect.rank,
            passive: false,
            to_remove: false,
            stacks: effect.apply_stacks.max(1),
            stackable: effect.stackable,
            max_stacks: effect.max_stacks.max(1),
            tick_timer_ms: 0,
            behavior_timer_ms: 0,
            damage_per_tick: 0.0,
            applied_stats: StatBundle::default(),
            applied_stats_pct: StatBundle::default(),
            effect: effect.clone(),
        };
        aura.apply_payload(effect, owner);
        aura
    }

    /// Re-application of the same (identity, owner) pair: reverse the old
    /// payload, add stacks up to the cap, re-apply. Never a second instance.
    pub fn reapply(&mut self, effect: AuraEffect, owner: &mut Player) {
        self.revert_stats(owner);
        if self.stackable && self.stacks < self.max_stacks {
            self.stacks += effect.apply_stacks.max(1);
        }
        self.to_remove = false;
        self.apply_payload(effect, owner);
    }

    fn apply_payload(&mut self, effect: AuraEffect, owner: &mut Player) {
        self.duration_ms = if effect.duration_ms > 0 {
            effect.duration_ms
        } else {
            PASSIVE_DURATION
        };
        self.max_duration_ms = self.duration_ms;
        self.passive = self.duration_ms == PASSIVE_DURATION;
        self.stackable = effect.stackable;
        self.max_stacks = effect.max_stacks.max(1);
        if self.stacks > self.max_stacks {
            self.stacks = self.max_stacks;
        }

        if let Some(bundle) = effect.bonus_stats {
            for kind in StatKind::ALL {
                let amount = bundle.get(kind);
                if amount != 0.0 {
                    *self.applied_stats.get_mut(kind) = amount;
                    owner.add_bonus_stat(kind, amount, false);
                }
            }
        }
        if let Some(bundle) = effect.bonus_stats_pct {
            for kind in StatKind::ALL {
                let amount = bundle.get(kind);
                if amount != 0.0 {
                    *self.applied_stats_pct.get_mut(kind) = amount;
                    owner.add_bonus_stat(kind, amount, true);
                }
            }
        }

        if let Some(dot) = effect.damage {
            self.tick_timer_ms =
                tick_interval_ms(dot.tick_seconds, owner.effective(StatKind::Haste));
            self.damage_per_tick = if dot.triggered {
                dot.bonus_damage * self.stacks as f64
            } else {
                let average = (owner.effective(StatKind::MinDamage)
                    + owner.effective(StatKind::MaxDamage))
                    / 2.0;
                average * dot.bonus_damage / 100.0 * self.stacks as f64
            };
        }
        if let AuraBehavior::ManaTick { interval_ms, .. }
        | AuraBehavior::ManaPercentTick { interval_ms, .. }
        | AuraBehavior::BlockRetaliation {
            window_ms: interval_ms,
            ..
        } = effect.behavior
        {
            self.behavior_timer_ms = interval_ms;
        }

        self.rank = effect.rank;
        self.effect = effect;
    }

    /// Reverse every recorded bonus contribution. Idempotent: the record is
    /// cleared after the reversal, so a second call is a no-op.
    pub fn revert_stats(&mut self, owner: &mut Player) {
        for kind in StatKind::ALL {
            let flat = self.applied_stats.get(kind);
            if flat != 0.0 {
                owner.remove_bonus_stat(kind, flat, false);
            }
            let pct = self.applied_stats_pct.get(kind);
            if pct != 0.0 {
                owner.remove_bonus_stat(kind, pct, true);
            }
        }
        self.applied_stats = StatBundle::default();
        self.applied_stats_pct = StatBundle::default();
    }

    /// Per-tick aging. `carrier_mitigation` is present when the aura sits on
    /// an enemy; periodic damage resolves against that carrier.
    pub fn update(
        &mut self,
        diff_ms: i64,
        elapsed_ms: i64,
        owner: &mut Player,
        carrier_mitigation: Option<f64>,
        ctx: &mut SimCtx,
    ) {
        if self.to_remove {
            return;
        }
        if !self.passive {
            self.duration_ms -= diff_ms;
            if self.duration_ms <= 0 {
                self.expire(owner);
                if self.to_remove {
                    return;
                }
            }
        }

        if self.effect.damage.is_some() {
            self.tick_timer_ms -= diff_ms;
            if self.tick_timer_ms <= 0 {
                if let Some(mitigation) = carrier_mitigation {
                    self.deal_tick(mitigation, elapsed_ms, owner, ctx);
                }
                self.tick_timer_ms =
                    tick_interval_ms(self.tick_seconds(), owner.effective(StatKind::Haste));
            }
        }

        self.update_behavior(diff_ms, elapsed_ms, owner, ctx);
    }

    fn tick_seconds(&self) -> f64 {
        self.effect.damage.map(|d| d.tick_seconds).unwrap_or(0.0)
    }

    /// One damage tick against the carrier; AoE payloads fan out with an
    /// independent crit roll per target.
    fn deal_tick(&mut self, mitigation: f64, elapsed_ms: i64, owner: &mut Player, ctx: &mut SimCtx) {
        let Some(dot) = self.effect.damage else {
            return;
        };
        let targets = if dot.aoe {
            ctx.params.targets.min(dot.max_targets).max(1)
        } else {
            1
        };
        for _ in 0..targets {
            owner.deal_aura_damage(
                dot.base_damage,
                self.damage_per_tick,
                mitigation,
                self.name,
                elapsed_ms,
                ctx,
            );
        }
    }

    fn update_behavior(
        &mut self,
        diff_ms: i64,
        elapsed_ms: i64,
        owner: &mut Player,
        ctx: &mut SimCtx,
    ) {
        match self.effect.behavior {
            AuraBehavior::Generic | AuraBehavior::SurgeCharges { .. } => {}
            AuraBehavior::ManaTick { interval_ms, amount } => {
                self.behavior_timer_ms -= diff_ms;
                if self.behavior_timer_ms <= 0 {
                    owner.regenerate_mana(amount);
                    self.behavior_timer_ms = interval_ms;
                }
            }
            AuraBehavior::ManaPercentTick {
                interval_ms,
                fraction,
            } => {
                self.behavior_timer_ms -= diff_ms;
                if self.behavior_timer_ms <= 0 {
                    owner.regenerate_mana_percentage(fraction, 0.0);
                    self.behavior_timer_ms = interval_ms;
                }
            }
            AuraBehavior::BlockRetaliation {
                window_ms,
                damage_pct,
            } => {
                self.behavior_timer_ms -= diff_ms;
                if self.behavior_timer_ms <= 0 {
                    let blocked =
                        ctx.rng.next_unit() < owner.effective(StatKind::Block).clamp(0.0, 1.0);
                    if blocked {
                        if self.stackable && self.stacks < self.max_stacks {
                            self.stacks += 1;
                        }
                        let average = (owner.effective(StatKind::MinDamage)
                            + owner.effective(StatKind::MaxDamage))
                            / 2.0;
                        let amount = average * damage_pct / 100.0 * self.stacks as f64;
                        let mitigation = ctx.params.mitigation;
                        owner.deal_aura_damage(
                            0.0,
                            amount,
                            mitigation,
                            self.name,
                            elapsed_ms,
                            ctx,
                        );
                    }
                    self.behavior_timer_ms = window_ms;
                }
            }
        }
    }

    /// Duration reached zero. Surge charges refresh instead of dropping.
    pub fn expire(&mut self, owner: &mut Player) {
        match self.effect.behavior {
            AuraBehavior::SurgeCharges { refresh_ms } => {
                self.duration_ms = refresh_ms;
                self.max_duration_ms = refresh_ms;
                if self.stacks < self.max_stacks {
                    self.stacks += 1;
                }
            }
            _ => self.remove(owner),
        }
    }

    /// Reverse the stat payload and flag the instance for the holder's sweep.
    pub fn remove(&mut self, owner: &mut Player) {
        self.revert_stats(owner);
        self.to_remove = true;
    }

    /// Drop one stack; at zero the aura is removed. Surge charges instead
    /// sit at zero stacks until their window refreshes them.
    pub fn remove_stack(&mut self, owner: &mut Player) {
        match self.effect.behavior {
            AuraBehavior::SurgeCharges { .. } => {
                self.stacks = self.stacks.saturating_sub(1);
            }
            _ => {
                if self.stacks > 1 {
                    self.stacks -= 1;
                } else {
                    self.remove(owner);
                }
            }
        }
    }

    pub fn stacks(&self) -> u32 {
        self.stacks
    }

    pub fn effect(&self) -> &AuraEffect {
        &self.effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::player::Player;
    use crate::combat::stats::StatBundle;

    fn test_player() -> Player {
        Player::for_tests(StatBundle {
            mana_regen: 10.0,
            min_damage: 100.0,
            max_damage: 150.0,
            critical: 0.0,
            haste: 0.0,
            ..StatBundle::default()
        })
    }

    fn warcry_effect() -> AuraEffect {
        let mut effect = AuraEffect::new(AuraId::UnholyWarcry, "Unholy Warcry", 30_000, 3);
        effect.bonus_stats = Some(StatBundle {
            min_damage: 9.0,
            max_damage: 12.0,
            ..StatBundle::default()
        });
        effect
    }

    #[test]
    fn apply_then_remove_restores_every_channel() {
        let mut owner = test_player();
        let before: Vec<f64> = StatKind::ALL
            .iter()
            .map(|&k| owner.effective(k))
            .collect();

        let mut aura = Aura::new(warcry_effect(), &mut owner);
        assert_ne!(owner.effective(StatKind::MaxDamage), before[3]);

        aura.remove(&mut owner);
        for (i, &kind) in StatKind::ALL.iter().enumerate() {
            assert_eq!(owner.effective(kind), before[i], "{} drifted", kind.as_str());
        }
    }

    #[test]
    fn reapply_does_not_double_count_bonuses() {
        let mut owner = test_player();
        let baseline = owner.effective(StatKind::MaxDamage);

        let mut aura = Aura::new(warcry_effect(), &mut owner);
        let once = owner.effective(StatKind::MaxDamage);
        aura.reapply(warcry_effect(), &mut owner);
        assert_eq!(owner.effective(StatKind::MaxDamage), once);

        aura.remove(&mut owner);
        assert_eq!(owner.effective(StatKind::MaxDamage), baseline);
    }

    #[test]
    fn stacks_are_bounded_by_max() {
        let mut owner = test_player();
        let mut effect = AuraEffect::new(AuraId::IceboltSlow, "Icebolt Slow", 8_000, 1);
        effect.stackable = true;
        effect.max_stacks = 5;

        let mut aura = Aura::new(effect.clone(), &mut owner);
        for _ in 0..10 {
            aura.reapply(effect.clone(), &mut owner);
        }
        assert_eq!(aura.stacks(), 5);
    }

    #[test]
    fn expiry_flags_for_removal_and_reverts() {
        let mut owner = test_player();
        let baseline = owner.effective(StatKind::MaxDamage);
        let mut effect = warcry_effect();
        effect.duration_ms = 300;
        let mut aura = Aura::new(effect, &mut owner);

        let mut ctx = SimCtx::for_tests();
        for step in 0..4 {
            aura.update(100, step * 100, &mut owner, None, &mut ctx);
        }
        assert!(aura.to_remove);
        assert_eq!(owner.effective(StatKind::MaxDamage), baseline);
    }

    #[test]
    fn passive_auras_never_expire() {
        let mut owner = test_player();
        let mut effect = AuraEffect::new(AuraId::CranialPunctures, "Cranial Punctures", -1, 2);
        effect.bonus_stats = Some(StatBundle {
            critical: 0.08,
            ..StatBundle::default()
        });
        let mut aura = Aura::new(effect, &mut owner);
        assert!(aura.passive);

        let mut ctx = SimCtx::for_tests();
        for step in 0..1000 {
            aura.update(100, step * 100, &mut owner, None, &mut ctx);
        }
        assert!(!aura.to_remove);
        assert_eq!(owner.effective(StatKind::Critical), 0.08);
    }

    #[test]
    fn surge_charges_refresh_instead_of_expiring() {
        let mut owner = test_player();
        let mut effect = AuraEffect::new(AuraId::IceboltSurge, "Icebolt Surge", 8_000, 1);
        effect.stackable = true;
        effect.apply_stacks = 3;
        effect.max_stacks = 3;
        effect.behavior = AuraBehavior::SurgeCharges { refresh_ms: 8_000 };
        let mut aura = Aura::new(effect, &mut owner);

        aura.remove_stack(&mut owner);
        aura.remove_stack(&mut owner);
        aura.remove_stack(&mut owner);
        assert_eq!(aura.stacks(), 0);
        assert!(!aura.to_remove, "surge charges persist at zero stacks");

        let mut ctx = SimCtx::for_tests();
        let mut elapsed = 0;
        while elapsed <= 8_000 {
            aura.update(100, elapsed, &mut owner, None, &mut ctx);
            elapsed += 100;
        }
        assert!(!aura.to_remove);
        assert_eq!(aura.stacks(), 1, "expiry grants a fresh charge");
    }

    #[test]
    fn dot_ticks_accumulate_owner_damage() {
        let mut owner = test_player();
        let mut effect = AuraEffect::new(AuraId::Decay, "Decay - Debuff", 8_000, 1);
        effect.target = AuraTarget::PrimaryEnemy;
        effect.damage = Some(DamageOverTime::new(1.0, 18.0, 1.5));
        let mut aura = Aura::new(effect, &mut owner);

        let mut ctx = SimCtx::for_tests();
        let mut elapsed = 0;
        while elapsed < 4_000 {
            aura.update(100, elapsed, &mut owner, Some(0.0), &mut ctx);
            elapsed += 100;
        }
        // 125 average * 18% = 22.5 -> floor(1 + 22.5) per tick, ticks at 1.5s and 3s.
        assert_eq!(owner.damage_done, 46.0);
    }
}
