//! Mage abilities: the frost kit. Ice Bolt drives a slow/freeze cycle on
//! the primary target and feeds its own instant-cast charges.

use crate::combat::ability::{AbilityId, SpellEffect};
use crate::combat::aura::{AuraBehavior, AuraEffect, AuraId, AuraTarget, DamageOverTime};
use crate::combat::enemy::Enemy;
use crate::combat::engine::SimCtx;
use crate::combat::player::Player;
use crate::combat::stats::StatBundle;

use super::{apply_aura, default_impact};

/// Damage multiplier against a frozen target.
const FROZEN_DAMAGE_MOD: f64 = 1.5;

// Ice Bolt: filler with a cast time unless a surge charge is available.
const ICE_BOLT_BASE: f64 = 5.0;
const ICE_BOLT_BONUS: [f64; 6] = [0.0, 76.0, 114.0, 152.0, 190.0, 228.0];
pub const ICE_BOLT_MANA: [f64; 6] = [0.0, 3.0, 5.0, 7.0, 9.0, 11.0];
const ICE_BOLT_CAST_MS: i64 = 1_500;

const SURGE_DURATION_MS: i64 = 8_000;
const SURGE_STACKS: u32 = 3;
const SLOW_DURATION_MS: i64 = 8_000;
const SLOW_MAX_STACKS: u32 = 5;
const FREEZE_DURATION_MS: i64 = 5_000;
const FREEZE_AT_STACKS: u32 = 4;
const ORB_COOLDOWN_REFUND_MS: i64 = 500;

/// Starting surge charges are granted by knowing the spell at all.
pub fn ice_bolt_learned(player: &mut Player) {
    player.apply_aura(surge_effect(1));
}

fn surge_effect(rank: u8) -> AuraEffect {
    let mut effect = AuraEffect::new(
        AuraId::IceboltSurge,
        "Ice Bolt - Surge",
        SURGE_DURATION_MS,
        rank,
    );
    effect.stackable = true;
    effect.apply_stacks = SURGE_STACKS;
    effect.max_stacks = SURGE_STACKS;
    effect.behavior = AuraBehavior::SurgeCharges {
        refresh_ms: SURGE_DURATION_MS,
    };
    effect
}

pub fn ice_bolt_prepare(player: &mut Player, rank: usize) -> SpellEffect {
    let mut cast_time_ms = ICE_BOLT_CAST_MS;
    if player
        .aura(AuraId::IceboltSurge)
        .is_some_and(|aura| aura.stacks() > 0)
    {
        player.remove_aura_stack(AuraId::IceboltSurge);
        cast_time_ms = 0;
    }
    SpellEffect {
        base_damage: ICE_BOLT_BASE,
        bonus_damage: ICE_BOLT_BONUS[rank],
        cooldown_ms: 0,
        cast_time_ms,
    }
}

pub fn ice_bolt_impact(
    player: &mut Player,
    slot: usize,
    effect: &SpellEffect,
    elapsed_ms: i64,
    enemies: &mut [Enemy],
    ctx: &mut SimCtx,
) {
    let rank = player.abilities[slot].rank;

    if effect.has_damage() {
        // Each bolt shaves a little off the orb's cooldown.
        if let Some(orb) = player.ability_mut(AbilityId::IcicleOrb) {
            orb.reduce_cooldown(ORB_COOLDOWN_REFUND_MS);
        }
        let crit_mod = radiance_crit_bonus(player, enemies, 0.01);
        let modifier = if primary_frozen(player, enemies) {
            FROZEN_DAMAGE_MOD
        } else {
            1.0
        };
        default_impact(player, slot, effect, modifier, crit_mod, elapsed_ms, enemies, ctx);
    }

    // Slow stacks build toward a freeze; a frozen target takes no new slow.
    let Some(primary) = enemies.first_mut() else {
        return;
    };
    let slow_stacks = primary
        .aura(AuraId::IceboltSlow, player.id)
        .map(|aura| aura.stacks())
        .unwrap_or(0);
    if slow_stacks >= FREEZE_AT_STACKS {
        primary.remove_aura(AuraId::IceboltSlow, player);
        let mut freeze = AuraEffect::new(
            AuraId::IceboltFreeze,
            "Ice Bolt - Freeze",
            FREEZE_DURATION_MS,
            rank,
        );
        freeze.target = AuraTarget::PrimaryEnemy;
        primary.apply_aura(freeze, player);
    } else if !primary.has_aura(AuraId::IceboltFreeze, player.id) {
        let mut slow = AuraEffect::new(
            AuraId::IceboltSlow,
            "Ice Bolt - Slow",
            SLOW_DURATION_MS,
            rank,
        );
        slow.target = AuraTarget::PrimaryEnemy;
        slow.stackable = true;
        slow.max_stacks = SLOW_MAX_STACKS;
        primary.apply_aura(slow, player);
    }
}

// Icicle Orb: AoE nuke on a cooldown.
const ICICLE_ORB_BASE: f64 = 10.0;
const ICICLE_ORB_BONUS: [f64; 6] = [0.0, 98.0, 154.0, 210.0, 266.0, 322.0];
pub const ICICLE_ORB_MANA: [f64; 6] = [0.0, 10.0, 15.0, 20.0, 25.0, 30.0];
const ICICLE_ORB_CAST_MS: i64 = 1_500;
const ICICLE_ORB_COOLDOWN_MS: i64 = 15_000;

pub fn icicle_orb_prepare(rank: usize) -> SpellEffect {
    SpellEffect {
        base_damage: ICICLE_ORB_BASE,
        bonus_damage: ICICLE_ORB_BONUS[rank],
        cooldown_ms: ICICLE_ORB_COOLDOWN_MS,
        cast_time_ms: ICICLE_ORB_CAST_MS,
    }
}

pub fn icicle_orb_impact(
    player: &mut Player,
    slot: usize,
    effect: &SpellEffect,
    elapsed_ms: i64,
    enemies: &mut [Enemy],
    ctx: &mut SimCtx,
) {
    if !effect.has_damage() {
        return;
    }
    let crit_mod = radiance_crit_bonus(player, enemies, 0.02);
    let modifier = if primary_frozen(player, enemies) {
        FROZEN_DAMAGE_MOD
    } else {
        1.0
    };
    default_impact(player, slot, effect, modifier, crit_mod, elapsed_ms, enemies, ctx);
}

// Chilling Radiance: AoE damage aura on the primary target's position.
const CHILLING_RADIANCE_BONUS: [f64; 6] = [0.0, 40.0, 70.0, 100.0, 130.0, 160.0];
const CHILLING_RADIANCE_DURATION_MS: [i64; 6] = [0, 6_000, 6_500, 7_000, 7_500, 8_000];
pub const CHILLING_RADIANCE_MANA: [f64; 6] = [0.0, 4.0, 8.0, 12.0, 16.0, 20.0];
const CHILLING_RADIANCE_COOLDOWN_MS: i64 = 25_000;

pub fn chilling_radiance_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: CHILLING_RADIANCE_COOLDOWN_MS,
        ..SpellEffect::default()
    }
}

pub fn chilling_radiance_impact(player: &mut Player, slot: usize, enemies: &mut [Enemy]) {
    let rank = player.abilities[slot].rank;
    let mut radiance = AuraEffect::new(
        AuraId::ChillingRadiance,
        "Chilling Radiance",
        CHILLING_RADIANCE_DURATION_MS[rank as usize],
        rank,
    );
    radiance.target = AuraTarget::PrimaryEnemy;
    let mut dot = DamageOverTime::new(0.0, CHILLING_RADIANCE_BONUS[rank as usize], 1.0);
    dot.aoe = true;
    radiance.damage = Some(dot);
    apply_aura(player, enemies, radiance);
}

/// Crit chance bonus while the caster's radiance is running on the primary
/// target: `base + 0.03 * rank`.
fn radiance_crit_bonus(player: &Player, enemies: &[Enemy], base: f64) -> f64 {
    enemies
        .first()
        .and_then(|primary| primary.aura(AuraId::ChillingRadiance, player.id))
        .map(|aura| base + 0.03 * aura.rank as f64)
        .unwrap_or(0.0)
}

fn primary_frozen(player: &Player, enemies: &[Enemy]) -> bool {
    enemies
        .first()
        .is_some_and(|primary| primary.has_aura(AuraId::IceboltFreeze, player.id))
}

// Enchant: long flat damage buff with a cast time.
const ENCHANT_MIN: [f64; 5] = [0.0, 3.0, 5.0, 6.0, 8.0];
const ENCHANT_MAX: [f64; 5] = [0.0, 6.0, 10.0, 13.0, 17.0];
const ENCHANT_DURATION_MS: i64 = 300_000;
pub const ENCHANT_MANA: [f64; 5] = [0.0, 5.0, 8.0, 11.0, 14.0];
const ENCHANT_CAST_MS: i64 = 1_500;

pub fn enchant_prepare() -> SpellEffect {
    SpellEffect {
        cast_time_ms: ENCHANT_CAST_MS,
        ..SpellEffect::default()
    }
}

pub fn enchant_impact(player: &mut Player, slot: usize, enemies: &mut [Enemy]) {
    let rank = player.abilities[slot].rank;
    let mut buff = AuraEffect::new(AuraId::Enchant, "Enchant", ENCHANT_DURATION_MS, rank);
    buff.bonus_stats = Some(StatBundle {
        min_damage: ENCHANT_MIN[rank as usize],
        max_damage: ENCHANT_MAX[rank as usize],
        ..StatBundle::default()
    });
    apply_aura(player, enemies, buff);
}

// Arctic Aura: long crit buff.
const ARCTIC_AURA_CRIT: [f64; 5] = [0.0, 0.03, 0.06, 0.09, 0.12];
const ARCTIC_AURA_DURATION_MS: i64 = 300_000;
pub const ARCTIC_AURA_MANA: [f64; 5] = [0.0, 15.0, 25.0, 35.0, 45.0];
const ARCTIC_AURA_COOLDOWN_MS: i64 = 120_000;

pub fn arctic_aura_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: ARCTIC_AURA_COOLDOWN_MS,
        ..SpellEffect::default()
    }
}

pub fn arctic_aura_impact(player: &mut Player, slot: usize, enemies: &mut [Enemy]) {
    let rank = player.abilities[slot].rank;
    let mut buff = AuraEffect::new(
        AuraId::ArcticAura,
        "Arctic Aura",
        ARCTIC_AURA_DURATION_MS,
        rank,
    );
    buff.bonus_stats = Some(StatBundle {
        critical: ARCTIC_AURA_CRIT[rank as usize],
        ..StatBundle::default()
    });
    apply_aura(player, enemies, buff);
}

// Hypothermic Frenzy: short haste + percentage damage burst that also
// resets the orb.
const FRENZY_HASTE: [f64; 6] = [0.0, 0.10, 0.17, 0.24, 0.31, 0.38];
const FRENZY_DAMAGE_PCT: [f64; 6] = [0.0, 0.09, 0.16, 0.22, 0.30, 0.37];
const FRENZY_DURATION_MS: i64 = 12_000;
const FRENZY_COOLDOWN_MS: i64 = 45_000;

pub fn hypothermic_frenzy_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: FRENZY_COOLDOWN_MS,
        ..SpellEffect::default()
    }
}

pub fn hypothermic_frenzy_impact(player: &mut Player, slot: usize, enemies: &mut [Enemy]) {
    let rank = player.abilities[slot].rank;

    if let Some(orb) = player.ability_mut(AbilityId::IcicleOrb) {
        orb.reset_cooldown();
    }

    let mut buff = AuraEffect::new(
        AuraId::HypothermicFrenzy,
        "Hypothermic Frenzy",
        FRENZY_DURATION_MS,
        rank,
    );
    buff.bonus_stats = Some(StatBundle {
        haste: FRENZY_HASTE[rank as usize],
        ..StatBundle::default()
    });
    buff.bonus_stats_pct = Some(StatBundle {
        min_damage: FRENZY_DAMAGE_PCT[rank as usize],
        max_damage: FRENZY_DAMAGE_PCT[rank as usize],
        ..StatBundle::default()
    });
    apply_aura(player, enemies, buff);
}

// Ice Shield and Teleport keep their costs and cooldowns so the rotation
// pays for them, but have no combat-visible effect here.
// TODO: Ice Shield needs an incoming-damage model before its absorb can do
// anything; revisit when enemies attack back.

pub const ICE_SHIELD_MANA: [f64; 6] = [0.0, 5.0, 10.0, 15.0, 20.0, 25.0];

pub fn ice_shield_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: 60_000,
        ..SpellEffect::default()
    }
}

pub const TELEPORT_MANA: [f64; 2] = [0.0, 4.0];

pub fn teleport_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: 12_000,
        ..SpellEffect::default()
    }
}
