//! Warrior abilities: direct melee damage, the laceration bleed, and the
//! defensive buff kit.

use crate::combat::ability::{AbilityId, SpellEffect};
use crate::combat::aura::{AuraBehavior, AuraEffect, AuraId, AuraTarget, DamageOverTime};
use crate::combat::enemy::Enemy;
use crate::combat::engine::SimCtx;
use crate::combat::player::Player;
use crate::combat::stats::StatBundle;

use super::{apply_aura, default_impact};

// Slash: filler strike, no cooldown.
const SLASH_BASE: f64 = 5.0;
const SLASH_BONUS: [f64; 6] = [0.0, 72.0, 108.0, 144.0, 180.0, 216.0];
pub const SLASH_MANA: [f64; 6] = [0.0, 2.0, 3.0, 4.0, 5.0, 6.0];

pub fn slash_prepare(rank: usize) -> SpellEffect {
    SpellEffect {
        base_damage: SLASH_BASE,
        bonus_damage: SLASH_BONUS[rank],
        cooldown_ms: 0,
        cast_time_ms: 0,
    }
}

// Crescent Swipe: AoE swing; with Centrifugal Laceration learned it also
// leaves a stacking bleed on the primary target.
const CRESCENT_SWIPE_BONUS: [f64; 6] = [0.0, 117.0, 134.0, 151.0, 168.0, 185.0];
pub const CRESCENT_SWIPE_MANA: [f64; 6] = [0.0, 4.0, 6.0, 8.0, 10.0, 12.0];
const CRESCENT_SWIPE_COOLDOWN_MS: i64 = 6_000;

// Laceration bleed scales off the swipe's own bonus damage.
pub(crate) const LACERATION_FACTOR: [f64; 6] = [0.0, 0.125, 0.157, 0.189, 0.221, 0.253];
pub(crate) const LACERATION_DURATION_MS: i64 = 10_000;

pub fn crescent_swipe_prepare(rank: usize) -> SpellEffect {
    SpellEffect {
        base_damage: 0.0,
        bonus_damage: CRESCENT_SWIPE_BONUS[rank],
        cooldown_ms: CRESCENT_SWIPE_COOLDOWN_MS,
        cast_time_ms: 0,
    }
}

pub fn crescent_swipe_impact(
    player: &mut Player,
    slot: usize,
    effect: &SpellEffect,
    elapsed_ms: i64,
    enemies: &mut [Enemy],
    ctx: &mut SimCtx,
) {
    let swipe_rank = player.abilities[slot].rank as usize;
    if let Some(laceration) = player.ability(AbilityId::CentrifugalLaceration) {
        let laceration_rank = laceration.rank;
        let mut bleed = AuraEffect::new(
            AuraId::CentrifugalLaceration,
            "Centrifugal Laceration",
            LACERATION_DURATION_MS,
            laceration_rank,
        );
        bleed.target = AuraTarget::PrimaryEnemy;
        bleed.stackable = true;
        bleed.max_stacks = 3;
        let mut dot = DamageOverTime::new(
            0.0,
            CRESCENT_SWIPE_BONUS[swipe_rank] * LACERATION_FACTOR[laceration_rank as usize],
            1.5,
        );
        dot.aoe = true;
        bleed.damage = Some(dot);
        apply_aura(player, enemies, bleed);
    }

    default_impact(player, slot, effect, 1.0, 0.0, elapsed_ms, enemies, ctx);
}

// Unholy Warcry: long flat damage buff.
const UNHOLY_WARCRY_MIN_PER_RANK: f64 = 3.0;
const UNHOLY_WARCRY_MAX_PER_RANK: f64 = 4.0;
const UNHOLY_WARCRY_DURATION_MS: i64 = 300_000;
pub const UNHOLY_WARCRY_MANA: [f64; 5] = [0.0, 8.0, 16.0, 24.0, 32.0];
const UNHOLY_WARCRY_COOLDOWN_MS: i64 = 150_000;

pub fn unholy_warcry_prepare() -> SpellEffect {
    SpellEffect {
        base_damage: 0.0,
        bonus_damage: 0.0,
        cooldown_ms: UNHOLY_WARCRY_COOLDOWN_MS,
        cast_time_ms: 0,
    }
}

pub fn unholy_warcry_impact(player: &mut Player, slot: usize, enemies: &mut [Enemy]) {
    let rank = player.abilities[slot].rank;
    let mut buff = AuraEffect::new(
        AuraId::UnholyWarcry,
        "Unholy Warcry",
        UNHOLY_WARCRY_DURATION_MS,
        rank,
    );
    buff.bonus_stats = Some(StatBundle {
        min_damage: UNHOLY_WARCRY_MIN_PER_RANK * rank as f64,
        max_damage: UNHOLY_WARCRY_MAX_PER_RANK * rank as f64,
        ..StatBundle::default()
    });
    apply_aura(player, enemies, buff);
}

// Bulwark: block buff that converts blocked hits into stacking retaliatory
// damage, counted over one-second windows. Off the global cooldown.
const BULWARK_BLOCK: [f64; 6] = [0.0, 0.34, 0.38, 0.42, 0.46, 0.50];
const BULWARK_DURATION_MS: i64 = 9_000;
pub const BULWARK_MANA: [f64; 6] = [0.0, 8.0, 13.0, 18.0, 23.0, 28.0];
const BULWARK_COOLDOWN_MS: i64 = 30_000;
const BULWARK_RETALIATION_PCT: [f64; 6] = [0.0, 8.0, 10.0, 12.0, 14.0, 16.0];
const BULWARK_WINDOW_MS: i64 = 1_000;
const BULWARK_MAX_STACKS: u32 = 5;

pub fn bulwark_prepare() -> SpellEffect {
    SpellEffect {
        base_damage: 0.0,
        bonus_damage: 0.0,
        cooldown_ms: BULWARK_COOLDOWN_MS,
        cast_time_ms: 0,
    }
}

pub fn bulwark_impact(player: &mut Player, slot: usize, enemies: &mut [Enemy]) {
    let rank = player.abilities[slot].rank;
    let mut buff = AuraEffect::new(AuraId::BulwarkBlock, "Bulwark", BULWARK_DURATION_MS, rank);
    buff.bonus_stats = Some(StatBundle {
        block: BULWARK_BLOCK[rank as usize],
        ..StatBundle::default()
    });
    buff.stackable = true;
    buff.max_stacks = BULWARK_MAX_STACKS;
    buff.behavior = AuraBehavior::BlockRetaliation {
        window_ms: BULWARK_WINDOW_MS,
        damage_pct: BULWARK_RETALIATION_PCT[rank as usize],
    };
    apply_aura(player, enemies, buff);
}

// The remaining warrior kit has no combat-visible effect in this engine;
// cooldown and mana pressure on the rotation are still modeled.

pub const TAUNT_MANA: [f64; 6] = [0.0, 4.0, 8.0, 12.0, 16.0, 20.0];

pub fn taunt_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: 15_000,
        ..SpellEffect::default()
    }
}

pub const CHARGE_MANA: [f64; 2] = [0.0, 12.0];

pub fn charge_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: 15_000,
        ..SpellEffect::default()
    }
}

pub const CRUSADERS_COURAGE_MANA: [f64; 6] = [0.0, 8.0, 16.0, 24.0, 32.0, 40.0];

pub fn crusaders_courage_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: 150_000,
        ..SpellEffect::default()
    }
}

pub const COLOSSAL_RECONSTRUCTION_MANA: [f64; 6] = [0.0, 8.0, 16.0, 24.0, 32.0, 40.0];

pub fn colossal_reconstruction_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: 25_000,
        ..SpellEffect::default()
    }
}

pub const TEMPERING_MANA: [f64; 2] = [0.0, 8.0];

pub fn tempering_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: 30_000,
        ..SpellEffect::default()
    }
}
