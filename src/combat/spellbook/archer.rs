//! Archer abilities: instant-charge interplay between Swift Shot, Precise
//! Shot and Dash, plus the serpent/poison multi-target package.

use crate::combat::ability::{AbilityId, SpellEffect};
use crate::combat::aura::{AuraEffect, AuraId, AuraTarget, DamageOverTime};
use crate::combat::enemy::Enemy;
use crate::combat::engine::SimCtx;
use crate::combat::player::Player;
use crate::combat::stats::StatBundle;

use super::{apply_aura, default_impact};

// Swift Shot: filler with a cast time unless an instant charge is up.
const SWIFT_SHOT_BASE: f64 = 5.0;
const SWIFT_SHOT_BONUS: [f64; 6] = [0.0, 56.0, 84.0, 112.0, 140.0, 168.0];
pub const SWIFT_SHOT_MANA: [f64; 6] = [0.0, 2.0, 3.0, 4.0, 5.0, 6.0];
const SWIFT_SHOT_CAST_MS: i64 = 1_500;
const SWIFT_SHOT_INSTANT_DURATION_MS: i64 = 8_000;
const SWIFT_SHOT_INSTANT_MOD: f64 = 1.5;

pub fn swift_shot_prepare(player: &mut Player, rank: usize) -> SpellEffect {
    let mut cast_time_ms = SWIFT_SHOT_CAST_MS;
    if player.has_aura(AuraId::SwiftShotInstant) {
        player.remove_aura_stack(AuraId::SwiftShotInstant);
        cast_time_ms = 0;
    }
    SpellEffect {
        base_damage: SWIFT_SHOT_BASE,
        bonus_damage: SWIFT_SHOT_BONUS[rank],
        cooldown_ms: 0,
        cast_time_ms,
    }
}

pub fn swift_shot_impact(
    player: &mut Player,
    slot: usize,
    effect: &SpellEffect,
    elapsed_ms: i64,
    enemies: &mut [Enemy],
    ctx: &mut SimCtx,
) {
    let modifier = if player.has_aura(AuraId::SwiftShotInstant) {
        SWIFT_SHOT_INSTANT_MOD
    } else {
        1.0
    };
    default_impact(player, slot, effect, modifier, 0.0, elapsed_ms, enemies, ctx);
}

// Precise Shot: heavy hit; consumes its own instant charge, jumps to extra
// targets with Serpent Arrows learned, and applies the poison package.
const PRECISE_SHOT_BASE: f64 = 5.0;
const PRECISE_SHOT_BONUS: [f64; 6] = [0.0, 106.0, 152.0, 198.0, 244.0, 290.0];
pub const PRECISE_SHOT_MANA: [f64; 6] = [0.0, 5.0, 8.0, 11.0, 14.0, 17.0];
const PRECISE_SHOT_CAST_MS: i64 = 1_700;
const PRECISE_SHOT_COOLDOWN_MS: i64 = 6_000;
const PRECISE_SHOT_GRANT_STACKS: u32 = 2;
const SWIFT_SHOT_INSTANT_MAX_STACKS: u32 = 5;

pub(crate) const SERPENT_JUMPS: [u32; 6] = [0, 3, 4, 5, 6, 7];
pub(crate) const SERPENT_BONUS: [f64; 6] = [0.0, 0.245, 0.37, 0.495, 0.62, 0.745];

pub(crate) const POISON_PCT: [f64; 6] = [0.0, 0.030, 0.055, 0.080, 0.105, 0.130];
pub(crate) const POISON_DURATION_MS: i64 = 10_000;
const POISON_BASE: f64 = 3.0;
const POISON_MAX_STACKS: u32 = 3;

pub fn precise_shot_prepare(player: &mut Player, slot: usize, rank: usize) -> SpellEffect {
    let mut cast_time_ms = PRECISE_SHOT_CAST_MS;
    if player.has_aura(AuraId::PreciseShotInstant) {
        player.expire_aura(AuraId::PreciseShotInstant);
        cast_time_ms = 0;
    }

    if let Some(serpent_rank) = player.ability(AbilityId::SerpentArrows).map(|a| a.rank) {
        let ability = &mut player.abilities[slot];
        ability.is_aoe = true;
        ability.max_targets = SERPENT_JUMPS[serpent_rank as usize];
    }

    SpellEffect {
        base_damage: PRECISE_SHOT_BASE,
        bonus_damage: PRECISE_SHOT_BONUS[rank],
        cooldown_ms: PRECISE_SHOT_COOLDOWN_MS,
        cast_time_ms,
    }
}

pub fn precise_shot_impact(
    player: &mut Player,
    slot: usize,
    effect: &SpellEffect,
    elapsed_ms: i64,
    enemies: &mut [Enemy],
    ctx: &mut SimCtx,
) {
    // Landing a precise shot banks swift-shot instants.
    let mut instants = AuraEffect::new(
        AuraId::SwiftShotInstant,
        "Swift Shot - Instant",
        SWIFT_SHOT_INSTANT_DURATION_MS,
        1,
    );
    instants.stackable = true;
    instants.apply_stacks = PRECISE_SHOT_GRANT_STACKS;
    instants.max_stacks = SWIFT_SHOT_INSTANT_MAX_STACKS;
    apply_aura(player, enemies, instants);

    if !effect.has_damage() || enemies.is_empty() {
        return;
    }

    let (name, is_aoe, max_targets) = {
        let ability = &player.abilities[slot];
        (ability.name.clone(), ability.is_aoe, ability.max_targets)
    };
    let serpent_rank = player.ability(AbilityId::SerpentArrows).map(|a| a.rank);

    // The first target takes the full hit; serpent jumps land reduced hits
    // on the remaining targets, each with its own rolls.
    let primary_mitigation = enemies[0].mitigation;
    let rolled = player.deal_spell_damage(
        effect.base_damage,
        effect.bonus_damage,
        primary_mitigation,
        1.0,
        0.0,
        &name,
        elapsed_ms,
        ctx,
    );

    if is_aoe && ctx.params.targets > 1 {
        if let Some(serpent_rank) = serpent_rank {
            let jumps = ctx
                .params
                .targets
                .saturating_sub(1)
                .min(max_targets) as usize;
            for _ in 0..jumps {
                player.deal_spell_damage(
                    effect.base_damage,
                    effect.bonus_damage,
                    primary_mitigation,
                    SERPENT_BONUS[serpent_rank as usize],
                    0.0,
                    &name,
                    elapsed_ms,
                    ctx,
                );
            }
        }
    }

    if let Some(poison_rank) = player.ability(AbilityId::PoisonArrows).map(|a| a.rank) {
        let mut poison = AuraEffect::new(
            AuraId::PoisonArrows,
            "Poison Arrows",
            POISON_DURATION_MS,
            poison_rank,
        );
        poison.target = AuraTarget::PrimaryEnemy;
        poison.stackable = true;
        poison.max_stacks = POISON_MAX_STACKS;
        let mut dot = DamageOverTime::new(
            POISON_BASE,
            rolled * POISON_PCT[poison_rank as usize],
            1.5,
        );
        dot.triggered = true;
        dot.aoe = is_aoe;
        dot.max_targets = ctx.params.targets.min(max_targets);
        poison.damage = Some(dot);
        apply_aura(player, enemies, poison);
    }
}

// Dash: utility sprint that arms an instant Precise Shot and resets its
// cooldown. Everything happens up front; the impact is empty.
pub const DASH_MANA: f64 = 6.0;
const DASH_COOLDOWN_MS: i64 = 10_000;
const PRECISE_SHOT_INSTANT_DURATION_MS: i64 = 6_000;

pub fn dash_prepare(player: &mut Player) -> SpellEffect {
    let instant = AuraEffect::new(
        AuraId::PreciseShotInstant,
        "Precise Shot - Instant",
        PRECISE_SHOT_INSTANT_DURATION_MS,
        1,
    );
    player.apply_aura(instant);

    if let Some(precise) = player.ability_mut(AbilityId::PreciseShot) {
        precise.reset_cooldown();
    }

    SpellEffect {
        cooldown_ms: DASH_COOLDOWN_MS,
        ..SpellEffect::default()
    }
}

// Invigorate: percentage damage buff plus an immediate mana refund.
const INVIGORATE_COOLDOWN_MS: i64 = 50_000;
const INVIGORATE_DURATION_MS: i64 = 17_000;
const INVIGORATE_DAMAGE_PCT: [f64; 6] = [0.0, 0.09, 0.18, 0.27, 0.36, 0.45];
const INVIGORATE_MANA_PCT: [f64; 6] = [0.0, 0.08, 0.13, 0.18, 0.23, 0.28];

pub fn invigorate_prepare(player: &mut Player, rank: usize) -> SpellEffect {
    let mut buff = AuraEffect::new(
        AuraId::Invigorate,
        "Invigorate",
        INVIGORATE_DURATION_MS,
        rank as u8,
    );
    buff.bonus_stats_pct = Some(StatBundle {
        min_damage: INVIGORATE_DAMAGE_PCT[rank],
        max_damage: INVIGORATE_DAMAGE_PCT[rank],
        ..StatBundle::default()
    });
    player.apply_aura(buff);

    SpellEffect {
        cooldown_ms: INVIGORATE_COOLDOWN_MS,
        ..SpellEffect::default()
    }
}

pub fn invigorate_impact(player: &mut Player, slot: usize) {
    let rank = player.abilities[slot].rank as usize;
    player.regenerate_mana_percentage(INVIGORATE_MANA_PCT[rank], 0.0);
}

// Pathfinding: movement utility with no combat-visible effect; the rotation
// still pays its cost and cooldown.
pub const PATHFINDING_MANA: [f64; 6] = [0.0, 12.0, 19.0, 26.0, 33.0, 40.0];

pub fn pathfinding_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: 100_000,
        ..SpellEffect::default()
    }
}

// Cranial Punctures: permanent crit passive, applied once at build time.
const CRANIAL_PUNCTURES_CRIT: [f64; 6] = [0.0, 0.04, 0.08, 0.12, 0.16, 0.20];

pub fn cranial_punctures_learned(player: &mut Player, rank: u8) {
    let mut passive = AuraEffect::new(AuraId::CranialPunctures, "Cranial Punctures", -1, rank);
    passive.bonus_stats = Some(StatBundle {
        critical: CRANIAL_PUNCTURES_CRIT[rank as usize],
        ..StatBundle::default()
    });
    player.apply_aura(passive);
}

// Temporal Dilatation: long haste buff.
const TEMPORAL_DILATATION_HASTE: [f64; 6] = [0.0, 0.03, 0.06, 0.09, 0.12, 0.15];
const TEMPORAL_DILATATION_DURATION_MS: i64 = 300_000;
pub const TEMPORAL_DILATATION_MANA: [f64; 6] = [0.0, 10.0, 15.0, 20.0, 25.0, 30.0];
const TEMPORAL_DILATATION_COOLDOWN_MS: i64 = 120_000;

pub fn temporal_dilatation_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: TEMPORAL_DILATATION_COOLDOWN_MS,
        ..SpellEffect::default()
    }
}

pub fn temporal_dilatation_impact(player: &mut Player, slot: usize, enemies: &mut [Enemy]) {
    let rank = player.abilities[slot].rank;
    let mut buff = AuraEffect::new(
        AuraId::TemporalDilatation,
        "Temporal Dilatation",
        TEMPORAL_DILATATION_DURATION_MS,
        rank,
    );
    buff.bonus_stats = Some(StatBundle {
        haste: TEMPORAL_DILATATION_HASTE[rank as usize],
        ..StatBundle::default()
    });
    apply_aura(player, enemies, buff);
}
