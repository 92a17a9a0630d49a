//! Shaman abilities: the decay/plaguespreader spread cycle, harvest payoff,
//! and the utility buffs.

use crate::combat::ability::{AbilityId, SpellEffect};
use crate::combat::aura::{AuraBehavior, AuraEffect, AuraId, AuraTarget, DamageOverTime};
use crate::combat::enemy::{Enemy, TargetShuffle};
use crate::combat::engine::SimCtx;
use crate::combat::player::Player;
use crate::combat::stats::StatBundle;

use super::apply_aura;

// Decay: direct hit plus a rot debuff; with Plaguespreader learned it
// spreads across shuffled extra targets and stacks a haste buff.
const DECAY_BASE: f64 = 5.0;
const DECAY_BONUS: [f64; 6] = [0.0, 16.0, 29.0, 42.0, 55.0, 68.0];
const DECAY_DOT_BASE: f64 = 1.0;
const DECAY_DOT_BONUS: [f64; 6] = [0.0, 18.0, 26.0, 34.0, 42.0, 50.0];
const DECAY_JUMP_BASE: f64 = 3.0;
const DECAY_JUMP_BONUS: [f64; 6] = [0.0, 40.0, 59.0, 77.0, 95.0, 113.0];
pub const DECAY_MANA: [f64; 6] = [0.0, 6.0, 11.0, 16.0, 21.0, 26.0];
const DECAY_COOLDOWN_MS: i64 = 3_000;
const DECAY_DOT_DURATION_MS: i64 = 8_000;

pub(crate) const PLAGUESPREADER_HASTE: [f64; 6] = [0.0, 0.03, 0.05, 0.07, 0.09, 0.11];
pub(crate) const PLAGUESPREADER_JUMPS: [u32; 6] = [0, 3, 5, 7, 9, 11];
pub(crate) const PLAGUESPREADER_DURATION_MS: i64 = 5_000;
const PLAGUESPREADER_MAX_STACKS: u32 = 5;

pub fn decay_prepare(rank: usize) -> SpellEffect {
    SpellEffect {
        base_damage: DECAY_BASE,
        bonus_damage: DECAY_BONUS[rank],
        cooldown_ms: DECAY_COOLDOWN_MS,
        cast_time_ms: 0,
    }
}

fn decay_debuff(rank: u8) -> AuraEffect {
    let mut debuff = AuraEffect::new(
        AuraId::Decay,
        "Decay - Debuff",
        DECAY_DOT_DURATION_MS,
        rank,
    );
    debuff.target = AuraTarget::PrimaryEnemy;
    debuff.damage = Some(DamageOverTime::new(
        DECAY_DOT_BASE,
        DECAY_DOT_BONUS[rank as usize],
        1.5,
    ));
    debuff
}

pub fn decay_impact(
    player: &mut Player,
    slot: usize,
    effect: &SpellEffect,
    elapsed_ms: i64,
    enemies: &mut [Enemy],
    ctx: &mut SimCtx,
) {
    let rank = player.abilities[slot].rank;
    let name = player.abilities[slot].name.clone();
    let plague_rank = player.ability(AbilityId::Plaguespreader).map(|a| a.rank);

    if let Some(plague_rank) = plague_rank {
        let mut haste = AuraEffect::new(
            AuraId::Plaguespreader,
            "Plaguespreader",
            PLAGUESPREADER_DURATION_MS,
            plague_rank,
        );
        haste.bonus_stats = Some(StatBundle {
            haste: PLAGUESPREADER_HASTE[plague_rank as usize],
            ..StatBundle::default()
        });
        haste.stackable = true;
        haste.max_stacks = PLAGUESPREADER_MAX_STACKS;
        player.apply_aura(haste);
    }

    if !effect.has_damage() || enemies.is_empty() {
        return;
    }

    // Spread jumps: shuffled over the non-primary targets, hitting each
    // already-rotting one and stopping after the first fresh target, which
    // then carries the debuff too.
    if ctx.params.targets > 1 {
        if let Some(plague_rank) = plague_rank {
            if enemies[0].has_aura(AuraId::Decay, player.id) {
                let reach = ctx
                    .params
                    .targets
                    .min(PLAGUESPREADER_JUMPS[plague_rank as usize])
                    as usize;
                let mut shuffle = TargetShuffle::skipping_first(enemies.len().min(reach));
                while let Some(target) = shuffle.next(&mut ctx.rng) {
                    let fresh = !enemies[target].has_aura(AuraId::Decay, player.id);
                    let mitigation = enemies[target].mitigation;
                    player.deal_spell_damage(
                        DECAY_JUMP_BASE,
                        DECAY_JUMP_BONUS[rank as usize],
                        mitigation,
                        1.0,
                        0.0,
                        "Spreading Decay",
                        elapsed_ms,
                        ctx,
                    );
                    enemies[target].apply_aura(decay_debuff(rank), player);
                    if fresh {
                        break;
                    }
                }
            }
        }
    }

    let mitigation = enemies[0].mitigation;
    player.deal_spell_damage(
        effect.base_damage,
        effect.bonus_damage,
        mitigation,
        1.0,
        0.0,
        &name,
        elapsed_ms,
        ctx,
    );
    enemies[0].apply_aura(decay_debuff(rank), player);
}

// Soul Harvest: hits every target carrying the caster's decay, refunding a
// little mana per reaped target.
const SOUL_HARVEST_BASE: f64 = 4.0;
const SOUL_HARVEST_BONUS: [f64; 6] = [0.0, 50.0, 80.0, 110.0, 140.0, 170.0];
pub const SOUL_HARVEST_MANA: [f64; 6] = [0.0, 4.0, 7.0, 10.0, 13.0, 16.0];
const SOUL_HARVEST_MANA_RETURN: [f64; 6] = [0.0, 1.0, 3.0, 4.0, 5.0, 7.0];
const SOUL_HARVEST_COOLDOWN_MS: i64 = 8_000;

pub fn soul_harvest_prepare(rank: usize) -> SpellEffect {
    SpellEffect {
        base_damage: SOUL_HARVEST_BASE,
        bonus_damage: SOUL_HARVEST_BONUS[rank],
        cooldown_ms: SOUL_HARVEST_COOLDOWN_MS,
        cast_time_ms: 0,
    }
}

pub fn soul_harvest_impact(
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
    let rank = player.abilities[slot].rank as usize;
    let name = player.abilities[slot].name.clone();
    let reachable = enemies.len().min(ctx.params.targets as usize);
    for enemy in enemies.iter().take(reachable) {
        if !enemy.has_aura(AuraId::Decay, player.id) {
            continue;
        }
        player.deal_spell_damage(
            effect.base_damage,
            effect.bonus_damage,
            enemy.mitigation,
            1.0,
            0.0,
            &name,
            elapsed_ms,
            ctx,
        );
        player.regenerate_mana(SOUL_HARVEST_MANA_RETURN[rank]);
    }
}

// Canine Howl: short haste buff.
const CANINE_HOWL_HASTE: [f64; 6] = [0.0, 0.16, 0.22, 0.28, 0.34, 0.40];
const CANINE_HOWL_DURATION_MS: i64 = 15_000;
const CANINE_HOWL_COOLDOWN_MS: i64 = 60_000;
pub const CANINE_HOWL_MANA: [f64; 6] = [0.0, 4.0, 7.0, 10.0, 13.0, 16.0];

pub fn canine_howl_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: CANINE_HOWL_COOLDOWN_MS,
        ..SpellEffect::default()
    }
}

pub fn canine_howl_impact(player: &mut Player, slot: usize, enemies: &mut [Enemy]) {
    let rank = player.abilities[slot].rank;
    let mut buff = AuraEffect::new(
        AuraId::CanineHowl,
        "Canine Howl",
        CANINE_HOWL_DURATION_MS,
        rank,
    );
    buff.bonus_stats = Some(StatBundle {
        haste: CANINE_HOWL_HASTE[rank as usize],
        ..StatBundle::default()
    });
    apply_aura(player, enemies, buff);
}

// Mimir's Well: channel-free mana fountain, a percent of max mana per second.
const MIMIRS_WELL_DURATION_MS: i64 = 15_000;
const MIMIRS_WELL_COOLDOWN_MS: i64 = 120_000;
const MIMIRS_WELL_TICK_MS: i64 = 1_000;
const MIMIRS_WELL_FRACTION: [f64; 6] = [0.0, 0.02, 0.03, 0.04, 0.05, 0.06];

pub fn mimirs_well_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: MIMIRS_WELL_COOLDOWN_MS,
        ..SpellEffect::default()
    }
}

pub fn mimirs_well_impact(player: &mut Player, slot: usize, enemies: &mut [Enemy]) {
    let rank = player.abilities[slot].rank;
    let mut well = AuraEffect::new(
        AuraId::MimirsWell,
        "Mimir's Well",
        MIMIRS_WELL_DURATION_MS,
        rank,
    );
    well.behavior = AuraBehavior::ManaPercentTick {
        interval_ms: MIMIRS_WELL_TICK_MS,
        fraction: MIMIRS_WELL_FRACTION[rank as usize],
    };
    apply_aura(player, enemies, well);
}

// Spirit Animal: off-GCD timed aura. The companion itself contributes
// nothing measurable here; the aura still occupies its slot for conditions.
pub const SPIRIT_ANIMAL_MANA: [f64; 6] = [0.0, 10.0, 12.0, 14.0, 16.0, 18.0];
const SPIRIT_ANIMAL_DURATION_MS: [i64; 6] = [0, 10_000, 15_000, 20_000, 25_000, 30_000];
const SPIRIT_ANIMAL_COOLDOWN_MS: i64 = 30_000;

pub fn spirit_animal_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: SPIRIT_ANIMAL_COOLDOWN_MS,
        ..SpellEffect::default()
    }
}

pub fn spirit_animal_impact(player: &mut Player, slot: usize, enemies: &mut [Enemy]) {
    let rank = player.abilities[slot].rank;
    let aura = AuraEffect::new(
        AuraId::SpiritAnimal,
        "Spirit Animal",
        SPIRIT_ANIMAL_DURATION_MS[rank as usize],
        rank,
    );
    apply_aura(player, enemies, aura);
}
