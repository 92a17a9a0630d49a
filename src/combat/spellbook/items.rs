//! Consumables and trinkets. Items never trigger the global cooldown, so a
//! potion can be squeezed between casts.

use crate::combat::ability::SpellEffect;
use crate::combat::aura::{AuraBehavior, AuraEffect, AuraId};
use crate::combat::enemy::Enemy;
use crate::combat::player::Player;

use super::apply_aura;

// Mana Potion: restores mana over 15 s. Rank maps to potion size.
const MANA_POTION_COOLDOWN_MS: i64 = 30_000;
const MANA_POTION_DURATION_MS: i64 = 15_000;
const MANA_POTION_TICK_MS: i64 = 3_000;
const MANA_POTION_RESTORE: [f64; 4] = [0.0, 15.0, 30.0, 50.0];

pub fn mana_potion_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: MANA_POTION_COOLDOWN_MS,
        ..SpellEffect::default()
    }
}

pub fn mana_potion_impact(player: &mut Player, slot: usize, enemies: &mut [Enemy]) {
    let rank = player.abilities[slot].rank;
    let mut potion = AuraEffect::new(
        AuraId::ManaPotion,
        "Mana Potion",
        MANA_POTION_DURATION_MS,
        rank,
    );
    potion.behavior = AuraBehavior::ManaTick {
        interval_ms: MANA_POTION_TICK_MS,
        amount: MANA_POTION_RESTORE[rank as usize],
    };
    apply_aura(player, enemies, potion);
}

// Tattooed Skull: short percentage damage burst.
const TATTOOED_SKULL_DAMAGE_PCT: f64 = 0.2;
const TATTOOED_SKULL_DURATION_MS: i64 = 10_000;
const TATTOOED_SKULL_COOLDOWN_MS: i64 = 60_000;

pub fn tattooed_skull_prepare() -> SpellEffect {
    SpellEffect {
        cooldown_ms: TATTOOED_SKULL_COOLDOWN_MS,
        ..SpellEffect::default()
    }
}

pub fn tattooed_skull_impact(player: &mut Player, slot: usize, enemies: &mut [Enemy]) {
    let rank = player.abilities[slot].rank;
    let mut buff = AuraEffect::new(
        AuraId::TattooedSkull,
        "Tattooed Skull",
        TATTOOED_SKULL_DURATION_MS,
        rank,
    );
    buff.bonus_stats_pct = Some(crate::combat::stats::StatBundle {
        min_damage: TATTOOED_SKULL_DAMAGE_PCT,
        max_damage: TATTOOED_SKULL_DAMAGE_PCT,
        ..Default::default()
    });
    apply_aura(player, enemies, buff);
}
