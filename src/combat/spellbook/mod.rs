//! Per-ability behavior: static rank tables, effect computation and impact
//! hooks.
//!
//! Instead of one subclass per spell, behavior is a closed dispatch: each
//! [`AbilityId`] maps to a static [`AbilityProfile`] plus three hooks —
//! `on_learned` (build-time passives), `prepare` (effect computation before
//! a cast commits) and `on_casted` (impact: damage resolution, aura
//! application, side effects). Rank tables are `'static` data shared by
//! every actor instance.

pub mod archer;
pub mod items;
pub mod mage;
pub mod shaman;
pub mod warrior;

use crate::combat::ability::{AbilityId, SpellEffect};
use crate::combat::aura::{AuraEffect, AuraId, AuraTarget};
use crate::combat::enemy::Enemy;
use crate::combat::engine::SimCtx;
use crate::combat::player::Player;

/// Static shape of an ability: everything known before the build assigns a
/// rank.
#[derive(Debug, Clone, Copy)]
pub struct AbilityProfile {
    pub name: &'static str,
    pub max_rank: u8,
    pub is_item: bool,
    pub triggers_global: bool,
    pub is_aoe: bool,
    pub max_targets: u32,
    pub gating_aura: Option<AuraId>,
    pub forced: bool,
    pub ignore_aura: bool,
}

impl AbilityProfile {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            max_rank: 5,
            is_item: false,
            triggers_global: true,
            is_aoe: false,
            max_targets: u32::MAX,
            gating_aura: None,
            forced: false,
            ignore_aura: false,
        }
    }

    const fn max_rank(mut self, max_rank: u8) -> Self {
        self.max_rank = max_rank;
        self
    }

    const fn item(mut self) -> Self {
        self.is_item = true;
        self.triggers_global = false;
        self
    }

    const fn off_global(mut self) -> Self {
        self.triggers_global = false;
        self
    }

    const fn aoe(mut self) -> Self {
        self.is_aoe = true;
        self
    }

    const fn gated_by(mut self, aura: AuraId) -> Self {
        self.gating_aura = Some(aura);
        self
    }

    const fn forced(mut self) -> Self {
        self.forced = true;
        self
    }

    const fn ignore_aura(mut self) -> Self {
        self.ignore_aura = true;
        self
    }
}

/// Static profile lookup for an ability identity.
pub fn profile(id: AbilityId) -> AbilityProfile {
    match id {
        AbilityId::Slash => AbilityProfile::new("Slash"),
        AbilityId::CrescentSwipe => AbilityProfile::new("Crescent Swipe")
            .aoe()
            .gated_by(AuraId::CentrifugalLaceration)
            .ignore_aura(),
        AbilityId::UnholyWarcry => AbilityProfile::new("Unholy Warcry")
            .max_rank(4)
            .gated_by(AuraId::UnholyWarcry),
        AbilityId::CentrifugalLaceration => AbilityProfile::new("Centrifugal Laceration"),
        AbilityId::ArmorReinforcement => AbilityProfile::new("Armor Reinforcement"),
        AbilityId::Taunt => AbilityProfile::new("Taunt"),
        AbilityId::Charge => AbilityProfile::new("Charge").max_rank(1),
        AbilityId::CrusadersCourage => AbilityProfile::new("Crusader's Courage")
            .gated_by(AuraId::CrusadersCourage),
        AbilityId::ColossalReconstruction => {
            AbilityProfile::new("Colossal Reconstruction").off_global()
        }
        AbilityId::Bulwark => AbilityProfile::new("Bulwark")
            .off_global()
            .gated_by(AuraId::BulwarkBlock),
        AbilityId::Tempering => AbilityProfile::new("Tempering").max_rank(1),

        AbilityId::IceBolt => AbilityProfile::new("Ice Bolt"),
        AbilityId::IcicleOrb => AbilityProfile::new("Icicle Orb").aoe(),
        AbilityId::ChillingRadiance => AbilityProfile::new("Chilling Radiance")
            .gated_by(AuraId::ChillingRadiance),
        AbilityId::Enchant => AbilityProfile::new("Enchant")
            .max_rank(4)
            .gated_by(AuraId::Enchant),
        AbilityId::ArcticAura => AbilityProfile::new("Arctic Aura")
            .max_rank(4)
            .gated_by(AuraId::ArcticAura),
        AbilityId::HypothermicFrenzy => AbilityProfile::new("Hypothermic Frenzy")
            .gated_by(AuraId::HypothermicFrenzy),
        AbilityId::IceShield => AbilityProfile::new("Ice Shield")
            .gated_by(AuraId::IceShield)
            .ignore_aura(),
        AbilityId::Teleport => AbilityProfile::new("Teleport").max_rank(1),

        AbilityId::SwiftShot => AbilityProfile::new("Swift Shot"),
        AbilityId::PreciseShot => AbilityProfile::new("Precise Shot")
            .gated_by(AuraId::SwiftShotInstant)
            .forced(),
        AbilityId::Dash => AbilityProfile::new("Dash")
            .max_rank(1)
            .gated_by(AuraId::PreciseShotInstant),
        AbilityId::SerpentArrows => AbilityProfile::new("Serpent Arrows"),
        AbilityId::PoisonArrows => AbilityProfile::new("Poison Arrows"),
        AbilityId::Invigorate => AbilityProfile::new("Invigorate")
            .gated_by(AuraId::Invigorate),
        AbilityId::Pathfinding => AbilityProfile::new("Pathfinding")
            .max_rank(4)
            .gated_by(AuraId::Pathfinding),
        AbilityId::CranialPunctures => AbilityProfile::new("Cranial Punctures").max_rank(4),
        AbilityId::TemporalDilatation => AbilityProfile::new("Temporal Dilatation")
            .max_rank(4)
            .gated_by(AuraId::TemporalDilatation),

        AbilityId::Decay => AbilityProfile::new("Decay"),
        AbilityId::Plaguespreader => AbilityProfile::new("Plaguespreader"),
        AbilityId::SoulHarvest => AbilityProfile::new("Soul Harvest"),
        AbilityId::CanineHowl => AbilityProfile::new("Canine Howl")
            .gated_by(AuraId::CanineHowl),
        AbilityId::MimirsWell => AbilityProfile::new("Mimir's Well")
            .gated_by(AuraId::MimirsWell),
        AbilityId::SpiritAnimal => AbilityProfile::new("Spirit Animal")
            .off_global()
            .gated_by(AuraId::SpiritAnimal),

        AbilityId::ManaPotion => AbilityProfile::new("Mana Potion")
            .max_rank(3)
            .item()
            .gated_by(AuraId::ManaPotion),
        AbilityId::TattooedSkull => AbilityProfile::new("Tattooed Skull")
            .max_rank(1)
            .item()
            .gated_by(AuraId::TattooedSkull),
    }
}

/// Mana cost by rank. Rank is validated at ability construction, so table
/// access here is in bounds.
pub fn mana_cost(id: AbilityId, rank: u8) -> f64 {
    let rank = rank as usize;
    match id {
        AbilityId::Slash => warrior::SLASH_MANA[rank],
        AbilityId::CrescentSwipe => warrior::CRESCENT_SWIPE_MANA[rank],
        AbilityId::UnholyWarcry => warrior::UNHOLY_WARCRY_MANA[rank],
        AbilityId::Taunt => warrior::TAUNT_MANA[rank],
        AbilityId::Charge => warrior::CHARGE_MANA[rank],
        AbilityId::CrusadersCourage => warrior::CRUSADERS_COURAGE_MANA[rank],
        AbilityId::ColossalReconstruction => warrior::COLOSSAL_RECONSTRUCTION_MANA[rank],
        AbilityId::Bulwark => warrior::BULWARK_MANA[rank],
        AbilityId::Tempering => warrior::TEMPERING_MANA[rank],
        AbilityId::IceBolt => mage::ICE_BOLT_MANA[rank],
        AbilityId::IcicleOrb => mage::ICICLE_ORB_MANA[rank],
        AbilityId::ChillingRadiance => mage::CHILLING_RADIANCE_MANA[rank],
        AbilityId::Enchant => mage::ENCHANT_MANA[rank],
        AbilityId::ArcticAura => mage::ARCTIC_AURA_MANA[rank],
        AbilityId::IceShield => mage::ICE_SHIELD_MANA[rank],
        AbilityId::Teleport => mage::TELEPORT_MANA[rank],
        AbilityId::SwiftShot => archer::SWIFT_SHOT_MANA[rank],
        AbilityId::PreciseShot => archer::PRECISE_SHOT_MANA[rank],
        AbilityId::Dash => archer::DASH_MANA,
        AbilityId::Pathfinding => archer::PATHFINDING_MANA[rank],
        AbilityId::TemporalDilatation => archer::TEMPORAL_DILATATION_MANA[rank],
        AbilityId::Decay => shaman::DECAY_MANA[rank],
        AbilityId::SoulHarvest => shaman::SOUL_HARVEST_MANA[rank],
        AbilityId::CanineHowl => shaman::CANINE_HOWL_MANA[rank],
        AbilityId::SpiritAnimal => shaman::SPIRIT_ANIMAL_MANA[rank],
        _ => 0.0,
    }
}

/// Build-time hook: passives and starting charges granted by knowing the
/// ability at all, before the first tick runs.
pub fn on_learned(player: &mut Player, slot: usize) {
    let (id, rank) = {
        let ability = &player.abilities[slot];
        (ability.id, ability.rank)
    };
    match id {
        AbilityId::IceBolt => mage::ice_bolt_learned(player),
        AbilityId::CranialPunctures => archer::cranial_punctures_learned(player, rank),
        _ => {}
    }
}

/// Effect computation for a committed cast. May consume charges or perform
/// pre-cast side effects, exactly as the per-spell behavior demands.
pub fn prepare(player: &mut Player, slot: usize, _ctx: &mut SimCtx) -> SpellEffect {
    let (id, rank) = {
        let ability = &player.abilities[slot];
        (ability.id, ability.rank as usize)
    };
    match id {
        AbilityId::Slash => warrior::slash_prepare(rank),
        AbilityId::CrescentSwipe => warrior::crescent_swipe_prepare(rank),
        AbilityId::UnholyWarcry => warrior::unholy_warcry_prepare(),
        AbilityId::Taunt => warrior::taunt_prepare(),
        AbilityId::Charge => warrior::charge_prepare(),
        AbilityId::CrusadersCourage => warrior::crusaders_courage_prepare(),
        AbilityId::ColossalReconstruction => warrior::colossal_reconstruction_prepare(),
        AbilityId::Bulwark => warrior::bulwark_prepare(),
        AbilityId::Tempering => warrior::tempering_prepare(),
        AbilityId::IceBolt => mage::ice_bolt_prepare(player, rank),
        AbilityId::IcicleOrb => mage::icicle_orb_prepare(rank),
        AbilityId::ChillingRadiance => mage::chilling_radiance_prepare(),
        AbilityId::Enchant => mage::enchant_prepare(),
        AbilityId::ArcticAura => mage::arctic_aura_prepare(),
        AbilityId::HypothermicFrenzy => mage::hypothermic_frenzy_prepare(),
        AbilityId::IceShield => mage::ice_shield_prepare(),
        AbilityId::Teleport => mage::teleport_prepare(),
        AbilityId::SwiftShot => archer::swift_shot_prepare(player, rank),
        AbilityId::PreciseShot => archer::precise_shot_prepare(player, slot, rank),
        AbilityId::Dash => archer::dash_prepare(player),
        AbilityId::Invigorate => archer::invigorate_prepare(player, rank),
        AbilityId::Pathfinding => archer::pathfinding_prepare(),
        AbilityId::TemporalDilatation => archer::temporal_dilatation_prepare(),
        AbilityId::Decay => shaman::decay_prepare(rank),
        AbilityId::SoulHarvest => shaman::soul_harvest_prepare(rank),
        AbilityId::CanineHowl => shaman::canine_howl_prepare(),
        AbilityId::MimirsWell => shaman::mimirs_well_prepare(),
        AbilityId::SpiritAnimal => shaman::spirit_animal_prepare(),
        AbilityId::ManaPotion => items::mana_potion_prepare(),
        AbilityId::TattooedSkull => items::tattooed_skull_prepare(),
        // Rank data carriers and passives: nothing to cast.
        AbilityId::CentrifugalLaceration
        | AbilityId::ArmorReinforcement
        | AbilityId::SerpentArrows
        | AbilityId::PoisonArrows
        | AbilityId::CranialPunctures
        | AbilityId::Plaguespreader => SpellEffect::default(),
    }
}

/// Impact hook, invoked when a cast commits (instant, or when the cast
/// timer elapses).
pub fn on_casted(
    player: &mut Player,
    slot: usize,
    effect: &SpellEffect,
    elapsed_ms: i64,
    enemies: &mut [Enemy],
    ctx: &mut SimCtx,
) {
    let id = player.abilities[slot].id;
    match id {
        AbilityId::CrescentSwipe => {
            warrior::crescent_swipe_impact(player, slot, effect, elapsed_ms, enemies, ctx)
        }
        AbilityId::UnholyWarcry => warrior::unholy_warcry_impact(player, slot, enemies),
        AbilityId::Bulwark => warrior::bulwark_impact(player, slot, enemies),
        AbilityId::IceBolt => mage::ice_bolt_impact(player, slot, effect, elapsed_ms, enemies, ctx),
        AbilityId::IcicleOrb => {
            mage::icicle_orb_impact(player, slot, effect, elapsed_ms, enemies, ctx)
        }
        AbilityId::ChillingRadiance => mage::chilling_radiance_impact(player, slot, enemies),
        AbilityId::Enchant => mage::enchant_impact(player, slot, enemies),
        AbilityId::ArcticAura => mage::arctic_aura_impact(player, slot, enemies),
        AbilityId::HypothermicFrenzy => mage::hypothermic_frenzy_impact(player, slot, enemies),
        AbilityId::SwiftShot => {
            archer::swift_shot_impact(player, slot, effect, elapsed_ms, enemies, ctx)
        }
        AbilityId::PreciseShot => {
            archer::precise_shot_impact(player, slot, effect, elapsed_ms, enemies, ctx)
        }
        AbilityId::Invigorate => archer::invigorate_impact(player, slot),
        AbilityId::TemporalDilatation => {
            archer::temporal_dilatation_impact(player, slot, enemies)
        }
        AbilityId::Decay => shaman::decay_impact(player, slot, effect, elapsed_ms, enemies, ctx),
        AbilityId::SoulHarvest => {
            shaman::soul_harvest_impact(player, slot, effect, elapsed_ms, enemies, ctx)
        }
        AbilityId::CanineHowl => shaman::canine_howl_impact(player, slot, enemies),
        AbilityId::MimirsWell => shaman::mimirs_well_impact(player, slot, enemies),
        AbilityId::SpiritAnimal => shaman::spirit_animal_impact(player, slot, enemies),
        AbilityId::ManaPotion => items::mana_potion_impact(player, slot, enemies),
        AbilityId::TattooedSkull => items::tattooed_skull_impact(player, slot, enemies),
        // Dash resolves everything during prepare; the rest either carry
        // rank data for other spells or have no combat-visible effect.
        _ => default_impact(player, slot, effect, 1.0, 0.0, elapsed_ms, enemies, ctx),
    }
}

/// Shared impact pipeline: one damage roll per selected target, each with
/// its own crit roll, through that target's mitigation. Area abilities fan
/// out over `min(configured targets, max targets)`; an empty enemy list is
/// a no-op.
pub(crate) fn default_impact(
    player: &mut Player,
    slot: usize,
    effect: &SpellEffect,
    modifier: f64,
    crit_mod: f64,
    elapsed_ms: i64,
    enemies: &mut [Enemy],
    ctx: &mut SimCtx,
) {
    if !effect.has_damage() || enemies.is_empty() {
        return;
    }
    let (name, is_aoe, max_targets) = {
        let ability = &player.abilities[slot];
        (ability.name.clone(), ability.is_aoe, ability.max_targets)
    };
    let count = if is_aoe {
        ctx.params.targets.min(max_targets).max(1) as usize
    } else {
        1
    };
    let count = count.min(enemies.len());
    for enemy in enemies.iter().take(count) {
        player.deal_spell_damage(
            effect.base_damage,
            effect.bonus_damage,
            enemy.mitigation,
            modifier,
            crit_mod,
            &name,
            elapsed_ms,
            ctx,
        );
    }
}

/// Route an aura payload to its holder: self-buffs to the caster, debuffs
/// to the primary enemy keyed by the caster.
pub(crate) fn apply_aura(player: &mut Player, enemies: &mut [Enemy], effect: AuraEffect) {
    match effect.target {
        AuraTarget::Owner => player.apply_aura(effect),
        AuraTarget::PrimaryEnemy => {
            if let Some(primary) = enemies.first_mut() {
                primary.apply_aura(effect, player);
            }
        }
    }
}
