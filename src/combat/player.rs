//! Player actor: stat block, mana pool, active auras, ability set and the
//! cast-priority rotation.
//!
//! One player instance is one independent trial. Players never read each
//! other's state; the enemy set is the only thing a trial's actors share.

use crate::combat::ability::{Ability, AbilityId, CastCondition, SpellEffect, GLOBAL_COOLDOWN_MS};
use crate::combat::aura::{Aura, AuraEffect, AuraId};
use crate::combat::enemy::Enemy;
use crate::combat::engine::SimCtx;
use crate::combat::spellbook;
use crate::combat::stats::{scale_by_haste, tick_interval_ms, StatBlock, StatKind};
use crate::data::build::BuildConfig;

#[cfg(test)]
use crate::combat::stats::StatBundle;

/// Fixed critical strike multiplier.
pub const CRITICAL_MULTIPLIER: f64 = 2.0;

/// Mana regeneration cadence.
const MANA_REGEN_INTERVAL_MS: i64 = 5_000;

/// A cast whose timer is still running; committed when the owner's shared
/// cast timer reaches zero.
#[derive(Debug, Clone, Copy)]
struct PendingCast {
    slot: usize,
    effect: SpellEffect,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: usize,
    pub stats: StatBlock,
    pub mana: f64,
    pub max_mana: f64,
    pub damage_done: f64,
    pub abilities: Vec<Ability>,
    pub cast_queue: Vec<AbilityId>,
    auras: Vec<Aura>,
    global_cooldown_ms: i64,
    cast_time_ms: i64,
    auto_attack_enabled: bool,
    auto_attack_timer_ms: i64,
    regen_timer_ms: i64,
    queue_index: usize,
    pending_cast: Option<PendingCast>,
}

impl Player {
    /// Build one trial's actor. Ability construction validates ranks and
    /// fails loudly; a bad entry rejects the whole build.
    pub fn new(id: usize, build: &BuildConfig) -> Result<Self, String> {
        let mut abilities = Vec::with_capacity(build.abilities.len());
        for entry in &build.abilities {
            abilities.push(Ability::new(
                entry.id,
                entry.rank,
                entry.once,
                entry.condition.clone(),
            )?);
        }

        let cast_queue = build
            .queue
            .iter()
            .copied()
            .filter(|id| abilities.iter().any(|ability| ability.id == *id))
            .collect();

        let mut player = Self {
            id,
            stats: StatBlock::new(build.stats),
            mana: build.mana,
            max_mana: build.mana,
            damage_done: 0.0,
            abilities,
            cast_queue,
            auras: Vec::new(),
            global_cooldown_ms: 0,
            cast_time_ms: 0,
            auto_attack_enabled: build.auto_attack,
            auto_attack_timer_ms: 0,
            regen_timer_ms: MANA_REGEN_INTERVAL_MS,
            queue_index: 0,
            pending_cast: None,
        };

        for slot in 0..player.abilities.len() {
            spellbook::on_learned(&mut player, slot);
        }
        Ok(player)
    }

    #[cfg(test)]
    pub fn for_tests(base: StatBundle) -> Self {
        Self {
            id: 0,
            stats: StatBlock::new(base),
            mana: 100.0,
            max_mana: 100.0,
            damage_done: 0.0,
            abilities: Vec::new(),
            cast_queue: Vec::new(),
            auras: Vec::new(),
            global_cooldown_ms: 0,
            cast_time_ms: 0,
            auto_attack_enabled: false,
            auto_attack_timer_ms: 0,
            regen_timer_ms: MANA_REGEN_INTERVAL_MS,
            queue_index: 0,
            pending_cast: None,
        }
    }

    pub fn is_casting(&self) -> bool {
        self.cast_time_ms > 0
    }

    pub fn effective(&self, kind: StatKind) -> f64 {
        self.stats.effective(kind)
    }

    pub fn add_bonus_stat(&mut self, kind: StatKind, amount: f64, percentage: bool) {
        self.stats.add_bonus(kind, amount, percentage);
    }

    pub fn remove_bonus_stat(&mut self, kind: StatKind, amount: f64, percentage: bool) {
        self.stats.remove_bonus(kind, amount, percentage);
    }

    pub fn mana_percentage(&self) -> f64 {
        if self.max_mana <= 0.0 {
            return 0.0;
        }
        (self.mana / self.max_mana * 100.0).floor()
    }

    pub fn regenerate_mana(&mut self, amount: f64) {
        self.mana = (self.mana + amount).min(self.max_mana);
    }

    /// Restore a fraction of max mana, plus optionally a fraction of the
    /// current pool, capped at max.
    pub fn regenerate_mana_percentage(&mut self, fraction: f64, remain_fraction: f64) {
        self.mana += (self.max_mana * fraction).floor();
        self.mana += (self.mana * remain_fraction).floor();
        self.mana = self.mana.min(self.max_mana);
    }

    /// One simulation tick: timers, auto attack, regeneration, auras,
    /// cooldowns, pending cast commit, then rotation selection.
    pub fn update(&mut self, diff_ms: i64, elapsed_ms: i64, enemies: &mut [Enemy], ctx: &mut SimCtx) {
        if self.global_cooldown_ms > 0 {
            self.global_cooldown_ms -= diff_ms;
        }
        if self.cast_time_ms > 0 {
            self.cast_time_ms -= diff_ms;
        }

        if self.auto_attack_enabled {
            self.auto_attack_timer_ms -= diff_ms;
            if self.auto_attack_timer_ms <= 0 {
                self.commit_auto_attack(elapsed_ms, enemies, ctx);
            }
        }

        self.regen_timer_ms -= diff_ms;
        if self.regen_timer_ms <= 0 {
            if self.mana_percentage() < 100.0 {
                let amount = self.effective(StatKind::ManaRegen);
                self.regenerate_mana(amount);
            }
            self.regen_timer_ms = MANA_REGEN_INTERVAL_MS;
        }

        // Auras are taken out for the update so they can mutate their owner
        // (stat reversal on expiry) without aliasing the list they live in.
        let mut auras = std::mem::take(&mut self.auras);
        for aura in auras.iter_mut() {
            aura.update(diff_ms, elapsed_ms, self, None, ctx);
        }
        auras.retain(|aura| !aura.to_remove);
        self.auras = auras;

        for ability in &mut self.abilities {
            ability.update(diff_ms);
        }

        if self.cast_time_ms <= 0 {
            if let Some(pending) = self.pending_cast.take() {
                self.commit_cast(pending.slot, pending.effect, elapsed_ms, enemies, ctx);
            }
        }

        if self.global_cooldown_ms <= 0 && !self.is_casting() {
            self.do_cast(elapsed_ms, enemies, ctx);
        }
    }

    /// Rotation selection: walk the priority queue from the remembered
    /// index and cast the first eligible ability. Skips are routine flow
    /// control. The attempt count is bounded by the queue length, so an
    /// all-ineligible queue ends the tick's attempt instead of spinning.
    pub fn do_cast(&mut self, elapsed_ms: i64, enemies: &mut [Enemy], ctx: &mut SimCtx) {
        if self.cast_queue.is_empty() {
            return;
        }
        let mut attempts = 0;
        let mut index = self.queue_index;
        while attempts < self.cast_queue.len() {
            attempts += 1;
            if index >= self.cast_queue.len() {
                index = 0;
            }
            let id = self.cast_queue[index];
            let Some(slot) = self.ability_index(id) else {
                index += 1;
                continue;
            };

            let ability = &self.abilities[slot];
            if ability.mana_cost > self.mana
                || !ability.ready()
                || ability.gated_by(|aura| self.has_aura(aura))
                || !self.check_condition(&ability.condition, enemies)
            {
                index += 1;
                continue;
            }

            let triggers_global = ability.triggers_global;
            let once = ability.once;
            self.cast_ability(slot, elapsed_ms, enemies, ctx);

            if once {
                self.cast_queue.remove(index);
                if self.cast_queue.is_empty() {
                    self.queue_index = 0;
                    return;
                }
                self.queue_index = index % self.cast_queue.len();
            } else {
                self.queue_index = (index + 1) % self.cast_queue.len();
            }

            if triggers_global || self.is_casting() {
                return;
            }
            // Off-global cast: keep scanning within this tick.
            index = self.queue_index;
        }
    }

    /// Start a cast: compute the effect, take the global cooldown, and
    /// either commit immediately or park the effect behind the cast timer.
    fn cast_ability(&mut self, slot: usize, elapsed_ms: i64, enemies: &mut [Enemy], ctx: &mut SimCtx) {
        let effect = spellbook::prepare(self, slot, ctx);
        let ability = &self.abilities[slot];
        let triggers_global = ability.triggers_global;
        let is_item = ability.is_item;

        if triggers_global && !is_item {
            self.global_cooldown_ms = GLOBAL_COOLDOWN_MS;
        }

        if effect.cast_time_ms > 0 {
            let scaled = scale_by_haste(effect.cast_time_ms, self.effective(StatKind::Haste));
            // Enough haste can collapse a cast to instant; commit directly.
            if scaled > 0 {
                self.cast_time_ms = scaled;
                if self.id == 0 {
                    let name = self.abilities[slot].name.clone();
                    ctx.log.cast_start(&name, elapsed_ms);
                }
                self.pending_cast = Some(PendingCast { slot, effect });
                return;
            }
        }
        self.commit_cast(slot, effect, elapsed_ms, enemies, ctx);
    }

    /// Commit a cast: haste-scaled cooldown, mana cost, then the impact
    /// hook resolves damage and aura application.
    fn commit_cast(
        &mut self,
        slot: usize,
        effect: SpellEffect,
        elapsed_ms: i64,
        enemies: &mut [Enemy],
        ctx: &mut SimCtx,
    ) {
        let haste = self.effective(StatKind::Haste);
        let mana_cost = self.abilities[slot].mana_cost;
        if effect.cooldown_ms > 0 {
            self.abilities[slot].cooldown_ms = scale_by_haste(effect.cooldown_ms, haste);
        }
        if mana_cost > 0.0 {
            self.mana = (self.mana - mana_cost).max(0.0);
        }
        if self.id == 0 {
            let name = self.abilities[slot].name.clone();
            ctx.log.cast(&name, elapsed_ms);
        }
        spellbook::on_casted(self, slot, &effect, elapsed_ms, enemies, ctx);
    }

    /// One auto-attack swing: a plain 100% weapon roll with its own crit
    /// roll, on a haste- and attack-speed-derived interval.
    fn commit_auto_attack(&mut self, elapsed_ms: i64, enemies: &mut [Enemy], ctx: &mut SimCtx) {
        let attack_speed = self.effective(StatKind::AttackSpeed);
        if attack_speed <= 0.0 {
            self.auto_attack_enabled = false;
            return;
        }
        let haste = self.effective(StatKind::Haste);
        self.auto_attack_timer_ms = tick_interval_ms(1.0 / attack_speed, haste).max(100);

        let Some(primary) = enemies.first() else {
            return;
        };
        let mitigation = primary.mitigation;
        self.deal_spell_damage(0.0, 100.0, mitigation, 1.0, 0.0, "Auto Attack", elapsed_ms, ctx);
    }

    /// Eligibility gate from the build input. Every configured part must
    /// hold; aura presence counts on self or the primary target.
    pub fn check_condition(&self, condition: &CastCondition, enemies: &[Enemy]) -> bool {
        if let Some(mana) = condition.mana {
            let holds = self.mana_percentage() >= mana.value;
            if holds == mana.negated {
                return false;
            }
        }
        for aura_condition in &condition.auras {
            let present = self.has_aura(aura_condition.aura)
                || enemies
                    .first()
                    .is_some_and(|enemy| enemy.has_aura(aura_condition.aura, self.id));
            if present == aura_condition.negated {
                return false;
            }
        }
        if let Some(cooldown) = condition.cooldown {
            let cooling = self
                .ability(cooldown.ability)
                .is_some_and(|ability| !ability.ready());
            if cooling == cooldown.negated {
                return false;
            }
        }
        true
    }

    /// Roll and resolve one damage instance: `floor(base + uniform(min, max)
    /// * bonus / 100)`, modifier, one crit roll, target mitigation. Returns
    /// the pre-reduction roll for effects that scale off it.
    #[allow(clippy::too_many_arguments)]
    pub fn deal_spell_damage(
        &mut self,
        base_damage: f64,
        bonus_damage: f64,
        mitigation: f64,
        modifier: f64,
        crit_mod: f64,
        label: &str,
        elapsed_ms: i64,
        ctx: &mut SimCtx,
    ) -> f64 {
        let min = self.effective(StatKind::MinDamage);
        let max = self.effective(StatKind::MaxDamage);
        let rolled = (base_damage + ctx.rng.roll_range(min, max) * bonus_damage / 100.0).floor();
        self.resolve_hit(rolled, mitigation, modifier, crit_mod, label, elapsed_ms, ctx)
    }

    /// Resolve one aura tick: the payload is precomputed, no weapon roll.
    pub fn deal_aura_damage(
        &mut self,
        base_damage: f64,
        amount: f64,
        mitigation: f64,
        label: &str,
        elapsed_ms: i64,
        ctx: &mut SimCtx,
    ) -> f64 {
        let rolled = (base_damage + amount).floor();
        self.resolve_hit(rolled, mitigation, 1.0, 0.0, label, elapsed_ms, ctx)
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_hit(
        &mut self,
        rolled: f64,
        mitigation: f64,
        modifier: f64,
        crit_mod: f64,
        label: &str,
        elapsed_ms: i64,
        ctx: &mut SimCtx,
    ) -> f64 {
        let outgoing = if modifier > 0.0 { rolled * modifier } else { rolled };
        let crit_chance = self.effective(StatKind::Critical) + crit_mod;
        let crit = ctx.rng.next_unit() < crit_chance;
        let mut damage = if crit {
            outgoing * CRITICAL_MULTIPLIER
        } else {
            outgoing
        };
        damage = (damage * (1.0 - mitigation.clamp(0.0, 1.0))).floor().max(0.0);
        self.damage_done += damage;
        if self.id == 0 {
            ctx.log.damage(label, damage, crit, elapsed_ms);
        }
        rolled
    }

    /* Aura bookkeeping */

    pub fn has_aura(&self, id: AuraId) -> bool {
        self.auras.iter().any(|aura| aura.id == id)
    }

    pub fn aura(&self, id: AuraId) -> Option<&Aura> {
        self.auras.iter().find(|aura| aura.id == id)
    }

    pub fn auras(&self) -> &[Aura] {
        &self.auras
    }

    /// Apply or refresh an aura on self. The same identity never produces a
    /// second list entry.
    pub fn apply_aura(&mut self, effect: AuraEffect) {
        if let Some(pos) = self.auras.iter().position(|aura| aura.id == effect.id) {
            let mut aura = self.auras.swap_remove(pos);
            aura.reapply(effect, self);
            self.auras.push(aura);
        } else {
            let aura = Aura::new(effect, self);
            self.auras.push(aura);
        }
    }

    /// Consume one stack (instant-cast charges and the like).
    pub fn remove_aura_stack(&mut self, id: AuraId) {
        if let Some(pos) = self.auras.iter().position(|aura| aura.id == id) {
            let mut aura = self.auras.swap_remove(pos);
            aura.remove_stack(self);
            if !aura.to_remove {
                self.auras.push(aura);
            }
        }
    }

    /// Force-expire an aura (consumed-on-use effects).
    pub fn expire_aura(&mut self, id: AuraId) {
        if let Some(pos) = self.auras.iter().position(|aura| aura.id == id) {
            let mut aura = self.auras.swap_remove(pos);
            aura.remove(self);
        }
    }

    /* Ability lookup */

    pub fn ability_index(&self, id: AbilityId) -> Option<usize> {
        self.abilities.iter().position(|ability| ability.id == id)
    }

    pub fn ability(&self, id: AbilityId) -> Option<&Ability> {
        self.abilities.iter().find(|ability| ability.id == id)
    }

    pub fn ability_mut(&mut self, id: AbilityId) -> Option<&mut Ability> {
        self.abilities.iter_mut().find(|ability| ability.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ability::{AuraCondition, ValueCondition};
    use crate::combat::stats::StatBundle;

    fn base_stats() -> StatBundle {
        StatBundle {
            mana_regen: 10.0,
            min_damage: 100.0,
            max_damage: 100.0,
            ..StatBundle::default()
        }
    }

    #[test]
    fn flat_base_damage_resolves_exactly() {
        let mut player = Player::for_tests(base_stats());
        let mut ctx = SimCtx::for_tests();
        player.deal_spell_damage(10.0, 0.0, 0.0, 1.0, 0.0, "test", 0, &mut ctx);
        assert_eq!(player.damage_done, 10.0);
    }

    #[test]
    fn forced_crit_doubles_damage() {
        let mut stats = base_stats();
        stats.critical = 1.0;
        let mut player = Player::for_tests(stats);
        let mut ctx = SimCtx::for_tests();
        player.deal_spell_damage(10.0, 0.0, 0.0, 1.0, 0.0, "test", 0, &mut ctx);
        assert_eq!(player.damage_done, 20.0);
    }

    #[test]
    fn mitigation_never_increases_damage_and_never_goes_negative() {
        let mut ctx = SimCtx::for_tests();
        for step in 0..=10 {
            let mitigation = step as f64 / 10.0;
            let mut player = Player::for_tests(base_stats());
            player.deal_spell_damage(50.0, 100.0, mitigation, 1.0, 0.0, "test", 0, &mut ctx);
            // min == max, no crit: raw roll is exactly 150.
            assert!(player.damage_done <= 150.0);
            assert!(player.damage_done >= 0.0);
        }
    }

    #[test]
    fn mana_percentage_condition_and_negation() {
        let mut player = Player::for_tests(base_stats());
        player.mana = 40.0;

        let above = CastCondition {
            mana: Some(ValueCondition {
                value: 30.0,
                negated: false,
            }),
            ..CastCondition::default()
        };
        let below = CastCondition {
            mana: Some(ValueCondition {
                value: 30.0,
                negated: true,
            }),
            ..CastCondition::default()
        };
        assert!(player.check_condition(&above, &[]));
        assert!(!player.check_condition(&below, &[]));

        player.mana = 20.0;
        assert!(!player.check_condition(&above, &[]));
        assert!(player.check_condition(&below, &[]));
    }

    #[test]
    fn aura_condition_checks_self() {
        let mut player = Player::for_tests(base_stats());
        let condition = CastCondition {
            auras: vec![AuraCondition {
                aura: AuraId::CanineHowl,
                negated: false,
            }],
            ..CastCondition::default()
        };
        assert!(!player.check_condition(&condition, &[]));

        player.apply_aura(AuraEffect::new(AuraId::CanineHowl, "Canine Howl", 15_000, 1));
        assert!(player.check_condition(&condition, &[]));
    }

    #[test]
    fn applying_same_aura_twice_keeps_one_entry() {
        let mut player = Player::for_tests(base_stats());
        player.apply_aura(AuraEffect::new(AuraId::Enchant, "Enchant", 10_000, 1));
        player.apply_aura(AuraEffect::new(AuraId::Enchant, "Enchant", 10_000, 1));
        assert_eq!(player.auras().len(), 1);
    }

    #[test]
    fn regeneration_is_capped_at_max_mana() {
        let mut player = Player::for_tests(base_stats());
        player.mana = 95.0;
        player.regenerate_mana(10.0);
        assert_eq!(player.mana, 100.0);

        player.mana = 50.0;
        player.regenerate_mana_percentage(0.1, 0.0);
        assert_eq!(player.mana, 60.0);
    }
}
