//! Enemy targets: passive damage sinks that carry debuffs keyed by the
//! applying player, plus the shuffled selection used by jumping effects.

use crate::combat::aura::{Aura, AuraEffect, AuraId};
use crate::combat::engine::SimCtx;
use crate::combat::player::Player;
use crate::combat::rng::Rng;

/// One target. All targets in a run share the configured mitigation; they
/// differ only in the debuffs they carry.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: usize,
    pub mitigation: f64,
    auras: Vec<Aura>,
}

impl Enemy {
    pub fn new(id: usize, mitigation: f64) -> Self {
        Self {
            id,
            mitigation,
            auras: Vec::new(),
        }
    }

    /// Per-tick aging of carried debuffs. Periodic damage resolves against
    /// this carrier and credits the aura's owner, looked up by handle.
    pub fn update(&mut self, diff_ms: i64, elapsed_ms: i64, players: &mut [Player], ctx: &mut SimCtx) {
        let mitigation = self.mitigation;
        for aura in self.auras.iter_mut() {
            let Some(owner) = players.get_mut(aura.owner) else {
                continue;
            };
            aura.update(diff_ms, elapsed_ms, owner, Some(mitigation), ctx);
        }
        self.auras.retain(|aura| !aura.to_remove);
    }

    /// Aura presence for a specific owner. Different players' debuffs of the
    /// same identity coexist on one target.
    pub fn has_aura(&self, id: AuraId, owner: usize) -> bool {
        self.auras
            .iter()
            .any(|aura| aura.id == id && aura.owner == owner)
    }

    pub fn aura(&self, id: AuraId, owner: usize) -> Option<&Aura> {
        self.auras
            .iter()
            .find(|aura| aura.id == id && aura.owner == owner)
    }

    /// Apply or refresh a debuff from `owner`. Same (identity, owner) pair
    /// always refreshes in place; never a duplicate entry.
    pub fn apply_aura(&mut self, effect: AuraEffect, owner: &mut Player) {
        if let Some(aura) = self
            .auras
            .iter_mut()
            .find(|aura| aura.id == effect.id && aura.owner == owner.id)
        {
            aura.reapply(effect, owner);
            return;
        }
        self.auras.push(Aura::new(effect, owner));
    }

    /// Remove a specific owner's debuff, reversing its payload first.
    pub fn remove_aura(&mut self, id: AuraId, owner: &mut Player) {
        if let Some(pos) = self
            .auras
            .iter()
            .position(|aura| aura.id == id && aura.owner == owner.id)
        {
            let mut aura = self.auras.swap_remove(pos);
            aura.remove(owner);
        }
    }

    pub fn aura_count(&self) -> usize {
        self.auras.len()
    }
}

/// Without-replacement random selection over the non-primary target
/// indices, for effects that jump between targets.
#[derive(Debug, Clone)]
pub struct TargetShuffle {
    pool: Vec<usize>,
}

impl TargetShuffle {
    pub fn new(indices: std::ops::Range<usize>) -> Self {
        Self {
            pool: indices.collect(),
        }
    }

    /// Pool over `1..size`: everything except the primary target.
    pub fn skipping_first(size: usize) -> Self {
        Self::new(1..size.max(1))
    }

    pub fn next(&mut self, rng: &mut Rng) -> Option<usize> {
        if self.pool.is_empty() {
            return None;
        }
        let pick = rng.roll_index(self.pool.len());
        Some(self.pool.swap_remove(pick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::aura::{AuraEffect, AuraId, AuraTarget};
    use crate::combat::player::Player;
    use crate::combat::stats::StatBundle;

    fn debuff(id: AuraId) -> AuraEffect {
        let mut effect = AuraEffect::new(id, "test debuff", 8_000, 1);
        effect.target = AuraTarget::PrimaryEnemy;
        effect
    }

    #[test]
    fn same_owner_reapplication_never_duplicates() {
        let mut owner = Player::for_tests(StatBundle::default());
        let mut enemy = Enemy::new(0, 0.0);
        enemy.apply_aura(debuff(AuraId::Decay), &mut owner);
        enemy.apply_aura(debuff(AuraId::Decay), &mut owner);
        assert_eq!(enemy.aura_count(), 1);
    }

    #[test]
    fn different_owners_coexist() {
        let mut first = Player::for_tests(StatBundle::default());
        let mut second = Player::for_tests(StatBundle::default());
        second.id = 1;
        let mut enemy = Enemy::new(0, 0.0);
        enemy.apply_aura(debuff(AuraId::Decay), &mut first);
        enemy.apply_aura(debuff(AuraId::Decay), &mut second);
        assert_eq!(enemy.aura_count(), 2);
        assert!(enemy.has_aura(AuraId::Decay, 0));
        assert!(enemy.has_aura(AuraId::Decay, 1));
    }

    #[test]
    fn shuffle_visits_every_non_primary_index_once() {
        let mut rng = Rng::new(5);
        let mut shuffle = TargetShuffle::skipping_first(6);
        let mut seen = Vec::new();
        while let Some(index) = shuffle.next(&mut rng) {
            seen.push(index);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn shuffle_is_empty_for_single_target() {
        let mut rng = Rng::new(5);
        let mut shuffle = TargetShuffle::skipping_first(1);
        assert_eq!(shuffle.next(&mut rng), None);
    }
}
