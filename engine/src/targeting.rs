use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::roster::{ActorId, Roster};
use crate::Dice;

/// Named target selections an ability may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    #[serde(rename = "self")]
    SelfOnly,
    SingleEnemy,
    AllEnemies,
    Party,
}

pub type TargetStrategy = Box<dyn Fn(&Roster, ActorId, &mut Dice) -> Vec<ActorId> + Send + Sync>;

/// Strategy table keyed by capability.
pub struct TargetingRegistry {
    strategies: IndexMap<Capability, TargetStrategy>,
}

impl Default for TargetingRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TargetingRegistry {
    pub fn empty() -> Self {
        Self {
            strategies: IndexMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Capability::SelfOnly, |_, caster, _| vec![caster]);
        registry.register(Capability::SingleEnemy, |roster, caster, dice| {
            let enemies = living_enemies(roster, caster);
            if enemies.is_empty() {
                return vec![];
            }
            vec![enemies[dice.pick_index(enemies.len())]]
        });
        registry.register(Capability::AllEnemies, |roster, caster, _| {
            living_enemies(roster, caster)
        });
        registry.register(Capability::Party, |roster, caster, _| {
            living_party(roster, caster)
        });
        registry
    }

    pub fn register(
        &mut self,
        capability: Capability,
        strategy: impl Fn(&Roster, ActorId, &mut Dice) -> Vec<ActorId> + Send + Sync + 'static,
    ) {
        self.strategies.insert(capability, Box::new(strategy));
    }

    /// Unregistered capabilities resolve to no targets.
    pub fn resolve(
        &self,
        capability: Capability,
        roster: &Roster,
        caster: ActorId,
        dice: &mut Dice,
    ) -> Vec<ActorId> {
        match self.strategies.get(&capability) {
            Some(strategy) => strategy(roster, caster, dice),
            None => {
                tracing::warn!(?capability, "no targeting strategy registered");
                vec![]
            }
        }
    }

    pub fn view(&self, caster: ActorId) -> Targeting<'_> {
        Targeting {
            registry: self,
            caster,
        }
    }
}

/// Per-caster targeting view. Every accessor re-runs its strategy against
/// the roster it is handed, so results always reflect live battle state.
#[derive(Clone, Copy)]
pub struct Targeting<'a> {
    registry: &'a TargetingRegistry,
    caster: ActorId,
}

impl Targeting<'_> {
    pub fn caster(&self) -> ActorId {
        self.caster
    }

    pub fn get(&self, capability: Capability, roster: &Roster, dice: &mut Dice) -> Vec<ActorId> {
        self.registry.resolve(capability, roster, self.caster, dice)
    }

    pub fn self_only(&self, roster: &Roster, dice: &mut Dice) -> Vec<ActorId> {
        self.get(Capability::SelfOnly, roster, dice)
    }

    pub fn single_enemy(&self, roster: &Roster, dice: &mut Dice) -> Vec<ActorId> {
        self.get(Capability::SingleEnemy, roster, dice)
    }

    pub fn all_enemies(&self, roster: &Roster, dice: &mut Dice) -> Vec<ActorId> {
        self.get(Capability::AllEnemies, roster, dice)
    }

    pub fn party(&self, roster: &Roster, dice: &mut Dice) -> Vec<ActorId> {
        self.get(Capability::Party, roster, dice)
    }
}

fn living_enemies(roster: &Roster, caster: ActorId) -> Vec<ActorId> {
    let caster_party = roster.get(caster).and_then(|a| a.party.clone());
    roster
        .iter()
        .filter(|(id, a)| {
            *id != caster
                && a.is_alive()
                && (caster_party.is_none() || a.party != caster_party)
        })
        .map(|(id, _)| id)
        .collect()
}

fn living_party(roster: &Roster, caster: ActorId) -> Vec<ActorId> {
    let Some(party) = roster.get(caster).and_then(|a| a.party.clone()) else {
        return vec![caster];
    };
    roster
        .iter()
        .filter(|(_, a)| a.is_alive() && a.party.as_deref() == Some(party.as_str()))
        .map(|(id, _)| id)
        .collect()
}
