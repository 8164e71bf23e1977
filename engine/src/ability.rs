use std::fmt;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::actor::{ResourceStat, StatOper, Subject};
use crate::targeting::Capability;
use crate::Dice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Physical,
    Buff,
    Debuff,
    Heal,
    Digital,
    Energy,
    Holy,
    Thunder,
    Fire,
    Water,
    Ice,
}

impl Element {
    pub fn as_str(self) -> &'static str {
        match self {
            Element::Physical => "Physical",
            Element::Buff => "Buff",
            Element::Debuff => "Debuff",
            Element::Heal => "Heal",
            Element::Digital => "Digital",
            Element::Energy => "Energy",
            Element::Holy => "Holy",
            Element::Thunder => "Thunder",
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Ice => "Ice",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One leveled variant of an ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    pub profession: String,
    pub level: u32,
    pub cost: i64,
    #[serde(alias = "spellPower")]
    pub power: i64,
    #[serde(default)]
    pub collectibles: Vec<String>,
}

impl Tier {
    /// Profession, level and collectible gates. Collectibles are read from
    /// the effective identity subject.
    pub fn is_available_to<'a>(&self, actor: impl Into<Subject<'a>>) -> bool {
        let subject: Subject<'_> = actor.into();
        let progression = subject.progression();
        subject.actor.has_profession(&self.profession)
            && subject.actor.level >= self.level
            && self.collectibles.iter().all(|c| progression.collectibles.has(c))
    }
}

/// Pick the tier for `actor`: the last entry of `tiers` whose gates pass.
///
/// Table order is trusted as-is, even when it is not sorted by level.
pub fn resolve_tier<'t, 'a>(tiers: &'t [Tier], actor: impl Into<Subject<'a>>) -> Option<&'t Tier> {
    let subject: Subject<'_> = actor.into();
    tiers.iter().filter(|t| t.is_available_to(subject)).last()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub name: String,
    pub element: Element,
    /// Resource the tier cost is charged against.
    #[serde(default)]
    pub stat: ResourceStat,
    #[serde(default)]
    pub oper: StatOper,
    #[serde(default = "default_capability")]
    pub targets: Capability,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub potency: Option<i64>,
    pub tiers: Vec<Tier>,
}

fn default_capability() -> Capability {
    Capability::SingleEnemy
}

impl AbilityDefinition {
    pub fn resolve_tier<'a>(&self, actor: impl Into<Subject<'a>>) -> Option<&Tier> {
        resolve_tier(&self.tiers, actor)
    }

    pub fn calc_duration(&self) -> i64 {
        self.duration.unwrap_or(0)
    }

    pub fn calc_potency(&self) -> i64 {
        self.potency.unwrap_or(0)
    }

    /// Raw damage for one cast of `tier`. Heals are negative, pure buffs
    /// and debuffs deal nothing.
    pub fn roll_damage(&self, tier: &Tier, dice: &mut Dice) -> f64 {
        match self.element {
            Element::Buff | Element::Debuff => 0.0,
            Element::Heal => -(dice.min_max(tier.power, tier.power * 3 / 2) as f64),
            _ => dice.min_max(tier.power, tier.power * 2) as f64,
        }
    }
}

/// Immutable ability table shared by every actor of a simulation.
#[derive(Debug, Clone, Default)]
pub struct AbilityRegistry {
    abilities: IndexMap<String, AbilityDefinition>,
}

impl AbilityRegistry {
    pub fn new(definitions: impl IntoIterator<Item = AbilityDefinition>) -> Self {
        Self {
            abilities: definitions
                .into_iter()
                .map(|d| (d.name.clone(), d))
                .collect(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let defs: Vec<AbilityDefinition> =
            serde_json::from_str(text).context("failed to parse ability definitions")?;
        Ok(Self::new(defs))
    }

    pub fn get(&self, name: &str) -> Option<&AbilityDefinition> {
        self.abilities.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityDefinition> {
        self.abilities.values()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}
