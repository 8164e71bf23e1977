use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::effects::EffectSet;
use crate::roster::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Neutral,
}

impl Gender {
    pub fn she(self) -> &'static str {
        match self {
            Gender::Male => "he",
            Gender::Female => "she",
            Gender::Neutral => "it",
        }
    }

    pub fn hisher(self) -> &'static str {
        match self {
            Gender::Male => "his",
            Gender::Female => "her",
            Gender::Neutral => "its",
        }
    }

    pub fn himher(self) -> &'static str {
        match self {
            Gender::Male => "him",
            Gender::Female => "her",
            Gender::Neutral => "it",
        }
    }
}

/// How an ability's cost is applied to the caster's resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatOper {
    #[default]
    Sub,
    Add,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStat {
    Hp,
    #[default]
    Mp,
}

/// A bounded resource such as health or mana. Never leaves `0..=maximum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub current: i64,
    pub maximum: i64,
}

impl Pool {
    pub fn new(maximum: i64) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn sub(&mut self, amount: i64) {
        self.current = (self.current - amount).clamp(0, self.maximum);
    }

    pub fn add(&mut self, amount: i64) {
        self.current = (self.current + amount).clamp(0, self.maximum);
    }

    pub fn apply(&mut self, oper: StatOper, amount: i64) {
        match oper {
            StatOper::Sub => self.sub(amount),
            StatOper::Add => self.add(amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub map: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub map_region: Option<String>,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            map: "Norkos".to_string(),
            x: 10,
            y: 10,
            map_region: None,
        }
    }
}

/// Keyed counters such as `Character.Maps.Norkos` or `Combat.Utilize.Fire`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statistics(IndexMap<String, i64>);

impl Statistics {
    pub fn increment_stat(&mut self, key: &str) {
        self.increment_stat_by(key, 1);
    }

    pub fn increment_stat_by(&mut self, key: &str, by: i64) {
        *self.0.entry(key.to_string()).or_insert(0) += by;
    }

    pub fn get_stat(&self, key: &str) -> i64 {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Personalities(IndexSet<String>);

impl Personalities {
    pub fn is_active(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn activate(&mut self, name: impl Into<String>) {
        self.0.insert(name.into());
    }

    pub fn deactivate(&mut self, name: &str) {
        self.0.shift_remove(name);
    }
}

/// Record of a collectible picked up from the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectible {
    pub name: String,
    pub map: String,
    pub region: Option<String>,
    pub rarity: String,
    pub description: Option<String>,
    pub storyline: Option<String>,
    pub found_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collectibles(IndexMap<String, Collectible>);

impl Collectibles {
    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns false and keeps the existing record if the name is already owned.
    pub fn add(&mut self, collectible: Collectible) -> bool {
        if self.has(&collectible.name) {
            return false;
        }
        self.0.insert(collectible.name.clone(), collectible);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Collectible> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    pub level: u32,
    pub profession_name: String,
    #[serde(default)]
    pub secondary_professions: IndexSet<String>,
    pub hp: Pool,
    pub mp: Pool,
    /// Bonus values used as effect potency (e.g. `prone`, `venom`).
    #[serde(default)]
    pub live_stats: IndexMap<String, i64>,
    #[serde(default)]
    pub personalities: Personalities,
    #[serde(default)]
    pub collectibles: Collectibles,
    #[serde(default)]
    pub achievements: IndexSet<String>,
    /// Set for summoned proxies (pets); progression checks read the owner.
    #[serde(default)]
    pub owner: Option<ActorId>,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub old_region: Option<String>,
    /// Numpad code of the previous step, 0 when none.
    #[serde(default)]
    pub last_dir: u8,
    #[serde(default)]
    pub step_cooldown: u32,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub effects: EffectSet,
    #[serde(default)]
    pub statistics: Statistics,
}

impl Actor {
    pub fn new(name: impl Into<String>, profession: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            gender: Gender::default(),
            level,
            profession_name: profession.into(),
            secondary_professions: IndexSet::new(),
            hp: Pool::new(100),
            mp: Pool::new(50),
            live_stats: IndexMap::new(),
            personalities: Personalities::default(),
            collectibles: Collectibles::default(),
            achievements: IndexSet::new(),
            owner: None,
            position: Position::default(),
            old_region: None,
            last_dir: 0,
            step_cooldown: 0,
            party: None,
            effects: EffectSet::default(),
            statistics: Statistics::default(),
        }
    }

    pub fn with_hp(mut self, hp: i64) -> Self {
        self.hp = Pool::new(hp);
        self
    }

    pub fn with_mp(mut self, mp: i64) -> Self {
        self.mp = Pool::new(mp);
        self
    }

    pub fn with_party(mut self, party: impl Into<String>) -> Self {
        self.party = Some(party.into());
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp.current > 0
    }

    pub fn has_profession(&self, profession: &str) -> bool {
        self.profession_name == profession || self.secondary_professions.contains(profession)
    }

    pub fn pool(&self, stat: ResourceStat) -> &Pool {
        match stat {
            ResourceStat::Hp => &self.hp,
            ResourceStat::Mp => &self.mp,
        }
    }

    pub fn pool_mut(&mut self, stat: ResourceStat) -> &mut Pool {
        match stat {
            ResourceStat::Hp => &mut self.hp,
            ResourceStat::Mp => &mut self.mp,
        }
    }

    pub fn live_stat(&self, name: &str) -> i64 {
        self.live_stats.get(name).copied().unwrap_or(0)
    }
}

/// An actor together with the owner whose progression answers its
/// collectible and personality checks.
///
/// Built from a bare `&Actor` there is no owner lookup; use
/// `Roster::subject` for summoned proxies.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub actor: &'a Actor,
    pub owner: Option<&'a Actor>,
}

impl<'a> Subject<'a> {
    /// The owner for a summoned proxy, otherwise the actor itself.
    pub fn progression(&self) -> &'a Actor {
        self.owner.unwrap_or(self.actor)
    }
}

impl<'a> From<&'a Actor> for Subject<'a> {
    fn from(actor: &'a Actor) -> Self {
        Self { actor, owner: None }
    }
}

/// Mutable counterpart of [`Subject`]. Writes to progression land on the
/// owner itself, not on a copy.
#[derive(Debug)]
pub struct SubjectMut<'a> {
    pub actor: &'a mut Actor,
    pub owner: Option<&'a mut Actor>,
}

impl SubjectMut<'_> {
    pub fn progression(&self) -> &Actor {
        self.owner.as_deref().unwrap_or(&*self.actor)
    }

    pub fn progression_mut(&mut self) -> &mut Actor {
        match self.owner.as_deref_mut() {
            Some(owner) => owner,
            None => &mut *self.actor,
        }
    }
}

impl<'a> From<&'a mut Actor> for SubjectMut<'a> {
    fn from(actor: &'a mut Actor) -> Self {
        Self { actor, owner: None }
    }
}
