use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::roster::ActorId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Prone,
    Stunned,
    Poison,
    Venom,
    Shatter,
    Vampire,
    /// Raises a live stat by the effect's potency while active.
    StatBoost { stat: String },
    /// Lowers a live stat by the effect's potency while active.
    StatDrain { stat: String },
}

impl EffectKind {
    /// Parse a combat effect name as used by `apply_combat_effects`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "prone" => Some(EffectKind::Prone),
            "stunned" => Some(EffectKind::Stunned),
            "poison" => Some(EffectKind::Poison),
            "venom" => Some(EffectKind::Venom),
            "shatter" => Some(EffectKind::Shatter),
            "vampire" => Some(EffectKind::Vampire),
            _ => None,
        }
    }

    fn stat_delta(&self, potency: i64) -> Option<(&str, i64)> {
        match self {
            EffectKind::StatBoost { stat } => Some((stat.as_str(), potency)),
            EffectKind::StatDrain { stat } => Some((stat.as_str(), -potency)),
            EffectKind::Shatter => Some(("con", -potency)),
            _ => None,
        }
    }

    /// Immediate hook run right after the effect is attached.
    pub fn affect(&self, target: &mut Actor, potency: i64) {
        if let Some((stat, delta)) = self.stat_delta(potency) {
            *target.live_stats.entry(stat.to_string()).or_insert(0) += delta;
        }
    }

    /// Reverses `affect` when the effect expires.
    pub fn unaffect(&self, target: &mut Actor, potency: i64) {
        if let Some((stat, delta)) = self.stat_delta(potency) {
            *target.live_stats.entry(stat.to_string()).or_insert(0) -= delta;
        }
    }

    fn damage_per_tick(&self, potency: i64) -> i64 {
        match self {
            EffectKind::Poison => potency,
            EffectKind::Venom => potency * 2,
            _ => 0,
        }
    }
}

/// Who applied an effect and with which ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectOrigin {
    pub name: String,
    pub caster: ActorId,
    pub ability: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub potency: i64,
    /// Remaining ticks.
    pub duration: i64,
    pub origin: Option<EffectOrigin>,
    #[serde(default)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Effect {
    pub fn new(kind: EffectKind, potency: i64, duration: i64) -> Self {
        Self {
            kind,
            potency,
            duration,
            origin: None,
            extra: IndexMap::new(),
        }
    }

    pub fn with_extra(mut self, extra: IndexMap<String, serde_json::Value>) -> Self {
        self.extra = extra;
        self
    }
}

/// Effects currently attached to one actor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectSet(Vec<Effect>);

impl EffectSet {
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.0.iter()
    }

    pub fn has(&self, kind: &EffectKind) -> bool {
        self.0.iter().any(|e| &e.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Attach `effect` to `target`, then run its immediate hook.
pub fn attach_effect(target: &mut Actor, effect: Effect) {
    let kind = effect.kind.clone();
    let potency = effect.potency;
    target.effects.0.push(effect);
    kind.affect(target, potency);
}

/// Advance every effect on `actor` by one tick: apply damage over time,
/// count down durations and detach what expired.
pub fn tick_effects(actor: &mut Actor, mut log: impl FnMut(String)) {
    let dot: i64 = actor
        .effects
        .iter()
        .map(|e| e.kind.damage_per_tick(e.potency))
        .sum();
    if dot > 0 && actor.is_alive() {
        let before = actor.hp.current;
        actor.hp.sub(dot);
        log(format!(
            "[DOT][{}] {} → {} (−{})",
            actor.name, before, actor.hp.current, dot
        ));
    }

    for effect in actor.effects.0.iter_mut() {
        effect.duration -= 1;
    }

    let (expired, active): (Vec<Effect>, Vec<Effect>) =
        actor.effects.0.drain(..).partition(|e| e.duration <= 0);
    actor.effects.0 = active;

    for effect in expired {
        effect.kind.unaffect(actor, effect.potency);
        log(format!("[EFFECT][{}] {:?} wears off", actor.name, effect.kind));
    }
}
