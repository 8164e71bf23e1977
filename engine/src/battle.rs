use serde::{Deserialize, Serialize};

use crate::roster::{ActorId, Roster};

/// Event hooks fired around each hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hook {
    Attack,
    Attacked,
}

/// The combat bookkeeping a cast delegates to: statistics, hit hooks,
/// damage arithmetic, death handling and narration delivery.
///
/// Implementations may hand work to other systems but must not block the
/// cast on it.
pub trait Battle {
    fn try_increment_stat(&mut self, roster: &mut Roster, actor: ActorId, key: &str);

    fn emit_events(&mut self, roster: &Roster, entity: ActorId, hook: Hook);

    /// Apply `amount` to `target` (negative heals). Returns what was
    /// actually dealt after the target's own modifiers.
    fn apply_damage(
        &mut self,
        roster: &mut Roster,
        target: ActorId,
        amount: i64,
        source: ActorId,
    ) -> i64;

    fn handle_death(&mut self, roster: &mut Roster, target: ActorId, killer: ActorId);

    fn emit_narration(&mut self, text: String);
}

/// In-process battle that keeps everything it is told in memory.
#[derive(Debug, Default, Clone)]
pub struct LocalBattle {
    pub log: Vec<String>,
    pub hooks: Vec<(ActorId, Hook)>,
    pub deaths: Vec<(ActorId, ActorId)>,
}

impl LocalBattle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Battle for LocalBattle {
    fn try_increment_stat(&mut self, roster: &mut Roster, actor: ActorId, key: &str) {
        if let Some(actor) = roster.get_mut(actor) {
            actor.statistics.increment_stat(key);
        }
    }

    fn emit_events(&mut self, _roster: &Roster, entity: ActorId, hook: Hook) {
        self.hooks.push((entity, hook));
    }

    fn apply_damage(
        &mut self,
        roster: &mut Roster,
        target: ActorId,
        amount: i64,
        _source: ActorId,
    ) -> i64 {
        let Some(target) = roster.get_mut(target) else {
            return 0;
        };

        let before = target.hp.current;
        if amount > 0 {
            // `resist` is a percentage of incoming damage shrugged off.
            let resist = target.live_stat("resist").clamp(0, 100);
            let reduced = amount - amount * resist / 100;
            target.hp.sub(reduced);
        } else {
            target.hp.add(-amount);
        }
        let dealt = before - target.hp.current;
        tracing::debug!(
            target = %target.name,
            before,
            after = target.hp.current,
            dealt,
            "damage applied"
        );
        dealt
    }

    fn handle_death(&mut self, roster: &mut Roster, target: ActorId, killer: ActorId) {
        self.deaths.push((target, killer));
        let killer_name = roster
            .get(killer)
            .map(|a| a.name.clone())
            .unwrap_or_default();
        if let Some(dead) = roster.get_mut(target) {
            dead.statistics.increment_stat("Combat.Death");
            let text = format!("«{}» was killed by «{}»!", dead.name, killer_name);
            self.log.push(text);
        }
        if let Some(killer) = roster.get_mut(killer) {
            killer.statistics.increment_stat("Combat.Kill");
        }
    }

    fn emit_narration(&mut self, text: String) {
        self.log.push(text);
    }
}
