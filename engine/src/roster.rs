use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, Subject, SubjectMut};
use crate::error::RosterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u32);

/// Every actor taking part in one simulation, addressed by id.
///
/// Casters and targets are looked up per step, so an ability may target its
/// own caster without aliasing.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    actors: IndexMap<ActorId, Actor>,
    next_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, actor: Actor) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        self.actors.insert(id, actor);
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// `id` together with its owner, if it has one in this roster.
    pub fn subject(&self, id: ActorId) -> Option<Subject<'_>> {
        let actor = self.get(id)?;
        let owner = actor
            .owner
            .filter(|owner| *owner != id)
            .and_then(|owner| self.get(owner));
        Some(Subject { actor, owner })
    }

    /// Mutable access to `id` and its owner at the same time.
    pub fn subject_mut(&mut self, id: ActorId) -> Option<SubjectMut<'_>> {
        let owner_id = self.get(id)?.owner.filter(|owner| *owner != id);
        let mut actor = None;
        let mut owner = None;
        for (key, a) in self.actors.iter_mut() {
            if *key == id {
                actor = Some(a);
            } else if Some(*key) == owner_id {
                owner = Some(a);
            }
        }
        Some(SubjectMut {
            actor: actor?,
            owner,
        })
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &Actor)> {
        self.actors.iter().map(|(id, a)| (*id, a))
    }

    pub fn ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<ActorId> {
        self.iter().find(|(_, a)| a.name == name).map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

/// A roster shared between threads. Each discrete event holds the lock for
/// its whole duration, so no two events write the same target concurrently.
#[derive(Debug, Clone, Default)]
pub struct SharedRoster(Arc<Mutex<Roster>>);

impl SharedRoster {
    pub fn new(roster: Roster) -> Self {
        Self(Arc::new(Mutex::new(roster)))
    }

    pub fn with_event<R>(&self, event: impl FnOnce(&mut Roster) -> R) -> Result<R, RosterError> {
        let mut guard = self.0.lock().map_err(|_| RosterError::Poisoned)?;
        Ok(event(&mut guard))
    }
}
