use std::sync::mpsc::Sender;

use serde::Serialize;

use crate::actor::Collectible;
use crate::interact::Destination;

/// Lifecycle events published for other subsystems (chat, persistence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum GameEvent {
    #[serde(rename = "player:transfer")]
    Transfer { player: String, dest: Destination },
    #[serde(rename = "player:collectible")]
    Collectible {
        player: String,
        collectible: Collectible,
    },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Transfer { .. } => "player:transfer",
            GameEvent::Collectible { .. } => "player:collectible",
        }
    }
}

/// Publish-only event channel. Publishing never waits on subscribers.
pub trait EventSink {
    fn publish(&mut self, event: GameEvent);
}

/// Keeps every published event in order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventSink for EventLog {
    fn publish(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

impl EventSink for Sender<GameEvent> {
    fn publish(&mut self, event: GameEvent) {
        let name = event.name();
        if self.send(event).is_err() {
            tracing::warn!(event = name, "no subscriber left for event");
        }
    }
}
