use anyhow::{Context, Result};
use chrono::Utc;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, Collectible, Subject, SubjectMut};
use crate::config::EngineConfig;
use crate::error::TileError;
use crate::events::{EventSink, GameEvent};
use crate::tile::{Terrain, Tile, TileObjectType};

/// Whether `actor` may step onto `tile`.
///
/// The first gate the tile declares decides on its own; empty gate values
/// count as undeclared. Tiles without gates only refuse when blocked or
/// void.
pub fn can_enter<'a>(actor: impl Into<Subject<'a>>, tile: &Tile) -> bool {
    let subject: Subject<'_> = actor.into();
    let actor = subject.actor;
    if let Some(props) = tile.properties() {
        if let Some(map) = gate(&props.require_map) {
            return actor.statistics.get_stat(&format!("Character.Maps.{}", map)) > 0;
        }
        if let Some(region) = gate(&props.require_region) {
            return actor.statistics.get_stat(&format!("Character.Regions.{}", region)) > 0;
        }
        if let Some(boss) = gate(&props.require_boss) {
            return actor.statistics.get_stat(&format!("Character.BossKills.{}", boss)) > 0;
        }
        if let Some(class) = gate(&props.require_class) {
            return actor.profession_name == class;
        }
        if let Some(achievement) = gate(&props.require_achievement) {
            return actor.achievements.contains(achievement);
        }
        if let Some(collectible) = gate(&props.require_collectible) {
            return subject.progression().collectibles.has(collectible);
        }
    }
    !tile.blocked && tile.terrain != Terrain::Void
}

fn gate(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// What entering a tile did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileOutcome {
    Nothing,
    EventRun(String),
    ProfessionOffered(ProfessionOffer),
    Transferred(Destination),
    Collected(String),
    OnCooldown,
    Refused { trait_name: String },
    AlreadyOwned,
    Unhandled(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfessionOffer {
    pub actor: String,
    pub profession_name: String,
    pub trainer_name: String,
}

/// Resolved teleport target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub map: String,
    pub x: i32,
    pub y: i32,
    pub from_name: String,
    pub dest_name: String,
    pub movement_type: String,
}

/// Scripted interactions tiles can start.
pub trait ScriptedEvents {
    fn has_event(&self, name: &str) -> bool;
    fn operate_on(&mut self, name: &str, actor: &mut Actor);
    fn profession_change(&mut self, actor: &mut Actor, offer: ProfessionOffer);
}

type EventHandler = Box<dyn FnMut(&mut Actor) + Send>;

/// Named event handlers plus a queue of pending profession offers.
#[derive(Default)]
pub struct EventRegistry {
    handlers: IndexMap<String, EventHandler>,
    pub offers: Vec<ProfessionOffer>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, handler: impl FnMut(&mut Actor) + Send + 'static) {
        self.handlers.insert(name.into(), Box::new(handler));
    }
}

impl ScriptedEvents for EventRegistry {
    fn has_event(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    fn operate_on(&mut self, name: &str, actor: &mut Actor) {
        if let Some(handler) = self.handlers.get_mut(name) {
            handler(actor);
        }
    }

    fn profession_change(&mut self, _actor: &mut Actor, offer: ProfessionOffer) {
        self.offers.push(offer);
    }
}

/// A named teleport target referenced by `toLoc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub map: String,
    pub x: i32,
    pub y: i32,
    pub formal_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct LocationTable(IndexMap<String, Location>);

impl LocationTable {
    pub fn from_json(text: &str) -> Result<Self> {
        let table: IndexMap<String, Location> =
            serde_json::from_str(text).context("failed to parse teleport locations")?;
        Ok(Self(table))
    }

    pub fn insert(&mut self, name: impl Into<String>, location: Location) {
        self.0.insert(name.into(), location);
    }

    pub fn get(&self, name: &str) -> Option<&Location> {
        self.0.get(name)
    }
}

/// Runs tile interactions for actors that just moved.
pub struct TileDispatcher {
    config: EngineConfig,
    locations: LocationTable,
    warned_types: IndexSet<String>,
}

impl TileDispatcher {
    pub fn new(config: EngineConfig, locations: LocationTable) -> Self {
        Self {
            config,
            locations,
            warned_types: IndexSet::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Dispatch the interaction for the tile `actor` has entered.
    ///
    /// A forced event takes precedence over the object's type. Configuration
    /// errors are logged and returned; the actor is left as it was.
    ///
    /// Pass `Roster::subject_mut` for summoned proxies so collectibles land
    /// on the owner.
    pub fn on_enter_tile<'a>(
        &mut self,
        actor: impl Into<SubjectMut<'a>>,
        tile: &Tile,
        events: &mut impl ScriptedEvents,
        sink: &mut impl EventSink,
    ) -> Result<TileOutcome, TileError> {
        let subject: SubjectMut<'_> = actor.into();
        let actor = &mut *subject.actor;
        let Some(object) = &tile.object else {
            return Ok(TileOutcome::Nothing);
        };

        if let Some(event) = object.properties.force_event.as_deref().filter(|e| !e.is_empty()) {
            if !events.has_event(event) {
                let err = TileError::UnknownEvent {
                    event: event.to_string(),
                    map: actor.position.map.clone(),
                    x: actor.position.x,
                    y: actor.position.y,
                };
                tracing::error!(target: "movement", "{}", err);
                return Err(err);
            }
            events.operate_on(event, actor);
            return Ok(TileOutcome::EventRun(event.to_string()));
        }

        match &object.kind {
            None => Ok(TileOutcome::Nothing),
            Some(TileObjectType::Trainer) => Ok(self.handle_trainer(actor, tile, events)),
            Some(TileObjectType::Teleport) => self.teleport(subject, tile, false, sink),
            Some(TileObjectType::Collectible) => Ok(handle_collectible(subject, tile, sink)),
            Some(TileObjectType::Other(kind)) => {
                if self.warned_types.insert(kind.clone()) {
                    tracing::warn!(kind = %kind, "no handler for tile object type");
                }
                Ok(TileOutcome::Unhandled(kind.clone()))
            }
        }
    }

    fn handle_trainer(
        &self,
        actor: &mut Actor,
        tile: &Tile,
        events: &mut impl ScriptedEvents,
    ) -> TileOutcome {
        if actor.step_cooldown > 0 {
            return TileOutcome::OnCooldown;
        }
        actor.step_cooldown = self.config.trainer_cooldown;

        let Some(object) = &tile.object else {
            return TileOutcome::Nothing;
        };
        let profession_name = object.name.clone();
        let trainer_name = match &object.properties.real_name {
            Some(real) => format!("{}, the {} trainer", real, profession_name),
            None => format!("the {} trainer", profession_name),
        };
        let offer = ProfessionOffer {
            actor: actor.name.clone(),
            profession_name,
            trainer_name,
        };
        events.profession_change(actor, offer.clone());
        TileOutcome::ProfessionOffered(offer)
    }

    /// Move `actor` through the teleport on `tile`. `force` skips the
    /// cooldown, for scripted transfers.
    pub fn teleport<'a>(
        &self,
        actor: impl Into<SubjectMut<'a>>,
        tile: &Tile,
        force: bool,
        sink: &mut impl EventSink,
    ) -> Result<TileOutcome, TileError> {
        let subject: SubjectMut<'_> = actor.into();
        if !force {
            if subject.actor.step_cooldown > 0 {
                return Ok(TileOutcome::OnCooldown);
            }
            subject.actor.step_cooldown = self.config.teleport_cooldown;
        }

        let Some(props) = tile.properties() else {
            return Ok(TileOutcome::Nothing);
        };

        let refusing_trait = match props.movement_type.as_deref() {
            Some("ascend") => Some("Delver"),
            Some("descend") => Some("ScaredOfTheDark"),
            _ => None,
        };
        if let Some(trait_name) = refusing_trait {
            if subject.progression().personalities.is_active(trait_name) {
                return Ok(TileOutcome::Refused {
                    trait_name: trait_name.to_string(),
                });
            }
        }
        let actor = subject.actor;

        let here = (actor.position.map.clone(), actor.position.x, actor.position.y);
        let missing_destination = || TileError::MissingDestination {
            map: here.0.clone(),
            x: here.1,
            y: here.2,
        };

        if props.map.is_none() && props.to_loc.is_none() {
            let err = missing_destination();
            tracing::error!(target: "movement", "{}", err);
            return Err(err);
        }

        let Some(movement_type) = props.movement_type.clone() else {
            let err = TileError::MissingMovementType {
                map: here.0.clone(),
                x: here.1,
                y: here.2,
            };
            tracing::error!(target: "movement", "{}", err);
            return Err(err);
        };

        let from_name = props
            .from_name
            .clone()
            .unwrap_or_else(|| actor.position.map.clone());

        let (map, x, y, dest_name) = if let Some(loc_name) = &props.to_loc {
            let Some(loc) = self.locations.get(loc_name) else {
                let err = TileError::UnknownLocation(loc_name.clone());
                tracing::error!(target: "movement", "{}", err);
                return Err(err);
            };
            (loc.map.clone(), loc.x, loc.y, loc.formal_name.clone())
        } else {
            let (Some(map), Some(x), Some(y)) = (props.map.clone(), props.destx, props.desty) else {
                let err = missing_destination();
                tracing::error!(target: "movement", "{}", err);
                return Err(err);
            };
            let dest_name = props.dest_name.clone().unwrap_or_else(|| map.clone());
            (map, x, y, dest_name)
        };

        actor.position.map = map.clone();
        actor.position.x = x;
        actor.position.y = y;
        actor.old_region = actor.position.map_region.take();
        actor.position.map_region = tile.region.clone();

        actor
            .statistics
            .increment_stat(&format!("Character.Movement.{}", capitalize(&movement_type)));

        let dest = Destination {
            map,
            x,
            y,
            from_name,
            dest_name,
            movement_type,
        };
        tracing::debug!(actor = %actor.name, ?dest, "transferred");
        sink.publish(GameEvent::Transfer {
            player: actor.name.clone(),
            dest: dest.clone(),
        });
        Ok(TileOutcome::Transferred(dest))
    }
}

fn handle_collectible(mut subject: SubjectMut<'_>, tile: &Tile, sink: &mut impl EventSink) -> TileOutcome {
    let Some(object) = &tile.object else {
        return TileOutcome::Nothing;
    };
    let name = object.name.clone();

    if subject.progression().collectibles.has(&name) {
        return TileOutcome::AlreadyOwned;
    }

    let props = &object.properties;
    let collectible = Collectible {
        name: name.clone(),
        map: subject.actor.position.map.clone(),
        region: subject.actor.position.map_region.clone(),
        rarity: props.rarity.clone().unwrap_or_else(|| "basic".to_string()),
        description: props.flavor_text.clone(),
        storyline: props.storyline.clone(),
        found_at: Utc::now(),
    };

    subject.progression_mut().collectibles.add(collectible.clone());

    sink.publish(GameEvent::Collectible {
        player: subject.actor.name.clone(),
        collectible,
    });
    TileOutcome::Collected(name)
}

fn capitalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
