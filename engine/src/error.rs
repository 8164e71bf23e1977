use thiserror::Error;

use crate::roster::ActorId;

/// Precondition failures detected while preparing a cast.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CastError {
    #[error("{actor} has no usable tier of {ability}")]
    NoTier { ability: String, actor: String },
    #[error("actor {0:?} is not in the roster")]
    UnknownActor(ActorId),
    #[error("unknown ability '{0}'")]
    UnknownAbility(String),
}

/// Misconfigured tile data. The interaction is abandoned without moving the actor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileError {
    #[error("forceEvent {event} does not exist at {x}, {y} in {map}")]
    UnknownEvent {
        event: String,
        map: String,
        x: i32,
        y: i32,
    },
    #[error("no dest.map at {x}, {y} in {map}")]
    MissingDestination { map: String, x: i32, y: i32 },
    #[error("no dest.movementType at {x}, {y} in {map}")]
    MissingMovementType { map: String, x: i32, y: i32 },
    #[error("teleport location '{0}' is not defined")]
    UnknownLocation(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("roster lock poisoned by a panicking event")]
    Poisoned,
}
