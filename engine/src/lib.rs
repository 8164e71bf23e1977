use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod ability;
pub mod actor;
pub mod api;
pub mod battle;
pub mod cast;
pub mod config;
pub mod content;
pub mod effects;
pub mod error;
pub mod events;
pub mod interact;
pub mod message;
pub mod movement;
pub mod roster;
pub mod targeting;
pub mod tile;

pub use ability::{resolve_tier, AbilityDefinition, AbilityRegistry, Element, Tier};
pub use actor::{Actor, Gender, Position, StatOper, Subject, SubjectMut};
pub use battle::{Battle, Hook, LocalBattle};
pub use cast::{CastRequest, Spell};
pub use config::EngineConfig;
pub use error::{CastError, RosterError, TileError};
pub use events::{EventLog, EventSink, GameEvent};
pub use interact::{can_enter, TileDispatcher, TileOutcome};
pub use movement::{pick_random_tile, Step};
pub use roster::{ActorId, Roster, SharedRoster};
pub use targeting::{Capability, Targeting, TargetingRegistry};
pub use tile::{Terrain, Tile, TileObject, TileProperties, WorldMap};

/// Seeded source of every random decision the engine makes.
pub struct Dice { rng: ChaCha8Rng }

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Uniform integer in `[min, max(min + 1, max)]`, never below 1.
    pub fn min_max(&mut self, min: i64, max: i64) -> i64 {
        let hi = max.max(min + 1);
        self.rng.gen_range(min..=hi).max(1)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/* ---------------- weighted choice collaborator ---------------- */

/// Single weighted draw over a list of items.
///
/// Implementations must be reproducible for a fixed seed so that
/// movement and targeting can be replayed in tests.
pub trait WeightedChoice {
    fn weighted_choice<T: Copy>(&mut self, items: &[T], weights: &[f64]) -> Option<T>;
}

impl WeightedChoice for Dice {
    fn weighted_choice<T: Copy>(&mut self, items: &[T], weights: &[f64]) -> Option<T> {
        if items.len() != weights.len() {
            return None;
        }
        // WeightedIndex rejects empty or all-zero tables; both mean "no choice".
        let dist = WeightedIndex::new(weights).ok()?;
        Some(items[dist.sample(&mut self.rng)])
    }
}
