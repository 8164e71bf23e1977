use serde::{Deserialize, Serialize};

use crate::actor::{Actor, Subject};
use crate::config::MovementConfig;
use crate::roster::{ActorId, Roster};
use crate::WeightedChoice;

/// Numpad codes that actually move. 5 is "stay".
pub const MOVE_DIRECTIONS: [u8; 8] = [1, 2, 3, 4, 6, 7, 8, 9];
pub const STAY: u8 = 5;

/// Destination of one step and the direction code that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub x: i32,
    pub y: i32,
    pub dir: u8,
}

/// Where a party member should walk instead of wandering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowTarget {
    pub x: i32,
    pub y: i32,
    pub last_dir: u8,
}

impl Roster {
    /// The tile `follower` should walk onto: its party's leader, the first
    /// live member in roster order. `None` for leaders, for actors without
    /// a party, and when the leader is on another map.
    pub fn follow_target(&self, follower: ActorId) -> Option<FollowTarget> {
        let actor = self.get(follower)?;
        let party = actor.party.as_deref()?;
        let (leader_id, leader) = self
            .iter()
            .find(|(_, a)| a.is_alive() && a.party.as_deref() == Some(party))?;
        if leader_id == follower || leader.position.map != actor.position.map {
            return None;
        }
        Some(FollowTarget {
            x: leader.position.x,
            y: leader.position.y,
            last_dir: leader.last_dir,
        })
    }

    /// `pick_random_tile` for a roster member, with its owner and party
    /// leader looked up here.
    pub fn pick_step(
        &self,
        id: ActorId,
        override_follow: bool,
        rng: &mut impl WeightedChoice,
        cfg: &MovementConfig,
    ) -> Option<Step> {
        let subject = self.subject(id)?;
        let follow = self.follow_target(id);
        Some(pick_random_tile(subject, follow, override_follow, rng, cfg))
    }
}

/// Coordinates one step in direction `dir` from `(x, y)`.
pub fn num2dir(dir: u8, x: i32, y: i32) -> (i32, i32) {
    match dir {
        1 => (x - 1, y - 1),
        2 => (x, y - 1),
        3 => (x + 1, y - 1),
        4 => (x - 1, y),
        6 => (x + 1, y),
        7 => (x - 1, y + 1),
        8 => (x, y + 1),
        9 => (x + 1, y + 1),
        _ => (x, y),
    }
}

/// Sum of configured trait contributions, clamped to `[0, max_drunk]`.
pub fn drunk_factor<'a>(actor: impl Into<Subject<'a>>, cfg: &MovementConfig) -> f64 {
    let subject: Subject<'_> = actor.into();
    let subject = subject.progression();
    let total: f64 = cfg
        .drunk_traits
        .iter()
        .filter(|(name, _)| subject.personalities.is_active(name))
        .map(|(_, amount)| *amount)
        .sum();
    total.min(cfg.max_drunk).max(0.0)
}

fn grid_point(code: u8) -> (i32, i32) {
    (i32::from(code % 3), i32::from(code / 3))
}

/// Weights for direction codes 1..=9 (index `code - 1`).
///
/// Without a previous direction all codes weigh the same. Otherwise the
/// previous direction is favoured and the others fall off with their grid
/// distance from it; drunkenness flattens both effects.
pub fn direction_weights(last_dir: u8, drunk: f64, cfg: &MovementConfig) -> [f64; 9] {
    let mut weights = [cfg.uniform_weight; 9];
    if last_dir == 0 {
        return weights;
    }

    let (px, py) = grid_point(last_dir);
    for code in 1..=9u8 {
        let (cx, cy) = grid_point(code);
        let distance = f64::from((px - cx).abs() + (py - cy).abs());
        weights[usize::from(code - 1)] = if distance == 0.0 {
            cfg.straight_weight - cfg.straight_drunk_penalty * drunk
        } else {
            (cfg.turn_weight - distance * (1.0 - drunk / cfg.max_drunk)).max(cfg.min_weight)
        };
    }
    weights
}

/// Choose the next step for `actor`.
///
/// Party members with a follow target walk onto it; everyone else makes a
/// single weighted draw over the eight movement directions.
pub fn pick_random_tile<'a>(
    actor: impl Into<Subject<'a>>,
    follow: Option<FollowTarget>,
    override_follow: bool,
    rng: &mut impl WeightedChoice,
    cfg: &MovementConfig,
) -> Step {
    let subject: Subject<'_> = actor.into();
    let actor = subject.actor;
    if actor.party.is_some() && !override_follow {
        if let Some(follow) = follow {
            return Step {
                x: follow.x,
                y: follow.y,
                dir: follow.last_dir,
            };
        }
    }

    let drunk = drunk_factor(subject, cfg);
    let all = direction_weights(actor.last_dir, drunk, cfg);
    let weights: Vec<f64> = MOVE_DIRECTIONS
        .iter()
        .map(|&code| all[usize::from(code - 1)])
        .collect();

    let dir = rng
        .weighted_choice(&MOVE_DIRECTIONS, &weights)
        .unwrap_or(STAY);
    let (x, y) = num2dir(dir, actor.position.x, actor.position.y);
    tracing::debug!(actor = %actor.name, dir, drunk, "direction picked");
    Step { x, y, dir }
}

/// Commit a step that passed `can_enter`.
pub fn apply_step(actor: &mut Actor, step: Step) {
    actor.position.x = step.x;
    actor.position.y = step.y;
    actor.last_dir = step.dir;
}
