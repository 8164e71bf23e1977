use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ability::{AbilityRegistry, Element};
use crate::actor::{Actor, Gender, StatOper};
use crate::battle::LocalBattle;
use crate::cast::{CastRequest, Spell};
use crate::config::EngineConfig;
use crate::content;
use crate::effects::{tick_effects, EffectKind};
use crate::error::CastError;
use crate::events::{EventLog, GameEvent};
use crate::interact::{can_enter, EventRegistry, TileDispatcher, TileOutcome};
use crate::message::PercentFormatter;
use crate::movement::{apply_step, pick_random_tile, Step};
use crate::roster::{ActorId, Roster};
use crate::targeting::TargetingRegistry;
use crate::tile::WorldMap;
use crate::Dice;

const DEFAULT_WALK_TICKS: u32 = 50;
const MAX_ROUNDS: u32 = 30;

/* ---------------- walk ---------------- */

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WalkConfig {
    #[serde(default)]
    pub map_path: Option<String>,
    #[serde(default)]
    pub map_id: Option<String>,
    pub actor: Actor,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub ticks: Option<u32>,
    /// Starting tile; the actor's own position when absent.
    #[serde(default)]
    pub start: Option<(i32, i32)>,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WalkResult {
    pub path: Vec<Step>,
    pub actor: Actor,
    pub events: Vec<GameEvent>,
    pub log: Vec<String>,
}

/// Walk one actor around a map for a number of ticks, running every tile
/// interaction on the way. Stops early if the actor leaves the map.
pub fn simulate_walk(cfg: WalkConfig) -> Result<WalkResult> {
    cfg.engine.validate()?;
    let map = load_map(cfg.map_path.as_deref(), cfg.map_id.as_deref())?;
    let locations = content::location_table()?;
    let mut dispatcher = TileDispatcher::new(cfg.engine.clone(), locations);
    let mut scripted = EventRegistry::new();
    let mut sink = EventLog::default();
    let mut dice = Dice::from_seed(cfg.seed);

    let mut actor = cfg.actor;
    actor.position.map = map.name.clone();
    if let Some((x, y)) = cfg.start {
        actor.position.x = x;
        actor.position.y = y;
    }
    let mut path = Vec::new();
    let mut logs = Vec::new();

    logs.push(format!(
        "[START] {} at {}, {} in {}",
        actor.name, actor.position.x, actor.position.y, map.name
    ));

    for tick in 1..=cfg.ticks.unwrap_or(DEFAULT_WALK_TICKS) {
        actor.step_cooldown = actor.step_cooldown.saturating_sub(1);
        tick_effects(&mut actor, |msg| logs.push(msg));

        let step = pick_random_tile(&actor, None, false, &mut dice, &cfg.engine.movement);
        let Some(tile) = map.tile_at(step.x, step.y) else {
            logs.push(format!("[BLOCKED][{}] {}, {} is off the map", tick, step.x, step.y));
            actor.last_dir = 0;
            continue;
        };
        if !can_enter(&actor, tile) {
            logs.push(format!("[BLOCKED][{}] {}, {}", tick, step.x, step.y));
            actor.last_dir = 0;
            continue;
        }

        apply_step(&mut actor, step);
        path.push(step);
        actor.position.map_region = tile.region.clone();
        actor.statistics.increment_stat("Character.Steps");
        actor
            .statistics
            .increment_stat(&format!("Character.Maps.{}", map.name));
        if let Some(region) = &tile.region {
            actor
                .statistics
                .increment_stat(&format!("Character.Regions.{}", region));
        }

        match dispatcher.on_enter_tile(&mut actor, tile, &mut scripted, &mut sink) {
            Ok(TileOutcome::Nothing) => {}
            Ok(outcome) => logs.push(format!("[TILE][{}] {:?}", tick, outcome)),
            Err(e) => logs.push(format!("[ERROR][{}] {}", tick, e)),
        }

        if actor.position.map != map.name {
            logs.push(format!("[LEAVE][{}] {} → {}", tick, map.name, actor.position.map));
            break;
        }
    }

    Ok(WalkResult {
        path,
        actor,
        events: sink.events,
        log: logs,
    })
}

fn load_map(path: Option<&str>, id: Option<&str>) -> Result<WorldMap> {
    if let Some(path) = path {
        let text =
            fs::read_to_string(path).with_context(|| format!("failed to read map JSON: {}", path))?;
        return WorldMap::from_json(&text).with_context(|| format!("bad map: {}", path));
    }
    content::builtin_map(id.unwrap_or("norkos"))
}

/* ---------------- skirmish ---------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct Combatant {
    pub actor: Actor,
    pub ability: String,
    #[serde(default)]
    pub effect: Option<EffectKind>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SkirmishConfig {
    pub party_a: Vec<Combatant>,
    pub party_b: Vec<Combatant>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub max_rounds: Option<u32>,
    #[serde(default)]
    pub abilities_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SkirmishResult {
    pub winner: String,
    pub rounds: u32,
    pub survivors: Vec<(String, i64)>,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SkirmishSummary {
    pub samples: u32,
    pub a_wins: u32,
    pub b_wins: u32,
    pub draws: u32,
    pub avg_rounds: f64,
}

/// Two parties take turns casting their configured abilities until one
/// side is down or the round cap is reached.
pub fn simulate_skirmish(cfg: SkirmishConfig) -> Result<SkirmishResult> {
    let registry = match &cfg.abilities_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read abilities JSON: {}", path))?;
            AbilityRegistry::from_json(&text)?
        }
        None => content::ability_registry()?,
    };
    let targeting = TargetingRegistry::with_defaults();
    let formatter = PercentFormatter;
    let mut battle = LocalBattle::new();
    let mut dice = Dice::from_seed(cfg.seed);

    let mut roster = Roster::new();
    let mut turns: Vec<(ActorId, String, Option<EffectKind>)> = Vec::new();
    for (party, members) in [("a", cfg.party_a), ("b", cfg.party_b)] {
        for c in members {
            let mut actor = c.actor;
            actor.party = Some(party.to_string());
            let id = roster.spawn(actor);
            turns.push((id, c.ability, c.effect));
        }
    }

    let max_rounds = cfg.max_rounds.unwrap_or(MAX_ROUNDS);
    let mut rounds = 0;
    let mut logs = Vec::new();

    while rounds < max_rounds && party_alive(&roster, "a") && party_alive(&roster, "b") {
        rounds += 1;
        logs.push(format!("[ROUND] {}", rounds));

        for (id, ability, effect) in &turns {
            let Some(caster) = roster.get(*id) else { continue };
            if !caster.is_alive() {
                continue;
            }
            let caster_name = caster.name.clone();

            let def = registry
                .get(ability)
                .ok_or_else(|| CastError::UnknownAbility(ability.clone()))?;
            let spell = match Spell::prepare(def, &roster, *id) {
                Ok(spell) => spell,
                Err(e) => {
                    logs.push(format!("[SKIP][{}] {}", caster_name, e));
                    continue;
                }
            };
            let pool = roster.get(*id).map(|c| c.pool(def.stat).current).unwrap_or(0);
            if def.oper == StatOper::Sub && pool < spell.cost() {
                logs.push(format!(
                    "[SKIP][{}] not enough {:?} for {}",
                    caster_name,
                    def.stat,
                    spell.tier().name
                ));
                continue;
            }

            let targets = spell.targeting(&targeting).get(def.targets, &roster, &mut dice);
            let damage = def.roll_damage(spell.tier(), &mut dice);
            let mut request = CastRequest::new(damage, targets).message(message_for(def.element));
            if let Some(kind) = effect {
                request = request.effect(kind.clone());
            }

            let before = battle.log.len();
            spell.cast(&mut roster, &mut battle, &formatter, request);
            logs.extend(battle.log[before..].iter().cloned());

            if !party_alive(&roster, "a") || !party_alive(&roster, "b") {
                break;
            }
        }

        for id in roster.ids() {
            if let Some(actor) = roster.get_mut(id) {
                if actor.is_alive() {
                    tick_effects(actor, |msg| logs.push(msg));
                }
            }
        }
    }

    let winner = match (party_alive(&roster, "a"), party_alive(&roster, "b")) {
        (true, false) => "a",
        (false, true) => "b",
        _ => "draw",
    };
    logs.push(format!("[END] winner={} rounds={}", winner, rounds));

    let survivors = roster
        .iter()
        .filter(|(_, a)| a.is_alive())
        .map(|(_, a)| (a.name.clone(), a.hp.current))
        .collect();

    Ok(SkirmishResult {
        winner: winner.to_string(),
        rounds,
        survivors,
        log: logs,
    })
}

/// Run `samples` skirmishes with seeds `seed..seed + samples`.
pub fn simulate_skirmish_many(cfg: SkirmishConfig, samples: u32) -> Result<SkirmishSummary> {
    let mut summary = SkirmishSummary {
        samples,
        ..SkirmishSummary::default()
    };
    let mut total_rounds = 0u64;
    for i in 0..samples {
        let mut run = cfg.clone();
        run.seed = cfg.seed.wrapping_add(u64::from(i));
        let res = simulate_skirmish(run)?;
        total_rounds += u64::from(res.rounds);
        match res.winner.as_str() {
            "a" => summary.a_wins += 1,
            "b" => summary.b_wins += 1,
            _ => summary.draws += 1,
        }
    }
    if samples > 0 {
        summary.avg_rounds = total_rounds as f64 / f64::from(samples);
    }
    Ok(summary)
}

fn party_alive(roster: &Roster, party: &str) -> bool {
    roster
        .iter()
        .any(|(_, a)| a.party.as_deref() == Some(party) && a.is_alive())
}

fn message_for(element: Element) -> &'static str {
    match element {
        Element::Heal => "%player cast %spellName on %targetName and healed %healed hp!",
        Element::Buff | Element::Debuff => "%player used %spellName on %targetName.",
        _ => "%player cast %spellName at %targetName for %damage damage!",
    }
}

/// A small Mage + Cleric vs Fighter + Rogue line-up.
pub fn demo_skirmish(seed: u64) -> SkirmishConfig {
    let mut mage = Actor::new("Vera", "Mage", 12).with_hp(60).with_mp(80);
    mage.gender = Gender::Female;
    let cleric = Actor::new("Osric", "Cleric", 8).with_hp(70).with_mp(90);
    let fighter = Actor::new("Brakka", "Fighter", 10).with_hp(90).with_mp(40);
    let rogue = Actor::new("Nim", "Rogue", 9).with_hp(65).with_mp(40);

    SkirmishConfig {
        party_a: vec![
            Combatant {
                actor: mage,
                ability: "MagicMissile".into(),
                effect: None,
            },
            Combatant {
                actor: cleric,
                ability: "Cure".into(),
                effect: None,
            },
        ],
        party_b: vec![
            Combatant {
                actor: fighter,
                ability: "VenomStrike".into(),
                effect: Some(EffectKind::Poison),
            },
            Combatant {
                actor: rogue,
                ability: "VenomStrike".into(),
                effect: Some(EffectKind::Venom),
            },
        ],
        seed,
        max_rounds: None,
        abilities_path: None,
    }
}
