use clap::{Parser, Subcommand};
use encoding_rs::Encoding;
use idle_engine::actor::Actor;
use idle_engine::api::{simulate_walk, WalkConfig};
use idle_engine::config::EngineConfig;
use idle_engine::events::EventLog;
use idle_engine::interact::{can_enter, EventRegistry, TileDispatcher};
use idle_engine::movement::{direction_weights, drunk_factor};
use idle_engine::{content, AbilityRegistry};
use std::{fs, path::Path, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Subcommand)]
enum Cmd {
    /// Show which tier of an ability an actor would cast
    Tier {
        /// Ability name, e.g. MagicMissile
        #[arg(long)]
        ability: String,
        #[arg(long)]
        profession: String,
        #[arg(long)]
        level: u32,
        /// Optional abilities JSON (defaults to the built-in table)
        #[arg(long)]
        abilities: Option<PathBuf>,
    },
    /// Print the movement weights for a previous direction and drunk factor
    Weights {
        /// Previous numpad direction, 0 for none
        #[arg(long, default_value_t = 0)]
        last_dir: u8,
        #[arg(long, default_value_t = 0.0)]
        drunk: f64,
        /// Optional engine config (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Walk an actor around a map for a number of ticks
    Walk {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 50)]
        ticks: u32,
        /// Map layout JSON (defaults to the built-in map)
        #[arg(long)]
        map: Option<PathBuf>,
        /// Built-in map id
        #[arg(long, default_value = "norkos")]
        map_id: String,
        /// Actor JSON (defaults to a sample Mage)
        #[arg(long)]
        actor: Option<PathBuf>,
        /// Optional engine config (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 4)]
        x: i32,
        #[arg(long, default_value_t = 4)]
        y: i32,
        /// Print the whole result as JSON instead of the log
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Step onto one tile of a built-in map and report what happened
    Enter {
        #[arg(long, default_value = "norkos")]
        map_id: String,
        #[arg(long)]
        x: i32,
        #[arg(long)]
        y: i32,
        /// Actor JSON (defaults to a sample Mage)
        #[arg(long)]
        actor: Option<PathBuf>,
    },
    /// Serialize the sample actor to JSON (stdout)
    ActorDump {
        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
}

#[derive(Parser)]
#[command(name = "idle-cli")]
#[command(about = "Action resolution harness")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = read_text_auto(path)?;
    if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
        EngineConfig::from_json_str(&text)
    } else {
        EngineConfig::from_yaml_str(&text)
    }
}

fn load_actor(path: Option<&Path>) -> anyhow::Result<Actor> {
    match path {
        Some(path) => Ok(serde_json::from_str(&read_text_auto(path)?)?),
        None => Ok(sample_mage()),
    }
}

fn sample_mage() -> Actor {
    let mut actor = Actor::new("Vera", "Mage", 12).with_mp(80);
    actor.position.map = "Norkos".into();
    actor
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Tier {
            ability,
            profession,
            level,
            abilities,
        } => {
            let registry = match abilities {
                Some(path) => AbilityRegistry::from_json(&read_text_auto(&path)?)?,
                None => content::ability_registry()?,
            };
            let def = registry
                .get(&ability)
                .ok_or_else(|| anyhow::anyhow!("unknown ability '{}'", ability))?;
            let actor = Actor::new("trainee", profession, level);
            match def.resolve_tier(&actor) {
                Some(tier) => println!(
                    "tier={} cost={} power={} element={}",
                    tier.name, tier.cost, tier.power, def.element
                ),
                None => println!("no tier"),
            }
        }
        Cmd::Weights {
            last_dir,
            drunk,
            config,
        } => {
            let cfg = load_config(config.as_deref())?;
            let weights = direction_weights(last_dir, drunk, &cfg.movement);
            // numpad layout, top row first
            for row in [[7u8, 8, 9], [4, 5, 6], [1, 2, 3]] {
                let line: Vec<String> = row
                    .iter()
                    .map(|&code| format!("{}:{:>6.2}", code, weights[usize::from(code - 1)]))
                    .collect();
                println!("{}", line.join("  "));
            }
        }
        Cmd::Walk {
            seed,
            ticks,
            map,
            map_id,
            actor,
            config,
            x,
            y,
            json,
        } => {
            let actor = load_actor(actor.as_deref())?;
            let engine = load_config(config.as_deref())?;
            let drunk = drunk_factor(&actor, &engine.movement);
            tracing::info!(actor = %actor.name, drunk, "starting walk");
            let res = simulate_walk(WalkConfig {
                map_path: map.map(|p| p.to_string_lossy().into_owned()),
                map_id: Some(map_id),
                actor,
                seed,
                ticks: Some(ticks),
                start: Some((x, y)),
                engine,
            })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&res)?);
            } else {
                for line in &res.log {
                    println!("{}", line);
                }
                println!(
                    "steps={} at {}, {} in {}",
                    res.path.len(),
                    res.actor.position.x,
                    res.actor.position.y,
                    res.actor.position.map
                );
            }
        }
        Cmd::Enter { map_id, x, y, actor } => {
            let map = content::builtin_map(&map_id)?;
            let mut actor = load_actor(actor.as_deref())?;
            let tile = map
                .tile_at(x, y)
                .ok_or_else(|| anyhow::anyhow!("{}, {} is outside {}", x, y, map.name))?;
            if !can_enter(&actor, tile) {
                println!("blocked");
                return Ok(());
            }
            actor.position.map = map.name.clone();
            actor.position.x = x;
            actor.position.y = y;
            actor.position.map_region = tile.region.clone();

            let mut dispatcher =
                TileDispatcher::new(EngineConfig::default(), content::location_table()?);
            let mut events = EventRegistry::new();
            let mut sink = EventLog::default();
            let outcome = dispatcher.on_enter_tile(&mut actor, tile, &mut events, &mut sink)?;
            println!("{:?}", outcome);
            for event in &sink.events {
                println!("{}", serde_json::to_string(event)?);
            }
        }
        Cmd::ActorDump { compact } => {
            let actor = sample_mage();
            if compact {
                println!("{}", serde_json::to_string(&actor)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&actor)?);
            }
        }
    }
    Ok(())
}
