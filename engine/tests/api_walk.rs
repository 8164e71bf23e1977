use idle_engine::actor::Actor;
use idle_engine::api::{simulate_walk, WalkConfig};
use idle_engine::config::EngineConfig;
use idle_engine::content;
use idle_engine::interact::can_enter;
use serde_json::json;

fn walk_cfg(seed: u64) -> WalkConfig {
    WalkConfig {
        map_path: None,
        map_id: None,
        actor: Actor::new("Vera", "Mage", 12),
        seed,
        ticks: Some(60),
        start: Some((4, 4)),
        engine: EngineConfig::default(),
    }
}

fn write_map(name: &str, layout: serde_json::Value) -> String {
    let dir = std::env::temp_dir().join(format!("idle-engine-walk-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, layout.to_string()).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn every_step_is_enterable_and_counted() {
    let res = simulate_walk(walk_cfg(11)).unwrap();
    let map = content::builtin_map("norkos").unwrap();

    assert_eq!(res.log[0], "[START] Vera at 4, 4 in Norkos");
    assert_eq!(
        res.actor.statistics.get_stat("Character.Steps"),
        res.path.len() as i64
    );
    for step in &res.path {
        let tile = map.tile_at(step.x, step.y).expect("step stays on the map");
        assert!(can_enter(&res.actor, tile), "walked into {:?}", step);
        assert_ne!(step.dir, 5);
    }
}

#[test]
fn same_seed_same_walk() {
    let a = simulate_walk(walk_cfg(99)).unwrap();
    let b = simulate_walk(walk_cfg(99)).unwrap();
    assert_eq!(a.path, b.path);
    assert_eq!(a.log, b.log);
}

#[test]
fn boxed_in_actors_never_move() {
    let path = write_map(
        "box.json",
        json!({ "name": "Box", "rows": ["###", "#.#", "###"] }),
    );
    let mut cfg = walk_cfg(1);
    cfg.map_path = Some(path);
    cfg.start = Some((1, 1));
    cfg.ticks = Some(5);

    let res = simulate_walk(cfg).unwrap();
    assert!(res.path.is_empty());
    assert_eq!(res.actor.statistics.get_stat("Character.Steps"), 0);
    assert_eq!(res.log.iter().filter(|l| l.starts_with("[BLOCKED]")).count(), 5);
    assert_eq!((res.actor.position.x, res.actor.position.y), (1, 1));
}

#[test]
fn leaving_the_map_ends_the_walk() {
    let door = json!({
        "type": "Teleport",
        "name": "Portal",
        "properties": { "map": "Elsewhere", "destx": 1, "desty": 1, "movementType": "teleport" }
    });
    let objects: Vec<_> = [(1, 1), (2, 1), (3, 1), (1, 2), (3, 2), (1, 3), (2, 3), (3, 3)]
        .iter()
        .map(|(x, y)| {
            let mut placed = door.clone();
            placed["x"] = json!(x);
            placed["y"] = json!(y);
            placed
        })
        .collect();
    let path = write_map(
        "portals.json",
        json!({
            "name": "Ring",
            "rows": ["#####", "#...#", "#...#", "#...#", "#####"],
            "regions": [{ "name": "Ring Center", "x": 1, "y": 1, "w": 3, "h": 3 }],
            "objects": objects
        }),
    );
    let mut cfg = walk_cfg(5);
    cfg.map_path = Some(path);
    cfg.start = Some((2, 2));

    let res = simulate_walk(cfg).unwrap();
    assert_eq!(res.path.len(), 1);
    assert_eq!(res.actor.position.map, "Elsewhere");
    assert_eq!(res.actor.statistics.get_stat("Character.Maps.Ring"), 1);
    assert_eq!(res.actor.statistics.get_stat("Character.Regions.Ring Center"), 1);
    assert_eq!(res.actor.statistics.get_stat("Character.Movement.Teleport"), 1);
    assert_eq!(res.events.len(), 1);
    assert!(res.log.last().unwrap().starts_with("[LEAVE]"));
}

#[test]
fn unknown_builtin_map_is_an_error() {
    let mut cfg = walk_cfg(1);
    cfg.map_id = Some("atlantis".into());
    assert!(simulate_walk(cfg).is_err());
}
