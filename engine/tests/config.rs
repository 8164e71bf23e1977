use idle_engine::config::{EngineConfig, MovementConfig};

#[test]
fn defaults() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.trainer_cooldown, 10);
    assert_eq!(cfg.teleport_cooldown, 30);
    assert_eq!(cfg.movement.straight_weight, 40.0);
    assert_eq!(cfg.movement.drunk_traits.get("Drunk"), Some(&7.0));
}

#[test]
fn yaml_only_needs_what_changes() {
    let cfg = EngineConfig::from_yaml_str(
        "teleport_cooldown: 5\nmovement:\n  straight_weight: 20\n  drunk_traits:\n    Tipsy: 3\n",
    )
    .unwrap();
    assert_eq!(cfg.trainer_cooldown, 10);
    assert_eq!(cfg.teleport_cooldown, 5);
    assert_eq!(cfg.movement.straight_weight, 20.0);
    assert_eq!(cfg.movement.turn_weight, MovementConfig::default().turn_weight);
    assert_eq!(cfg.movement.drunk_traits.len(), 1);
    assert_eq!(cfg.movement.drunk_traits.get("Tipsy"), Some(&3.0));
}

#[test]
fn json_and_files() {
    let cfg = EngineConfig::from_json_str(r#"{ "trainer_cooldown": 2 }"#).unwrap();
    assert_eq!(cfg.trainer_cooldown, 2);
    assert_eq!(cfg.teleport_cooldown, 30);

    let dir = std::env::temp_dir().join(format!("idle-engine-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let json = dir.join("engine.json");
    let yaml = dir.join("engine.yaml");
    std::fs::write(&json, r#"{ "teleport_cooldown": 1 }"#).unwrap();
    std::fs::write(&yaml, "teleport_cooldown: 2\n").unwrap();

    assert_eq!(EngineConfig::load(&json).unwrap().teleport_cooldown, 1);
    assert_eq!(EngineConfig::load(&yaml).unwrap().teleport_cooldown, 2);
    assert!(EngineConfig::load(dir.join("missing.yaml")).is_err());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn bad_input_is_reported() {
    let err = EngineConfig::from_yaml_str("teleport_cooldown: soon").unwrap_err();
    assert!(format!("{:#}", err).contains("failed to parse engine config YAML"));
}

#[test]
fn unusable_movement_values_are_rejected() {
    let err = EngineConfig::from_yaml_str("movement:\n  max_drunk: -1\n").unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("invalid engine config"), "{}", msg);
    assert!(msg.contains("max_drunk"), "{}", msg);

    assert!(EngineConfig::from_yaml_str("movement:\n  max_drunk: 0\n").is_err());
    assert!(EngineConfig::from_yaml_str("movement:\n  max_drunk: .nan\n").is_err());
    assert!(EngineConfig::from_json_str(r#"{ "movement": { "turn_weight": -2 } }"#).is_err());

    let ok = EngineConfig::from_yaml_str("movement:\n  max_drunk: 20\n").unwrap();
    assert_eq!(ok.movement.max_drunk, 20.0);
    assert!(EngineConfig::default().validate().is_ok());
}
