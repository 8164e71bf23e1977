use idle_engine::actor::Actor;
use idle_engine::effects::{attach_effect, tick_effects, Effect, EffectKind};

fn ticked(actor: &mut Actor) -> Vec<String> {
    let mut lines = Vec::new();
    tick_effects(actor, |line| lines.push(line));
    lines
}

#[test]
fn damage_over_time_then_expiry() {
    let mut actor = Actor::new("Vera", "Mage", 5);
    attach_effect(&mut actor, Effect::new(EffectKind::Poison, 3, 2));
    attach_effect(&mut actor, Effect::new(EffectKind::Venom, 2, 1));

    assert_eq!(
        ticked(&mut actor),
        vec![
            "[DOT][Vera] 100 → 93 (−7)".to_string(),
            "[EFFECT][Vera] Venom wears off".to_string(),
        ]
    );
    assert_eq!(actor.effects.len(), 1);
    assert!(actor.effects.has(&EffectKind::Poison));

    assert_eq!(
        ticked(&mut actor),
        vec![
            "[DOT][Vera] 93 → 90 (−3)".to_string(),
            "[EFFECT][Vera] Poison wears off".to_string(),
        ]
    );
    assert!(ticked(&mut actor).is_empty());
    assert_eq!(actor.hp.current, 90);
}

#[test]
fn stat_effects_are_reversed_on_expiry() {
    let mut actor = Actor::new("Brakka", "Fighter", 5);
    attach_effect(&mut actor, Effect::new(EffectKind::Shatter, 2, 1));
    attach_effect(
        &mut actor,
        Effect::new(EffectKind::StatBoost { stat: "str".into() }, 5, 2),
    );
    assert_eq!(actor.live_stat("con"), -2);
    assert_eq!(actor.live_stat("str"), 5);

    ticked(&mut actor);
    assert_eq!(actor.live_stat("con"), 0);
    assert_eq!(actor.live_stat("str"), 5);

    ticked(&mut actor);
    assert_eq!(actor.live_stat("str"), 0);
    assert!(actor.effects.is_empty());
}

#[test]
fn the_dead_take_no_damage_over_time() {
    let mut actor = Actor::new("Nim", "Rogue", 5);
    attach_effect(&mut actor, Effect::new(EffectKind::Venom, 4, 3));
    actor.hp.current = 0;
    let lines = ticked(&mut actor);
    assert!(lines.is_empty());
    assert_eq!(actor.hp.current, 0);
}

#[test]
fn names_parse_loosely() {
    assert_eq!(EffectKind::from_name(" Prone "), Some(EffectKind::Prone));
    assert_eq!(EffectKind::from_name("VENOM"), Some(EffectKind::Venom));
    assert_eq!(EffectKind::from_name("sparkle"), None);
}
