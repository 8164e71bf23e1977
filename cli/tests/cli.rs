use assert_cmd::Command;
use predicates::prelude::*;

fn idle() -> Command {
    Command::cargo_bin("idle-cli").unwrap()
}

#[test]
fn tier_picks_the_highest_eligible_row() {
    idle()
        .args(["tier", "--ability", "MagicMissile", "--profession", "Mage", "--level", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "tier=Astral Flare cost=10 power=8 element=Energy",
        ));

    idle()
        .args(["tier", "--ability", "MagicMissile", "--profession", "Fighter", "--level", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no tier"));
}

#[test]
fn unknown_ability_fails() {
    idle()
        .args(["tier", "--ability", "Fireball", "--profession", "Mage", "--level", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown ability 'Fireball'"));
}

#[test]
fn weights_use_the_numpad_grid() {
    idle()
        .args(["weights", "--last-dir", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("6: 40.00"))
        .stdout(predicate::str::contains("5:  1.00"));
}

#[test]
fn config_files_may_carry_a_bom() {
    let dir = std::env::temp_dir().join(format!("idle-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("engine.yaml");
    std::fs::write(&path, "\u{feff}movement:\n  straight_weight: 20\n").unwrap();

    idle()
        .args(["weights", "--last-dir", "6", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("6: 20.00"));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn entering_tiles() {
    idle()
        .args(["enter", "--x", "2", "--y", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Arcanus, the Mage trainer"));

    idle()
        .args(["enter", "--x", "9", "--y", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("player:transfer"))
        .stdout(predicate::str::contains("The Maeles Dungeon"));

    idle()
        .args(["enter", "--x", "0", "--y", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("blocked"));
}

#[test]
fn walk_prints_the_log() {
    idle()
        .args(["walk", "--ticks", "10", "--seed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[START] Vera at 4, 4 in Norkos"));
}

#[test]
fn skirmish_runs_the_demo() {
    Command::cargo_bin("simulate-skirmish")
        .unwrap()
        .args(["--seed", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[END] winner="));

    Command::cargo_bin("simulate-skirmish")
        .unwrap()
        .args(["--seed", "9", "--samples", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("samples:            4"));
}

#[test]
fn actor_dump_is_pretty_unless_compact() {
    idle()
        .args(["actor-dump"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\n  \"name\": \"Vera\""));

    let out = idle().args(["actor-dump", "--compact"]).output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("{\"name\":\"Vera\""));
}

#[test]
fn unusable_config_is_an_error() {
    let dir = std::env::temp_dir().join(format!("idle-cli-bad-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("engine.yaml");
    std::fs::write(&path, "movement:\n  max_drunk: -1\n").unwrap();

    idle()
        .args(["weights", "--last-dir", "6", "--drunk", "3", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_drunk"));
    std::fs::remove_dir_all(&dir).ok();
}
