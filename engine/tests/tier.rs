use idle_engine::actor::{Actor, Collectible};
use idle_engine::{resolve_tier, Roster, Tier};
use proptest::prelude::*;

fn tier(name: &str, profession: &str, level: u32, cost: i64, power: i64) -> Tier {
    Tier {
        name: name.to_string(),
        profession: profession.to_string(),
        level,
        cost,
        power,
        collectibles: vec![],
    }
}

fn tome() -> Collectible {
    Collectible {
        name: "Ancient Tome".into(),
        map: "Norkos".into(),
        region: None,
        rarity: "rare".into(),
        description: None,
        storyline: None,
        found_at: chrono::Utc::now(),
    }
}

#[test]
fn level_twelve_mage_gets_the_level_ten_tier() {
    let tiers = vec![
        tier("Magic Missile", "Mage", 1, 5, 3),
        tier("Astral Flare", "Mage", 10, 10, 8),
    ];
    let mage = Actor::new("Vera", "Mage", 12).with_mp(12);
    let picked = resolve_tier(&tiers, &mage).expect("tier");
    assert_eq!(picked.name, "Astral Flare");
    assert_eq!(picked.cost, 10);
    assert_eq!(picked.power, 8);
}

#[test]
fn wrong_profession_or_low_level_gets_nothing() {
    let tiers = vec![tier("Cure", "Cleric", 5, 10, 5)];
    assert!(resolve_tier(&tiers, &Actor::new("Vera", "Mage", 40)).is_none());
    assert!(resolve_tier(&tiers, &Actor::new("Osric", "Cleric", 4)).is_none());
    assert!(resolve_tier(&[], &Actor::new("Osric", "Cleric", 4)).is_none());
}

#[test]
fn secondary_profession_counts() {
    let tiers = vec![tier("Cure", "Cleric", 1, 10, 5)];
    let mut mage = Actor::new("Vera", "Mage", 3);
    assert!(resolve_tier(&tiers, &mage).is_none());
    mage.secondary_professions.insert("Cleric".into());
    assert_eq!(resolve_tier(&tiers, &mage).map(|t| t.name.as_str()), Some("Cure"));
}

#[test]
fn last_match_wins_even_when_unsorted() {
    let tiers = vec![
        tier("Big", "Mage", 20, 30, 20),
        tier("Small", "Mage", 1, 5, 3),
    ];
    let mage = Actor::new("Vera", "Mage", 25);
    assert_eq!(resolve_tier(&tiers, &mage).map(|t| t.name.as_str()), Some("Small"));
}

#[test]
fn collectible_gate_reads_the_owner_of_a_pet() {
    let mut gated = tier("Astral Storm", "Mage", 1, 40, 20);
    gated.collectibles = vec!["Ancient Tome".into()];
    let tiers = vec![tier("Magic Missile", "Mage", 1, 5, 3), gated];

    let mut roster = Roster::new();
    let owner = roster.spawn(Actor::new("Vera", "Mage", 30));
    let mut pet = Actor::new("Sparky", "Mage", 5);
    pet.collectibles.add(tome());
    assert_eq!(resolve_tier(&tiers, &pet).unwrap().name, "Astral Storm");

    // The pet itself owning the tome does not matter once it has an owner.
    pet.owner = Some(owner);
    let pet = roster.spawn(pet);
    let subject = roster.subject(pet).unwrap();
    assert_eq!(subject.progression().name, "Vera");
    assert_eq!(resolve_tier(&tiers, subject).unwrap().name, "Magic Missile");

    // The owner's live record answers, not a snapshot taken at spawn.
    roster.get_mut(owner).unwrap().collectibles.add(tome());
    let subject = roster.subject(pet).unwrap();
    assert_eq!(resolve_tier(&tiers, subject).unwrap().name, "Astral Storm");
}

#[test]
fn builtin_table_resolves() {
    let registry = idle_engine::content::ability_registry().unwrap();
    let missile = registry.get("MagicMissile").unwrap();
    let mage = Actor::new("Vera", "Mage", 12);
    assert_eq!(missile.resolve_tier(&mage).unwrap().name, "Astral Flare");

    let rogue = Actor::new("Nim", "Rogue", 1);
    let strike = registry.get("VenomStrike").unwrap();
    assert_eq!(strike.resolve_tier(&rogue).unwrap().power, 5);
}

proptest! {
    #[test]
    fn picks_highest_index_that_passes(
        rows in prop::collection::vec((prop::bool::ANY, 0u32..20), 0..12),
        level in 0u32..20,
    ) {
        let tiers: Vec<Tier> = rows
            .iter()
            .enumerate()
            .map(|(i, (is_mage, lvl))| {
                tier(&format!("t{}", i), if *is_mage { "Mage" } else { "Cleric" }, *lvl, 1, 1)
            })
            .collect();
        let actor = Actor::new("Vera", "Mage", level);

        let expected = tiers
            .iter()
            .rposition(|t| t.profession == "Mage" && t.level <= level);
        let got = resolve_tier(&tiers, &actor)
            .map(|t| tiers.iter().position(|c| std::ptr::eq(c, t)).unwrap());
        prop_assert_eq!(got, expected);
    }
}
