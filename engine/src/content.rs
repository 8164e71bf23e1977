use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::ability::AbilityRegistry;
use crate::interact::LocationTable;
use crate::tile::WorldMap;

pub fn builtin_abilities() -> &'static str {
    include_str!("../content/abilities.json")
}

pub fn builtin_locations() -> &'static str {
    include_str!("../content/locations.json")
}

pub fn builtin_maps() -> HashMap<&'static str, &'static str> {
    HashMap::from([("norkos", include_str!("../content/maps/norkos.json"))])
}

pub fn ability_registry() -> Result<AbilityRegistry> {
    AbilityRegistry::from_json(builtin_abilities())
}

pub fn location_table() -> Result<LocationTable> {
    LocationTable::from_json(builtin_locations())
}

pub fn builtin_map(id: &str) -> Result<WorldMap> {
    let maps = builtin_maps();
    let text = maps
        .get(id)
        .ok_or_else(|| anyhow!("unknown builtin map '{}'", id))?;
    WorldMap::from_json(text)
}
