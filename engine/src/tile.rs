use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Terrain {
    #[default]
    Ground,
    Water,
    Wall,
    Void,
}

/// Tile object types with a handler. Anything else is kept by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TileObjectType {
    Trainer,
    Teleport,
    Collectible,
    Other(String),
}

impl From<String> for TileObjectType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Trainer" => TileObjectType::Trainer,
            "Teleport" => TileObjectType::Teleport,
            "Collectible" => TileObjectType::Collectible,
            _ => TileObjectType::Other(s),
        }
    }
}

impl From<TileObjectType> for String {
    fn from(t: TileObjectType) -> Self {
        match t {
            TileObjectType::Trainer => "Trainer".to_string(),
            TileObjectType::Teleport => "Teleport".to_string(),
            TileObjectType::Collectible => "Collectible".to_string(),
            TileObjectType::Other(s) => s,
        }
    }
}

/// Free-form properties placed on a tile object by the map author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TileProperties {
    pub require_map: Option<String>,
    pub require_region: Option<String>,
    pub require_boss: Option<String>,
    pub require_class: Option<String>,
    pub require_achievement: Option<String>,
    pub require_collectible: Option<String>,
    pub force_event: Option<String>,

    // trainer
    pub real_name: Option<String>,

    // teleport
    #[serde(deserialize_with = "lenient_int")]
    pub destx: Option<i32>,
    #[serde(deserialize_with = "lenient_int")]
    pub desty: Option<i32>,
    pub map: Option<String>,
    pub to_loc: Option<String>,
    pub movement_type: Option<String>,
    pub from_name: Option<String>,
    pub dest_name: Option<String>,

    // collectible
    pub rarity: Option<String>,
    pub flavor_text: Option<String>,
    pub storyline: Option<String>,
}

/// Map editors often store numbers as strings; accept both.
fn lenient_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i32),
        Text(String),
    }

    match Option::<Raw>::deserialize(d)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileObject {
    #[serde(rename = "type", default)]
    pub kind: Option<TileObjectType>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: TileProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub object: Option<TileObject>,
}

impl Tile {
    pub fn ground() -> Self {
        Self::default()
    }

    pub fn void() -> Self {
        Self {
            terrain: Terrain::Void,
            ..Self::default()
        }
    }

    pub fn with_object(mut self, object: TileObject) -> Self {
        self.object = Some(object);
        self
    }

    pub fn properties(&self) -> Option<&TileProperties> {
        self.object.as_ref().map(|o| &o.properties)
    }
}

/* ---------------- maps ---------------- */

/// Authoring format: one string per row plus placed objects.
///
/// Legend: `.` ground, `~` water, `#` wall (blocked), anything else void.
#[derive(Debug, Clone, Deserialize)]
pub struct MapLayout {
    pub name: String,
    pub rows: Vec<String>,
    #[serde(default)]
    pub regions: Vec<RegionRect>,
    #[serde(default)]
    pub objects: Vec<PlacedObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionRect {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacedObject {
    pub x: i32,
    pub y: i32,
    #[serde(flatten)]
    pub object: TileObject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldMap {
    pub name: String,
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
}

impl WorldMap {
    pub fn from_layout(layout: MapLayout) -> Result<Self> {
        let height = layout.rows.len() as i32;
        let width = layout
            .rows
            .iter()
            .map(|r| r.chars().count())
            .max()
            .unwrap_or(0) as i32;

        let mut tiles = Vec::with_capacity((width * height) as usize);
        for row in &layout.rows {
            let mut cells: Vec<Tile> = row.chars().map(tile_for_glyph).collect();
            cells.resize(width as usize, Tile::void());
            tiles.extend(cells);
        }

        let mut map = Self {
            name: layout.name,
            width,
            height,
            tiles,
        };

        for rect in layout.regions {
            for y in rect.y..rect.y + rect.h {
                for x in rect.x..rect.x + rect.w {
                    if let Some(tile) = map.tile_at_mut(x, y) {
                        tile.region = Some(rect.name.clone());
                    }
                }
            }
        }

        for placed in layout.objects {
            let map_name = map.name.clone();
            let Some(tile) = map.tile_at_mut(placed.x, placed.y) else {
                bail!(
                    "object '{}' at {}, {} is outside map {}",
                    placed.object.name,
                    placed.x,
                    placed.y,
                    map_name
                );
            };
            tile.object = Some(placed.object);
        }

        Ok(map)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let layout: MapLayout = serde_json::from_str(text).context("failed to parse map layout")?;
        Self::from_layout(layout)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|i| &self.tiles[i])
    }

    pub fn tile_at_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).map(|i| &mut self.tiles[i])
    }
}

fn tile_for_glyph(c: char) -> Tile {
    match c {
        '.' => Tile::ground(),
        '~' => Tile {
            terrain: Terrain::Water,
            ..Tile::default()
        },
        '#' => Tile {
            terrain: Terrain::Wall,
            blocked: true,
            ..Tile::default()
        },
        _ => Tile::void(),
    }
}
