//! Eligibility rules for building on the shared 36 tile map.

use crate::{
    chain::SpecialTile,
    notes::BuildNote,
};
use serde::{
    Deserialize,
    Serialize,
};

#[cfg(test)]
mod tests;

pub const MAP_TILES: usize = 36;
pub const OUT_OF_MAP_RANGE: &str = "OutOfMapRange";
pub const PENDING_SUFFIX: &str = "_pending";
pub const PENDING_BUILDER: &str = "PENDING...";

/// Offset from a tile to the one drawn directly below it.
const BELOW_OFFSET: usize = 5;
/// Offset from a tile to the one drawn directly above it.
const ABOVE_OFFSET: usize = 7;
/// Price multiplier for a special object without the matching city card.
const MISSING_CITY_MULTIPLIER: u64 = 5;

pub const BASE_OBJECTS: [&str; 5] = ["Meadow", "Forest", "Water", "House", "Castle"];
pub const SPECIAL_OBJECTS: [&str; 6] = [
    "ArcdeTriomphe",
    "WhiteHouse",
    "Colosseum",
    "EmpireStateBuilding1",
    "EmpireStateBuilding2",
    "EmpireStateBuilding3",
];

/// Entry of the published tile map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTile {
    pub index: usize,
    pub object: String,
    #[serde(default)]
    pub builder: String,
    #[serde(default)]
    pub owner: String,
    pub cost: u64,
}

impl MapTile {
    pub fn is_pending(&self) -> bool {
        self.object.ends_with(PENDING_SUFFIX)
    }
}

fn object_at(map: &[MapTile], position: Option<usize>) -> &str {
    position
        .filter(|&position| position < MAP_TILES)
        .and_then(|position| map.get(position))
        .map_or(OUT_OF_MAP_RANGE, |tile| tile.object.as_str())
}

pub fn object_below<'a>(tile: &MapTile, map: &'a [MapTile]) -> &'a str {
    object_at(map, tile.index.checked_add(BELOW_OFFSET))
}

pub fn object_above<'a>(tile: &MapTile, map: &'a [MapTile]) -> &'a str {
    object_at(map, tile.index.checked_sub(ABOVE_OFFSET))
}

/// Objects the user may pick for `tile`. A special object already standing
/// anywhere on the map is unavailable, and Empire State Building parts stack
/// only on top of the previous part.
pub fn buildable_objects(
    tile: &MapTile,
    map: &[MapTile],
    special_tiles: &[SpecialTile],
) -> Vec<&'static str> {
    let below = object_below(tile, map);
    BASE_OBJECTS
        .iter()
        .chain(SPECIAL_OBJECTS.iter())
        .copied()
        .filter(|object| {
            let is_special = special_tiles.iter().any(|special| special.object == *object);
            let already_built = map.iter().any(|built| built.object.contains(object));
            !(is_special && already_built)
        })
        .filter(|object| match *object {
            "EmpireStateBuilding2" => below.contains("EmpireStateBuilding1"),
            "EmpireStateBuilding3" => below.contains("EmpireStateBuilding2"),
            _ => true,
        })
        .collect()
}

/// A tile holding up part of an Empire State Building cannot be rebuilt.
pub fn can_replace(tile: &MapTile, map: &[MapTile]) -> bool {
    !object_above(tile, map).contains("EmpireStateBuilding")
}

pub fn build_cost(
    tile: &MapTile,
    object: &str,
    special_tiles: &[SpecialTile],
    held_asset_indexes: &[u64],
) -> u64 {
    let missing_city_card = special_tiles.iter().any(|special| {
        special.object == object && !held_asset_indexes.contains(&special.city_asset)
    });
    if missing_city_card {
        tile.cost.saturating_mul(MISSING_CITY_MULTIPLIER)
    } else {
        tile.cost
    }
}

/// Whether a deposit of `cost` may be made to put `object` on `tile`.
pub fn can_deposit(
    tile: &MapTile,
    object: &str,
    map: &[MapTile],
    cost: u64,
    awt_balance: u64,
) -> bool {
    can_replace(tile, map) && awt_balance > cost && !tile.object.contains(object)
}

/// Overlay pending build notes on the map. Notes are expected newest first,
/// as the indexer returns them, so the newest note for a tile wins. A note's
/// asset index is the one based tile position.
pub fn apply_pending_builds(map: &[MapTile], pending: &[BuildNote]) -> Vec<MapTile> {
    let mut tiles = map.to_vec();
    for note in pending.iter().rev() {
        let position = usize::try_from(note.asset_index)
            .ok()
            .and_then(|index| index.checked_sub(1));
        if let Some(tile) = position.and_then(|position| tiles.get_mut(position)) {
            tile.object = format!("{}{PENDING_SUFFIX}", note.object);
            tile.builder = PENDING_BUILDER.to_string();
        }
    }
    tiles
}
