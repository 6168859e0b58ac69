#![allow(non_snake_case)]

use super::*;
use crate::{
    chain::Chain,
    notes::NoteId,
};

fn map_of(objects: &[(usize, &str)]) -> Vec<MapTile> {
    let mut map: Vec<MapTile> = (0..MAP_TILES)
        .map(|index| MapTile {
            index,
            object: "Meadow".to_string(),
            builder: "BUILDER".to_string(),
            owner: format!("OWNER{index}"),
            cost: 10,
        })
        .collect();
    for (index, object) in objects {
        map[*index].object = object.to_string();
    }
    map
}

fn build_note(asset_index: u64, object: &str) -> BuildNote {
    BuildNote {
        receiver: "MGR".to_string(),
        asset_index,
        deposit: 10,
        object: object.to_string(),
        note_id: NoteId::from("id"),
    }
}

#[test]
fn object_below__reads_out_of_range_past_the_last_row() {
    let map = map_of(&[(9, "Castle")]);

    assert_eq!(object_below(&map[4], &map), "Castle");
    assert_eq!(object_below(&map[31], &map), OUT_OF_MAP_RANGE);
    assert_eq!(object_above(&map[3], &map), OUT_OF_MAP_RANGE);
    assert_eq!(object_above(&map[7], &map), "Meadow");
}

#[test]
fn buildable_objects__offers_everything_on_an_empty_map_except_stacked_parts() {
    // given
    let map = map_of(&[]);

    // when
    let actual = buildable_objects(&map[0], &map, Chain::TestNet.special_tiles());

    // then
    assert_eq!(
        actual,
        vec![
            "Meadow",
            "Forest",
            "Water",
            "House",
            "Castle",
            "ArcdeTriomphe",
            "WhiteHouse",
            "Colosseum",
            "EmpireStateBuilding1",
        ]
    );
}

#[test]
fn buildable_objects__hides_special_objects_already_on_the_map() {
    let map = map_of(&[(20, "Colosseum"), (21, "WhiteHouse_pending")]);

    let actual = buildable_objects(&map[0], &map, Chain::MainNet.special_tiles());

    assert!(!actual.contains(&"Colosseum"));
    assert!(!actual.contains(&"WhiteHouse"));
    assert!(actual.contains(&"ArcdeTriomphe"));
}

#[test]
fn buildable_objects__stacks_empire_state_parts() {
    // given
    let map = map_of(&[(15, "EmpireStateBuilding1")]);

    // when
    let on_top = buildable_objects(&map[10], &map, &[]);

    // then
    assert!(on_top.contains(&"EmpireStateBuilding2"));
    assert!(!on_top.contains(&"EmpireStateBuilding3"));
}

#[test]
fn can_replace__protects_tiles_under_a_skyscraper() {
    let map = map_of(&[(3, "EmpireStateBuilding2")]);

    assert!(!can_replace(&map[10], &map));
    assert!(can_replace(&map[11], &map));
}

#[test]
fn build_cost__quintuples_special_objects_without_city_card() {
    // given
    let map = map_of(&[]);
    let specials = Chain::TestNet.special_tiles();

    // when
    let without_card = build_cost(&map[0], "Colosseum", specials, &[]);
    let with_card = build_cost(&map[0], "Colosseum", specials, &[22_889_001]);
    let regular = build_cost(&map[0], "House", specials, &[]);

    // then
    assert_eq!(without_card, 50);
    assert_eq!(with_card, 10);
    assert_eq!(regular, 10);
}

#[test]
fn can_deposit__requires_balance_above_cost_and_a_change() {
    let map = map_of(&[]);

    assert!(can_deposit(&map[0], "House", &map, 10, 11));
    assert!(!can_deposit(&map[0], "House", &map, 10, 10));
    assert!(!can_deposit(&map[0], "Meadow", &map, 10, 100));
}

#[test]
fn apply_pending_builds__newest_note_wins() {
    // given
    let map = map_of(&[]);
    let pending = vec![build_note(3, "Castle"), build_note(3, "Water"), build_note(1, "House")];

    // when
    let actual = apply_pending_builds(&map, &pending);

    // then
    assert_eq!(actual[2].object, "Castle_pending");
    assert_eq!(actual[2].builder, PENDING_BUILDER);
    assert!(actual[2].is_pending());
    assert_eq!(actual[0].object, "House_pending");
    assert_eq!(actual[1], map[1]);
}

#[test]
fn apply_pending_builds__ignores_positions_off_the_map() {
    let map = map_of(&[]);

    let actual = apply_pending_builds(&map, &[build_note(0, "Castle"), build_note(99, "Castle")]);

    assert_eq!(actual, map);
}
