#![allow(non_snake_case)]

use super::*;
use crate::notes::NoteId;

fn tile() -> MapTile {
    MapTile {
        index: 4,
        object: "Forest".to_string(),
        builder: "B".to_string(),
        owner: "O".to_string(),
        cost: 10,
    }
}

fn city() -> CityAsset {
    CityAsset {
        index: 123,
        name: "Paris".to_string(),
        influence: 10,
        extra: Default::default(),
    }
}

fn influence_note() -> InfluenceDepositNote {
    InfluenceDepositNote {
        receiver: "MGR".to_string(),
        asset_index: 123,
        asset_title: None,
        influence_deposit: 5,
        note_id: NoteId::from("n1"),
    }
}

#[test]
fn switch_chain__clears_selections() {
    // given
    let mut state = AppState::new(Chain::TestNet);
    state.reduce(Action::SelectBuildTile(Some(tile())));
    state.reduce(Action::SelectDepositAsset(Some(city())));

    // when
    state.reduce(Action::SwitchChain(Chain::MainNet));

    // then
    assert_eq!(state.chain, Chain::MainNet);
    assert_eq!(state.selected_build_tile, None);
    assert_eq!(state.selected_deposit_asset, None);
}

#[test]
fn switch_chain__same_chain_keeps_selections() {
    let mut state = AppState::new(Chain::TestNet);
    state.reduce(Action::SelectBuildTile(Some(tile())));

    state.reduce(Action::SwitchChain(Chain::TestNet));

    assert_eq!(state.selected_build_tile, Some(tile()));
}

#[test]
fn reset__keeps_chain_and_drops_everything_else() {
    // given
    let mut state = AppState::new(Chain::MainNet);
    state.reduce(Action::SessionUpdated(vec!["A".to_string()]));
    state.reduce(Action::InfluenceNotesLoaded(vec![influence_note()]));
    state.reduce(Action::SetPopupOpen(Popup::Build, true));

    // when
    state.reduce(Action::Reset);

    // then
    assert_eq!(state, AppState::new(Chain::MainNet));
    assert_eq!(state.assets, vec![AccountAsset::algo()]);
}

#[test]
fn session_updated__first_account_becomes_active() {
    let mut state = AppState::default();

    state.reduce(Action::SessionUpdated(vec!["A".to_string(), "B".to_string()]));

    assert_eq!(state.address.as_deref(), Some("A"));
    assert_eq!(state.accounts.len(), 2);

    state.reduce(Action::Disconnect);
    assert_eq!(state.address, None);
}

#[test]
fn loaded_actions__clear_fetching_flags() {
    // given
    let mut state = AppState::default();
    state.reduce(Action::InfluenceNotesRequested);
    state.reduce(Action::PendingBuildNotesRequested);
    assert!(state.fetching_influence_notes);
    assert!(state.fetching_pending_build_notes);

    // when
    state.reduce(Action::InfluenceNotesLoaded(vec![influence_note()]));
    state.reduce(Action::PendingBuildNotesLoaded(Vec::new()));

    // then
    assert!(!state.fetching_influence_notes);
    assert!(!state.fetching_pending_build_notes);
    assert_eq!(state.influence_notes.len(), 1);
}

#[test]
fn set_loading__tracks_message() {
    let mut state = AppState::default();

    state.reduce(Action::SetLoading(Some("Signing...".to_string())));
    assert!(state.loading.is_loading);

    state.reduce(Action::SetLoading(None));
    assert_eq!(state.loading, LoadingIndicator::default());
}

#[test]
fn held_asset_indexes__skips_empty_balances() {
    let mut state = AppState::default();
    state.reduce(Action::AccountAssetsLoaded(vec![
        AccountAsset {
            amount: 3,
            ..AccountAsset::algo()
        },
        AccountAsset {
            index: 18_986_847,
            amount: 1,
            decimals: 0,
            name: "Paris".to_string(),
            unit_name: "AWC".to_string(),
            creator: String::new(),
            frozen: false,
        },
        AccountAsset {
            index: 22_889_001,
            amount: 0,
            decimals: 0,
            name: "Rome".to_string(),
            unit_name: "AWC".to_string(),
            creator: String::new(),
            frozen: false,
        },
    ]));

    assert_eq!(state.held_asset_indexes(), vec![0, 18_986_847]);
    assert_eq!(state.asset(22_889_001).map(|asset| asset.name.as_str()), Some("Rome"));
}
