#![allow(non_snake_case)]
use algoworld_explorer::{
    actions::build_tile,
    chain::{
        Chain,
        OWNER_FEE_PC,
    },
    lookup::{
        lookup_pending_build_txns,
        parse_build_txns,
    },
    notes::BuildNote,
    test_helpers::{
        FakeChainNode,
        FakeLedger,
        FakeSigner,
        SignerMode,
        axfer_txn,
        page,
    },
    tiles::{
        MapTile,
        PENDING_BUILDER,
        apply_pending_builds,
        build_cost,
    },
    transactions::{
        BUILD_OWNER_FEE_NOTE,
        BuildRequest,
        PayloadKind,
    },
};

const USER: &str = "USERADDR";
const MANAGER: &str = "BUILDMGR";
const OWNER: &str = "TILEOWNER";
const AWT: u64 = 51_363_057;

fn request(deposit_amount: u64) -> BuildRequest {
    BuildRequest {
        sender: USER.to_string(),
        manager: MANAGER.to_string(),
        funding_fee: 1_000,
        deposit_amount,
        object_type: "House".to_string(),
        tile_index: 7,
        owner: OWNER.to_string(),
        awt_index: AWT,
        owner_fee_pc: OWNER_FEE_PC,
    }
}

#[tokio::test]
async fn build_tile__splits_deposit_between_manager_and_owner() {
    // given
    let node = FakeChainNode::new();
    let signer = FakeSigner::approving();

    // when
    let receipt = build_tile(&node, &signer, &request(1_000)).await.unwrap();

    // then
    let group = &signer.signed_groups()[0];
    assert_eq!(group.len(), 3);

    let manager_share = group[1].payload();
    assert_eq!(manager_share.receiver, MANAGER);
    assert_eq!(manager_share.amount, 500);
    assert_eq!(
        manager_share.kind,
        PayloadKind::AssetTransfer { asset_index: AWT }
    );
    let note = BuildNote::decode(&manager_share.note_text()).unwrap();
    assert_eq!(note.deposit, 1_000);
    assert_eq!(note.asset_index, 7);
    assert_eq!(note.object, "House");
    assert_eq!(Some(note.note_id), receipt.note_id);

    let owner_share = group[2].payload();
    assert_eq!(owner_share.receiver, OWNER);
    assert_eq!(owner_share.amount, 500);
    assert_eq!(owner_share.note_text(), BUILD_OWNER_FEE_NOTE);
}

#[tokio::test]
async fn build_tile__wallet_failure_reports_reason() {
    let node = FakeChainNode::new();
    let signer = FakeSigner::new(SignerMode::Fail);

    let err = build_tile(&node, &signer, &request(1_000)).await.unwrap_err();

    assert!(!err.is_cancelled());
    assert!(err.to_string().contains("device locked"));
    assert!(node.submitted().is_empty());
}

#[tokio::test]
async fn pending_builds__overlay_submitted_build_on_map() {
    // given
    let node = FakeChainNode::new();
    let signer = FakeSigner::approving();
    let map: Vec<MapTile> = (1..=8)
        .map(|index| MapTile {
            index,
            object: "Meadow".to_string(),
            builder: String::new(),
            owner: OWNER.to_string(),
            cost: 10,
        })
        .collect();
    let cost = build_cost(&map[6], "Colosseum", Chain::TestNet.special_tiles(), &[]);
    let colosseum = BuildRequest {
        object_type: "Colosseum".to_string(),
        ..request(cost)
    };
    build_tile(&node, &signer, &colosseum).await.unwrap();
    let note_text = signer.signed_groups()[0][1].payload().note_text();
    let ledger = FakeLedger::with_pages(vec![page(
        vec![axfer_txn("T1", USER, MANAGER, &note_text)],
        None,
    )]);

    // when
    let txns = lookup_pending_build_txns(&ledger, 900, MANAGER).await;
    let pending = parse_build_txns(&txns);
    let overlaid = apply_pending_builds(&map, &pending);

    // then
    assert_eq!(cost, 50);
    assert_eq!(overlaid[6].object, "Colosseum_pending");
    assert_eq!(overlaid[6].builder, PENDING_BUILDER);
    assert_eq!(overlaid[5], map[5]);
}
