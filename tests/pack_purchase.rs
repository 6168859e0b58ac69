#![allow(non_snake_case)]
use algoworld_explorer::{
    actions::{
        opt_in_assets,
        purchase_pack,
    },
    lookup::{
        lookup_pack_purchase_txns,
        parse_pack_purchase_txns,
    },
    notes::PackPurchaseNote,
    test_helpers::{
        FakeChainNode,
        FakeLedger,
        FakeSigner,
        page,
        pay_txn,
    },
    transactions::{
        CityPack,
        CityPackAsa,
        PACK_SWAP_NOTE,
        PackPurchaseRequest,
        TransactionKind,
        pack_assets_to_opt_in,
    },
};

const BUYER: &str = "BUYERADDR";
const CREATOR: &str = "PACKCREATOR";
const ESCROW: &str = "PACKESCROW";
const INCENTIVE: &str = "INCENTIVEWALLET";

fn pack() -> CityPack {
    CityPack {
        id: 7,
        creator: CREATOR.to_string(),
        escrow: ESCROW.to_string(),
        contract: "AiABASI=".to_string(),
        title: "Europe".to_string(),
        offered_asas: vec![
            CityPackAsa {
                id: 101,
                amount: 1,
                decimals: 0,
                title: "Paris".to_string(),
                url: String::new(),
            },
            CityPackAsa {
                id: 102,
                amount: 3,
                decimals: 2,
                title: "Rome".to_string(),
                url: String::new(),
            },
        ],
        requested_algo_amount: 5_000_000,
        requested_algo_wallet: CREATOR.to_string(),
        is_active: true,
        is_closed: false,
        last_swap_tx: String::new(),
    }
}

fn request() -> PackPurchaseRequest {
    PackPurchaseRequest {
        buyer: BUYER.to_string(),
        pack: pack(),
        incentive_wallet: INCENTIVE.to_string(),
        incentive_fee: 0,
    }
}

#[tokio::test]
async fn purchase_pack__escrow_transfers_follow_user_payments() {
    // given
    let node = FakeChainNode::new();
    let signer = FakeSigner::approving();

    // when
    let receipt = purchase_pack(&node, &signer, &request()).await.unwrap();

    // then
    let group = &signer.signed_groups()[0];
    let kinds: Vec<_> = group.iter().map(|txn| txn.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::UserFeeTransaction,
            TransactionKind::UserTransaction,
            TransactionKind::LsigTransaction,
            TransactionKind::LsigTransaction,
        ]
    );
    assert_eq!(group[0].payload().receiver, INCENTIVE);
    assert_eq!(group[0].payload().note_text(), PACK_SWAP_NOTE);
    assert_eq!(group[1].payload().note_text(), "awe_pp_7_BUYERADDR");
    assert_eq!(group[1].payload().amount, 5_000_000);
    assert_eq!(group[3].payload().sender, ESCROW);
    assert_eq!(group[3].payload().amount, 300);
    assert!(
        group[2..]
            .iter()
            .all(|txn| txn.logic_sig().is_some() && !txn.needs_user_signature())
    );
    assert_eq!(receipt.note_id, None);
}

#[tokio::test]
async fn opt_in_assets__covers_only_missing_pack_assets() {
    // given
    let node = FakeChainNode::new();
    let signer = FakeSigner::approving();
    let missing = pack_assets_to_opt_in(&pack(), &[0, 101]);

    // when
    opt_in_assets(&node, &signer, BUYER, &missing).await.unwrap();

    // then
    let group = &signer.signed_groups()[0];
    assert_eq!(missing, vec![102]);
    assert_eq!(group.len(), 1);
    assert_eq!(group[0].payload().asset_index(), Some(102));
    assert_eq!(group[0].payload().receiver, BUYER);
    assert_eq!(group[0].payload().amount, 0);
}

#[tokio::test]
async fn pack_purchases__only_payments_to_creator_are_listed() {
    // given
    let ledger = FakeLedger::with_pages(vec![page(
        vec![
            pay_txn("T1", BUYER, CREATOR, "awe_pp_7_BUYERADDR"),
            pay_txn("T2", BUYER, INCENTIVE, "awe_pp_7_BUYERADDR"),
            pay_txn("T3", BUYER, CREATOR, "awe_pp_x_BUYERADDR"),
        ],
        None,
    )]);

    // when
    let txns = lookup_pack_purchase_txns(&ledger, CREATOR, Some(BUYER)).await;
    let purchases = parse_pack_purchase_txns(&txns, CREATOR);

    // then
    assert_eq!(
        purchases,
        vec![PackPurchaseNote {
            pack_id: 7,
            buyer_address: BUYER.to_string(),
            tx_id: "T1".to_string(),
        }]
    );
}
