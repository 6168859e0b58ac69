//! Paginated ledger scans and note decoding.
//!
//! Lookups never fail: an indexer error at any page turns the whole lookup
//! into an empty list, so callers cannot tell "none yet" from "lookup
//! failed". Parsers skip every transaction whose note does not decode.

use crate::{
    chain::INDEXER_PAGE_SIZE,
    ledger::{
        IndexerTransaction,
        LedgerQuery,
        TransactionQuery,
        TxType,
    },
    notes::{
        BuildNote,
        InfluenceDepositNote,
        NoteDecodeError,
        PackPurchaseNote,
        build_prefix,
        influence_prefix,
        note_text_from_base64,
        pack_purchase_prefix,
    },
};
use color_eyre::eyre::Result;
use std::collections::{
    HashMap,
    HashSet,
};
use tracing::{
    debug,
    warn,
};


/// Follow continuation tokens until a page carries none. A token that was
/// already followed ends the scan.
pub async fn scan_pages<L: LedgerQuery>(
    ledger: &L,
    query: &TransactionQuery,
) -> Result<Vec<IndexerTransaction>> {
    let mut transactions = Vec::new();
    let mut seen_tokens = HashSet::new();
    let mut next: Option<String> = None;

    loop {
        let page = ledger.search(query, next.as_deref()).await?;
        transactions.extend(page.transactions);

        match page.next_token.filter(|token| !token.is_empty()) {
            Some(token) if seen_tokens.insert(token.clone()) => next = Some(token),
            Some(token) => {
                warn!(%token, "indexer repeated a continuation token, stopping scan");
                break;
            }
            None => break,
        }
    }

    Ok(transactions)
}

async fn scan_or_empty<L: LedgerQuery>(
    ledger: &L,
    query: &TransactionQuery,
    what: &str,
) -> Vec<IndexerTransaction> {
    match scan_pages(ledger, query).await {
        Ok(transactions) => {
            debug!(count = transactions.len(), what, "ledger scan finished");
            transactions
        }
        Err(err) => {
            warn!(error = %err, what, "ledger lookup failed, reporting no transactions");
            Vec::new()
        }
    }
}

/// Influence deposits sent by `address` to `manager`.
pub async fn lookup_influence_deposit_txns<L: LedgerQuery>(
    ledger: &L,
    address: &str,
    manager: &str,
) -> Vec<IndexerTransaction> {
    let query = TransactionQuery::account(address, INDEXER_PAGE_SIZE)
        .tx_type(TxType::AssetTransfer)
        .note_prefix(influence_prefix(manager));
    let transactions = scan_or_empty(ledger, &query, "influence deposits").await;
    sent_by(transactions, address)
}

/// Build deposits sent by `address` to `manager`.
pub async fn lookup_build_txns<L: LedgerQuery>(
    ledger: &L,
    address: &str,
    manager: &str,
) -> Vec<IndexerTransaction> {
    let query = TransactionQuery::account(address, INDEXER_PAGE_SIZE)
        .tx_type(TxType::AssetTransfer)
        .note_prefix(build_prefix(manager));
    let transactions = scan_or_empty(ledger, &query, "build deposits").await;
    sent_by(transactions, address)
}

/// Build deposits received by `manager` from any sender since `min_round`.
pub async fn lookup_pending_build_txns<L: LedgerQuery>(
    ledger: &L,
    min_round: u64,
    manager: &str,
) -> Vec<IndexerTransaction> {
    let query = TransactionQuery::account(manager, INDEXER_PAGE_SIZE)
        .tx_type(TxType::AssetTransfer)
        .note_prefix(build_prefix(manager))
        .min_round(min_round);
    scan_or_empty(ledger, &query, "pending builds").await
}

/// Pack purchase payments involving `buyer`, or every purchase made from
/// `manager` when no buyer is given.
pub async fn lookup_pack_purchase_txns<L: LedgerQuery>(
    ledger: &L,
    manager: &str,
    buyer: Option<&str>,
) -> Vec<IndexerTransaction> {
    let address = buyer.unwrap_or(manager).to_string();
    let query = TransactionQuery::search(Some(address), INDEXER_PAGE_SIZE)
        .tx_type(TxType::Payment)
        .note_prefix(pack_purchase_prefix());
    scan_or_empty(ledger, &query, "pack purchases").await
}

fn sent_by(transactions: Vec<IndexerTransaction>, address: &str) -> Vec<IndexerTransaction> {
    transactions
        .into_iter()
        .filter(|txn| txn.sender == address)
        .collect()
}

fn note_text(txn: &IndexerTransaction) -> Result<String, NoteDecodeError> {
    let note = txn.note.as_deref().ok_or(NoteDecodeError::Missing)?;
    note_text_from_base64(note)
}

fn skip<T>(txn: &IndexerTransaction, decoded: Result<T, NoteDecodeError>) -> Option<T> {
    match decoded {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(tx_id = %txn.id, error = %err, "skipping transaction with undecodable note");
            None
        }
    }
}

pub fn parse_influence_deposit_txns(txns: &[IndexerTransaction]) -> Vec<InfluenceDepositNote> {
    txns.iter()
        .filter_map(|txn| {
            skip(
                txn,
                note_text(txn).and_then(|text| InfluenceDepositNote::decode(&text)),
            )
        })
        .collect()
}

pub fn parse_build_txns(txns: &[IndexerTransaction]) -> Vec<BuildNote> {
    txns.iter()
        .filter_map(|txn| skip(txn, note_text(txn).and_then(|text| BuildNote::decode(&text))))
        .collect()
}

/// Purchases paid to `manager`; payments to anyone else are ignored.
pub fn parse_pack_purchase_txns(
    txns: &[IndexerTransaction],
    manager: &str,
) -> Vec<PackPurchaseNote> {
    txns.iter()
        .filter(|txn| {
            txn.payment_transaction
                .as_ref()
                .is_some_and(|payment| payment.receiver == manager)
        })
        .filter_map(|txn| {
            let decoded = note_text(txn).and_then(|text| PackPurchaseNote::decode(&text));
            skip(txn, decoded).map(|note| PackPurchaseNote {
                tx_id: txn.id.clone(),
                ..note
            })
        })
        .collect()
}

/// Fill `asset_title` from the on-chain asset name. Each asset is looked up
/// once; a failed lookup leaves the title empty.
pub async fn resolve_asset_titles<L: LedgerQuery>(ledger: &L, notes: &mut [InfluenceDepositNote]) {
    let mut titles: HashMap<u64, Option<String>> = HashMap::new();
    for note in notes.iter_mut() {
        if !titles.contains_key(&note.asset_index) {
            let title = match ledger.asset_name(note.asset_index).await {
                Ok(name) => name,
                Err(err) => {
                    warn!(asset_index = note.asset_index, error = %err, "failed to resolve asset name");
                    None
                }
            };
            titles.insert(note.asset_index, title);
        }
        note.asset_title = titles.get(&note.asset_index).cloned().flatten();
    }
}
