//! Capabilities consumed from the outside world: indexer queries, network
//! parameters, wallet signing and group submission.

use crate::transactions::{
    SuggestedParams,
    TransactionDescriptor,
};
use base64::{
    Engine as _,
    engine::general_purpose::STANDARD,
};
use color_eyre::eyre::Result;
use serde::{
    Deserialize,
    Serialize,
};
use std::fmt;
use thiserror::Error;

pub trait LedgerQuery {
    /// Fetch one page of transactions, continuing from `next` when given.
    fn search(
        &self,
        query: &TransactionQuery,
        next: Option<&str>,
    ) -> impl Future<Output = Result<TransactionPage>>;

    /// On-chain name of an asset, `None` when the asset is unknown.
    fn asset_name(&self, asset_index: u64) -> impl Future<Output = Result<Option<String>>>;
}

pub trait ParamsSource {
    fn suggested_params(&self) -> impl Future<Output = Result<SuggestedParams>>;
}

pub trait Signer {
    /// Sign the whole group in order. Entries with a logic signature are
    /// signed with it rather than by the user.
    fn sign_group(
        &self,
        txns: &[TransactionDescriptor],
    ) -> impl Future<Output = Result<Vec<SignedTransaction>, SignError>>;
}

pub trait Submitter {
    fn submit(&self, signed: &[SignedTransaction]) -> impl Future<Output = Result<TxId>>;
}

#[derive(Debug, Error)]
pub enum SignError {
    #[error("signing was cancelled by the user")]
    Cancelled,
    #[error("wallet failed to sign: {0}")]
    Wallet(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction(Vec<u8>);

impl SignedTransaction {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TxId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TxId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxType {
    Payment,
    AssetTransfer,
}

impl TxType {
    pub fn as_str(self) -> &'static str {
        match self {
            TxType::Payment => "pay",
            TxType::AssetTransfer => "axfer",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryScope {
    /// Transactions sent or received by one account.
    Account(String),
    /// Global transaction search, optionally narrowed to one address.
    Search { address: Option<String> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionQuery {
    pub scope: QueryScope,
    pub tx_type: Option<TxType>,
    /// Literal note prefix; the indexer expects it base64 encoded.
    pub note_prefix: Option<String>,
    pub min_round: Option<u64>,
    pub limit: u32,
}

impl TransactionQuery {
    pub fn account(address: impl Into<String>, limit: u32) -> Self {
        Self::with_scope(QueryScope::Account(address.into()), limit)
    }

    pub fn search(address: Option<String>, limit: u32) -> Self {
        Self::with_scope(QueryScope::Search { address }, limit)
    }

    fn with_scope(scope: QueryScope, limit: u32) -> Self {
        Self {
            scope,
            tx_type: None,
            note_prefix: None,
            min_round: None,
            limit,
        }
    }

    pub fn tx_type(mut self, tx_type: TxType) -> Self {
        self.tx_type = Some(tx_type);
        self
    }

    pub fn note_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.note_prefix = Some(prefix.into());
        self
    }

    pub fn min_round(mut self, round: u64) -> Self {
        self.min_round = Some(round);
        self
    }

    pub fn encoded_note_prefix(&self) -> Option<String> {
        self.note_prefix.as_ref().map(|prefix| STANDARD.encode(prefix))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TransactionPage {
    #[serde(default)]
    pub transactions: Vec<IndexerTransaction>,
    #[serde(rename = "next-token", default)]
    pub next_token: Option<String>,
}

/// Subset of the indexer transaction record this crate reads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IndexerTransaction {
    pub id: String,
    pub sender: String,
    /// Base64 note bytes.
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub confirmed_round: Option<u64>,
    #[serde(default)]
    pub round_time: Option<u64>,
    #[serde(default)]
    pub tx_type: Option<String>,
    #[serde(default)]
    pub payment_transaction: Option<PaymentDetails>,
    #[serde(default)]
    pub asset_transfer_transaction: Option<AssetTransferDetails>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub receiver: String,
    pub amount: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssetTransferDetails {
    pub receiver: String,
    pub amount: u64,
    pub asset_id: u64,
}
