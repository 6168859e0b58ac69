use crate::{
    ledger::{
        AssetTransferDetails,
        IndexerTransaction,
        LedgerQuery,
        ParamsSource,
        PaymentDetails,
        SignError,
        SignedTransaction,
        Signer,
        Submitter,
        TransactionPage,
        TransactionQuery,
        TxId,
    },
    transactions::{
        SuggestedParams,
        TransactionDescriptor,
    },
};
use base64::{
    Engine as _,
    engine::general_purpose::STANDARD,
};
use color_eyre::eyre::{
    Result,
    eyre,
};
use std::{
    collections::{
        HashMap,
        VecDeque,
    },
    sync::{
        Arc,
        Mutex,
    },
};

pub fn b64_note(text: &str) -> String {
    STANDARD.encode(text)
}

pub fn axfer_txn(id: &str, sender: &str, receiver: &str, note: &str) -> IndexerTransaction {
    IndexerTransaction {
        id: id.to_string(),
        sender: sender.to_string(),
        note: Some(b64_note(note)),
        confirmed_round: Some(1),
        tx_type: Some("axfer".to_string()),
        asset_transfer_transaction: Some(AssetTransferDetails {
            receiver: receiver.to_string(),
            amount: 0,
            asset_id: 0,
        }),
        ..Default::default()
    }
}

pub fn pay_txn(id: &str, sender: &str, receiver: &str, note: &str) -> IndexerTransaction {
    IndexerTransaction {
        id: id.to_string(),
        sender: sender.to_string(),
        note: Some(b64_note(note)),
        confirmed_round: Some(1),
        tx_type: Some("pay".to_string()),
        payment_transaction: Some(PaymentDetails {
            receiver: receiver.to_string(),
            amount: 0,
        }),
        ..Default::default()
    }
}

pub fn page(transactions: Vec<IndexerTransaction>, next_token: Option<&str>) -> TransactionPage {
    TransactionPage {
        transactions,
        next_token: next_token.map(str::to_string),
    }
}

pub fn test_params() -> SuggestedParams {
    SuggestedParams {
        fee: 0,
        min_fee: 1_000,
        genesis_id: "testnet-v1.0".to_string(),
        genesis_hash: "SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=".to_string(),
        last_round: 1_000,
        consensus_version: String::new(),
    }
}

/// Serves canned pages in order, then empty pages without a token.
#[derive(Clone, Default)]
pub struct FakeLedger {
    pages: Arc<Mutex<VecDeque<TransactionPage>>>,
    queries: Arc<Mutex<Vec<(TransactionQuery, Option<String>)>>>,
    fail_from_call: Option<usize>,
    asset_names: HashMap<u64, String>,
}

impl FakeLedger {
    pub fn with_pages(pages: Vec<TransactionPage>) -> Self {
        Self {
            pages: Arc::new(Mutex::new(pages.into())),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self::default().fail_from_call(0)
    }

    /// Every search from the zero-based call `index` onwards errors.
    pub fn fail_from_call(mut self, index: usize) -> Self {
        self.fail_from_call = Some(index);
        self
    }

    pub fn with_asset_name(mut self, asset_index: u64, name: &str) -> Self {
        self.asset_names.insert(asset_index, name.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<(TransactionQuery, Option<String>)> {
        self.queries.lock().unwrap().clone()
    }
}

impl LedgerQuery for FakeLedger {
    async fn search(
        &self,
        query: &TransactionQuery,
        next: Option<&str>,
    ) -> Result<TransactionPage> {
        let call = {
            let mut queries = self.queries.lock().unwrap();
            queries.push((query.clone(), next.map(str::to_string)));
            queries.len() - 1
        };
        if self.fail_from_call.is_some_and(|index| call >= index) {
            return Err(eyre!("indexer unavailable"));
        }
        Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn asset_name(&self, asset_index: u64) -> Result<Option<String>> {
        if self.fail_from_call == Some(0) {
            return Err(eyre!("indexer unavailable"));
        }
        Ok(self.asset_names.get(&asset_index).cloned())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignerMode {
    Approve,
    Cancel,
    Fail,
}

#[derive(Clone)]
pub struct FakeSigner {
    mode: SignerMode,
    signed_groups: Arc<Mutex<Vec<Vec<TransactionDescriptor>>>>,
}

impl FakeSigner {
    pub fn new(mode: SignerMode) -> Self {
        Self {
            mode,
            signed_groups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn approving() -> Self {
        Self::new(SignerMode::Approve)
    }

    pub fn signed_groups(&self) -> Vec<Vec<TransactionDescriptor>> {
        self.signed_groups.lock().unwrap().clone()
    }
}

impl Signer for FakeSigner {
    async fn sign_group(
        &self,
        txns: &[TransactionDescriptor],
    ) -> Result<Vec<SignedTransaction>, SignError> {
        match self.mode {
            SignerMode::Cancel => return Err(SignError::Cancelled),
            SignerMode::Fail => return Err(SignError::Wallet("device locked".to_string())),
            SignerMode::Approve => {}
        }
        self.signed_groups.lock().unwrap().push(txns.to_vec());
        Ok(txns
            .iter()
            .enumerate()
            .map(|(index, txn)| {
                SignedTransaction::new(format!("{index}:{}", txn.payload().sender).into_bytes())
            })
            .collect())
    }
}

/// Stands in for algod: serves parameters and records submitted groups.
#[derive(Clone, Default)]
pub struct FakeChainNode {
    fail_params: bool,
    fail_submit: bool,
    submitted: Arc<Mutex<Vec<Vec<SignedTransaction>>>>,
}

impl FakeChainNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_params(mut self) -> Self {
        self.fail_params = true;
        self
    }

    pub fn failing_submit(mut self) -> Self {
        self.fail_submit = true;
        self
    }

    pub fn submitted(&self) -> Vec<Vec<SignedTransaction>> {
        self.submitted.lock().unwrap().clone()
    }
}

impl ParamsSource for FakeChainNode {
    async fn suggested_params(&self) -> Result<SuggestedParams> {
        if self.fail_params {
            return Err(eyre!("algod unavailable"));
        }
        Ok(test_params())
    }
}

impl Submitter for FakeChainNode {
    async fn submit(&self, signed: &[SignedTransaction]) -> Result<TxId> {
        if self.fail_submit {
            return Err(eyre!("transaction rejected: overspend"));
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(signed.to_vec());
        Ok(TxId::from(format!("TX-{}", submitted.len())))
    }
}
