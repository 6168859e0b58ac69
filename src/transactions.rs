//! Unsigned transaction descriptors and the batch builders that assemble one
//! atomic group per user action.
//!
//! Builders do no validation and no I/O: network parameters and the note id
//! are supplied by the caller, and the returned order is the order the group
//! must be signed and submitted in.

use crate::{
    amount::{
        split_owner_fee,
        to_base_units,
    },
    notes::{
        NoteId,
        encode_build_note,
        encode_influence_note,
        encode_pack_purchase_note,
    },
};
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;


pub const INFLUENCE_FEE_NOTE: &str = "I am a fee transaction for covering a fee that will be spend by manager wallet to update ARC69 tag within next 30 minutes :-)";
pub const BUILD_FEE_NOTE: &str = "I am a fee transaction for covering a fee that will be spend by manager wallet to update ARC69 tag within next minutes :-)";
pub const BUILD_OWNER_FEE_NOTE: &str =
    "AWT fee coming from a construction on your AlgoWorld Tile!";
pub const PACK_SWAP_NOTE: &str = "I am a asset transfer transaction to perform swap. thank you for using AlgoWorld Explorer! :-)";
pub const OPT_IN_NOTE: &str = "I am an asset opt-in transaction, thank you for using AlgoWorld Explorer";

/// Rounds a transaction stays valid for after `last-round`.
const VALIDITY_WINDOW: u64 = 1_000;

/// Network parameters as returned by algod `GET /v2/transactions/params`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SuggestedParams {
    pub fee: u64,
    pub min_fee: u64,
    pub genesis_id: String,
    pub genesis_hash: String,
    pub last_round: u64,
    #[serde(default)]
    pub consensus_version: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    UserTransaction,
    UserFeeTransaction,
    LsigTransaction,
}

/// Escrow program that authorizes transfers out of a program-controlled
/// account. Carried as the base64 program text, opaque to this crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicSig {
    pub program: String,
}

impl LogicSig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PayloadKind {
    #[serde(rename = "pay")]
    Payment,
    #[serde(rename = "axfer")]
    AssetTransfer { asset_index: u64 },
}

/// Raw content of one ledger transaction, before signing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub sender: String,
    pub receiver: String,
    pub amount: u64,
    #[serde(flatten)]
    pub kind: PayloadKind,
    #[serde(with = "base64_bytes")]
    pub note: Vec<u8>,
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_remainder_to: Option<String>,
}

impl TransactionPayload {
    pub fn payment(
        params: &SuggestedParams,
        sender: &str,
        receiver: &str,
        amount: u64,
        note: impl Into<Vec<u8>>,
    ) -> Self {
        Self::with_kind(params, sender, receiver, amount, PayloadKind::Payment, note)
    }

    pub fn asset_transfer(
        params: &SuggestedParams,
        sender: &str,
        receiver: &str,
        amount: u64,
        asset_index: u64,
        note: impl Into<Vec<u8>>,
    ) -> Self {
        Self::with_kind(
            params,
            sender,
            receiver,
            amount,
            PayloadKind::AssetTransfer { asset_index },
            note,
        )
    }

    fn with_kind(
        params: &SuggestedParams,
        sender: &str,
        receiver: &str,
        amount: u64,
        kind: PayloadKind,
        note: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount,
            kind,
            note: note.into(),
            fee: params.fee.max(params.min_fee),
            first_valid: params.last_round,
            last_valid: params.last_round.saturating_add(VALIDITY_WINDOW),
            genesis_id: params.genesis_id.clone(),
            genesis_hash: params.genesis_hash.clone(),
            close_remainder_to: None,
        }
    }

    pub fn asset_index(&self) -> Option<u64> {
        match self.kind {
            PayloadKind::AssetTransfer { asset_index } => Some(asset_index),
            PayloadKind::Payment => None,
        }
    }

    /// Note bytes as text, lossy for non UTF-8 content.
    pub fn note_text(&self) -> String {
        String::from_utf8_lossy(&self.note).into_owned()
    }
}

/// One unsigned transaction plus what the signing step needs to know about
/// it. A logic signature is present exactly when the kind is
/// `LsigTransaction`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedDescriptor")]
pub struct TransactionDescriptor {
    payload: TransactionPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signer: Option<LogicSig>,
    kind: TransactionKind,
}

impl TransactionDescriptor {
    pub fn user(payload: TransactionPayload) -> Self {
        Self {
            payload,
            signer: None,
            kind: TransactionKind::UserTransaction,
        }
    }

    pub fn user_fee(payload: TransactionPayload) -> Self {
        Self {
            payload,
            signer: None,
            kind: TransactionKind::UserFeeTransaction,
        }
    }

    pub fn lsig(payload: TransactionPayload, logic_sig: LogicSig) -> Self {
        Self {
            payload,
            signer: Some(logic_sig),
            kind: TransactionKind::LsigTransaction,
        }
    }

    pub fn payload(&self) -> &TransactionPayload {
        &self.payload
    }

    pub fn logic_sig(&self) -> Option<&LogicSig> {
        self.signer.as_ref()
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// True when the connected wallet has to sign this entry.
    pub fn needs_user_signature(&self) -> bool {
        self.kind != TransactionKind::LsigTransaction
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("escrow transaction carries no logic signature")]
    MissingLogicSig,
    #[error("{0:?} must not carry a logic signature")]
    UnexpectedLogicSig(TransactionKind),
}

#[derive(Deserialize)]
struct UncheckedDescriptor {
    payload: TransactionPayload,
    #[serde(default)]
    signer: Option<LogicSig>,
    kind: TransactionKind,
}

impl TryFrom<UncheckedDescriptor> for TransactionDescriptor {
    type Error = DescriptorError;

    fn try_from(raw: UncheckedDescriptor) -> Result<Self, Self::Error> {
        let UncheckedDescriptor {
            payload,
            signer,
            kind,
        } = raw;
        match (kind, signer) {
            (TransactionKind::LsigTransaction, Some(logic_sig)) => {
                Ok(Self::lsig(payload, logic_sig))
            }
            (TransactionKind::LsigTransaction, None) => Err(DescriptorError::MissingLogicSig),
            (TransactionKind::UserTransaction, None) => Ok(Self::user(payload)),
            (TransactionKind::UserFeeTransaction, None) => Ok(Self::user_fee(payload)),
            (kind, Some(_)) => Err(DescriptorError::UnexpectedLogicSig(kind)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InfluenceDepositRequest {
    pub sender: String,
    pub manager: String,
    pub funding_fee: u64,
    pub deposit_amount: u64,
    /// City asset whose influence is raised.
    pub asset_index: u64,
    /// Token deposited (AWT).
    pub influence_asset_index: u64,
}

/// Fee payment, then the token deposit carrying the influence note.
pub fn create_influence_deposit_txns(
    params: &SuggestedParams,
    request: &InfluenceDepositRequest,
    note_id: &NoteId,
) -> Vec<TransactionDescriptor> {
    let fee_txn = TransactionDescriptor::user_fee(TransactionPayload::payment(
        params,
        &request.sender,
        &request.manager,
        request.funding_fee,
        INFLUENCE_FEE_NOTE,
    ));

    let note = encode_influence_note(
        &request.manager,
        request.asset_index,
        request.deposit_amount,
        note_id,
    );
    let deposit_txn = TransactionDescriptor::user(TransactionPayload::asset_transfer(
        params,
        &request.sender,
        &request.manager,
        request.deposit_amount,
        request.influence_asset_index,
        note,
    ));

    vec![fee_txn, deposit_txn]
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildRequest {
    pub sender: String,
    pub manager: String,
    pub funding_fee: u64,
    pub deposit_amount: u64,
    pub object_type: String,
    /// Tile asset being built on.
    pub tile_index: u64,
    /// Current tile owner, receives the owner share of the deposit.
    pub owner: String,
    pub awt_index: u64,
    pub owner_fee_pc: f64,
}

/// Fee payment, manager share carrying the build note, owner share.
pub fn create_build_txns(
    params: &SuggestedParams,
    request: &BuildRequest,
    note_id: &NoteId,
) -> Vec<TransactionDescriptor> {
    let (manager_share, owner_share) =
        split_owner_fee(request.deposit_amount, request.owner_fee_pc);

    let fee_txn = TransactionDescriptor::user_fee(TransactionPayload::payment(
        params,
        &request.sender,
        &request.manager,
        request.funding_fee,
        BUILD_FEE_NOTE,
    ));

    let note = encode_build_note(
        &request.manager,
        request.tile_index,
        request.deposit_amount,
        &request.object_type,
        note_id,
    );
    let manager_txn = TransactionDescriptor::user(TransactionPayload::asset_transfer(
        params,
        &request.sender,
        &request.manager,
        manager_share,
        request.awt_index,
        note,
    ));

    let owner_txn = TransactionDescriptor::user(TransactionPayload::asset_transfer(
        params,
        &request.sender,
        &request.owner,
        owner_share,
        request.awt_index,
        BUILD_OWNER_FEE_NOTE,
    ));

    vec![fee_txn, manager_txn, owner_txn]
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityPackAsa {
    pub id: u64,
    pub amount: u64,
    pub decimals: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

/// Pack record as published in `cities/packs/*.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityPack {
    pub id: u64,
    pub creator: String,
    /// Address of the program-controlled escrow holding the offered assets.
    pub escrow: String,
    /// Base64 escrow program authorizing transfers out of `escrow`.
    pub contract: String,
    #[serde(default)]
    pub title: String,
    pub offered_asas: Vec<CityPackAsa>,
    pub requested_algo_amount: u64,
    #[serde(default)]
    pub requested_algo_wallet: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub last_swap_tx: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackPurchaseRequest {
    pub buyer: String,
    pub pack: CityPack,
    pub incentive_wallet: String,
    pub incentive_fee: u64,
}

/// Incentive fee, payment to the pack creator carrying the purchase note,
/// then one escrow-signed transfer per offered asset.
pub fn create_pack_purchase_txns(
    params: &SuggestedParams,
    request: &PackPurchaseRequest,
) -> Vec<TransactionDescriptor> {
    let pack = &request.pack;
    let escrow_lsig = LogicSig::new(pack.contract.clone());
    let mut txns = Vec::with_capacity(2 + pack.offered_asas.len());

    txns.push(TransactionDescriptor::user_fee(TransactionPayload::payment(
        params,
        &request.buyer,
        &request.incentive_wallet,
        request.incentive_fee,
        PACK_SWAP_NOTE,
    )));

    txns.push(TransactionDescriptor::user(TransactionPayload::payment(
        params,
        &request.buyer,
        &pack.creator,
        pack.requested_algo_amount,
        encode_pack_purchase_note(pack.id, &request.buyer),
    )));

    for asset in &pack.offered_asas {
        txns.push(TransactionDescriptor::lsig(
            TransactionPayload::asset_transfer(
                params,
                &pack.escrow,
                &request.buyer,
                to_base_units(asset.amount, asset.decimals),
                asset.id,
                PACK_SWAP_NOTE,
            ),
            escrow_lsig.clone(),
        ));
    }

    txns
}

/// Zero-amount self transfers opting `address` in to (or, with
/// `opt_out`, out of) each asset.
pub fn create_opt_in_txns(
    params: &SuggestedParams,
    address: &str,
    asset_indexes: &[u64],
    opt_out: bool,
) -> Vec<TransactionDescriptor> {
    asset_indexes
        .iter()
        .map(|&index| {
            let mut payload = TransactionPayload::asset_transfer(
                params,
                address,
                address,
                0,
                index,
                OPT_IN_NOTE,
            );
            if opt_out {
                payload.close_remainder_to = Some(address.to_string());
            }
            TransactionDescriptor::user(payload)
        })
        .collect()
}

/// Offered pack assets the holder is not yet opted in to, in pack order.
pub fn pack_assets_to_opt_in(pack: &CityPack, held_asset_indexes: &[u64]) -> Vec<u64> {
    pack.offered_asas
        .iter()
        .map(|asset| asset.id)
        .filter(|id| !held_asset_indexes.contains(id))
        .collect()
}

mod base64_bytes {
    use base64::{
        Engine as _,
        engine::general_purpose::STANDARD,
    };
    use serde::{
        Deserialize,
        Deserializer,
        Serializer,
        de::Error,
    };

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(D::Error::custom)
    }
}
