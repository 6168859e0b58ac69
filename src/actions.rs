//! User-facing flows: fetch parameters, build the group, sign it, submit it.
//!
//! Each flow mints its own note id, so retrying a failed flow starts from a
//! fresh deposit rather than resubmitting an old one.

use crate::{
    ledger::{
        ParamsSource,
        SignError,
        Signer,
        Submitter,
        TxId,
    },
    notes::NoteId,
    transactions::{
        BuildRequest,
        InfluenceDepositRequest,
        PackPurchaseRequest,
        TransactionDescriptor,
        create_build_txns,
        create_influence_deposit_txns,
        create_opt_in_txns,
        create_pack_purchase_txns,
    },
};
use color_eyre::eyre::Report;
use serde::Serialize;
use thiserror::Error;
use tracing::{
    info,
    warn,
};


#[derive(Debug, Error)]
pub enum ActionError {
    #[error("failed to fetch transaction parameters: {0}")]
    Params(Report),
    #[error("transaction signing was cancelled")]
    Cancelled,
    #[error("wallet could not sign the transactions: {0}")]
    Signing(String),
    #[error("transaction submission failed: {0}")]
    Submission(Report),
}

impl ActionError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ActionError::Cancelled)
    }
}

impl From<SignError> for ActionError {
    fn from(err: SignError) -> Self {
        match err {
            SignError::Cancelled => ActionError::Cancelled,
            SignError::Wallet(reason) => ActionError::Signing(reason),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionReceipt {
    pub tx_id: TxId,
    /// Present for deposits, which are later matched against the
    /// processed-notes tables.
    pub note_id: Option<NoteId>,
}

async fn sign_and_submit<N, S>(
    node: &N,
    signer: &S,
    txns: &[TransactionDescriptor],
) -> Result<TxId, ActionError>
where
    N: Submitter,
    S: Signer,
{
    let signed = signer.sign_group(txns).await.inspect_err(|err| {
        warn!(error = %err, "signing did not complete, discarding group");
    })?;
    node.submit(&signed).await.map_err(ActionError::Submission)
}

pub async fn deposit_influence<N, S>(
    node: &N,
    signer: &S,
    request: &InfluenceDepositRequest,
) -> Result<ActionReceipt, ActionError>
where
    N: ParamsSource + Submitter,
    S: Signer,
{
    let note_id = NoteId::new();
    let params = node.suggested_params().await.map_err(ActionError::Params)?;
    let txns = create_influence_deposit_txns(&params, request, &note_id);
    info!(
        %note_id,
        asset_index = request.asset_index,
        amount = request.deposit_amount,
        "depositing influence"
    );
    let tx_id = sign_and_submit(node, signer, &txns).await?;
    Ok(ActionReceipt {
        tx_id,
        note_id: Some(note_id),
    })
}

pub async fn build_tile<N, S>(
    node: &N,
    signer: &S,
    request: &BuildRequest,
) -> Result<ActionReceipt, ActionError>
where
    N: ParamsSource + Submitter,
    S: Signer,
{
    let note_id = NoteId::new();
    let params = node.suggested_params().await.map_err(ActionError::Params)?;
    let txns = create_build_txns(&params, request, &note_id);
    info!(
        %note_id,
        tile = request.tile_index,
        object = %request.object_type,
        amount = request.deposit_amount,
        "building on tile"
    );
    let tx_id = sign_and_submit(node, signer, &txns).await?;
    Ok(ActionReceipt {
        tx_id,
        note_id: Some(note_id),
    })
}

pub async fn purchase_pack<N, S>(
    node: &N,
    signer: &S,
    request: &PackPurchaseRequest,
) -> Result<ActionReceipt, ActionError>
where
    N: ParamsSource + Submitter,
    S: Signer,
{
    let params = node.suggested_params().await.map_err(ActionError::Params)?;
    let txns = create_pack_purchase_txns(&params, request);
    info!(pack_id = request.pack.id, buyer = %request.buyer, "purchasing city pack");
    let tx_id = sign_and_submit(node, signer, &txns).await?;
    Ok(ActionReceipt {
        tx_id,
        note_id: None,
    })
}

pub async fn opt_in_assets<N, S>(
    node: &N,
    signer: &S,
    address: &str,
    asset_indexes: &[u64],
) -> Result<ActionReceipt, ActionError>
where
    N: ParamsSource + Submitter,
    S: Signer,
{
    let params = node.suggested_params().await.map_err(ActionError::Params)?;
    let txns = create_opt_in_txns(&params, address, asset_indexes, false);
    info!(%address, assets = ?asset_indexes, "opting in to assets");
    let tx_id = sign_and_submit(node, signer, &txns).await?;
    Ok(ActionReceipt {
        tx_id,
        note_id: None,
    })
}
