use crate::{
    ledger::{
        ParamsSource,
        SignedTransaction,
        Submitter,
        TxId,
    },
    transactions::SuggestedParams,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use serde::Deserialize;
use tracing::info;

/// Client for the algod node: network parameters and group submission.
#[derive(Clone)]
pub struct AlgodClient {
    base_url: String,
    http: reqwest::Client,
}

impl AlgodClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .build()
            .wrap_err("failed to build HTTP client for algod")?;
        Ok(Self { base_url, http })
    }
}

impl ParamsSource for AlgodClient {
    async fn suggested_params(&self) -> Result<SuggestedParams> {
        let url = format!("{}/v2/transactions/params", self.base_url);
        let res = self
            .http
            .get(url)
            .send()
            .await
            .wrap_err("algod request failed")?;
        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "<unavailable body>".to_string());
            return Err(eyre!(
                "algod responded with {status} when fetching transaction params: {body}"
            ));
        }
        res.json()
            .await
            .wrap_err("invalid algod transaction params payload")
    }
}

impl Submitter for AlgodClient {
    async fn submit(&self, signed: &[SignedTransaction]) -> Result<TxId> {
        let url = format!("{}/v2/transactions", self.base_url);
        let body = concat_group(signed);
        let res = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/x-binary")
            .body(body)
            .send()
            .await
            .wrap_err("algod request failed")?;
        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "<unavailable body>".to_string());
            return Err(eyre!(
                "algod responded with {status} when submitting transactions: {body}"
            ));
        }
        let dto: SubmitResponseDto = res
            .json()
            .await
            .wrap_err("invalid algod submission payload")?;
        info!(tx_id = %dto.tx_id, group_size = signed.len(), "submitted transaction group");
        Ok(TxId::from(dto.tx_id))
    }
}

/// Signed group as algod expects it: raw msgpack entries back to back.
fn concat_group(signed: &[SignedTransaction]) -> Vec<u8> {
    signed
        .iter()
        .flat_map(|txn| txn.as_bytes().iter().copied())
        .collect()
}

#[derive(Deserialize)]
struct SubmitResponseDto {
    #[serde(rename = "txId")]
    tx_id: String,
}
