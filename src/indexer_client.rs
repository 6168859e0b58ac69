use crate::ledger::{
    LedgerQuery,
    QueryScope,
    TransactionPage,
    TransactionQuery,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

/// Read-only client for the Algorand indexer REST API.
#[derive(Clone)]
pub struct IndexerClient {
    base_url: String,
    http: reqwest::Client,
}

impl IndexerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .build()
            .wrap_err("failed to build HTTP client for indexer")?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self, scope: &QueryScope) -> String {
        match scope {
            QueryScope::Account(address) => {
                format!("{}/v2/accounts/{}/transactions", self.base_url, address)
            }
            QueryScope::Search { .. } => format!("{}/v2/transactions", self.base_url),
        }
    }

    fn search_params(query: &TransactionQuery, next: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", query.limit.to_string())];
        if let QueryScope::Search {
            address: Some(address),
        } = &query.scope
        {
            params.push(("address", address.clone()));
        }
        if let Some(tx_type) = query.tx_type {
            params.push(("tx-type", tx_type.as_str().to_string()));
        }
        if let Some(prefix) = query.encoded_note_prefix() {
            params.push(("note-prefix", prefix));
        }
        if let Some(round) = query.min_round {
            params.push(("min-round", round.to_string()));
        }
        if let Some(token) = next {
            params.push(("next", token.to_string()));
        }
        params
    }
}

impl LedgerQuery for IndexerClient {
    async fn search(
        &self,
        query: &TransactionQuery,
        next: Option<&str>,
    ) -> Result<TransactionPage> {
        let url = self.search_url(&query.scope);
        let params = Self::search_params(query, next);
        debug!(%url, ?params, "querying indexer transactions");
        let res = self
            .http
            .get(url)
            .query(&params)
            .send()
            .await
            .wrap_err("indexer request failed")?;
        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "<unavailable body>".to_string());
            return Err(eyre!(
                "indexer responded with {status} when searching transactions: {body}"
            ));
        }
        res.json()
            .await
            .wrap_err("invalid indexer transactions payload")
    }

    async fn asset_name(&self, asset_index: u64) -> Result<Option<String>> {
        let url = format!("{}/v2/assets/{}", self.base_url, asset_index);
        let res = self
            .http
            .get(url)
            .send()
            .await
            .wrap_err("indexer request failed")?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = res.status();
        if !status.is_success() {
            return Err(eyre!(
                "indexer responded with {status} when fetching asset {asset_index}"
            ));
        }
        let dto: AssetLookupDto = res
            .json()
            .await
            .wrap_err("invalid indexer asset payload")?;
        Ok(dto.asset.params.name)
    }
}

#[derive(Deserialize)]
struct AssetLookupDto {
    asset: AssetDto,
}

#[derive(Deserialize)]
struct AssetDto {
    params: AssetParamsDto,
}

#[derive(Deserialize)]
struct AssetParamsDto {
    #[serde(default)]
    name: Option<String>,
}
