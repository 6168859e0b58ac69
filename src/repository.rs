//! Static JSON files published by the AlgoWorld workers.

use crate::{
    chain::Chain,
    gallery::{
        CardType,
        GalleryCard,
    },
    processed::{
        ProcessedBuildTable,
        ProcessedInfluenceTable,
    },
    tiles::MapTile,
    transactions::CityPack,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use serde::{
    Deserialize,
    Serialize,
    de::DeserializeOwned,
};
use std::cmp::Reverse;
use tracing::{
    debug,
    warn,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PackListing {
    #[default]
    Available,
    Purchased,
}

impl PackListing {
    fn file_name(self) -> &'static str {
        match self {
            PackListing::Available => "available",
            PackListing::Purchased => "purchased",
        }
    }
}

/// Leaderboard entry from `cities/database.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityAsset {
    pub index: u64,
    pub name: String,
    #[serde(default)]
    pub influence: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Most influential city first; ties keep file order.
pub fn rank_cities(mut cities: Vec<CityAsset>) -> Vec<CityAsset> {
    cities.sort_by_key(|city| Reverse(city.influence));
    cities
}

#[derive(Clone)]
pub struct DataRepository {
    base_url: String,
    http: reqwest::Client,
}

impl DataRepository {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .build()
            .wrap_err("failed to build HTTP client for data repository")?;
        Ok(Self { base_url, http })
    }

    fn chain_data_url(&self, chain: Chain, path: &str) -> String {
        format!(
            "{}/{}/data/{}/{}",
            self.base_url,
            chain.slug(),
            chain.slug(),
            path
        )
    }

    pub fn cities_url(&self, chain: Chain) -> String {
        self.chain_data_url(chain, "cities/database.json")
    }

    pub fn packs_url(&self, chain: Chain, listing: PackListing) -> String {
        self.chain_data_url(chain, &format!("cities/packs/{}.json", listing.file_name()))
    }

    /// The tile map is only published from the testnet branch.
    pub fn tile_map_url(&self, chain: Chain) -> String {
        format!(
            "{}/testnet/data/{}/aw_build/database.json",
            self.base_url,
            chain.slug()
        )
    }

    pub fn gallery_url(&self, chain: Chain, card_type: CardType) -> String {
        self.chain_data_url(chain, &format!("{}/database.json", card_type.slug()))
    }

    pub fn processed_influence_url(&self, chain: Chain) -> String {
        self.chain_data_url(chain, "cities/influence/processed_notes.json")
    }

    pub fn processed_builds_url(&self, chain: Chain) -> String {
        self.chain_data_url(chain, "aw_build/processed_notes.json")
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        debug!(%url, "fetching data file");
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .wrap_err("data repository request failed")?;
        let status = res.status();
        if !status.is_success() {
            return Err(eyre!("data repository responded with {status} for {url}"));
        }
        res.json()
            .await
            .wrap_err_with(|| format!("invalid data file at {url}"))
    }

    pub async fn cities(&self, chain: Chain) -> Result<Vec<CityAsset>> {
        let cities = self.fetch_json(self.cities_url(chain)).await?;
        Ok(rank_cities(cities))
    }

    pub async fn packs(&self, chain: Chain, listing: PackListing) -> Result<Vec<CityPack>> {
        self.fetch_json(self.packs_url(chain, listing)).await
    }

    pub async fn tile_map(&self, chain: Chain) -> Result<Vec<MapTile>> {
        self.fetch_json(self.tile_map_url(chain)).await
    }

    pub async fn gallery(&self, chain: Chain, card_type: CardType) -> Result<Vec<GalleryCard>> {
        self.fetch_json(self.gallery_url(chain, card_type)).await
    }

    pub async fn processed_influence(&self, chain: Chain) -> Result<ProcessedInfluenceTable> {
        self.fetch_json(self.processed_influence_url(chain)).await
    }

    pub async fn processed_builds(&self, chain: Chain) -> Result<ProcessedBuildTable> {
        self.fetch_json(self.processed_builds_url(chain)).await
    }
}

/// Display callers show an empty table when a data file cannot be fetched.
pub fn or_empty<T: Default>(result: Result<T>, what: &str) -> T {
    result.unwrap_or_else(|err| {
        warn!(error = %err, what, "data file unavailable, showing nothing");
        T::default()
    })
}
