//! Gallery cards and the deterministic "featured today" selection.

use chrono::{
    Datelike,
    NaiveDate,
};
use color_eyre::eyre::{
    Report,
    eyre,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    str::FromStr,
};

pub const FEATURED_CARDS: usize = 3;
pub const CARDS_PER_PAGE: usize = 8;

/// Shown for cards whose image is not on IPFS.
const EMPTY_IMAGE_CID: &str = "QmXrsy5TddTiwDCXqGc2yzNowKs7WhCJfQ17rvHuArfnQp";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpfsGateway {
    #[default]
    AlgonodeIo,
    DwebLink,
}

impl IpfsGateway {
    pub fn host(self) -> &'static str {
        match self {
            IpfsGateway::AlgonodeIo => "ipfs.algonode.xyz",
            IpfsGateway::DwebLink => "dweb.link",
        }
    }
}

impl FromStr for IpfsGateway {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "algonode" | "ipfs.algonode.xyz" => Ok(IpfsGateway::AlgonodeIo),
            "dweb" | "dweb.link" => Ok(IpfsGateway::DwebLink),
            other => Err(eyre!("unknown IPFS gateway '{other}', expected algonode or dweb")),
        }
    }
}

/// Rewrite an `ipfs://` link to go through `gateway`.
pub fn to_ipfs_proxy_url(url: &str, gateway: IpfsGateway) -> String {
    let cid = url.strip_prefix("ipfs://").unwrap_or(EMPTY_IMAGE_CID);
    format!("https://{}/ipfs/{cid}", gateway.host())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CardType {
    #[default]
    Country,
    City,
    Special,
}

impl CardType {
    pub fn slug(self) -> &'static str {
        match self {
            CardType::Country => "country",
            CardType::City => "city",
            CardType::Special => "special",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for CardType {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "country" => Ok(CardType::Country),
            "city" => Ok(CardType::City),
            "special" => Ok(CardType::Special),
            other => Err(eyre!("unknown card type '{other}'")),
        }
    }
}

/// Card as listed in a gallery `database.json`. Fields this crate does not
/// read are kept as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GalleryCard {
    pub index: u64,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GalleryCard {
    /// Replace the card's `url` image link with its gateway form.
    pub fn with_proxied_image(mut self, gateway: IpfsGateway) -> Self {
        let proxied = self
            .extra
            .get("url")
            .and_then(|url| url.as_str())
            .map(|url| to_ipfs_proxy_url(url, gateway));
        if let Some(proxied) = proxied {
            self.extra.insert("url".to_string(), proxied.into());
        }
        self
    }
}

/// Mulberry32 generator; bit compatible with the browser gallery so every
/// client features the same cards on a given day.
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// `yyyymmdd` of `date` as a number.
pub fn daily_seed(date: NaiveDate) -> u32 {
    let year = u32::try_from(date.year()).unwrap_or_default();
    year * 10_000 + date.month() * 100 + date.day()
}

/// Fisher-Yates shuffle from the back driven by `seed`, then the first
/// `count` items.
pub fn seeded_selection<T: Clone>(items: &[T], count: usize, seed: u32) -> Vec<T> {
    let mut shuffled = items.to_vec();
    let mut prng = Mulberry32::new(seed);
    for i in (1..shuffled.len()).rev() {
        let j = (prng.next_f64() * (i + 1) as f64).floor() as usize;
        shuffled.swap(i, j);
    }
    shuffled.truncate(count);
    shuffled
}

pub fn daily_selection<T: Clone>(items: &[T], count: usize, date: NaiveDate) -> Vec<T> {
    seeded_selection(items, count, daily_seed(date))
}

/// Case-insensitive match on the name, or a substring of the index.
pub fn search_cards<'a>(cards: &'a [GalleryCard], needle: &str) -> Vec<&'a GalleryCard> {
    let needle = needle.to_lowercase();
    cards
        .iter()
        .filter(|card| {
            needle.is_empty()
                || card.name.to_lowercase().contains(&needle)
                || card.index.to_string().contains(&needle)
        })
        .collect()
}

pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let start = page.saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}
