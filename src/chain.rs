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

pub const CITY_MANAGER_ADDRESS: &str =
    "TSYD5NUVJZLYB3MDFZSAVCSXDDH3ZABDDUARUDAWTU7KVMNVHCH2NQOYWE";
pub const BUILD_MANAGER_ADDRESS: &str =
    "75BMV3IXUMULXWV4JCCEET3OXZQU5J32J5CZ62A4DOH4HHF3KTFFX56ZZQ";
pub const CITY_PACK_INCENTIVE_WALLET: &str =
    "RJVRGSPGSPOG7W3V7IMZZ2BAYCABW3YC5MWGKEOPAEEI5ZK5J2GSF6Y26A";
pub const CITY_PACK_INCENTIVE_FEE: u64 = 0;

/// Share of a build deposit paid to the current tile owner.
pub const OWNER_FEE_PC: f64 = 0.5;
/// Flat amount (microalgos) paid to a manager wallet to cover its follow-up
/// ARC69 update transaction.
pub const DEFAULT_FUNDING_FEE: u64 = 1_000;
pub const INDEXER_PAGE_SIZE: u32 = 100;

pub const DEFAULT_DATA_REPOSITORY_URL: &str =
    "https://raw.githubusercontent.com/AlgoWorldNFT/algoworld-workers";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Chain {
    MainNet,
    #[default]
    TestNet,
}

impl Chain {
    /// Lowercase name used in data file paths and persisted settings.
    pub fn slug(self) -> &'static str {
        match self {
            Chain::MainNet => "mainnet",
            Chain::TestNet => "testnet",
        }
    }

    pub fn default_indexer_url(self) -> &'static str {
        match self {
            Chain::MainNet => "https://mainnet-idx.algonode.cloud",
            Chain::TestNet => "https://testnet-idx.algonode.cloud",
        }
    }

    pub fn default_algod_url(self) -> &'static str {
        match self {
            Chain::MainNet => "https://mainnet-api.algonode.cloud",
            Chain::TestNet => "https://testnet-api.algonode.cloud",
        }
    }

    pub fn explorer_url(self) -> &'static str {
        match self {
            Chain::MainNet => "https://allo.info",
            Chain::TestNet => "https://testnet.allo.info",
        }
    }

    pub fn explorer_tx_url(self, tx_id: &str) -> String {
        format!("{}/tx/{tx_id}", self.explorer_url())
    }

    /// AlgoWorld Token, the asset deposited for influence and builds.
    pub fn awt_asset_id(self) -> u64 {
        match self {
            Chain::MainNet => 233_939_122,
            Chain::TestNet => 51_363_057,
        }
    }

    pub fn special_tiles(self) -> &'static [SpecialTile] {
        match self {
            Chain::MainNet => SPECIAL_TILES_MAINNET,
            Chain::TestNet => SPECIAL_TILES_TESTNET,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Chain::MainNet => "MainNet",
            Chain::TestNet => "TestNet",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Chain {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Chain::MainNet),
            "testnet" => Ok(Chain::TestNet),
            other => Err(eyre!("unknown chain '{other}', expected mainnet or testnet")),
        }
    }
}

/// A buildable landmark that is tied to holding a specific city asset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SpecialTile {
    pub object: &'static str,
    pub city_asset: u64,
}

const SPECIAL_TILES_MAINNET: &[SpecialTile] = &[
    SpecialTile {
        object: "ArcdeTriomphe",
        city_asset: 271_518_216,
    },
    SpecialTile {
        object: "WhiteHouse",
        city_asset: 276_086_752,
    },
    SpecialTile {
        object: "Colosseum",
        city_asset: 273_858_077,
    },
    SpecialTile {
        object: "EmpireStateBuilding1",
        city_asset: 271_106_498,
    },
    SpecialTile {
        object: "EmpireStateBuilding2",
        city_asset: 271_106_498,
    },
    SpecialTile {
        object: "EmpireStateBuilding3",
        city_asset: 271_106_498,
    },
];

const SPECIAL_TILES_TESTNET: &[SpecialTile] = &[
    SpecialTile {
        object: "ArcdeTriomphe",
        city_asset: 18_986_847,
    },
    SpecialTile {
        object: "WhiteHouse",
        city_asset: 18_986_847,
    },
    SpecialTile {
        object: "Colosseum",
        city_asset: 22_889_001,
    },
    SpecialTile {
        object: "EmpireStateBuilding1",
        city_asset: 18_986_847,
    },
    SpecialTile {
        object: "EmpireStateBuilding2",
        city_asset: 18_986_847,
    },
    SpecialTile {
        object: "EmpireStateBuilding3",
        city_asset: 18_986_847,
    },
];
