use crate::chain::{
    BUILD_MANAGER_ADDRESS,
    CITY_MANAGER_ADDRESS,
    CITY_PACK_INCENTIVE_FEE,
    CITY_PACK_INCENTIVE_WALLET,
    Chain,
    DEFAULT_DATA_REPOSITORY_URL,
    DEFAULT_FUNDING_FEE,
    OWNER_FEE_PC,
};
use clap::Args;
use color_eyre::eyre::{
    Result,
    eyre,
};
use std::path::PathBuf;

/// Connection and fee options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(long, env = "ALGOWORLD_CHAIN", default_value = "testnet", global = true)]
    pub chain: Chain,

    #[arg(long, env = "ALGOWORLD_INDEXER_URL", global = true)]
    pub indexer_url: Option<String>,

    #[arg(long, env = "ALGOWORLD_ALGOD_URL", global = true)]
    pub algod_url: Option<String>,

    #[arg(long, env = "ALGOWORLD_DATA_URL", global = true)]
    pub data_url: Option<String>,

    #[arg(long, default_value_t = DEFAULT_FUNDING_FEE, global = true)]
    pub funding_fee: u64,

    #[arg(long, default_value_t = OWNER_FEE_PC, global = true)]
    pub owner_fee_pc: f64,

    #[arg(long, default_value = CITY_MANAGER_ADDRESS, global = true)]
    pub city_manager: String,

    #[arg(long, default_value = BUILD_MANAGER_ADDRESS, global = true)]
    pub build_manager: String,

    /// Also write logs to daily files in this directory.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub chain: Chain,
    pub indexer_url: String,
    pub algod_url: String,
    pub data_url: String,
    pub funding_fee: u64,
    pub owner_fee_pc: f64,
    pub city_manager: String,
    pub build_manager: String,
    pub incentive_wallet: String,
    pub incentive_fee: u64,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn for_chain(chain: Chain) -> Self {
        Self {
            chain,
            indexer_url: chain.default_indexer_url().to_string(),
            algod_url: chain.default_algod_url().to_string(),
            data_url: DEFAULT_DATA_REPOSITORY_URL.to_string(),
            funding_fee: DEFAULT_FUNDING_FEE,
            owner_fee_pc: OWNER_FEE_PC,
            city_manager: CITY_MANAGER_ADDRESS.to_string(),
            build_manager: BUILD_MANAGER_ADDRESS.to_string(),
            incentive_wallet: CITY_PACK_INCENTIVE_WALLET.to_string(),
            incentive_fee: CITY_PACK_INCENTIVE_FEE,
            log_dir: None,
        }
    }
}

impl TryFrom<ConfigArgs> for Config {
    type Error = color_eyre::eyre::Report;

    fn try_from(args: ConfigArgs) -> Result<Self> {
        if !(0.0..=1.0).contains(&args.owner_fee_pc) {
            return Err(eyre!(
                "--owner-fee-pc must be between 0 and 1, got {}",
                args.owner_fee_pc
            ));
        }
        let defaults = Config::for_chain(args.chain);
        Ok(Self {
            indexer_url: args.indexer_url.unwrap_or(defaults.indexer_url),
            algod_url: args.algod_url.unwrap_or(defaults.algod_url),
            data_url: args.data_url.unwrap_or(defaults.data_url),
            funding_fee: args.funding_fee,
            owner_fee_pc: args.owner_fee_pc,
            city_manager: args.city_manager,
            build_manager: args.build_manager,
            log_dir: args.log_dir,
            ..defaults
        })
    }
}
