pub mod actions;
pub mod algod_client;
pub mod amount;
pub mod chain;
pub mod config;
pub mod gallery;
pub mod indexer_client;
pub mod ledger;
pub mod logging;
pub mod lookup;
pub mod notes;
pub mod processed;
pub mod repository;
pub mod state;
pub mod test_helpers;
pub mod tiles;
pub mod transactions;
