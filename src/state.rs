//! Client session state and the transitions that drive it.

use crate::{
    chain::Chain,
    gallery::IpfsGateway,
    notes::{
        BuildNote,
        InfluenceDepositNote,
        PackPurchaseNote,
    },
    repository::CityAsset,
    tiles::MapTile,
};
use serde::{
    Deserialize,
    Serialize,
};

#[cfg(test)]
mod tests;

/// Asset holding of the connected account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAsset {
    pub index: u64,
    pub amount: u64,
    pub decimals: u32,
    pub name: String,
    pub unit_name: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub frozen: bool,
}

impl AccountAsset {
    /// The native currency entry every account starts with.
    pub fn algo() -> Self {
        Self {
            index: 0,
            amount: 0,
            decimals: 6,
            name: "Algo".to_string(),
            unit_name: "Algo".to_string(),
            creator: String::new(),
            frozen: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Popup {
    Wallet,
    DepositInfluence,
    Build,
    About,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadingIndicator {
    pub is_loading: bool,
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    pub chain: Chain,
    pub gateway: IpfsGateway,
    pub address: Option<String>,
    pub accounts: Vec<String>,
    pub assets: Vec<AccountAsset>,
    pub influence_notes: Vec<InfluenceDepositNote>,
    pub build_notes: Vec<BuildNote>,
    pub pending_build_notes: Vec<BuildNote>,
    pub pack_purchases: Vec<PackPurchaseNote>,
    pub fetching_account_assets: bool,
    pub fetching_influence_notes: bool,
    pub fetching_build_notes: bool,
    pub fetching_pending_build_notes: bool,
    pub fetching_pack_purchases: bool,
    pub selected_deposit_asset: Option<CityAsset>,
    pub selected_build_tile: Option<MapTile>,
    pub is_wallet_popup_open: bool,
    pub is_deposit_influence_popup_open: bool,
    pub is_build_popup_open: bool,
    pub is_about_popup_open: bool,
    pub loading: LoadingIndicator,
    pub theme: Theme,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Chain::default())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    SwitchChain(Chain),
    SetGateway(IpfsGateway),
    /// Wallet session changed; the first account becomes active.
    SessionUpdated(Vec<String>),
    Disconnect,
    Reset,
    SelectDepositAsset(Option<CityAsset>),
    SelectBuildTile(Option<MapTile>),
    SetPopupOpen(Popup, bool),
    SetLoading(Option<String>),
    SetTheme(Theme),
    AccountAssetsRequested,
    AccountAssetsLoaded(Vec<AccountAsset>),
    InfluenceNotesRequested,
    InfluenceNotesLoaded(Vec<InfluenceDepositNote>),
    BuildNotesRequested,
    BuildNotesLoaded(Vec<BuildNote>),
    PendingBuildNotesRequested,
    PendingBuildNotesLoaded(Vec<BuildNote>),
    PackPurchasesRequested,
    PackPurchasesLoaded(Vec<PackPurchaseNote>),
}

impl AppState {
    pub fn new(chain: Chain) -> Self {
        Self {
            chain,
            gateway: IpfsGateway::default(),
            address: None,
            accounts: Vec::new(),
            assets: vec![AccountAsset::algo()],
            influence_notes: Vec::new(),
            build_notes: Vec::new(),
            pending_build_notes: Vec::new(),
            pack_purchases: Vec::new(),
            fetching_account_assets: false,
            fetching_influence_notes: false,
            fetching_build_notes: false,
            fetching_pending_build_notes: false,
            fetching_pack_purchases: false,
            selected_deposit_asset: None,
            selected_build_tile: None,
            is_wallet_popup_open: false,
            is_deposit_influence_popup_open: false,
            is_build_popup_open: false,
            is_about_popup_open: false,
            loading: LoadingIndicator::default(),
            theme: Theme::default(),
        }
    }

    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::SwitchChain(chain) => {
                if self.chain != chain {
                    self.chain = chain;
                    self.selected_deposit_asset = None;
                    self.selected_build_tile = None;
                }
            }
            Action::SetGateway(gateway) => self.gateway = gateway,
            Action::SessionUpdated(accounts) => {
                self.address = accounts.first().cloned();
                self.accounts = accounts;
            }
            Action::Disconnect | Action::Reset => *self = Self::new(self.chain),
            Action::SelectDepositAsset(asset) => self.selected_deposit_asset = asset,
            Action::SelectBuildTile(tile) => self.selected_build_tile = tile,
            Action::SetPopupOpen(popup, open) => match popup {
                Popup::Wallet => self.is_wallet_popup_open = open,
                Popup::DepositInfluence => self.is_deposit_influence_popup_open = open,
                Popup::Build => self.is_build_popup_open = open,
                Popup::About => self.is_about_popup_open = open,
            },
            Action::SetLoading(message) => {
                self.loading = LoadingIndicator {
                    is_loading: message.is_some(),
                    message,
                }
            }
            Action::SetTheme(theme) => self.theme = theme,
            Action::AccountAssetsRequested => self.fetching_account_assets = true,
            Action::AccountAssetsLoaded(assets) => {
                self.fetching_account_assets = false;
                self.assets = assets;
            }
            Action::InfluenceNotesRequested => self.fetching_influence_notes = true,
            Action::InfluenceNotesLoaded(notes) => {
                self.fetching_influence_notes = false;
                self.influence_notes = notes;
            }
            Action::BuildNotesRequested => self.fetching_build_notes = true,
            Action::BuildNotesLoaded(notes) => {
                self.fetching_build_notes = false;
                self.build_notes = notes;
            }
            Action::PendingBuildNotesRequested => self.fetching_pending_build_notes = true,
            Action::PendingBuildNotesLoaded(notes) => {
                self.fetching_pending_build_notes = false;
                self.pending_build_notes = notes;
            }
            Action::PackPurchasesRequested => self.fetching_pack_purchases = true,
            Action::PackPurchasesLoaded(purchases) => {
                self.fetching_pack_purchases = false;
                self.pack_purchases = purchases;
            }
        }
    }

    /// Indexes of assets held with a positive balance.
    pub fn held_asset_indexes(&self) -> Vec<u64> {
        self.assets
            .iter()
            .filter(|asset| asset.amount > 0)
            .map(|asset| asset.index)
            .collect()
    }

    pub fn asset(&self, index: u64) -> Option<&AccountAsset> {
        self.assets.iter().find(|asset| asset.index == index)
    }
}
