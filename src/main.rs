use algoworld_explorer::{
    algod_client::AlgodClient,
    amount::{
        format_amount,
        shorten_address,
    },
    chain::Chain,
    config::{
        Config,
        ConfigArgs,
    },
    gallery::{
        CARDS_PER_PAGE,
        CardType,
        FEATURED_CARDS,
        IpfsGateway,
        daily_selection,
        paginate,
        search_cards,
    },
    indexer_client::IndexerClient,
    ledger::ParamsSource,
    logging,
    lookup::{
        lookup_build_txns,
        lookup_influence_deposit_txns,
        lookup_pack_purchase_txns,
        lookup_pending_build_txns,
        parse_build_txns,
        parse_influence_deposit_txns,
        parse_pack_purchase_txns,
        resolve_asset_titles,
    },
    notes::{
        BuildNote,
        InfluenceDepositNote,
        NoteId,
        PackPurchaseNote,
        encode_build_note,
        encode_influence_note,
        encode_pack_purchase_note,
        note_text_from_base64,
    },
    processed::{
        correlate_builds,
        correlate_influence,
    },
    repository::{
        DataRepository,
        PackListing,
        or_empty,
    },
    tiles::{
        apply_pending_builds,
        build_cost,
        buildable_objects,
        can_deposit,
        can_replace,
    },
    transactions::{
        BuildRequest,
        InfluenceDepositRequest,
        PackPurchaseRequest,
        TransactionDescriptor,
        create_build_txns,
        create_influence_deposit_txns,
        create_opt_in_txns,
        create_pack_purchase_txns,
        pack_assets_to_opt_in,
    },
};
use clap::{
    Parser,
    Subcommand,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use serde::Serialize;
use std::{
    collections::HashSet,
    time::Duration,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Influence deposits made by an account, with their processing status.
    InfluenceHistory {
        #[arg(long)]
        address: String,
    },
    /// Tile builds paid for by an account, with their processing status.
    BuildHistory {
        #[arg(long)]
        address: String,
    },
    /// Tile map with builds received since `min_round` overlaid.
    PendingBuilds {
        #[arg(long)]
        min_round: u64,
    },
    /// Confirmed city pack purchases, optionally for one buyer.
    PackPurchases {
        #[arg(long)]
        address: Option<String>,
    },
    /// Cities ranked by influence.
    Leaderboard {
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Today's featured cards, or a page of search results.
    Gallery {
        #[arg(long, default_value = "country")]
        card_type: CardType,
        #[arg(long, default_value_t = FEATURED_CARDS)]
        count: usize,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: usize,
        /// Gateway card images are linked through.
        #[arg(long, default_value = "algonode")]
        gateway: IpfsGateway,
    },
    /// Print the unsigned influence deposit group.
    PlanInfluenceDeposit {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        asset_index: u64,
        #[arg(long)]
        amount: u64,
    },
    /// Print the unsigned build group for a tile of the published map.
    PlanBuild {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        tile: usize,
        #[arg(long)]
        object: String,
        /// Asset held by the sender; repeat for each city card owned.
        #[arg(long = "holds")]
        held_assets: Vec<u64>,
        /// Sender's AWT balance; the build is refused when it cannot cover
        /// the cost.
        #[arg(long)]
        awt_balance: Option<u64>,
    },
    /// Print the unsigned purchase group for an available city pack.
    PlanPackPurchase {
        #[arg(long)]
        buyer: String,
        #[arg(long)]
        pack_id: u64,
        /// Assets the buyer is already opted in to.
        #[arg(long = "holds")]
        held_assets: Vec<u64>,
    },
    /// Print a note in its on-chain text form.
    #[command(subcommand)]
    EncodeNote(EncodeNote),
    /// Decode a base64 note field as returned by the indexer.
    DecodeNote { note: String },
    /// Poll an account's influence deposits and report each as it is
    /// processed.
    Watch {
        #[arg(long)]
        address: String,
        /// Seconds between polls.
        #[arg(long, default_value_t = 60)]
        interval: u64,
    },
}

#[derive(Subcommand, Debug)]
enum EncodeNote {
    Influence {
        #[arg(long)]
        receiver: String,
        #[arg(long)]
        asset_index: u64,
        #[arg(long)]
        amount: u64,
        #[arg(long)]
        note_id: Option<String>,
    },
    Build {
        #[arg(long)]
        receiver: String,
        #[arg(long)]
        asset_index: u64,
        #[arg(long)]
        amount: u64,
        #[arg(long)]
        object: String,
        #[arg(long)]
        note_id: Option<String>,
    },
    PackPurchase {
        #[arg(long)]
        pack_id: u64,
        #[arg(long)]
        buyer: String,
    },
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum DecodedNote {
    Influence(InfluenceDepositNote),
    Build(BuildNote),
    PackPurchase(PackPurchaseNote),
}

#[derive(Serialize)]
struct PurchasePlan {
    opt_in: Vec<TransactionDescriptor>,
    purchase: Vec<TransactionDescriptor>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).wrap_err("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

fn note_id_or_new(raw: Option<String>) -> NoteId {
    raw.map(NoteId::from).unwrap_or_default()
}

async fn handle_interrupt() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received interrupt, exiting"),
        Err(_) => tracing::warn!("Received interrupt error, exiting anyway"),
    }
}

struct Clients {
    indexer: IndexerClient,
    algod: AlgodClient,
    repository: DataRepository,
}

impl Clients {
    fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            indexer: IndexerClient::new(config.indexer_url.clone())?,
            algod: AlgodClient::new(config.algod_url.clone())?,
            repository: DataRepository::new(config.data_url.clone())?,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let config = Config::try_from(args.config)?;
    let _log_guard = logging::init_tracing(config.log_dir.as_deref())?;
    tracing::debug!(chain = %config.chain, indexer = %config.indexer_url, "starting");

    let clients = Clients::new(&config)?;
    run(args.command, &config, &clients).await
}

async fn run(command: Command, config: &Config, clients: &Clients) -> Result<()> {
    let chain = config.chain;
    match command {
        Command::InfluenceHistory { address } => {
            let (txns, processed) = futures::join!(
                lookup_influence_deposit_txns(&clients.indexer, &address, &config.city_manager),
                clients.repository.processed_influence(chain),
            );
            let mut notes = parse_influence_deposit_txns(&txns);
            resolve_asset_titles(&clients.indexer, &mut notes).await;
            let processed = or_empty(processed, "processed influence notes");
            print_json(&correlate_influence(&notes, &processed))
        }
        Command::BuildHistory { address } => {
            let (txns, processed) = futures::join!(
                lookup_build_txns(&clients.indexer, &address, &config.build_manager),
                clients.repository.processed_builds(chain),
            );
            let notes = parse_build_txns(&txns);
            let processed = or_empty(processed, "processed build notes");
            print_json(&correlate_builds(&notes, &processed))
        }
        Command::PendingBuilds { min_round } => {
            let (txns, map) = futures::join!(
                lookup_pending_build_txns(&clients.indexer, min_round, &config.build_manager),
                clients.repository.tile_map(chain),
            );
            let map = map.wrap_err("failed to load the tile map")?;
            let pending = parse_build_txns(&txns);
            print_json(&apply_pending_builds(&map, &pending))
        }
        Command::PackPurchases { address } => {
            let txns = lookup_pack_purchase_txns(
                &clients.indexer,
                &config.city_manager,
                address.as_deref(),
            )
            .await;
            print_json(&parse_pack_purchase_txns(&txns, &config.city_manager))
        }
        Command::Leaderboard { top } => {
            let cities = clients
                .repository
                .cities(chain)
                .await
                .wrap_err("failed to load cities")?;
            let ranked: Vec<_> = cities.into_iter().take(top).collect();
            print_json(&ranked)
        }
        Command::Gallery {
            card_type,
            count,
            search,
            page,
            gateway,
        } => {
            let cards = clients
                .repository
                .gallery(chain, card_type)
                .await
                .wrap_err_with(|| format!("failed to load {card_type} gallery"))?;
            match search {
                Some(needle) => {
                    let found = search_cards(&cards, &needle);
                    let shown: Vec<_> = paginate(&found, page, CARDS_PER_PAGE)
                        .into_iter()
                        .map(|&card| card.clone().with_proxied_image(gateway))
                        .collect();
                    print_json(&shown)
                }
                None => {
                    let today = chrono::Local::now().date_naive();
                    let shown: Vec<_> = daily_selection(&cards, count, today)
                        .into_iter()
                        .map(|card| card.with_proxied_image(gateway))
                        .collect();
                    print_json(&shown)
                }
            }
        }
        Command::PlanInfluenceDeposit {
            sender,
            asset_index,
            amount,
        } => {
            let params = clients.algod.suggested_params().await?;
            let request = InfluenceDepositRequest {
                sender,
                manager: config.city_manager.clone(),
                funding_fee: config.funding_fee,
                deposit_amount: amount,
                asset_index,
                influence_asset_index: chain.awt_asset_id(),
            };
            print_json(&create_influence_deposit_txns(
                &params,
                &request,
                &NoteId::new(),
            ))
        }
        Command::PlanBuild {
            sender,
            tile,
            object,
            held_assets,
            awt_balance,
        } => {
            let build = BuildPlan {
                sender,
                tile_index: tile,
                object,
                held_assets,
                awt_balance,
            };
            plan_build(config, clients, build).await
        }
        Command::PlanPackPurchase {
            buyer,
            pack_id,
            held_assets,
        } => {
            let packs = clients
                .repository
                .packs(chain, PackListing::Available)
                .await
                .wrap_err("failed to load city packs")?;
            let pack = packs
                .into_iter()
                .find(|pack| pack.id == pack_id)
                .ok_or_else(|| eyre!("pack {pack_id} is not available"))?;
            tracing::info!(
                pack_id,
                price = %format_amount(pack.requested_algo_amount, 6),
                "planning pack purchase"
            );
            let params = clients.algod.suggested_params().await?;
            let missing = pack_assets_to_opt_in(&pack, &held_assets);
            let request = PackPurchaseRequest {
                buyer,
                pack,
                incentive_wallet: config.incentive_wallet.clone(),
                incentive_fee: config.incentive_fee,
            };
            print_json(&PurchasePlan {
                opt_in: create_opt_in_txns(&params, &request.buyer, &missing, false),
                purchase: create_pack_purchase_txns(&params, &request),
            })
        }
        Command::EncodeNote(note) => {
            let encoded = match note {
                EncodeNote::Influence {
                    receiver,
                    asset_index,
                    amount,
                    note_id,
                } => encode_influence_note(&receiver, asset_index, amount, &note_id_or_new(note_id)),
                EncodeNote::Build {
                    receiver,
                    asset_index,
                    amount,
                    object,
                    note_id,
                } => encode_build_note(
                    &receiver,
                    asset_index,
                    amount,
                    &object,
                    &note_id_or_new(note_id),
                ),
                EncodeNote::PackPurchase { pack_id, buyer } => {
                    encode_pack_purchase_note(pack_id, &buyer)
                }
            };
            println!("{encoded}");
            Ok(())
        }
        Command::DecodeNote { note } => {
            let text = note_text_from_base64(&note)?;
            let decoded = InfluenceDepositNote::decode(&text)
                .map(DecodedNote::Influence)
                .or_else(|_| BuildNote::decode(&text).map(DecodedNote::Build))
                .or_else(|_| PackPurchaseNote::decode(&text).map(DecodedNote::PackPurchase))
                .map_err(|e| eyre!("'{text}' is not an explorer note: {e}"))?;
            print_json(&decoded)
        }
        Command::Watch { address, interval } => {
            tokio::select! {
                result = watch(config, clients, &address, interval) => result,
                _ = handle_interrupt() => Ok(()),
            }
        }
    }
}

struct BuildPlan {
    sender: String,
    tile_index: usize,
    object: String,
    held_assets: Vec<u64>,
    awt_balance: Option<u64>,
}

async fn plan_build(config: &Config, clients: &Clients, build: BuildPlan) -> Result<()> {
    let BuildPlan {
        sender,
        tile_index,
        object,
        held_assets,
        awt_balance,
    } = build;
    let chain = config.chain;
    let map = clients
        .repository
        .tile_map(chain)
        .await
        .wrap_err("failed to load the tile map")?;
    let tile = map
        .iter()
        .find(|tile| tile.index == tile_index)
        .ok_or_else(|| eyre!("tile {tile_index} is not on the map"))?;
    if !can_replace(tile, &map) {
        return Err(eyre!("tile {tile_index} supports a building and cannot be replaced"));
    }
    let special_tiles = chain.special_tiles();
    if !buildable_objects(tile, &map, special_tiles).contains(&object.as_str()) {
        return Err(eyre!("{object} cannot be built on tile {tile_index}"));
    }
    let cost = build_cost(tile, &object, special_tiles, &held_assets);
    if let Some(balance) = awt_balance
        && !can_deposit(tile, &object, &map, cost, balance)
    {
        return Err(eyre!(
            "cannot deposit {cost} AWT for {object} on tile {tile_index} with a balance of {balance}"
        ));
    }
    let params = clients.algod.suggested_params().await?;
    let request = BuildRequest {
        sender,
        manager: config.build_manager.clone(),
        funding_fee: config.funding_fee,
        deposit_amount: cost,
        object_type: object,
        tile_index: tile.index as u64,
        owner: tile.owner.clone(),
        awt_index: chain.awt_asset_id(),
        owner_fee_pc: config.owner_fee_pc,
    };
    print_json(&create_build_txns(&params, &request, &NoteId::new()))
}

async fn watch(config: &Config, clients: &Clients, address: &str, interval: u64) -> Result<()> {
    let chain: Chain = config.chain;
    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
    let mut reported: HashSet<NoteId> = HashSet::new();
    loop {
        ticker.tick().await;
        let (txns, processed) = futures::join!(
            lookup_influence_deposit_txns(&clients.indexer, address, &config.city_manager),
            clients.repository.processed_influence(chain),
        );
        let notes = parse_influence_deposit_txns(&txns);
        let processed = or_empty(processed, "processed influence notes");
        let rows = correlate_influence(&notes, &processed);
        let pending = rows.iter().filter(|row| row.status.is_pending()).count();
        for row in rows.iter().filter(|row| !row.status.is_pending()) {
            if reported.insert(row.note.note_id.clone()) {
                tracing::info!(
                    address = %shorten_address(address),
                    note_id = %row.note.note_id,
                    asset_index = row.note.asset_index,
                    influence = %row.influence(),
                    tx = %chain.explorer_tx_url(row.acfg_txn()),
                    "deposit processed"
                );
            }
        }
        tracing::info!(total = rows.len(), pending, "polled influence deposits");
    }
}
