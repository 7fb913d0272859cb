//! agora: command-line entry point for the voting platform.

use std::path::PathBuf;
use std::sync::Arc;

use agora_governance::{
    compute_status, validate_balance, Eligibility, ExecutionMode, PersistedStatus, StatusFilter,
    Strategy,
};
use agora_pinning::{PinataClient, PinataCredentials, Pinner};
use agora_service::{ProposalService, ServiceConfig};
use agora_snapshot::{BalanceOracle, SnapshotClient};
use agora_store::{ListQuery, SortOrder};
use agora_store_lmdb::environment::DEFAULT_MAP_SIZE;
use agora_store_lmdb::LmdbEnvironment;
use agora_types::{Address, CommunityId, ProposalId, Timestamp};
use agora_utils::{init_logging, LogFormat};
use anyhow::{bail, Context};
use clap::Parser;

#[derive(Parser)]
#[command(name = "agora", about = "Community voting platform tools")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "AGORA_CONFIG")]
    config: Option<PathBuf>,

    /// Execution mode: "PROD", "DEV" or "TEST".
    #[arg(long, env = "AGORA_APP_ENV")]
    app_env: Option<ExecutionMode>,

    /// Base URL of the snapshot service.
    #[arg(long, env = "AGORA_SNAPSHOT_URL")]
    snapshot_url: Option<String>,

    /// Base URL of the pinning service.
    #[arg(long, env = "AGORA_PINATA_URL")]
    pinata_url: Option<String>,

    #[arg(long, env = "AGORA_PINATA_API_KEY", hide_env_values = true)]
    pinata_api_key: Option<String>,

    #[arg(long, env = "AGORA_PINATA_SECRET_API_KEY", hide_env_values = true)]
    pinata_secret_api_key: Option<String>,

    /// Data directory for the proposal store.
    #[arg(long, env = "AGORA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "AGORA_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "AGORA_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Compute a proposal's phase from its persisted status and window.
    Status {
        /// Persisted status: draft, published, cancelled or closed.
        #[arg(long)]
        persisted: PersistedStatus,
        /// Voting window start (Unix seconds).
        #[arg(long)]
        start: u64,
        /// Voting window end (Unix seconds).
        #[arg(long)]
        end: u64,
        /// Evaluation instant (Unix seconds); defaults to the current time.
        #[arg(long)]
        now: Option<u64>,
    },

    /// Fetch an address's snapshot balance and check it against a strategy.
    Eligibility {
        #[arg(long)]
        address: Address,
        /// Snapshot block height; defaults to the latest snapshot.
        #[arg(long)]
        block_height: Option<u64>,
        #[arg(long, default_value_t = Strategy::default().name().to_string())]
        strategy: String,
        #[arg(long)]
        min_balance: Option<u64>,
    },

    /// Pin a file to IPFS and print its content identifier.
    Pin { file: PathBuf },

    /// Inspect and manage stored proposals.
    Proposal {
        #[command(subcommand)]
        action: ProposalAction,
    },
}

#[derive(clap::Subcommand)]
enum ProposalAction {
    /// Show one proposal with its computed status and vote count.
    Show { id: u64 },
    /// List a community's proposals, newest first.
    List {
        community: u64,
        /// Only proposals in this computed status.
        #[arg(long)]
        status: Option<StatusFilter>,
        #[arg(long, default_value_t = 0)]
        start: usize,
        #[arg(long)]
        count: Option<usize>,
        /// Oldest first.
        #[arg(long)]
        asc: bool,
    },
    /// Cancel a draft or published proposal.
    Cancel { id: u64 },
    /// Close a published proposal before its end time.
    Close { id: u64 },
}

impl Cli {
    /// File settings (or defaults) overridden by CLI flags and env vars.
    fn resolve_config(&self) -> anyhow::Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_toml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => ServiceConfig::default(),
        };
        if let Some(mode) = self.app_env {
            config.app_env = mode;
        }
        if let Some(url) = &self.snapshot_url {
            config.snapshot_url = url.clone();
        }
        if let Some(url) = &self.pinata_url {
            config.pinata_url = url.clone();
        }
        if let Some(key) = &self.pinata_api_key {
            config.pinata_api_key = key.clone();
        }
        if let Some(key) = &self.pinata_secret_api_key {
            config.pinata_secret_api_key = key.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }
}

fn snapshot_client(config: &ServiceConfig) -> SnapshotClient {
    SnapshotClient::with_timeout(&config.snapshot_url, config.app_env, config.http_timeout())
}

fn pinata_client(config: &ServiceConfig) -> PinataClient {
    PinataClient::with_base_url(
        &config.pinata_url,
        PinataCredentials {
            api_key: config.pinata_api_key.clone(),
            secret_api_key: config.pinata_secret_api_key.clone(),
        },
        config.http_timeout(),
    )
}

fn open_service(config: &ServiceConfig) -> anyhow::Result<ProposalService> {
    let env = LmdbEnvironment::open(&config.data_dir, DEFAULT_MAP_SIZE)
        .with_context(|| format!("opening store in {}", config.data_dir.display()))?;
    Ok(ProposalService::new(
        Arc::new(env.proposal_store()),
        Arc::new(env.vote_store()),
        Arc::new(snapshot_client(config)),
        Arc::new(pinata_client(config)),
        config.app_env,
    ))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(config.log_format, &config.log_level);
    tracing::debug!(
        mode = %config.app_env,
        data_dir = %config.data_dir.display(),
        "configuration resolved"
    );

    match cli.command {
        Command::Status {
            persisted,
            start,
            end,
            now,
        } => {
            let now = now.map_or_else(Timestamp::now, Timestamp::new);
            match compute_status(persisted, Timestamp::new(start), Timestamp::new(end), now) {
                Some(status) => println!("{}", status.as_str()),
                None => bail!("no computed status is defined for a {persisted} proposal"),
            }
        }

        Command::Eligibility {
            address,
            block_height,
            strategy,
            min_balance,
        } => {
            let oracle = snapshot_client(&config);
            let block_height = match block_height {
                Some(height) => height,
                None => oracle.latest_snapshot().await?.block_height,
            };
            let balance = oracle.balance_at(&address, block_height).await?;
            match validate_balance(&strategy, &balance, min_balance, config.app_env)? {
                Eligibility::Weighted(weight) => {
                    println!(
                        "eligible: {address} votes with weight {weight} at block {block_height}"
                    );
                }
                Eligibility::Bypassed => {
                    println!("eligible: balance checks bypassed in {} mode", config.app_env);
                }
            }
        }

        Command::Pin { file } => {
            if !config.has_pinning_credentials() {
                bail!(
                    "pinning credentials missing: \
                     set AGORA_PINATA_API_KEY and AGORA_PINATA_SECRET_API_KEY"
                );
            }
            let pinner = pinata_client(&config);
            let bytes = std::fs::read(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload")
                .to_string();
            let pin = pinner.pin_file(bytes, &file_name).await?;
            tracing::info!(cid = %pin.ipfs_hash, size = pin.pin_size, "file pinned");
            println!("{}", pin.ipfs_hash);
        }

        Command::Proposal { action } => {
            let service = open_service(&config)?;
            match action {
                ProposalAction::Show { id } => {
                    print_json(&service.get_proposal(ProposalId::new(id))?)?;
                }
                ProposalAction::List {
                    community,
                    status,
                    start,
                    count,
                    asc,
                } => {
                    let mut query = ListQuery::new(CommunityId::new(community));
                    query.status_filter = status;
                    query.start = start;
                    query.count = count;
                    if asc {
                        query = query.with_order(SortOrder::Asc);
                    }
                    print_json(&service.list_proposals(&query)?)?;
                }
                ProposalAction::Cancel { id } => {
                    let view =
                        service.update_status(ProposalId::new(id), PersistedStatus::Cancelled)?;
                    print_json(&view)?;
                }
                ProposalAction::Close { id } => {
                    let view = service.update_status(ProposalId::new(id), PersistedStatus::Closed)?;
                    print_json(&view)?;
                }
            }
        }
    }

    Ok(())
}
