use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use launchpad_rewards::amount::{decimals_from_signed, format_units, parse_amount};
use launchpad_rewards::config::{AppConfig, ResolvedConfig};
use launchpad_rewards::constants::{DEFAULT_CONFIG_PATH, ENV_LOG};
use launchpad_rewards::{
    AllocationSplit, DistributionResult, DistributionSummary, HolderSnapshot,
};

/// ========= CLI =========

#[derive(Parser, Debug)]
#[command(
    name = "launchpad-rewards",
    version,
    about = "Share-based holder reward calculator"
)]
struct Cli {
    /// Config file (TOML); missing file means defaults
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Share count for a single balance
    Shares {
        /// Balance in the token's smallest unit
        #[arg(long, allow_hyphen_values = true)]
        balance: String,

        /// Token decimals (defaults to config)
        #[arg(long, allow_hyphen_values = true)]
        decimals: Option<i64>,
    },

    /// Split a reward pool across a holder snapshot
    Distribute {
        /// Holder snapshot (JSON)
        #[arg(long)]
        holders: PathBuf,

        /// Reward pool in the reward token's smallest unit
        #[arg(long, allow_hyphen_values = true)]
        pool: String,

        /// Token decimals (overrides snapshot and config)
        #[arg(long, allow_hyphen_values = true)]
        decimals: Option<i64>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Compute on the rayon thread pool
        #[arg(long)]
        parallel: bool,
    },

    /// Split incoming fees into platform / rewards / burn / creator buckets
    Split {
        /// Amount in smallest units
        #[arg(long, allow_hyphen_values = true)]
        amount: String,

        /// Also distribute the reward bucket across this snapshot
        #[arg(long)]
        holders: Option<PathBuf>,

        #[arg(long, allow_hyphen_values = true)]
        decimals: Option<i64>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct DistributionReport<'a> {
    decimals: u32,
    results: &'a [DistributionResult],
    summary: &'a DistributionSummary,
}

#[derive(Serialize)]
struct SplitReport<'a> {
    amount: u64,
    split: &'a AllocationSplit,
    #[serde(skip_serializing_if = "Option::is_none")]
    distribution: Option<DistributionReport<'a>>,
}

fn init_tracing() {
    // LAUNCHPAD_LOG, then RUST_LOG, then info
    let filter = std::env::var(ENV_LOG)
        .unwrap_or_else(|_| std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()));
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let cfg = AppConfig::load_from(&cli.config)?
        .resolved()
        .with_context(|| format!("resolving {}", cli.config.display()))?;
    debug!(
        tokens_per_share = cfg.policy.tokens_per_share(),
        max_shares = cfg.policy.max_shares_per_wallet(),
        decimals = cfg.decimals,
        "config resolved"
    );

    match cli.cmd {
        Commands::Shares { balance, decimals } => {
            let balance = parse_amount(&balance).context("--balance")?;
            let decimals = pick_decimals(decimals, None, &cfg)?;
            let shares = cfg.policy.shares(balance, decimals);
            println!(
                "{} ({} tokens) -> {} shares",
                balance,
                format_units(balance, decimals),
                shares
            );
        }

        Commands::Distribute {
            holders,
            pool,
            decimals,
            json,
            parallel,
        } => {
            let pool = parse_amount(&pool).context("--pool")?;
            let snapshot = HolderSnapshot::load(&holders, cfg.strict_addresses)?;
            let decimals = pick_decimals(decimals, snapshot.decimals, &cfg)?;
            let (results, summary) = run_distribution(&cfg, &snapshot, pool, decimals, parallel)?;
            let report = DistributionReport {
                decimals,
                results: &results,
                summary: &summary,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_distribution(&report);
            }
        }

        Commands::Split {
            amount,
            holders,
            decimals,
            json,
        } => {
            let amount = parse_amount(&amount).context("--amount")?;
            let split = cfg.allocation.split(amount)?;
            info!(
                "[ALLOCATION] {} -> platform {} / rewards {} / burn {} / creator {}",
                amount, split.platform_fee, split.reward_pool, split.burn, split.creator
            );

            let distributed = match holders {
                Some(path) => {
                    let snapshot = HolderSnapshot::load(&path, cfg.strict_addresses)?;
                    let decimals = pick_decimals(decimals, snapshot.decimals, &cfg)?;
                    let (results, summary) =
                        run_distribution(&cfg, &snapshot, split.reward_pool, decimals, false)?;
                    Some((decimals, results, summary))
                }
                None => None,
            };

            let report = SplitReport {
                amount,
                split: &split,
                distribution: distributed.as_ref().map(|(d, r, s)| DistributionReport {
                    decimals: *d,
                    results: r,
                    summary: s,
                }),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("amount:       {}", amount);
                println!("platform fee: {}", split.platform_fee);
                println!("reward pool:  {}", split.reward_pool);
                println!("burn:         {}", split.burn);
                println!("creator:      {}", split.creator);
                if let Some(dist) = &report.distribution {
                    println!();
                    print_distribution(dist);
                }
            }
        }
    }

    Ok(())
}

/// CLI flag, then snapshot file, then config.
fn pick_decimals(flag: Option<i64>, snapshot: Option<u32>, cfg: &ResolvedConfig) -> Result<u32> {
    match flag {
        Some(d) => Ok(decimals_from_signed(d).context("--decimals")?),
        None => Ok(snapshot.unwrap_or(cfg.decimals)),
    }
}

fn run_distribution(
    cfg: &ResolvedConfig,
    snapshot: &HolderSnapshot,
    pool: u64,
    decimals: u32,
    parallel: bool,
) -> Result<(Vec<DistributionResult>, DistributionSummary)> {
    let results = if parallel {
        cfg.policy.distribute_par(&snapshot.holders, pool, decimals)
    } else {
        cfg.policy.distribute(&snapshot.holders, pool, decimals)
    };
    let summary = DistributionSummary::from_results(&results, pool)?;
    info!(
        "[SHARES] {} holders, {} shares, distributed {} of {} (dust {})",
        results.len(),
        summary.total_shares,
        summary.distributed,
        summary.pool,
        summary.dust
    );
    Ok((results, summary))
}

fn print_distribution(report: &DistributionReport<'_>) {
    for r in report.results {
        println!("{}: {} shares, reward {}", r.address, r.shares, r.reward);
    }
    let s = report.summary;
    println!(
        "total shares {}, distributed {} / {}, dust {} (kept by distributor), {} recipients",
        s.total_shares, s.distributed, s.pool, s.dust, s.recipients
    );
}
