// ---- Clippy/lints: keep signals high, noise low ----
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// Library crate entry so the CLI and integration tests share one engine
pub mod allocation;
pub mod amount;
pub mod config;
pub mod constants;
pub mod error;
pub mod holders;
pub mod shares;

pub use allocation::{AllocationConfig, AllocationSplit};
pub use error::{ShareError, ShareResult};
pub use holders::HolderSnapshot;
pub use shares::{
    calculate_holder_reward, calculate_shares, calculate_total_shares, distribute_rewards,
    distribute_rewards_par, summarize, DistributionResult, DistributionSummary, HolderBalance,
    SharePolicy,
};
