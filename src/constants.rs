// Launchpad reward constants
// Hard-coded policy values for deterministic distribution behavior

// ============================
// Share Policy
// ============================

/// Whole tokens required for one share.
pub const TOKENS_PER_SHARE: u64 = 500_000;

/// Per-wallet share cap. Balance above the cap earns nothing extra.
pub const MAX_SHARES_PER_WALLET: u32 = 50;

/// Largest whole-token balance that still counts toward shares (25,000,000).
pub const MAX_TOKENS_FOR_SHARES: u64 = MAX_SHARES_PER_WALLET as u64 * TOKENS_PER_SHARE;

/// Most SPL tokens minted by the launchpad use 6 decimals.
pub const DEFAULT_DECIMALS: u32 = 6;

/// Decimals above this are rejected when parsing untrusted input.
pub const MAX_INPUT_DECIMALS: u32 = 255;

// ============================
// Fee Allocation
// ============================

pub const BPS_DENOMINATOR: u64 = 10_000;

/// 2% platform fee
pub const DEFAULT_PLATFORM_FEE_BPS: u16 = 200;

/// Owners may configure at most a 10% platform fee
pub const MAX_PLATFORM_FEE_BPS: u16 = 1_000;

pub const MAX_ALLOCATION_BPS: u16 = 10_000;

// ============================
// Solana
// ============================

/// System program id; tokens sent here are unrecoverable.
pub const SOLANA_BURN_ADDRESS: &str = "11111111111111111111111111111111";

/// Public keys decode to exactly this many bytes.
pub const SOLANA_PUBKEY_LEN: usize = 32;

// ============================
// Environment
// ============================

pub const ENV_LOG: &str = "LAUNCHPAD_LOG";
pub const ENV_TOKENS_PER_SHARE: &str = "LAUNCHPAD_TOKENS_PER_SHARE";
pub const ENV_MAX_SHARES_PER_WALLET: &str = "LAUNCHPAD_MAX_SHARES_PER_WALLET";
pub const ENV_DECIMALS: &str = "LAUNCHPAD_DECIMALS";
pub const ENV_STRICT_ADDRESSES: &str = "LAUNCHPAD_STRICT_ADDRESSES";
pub const ENV_PLATFORM_FEE_BPS: &str = "LAUNCHPAD_PLATFORM_FEE_BPS";
pub const ENV_REWARD_BPS: &str = "LAUNCHPAD_REWARD_BPS";
pub const ENV_BURN_BPS: &str = "LAUNCHPAD_BURN_BPS";

pub const DEFAULT_CONFIG_PATH: &str = "launchpad.toml";
