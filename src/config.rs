//! Reward Configuration
//!
//! `launchpad.toml` plus `LAUNCHPAD_*` environment overrides. Env wins over
//! the file, the file wins over built-in defaults.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::warn;

use crate::allocation::AllocationConfig;
use crate::constants::{
    DEFAULT_DECIMALS, DEFAULT_PLATFORM_FEE_BPS, ENV_BURN_BPS, ENV_DECIMALS,
    ENV_MAX_SHARES_PER_WALLET, ENV_PLATFORM_FEE_BPS, ENV_REWARD_BPS, ENV_STRICT_ADDRESSES,
    ENV_TOKENS_PER_SHARE, MAX_INPUT_DECIMALS, MAX_SHARES_PER_WALLET, TOKENS_PER_SHARE,
};
use crate::shares::SharePolicy;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PolicyCfg {
    pub tokens_per_share: Option<u64>,
    pub max_shares_per_wallet: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TokenCfg {
    pub decimals: Option<u32>,
    pub strict_addresses: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AllocationCfg {
    pub platform_fee_bps: Option<u16>,
    pub reward_distribution_bps: Option<u16>,
    pub burn_bps: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    pub policy: Option<PolicyCfg>,
    pub token: Option<TokenCfg>,
    pub allocation: Option<AllocationCfg>,
}

/// Fully resolved settings; policy and allocation are already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub policy: SharePolicy,
    pub decimals: u32,
    pub strict_addresses: bool,
    pub allocation: AllocationConfig,
}

impl AppConfig {
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            let s = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.as_ref().display()))?;
            Self::from_toml_str(&s).with_context(|| format!("parsing {}", path.as_ref().display()))
        } else {
            Ok(Default::default())
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Env value if set, else the file value, else `default_`. A set but
    /// unparseable env value is an error rather than a silent fallback.
    fn resolve<T: std::str::FromStr>(env_key: &str, toml_opt: Option<T>, default_: T) -> Result<T> {
        match std::env::var(env_key) {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                warn!("[CONFIG] {}={:?} is not a valid value", env_key, raw);
                anyhow!("{}={:?} is not a valid value", env_key, raw)
            }),
            Err(_) => Ok(toml_opt.unwrap_or(default_)),
        }
    }

    fn resolve_bool(env_key: &str, toml_opt: Option<bool>, default_: bool) -> Result<bool> {
        match std::env::var(env_key) {
            Ok(raw) => match raw.trim() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" => Ok(false),
                _ => {
                    warn!("[CONFIG] {}={:?} is not a boolean", env_key, raw);
                    bail!("{}={:?} is not a boolean", env_key, raw)
                }
            },
            Err(_) => Ok(toml_opt.unwrap_or(default_)),
        }
    }

    pub fn resolved(&self) -> Result<ResolvedConfig> {
        let policy_cfg = self.policy.clone().unwrap_or_default();
        let token_cfg = self.token.clone().unwrap_or_default();
        let alloc_cfg = self.allocation.clone().unwrap_or_default();

        let tokens_per_share =
            Self::resolve(ENV_TOKENS_PER_SHARE, policy_cfg.tokens_per_share, TOKENS_PER_SHARE)?;
        let max_shares = Self::resolve(
            ENV_MAX_SHARES_PER_WALLET,
            policy_cfg.max_shares_per_wallet,
            MAX_SHARES_PER_WALLET,
        )?;
        let policy = SharePolicy::new(tokens_per_share, max_shares).context("share policy")?;

        let decimals = Self::resolve(ENV_DECIMALS, token_cfg.decimals, DEFAULT_DECIMALS)?;
        if decimals > MAX_INPUT_DECIMALS {
            bail!("decimals {} above maximum {}", decimals, MAX_INPUT_DECIMALS);
        }
        let strict_addresses =
            Self::resolve_bool(ENV_STRICT_ADDRESSES, token_cfg.strict_addresses, false)?;

        let allocation = AllocationConfig {
            platform_fee_bps: Self::resolve(
                ENV_PLATFORM_FEE_BPS,
                alloc_cfg.platform_fee_bps,
                DEFAULT_PLATFORM_FEE_BPS,
            )?,
            reward_distribution_bps: Self::resolve(
                ENV_REWARD_BPS,
                alloc_cfg.reward_distribution_bps,
                0,
            )?,
            burn_bps: Self::resolve(ENV_BURN_BPS, alloc_cfg.burn_bps, 0)?,
        };
        allocation.validate().context("allocation")?;

        Ok(ResolvedConfig {
            policy,
            decimals,
            strict_addresses,
            allocation,
        })
    }
}
