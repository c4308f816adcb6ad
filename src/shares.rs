//! Share-Based Reward Distribution
//!
//! Rules:
//! - 500,000 whole tokens = 1 share
//! - at most 50 shares per wallet (balance above 25M tokens is ignored)
//! - a reward pool is split pro-rata by shares, floor rounding
//!
//! All math is integer. Balances are divided by `10^decimals` with truncating
//! division and the `pool * shares` product is taken in u128, so nothing here
//! can drift the way a float computation would. Rounding dust stays with the
//! distributing wallet; see [`DistributionSummary`].

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{MAX_SHARES_PER_WALLET, TOKENS_PER_SHARE};
use crate::error::{ShareError, ShareResult};

/// One holder's balance in the token's smallest unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderBalance {
    pub address: String,
    pub balance: u64,
}

impl HolderBalance {
    pub fn new(address: impl Into<String>, balance: u64) -> Self {
        Self {
            address: address.into(),
            balance,
        }
    }
}

/// Output row of a distribution, one per input holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionResult {
    pub address: String,
    pub shares: u32,
    pub reward: u64,
}

/// Share policy. Construct through [`SharePolicy::new`] so a zero share size
/// can never reach the division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SharePolicy {
    tokens_per_share: u64,
    max_shares_per_wallet: u32,
}

impl Default for SharePolicy {
    fn default() -> Self {
        Self {
            tokens_per_share: TOKENS_PER_SHARE,
            max_shares_per_wallet: MAX_SHARES_PER_WALLET,
        }
    }
}

impl SharePolicy {
    pub fn new(tokens_per_share: u64, max_shares_per_wallet: u32) -> ShareResult<Self> {
        if tokens_per_share == 0 {
            return Err(ShareError::invalid("tokens_per_share must be greater than zero"));
        }
        Ok(Self {
            tokens_per_share,
            max_shares_per_wallet,
        })
    }

    pub fn tokens_per_share(&self) -> u64 {
        self.tokens_per_share
    }

    pub fn max_shares_per_wallet(&self) -> u32 {
        self.max_shares_per_wallet
    }

    /// Whole tokens beyond which a wallet earns no more shares.
    pub fn max_tokens_for_shares(&self) -> u128 {
        self.max_shares_per_wallet as u128 * self.tokens_per_share as u128
    }

    /// Shares for a raw balance: `min(balance / 10^decimals / tokens_per_share, cap)`.
    pub fn shares(&self, balance: u64, decimals: u32) -> u32 {
        // 10^decimals past u128 is larger than any u64 balance: zero whole tokens
        let Some(scale) = 10u128.checked_pow(decimals) else {
            return 0;
        };
        let whole_tokens = balance as u128 / scale;
        let raw_shares = whole_tokens / self.tokens_per_share as u128;
        raw_shares.min(self.max_shares_per_wallet as u128) as u32
    }

    /// Sum of per-holder shares. Only individual wallets are capped.
    pub fn total_shares(&self, holders: &[HolderBalance], decimals: u32) -> u64 {
        holders
            .iter()
            .map(|h| self.shares(h.balance, decimals) as u64)
            .fold(0u64, |acc, s| acc.saturating_add(s))
    }

    /// Reward for one holder given a batch-wide `total_shares`.
    ///
    /// Fails if the holder alone has more shares than `total_shares`, since
    /// the result could then exceed the pool.
    pub fn holder_reward(
        &self,
        holder_balance: u64,
        total_reward_amount: u64,
        total_shares: u64,
        decimals: u32,
    ) -> ShareResult<u64> {
        if total_shares == 0 {
            return Ok(0);
        }
        let holder_shares = self.shares(holder_balance, decimals);
        if holder_shares as u64 > total_shares {
            return Err(ShareError::invalid(format!(
                "holder has {} shares but total_shares is {}",
                holder_shares, total_shares
            )));
        }
        Ok(reward_for_shares(total_reward_amount, holder_shares, total_shares))
    }

    /// Split `total_reward_amount` across `holders`, preserving input order.
    pub fn distribute(
        &self,
        holders: &[HolderBalance],
        total_reward_amount: u64,
        decimals: u32,
    ) -> Vec<DistributionResult> {
        let total_shares = self.total_shares(holders, decimals);
        debug!(
            holders = holders.len(),
            total_shares,
            pool = total_reward_amount,
            "[SHARES] distributing"
        );

        holders
            .iter()
            .map(|h| {
                let shares = self.shares(h.balance, decimals);
                DistributionResult {
                    address: h.address.clone(),
                    shares,
                    reward: reward_for_shares(total_reward_amount, shares, total_shares),
                }
            })
            .collect()
    }

    /// Same as [`distribute`](Self::distribute) but spread over the rayon pool.
    pub fn distribute_par(
        &self,
        holders: &[HolderBalance],
        total_reward_amount: u64,
        decimals: u32,
    ) -> Vec<DistributionResult> {
        let shares: Vec<u32> = holders
            .par_iter()
            .map(|h| self.shares(h.balance, decimals))
            .collect();
        let total_shares = shares
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(*s as u64));
        debug!(
            holders = holders.len(),
            total_shares,
            pool = total_reward_amount,
            "[SHARES] distributing (parallel)"
        );

        holders
            .par_iter()
            .zip(shares.par_iter())
            .map(|(h, &s)| DistributionResult {
                address: h.address.clone(),
                shares: s,
                reward: reward_for_shares(total_reward_amount, s, total_shares),
            })
            .collect()
    }
}

/// Shares for `balance` under the default policy.
pub fn calculate_shares(balance: u64, decimals: u32) -> u32 {
    SharePolicy::default().shares(balance, decimals)
}

pub fn calculate_total_shares(holders: &[HolderBalance], decimals: u32) -> u64 {
    SharePolicy::default().total_shares(holders, decimals)
}

pub fn calculate_holder_reward(
    holder_balance: u64,
    total_reward_amount: u64,
    total_shares: u64,
    decimals: u32,
) -> ShareResult<u64> {
    SharePolicy::default().holder_reward(holder_balance, total_reward_amount, total_shares, decimals)
}

pub fn distribute_rewards(
    holders: &[HolderBalance],
    total_reward_amount: u64,
    decimals: u32,
) -> Vec<DistributionResult> {
    SharePolicy::default().distribute(holders, total_reward_amount, decimals)
}

pub fn distribute_rewards_par(
    holders: &[HolderBalance],
    total_reward_amount: u64,
    decimals: u32,
) -> Vec<DistributionResult> {
    SharePolicy::default().distribute_par(holders, total_reward_amount, decimals)
}

/// Totals for one distribution batch.
///
/// `distributed + dust == pool`; results paying out more than the pool are
/// rejected. Dust is not swept to any holder; the distributing wallet keeps
/// it for the next cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionSummary {
    pub total_shares: u64,
    pub pool: u64,
    pub distributed: u64,
    pub dust: u64,
    pub recipients: u64,
}

impl DistributionSummary {
    pub fn from_results(results: &[DistributionResult], pool: u64) -> ShareResult<Self> {
        let mut total_shares: u64 = 0;
        let mut distributed: u128 = 0;
        let mut recipients: u64 = 0;
        for r in results {
            total_shares = total_shares.saturating_add(r.shares as u64);
            distributed += r.reward as u128;
            if r.reward > 0 {
                recipients += 1;
            }
        }
        if distributed > pool as u128 {
            return Err(ShareError::invalid(format!(
                "results pay out {} but the pool is {}",
                distributed, pool
            )));
        }
        let distributed = distributed as u64;
        Ok(Self {
            total_shares,
            pool,
            distributed,
            dust: pool - distributed,
            recipients,
        })
    }
}

pub fn summarize(results: &[DistributionResult], pool: u64) -> ShareResult<DistributionSummary> {
    DistributionSummary::from_results(results, pool)
}

/// `floor(pool * shares / total_shares)`; the u128 product cannot overflow
/// and the quotient never exceeds `pool` while `shares <= total_shares`.
fn reward_for_shares(pool: u64, shares: u32, total_shares: u64) -> u64 {
    if total_shares == 0 || shares == 0 {
        return 0;
    }
    mul_div_floor(pool, shares as u64, total_shares)
}

fn mul_div_floor(a: u64, b: u64, d: u64) -> u64 {
    if d == 0 {
        return 0;
    }
    let q = (a as u128 * b as u128) / d as u128;
    u64::try_from(q).unwrap_or(u64::MAX)
}
