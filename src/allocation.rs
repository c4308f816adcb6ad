//! Fee Allocation
//!
//! Token owners pick how incoming fees are carved up: a platform fee, a slice
//! for holder rewards, a slice for buyback-and-burn. Whatever is left goes to
//! the creator. The reward slice is what [`crate::shares`] distributes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    BPS_DENOMINATOR, DEFAULT_PLATFORM_FEE_BPS, MAX_ALLOCATION_BPS, MAX_PLATFORM_FEE_BPS,
};
use crate::error::{ShareError, ShareResult};

/// Allocation percentages in basis points (100 bps = 1%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationConfig {
    #[serde(default = "default_platform_fee_bps")]
    pub platform_fee_bps: u16,
    #[serde(default)]
    pub reward_distribution_bps: u16,
    #[serde(default)]
    pub burn_bps: u16,
}

fn default_platform_fee_bps() -> u16 {
    DEFAULT_PLATFORM_FEE_BPS
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            platform_fee_bps: default_platform_fee_bps(),
            reward_distribution_bps: 0,
            burn_bps: 0,
        }
    }
}

/// Result of splitting one amount. The four buckets sum to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllocationSplit {
    pub platform_fee: u64,
    pub reward_pool: u64,
    pub burn: u64,
    pub creator: u64,
}

impl AllocationSplit {
    pub fn total(&self) -> u128 {
        self.platform_fee as u128 + self.reward_pool as u128 + self.burn as u128 + self.creator as u128
    }
}

impl AllocationConfig {
    pub fn validate(&self) -> ShareResult<()> {
        if self.platform_fee_bps > MAX_PLATFORM_FEE_BPS {
            return Err(ShareError::invalid(format!(
                "platform fee {} bps above maximum {} bps",
                self.platform_fee_bps, MAX_PLATFORM_FEE_BPS
            )));
        }
        if self.reward_distribution_bps > MAX_ALLOCATION_BPS {
            return Err(ShareError::invalid(format!(
                "reward distribution {} bps above {} bps",
                self.reward_distribution_bps, MAX_ALLOCATION_BPS
            )));
        }
        if self.burn_bps > MAX_ALLOCATION_BPS {
            return Err(ShareError::invalid(format!(
                "burn {} bps above {} bps",
                self.burn_bps, MAX_ALLOCATION_BPS
            )));
        }
        let sum = self.committed_bps();
        if sum > MAX_ALLOCATION_BPS as u32 {
            return Err(ShareError::invalid(format!(
                "allocations sum to {} bps, more than {} bps",
                sum, MAX_ALLOCATION_BPS
            )));
        }
        Ok(())
    }

    /// Basis points claimed by platform, rewards and burn together.
    pub fn committed_bps(&self) -> u32 {
        self.platform_fee_bps as u32 + self.reward_distribution_bps as u32 + self.burn_bps as u32
    }

    pub fn creator_bps(&self) -> u32 {
        (MAX_ALLOCATION_BPS as u32).saturating_sub(self.committed_bps())
    }

    /// Split `amount` into buckets. Each bucket is floored; the creator takes
    /// the remainder including rounding dust.
    pub fn split(&self, amount: u64) -> ShareResult<AllocationSplit> {
        self.validate()?;

        let platform_fee = bps_of(amount, self.platform_fee_bps);
        let reward_pool = bps_of(amount, self.reward_distribution_bps);
        let burn = bps_of(amount, self.burn_bps);
        // validate() bounds the three slices to at most `amount`
        let creator = amount - platform_fee - reward_pool - burn;

        debug!(
            amount,
            platform_fee, reward_pool, burn, creator, "[ALLOCATION] split"
        );

        Ok(AllocationSplit {
            platform_fee,
            reward_pool,
            burn,
            creator,
        })
    }
}

/// `floor(amount * bps / 10_000)` in u128.
fn bps_of(amount: u64, bps: u16) -> u64 {
    ((amount as u128 * bps as u128) / BPS_DENOMINATOR as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(platform: u16, reward: u16, burn: u16) -> AllocationConfig {
        AllocationConfig {
            platform_fee_bps: platform,
            reward_distribution_bps: reward,
            burn_bps: burn,
        }
    }

    #[test]
    fn test_default_is_two_percent_platform_fee() {
        let split = AllocationConfig::default().split(1_000_000).unwrap();
        assert_eq!(split.platform_fee, 20_000);
        assert_eq!(split.reward_pool, 0);
        assert_eq!(split.burn, 0);
        assert_eq!(split.creator, 980_000);
    }

    #[test]
    fn test_split_floors_and_creator_takes_dust() {
        // 2% / 5% / 10% of 999
        let split = cfg(200, 500, 1_000).split(999).unwrap();
        assert_eq!(split.platform_fee, 19);
        assert_eq!(split.reward_pool, 49);
        assert_eq!(split.burn, 99);
        assert_eq!(split.creator, 999 - 19 - 49 - 99);
        assert_eq!(split.total(), 999);
    }

    #[test]
    fn test_full_allocation_leaves_creator_nothing() {
        let split = cfg(1_000, 4_000, 5_000).split(u64::MAX).unwrap();
        assert_eq!(split.total(), u64::MAX as u128);
        assert_eq!(cfg(1_000, 4_000, 5_000).creator_bps(), 0);
    }

    #[test]
    fn test_validation() {
        assert!(cfg(1_001, 0, 0).validate().is_err());
        assert!(cfg(0, 10_001, 0).validate().is_err());
        assert!(cfg(0, 0, 10_001).validate().is_err());
        assert!(cfg(500, 5_000, 5_000).validate().is_err());
        assert!(cfg(1_000, 9_000, 0).validate().is_ok());

        let err = cfg(0, 6_000, 6_000).split(100).unwrap_err();
        assert!(matches!(err, ShareError::InvalidArgument(_)));
    }
}
