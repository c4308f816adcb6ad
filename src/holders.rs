//! Holder Snapshots
//!
//! Loads `(address, balance)` lists exported from token-account enumeration.
//! Two JSON layouts are accepted:
//!
//! ```json
//! [{ "address": "...", "balance": "2500000000000" }]
//! { "decimals": 6, "holders": [{ "address": "...", "balance": 2500000000000 }] }
//! ```
//!
//! Balances may be numbers or strings (large SPL amounts overflow JS numbers,
//! so exporters often write strings).

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::amount::{amount_from_signed, decimals_from_signed, parse_amount};
use crate::constants::SOLANA_PUBKEY_LEN;
use crate::error::{ShareError, ShareResult};
use crate::shares::HolderBalance;

/// `balance` stays a raw JSON value so floats, out-of-range integers and
/// other junk reach [`amount_from_json`] and fail with the holder index.
#[derive(Debug, Deserialize)]
struct RawHolder {
    address: String,
    balance: Value,
}

#[derive(Debug, Deserialize)]
struct RawWrapped {
    #[serde(default)]
    decimals: Option<Value>,
    holders: Vec<RawHolder>,
}

fn amount_from_json(v: &Value) -> ShareResult<u64> {
    match v {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(u)
            } else if let Some(i) = n.as_i64() {
                amount_from_signed(i as i128)
            } else {
                Err(ShareError::invalid(format!(
                    "amount {} is not an integer within u64 range",
                    n
                )))
            }
        }
        Value::String(s) => parse_amount(s),
        other => Err(ShareError::invalid(format!(
            "amount {} is not a number or string",
            other
        ))),
    }
}

fn decimals_from_json(v: &Value) -> ShareResult<u32> {
    match v {
        Value::Number(n) => match n.as_i64() {
            Some(i) => decimals_from_signed(i),
            None => Err(ShareError::invalid(format!("decimals {} is not a valid integer", n))),
        },
        other => Err(ShareError::invalid(format!("decimals {} is not a number", other))),
    }
}

/// Parsed holder list. `decimals` is set only when the file carried it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolderSnapshot {
    pub decimals: Option<u32>,
    pub holders: Vec<HolderBalance>,
}

impl HolderSnapshot {
    /// Load a snapshot file.
    pub fn load<P: AsRef<Path>>(path: P, strict_addresses: bool) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading holder snapshot {}", path.display()))?;
        let snapshot = Self::from_json_str(&content, strict_addresses)
            .with_context(|| format!("parsing holder snapshot {}", path.display()))?;
        info!(
            "[HOLDERS] Loaded {} holders from {}",
            snapshot.holders.len(),
            path.display()
        );
        Ok(snapshot)
    }

    pub fn from_json_str(content: &str, strict_addresses: bool) -> Result<Self> {
        let raw: Value = serde_json::from_str(content).context("invalid snapshot JSON")?;
        let (decimals, raw_holders) = match raw {
            Value::Object(_) => {
                let wrapped: RawWrapped =
                    serde_json::from_value(raw).context("invalid snapshot object")?;
                let decimals = wrapped.decimals.as_ref().map(decimals_from_json).transpose()?;
                (decimals, wrapped.holders)
            }
            Value::Array(_) => {
                let holders: Vec<RawHolder> =
                    serde_json::from_value(raw).context("invalid holder array")?;
                (None, holders)
            }
            _ => anyhow::bail!("snapshot must be a JSON array or object"),
        };

        let mut holders = Vec::with_capacity(raw_holders.len());
        for (i, raw) in raw_holders.into_iter().enumerate() {
            let balance = amount_from_json(&raw.balance).map_err(|e| {
                ShareError::invalid(format!("holder #{} ({}): {}", i, raw.address, e.message()))
            })?;

            if !is_valid_solana_address(&raw.address) {
                if strict_addresses {
                    return Err(ShareError::invalid(format!(
                        "holder #{}: {:?} is not a valid Solana address",
                        i, raw.address
                    ))
                    .into());
                }
                warn!("[HOLDERS] holder #{} has non-Solana address {:?}", i, raw.address);
            }

            holders.push(HolderBalance {
                address: raw.address,
                balance,
            });
        }

        Ok(Self { decimals, holders })
    }
}

/// Solana public keys are base58 strings decoding to exactly 32 bytes.
pub fn is_valid_solana_address(addr: &str) -> bool {
    // 32 bytes encode to 32..=44 base58 chars
    if addr.len() < 32 || addr.len() > 44 {
        return false;
    }
    match bs58::decode(addr).into_vec() {
        Ok(bytes) => bytes.len() == SOLANA_PUBKEY_LEN,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SOLANA_BURN_ADDRESS;

    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    #[test]
    fn test_address_validation() {
        assert!(is_valid_solana_address(USDC));
        assert!(is_valid_solana_address(SOLANA_BURN_ADDRESS));
        assert!(!is_valid_solana_address("wallet1"));
        // '0' and 'l' are outside the base58 alphabet
        assert!(!is_valid_solana_address("0PjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"));
        assert!(!is_valid_solana_address("lPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"));
    }

    #[test]
    fn test_bare_array_with_mixed_balance_encodings() {
        let json = r#"[
            {"address": "wallet1", "balance": 2500000000000},
            {"address": "wallet2", "balance": "1000000000000"},
            {"address": "wallet3", "balance": "18446744073709551615"}
        ]"#;
        let snap = HolderSnapshot::from_json_str(json, false).unwrap();
        assert_eq!(snap.decimals, None);
        assert_eq!(snap.holders.len(), 3);
        assert_eq!(snap.holders[0], HolderBalance::new("wallet1", 2_500_000_000_000));
        assert_eq!(snap.holders[1].balance, 1_000_000_000_000);
        assert_eq!(snap.holders[2].balance, u64::MAX);
    }

    #[test]
    fn test_wrapped_snapshot_carries_decimals() {
        let json = r#"{"decimals": 9, "holders": [{"address": "a", "balance": 1}]}"#;
        let snap = HolderSnapshot::from_json_str(json, false).unwrap();
        assert_eq!(snap.decimals, Some(9));
        assert_eq!(snap.holders[0].balance, 1);
    }

    #[test]
    fn test_negative_balance_rejected() {
        let json = r#"[{"address": "ok", "balance": 5}, {"address": "bad", "balance": -5}]"#;
        let err = HolderSnapshot::from_json_str(json, false).unwrap_err();
        let share_err = err.downcast_ref::<ShareError>().expect("ShareError");
        assert!(share_err.to_string().contains("holder #1"));

        let json = r#"[{"address": "bad", "balance": "-1"}]"#;
        assert!(HolderSnapshot::from_json_str(json, false).is_err());
    }

    #[test]
    fn test_negative_decimals_rejected() {
        let json = r#"{"decimals": -6, "holders": []}"#;
        let err = HolderSnapshot::from_json_str(json, false).unwrap_err();
        assert!(err.downcast_ref::<ShareError>().is_some());
    }

    #[test]
    fn test_fractional_balance_names_holder() {
        let json = r#"[{"address": "ok", "balance": 5}, {"address": "bad", "balance": 1.5}]"#;
        let err = HolderSnapshot::from_json_str(json, false).unwrap_err();
        let share_err = err.downcast_ref::<ShareError>().expect("ShareError");
        assert!(matches!(share_err, ShareError::InvalidArgument(_)));
        assert!(share_err.message().starts_with("holder #1 (bad)"));
    }

    #[test]
    fn test_balance_above_u64_names_holder() {
        let json = r#"{"decimals": 6, "holders": [{"address": "whale", "balance": 100000000000000000000}]}"#;
        let err = HolderSnapshot::from_json_str(json, false).unwrap_err();
        let share_err = err.downcast_ref::<ShareError>().expect("ShareError");
        assert!(share_err.message().starts_with("holder #0 (whale)"));

        let json = r#"[{"address": "w", "balance": true}]"#;
        let err = HolderSnapshot::from_json_str(json, false).unwrap_err();
        assert!(err.downcast_ref::<ShareError>().is_some());
    }

    #[test]
    fn test_malformed_decimals_rejected() {
        for json in [
            r#"{"decimals": 6.5, "holders": []}"#,
            r#"{"decimals": "six", "holders": []}"#,
            r#"{"decimals": 100000000000000000000, "holders": []}"#,
        ] {
            let err = HolderSnapshot::from_json_str(json, false).unwrap_err();
            let share_err = err.downcast_ref::<ShareError>().expect("ShareError");
            assert!(matches!(share_err, ShareError::InvalidArgument(_)), "{}", json);
        }
    }

    #[test]
    fn test_error_message_has_single_prefix() {
        let json = r#"[{"address": "bad", "balance": -5}]"#;
        let err = HolderSnapshot::from_json_str(json, false).unwrap_err();
        let text = err.downcast_ref::<ShareError>().unwrap().to_string();
        assert_eq!(text.matches("invalid argument").count(), 1, "{}", text);
        assert_eq!(text, "invalid argument: holder #0 (bad): amount -5 is negative");
    }

    #[test]
    fn test_strict_addresses() {
        let json = format!(r#"[{{"address": "{}", "balance": 1}}]"#, USDC);
        assert!(HolderSnapshot::from_json_str(&json, true).is_ok());

        let json = r#"[{"address": "wallet1", "balance": 1}]"#;
        assert!(HolderSnapshot::from_json_str(json, true).is_err());
        assert!(HolderSnapshot::from_json_str(json, false).is_ok());
    }
}
