use crate::domain::{Amount, Permille};
use crate::engine::RateCurve;
use crate::error::CalcError;
use crate::orchestration::PollPolicy;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Thirty days.
const DEFAULT_DUE_PERIOD_NS: u64 = 30 * 24 * 60 * 60 * 1_000_000_000;

/// Protocol parameters and polling budget the driver checks against.
#[derive(Debug, Clone)]
pub struct Config {
    pub poll_interval_ms: u64,
    pub poll_max_attempts: u32,
    pub due_period_ns: u64,
    pub min_asset: Amount,
    pub utilization_optimal: Permille,
    pub base_interest_rate: Permille,
    pub addon_optimal_interest_rate: Permille,
    pub max_ltd: Option<Permille>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let poll_interval_ms = parse_or(&env_map, "POLL_INTERVAL_MS", 1000u64)?;
        let poll_max_attempts = parse_or(&env_map, "POLL_MAX_ATTEMPTS", 30u32)?;
        if poll_max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "POLL_MAX_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let due_period_ns = parse_or(&env_map, "DUE_PERIOD_NS", DEFAULT_DUE_PERIOD_NS)?;
        let min_asset = Amount::new(parse_or(&env_map, "MIN_ASSET", 0u128)?);

        let utilization_optimal =
            Permille::new(parse_or(&env_map, "UTILIZATION_OPTIMAL_PERMILLE", 700u32)?);
        if utilization_optimal == Permille::ZERO {
            return Err(ConfigError::InvalidValue(
                "UTILIZATION_OPTIMAL_PERMILLE".to_string(),
                "must be positive".to_string(),
            ));
        }
        let base_interest_rate =
            Permille::new(parse_or(&env_map, "BASE_INTEREST_RATE_PERMILLE", 100u32)?);
        let addon_optimal_interest_rate = Permille::new(parse_or(
            &env_map,
            "ADDON_OPTIMAL_INTEREST_RATE_PERMILLE",
            20u32,
        )?);

        let max_ltd = match env_map.get("MAX_LTD_PERMILLE") {
            Some(raw) => Some(Permille::new(parse_value("MAX_LTD_PERMILLE", raw)?)),
            None => None,
        };

        Ok(Config {
            poll_interval_ms,
            poll_max_attempts,
            due_period_ns,
            min_asset,
            utilization_optimal,
            base_interest_rate,
            addon_optimal_interest_rate,
            max_ltd,
        })
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.poll_interval_ms),
            self.poll_max_attempts,
        )
    }

    pub fn rate_curve(&self) -> Result<RateCurve, CalcError> {
        RateCurve::from_permille(
            self.utilization_optimal,
            self.base_interest_rate,
            self.addon_optimal_interest_rate,
        )
    }
}

fn parse_or<T: FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match env_map.get(key) {
        Some(raw) => parse_value(key, raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| {
        ConfigError::InvalidValue(
            key.to_string(),
            format!("must be a non-negative integer, got {}", raw),
        )
    })
}
