//! Core configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | PRICE_PER_KG | 450000 | Regular rate per kg |
//! | DAMAGE_PRICE_PER_KG | 250000 | Damage-sale rate per kg |
//! | STAFF_DISCOUNT_RATE | 0.10 | Staff discount as a ratio of the base rate |
//! | BUSINESS_TIMEZONE | Asia/Tehran | Timezone used to derive calendar dates |
//! | INVOICE_START_NUMBER | 6311 | First invoice number issued |
//!
//! A `.env` file in the working directory is read first when present.

use crate::error::{CoreError, CoreResult};
use crate::pricing::MAX_RATE_PER_KG;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const DEFAULT_PRICE_PER_KG: i64 = 450_000;
const DEFAULT_DAMAGE_PRICE_PER_KG: i64 = 250_000;
/// 10%
const DEFAULT_STAFF_DISCOUNT_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Tehran;
pub const DEFAULT_INVOICE_START: u64 = 6311;

/// Configured pricing rates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Rate per kg for fillet and cleaned orders
    pub price_per_kg: Decimal,
    /// Rate per kg for damage-sale orders
    pub damage_price_per_kg: Decimal,
    /// Staff discount ratio in [0, 1]
    pub staff_discount_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            price_per_kg: Decimal::from(DEFAULT_PRICE_PER_KG),
            damage_price_per_kg: Decimal::from(DEFAULT_DAMAGE_PRICE_PER_KG),
            staff_discount_rate: DEFAULT_STAFF_DISCOUNT_RATE,
        }
    }
}

impl PricingConfig {
    /// Reject rates outside [0, MAX_RATE_PER_KG] and discount ratios outside [0, 1]
    pub fn validate(&self) -> CoreResult<()> {
        let max_rate = Decimal::from(MAX_RATE_PER_KG);
        if self.price_per_kg.is_sign_negative() || self.price_per_kg > max_rate {
            return Err(CoreError::config("PRICE_PER_KG", self.price_per_kg.to_string()));
        }
        if self.damage_price_per_kg.is_sign_negative() || self.damage_price_per_kg > max_rate {
            return Err(CoreError::config(
                "DAMAGE_PRICE_PER_KG",
                self.damage_price_per_kg.to_string(),
            ));
        }
        if self.staff_discount_rate.is_sign_negative() || self.staff_discount_rate > Decimal::ONE {
            return Err(CoreError::config(
                "STAFF_DISCOUNT_RATE",
                self.staff_discount_rate.to_string(),
            ));
        }
        Ok(())
    }
}

/// Full core configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    pub pricing: PricingConfig,
    /// Timezone in which order timestamps become calendar dates
    pub timezone: Tz,
    /// First invoice number the sequence may issue
    pub invoice_start: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            timezone: DEFAULT_TIMEZONE,
            invoice_start: DEFAULT_INVOICE_START,
        }
    }
}

impl CoreConfig {
    /// Load from environment, failing on any present but malformed value
    pub fn try_from_env() -> CoreResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from environment, falling back to defaults on malformed values
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Malformed configuration, using defaults");
            Self::default()
        })
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let pricing = PricingConfig {
            price_per_kg: parse_or(&lookup, "PRICE_PER_KG", defaults.pricing.price_per_kg)?,
            damage_price_per_kg: parse_or(
                &lookup,
                "DAMAGE_PRICE_PER_KG",
                defaults.pricing.damage_price_per_kg,
            )?,
            staff_discount_rate: parse_or(
                &lookup,
                "STAFF_DISCOUNT_RATE",
                defaults.pricing.staff_discount_rate,
            )?,
        };
        pricing.validate()?;

        let timezone = match lookup("BUSINESS_TIMEZONE") {
            Some(raw) => raw
                .trim()
                .parse::<Tz>()
                .map_err(|_| CoreError::config("BUSINESS_TIMEZONE", raw))?,
            None => defaults.timezone,
        };

        Ok(Self {
            pricing,
            timezone,
            invoice_start: parse_or(&lookup, "INVOICE_START_NUMBER", defaults.invoice_start)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> CoreResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CoreError::config(key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.pricing.staff_discount_rate, Decimal::new(1, 1));
        assert_eq!(config.invoice_start, 6311);
    }

    #[test]
    fn test_overrides() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            ("PRICE_PER_KG", "500000"),
            ("DAMAGE_PRICE_PER_KG", " 300000 "),
            ("STAFF_DISCOUNT_RATE", "0.15"),
            ("BUSINESS_TIMEZONE", "Europe/Madrid"),
            ("INVOICE_START_NUMBER", "7000"),
        ]))
        .unwrap();
        assert_eq!(config.pricing.price_per_kg, Decimal::from(500_000));
        assert_eq!(config.pricing.damage_price_per_kg, Decimal::from(300_000));
        assert_eq!(config.pricing.staff_discount_rate, Decimal::new(15, 2));
        assert_eq!(config.timezone, chrono_tz::Europe::Madrid);
        assert_eq!(config.invoice_start, 7000);
    }

    #[test]
    fn test_malformed_values_rejected() {
        let err = CoreConfig::from_lookup(lookup_from(&[("PRICE_PER_KG", "cheap")])).unwrap_err();
        assert!(matches!(err, CoreError::Config { ref key, .. } if key == "PRICE_PER_KG"));

        let err =
            CoreConfig::from_lookup(lookup_from(&[("BUSINESS_TIMEZONE", "Mars/Olympus")])).unwrap_err();
        assert!(matches!(err, CoreError::Config { ref key, .. } if key == "BUSINESS_TIMEZONE"));
    }

    #[test]
    fn test_discount_rate_bounds() {
        assert!(CoreConfig::from_lookup(lookup_from(&[("STAFF_DISCOUNT_RATE", "1.5")])).is_err());
        assert!(CoreConfig::from_lookup(lookup_from(&[("STAFF_DISCOUNT_RATE", "-0.1")])).is_err());
        assert!(CoreConfig::from_lookup(lookup_from(&[("STAFF_DISCOUNT_RATE", "1")])).is_ok());
    }

    #[test]
    fn test_rate_upper_bound() {
        let err = CoreConfig::from_lookup(lookup_from(&[(
            "PRICE_PER_KG",
            "79228162514264337593543950335",
        )]))
        .unwrap_err();
        assert!(matches!(err, CoreError::Config { ref key, .. } if key == "PRICE_PER_KG"));

        let err = CoreConfig::from_lookup(lookup_from(&[("DAMAGE_PRICE_PER_KG", "1000000001")]))
            .unwrap_err();
        assert!(matches!(err, CoreError::Config { ref key, .. } if key == "DAMAGE_PRICE_PER_KG"));

        assert!(CoreConfig::from_lookup(lookup_from(&[("PRICE_PER_KG", "1000000000")])).is_ok());
    }
}
