use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};
use crate::interest::MinimumInterestConfig;

/// ledger reconstruction configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// days per year used to derive the daily rate
    pub year_basis_days: u32,
    /// loans evaluated earlier than this many days after origination are
    /// charged at least this many days of interest
    pub minimum_interest_days: u32,
    /// switch for the minimum-interest floor
    pub enforce_minimum_interest: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            year_basis_days: 365,
            minimum_interest_days: 30,
            enforce_minimum_interest: true,
        }
    }
}

impl LedgerConfig {
    /// configuration without the minimum-interest floor
    pub fn without_minimum_interest() -> Self {
        Self {
            enforce_minimum_interest: false,
            ..Self::default()
        }
    }

    /// floor settings, `None` when the floor is switched off
    pub fn minimum_interest(&self) -> Option<MinimumInterestConfig> {
        self.enforce_minimum_interest.then_some(MinimumInterestConfig {
            minimum_days: self.minimum_interest_days,
        })
    }

    /// parse from json, missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LedgerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.year_basis_days == 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: "year_basis_days must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
