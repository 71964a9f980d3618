use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::elapsed_days;
use crate::decimal::Money;
use crate::errors::Result;
use crate::interest::AccrualEngine;
use crate::state::LoanLedgerState;

/// minimum interest charged on loans evaluated shortly after origination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumInterestConfig {
    /// the floor applies while fewer than this many days have elapsed,
    /// and charges interest for this many days
    pub minimum_days: u32,
}

impl Default for MinimumInterestConfig {
    fn default() -> Self {
        Self { minimum_days: 30 }
    }
}

/// what the floor did to a simulated state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinimumInterestOutcome {
    /// the loan is past the minimum window
    NotApplicable,
    /// inside the window, but recognized interest already meets the floor
    Satisfied,
    /// accrued interest was raised by the shortfall
    Applied { shortfall: Money },
}

/// enforces the minimum-interest floor once, after the event walk
pub struct MinimumInterestEnforcer {
    pub config: MinimumInterestConfig,
}

impl MinimumInterestEnforcer {
    pub fn new(config: MinimumInterestConfig) -> Self {
        Self { config }
    }

    /// floor amount: `amount_given` charged for the full minimum window
    pub fn minimum_interest(&self, engine: &AccrualEngine, amount_given: Money) -> Result<Money> {
        engine.calculate_simple_interest(amount_given, self.config.minimum_days)
    }

    /// raise accrued interest so interest paid, over-paid and accrued add up
    /// to at least the floor when `as_of` falls inside the window
    pub fn enforce(
        &self,
        state: &mut LoanLedgerState,
        engine: &AccrualEngine,
        amount_given: Money,
        origination: DateTime<Utc>,
        as_of: DateTime<Utc>,
    ) -> Result<MinimumInterestOutcome> {
        let days_since_start = elapsed_days(origination, as_of);
        if days_since_start >= self.config.minimum_days {
            return Ok(MinimumInterestOutcome::NotApplicable);
        }

        let minimum = self.minimum_interest(engine, amount_given)?;
        let recognized = state.recognized_interest()?;
        if minimum <= recognized {
            return Ok(MinimumInterestOutcome::Satisfied);
        }

        let shortfall = minimum.checked_sub(recognized)?;
        state.accrue(shortfall)?;

        debug!(
            days_since_start,
            minimum = %minimum,
            shortfall = %shortfall,
            "minimum interest applied"
        );

        Ok(MinimumInterestOutcome::Applied { shortfall })
    }
}
