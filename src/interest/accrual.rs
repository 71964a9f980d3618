use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::elapsed_days;
use crate::decimal::{Money, Rate};
use crate::errors::Result;

/// engine for accruing simple (non-compounding) daily interest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualEngine {
    daily_rate: Rate,
}

impl AccrualEngine {
    /// `annual_rate` in percent, spread over `year_basis_days`
    pub fn new(annual_rate: Rate, year_basis_days: u32) -> Self {
        Self {
            daily_rate: annual_rate.daily_rate(year_basis_days),
        }
    }

    pub fn daily_rate(&self) -> Rate {
        self.daily_rate
    }

    /// interest for `days` whole days on `principal`
    pub fn calculate_simple_interest(&self, principal: Money, days: u32) -> Result<Money> {
        principal.apply_daily_rate(self.daily_rate, days)
    }

    /// accrue the segment between two instants; nothing accrues for
    /// partial days or while no principal is outstanding
    pub fn accrue_segment(
        &self,
        principal: Money,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SegmentAccrual> {
        let days = elapsed_days(start, end);

        let interest_amount = if days > 0 && principal.is_positive() {
            self.calculate_simple_interest(principal, days)?
        } else {
            Money::ZERO
        };

        Ok(SegmentAccrual {
            start,
            end,
            days,
            principal_base: principal,
            interest_amount,
        })
    }
}

/// interest accrued over one segment between ledger events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentAccrual {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub days: u32,
    pub principal_base: Money,
    pub interest_amount: Money,
}
