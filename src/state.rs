use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::types::PaymentApplication;

/// running balances of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanLedgerState {
    pub principal: Money,
    pub accrued_interest: Money,
    pub interest_paid: Money,
    /// payment money left over once interest and principal were cleared
    pub extra_interest_paid: Money,
    pub last_event_date: DateTime<Utc>,
}

impl LoanLedgerState {
    /// opening state: full principal outstanding, nothing accrued
    pub fn open(principal: Money, origination: DateTime<Utc>) -> Self {
        Self {
            principal,
            accrued_interest: Money::ZERO,
            interest_paid: Money::ZERO,
            extra_interest_paid: Money::ZERO,
            last_event_date: origination,
        }
    }

    /// principal plus accrued interest
    pub fn due_amount(&self) -> Result<Money> {
        self.principal.checked_add(self.accrued_interest)
    }

    /// interest recognized so far, paid or outstanding
    pub fn recognized_interest(&self) -> Result<Money> {
        self.interest_paid
            .checked_add(self.extra_interest_paid)?
            .checked_add(self.accrued_interest)
    }

    pub fn accrue(&mut self, interest: Money) -> Result<()> {
        self.accrued_interest = self.accrued_interest.checked_add(interest)?;
        Ok(())
    }

    pub fn top_up(&mut self, amount: Money) -> Result<()> {
        self.principal = self.principal.checked_add(amount)?;
        Ok(())
    }

    /// book a split produced by the payment waterfall
    pub fn record_payment(&mut self, application: &PaymentApplication) -> Result<()> {
        self.accrued_interest = self.accrued_interest.checked_sub(application.to_interest)?;
        self.interest_paid = self.interest_paid.checked_add(application.to_interest)?;
        self.principal = self.principal.checked_sub(application.to_principal)?;
        self.extra_interest_paid = self.extra_interest_paid.checked_add(application.excess)?;
        Ok(())
    }

    pub fn is_settled(&self) -> bool {
        self.principal.is_zero() && self.accrued_interest.is_zero()
    }
}
