use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::LedgerConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::events::{NormalizedEvents, RepaymentEvent};
use crate::interest::{AccrualEngine, MinimumInterestEnforcer, MinimumInterestOutcome};
use crate::payments::{OutstandingBalances, PaymentWaterfall};
use crate::records::LoanRecord;
use crate::state::LoanLedgerState;
use crate::types::{PaymentApplication, RepaymentKind};

/// origination terms the simulation runs on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub amount_given: Money,
    pub origination: DateTime<Utc>,
    /// annual rate in percent
    pub annual_rate: Rate,
}

impl LoanTerms {
    pub fn new(amount_given: Money, origination: DateTime<Utc>, annual_rate: Rate) -> Result<Self> {
        if amount_given.is_negative() {
            return Err(LedgerError::NegativePrincipal { amount: amount_given });
        }
        if annual_rate.is_negative() {
            return Err(LedgerError::InvalidInterestRate { rate: annual_rate });
        }

        Ok(Self {
            amount_given,
            origination,
            annual_rate,
        })
    }

    /// read the terms off a stored record
    pub fn from_record(record: &LoanRecord) -> Result<Self> {
        let origination = match record.date.as_ref() {
            Some(date) => date.parse().ok_or_else(|| LedgerError::InvalidDate {
                field: "date",
                value: date.describe(),
            })?,
            None => return Err(LedgerError::MissingField { field: "date" }),
        };

        let annual_rate = record.interest_rate.ok_or(LedgerError::MissingField {
            field: "interestRate",
        })?;

        Self::new(record.amount_given, origination, annual_rate)
    }
}

/// one line of the reconstructed ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: DateTime<Utc>,
    pub kind: RepaymentKind,
    pub amount: Money,
    pub elapsed_days: u32,
    pub interest_accrued: Money,
    /// empty for top-ups
    pub application: PaymentApplication,
    pub principal_after: Money,
    pub accrued_interest_after: Money,
}

/// result of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSimulation {
    pub as_of: DateTime<Utc>,
    pub state: LoanLedgerState,
    pub entries: Vec<LedgerEntry>,
    /// days and interest of the segment from the last event to `as_of`
    pub tail_days: u32,
    pub tail_interest: Money,
    pub minimum_interest: MinimumInterestOutcome,
}

impl LoanSimulation {
    pub fn remaining_principal(&self) -> Money {
        self.state.principal
    }

    pub fn due_amount(&self) -> Result<Money> {
        self.state.due_amount()
    }
}

/// walks normalized events over a loan's terms
pub struct InterestAccrualSimulator {
    config: LedgerConfig,
    waterfall: PaymentWaterfall,
}

impl InterestAccrualSimulator {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            waterfall: PaymentWaterfall::new(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// event walk plus tail accrual, without the minimum-interest floor
    pub fn walk(
        &self,
        terms: &LoanTerms,
        events: &[RepaymentEvent],
        as_of: DateTime<Utc>,
    ) -> Result<LoanSimulation> {
        let engine = self.engine(terms);
        let mut state = LoanLedgerState::open(terms.amount_given, terms.origination);
        let mut entries = Vec::with_capacity(events.len());

        for event in events {
            let segment = engine.accrue_segment(state.principal, state.last_event_date, event.date)?;
            state.accrue(segment.interest_amount)?;

            let application = match event.kind {
                RepaymentKind::TopUp => {
                    state.top_up(event.amount)?;
                    PaymentApplication::default()
                }
                RepaymentKind::Payment => {
                    let application = self.waterfall.allocate(
                        event.amount,
                        OutstandingBalances {
                            accrued_interest: state.accrued_interest,
                            principal: state.principal,
                        },
                    );
                    state.record_payment(&application)?;
                    application
                }
            };

            state.last_event_date = event.date;

            entries.push(LedgerEntry {
                date: event.date,
                kind: event.kind,
                amount: event.amount,
                elapsed_days: segment.days,
                interest_accrued: segment.interest_amount,
                application,
                principal_after: state.principal,
                accrued_interest_after: state.accrued_interest,
            });
        }

        let tail = engine.accrue_segment(state.principal, state.last_event_date, as_of)?;
        state.accrue(tail.interest_amount)?;

        Ok(LoanSimulation {
            as_of,
            state,
            entries,
            tail_days: tail.days,
            tail_interest: tail.interest_amount,
            minimum_interest: MinimumInterestOutcome::NotApplicable,
        })
    }

    /// full simulation: event walk, tail accrual, then the minimum-interest floor
    pub fn simulate(
        &self,
        terms: &LoanTerms,
        events: &NormalizedEvents,
        as_of: DateTime<Utc>,
    ) -> Result<LoanSimulation> {
        let mut simulation = self.walk(terms, events.events(), as_of)?;

        if let Some(minimum_config) = self.config.minimum_interest() {
            let enforcer = MinimumInterestEnforcer::new(minimum_config);
            simulation.minimum_interest = enforcer.enforce(
                &mut simulation.state,
                &self.engine(terms),
                terms.amount_given,
                terms.origination,
                as_of,
            )?;
        }

        Ok(simulation)
    }

    fn engine(&self, terms: &LoanTerms) -> AccrualEngine {
        AccrualEngine::new(terms.annual_rate, self.config.year_basis_days)
    }
}

impl Default for InterestAccrualSimulator {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}
