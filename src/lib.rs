pub mod config;
pub mod dates;
pub mod decimal;
pub mod deposit;
pub mod enrichment;
pub mod errors;
pub mod events;
pub mod interest;
pub mod payments;
pub mod records;
pub mod simulation;
pub mod state;
pub mod types;
pub mod views;

#[cfg(test)]
mod simulation_props;

// re-export key types
pub use config::LedgerConfig;
pub use dates::DateLike;
pub use decimal::{Money, Rate};
pub use deposit::{BalanceReconstruction, DepositReconstructor};
pub use enrichment::{EnrichmentBatch, LoanEnricher, RecordOutcome};
pub use errors::{LedgerError, Result};
pub use events::{normalize_events, NormalizedEvents, RepaymentEvent};
pub use interest::{AccrualEngine, MinimumInterestConfig, MinimumInterestEnforcer, MinimumInterestOutcome};
pub use payments::{OutstandingBalances, PaymentWaterfall};
pub use records::{DepositRecord, DepositTransaction, LoanRecord, RawRepaymentEvent};
pub use simulation::{InterestAccrualSimulator, LedgerEntry, LoanSimulation, LoanTerms};
pub use state::LoanLedgerState;
pub use types::{BalanceSource, PaymentApplication, RepaymentKind, TransactionKind};
pub use views::{DepositEnrichedView, LoanEnrichedView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
