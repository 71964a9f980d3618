//! deposit balance reconstruction from a transaction log

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::decimal::Money;
use crate::enrichment::{EnrichmentBatch, RecordOutcome};
use crate::errors::Result;
use crate::records::{DepositRecord, DepositTransaction};
use crate::types::{BalanceSource, TransactionKind};
use crate::views::DepositEnrichedView;

/// a reconstructed balance and where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReconstruction {
    pub balance: Money,
    pub source: BalanceSource,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DepositReconstructor;

impl DepositReconstructor {
    pub fn new() -> Self {
        Self
    }

    /// balance after the chronologically last transaction
    ///
    /// A numeric balance recorded on that transaction wins; otherwise the
    /// log is folded from zero with deposits adding and withdrawals
    /// subtracting. Transactions without a usable date sort first.
    pub fn reconstruct(&self, transactions: &[DepositTransaction]) -> Result<BalanceReconstruction> {
        let mut ordered: Vec<&DepositTransaction> = transactions.iter().collect();
        ordered.sort_by_key(|tx| tx.effective_date());

        let Some(last) = ordered.last() else {
            return Ok(BalanceReconstruction {
                balance: Money::ZERO,
                source: BalanceSource::Empty,
            });
        };

        if let Some(balance) = last.recorded_balance() {
            return Ok(BalanceReconstruction {
                balance,
                source: BalanceSource::Recorded,
            });
        }

        let balance = ordered
            .iter()
            .try_fold(Money::ZERO, |balance, tx| match tx.kind() {
                TransactionKind::Deposit => balance.checked_add(tx.amount),
                TransactionKind::Withdrawal => balance.checked_sub(tx.amount),
                TransactionKind::Other => Ok(balance),
            })?;

        Ok(BalanceReconstruction {
            balance,
            source: BalanceSource::Recomputed,
        })
    }

    /// current balance, zero when reconstruction fails
    pub fn current_balance(&self, transactions: &[DepositTransaction]) -> Money {
        match self.reconstruct(transactions) {
            Ok(reconstruction) => reconstruction.balance,
            Err(error) => {
                warn!(
                    transactions = transactions.len(),
                    error = %error,
                    "deposit balance reconstruction failed, reporting zero"
                );
                Money::ZERO
            }
        }
    }

    pub fn enrich(&self, record: &DepositRecord) -> RecordOutcome<DepositEnrichedView> {
        match self.reconstruct(&record.transactions) {
            Ok(reconstruction) => {
                RecordOutcome::Enriched(DepositEnrichedView::new(record, reconstruction.balance))
            }
            Err(error) => {
                warn!(
                    transactions = record.transactions.len(),
                    error = %error,
                    "deposit balance reconstruction failed, reporting zero"
                );
                RecordOutcome::Fallback {
                    view: DepositEnrichedView::new(record, Money::ZERO),
                    error,
                }
            }
        }
    }

    /// enrich deposits in parallel, keeping input order
    pub fn enrich_batch(&self, records: &[DepositRecord]) -> EnrichmentBatch<DepositEnrichedView> {
        EnrichmentBatch::new(records.par_iter().map(|record| self.enrich(record)).collect())
    }

    /// enrich stored json deposits; one that does not read as a deposit
    /// reports a zero balance without stopping the batch
    pub fn enrich_stored(&self, stored: &[Value]) -> EnrichmentBatch<Value> {
        EnrichmentBatch::new(
            stored
                .par_iter()
                .map(|value| self.enrich_stored_record(value))
                .collect(),
        )
    }

    fn enrich_stored_record(&self, stored: &Value) -> RecordOutcome<Value> {
        let record: DepositRecord = match serde_json::from_value(stored.clone()) {
            Ok(record) => record,
            Err(error) => {
                warn!(error = %error, "stored deposit record unreadable, reporting zero");
                return RecordOutcome::Fallback {
                    view: DepositEnrichedView::stored_fallback(stored),
                    error: error.into(),
                };
            }
        };

        match self.enrich(&record) {
            RecordOutcome::Enriched(view) => RecordOutcome::Enriched(view.merge_into(stored)),
            RecordOutcome::Fallback { view, error } => RecordOutcome::Fallback {
                view: view.merge_into(stored),
                error,
            },
        }
    }
}
