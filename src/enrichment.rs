use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::LedgerConfig;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::normalize_events;
use crate::records::{is_marked_deleted, money_from_value, LoanRecord};
use crate::simulation::{InterestAccrualSimulator, LoanSimulation, LoanTerms};
use crate::views::LoanEnrichedView;

/// result of enriching one stored record
#[derive(Debug)]
pub enum RecordOutcome<V> {
    Enriched(V),
    /// the record could not be computed; `view` carries safe defaults
    Fallback { view: V, error: LedgerError },
}

impl<V> RecordOutcome<V> {
    pub fn view(&self) -> &V {
        match self {
            RecordOutcome::Enriched(view) => view,
            RecordOutcome::Fallback { view, .. } => view,
        }
    }

    pub fn into_view(self) -> V {
        match self {
            RecordOutcome::Enriched(view) => view,
            RecordOutcome::Fallback { view, .. } => view,
        }
    }

    pub fn error(&self) -> Option<&LedgerError> {
        match self {
            RecordOutcome::Enriched(_) => None,
            RecordOutcome::Fallback { error, .. } => Some(error),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RecordOutcome::Fallback { .. })
    }
}

/// per-record outcomes of a batch, in input order
#[derive(Debug)]
pub struct EnrichmentBatch<V> {
    outcomes: Vec<RecordOutcome<V>>,
}

impl<V> EnrichmentBatch<V> {
    pub fn new(outcomes: Vec<RecordOutcome<V>>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[RecordOutcome<V>] {
        &self.outcomes
    }

    pub fn views(&self) -> impl Iterator<Item = &V> {
        self.outcomes.iter().map(RecordOutcome::view)
    }

    pub fn into_views(self) -> Vec<V> {
        self.outcomes.into_iter().map(RecordOutcome::into_view).collect()
    }

    pub fn fallback_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_fallback()).count()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// derives balances for stored loan records
pub struct LoanEnricher {
    simulator: InterestAccrualSimulator,
}

impl LoanEnricher {
    pub fn new(config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            simulator: InterestAccrualSimulator::new(config),
        })
    }

    /// full simulation of one record, ledger trail included
    pub fn simulate(&self, record: &LoanRecord, as_of: DateTime<Utc>) -> Result<LoanSimulation> {
        let terms = LoanTerms::from_record(record)?;
        let events = normalize_events(&record.partial_repayments);
        self.simulator.simulate(&terms, &events, as_of)
    }

    /// enrich one record; failures degrade to the fallback view
    pub fn enrich(&self, record: &LoanRecord, as_of: DateTime<Utc>) -> RecordOutcome<LoanEnrichedView> {
        match self.compute_view(record, as_of) {
            Ok(view) => RecordOutcome::Enriched(view),
            Err(error) => {
                warn!(
                    amount_given = %record.amount_given,
                    error = %error,
                    "loan enrichment failed, returning stored amount as due"
                );
                RecordOutcome::Fallback {
                    view: LoanEnrichedView::fallback(record),
                    error,
                }
            }
        }
    }

    /// enrich every record not marked deleted, in parallel, keeping input order
    pub fn enrich_batch(
        &self,
        records: &[LoanRecord],
        as_of: DateTime<Utc>,
    ) -> EnrichmentBatch<LoanEnrichedView> {
        let outcomes: Vec<_> = records
            .par_iter()
            .filter(|record| !record.is_deleted())
            .map(|record| self.enrich(record, as_of))
            .collect();

        let batch = EnrichmentBatch::new(outcomes);
        debug!(
            records = records.len(),
            enriched = batch.len(),
            fallbacks = batch.fallback_count(),
            "loan batch enriched"
        );
        batch
    }

    /// enrich a batch as of the provider's current time, read once
    pub fn enrich_batch_with_time(
        &self,
        records: &[LoanRecord],
        time: &SafeTimeProvider,
    ) -> EnrichmentBatch<LoanEnrichedView> {
        self.enrich_batch(records, time.now())
    }

    /// enrich stored json records one by one; a record that does not read as
    /// a loan falls back on its own while the rest of the batch continues
    pub fn enrich_stored(&self, stored: &[Value], as_of: DateTime<Utc>) -> EnrichmentBatch<Value> {
        let outcomes: Vec<_> = stored
            .par_iter()
            .filter(|value| !is_marked_deleted(value))
            .map(|value| self.enrich_stored_record(value, as_of))
            .collect();

        EnrichmentBatch::new(outcomes)
    }

    fn enrich_stored_record(&self, stored: &Value, as_of: DateTime<Utc>) -> RecordOutcome<Value> {
        let record: LoanRecord = match serde_json::from_value(stored.clone()) {
            Ok(record) => record,
            Err(error) => {
                let amount_given = stored
                    .get("amountGiven")
                    .and_then(money_from_value)
                    .unwrap_or(Money::ZERO);
                warn!(
                    amount_given = %amount_given,
                    error = %error,
                    "stored loan record unreadable, returning stored amount as due"
                );
                return RecordOutcome::Fallback {
                    view: LoanEnrichedView::stored_fallback(stored, amount_given),
                    error: error.into(),
                };
            }
        };

        match self.enrich(&record, as_of) {
            RecordOutcome::Enriched(view) => RecordOutcome::Enriched(view.merge_into(stored)),
            RecordOutcome::Fallback { view, error } => RecordOutcome::Fallback {
                view: view.merge_into(stored),
                error,
            },
        }
    }

    fn compute_view(&self, record: &LoanRecord, as_of: DateTime<Utc>) -> Result<LoanEnrichedView> {
        let terms = LoanTerms::from_record(record)?;
        let events = normalize_events(&record.partial_repayments);
        let simulation = self.simulator.simulate(&terms, &events, as_of)?;
        let amount_received = events.amount_received()?;

        LoanEnrichedView::from_simulation(record, &simulation, amount_received)
    }
}

impl Default for LoanEnricher {
    fn default() -> Self {
        Self {
            simulator: InterestAccrualSimulator::default(),
        }
    }
}
