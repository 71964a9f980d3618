//! serializable enriched views handed back to the serving layer

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decimal::Money;
use crate::errors::Result;
use crate::records::{DepositRecord, LoanRecord};
use crate::simulation::LoanSimulation;

/// a stored loan plus its derived balances as of one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanEnrichedView {
    #[serde(flatten)]
    pub record: LoanRecord,
    pub amount_received: Money,
    pub remaining_principal: Money,
    /// remaining principal plus accrued interest
    pub due_amount: Money,
}

impl LoanEnrichedView {
    pub fn from_simulation(
        record: &LoanRecord,
        simulation: &LoanSimulation,
        amount_received: Money,
    ) -> Result<Self> {
        Ok(LoanEnrichedView {
            record: record.clone(),
            amount_received,
            remaining_principal: simulation.remaining_principal(),
            due_amount: simulation.due_amount()?,
        })
    }

    /// view used when a record cannot be simulated: nothing received,
    /// the stored amount still due
    pub fn fallback(record: &LoanRecord) -> Self {
        LoanEnrichedView {
            record: record.clone(),
            amount_received: Money::ZERO,
            remaining_principal: record.amount_given,
            due_amount: record.amount_given,
        }
    }

    /// the stored json with the computed fields added, stored values untouched
    pub fn merge_into(&self, stored: &Value) -> Value {
        with_computed_fields(
            stored,
            &[
                ("amountReceived", self.amount_received),
                ("remainingPrincipal", self.remaining_principal),
                ("dueAmount", self.due_amount),
            ],
        )
    }

    /// fallback for stored json that does not read as a loan record
    pub fn stored_fallback(stored: &Value, amount_given: Money) -> Value {
        with_computed_fields(
            stored,
            &[
                ("amountReceived", Money::ZERO),
                ("remainingPrincipal", amount_given),
                ("dueAmount", amount_given),
            ],
        )
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// a stored deposit plus its reconstructed balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositEnrichedView {
    #[serde(flatten)]
    pub record: DepositRecord,
    pub current_balance: Money,
}

impl DepositEnrichedView {
    pub fn new(record: &DepositRecord, current_balance: Money) -> Self {
        DepositEnrichedView {
            record: record.clone(),
            current_balance,
        }
    }

    pub fn merge_into(&self, stored: &Value) -> Value {
        with_computed_fields(stored, &[("currentBalance", self.current_balance)])
    }

    /// fallback for stored json that does not read as a deposit record
    pub fn stored_fallback(stored: &Value) -> Value {
        with_computed_fields(stored, &[("currentBalance", Money::ZERO)])
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// copy of a stored object with money fields set; non-objects keep only the new fields
fn with_computed_fields(stored: &Value, fields: &[(&str, Money)]) -> Value {
    let mut object = match stored {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    for (key, amount) in fields {
        object.insert((*key).to_string(), Value::String(amount.to_string()));
    }
    Value::Object(object)
}
