//! stored record shapes handed over by the storage layer
//!
//! Only the fields the engines read are typed; everything else is kept in a
//! flattened map so it survives enrichment untouched.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::dates::DateLike;
use crate::decimal::{Money, Rate};
use crate::types::TransactionKind;

/// a stored loan record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    pub amount_given: Money,
    /// origination date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateLike>,
    /// annual rate in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Rate>,
    #[serde(default)]
    pub partial_repayments: Vec<RawRepaymentEvent>,
    #[serde(default, alias = "isDeleted", skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LoanRecord {
    pub fn new(amount_given: Money, date: impl Into<DateLike>, interest_rate: Rate) -> Self {
        Self {
            amount_given,
            date: Some(date.into()),
            interest_rate: Some(interest_rate),
            partial_repayments: Vec::new(),
            deleted: None,
            extra: Map::new(),
        }
    }

    /// append a raw repayment event (positive pays, negative tops up)
    pub fn with_repayment(mut self, amount: Money, date: impl Into<DateLike>) -> Self {
        self.partial_repayments.push(RawRepaymentEvent::new(amount, Some(date.into())));
        self
    }

    /// append a raw event as the store may hold it, date possibly absent
    pub fn with_raw_repayment(mut self, event: RawRepaymentEvent) -> Self {
        self.partial_repayments.push(event);
        self
    }

    /// attach a passthrough field
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    pub fn mark_deleted(mut self) -> Self {
        self.deleted = Some(true);
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.unwrap_or(false)
    }
}

/// a repayment event exactly as stored: signed amount, date-like date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRepaymentEvent {
    /// kept as stored; read through `amount()`
    #[serde(default)]
    pub amount: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateLike>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawRepaymentEvent {
    pub fn new(amount: Money, date: Option<DateLike>) -> Self {
        Self {
            amount: Value::String(amount.to_string()),
            date,
            extra: Map::new(),
        }
    }

    /// signed amount; `None` when the stored value is not a number or numeric string
    pub fn amount(&self) -> Option<Money> {
        money_from_value(&self.amount)
    }
}

/// a stored deposit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositRecord {
    #[serde(default)]
    pub transactions: Vec<DepositTransaction>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DepositRecord {
    pub fn new(transactions: Vec<DepositTransaction>) -> Self {
        Self {
            transactions,
            extra: Map::new(),
        }
    }

    /// attach a passthrough field
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }
}

/// one entry of a deposit's transaction log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositTransaction {
    /// stored label, "Deposit" or "Withdrawal" for balance-moving entries;
    /// a missing label never moves the balance
    #[serde(rename = "type", default)]
    pub label: String,
    #[serde(default)]
    pub amount: Money,
    #[serde(rename = "dateAD", default, skip_serializing_if = "Option::is_none")]
    pub date_ad: Option<DateLike>,
    /// running balance recorded after this transaction; only numbers count
    #[serde(rename = "balanceAfter", default, skip_serializing_if = "Option::is_none")]
    pub balance_after: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DepositTransaction {
    fn with_label(label: &str, amount: Money, date: Option<DateLike>) -> Self {
        Self {
            label: label.to_string(),
            amount,
            date_ad: date,
            balance_after: None,
            extra: Map::new(),
        }
    }

    pub fn deposit(amount: Money, date: impl Into<DateLike>) -> Self {
        Self::with_label("Deposit", amount, Some(date.into()))
    }

    pub fn withdrawal(amount: Money, date: impl Into<DateLike>) -> Self {
        Self::with_label("Withdrawal", amount, Some(date.into()))
    }

    /// a transaction with an arbitrary label and optional date
    pub fn other(label: &str, amount: Money, date: Option<DateLike>) -> Self {
        Self::with_label(label, amount, date)
    }

    pub fn with_balance_after(mut self, balance: Money) -> Self {
        self.balance_after = serde_json::from_str(&balance.to_string()).ok();
        self
    }

    pub fn kind(&self) -> TransactionKind {
        TransactionKind::from_label(&self.label)
    }

    /// effective date; missing or unparseable dates sort as the unix epoch
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.date_ad
            .as_ref()
            .and_then(DateLike::parse)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// recorded post-transaction balance, when the store holds a number
    pub fn recorded_balance(&self) -> Option<Money> {
        match self.balance_after.as_ref()? {
            Value::Number(n) => parse_decimal(&n.to_string()),
            _ => None,
        }
    }
}

/// whether stored json carries a true `deleted` / `isDeleted` flag
pub fn is_marked_deleted(stored: &Value) -> bool {
    stored
        .get("deleted")
        .or_else(|| stored.get("isDeleted"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// read a stored money value: json numbers and numeric strings
pub fn money_from_value(value: &Value) -> Option<Money> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Money> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .map(Money::from_decimal)
}
