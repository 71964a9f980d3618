use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Money;
use crate::errors::Result;
use crate::records::RawRepaymentEvent;
use crate::types::RepaymentKind;

/// a repayment event after normalization: explicit kind, unsigned amount, parsed date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentEvent {
    pub kind: RepaymentKind,
    pub amount: Money,
    pub date: DateTime<Utc>,
}

impl RepaymentEvent {
    pub fn payment(amount: Money, date: DateTime<Utc>) -> Self {
        Self {
            kind: RepaymentKind::Payment,
            amount,
            date,
        }
    }

    pub fn top_up(amount: Money, date: DateTime<Utc>) -> Self {
        Self {
            kind: RepaymentKind::TopUp,
            amount,
            date,
        }
    }

    /// classify a stored event; `None` when its date or amount is unusable.
    /// negative amounts are top-ups, everything else (zero included) is a payment
    pub fn from_raw(raw: &RawRepaymentEvent) -> Option<Self> {
        let date = raw.date.as_ref()?.parse()?;
        let amount = raw.amount()?;
        if amount.is_negative() {
            Some(Self::top_up(amount.abs(), date))
        } else {
            Some(Self::payment(amount, date))
        }
    }
}

/// chronologically ordered events for one loan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedEvents {
    events: Vec<RepaymentEvent>,
    dropped: usize,
}

impl NormalizedEvents {
    pub fn events(&self) -> &[RepaymentEvent] {
        &self.events
    }

    /// number of stored events excluded for lacking a usable date or amount
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// sum of all payment amounts
    pub fn amount_received(&self) -> Result<Money> {
        self.events
            .iter()
            .filter(|e| e.kind == RepaymentKind::Payment)
            .try_fold(Money::ZERO, |total, e| total.checked_add(e.amount))
    }
}

/// drop undated or unreadable events and order the rest by date; ties keep stored order
pub fn normalize_events(raw: &[RawRepaymentEvent]) -> NormalizedEvents {
    let mut events: Vec<RepaymentEvent> = raw.iter().filter_map(RepaymentEvent::from_raw).collect();
    let dropped = raw.len() - events.len();

    // sort_by_key is stable
    events.sort_by_key(|e| e.date);

    if dropped > 0 {
        debug!(dropped, kept = events.len(), "dropped repayment events without a usable date or amount");
    }

    NormalizedEvents { events, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::DateLike;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()
    }

    fn raw(amount: i64, date: Option<&str>) -> RawRepaymentEvent {
        RawRepaymentEvent::new(
            Money::from_major(amount),
            date.map(|d| DateLike::Text(d.to_string())),
        )
    }

    #[test]
    fn test_orders_by_date() {
        let normalized = normalize_events(&[
            raw(300, Some("2024-03-20")),
            raw(100, Some("2024-03-05")),
            raw(200, Some("2024-03-10")),
        ]);

        let dates: Vec<_> = normalized.events().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(5), day(10), day(20)]);
        assert_eq!(normalized.dropped(), 0);
    }

    #[test]
    fn test_equal_dates_keep_stored_order() {
        let normalized = normalize_events(&[
            raw(-50, Some("2024-03-10")),
            raw(10, Some("2024-03-01")),
            raw(75, Some("2024-03-10")),
            raw(20, Some("2024-03-10")),
        ]);

        let amounts: Vec<_> = normalized.events().iter().map(|e| e.amount).collect();
        assert_eq!(
            amounts,
            vec![
                Money::from_major(10),
                Money::from_major(50),
                Money::from_major(75),
                Money::from_major(20),
            ]
        );
        assert_eq!(normalized.events()[1].kind, RepaymentKind::TopUp);
    }

    #[test]
    fn test_malformed_entries_silently_dropped() {
        let normalized = normalize_events(&[
            raw(50, Some("2024-03-02")),
            raw(1_000_000, None),
            raw(70, Some("yesterday")),
            RawRepaymentEvent::new(
                Money::from_major(5),
                Some(DateLike::Other(serde_json::json!([1, 2]))),
            ),
        ]);

        assert_eq!(normalized.events().len(), 1);
        assert_eq!(normalized.dropped(), 3);
        assert_eq!(normalized.amount_received().unwrap(), Money::from_major(50));
    }

    #[test]
    fn test_unreadable_amounts_dropped() {
        let mut null_amount = raw(0, Some("2024-03-05"));
        null_amount.amount = serde_json::Value::Null;
        let mut text_amount = raw(0, Some("2024-03-06"));
        text_amount.amount = serde_json::json!("abc");

        let normalized = normalize_events(&[null_amount, text_amount, raw(30, Some("2024-03-07"))]);

        assert_eq!(normalized.dropped(), 2);
        assert_eq!(normalized.amount_received().unwrap(), Money::from_major(30));
    }

    #[test]
    fn test_fractional_millis_dates_are_kept() {
        let stored: RawRepaymentEvent =
            serde_json::from_value(serde_json::json!({"amount": 25, "date": 1709251200000.75})).unwrap();

        let normalized = normalize_events(&[stored]);

        assert_eq!(normalized.dropped(), 0);
        assert_eq!(normalized.events()[0].date, day(1));
    }

    #[test]
    fn test_classification_by_sign() {
        let top_up = RepaymentEvent::from_raw(&raw(-2_000, Some("2024-03-01"))).unwrap();
        assert_eq!(top_up, RepaymentEvent::top_up(Money::from_major(2_000), day(1)));

        let payment = RepaymentEvent::from_raw(&raw(500, Some("2024-03-01"))).unwrap();
        assert_eq!(payment, RepaymentEvent::payment(Money::from_major(500), day(1)));

        let zero = RepaymentEvent::from_raw(&raw(0, Some("2024-03-01"))).unwrap();
        assert_eq!(zero.kind, RepaymentKind::Payment);
        assert!(zero.amount.is_zero());
    }

    #[test]
    fn test_amount_received_ignores_top_ups() {
        let normalized = normalize_events(&[
            raw(500, Some("2024-03-02")),
            raw(-3_000, Some("2024-03-03")),
            raw(250, Some("2024-03-04")),
        ]);

        assert_eq!(normalized.amount_received().unwrap(), Money::from_major(750));
    }

    #[test]
    fn test_empty_input() {
        let normalized = normalize_events(&[]);
        assert!(normalized.is_empty());
        assert_eq!(normalized.amount_received().unwrap(), Money::ZERO);
    }
}
