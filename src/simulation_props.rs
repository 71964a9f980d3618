//! Property-based tests for the interest accrual simulator.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::LedgerConfig;
use crate::decimal::{Money, Rate};
use crate::events::normalize_events;
use crate::records::RawRepaymentEvent;
use crate::simulation::{InterestAccrualSimulator, LoanTerms};
use crate::types::RepaymentKind;

fn origination() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Strategy for principal amounts with cents
fn principal_strategy() -> impl Strategy<Value = Money> {
    (0i64..10_000_000i64).prop_map(|c| Money::from_decimal(Decimal::new(c, 2)))
}

/// Strategy for annual rates between 0% and 60%
fn rate_strategy() -> impl Strategy<Value = Rate> {
    (0i64..6_000i64).prop_map(|bp| Rate::from_percentage(Decimal::new(bp, 2)))
}

/// Strategy for stored events: signed amount, day offset, sometimes undated
fn raw_event_strategy() -> impl Strategy<Value = RawRepaymentEvent> {
    (
        -500_000i64..2_000_000i64,
        -10i64..400i64,
        prop_oneof![4 => Just(true), 1 => Just(false)],
    )
        .prop_map(|(cents, offset, dated)| {
            let date = dated.then(|| (origination() + Duration::days(offset)).into());
            RawRepaymentEvent::new(Money::from_decimal(Decimal::new(cents, 2)), date)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// balances never go negative and every payment is fully allocated
    #[test]
    fn prop_balances_stay_non_negative(
        principal in principal_strategy(),
        rate in rate_strategy(),
        raw in prop::collection::vec(raw_event_strategy(), 0..12),
        as_of_offset in 0i64..500i64,
    ) {
        let terms = LoanTerms::new(principal, origination(), rate).unwrap();
        let events = normalize_events(&raw);
        let simulation = InterestAccrualSimulator::default()
            .simulate(&terms, &events, origination() + Duration::days(as_of_offset))
            .unwrap();

        for entry in &simulation.entries {
            prop_assert!(!entry.principal_after.is_negative());
            prop_assert!(!entry.accrued_interest_after.is_negative());
            if entry.kind == RepaymentKind::Payment {
                prop_assert_eq!(entry.application.total_applied(), entry.amount);
            }
        }
        prop_assert!(!simulation.state.principal.is_negative());
        prop_assert!(!simulation.state.accrued_interest.is_negative());
        prop_assert!(simulation.due_amount().unwrap() >= simulation.state.principal);
    }

    /// payments split exactly into interest paid, principal repaid and extra
    #[test]
    fn prop_payments_are_conserved(
        principal in principal_strategy(),
        rate in rate_strategy(),
        raw in prop::collection::vec(raw_event_strategy(), 0..12),
    ) {
        let terms = LoanTerms::new(principal, origination(), rate).unwrap();
        let events = normalize_events(&raw);
        let simulator = InterestAccrualSimulator::new(LedgerConfig::without_minimum_interest());
        let simulation = simulator
            .walk(&terms, events.events(), origination() + Duration::days(450))
            .unwrap();

        let topped_up = events
            .events()
            .iter()
            .filter(|e| e.kind == RepaymentKind::TopUp)
            .fold(Money::ZERO, |total, e| total + e.amount);
        let principal_repaid = principal + topped_up - simulation.state.principal;
        let state = &simulation.state;

        prop_assert_eq!(
            events.amount_received().unwrap(),
            state.interest_paid + principal_repaid + state.extra_interest_paid
        );
    }

    /// identical inputs and as-of produce identical simulations
    #[test]
    fn prop_simulation_is_deterministic(
        principal in principal_strategy(),
        raw in prop::collection::vec(raw_event_strategy(), 0..8),
        as_of_offset in 0i64..500i64,
    ) {
        let terms = LoanTerms::new(principal, origination(), Rate::from_percentage(dec!(18))).unwrap();
        let as_of = origination() + Duration::days(as_of_offset);
        let simulator = InterestAccrualSimulator::default();

        let first = simulator.simulate(&terms, &normalize_events(&raw), as_of).unwrap();
        let second = simulator.simulate(&terms, &normalize_events(&raw), as_of).unwrap();

        prop_assert_eq!(first, second);
    }
}
