/// time control - enrich against an injected clock
use chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{LoanEnricher, LoanRecord, Money, Rate, SafeTimeProvider, TimeSource};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control example ===\n");

    let origination = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let time = SafeTimeProvider::new(TimeSource::Test(origination));
    let controller = time.test_control().unwrap();

    let loans = vec![LoanRecord::new(
        Money::from_major(10_000),
        origination,
        Rate::from_percentage(dec!(12)),
    )];
    let enricher = LoanEnricher::default();

    // inside the first 30 days the minimum interest applies
    for days in [0, 10, 30, 45, 90] {
        let now = origination + Duration::days(days);
        controller.advance(now - time.now());

        let batch = enricher.enrich_batch_with_time(&loans, &time);
        for view in batch.views() {
            println!(
                "{}: due {}",
                time.now().format("%Y-%m-%d"),
                view.due_amount.round_dp(2)
            );
        }
    }

    Ok(())
}
