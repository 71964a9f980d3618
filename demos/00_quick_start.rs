/// quick start - enrich a loan batch and a deposit batch as of a fixed instant
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use loan_ledger_rs::{
    DepositReconstructor, DepositRecord, DepositTransaction, LedgerConfig, LoanEnricher,
    LoanRecord, Money, Rate,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let origination = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let as_of = origination + Duration::days(40);

    // two loans, one with a payment and one topped up
    let loans = vec![
        LoanRecord::new(Money::from_major(10_000), origination, Rate::from_percentage(dec!(12)))
            .with_repayment(Money::from_major(500), origination + Duration::days(40)),
        LoanRecord::new(Money::from_major(2_000), origination, Rate::from_percentage(dec!(18)))
            .with_repayment(Money::from_major(-1_000), origination + Duration::days(10)),
    ];

    let enricher = LoanEnricher::new(LedgerConfig::default())?;
    for view in enricher.enrich_batch(&loans, as_of).views() {
        println!(
            "received {} | remaining principal {} | due {}",
            view.amount_received,
            view.remaining_principal.round_dp(2),
            view.due_amount.round_dp(2)
        );
    }

    // a deposit account folded from its transactions
    let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
    let deposits = vec![DepositRecord::new(vec![
        DepositTransaction::deposit(Money::from_major(100), day(1)),
        DepositTransaction::withdrawal(Money::from_major(30), day(2)),
    ])];

    for view in DepositReconstructor::new().enrich_batch(&deposits).views() {
        println!("{}", view.to_json_pretty()?);
    }

    Ok(())
}
