/// stored json - enrich records straight from storage, malformed ones included
use chrono::{TimeZone, Utc};
use loan_ledger_rs::{DepositReconstructor, LoanEnricher};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let as_of = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    let loans = vec![
        json!({
            "id": "L-1",
            "amountGiven": 10000,
            "date": "2024-01-01",
            "interestRate": 12,
            "partialRepayments": [{"amount": 500, "date": "2024-02-10"}]
        }),
        json!({"id": "L-2", "amountGiven": 2500, "date": "sometime", "interestRate": 10}),
        json!({"id": "L-3", "amountGiven": 1, "deleted": true}),
    ];

    let batch = LoanEnricher::default().enrich_stored(&loans, as_of);
    println!("{} loans, {} fell back", batch.len(), batch.fallback_count());
    for outcome in batch.outcomes() {
        if let Some(error) = outcome.error() {
            println!("error: {error}");
        }
        println!("{}", serde_json::to_string_pretty(outcome.view())?);
    }

    let deposits = vec![json!({
        "id": "D-1",
        "transactions": [
            {"type": "Deposit", "amount": 100, "dateAD": "2024-05-01"},
            {"type": "Withdrawal", "amount": 30, "dateAD": "2024-05-02", "balanceAfter": 70}
        ]
    })];

    for view in DepositReconstructor::new().enrich_stored(&deposits).views() {
        println!("{}", serde_json::to_string_pretty(view)?);
    }

    Ok(())
}
