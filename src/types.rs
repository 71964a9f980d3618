use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// what a normalized repayment event does to the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentKind {
    /// money received; settles accrued interest, then principal
    Payment,
    /// additional money lent; raises principal
    TopUp,
}

/// deposit transaction kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    /// any kind the store holds that does not move the balance
    Other,
}

impl TransactionKind {
    /// classify a stored transaction label; only exact labels move the balance
    pub fn from_label(label: &str) -> Self {
        match label {
            "Deposit" => TransactionKind::Deposit,
            "Withdrawal" => TransactionKind::Withdrawal,
            _ => TransactionKind::Other,
        }
    }
}

/// where a deposit's current balance came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceSource {
    /// balance recorded on the latest transaction
    Recorded,
    /// folded from the transaction amounts
    Recomputed,
    /// no transactions
    Empty,
}

/// payment application result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PaymentApplication {
    pub to_interest: Money,
    pub to_principal: Money,
    pub excess: Money,
}

impl PaymentApplication {
    pub fn total_applied(&self) -> Money {
        self.to_interest + self.to_principal + self.excess
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_kind_from_label() {
        assert_eq!(TransactionKind::from_label("Deposit"), TransactionKind::Deposit);
        assert_eq!(TransactionKind::from_label("Withdrawal"), TransactionKind::Withdrawal);
        assert_eq!(TransactionKind::from_label("Interest"), TransactionKind::Other);
        assert_eq!(TransactionKind::from_label("deposit"), TransactionKind::Other);
    }
}
