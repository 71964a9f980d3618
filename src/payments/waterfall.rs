use crate::decimal::Money;
use crate::types::PaymentApplication;

/// outstanding balances a payment can be applied against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutstandingBalances {
    pub accrued_interest: Money,
    pub principal: Money,
}

#[derive(Debug, Clone, Copy)]
enum PaymentComponent {
    Interest,
    Principal,
}

/// interest-first payment waterfall: accrued interest, then principal,
/// anything left is recorded as excess
#[derive(Debug, Clone, Default)]
pub struct PaymentWaterfall;

impl PaymentWaterfall {
    const ORDER: [PaymentComponent; 2] = [PaymentComponent::Interest, PaymentComponent::Principal];

    pub fn new() -> Self {
        Self
    }

    /// split a payment across the balances; balances themselves are not touched
    pub fn allocate(&self, amount: Money, balances: OutstandingBalances) -> PaymentApplication {
        let mut remaining = amount.max(Money::ZERO);
        let mut application = PaymentApplication::default();

        for component in Self::ORDER {
            if remaining.is_zero() {
                break;
            }
            remaining = self.apply_to_component(component, remaining, &balances, &mut application);
        }

        application.excess = remaining;
        application
    }

    fn apply_to_component(
        &self,
        component: PaymentComponent,
        available: Money,
        balances: &OutstandingBalances,
        application: &mut PaymentApplication,
    ) -> Money {
        let (balance, applied_field) = match component {
            PaymentComponent::Interest => (balances.accrued_interest, &mut application.to_interest),
            PaymentComponent::Principal => (balances.principal, &mut application.to_principal),
        };

        let payment = available.min(balance.max(Money::ZERO));
        *applied_field = payment;

        available - payment
    }
}
