pub mod waterfall;

pub use waterfall::{OutstandingBalances, PaymentWaterfall};
