pub mod accrual;
pub mod minimum;

pub use accrual::{AccrualEngine, SegmentAccrual};
pub use minimum::{MinimumInterestConfig, MinimumInterestEnforcer, MinimumInterestOutcome};
