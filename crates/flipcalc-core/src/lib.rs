pub mod amortization;
pub mod deal;
pub mod error;
pub mod types;

#[cfg(feature = "analysis")]
pub mod analysis;

#[cfg(feature = "exit_strategies")]
pub mod exit;

pub use deal::{analyze_deal, compute_deal_economics, DealAssumptions, DealResults};
pub use error::FlipCalcError;
pub use types::*;

/// Standard result type for all flipcalc operations
pub type FlipCalcResult<T> = Result<T, FlipCalcError>;
