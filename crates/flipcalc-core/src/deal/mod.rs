pub mod assumptions;
pub mod capabilities;
pub mod engine;
pub mod results;
pub mod rules;

pub use assumptions::*;
pub use capabilities::{capabilities, EffectiveFinancing};
pub use engine::{analyze_deal, compute_deal_economics, DealAnalysis};
pub use results::DealResults;
pub use rules::{seventy_percent_rule, SeventyPercentRule, SEVENTY_PERCENT_RULE};
