//! Alternative exits layered on the flip's cost aggregates: refinance and
//! hold (BRRRR), wholesale assignment, and a side-by-side comparison.

pub mod brrrr;
pub mod comparison;
pub mod wholesale;
