use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::*;
use crate::FlipCalcResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompCondition {
    Inferior,
    #[default]
    Similar,
    Superior,
}

/// A recent comparable sale with appraisal-style adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparableSale {
    pub address: String,
    pub sale_price: Money,
    pub square_footage: Decimal,
    pub sale_date: String,
    pub bedrooms: u32,
    pub bathrooms: Decimal,
    pub condition: CompCondition,
    pub location_adjustment_pct: Percent,
    pub condition_adjustment_pct: Percent,
    pub size_adjustment_pct: Percent,
    /// Flat dollar adjustment
    pub other_adjustment: Money,
}

impl Default for ComparableSale {
    fn default() -> Self {
        ComparableSale {
            address: String::new(),
            sale_price: Decimal::ZERO,
            square_footage: Decimal::ZERO,
            sale_date: String::new(),
            bedrooms: 3,
            bathrooms: dec!(2),
            condition: CompCondition::Similar,
            location_adjustment_pct: Decimal::ZERO,
            condition_adjustment_pct: Decimal::ZERO,
            size_adjustment_pct: Decimal::ZERO,
            other_adjustment: Decimal::ZERO,
        }
    }
}

impl ComparableSale {
    pub fn adjusted_price(&self) -> Money {
        self.sale_price
            + percent_of(self.sale_price, self.location_adjustment_pct)
            + percent_of(self.sale_price, self.condition_adjustment_pct)
            + percent_of(self.sale_price, self.size_adjustment_pct)
            + self.other_adjustment
    }

    pub fn price_per_sqft(&self) -> Money {
        if self.square_footage > Decimal::ZERO {
            self.adjusted_price() / self.square_footage
        } else {
            Decimal::ZERO
        }
    }

    /// Usable comps have a positive sale price and area.
    fn is_usable(&self) -> bool {
        self.sale_price > Decimal::ZERO && self.square_footage > Decimal::ZERO
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// How the deal's ARV sits against the comp-supported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArvAssessment {
    /// Within 5%
    Supported,
    /// Within 10%
    Review,
    /// Comps exceed the deal's ARV by more than 10%
    Conservative,
    /// Deal's ARV exceeds comps by more than 10%
    Optimistic,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompsInput {
    pub subject_arv: Money,
    pub subject_square_footage: Decimal,
    pub comps: Vec<ComparableSale>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompSummary {
    pub address: String,
    pub adjusted_price: Money,
    pub price_per_sqft: Money,
    pub used: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompsOutput {
    pub comps: Vec<CompSummary>,
    pub usable_comps: usize,
    /// Mean adjusted price of usable comps
    pub suggested_arv: Money,
    /// Standard deviation / mean × 100
    pub coefficient_of_variation: Percent,
    pub confidence: Confidence,
    pub average_price_per_sqft: Money,
    /// Average price per sq ft × subject area
    pub implied_subject_value: Option<Money>,
    /// (suggested − subject ARV) / subject ARV × 100
    pub arv_difference_pct: Percent,
    pub assessment: Option<ArvAssessment>,
}

fn confidence_for(count: usize, cv: Percent) -> Confidence {
    if count >= 3 && cv < dec!(10) {
        Confidence::High
    } else if count >= 2 && cv < dec!(20) {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn assess(difference_pct: Percent) -> ArvAssessment {
    let magnitude = difference_pct.abs();
    if magnitude <= dec!(5) {
        ArvAssessment::Supported
    } else if magnitude <= dec!(10) {
        ArvAssessment::Review
    } else if difference_pct > Decimal::ZERO {
        ArvAssessment::Conservative
    } else {
        ArvAssessment::Optimistic
    }
}

/// Suggest an ARV from adjusted comparable sales and grade its reliability.
pub fn analyze_comps(input: &CompsInput) -> FlipCalcResult<ComputationOutput<CompsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    log::debug!("comps: {} sales", input.comps.len());

    let adjusted: Vec<Money> = input
        .comps
        .iter()
        .filter(|c| c.is_usable())
        .map(ComparableSale::adjusted_price)
        .collect();
    let count = adjusted.len();

    let (suggested_arv, cv) = if count == 0 {
        warnings.push("No comps with a positive sale price and square footage".into());
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let n = Decimal::from(count);
        let mean = adjusted.iter().copied().sum::<Decimal>() / n;
        let variance = adjusted
            .iter()
            .map(|p| (*p - mean) * (*p - mean))
            .sum::<Decimal>()
            / n;
        let std_dev = variance.sqrt().unwrap_or(Decimal::ZERO);
        (mean, percent_ratio(std_dev, mean))
    };

    let confidence = confidence_for(count, cv);
    if count > 0 && count < 3 {
        warnings.push(format!("Only {count} usable comp(s); 3 or more recommended"));
    }

    let usable_ppsf: Vec<Money> = input
        .comps
        .iter()
        .filter(|c| c.is_usable())
        .map(ComparableSale::price_per_sqft)
        .collect();
    let average_price_per_sqft = if usable_ppsf.is_empty() {
        Decimal::ZERO
    } else {
        usable_ppsf.iter().copied().sum::<Decimal>() / Decimal::from(usable_ppsf.len())
    };
    let implied_subject_value = (input.subject_square_footage > Decimal::ZERO && count > 0)
        .then(|| average_price_per_sqft * input.subject_square_footage);

    let arv_difference_pct = if input.subject_arv > Decimal::ZERO {
        percent_ratio(suggested_arv - input.subject_arv, input.subject_arv)
    } else {
        Decimal::ZERO
    };
    let assessment = (input.subject_arv > Decimal::ZERO && suggested_arv > Decimal::ZERO)
        .then(|| assess(arv_difference_pct));
    if assessment == Some(ArvAssessment::Optimistic) {
        warnings.push(format!(
            "ARV is {}% above what comps support",
            (-arv_difference_pct).round_dp(1)
        ));
    }

    let comps = input
        .comps
        .iter()
        .map(|c| CompSummary {
            address: c.address.clone(),
            adjusted_price: c.adjusted_price(),
            price_per_sqft: c.price_per_sqft(),
            used: c.is_usable(),
        })
        .collect();

    let output = CompsOutput {
        comps,
        usable_comps: count,
        suggested_arv,
        coefficient_of_variation: cv,
        confidence,
        average_price_per_sqft,
        implied_subject_value,
        arv_difference_pct,
        assessment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Comparable sales ARV estimate",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(price: Money, sqft: Decimal) -> ComparableSale {
        ComparableSale {
            sale_price: price,
            square_footage: sqft,
            ..ComparableSale::default()
        }
    }

    #[test]
    fn test_adjusted_price() {
        let c = ComparableSale {
            location_adjustment_pct: dec!(5),
            condition_adjustment_pct: dec!(-3),
            size_adjustment_pct: dec!(1),
            other_adjustment: dec!(2500),
            ..comp(dec!(400000), dec!(1800))
        };
        // 400k + 20k − 12k + 4k + 2.5k
        assert_eq!(c.adjusted_price(), dec!(414500));
    }

    #[test]
    fn test_tight_comps_high_confidence() {
        let input = CompsInput {
            subject_arv: dec!(375000),
            subject_square_footage: dec!(1500),
            comps: vec![
                comp(dec!(370000), dec!(1500)),
                comp(dec!(380000), dec!(1550)),
                comp(dec!(375000), dec!(1480)),
            ],
        };
        let out = analyze_comps(&input).unwrap().result;
        assert_eq!(out.usable_comps, 3);
        assert_eq!(out.suggested_arv, dec!(375000));
        assert_eq!(out.confidence, Confidence::High);
        assert_eq!(out.arv_difference_pct, Decimal::ZERO);
        assert_eq!(out.assessment, Some(ArvAssessment::Supported));
    }

    #[test]
    fn test_unusable_comps_ignored() {
        let input = CompsInput {
            subject_arv: dec!(375000),
            subject_square_footage: Decimal::ZERO,
            comps: vec![comp(dec!(300000), dec!(1500)), comp(dec!(500000), Decimal::ZERO)],
        };
        let out = analyze_comps(&input).unwrap().result;
        assert_eq!(out.usable_comps, 1);
        assert_eq!(out.suggested_arv, dec!(300000));
        assert_eq!(out.confidence, Confidence::Low);
        assert_eq!(out.assessment, Some(ArvAssessment::Optimistic));
        assert!(out.implied_subject_value.is_none());
        assert!(!out.comps[1].used);
    }

    #[test]
    fn test_wide_spread_lowers_confidence() {
        assert_eq!(confidence_for(2, dec!(15)), Confidence::Medium);
        assert_eq!(confidence_for(4, dec!(25)), Confidence::Low);
        assert_eq!(confidence_for(3, dec!(9.9)), Confidence::High);
    }

    #[test]
    fn test_no_comps() {
        let out = analyze_comps(&CompsInput::default()).unwrap();
        assert_eq!(out.result.suggested_arv, Decimal::ZERO);
        assert!(out.result.assessment.is_none());
        assert!(!out.warnings.is_empty());
    }
}
