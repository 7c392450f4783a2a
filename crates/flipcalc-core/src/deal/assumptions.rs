use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{percent_of, Money, Percent};

// ---------------------------------------------------------------------------
// Purchase
// ---------------------------------------------------------------------------

/// Buyer-side closing costs, itemised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosingCostItems {
    pub title_insurance: Money,
    pub appraisal: Money,
    pub attorney_fees: Money,
    pub recording_fees: Money,
    pub transfer_taxes: Money,
    pub lender_fees: Money,
    pub escrow_fees: Money,
    pub inspections: Money,
    pub other: Money,
}

impl Default for ClosingCostItems {
    fn default() -> Self {
        ClosingCostItems {
            title_insurance: dec!(2000),
            appraisal: dec!(500),
            attorney_fees: dec!(1500),
            recording_fees: dec!(250),
            transfer_taxes: dec!(2500),
            lender_fees: dec!(500),
            escrow_fees: dec!(500),
            inspections: dec!(500),
            other: Decimal::ZERO,
        }
    }
}

impl ClosingCostItems {
    pub fn total(&self) -> Money {
        self.title_insurance
            + self.appraisal
            + self.attorney_fees
            + self.recording_fees
            + self.transfer_taxes
            + self.lender_fees
            + self.escrow_fees
            + self.inspections
            + self.other
    }
}

/// How purchase closing costs are estimated. Exactly one mode is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseClosingCosts {
    /// Percentage of the purchase price
    Percent(Percent),
    /// Flat dollar amount
    Fixed(Money),
    /// Sum of itemised fees (a fixed amount for break-even purposes)
    Itemized(ClosingCostItems),
}

impl Default for PurchaseClosingCosts {
    fn default() -> Self {
        PurchaseClosingCosts::Percent(dec!(3))
    }
}

impl PurchaseClosingCosts {
    pub fn amount(&self, purchase_price: Money) -> Money {
        match self {
            PurchaseClosingCosts::Percent(pct) => percent_of(purchase_price, *pct),
            PurchaseClosingCosts::Fixed(amount) => *amount,
            PurchaseClosingCosts::Itemized(items) => items.total(),
        }
    }

    /// Portion of closing costs that scales with purchase price, as a percent.
    pub fn price_proportional_pct(&self) -> Percent {
        match self {
            PurchaseClosingCosts::Percent(pct) => *pct,
            _ => Decimal::ZERO,
        }
    }

    /// Portion of closing costs that does not depend on purchase price.
    pub fn fixed_amount(&self) -> Money {
        match self {
            PurchaseClosingCosts::Percent(_) => Decimal::ZERO,
            PurchaseClosingCosts::Fixed(amount) => *amount,
            PurchaseClosingCosts::Itemized(items) => items.total(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rehab
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehabItem {
    pub name: String,
    #[serde(default)]
    pub cost: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehabCategory {
    pub name: String,
    #[serde(default)]
    pub items: Vec<RehabItem>,
}

impl RehabCategory {
    pub fn total(&self) -> Money {
        self.items.iter().map(|i| i.cost).sum()
    }

    fn with_items(name: &str, items: &[&str]) -> Self {
        RehabCategory {
            name: name.into(),
            items: items
                .iter()
                .map(|n| RehabItem {
                    name: (*n).into(),
                    cost: Decimal::ZERO,
                })
                .collect(),
        }
    }

    /// Standard scope-of-work checklist with every line item at zero.
    pub fn default_categories() -> Vec<RehabCategory> {
        vec![
            Self::with_items(
                "Exterior & Landscaping",
                &[
                    "Roof Repair/Replace",
                    "Siding/Stucco",
                    "Windows",
                    "Exterior Paint",
                    "Landscaping",
                    "Driveway/Concrete",
                    "Deck/Patio",
                    "Fencing",
                ],
            ),
            Self::with_items(
                "Kitchen",
                &[
                    "Cabinets",
                    "Countertops",
                    "Appliances",
                    "Sink & Faucet",
                    "Backsplash",
                    "Flooring",
                    "Lighting",
                ],
            ),
            Self::with_items(
                "Bathrooms",
                &[
                    "Vanity/Sink",
                    "Toilet",
                    "Tub/Shower",
                    "Tile Work",
                    "Plumbing Fixtures",
                    "Mirrors/Hardware",
                ],
            ),
            Self::with_items(
                "Interior General",
                &[
                    "Interior Paint",
                    "Flooring (Carpet/LVP)",
                    "Doors & Trim",
                    "Drywall Repair",
                    "Light Fixtures",
                    "Hardware/Doorknobs",
                ],
            ),
            Self::with_items(
                "Mechanical & Systems",
                &[
                    "HVAC System",
                    "Electrical Panel/Wiring",
                    "Plumbing/Water Heater",
                    "Foundation Repair",
                    "Insulation",
                ],
            ),
            Self::with_items(
                "Permits & Misc",
                &["Permits & Fees", "Dumpster/Cleanup", "Staging", "Contingency (10%)"],
            ),
        ]
    }
}

/// Rehab budget: one aggregate figure or a categorised breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RehabBudget {
    Simple(Money),
    Itemized(Vec<RehabCategory>),
}

impl Default for RehabBudget {
    fn default() -> Self {
        RehabBudget::Simple(dec!(45000))
    }
}

impl RehabBudget {
    /// Reduce the budget to a single scalar.
    pub fn total(&self) -> Money {
        match self {
            RehabBudget::Simple(amount) => *amount,
            RehabBudget::Itemized(categories) => categories.iter().map(|c| c.total()).sum(),
        }
    }
}

// ---------------------------------------------------------------------------
// Financing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Cash,
    #[default]
    HardMoney,
    Conventional,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownPayment {
    /// Percentage of the amount being financed
    Percent(Percent),
    Fixed(Money),
}

impl Default for DownPayment {
    fn default() -> Self {
        DownPayment::Percent(dec!(10))
    }
}

impl DownPayment {
    pub fn amount(&self, amount_to_finance: Money) -> Money {
        match self {
            DownPayment::Percent(pct) => percent_of(amount_to_finance, *pct),
            DownPayment::Fixed(amount) => *amount,
        }
    }
}

/// Loan product and the investor's requested toggles. The toggles are raw:
/// the engine resolves them against the loan type before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Financing {
    pub loan_type: LoanType,
    pub down_payment: DownPayment,
    /// Nominal annual rate (10 = 10%)
    pub interest_rate: Percent,
    pub loan_term_months: u32,
    /// Origination points as a percent of the base loan
    pub origination_points: Percent,
    pub interest_only: bool,
    pub finance_rehab: bool,
    pub roll_closing_costs: bool,
    pub roll_points: bool,
    /// Months of prepaid interest financed as a reserve
    pub interest_reserve_months: u32,
    /// Advisory cap on total loan as a percent of ARV
    pub max_loan_to_arv: Percent,
}

impl Default for Financing {
    fn default() -> Self {
        Financing {
            loan_type: LoanType::HardMoney,
            down_payment: DownPayment::default(),
            interest_rate: dec!(10),
            loan_term_months: 12,
            origination_points: dec!(2),
            interest_only: true,
            finance_rehab: true,
            roll_closing_costs: false,
            roll_points: false,
            interest_reserve_months: 0,
            max_loan_to_arv: dec!(70),
        }
    }
}

// ---------------------------------------------------------------------------
// Holding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleHoldingCosts {
    pub property_taxes: Money,
    pub insurance: Money,
    pub utilities: Money,
}

impl Default for SimpleHoldingCosts {
    fn default() -> Self {
        SimpleHoldingCosts {
            property_taxes: dec!(250),
            insurance: dec!(100),
            utilities: dec!(150),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailedHoldingCosts {
    pub property_taxes: Money,
    pub insurance: Money,
    pub utilities: Money,
    pub hoa: Money,
    pub lawn_care: Money,
    pub pool_maintenance: Money,
    pub security_alarm: Money,
    pub vacancy_insurance: Money,
    pub other: Money,
}

impl Default for DetailedHoldingCosts {
    fn default() -> Self {
        let simple = SimpleHoldingCosts::default();
        DetailedHoldingCosts {
            property_taxes: simple.property_taxes,
            insurance: simple.insurance,
            utilities: simple.utilities,
            hoa: Decimal::ZERO,
            lawn_care: Decimal::ZERO,
            pool_maintenance: Decimal::ZERO,
            security_alarm: Decimal::ZERO,
            vacancy_insurance: Decimal::ZERO,
            other: Decimal::ZERO,
        }
    }
}

/// Monthly carrying costs while the property is held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingCosts {
    Simple(SimpleHoldingCosts),
    Detailed(DetailedHoldingCosts),
}

impl Default for HoldingCosts {
    fn default() -> Self {
        HoldingCosts::Simple(SimpleHoldingCosts::default())
    }
}

impl HoldingCosts {
    pub fn monthly_total(&self) -> Money {
        match self {
            HoldingCosts::Simple(c) => c.property_taxes + c.insurance + c.utilities,
            HoldingCosts::Detailed(c) => {
                c.property_taxes
                    + c.insurance
                    + c.utilities
                    + c.hoa
                    + c.lawn_care
                    + c.pool_maintenance
                    + c.security_alarm
                    + c.vacancy_insurance
                    + c.other
            }
        }
    }

    pub fn property_taxes(&self) -> Money {
        match self {
            HoldingCosts::Simple(c) => c.property_taxes,
            HoldingCosts::Detailed(c) => c.property_taxes,
        }
    }

    pub fn insurance(&self) -> Money {
        match self {
            HoldingCosts::Simple(c) => c.insurance,
            HoldingCosts::Detailed(c) => c.insurance,
        }
    }

    pub fn hoa(&self) -> Money {
        match self {
            HoldingCosts::Simple(_) => Decimal::ZERO,
            HoldingCosts::Detailed(c) => c.hoa,
        }
    }
}

// ---------------------------------------------------------------------------
// Selling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellingCostItems {
    pub title_insurance: Money,
    pub escrow_fees: Money,
    pub transfer_tax: Money,
    pub attorney_fees: Money,
    pub recording_fees: Money,
    pub home_warranty: Money,
    pub other: Money,
}

impl Default for SellingCostItems {
    fn default() -> Self {
        SellingCostItems {
            title_insurance: dec!(1500),
            escrow_fees: dec!(1000),
            transfer_tax: Decimal::ZERO,
            attorney_fees: dec!(500),
            recording_fees: dec!(150),
            home_warranty: dec!(500),
            other: Decimal::ZERO,
        }
    }
}

impl SellingCostItems {
    pub fn total(&self) -> Money {
        self.title_insurance
            + self.escrow_fees
            + self.transfer_tax
            + self.attorney_fees
            + self.recording_fees
            + self.home_warranty
            + self.other
    }
}

/// Seller-side closing costs (excluding commission and concessions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellingClosingCosts {
    /// Percentage of ARV
    Percent(Percent),
    Itemized(SellingCostItems),
}

impl Default for SellingClosingCosts {
    fn default() -> Self {
        SellingClosingCosts::Percent(dec!(1))
    }
}

impl SellingClosingCosts {
    pub fn amount(&self, arv: Money) -> Money {
        match self {
            SellingClosingCosts::Percent(pct) => percent_of(arv, *pct),
            SellingClosingCosts::Itemized(items) => items.total(),
        }
    }

    pub fn arv_proportional_pct(&self) -> Percent {
        match self {
            SellingClosingCosts::Percent(pct) => *pct,
            SellingClosingCosts::Itemized(_) => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellingAssumptions {
    pub commission_pct: Percent,
    pub closing_costs: SellingClosingCosts,
    pub seller_concessions: Money,
}

impl Default for SellingAssumptions {
    fn default() -> Self {
        SellingAssumptions {
            commission_pct: dec!(6),
            closing_costs: SellingClosingCosts::default(),
            seller_concessions: Decimal::ZERO,
        }
    }
}

impl SellingAssumptions {
    /// Share of ARV consumed by selling costs that scale with price, as a percent.
    pub fn arv_proportional_pct(&self) -> Percent {
        self.commission_pct + self.closing_costs.arv_proportional_pct()
    }

    /// Selling costs that do not scale with ARV: itemised fees plus concessions.
    pub fn fixed_amount(&self) -> Money {
        let itemized = match &self.closing_costs {
            SellingClosingCosts::Percent(_) => Decimal::ZERO,
            SellingClosingCosts::Itemized(items) => items.total(),
        };
        itemized + self.seller_concessions
    }
}

// ---------------------------------------------------------------------------
// Deal
// ---------------------------------------------------------------------------

/// Every lever of a fix & flip deal. Pure data; the engine derives everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealAssumptions {
    /// Optional property label
    pub address: String,
    pub purchase_price: Money,
    /// After-repair value
    pub arv: Money,
    pub purchase_closing_costs: PurchaseClosingCosts,
    pub rehab: RehabBudget,
    pub financing: Financing,
    pub holding_period_months: u32,
    pub holding_costs: HoldingCosts,
    pub selling: SellingAssumptions,
}

impl Default for DealAssumptions {
    fn default() -> Self {
        DealAssumptions {
            address: String::new(),
            purchase_price: dec!(250000),
            arv: dec!(375000),
            purchase_closing_costs: PurchaseClosingCosts::default(),
            rehab: RehabBudget::default(),
            financing: Financing::default(),
            holding_period_months: 6,
            holding_costs: HoldingCosts::default(),
            selling: SellingAssumptions::default(),
        }
    }
}

impl DealAssumptions {
    /// Price and ARV must both be positive for the engine to evaluate.
    pub fn is_evaluable(&self) -> bool {
        self.purchase_price > Decimal::ZERO && self.arv > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_itemized_rehab_ignores_empty_items() {
        let mut categories = RehabCategory::default_categories();
        assert_eq!(RehabBudget::Itemized(categories.clone()).total(), Decimal::ZERO);

        categories[1].items[0].cost = dec!(8000);
        categories[4].items[0].cost = dec!(6500);
        categories.push(RehabCategory {
            name: "Empty".into(),
            items: vec![],
        });
        assert_eq!(RehabBudget::Itemized(categories).total(), dec!(14500));
    }

    #[test]
    fn test_closing_cost_modes() {
        let price = dec!(200000);
        assert_eq!(PurchaseClosingCosts::Percent(dec!(2.5)).amount(price), dec!(5000));
        assert_eq!(PurchaseClosingCosts::Fixed(dec!(4200)).amount(price), dec!(4200));
        assert_eq!(
            PurchaseClosingCosts::Itemized(ClosingCostItems::default()).amount(price),
            dec!(8250)
        );
    }

    #[test]
    fn test_detailed_holding_costs_sum_every_field() {
        let detailed = HoldingCosts::Detailed(DetailedHoldingCosts {
            hoa: dec!(75),
            lawn_care: dec!(40),
            pool_maintenance: dec!(60),
            security_alarm: dec!(30),
            vacancy_insurance: dec!(45),
            other: dec!(10),
            ..DetailedHoldingCosts::default()
        });
        assert_eq!(detailed.monthly_total(), dec!(760));
        assert_eq!(HoldingCosts::default().monthly_total(), dec!(500));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let json = serde_json::json!({
            "purchase_price": "180000",
            "rehab": { "simple": "30000" },
            "financing": { "loan_type": "conventional" }
        });
        let deal: DealAssumptions = serde_json::from_value(json).unwrap();
        assert_eq!(deal.purchase_price, dec!(180000));
        assert_eq!(deal.arv, dec!(375000));
        assert_eq!(deal.rehab, RehabBudget::Simple(dec!(30000)));
        assert_eq!(deal.financing.loan_type, LoanType::Conventional);
        assert_eq!(deal.financing.interest_rate, dec!(10));
        assert_eq!(deal.holding_period_months, 6);
    }

    #[test]
    fn test_selling_item_defaults() {
        assert_eq!(SellingCostItems::default().total(), dec!(3650));
    }
}
