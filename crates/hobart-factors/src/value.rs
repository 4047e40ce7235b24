//! Value factor - price relative to fundamentals
//!
//! Yields (earnings, cash flow, book over price) are used instead of
//! multiples wherever the denominator can turn negative, so loss-making
//! companies rank at the bottom rather than flipping to the top. Enterprise
//! value multiples are sector-relative.

use crate::definition::{FactorDefinition, MetricDefinition, SubComponentDefinition};
use crate::factor::Factor;

/// Default weight of Value in the composite.
pub const WEIGHT: f64 = 0.20;

/// Default Value factor definition.
pub fn definition() -> FactorDefinition {
    FactorDefinition::new(
        Factor::Value,
        WEIGHT,
        vec![
            SubComponentDefinition::new(
                "earnings_valuation",
                0.30,
                vec![
                    MetricDefinition::higher("earnings_yield", 0.60)
                        .describe("Trailing EPS over price"),
                    MetricDefinition::higher("ebit_to_ev", 0.40)
                        .describe("Trailing EBIT over enterprise value"),
                ],
            ),
            SubComponentDefinition::new(
                "cash_flow_valuation",
                0.30,
                vec![
                    MetricDefinition::higher("fcf_yield", 0.50)
                        .describe("Trailing free cash flow over market capitalization"),
                    MetricDefinition::lower("ev_to_ebitda", 0.50)
                        .sector_relative()
                        .describe("Enterprise value over trailing EBITDA"),
                ],
            ),
            SubComponentDefinition::new(
                "asset_valuation",
                0.20,
                vec![
                    MetricDefinition::higher("book_to_price", 0.50)
                        .sector_relative()
                        .describe("Book value of equity over market capitalization"),
                    MetricDefinition::lower("ev_to_sales", 0.50)
                        .sector_relative()
                        .describe("Enterprise value over trailing revenue"),
                ],
            ),
            SubComponentDefinition::new(
                "shareholder_yield",
                0.20,
                vec![
                    MetricDefinition::higher("dividend_yield", 0.60)
                        .describe("Trailing dividends over price"),
                    MetricDefinition::higher("buyback_yield", 0.40)
                        .describe("Net share repurchases over market capitalization"),
                ],
            ),
        ],
    )
}
