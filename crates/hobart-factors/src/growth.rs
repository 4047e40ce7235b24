//! Growth factor - top-line, bottom-line and cash flow growth
//!
//! Combines realized revenue, earnings and cash flow growth with margin
//! expansion. Only reported history is used; there are no estimates.

use crate::definition::{FactorDefinition, MetricDefinition, SubComponentDefinition};
use crate::factor::Factor;

/// Default weight of Growth in the composite.
pub const WEIGHT: f64 = 0.20;

/// Default Growth factor definition.
pub fn definition() -> FactorDefinition {
    FactorDefinition::new(
        Factor::Growth,
        WEIGHT,
        vec![
            SubComponentDefinition::new(
                "revenue_growth",
                0.30,
                vec![
                    MetricDefinition::higher("revenue_growth_yoy", 0.40)
                        .describe("Trailing twelve month revenue growth, year over year"),
                    MetricDefinition::higher("revenue_growth_3y_cagr", 0.40)
                        .describe("Three-year compound annual revenue growth"),
                    MetricDefinition::higher("revenue_growth_qoq", 0.20)
                        .describe("Latest quarter revenue growth over the prior quarter"),
                ],
            ),
            SubComponentDefinition::new(
                "earnings_growth",
                0.30,
                vec![
                    MetricDefinition::higher("eps_growth_yoy", 0.40)
                        .describe("Diluted EPS growth, year over year"),
                    MetricDefinition::higher("eps_growth_3y_cagr", 0.40)
                        .describe("Three-year compound annual EPS growth"),
                    MetricDefinition::higher("net_income_growth_yoy", 0.20)
                        .describe("Net income growth, year over year"),
                ],
            ),
            SubComponentDefinition::new(
                "cash_flow_growth",
                0.20,
                vec![
                    MetricDefinition::higher("fcf_growth_yoy", 0.50)
                        .describe("Free cash flow growth, year over year"),
                    MetricDefinition::higher("operating_cash_flow_growth_yoy", 0.50)
                        .describe("Operating cash flow growth, year over year"),
                ],
            ),
            SubComponentDefinition::new(
                "margin_expansion",
                0.20,
                vec![
                    MetricDefinition::higher("gross_margin_change", 0.50)
                        .describe("Change in gross margin over the past year"),
                    MetricDefinition::higher("operating_margin_change", 0.50)
                        .describe("Change in operating margin over the past year"),
                ],
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_shape() {
        let def = definition();
        assert_eq!(def.factor, Factor::Growth);
        assert_eq!(def.sub_components.len(), 4);
        assert_eq!(def.metric_count(), 10);
    }
}
