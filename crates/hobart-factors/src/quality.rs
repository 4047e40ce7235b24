//! Quality factor - measures of fundamental business quality
//!
//! Quality captures the tendency of profitable, conservatively financed
//! businesses with clean earnings to outperform. Balance sheet and margin
//! metrics are judged against sector peers, since a "healthy" leverage ratio
//! or gross margin differs widely between, say, utilities and software.

use crate::definition::{FactorDefinition, MetricDefinition, SubComponentDefinition};
use crate::factor::Factor;

/// Default weight of Quality in the composite.
pub const WEIGHT: f64 = 0.25;

/// Default Quality factor definition.
pub fn definition() -> FactorDefinition {
    FactorDefinition::new(
        Factor::Quality,
        WEIGHT,
        vec![
            SubComponentDefinition::new(
                "profitability",
                0.35,
                vec![
                    MetricDefinition::higher("roe", 0.20).describe("Return on equity"),
                    MetricDefinition::higher("roa", 0.20)
                        .sector_relative()
                        .describe("Return on assets"),
                    MetricDefinition::higher("roic", 0.25).describe("Return on invested capital"),
                    MetricDefinition::higher("gross_margin", 0.15)
                        .sector_relative()
                        .describe("Gross profit over revenue"),
                    MetricDefinition::higher("operating_margin", 0.10)
                        .sector_relative()
                        .describe("Operating income over revenue"),
                    MetricDefinition::higher("net_margin", 0.10)
                        .sector_relative()
                        .describe("Net income over revenue"),
                ],
            ),
            SubComponentDefinition::new(
                "financial_strength",
                0.25,
                vec![
                    MetricDefinition::lower("debt_to_equity", 0.30)
                        .sector_relative()
                        .describe("Total debt over shareholders' equity"),
                    MetricDefinition::lower("net_debt_to_ebitda", 0.25)
                        .sector_relative()
                        .describe("Net debt over trailing EBITDA"),
                    MetricDefinition::higher("interest_coverage", 0.25)
                        .describe("EBIT over interest expense"),
                    MetricDefinition::higher("current_ratio", 0.20)
                        .sector_relative()
                        .describe("Current assets over current liabilities"),
                ],
            ),
            SubComponentDefinition::new(
                "earnings_quality",
                0.20,
                vec![
                    MetricDefinition::lower("accruals_ratio", 0.40)
                        .describe("Net income minus operating cash flow, over total assets"),
                    MetricDefinition::higher("cash_conversion", 0.35)
                        .describe("Operating cash flow over net income"),
                    MetricDefinition::higher("piotroski_f_score", 0.25)
                        .describe("Piotroski nine-point fundamental score"),
                ],
            ),
            SubComponentDefinition::new(
                "efficiency",
                0.20,
                vec![
                    MetricDefinition::higher("asset_turnover", 0.40)
                        .sector_relative()
                        .describe("Revenue over average total assets"),
                    MetricDefinition::higher("inventory_turnover", 0.30)
                        .sector_relative()
                        .describe("Cost of revenue over average inventory"),
                    MetricDefinition::higher("receivables_turnover", 0.30)
                        .sector_relative()
                        .describe("Revenue over average receivables"),
                ],
            ),
        ],
    )
}
