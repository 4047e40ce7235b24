//! Positioning factor - ownership, insider activity and short interest

use crate::definition::{FactorDefinition, MetricDefinition, SubComponentDefinition};
use crate::factor::Factor;

/// Default weight of Positioning in the composite.
pub const WEIGHT: f64 = 0.10;

/// Default Positioning factor definition.
pub fn definition() -> FactorDefinition {
    FactorDefinition::new(
        Factor::Positioning,
        WEIGHT,
        vec![
            SubComponentDefinition::new(
                "institutional",
                0.35,
                vec![
                    MetricDefinition::higher("institutional_ownership_pct", 0.50)
                        .describe("Share of float held by institutions"),
                    MetricDefinition::higher("institutional_ownership_change_qoq", 0.50)
                        .describe("Quarter-over-quarter change in institutional ownership"),
                ],
            ),
            SubComponentDefinition::new(
                "insider",
                0.25,
                vec![
                    MetricDefinition::higher("insider_ownership_pct", 0.50)
                        .describe("Share of outstanding shares held by insiders"),
                    MetricDefinition::higher("insider_net_buying_6m", 0.50)
                        .describe("Net insider purchases over six months, as a share of float"),
                ],
            ),
            SubComponentDefinition::new(
                "short_interest",
                0.25,
                vec![
                    MetricDefinition::lower("short_interest_pct_float", 0.60)
                        .describe("Shares sold short over float"),
                    MetricDefinition::lower("days_to_cover", 0.40)
                        .describe("Shares sold short over average daily volume"),
                ],
            ),
            SubComponentDefinition::new(
                "liquidity",
                0.15,
                vec![
                    MetricDefinition::higher("avg_dollar_volume_3m", 0.60)
                        .describe("Average daily traded value over three months"),
                    MetricDefinition::higher("share_turnover_3m", 0.40)
                        .describe("Average daily volume over shares outstanding"),
                ],
            ),
        ],
    )
}
