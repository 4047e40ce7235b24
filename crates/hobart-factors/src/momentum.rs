//! Momentum factor - price trend and relative strength
//!
//! The twelve-month return skips the most recent month to sidestep
//! short-term reversal.

use crate::definition::{FactorDefinition, MetricDefinition, SubComponentDefinition};
use crate::factor::Factor;

/// Default weight of Momentum in the composite.
pub const WEIGHT: f64 = 0.15;

/// Default Momentum factor definition.
pub fn definition() -> FactorDefinition {
    FactorDefinition::new(
        Factor::Momentum,
        WEIGHT,
        vec![
            SubComponentDefinition::new(
                "price_momentum",
                0.40,
                vec![
                    MetricDefinition::higher("return_1m", 0.15).describe("One-month total return"),
                    MetricDefinition::higher("return_3m", 0.25)
                        .describe("Three-month total return"),
                    MetricDefinition::higher("return_6m", 0.30).describe("Six-month total return"),
                    MetricDefinition::higher("return_12m_ex_1m", 0.30)
                        .describe("Twelve-month total return excluding the latest month"),
                ],
            ),
            SubComponentDefinition::new(
                "trend",
                0.25,
                vec![
                    MetricDefinition::higher("price_to_sma_50", 0.35)
                        .describe("Price over its 50-day simple moving average"),
                    MetricDefinition::higher("price_to_sma_200", 0.35)
                        .describe("Price over its 200-day simple moving average"),
                    MetricDefinition::higher("sma_50_to_sma_200", 0.30)
                        .describe("50-day over 200-day simple moving average"),
                ],
            ),
            SubComponentDefinition::new(
                "relative_strength",
                0.20,
                vec![
                    MetricDefinition::higher("relative_strength_6m", 0.50)
                        .describe("Six-month return minus the market return"),
                    MetricDefinition::higher("relative_strength_12m", 0.50)
                        .describe("Twelve-month return minus the market return"),
                ],
            ),
            SubComponentDefinition::new(
                "earnings_momentum",
                0.15,
                vec![
                    MetricDefinition::higher("earnings_surprise_pct", 0.60)
                        .describe("Latest reported EPS surprise, percent"),
                    MetricDefinition::higher("sue_score", 0.40)
                        .describe("Standardized unexpected earnings"),
                ],
            ),
        ],
    )
}
