//! Stability factor - price and fundamental stability
//!
//! Low volatility, low beta and steady fundamentals score high. Drawdown is
//! reported as a negative fraction, so higher (closer to zero) is better.

use crate::definition::{FactorDefinition, MetricDefinition, SubComponentDefinition};
use crate::factor::Factor;

/// Default weight of Stability in the composite.
pub const WEIGHT: f64 = 0.10;

/// Default Stability factor definition.
pub fn definition() -> FactorDefinition {
    FactorDefinition::new(
        Factor::Stability,
        WEIGHT,
        vec![
            SubComponentDefinition::new(
                "price_volatility",
                0.35,
                vec![
                    MetricDefinition::lower("volatility_60d", 0.40)
                        .describe("Annualized 60-day return volatility"),
                    MetricDefinition::lower("volatility_252d", 0.40)
                        .describe("Annualized 252-day return volatility"),
                    MetricDefinition::lower("downside_deviation_252d", 0.20)
                        .describe("Annualized 252-day downside deviation"),
                ],
            ),
            SubComponentDefinition::new(
                "market_risk",
                0.30,
                vec![
                    MetricDefinition::lower("beta_252d", 0.50)
                        .describe("252-day beta against the market"),
                    MetricDefinition::higher("max_drawdown_252d", 0.50)
                        .describe("Largest peak-to-trough decline over 252 days"),
                ],
            ),
            SubComponentDefinition::new(
                "fundamental_stability",
                0.35,
                vec![
                    MetricDefinition::lower("earnings_variability_5y", 0.40)
                        .describe("Coefficient of variation of annual EPS over five years"),
                    MetricDefinition::lower("revenue_variability_5y", 0.30)
                        .describe("Coefficient of variation of annual revenue over five years"),
                    MetricDefinition::lower("margin_variability_5y", 0.30)
                        .sector_relative()
                        .describe("Standard deviation of operating margin over five years"),
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
        assert_eq!(def.factor, Factor::Stability);
        assert_eq!(def.sub_components.len(), 3);
        assert_eq!(def.metric_count(), 8);
    }
}
