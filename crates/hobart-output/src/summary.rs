//! Run-level statistics.
//!
//! A [`RunSummary`] answers the questions a reviewer asks before trusting a
//! run: how many securities were scored and skipped (and why), how the scored
//! ones split across confidence tiers, how well each factor was covered, and
//! which sector-relative metrics fell back to universe ranking.

use crate::record::{ConfidenceTier, ScoreRecord, SkippedSecurity};
use chrono::NaiveDate;
use hobart_factors::Factor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Coverage and distribution of one factor across the scored securities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorCoverage {
    /// The factor.
    pub factor: Factor,

    /// Scored securities with a score for this factor.
    pub scored: usize,

    /// Share of scored securities with a score for this factor.
    pub coverage: f64,

    /// Mean factor score.
    pub mean: Option<f64>,

    /// Median factor score.
    pub median: Option<f64>,
}

/// A sector-relative metric that was ranked against the universe in one sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorFallback {
    /// Metric name.
    pub metric: String,

    /// Sector whose peer group was too small.
    pub sector: String,

    /// Number of peers with a value.
    pub peers: usize,
}

/// Statistics for one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Model name.
    pub model: String,

    /// Scoring date.
    pub date: NaiveDate,

    /// Number of scored securities.
    pub scored: usize,

    /// Number of skipped securities.
    pub skipped: usize,

    /// Skipped securities by reason code.
    pub skipped_by_reason: BTreeMap<String, usize>,

    /// Scored securities by confidence tier.
    pub by_confidence: BTreeMap<ConfidenceTier, usize>,

    /// Mean completeness of the scored securities.
    pub mean_completeness: Option<f64>,

    /// Per-factor coverage, in canonical factor order.
    pub factors: Vec<FactorCoverage>,

    /// Sector-relative metrics that fell back to universe ranking.
    pub fallbacks: Vec<SectorFallback>,
}

impl RunSummary {
    /// Summarize a run.
    pub fn from_run(
        model: impl Into<String>,
        date: NaiveDate,
        records: &[ScoreRecord],
        skipped: &[SkippedSecurity],
        fallbacks: Vec<SectorFallback>,
    ) -> Self {
        let mut skipped_by_reason = BTreeMap::new();
        for entry in skipped {
            *skipped_by_reason
                .entry(entry.reason.code().to_string())
                .or_insert(0) += 1;
        }

        let mut by_confidence = BTreeMap::new();
        for record in records {
            *by_confidence.entry(record.confidence).or_insert(0) += 1;
        }

        let factors = Factor::ALL
            .into_iter()
            .map(|factor| {
                let scores: Vec<f64> = records
                    .iter()
                    .filter_map(|r| r.factor_score(factor))
                    .collect();
                FactorCoverage {
                    factor,
                    scored: scores.len(),
                    coverage: ratio(scores.len(), records.len()),
                    mean: mean(&scores),
                    median: median(scores),
                }
            })
            .collect();

        let completeness: Vec<f64> = records.iter().map(|r| r.completeness).collect();

        Self {
            model: model.into(),
            date,
            scored: records.len(),
            skipped: skipped.len(),
            skipped_by_reason,
            by_confidence,
            mean_completeness: mean(&completeness),
            factors,
            fallbacks,
        }
    }

    /// Count of scored securities in one confidence tier.
    pub fn confidence_count(&self, tier: ConfidenceTier) -> usize {
        self.by_confidence.get(&tier).copied().unwrap_or(0)
    }

    /// Coverage entry for one factor.
    pub fn factor(&self, factor: Factor) -> Option<&FactorCoverage> {
        self.factors.iter().find(|f| f.factor == factor)
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nScoring Run: {} ({})\n", self.model, self.date));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str(&format!("  Scored:                   {}\n", self.scored));
        output.push_str(&format!("  Skipped:                  {}\n", self.skipped));
        for (code, count) in &self.skipped_by_reason {
            output.push_str(&format!("    {code:<24}{count}\n"));
        }
        for tier in ConfidenceTier::ALL.into_iter().rev() {
            output.push_str(&format!(
                "  {:<26}{}\n",
                format!("Confidence {tier}:"),
                self.confidence_count(tier)
            ));
        }
        if let Some(completeness) = self.mean_completeness {
            output.push_str(&format!(
                "  Mean completeness:        {:.1}%\n",
                completeness * 100.0
            ));
        }

        output.push_str("\nFactor Coverage:\n");
        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<14} {:>10} {:>10} {:>10} {:>10}\n",
            "Factor", "Scored", "Coverage", "Mean", "Median"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');
        for coverage in &self.factors {
            output.push_str(&format!(
                "{:<14} {:>10} {:>9.1}% {:>10} {:>10}\n",
                coverage.factor.to_string(),
                coverage.scored,
                coverage.coverage * 100.0,
                fmt_score(coverage.mean),
                fmt_score(coverage.median),
            ));
        }

        if !self.fallbacks.is_empty() {
            output.push_str("\nUniverse Fallbacks:\n");
            output.push_str(&"-".repeat(72));
            output.push('\n');
            for fallback in &self.fallbacks {
                output.push_str(&format!(
                    "  {:<32} {:<28} {} peer(s)\n",
                    fallback.metric, fallback.sector, fallback.peers
                ));
            }
        }

        output.push_str(&"=".repeat(72));
        output.push('\n');

        output
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scoring Run: {} ({})", self.model, self.date)?;
        writeln!(f, "  Scored: {}", self.scored)?;
        writeln!(f, "  Skipped: {}", self.skipped)?;
        writeln!(
            f,
            "  Confidence: {} high, {} medium, {} low",
            self.confidence_count(ConfidenceTier::High),
            self.confidence_count(ConfidenceTier::Medium),
            self.confidence_count(ConfidenceTier::Low)
        )?;
        writeln!(f, "  Universe fallbacks: {}", self.fallbacks.len())?;
        Ok(())
    }
}

fn fmt_score(score: Option<f64>) -> String {
    score.map_or_else(|| "-".to_string(), |s| format!("{s:.1}"))
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FactorScore, SkipReason};
    use approx::assert_relative_eq;

    fn record(symbol: &str, value: Option<f64>, momentum: Option<f64>) -> ScoreRecord {
        let factor = |factor, score| FactorScore {
            factor,
            score,
            weight: 0.5,
            effective_weight: None,
            sub_components: vec![],
        };
        ScoreRecord {
            symbol: symbol.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            sector: None,
            composite: 50.0,
            rank: 1,
            confidence: if momentum.is_some() {
                ConfidenceTier::Medium
            } else {
                ConfidenceTier::Low
            },
            completeness: 0.5,
            factors_used: 2,
            metrics_used: 2,
            factors: vec![factor(Factor::Value, value), factor(Factor::Momentum, momentum)],
        }
    }

    fn summary() -> RunSummary {
        let records = vec![
            record("A", Some(10.0), Some(80.0)),
            record("B", Some(20.0), None),
            record("C", Some(60.0), Some(40.0)),
        ];
        let skipped = vec![
            SkippedSecurity::new("D", SkipReason::InsufficientData),
            SkippedSecurity::new("E", SkipReason::InsufficientData),
        ];
        RunSummary::from_run(
            "test",
            NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            &records,
            &skipped,
            vec![SectorFallback {
                metric: "debt_to_equity".to_string(),
                sector: "Utilities".to_string(),
                peers: 3,
            }],
        )
    }

    #[test]
    fn test_counts() {
        let summary = summary();
        assert_eq!(summary.scored, 3);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.skipped_by_reason.get("insufficient_data"), Some(&2));
        assert_eq!(summary.confidence_count(ConfidenceTier::Medium), 2);
        assert_eq!(summary.confidence_count(ConfidenceTier::Low), 1);
        assert_eq!(summary.confidence_count(ConfidenceTier::High), 0);
    }

    #[test]
    fn test_factor_coverage() {
        let summary = summary();
        let value = summary.factor(Factor::Value).unwrap();
        assert_eq!(value.scored, 3);
        assert_relative_eq!(value.coverage, 1.0);
        assert_relative_eq!(value.mean.unwrap(), 30.0);
        assert_relative_eq!(value.median.unwrap(), 20.0);

        let momentum = summary.factor(Factor::Momentum).unwrap();
        assert_eq!(momentum.scored, 2);
        assert_relative_eq!(momentum.median.unwrap(), 60.0);

        let quality = summary.factor(Factor::Quality).unwrap();
        assert_eq!(quality.scored, 0);
        assert!(quality.mean.is_none());
    }

    #[test]
    fn test_rendering() {
        let summary = summary();
        let table = summary.to_ascii_table();
        assert!(table.contains("Scoring Run: test"));
        assert!(table.contains("debt_to_equity"));
        assert!(table.contains("insufficient_data"));

        let text = summary.to_string();
        assert!(text.contains("Skipped: 2"));
        assert!(text.contains("Universe fallbacks: 1"));
    }

    #[test]
    fn test_empty_run() {
        let summary = RunSummary::from_run(
            "empty",
            NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            &[],
            &[],
            vec![],
        );
        assert_eq!(summary.scored, 0);
        assert!(summary.mean_completeness.is_none());
        assert!(summary.factors.iter().all(|f| f.coverage == 0.0));
    }
}
