//! Credit eligibility scoring over the trailing window of monthly records.
use crate::core::aggregator::overall_growth_percent;
use crate::core::math::{safe_div, safe_percent};
use crate::core::records::BusinessMetricRecord;
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_COST_RATIO: f64 = 0.7;
pub const DEFAULT_TRAILING_WINDOW: usize = 6;
pub const MAX_SCORE: u32 = 100;

/// Tunable inputs of the scoring algorithm.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EligibilityPolicy {
    /// Share of revenue assumed to go to costs.
    #[serde(default = "default_cost_ratio")]
    pub cost_ratio: f64,
    #[serde(default = "default_trailing_window")]
    pub trailing_window: usize,
}

fn default_cost_ratio() -> f64 {
    DEFAULT_COST_RATIO
}

fn default_trailing_window() -> usize {
    DEFAULT_TRAILING_WINDOW
}

impl EligibilityPolicy {
    /// Rejects settings the scoring formulas cannot give a meaning to.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.cost_ratio.is_finite() && (0.0..=1.0).contains(&self.cost_ratio),
            "Policy cost_ratio must be between 0 and 1, got {}",
            self.cost_ratio
        );
        ensure!(
            self.trailing_window >= 1,
            "Policy trailing_window must cover at least one month"
        );
        Ok(())
    }
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        EligibilityPolicy {
            cost_ratio: DEFAULT_COST_RATIO,
            trailing_window: DEFAULT_TRAILING_WINDOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityAnalysis {
    pub average_revenue: f64,
    pub average_customers: f64,
    pub revenue_growth_percent: i64,
    pub net_profit_estimate: f64,
    pub profit_margin_percent: f64,
    pub eligibility_score: u32,
    pub months_of_data: usize,
}

/// Scores the user's history.
///
/// Returns `None` when there are no records at all; callers should show a
/// data-insufficiency state instead of offers.
pub fn analyze_eligibility(
    records: &[BusinessMetricRecord],
    policy: &EligibilityPolicy,
) -> Option<EligibilityAnalysis> {
    if records.is_empty() {
        return None;
    }

    let window = &records[records.len().saturating_sub(policy.trailing_window.max(1))..];
    let months = window.len() as f64;
    let average_revenue = safe_div(window.iter().map(|r| r.revenue).sum(), months);
    let average_customers = safe_div(
        window.iter().map(|r| r.customers_count as f64).sum(),
        months,
    );
    let revenue_growth_percent = overall_growth_percent(records);
    let net_profit_estimate = average_revenue * (1.0 - policy.cost_ratio);
    let profit_margin_percent = safe_percent(net_profit_estimate, average_revenue);

    let mut analysis = EligibilityAnalysis {
        average_revenue,
        average_customers,
        revenue_growth_percent,
        net_profit_estimate,
        profit_margin_percent,
        eligibility_score: 0,
        months_of_data: window.len(),
    };
    analysis.eligibility_score = score(&analysis);
    debug!("Eligibility analysis: {analysis:?}");
    Some(analysis)
}

/// Sums the points of every satisfied threshold, capped at [`MAX_SCORE`].
fn score(analysis: &EligibilityAnalysis) -> u32 {
    let rules: [(bool, u32); 8] = [
        (analysis.months_of_data >= 3, 20),
        (analysis.months_of_data >= 6, 10),
        (analysis.average_revenue >= 10_000.0, 25),
        (analysis.average_revenue >= 50_000.0, 15),
        (analysis.revenue_growth_percent > 0, 20),
        (analysis.revenue_growth_percent > 20, 10),
        (analysis.profit_margin_percent > 20.0, 15),
        (analysis.average_customers >= 50.0, 10),
    ];
    let total: u32 = rules
        .iter()
        .filter(|(met, _)| *met)
        .map(|(_, points)| points)
        .sum();
    total.min(MAX_SCORE)
}
