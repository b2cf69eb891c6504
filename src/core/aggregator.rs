//! Derived statistics over a user's monthly records and learning progress.
//!
//! Every function here is a pure projection of its inputs: calling it twice
//! on the same snapshot yields the same result.
use crate::core::math::{round_half_up, safe_div, safe_percent};
use crate::core::records::{
    BusinessMetricRecord, LearningModule, ModuleStatus, Period, UserProgressRecord,
};
use chrono::NaiveDate;
use rust_decimal::{Decimal, prelude::*};
use rust_finprim::rate::cagr;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One point of the growth chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPoint {
    pub period: Period,
    pub revenue: f64,
    pub customers_count: u32,
    pub social_networks_active: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetricsSummary {
    pub total_growth_percent: i64,
    pub latest_revenue: f64,
    pub total_customers: u64,
    pub completed_module_count: usize,
    pub learning_progress_percent: i64,
    pub latest_social_networks: u32,
}

/// Before/after assessment for a single learning module.
///
/// Scores are `None` when no assessment was recorded; such modules carry no
/// improvement figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleImpact {
    pub module_id: String,
    pub title: String,
    pub status: ModuleStatus,
    pub before: Option<f64>,
    pub after: Option<f64>,
    pub improvement_percent: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodChange {
    pub period: Period,
    pub revenue: f64,
    pub revenue_delta: f64,
    pub revenue_change_percent: f64,
    pub customers_count: u32,
    pub customers_delta: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryTotals {
    pub total_revenue: f64,
    pub total_customers: u64,
    pub average_social_networks: i64,
    pub periods_covered: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthTrend {
    NoData,
    Growing(i64),
    Flat,
    Declining(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Achievement {
    ModuleCompleted {
        title: String,
        completed_on: Option<NaiveDate>,
        points: u32,
    },
    ConsistentReporting {
        periods: usize,
    },
}

const MODULE_COMPLETION_POINTS: u32 = 50;

pub fn growth_series(records: &[BusinessMetricRecord]) -> Vec<GrowthPoint> {
    records
        .iter()
        .map(|r| GrowthPoint {
            period: r.period,
            revenue: r.revenue,
            customers_count: r.customers_count,
            social_networks_active: r.social_networks_active,
        })
        .collect()
}

/// Revenue growth from the first to the last period, as a rounded percentage.
///
/// Returns 0 with fewer than two records or when the first period had no revenue.
pub fn overall_growth_percent(records: &[BusinessMetricRecord]) -> i64 {
    match (records.first(), records.last()) {
        (Some(first), Some(last)) if records.len() >= 2 => {
            round_half_up(safe_percent(last.revenue - first.revenue, first.revenue))
        }
        _ => 0,
    }
}

/// Cumulative sum of per-period customer counts.
pub fn total_customers(records: &[BusinessMetricRecord]) -> u64 {
    records.iter().map(|r| r.customers_count as u64).sum()
}

pub fn latest_revenue(records: &[BusinessMetricRecord]) -> f64 {
    records.last().map_or(0.0, |r| r.revenue)
}

pub fn latest_social_networks(records: &[BusinessMetricRecord]) -> u32 {
    records.last().map_or(0, |r| r.social_networks_active)
}

/// Completed progress entries that refer to a module in the catalog.
pub fn completed_module_count(
    progress: &[UserProgressRecord],
    modules: &[LearningModule],
) -> usize {
    let catalog: HashSet<&str> = modules.iter().map(|m| m.id.as_str()).collect();
    progress
        .iter()
        .filter(|p| p.status == ModuleStatus::Completed && catalog.contains(p.module_id.as_str()))
        .count()
}

pub fn learning_progress_percent(
    progress: &[UserProgressRecord],
    modules: &[LearningModule],
) -> i64 {
    let completed = completed_module_count(progress, modules);
    round_half_up(safe_percent(completed as f64, modules.len() as f64))
}

pub fn per_module_impact(
    progress: &[UserProgressRecord],
    modules: &[LearningModule],
) -> Vec<ModuleImpact> {
    let by_module: HashMap<&str, &UserProgressRecord> =
        progress.iter().map(|p| (p.module_id.as_str(), p)).collect();

    modules
        .iter()
        .map(|module| {
            let entry = by_module.get(module.id.as_str());
            let status = entry.map_or(ModuleStatus::NotStarted, |p| p.status);
            let before = entry.and_then(|p| p.pre_quiz_score);
            // Until a module is completed the learner is still at the starting score.
            let after = entry.and_then(|p| p.post_quiz_score).or(match status {
                ModuleStatus::Completed => None,
                _ => before,
            });
            let improvement_percent = match (before, after) {
                (Some(b), Some(a)) if b > 0.0 => Some(round_half_up(safe_percent(a - b, b))),
                (Some(_), Some(_)) => Some(0),
                _ => None,
            };

            ModuleImpact {
                module_id: module.id.clone(),
                title: module.title.clone(),
                status,
                before,
                after,
                improvement_percent,
            }
        })
        .collect()
}

/// Mean improvement over the modules that have both assessments.
pub fn average_improvement(impacts: &[ModuleImpact]) -> Option<f64> {
    let known: Vec<i64> = impacts.iter().filter_map(|m| m.improvement_percent).collect();
    if known.is_empty() {
        return None;
    }
    Some(known.iter().sum::<i64>() as f64 / known.len() as f64)
}

pub fn summarize(
    records: &[BusinessMetricRecord],
    progress: &[UserProgressRecord],
    modules: &[LearningModule],
) -> DerivedMetricsSummary {
    let summary = DerivedMetricsSummary {
        total_growth_percent: overall_growth_percent(records),
        latest_revenue: latest_revenue(records),
        total_customers: total_customers(records),
        completed_module_count: completed_module_count(progress, modules),
        learning_progress_percent: learning_progress_percent(progress, modules),
        latest_social_networks: latest_social_networks(records),
    };
    debug!("Derived summary: {summary:?}");
    summary
}

/// Change of each period against the one before it.
pub fn period_changes(records: &[BusinessMetricRecord]) -> Vec<PeriodChange> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let previous = i.checked_sub(1).map(|p| &records[p]);
            let (revenue_delta, revenue_change_percent, customers_delta) = match previous {
                Some(prev) => (
                    record.revenue - prev.revenue,
                    safe_percent(record.revenue - prev.revenue, prev.revenue),
                    record.customers_count as i64 - prev.customers_count as i64,
                ),
                None => (0.0, 0.0, 0),
            };
            PeriodChange {
                period: record.period,
                revenue: record.revenue,
                revenue_delta,
                revenue_change_percent,
                customers_count: record.customers_count,
                customers_delta,
            }
        })
        .collect()
}

pub fn history_totals(records: &[BusinessMetricRecord]) -> HistoryTotals {
    let social: u64 = records.iter().map(|r| r.social_networks_active as u64).sum();
    HistoryTotals {
        total_revenue: records.iter().map(|r| r.revenue).sum(),
        total_customers: total_customers(records),
        average_social_networks: round_half_up(safe_div(social as f64, records.len() as f64)),
        periods_covered: records.len(),
    }
}

/// Compound monthly revenue growth between the first and last period, in percent.
pub fn compound_monthly_growth_percent(records: &[BusinessMetricRecord]) -> Option<f64> {
    let (first, last) = match records {
        [first, .., last] => (first, last),
        _ => return None,
    };
    let months = last.period.months_since(&first.period);
    if months <= 0 || first.revenue <= 0.0 || last.revenue <= 0.0 {
        return None;
    }

    let begin_bal = Decimal::from_f64(first.revenue)?;
    let end_bal = Decimal::from_f64(last.revenue)?;
    let n_months = Decimal::from(months);
    let rate = cagr(begin_bal, end_bal, n_months);
    let percentage = (rate * Decimal::from(100)).to_f64()?;
    debug!("monthly growth: {begin_bal} -> {end_bal} over {n_months} months = {percentage}");
    Some(percentage)
}

pub fn growth_trend(records: &[BusinessMetricRecord]) -> GrowthTrend {
    if records.is_empty() {
        return GrowthTrend::NoData;
    }
    match overall_growth_percent(records) {
        0 => GrowthTrend::Flat,
        g if g > 0 => GrowthTrend::Growing(g),
        g => GrowthTrend::Declining(g),
    }
}

pub fn recent_achievements(
    progress: &[UserProgressRecord],
    modules: &[LearningModule],
    records: &[BusinessMetricRecord],
) -> Vec<Achievement> {
    let mut achievements = Vec::new();

    // Undated completions sort before any dated one.
    let latest = progress
        .iter()
        .filter(|p| p.status == ModuleStatus::Completed)
        .max_by_key(|p| p.completion_date);
    if let Some(entry) = latest {
        if let Some(module) = modules.iter().find(|m| m.id == entry.module_id) {
            achievements.push(Achievement::ModuleCompleted {
                title: module.title.clone(),
                completed_on: entry.completion_date,
                points: MODULE_COMPLETION_POINTS,
            });
        }
    }

    if records.len() >= 2 {
        achievements.push(Achievement::ConsistentReporting {
            periods: records.len(),
        });
    }

    achievements
}
