//! Business records and the validated snapshot every computation reads from.

use anyhow::{Result, anyhow, bail, ensure};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        ensure!(
            (1..=12).contains(&month),
            "Invalid month {month} in period {year}"
        );
        Ok(Self { year, month })
    }

    /// Signed number of months from `earlier` to `self`.
    pub fn months_since(&self, earlier: &Period) -> i64 {
        (self.year as i64 - earlier.year as i64) * 12 + (self.month as i64 - earlier.month as i64)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
            .map_err(|_| anyhow!("Invalid period: {}", s))?;
        Period::new(date.year(), date.month())
    }
}

impl TryFrom<String> for Period {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessMetricRecord {
    pub period: Period,
    pub revenue: f64,
    #[serde(default)]
    pub customers_count: u32,
    #[serde(default)]
    pub social_networks_active: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningModule {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub order_index: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl Display for ModuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ModuleStatus::NotStarted => "Not started",
                ModuleStatus::InProgress => "In progress",
                ModuleStatus::Completed => "Completed",
            }
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgressRecord {
    pub module_id: String,
    #[serde(default)]
    pub status: ModuleStatus,
    pub completion_date: Option<NaiveDate>,
    pub pre_quiz_score: Option<f64>,
    pub post_quiz_score: Option<f64>,
}

const QUIZ_SCORE_MAX: f64 = 10.0;

/// Largest monthly revenue accepted; sums over any history stay finite.
pub const MAX_MONTHLY_REVENUE: f64 = 1e15;

/// One user's records, validated and put in processing order.
///
/// Built once per run and only ever borrowed afterwards.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: Vec<BusinessMetricRecord>,
    modules: Vec<LearningModule>,
    progress: Vec<UserProgressRecord>,
}

impl Snapshot {
    pub fn new(
        mut records: Vec<BusinessMetricRecord>,
        mut modules: Vec<LearningModule>,
        progress: Vec<UserProgressRecord>,
    ) -> Result<Self> {
        let mut periods = HashSet::new();
        for record in &records {
            if !record.revenue.is_finite() || record.revenue < 0.0 {
                bail!(
                    "Revenue for {} must be a non-negative amount, got {}",
                    record.period,
                    record.revenue
                );
            }
            ensure!(
                record.revenue <= MAX_MONTHLY_REVENUE,
                "Revenue for {} exceeds the maximum of {MAX_MONTHLY_REVENUE}",
                record.period
            );
            ensure!(
                periods.insert(record.period),
                "Duplicate metric record for period {}",
                record.period
            );
        }

        let mut module_ids = HashSet::new();
        for entry in &progress {
            ensure!(
                module_ids.insert(entry.module_id.as_str()),
                "Duplicate progress record for module {}",
                entry.module_id
            );
            for score in [entry.pre_quiz_score, entry.post_quiz_score].into_iter().flatten() {
                ensure!(
                    score.is_finite() && (0.0..=QUIZ_SCORE_MAX).contains(&score),
                    "Quiz score {score} for module {} is outside 0-{QUIZ_SCORE_MAX}",
                    entry.module_id
                );
            }
        }

        records.sort_by_key(|r| r.period);
        modules.sort_by_key(|m| m.order_index);
        debug!(
            "Snapshot ready: {} records, {} modules, {} progress entries",
            records.len(),
            modules.len(),
            progress.len()
        );

        Ok(Self {
            records,
            modules,
            progress,
        })
    }

    /// Metric records in ascending period order.
    pub fn records(&self) -> &[BusinessMetricRecord] {
        &self.records
    }

    pub fn modules(&self) -> &[LearningModule] {
        &self.modules
    }

    pub fn progress(&self) -> &[UserProgressRecord] {
        &self.progress
    }

    pub fn has_history(&self) -> bool {
        !self.records.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn parses_month_and_date_periods() {
        let p: Period = "2024-03".parse().unwrap();
        assert_eq!(p, Period { year: 2024, month: 3 });
        let p: Period = "2024-03-15".parse().unwrap();
        assert_eq!(p.to_string(), "2024-03");
        assert!("2024-13".parse::<Period>().is_err());
        assert!("march".parse::<Period>().is_err());
    }

    #[test]
    fn months_since_crosses_years() {
        let a: Period = "2023-11".parse().unwrap();
        let b: Period = "2024-02".parse().unwrap();
        assert_eq!(b.months_since(&a), 3);
        assert_eq!(a.months_since(&b), -3);
    }

    #[test]
    fn snapshot_sorts_records_and_modules() {
        let snapshot = Snapshot::new(
            vec![record("2024-03", 3.0, 0), record("2024-01", 1.0, 0)],
            vec![module("b", 2), module("a", 1)],
            vec![],
        )
        .unwrap();
        assert_eq!(snapshot.records()[0].period.to_string(), "2024-01");
        assert_eq!(snapshot.modules()[0].id, "a");
    }

    #[test]
    fn snapshot_rejects_negative_revenue() {
        let err = Snapshot::new(vec![record("2024-01", -5.0, 0)], vec![], vec![]).unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn snapshot_rejects_oversized_revenue() {
        let err = Snapshot::new(vec![record("2024-01", 1e300, 0)], vec![], vec![]).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"));
        assert!(
            Snapshot::new(vec![record("2024-01", MAX_MONTHLY_REVENUE, 0)], vec![], vec![]).is_ok()
        );
    }

    #[test]
    fn snapshot_rejects_duplicate_periods() {
        let err = Snapshot::new(
            vec![record("2024-01", 5.0, 0), record("2024-01-20", 6.0, 0)],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate metric record"));
    }

    #[test]
    fn snapshot_rejects_out_of_range_quiz_scores() {
        let result = Snapshot::new(
            vec![],
            vec![module("a", 1)],
            vec![progress("a", ModuleStatus::Completed, Some(3.0), Some(11.0))],
        );
        assert!(result.is_err());
    }

    #[test]
    fn snapshot_rejects_duplicate_progress() {
        let result = Snapshot::new(
            vec![],
            vec![module("a", 1)],
            vec![
                progress("a", ModuleStatus::InProgress, None, None),
                progress("a", ModuleStatus::Completed, None, None),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_snapshot_is_valid() {
        let snapshot = Snapshot::new(vec![], vec![], vec![]).unwrap();
        assert!(!snapshot.has_history());
    }

    #[test]
    fn status_deserializes_snake_case() {
        let entry: UserProgressRecord =
            serde_yaml::from_str("module_id: a\nstatus: in_progress\n").unwrap();
        assert_eq!(entry.status, ModuleStatus::InProgress);
        assert!(entry.pre_quiz_score.is_none());
    }
}
