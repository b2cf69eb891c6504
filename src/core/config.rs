use crate::core::eligibility::EligibilityPolicy;
use crate::core::records::{BusinessMetricRecord, LearningModule, Snapshot, UserProgressRecord};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct Profile {
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub business_name: Option<String>,
    pub business_type: Option<String>,
}

fn default_currency() -> String {
    "MXN".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub policy: EligibilityPolicy,
    #[serde(default)]
    pub metrics: Vec<BusinessMetricRecord>,
    #[serde(default)]
    pub modules: Vec<LearningModule>,
    #[serde(default)]
    pub progress: Vec<UserProgressRecord>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "bizmentor", "bizmentor")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Validates the policy and the configured records into an immutable
    /// snapshot.
    pub fn snapshot(&self) -> Result<Snapshot> {
        self.policy
            .validate()
            .context("Invalid eligibility policy in config")?;
        Snapshot::new(
            self.metrics.clone(),
            self.modules.clone(),
            self.progress.clone(),
        )
        .context("Invalid business records in config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::ModuleStatus;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
currency: "USD"
profile:
  user_id: "u-42"
  display_name: "Ana"
  business_name: "Panaderia Sol"
  business_type: "bakery"
policy:
  cost_ratio: 0.6
metrics:
  - period: "2024-02"
    revenue: 12000
    customers_count: 40
    social_networks_active: 2
  - period: "2024-01-01"
    revenue: 10000
    customers_count: 35
    notes: "Opened second stall"
modules:
  - id: "m1"
    title: "Digital Sales"
    category: "marketing"
    order_index: 1
progress:
  - module_id: "m1"
    status: completed
    completion_date: "2024-02-10"
    pre_quiz_score: 4
    post_quiz_score: 8
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, "USD");
        assert_eq!(config.profile.display_name.as_deref(), Some("Ana"));
        assert_eq!(config.policy.cost_ratio, 0.6);
        assert_eq!(config.policy.trailing_window, 6);
        assert_eq!(config.metrics.len(), 2);
        assert_eq!(config.metrics[1].social_networks_active, 0);
        assert_eq!(config.metrics[1].notes.as_deref(), Some("Opened second stall"));
        assert_eq!(config.progress[0].status, ModuleStatus::Completed);
        assert_eq!(config.progress[0].post_quiz_score, Some(8.0));

        let snapshot = config.snapshot().unwrap();
        assert_eq!(snapshot.records()[0].period.to_string(), "2024-01");
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("profile: {}\n").unwrap();
        assert_eq!(config.currency, "MXN");
        assert!(config.metrics.is_empty());
        assert_eq!(config.policy, EligibilityPolicy::default());
        assert!(!config.snapshot().unwrap().has_history());
    }

    #[test]
    fn test_invalid_records_are_rejected() {
        let yaml_str = r#"
metrics:
  - period: "2024-01"
    revenue: -10
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        let err = config.snapshot().unwrap_err();
        assert!(format!("{err:#}").contains("non-negative"));
    }

    #[test]
    fn test_out_of_range_policy_is_rejected() {
        for policy in [
            "cost_ratio: .nan",
            "cost_ratio: 1.5",
            "cost_ratio: -2",
            "trailing_window: 0",
        ] {
            let yaml_str = format!(
                "policy: {{{policy}}}\nmetrics:\n  - period: \"2024-01\"\n    revenue: 20000\n    customers_count: 60\n"
            );
            let config: AppConfig = serde_yaml::from_str(&yaml_str).unwrap();
            let err = config.snapshot().unwrap_err();
            assert!(
                format!("{err:#}").contains("Invalid eligibility policy"),
                "accepted {policy}"
            );
        }
    }

    #[test]
    fn test_bad_period_fails_to_parse() {
        let yaml_str = r#"
metrics:
  - period: "2024-13"
    revenue: 10
"#;
        assert!(serde_yaml::from_str::<AppConfig>(yaml_str).is_err());
    }
}
