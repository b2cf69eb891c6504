pub mod challenges;
pub mod chat;
pub mod credit;
pub mod history;
pub mod progress;
pub mod setup;
pub mod summary;
pub mod ui;

use crate::core::config::AppConfig;

/// Heading naming the business, falling back to a generic title.
pub(crate) fn business_title(config: &AppConfig) -> String {
    match (&config.profile.business_name, &config.profile.display_name) {
        (Some(business), Some(owner)) => format!("{business} ({owner})"),
        (Some(business), None) => business.clone(),
        (None, Some(owner)) => format!("{owner}'s business"),
        (None, None) => "Your business".to_string(),
    }
}
