//! Core business logic: records, derived metrics and credit eligibility

pub mod aggregator;
pub mod challenges;
pub mod config;
pub mod eligibility;
pub mod log;
pub mod math;
pub mod mentor;
pub mod offers;
pub mod records;

// Re-export main types for cleaner imports
pub use aggregator::DerivedMetricsSummary;
pub use challenges::{ChallengeBoard, Rank};
pub use eligibility::{EligibilityAnalysis, EligibilityPolicy};
pub use offers::{CreditOffer, OfferKind};
pub use records::{BusinessMetricRecord, LearningModule, Period, Snapshot, UserProgressRecord};
