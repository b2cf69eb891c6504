//! The fixed catalog of credit offers and their amortised payments.
use crate::core::eligibility::EligibilityAnalysis;
use crate::core::math::round_half_up;
use serde::Serialize;
use std::fmt::Display;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferKind {
    Equipment,
    WorkingCapital,
    Expansion,
    Emergency,
}

impl OfferKind {
    pub const ALL: [OfferKind; 4] = [
        OfferKind::Equipment,
        OfferKind::WorkingCapital,
        OfferKind::Expansion,
        OfferKind::Emergency,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OfferKind::Equipment => "Equipment Credit",
            OfferKind::WorkingCapital => "Working Capital",
            OfferKind::Expansion => "Expansion Credit",
            OfferKind::Emergency => "Emergency Fund",
        }
    }
}

impl Display for OfferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                OfferKind::Equipment => "equipment",
                OfferKind::WorkingCapital => "working_capital",
                OfferKind::Expansion => "expansion",
                OfferKind::Emergency => "emergency",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditOffer {
    pub kind: OfferKind,
    pub name: String,
    pub amount: f64,
    pub annual_interest_rate_percent: f64,
    pub term_months: u32,
    pub monthly_payment: i64,
    pub eligible: bool,
    pub eligibility_score: u32,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
}

/// Amount cap, pricing and eligibility for one offer kind.
struct OfferTerms {
    amount: f64,
    rate: f64,
    term_months: u32,
    eligible: bool,
    requirements: &'static [&'static str],
    benefits: &'static [&'static str],
}

fn terms_for(kind: OfferKind, analysis: &EligibilityAnalysis) -> OfferTerms {
    let revenue = analysis.average_revenue;
    let score = analysis.eligibility_score;
    let growth = analysis.revenue_growth_percent;

    match kind {
        OfferKind::Equipment => OfferTerms {
            amount: (revenue * 0.5).min(100_000.0),
            rate: if score > 70 { 15.9 } else { 18.9 },
            term_months: 24,
            eligible: score >= 50 && revenue >= 10_000.0,
            requirements: &[
                "At least 3 months of recorded sales",
                "Average revenue of $10,000+ per month",
                "Up-to-date electronic invoicing",
            ],
            benefits: &[
                "No additional collateral",
                "Approval within 48 hours",
                "Flexible payments",
            ],
        },
        OfferKind::WorkingCapital => OfferTerms {
            amount: (revenue * 1.2).min(200_000.0),
            rate: if score > 80 { 14.9 } else { 17.9 },
            term_months: 12,
            eligible: score >= 65 && analysis.months_of_data >= 6 && growth > 0,
            requirements: &[
                "At least 6 months in operation",
                "Positive sales growth",
                "Profit margin of 15%+",
            ],
            benefits: &[
                "Use the capital freely",
                "Automatic renewal",
                "No opening fees",
            ],
        },
        OfferKind::Expansion => OfferTerms {
            amount: (revenue * 2.0).min(500_000.0),
            rate: if score > 85 { 13.9 } else { 16.9 },
            term_months: 36,
            eligible: score >= 80 && growth >= 20 && revenue >= 50_000.0,
            requirements: &[
                "6+ months of history",
                "Sustained growth of 20%+",
                "Detailed expansion plan",
            ],
            benefits: &[
                "Amounts up to $500,000",
                "Extended term",
                "Business advisory included",
            ],
        },
        OfferKind::Emergency => OfferTerms {
            amount: (revenue * 0.3).min(50_000.0),
            rate: 19.9,
            term_months: 6,
            eligible: score >= 30,
            requirements: &[
                "Basic sales records",
                "Official identification",
                "Proof of income",
            ],
            benefits: &[
                "Immediate approval",
                "Available 24/7",
                "Minimal paperwork",
            ],
        },
    }
}

/// Builds every offer in catalog order, eligible or not.
pub fn generate_offers(analysis: &EligibilityAnalysis) -> Vec<CreditOffer> {
    OfferKind::ALL
        .iter()
        .map(|&kind| {
            let terms = terms_for(kind, analysis);
            let offer = CreditOffer {
                kind,
                name: kind.name().to_string(),
                amount: terms.amount,
                annual_interest_rate_percent: terms.rate,
                term_months: terms.term_months,
                monthly_payment: monthly_payment(terms.amount, terms.rate, terms.term_months),
                eligible: terms.eligible,
                eligibility_score: analysis.eligibility_score,
                requirements: terms.requirements.iter().map(|s| s.to_string()).collect(),
                benefits: terms.benefits.iter().map(|s| s.to_string()).collect(),
            };
            debug!(
                "{kind}: amount {:.2} at {}% over {} months, eligible={}",
                offer.amount, offer.annual_interest_rate_percent, offer.term_months, offer.eligible
            );
            offer
        })
        .collect()
}

/// Fixed monthly payment that repays `amount` over `term_months`, rounded to
/// the nearest currency unit.
pub fn monthly_payment(amount: f64, annual_rate_percent: f64, term_months: u32) -> i64 {
    if term_months == 0 {
        return 0;
    }
    let n = term_months as f64;
    let r = annual_rate_percent / 100.0 / 12.0;
    if r == 0.0 {
        return round_half_up(amount / n);
    }
    let growth = (1.0 + r).powf(n);
    round_half_up(amount * r * growth / (growth - 1.0))
}
