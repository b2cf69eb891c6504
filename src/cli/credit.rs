use super::ui;
use crate::core::config::AppConfig;
use crate::core::eligibility::analyze_eligibility;
use crate::core::offers::generate_offers;
use crate::core::{CreditOffer, EligibilityAnalysis, Snapshot};
use anyhow::Result;
use comfy_table::Cell;
use tracing::{debug, info};

pub fn run(config: &AppConfig, snapshot: &Snapshot) -> Result<()> {
    info!("Analyzing credit eligibility...");
    debug!("Using policy: {:?}", config.policy);

    let Some(analysis) = analyze_eligibility(snapshot.records(), &config.policy) else {
        println!(
            "{}",
            ui::style_text(
                "Not enough data: record at least one month of sales to see credit offers.",
                ui::StyleType::Error
            )
        );
        return Ok(());
    };

    println!(
        "\n{}",
        ui::style_text("Eligibility analysis", ui::StyleType::Title)
    );
    display_analysis(&analysis, &config.currency);

    let offers = generate_offers(&analysis);
    println!("\n{}", ui::style_text("Credit offers", ui::StyleType::Title));
    display_offers(&offers, &config.currency);

    for offer in offers.iter().filter(|o| o.eligible) {
        println!(
            "\n{}",
            ui::style_text(&offer.name, ui::StyleType::TotalLabel)
        );
        for requirement in &offer.requirements {
            println!("  - {requirement}");
        }
        for benefit in &offer.benefits {
            println!("  + {}", ui::style_text(benefit, ui::StyleType::Subtle));
        }
    }

    Ok(())
}

fn display_analysis(analysis: &EligibilityAnalysis, currency: &str) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Indicator"), ui::header_cell("Value")]);

    table.add_row(vec![
        Cell::new("Eligibility score"),
        ui::value_cell(format!("{}/100", analysis.eligibility_score)),
    ]);
    table.add_row(vec![
        Cell::new("Average monthly revenue"),
        ui::value_cell(ui::format_currency(analysis.average_revenue, currency)),
    ]);
    table.add_row(vec![
        Cell::new("Average customers"),
        ui::value_cell(format!("{:.1}", analysis.average_customers)),
    ]);
    table.add_row(vec![
        Cell::new("Revenue growth"),
        ui::change_cell(analysis.revenue_growth_percent as f64),
    ]);
    table.add_row(vec![
        Cell::new("Estimated net profit"),
        ui::value_cell(ui::format_currency(analysis.net_profit_estimate, currency)),
    ]);
    table.add_row(vec![
        Cell::new("Profit margin"),
        ui::value_cell(format!("{:.1}%", analysis.profit_margin_percent)),
    ]);
    table.add_row(vec![
        Cell::new("Months analyzed"),
        ui::value_cell(analysis.months_of_data.to_string()),
    ]);

    println!("{table}");
}

fn display_offers(offers: &[CreditOffer], currency: &str) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Offer"),
        ui::header_cell("Amount"),
        ui::header_cell("Rate"),
        ui::header_cell("Term"),
        ui::header_cell("Monthly payment"),
        ui::header_cell("Eligible"),
    ]);

    for offer in offers {
        table.add_row(vec![
            Cell::new(&offer.name),
            ui::value_cell(ui::format_currency(offer.amount, currency)),
            ui::value_cell(format!("{:.1}%", offer.annual_interest_rate_percent)),
            ui::value_cell(format!("{} mo", offer.term_months)),
            ui::value_cell(ui::format_currency(offer.monthly_payment as f64, currency)),
            ui::flag_cell(offer.eligible),
        ]);
    }

    println!("{table}");
}
