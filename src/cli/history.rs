use super::ui;
use crate::core::Snapshot;
use crate::core::aggregator::{self, HistoryTotals, PeriodChange};
use crate::core::config::AppConfig;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};
use tracing::info;

pub fn run(config: &AppConfig, snapshot: &Snapshot) -> Result<()> {
    info!("Building historical report...");

    let records = snapshot.records();
    if records.is_empty() {
        println!("No monthly records found.");
        return Ok(());
    }

    println!(
        "\n{}",
        ui::style_text("Historical reports", ui::StyleType::Title)
    );
    display_totals(&aggregator::history_totals(records), &config.currency);
    display_changes(&aggregator::period_changes(records), &config.currency);
    Ok(())
}

fn display_totals(totals: &HistoryTotals, currency: &str) {
    println!(
        "{} {}",
        ui::style_text("Total revenue:", ui::StyleType::TotalLabel),
        ui::style_text(
            &ui::format_currency(totals.total_revenue, currency),
            ui::StyleType::TotalValue
        )
    );
    println!(
        "{} {}  {} {}  {} {}",
        ui::style_text("Customers:", ui::StyleType::TotalLabel),
        totals.total_customers,
        ui::style_text("Avg. social networks:", ui::StyleType::TotalLabel),
        totals.average_social_networks,
        ui::style_text("Periods:", ui::StyleType::TotalLabel),
        totals.periods_covered
    );
}

fn display_changes(changes: &[PeriodChange], currency: &str) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell("Revenue"),
        ui::header_cell("Change"),
        ui::header_cell("Delta"),
        ui::header_cell("Customers"),
        ui::header_cell("Customer delta"),
    ]);

    // Most recent first.
    for (i, change) in changes.iter().enumerate().rev() {
        let first = i == 0;
        table.add_row(vec![
            Cell::new(ui::period_label(&change.period)),
            ui::value_cell(ui::format_currency(change.revenue, currency)),
            if first {
                ui::format_optional_cell(None::<f64>, |_| String::new())
            } else {
                ui::change_cell(change.revenue_change_percent)
            },
            ui::value_cell(ui::format_currency(change.revenue_delta, currency)),
            ui::value_cell(change.customers_count.to_string()),
            Cell::new(format!("{:+}", change.customers_delta)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{table}");
}
