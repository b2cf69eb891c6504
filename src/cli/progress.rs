use super::ui;
use crate::core::Snapshot;
use crate::core::aggregator::{self, GrowthPoint, ModuleImpact};
use crate::core::config::AppConfig;
use anyhow::Result;
use comfy_table::{Attribute, Cell};
use tracing::info;

pub fn run(config: &AppConfig, snapshot: &Snapshot) -> Result<()> {
    info!("Building progress views...");

    let records = snapshot.records();
    if records.is_empty() {
        println!("No monthly records yet. Add your first metrics to see your progress here.");
    } else {
        println!(
            "\n{}",
            ui::style_text("Business evolution", ui::StyleType::Title)
        );
        display_growth_series(&aggregator::growth_series(records), &config.currency);
    }

    let impacts = aggregator::per_module_impact(snapshot.progress(), snapshot.modules());
    if !impacts.is_empty() {
        ui::print_separator();
        println!(
            "\n{} {}",
            ui::style_text("Impact per module", ui::StyleType::Title),
            ui::style_text("(score 0-10)", ui::StyleType::Subtle)
        );
        display_module_impact(&impacts);
    }

    Ok(())
}

fn display_growth_series(series: &[GrowthPoint], currency: &str) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell("Revenue"),
        ui::header_cell("Customers"),
        ui::header_cell("Social networks"),
    ]);

    for point in series {
        table.add_row(vec![
            Cell::new(ui::period_label(&point.period)),
            ui::value_cell(ui::format_currency(point.revenue, currency)),
            ui::value_cell(point.customers_count.to_string()),
            ui::value_cell(point.social_networks_active.to_string()),
        ]);
    }

    println!("{table}");
}

fn display_module_impact(impacts: &[ModuleImpact]) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Module"),
        ui::header_cell("Status"),
        ui::header_cell("Before"),
        ui::header_cell("After"),
        ui::header_cell("Improvement"),
    ]);

    for impact in impacts {
        table.add_row(vec![
            Cell::new(&impact.title),
            Cell::new(impact.status.to_string()),
            ui::format_optional_cell(impact.before, |s| format!("{s:.1}")),
            ui::format_optional_cell(impact.after, |s| format!("{s:.1}")),
            ui::format_optional_cell(impact.improvement_percent, |p| format!("{p:+}%")),
        ]);
    }

    if let Some(average) = aggregator::average_improvement(impacts) {
        table.add_row(vec![
            Cell::new("Average").add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
            ui::change_cell(average),
        ]);
    }

    println!("{table}");
}
