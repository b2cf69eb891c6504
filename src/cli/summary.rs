use super::ui;
use crate::core::aggregator::{self, Achievement, DerivedMetricsSummary, GrowthTrend};
use crate::core::Snapshot;
use crate::core::config::AppConfig;
use anyhow::Result;
use comfy_table::Cell;
use tracing::info;

pub fn run(config: &AppConfig, snapshot: &Snapshot) -> Result<()> {
    info!("Summarizing business metrics...");

    let records = snapshot.records();
    let summary = aggregator::summarize(records, snapshot.progress(), snapshot.modules());

    println!(
        "\n{}",
        ui::style_text(&super::business_title(config), ui::StyleType::Title)
    );
    println!("{}", growth_message(aggregator::growth_trend(records)));
    display_summary(&summary, &config.currency);

    if let Some(monthly) = aggregator::compound_monthly_growth_percent(records) {
        println!(
            "{} {}",
            ui::style_text("Compound monthly growth:", ui::StyleType::TotalLabel),
            ui::style_text(&format!("{monthly:+.2}%"), ui::StyleType::TotalValue)
        );
    }

    let achievements =
        aggregator::recent_achievements(snapshot.progress(), snapshot.modules(), records);
    if !achievements.is_empty() {
        println!(
            "\n{}",
            ui::style_text("Recent achievements", ui::StyleType::Title)
        );
        for achievement in &achievements {
            println!("  • {}", describe_achievement(achievement));
        }
    }

    Ok(())
}

fn growth_message(trend: GrowthTrend) -> String {
    match trend {
        GrowthTrend::NoData => "Start by recording your business metrics!".to_string(),
        GrowthTrend::Growing(p) => format!("Your business has grown {p}% since you started"),
        GrowthTrend::Flat => "Stay focused, growth comes with consistency".to_string(),
        GrowthTrend::Declining(_) => "Review your strategies to boost growth".to_string(),
    }
}

fn describe_achievement(achievement: &Achievement) -> String {
    match achievement {
        Achievement::ModuleCompleted {
            title,
            completed_on,
            points,
        } => {
            let when = completed_on
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "Recently".to_string());
            format!("{title} module completed ({when}, +{points} pts)")
        }
        Achievement::ConsistentReporting { periods } => {
            format!("{periods} periods recorded. Great consistency!")
        }
    }
}

fn display_summary(summary: &DerivedMetricsSummary, currency: &str) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Metric"), ui::header_cell("Value")]);

    table.add_row(vec![
        Cell::new("Total growth"),
        ui::change_cell(summary.total_growth_percent as f64),
    ]);
    table.add_row(vec![
        Cell::new("Latest revenue"),
        ui::value_cell(ui::format_currency(summary.latest_revenue, currency)),
    ]);
    table.add_row(vec![
        Cell::new("Total customers"),
        ui::value_cell(summary.total_customers.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Modules completed"),
        ui::value_cell(summary.completed_module_count.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Learning progress"),
        ui::value_cell(format!("{}%", summary.learning_progress_percent)),
    ]);
    table.add_row(vec![
        Cell::new("Active social networks"),
        ui::value_cell(summary.latest_social_networks.to_string()),
    ]);

    println!("{table}");
}
