use super::ui;
use crate::core::Snapshot;
use crate::core::challenges::{self, Badge, Challenge, UserStats};
use crate::core::config::AppConfig;
use anyhow::Result;
use comfy_table::Cell;
use tracing::info;

pub fn run(config: &AppConfig, snapshot: &Snapshot) -> Result<()> {
    info!("Building challenge board...");

    let board = challenges::challenge_board(snapshot);

    println!(
        "\n{}",
        ui::style_text(&super::business_title(config), ui::StyleType::Title)
    );
    display_stats(&board.stats);

    println!("\n{}", ui::style_text("Daily challenges", ui::StyleType::Title));
    display_challenges(&board.daily);
    println!("\n{}", ui::style_text("Weekly challenges", ui::StyleType::Title));
    display_challenges(&board.weekly);

    ui::print_separator();
    println!("\n{}", ui::style_text("Badges", ui::StyleType::Title));
    display_badges(&board.badges);
    Ok(())
}

fn display_stats(stats: &UserStats) {
    println!(
        "{} {}  {} {}  {} {}",
        ui::style_text("Points:", ui::StyleType::TotalLabel),
        ui::style_text(&stats.total_points.to_string(), ui::StyleType::TotalValue),
        ui::style_text("Streak:", ui::StyleType::TotalLabel),
        stats.current_streak,
        ui::style_text("Completed:", ui::StyleType::TotalLabel),
        stats.challenges_completed,
    );
    println!(
        "{} {}",
        ui::style_text("Rank:", ui::StyleType::TotalLabel),
        stats.rank
    );
}

fn display_challenges(list: &[Challenge]) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Challenge"),
        ui::header_cell("Category"),
        ui::header_cell("Difficulty"),
        ui::header_cell("Progress"),
        ui::header_cell("Points"),
        ui::header_cell("Done"),
    ]);

    for challenge in list {
        table.add_row(vec![
            Cell::new(challenge.title),
            Cell::new(challenge.category),
            Cell::new(challenge.difficulty.to_string()),
            ui::value_cell(format!("{}/{}", challenge.progress, challenge.total)),
            ui::value_cell(format!("+{}", challenge.points)),
            ui::flag_cell(challenge.completed),
        ]);
    }

    println!("{table}");
}

fn display_badges(badges: &[Badge]) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Badge"),
        ui::header_cell("How to earn it"),
        ui::header_cell("Unlocked"),
    ]);

    for badge in badges {
        table.add_row(vec![
            Cell::new(badge.name),
            Cell::new(badge.description),
            ui::flag_cell(badge.unlocked),
        ]);
    }

    println!("{table}");
}
