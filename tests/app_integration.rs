use std::fs;
use tempfile::NamedTempFile;
use tracing::info;

use bizmentor::AppCommand;
use bizmentor::core::challenges::challenge_board;
use bizmentor::core::config::AppConfig;
use bizmentor::core::eligibility::analyze_eligibility;
use bizmentor::core::mentor;
use bizmentor::core::offers::generate_offers;
use bizmentor::core::{OfferKind, Rank, aggregator};

const GROWING_BAKERY: &str = r#"
currency: "MXN"
profile:
  user_id: "u-1"
  display_name: "Ana"
  business_name: "Panaderia Sol"
  business_type: "bakery"
metrics:
  - period: "2024-06"
    revenue: 26000
    customers_count: 70
    social_networks_active: 3
  - period: "2024-01"
    revenue: 15000
    customers_count: 40
    social_networks_active: 1
  - period: "2024-02"
    revenue: 17000
    customers_count: 45
  - period: "2024-03"
    revenue: 19000
    customers_count: 52
  - period: "2024-04"
    revenue: 21000
    customers_count: 58
  - period: "2024-05"
    revenue: 23000
    customers_count: 64
modules:
  - id: "m1"
    title: "WhatsApp Business"
    category: "digital"
    order_index: 1
  - id: "m2"
    title: "Pricing"
    category: "finance"
    order_index: 2
progress:
  - module_id: "m1"
    status: completed
    completion_date: "2024-03-01"
    pre_quiz_score: 4
    post_quiz_score: 9
  - module_id: "m2"
    status: in_progress
"#;

fn write_config(content: &str) -> NamedTempFile {
    let config_file = NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), content).expect("Failed to write config file");
    config_file
}

fn run(command: AppCommand, config_file: &NamedTempFile) -> anyhow::Result<()> {
    bizmentor::run_command(command, Some(config_file.path().to_str().unwrap()))
}

#[test_log::test]
fn test_full_analysis_from_config() {
    let config_file = write_config(GROWING_BAKERY);
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let snapshot = config.snapshot().unwrap();

    let summary = aggregator::summarize(snapshot.records(), snapshot.progress(), snapshot.modules());
    info!(?summary, "Derived summary");
    // Records are reordered by period, so growth runs January to June.
    assert_eq!(summary.total_growth_percent, 73);
    assert_eq!(summary.latest_revenue, 26000.0);
    assert_eq!(summary.total_customers, 329);
    assert_eq!(summary.learning_progress_percent, 50);
    assert_eq!(summary.latest_social_networks, 3);

    let analysis = analyze_eligibility(snapshot.records(), &config.policy).unwrap();
    info!(?analysis, "Eligibility analysis");
    assert_eq!(analysis.months_of_data, 6);
    assert!((analysis.average_revenue - 121000.0 / 6.0).abs() < 1e-6);
    // 20 + 10 (history) + 25 (revenue) + 20 + 10 (growth) + 15 (margin) + 10 (customers)
    assert_eq!(analysis.eligibility_score, 100);

    let offers = generate_offers(&analysis);
    let eligible: Vec<OfferKind> = offers.iter().filter(|o| o.eligible).map(|o| o.kind).collect();
    assert_eq!(
        eligible,
        vec![
            OfferKind::Equipment,
            OfferKind::WorkingCapital,
            OfferKind::Emergency
        ]
    );
}

#[test_log::test]
fn test_every_command_runs() {
    let config_file = write_config(GROWING_BAKERY);
    for command in [
        AppCommand::Summary,
        AppCommand::Progress,
        AppCommand::History,
        AppCommand::Credit,
        AppCommand::Challenges,
        AppCommand::Chat {
            message: "hola".to_string(),
            json: false,
        },
        AppCommand::Chat {
            message: r#"{"message": "precio", "user_id": "u-1"}"#.to_string(),
            json: true,
        },
    ] {
        let result = run(command, &config_file);
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }
}

#[test_log::test]
fn test_commands_handle_empty_history() {
    let config_file = write_config("profile: {}\n");
    for command in [
        AppCommand::Summary,
        AppCommand::Progress,
        AppCommand::History,
        AppCommand::Credit,
        AppCommand::Challenges,
    ] {
        let result = run(command, &config_file);
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }
}

#[test_log::test]
fn test_invalid_records_are_rejected_at_load() {
    let config_file = write_config(
        r#"
metrics:
  - period: "2024-01"
    revenue: 100
  - period: "2024-01"
    revenue: 200
"#,
    );
    let result = run(AppCommand::Summary, &config_file);
    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("Duplicate metric record"));
}

#[test_log::test]
fn test_missing_config_file_fails() {
    let result = bizmentor::run_command(AppCommand::Summary, Some("/nonexistent/config.yaml"));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Failed to read config file"));
}

#[test_log::test]
fn test_chat_request_round_trip() {
    let config_file = write_config(GROWING_BAKERY);
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let snapshot = config.snapshot().unwrap();

    let response = mentor::handle_request(
        r#"{"message": "¿Cómo voy con mi progreso?", "user_id": "u-1"}"#,
        &config.profile,
        &snapshot,
    );
    info!(?response, "Mentor response");
    assert_eq!(response.status, 200);
    let text = response.body["response"].as_str().unwrap();
    assert!(text.contains("1 of 2"));
    assert!(text.contains("(50%)"));
}

#[test_log::test]
fn test_challenge_board_from_config() {
    let config_file = write_config(GROWING_BAKERY);
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let snapshot = config.snapshot().unwrap();

    let board = challenge_board(&snapshot);
    info!(?board, "Challenge board");
    assert_eq!(board.stats.total_points, 100 + 6 * 50);
    assert_eq!(board.stats.current_streak, 6);
    assert_eq!(board.stats.challenges_completed, 7);
    // 50% learning progress sits on the exclusive bound of the next tier.
    assert_eq!(board.stats.rank, Rank::Intermediate);

    let unlocked: Vec<&str> = board.badges.iter().filter(|b| b.unlocked).map(|b| b.name).collect();
    assert_eq!(unlocked, vec!["First step", "First sale"]);
}

#[test_log::test]
fn test_bad_policy_is_rejected_at_load() {
    let config_file = write_config(
        r#"
policy:
  cost_ratio: -2
metrics:
  - period: "2024-01"
    revenue: 20000
    customers_count: 60
"#,
    );
    let result = run(AppCommand::Credit, &config_file);
    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("cost_ratio"));
}
