//! End-to-end: JSON configuration to ranked results and CSV exports

use std::collections::HashSet;
use std::fs;

use approx::assert_abs_diff_eq;
use mortgage_scenarios::loan::parse_config;
use mortgage_scenarios::report::{self, RankBy, COMPARISON_FILE_NAME, SCHEDULE_FILE_NAME};
use mortgage_scenarios::{expand, simulate, ScenarioRunner};

const CONFIG: &str = r#"{
    "analysis_settings": { "window_start_month": 13, "window_end_month": 60 },
    "base_loan": { "principal": 425000, "start_rate": 4.3, "years": 30 },
    "rate_changes": [
        { "month": 25, "new_rate": [3.8, 4.5, 5.2] },
        { "month": 49, "new_rate": 4.0 },
        { "month": 61, "new_rate": [3.5, 6.0] }
    ],
    "overpayments": [ { "month": 12, "amount": 20000 } ]
}"#;

#[test]
fn test_branching_config_end_to_end() {
    let config = parse_config(CONFIG).expect("valid config");
    let scenarios = expand(&config);
    assert_eq!(scenarios.len(), 6);

    let names: HashSet<&str> = scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names.len(), 6);

    let results = ScenarioRunner::with_schedule().run(&config).expect("runs");
    assert_eq!(results.len(), 6);
    for (scenario, result) in scenarios.iter().zip(&results) {
        assert_eq!(scenario.name, result.name);
        assert!(result.is_complete());
        assert_eq!(result.payoff_month(), Some(360));

        let rows = result.schedule.as_ref().unwrap();
        let window_interest: f64 = rows[12..60].iter().map(|row| row.interest).sum();
        assert_abs_diff_eq!(result.window_interest, window_interest, epsilon = 0.5);
        assert_abs_diff_eq!(result.balance_at_window_end, rows[59].end_balance, epsilon = 0.006);
    }

    // Runner output matches simulating each expanded scenario directly
    for (scenario, result) in scenarios.into_iter().zip(&results) {
        assert_eq!(&simulate(scenario, true), result);
    }

    // Months 25-48 carry the first branch, 61 onward the second
    let ranked = report::rank(&results, RankBy::WindowInterest);
    assert!(ranked[0].name.contains("3.8% @ M25"));
    assert!(ranked[5].name.contains("5.2% @ M25"));

    let lifetime = report::cheapest(&results, RankBy::LifetimeInterest).unwrap();
    assert_eq!(lifetime.name, "Scenario -> 3.8% @ M25 -> 3.5% @ M61");

    let dir = std::env::temp_dir().join(format!("mortgage_scenarios_e2e_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    let summary = report::export_reports(&results, &dir).expect("exports");
    assert_eq!(summary.differing_period.map(|(first, _)| first), Some(25));

    let schedule = fs::read_to_string(dir.join(SCHEDULE_FILE_NAME)).unwrap();
    assert!(schedule.starts_with("Month,Rate (%),Start Balance,Monthly Payment"));
    assert!(dir.join(COMPARISON_FILE_NAME).exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_invalid_config_is_rejected_before_simulation() {
    let err = parse_config(
        r#"{"base_loan": {"principal": 100000, "start_rate": 5, "years": 30},
            "rate_changes": [{"month": 13, "new_rate": []}]}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("alternatives list is empty"));
}
