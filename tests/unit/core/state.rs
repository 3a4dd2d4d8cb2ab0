//! Unit tests for run state

use chrono::NaiveDate;
use zerozoro::core::RunState;
use zerozoro::models::signal::CrossingState;

#[test]
fn test_new_state_is_unset() {
    let state = RunState::new();
    assert_eq!(state.crossings.early_warning, CrossingState::Unset);
    assert_eq!(state.crossings.intraday_confirmation, CrossingState::Unset);
    assert_eq!(state.crossings.daily_confirmation, CrossingState::Unset);
    assert!(state.seen_news_ids.is_empty());
    assert!(state.last_daily_update.is_none());
}

#[test]
fn test_daily_update_due_once_per_date() {
    let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let tomorrow = today.succ_opt().unwrap();
    let mut state = RunState::new();

    assert!(state.daily_update_due(today));
    state.last_daily_update = Some(today);
    assert!(!state.daily_update_due(today));
    assert!(state.daily_update_due(tomorrow));
}
