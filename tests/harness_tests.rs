//! Search orchestration tests using EffectStoreTestHarness
//!
//! Each test drives a search through the reducer, then feeds lookup results
//! back in as the effect handler would.

use pretty_assertions::assert_eq;
use tui_dispatch::testing::*;
use tui_dispatch::{DataResource, NumericComponentId};
use skywatch::{
    action::Action,
    components::{Component, WeatherDisplay, WeatherDisplayProps},
    effect::Effect,
    reducer::reducer,
    state::{
        AGGREGATE_ERROR, AppState, CurrentConditions, FailurePolicy, ForecastDay, LookupFailure,
        WeatherAlert,
    },
};

fn mock_conditions() -> CurrentConditions {
    CurrentConditions {
        name: "Lisbon".into(),
        region: "Lisboa".into(),
        country: "Portugal".into(),
        temp_c: 24.0,
        temp_f: 75.2,
        condition: "Sunny".into(),
        is_day: true,
        local_time: "2024-06-01 14:00".into(),
        ..Default::default()
    }
}

fn mock_days() -> Vec<ForecastDay> {
    ["2024-06-01", "2024-06-02", "2024-06-03"]
        .into_iter()
        .map(|date| ForecastDay {
            date: date.into(),
            max_wind_mph: 10.5,
            max_wind_kph: 16.9,
            chance_of_rain: 10,
            condition: "Sunny".into(),
            max_temp_c: 26.0,
            min_temp_c: 17.0,
        })
        .collect()
}

fn provider(message: &str) -> LookupFailure {
    LookupFailure::Provider {
        code: Some(1006),
        message: message.into(),
    }
}

fn transport() -> LookupFailure {
    LookupFailure::Transport("error sending request".into())
}

/// Generation the fanned-out lookups were tagged with
fn generation_of(effects: Vec<Effect>) -> u64 {
    effects.effects_count(3);
    effects[0].generation()
}

// ============================================================================
// Fan-out
// ============================================================================

#[test]
fn test_submit_fans_out_three_lookups() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::SearchSubmit("Lisbon".into()));
    harness.assert_state(|s| s.is_loading());
    harness.assert_state(|s| s.error.is_none());

    let effects = harness.drain_effects();
    effects.effects_count(3);
    effects.effects_all_match(|e| e.query() == "Lisbon" && e.generation() == 1);
    effects.effects_first_matches(|e| matches!(e, Effect::FetchConditions { .. }));
}

#[test]
fn test_forecast_days_come_from_state() {
    let state = AppState {
        forecast_days: 7,
        ..Default::default()
    };
    let mut harness = EffectStoreTestHarness::new(state, reducer);

    harness.dispatch_collect(Action::SearchSubmit("Lisbon".into()));
    let effects = harness.drain_effects();
    assert!(
        effects
            .iter()
            .any(|e| matches!(e, Effect::FetchForecast { days: 7, .. }))
    );
}

#[test]
fn test_query_is_sent_untrimmed() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::SearchSubmit(" 90210 ".into()));
    let effects = harness.drain_effects();
    effects.effects_all_match(|e| e.query() == " 90210 ");
}

#[test]
fn test_new_search_clears_previous_error() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::SearchSubmit("Nowhere".into()));
    let generation = generation_of(harness.drain_effects());
    harness.complete_action(Action::ConditionsDidError {
        generation,
        failure: provider("No matching location found."),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.error.is_some());

    harness.dispatch_collect(Action::SearchSubmit("Lisbon".into()));
    harness.assert_state(|s| s.error.is_none());
    harness.assert_state(|s| s.conditions.is_loading());
}

// ============================================================================
// Completion
// ============================================================================

#[test]
fn test_full_success_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::SearchSubmit("Lisbon".into()));
    let generation = generation_of(harness.drain_effects());

    harness.complete_action(Action::ForecastDidLoad {
        generation,
        days: mock_days(),
    });
    harness.complete_action(Action::ConditionsDidLoad {
        generation,
        conditions: mock_conditions(),
    });
    harness.complete_action(Action::AlertsDidLoad {
        generation,
        alerts: Vec::new(),
    });
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 3);
    assert_eq!(changed, 3);
    harness.assert_state(|s| !s.is_loading());
    harness.assert_state(|s| s.error.is_none());
    harness.assert_state(|s| s.forecast.data().map(Vec::len) == Some(3));
    harness.assert_state(|s| s.alerts.data().is_some_and(|a| a.is_empty()));
}

#[test]
fn test_loading_ends_only_after_last_lookup() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::SearchSubmit("Lisbon".into()));
    let generation = generation_of(harness.drain_effects());

    harness.complete_action(Action::ConditionsDidLoad {
        generation,
        conditions: mock_conditions(),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.is_loading());

    harness.complete_action(Action::AlertsDidError {
        generation,
        failure: transport(),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.is_loading());

    harness.complete_action(Action::ForecastDidLoad {
        generation,
        days: mock_days(),
    });
    harness.process_emitted();
    harness.assert_state(|s| !s.is_loading());
    harness.assert_state(|s| s.loading_anim_ticks_remaining > 0);
}

#[test]
fn test_stale_results_are_discarded() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::SearchSubmit("Paris".into()));
    let first = generation_of(harness.drain_effects());
    harness.dispatch_collect(Action::SearchSubmit("Lisbon".into()));
    let second = generation_of(harness.drain_effects());
    assert!(second > first);

    harness.complete_action(Action::ConditionsDidLoad {
        generation: first,
        conditions: CurrentConditions {
            name: "Paris".into(),
            ..Default::default()
        },
    });
    harness.complete_action(Action::AlertsDidError {
        generation: first,
        failure: transport(),
    });
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 2);
    assert_eq!(changed, 0);
    harness.assert_state(|s| s.conditions.is_loading());
    harness.assert_state(|s| s.error.is_none());
}

// ============================================================================
// Error precedence
// ============================================================================

#[test]
fn test_conditions_provider_message_shown_verbatim() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::SearchSubmit("Atlantis".into()));
    let generation = generation_of(harness.drain_effects());

    harness.complete_action(Action::ConditionsDidError {
        generation,
        failure: provider("No matching location found."),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.error_message() == Some("No matching location found."));
    harness.assert_state(|s| s.conditions.is_failed());
}

#[test]
fn test_conditions_provider_error_outranks_transport() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::SearchSubmit("Atlantis".into()));
    let generation = generation_of(harness.drain_effects());

    harness.complete_action(Action::AlertsDidError {
        generation,
        failure: transport(),
    });
    harness.complete_action(Action::ConditionsDidError {
        generation,
        failure: provider("No matching location found."),
    });
    harness.complete_action(Action::ForecastDidError {
        generation,
        failure: transport(),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.error_message() == Some("No matching location found."));
}

#[test]
fn test_first_error_of_equal_rank_wins() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::SearchSubmit("Lisbon".into()));
    let generation = generation_of(harness.drain_effects());

    harness.complete_action(Action::ForecastDidError {
        generation,
        failure: transport(),
    });
    harness.complete_action(Action::AlertsDidError {
        generation,
        failure: transport(),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.error_message() == Some("Failed to fetch forecast."));
}

#[test]
fn test_alerts_provider_error_is_labelled() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::SearchSubmit("Lisbon".into()));
    let generation = generation_of(harness.drain_effects());

    harness.complete_action(Action::AlertsDidError {
        generation,
        failure: provider("API key has exceeded calls per month quota."),
    });
    harness.process_emitted();

    harness.assert_state(|s| {
        s.error_message() == Some("Alerts: API key has exceeded calls per month quota.")
    });
}

// ============================================================================
// All-or-nothing policy
// ============================================================================

#[test]
fn test_all_or_nothing_collapses_on_transport_failure() {
    let state = AppState {
        policy: FailurePolicy::AllOrNothing,
        ..Default::default()
    };
    let mut harness = EffectStoreTestHarness::new(state, reducer);
    harness.dispatch_collect(Action::SearchSubmit("Lisbon".into()));
    let generation = generation_of(harness.drain_effects());

    harness.complete_action(Action::ConditionsDidLoad {
        generation,
        conditions: mock_conditions(),
    });
    harness.complete_action(Action::ForecastDidError {
        generation,
        failure: transport(),
    });
    // Arrives after the collapse and must not resurrect anything
    harness.complete_action(Action::AlertsDidLoad {
        generation,
        alerts: vec![WeatherAlert {
            headline: "Heat advisory".into(),
            ..Default::default()
        }],
    });
    harness.process_emitted();

    harness.assert_state(|s| s.error_message() == Some(AGGREGATE_ERROR));
    harness.assert_state(|s| s.conditions.is_empty());
    harness.assert_state(|s| s.alerts.is_empty());
    harness.assert_state(|s| s.forecast.is_empty());
    harness.assert_state(|s| !s.is_loading());
}

#[test]
fn test_all_or_nothing_keeps_provider_errors_local() {
    let state = AppState {
        policy: FailurePolicy::AllOrNothing,
        ..Default::default()
    };
    let mut harness = EffectStoreTestHarness::new(state, reducer);
    harness.dispatch_collect(Action::SearchSubmit("Lisbon".into()));
    let generation = generation_of(harness.drain_effects());

    harness.complete_action(Action::AlertsDidError {
        generation,
        failure: provider("Internal application error."),
    });
    harness.complete_action(Action::ConditionsDidLoad {
        generation,
        conditions: mock_conditions(),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.conditions.is_loaded());
    harness.assert_state(|s| s.alerts.is_failed());
    harness.assert_state(|s| s.error_message() == Some("Alerts: Internal application error."));
}

#[test]
fn test_resubmit_after_collapse_accepts_results() {
    let state = AppState {
        policy: FailurePolicy::AllOrNothing,
        ..Default::default()
    };
    let mut harness = EffectStoreTestHarness::new(state, reducer);
    harness.dispatch_collect(Action::SearchSubmit("Lisbon".into()));
    let generation = generation_of(harness.drain_effects());
    harness.complete_action(Action::ConditionsDidError {
        generation,
        failure: transport(),
    });
    harness.process_emitted();

    harness.dispatch_collect(Action::SearchSubmit("Lisbon".into()));
    let retry = generation_of(harness.drain_effects());
    harness.complete_action(Action::ConditionsDidLoad {
        generation: retry,
        conditions: mock_conditions(),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.conditions.is_loaded());
    harness.assert_state(|s| s.error.is_none());
}

// ============================================================================
// Component + Store Integration
// ============================================================================

#[test]
fn test_typing_then_enter_triggers_search() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    let mut component = WeatherDisplay::new();

    for ch in ["o", "s", "l", "o"] {
        let actions = harness.send_keys::<NumericComponentId, _, _>(ch, |state, event| {
            let props = WeatherDisplayProps {
                state,
                is_focused: true,
            };
            component
                .handle_event(&event.kind, props)
                .into_iter()
                .collect::<Vec<_>>()
        });
        for action in actions {
            harness.dispatch_collect(action);
        }
    }
    harness.assert_state(|s| s.query == "oslo");

    let actions = harness.send_keys::<NumericComponentId, _, _>("enter", |state, event| {
        let props = WeatherDisplayProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_first(Action::SearchSubmit("oslo".into()));

    for action in actions {
        harness.dispatch_collect(action);
    }
    harness.assert_state(|s| s.is_loading());
    let effects = harness.drain_effects();
    effects.effects_count(3);
}

#[test]
fn test_render_after_success() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    let mut component = WeatherDisplay::new();
    harness.dispatch_collect(Action::SearchSubmit("Lisbon".into()));
    let generation = generation_of(harness.drain_effects());

    harness.complete_action(Action::ConditionsDidLoad {
        generation,
        conditions: mock_conditions(),
    });
    harness.complete_action(Action::AlertsDidLoad {
        generation,
        alerts: Vec::new(),
    });
    harness.complete_action(Action::ForecastDidLoad {
        generation,
        days: mock_days(),
    });
    harness.process_emitted();

    let output = harness.render_plain(110, 40, |frame, area, state| {
        let props = WeatherDisplayProps {
            state,
            is_focused: true,
        };
        component.render(frame, area, props);
    });

    assert!(
        output.contains("Lisbon, Portugal"),
        "Place should be visible in output:\n{}",
        output
    );
    assert!(
        output.contains("No alerts for this location."),
        "Empty alerts message should be visible in output:\n{}",
        output
    );
    assert!(output.contains("Chance Rain: 10%"));
}

#[test]
fn test_render_unit_toggle_changes_display() {
    let state = AppState {
        conditions: DataResource::Loaded(mock_conditions()),
        ..Default::default()
    };
    let mut harness = EffectStoreTestHarness::new(state, reducer);
    let mut component = WeatherDisplay::new();

    let celsius_output = harness.render_plain(100, 36, |frame, area, state| {
        let props = WeatherDisplayProps {
            state,
            is_focused: true,
        };
        component.render(frame, area, props);
    });
    assert!(celsius_output.contains("24.0°C"));

    harness.dispatch_collect(Action::UiToggleUnits);

    let fahrenheit_output = harness.render_plain(100, 36, |frame, area, state| {
        let props = WeatherDisplayProps {
            state,
            is_focused: true,
        };
        component.render(frame, area, props);
    });
    assert!(fahrenheit_output.contains("75.2°F"));
}
