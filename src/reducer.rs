//! Reducer - pure function: (state, action) -> DispatchResult
//!
//! This is the request orchestrator. A search fans out into three lookup
//! effects tagged with a fresh generation; each result is folded back into
//! its own resource, subject to the configured [`FailurePolicy`].

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{
    AppState, FailurePolicy, LOADING_ANIM_CYCLE_TICKS, Lookup, LookupFailure, SearchError,
};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Search actions =====
        Action::QueryChange(query) => {
            if state.query == query {
                return DispatchResult::unchanged();
            }
            state.query = query;
            DispatchResult::changed()
        }

        Action::SearchSubmit(query) => {
            // Whitespace-only text is never sent; padded text goes out as typed.
            if query.trim().is_empty() {
                return DispatchResult::unchanged();
            }

            state.query = query.clone();
            state.generation = state.generation.wrapping_add(1);
            state.collapsed_generation = None;
            state.error = None;
            state.conditions = DataResource::Loading;
            state.alerts = DataResource::Loading;
            state.forecast = DataResource::Loading;
            state.tick_count = 0;
            state.loading_anim_ticks_remaining = 0;

            let generation = state.generation;
            DispatchResult::changed_with_many(vec![
                Effect::FetchConditions {
                    generation,
                    query: query.clone(),
                },
                Effect::FetchAlerts {
                    generation,
                    query: query.clone(),
                },
                Effect::FetchForecast {
                    generation,
                    query,
                    days: state.forecast_days,
                },
            ])
        }

        // ===== Lookup results =====
        Action::ConditionsDidLoad {
            generation,
            conditions,
        } => {
            if !state.accepts(generation) {
                return stale(Lookup::Conditions, generation);
            }
            state.conditions = DataResource::Loaded(conditions);
            settle(state);
            DispatchResult::changed()
        }

        Action::AlertsDidLoad { generation, alerts } => {
            if !state.accepts(generation) {
                return stale(Lookup::Alerts, generation);
            }
            state.alerts = DataResource::Loaded(alerts);
            settle(state);
            DispatchResult::changed()
        }

        Action::ForecastDidLoad { generation, days } => {
            if !state.accepts(generation) {
                return stale(Lookup::Forecast, generation);
            }
            state.forecast = DataResource::Loaded(days);
            settle(state);
            DispatchResult::changed()
        }

        Action::ConditionsDidError {
            generation,
            failure,
        } => lookup_failed(state, Lookup::Conditions, generation, failure),

        Action::AlertsDidError {
            generation,
            failure,
        } => lookup_failed(state, Lookup::Alerts, generation, failure),

        Action::ForecastDidError {
            generation,
            failure,
        } => lookup_failed(state, Lookup::Forecast, generation, failure),

        // ===== UI actions =====
        Action::UiFocusNext => {
            state.focus = state.focus.next();
            DispatchResult::changed()
        }

        Action::UiToggleTheme => {
            state.theme = state.theme.toggle();
            DispatchResult::changed()
        }

        Action::UiToggleUnits => {
            state.unit = state.unit.toggle();
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            let animating = state.loading_anim_active();
            if animating {
                state.tick_count = state.tick_count.wrapping_add(1);
                if state.loading_anim_ticks_remaining > 0 {
                    state.loading_anim_ticks_remaining -= 1;
                }
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn lookup_failed(
    state: &mut AppState,
    lookup: Lookup,
    generation: u64,
    failure: LookupFailure,
) -> DispatchResult<Effect> {
    if !state.accepts(generation) {
        return stale(lookup, generation);
    }

    if failure.is_transport() && state.policy == FailurePolicy::AllOrNothing {
        // Drop everything this search produced, including lookups that already landed.
        state.conditions = DataResource::Empty;
        state.alerts = DataResource::Empty;
        state.forecast = DataResource::Empty;
        state.collapsed_generation = Some(generation);
        state.error = Some(SearchError::aggregate());
    } else {
        let message = failure.message().to_string();
        match lookup {
            Lookup::Conditions => state.conditions = DataResource::Failed(message),
            Lookup::Alerts => state.alerts = DataResource::Failed(message),
            Lookup::Forecast => state.forecast = DataResource::Failed(message),
        }
        raise_error(state, SearchError::for_lookup(lookup, &failure));
    }

    settle(state);
    DispatchResult::changed()
}

/// Replace the banner only with a strictly higher-precedence error.
fn raise_error(state: &mut AppState, error: SearchError) {
    let replace = state
        .error
        .as_ref()
        .map_or(true, |current| error.kind > current.kind);
    if replace {
        state.error = Some(error);
    }
}

fn stale(lookup: Lookup, generation: u64) -> DispatchResult<Effect> {
    tracing::debug!(lookup = lookup.label(), generation, "discarding stale lookup result");
    DispatchResult::unchanged()
}

/// Once the last lookup settles, let the header animation run out its cycle.
fn settle(state: &mut AppState) {
    if !state.is_loading() {
        state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
    }
}

fn ticks_to_phase_zero(tick_count: u32) -> u32 {
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    if tick_count == 0 {
        return cycle;
    }
    let remainder = tick_count % cycle;
    if remainder == 0 { 0 } else { cycle - remainder }
}
