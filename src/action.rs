//! Actions: user intents and lookup results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{CurrentConditions, ForecastDay, LookupFailure, WeatherAlert};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Search category =====
    /// Location text changed (every keystroke)
    QueryChange(String),

    /// Run a search for the given location text (Enter or the Search button)
    SearchSubmit(String),

    // ===== Lookup results =====
    ConditionsDidLoad {
        generation: u64,
        conditions: CurrentConditions,
    },
    ConditionsDidError {
        generation: u64,
        failure: LookupFailure,
    },

    AlertsDidLoad {
        generation: u64,
        alerts: Vec<WeatherAlert>,
    },
    AlertsDidError {
        generation: u64,
        failure: LookupFailure,
    },

    ForecastDidLoad {
        generation: u64,
        days: Vec<ForecastDay>,
    },
    ForecastDidError {
        generation: u64,
        failure: LookupFailure,
    },

    // ===== UI category =====
    /// Move focus between the location input and the Search button
    UiFocusNext,

    /// Flip light/dark theme
    UiToggleTheme,

    /// Toggle between Celsius and Fahrenheit
    UiToggleUnits,

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for loading animation
    Tick,

    /// Exit the application
    Quit,
}
