//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::presentation::ConditionKind;

/// Banner shown when the all-or-nothing policy collapses a search.
pub const AGGREGATE_ERROR: &str = "Failed to fetch weather, alerts, or forecast.";

/// Number of forecast days requested when nothing else is configured.
pub const DEFAULT_FORECAST_DAYS: u8 = 3;

/// Present-moment weather for the searched location
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurrentConditions {
    pub name: String,
    pub region: String,
    pub country: String,
    pub temp_c: f32,
    pub temp_f: f32,
    pub condition: String,
    pub icon: String,
    pub is_day: bool,
    pub local_time: String,
}

/// An active weather warning. Timestamps are kept as the provider sends them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherAlert {
    pub headline: String,
    pub message: String,
    pub severity: String,
    pub effective: String,
    pub expires: String,
}

/// One day of the short-range forecast
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastDay {
    /// `YYYY-MM-DD` as returned by the provider
    pub date: String,
    pub max_wind_mph: f32,
    pub max_wind_kph: f32,
    /// Percent, 0..=100
    pub chance_of_rain: u8,
    pub condition: String,
    pub max_temp_c: f32,
    pub min_temp_c: f32,
}

/// The three lookups fanned out per search
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Lookup {
    Conditions,
    Alerts,
    Forecast,
}

impl Lookup {
    pub fn label(&self) -> &'static str {
        match self {
            Lookup::Conditions => "current conditions",
            Lookup::Alerts => "alerts",
            Lookup::Forecast => "forecast",
        }
    }
}

/// Why a lookup produced no data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum LookupFailure {
    /// The provider answered with its own `error` object
    Provider { code: Option<u32>, message: String },
    /// The request never produced a usable payload
    Transport(String),
}

impl LookupFailure {
    pub fn message(&self) -> &str {
        match self {
            LookupFailure::Provider { message, .. } => message,
            LookupFailure::Transport(message) => message,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, LookupFailure::Transport(_))
    }
}

/// How a transport failure in one lookup affects the others
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Every lookup keeps its own outcome
    #[default]
    Independent,
    /// Any transport failure discards the whole search
    AllOrNothing,
}

/// Error banner category. Declaration order is precedence, lowest first.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum ErrorKind {
    /// Provider-reported error from the alerts or forecast lookup
    Provider,
    /// One lookup failed in transit
    Transport,
    /// Provider-reported error from the conditions lookup, shown verbatim
    ConditionsProvider,
    /// The all-or-nothing collapse
    Aggregate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchError {
    pub kind: ErrorKind,
    pub message: String,
}

impl SearchError {
    pub fn aggregate() -> Self {
        Self {
            kind: ErrorKind::Aggregate,
            message: AGGREGATE_ERROR.to_string(),
        }
    }

    /// Banner for a single failed lookup
    pub fn for_lookup(lookup: Lookup, failure: &LookupFailure) -> Self {
        match (lookup, failure) {
            (Lookup::Conditions, LookupFailure::Provider { message, .. }) => Self {
                kind: ErrorKind::ConditionsProvider,
                message: message.clone(),
            },
            (_, LookupFailure::Provider { message, .. }) => Self {
                kind: ErrorKind::Provider,
                message: format!("{}: {}", capitalize(lookup.label()), message),
            },
            (_, LookupFailure::Transport(_)) => Self {
                kind: ErrorKind::Transport,
                message: format!("Failed to fetch {}.", lookup.label()),
            },
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Light/dark theme, flipped by the user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label for the control that switches away from this theme
    pub fn switch_label(&self) -> &'static str {
        match self {
            Theme::Light => "dark mode",
            Theme::Dark => "light mode",
        }
    }
}

/// Temperature unit preference
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn toggle(&self) -> Self {
        match self {
            TempUnit::Celsius => TempUnit::Fahrenheit,
            TempUnit::Fahrenheit => TempUnit::Celsius,
        }
    }

    pub fn format(&self, celsius: f32) -> String {
        match self {
            TempUnit::Celsius => format!("{:.1}°C", celsius),
            TempUnit::Fahrenheit => format!("{:.1}°F", celsius * 9.0 / 5.0 + 32.0),
        }
    }
}

/// Which control of the search bar receives keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Focus {
    #[default]
    Input,
    SearchButton,
}

impl Focus {
    pub fn next(&self) -> Self {
        match self {
            Focus::Input => Focus::SearchButton,
            Focus::SearchButton => Focus::Input,
        }
    }
}

/// Animation timing for the header gradient seam.
pub const LOADING_ANIM_TICK_MS: u64 = 15;
pub const LOADING_ANIM_CYCLE_TICKS: u32 = 60;

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Location text as typed
    #[debug(section = "Search", label = "Query")]
    pub query: String,

    /// Id of the latest accepted search; results for older ids are dropped
    #[debug(section = "Search", label = "Generation")]
    pub generation: u64,

    /// Generation discarded by an all-or-nothing collapse
    #[debug(skip)]
    pub collapsed_generation: Option<u64>,

    #[debug(section = "Search", label = "Policy", debug_fmt)]
    pub policy: FailurePolicy,

    #[debug(section = "Search", label = "Forecast days")]
    pub forecast_days: u8,

    #[debug(section = "Results", label = "Conditions", debug_fmt)]
    pub conditions: DataResource<CurrentConditions>,

    #[debug(section = "Results", label = "Alerts", debug_fmt)]
    pub alerts: DataResource<Vec<WeatherAlert>>,

    #[debug(section = "Results", label = "Forecast", debug_fmt)]
    pub forecast: DataResource<Vec<ForecastDay>>,

    #[debug(section = "Results", label = "Error", debug_fmt)]
    pub error: Option<SearchError>,

    #[debug(section = "UI", label = "Theme", debug_fmt)]
    pub theme: Theme,

    #[debug(section = "UI", label = "Unit", debug_fmt)]
    pub unit: TempUnit,

    #[debug(skip)]
    pub focus: Focus,

    // --- Animation internals (skipped) ---
    /// Animation frame counter (for gradient seam)
    #[debug(skip)]
    pub tick_count: u32,

    /// Remaining ticks to finish the current animation cycle after loading
    #[debug(skip)]
    pub loading_anim_ticks_remaining: u32,
}

impl AppState {
    /// Create state with the given location text in the search bar
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            generation: 0,
            collapsed_generation: None,
            policy: FailurePolicy::default(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            conditions: DataResource::Empty,
            alerts: DataResource::Empty,
            forecast: DataResource::Empty,
            error: None,
            theme: Theme::default(),
            unit: TempUnit::default(),
            focus: Focus::default(),
            tick_count: 0,
            loading_anim_ticks_remaining: 0,
        }
    }

    /// True while any lookup of the current search is in flight
    pub fn is_loading(&self) -> bool {
        self.conditions.is_loading() || self.alerts.is_loading() || self.forecast.is_loading()
    }

    /// Whether a result tagged with `generation` may still touch state
    pub fn accepts(&self, generation: u64) -> bool {
        generation == self.generation && self.collapsed_generation != Some(generation)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    pub fn condition_kind(&self) -> Option<ConditionKind> {
        self.conditions
            .data()
            .map(|c| ConditionKind::classify(&c.condition))
    }

    pub fn loading_anim_active(&self) -> bool {
        self.is_loading() || self.loading_anim_ticks_remaining > 0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(String::new())
    }
}
