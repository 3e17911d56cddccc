//! Effects - side effects declared by the reducer
//!
//! Every lookup carries the search generation it belongs to, so its result
//! action can be matched against the latest search.

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Look up present-moment weather
    FetchConditions { generation: u64, query: String },
    /// Look up active alerts
    FetchAlerts { generation: u64, query: String },
    /// Look up a daily forecast of `days` days
    FetchForecast {
        generation: u64,
        query: String,
        days: u8,
    },
}

impl Effect {
    pub fn generation(&self) -> u64 {
        match self {
            Effect::FetchConditions { generation, .. }
            | Effect::FetchAlerts { generation, .. }
            | Effect::FetchForecast { generation, .. } => *generation,
        }
    }

    pub fn query(&self) -> &str {
        match self {
            Effect::FetchConditions { query, .. }
            | Effect::FetchAlerts { query, .. }
            | Effect::FetchForecast { query, .. } => query,
        }
    }
}
