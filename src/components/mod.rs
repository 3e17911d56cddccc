pub mod alerts_panel;
pub mod conditions_card;
pub mod forecast_strip;
pub mod location_header;
pub mod search_bar;
pub mod weather_display;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use alerts_panel::{AlertsPanel, AlertsPanelProps};
pub use conditions_card::{ConditionsCard, ConditionsCardProps};
pub use forecast_strip::{ForecastStrip, ForecastStripProps};
pub use location_header::{LocationHeader, LocationHeaderProps};
pub use search_bar::{SearchBar, SearchBarProps};
pub use weather_display::{ERROR_ICON, WeatherDisplay, WeatherDisplayProps};
