//! Pure lookups from weather data to look-and-feel
//!
//! Everything here is total: any input string or percentage maps to a
//! defined value, with a fallback for conditions nobody planned for.

use ratatui::style::Color;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::Theme;

/// Coarse condition family, derived from the provider's free-text condition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ConditionKind {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Stormy,
    Foggy,
    Other,
}

impl ConditionKind {
    /// Case-insensitive keyword match. First match wins, so
    /// "Patchy rain with thunder" is Rainy.
    pub fn classify(text: &str) -> Self {
        let text = text.to_lowercase();
        let has = |needle: &str| text.contains(needle);

        if has("sun") || has("clear") {
            ConditionKind::Sunny
        } else if has("cloud") {
            ConditionKind::Cloudy
        } else if has("rain") || has("drizzle") {
            ConditionKind::Rainy
        } else if has("snow") {
            ConditionKind::Snowy
        } else if has("thunder") {
            ConditionKind::Stormy
        } else if has("mist") || has("fog") {
            ConditionKind::Foggy
        } else {
            ConditionKind::Other
        }
    }
}

/// Plain RGB triple shared by ratatui styles and artbox gradients
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn hex(value: u32) -> Self {
        Rgb(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        )
    }

    pub fn color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }
}

/// Two-stop gradient behind the app. Dark variants are flat (start == end).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backdrop {
    pub start: Rgb,
    pub end: Rgb,
}

impl Backdrop {
    const fn gradient(start: u32, end: u32) -> Self {
        Self {
            start: Rgb::hex(start),
            end: Rgb::hex(end),
        }
    }

    const fn flat(color: u32) -> Self {
        Self::gradient(color, color)
    }
}

const DEFAULT_LIGHT: Backdrop = Backdrop::gradient(0x74ebd5, 0xacb6e5);
const DEFAULT_DARK: Backdrop = Backdrop::flat(0x1a1a1a);

/// Background for the current conditions; `None` means nothing searched yet.
pub fn backdrop(kind: Option<ConditionKind>, theme: Theme) -> Backdrop {
    let Some(kind) = kind else {
        return default_backdrop(theme);
    };
    match (kind, theme) {
        (ConditionKind::Sunny, Theme::Light) => Backdrop::gradient(0xfceabb, 0xf8b500),
        (ConditionKind::Sunny, Theme::Dark) => Backdrop::flat(0x333333),
        (ConditionKind::Cloudy, Theme::Light) => Backdrop::gradient(0xbdc3c7, 0x2c3e50),
        (ConditionKind::Cloudy, Theme::Dark) => Backdrop::flat(0x2c2c2c),
        (ConditionKind::Rainy, Theme::Light) => Backdrop::gradient(0x4e54c8, 0x8f94fb),
        (ConditionKind::Rainy, Theme::Dark) => Backdrop::flat(0x1a1a2e),
        (ConditionKind::Snowy, Theme::Light) => Backdrop::gradient(0x83a4d4, 0xb6fbff),
        (ConditionKind::Snowy, Theme::Dark) => Backdrop::flat(0x2e2e3e),
        (ConditionKind::Stormy, Theme::Light) => Backdrop::gradient(0x373b44, 0x4286f4),
        (ConditionKind::Stormy, Theme::Dark) => Backdrop::flat(0x1a1a1a),
        (ConditionKind::Foggy | ConditionKind::Other, theme) => default_backdrop(theme),
    }
}

fn default_backdrop(theme: Theme) -> Backdrop {
    match theme {
        Theme::Light => DEFAULT_LIGHT,
        Theme::Dark => DEFAULT_DARK,
    }
}

/// Foreground/surface colours per theme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub surface: Color,
    pub accent: Color,
    pub error: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            text: Color::Rgb(0x33, 0x33, 0x33),
            muted: Color::Rgb(0x55, 0x55, 0x55),
            surface: Color::Rgb(0xf0, 0xf4, 0xf8),
            accent: Color::Rgb(0x4a, 0x90, 0xe2),
            error: Color::Red,
        },
        Theme::Dark => Palette {
            text: Color::White,
            muted: Color::Rgb(0xaa, 0xaa, 0xaa),
            surface: Color::Rgb(0x33, 0x33, 0x33),
            accent: Color::Rgb(0x4a, 0x90, 0xe2),
            error: Color::Rgb(0xff, 0x6b, 0x6b),
        },
    }
}

/// One-line advice for the current conditions
pub fn advisory(kind: ConditionKind) -> &'static str {
    match kind {
        ConditionKind::Sunny => "Sunny! Time to show off those sunglasses \u{1f60e}",
        ConditionKind::Cloudy => "Cloudy skies. Maybe bring a light jacket \u{2601}\u{fe0f}",
        ConditionKind::Rainy => "Oh oh.. you should bring an umbrella \u{2614}",
        ConditionKind::Snowy => "Snowy day! Build a snowman or stay cozy \u{2744}\u{fe0f}",
        ConditionKind::Stormy => "Thunderstorm alert! Stay safe indoors \u{26a1}",
        ConditionKind::Foggy => "Foggy! Drive carefully \u{1f32b}\u{fe0f}",
        ConditionKind::Other => "Weather is a mystery today! Enjoy your day \u{1f308}",
    }
}

/// Icon shown on a forecast card.
///
/// Precipitation is checked before sky cover here, so "Cloudy with rain"
/// gets the rain icon even though [`ConditionKind::classify`] calls it Cloudy.
pub fn forecast_icon(condition: &str) -> &'static str {
    let text = condition.to_lowercase();
    let has = |needle: &str| text.contains(needle);

    if has("rain") || has("drizzle") {
        "\u{1f327}\u{fe0f}"
    } else if has("snow") {
        "\u{2744}\u{fe0f}"
    } else if has("sun") || has("clear") {
        "\u{2600}\u{fe0f}"
    } else if has("cloud") {
        "\u{2601}\u{fe0f}"
    } else if has("thunder") {
        "\u{26a1}"
    } else {
        "\u{1f308}"
    }
}

/// Rain-chance banding for forecast cards
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RainBand {
    /// 0..=30
    Low,
    /// 31..=70
    Medium,
    /// above 70
    High,
}

impl RainBand {
    pub fn from_chance(percent: u8) -> Self {
        match percent {
            0..=30 => RainBand::Low,
            31..=70 => RainBand::Medium,
            _ => RainBand::High,
        }
    }

    pub fn color(&self, theme: Theme) -> Color {
        let rgb = match (self, theme) {
            (RainBand::Low, Theme::Light) => Rgb::hex(0xd0f0c0),
            (RainBand::Medium, Theme::Light) => Rgb::hex(0xfff9c4),
            (RainBand::High, Theme::Light) => Rgb::hex(0xffcdd2),
            (RainBand::Low, Theme::Dark) => Rgb::hex(0x2e7d32),
            (RainBand::Medium, Theme::Dark) => Rgb::hex(0xf9a825),
            (RainBand::High, Theme::Dark) => Rgb::hex(0xc62828),
        };
        rgb.color()
    }
}

/// Short English weekday for a `YYYY-MM-DD` date; unparsable input is returned as is.
pub fn weekday_label(date: &str) -> String {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%a").to_string())
        .unwrap_or_else(|_| date.to_string())
}
