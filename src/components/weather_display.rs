use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::forecast_strip::CARD_HEIGHT;
use super::location_header::HEADER_OVERHEAD;
use super::{
    AlertsPanel, AlertsPanelProps, Component, ConditionsCard, ConditionsCardProps, ForecastStrip,
    ForecastStripProps, LocationHeader, LocationHeaderProps, SearchBar, SearchBarProps,
};
use crate::action::Action;
use crate::presentation::{backdrop, palette};
use crate::state::AppState;

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";
const APP_TITLE: &str = "Weather App";

/// Props for WeatherDisplay - read-only view of state
pub struct WeatherDisplayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The root screen: header, search bar, status line, results, help bar
#[derive(Default)]
pub struct WeatherDisplay {
    search: SearchBar,
}

impl WeatherDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for WeatherDisplay {
    type Props<'a> = WeatherDisplayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let state = props.state;
        let search_props = SearchBarProps {
            query: &state.query,
            focus: state.focus,
            is_focused: props.is_focused,
            palette: palette(state.theme),
            is_loading: state.is_loading(),
        };
        self.search
            .handle_event(event, search_props)
            .into_iter()
            .collect::<Vec<_>>()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: WeatherDisplayProps<'_>) {
        let state = props.state;
        let colors = palette(state.theme);
        let backdrop = backdrop(state.condition_kind(), state.theme);

        frame.render_widget(
            Block::default().style(Style::default().bg(backdrop.start.color()).fg(colors.text)),
            area,
        );

        let chunks = Layout::vertical([
            Constraint::Max(6 + HEADER_OVERHEAD), // Title
            Constraint::Length(3),                // Search bar
            Constraint::Length(1),                // Loading / error
            Constraint::Min(1),                   // Results
            Constraint::Length(1),                // Help bar
        ])
        .split(area);

        // Header
        let (title, subtitle) = match state.conditions.data() {
            Some(current) => (
                current.name.as_str(),
                if current.region.is_empty() {
                    current.country.clone()
                } else {
                    format!("{}, {}", current.region, current.country)
                },
            ),
            None => (APP_TITLE, String::from("Type a location and press Enter")),
        };
        let mut header = LocationHeader;
        header.render(
            frame,
            chunks[0],
            LocationHeaderProps {
                title,
                subtitle: &subtitle,
                backdrop,
                subtitle_color: colors.muted,
                is_animating: state.loading_anim_active(),
                tick_count: state.tick_count,
            },
        );

        // Search bar
        self.search.render(
            frame,
            chunks[1],
            SearchBarProps {
                query: &state.query,
                focus: state.focus,
                is_focused: props.is_focused,
                palette: colors,
                is_loading: state.is_loading(),
            },
        );

        // Status line
        let status = if state.is_loading() {
            Line::from(Span::styled("Loading...", Style::default().fg(colors.muted)))
        } else if let Some(message) = state.error_message() {
            Line::from(vec![
                Span::raw(ERROR_ICON),
                Span::raw(" "),
                Span::styled(message.to_string(), Style::default().fg(colors.error)),
            ])
        } else {
            Line::default()
        };
        frame.render_widget(Paragraph::new(status.centered()), chunks[2]);

        // Results: conditions + forecast on the left, alerts on the right
        let body = Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
            .spacing(1)
            .split(chunks[3]);
        let left = Layout::vertical([Constraint::Min(5), Constraint::Length(CARD_HEIGHT)])
            .split(body[0]);

        let mut card = ConditionsCard;
        card.render(
            frame,
            left[0],
            ConditionsCardProps {
                conditions: &state.conditions,
                unit: state.unit,
                palette: colors,
            },
        );

        let mut strip = ForecastStrip;
        strip.render(
            frame,
            left[1],
            ForecastStripProps {
                forecast: &state.forecast,
                theme: state.theme,
                palette: colors,
            },
        );

        // The alerts panel belongs to a located search; before that it stays hidden.
        if state.conditions.is_loaded() || state.alerts.is_loaded() {
            let mut alerts = AlertsPanel;
            alerts.render(
                frame,
                body[1],
                AlertsPanelProps {
                    alerts: &state.alerts,
                    palette: colors,
                },
            );
        }

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[4],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("enter", "search"),
                    StatusBarHint::new("tab", "focus"),
                    StatusBarHint::new("F2", state.theme.switch_label()),
                    StatusBarHint::new("F3", "units"),
                    StatusBarHint::new("esc", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
