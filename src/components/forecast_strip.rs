use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tui_dispatch::DataResource;

use super::Component;
use crate::action::Action;
use crate::presentation::{Palette, RainBand, forecast_icon, weekday_label};
use crate::state::{ForecastDay, Theme};

/// Row of mini cards, one per forecast day, tinted by chance of rain
pub struct ForecastStrip;

pub struct ForecastStripProps<'a> {
    pub forecast: &'a DataResource<Vec<ForecastDay>>,
    pub theme: Theme,
    pub palette: Palette,
}

/// Rows a card needs: border + 6 content lines + border.
pub const CARD_HEIGHT: u16 = 8;

impl Component<Action> for ForecastStrip {
    type Props<'a> = ForecastStripProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let days = match props.forecast {
            DataResource::Loaded(days) if !days.is_empty() => days,
            DataResource::Loading => {
                let line = Line::from(Span::styled(
                    "Loading forecast...",
                    Style::default().fg(props.palette.muted),
                ))
                .centered();
                frame.render_widget(Paragraph::new(line), area);
                return;
            }
            _ => return,
        };

        let constraints = vec![Constraint::Fill(1); days.len()];
        let slots = Layout::horizontal(constraints).spacing(1).split(area);

        for (day, slot) in days.iter().zip(slots.iter()) {
            render_card(frame, *slot, day, props.theme);
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, day: &ForecastDay, theme: Theme) {
    let bg = RainBand::from_chance(day.chance_of_rain).color(theme);
    let fg = match theme {
        Theme::Light => Color::Black,
        Theme::Dark => Color::White,
    };
    let icon = forecast_icon(&day.condition);

    let lines = vec![
        Line::from(Span::styled(
            weekday_label(&day.date),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(icon),
        Line::from("Max Wind"),
        Line::from(format!("{:.1} mph", day.max_wind_mph)),
        Line::from(format!("{:.1} kph", day.max_wind_kph)),
        Line::from(format!("Chance Rain: {}%", day.chance_of_rain)),
    ];

    let card = Paragraph::new(lines)
        .centered()
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().bg(bg).fg(fg));
    frame.render_widget(card, area);
}
