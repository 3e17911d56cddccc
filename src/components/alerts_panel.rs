use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tui_dispatch::DataResource;

use super::Component;
use crate::action::Action;
use crate::presentation::Palette;
use crate::state::WeatherAlert;

pub struct AlertsPanel;

pub struct AlertsPanelProps<'a> {
    pub alerts: &'a DataResource<Vec<WeatherAlert>>,
    pub palette: Palette,
}

impl Component<Action> for AlertsPanel {
    type Props<'a> = AlertsPanelProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let palette = props.palette;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Weather Alerts ")
            .border_style(Style::default().fg(palette.muted))
            .style(Style::default().bg(palette.surface).fg(palette.text));

        let muted = |text: &str| {
            vec![Line::from(Span::styled(
                text.to_string(),
                Style::default().fg(palette.muted),
            ))]
        };

        let lines = match props.alerts {
            DataResource::Loaded(alerts) if alerts.is_empty() => {
                muted("No alerts for this location.")
            }
            DataResource::Loaded(alerts) => alert_lines(alerts, palette),
            DataResource::Loading => muted("Loading..."),
            DataResource::Failed(_) => muted("Alerts unavailable."),
            DataResource::Empty => Vec::new(),
        };

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
    }
}

fn alert_lines(alerts: &[WeatherAlert], palette: Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, alert) in alerts.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        let mut headline = vec![Span::styled(
            alert.headline.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if !alert.severity.is_empty() {
            headline.push(Span::styled(
                format!(" [{}]", alert.severity),
                Style::default().fg(palette.error),
            ));
        }
        lines.push(Line::from(headline));
        if !alert.message.is_empty() {
            lines.push(Line::from(alert.message.clone()));
        }
        lines.push(Line::from(Span::styled(
            format!("From: {} - To: {}", alert.effective, alert.expires),
            Style::default().fg(palette.muted),
        )));
    }
    lines
}
