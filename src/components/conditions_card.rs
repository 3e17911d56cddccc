use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tui_dispatch::DataResource;

use super::Component;
use crate::action::Action;
use crate::presentation::{ConditionKind, Palette, advisory};
use crate::state::{CurrentConditions, TempUnit};

/// Current conditions: place, temperature, condition text and the day's advice
pub struct ConditionsCard;

pub struct ConditionsCardProps<'a> {
    pub conditions: &'a DataResource<CurrentConditions>,
    pub unit: TempUnit,
    pub palette: Palette,
}

impl Component<Action> for ConditionsCard {
    type Props<'a> = ConditionsCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let palette = props.palette;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Now ")
            .border_style(Style::default().fg(palette.muted))
            .style(Style::default().bg(palette.surface).fg(palette.text));

        let lines = match props.conditions {
            DataResource::Loaded(current) => ready_lines(current, props.unit, palette),
            DataResource::Loading => vec![muted("Loading...", palette)],
            // Failures surface in the banner; the card just goes blank.
            DataResource::Failed(_) | DataResource::Empty => {
                vec![muted("Search for a location to see its weather.", palette)]
            }
        };

        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .centered()
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

fn ready_lines(current: &CurrentConditions, unit: TempUnit, palette: Palette) -> Vec<Line<'static>> {
    let place = if current.country.is_empty() {
        current.name.clone()
    } else {
        format!("{}, {}", current.name, current.country)
    };
    let kind = ConditionKind::classify(&current.condition);

    let mut lines = vec![
        Line::from(Span::styled(place, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(format!(
            "{} - {}",
            unit.format(current.temp_c),
            current.condition
        )),
        Line::from(Span::styled(
            advisory(kind),
            Style::default().fg(palette.muted).italic(),
        )),
    ];
    if !current.local_time.is_empty() {
        lines.push(Line::default());
        lines.push(muted(&format!("Local time {}", current.local_time), palette));
    }
    lines
}

fn muted(text: &str, palette: Palette) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().fg(palette.muted)))
}
