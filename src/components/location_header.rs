use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::cmp::Ordering;

use super::Component;
use crate::action::Action;
use crate::presentation::{Backdrop, Rgb};
use crate::state::LOADING_ANIM_CYCLE_TICKS;

/// Big gradient title: the place name once known, the app name before that.
pub struct LocationHeader;

pub struct LocationHeaderProps<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub backdrop: Backdrop,
    pub subtitle_color: Color,
    pub is_animating: bool,
    pub tick_count: u32,
}

/// Overhead inside the header area: 1 spacer + 1 subtitle line.
pub const HEADER_OVERHEAD: u16 = 2;

fn art_color(rgb: Rgb) -> ArtColor {
    ArtColor::rgb(rgb.0, rgb.1, rgb.2)
}

fn make_gradient(colors: (ArtColor, ArtColor), angle: f32, phase: f32) -> Fill {
    let phase = phase.rem_euclid(1.0);
    let mid = colors.0.interpolate(colors.1, 0.5);
    let edge = colors.0.interpolate(colors.1, 0.08);
    let base_stops = [
        (0.0, edge),
        (0.35, colors.0),
        (0.5, mid),
        (0.65, colors.1),
        (1.0, edge),
    ];

    let edge_color = sample_color(&base_stops, (1.0 - phase).rem_euclid(1.0));
    let mut shifted = Vec::with_capacity(base_stops.len() + 2);
    shifted.push((0.0, edge_color));
    shifted.push((1.0, edge_color));
    for (pos, color) in base_stops {
        shifted.push(((pos + phase) % 1.0, color));
    }
    shifted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    let stops = shifted
        .into_iter()
        .map(|(pos, color)| artbox::ColorStop::new(pos, color))
        .collect();

    Fill::Linear(LinearGradient::new(angle, stops))
}

fn animated_phase(tick_count: u32) -> f32 {
    let steps = LOADING_ANIM_CYCLE_TICKS.max(1);
    (tick_count % steps) as f32 / steps as f32
}

fn sample_color(stops: &[(f32, ArtColor)], position: f32) -> ArtColor {
    let pos = position.clamp(0.0, 1.0);
    let mut prev = stops[0];
    for stop in stops.iter() {
        if stop.0 >= pos {
            if (stop.0 - prev.0).abs() < f32::EPSILON {
                return stop.1;
            }
            let t = (pos - prev.0) / (stop.0 - prev.0);
            return prev.1.interpolate(stop.1, t);
        }
        prev = *stop;
    }
    prev.1
}

impl Component<Action> for LocationHeader {
    type Props<'a> = LocationHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet title, artbox picks the best font
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Subtitle
        ])
        .split(area);

        // Flat dark backdrops would render the title invisible; lift the far stop.
        let start = art_color(props.backdrop.start);
        let end = if props.backdrop.start == props.backdrop.end {
            start.interpolate(ArtColor::rgb(255, 255, 255), 0.6)
        } else {
            art_color(props.backdrop.end)
        };

        let phase = if props.is_animating {
            animated_phase(props.tick_count)
        } else {
            0.0
        };
        let fill = make_gradient((start, end), 5.0, phase);

        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(fill);

        frame.render_widget(ArtBox::new(&renderer, props.title), chunks[0]);

        let subtitle = Line::from(vec![Span::styled(
            props.subtitle.to_string(),
            Style::default().fg(props.subtitle_color),
        )])
        .centered();
        frame.render_widget(Paragraph::new(subtitle), chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animated_phase_wraps() {
        assert_eq!(animated_phase(0), 0.0);
        assert_eq!(animated_phase(LOADING_ANIM_CYCLE_TICKS), 0.0);
        assert!(animated_phase(LOADING_ANIM_CYCLE_TICKS / 2) > 0.0);
    }
}
