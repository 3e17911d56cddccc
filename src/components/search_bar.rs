use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::Component;
use crate::action::Action;
use crate::presentation::Palette;
use crate::state::Focus;

const PLACEHOLDER: &str = "Enter a location";
const BUTTON_WIDTH: u16 = 12;

/// Location input plus a Search button.
///
/// Enter in the input and Enter/Space on the button both emit
/// `SearchSubmit` with the current text, so the two paths cannot drift.
pub struct SearchBar {
    input: TextInput,
}

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub focus: Focus,
    pub is_focused: bool,
    pub palette: Palette,
    pub is_loading: bool,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
        }
    }
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        // Keys that mean the same thing wherever focus is
        match key.code {
            KeyCode::Enter => return vec![Action::SearchSubmit(props.query.to_string())],
            KeyCode::Tab | KeyCode::BackTab => return vec![Action::UiFocusNext],
            KeyCode::F(2) => return vec![Action::UiToggleTheme],
            KeyCode::F(3) => return vec![Action::UiToggleUnits],
            KeyCode::Esc => return vec![Action::Quit],
            _ => {}
        }

        match props.focus {
            Focus::SearchButton => match key.code {
                KeyCode::Char(' ') => vec![Action::SearchSubmit(props.query.to_string())],
                KeyCode::Char('t') => vec![Action::UiToggleTheme],
                KeyCode::Char('u') => vec![Action::UiToggleUnits],
                KeyCode::Char('q') => vec![Action::Quit],
                _ => Vec::new(),
            },
            Focus::Input => {
                let input_props = TextInputProps {
                    value: props.query,
                    placeholder: PLACEHOLDER,
                    is_focused: true,
                    style: TextInputStyle {
                        base: BaseStyle {
                            border: None,
                            padding: Padding::xy(1, 0),
                            bg: None,
                            fg: None,
                        },
                        placeholder_style: None,
                        cursor_style: None,
                    },
                    on_change: Action::QueryChange,
                    on_submit: Action::SearchSubmit,
                    on_cursor_move: Some(|_| Action::Render),
                };
                self.input
                    .handle_event(event, input_props)
                    .into_iter()
                    .collect()
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks =
            Layout::horizontal([Constraint::Min(10), Constraint::Length(BUTTON_WIDTH)]).split(area);

        let input_focused = props.is_focused && props.focus == Focus::Input;
        let border = if input_focused {
            props.palette.accent
        } else {
            props.palette.muted
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(props.palette.surface).fg(props.palette.text));
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);
        let input_props = TextInputProps {
            value: props.query,
            placeholder: PLACEHOLDER,
            is_focused: input_focused,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::xy(1, 0),
                    bg: Some(props.palette.surface),
                    fg: Some(props.palette.text),
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: Action::QueryChange,
            on_submit: Action::SearchSubmit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, inner, input_props);

        let button_focused = props.is_focused && props.focus == Focus::SearchButton;
        let mut button_style = Style::default()
            .bg(props.palette.accent)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        if button_focused {
            button_style = button_style.add_modifier(Modifier::REVERSED);
        }
        let label = if props.is_loading { "..." } else { "Search" };
        let button = Paragraph::new(Line::from(label).centered())
            .block(Block::default().borders(Borders::ALL))
            .style(button_style);
        frame.render_widget(button, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::palette;
    use crate::state::Theme;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn props(query: &str, focus: Focus) -> SearchBarProps<'_> {
        SearchBarProps {
            query,
            focus,
            is_focused: true,
            palette: palette(Theme::Light),
            is_loading: false,
        }
    }

    fn press(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_enter_in_input_matches_button() {
        let mut bar = SearchBar::new();

        let from_input: Vec<_> = bar
            .handle_event(&press(KeyCode::Enter), props("Paris", Focus::Input))
            .into_iter()
            .collect();
        let from_button: Vec<_> = bar
            .handle_event(&press(KeyCode::Enter), props("Paris", Focus::SearchButton))
            .into_iter()
            .collect();
        let from_space: Vec<_> = bar
            .handle_event(&press(KeyCode::Char(' ')), props("Paris", Focus::SearchButton))
            .into_iter()
            .collect();

        from_input.assert_first(Action::SearchSubmit("Paris".into()));
        assert_eq!(from_input, from_button);
        assert_eq!(from_input, from_space);
    }

    #[test]
    fn test_button_shortcuts() {
        let mut bar = SearchBar::new();

        let actions: Vec<_> = bar
            .handle_event(&press(KeyCode::Char('t')), props("", Focus::SearchButton))
            .into_iter()
            .collect();
        actions.assert_first(Action::UiToggleTheme);

        let actions: Vec<_> = bar
            .handle_event(&press(KeyCode::Tab), props("", Focus::Input))
            .into_iter()
            .collect();
        actions.assert_first(Action::UiFocusNext);

        let actions: Vec<_> = bar
            .handle_event(&press(KeyCode::F(2)), props("", Focus::Input))
            .into_iter()
            .collect();
        actions.assert_first(Action::UiToggleTheme);
    }

    #[test]
    fn test_unfocused_ignores() {
        let mut bar = SearchBar::new();
        let mut p = props("Paris", Focus::Input);
        p.is_focused = false;

        let actions: Vec<_> = bar
            .handle_event(&press(KeyCode::Enter), p)
            .into_iter()
            .collect();
        actions.assert_empty();
    }
}
