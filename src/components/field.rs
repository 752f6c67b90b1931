use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ihdathi::coords::{ConversionForm, Field};
use ratatui::{prelude::*, widgets::*};

use super::Component;
use crate::action::Action;
use crate::focus::FocusTarget;
use crate::mode::Mode;
use crate::styles::{ACTIVE_COLOR, FOCUSED_COLOR, PLACEHOLDER_COLOR, UNFOCUSED_COLOR};
use crate::tui::Frame;

#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
enum InputState {
    Focused,
    #[default]
    Unfocused,
    Active,
}

/// A free-text input bound to one [`Field`] of the form.
pub struct CoordinateField {
    field: Field,
    focused: bool,
    mode: Mode,
}

impl CoordinateField {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            focused: false,
            mode: Mode::default(),
        }
    }

    fn state(&self) -> InputState {
        match (self.focused, self.mode) {
            (true, Mode::Insert) => InputState::Active,
            (true, Mode::Navigate) => InputState::Focused,
            (false, _) => InputState::Unfocused,
        }
    }
}

impl Component for CoordinateField {
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.state() != InputState::Active {
            return Ok(None);
        }
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return Ok(None);
        }
        let action = match key.code {
            KeyCode::Char(c) => Some(Action::InsertChar(c)),
            KeyCode::Backspace => Some(Action::DeleteChar),
            _ => None,
        };
        Ok(action)
    }

    fn handle_paste_event(&mut self, text: String) -> Result<Option<Action>> {
        if self.state() == InputState::Active {
            return Ok(Some(Action::Paste(text)));
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Focus(target) => self.focused = target == FocusTarget::Field(self.field),
            Action::SwitchMode(mode) => self.mode = mode,
            _ => {}
        }
        Ok(None)
    }

    fn focus_target(&self) -> Option<FocusTarget> {
        Some(FocusTarget::Field(self.field))
    }

    fn visible(&self, form: &ConversionForm) -> bool {
        self.field.direction() == form.direction()
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect, form: &ConversionForm) -> Result<()> {
        let state = self.state();
        let value = form.value(self.field);

        let mut spans = Vec::new();
        if value.is_empty() && state != InputState::Active {
            spans.push(Span::styled(
                self.field.placeholder(),
                Style::default().fg(PLACEHOLDER_COLOR).italic(),
            ));
        } else {
            spans.push(Span::styled(value, Style::default().fg(Color::White)));
        }
        if state == InputState::Active {
            spans.push(Span::styled("▏", Style::default().fg(ACTIVE_COLOR)));
        }

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(format!(" {} ", self.field.label()))
                .title_alignment(Alignment::Right)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(match state {
                    InputState::Active => ACTIVE_COLOR,
                    InputState::Focused => FOCUSED_COLOR,
                    InputState::Unfocused => UNFOCUSED_COLOR,
                })),
        );
        f.render_widget(paragraph, rect);
        Ok(())
    }
}
