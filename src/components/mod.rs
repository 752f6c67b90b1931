use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ihdathi::coords::ConversionForm;
use ratatui::layout::{Constraint, Rect};

use crate::{
    action::Action,
    focus::FocusTarget,
    tui::{Event, Frame},
};

pub mod button;
pub mod field;
pub mod result;
pub mod selector;

/// One row of the conversion card.
///
/// Components keep only presentation state (focus, editing); the form they
/// render is owned by the app and passed to `draw`.
pub trait Component {
    fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>> {
        let r = match event {
            Some(Event::Key(key_event)) => self.handle_key_events(key_event)?,
            Some(Event::Paste(text)) => self.handle_paste_event(text)?,
            _ => None,
        };
        Ok(r)
    }

    #[allow(unused_variables)]
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    #[allow(unused_variables)]
    fn handle_paste_event(&mut self, text: String) -> Result<Option<Action>> {
        Ok(None)
    }

    #[allow(unused_variables)]
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        Ok(None)
    }

    /// The focus target this row answers to, if it can be focused at all.
    fn focus_target(&self) -> Option<FocusTarget> {
        None
    }

    #[allow(unused_variables)]
    fn visible(&self, form: &ConversionForm) -> bool {
        true
    }

    fn constraint(&self) -> Constraint {
        Constraint::Length(3)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect, form: &ConversionForm) -> Result<()>;
}

/// Draws `component` on its own into an off-screen buffer, one string per row.
#[cfg(test)]
pub(crate) fn draw_rows(
    component: &mut dyn Component,
    form: &ConversionForm,
    width: u16,
    height: u16,
) -> Result<Vec<String>> {
    let mut terminal = ratatui::Terminal::new(ratatui::backend::TestBackend::new(width, height))?;
    let mut drawn = Ok(());
    terminal.draw(|f| {
        let area = f.size();
        drawn = component.draw(f, area, form);
    })?;
    drawn?;

    let buffer = terminal.backend().buffer();
    Ok((0..height)
        .map(|y| (0..width).map(|x| buffer.get(x, y).symbol()).collect())
        .collect())
}
