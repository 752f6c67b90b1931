use color_eyre::eyre::Result;
use ihdathi::coords::ConversionForm;
use ratatui::{prelude::*, widgets::*};

use super::Component;
use crate::action::Action;
use crate::focus::FocusTarget;
use crate::styles::{ACTIVE_COLOR, DISABLED_COLOR, FOCUSED_COLOR, UNFOCUSED_COLOR};
use crate::tui::Frame;

const CONVERT_LABEL: &str = "تحويل الإحداثيات";
const BUSY_LABEL: &str = "جاري التحويل...";

/// The submit row. Drawn disabled while a conversion is pending.
#[derive(Default)]
pub struct ConvertButton {
    focused: bool,
}

impl ConvertButton {
    pub fn new() -> Self {
        Self::default()
    }

    fn label(form: &ConversionForm) -> &'static str {
        if form.is_busy() {
            BUSY_LABEL
        } else {
            CONVERT_LABEL
        }
    }
}

impl Component for ConvertButton {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::Focus(target) = action {
            self.focused = target == FocusTarget::Convert;
        }
        Ok(None)
    }

    fn focus_target(&self) -> Option<FocusTarget> {
        Some(FocusTarget::Convert)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect, form: &ConversionForm) -> Result<()> {
        let (fg, border) = match (form.is_busy(), self.focused) {
            (true, _) => (DISABLED_COLOR, DISABLED_COLOR),
            (false, true) => (ACTIVE_COLOR, FOCUSED_COLOR),
            (false, false) => (Color::White, UNFOCUSED_COLOR),
        };

        let paragraph = Paragraph::new(Self::label(form))
            .alignment(Alignment::Center)
            .style(Style::default().fg(fg).bold())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Thick)
                    .border_style(Style::default().fg(border)),
            );
        f.render_widget(paragraph, rect);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::draw_rows;
    use pretty_assertions::assert_eq;

    #[test]
    fn label_reflects_the_busy_flag() {
        let mut form = ConversionForm::default();
        assert_eq!(ConvertButton::label(&form), CONVERT_LABEL);
        let pending = form.begin_conversion();
        assert_eq!(ConvertButton::label(&form), BUSY_LABEL);
        form.finish_conversion(pending.evaluate());
        assert_eq!(ConvertButton::label(&form), CONVERT_LABEL);
    }

    #[test]
    fn busy_label_is_drawn() -> Result<()> {
        let mut form = ConversionForm::default();
        let mut button = ConvertButton::new();

        let rows = draw_rows(&mut button, &form, 40, 3)?;
        assert!(rows[1].contains(CONVERT_LABEL), "{rows:#?}");

        form.begin_conversion();
        let rows = draw_rows(&mut button, &form, 40, 3)?;
        assert!(rows[1].contains("جاري التحويل..."), "{rows:#?}");
        Ok(())
    }
}
