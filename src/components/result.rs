use color_eyre::eyre::Result;
use ihdathi::coords::{ConversionForm, ConversionResult};
use ratatui::{prelude::*, widgets::*};

use super::Component;
use crate::styles::{ERROR_COLOR, RESULT_COLOR, UNFOCUSED_COLOR};
use crate::tui::Frame;

/// Shows the latest conversion result; hidden until the first attempt.
#[derive(Default)]
pub struct ResultPanel;

impl ResultPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Component for ResultPanel {
    fn visible(&self, form: &ConversionForm) -> bool {
        form.result().is_some()
    }

    fn constraint(&self) -> Constraint {
        Constraint::Min(4)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect, form: &ConversionForm) -> Result<()> {
        let Some(result) = form.result() else {
            return Ok(());
        };
        let color = match result {
            ConversionResult::MissingInput => ERROR_COLOR,
            _ => RESULT_COLOR,
        };
        let lines: Vec<Line> = result
            .to_string()
            .lines()
            .map(|line| Line::from(line.to_string()))
            .collect();

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Right)
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(UNFOCUSED_COLOR)),
            );
        f.render_widget(paragraph, rect);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::draw_rows;
    use ihdathi::coords::Field;

    fn shows(rows: &[String], text: &str) -> bool {
        rows.iter().any(|row| row.contains(text))
    }

    #[test]
    fn hidden_until_the_first_conversion() {
        let mut form = ConversionForm::default();
        let panel = ResultPanel::new();
        assert!(!panel.visible(&form));

        form.convert();
        assert!(panel.visible(&form));
    }

    #[test]
    fn draws_both_result_lines() -> Result<()> {
        let mut form = ConversionForm::default();
        form.update_field(Field::Easting, "500000");
        form.update_field(Field::Northing, "1000000");
        form.convert();

        let rows = draw_rows(&mut ResultPanel::new(), &form, 60, 4)?;
        assert!(shows(&rows, "خط العرض: 8.983112°"), "{rows:#?}");
        assert!(shows(&rows, "خط الطول: 4.491556°"), "{rows:#?}");
        Ok(())
    }

    #[test]
    fn draws_nothing_without_a_result() -> Result<()> {
        let rows = draw_rows(&mut ResultPanel::new(), &ConversionForm::default(), 40, 4)?;
        assert!(rows.iter().all(|row| row.trim().is_empty()), "{rows:#?}");
        Ok(())
    }
}
