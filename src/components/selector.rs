use color_eyre::eyre::Result;
use ihdathi::coords::{ConversionForm, Direction, UtmZone};
use ratatui::{prelude::*, widgets::*};
use strum::IntoEnumIterator;

use super::Component;
use crate::action::Action;
use crate::focus::FocusTarget;
use crate::styles::{ACTIVE_COLOR, FOCUSED_COLOR, UNFOCUSED_COLOR};
use crate::tui::Frame;

const DIRECTION_LABEL: &str = " نوع التحويل ";
const ZONE_LABEL: &str = " المنطقة (Zone) ";

/// A select rendered as a tab strip; cycles with `SelectNext`/`SelectPrevious`.
pub struct Selector {
    target: FocusTarget,
    focused: bool,
}

impl Selector {
    pub fn direction(focused: bool) -> Self {
        Self {
            target: FocusTarget::Direction,
            focused,
        }
    }

    pub fn zone() -> Self {
        Self {
            target: FocusTarget::Zone,
            focused: false,
        }
    }

    fn options(&self, form: &ConversionForm) -> (&'static str, Vec<String>, usize) {
        match self.target {
            FocusTarget::Zone => {
                let zones: Vec<UtmZone> = UtmZone::iter().collect();
                let selected = zones.iter().position(|z| *z == form.zone()).unwrap_or(0);
                (
                    ZONE_LABEL,
                    zones.iter().map(ToString::to_string).collect(),
                    selected,
                )
            }
            _ => {
                let directions: Vec<Direction> = Direction::iter().collect();
                let selected = directions
                    .iter()
                    .position(|d| *d == form.direction())
                    .unwrap_or(0);
                (
                    DIRECTION_LABEL,
                    directions.iter().map(|d| d.label().to_string()).collect(),
                    selected,
                )
            }
        }
    }
}

impl Component for Selector {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::Focus(target) = action {
            self.focused = target == self.target;
        }
        Ok(None)
    }

    fn focus_target(&self) -> Option<FocusTarget> {
        Some(self.target)
    }

    fn visible(&self, form: &ConversionForm) -> bool {
        self.target != FocusTarget::Zone || form.direction() == Direction::UtmToGeographic
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect, form: &ConversionForm) -> Result<()> {
        let (label, options, selected) = self.options(form);
        let border = if self.focused {
            FOCUSED_COLOR
        } else {
            UNFOCUSED_COLOR
        };

        let tabs = Tabs::new(options)
            .select(selected)
            .block(
                Block::default()
                    .title(label)
                    .title_alignment(Alignment::Right)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(border)),
            )
            .style(Style::default().fg(UNFOCUSED_COLOR))
            .highlight_style(
                Style::default()
                    .fg(ACTIVE_COLOR)
                    .add_modifier(Modifier::BOLD),
            )
            .divider(" | ");
        f.render_widget(tabs, rect);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zone_select_hides_for_geographic_input() {
        let selector = Selector::zone();
        let mut form = ConversionForm::default();
        assert!(selector.visible(&form));
        form.set_direction(Direction::GeographicToUtm);
        assert!(!selector.visible(&form));
        assert!(Selector::direction(false).visible(&form));
    }

    #[test]
    fn options_mark_the_current_choice() {
        let form = ConversionForm::new(Direction::GeographicToUtm, UtmZone::Zone38);
        let (_, labels, selected) = Selector::direction(true).options(&form);
        assert_eq!(labels[selected], "جغرافي إلى UTM");
        let (_, zones, selected) = Selector::zone().options(&form);
        assert_eq!(zones, vec!["35", "36", "37", "38"]);
        assert_eq!(selected, 3);
    }

    #[test]
    fn focus_follows_the_target() -> Result<()> {
        let mut selector = Selector::zone();
        selector.update(Action::Focus(FocusTarget::Zone))?;
        assert!(selector.focused);
        selector.update(Action::Focus(FocusTarget::Convert))?;
        assert!(!selector.focused);
        Ok(())
    }
}
