use ratatui::style::Color;

pub(crate) const ACTIVE_COLOR: Color = Color::Yellow;
pub(crate) const FOCUSED_COLOR: Color = Color::LightBlue;
pub(crate) const UNFOCUSED_COLOR: Color = Color::Gray;
pub(crate) const DISABLED_COLOR: Color = Color::DarkGray;
pub(crate) const PLACEHOLDER_COLOR: Color = Color::DarkGray;
pub(crate) const RESULT_COLOR: Color = Color::Green;
pub(crate) const ERROR_COLOR: Color = Color::Red;
