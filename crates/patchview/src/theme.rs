use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub diff_add: Style,
    pub diff_del: Style,
    pub diff_modified: Style,
    /// Patched over the added part of a modified line.
    pub segment_add: Style,
    /// Patched over the removed part of a modified line.
    pub segment_del: Style,
    /// Gutter highlight for the block last navigated to.
    pub current_block: Style,
    pub minimap_track: Style,
    pub minimap_add: Style,
    pub minimap_del: Style,
    pub minimap_modified: Style,
    pub minimap_indicator: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            diff_add: Style::default().green(),
            diff_del: Style::default().red(),
            diff_modified: Style::default().yellow(),
            segment_add: Style::default().green().add_modifier(Modifier::BOLD | Modifier::REVERSED),
            segment_del: Style::default().red().add_modifier(Modifier::CROSSED_OUT),
            current_block: Style::default().cyan().add_modifier(Modifier::BOLD),
            minimap_track: Style::default().bg(Color::Black),
            minimap_add: Style::default().fg(Color::Green),
            minimap_del: Style::default().fg(Color::Red),
            minimap_modified: Style::default().fg(Color::Yellow),
            minimap_indicator: Style::default().bg(Color::DarkGray),
        }
    }
}
