//! Syntax coloring for diff lines through `syntect`.

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::FontStyle;
use syntect::highlighting::Style as SynStyle;
use syntect::highlighting::Theme;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxReference;
use syntect::parsing::SyntaxSet;

use crate::text::CodeHighlighter;

const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Highlights each visible diff line with the bundled syntaxes.
///
/// Lines are fed through one `HighlightLines` state per call, so a multi-line construct only
/// colors correctly when its opening line is part of the same visible run.
pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    paint_background: bool,
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Uses the bundled theme called `name`, falling back to the default theme.
    pub fn with_theme(name: &str) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = themes
            .remove(name)
            .or_else(|| themes.remove(DEFAULT_THEME))
            .unwrap_or_default();
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            paint_background: false,
        }
    }

    /// Fill diff rows with the theme's background instead of the terminal's.
    pub fn paint_background(mut self, on: bool) -> Self {
        self.paint_background = on;
        self
    }

    fn syntax_for(&self, language: Option<&str>) -> &SyntaxReference {
        language
            .and_then(|lang| {
                self.syntax_set
                    .find_syntax_by_extension(lang)
                    .or_else(|| self.syntax_set.find_syntax_by_token(lang))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeHighlighter for SyntectHighlighter {
    fn highlight_lines(&self, language: Option<&str>, lines: &[&str]) -> Vec<Vec<Span<'static>>> {
        let mut state = HighlightLines::new(self.syntax_for(language), &self.theme);
        let mut line = String::new();

        lines
            .iter()
            .map(|content| {
                // The newline-aware syntaxes expect each line terminated.
                line.clear();
                line.push_str(content);
                line.push('\n');
                let regions = state
                    .highlight_line(&line, &self.syntax_set)
                    .unwrap_or_default();
                let spans: Vec<Span<'static>> = regions
                    .into_iter()
                    .map(|(style, text)| (style, text.trim_end_matches('\n')))
                    .filter(|(_, text)| !text.is_empty())
                    .map(|(style, text)| Span::styled(text.to_string(), foreground_style(style)))
                    .collect();
                if spans.is_empty() {
                    vec![Span::raw((*content).to_string())]
                } else {
                    spans
                }
            })
            .collect()
    }

    fn background_color(&self) -> Option<Color> {
        if !self.paint_background {
            return None;
        }
        self.theme
            .settings
            .background
            .map(|c| Color::Rgb(c.r, c.g, c.b))
    }
}

/// Foreground and font style only; diff kinds own the background.
fn foreground_style(s: SynStyle) -> Style {
    let fg = s.foreground;
    let mut out = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    for (font, modifier) in [
        (FontStyle::BOLD, Modifier::BOLD),
        (FontStyle::ITALIC, Modifier::ITALIC),
        (FontStyle::UNDERLINE, Modifier::UNDERLINED),
    ] {
        if s.font_style.contains(font) {
            out = out.add_modifier(modifier);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_span_list_per_line_without_newlines() {
        let h = SyntectHighlighter::new();
        let out = h.highlight_lines(Some("rs"), &["fn main() {", "}", ""]);
        assert_eq!(out.len(), 3);
        let first: String = out[0].iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(first, "fn main() {");
        assert!(out.iter().flatten().all(|s| !s.content.contains('\n')));
    }

    #[test]
    fn background_is_opt_in() {
        assert_eq!(SyntectHighlighter::new().background_color(), None);
        let painted = SyntectHighlighter::new().paint_background(true);
        assert!(painted.background_color().is_some());
    }

    #[test]
    fn unknown_language_falls_back_to_plain_text() {
        let h = SyntectHighlighter::with_theme("no-such-theme");
        let out = h.highlight_lines(Some("definitely-not-a-language"), &["plain"]);
        let text: String = out[0].iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "plain");
    }
}
