use ratatui::style::Color;
use ratatui::text::Span;

/// Opaque syntax-coloring pass over line contents.
///
/// Implementations return one span list per input line. The diff view patches its own line
/// styles over the result, so highlighters only need to set foreground colors.
pub trait CodeHighlighter {
    fn highlight_lines(&self, language: Option<&str>, lines: &[&str]) -> Vec<Vec<Span<'static>>>;

    fn background_color(&self) -> Option<Color> {
        None
    }
}

/// Passes contents through unstyled.
pub struct NoHighlight;

impl CodeHighlighter for NoHighlight {
    fn highlight_lines(&self, _language: Option<&str>, lines: &[&str]) -> Vec<Vec<Span<'static>>> {
        lines.iter().map(|l| vec![Span::raw((*l).to_string())]).collect()
    }
}
