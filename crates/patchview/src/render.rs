use ratatui::buffer::Buffer;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 4;

/// Writes `spans` into one buffer row, skipping the first `skip_cols` display columns and
/// stopping after `max_cols`. Tabs expand to spaces; a wide char straddling either edge is
/// dropped rather than split.
///
/// Spans with the default style take `fallback`. Returns the number of columns written.
pub fn render_spans_clipped(
    x: u16,
    y: u16,
    skip_cols: usize,
    max_cols: u16,
    buf: &mut Buffer,
    spans: &[Span<'_>],
    fallback: Style,
) -> u16 {
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut written = 0usize;
    let mut tmp = [0u8; 4];

    for span in spans {
        let style = if span.style == Style::default() {
            fallback
        } else {
            span.style
        };
        for ch in span.content.chars() {
            let (symbol, width): (&str, usize) = if ch == '\t' {
                (" ", TAB_WIDTH)
            } else {
                match UnicodeWidthChar::width(ch) {
                    Some(w) if w > 0 => (&*ch.encode_utf8(&mut tmp), w),
                    _ => continue,
                }
            };

            // Tabs are emitted one column at a time so they can be clipped partially.
            let (cells, step) = if ch == '\t' { (width, 1) } else { (1, width) };
            for _ in 0..cells {
                if col < skip_cols {
                    col += step;
                    continue;
                }
                if written + step > max_cols {
                    return written as u16;
                }
                let cx = x + written as u16;
                if let Some(cell) = buf.cell_mut((cx, y)) {
                    cell.set_symbol(symbol).set_style(style);
                }
                if step == 2
                    && let Some(cell) = buf.cell_mut((cx + 1, y))
                {
                    cell.set_symbol("").set_style(style);
                }
                written += step;
                col += step;
            }
        }
    }
    written as u16
}

/// Patches `overlay` onto the parts of `spans` covered by the sorted, non-overlapping byte
/// `ranges` of their concatenated text.
pub fn patch_byte_ranges(
    spans: Vec<Span<'static>>,
    ranges: &[(usize, usize)],
    overlay: Style,
) -> Vec<Span<'static>> {
    if ranges.is_empty() {
        return spans;
    }

    let mut out = Vec::with_capacity(spans.len() + ranges.len() * 2);
    let mut ranges = ranges.iter().copied().peekable();
    let mut offset = 0usize;

    for span in spans {
        let text = span.content.as_ref();
        let end = offset + text.len();
        let mut cursor = 0usize;

        while let Some(&(rs, re)) = ranges.peek() {
            if re <= offset + cursor {
                ranges.next();
                continue;
            }
            if rs >= end {
                break;
            }
            let from = rs.saturating_sub(offset).max(cursor);
            let to = re.min(end) - offset;
            if from > cursor {
                out.push(Span::styled(text[cursor..from].to_string(), span.style));
            }
            out.push(Span::styled(
                text[from..to].to_string(),
                span.style.patch(overlay),
            ));
            cursor = to;
            if re > end {
                break;
            }
            ranges.next();
        }

        if cursor < text.len() {
            out.push(Span::styled(text[cursor..].to_string(), span.style));
        }
        offset = end;
    }
    out
}

/// Patches `base` under every span's own style.
pub fn patch_base_style(mut spans: Vec<Span<'static>>, base: Style) -> Vec<Span<'static>> {
    for span in &mut spans {
        span.style = base.patch(span.style);
    }
    spans
}

pub fn digits(n: u32) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;
    use ratatui::style::Modifier;

    fn row(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).map_or(" ", |c| c.symbol()).to_string())
            .collect()
    }

    #[test]
    fn clips_and_expands_tabs() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 8, 1));
        let n = render_spans_clipped(0, 0, 2, 8, &mut buf, &[Span::raw("\tab")], Style::default());
        assert_eq!(n, 4);
        assert_eq!(row(&buf, 4), "  ab");

        let mut buf = Buffer::empty(Rect::new(0, 0, 8, 1));
        render_spans_clipped(0, 0, 0, 3, &mut buf, &[Span::raw("abcdef")], Style::default());
        assert_eq!(row(&buf, 4), "abc ");
    }

    #[test]
    fn drops_wide_chars_at_edges() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        let n = render_spans_clipped(0, 0, 1, 3, &mut buf, &[Span::raw("你好好")], Style::default());
        // The first char straddles the skip edge, the last would overflow.
        assert_eq!(n, 2);
        assert_eq!(buf.cell((0, 0)).map(|c| c.symbol().to_string()), Some("好".into()));
    }

    #[test]
    fn patches_ranges_across_span_boundaries() {
        let emph = Style::default().add_modifier(Modifier::BOLD);
        let spans = vec![Span::raw("abc"), Span::raw("def")];
        let out = patch_byte_ranges(spans, &[(1, 4)], emph);
        let texts: Vec<&str> = out.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["a", "bc", "d", "ef"]);
        assert_eq!(out[1].style, emph);
        assert_eq!(out[2].style, emph);
        assert_eq!(out[3].style, Style::default());
    }

    #[test]
    fn digits_behaves() {
        assert_eq!(digits(0), 1);
        assert_eq!(digits(9), 1);
        assert_eq!(digits(10), 2);
        assert_eq!(digits(12345), 5);
    }
}
