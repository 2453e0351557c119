use patchview_core::minimap::BarKind;
use patchview_core::minimap::MinimapLayout;
use patchview_core::overlay::IndicatorOverlay;
use patchview_core::overlay::OverlayRect;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::theme::Theme;

const BAR_SYMBOL: &str = "▐";

/// Paints the minimap track and change bars. Track space is one unit per terminal row.
pub struct MinimapView<'a> {
    layout: &'a MinimapLayout,
    theme: &'a Theme,
}

impl<'a> MinimapView<'a> {
    pub fn new(layout: &'a MinimapLayout, theme: &'a Theme) -> Self {
        Self { layout, theme }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(area, self.theme.minimap_track);
        for bar in &self.layout.bars {
            let style = match bar.kind {
                BarKind::Added => self.theme.minimap_add,
                BarKind::Deleted => self.theme.minimap_del,
                BarKind::Modified => self.theme.minimap_modified,
            };
            for y in rows(area, bar.rect.top, bar.rect.height) {
                for x in area.left()..area.right() {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_symbol(BAR_SYMBOL).set_style(style);
                    }
                }
            }
        }
    }
}

/// Buffer rows covered by `[top, top + height)` of track space inside `area`.
fn rows(area: Rect, top: f64, height: f64) -> std::ops::Range<u16> {
    if height <= 0.0 || !top.is_finite() {
        return 0..0;
    }
    let first = top.floor().max(0.0) as u16;
    let last = (top + height).ceil().max(0.0) as u16;
    let first = area.y.saturating_add(first).min(area.bottom());
    let last = area.y.saturating_add(last).min(area.bottom());
    first..last
}

/// Indicator overlay drawn straight into a ratatui buffer over the minimap column.
pub struct BufferOverlay<'a> {
    pub area: Rect,
    pub buf: &'a mut Buffer,
    pub style: Style,
}

impl IndicatorOverlay for BufferOverlay<'_> {
    fn measure(&self) -> OverlayRect {
        OverlayRect {
            x: self.area.x as f64,
            y: self.area.y as f64,
            width: self.area.width as f64,
            height: self.area.height as f64,
        }
    }

    fn paint(&mut self, rect: OverlayRect) {
        let local_top = rect.y - self.area.y as f64;
        for y in rows(self.area, local_top, rect.height) {
            for x in self.area.left()..self.area.right() {
                if let Some(cell) = self.buf.cell_mut((x, y)) {
                    cell.set_style(self.style);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchview_core::minimap::ChangeBar;
    use patchview_core::minimap::TrackRect;

    #[test]
    fn draws_bars_and_overlay_rows() {
        let theme = Theme::default();
        let layout = MinimapLayout {
            thumbnail_height: 10.0,
            indicator: TrackRect {
                top: 0.0,
                height: 3.0,
            },
            bars: vec![ChangeBar {
                block: 0,
                kind: BarKind::Deleted,
                rect: TrackRect {
                    top: 4.0,
                    height: 1.5,
                },
            }],
        };
        let area = Rect::new(5, 2, 2, 10);
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 14));
        MinimapView::new(&layout, &theme).render(area, &mut buf);

        let symbol = |x: u16, y: u16| buf.cell((x, y)).map(|c| c.symbol().to_string());
        assert_eq!(symbol(5, 6).as_deref(), Some(BAR_SYMBOL));
        assert_eq!(symbol(6, 7).as_deref(), Some(BAR_SYMBOL));
        assert_eq!(symbol(5, 8).as_deref(), Some(" "));

        let mut overlay = BufferOverlay {
            area,
            buf: &mut buf,
            style: theme.minimap_indicator,
        };
        let measured = overlay.measure();
        overlay.paint(OverlayRect {
            height: 3.0,
            ..measured
        });
        let bg = |y: u16| buf.cell((5, y)).and_then(|c| c.style().bg);
        assert_eq!(bg(2), theme.minimap_indicator.bg);
        assert_eq!(bg(4), theme.minimap_indicator.bg);
        assert_eq!(bg(5), theme.minimap_track.bg);
    }

    #[test]
    fn rows_are_clamped_to_area() {
        let area = Rect::new(0, 3, 1, 4);
        assert_eq!(rows(area, 2.5, 10.0), 5..7);
        assert_eq!(rows(area, 0.0, 0.0), 0..0);
    }
}
