use tracing::trace;

/// Sizing for the virtualized line list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportOptions {
    /// Fixed height of one rendered line, in host pixels.
    pub line_height: f64,
    /// Documents with more lines than this are windowed; smaller ones render whole.
    pub virtualize_above: usize,
    /// Extra lines materialized below the visible region to hide latency on fast scroll.
    pub overscan: usize,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            line_height: 20.0,
            virtualize_above: 1000,
            overscan: 10,
        }
    }
}

/// Half-open range of line indices currently materialized for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportWindow {
    pub start: usize,
    pub end: usize,
}

impl ViewportWindow {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, row: usize) -> bool {
        row >= self.start && row < self.end
    }
}

/// Scroll geometry reported by the hosting surface, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportState {
    pub scroll_top: f64,
    pub container_h: f64,
    pub content_h: f64,
}

impl ViewportState {
    pub fn set_container(&mut self, h: f64) {
        self.container_h = sanitize(h);
        self.clamp();
    }

    pub fn set_content(&mut self, h: f64) {
        self.content_h = sanitize(h);
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.scroll_top = sanitize(self.scroll_top).min(self.max_scroll());
    }

    pub fn scroll_to(&mut self, top: f64) {
        self.scroll_top = top;
        self.clamp();
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.scroll_top + delta);
    }

    /// Largest reachable scroll offset; zero when the content fits.
    pub fn max_scroll(&self) -> f64 {
        (self.content_h - self.container_h).max(0.0)
    }

    pub fn percent(&self) -> Option<u8> {
        if self.content_h <= 0.0 || self.container_h <= 0.0 || self.content_h <= self.container_h
        {
            return None;
        }
        let visible_bottom = self.scroll_top + self.container_h;
        let pct = (visible_bottom / self.content_h * 100.0).round();
        Some(pct.clamp(0.0, 100.0) as u8)
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

/// Computes the materialized window for `len` lines.
///
/// At or below the virtualization threshold the whole sequence is returned. Otherwise
/// `start = floor(scroll_top / H)` and `end = min(len, start + ceil(container_h / H) + overscan)`.
pub fn compute_window(
    len: usize,
    scroll_top: f64,
    container_h: f64,
    options: &ViewportOptions,
) -> ViewportWindow {
    let h = options.line_height;
    if len <= options.virtualize_above || !(h.is_finite() && h > 0.0) {
        return ViewportWindow { start: 0, end: len };
    }

    let start = ((sanitize(scroll_top) / h).floor() as usize).min(len);
    let visible = (sanitize(container_h) / h).ceil() as usize;
    let end = start
        .saturating_add(visible)
        .saturating_add(options.overscan)
        .min(len);
    trace!(len, start, end, "recomputed viewport window");
    ViewportWindow { start, end }
}

/// Scroll offset that puts the 0-based `row` at the top of the viewport.
pub fn scroll_top_for_row(row: usize, line_height: f64) -> f64 {
    row as f64 * line_height.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big() -> ViewportOptions {
        ViewportOptions {
            line_height: 20.0,
            virtualize_above: 1000,
            overscan: 10,
        }
    }

    #[test]
    fn small_documents_render_whole() {
        let w = compute_window(500, 4000.0, 400.0, &big());
        assert_eq!(w, ViewportWindow { start: 0, end: 500 });
    }

    #[test]
    fn window_follows_scroll_with_overscan() {
        let w = compute_window(5000, 2010.0, 390.0, &big());
        assert_eq!(w.start, 100);
        assert_eq!(w.end, 100 + 20 + 10);
        assert!(w.contains(100));
        assert!(!w.contains(130));
    }

    #[test]
    fn window_is_clamped_to_length() {
        let w = compute_window(1200, 1_000_000.0, 400.0, &big());
        assert_eq!(w.start, 1200);
        assert_eq!(w.end, 1200);
        let w = compute_window(1200, 23_800.0, 400.0, &big());
        assert_eq!(w.end, 1200);
    }

    #[test]
    fn degenerate_line_height_renders_everything() {
        let opts = ViewportOptions {
            line_height: 0.0,
            ..big()
        };
        assert_eq!(compute_window(2000, 10.0, 10.0, &opts).len(), 2000);
    }

    #[test]
    fn scroll_to_row_materializes_target() {
        let opts = big();
        let top = scroll_top_for_row(3000, opts.line_height);
        let w = compute_window(5000, top, 400.0, &opts);
        assert!(w.contains(3000));
    }

    #[test]
    fn viewport_state_clamps() {
        let mut s = ViewportState::default();
        s.set_container(100.0);
        s.set_content(160.0);
        s.scroll_to(999.0);
        assert_eq!(s.scroll_top, 60.0);
        s.scroll_by(-1000.0);
        assert_eq!(s.scroll_top, 0.0);
        assert_eq!(s.percent(), Some(63));
        s.set_content(50.0);
        assert_eq!(s.percent(), None);
    }
}
