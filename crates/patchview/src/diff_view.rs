use std::collections::HashMap;
use std::sync::Arc;

use patchview_core::engine::DiffEngine;
use patchview_core::engine::DiffEngineOptions;
use patchview_core::engine::GestureResponse;
use patchview_core::engine::GestureTarget;
use patchview_core::engine::ReadOutcome;
use patchview_core::error::ReadError;
use patchview_core::line::DiffSegment;
use patchview_core::line::LineKind;
use patchview_core::line::PatchLine;
use patchview_core::line::SegmentKind;
use patchview_core::minimap::MinimapOptions;
use patchview_core::segments::SegmentGranularity;
use patchview_core::source::FileContentSource;
use patchview_core::source::FileKey;
use patchview_core::source::ReadRequest;
use patchview_core::viewport::ViewportOptions;
use ratatui::buffer::Buffer;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use tracing::trace;

use crate::bindings::NavAction;
use crate::bindings::NavBindings;
use crate::input::InputEvent;
use crate::input::MouseButton;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::minimap_view::BufferOverlay;
use crate::minimap_view::MinimapView;
use crate::render;
use crate::text::CodeHighlighter;
use crate::theme::Theme;

/// Options for [`DiffView`].
#[derive(Clone, Debug)]
pub struct DiffViewOptions {
    pub show_line_numbers: bool,
    pub show_minimap: bool,
    pub minimap_width: u16,
    /// Emphasize the changed part of modified lines.
    pub highlight_segments: bool,
    /// Also print the removed text of modified lines inline, struck through.
    pub inline_deletions: bool,
    pub granularity: SegmentGranularity,
    /// Documents longer than this are windowed.
    pub virtualize_above: usize,
    pub overscan: usize,
    /// Rows scrolled per wheel notch.
    pub wheel_step: u16,
    pub bindings: NavBindings,
}

impl Default for DiffViewOptions {
    fn default() -> Self {
        Self {
            show_line_numbers: true,
            show_minimap: true,
            minimap_width: 2,
            highlight_segments: true,
            inline_deletions: false,
            granularity: SegmentGranularity::default(),
            virtualize_above: ViewportOptions::default().virtualize_above,
            overscan: ViewportOptions::default().overscan,
            wheel_step: 3,
            bindings: NavBindings::default(),
        }
    }
}

impl DiffViewOptions {
    /// Engine options for a terminal: one unit per row, minimap track measured in rows.
    fn engine_options(&self) -> DiffEngineOptions {
        DiffEngineOptions {
            viewport: ViewportOptions {
                line_height: 1.0,
                virtualize_above: self.virtualize_above,
                overscan: self.overscan,
            },
            minimap: MinimapOptions {
                thumbnail_height: 0.0,
                min_indicator_px: 1.0,
                min_bar_px: 1.0,
                ..MinimapOptions::default()
            },
            segments: self.granularity,
        }
    }
}

struct VisibleHighlightCache {
    start: usize,
    end: usize,
    revision: u64,
    spans: Arc<HashMap<usize, Vec<Span<'static>>>>,
}

/// A virtualized diff viewer with change-block navigation and a minimap column.
///
/// - Load a patch with [`set_patch`](Self::set_patch); when a file key is given the returned
///   [`ReadRequest`] asks the app for the full file, which goes back through
///   [`complete_read`](Self::complete_read) or [`load_full_file`](Self::load_full_file).
/// - The view is event-loop agnostic: call `handle_event_in_area` and `render_ref` from your app.
pub struct DiffView {
    engine: DiffEngine,
    options: DiffViewOptions,
    highlighter: Option<Arc<dyn CodeHighlighter + Send + Sync>>,
    language_override: Option<String>,
    visible_highlight_cache: Option<VisibleHighlightCache>,
    /// Bumped whenever the displayed lines change.
    revision: u64,
    max_old_lineno: u32,
    max_new_lineno: u32,
}

impl Default for DiffView {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffView {
    pub fn new() -> Self {
        Self::with_options(DiffViewOptions::default())
    }

    pub fn with_options(options: DiffViewOptions) -> Self {
        Self {
            engine: DiffEngine::with_options(options.engine_options()),
            options,
            highlighter: None,
            language_override: None,
            visible_highlight_cache: None,
            revision: 0,
            max_old_lineno: 0,
            max_new_lineno: 0,
        }
    }

    pub fn options(&self) -> &DiffViewOptions {
        &self.options
    }

    pub fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DiffEngine {
        &mut self.engine
    }

    pub fn set_highlighter(&mut self, highlighter: Option<Arc<dyn CodeHighlighter + Send + Sync>>) {
        self.highlighter = highlighter;
        self.visible_highlight_cache = None;
    }

    /// Forces a highlighting language instead of the one guessed from the file extension.
    pub fn set_language_override(&mut self, language: Option<impl Into<String>>) {
        self.language_override = language.map(Into::into);
        self.visible_highlight_cache = None;
    }

    /// Shows `patch_text`, restricted to the section for `key` when one is given.
    pub fn set_patch(&mut self, key: Option<FileKey>, patch_text: &str) -> Option<ReadRequest> {
        let request = self.engine.set_patch(key, patch_text);
        self.lines_changed();
        request
    }

    pub fn complete_read(
        &mut self,
        request: &ReadRequest,
        result: Result<String, ReadError>,
    ) -> ReadOutcome {
        let outcome = self.engine.complete_read(request, result);
        if outcome == ReadOutcome::Applied {
            self.lines_changed();
        }
        outcome
    }

    /// Supplies the full new-side content for the current selection directly.
    ///
    /// Returns [`ReadOutcome::Stale`] when no read is outstanding.
    pub fn set_full_file(&mut self, content: impl Into<String>) -> ReadOutcome {
        let Some(request) = self.engine.pending_request() else {
            return ReadOutcome::Stale;
        };
        self.complete_read(&request, Ok(content.into()))
    }

    /// Performs the outstanding full-file read against `source`, if there is one.
    pub async fn load_full_file(&mut self, source: &dyn FileContentSource) -> Option<ReadOutcome> {
        let request = self.engine.pending_request()?;
        let result = request.fetch(source).await;
        Some(self.complete_read(&request, result))
    }

    fn lines_changed(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.visible_highlight_cache = None;
        let lines = self.engine.lines();
        self.max_old_lineno = lines
            .iter()
            .filter_map(|l| l.old_line_number)
            .max()
            .unwrap_or(0);
        self.max_new_lineno = lines
            .iter()
            .filter(|l| l.kind != LineKind::Deleted)
            .map(|l| l.line_number)
            .max()
            .unwrap_or(0);
    }

    /// Splits `area` into the diff body and the minimap column.
    fn layout(&self, area: Rect) -> (Rect, Option<Rect>) {
        let w = self.options.minimap_width;
        if !self.options.show_minimap || w == 0 || area.width <= w {
            return (area, None);
        }
        let content = Rect::new(area.x, area.y, area.width - w, area.height);
        let minimap = Rect::new(area.x + area.width - w, area.y, w, area.height);
        (content, Some(minimap))
    }

    fn sync_geometry(&mut self, area: Rect) {
        let (content, minimap) = self.layout(area);
        let rows = content.height as f64;
        if self.engine.viewport().container_h != rows {
            self.engine.on_resize(rows);
        }
        let track = minimap.map_or(0.0, |m| m.height as f64);
        self.engine.set_thumbnail_height(track);
    }

    fn top_row(&self) -> usize {
        self.engine.viewport().scroll_top.max(0.0) as usize
    }

    fn scroll_rows(&mut self, delta: i64) {
        let top = self.engine.viewport().scroll_top + delta as f64;
        self.engine.on_scroll(top);
    }

    fn apply_action(&mut self, action: NavAction) {
        let page = (self.engine.viewport().container_h as i64).max(1);
        match action {
            NavAction::LineUp => self.scroll_rows(-1),
            NavAction::LineDown => self.scroll_rows(1),
            NavAction::PageUp => self.scroll_rows(-page),
            NavAction::PageDown => self.scroll_rows(page),
            NavAction::Top => {
                self.engine.scroll_to_row(0);
            }
            NavAction::Bottom => {
                self.engine.scroll_to_row(usize::MAX);
            }
            NavAction::NextBlock => {
                self.engine.next_block();
            }
            NavAction::PreviousBlock => {
                self.engine.previous_block();
            }
        }
    }

    /// Handles one input event against the view laid out in `area`.
    ///
    /// Returns `true` when the event was consumed.
    pub fn handle_event_in_area(&mut self, area: Rect, event: InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => {
                self.sync_geometry(area);
                let Some(action) = self.options.bindings.action_for(&key) else {
                    return false;
                };
                let before = (self.engine.viewport().scroll_top, self.engine.current_block());
                self.apply_action(action);
                before != (self.engine.viewport().scroll_top, self.engine.current_block())
            }
            InputEvent::Mouse(m) => self.handle_mouse_event(area, m).consumed,
        }
    }

    pub fn handle_mouse_event(&mut self, area: Rect, event: MouseEvent) -> GestureResponse {
        self.sync_geometry(area);
        let (content, minimap) = self.layout(area);
        let pos = Position::new(event.x, event.y);
        let target = if minimap.is_some_and(|m| m.contains(pos)) {
            GestureTarget::Minimap
        } else if content.contains(pos) {
            GestureTarget::Diff
        } else {
            GestureTarget::Outside
        };
        let step = self.options.wheel_step as f64 * self.engine.line_height();
        let track_y = minimap.map_or(0.0, |m| track_offset(m, event.y));

        match event.kind {
            MouseEventKind::ScrollUp => self.engine.wheel(target, -step),
            MouseEventKind::ScrollDown => self.engine.wheel(target, step),
            MouseEventKind::Down(MouseButton::Left) => self.engine.pointer_down(target, track_y),
            MouseEventKind::Drag(MouseButton::Left) => self.engine.pointer_move(track_y),
            MouseEventKind::Up(MouseButton::Left) => self.engine.pointer_up(),
            _ => GestureResponse::default(),
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.sync_geometry(area);
        let (content_area, minimap_area) = self.layout(area);

        let code_bg = self.highlighter.as_ref().and_then(|h| h.background_color());
        let with_bg = |style: Style| match code_bg {
            Some(bg) => style.bg(bg),
            None => style,
        };

        let (old_w, new_w, gutter_w) = if self.options.show_line_numbers {
            let old_w = render::digits(self.max_old_lineno);
            let new_w = render::digits(self.max_new_lineno);
            (old_w, new_w, (old_w + 1 + new_w + 3) as u16)
        } else {
            (0, 0, 2)
        };
        let content_w = content_area.width.saturating_sub(gutter_w);

        let window = self.engine.window();
        let start = self.top_row().max(window.start);
        let end = (start + content_area.height as usize).min(window.end);
        trace!(start, end, window = ?window, "render diff rows");

        let highlighted = if self.highlighter.is_some() && content_w > 0 && start < end {
            Some(self.highlight_visible_cached(start, end))
        } else {
            None
        };

        let current = self.engine.current_block();
        for row in 0..content_area.height {
            let y = content_area.y + row;
            let row_rect = Rect::new(content_area.x, y, content_area.width, 1);
            let idx = start + row as usize;
            let Some(line) = (idx < end).then(|| self.engine.lines().get(idx)).flatten() else {
                buf.set_style(row_rect, with_bg(theme.text_primary));
                continue;
            };

            let line_style = with_bg(style_for_kind(theme, line.kind));
            buf.set_style(row_rect, line_style);

            let marker = marker_for_kind(line.kind);
            let gutter = if self.options.show_line_numbers {
                let (old, new) = gutter_numbers(line);
                format!(
                    "{} {} {marker} ",
                    pad_number(old, old_w),
                    pad_number(new, new_w)
                )
            } else {
                format!("{marker} ")
            };
            let gutter_style = if current.is_some() && line.change_block == current {
                theme.current_block
            } else {
                gutter_style_for_kind(theme, line.kind)
            };
            buf.set_stringn(
                content_area.x,
                y,
                &gutter,
                content_area.width as usize,
                with_bg(gutter_style),
            );

            if content_w == 0 {
                continue;
            }
            let spans = self.line_spans(
                line,
                highlighted.as_ref().and_then(|m| m.get(&idx)),
                line_style,
                theme,
            );
            render::render_spans_clipped(
                content_area.x + gutter_w,
                y,
                0,
                content_w,
                buf,
                &spans,
                line_style,
            );
        }

        if let Some(minimap_area) = minimap_area {
            MinimapView::new(self.engine.minimap_layout(), theme).render(minimap_area, buf);
            let mut overlay = BufferOverlay {
                area: minimap_area,
                buf,
                style: theme.minimap_indicator,
            };
            self.engine.paint_overlay(&mut overlay);
        } else {
            self.engine.on_frame();
        }
    }

    fn line_spans(
        &self,
        line: &PatchLine,
        highlighted: Option<&Vec<Span<'static>>>,
        line_style: Style,
        theme: &Theme,
    ) -> Vec<Span<'static>> {
        let base = match highlighted {
            Some(spans) => render::patch_base_style(spans.clone(), line_style),
            None => vec![Span::styled(line.content.clone(), line_style)],
        };
        let Some(segments) = line.segments.as_deref() else {
            return base;
        };
        if !self.options.highlight_segments {
            return base;
        }
        if self.options.inline_deletions {
            return inline_segment_spans(segments, line_style, theme);
        }
        render::patch_byte_ranges(base, &added_byte_ranges(segments), theme.segment_add)
    }

    fn highlight_visible_cached(
        &mut self,
        start: usize,
        end: usize,
    ) -> Arc<HashMap<usize, Vec<Span<'static>>>> {
        if let Some(cache) = self.visible_highlight_cache.as_ref()
            && cache.start == start
            && cache.end == end
            && cache.revision == self.revision
        {
            return cache.spans.clone();
        }

        let spans = Arc::new(self.highlight_visible_uncached(start, end));
        self.visible_highlight_cache = Some(VisibleHighlightCache {
            start,
            end,
            revision: self.revision,
            spans: spans.clone(),
        });
        spans
    }

    fn highlight_visible_uncached(&self, start: usize, end: usize) -> HashMap<usize, Vec<Span<'static>>> {
        let Some(hi) = self.highlighter.as_ref() else {
            return HashMap::new();
        };
        let Some(lines) = self.engine.lines().get(start..end) else {
            return HashMap::new();
        };
        let language = self
            .language_override
            .as_deref()
            .or(self.engine.language_hint());
        let contents: Vec<&str> = lines.iter().map(|l| l.content.as_str()).collect();
        hi.highlight_lines(language, &contents)
            .into_iter()
            .enumerate()
            .map(|(i, spans)| (start + i, spans))
            .collect()
    }
}

/// Maps a terminal row to a track offset. Pressing a cell aims at its center; the first and last
/// rows reach the ends of the track.
fn track_offset(minimap: Rect, y: u16) -> f64 {
    let h = minimap.height as f64;
    let rel = y as f64 - minimap.y as f64;
    if rel <= 0.0 {
        0.0
    } else if rel >= h - 1.0 {
        h
    } else {
        rel + 0.5
    }
}

fn gutter_numbers(line: &PatchLine) -> (Option<u32>, Option<u32>) {
    match line.kind {
        LineKind::Added => (None, Some(line.line_number)),
        LineKind::Deleted => (line.old_line_number, None),
        LineKind::Unchanged | LineKind::Modified => (line.old_line_number, Some(line.line_number)),
    }
}

fn pad_number(n: Option<u32>, width: usize) -> String {
    match n {
        Some(n) => format!("{n:>width$}"),
        None => " ".repeat(width),
    }
}

/// Byte ranges of the added segments within the new-side text.
fn added_byte_ranges(segments: &[DiffSegment]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut offset = 0usize;
    for seg in segments {
        match seg.kind {
            SegmentKind::Deleted => {}
            SegmentKind::Unchanged => offset += seg.content.len(),
            SegmentKind::Added => {
                let end = offset + seg.content.len();
                out.push((offset, end));
                offset = end;
            }
        }
    }
    out
}

fn inline_segment_spans(
    segments: &[DiffSegment],
    line_style: Style,
    theme: &Theme,
) -> Vec<Span<'static>> {
    segments
        .iter()
        .map(|seg| {
            let style = match seg.kind {
                SegmentKind::Unchanged => line_style,
                SegmentKind::Added => line_style.patch(theme.segment_add),
                SegmentKind::Deleted => line_style.patch(theme.segment_del),
            };
            Span::styled(seg.content.clone(), style)
        })
        .collect()
}

fn marker_for_kind(kind: LineKind) -> char {
    match kind {
        LineKind::Unchanged => ' ',
        LineKind::Added => '+',
        LineKind::Deleted => '-',
        LineKind::Modified => '~',
    }
}

fn style_for_kind(theme: &Theme, kind: LineKind) -> Style {
    match kind {
        LineKind::Unchanged => theme.text_primary,
        LineKind::Added => theme.diff_add,
        LineKind::Deleted => theme.diff_del,
        LineKind::Modified => theme.diff_modified,
    }
}

fn gutter_style_for_kind(theme: &Theme, kind: LineKind) -> Style {
    match kind {
        LineKind::Unchanged => theme.text_muted,
        _ => style_for_kind(theme, kind),
    }
}
