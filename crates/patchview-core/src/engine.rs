//! Single owner of all state for one displayed diff.
//!
//! Hosts feed events in (`set_patch`, `complete_read`, `on_scroll`, `on_resize`, pointer and
//! wheel gestures) and read renderable state out (`visible_lines`, `minimap_layout`). Scroll
//! offsets the engine wants applied are returned as [`ScrollRequest`]s; the host owns the actual
//! scroll position and reports it back through `on_scroll`.

use tracing::debug;
use tracing::warn;

use crate::blocks::ChangeBlocks;
use crate::blocks::index_change_blocks;
use crate::error::ReadError;
use crate::frame::FrameScheduler;
use crate::line::DiffStats;
use crate::line::PatchLine;
use crate::minimap;
use crate::minimap::ContentGeometry;
use crate::minimap::MinimapLayout;
use crate::minimap::MinimapOptions;
use crate::minimap::TrackRect;
use crate::modified::detect_modifications;
use crate::overlay::IndicatorOverlay;
use crate::overlay::place_indicator;
use crate::patch::parse_unified_diff;
use crate::reconstruct::reconstruct;
use crate::segments::SegmentGranularity;
use crate::source::FileKey;
use crate::source::ReadRequest;
use crate::viewport::ViewportOptions;
use crate::viewport::ViewportState;
use crate::viewport::ViewportWindow;
use crate::viewport::compute_window;
use crate::viewport::scroll_top_for_row;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DiffEngineOptions {
    pub viewport: ViewportOptions,
    pub minimap: MinimapOptions,
    pub segments: SegmentGranularity,
}

/// Result of running the processing pipeline over one file's patch lines.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessedDiff {
    pub lines: Vec<PatchLine>,
    pub blocks: ChangeBlocks,
    pub stats: DiffStats,
}

/// Reconstruct, detect modifications, then index change blocks.
pub fn process(
    patch: &[PatchLine],
    full_content: Option<&str>,
    granularity: SegmentGranularity,
) -> ProcessedDiff {
    let merged = reconstruct(patch, full_content);
    let mut lines = detect_modifications(merged, granularity);
    let blocks = index_change_blocks(&mut lines);
    let stats = DiffStats::from_lines(&lines);
    ProcessedDiff {
        lines,
        blocks,
        stats,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FullFileState {
    /// No file identity was given, so only the patch can be shown.
    #[default]
    NotRequested,
    Pending,
    Loaded,
    /// The read failed; the patch-only view stays.
    Unavailable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Applied,
    FellBack,
    /// The response belonged to an earlier selection and was discarded.
    Stale,
}

/// A scroll offset the host should apply.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub smooth: bool,
}

/// Surface a wheel or pointer gesture landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureTarget {
    Diff,
    Minimap,
    Outside,
}

/// Whether the engine claimed a gesture, and the scroll it wants applied.
///
/// A consumed gesture must not propagate to enclosing scrollable regions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureResponse {
    pub consumed: bool,
    pub scroll: Option<ScrollRequest>,
}

impl GestureResponse {
    fn ignored() -> Self {
        Self::default()
    }

    fn scrolled(top: f64) -> Self {
        Self {
            consumed: true,
            scroll: Some(ScrollRequest { top, smooth: false }),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum PointerMode {
    #[default]
    Idle,
    Dragging,
}

#[derive(Debug)]
pub struct DiffEngine {
    options: DiffEngineOptions,
    generation: u64,
    selection: Option<FileKey>,
    language_hint: Option<String>,
    patch: Vec<PatchLine>,
    processed: ProcessedDiff,
    full_file: FullFileState,
    viewport: ViewportState,
    window: ViewportWindow,
    current_block: Option<usize>,
    pointer: PointerMode,
    minimap: MinimapLayout,
    indicator: FrameScheduler<TrackRect>,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::with_options(DiffEngineOptions::default())
    }

    pub fn with_options(options: DiffEngineOptions) -> Self {
        let mut engine = Self {
            options,
            generation: 0,
            selection: None,
            language_hint: None,
            patch: Vec::new(),
            processed: ProcessedDiff::default(),
            full_file: FullFileState::NotRequested,
            viewport: ViewportState::default(),
            window: ViewportWindow::default(),
            current_block: None,
            pointer: PointerMode::Idle,
            minimap: MinimapLayout::default(),
            indicator: FrameScheduler::new(),
        };
        engine.refresh_minimap();
        engine
    }

    pub fn options(&self) -> &DiffEngineOptions {
        &self.options
    }

    /// Replaces the displayed diff.
    ///
    /// When `key` names a file section of a multi-file patch, only that section is shown. A
    /// patch that names files but none matching `key` shows nothing and requests no read; a
    /// bare hunk list names no file and is taken as the selected file's.
    ///
    /// Returns the full-file read the host should perform, if any; its result goes back through
    /// [`complete_read`](Self::complete_read).
    pub fn set_patch(&mut self, key: Option<FileKey>, patch_text: &str) -> Option<ReadRequest> {
        let parsed = parse_unified_diff(patch_text);
        let names_files = parsed.files.iter().any(|f| f.display_path().is_some());
        let section = match &key {
            Some(k) => parsed.section(&k.path),
            None if parsed.files.len() == 1 => parsed.files.first(),
            None => None,
        };
        let unmatched = key.is_some() && section.is_none() && names_files;
        if unmatched && let Some(k) = &key {
            debug!(path = %k.path, files = parsed.files.len(), "selected file is not in the patch");
        }
        let (range, language_hint) = match section {
            Some(s) => (key.is_some().then(|| s.lines.clone()), s.language_hint.clone()),
            None => (None, None),
        };
        self.language_hint = language_hint;
        let mut lines = parsed.lines;
        self.patch = match range {
            Some(range) => lines.drain(range).collect(),
            None if unmatched => Vec::new(),
            None => lines,
        };

        self.generation = self.generation.wrapping_add(1);
        self.selection = key;
        self.full_file = if self.selection.is_some() && !unmatched {
            FullFileState::Pending
        } else {
            FullFileState::NotRequested
        };
        self.pointer = PointerMode::Idle;
        self.viewport.scroll_to(0.0);
        self.rebuild(None);

        self.pending_request()
    }

    /// Applies a finished full-file read if it still matches the current selection.
    pub fn complete_read(
        &mut self,
        request: &ReadRequest,
        result: Result<String, ReadError>,
    ) -> ReadOutcome {
        if request.generation != self.generation || self.selection.as_ref() != Some(&request.key)
        {
            debug!(
                path = %request.key.path,
                generation = request.generation,
                current = self.generation,
                "discarding stale full-file read"
            );
            return ReadOutcome::Stale;
        }
        match result {
            Ok(text) => {
                self.full_file = FullFileState::Loaded;
                self.rebuild(Some(&text));
                ReadOutcome::Applied
            }
            Err(err) => {
                warn!(path = %request.key.path, error = %err, "full file unavailable, showing patch only");
                self.full_file = FullFileState::Unavailable;
                ReadOutcome::FellBack
            }
        }
    }

    /// The full-file read still owed for the current selection.
    pub fn pending_request(&self) -> Option<ReadRequest> {
        if self.full_file != FullFileState::Pending {
            return None;
        }
        self.selection.clone().map(|key| ReadRequest {
            generation: self.generation,
            key,
        })
    }

    fn rebuild(&mut self, full_content: Option<&str>) {
        self.processed = process(&self.patch, full_content, self.options.segments);
        self.current_block = None;
        let content_h = self.processed.lines.len() as f64 * self.line_height();
        self.viewport.set_content(content_h);
        self.recompute_window();
        self.indicator.reset();
        self.refresh_minimap();
    }

    fn recompute_window(&mut self) {
        self.window = compute_window(
            self.processed.lines.len(),
            self.viewport.scroll_top,
            self.viewport.container_h,
            &self.options.viewport,
        );
    }

    fn refresh_minimap(&mut self) {
        self.minimap = minimap::layout(
            &self.processed.blocks,
            &self.content_geometry(),
            self.viewport.scroll_top,
            &self.options.minimap,
        );
        let indicator = self.minimap.indicator;
        self.indicator.schedule(indicator);
    }

    fn schedule_indicator_for(&mut self, scroll_top: f64) {
        let rect = minimap::indicator_rect(
            &self.content_geometry(),
            scroll_top,
            &self.options.minimap,
        );
        self.indicator.schedule(rect);
    }

    /// The host scrolled. While a minimap drag is active the indicator follows the pointer
    /// instead of the scroll events.
    pub fn on_scroll(&mut self, scroll_top: f64) {
        self.viewport.scroll_to(scroll_top);
        self.recompute_window();
        if self.pointer == PointerMode::Idle {
            self.schedule_indicator_for(self.viewport.scroll_top);
        }
    }

    pub fn on_resize(&mut self, container_h: f64) {
        self.viewport.set_container(container_h);
        self.recompute_window();
        self.refresh_minimap();
    }

    /// Changes the minimap track height, e.g. after the host laid out a new size.
    pub fn set_thumbnail_height(&mut self, height: f64) {
        if self.options.minimap.thumbnail_height == height {
            return;
        }
        self.options.minimap.thumbnail_height = height;
        self.indicator.reset();
        self.refresh_minimap();
    }

    /// Scrolls so that `row` is at the top and materializes it immediately.
    pub fn scroll_to_row(&mut self, row: usize) -> Option<ScrollRequest> {
        let last = self.processed.lines.len().checked_sub(1)?;
        let row = row.min(last);
        self.viewport
            .scroll_to(scroll_top_for_row(row, self.line_height()));
        self.recompute_window();
        self.schedule_indicator_for(self.viewport.scroll_top);
        Some(ScrollRequest {
            top: self.viewport.scroll_top,
            smooth: true,
        })
    }

    fn top_row(&self) -> usize {
        let h = self.line_height();
        if h > 0.0 {
            (self.viewport.scroll_top / h).floor() as usize
        } else {
            0
        }
    }

    /// Navigation continues from the last jumped-to block while it is still on screen, and from
    /// the scroll position otherwise.
    fn anchored_block(&self) -> Option<usize> {
        let current = self.current_block?;
        let start = self.processed.blocks.first_line_of(current)?;
        self.window.contains(start).then_some(current)
    }

    pub fn next_block(&mut self) -> Option<ScrollRequest> {
        let target = match self.anchored_block() {
            Some(current) => self.processed.blocks.next_after(Some(current)),
            None => self.processed.blocks.next_from_row(self.top_row()),
        };
        let Some(target) = target else {
            debug!(current = ?self.current_block, "no next change block");
            return None;
        };
        self.jump_to_block(target)
    }

    pub fn previous_block(&mut self) -> Option<ScrollRequest> {
        let target = match self.anchored_block() {
            Some(current) => self.processed.blocks.previous_before(Some(current)),
            None => self.processed.blocks.previous_from_row(self.top_row()),
        };
        let Some(target) = target else {
            debug!(current = ?self.current_block, "no previous change block");
            return None;
        };
        self.jump_to_block(target)
    }

    /// Scrolls to the first line of block `index`. Out-of-range indices are ignored.
    pub fn jump_to_block(&mut self, index: usize) -> Option<ScrollRequest> {
        let Some(row) = self.processed.blocks.first_line_of(index) else {
            debug!(index, count = self.processed.blocks.len(), "change block out of range");
            return None;
        };
        self.current_block = Some(index);
        self.scroll_to_row(row)
    }

    /// Wheel input over one of the engine's surfaces scrolls the diff and is captured.
    pub fn wheel(&mut self, target: GestureTarget, delta: f64) -> GestureResponse {
        if target == GestureTarget::Outside || !delta.is_finite() {
            return GestureResponse::ignored();
        }
        let top = self.viewport.scroll_top + delta;
        self.on_scroll(top);
        GestureResponse::scrolled(self.viewport.scroll_top)
    }

    /// Starts a click or drag on the minimap at track offset `y`.
    pub fn pointer_down(&mut self, target: GestureTarget, y: f64) -> GestureResponse {
        if target != GestureTarget::Minimap {
            return GestureResponse::ignored();
        }
        self.pointer = PointerMode::Dragging;
        self.drag_to(y)
    }

    pub fn pointer_move(&mut self, y: f64) -> GestureResponse {
        if self.pointer != PointerMode::Dragging {
            return GestureResponse::ignored();
        }
        self.drag_to(y)
    }

    /// Ends a drag and resynchronizes the indicator with the real scroll position.
    pub fn pointer_up(&mut self) -> GestureResponse {
        if self.pointer != PointerMode::Dragging {
            return GestureResponse::ignored();
        }
        self.pointer = PointerMode::Idle;
        self.schedule_indicator_for(self.viewport.scroll_top);
        GestureResponse {
            consumed: true,
            scroll: None,
        }
    }

    fn drag_to(&mut self, y: f64) -> GestureResponse {
        let top = minimap::scroll_for_pointer(&self.content_geometry(), y, &self.options.minimap);
        self.viewport.scroll_to(top);
        self.recompute_window();
        self.schedule_indicator_for(top);
        GestureResponse::scrolled(self.viewport.scroll_top)
    }

    /// Whether an indicator update is waiting for the next frame.
    pub fn wants_frame(&self) -> bool {
        self.indicator.is_pending()
    }

    /// Applies the pending indicator update, if any. Call once per render tick.
    pub fn on_frame(&mut self) -> Option<TrackRect> {
        let rect = self.indicator.flush()?;
        self.minimap.indicator = rect;
        Some(rect)
    }

    /// Flushes this frame's update and paints the indicator at the overlay's measured position.
    ///
    /// Returns `false` when there is nothing to paint.
    pub fn paint_overlay(&mut self, overlay: &mut dyn IndicatorOverlay) -> bool {
        self.on_frame();
        let indicator = self.minimap.indicator;
        if indicator.height <= 0.0 {
            return false;
        }
        let track = overlay.measure();
        overlay.paint(place_indicator(
            track,
            indicator,
            self.minimap.thumbnail_height,
        ));
        true
    }

    pub fn lines(&self) -> &[PatchLine] {
        &self.processed.lines
    }

    /// Lines inside the current window.
    pub fn visible_lines(&self) -> &[PatchLine] {
        self.processed
            .lines
            .get(self.window.start..self.window.end)
            .unwrap_or(&[])
    }

    pub fn window(&self) -> ViewportWindow {
        self.window
    }

    pub fn blocks(&self) -> &ChangeBlocks {
        &self.processed.blocks
    }

    pub fn stats(&self) -> DiffStats {
        self.processed.stats
    }

    pub fn current_block(&self) -> Option<usize> {
        self.current_block
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn line_height(&self) -> f64 {
        self.options.viewport.line_height
    }

    pub fn selection(&self) -> Option<&FileKey> {
        self.selection.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn language_hint(&self) -> Option<&str> {
        self.language_hint.as_deref()
    }

    pub fn full_file_state(&self) -> FullFileState {
        self.full_file
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer == PointerMode::Dragging
    }

    pub fn content_geometry(&self) -> ContentGeometry {
        ContentGeometry {
            line_count: self.processed.lines.len(),
            line_height: self.line_height(),
            container_h: self.viewport.container_h,
        }
    }

    /// Minimap geometry as of the last applied frame.
    pub fn minimap_layout(&self) -> &MinimapLayout {
        &self.minimap
    }
}
