//! Pixel-space mapping between the scrollable diff and a fixed-height minimap track.
//!
//! The track represents the whole document. A visible-region indicator moves along it as the
//! content scrolls, and each change block is drawn as a bar. All divisions are guarded so that
//! empty documents and zero-sized containers yield a zero-height indicator and no bars.

use crate::blocks::ChangeBlock;
use crate::blocks::ChangeBlocks;

/// How modified lines are coloured on the minimap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModifiedBarPolicy {
    /// Modified lines count as additions when picking a block's bar colour.
    #[default]
    FoldIntoAddDelete,
    /// Blocks containing modified lines get their own bar kind.
    Distinct,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapOptions {
    pub thumbnail_height: f64,
    pub min_indicator_px: f64,
    pub min_bar_px: f64,
    pub modified_bars: ModifiedBarPolicy,
}

impl Default for MinimapOptions {
    fn default() -> Self {
        Self {
            thumbnail_height: 200.0,
            min_indicator_px: 2.0,
            min_bar_px: 2.0,
            modified_bars: ModifiedBarPolicy::default(),
        }
    }
}

/// A vertical extent within the track.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackRect {
    pub top: f64,
    pub height: f64,
}

impl TrackRect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarKind {
    Added,
    Deleted,
    Modified,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChangeBar {
    pub block: usize,
    pub kind: BarKind,
    pub rect: TrackRect,
}

/// Size of the scrollable content the minimap represents.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContentGeometry {
    pub line_count: usize,
    pub line_height: f64,
    pub container_h: f64,
}

impl ContentGeometry {
    pub fn total_px(&self) -> f64 {
        (self.line_count as f64 * self.line_height).max(1.0)
    }

    /// Denominator for scroll fractions; never below 1.
    pub fn scroll_max(&self) -> f64 {
        (self.total_px() - self.container_h).max(1.0)
    }

    /// Largest offset the host can actually scroll to.
    pub fn reachable_scroll(&self) -> f64 {
        (self.line_count as f64 * self.line_height - self.container_h).max(0.0)
    }

    fn is_degenerate(&self) -> bool {
        self.line_count == 0
            || !(self.line_height.is_finite() && self.line_height > 0.0)
            || !(self.container_h.is_finite() && self.container_h > 0.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MinimapLayout {
    pub thumbnail_height: f64,
    pub indicator: TrackRect,
    pub bars: Vec<ChangeBar>,
}

/// A rectangle that broke the track bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundsViolation {
    Indicator(TrackRect),
    Bar(usize, TrackRect),
}

impl MinimapLayout {
    /// Checks `0 <= top`, `top + height <= track` and the minimum heights.
    ///
    /// A zero-height indicator is accepted only for degenerate geometry, where it is the
    /// documented default.
    pub fn check_bounds(&self, options: &MinimapOptions) -> Result<(), BoundsViolation> {
        const EPS: f64 = 1e-9;
        let track = self.thumbnail_height;
        let fits = |r: &TrackRect, min: f64| {
            r.top >= -EPS && r.bottom() <= track + EPS && r.height + EPS >= min.min(track)
        };

        if self.indicator.height > 0.0 && !fits(&self.indicator, options.min_indicator_px) {
            return Err(BoundsViolation::Indicator(self.indicator));
        }
        for bar in &self.bars {
            if !fits(&bar.rect, options.min_bar_px) {
                return Err(BoundsViolation::Bar(bar.block, bar.rect));
            }
        }
        Ok(())
    }
}

fn thumbnail(options: &MinimapOptions) -> f64 {
    let h = options.thumbnail_height;
    if h.is_finite() { h.max(0.0) } else { 0.0 }
}

/// `clamp(round(C / total * thumb), min, thumb)`, or 0 for degenerate geometry.
pub fn indicator_height(geometry: &ContentGeometry, options: &MinimapOptions) -> f64 {
    let thumb = thumbnail(options);
    if thumb <= 0.0 || geometry.is_degenerate() {
        return 0.0;
    }
    let min = options.min_indicator_px.max(0.0).min(thumb);
    (geometry.container_h / geometry.total_px() * thumb)
        .round()
        .clamp(min, thumb)
}

/// Forward mapping: indicator offset for `scroll_top`.
pub fn indicator_top(geometry: &ContentGeometry, scroll_top: f64, options: &MinimapOptions) -> f64 {
    let thumb = thumbnail(options);
    let height = indicator_height(geometry, options);
    if height <= 0.0 {
        return 0.0;
    }
    let travel = (thumb - height).max(0.0);
    let p = (scroll_top / geometry.scroll_max()).clamp(0.0, 1.0);
    if p.is_nan() {
        return 0.0;
    }
    (travel * p).round()
}

pub fn indicator_rect(
    geometry: &ContentGeometry,
    scroll_top: f64,
    options: &MinimapOptions,
) -> TrackRect {
    TrackRect {
        top: indicator_top(geometry, scroll_top, options),
        height: indicator_height(geometry, options),
    }
}

/// Inverse mapping used by clicks and drags: the pointer's fraction of the track becomes the
/// same fraction of the scroll range.
pub fn scroll_for_pointer(geometry: &ContentGeometry, y: f64, options: &MinimapOptions) -> f64 {
    let thumb = thumbnail(options);
    if thumb <= 0.0 || geometry.is_degenerate() || !y.is_finite() {
        return 0.0;
    }
    let p = y.clamp(0.0, thumb) / thumb;
    (p * geometry.scroll_max()).clamp(0.0, geometry.reachable_scroll())
}

/// Exact inverse of [`indicator_top`]: the scroll offset that puts the indicator's centre at
/// `center_y`. Positions closer than half an indicator to either end clamp to the extremes.
pub fn scroll_for_indicator_center(
    geometry: &ContentGeometry,
    center_y: f64,
    options: &MinimapOptions,
) -> f64 {
    let thumb = thumbnail(options);
    let height = indicator_height(geometry, options);
    let travel = thumb - height;
    if height <= 0.0 || travel <= 0.0 || !center_y.is_finite() {
        return 0.0;
    }
    let p = ((center_y - height / 2.0) / travel).clamp(0.0, 1.0);
    (p * geometry.scroll_max()).clamp(0.0, geometry.reachable_scroll())
}

fn bar_kind(block: &ChangeBlock, policy: ModifiedBarPolicy) -> BarKind {
    let added = match policy {
        ModifiedBarPolicy::Distinct if block.modified > 0 => return BarKind::Modified,
        ModifiedBarPolicy::Distinct => block.added,
        ModifiedBarPolicy::FoldIntoAddDelete => block.added + block.modified,
    };
    if block.deleted > added {
        BarKind::Deleted
    } else {
        BarKind::Added
    }
}

/// One bar per change block, scaled from content space into the track.
///
/// Tops round down and bottoms round up so partial pixels are never lost; heights respect
/// `min_bar_px` and bars are shifted to stay inside the track.
pub fn change_bars(
    blocks: &ChangeBlocks,
    geometry: &ContentGeometry,
    options: &MinimapOptions,
) -> Vec<ChangeBar> {
    let thumb = thumbnail(options);
    if thumb <= 0.0 || geometry.is_degenerate() {
        return Vec::new();
    }

    let h = geometry.line_height;
    let scale = thumb / geometry.total_px();
    let min = options.min_bar_px.max(0.0).min(thumb);

    blocks
        .iter()
        .enumerate()
        .map(|(idx, block)| {
            let start_px = block.start as f64 * h;
            let block_px = (block.len as f64 * h).max(h);
            let top = (start_px * scale).floor();
            let bottom = ((start_px + block_px) * scale).ceil();
            let height = (bottom - top).max(min).min(thumb);
            let top = top.clamp(0.0, thumb - height);
            ChangeBar {
                block: idx,
                kind: bar_kind(block, options.modified_bars),
                rect: TrackRect { top, height },
            }
        })
        .collect()
}

/// Full minimap geometry for one frame.
pub fn layout(
    blocks: &ChangeBlocks,
    geometry: &ContentGeometry,
    scroll_top: f64,
    options: &MinimapOptions,
) -> MinimapLayout {
    let out = MinimapLayout {
        thumbnail_height: thumbnail(options),
        indicator: indicator_rect(geometry, scroll_top, options),
        bars: change_bars(blocks, geometry, options),
    };
    debug_assert!(
        out.check_bounds(options).is_ok(),
        "minimap geometry out of bounds: {out:?}"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::index_change_blocks;
    use crate::line::PatchLine;

    fn geometry(line_count: usize, container_h: f64) -> ContentGeometry {
        ContentGeometry {
            line_count,
            line_height: 20.0,
            container_h,
        }
    }

    #[test]
    fn indicator_height_is_proportional_and_clamped() {
        let opts = MinimapOptions::default();
        // 100 lines * 20px = 2000px content, 400px visible => 1/5 of 200px.
        assert_eq!(indicator_height(&geometry(100, 400.0), &opts), 40.0);
        // Huge document clamps to the minimum.
        assert_eq!(indicator_height(&geometry(1_000_000, 400.0), &opts), 2.0);
        // Content shorter than the container fills the track.
        assert_eq!(indicator_height(&geometry(5, 400.0), &opts), 200.0);
    }

    #[test]
    fn degenerate_geometry_yields_safe_defaults() {
        let opts = MinimapOptions::default();
        let blocks = {
            let mut lines = vec![PatchLine::added(1, "x")];
            index_change_blocks(&mut lines)
        };
        for g in [geometry(0, 400.0), geometry(10, 0.0)] {
            let l = layout(&blocks, &g, 50.0, &opts);
            assert_eq!(l.indicator, TrackRect::default());
            assert!(l.bars.is_empty());
            assert_eq!(scroll_for_pointer(&g, 10.0, &opts), 0.0);
        }
        let zero_track = MinimapOptions {
            thumbnail_height: 0.0,
            ..opts
        };
        assert_eq!(indicator_height(&geometry(10, 100.0), &zero_track), 0.0);
    }

    #[test]
    fn forward_mapping_hits_both_ends() {
        let opts = MinimapOptions::default();
        let g = geometry(100, 400.0);
        assert_eq!(indicator_top(&g, 0.0, &opts), 0.0);
        assert_eq!(indicator_top(&g, g.scroll_max(), &opts), 160.0);
        assert_eq!(indicator_top(&g, 800.0, &opts), 80.0);
        assert_eq!(indicator_top(&g, 1e9, &opts), 160.0);
    }

    #[test]
    fn pointer_mapping_is_proportional_and_clamped() {
        let opts = MinimapOptions::default();
        let g = geometry(100, 400.0);
        assert_eq!(scroll_for_pointer(&g, 100.0, &opts), 800.0);
        assert_eq!(scroll_for_pointer(&g, -5.0, &opts), 0.0);
        assert_eq!(scroll_for_pointer(&g, 500.0, &opts), 1600.0);
        // Content that fits never scrolls.
        assert_eq!(scroll_for_pointer(&geometry(5, 400.0), 150.0, &opts), 0.0);
    }

    #[test]
    fn indicator_center_inverts_forward_mapping() {
        let opts = MinimapOptions::default();
        let g = geometry(100, 400.0);
        for scroll in [0.0, 240.0, 800.0, 1333.0, 1600.0] {
            let rect = indicator_rect(&g, scroll, &opts);
            let back = scroll_for_indicator_center(&g, rect.top + rect.height / 2.0, &opts);
            assert!((back - scroll).abs() <= g.line_height, "{scroll} -> {back}");
        }
    }

    #[test]
    fn bars_cover_blocks_and_respect_minimum() {
        let opts = MinimapOptions::default();
        let mut lines: Vec<PatchLine> = (1..=1000)
            .map(|n| PatchLine::unchanged(n, n, "x"))
            .collect();
        lines[10] = PatchLine::added(11, "a");
        lines[500] = PatchLine::deleted(501, 501, "d");
        lines[501] = PatchLine::deleted(501, 502, "d");
        let blocks = index_change_blocks(&mut lines);
        let g = geometry(lines.len(), 400.0);
        let bars = change_bars(&blocks, &g, &opts);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].kind, BarKind::Added);
        assert_eq!(bars[1].kind, BarKind::Deleted);
        // line 10 of 1000 on a 200px track: 2.0..2.2 => floor 2, ceil 3, min 2.
        assert_eq!(bars[0].rect, TrackRect { top: 2.0, height: 2.0 });
        assert_eq!(bars[1].rect.top, 100.0);
    }

    #[test]
    fn last_line_bar_stays_inside_track() {
        let opts = MinimapOptions {
            min_bar_px: 5.0,
            ..Default::default()
        };
        let mut lines: Vec<PatchLine> = (1..=999)
            .map(|n| PatchLine::unchanged(n, n, "x"))
            .collect();
        lines.push(PatchLine::added(1000, "tail"));
        let blocks = index_change_blocks(&mut lines);
        let g = geometry(lines.len(), 400.0);
        let l = layout(&blocks, &g, 0.0, &opts);
        assert_eq!(l.bars[0].rect.bottom(), 200.0);
        assert_eq!(l.bars[0].rect.height, 5.0);
        assert!(l.check_bounds(&opts).is_ok());
    }

    #[test]
    fn modified_policy_controls_bar_kind() {
        let block = ChangeBlock {
            start: 0,
            len: 3,
            added: 0,
            deleted: 1,
            modified: 2,
        };
        assert_eq!(
            bar_kind(&block, ModifiedBarPolicy::FoldIntoAddDelete),
            BarKind::Added
        );
        assert_eq!(bar_kind(&block, ModifiedBarPolicy::Distinct), BarKind::Modified);
    }

    #[test]
    fn bounds_hold_across_geometries() {
        let opts = MinimapOptions {
            thumbnail_height: 37.0,
            min_indicator_px: 3.0,
            min_bar_px: 1.5,
            ..Default::default()
        };
        for count in [0usize, 1, 2, 7, 50, 999, 20_000] {
            let mut lines: Vec<PatchLine> = (0..count)
                .map(|i| {
                    let n = i as u32 + 1;
                    if i % 3 == 0 {
                        PatchLine::added(n, "a")
                    } else {
                        PatchLine::unchanged(n, n, "u")
                    }
                })
                .collect();
            let blocks = index_change_blocks(&mut lines);
            for container in [0.0, 15.0, 400.0, 1e6] {
                let g = geometry(count, container);
                for scroll in [0.0, 10.0, g.scroll_max() / 2.0, g.scroll_max(), 1e12] {
                    let l = layout(&blocks, &g, scroll, &opts);
                    assert_eq!(l.check_bounds(&opts), Ok(()));
                }
            }
        }
    }
}
