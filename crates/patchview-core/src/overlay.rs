use crate::minimap::TrackRect;

/// Absolute rectangle in the host's coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OverlayRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A fixed-position layer for the minimap indicator, kept outside the main layout tree.
///
/// Each frame the engine measures where the track currently sits on screen and paints the
/// indicator at the matching absolute position.
pub trait IndicatorOverlay {
    /// Current on-screen bounds of the minimap track.
    fn measure(&self) -> OverlayRect;

    fn paint(&mut self, rect: OverlayRect);
}

/// Maps an indicator in track space onto the measured track bounds.
///
/// Track space spans `thumbnail_height`; when the measured track is taller or shorter the
/// indicator is scaled to match.
pub fn place_indicator(track: OverlayRect, indicator: TrackRect, thumbnail_height: f64) -> OverlayRect {
    let scale = if thumbnail_height > 0.0 {
        track.height / thumbnail_height
    } else {
        0.0
    };
    OverlayRect {
        x: track.x,
        y: track.y + indicator.top * scale,
        width: track.width,
        height: indicator.height * scale,
    }
}
