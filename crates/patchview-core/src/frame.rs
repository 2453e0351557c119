/// Single-slot coalescing of state writes to at most one application per render tick.
///
/// Writers call [`schedule`](Self::schedule) as often as they like; only the latest value
/// survives. The first schedule after a flush returns `true`, telling the host to request a
/// frame; later ones piggyback on that request. Values equal to what was last applied are
/// dropped without requesting a frame.
#[derive(Clone, Debug)]
pub struct FrameScheduler<T> {
    pending: Option<T>,
    applied: Option<T>,
    requested: bool,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            pending: None,
            applied: None,
            requested: false,
        }
    }
}

impl<T: Clone + PartialEq> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` as the desired state. Returns `true` if a frame must be requested.
    pub fn schedule(&mut self, value: T) -> bool {
        if !self.requested && self.applied.as_ref() == Some(&value) {
            return false;
        }
        self.pending = Some(value);
        if self.requested {
            return false;
        }
        self.requested = true;
        true
    }

    /// Whether a frame has been requested and not yet flushed.
    pub fn is_pending(&self) -> bool {
        self.requested
    }

    /// Takes the latest scheduled value for this frame, skipping it if nothing changed.
    pub fn flush(&mut self) -> Option<T> {
        self.requested = false;
        let value = self.pending.take()?;
        if self.applied.as_ref() == Some(&value) {
            return None;
        }
        self.applied = Some(value.clone());
        Some(value)
    }

    pub fn last_applied(&self) -> Option<&T> {
        self.applied.as_ref()
    }

    /// Forgets both the pending and the applied value, so the next schedule always paints.
    pub fn reset(&mut self) {
        self.pending = None;
        self.applied = None;
        self.requested = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalesces_to_latest_value() {
        let mut s = FrameScheduler::new();
        assert!(s.schedule(1));
        assert!(!s.schedule(2));
        assert!(!s.schedule(3));
        assert!(s.is_pending());
        assert_eq!(s.flush(), Some(3));
        assert!(!s.is_pending());
        assert_eq!(s.flush(), None);
    }

    #[test]
    fn skips_redundant_writes() {
        let mut s = FrameScheduler::new();
        assert!(s.schedule(7));
        assert_eq!(s.flush(), Some(7));
        assert!(!s.schedule(7));
        assert!(!s.is_pending());

        // Bouncing back to the applied value inside one frame is a no-op at flush time.
        assert!(s.schedule(8));
        assert!(!s.schedule(7));
        assert_eq!(s.flush(), None);
        assert_eq!(s.last_applied(), Some(&7));
    }

    #[test]
    fn reset_forces_next_paint() {
        let mut s = FrameScheduler::new();
        s.schedule(1);
        s.flush();
        s.reset();
        assert!(s.schedule(1));
        assert_eq!(s.flush(), Some(1));
    }
}
