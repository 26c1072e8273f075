//! Horizontal swipe detection for lightbox navigation.

/// Minimum horizontal travel, in pixels, for a drag to count as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD_PX: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved left: show the following photo
    Next,
    /// Finger moved right: show the preceding photo
    Previous,
}

/// Classifies a finished drag by its total offset.
///
/// The horizontal distance must exceed `threshold` and dominate the
/// vertical distance; anything else is a tap or a scroll attempt.
pub fn classify(dx: f64, dy: f64, threshold: f64) -> Option<SwipeDirection> {
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }
    if dx.abs() <= threshold || dx.abs() <= dy.abs() {
        return None;
    }
    if dx < 0.0 {
        Some(SwipeDirection::Next)
    } else {
        Some(SwipeDirection::Previous)
    }
}

/// Travel, in pixels, under which a press and release still count as a tap.
pub const TAP_SLOP_PX: f64 = 8.0;

/// Returns `threshold` if usable, else the default.
pub fn sanitize_threshold(threshold: f64) -> f64 {
    if threshold.is_finite() && threshold > 0.0 {
        threshold
    } else {
        DEFAULT_SWIPE_THRESHOLD_PX
    }
}

/// Tracks a single drag sequence from press to release.
///
/// Besides classifying the release, it remembers whether the pointer left
/// the tap slop, so a drag that ends over the backdrop is not also taken
/// as a click there.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f64,
    origin: Option<(f64, f64)>,
    moved: bool,
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: sanitize_threshold(threshold),
            origin: None,
            moved: false,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn begin(&mut self, x: f64, y: f64) {
        self.origin = Some((x, y));
        self.moved = false;
    }

    /// Records pointer motion; returns whether the sequence is a drag.
    pub fn update(&mut self, x: f64, y: f64) -> bool {
        if let Some((ox, oy)) = self.origin {
            if (x - ox).hypot(y - oy) > TAP_SLOP_PX {
                self.moved = true;
            }
        }
        self.moved
    }

    /// Ends the sequence; returns a direction if it was a swipe.
    pub fn finish(&mut self, x: f64, y: f64) -> Option<SwipeDirection> {
        self.update(x, y);
        let (ox, oy) = self.origin.take()?;
        classify(x - ox, y - oy, self.threshold)
    }

    pub fn cancel(&mut self) {
        self.origin = None;
        self.moved = false;
    }

    pub fn is_tracking(&self) -> bool {
        self.origin.is_some()
    }

    /// Whether the current or last sequence left the tap slop.
    pub fn has_moved(&self) -> bool {
        self.moved
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD_PX)
    }
}
