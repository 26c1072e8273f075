//! Lightbox state machine: `Closed` or `Open(index)` over the displayed list.
//!
//! The lightbox owns the scroll lock while open. Every transition back to
//! `Closed` drops the lock guard, and so does dropping the lightbox itself.

use tracing::{debug, warn};

use super::scroll_lock::{ScrollLock, ScrollSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightboxState {
    #[default]
    Closed,
    Open {
        index: usize,
    },
}

/// Why the lightbox went back to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Button,
    Backdrop,
    Cancel,
    Unmount,
    /// The displayed list changed and the open photo is no longer in it
    Reconciled,
}

/// `(index + 1) mod len`
pub fn next_index(index: usize, len: usize) -> Option<usize> {
    (len > 0).then(|| (index + 1) % len)
}

/// `(index + len - 1) mod len`
pub fn prev_index(index: usize, len: usize) -> Option<usize> {
    (len > 0).then(|| (index % len + len - 1) % len)
}

pub struct Lightbox<S: ScrollSurface> {
    state: LightboxState,
    lock: Option<ScrollLock<S>>,
}

impl<S: ScrollSurface> Lightbox<S> {
    pub fn new() -> Self {
        Self {
            state: LightboxState::Closed,
            lock: None,
        }
    }

    pub fn state(&self) -> LightboxState {
        self.state
    }

    pub fn index(&self) -> Option<usize> {
        match self.state {
            LightboxState::Closed => None,
            LightboxState::Open { index } => Some(index),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LightboxState::Open { .. })
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.lock.is_some()
    }

    /// Opens at `index`, locking `surface` unless already locked.
    ///
    /// Returns false (and leaves the state untouched) when `index` is not
    /// inside a list of `len` photos.
    pub fn open(&mut self, index: usize, len: usize, surface: S) -> bool {
        if index >= len {
            warn!(index, len, "Ignoring lightbox open outside displayed list");
            return false;
        }
        if self.lock.is_none() {
            self.lock = Some(ScrollLock::acquire(surface));
        }
        self.state = LightboxState::Open { index };
        debug!(index, "Lightbox open");
        true
    }

    pub fn next(&mut self, len: usize) -> Option<usize> {
        self.step(len, next_index)
    }

    pub fn prev(&mut self, len: usize) -> Option<usize> {
        self.step(len, prev_index)
    }

    fn step(&mut self, len: usize, f: fn(usize, usize) -> Option<usize>) -> Option<usize> {
        let index = self.index()?;
        if index >= len {
            self.close(CloseReason::Reconciled);
            return None;
        }
        let target = f(index, len)?;
        self.state = LightboxState::Open { index: target };
        debug!(from = index, to = target, "Lightbox step");
        Some(target)
    }

    /// Moves an open lightbox to `index` without touching the lock.
    pub(crate) fn reposition(&mut self, index: usize, len: usize) {
        if !self.is_open() {
            return;
        }
        if index < len {
            self.state = LightboxState::Open { index };
        } else {
            self.close(CloseReason::Reconciled);
        }
    }

    /// Returns false when already closed.
    pub fn close(&mut self, reason: CloseReason) -> bool {
        let was_open = self.is_open();
        self.state = LightboxState::Closed;
        self.lock = None;
        if was_open {
            debug!(?reason, "Lightbox closed");
        }
        was_open
    }
}

impl<S: ScrollSurface> Default for Lightbox<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ScrollSurface> Drop for Lightbox<S> {
    fn drop(&mut self) {
        self.close(CloseReason::Unmount);
    }
}

impl<S: ScrollSurface> std::fmt::Debug for Lightbox<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lightbox")
            .field("state", &self.state)
            .field("scroll_locked", &self.lock.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::super::scroll_lock::testing::RecordingSurface;
    use super::*;

    #[test]
    fn test_index_arithmetic() {
        assert_eq!(next_index(0, 3), Some(1));
        assert_eq!(next_index(2, 3), Some(0));
        assert_eq!(prev_index(0, 3), Some(2));
        assert_eq!(prev_index(2, 3), Some(1));
        assert_eq!(next_index(0, 0), None);
        assert_eq!(prev_index(0, 0), None);
    }

    #[test]
    fn test_next_n_times_is_identity() {
        let surface = RecordingSurface::default();
        for len in 1..6 {
            for start in 0..len {
                let mut lightbox = Lightbox::new();
                assert!(lightbox.open(start, len, surface.clone()));
                for _ in 0..len {
                    lightbox.next(len);
                }
                assert_eq!(lightbox.index(), Some(start));
            }
        }
    }

    #[test]
    fn test_prev_from_zero_wraps() {
        let mut lightbox = Lightbox::new();
        lightbox.open(0, 4, RecordingSurface::default());
        assert_eq!(lightbox.prev(4), Some(3));
    }

    #[test]
    fn test_single_item_self_loop() {
        let mut lightbox = Lightbox::new();
        lightbox.open(0, 1, RecordingSurface::default());
        assert_eq!(lightbox.next(1), Some(0));
        assert_eq!(lightbox.prev(1), Some(0));
    }

    #[test]
    fn test_open_out_of_range_ignored() {
        let surface = RecordingSurface::default();
        let mut lightbox = Lightbox::new();
        assert!(!lightbox.open(3, 3, surface.clone()));
        assert_eq!(lightbox.state(), LightboxState::Closed);
        assert!(!surface.is_locked());
    }

    #[test]
    fn test_navigation_when_closed_is_noop() {
        let mut lightbox: Lightbox<RecordingSurface> = Lightbox::new();
        assert_eq!(lightbox.next(3), None);
        assert_eq!(lightbox.prev(3), None);
        assert!(!lightbox.close(CloseReason::Button));
    }

    #[test]
    fn test_stale_index_auto_closes() {
        let surface = RecordingSurface::default();
        let mut lightbox = Lightbox::new();
        lightbox.open(4, 5, surface.clone());
        assert_eq!(lightbox.next(2), None);
        assert_eq!(lightbox.state(), LightboxState::Closed);
        assert!(!surface.is_locked());
    }

    #[test]
    fn test_every_close_path_releases_lock() {
        let reasons = [
            CloseReason::Button,
            CloseReason::Backdrop,
            CloseReason::Cancel,
            CloseReason::Unmount,
            CloseReason::Reconciled,
        ];
        for reason in reasons {
            let surface = RecordingSurface::default();
            let mut lightbox = Lightbox::new();
            lightbox.open(1, 3, surface.clone());
            assert!(surface.is_locked());
            assert!(lightbox.is_scroll_locked());
            assert!(lightbox.close(reason));
            assert!(!surface.is_locked(), "{:?} left scroll locked", reason);
        }
    }

    #[test]
    fn test_drop_while_open_releases_lock() {
        let surface = RecordingSurface::default();
        {
            let mut lightbox = Lightbox::new();
            lightbox.open(0, 2, surface.clone());
            assert!(surface.is_locked());
        }
        assert!(!surface.is_locked());
    }

    #[test]
    fn test_reopen_does_not_stack_locks() {
        let surface = RecordingSurface::default();
        let mut lightbox = Lightbox::new();
        lightbox.open(0, 3, surface.clone());
        lightbox.open(2, 3, surface.clone());
        assert_eq!(surface.toggles.get(), 1);
        lightbox.close(CloseReason::Cancel);
        assert!(!surface.is_locked());
        assert_eq!(surface.toggles.get(), 2);
    }
}
