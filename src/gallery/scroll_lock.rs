//! Scoped suppression of page scrolling while the lightbox is open.

use tracing::debug;

/// Something whose scrolling can be switched off and on again.
pub trait ScrollSurface {
    fn set_scroll_locked(&self, locked: bool);
}

/// Holds the scroll lock for as long as it lives.
///
/// Acquiring locks the surface; dropping the guard unlocks it, so every
/// path that discards the guard (close, navigation away, unmount, unwinding)
/// releases the lock.
#[must_use = "the scroll lock is released as soon as the guard is dropped"]
pub struct ScrollLock<S: ScrollSurface> {
    surface: S,
}

impl<S: ScrollSurface> ScrollLock<S> {
    pub fn acquire(surface: S) -> Self {
        surface.set_scroll_locked(true);
        debug!("Scroll lock acquired");
        Self { surface }
    }
}

impl<S: ScrollSurface> Drop for ScrollLock<S> {
    fn drop(&mut self) {
        self.surface.set_scroll_locked(false);
        debug!("Scroll lock released");
    }
}

impl<S: ScrollSurface> std::fmt::Debug for ScrollLock<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollLock").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ScrollSurface;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Records lock state and how many times it was toggled.
    #[derive(Clone, Default)]
    pub struct RecordingSurface {
        pub locked: Rc<Cell<bool>>,
        pub toggles: Rc<Cell<u32>>,
    }

    impl RecordingSurface {
        pub fn is_locked(&self) -> bool {
            self.locked.get()
        }
    }

    impl ScrollSurface for RecordingSurface {
        fn set_scroll_locked(&self, locked: bool) {
            self.locked.set(locked);
            self.toggles.set(self.toggles.get() + 1);
        }
    }
}
