//! Gallery controller: category filter, displayed list and lightbox.
//!
//! `GalleryView` is the whole interactive state of one mounted gallery. It is
//! toolkit-independent and synchronous; the UI forwards clicks, key presses
//! and drag gestures here and re-renders from the accessors afterwards.

pub mod filter;
pub mod lightbox;
pub mod scroll_lock;
pub mod swipe;

pub use filter::{count_label, ordinal_label, CategoryFilter};
pub use lightbox::{CloseReason, Lightbox, LightboxState};
pub use scroll_lock::{ScrollLock, ScrollSurface};
pub use swipe::{SwipeDirection, SwipeTracker, DEFAULT_SWIPE_THRESHOLD_PX};

use tracing::{debug, info};

use crate::error::GalleryError;
use crate::models::{Catalog, Photo};

/// Keys the lightbox reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxKey {
    Cancel,
    Previous,
    Next,
}

/// Presentation options of the grid.
#[derive(Debug, Clone, Default)]
pub struct GalleryOptions {
    /// Show each photo's description under its tile
    pub detailed: bool,
    /// Truncate the displayed list to the first N photos after filtering
    pub limit: Option<usize>,
    pub swipe_threshold_px: Option<f64>,
}

/// Snapshot of the per-session view state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GalleryViewState {
    pub filter: CategoryFilter,
    pub open_index: Option<usize>,
}

pub struct GalleryView<S: ScrollSurface + Clone> {
    catalog: Catalog,
    categories: Vec<CategoryFilter>,
    filter: CategoryFilter,
    detailed: bool,
    limit: Option<usize>,
    swipe: SwipeTracker,
    /// Catalog indices of the displayed photos
    displayed: Vec<usize>,
    lightbox: Lightbox<S>,
    scroll_surface: S,
}

impl<S: ScrollSurface + Clone> GalleryView<S> {
    pub fn new(catalog: Catalog, options: GalleryOptions, scroll_surface: S) -> Self {
        let categories = filter::derive_categories(catalog.photos());
        let filter = CategoryFilter::All;
        let displayed = filter::displayed_indices(catalog.photos(), &filter, options.limit);
        info!(
            photos = catalog.len(),
            categories = categories.len() - 1,
            "Gallery mounted"
        );
        Self {
            catalog,
            categories,
            filter,
            detailed: options.detailed,
            limit: options.limit,
            swipe: SwipeTracker::new(
                options
                    .swipe_threshold_px
                    .unwrap_or(DEFAULT_SWIPE_THRESHOLD_PX),
            ),
            displayed,
            lightbox: Lightbox::new(),
            scroll_surface,
        }
    }

    pub fn categories(&self) -> &[CategoryFilter] {
        &self.categories
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn is_detailed(&self) -> bool {
        self.detailed
    }

    pub fn state(&self) -> GalleryViewState {
        GalleryViewState {
            filter: self.filter.clone(),
            open_index: self.lightbox.index(),
        }
    }

    pub fn is_lightbox_open(&self) -> bool {
        self.lightbox.is_open()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.lightbox.is_scroll_locked()
    }

    /// Photos currently shown, in display order.
    pub fn displayed(&self) -> Vec<&Photo> {
        let photos = self.catalog.photos();
        self.displayed.iter().map(|&i| &photos[i]).collect()
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed.len()
    }

    pub fn photo_at(&self, position: usize) -> Option<&Photo> {
        self.displayed
            .get(position)
            .map(|&i| &self.catalog.photos()[i])
    }

    pub fn count_label(&self) -> String {
        count_label(self.displayed.len())
    }

    /// Switches the category filter.
    ///
    /// Returns whether the filter changed. Unknown categories are rejected
    /// and leave the state untouched.
    pub fn select_filter(&mut self, filter: CategoryFilter) -> Result<bool, GalleryError> {
        if !self.categories.contains(&filter) {
            return Err(GalleryError::UnknownCategory(filter.label().to_string()));
        }
        if filter == self.filter {
            return Ok(false);
        }
        debug!(filter = %filter, "Filter selected");
        self.filter = filter;
        self.refresh_displayed();
        Ok(true)
    }

    /// Selects a filter by its label ("All" or a category name).
    pub fn select_filter_label(&mut self, label: &str) -> Result<bool, GalleryError> {
        let filter = self
            .categories
            .iter()
            .find(|c| c.label() == label)
            .cloned()
            .ok_or_else(|| GalleryError::UnknownCategory(label.to_string()))?;
        self.select_filter(filter)
    }

    pub fn set_limit(&mut self, limit: Option<usize>) {
        if self.limit != limit {
            self.limit = limit;
            self.refresh_displayed();
        }
    }

    /// Recomputes the displayed list and keeps the lightbox pointing at the
    /// same photo, or closes it when that photo is gone.
    fn refresh_displayed(&mut self) {
        let open_photo = self
            .lightbox
            .index()
            .and_then(|index| self.displayed.get(index).copied());

        self.displayed =
            filter::displayed_indices(self.catalog.photos(), &self.filter, self.limit);

        if !self.lightbox.is_open() {
            return;
        }
        match open_photo.and_then(|catalog_index| {
            self.displayed.iter().position(|&i| i == catalog_index)
        }) {
            Some(position) => {
                debug!(position, "Lightbox follows open photo into new list");
                self.lightbox.reposition(position, self.displayed.len());
            }
            None => {
                self.lightbox.close(CloseReason::Reconciled);
            }
        }
    }

    /// Grid item activated: open the lightbox at displayed `position`.
    pub fn activate(&mut self, position: usize) -> bool {
        self.lightbox.open(
            position,
            self.displayed.len(),
            self.scroll_surface.clone(),
        )
    }

    pub fn next(&mut self) -> Option<usize> {
        self.lightbox.next(self.displayed.len())
    }

    pub fn prev(&mut self) -> Option<usize> {
        self.lightbox.prev(self.displayed.len())
    }

    pub fn close(&mut self, reason: CloseReason) -> bool {
        self.lightbox.close(reason)
    }

    /// Tears the view down: the lightbox closes and the scroll lock is released.
    pub fn unmount(&mut self) {
        self.lightbox.close(CloseReason::Unmount);
    }

    /// Dispatches a key press. Returns whether it was consumed; keys are
    /// ignored while the lightbox is closed.
    pub fn handle_key(&mut self, key: LightboxKey) -> bool {
        if !self.lightbox.is_open() {
            return false;
        }
        match key {
            LightboxKey::Cancel => self.close(CloseReason::Cancel),
            LightboxKey::Previous => self.prev().is_some(),
            LightboxKey::Next => self.next().is_some(),
        }
    }

    /// Pointer pressed on the open photo. Ignored while closed.
    pub fn begin_drag(&mut self, x: f64, y: f64) {
        if self.lightbox.is_open() {
            self.swipe.begin(x, y);
        } else {
            self.swipe.cancel();
        }
    }

    /// Pointer moved; returns whether the sequence has become a drag
    /// rather than a tap.
    pub fn update_drag(&mut self, x: f64, y: f64) -> bool {
        self.swipe.update(x, y)
    }

    /// Pointer released; navigates if the drag was a swipe.
    pub fn end_drag(&mut self, x: f64, y: f64) -> Option<usize> {
        let direction = self.swipe.finish(x, y)?;
        if !self.lightbox.is_open() {
            return None;
        }
        match direction {
            SwipeDirection::Next => self.next(),
            SwipeDirection::Previous => self.prev(),
        }
    }

    /// Whether the last pointer sequence was a drag, so its release must
    /// not also count as a click.
    pub fn drag_moved(&self) -> bool {
        self.swipe.has_moved()
    }

    /// Photo shown in the lightbox, if open.
    pub fn open_photo(&self) -> Option<&Photo> {
        self.lightbox.index().and_then(|i| self.photo_at(i))
    }

    /// 1-based "position / total" of the open photo.
    pub fn position_label(&self) -> Option<String> {
        self.lightbox
            .index()
            .map(|i| format!("{} / {}", i + 1, self.displayed.len()))
    }
}

impl<S: ScrollSurface + Clone> std::fmt::Debug for GalleryView<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryView")
            .field("filter", &self.filter)
            .field("displayed", &self.displayed.len())
            .field("lightbox", &self.lightbox)
            .finish()
    }
}
