use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Widest span a photo may request in the catalog.
pub const MAX_SPAN: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub u32);

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Number of grid columns a tile wants to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSpan(u8);

impl LayoutSpan {
    pub const SINGLE: Self = Self(1);

    /// Returns `None` outside `1..=MAX_SPAN`.
    pub fn new(columns: u8) -> Option<Self> {
        (1..=MAX_SPAN).contains(&columns).then_some(Self(columns))
    }

    pub fn columns(self) -> u8 {
        self.0
    }

    /// Span actually usable in a grid with `columns` columns.
    pub fn clamped(self, columns: u32) -> u32 {
        u32::from(self.0).min(columns.max(1))
    }
}

impl Default for LayoutSpan {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// A single portfolio photo. Never mutated once the catalog is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: PhotoId,
    /// Image file, already resolved against the catalog directory
    pub src: PathBuf,
    pub title: String,
    pub category: String,
    pub span: LayoutSpan,
    pub description: String,
    pub width: u32,
    pub height: u32,
}

impl Photo {
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// "4000 × 2667 px"
    pub fn dimensions_label(&self) -> String {
        format!("{} × {} px", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_bounds() {
        assert!(LayoutSpan::new(0).is_none());
        assert_eq!(LayoutSpan::new(2).map(LayoutSpan::columns), Some(2));
        assert!(LayoutSpan::new(MAX_SPAN + 1).is_none());
    }

    #[test]
    fn test_span_clamped_to_grid() {
        let span = LayoutSpan::new(3).unwrap();
        assert_eq!(span.clamped(3), 3);
        assert_eq!(span.clamped(2), 2);
        assert_eq!(span.clamped(0), 1);
    }

    #[test]
    fn test_dimensions_label() {
        let photo = Photo {
            id: PhotoId(1),
            src: PathBuf::from("a.jpg"),
            title: "Stillness".into(),
            category: "Architecture".into(),
            span: LayoutSpan::SINGLE,
            description: String::new(),
            width: 1600,
            height: 1000,
        };
        assert_eq!(photo.dimensions_label(), "1600 × 1000 px");
        assert!((photo.aspect_ratio() - 1.6).abs() < f32::EPSILON);
    }
}
