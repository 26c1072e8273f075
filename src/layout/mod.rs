//! Grid geometry for the gallery.

pub mod span_grid;

pub use span_grid::SpanGridLayout;
