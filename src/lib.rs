//! Telos: a curated photography portfolio with category filtering and a
//! lightbox viewer.
//!
//! The gallery core (catalog, filtering, lightbox state, layout, previews)
//! is toolkit-independent. The GTK4 front-end lives behind the `gui` feature.

pub mod config;
pub mod error;
pub mod gallery;
pub mod image_loader;
pub mod layout;
pub mod models;
pub mod previews;

#[cfg(feature = "gui")]
pub mod ui;

pub use config::AppConfig;
pub use error::{CatalogError, ConfigError, GalleryError};
pub use gallery::{GalleryOptions, GalleryView};
pub use models::{Catalog, Photo, PhotoId};
