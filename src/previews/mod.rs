//! Off-thread preview pipeline for grid tiles and the lightbox.
//!
//! - `decode` - decodes a photo and fits it inside a maximum edge
//! - `PreviewCache` - byte-bounded LRU memory cache
//! - `PreviewQueue` - worker pool feeding results back to the main loop

pub mod cache;
pub mod decode;
pub mod queue;

pub use cache::{Preview, PreviewCache, PreviewKey};
pub use decode::{decode_preview, fit_within};
pub use queue::{PreviewQueue, PreviewRequest, PreviewResult};
