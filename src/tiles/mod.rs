pub mod cache;
pub mod source;

// Re-exports for convenience
pub use cache::{TileImage, TileProvider, TileStore};
pub use source::{OpenStreetMapSource, TileSource, UrlTemplateSource};
