pub mod config;
pub mod constants;
pub mod geo;
pub mod viewport;

pub use config::{GameOptions, GameProfile, InteractionOptions, ViewportOptions};
pub use geo::{GeoPoint, Point, TileIndex};
pub use viewport::{GridTile, PanDirection, TileGrid, Viewport};
