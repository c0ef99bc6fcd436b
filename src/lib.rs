//! # mapguess
//!
//! Engine for a location-guessing game played on a slippy map.
//!
//! The crate covers Web Mercator tile math, great-circle scoring, a
//! draggable viewport over a tile grid, pointer gesture disambiguation and
//! the round state machine. Rendering and tile transport are left to the
//! host, which feeds [`InputEvent`]s into a [`GameSession`] and draws what
//! it reports.

pub mod core;
pub mod game;
pub mod input;
pub mod prelude;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{GameOptions, GameProfile},
    geo::{GeoPoint, Point, TileIndex},
    viewport::{PanDirection, TileGrid, Viewport},
};

pub use game::{
    location::{Location, LocationSet},
    round::{GameSummary, RoundPhase, RoundState},
    scoring::RoundResult,
    session::{GameSession, Marker, MarkerKind},
};

pub use input::{
    events::{ControlAction, GameEvent, InputEvent, KeyCode},
    gestures::GestureRecognizer,
};

pub use tiles::{TileSource, TileStore};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, GameError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("No location for round {0}")]
    LocationsExhausted(u32),

    #[error("Tile error: {0}")]
    Tile(String),
}

/// Error type alias for convenience
pub type Error = GameError;
