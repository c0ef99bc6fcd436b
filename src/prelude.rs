//! Prelude module for common mapguess types
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapguess::prelude::*;`

pub use crate::core::{
    config::{GameOptions, GameProfile, InteractionOptions, ViewportOptions},
    geo::{tile_fraction, to_geo_point, to_tile, GeoPoint, Point, TileIndex},
    viewport::{GridTile, PanDirection, TileGrid, Viewport},
};

pub use crate::game::{
    location::{Location, LocationSet},
    round::{GameSummary, RoundPhase, RoundState},
    scoring::{great_circle_distance_km, score_for_distance, RoundResult},
    session::{GameSession, Marker, MarkerKind},
};

pub use crate::input::{
    events::{ControlAction, GameEvent, InputEvent, KeyCode, TouchEventType, TouchPoint},
    gestures::{GestureConfig, GestureOutcome, GestureRecognizer},
    handler::EventManager,
};

pub use crate::tiles::{
    cache::{TileImage, TileProvider, TileStore},
    source::{OpenStreetMapSource, TileSource, UrlTemplateSource},
};

pub use crate::{Error as GameError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
