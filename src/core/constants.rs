//! Core constants for the tile scheme, the viewport and the scoring rules.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Lowest zoom level the viewport will settle on.
pub const MIN_ZOOM: u8 = 2;

/// Highest zoom level the viewport will settle on.
pub const MAX_ZOOM: u8 = 18;

/// Zoom level restored at game start and between rounds.
pub const DEFAULT_ZOOM: u8 = 3;

/// Latitude of the map center restored at game start and between rounds.
pub const DEFAULT_CENTER_LAT: f64 = 20.0;

/// Longitude of the map center restored at game start and between rounds.
pub const DEFAULT_CENTER_LNG: f64 = 0.0;

/// Extra tiles kept around the visible area on every side.
pub const TILE_MARGIN: u32 = 1;

/// Pan step at zoom 0, in degrees. Halves with every zoom level.
pub const PAN_STEP_DEGREES: f64 = 100.0;

/// Latitude limit of the Web Mercator square.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Mean Earth radius used by the distance formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Points awarded for a perfect guess.
pub const MAX_ROUND_SCORE: u32 = 5000;

/// Points lost per kilometre of error.
pub const POINTS_PER_KM: f64 = 2.0;

/// Rounds in a classic game.
pub const DEFAULT_TOTAL_ROUNDS: u32 = 5;

/// Rounds in a quick game.
pub const QUICK_TOTAL_ROUNDS: u32 = 3;

/// Pointer travel (px) that turns a press into a drag.
pub const DRAG_THRESHOLD_PX: f64 = 4.0;

/// Largest viewport extent (px) the tile grid is built for.
pub const MAX_VIEWPORT_PX: f64 = 16384.0;

/// Fraction of the viewport a marker may sit outside the edge and still be shown.
pub const MARKER_VISIBILITY_MARGIN: f64 = 0.1;

/// Fetch URL template used when no other tile source is configured.
pub const DEFAULT_TILE_URL_TEMPLATE: &str = "/api/map/{z}/{x}/{y}";
