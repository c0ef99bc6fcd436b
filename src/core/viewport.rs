use crate::{
    core::{
        config::ViewportOptions,
        constants::MAX_VIEWPORT_PX,
        geo::{tile_fraction, to_geo_point, GeoPoint, Point, TileIndex},
    },
    prelude::HashMap,
    tiles::source::{TileSource, UrlTemplateSource},
    Error,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

/// Direction of a button or keyboard pan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanDirection {
    Left,
    Right,
    Up,
    Down,
}

impl PanDirection {
    /// Unit step as (latitude, longitude) signs
    fn unit(&self) -> (f64, f64) {
        match self {
            PanDirection::Left => (0.0, -1.0),
            PanDirection::Right => (0.0, 1.0),
            PanDirection::Up => (1.0, 0.0),
            PanDirection::Down => (-1.0, 0.0),
        }
    }

    pub fn opposite(&self) -> PanDirection {
        match self {
            PanDirection::Left => PanDirection::Right,
            PanDirection::Right => PanDirection::Left,
            PanDirection::Up => PanDirection::Down,
            PanDirection::Down => PanDirection::Up,
        }
    }
}

impl FromStr for PanDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(PanDirection::Left),
            "right" => Ok(PanDirection::Right),
            "up" => Ok(PanDirection::Up),
            "down" => Ok(PanDirection::Down),
            other => Err(Error::Config(format!("unknown pan direction '{}'", other))),
        }
    }
}

impl fmt::Display for PanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PanDirection::Left => "left",
            PanDirection::Right => "right",
            PanDirection::Up => "up",
            PanDirection::Down => "down",
        };
        f.write_str(name)
    }
}

const MAX_GRID_MARGIN: u32 = 16;

/// Pixel extent limited to `[0, MAX_VIEWPORT_PX]`; NaN counts as zero
fn clamp_extent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, MAX_VIEWPORT_PX)
    }
}

/// One cell of the tile grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridTile {
    /// Position in the grid's own tile space; identity of the cell
    pub raw: TileIndex,
    /// Address handed to the tile provider: `x` wrapped, `y` clamped
    pub fetch: TileIndex,
    pub url: String,
    pub column: u32,
    pub row: u32,
}

/// Tiles covering the viewport plus a margin, keyed by their raw index.
///
/// The grid carries its own width and height so layout never has to be
/// derived from the tile count.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    zoom: u8,
    origin: TileIndex,
    columns: u32,
    rows: u32,
    tile_size: u32,
    tiles: HashMap<TileIndex, GridTile>,
}

impl TileGrid {
    /// Builds the grid for a `width` x `height` pixel viewport centred on `center`
    pub fn compute(
        center: &GeoPoint,
        zoom: u8,
        width: f64,
        height: f64,
        tile_size: u32,
        margin: u32,
        source: &dyn TileSource,
    ) -> Self {
        let center_tile = TileIndex::from_geo_point(center, zoom);
        let ts = tile_size.max(1) as f64;
        let margin = margin.min(MAX_GRID_MARGIN) as i64;

        let half_cols = (clamp_extent(width) / 2.0 / ts).ceil() as i64 + margin;
        let half_rows = (clamp_extent(height) / 2.0 / ts).ceil() as i64 + margin;
        let columns = (2 * half_cols + 1) as u32;
        let rows = (2 * half_rows + 1) as u32;
        let origin = TileIndex::new(center_tile.x - half_cols, center_tile.y - half_rows, zoom);

        let mut tiles = HashMap::default();
        tiles.reserve((columns * rows) as usize);
        for column in 0..columns {
            for row in 0..rows {
                let raw = TileIndex::new(origin.x + column as i64, origin.y + row as i64, zoom);
                let fetch = raw.normalized();
                tiles.insert(
                    raw,
                    GridTile {
                        raw,
                        fetch,
                        url: source.url(fetch),
                        column,
                        row,
                    },
                );
            }
        }

        Self {
            zoom,
            origin,
            columns,
            rows,
            tile_size,
            tiles,
        }
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Raw index of the top-left cell
    pub fn origin(&self) -> TileIndex {
        self.origin
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Raw index of the cell the grid was centred on
    pub fn center_tile(&self) -> TileIndex {
        TileIndex::new(
            self.origin.x + (self.columns / 2) as i64,
            self.origin.y + (self.rows / 2) as i64,
            self.zoom,
        )
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, raw: &TileIndex) -> Option<&GridTile> {
        self.tiles.get(raw)
    }

    pub fn contains(&self, raw: &TileIndex) -> bool {
        self.tiles.contains_key(raw)
    }

    /// Cells in column-major order, left to right then top to bottom
    pub fn iter(&self) -> impl Iterator<Item = &GridTile> + '_ {
        (0..self.columns).flat_map(move |column| {
            (0..self.rows).filter_map(move |row| {
                let raw = TileIndex::new(
                    self.origin.x + column as i64,
                    self.origin.y + row as i64,
                    self.zoom,
                );
                self.tiles.get(&raw)
            })
        })
    }

    /// Grid extent in pixels
    pub fn pixel_size(&self) -> Point {
        Point::new(
            (self.columns * self.tile_size) as f64,
            (self.rows * self.tile_size) as f64,
        )
    }

    /// Whether the grid spans the `width` x `height` area around `center`
    /// plus `margin` whole tiles on every side
    pub fn covers(&self, center: &GeoPoint, width: f64, height: f64, margin: u32) -> bool {
        let ts = self.tile_size.max(1) as f64;
        let fc = tile_fraction(center, self.zoom);
        let reach_x = width / 2.0 / ts + margin as f64;
        let reach_y = height / 2.0 / ts + margin as f64;

        let left = self.origin.x as f64;
        let top = self.origin.y as f64;
        let right = left + self.columns as f64;
        let bottom = top + self.rows as f64;

        fc.x - reach_x >= left
            && fc.x + reach_x <= right
            && fc.y.clamp(0.0, TileIndex::tiles_per_axis(self.zoom) as f64) - reach_y >= top
            && fc.y.clamp(0.0, TileIndex::tiles_per_axis(self.zoom) as f64) + reach_y <= bottom
    }
}

/// Manages the visible map: center, zoom, pixel size, drag offset and the tile grid
#[derive(Debug, Clone)]
pub struct Viewport {
    center: GeoPoint,
    zoom: u8,
    size: Point,
    /// Pixel translation of the tile layer during a drag
    drag_offset: Point,
    dragging: bool,
    /// A refresh was requested mid-drag and waits for the gesture to finish
    pending_refresh: bool,
    options: ViewportOptions,
    source: Arc<dyn TileSource>,
    grid: TileGrid,
}

impl Viewport {
    /// Creates a viewport at the configured default center and zoom
    pub fn new(options: ViewportOptions, size: Point) -> Self {
        Self::with_source(options, size, Arc::new(UrlTemplateSource::default()))
    }

    /// Same as [`Viewport::new`] with a specific tile source for fetch URLs
    pub fn with_source(options: ViewportOptions, size: Point, source: Arc<dyn TileSource>) -> Self {
        let center = options.default_center.normalized();
        let zoom = options.clamp_zoom(options.default_zoom as i32);
        let size = Point::new(clamp_extent(size.x), clamp_extent(size.y));
        let grid = TileGrid::compute(
            &center,
            zoom,
            size.x,
            size.y,
            options.tile_size,
            options.tile_margin,
            source.as_ref(),
        );

        Self {
            center,
            zoom,
            size,
            drag_offset: Point::zero(),
            dragging: false,
            pending_refresh: false,
            options,
            source,
            grid,
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn size(&self) -> Point {
        self.size
    }

    pub fn drag_offset(&self) -> Point {
        self.drag_offset
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.pending_refresh
    }

    pub fn tiles(&self) -> &TileGrid {
        &self.grid
    }

    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    /// Changes zoom by `delta` levels, clamped to the configured range.
    /// Returns the resulting zoom.
    pub fn zoom_by(&mut self, delta: i32) -> u8 {
        self.set_zoom((self.zoom as i32).saturating_add(delta))
    }

    /// Sets an absolute zoom level, clamped to the configured range
    pub fn set_zoom(&mut self, zoom: i32) -> u8 {
        let zoom = self.options.clamp_zoom(zoom);
        if zoom != self.zoom {
            self.zoom = zoom;
            self.refresh();
        }
        self.zoom
    }

    pub fn zoom_in(&mut self) -> u8 {
        self.zoom_by(1)
    }

    pub fn zoom_out(&mut self) -> u8 {
        self.zoom_by(-1)
    }

    /// Replaces the center. Latitude is kept inside the Mercator square and
    /// longitude wrapped around the antimeridian.
    pub fn set_center(&mut self, center: GeoPoint) {
        let center = center.normalized();
        if center != self.center {
            self.center = center;
            self.refresh();
        }
    }

    /// Degrees moved by one pan step at the current zoom
    pub fn pan_step(&self) -> f64 {
        self.options.pan_step_degrees / 2_f64.powi(self.zoom as i32)
    }

    /// Moves the center one step in `direction`
    pub fn pan(&mut self, direction: PanDirection) {
        let step = self.pan_step();
        let (lat, lng) = direction.unit();
        self.set_center(GeoPoint::new(
            self.center.lat + lat * step,
            self.center.lng + lng * step,
        ));
    }

    /// Updates the display size; the grid follows unless a drag is active.
    /// Extents are limited to `[0, MAX_VIEWPORT_PX]`.
    pub fn resize(&mut self, size: Point) {
        let size = Point::new(clamp_extent(size.x), clamp_extent(size.y));
        if size != self.size {
            self.size = size;
            self.refresh();
        }
    }

    /// Back to the default center and zoom with no drag in progress
    pub fn reset(&mut self) {
        self.center = self.options.default_center.normalized();
        self.zoom = self.options.clamp_zoom(self.options.default_zoom as i32);
        self.drag_offset = Point::zero();
        self.dragging = false;
        self.recompute_tiles();
    }

    /// Rebuilds the tile grid from the current center, zoom and size
    pub fn recompute_tiles(&mut self) {
        self.grid = TileGrid::compute(
            &self.center,
            self.zoom,
            self.size.x,
            self.size.y,
            self.options.tile_size,
            self.options.tile_margin,
            self.source.as_ref(),
        );
        self.pending_refresh = false;
        log::debug!(
            "tiles recomputed: {}x{} at zoom {} around {:?}",
            self.grid.columns(),
            self.grid.rows(),
            self.zoom,
            self.grid.center_tile()
        );
    }

    fn refresh(&mut self) {
        if self.dragging {
            log::debug!("tile refresh deferred until drag ends");
            self.pending_refresh = true;
        } else {
            self.recompute_tiles();
        }
    }

    /// Enters drag mode; tiles stay put until the drag ends
    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Translates the tile layer without touching center or tiles
    pub fn update_drag(&mut self, offset: Point) {
        if self.dragging {
            self.drag_offset = offset;
        }
    }

    /// Converts the accumulated offset into a new center and leaves drag mode.
    /// Returns the resulting center.
    pub fn end_drag(&mut self) -> GeoPoint {
        let offset = self.drag_offset;
        self.drag_offset = Point::zero();
        self.dragging = false;

        if !offset.is_zero() {
            let delta = self.offset_to_geo_delta(offset);
            self.center = GeoPoint::new(self.center.lat + delta.lat, self.center.lng + delta.lng)
                .normalized();
            self.recompute_tiles();
        } else if self.pending_refresh {
            self.recompute_tiles();
        }
        self.center
    }

    /// Abandons the drag with zero net movement
    pub fn cancel_drag(&mut self) {
        self.drag_offset = Point::zero();
        self.dragging = false;
        if self.pending_refresh {
            self.recompute_tiles();
        }
    }

    /// Horizontal pixels per degree of longitude at the current zoom
    pub fn pixels_per_lng(&self) -> f64 {
        self.options.tile_size as f64 * 2_f64.powi(self.zoom as i32) / 360.0
    }

    /// Geographic shift produced by dragging the map `offset` pixels
    pub fn offset_to_geo_delta(&self, offset: Point) -> GeoPoint {
        let pixels_per_lng = self.pixels_per_lng();
        let d_lng = -offset.x / pixels_per_lng;
        let d_lat = offset.y / (pixels_per_lng * self.center.lat.to_radians().cos());
        GeoPoint::new(d_lat, d_lng)
    }

    /// Fractional tile coordinates of the center
    pub fn center_fraction(&self) -> Point {
        tile_fraction(&self.center, self.zoom)
    }

    fn screen_origin(&self) -> Point {
        Point::new(self.size.x / 2.0, self.size.y / 2.0).add(&self.drag_offset)
    }

    /// Geographic position under a viewport pixel
    pub fn screen_to_geo_point(&self, pixel: &Point) -> GeoPoint {
        let ts = self.options.tile_size as f64;
        let tile = pixel
            .subtract(&self.screen_origin())
            .multiply(1.0 / ts)
            .add(&self.center_fraction());
        to_geo_point(tile, self.zoom).normalized()
    }

    /// Viewport pixel of a geographic position, using the world copy nearest the center
    pub fn geo_point_to_screen(&self, point: &GeoPoint) -> Point {
        let ts = self.options.tile_size as f64;
        let world = TileIndex::tiles_per_axis(self.zoom) as f64;
        let mut delta = tile_fraction(point, self.zoom).subtract(&self.center_fraction());
        delta.x -= (delta.x / world).round() * world;
        delta.multiply(ts).add(&self.screen_origin())
    }

    /// Screen position for a marker, or `None` when it is well outside the view
    pub fn marker_position(&self, point: &GeoPoint) -> Option<Point> {
        let screen = self.geo_point_to_screen(point);
        let margin_x = self.size.x * self.options.marker_margin;
        let margin_y = self.size.y * self.options.marker_margin;
        let visible = screen.x >= -margin_x
            && screen.x <= self.size.x + margin_x
            && screen.y >= -margin_y
            && screen.y <= self.size.y + margin_y;
        visible.then_some(screen)
    }

    /// Top-left pixel of a grid cell, including the drag offset
    pub fn tile_screen_position(&self, tile: &GridTile) -> Point {
        let ts = self.options.tile_size as f64;
        Point::new(tile.raw.x as f64, tile.raw.y as f64)
            .subtract(&self.center_fraction())
            .multiply(ts)
            .add(&self.screen_origin())
    }

    pub fn contains_pixel(&self, pixel: &Point) -> bool {
        pixel.x >= 0.0 && pixel.x <= self.size.x && pixel.y >= 0.0 && pixel.y <= self.size.y
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportOptions::default(), Point::new(800.0, 600.0))
    }
}
