//! Configuration for the viewport, pointer interaction and game rules
//!
//! Options can be built from a preset (`GameProfile`), tweaked field by field,
//! or loaded from a partial JSON document where missing fields keep their defaults.

use crate::{
    core::{
        constants::{
            DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG, DEFAULT_TILE_URL_TEMPLATE,
            DEFAULT_TOTAL_ROUNDS, DEFAULT_ZOOM, DRAG_THRESHOLD_PX, MARKER_VISIBILITY_MARGIN,
            MAX_ZOOM, MIN_ZOOM, PAN_STEP_DEGREES, QUICK_TOTAL_ROUNDS, TILE_MARGIN, TILE_SIZE,
        },
        geo::GeoPoint,
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GameProfile {
    #[default]
    Classic,
    Quick,
    Custom(GameOptions),
}

impl GameProfile {
    pub fn resolve(&self) -> GameOptions {
        match self {
            Self::Classic => GameOptions::default(),
            Self::Quick => GameOptions {
                total_rounds: QUICK_TOTAL_ROUNDS,
                ..GameOptions::default()
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    pub viewport: ViewportOptions,
    pub interaction: InteractionOptions,
    pub total_rounds: u32,
    pub tile_url_template: String,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            viewport: ViewportOptions::default(),
            interaction: InteractionOptions::default(),
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            tile_url_template: DEFAULT_TILE_URL_TEMPLATE.to_string(),
        }
    }
}

impl GameOptions {
    /// Parses options from JSON and validates them
    pub fn from_json(json: &str) -> Result<Self> {
        let options: GameOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        self.viewport.validate()?;
        self.interaction.validate()?;
        if self.total_rounds == 0 {
            return Err(Error::Config("total_rounds must be at least 1".to_string()));
        }
        if self.tile_url_template.is_empty() {
            return Err(Error::Config("tile_url_template is empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportOptions {
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub default_zoom: u8,
    pub default_center: GeoPoint,
    /// Tiles kept beyond the visible area on each side
    pub tile_margin: u32,
    /// Pan step at zoom 0 in degrees; the effective step is `pan_step_degrees / 2^zoom`
    pub pan_step_degrees: f64,
    /// How far outside the viewport (as a fraction of its size) a marker is still reported
    pub marker_margin: f64,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            default_zoom: DEFAULT_ZOOM,
            default_center: GeoPoint::new(DEFAULT_CENTER_LAT, DEFAULT_CENTER_LNG),
            tile_margin: TILE_MARGIN,
            pan_step_degrees: PAN_STEP_DEGREES,
            marker_margin: MARKER_VISIBILITY_MARGIN,
        }
    }
}

impl ViewportOptions {
    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(Error::Config("tile_size must be positive".to_string()));
        }
        if self.min_zoom > self.max_zoom {
            return Err(Error::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.max_zoom > 30 {
            return Err(Error::Config(format!("max_zoom {} is too deep", self.max_zoom)));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.default_zoom) {
            return Err(Error::Config(format!(
                "default_zoom {} outside [{}, {}]",
                self.default_zoom, self.min_zoom, self.max_zoom
            )));
        }
        if !self.default_center.is_valid() {
            return Err(Error::InvalidCoordinates(format!(
                "default_center {:?}",
                self.default_center
            )));
        }
        if !(self.pan_step_degrees.is_finite() && self.pan_step_degrees > 0.0) {
            return Err(Error::Config("pan_step_degrees must be positive".to_string()));
        }
        if !(self.marker_margin.is_finite() && self.marker_margin >= 0.0) {
            return Err(Error::Config("marker_margin must not be negative".to_string()));
        }
        Ok(())
    }

    /// Clamps a requested zoom level into `[min_zoom, max_zoom]`
    pub fn clamp_zoom(&self, zoom: i32) -> u8 {
        zoom.clamp(self.min_zoom as i32, self.max_zoom as i32) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionOptions {
    /// Pointer travel in pixels before a press becomes a drag
    pub drag_threshold: f64,
    /// Map arrow keys, `+`/`-` and Enter to controls
    pub keyboard: bool,
    /// Treat single-finger touches as pointer input
    pub touch: bool,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            drag_threshold: DRAG_THRESHOLD_PX,
            keyboard: true,
            touch: true,
        }
    }
}

impl InteractionOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.drag_threshold.is_finite() && self.drag_threshold >= 0.0) {
            return Err(Error::Config("drag_threshold must not be negative".to_string()));
        }
        Ok(())
    }
}
