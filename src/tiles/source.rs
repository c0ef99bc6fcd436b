use crate::core::{constants::DEFAULT_TILE_URL_TEMPLATE, geo::TileIndex};
use std::fmt;

/// Anything that can produce a fetch URL for a tile address.
///
/// Implementations receive normalized indices: `x` and `y` are in `[0, 2^z)`.
pub trait TileSource: fmt::Debug + Send + Sync {
    /// Build a URL for the requested `tile`.
    fn url(&self, tile: TileIndex) -> String;
}

/// Fills `{z}`, `{x}` and `{y}` placeholders in a URL template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplateSource {
    template: String,
}

impl UrlTemplateSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Default for UrlTemplateSource {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_URL_TEMPLATE)
    }
}

impl TileSource for UrlTemplateSource {
    fn url(&self, tile: TileIndex) -> String {
        self.template
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

/// Public OpenStreetMap tile servers, spread across subdomains
#[derive(Debug, Clone)]
pub struct OpenStreetMapSource {
    subdomains: Vec<&'static str>,
}

impl OpenStreetMapSource {
    pub fn new() -> Self {
        Self {
            subdomains: vec!["a", "b", "c"],
        }
    }
}

impl Default for OpenStreetMapSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSource for OpenStreetMapSource {
    fn url(&self, tile: TileIndex) -> String {
        if self.subdomains.is_empty() {
            return format!("https://tile.openstreetmap.org/{}/{}/{}.png", tile.z, tile.x, tile.y);
        }

        let idx = (tile.x + tile.y).rem_euclid(self.subdomains.len() as i64) as usize;
        format!(
            "https://{}.tile.openstreetmap.org/{}/{}/{}.png",
            self.subdomains[idx], tile.z, tile.x, tile.y
        )
    }
}
