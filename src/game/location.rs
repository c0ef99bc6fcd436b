use crate::{core::geo::GeoPoint, Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A place the player has to find: where it is, what it is called, and the clue shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub hint: String,
}

impl Location {
    pub fn new(name: impl Into<String>, hint: impl Into<String>, point: GeoPoint) -> Self {
        Self {
            lat: point.lat,
            lng: point.lng,
            name: name.into(),
            hint: hint.into(),
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

static BUILTIN_LOCATIONS: Lazy<Vec<Location>> = Lazy::new(|| {
    vec![
        Location::new("Paris", "City of Light", GeoPoint::new(48.8584, 2.2945)),
        Location::new("New York", "The Big Apple", GeoPoint::new(40.7128, -74.006)),
        Location::new("Sydney", "Harbor City", GeoPoint::new(-33.8688, 151.2093)),
        Location::new("Tokyo", "Rising Sun", GeoPoint::new(35.6762, 139.6503)),
        Location::new("London", "Big Ben's Home", GeoPoint::new(51.5074, -0.1278)),
    ]
});

/// Fixed, ordered sequence of locations; round `n` plays entry `n - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Location>", into = "Vec<Location>")]
pub struct LocationSet {
    locations: Vec<Location>,
}

impl LocationSet {
    /// Creates a set, rejecting empty input and out-of-range coordinates
    pub fn new(locations: Vec<Location>) -> Result<Self> {
        if locations.is_empty() {
            return Err(Error::Config("location set is empty".to_string()));
        }
        if let Some(bad) = locations.iter().find(|l| !l.point().is_valid()) {
            return Err(Error::InvalidCoordinates(format!(
                "{} ({}, {})",
                bad.name, bad.lat, bad.lng
            )));
        }
        Ok(Self { locations })
    }

    /// The five landmark cities the game ships with
    pub fn builtin() -> Self {
        Self {
            locations: BUILTIN_LOCATIONS.clone(),
        }
    }

    /// Parses a JSON array of `{lat, lng, name, hint}` records
    pub fn from_json(json: &str) -> Result<Self> {
        let locations: Vec<Location> = serde_json::from_str(json)?;
        Self::new(locations)
    }

    pub fn get(&self, index: usize) -> Option<&Location> {
        self.locations.get(index)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// Fails unless every one of `total_rounds` rounds has a location
    pub fn ensure_covers(&self, total_rounds: u32) -> Result<()> {
        if (total_rounds as usize) > self.locations.len() {
            return Err(Error::Config(format!(
                "{} rounds configured but only {} locations available",
                total_rounds,
                self.locations.len()
            )));
        }
        Ok(())
    }
}

impl Default for LocationSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<Location>> for LocationSet {
    type Error = Error;

    fn try_from(locations: Vec<Location>) -> Result<Self> {
        Self::new(locations)
    }
}

impl From<LocationSet> for Vec<Location> {
    fn from(set: LocationSet) -> Self {
        set.locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let set = LocationSet::builtin();
        let names: Vec<&str> = set.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Paris", "New York", "Sydney", "Tokyo", "London"]);
        assert_eq!(set.get(0).map(|l| l.hint.as_str()), Some("City of Light"));
        assert!(set.get(5).is_none());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"lat": 41.9028, "lng": 12.4964, "name": "Rome", "hint": "Eternal City"},
            {"lat": -22.9068, "lng": -43.1729, "name": "Rio", "hint": "Carnival"}
        ]"#;
        let set = LocationSet::from_json(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).unwrap().point(), GeoPoint::new(-22.9068, -43.1729));
    }

    #[test]
    fn test_rejects_empty_and_invalid() {
        assert!(matches!(LocationSet::from_json("[]"), Err(Error::Config(_))));

        let json = r#"[{"lat": 120.0, "lng": 0.0, "name": "Nowhere", "hint": "?"}]"#;
        assert!(matches!(
            LocationSet::from_json(json),
            Err(Error::InvalidCoordinates(_))
        ));

        assert!(matches!(
            LocationSet::from_json("{not json"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_ensure_covers() {
        let set = LocationSet::builtin();
        assert!(set.ensure_covers(5).is_ok());
        assert!(set.ensure_covers(6).is_err());
    }
}
