//! Distance and points for a single guess.

use crate::{
    core::{
        constants::{EARTH_RADIUS_KM, MAX_ROUND_SCORE, POINTS_PER_KM},
        geo::GeoPoint,
    },
    game::location::Location,
};
use serde::{Deserialize, Serialize};

/// Distance between two points along the Earth's surface, using the
/// haversine formula on a sphere of radius 6371 km.
pub fn great_circle_distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Points for a guess `distance_km` away from the target:
/// `max(5000 - floor(distance_km * 2), 0)`.
pub fn score_for_distance(distance_km: f64) -> u32 {
    if distance_km.is_nan() {
        return 0;
    }
    let penalty = (distance_km.max(0.0) * POINTS_PER_KM).floor();
    let max = MAX_ROUND_SCORE as f64;
    (max - penalty).clamp(0.0, max) as u32
}

/// Outcome of one settled round, kept for the score panel and the final summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    pub target: Location,
    pub guess: GeoPoint,
    pub distance_km: f64,
    pub points: u32,
}

impl RoundResult {
    /// Scores `guess` against `target`
    pub fn settle(round: u32, target: &Location, guess: GeoPoint) -> Self {
        let distance_km = great_circle_distance_km(&guess, &target.point());
        Self {
            round,
            target: target.clone(),
            guess,
            distance_km,
            points: score_for_distance(distance_km),
        }
    }

    /// Whether the round earned every available point
    pub fn is_perfect(&self) -> bool {
        self.points == MAX_ROUND_SCORE
    }
}
