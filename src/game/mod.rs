pub mod location;
pub mod round;
pub mod scoring;
pub mod session;

pub use location::{Location, LocationSet};
pub use round::{GameSummary, RoundPhase, RoundState};
pub use scoring::{great_circle_distance_km, score_for_distance, RoundResult};
pub use session::{GameSession, Marker, MarkerKind};
