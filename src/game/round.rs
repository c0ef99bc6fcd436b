//! Round sequencing and score accumulation.
//!
//! `RoundState` owns nothing but game bookkeeping; the viewport reset that
//! accompanies a new round is done by the session that drives it.

use crate::{
    core::geo::GeoPoint,
    game::{
        location::{Location, LocationSet},
        scoring::RoundResult,
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// Where the current round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for the player to pin a position
    Guessing,
    /// The guess has been scored, waiting for the next round
    Revealed,
    /// The final round has been scored
    GameOver,
}

/// Final tally exposed once the game is over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub final_score: u32,
    pub average_score: u32,
    pub results: Vec<RoundResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundState {
    round: u32,
    total_rounds: u32,
    score: u32,
    current_location: Location,
    guessed_position: Option<GeoPoint>,
    revealed: bool,
    game_over: bool,
    history: Vec<RoundResult>,
    #[serde(skip)]
    locations: LocationSet,
}

impl RoundState {
    /// Starts a game at round 1 with a zero score
    pub fn new(locations: LocationSet, total_rounds: u32) -> Result<Self> {
        if total_rounds == 0 {
            return Err(Error::Config("a game needs at least one round".to_string()));
        }
        locations.ensure_covers(total_rounds)?;
        let current_location = locations
            .get(0)
            .cloned()
            .ok_or(Error::LocationsExhausted(1))?;

        Ok(Self {
            round: 1,
            total_rounds,
            score: 0,
            current_location,
            guessed_position: None,
            revealed: false,
            game_over: false,
            history: Vec::with_capacity(total_rounds as usize),
            locations,
        })
    }

    pub fn phase(&self) -> RoundPhase {
        if self.game_over {
            RoundPhase::GameOver
        } else if self.revealed {
            RoundPhase::Revealed
        } else {
            RoundPhase::Guessing
        }
    }

    /// Scores `position` against the current location.
    ///
    /// Returns `None` without touching state when no position is given or
    /// the round has already been revealed.
    pub fn commit_guess(&mut self, position: Option<GeoPoint>) -> Option<RoundResult> {
        if self.phase() != RoundPhase::Guessing {
            log::warn!("guess ignored in phase {:?}", self.phase());
            return None;
        }
        let position = position?;

        let result = RoundResult::settle(self.round, &self.current_location, position);
        self.score += result.points;
        self.guessed_position = Some(position);
        self.revealed = true;
        self.game_over = self.round >= self.total_rounds;
        self.history.push(result.clone());

        log::info!(
            "round {}/{} settled: {:.1} km, {} points (total {})",
            self.round,
            self.total_rounds,
            result.distance_km,
            result.points,
            self.score
        );
        if self.game_over {
            log::info!("game over with {} points", self.score);
        }

        Some(result)
    }

    /// Moves from a revealed round to the next one
    pub fn advance_round(&mut self) -> Result<&Location> {
        match self.phase() {
            RoundPhase::Revealed => {}
            phase => {
                log::warn!("advance_round rejected in phase {:?}", phase);
                return Err(Error::InvalidTransition(format!(
                    "cannot advance from {:?}",
                    phase
                )));
            }
        }

        debug_assert!(
            self.round < self.total_rounds,
            "advancing past round {} of {}",
            self.round,
            self.total_rounds
        );
        let next = self
            .locations
            .get(self.round as usize)
            .cloned()
            .ok_or(Error::LocationsExhausted(self.round + 1))?;

        self.round += 1;
        self.current_location = next;
        self.guessed_position = None;
        self.revealed = false;
        log::info!("round {}/{} started", self.round, self.total_rounds);

        Ok(&self.current_location)
    }

    /// Back to round 1 with a zero score, from any phase
    pub fn restart(&mut self) {
        self.round = 1;
        self.score = 0;
        if let Some(first) = self.locations.get(0) {
            self.current_location = first.clone();
        }
        self.guessed_position = None;
        self.revealed = false;
        self.game_over = false;
        self.history.clear();
        log::info!("game restarted");
    }

    /// Final and average score, only once the game is over
    pub fn summary(&self) -> Option<GameSummary> {
        if !self.game_over {
            return None;
        }
        Some(GameSummary {
            final_score: self.score,
            average_score: self.average_score(),
            results: self.history.clone(),
        })
    }

    /// `round(score / total_rounds)`
    pub fn average_score(&self) -> u32 {
        (self.score as f64 / self.total_rounds as f64).round() as u32
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_location(&self) -> &Location {
        &self.current_location
    }

    pub fn guessed_position(&self) -> Option<GeoPoint> {
        self.guessed_position
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn can_advance(&self) -> bool {
        self.phase() == RoundPhase::Revealed
    }

    /// Result of the most recent commit, for the score panel
    pub fn last_result(&self) -> Option<&RoundResult> {
        if self.revealed {
            self.history.last()
        } else {
            None
        }
    }

    pub fn history(&self) -> &[RoundResult] {
        &self.history
    }

    pub fn locations(&self) -> &LocationSet {
        &self.locations
    }
}
