//! Press/drag/click disambiguation.
//!
//! A press starts in `Pressed`. Movement past the threshold turns it into a
//! drag; a release before that is a click. Leaving the map cancels whatever
//! was in progress.

use crate::core::{constants::DRAG_THRESHOLD_PX, geo::Point};

/// Current state of the pointer gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    /// Button down, not yet moved past the threshold
    Pressed {
        /// Press position minus the drag offset at press time
        anchor: Point,
        start: Point,
    },
    Dragging {
        anchor: Point,
    },
}

/// What a pointer event amounted to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Nothing to act on
    None,
    /// Movement crossed the threshold; the map starts following the pointer
    DragStarted { offset: Point },
    DragMoved { offset: Point },
    /// Released after dragging; commit `offset`
    DragEnded { offset: Point },
    /// Drag abandoned; discard the offset
    DragCanceled,
    /// Press and release without a drag
    Click { position: Point },
}

/// Configuration for gesture recognition
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Minimum distance for drag to start
    pub drag_threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DRAG_THRESHOLD_PX,
        }
    }
}

/// Finite-state machine that turns raw pointer events into drags or clicks
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    pub enabled: bool,
    config: GestureConfig,
    state: GestureState,
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    pub fn with_config(config: GestureConfig) -> Self {
        Self {
            enabled: true,
            config,
            state: GestureState::Idle,
        }
    }

    /// Starts a gesture. `current_offset` is the drag offset already applied
    /// to the tile layer, so a resumed drag continues from where it is.
    ///
    /// A press while still dragging means the release was lost: the old drag
    /// is cancelled and the new gesture starts from a zero offset.
    pub fn pointer_down(&mut self, position: Point, current_offset: Point) -> GestureOutcome {
        if !self.enabled {
            return GestureOutcome::None;
        }
        let (outcome, offset) = match self.state {
            GestureState::Dragging { .. } => (GestureOutcome::DragCanceled, Point::zero()),
            _ => (GestureOutcome::None, current_offset),
        };
        self.state = GestureState::Pressed {
            anchor: position.subtract(&offset),
            start: position,
        };
        outcome
    }

    /// True between a press and its release, cancel or leave
    pub fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    pub fn pointer_move(&mut self, position: Point) -> GestureOutcome {
        match self.state {
            GestureState::Idle => GestureOutcome::None,
            GestureState::Pressed { anchor, start } => {
                if position.distance_to(&start) > self.config.drag_threshold {
                    self.state = GestureState::Dragging { anchor };
                    GestureOutcome::DragStarted {
                        offset: position.subtract(&anchor),
                    }
                } else {
                    GestureOutcome::None
                }
            }
            GestureState::Dragging { anchor } => GestureOutcome::DragMoved {
                offset: position.subtract(&anchor),
            },
        }
    }

    pub fn pointer_up(&mut self, position: Point) -> GestureOutcome {
        let outcome = match self.state {
            GestureState::Idle => GestureOutcome::None,
            GestureState::Pressed { anchor, start } => {
                if position.distance_to(&start) > self.config.drag_threshold {
                    // Moved and released with no move event in between.
                    GestureOutcome::DragEnded {
                        offset: position.subtract(&anchor),
                    }
                } else {
                    GestureOutcome::Click { position: start }
                }
            }
            GestureState::Dragging { anchor } => GestureOutcome::DragEnded {
                offset: position.subtract(&anchor),
            },
        };
        self.state = GestureState::Idle;
        outcome
    }

    /// Pointer left the map: a drag is cancelled, a pending click dropped
    pub fn pointer_leave(&mut self) -> GestureOutcome {
        let outcome = match self.state {
            GestureState::Dragging { .. } => GestureOutcome::DragCanceled,
            _ => GestureOutcome::None,
        };
        self.state = GestureState::Idle;
        outcome
    }

    /// Sets the gesture configuration
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Resets all gesture state
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}
