//! The single event-processing path of a game.
//!
//! Every input goes through [`GameSession::handle_event`], which updates the
//! viewport, the gesture machine and the round state synchronously and in
//! arrival order, then returns the resulting [`GameEvent`]s.

use crate::{
    core::{
        config::{GameOptions, GameProfile},
        geo::{GeoPoint, Point, TileIndex},
        viewport::{PanDirection, Viewport},
    },
    game::{
        location::{Location, LocationSet},
        round::{GameSummary, RoundPhase, RoundState},
        scoring::RoundResult,
    },
    input::{
        events::{ControlAction, GameEvent, InputEvent, KeyCode, TouchEventType},
        gestures::{GestureConfig, GestureOutcome, GestureRecognizer},
        handler::EventManager,
    },
    tiles::source::UrlTemplateSource,
    Result,
};
use std::sync::Arc;

/// Which pin a marker represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Position picked but not yet committed
    Selection,
    /// Committed guess of a revealed round
    Guess,
    /// True location of a revealed round
    Target,
}

impl MarkerKind {
    /// Pin colour used by the game screen
    pub fn color(&self) -> &'static str {
        match self {
            MarkerKind::Selection | MarkerKind::Guess => "blue",
            MarkerKind::Target => "red",
        }
    }
}

/// A pin to draw over the map
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: GeoPoint,
    pub label: String,
    /// Viewport pixel the pin points at
    pub screen: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ViewSnapshot {
    center: GeoPoint,
    zoom: u8,
    grid: (TileIndex, u32, u32),
}

/// Viewport, pointer gestures and round state behind one input queue
#[derive(Debug)]
pub struct GameSession {
    options: GameOptions,
    viewport: Viewport,
    gestures: GestureRecognizer,
    rounds: RoundState,
    selected_position: Option<GeoPoint>,
    /// Position of the finger at the last touch start or move
    last_touch: Option<Point>,
    events: EventManager,
}

impl GameSession {
    pub fn new(options: GameOptions, locations: LocationSet, size: Point) -> Result<Self> {
        options.validate()?;

        let source = Arc::new(UrlTemplateSource::new(options.tile_url_template.clone()));
        let viewport = Viewport::with_source(options.viewport.clone(), size, source);
        let gestures = GestureRecognizer::with_config(GestureConfig {
            drag_threshold: options.interaction.drag_threshold,
        });
        let rounds = RoundState::new(locations, options.total_rounds)?;

        log::info!(
            "game started: {} rounds, first hint '{}'",
            rounds.total_rounds(),
            rounds.current_location().hint
        );

        Ok(Self {
            options,
            viewport,
            gestures,
            rounds,
            selected_position: None,
            last_touch: None,
            events: EventManager::new(),
        })
    }

    /// A game over the built-in locations using a preset
    pub fn from_profile(profile: &GameProfile, size: Point) -> Result<Self> {
        Self::new(profile.resolve(), LocationSet::builtin(), size)
    }

    /// Processes one input and returns what it caused, in order
    pub fn handle_event(&mut self, event: InputEvent) -> Vec<GameEvent> {
        let before = self.snapshot();
        self.apply(event);
        self.emit_view_changes(before);
        self.events.process_events()
    }

    /// Processes a batch of inputs strictly one after another
    pub fn handle_events<I>(&mut self, events: I) -> Vec<GameEvent>
    where
        I: IntoIterator<Item = InputEvent>,
    {
        events
            .into_iter()
            .flat_map(|event| self.handle_event(event))
            .collect()
    }

    /// Dispatches events queued by direct method calls such as
    /// [`advance_round`](Self::advance_round)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.process_events()
    }

    /// Register a listener for a [`GameEvent::kind`], or `"*"` for all
    pub fn on<F>(&mut self, kind: &str, callback: F)
    where
        F: Fn(&GameEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, callback);
    }

    fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { position } => {
                let outcome = self
                    .gestures
                    .pointer_down(position, self.viewport.drag_offset());
                self.apply_gesture(outcome);
            }
            InputEvent::PointerMove { position } => {
                // Leaving the viewport mid-gesture cancels it like a leave event
                let outcome = if self.gestures.is_active() && !self.viewport.contains_pixel(&position)
                {
                    self.gestures.pointer_leave()
                } else {
                    self.gestures.pointer_move(position)
                };
                self.apply_gesture(outcome);
            }
            InputEvent::PointerUp { position } => {
                let outcome = self.gestures.pointer_up(position);
                self.apply_gesture(outcome);
            }
            InputEvent::PointerLeave => {
                let outcome = self.gestures.pointer_leave();
                self.apply_gesture(outcome);
            }
            InputEvent::Touch { event_type, .. } => {
                if !self.options.interaction.touch {
                    return;
                }
                let pointer = event.touch_as_pointer(self.last_touch);
                self.last_touch = match (event_type, &pointer) {
                    (TouchEventType::End | TouchEventType::Cancel, _) => None,
                    (
                        _,
                        Some(
                            InputEvent::PointerDown { position }
                            | InputEvent::PointerMove { position },
                        ),
                    ) => Some(*position),
                    _ => self.last_touch,
                };
                if let Some(pointer) = pointer {
                    self.apply(pointer);
                }
            }
            InputEvent::Resize { size } => self.viewport.resize(size),
            InputEvent::KeyPress { key } => {
                if self.options.interaction.keyboard {
                    self.apply_key(key);
                }
            }
            InputEvent::Control(action) => self.apply_control(action),
        }
    }

    fn apply_gesture(&mut self, outcome: GestureOutcome) {
        match outcome {
            GestureOutcome::None => {}
            GestureOutcome::DragStarted { offset } => {
                self.viewport.begin_drag();
                self.viewport.update_drag(offset);
                log::debug!("drag started");
                self.events.emit(GameEvent::DragStarted);
            }
            GestureOutcome::DragMoved { offset } => self.viewport.update_drag(offset),
            GestureOutcome::DragEnded { offset } => {
                if !self.viewport.is_dragging() {
                    self.viewport.begin_drag();
                    self.events.emit(GameEvent::DragStarted);
                }
                self.viewport.update_drag(offset);
                let center = self.viewport.end_drag();
                log::debug!("drag ended at {:?}", center);
                self.events.emit(GameEvent::DragEnded { center });
            }
            GestureOutcome::DragCanceled => {
                self.viewport.cancel_drag();
                log::debug!("drag canceled");
                self.events.emit(GameEvent::DragCanceled);
            }
            GestureOutcome::Click { position } => {
                let point = self.viewport.screen_to_geo_point(&position);
                log::debug!("click at {:?} -> {:?}", position, point);
                self.select_position(point);
            }
        }
    }

    fn apply_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => self.confirm(),
            KeyCode::Escape => {
                if self.gestures.is_dragging() {
                    self.gestures.reset();
                    self.apply_gesture(GestureOutcome::DragCanceled);
                }
            }
            other => {
                if let Some(action) = other.control() {
                    self.apply_control(action);
                }
            }
        }
    }

    fn apply_control(&mut self, action: ControlAction) {
        match action {
            ControlAction::ZoomIn => {
                self.viewport.zoom_in();
            }
            ControlAction::ZoomOut => {
                self.viewport.zoom_out();
            }
            ControlAction::Pan(direction) => self.pan(direction),
            ControlAction::PinIt => {
                self.commit_guess();
            }
            ControlAction::NextRound => {
                if !self.rounds.can_advance() {
                    log::debug!("next round ignored in phase {:?}", self.rounds.phase());
                } else if let Err(e) = self.advance_round() {
                    log::warn!("next round failed: {}", e);
                }
            }
            ControlAction::PlayAgain => self.restart(),
            ControlAction::Select(point) => {
                self.select_position(point);
            }
        }
    }

    /// The primary button: pin, next round or play again depending on the phase
    pub fn confirm(&mut self) {
        match self.rounds.phase() {
            RoundPhase::Guessing => {
                self.commit_guess();
            }
            RoundPhase::Revealed => {
                if let Err(e) = self.advance_round() {
                    log::warn!("next round ignored: {}", e);
                }
            }
            RoundPhase::GameOver => self.restart(),
        }
    }

    /// Marks `point` as the pending guess. Ignored once the round is revealed.
    pub fn select_position(&mut self, point: GeoPoint) -> bool {
        if self.rounds.phase() != RoundPhase::Guessing {
            log::debug!("selection suppressed in phase {:?}", self.rounds.phase());
            return false;
        }
        let point = point.normalized();
        if !point.is_valid() {
            log::warn!("rejected selection at {:?}", point);
            return false;
        }

        self.selected_position = Some(point);
        self.events.emit(GameEvent::PositionSelected { position: point });
        true
    }

    /// Scores the pending selection; a no-op without one
    pub fn commit_guess(&mut self) -> Option<RoundResult> {
        let result = self.rounds.commit_guess(self.selected_position)?;
        self.selected_position = None;
        self.events.emit(GameEvent::GuessCommitted {
            result: result.clone(),
        });
        if let Some(summary) = self.rounds.summary() {
            self.events.emit(GameEvent::GameOver { summary });
        }
        Some(result)
    }

    /// Starts the next round and puts the map back to its default view
    pub fn advance_round(&mut self) -> Result<()> {
        let location = self.rounds.advance_round()?.clone();
        self.reset_view();
        self.events.emit(GameEvent::RoundStarted {
            round: self.rounds.round(),
            hint: location.hint,
        });
        Ok(())
    }

    /// Back to round 1 from any phase
    pub fn restart(&mut self) {
        self.rounds.restart();
        self.reset_view();
        self.events.emit(GameEvent::GameRestarted);
        self.events.emit(GameEvent::RoundStarted {
            round: self.rounds.round(),
            hint: self.rounds.current_location().hint.clone(),
        });
    }

    fn reset_view(&mut self) {
        self.selected_position = None;
        self.last_touch = None;
        self.gestures.reset();
        self.viewport.reset();
    }

    pub fn pan(&mut self, direction: PanDirection) {
        self.viewport.pan(direction);
    }

    pub fn zoom_by(&mut self, delta: i32) -> u8 {
        self.viewport.zoom_by(delta)
    }

    pub fn resize(&mut self, size: Point) {
        self.viewport.resize(size);
    }

    /// Pins to draw: the pending selection while guessing, then the guess
    /// and the target once revealed. Pins far outside the view are omitted.
    pub fn markers(&self) -> Vec<Marker> {
        let mut pins = Vec::new();
        if self.rounds.is_revealed() {
            if let Some(guess) = self.rounds.guessed_position() {
                pins.push((MarkerKind::Guess, guess, "Your guess".to_string()));
            }
            let target = self.rounds.current_location();
            pins.push((MarkerKind::Target, target.point(), target.name.clone()));
        } else if let Some(selected) = self.selected_position {
            pins.push((MarkerKind::Selection, selected, "Your guess".to_string()));
        }

        pins.into_iter()
            .filter_map(|(kind, position, label)| {
                self.viewport
                    .marker_position(&position)
                    .map(|screen| Marker {
                        kind,
                        position,
                        label,
                        screen,
                    })
            })
            .collect()
    }

    fn snapshot(&self) -> ViewSnapshot {
        let grid = self.viewport.tiles();
        ViewSnapshot {
            center: self.viewport.center(),
            zoom: self.viewport.zoom(),
            grid: (grid.origin(), grid.columns(), grid.rows()),
        }
    }

    fn emit_view_changes(&mut self, before: ViewSnapshot) {
        let after = self.snapshot();
        if after.center != before.center || after.zoom != before.zoom {
            self.events.emit(GameEvent::ViewChanged {
                center: after.center,
                zoom: after.zoom,
            });
        }
        if after.grid != before.grid {
            self.events.emit(GameEvent::TilesUpdated {
                columns: after.grid.1,
                rows: after.grid.2,
            });
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn rounds(&self) -> &RoundState {
        &self.rounds
    }

    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    pub fn selected_position(&self) -> Option<GeoPoint> {
        self.selected_position
    }

    pub fn phase(&self) -> RoundPhase {
        self.rounds.phase()
    }

    pub fn current_location(&self) -> &Location {
        self.rounds.current_location()
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.rounds.last_result()
    }

    pub fn summary(&self) -> Option<GameSummary> {
        self.rounds.summary()
    }
}
