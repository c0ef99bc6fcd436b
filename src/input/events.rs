use crate::{
    core::{
        geo::{GeoPoint, Point},
        viewport::PanDirection,
    },
    game::{round::GameSummary, scoring::RoundResult},
};
use serde::{Deserialize, Serialize};

/// Discrete input delivered by the host, processed strictly in arrival order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Mouse button or pen pressed inside the map
    PointerDown { position: Point },
    /// Pointer moved inside the map
    PointerMove { position: Point },
    /// Pointer released
    PointerUp { position: Point },
    /// Pointer left the map area
    PointerLeave,
    /// Touch events (only the first touch is used)
    Touch {
        event_type: TouchEventType,
        touches: Vec<TouchPoint>,
    },
    /// Viewport/window resize
    Resize { size: Point },
    /// Keyboard input
    KeyPress { key: KeyCode },
    /// A map or game control was activated
    Control(ControlAction),
}

/// Types of touch events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchEventType {
    Start,
    Move,
    End,
    Cancel,
}

/// Individual touch point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Point,
}

/// Buttons of the game screen, plus direct selection by coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlAction {
    ZoomIn,
    ZoomOut,
    Pan(PanDirection),
    /// Commit the selected position as the guess
    PinIt,
    NextRound,
    PlayAgain,
    /// Select a position reported directly as latitude/longitude
    Select(GeoPoint),
}

/// Keyboard key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Plus,
    Minus,
    Enter,
    Escape,
    Other(u32),
}

impl KeyCode {
    /// Control bound to this key, if any. Enter is resolved by the session
    /// because its meaning depends on the round phase.
    pub fn control(&self) -> Option<ControlAction> {
        match self {
            KeyCode::ArrowUp => Some(ControlAction::Pan(PanDirection::Up)),
            KeyCode::ArrowDown => Some(ControlAction::Pan(PanDirection::Down)),
            KeyCode::ArrowLeft => Some(ControlAction::Pan(PanDirection::Left)),
            KeyCode::ArrowRight => Some(ControlAction::Pan(PanDirection::Right)),
            KeyCode::Plus => Some(ControlAction::ZoomIn),
            KeyCode::Minus => Some(ControlAction::ZoomOut),
            KeyCode::Enter | KeyCode::Escape | KeyCode::Other(_) => None,
        }
    }
}

/// What happened as a result of processing input
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Center or zoom changed
    ViewChanged { center: GeoPoint, zoom: u8 },
    /// The tile grid was rebuilt
    TilesUpdated { columns: u32, rows: u32 },
    DragStarted,
    /// Drag committed; the map now rests at `center`
    DragEnded { center: GeoPoint },
    /// Drag abandoned with no net movement
    DragCanceled,
    PositionSelected { position: GeoPoint },
    GuessCommitted { result: RoundResult },
    RoundStarted { round: u32, hint: String },
    GameOver { summary: GameSummary },
    GameRestarted,
}

impl GameEvent {
    /// Name used to register listeners for this kind of event
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::ViewChanged { .. } => "viewchanged",
            GameEvent::TilesUpdated { .. } => "tilesupdated",
            GameEvent::DragStarted => "dragstart",
            GameEvent::DragEnded { .. } => "dragend",
            GameEvent::DragCanceled => "dragcancel",
            GameEvent::PositionSelected { .. } => "select",
            GameEvent::GuessCommitted { .. } => "guess",
            GameEvent::RoundStarted { .. } => "roundstart",
            GameEvent::GameOver { .. } => "gameover",
            GameEvent::GameRestarted => "restart",
        }
    }
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerDown { position }
            | InputEvent::PointerMove { position }
            | InputEvent::PointerUp { position } => Some(*position),
            InputEvent::Touch { touches, .. } => touches.first().map(|t| t.position),
            _ => None,
        }
    }

    /// Rewrites a single-finger touch as the equivalent pointer event.
    ///
    /// A touch end usually carries no remaining touches, so the finger is
    /// lifted at `last_position`, the position of the previous start or move.
    pub fn touch_as_pointer(&self, last_position: Option<Point>) -> Option<InputEvent> {
        let InputEvent::Touch {
            event_type,
            touches,
        } = self
        else {
            return None;
        };
        let position = touches.first().map(|t| t.position);

        match event_type {
            TouchEventType::Start => position.map(|position| InputEvent::PointerDown { position }),
            TouchEventType::Move => position.map(|position| InputEvent::PointerMove { position }),
            TouchEventType::End => Some(match position.or(last_position) {
                Some(position) => InputEvent::PointerUp { position },
                None => InputEvent::PointerLeave,
            }),
            TouchEventType::Cancel => Some(InputEvent::PointerLeave),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_event_position() {
        let down = InputEvent::PointerDown {
            position: Point::new(100.0, 200.0),
        };
        assert_eq!(down.position(), Some(Point::new(100.0, 200.0)));
        assert_eq!(InputEvent::PointerLeave.position(), None);
    }

    #[test]
    fn test_touch_as_pointer() {
        let touch = |event_type, touches: Vec<TouchPoint>| InputEvent::Touch {
            event_type,
            touches,
        };
        let finger = vec![TouchPoint {
            id: 1,
            position: Point::new(5.0, 6.0),
        }];

        assert_eq!(
            touch(TouchEventType::Start, finger.clone()).touch_as_pointer(None),
            Some(InputEvent::PointerDown {
                position: Point::new(5.0, 6.0)
            })
        );
        assert_eq!(
            touch(TouchEventType::End, Vec::new()).touch_as_pointer(Some(Point::new(9.0, 8.0))),
            Some(InputEvent::PointerUp {
                position: Point::new(9.0, 8.0)
            })
        );
        assert_eq!(
            touch(TouchEventType::End, Vec::new()).touch_as_pointer(None),
            Some(InputEvent::PointerLeave)
        );
        assert_eq!(
            touch(TouchEventType::Cancel, finger.clone()).touch_as_pointer(None),
            Some(InputEvent::PointerLeave)
        );
        assert_eq!(
            touch(TouchEventType::Move, Vec::new()).touch_as_pointer(Some(Point::zero())),
            None
        );
        assert_eq!(InputEvent::PointerLeave.touch_as_pointer(None), None);
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            KeyCode::ArrowLeft.control(),
            Some(ControlAction::Pan(PanDirection::Left))
        );
        assert_eq!(KeyCode::Plus.control(), Some(ControlAction::ZoomIn));
        assert_eq!(KeyCode::Enter.control(), None);
    }

    #[test]
    fn test_event_kinds_are_distinct() {
        let events = [
            GameEvent::DragStarted,
            GameEvent::DragCanceled,
            GameEvent::GameRestarted,
            GameEvent::TilesUpdated { columns: 1, rows: 1 },
        ];
        let mut kinds: Vec<_> = events.iter().map(GameEvent::kind).collect();
        kinds.dedup();
        assert_eq!(kinds.len(), events.len());
    }
}
