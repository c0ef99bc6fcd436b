pub mod events;
pub mod gestures;
pub mod handler;

// Re-export the essential types
pub use events::{ControlAction, GameEvent, InputEvent, KeyCode, TouchEventType, TouchPoint};
pub use gestures::{GestureConfig, GestureOutcome, GestureRecognizer, GestureState};
pub use handler::{EventCallback, EventManager};
