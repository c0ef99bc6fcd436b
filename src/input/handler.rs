use crate::{input::events::GameEvent, prelude::HashMap};
use std::collections::VecDeque;

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&GameEvent) + Send + Sync>;

/// Listener registry and ordered queue for game events
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event kind
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Events emitted but not yet dispatched
    event_queue: VecDeque<GameEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener; `"*"` receives every event
    pub fn on<F>(&mut self, kind: &str, callback: F)
    where
        F: Fn(&GameEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(kind.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: GameEvent) {
        self.event_queue.push_back(event);
    }

    /// Dispatch queued events to listeners, oldest first, and return them
    pub fn process_events(&mut self) -> Vec<GameEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            for kind in [event.kind(), "*"] {
                if let Some(callbacks) = self.listeners.get(kind) {
                    for callback in callbacks {
                        callback(event);
                    }
                }
            }
        }

        events
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("listeners", &self.listener_count())
            .field("pending", &self.event_queue.len())
            .finish()
    }
}
