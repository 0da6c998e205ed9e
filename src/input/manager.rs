//! Unified input manager - keyboard + on-screen buttons
//!
//! Tracks which actions are held and fans press/release edges out to
//! subscribers in registration order.

use super::{Action, ActionSet, keymap};

/// Subscriber callback receiving `(action, pressed)`
pub type InputCallback = Box<dyn FnMut(Action, bool)>;

/// Handle returned by `on_input`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Source-agnostic input state and subscriber list
pub struct InputManager {
    held: ActionSet,
    listeners: Vec<(Subscription, InputCallback)>,
    next_id: u64,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            held: ActionSet::default(),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Handle a `keydown`. Returns true if the key is bound (caller should
    /// prevent the browser default).
    pub fn key_down(&mut self, code: &str) -> bool {
        let Some(action) = keymap::action_for_code(code) else {
            return false;
        };
        self.press(action);
        true
    }

    /// Handle a `keyup`. Returns true if the key is bound.
    pub fn key_up(&mut self, code: &str) -> bool {
        let Some(action) = keymap::action_for_code(code) else {
            return false;
        };
        self.release(action);
        true
    }

    /// An on-screen button went down (mouse or touch)
    pub fn button_press(&mut self, action: Action) {
        self.press(action);
    }

    /// An on-screen button went up, was cancelled, or lost the pointer
    pub fn button_release(&mut self, action: Action) {
        self.release(action);
    }

    /// Press edge. OS key-repeat re-sends `keydown` while held; only the
    /// first one emits.
    fn press(&mut self, action: Action) {
        if self.held.insert(action) {
            self.emit(action, true);
        }
    }

    /// Release edge. Releases of actions that are not held are dropped
    /// (e.g. `mouseleave` on an idle button).
    fn release(&mut self, action: Action) {
        if self.held.remove(action) {
            self.emit(action, false);
        }
    }

    /// Level query: is the action currently held
    pub fn is_down(&self, action: Action) -> bool {
        self.held.contains(action)
    }

    /// Snapshot of every held action
    pub fn held(&self) -> ActionSet {
        self.held
    }

    /// Register a listener. Delivery order is registration order.
    pub fn on_input(&mut self, callback: impl FnMut(Action, bool) + 'static) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(callback)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }

    /// Deliver an edge to every listener synchronously
    pub fn emit(&mut self, action: Action, pressed: bool) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(action, pressed);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Drop all listeners and held state
    pub fn reset(&mut self) {
        self.listeners.clear();
        self.held.clear();
    }
}
