//! Abstract action vocabulary shared by every input source

/// One of the abstract buttons all input normalizes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    /// Primary button (fire, jump, rotate, launch)
    A,
    /// Secondary button
    B,
    /// Pause toggle
    Start,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::A,
        Action::B,
        Action::Start,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Up => "UP",
            Action::Down => "DOWN",
            Action::Left => "LEFT",
            Action::Right => "RIGHT",
            Action::A => "A",
            Action::B => "B",
            Action::Start => "START",
        }
    }

    /// Parse a `data-action` attribute value
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
    }

    /// Unit grid step for directional actions (screen coordinates, y down)
    pub fn direction(&self) -> Option<(i32, i32)> {
        match self {
            Action::Up => Some((0, -1)),
            Action::Down => Some((0, 1)),
            Action::Left => Some((-1, 0)),
            Action::Right => Some((1, 0)),
            _ => None,
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

/// Set of currently held actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSet(u8);

impl ActionSet {
    pub fn contains(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    /// Returns true if the action was not already held
    pub fn insert(&mut self, action: Action) -> bool {
        let fresh = !self.contains(action);
        self.0 |= action.bit();
        fresh
    }

    /// Returns true if the action was held
    pub fn remove(&mut self, action: Action) -> bool {
        let held = self.contains(action);
        self.0 &= !action.bit();
        held
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// What a game receives from the input service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSignal {
    /// Edge: an action went down
    Press(Action),
    /// Edge: an action went up
    Release(Action),
    /// Broadcast after every release, for games that only track "anything held"
    ReleaseAny,
}
