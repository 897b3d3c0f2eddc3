//! Input abstraction
//!
//! The host samples its devices once per frame into an [`ActionSet`] of held
//! actions. [`InputState`] keeps the previous and current snapshots so
//! just-pressed/just-released queries are stable for the whole frame.

use serde::{Deserialize, Serialize};

/// Logical actions the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Jump,
    Confirm,
    Pause,
    Restart,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::Confirm,
        Action::Pause,
        Action::Restart,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of actions held during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet(u8);

impl ActionSet {
    pub const EMPTY: ActionSet = ActionSet(0);

    pub fn with(mut self, action: Action) -> Self {
        self.insert(action);
        self
    }

    pub fn insert(&mut self, action: Action) {
        self.0 |= action.bit();
    }

    pub fn remove(&mut self, action: Action) {
        self.0 &= !action.bit();
    }

    pub fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::EMPTY;
        for action in iter {
            set.insert(action);
        }
        set
    }
}

/// Per-frame input queries consumed by the simulation
pub trait InputSource {
    fn is_pressed(&self, action: Action) -> bool;
    fn is_just_pressed(&self, action: Action) -> bool;
    fn is_just_released(&self, action: Action) -> bool;
}

/// Previous/current snapshot pair
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    previous: ActionSet,
    current: ActionSet,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll the snapshots forward; call once per frame before the update step
    pub fn begin_frame(&mut self, held: ActionSet) {
        self.previous = self.current;
        self.current = held;
    }

    pub fn held(&self) -> ActionSet {
        self.current
    }
}

impl InputSource for InputState {
    fn is_pressed(&self, action: Action) -> bool {
        self.current.contains(action)
    }

    fn is_just_pressed(&self, action: Action) -> bool {
        self.current.contains(action) && !self.previous.contains(action)
    }

    fn is_just_released(&self, action: Action) -> bool {
        !self.current.contains(action) && self.previous.contains(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_set_membership() {
        let set: ActionSet = [Action::Left, Action::Jump].into_iter().collect();
        assert!(set.contains(Action::Left));
        assert!(set.contains(Action::Jump));
        assert!(!set.contains(Action::Right));

        let mut set = set;
        set.remove(Action::Left);
        assert!(!set.contains(Action::Left));
    }

    #[test]
    fn test_just_pressed_is_edge_triggered() {
        let mut input = InputState::new();
        let jump = ActionSet::EMPTY.with(Action::Jump);

        input.begin_frame(jump);
        assert!(input.is_just_pressed(Action::Jump));
        assert!(input.is_pressed(Action::Jump));

        // Still held: pressed but not just-pressed
        input.begin_frame(jump);
        assert!(!input.is_just_pressed(Action::Jump));
        assert!(input.is_pressed(Action::Jump));

        input.begin_frame(ActionSet::EMPTY);
        assert!(input.is_just_released(Action::Jump));
        assert!(!input.is_pressed(Action::Jump));

        input.begin_frame(ActionSet::EMPTY);
        assert!(!input.is_just_released(Action::Jump));
    }
}
