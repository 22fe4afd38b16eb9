use std::collections::HashMap;

use tracing::warn;

/// Physical keys the engine understands. Frontends translate their own key
/// events into these before feeding them to [`Input::feed_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Enter,
    Space,
    Escape,
    E,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Confirm,
    Cancel,
    OpenMenu,
    Quit,
}

const ACTION_COUNT: usize = 8;

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Confirm => 4,
            InputAction::Cancel => 5,
            InputAction::OpenMenu => 6,
            InputAction::Quit => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

/// Keyboard state with rebindable key-to-action mappings and edge detection.
///
/// Bindings live on a save/restore stack: opening a modal layer calls
/// [`save`](Input::save) to snapshot the current bindings, rebinds for its own
/// purposes, and [`restore`](Input::restore) puts the previous mapping back
/// when the layer closes. Saving also clears all held state so a key pressed
/// under the old mapping never bleeds into the new one.
#[derive(Debug, Default)]
pub struct Input {
    bindings: HashMap<Key, InputAction>,
    saved_bindings: Vec<HashMap<Key, InputAction>>,
    pending: ActionStates,
    current: ActionStates,
    previous: ActionStates,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, key: Key, action: InputAction) {
        self.bindings.insert(key, action);
    }

    pub fn unbind(&mut self, key: Key) {
        self.bindings.remove(&key);
    }

    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
    }

    /// Pushes the current bindings onto the stack and drops all held state.
    pub fn save(&mut self) {
        self.saved_bindings.push(self.bindings.clone());
        self.reset_states();
    }

    /// Pops the most recently saved bindings. Held state is dropped here too,
    /// so keys held across the swap must be re-pressed.
    pub fn restore(&mut self) {
        match self.saved_bindings.pop() {
            Some(bindings) => {
                self.bindings = bindings;
                self.reset_states();
            }
            None => warn!("input restore without matching save"),
        }
    }

    /// Records a raw key transition. Unbound keys are ignored.
    pub fn feed_key(&mut self, key: Key, is_down: bool) {
        if let Some(action) = self.bindings.get(&key) {
            self.pending.set(*action, is_down);
        }
    }

    /// Advances edge state once per simulation step. Everything fed since the
    /// previous call becomes the current state; the old current state becomes
    /// the comparison baseline for press/release edges.
    pub fn step(&mut self) {
        self.previous = self.current;
        self.current = self.pending;
    }

    pub fn is_held(&self, action: InputAction) -> bool {
        self.current.is_down(action)
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.current.is_down(action) && !self.previous.is_down(action)
    }

    pub fn was_released(&self, action: InputAction) -> bool {
        !self.current.is_down(action) && self.previous.is_down(action)
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            current: self.current,
            previous: self.previous,
        }
    }

    fn reset_states(&mut self) {
        self.pending = ActionStates::default();
        self.current = ActionStates::default();
        self.previous = ActionStates::default();
    }
}

/// Immutable copy of one step's action state, handed to code that should not
/// hold a mutable borrow of [`Input`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    current: ActionStates,
    previous: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_held(&self, action: InputAction) -> bool {
        self.current.is_down(action)
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.current.is_down(action) && !self.previous.is_down(action)
    }

    pub fn was_released(&self, action: InputAction) -> bool {
        !self.current.is_down(action) && self.previous.is_down(action)
    }

    /// Builds a snapshot with the given actions freshly pressed this step.
    /// Intended for tests and scripted playback.
    pub fn with_pressed(actions: &[InputAction]) -> Self {
        let mut current = ActionStates::default();
        for action in actions {
            current.set(*action, true);
        }
        Self {
            current,
            previous: ActionStates::default(),
        }
    }

    /// Builds a snapshot with the given actions held since before this step.
    pub fn with_held(actions: &[InputAction]) -> Self {
        let mut states = ActionStates::default();
        for action in actions {
            states.set(*action, true);
        }
        Self {
            current: states,
            previous: states,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_input() -> Input {
        let mut input = Input::new();
        input.bind(Key::W, InputAction::MoveUp);
        input.bind(Key::Enter, InputAction::Confirm);
        input.bind(Key::Escape, InputAction::Cancel);
        input
    }

    #[test]
    fn press_is_edge_triggered_for_single_step() {
        let mut input = bound_input();
        input.feed_key(Key::Enter, true);

        input.step();
        assert!(input.was_pressed(InputAction::Confirm));
        assert!(input.is_held(InputAction::Confirm));

        input.step();
        assert!(!input.was_pressed(InputAction::Confirm));
        assert!(input.is_held(InputAction::Confirm));
    }

    #[test]
    fn release_edge_fires_once() {
        let mut input = bound_input();
        input.feed_key(Key::W, true);
        input.step();
        input.feed_key(Key::W, false);
        input.step();

        assert!(input.was_released(InputAction::MoveUp));
        input.step();
        assert!(!input.was_released(InputAction::MoveUp));
    }

    #[test]
    fn unbound_key_is_ignored() {
        let mut input = bound_input();
        input.feed_key(Key::Space, true);
        input.step();

        assert!(!input.is_held(InputAction::Confirm));
        assert!(!input.is_held(InputAction::MoveUp));
    }

    #[test]
    fn save_clears_held_state_and_restore_brings_bindings_back() {
        let mut input = bound_input();
        input.feed_key(Key::W, true);
        input.step();
        assert!(input.is_held(InputAction::MoveUp));

        input.save();
        input.clear_bindings();
        input.bind(Key::W, InputAction::Cancel);
        input.step();
        assert!(!input.is_held(InputAction::MoveUp));
        assert!(!input.is_held(InputAction::Cancel));

        input.feed_key(Key::W, true);
        input.step();
        assert!(input.is_held(InputAction::Cancel));

        input.restore();
        input.feed_key(Key::W, true);
        input.step();
        assert!(input.is_held(InputAction::MoveUp));
        assert!(!input.is_held(InputAction::Cancel));
    }

    #[test]
    fn restore_without_save_leaves_bindings_intact() {
        let mut input = bound_input();
        input.restore();
        input.feed_key(Key::Enter, true);
        input.step();
        assert!(input.is_held(InputAction::Confirm));
    }

    #[test]
    fn snapshot_reflects_edges_of_the_step_it_was_taken_in() {
        let mut input = bound_input();
        input.feed_key(Key::Enter, true);
        input.step();
        let snapshot = input.snapshot();

        assert!(snapshot.was_pressed(InputAction::Confirm));
        assert!(snapshot.is_held(InputAction::Confirm));

        input.step();
        let later = input.snapshot();
        assert!(!later.was_pressed(InputAction::Confirm));
        assert!(later.is_held(InputAction::Confirm));
    }
}
