use std::collections::HashSet;

/// A high-level action the driver maps raw input events onto.
///
/// Movement and panning are held actions, polled once per frame; block
/// edits are edge-triggered and fire once per key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    PanLeft,
    PanRight,
    PlaceBlock,
    BreakBlock,
}

impl Action {
    fn is_held(self) -> bool {
        !matches!(self, Action::PlaceBlock | Action::BreakBlock)
    }
}

/// Accumulates input between frames on behalf of the driver.
///
/// Held actions track key state; edge actions latch until the next
/// snapshot; mouse motion accumulates into one look delta per frame.
#[derive(Debug, Default)]
pub struct InputTracker {
    held: HashSet<Action>,
    look_dx: f32,
    look_dy: f32,
    place_block: bool,
    break_block: bool,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        match action {
            Action::PlaceBlock => self.place_block = true,
            Action::BreakBlock => self.break_block = true,
            held => {
                self.held.insert(held);
            }
        }
    }

    pub fn release(&mut self, action: Action) {
        if action.is_held() {
            self.held.remove(&action);
        }
    }

    /// Accumulate relative pointer motion. The driver only feeds this
    /// while pointer capture is active.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.look_dx += dx;
        self.look_dy += dy;
    }

    /// Drop all held state, e.g. when the window loses focus.
    pub fn clear_held(&mut self) {
        self.held.clear();
    }

    /// Produce this frame's snapshot. Held movement persists; the look
    /// delta and latched block edits are drained.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let snap = InputSnapshot {
            move_forward: self.held.contains(&Action::MoveForward),
            move_back: self.held.contains(&Action::MoveBack),
            move_left: self.held.contains(&Action::MoveLeft),
            move_right: self.held.contains(&Action::MoveRight),
            pan_left: self.held.contains(&Action::PanLeft),
            pan_right: self.held.contains(&Action::PanRight),
            look: (self.look_dx, self.look_dy),
            place_block: self.place_block,
            break_block: self.break_block,
        };
        self.look_dx = 0.0;
        self.look_dy = 0.0;
        self.place_block = false;
        self.break_block = false;
        snap
    }
}

/// Read-only per-frame input state, passed into the update step.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pub move_forward: bool,
    pub move_back: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub pan_left: bool,
    pub pan_right: bool,
    /// Accumulated pointer motion since the last snapshot.
    pub look: (f32, f32),
    pub place_block: bool,
    pub break_block: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_movement_persists_across_snapshots() {
        let mut tracker = InputTracker::new();
        tracker.press(Action::MoveForward);
        assert!(tracker.snapshot().move_forward);
        assert!(tracker.snapshot().move_forward);
        tracker.release(Action::MoveForward);
        assert!(!tracker.snapshot().move_forward);
    }

    #[test]
    fn block_edits_fire_once_per_press() {
        let mut tracker = InputTracker::new();
        tracker.press(Action::PlaceBlock);
        assert!(tracker.snapshot().place_block);
        assert!(!tracker.snapshot().place_block);

        tracker.press(Action::BreakBlock);
        tracker.press(Action::BreakBlock);
        let snap = tracker.snapshot();
        assert!(snap.break_block);
        assert!(!tracker.snapshot().break_block);
    }

    #[test]
    fn look_delta_accumulates_then_drains() {
        let mut tracker = InputTracker::new();
        tracker.look(2.0, -1.0);
        tracker.look(0.5, 0.5);
        assert_eq!(tracker.snapshot().look, (2.5, -0.5));
        assert_eq!(tracker.snapshot().look, (0.0, 0.0));
    }

    #[test]
    fn clear_held_releases_everything() {
        let mut tracker = InputTracker::new();
        tracker.press(Action::MoveLeft);
        tracker.press(Action::PanRight);
        tracker.clear_held();
        let snap = tracker.snapshot();
        assert!(!snap.move_left);
        assert!(!snap.pan_right);
    }
}
