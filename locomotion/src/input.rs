//! Input collaborator and the jump mailbox that carries a press from the frame pass into the
//! next fixed tick.

use crate::math::{EPSILON, Vec2};

/// Per-frame input queries. The core only reads; it never owns device state.
pub trait InputSource {
    /// `x` = horizontal (strafe right positive), `y` = vertical (forward positive).
    fn move_axes(&self) -> Vec2;
    /// `x` turns right, `y` looks up.
    fn look_delta(&self) -> Vec2;
    fn jump_down(&self) -> bool;
    fn run_held(&self) -> bool;
    fn cursor_toggle_down(&self) -> bool;
    fn cursor_lock_down(&self) -> bool {
        false
    }
    fn cursor_unlock_down(&self) -> bool {
        false
    }
}

/// Plain snapshot of one frame of input. Hosts can fill it from any device layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub move_axes: Vec2,
    pub look_delta: Vec2,
    pub jump: bool,
    pub run: bool,
    pub cursor_toggle: bool,
    pub cursor_lock: bool,
    pub cursor_unlock: bool,
}

impl InputSource for FrameInput {
    fn move_axes(&self) -> Vec2 {
        self.move_axes
    }

    fn look_delta(&self) -> Vec2 {
        self.look_delta
    }

    fn jump_down(&self) -> bool {
        self.jump
    }

    fn run_held(&self) -> bool {
        self.run
    }

    fn cursor_toggle_down(&self) -> bool {
        self.cursor_toggle
    }

    fn cursor_lock_down(&self) -> bool {
        self.cursor_lock
    }

    fn cursor_unlock_down(&self) -> bool {
        self.cursor_unlock
    }
}

/// Move input as sampled by the frame pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveInput {
    pub axes: Vec2,
    pub run_held: bool,
}

impl MoveInput {
    pub fn new(axes: Vec2, run_held: bool) -> Self {
        let axes = if axes.x.is_finite() && axes.y.is_finite() {
            axes
        } else {
            Vec2::zeros()
        };
        Self { axes, run_held }
    }

    /// Axes scaled down to unit length when a diagonal exceeds it.
    pub fn normalized(&self) -> Self {
        let axes = if self.axes.norm_squared() > 1.0 {
            self.axes.normalize()
        } else {
            self.axes
        };
        Self {
            axes,
            run_held: self.run_held,
        }
    }

    #[inline]
    pub fn has_input(&self) -> bool {
        self.axes.x.abs() > EPSILON || self.axes.y.abs() > EPSILON
    }
}

/// Single-slot latch for jump presses.
///
/// The frame pass posts, the fixed pass takes. Several posts before one take collapse into a
/// single request; `take` always leaves the slot empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct JumpMailbox {
    pending: bool,
}

impl JumpMailbox {
    #[inline]
    pub fn post(&mut self) {
        self.pending = true;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[inline]
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
