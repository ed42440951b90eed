use bevy::prelude::*;
use leafwing_input_manager::prelude::*;
use locomotion::InputSource;
use locomotion::math;

use crate::convert::to_na2;

/// Mouse pixels to look-axis units.
const MOUSE_LOOK_SCALE: f32 = 0.1;

#[derive(Actionlike, Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    #[actionlike(DualAxis)]
    Move,
    #[actionlike(DualAxis)]
    Look,
    Jump,
    Run,
    ToggleCursor,
    LockCursor,
    UnlockCursor,
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<PlayerAction>::default());

    app.register_type::<PlayerAction>();

    let input_map = InputMap::<PlayerAction>::default()
        .with_dual_axis(PlayerAction::Move, VirtualDPad::wasd())
        .with_dual_axis(PlayerAction::Move, VirtualDPad::arrow_keys())
        .with_dual_axis(PlayerAction::Move, GamepadStick::LEFT)
        .with_dual_axis(PlayerAction::Look, MouseMove::default())
        .with(PlayerAction::Jump, KeyCode::Space)
        .with(PlayerAction::Jump, GamepadButton::South)
        .with(PlayerAction::Run, KeyCode::ShiftLeft)
        .with(PlayerAction::ToggleCursor, KeyCode::Tab)
        .with(PlayerAction::LockCursor, MouseButton::Left)
        .with(PlayerAction::UnlockCursor, KeyCode::Escape);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<PlayerAction>::default());
}

/// Read-only view of this frame's action state.
pub struct ActionInput<'a>(pub &'a ActionState<PlayerAction>);

impl InputSource for ActionInput<'_> {
    fn move_axes(&self) -> math::Vec2 {
        to_na2(self.0.axis_pair(&PlayerAction::Move))
    }

    fn look_delta(&self) -> math::Vec2 {
        // Screen y grows downward; look-up is positive.
        let delta = self.0.axis_pair(&PlayerAction::Look) * MOUSE_LOOK_SCALE;
        math::Vec2::new(delta.x, -delta.y)
    }

    fn jump_down(&self) -> bool {
        self.0.just_pressed(&PlayerAction::Jump)
    }

    fn run_held(&self) -> bool {
        self.0.pressed(&PlayerAction::Run)
    }

    fn cursor_toggle_down(&self) -> bool {
        self.0.just_pressed(&PlayerAction::ToggleCursor)
    }

    fn cursor_lock_down(&self) -> bool {
        self.0.just_pressed(&PlayerAction::LockCursor)
    }

    fn cursor_unlock_down(&self) -> bool {
        self.0.just_pressed(&PlayerAction::UnlockCursor)
    }
}
