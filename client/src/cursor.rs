use bevy::{
    prelude::*,
    window::{CursorGrabMode, CursorOptions, PrimaryWindow, WindowFocused},
};
use locomotion::CursorState;

use crate::player::Locomotion;

/// The core changed the cursor lock state.
#[derive(Message, Clone, Copy, Debug)]
pub struct CursorChanged(pub CursorState);

pub(super) fn plugin(app: &mut App) {
    app.add_message::<CursorChanged>();

    // Apply the initial policy once the player exists
    app.add_systems(
        PostStartup,
        apply_initial.run_if(resource_exists::<Locomotion>),
    );
    app.add_systems(Update, (apply_cursor, reapply_on_focus));
}

fn set_grab(options: &mut CursorOptions, state: CursorState) {
    match state {
        CursorState::Locked => {
            options.grab_mode = CursorGrabMode::Locked;
            options.visible = false;
        }
        CursorState::Free => {
            options.grab_mode = CursorGrabMode::None;
            options.visible = true;
        }
    }
}

fn current_state(locomotion: &Locomotion) -> CursorState {
    if locomotion.cursor_locked() {
        CursorState::Locked
    } else {
        CursorState::Free
    }
}

fn apply_initial(
    locomotion: Res<Locomotion>,
    mut options: Single<&mut CursorOptions, With<PrimaryWindow>>,
) {
    set_grab(&mut options, current_state(&locomotion));
}

fn apply_cursor(
    mut messages: MessageReader<CursorChanged>,
    mut options: Single<&mut CursorOptions, With<PrimaryWindow>>,
) {
    for CursorChanged(state) in messages.read() {
        debug!("cursor -> {state:?}");
        set_grab(&mut options, *state);
    }
}

// Browsers and some window managers release the grab when focus is lost
fn reapply_on_focus(
    mut messages: MessageReader<WindowFocused>,
    locomotion: Option<Res<Locomotion>>,
    mut options: Single<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let Some(locomotion) = locomotion else {
        return;
    };
    for message in messages.read() {
        if message.focused {
            set_grab(&mut options, current_state(&locomotion));
        }
    }
}
