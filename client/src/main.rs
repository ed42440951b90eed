// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]
// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

#[cfg(feature = "dev_native")]
mod debug_tools;

mod audio;
mod camera;
mod convert;
mod cursor;
mod hud;
mod input;
mod player;
mod world;

#[cfg(target_os = "macos")]
use bevy::window::CompositeAlphaMode;

use bevy::log::LogPlugin;
use bevy::prelude::*;

/// Physics rate the locomotion core is tuned for.
const FIXED_HZ: f64 = 50.0;

fn main() -> AppExit {
    App::new().add_plugins(AppPlugin).run()
}

pub struct AppPlugin;
impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Window {
                        title: "Locomotion Sandbox".to_string(),
                        fit_canvas_to_parent: true,
                        #[cfg(target_os = "macos")]
                        composite_alpha_mode: CompositeAlphaMode::PostMultiplied,
                        #[cfg(target_os = "linux")]
                        composite_alpha_mode: CompositeAlphaMode::PreMultiplied,
                        ..default()
                    }
                    .into(),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "wgpu=error,naga=warn,locomotion=debug".to_string(),
                    ..default()
                }),
        );

        app.insert_resource(Time::<Fixed>::from_hz(FIXED_HZ));

        app.add_plugins((
            world::plugin,
            player::plugin,
            camera::plugin,
            input::plugin,
            cursor::plugin,
            audio::plugin,
            hud::plugin,
        ));

        #[cfg(feature = "dev_native")]
        app.add_plugins(debug_tools::plugin);
    }
}
