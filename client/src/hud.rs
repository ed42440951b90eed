//! Crosshair and the name of whatever is under it.

use bevy::prelude::*;
use locomotion::LabelUpdate;

use crate::player::LookAtChanged;

#[derive(Component)]
struct LookAtLabel;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_hud);
    app.add_systems(Update, update_label);
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((Text::new("+"), TextFont::from_font_size(20.0)));
            parent.spawn((
                LookAtLabel,
                Text::new(""),
                TextFont::from_font_size(16.0),
                Node {
                    margin: UiRect::top(Val::Px(12.0)),
                    ..default()
                },
            ));
        });
}

fn update_label(
    mut messages: MessageReader<LookAtChanged>,
    mut label: Single<&mut Text, With<LookAtLabel>>,
) {
    for LookAtChanged(update) in messages.read() {
        label.0 = match update {
            LabelUpdate::Show(name) => name.clone(),
            LabelUpdate::Clear => String::new(),
        };
    }
}
