//! Look-at probe: which interactable (if any) is under the crosshair.

use crate::math::Vec3;

/// Capability exposed by world objects that can be looked at and named.
pub trait Interactable {
    fn display_name(&self) -> &str;
}

/// World collaborator resolving a ray to an interactable.
pub trait InteractableLookup {
    /// First interactable hit by a ray from `origin` along the unit `direction` within `reach`.
    ///
    /// A closer non-interactable surface blocks the ray.
    fn interactable_along(
        &self,
        origin: Vec3,
        direction: Vec3,
        reach: f32,
    ) -> Option<&dyn Interactable>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabelUpdate {
    Show(String),
    Clear,
}

/// Tracks the label currently on screen and reports only changes.
#[derive(Clone, Debug)]
pub struct LookAtProbe {
    reach: f32,
    shown: Option<String>,
}

impl LookAtProbe {
    pub fn new(reach: f32) -> Self {
        Self { reach, shown: None }
    }

    pub fn shown(&self) -> Option<&str> {
        self.shown.as_deref()
    }

    /// What the label should say for a ray from `origin` along `direction`.
    pub fn resolve(
        &self,
        world: &impl InteractableLookup,
        origin: Vec3,
        direction: Vec3,
    ) -> LabelUpdate {
        match world.interactable_along(origin, direction, self.reach) {
            Some(target) => LabelUpdate::Show(target.display_name().to_owned()),
            None => LabelUpdate::Clear,
        }
    }

    /// Resolve and return the update only when the label changes.
    pub fn update(
        &mut self,
        world: &impl InteractableLookup,
        origin: Vec3,
        direction: Vec3,
    ) -> Option<LabelUpdate> {
        let update = self.resolve(world, origin, direction);
        let next = match &update {
            LabelUpdate::Show(name) => Some(name.clone()),
            LabelUpdate::Clear => None,
        };
        if next == self.shown {
            return None;
        }
        self.shown = next;
        Some(update)
    }
}
