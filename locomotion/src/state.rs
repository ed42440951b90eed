//! Grounded / Jumping / Airborne bookkeeping.
//!
//! The machine never moves anything itself. Each fixed tick it is fed the fresh
//! [`ContactInfo`], decides the transitions, and later records where the motion strategy put
//! the actor. `jumping` and `grounded` are never both set.

use crate::ground::ContactInfo;
use crate::look::Orientation;
use crate::math::{EPSILON, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocomotionState {
    Grounded,
    Jumping,
    Airborne,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActorState {
    pub position: Vec3,
    pub orientation: Orientation,
    pub velocity: Vec3,
    pub grounded: bool,
    pub previously_grounded: bool,
    pub jumping: bool,
}

/// Edges fired during one tick. `landed` and `jumped` can both fire in the same tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transitions {
    pub jumped: bool,
    pub landed: bool,
    pub left_ground: bool,
}

impl Transitions {
    pub fn any(&self) -> bool {
        self.jumped || self.landed || self.left_ground
    }
}

#[derive(Clone, Debug, Default)]
pub struct LocomotionStateMachine {
    actor: ActorState,
}

impl LocomotionStateMachine {
    pub fn new(position: Vec3, orientation: Orientation) -> Self {
        Self {
            actor: ActorState {
                position,
                orientation,
                ..ActorState::default()
            },
        }
    }

    /// Seed the grounded flag without firing a landing (used at spawn).
    pub fn settle(&mut self, contact: &ContactInfo) {
        self.actor.grounded = contact.hit;
        self.actor.previously_grounded = contact.hit;
        self.actor.jumping = false;
    }

    pub fn actor(&self) -> &ActorState {
        &self.actor
    }

    pub fn state(&self) -> LocomotionState {
        if self.actor.jumping {
            LocomotionState::Jumping
        } else if self.actor.grounded {
            LocomotionState::Grounded
        } else {
            LocomotionState::Airborne
        }
    }

    /// Classify this tick's contact.
    ///
    /// A jumping actor that is still moving up does not land, even when the probe still
    /// reaches the floor right after take-off.
    pub fn observe_contact(&mut self, contact: &ContactInfo) -> Transitions {
        let was_grounded = self.actor.grounded;
        self.actor.previously_grounded = was_grounded;

        let ascending = self.actor.jumping && self.actor.velocity.y > EPSILON;
        let grounded = contact.hit && !ascending;

        let mut transitions = Transitions::default();
        if !was_grounded && grounded {
            transitions.landed = true;
            self.actor.jumping = false;
            log::debug!(
                "landed (angle {:.1}°, vy {:.2})",
                contact.angle_deg(),
                self.actor.velocity.y
            );
        } else if was_grounded && !grounded {
            transitions.left_ground = true;
            log::debug!("left ground without jumping");
        }

        self.actor.grounded = grounded;
        transitions
    }

    /// Consume a jump request. Takes off only from the ground; returns whether it did.
    pub fn try_jump(&mut self, requested: bool) -> bool {
        if !requested || !self.actor.grounded {
            return false;
        }
        self.actor.jumping = true;
        self.actor.grounded = false;
        log::debug!("jumped");
        true
    }

    pub fn record_motion(&mut self, position: Vec3, velocity: Vec3) {
        self.actor.position = position;
        self.actor.velocity = velocity;
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.actor.orientation = orientation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(hit: bool) -> ContactInfo {
        ContactInfo {
            hit,
            ..ContactInfo::none(0.45)
        }
    }

    fn grounded_machine() -> LocomotionStateMachine {
        let mut machine = LocomotionStateMachine::default();
        machine.settle(&contact(true));
        machine
    }

    #[test]
    fn jump_from_ground_enters_jumping() {
        let mut machine = grounded_machine();
        assert!(machine.observe_contact(&contact(true)) == Transitions::default());
        assert!(machine.try_jump(true));
        assert_eq!(machine.state(), LocomotionState::Jumping);
        assert!(!machine.actor().grounded);
    }

    #[test]
    fn jump_is_refused_in_the_air() {
        let mut machine = grounded_machine();
        let t = machine.observe_contact(&contact(false));
        assert!(t.left_ground);
        assert!(!machine.try_jump(true));
        assert_eq!(machine.state(), LocomotionState::Airborne);
    }

    #[test]
    fn ascending_jump_does_not_land_on_lingering_contact() {
        let mut machine = grounded_machine();
        machine.try_jump(true);
        machine.record_motion(Vec3::zeros(), Vec3::new(0.0, 5.0, 0.0));
        let t = machine.observe_contact(&contact(true));
        assert!(!t.landed);
        assert_eq!(machine.state(), LocomotionState::Jumping);

        machine.record_motion(Vec3::zeros(), Vec3::new(0.0, -3.0, 0.0));
        let t = machine.observe_contact(&contact(true));
        assert!(t.landed);
        assert_eq!(machine.state(), LocomotionState::Grounded);
    }

    #[test]
    fn landing_and_jumping_can_share_a_tick() {
        let mut machine = LocomotionStateMachine::default();
        let t = machine.observe_contact(&contact(true));
        assert!(t.landed);
        assert!(machine.try_jump(true));
        assert_eq!(machine.state(), LocomotionState::Jumping);
    }

    #[test]
    fn never_jumping_and_grounded_for_any_sequence() {
        // Deterministic pseudo-random walk over (hit, jump, vy).
        let mut machine = LocomotionStateMachine::default();
        let mut seed: u32 = 0x9e37_79b9;
        for _ in 0..10_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let hit = seed & 1 == 1;
            let jump = seed & 2 == 2;
            let vy = ((seed >> 8) % 21) as f32 - 10.0;

            machine.observe_contact(&contact(hit));
            machine.try_jump(jump);
            machine.record_motion(Vec3::zeros(), Vec3::new(0.0, vy, 0.0));

            let actor = machine.actor();
            assert!(!(actor.jumping && actor.grounded));
        }
    }
}
