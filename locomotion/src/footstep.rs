//! Stride-timed footstep cues with no immediate repeats.

use rand::Rng;
use rand::rngs::StdRng;

use crate::audio::CueId;
use crate::error::ConfigError;
use crate::math::EPSILON;
use crate::settings::FootstepSettings;

/// Footstep cue pool. Slot 0 always holds the cue that played last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FootstepPlaylist {
    cues: Vec<CueId>,
}

impl FootstepPlaylist {
    pub fn new(cues: Vec<CueId>) -> Result<Self, ConfigError> {
        if cues.is_empty() {
            return Err(ConfigError::EmptyCuePool);
        }
        Ok(Self { cues })
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn last_played(&self) -> CueId {
        self.cues[0]
    }

    pub fn cues(&self) -> &[CueId] {
        &self.cues
    }

    /// Pick uniformly from slots `1..len`, then swap the pick into slot 0.
    ///
    /// A single-cue pool has nothing else to pick from and always yields its only cue.
    pub fn next(&mut self, rng: &mut impl Rng) -> CueId {
        if self.cues.len() < 2 {
            return self.cues[0];
        }
        let n = rng.random_range(1..self.cues.len());
        self.cues.swap(0, n);
        self.cues[0]
    }
}

/// Accumulated stride progress and the point at which the next cue is due.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrideCycle {
    pub cycle: f32,
    pub next_threshold: f32,
}

/// Emits a footstep cue every `stride_interval` units of stride progress while grounded.
#[derive(Clone, Debug)]
pub struct FootstepCycler<R = StdRng> {
    playlist: FootstepPlaylist,
    rng: R,
    stride: StrideCycle,
    stride_interval: f32,
    land_step_delay: f32,
}

impl<R: Rng> FootstepCycler<R> {
    /// The threshold starts at zero: the first moving tick puts a foot down.
    pub fn new(settings: &FootstepSettings, rng: R) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            playlist: FootstepPlaylist::new(settings.cues.clone())?,
            rng,
            stride: StrideCycle {
                cycle: 0.0,
                next_threshold: 0.0,
            },
            stride_interval: settings.stride_interval,
            land_step_delay: settings.land_step_delay,
        })
    }

    pub fn stride(&self) -> &StrideCycle {
        &self.stride
    }

    pub fn playlist(&self) -> &FootstepPlaylist {
        &self.playlist
    }

    /// Advance stride progress by `(speed + speed_bonus) * dt` while moving with input.
    ///
    /// Crossing the threshold always schedules the next one, but a cue is only emitted when
    /// grounded.
    pub fn advance(
        &mut self,
        speed: f32,
        speed_bonus: f32,
        has_input: bool,
        grounded: bool,
        dt: f32,
    ) -> Option<CueId> {
        if speed * speed > EPSILON && has_input {
            self.stride.cycle += (speed + speed_bonus) * dt.max(0.0);
        }

        if self.stride.cycle <= self.stride.next_threshold {
            return None;
        }
        self.stride.next_threshold = self.stride.cycle + self.stride_interval;

        if !grounded {
            return None;
        }
        Some(self.playlist.next(&mut self.rng))
    }

    /// A landing replaces the next footstep with a land cue; the following step comes soon.
    pub fn on_landed(&mut self) {
        self.stride.next_threshold = self.stride.cycle + self.land_step_delay;
    }
}
