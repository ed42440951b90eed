//! Audio collaborator. The core picks cue identifiers and timing; the sink owns the clips.

use serde::{Deserialize, Serialize};

/// Opaque footstep clip identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CueId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Footstep(CueId),
    Jump,
    Land,
}

pub trait AudioSink {
    /// Replace whatever the actor's source is playing with `cue`.
    fn play(&mut self, cue: AudioCue);
    /// Fire-and-forget playback layered over the current clip.
    fn play_one_shot(&mut self, cue: AudioCue);
}
