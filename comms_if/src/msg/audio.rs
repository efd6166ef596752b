//! # Audio Command Message

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::RosMessage;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A ROS `builtin_interfaces/Duration`.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Default, PartialEq, Eq)]
pub struct RosDuration {
    pub sec: i32,
    pub nanosec: u32,
}

/// A single note to be played by the robot's speaker.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
pub struct AudioNote {
    /// Units: hertz
    pub frequency: u16,

    /// How long the note is played for.
    pub max_runtime: RosDuration,
}

/// A sequence of notes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AudioNoteVector {
    pub notes: Vec<AudioNote>,

    /// If false the sequence replaces anything currently playing.
    pub append: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl From<Duration> for RosDuration {
    fn from(d: Duration) -> Self {
        Self {
            sec: d.as_secs() as i32,
            nanosec: d.subsec_nanos(),
        }
    }
}

impl AudioNote {
    pub fn new(frequency: u16, runtime: Duration) -> Self {
        Self {
            frequency,
            max_runtime: runtime.into(),
        }
    }
}

impl AudioNoteVector {
    /// A sequence which interrupts whatever is currently playing.
    pub fn replacing(notes: Vec<AudioNote>) -> Self {
        Self {
            notes,
            append: false,
        }
    }
}

impl RosMessage for AudioNoteVector {
    const TYPE: &'static str = "irobot_create_msgs/AudioNoteVector";
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
