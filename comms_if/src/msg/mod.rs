//! # Message Definitions
//!
//! Serde representations of the ROS messages published to the robot. The JSON produced by these
//! types is the exact `msg` payload expected by rosbridge.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Audio note sequences (`irobot_create_msgs/AudioNoteVector`)
pub mod audio;

/// Light ring commands (`irobot_create_msgs/LightringLeds`)
pub mod lightring;

/// Velocity commands (`geometry_msgs/Twist`)
pub mod twist;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use audio::*;
pub use lightring::*;
pub use twist::*;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A message which can be published on a ROS topic.
pub trait RosMessage: serde::Serialize {
    /// The fully qualified ROS type name, for example `geometry_msgs/Twist`.
    const TYPE: &'static str;
}
