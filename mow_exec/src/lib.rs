//! # Mow library.
//!
//! Teleoperation and scripted mowing for an iRobot Create 3, driven from a gamepad. The input
//! sampler turns controller input into a shared mode state, which a set of independent drivers
//! read to publish velocity, light ring and audio commands over rosbridge.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Drivers - publish commands to the robot from the mode state
pub mod drivers;

/// Input - reads the gamepad and runs the mode logic
pub mod input;

/// Mode state - the shared record of mode, arming and commanded outputs
pub mod mode_state;

/// Parameters of the mow executable
pub mod params;

/// Fixed rate loop helper
pub mod schedule;

/// Shutdown signal shared by every loop
pub mod shutdown;
