//! # Input module
//!
//! Turns raw gamepad input into mode state updates.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod debounce;
mod joystick;
pub mod sampler;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use debounce::*;
pub use joystick::*;
