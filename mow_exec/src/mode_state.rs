//! # Mode State
//!
//! The single record describing what the robot is currently doing. It is written by the input
//! sampler and read by every output driver.
//!
//! The state is only ever replaced as a whole. [`channel`] hands out exactly one
//! [`ModeStateWriter`] and any number of [`ModeStateReader`]s, each read returns a complete copy
//! of the last stored snapshot, so a driver can never see the colour of one cycle paired with the
//! velocity of another.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::{Arc, RwLock};
use comms_if::msg::LedColor;
use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Operating mode of the robot. Exactly one is active at any time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Resting mode, the robot is commanded to stand still.
    Idle,

    /// The joystick axes drive the robot directly.
    Manual,

    /// The scripted mowing pattern drives the robot.
    Autonomous,
}

/// Colour shown on the light ring.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum Colour {
    Off,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Violet,
    White,

    /// Red, green and blue in turn, one per second.
    RgbCycle,

    /// A fresh random colour on every LED each second.
    Random,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A snapshot of the robot's mode.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ModeState {
    /// Master safety gate, no motion is commanded while false.
    pub armed: bool,

    pub mode: Mode,

    /// Target forward speed.
    ///
    /// Units: meters/second
    pub linear_ms: f64,

    /// Target turn rate, positive to the left.
    ///
    /// Units: radians/second
    pub angular_rads: f64,

    pub colour: Colour,

    /// The light ring blinks while set, always equal to `armed`.
    pub blink: bool,
}

/// The only handle able to replace the shared mode state.
pub struct ModeStateWriter {
    shared: Arc<RwLock<ModeState>>,
}

/// A read-only handle to the shared mode state.
#[derive(Clone)]
pub struct ModeStateReader {
    shared: Arc<RwLock<ModeState>>,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Create the shared mode state, initialised to [`ModeState::default`].
pub fn channel() -> (ModeStateWriter, ModeStateReader) {
    let shared = Arc::new(RwLock::new(ModeState::default()));

    (
        ModeStateWriter {
            shared: shared.clone(),
        },
        ModeStateReader { shared },
    )
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for Mode {
    fn default() -> Self {
        Mode::Idle
    }
}

impl Default for Colour {
    fn default() -> Self {
        Colour::Off
    }
}

impl Colour {
    /// The fixed RGB value of this colour, or `None` for the animated colours.
    pub fn rgb(&self) -> Option<LedColor> {
        match self {
            Colour::Off => Some(LedColor::new(0, 0, 0)),
            Colour::Red => Some(LedColor::new(255, 0, 0)),
            Colour::Orange => Some(LedColor::new(255, 165, 0)),
            Colour::Yellow => Some(LedColor::new(255, 255, 0)),
            Colour::Green => Some(LedColor::new(0, 255, 0)),
            Colour::Blue => Some(LedColor::new(0, 0, 255)),
            Colour::Violet => Some(LedColor::new(148, 0, 211)),
            Colour::White => Some(LedColor::new(255, 255, 255)),
            Colour::RgbCycle | Colour::Random => None,
        }
    }
}

impl ModeState {
    /// True if the scripted pattern should be driving the robot.
    pub fn is_auto_engaged(&self) -> bool {
        self.mode == Mode::Autonomous && self.armed
    }
}

impl ModeStateWriter {
    /// Replace the shared state with `state`.
    pub fn store(&self, state: ModeState) {
        // The state is plain data so a poisoned lock still holds a valid snapshot
        let mut shared = self.shared.write().unwrap_or_else(|e| e.into_inner());
        *shared = state;
    }
}

impl ModeStateReader {
    /// Copy out the current snapshot.
    pub fn load(&self) -> ModeState {
        *self.shared.read().unwrap_or_else(|e| e.into_inner())
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
