//! # Light Ring Command Message

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::RosMessage;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of LEDs on the Create light ring.
pub const NUM_LEDS: usize = 6;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The colour of a single LED.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Default, PartialEq, Eq)]
pub struct LedColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Command setting every LED of the light ring.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LightringLeds {
    pub leds: [LedColor; NUM_LEDS],

    /// If true the command overrides the robot's own status lighting.
    pub override_system: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LedColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl LightringLeds {
    /// Set all LEDs to the same colour, overriding the system lighting.
    pub fn solid(color: LedColor) -> Self {
        Self {
            leds: [color; NUM_LEDS],
            override_system: true,
        }
    }

    /// Turn every LED off.
    pub fn off() -> Self {
        Self::solid(LedColor::default())
    }

    /// Returns true if every LED is dark.
    pub fn is_off(&self) -> bool {
        self.leds.iter().all(|l| *l == LedColor::default())
    }
}

impl RosMessage for LightringLeds {
    const TYPE: &'static str = "irobot_create_msgs/LightringLeds";
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
