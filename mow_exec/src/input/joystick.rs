//! Joystick sources

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use log::{info, warn};
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Button index to gamepad button, using the common Xbox-style layout.
const BUTTON_MAP: [Button; 8] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::Select,
    Button::Start,
];

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A polled source of button and axis values.
///
/// Axis values are in [-1, 1]. Stick Y axes are positive downwards, so pushing
/// a stick forward gives a negative value.
pub trait Joystick {
    /// Process pending device events, refreshing the values returned by
    /// `button` and `axis`.
    fn poll(&mut self);

    /// Whether the button at `idx` is currently held down.
    fn button(&self, idx: usize) -> bool;

    /// The current value of the axis at `idx`.
    fn axis(&self, idx: usize) -> f64;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The first connected gamepad, read through gilrs.
pub struct GilrsJoystick {
    gilrs: Gilrs,
    id: GamepadId,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum JoystickError {
    #[error("Could not initialise the gamepad library: {0}")]
    InitError(String),

    #[error("No joystick detected. Please connect a joystick and restart.")]
    NoDevice,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GilrsJoystick {
    /// Open the first connected gamepad.
    ///
    /// Fails with `JoystickError::NoDevice` if none is connected.
    pub fn new() -> Result<Self, JoystickError> {
        let gilrs = Gilrs::new()
            .map_err(|e| JoystickError::InitError(e.to_string()))?;

        let id = match gilrs.gamepads().find(|(_, g)| g.is_connected()) {
            Some((id, _)) => id,
            None => return Err(JoystickError::NoDevice),
        };

        info!("Joystick initialised: {}", gilrs.gamepad(id).name());

        Ok(Self { gilrs, id })
    }

    pub fn name(&self) -> String {
        self.gilrs.gamepad(self.id).name().to_owned()
    }
}

impl Joystick for GilrsJoystick {
    fn poll(&mut self) {
        while let Some(event) = self.gilrs.next_event() {
            if event.id != self.id {
                continue;
            }

            match event.event {
                EventType::Disconnected => warn!("Joystick disconnected"),
                EventType::Connected => info!("Joystick reconnected"),
                _ => (),
            }
        }
    }

    fn button(&self, idx: usize) -> bool {
        match BUTTON_MAP.get(idx) {
            Some(b) => self.gilrs.gamepad(self.id).is_pressed(*b),
            None => false,
        }
    }

    fn axis(&self, idx: usize) -> f64 {
        let gamepad = self.gilrs.gamepad(self.id);

        // gilrs reports Y axes positive upwards
        let val = match idx {
            0 => gamepad.value(Axis::LeftStickX),
            1 => -gamepad.value(Axis::LeftStickY),
            2 => gamepad.value(Axis::RightStickX),
            3 => -gamepad.value(Axis::RightStickY),
            _ => 0.0,
        };

        f64::from(val)
    }
}
