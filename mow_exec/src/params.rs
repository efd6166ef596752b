//! # Mow Executable Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::Duration;
use serde::Deserialize;

use crate::mode_state::Colour;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Slowest rate the input sampler may run at.
pub const MIN_SAMPLE_RATE_HZ: f64 = 5.0;

/// Fastest rate the input sampler may run at.
pub const MAX_SAMPLE_RATE_HZ: f64 = 10.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the mow executable.
///
/// Any field missing from the parameter file takes its default value.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MowExecParams {

    // ---- NETWORK ----

    /// Hostname or address of the rosbridge server
    pub bridge_host: String,

    /// Port of the rosbridge server
    pub bridge_port: u16,

    /// Namespace of the robot, topics are published under `/{robot_name}/`
    pub robot_name: String,

    // ---- INPUT ----

    /// Rate at which the joystick is sampled.
    ///
    /// Units: hertz
    pub sample_rate_hz: f64,

    /// Minimum time between two accepted presses of the same button.
    ///
    /// Units: seconds
    pub debounce_s: f64,

    /// Forward speed at full stick deflection.
    ///
    /// Units: meters/second
    pub max_linear_ms: f64,

    /// Turn rate at full stick deflection.
    ///
    /// Units: radians/second
    pub max_angular_rads: f64,

    // ---- INDICATORS ----

    pub manual_colour: Colour,
    pub idle_colour: Colour,
    pub auto_colour: Colour,

    // ---- DRIVE ----

    /// Rate at which velocity commands are published, by both manual driving and the mowing
    /// pattern.
    ///
    /// Units: hertz
    pub drive_rate_hz: f64,

    // ---- MOWING PATTERN ----

    /// Units: meters/second
    pub straight_speed_ms: f64,

    /// Units: seconds
    pub straight_duration_s: f64,

    /// Units: radians/second
    pub turn_rate_rads: f64,

    /// Units: seconds
    pub turn_duration_s: f64,

    /// Stationary time after each turn.
    ///
    /// Units: seconds
    pub pause_s: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParamsError {
    #[error("{0} must be positive and finite, found {1}")]
    NotPositive(&'static str, f64),

    #[error("sample_rate_hz must be between 5 and 10 Hz, found {0}")]
    SampleRateOutOfRange(f64),

    #[error("robot_name must not be empty")]
    EmptyRobotName,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for MowExecParams {
    fn default() -> Self {
        Self {
            bridge_host: String::from("192.168.8.104"),
            bridge_port: 9012,
            robot_name: String::from("foxtrot"),
            sample_rate_hz: 10.0,
            debounce_s: 0.3,
            max_linear_ms: 1.0,
            max_angular_rads: 1.0,
            manual_colour: Colour::Green,
            idle_colour: Colour::Blue,
            auto_colour: Colour::Yellow,
            drive_rate_hz: 10.0,
            straight_speed_ms: 0.15,
            straight_duration_s: 11.5,
            turn_rate_rads: 1.0,
            turn_duration_s: 1.0,
            pause_s: 1.0,
        }
    }
}

impl MowExecParams {
    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.robot_name.is_empty() {
            return Err(ParamsError::EmptyRobotName);
        }

        let positive = [
            ("sample_rate_hz", self.sample_rate_hz),
            ("debounce_s", self.debounce_s),
            ("max_linear_ms", self.max_linear_ms),
            ("max_angular_rads", self.max_angular_rads),
            ("drive_rate_hz", self.drive_rate_hz),
            ("straight_speed_ms", self.straight_speed_ms),
            ("straight_duration_s", self.straight_duration_s),
            ("turn_rate_rads", self.turn_rate_rads),
            ("turn_duration_s", self.turn_duration_s),
            ("pause_s", self.pause_s),
        ];

        for &(name, val) in positive.iter() {
            if !(val.is_finite() && val > 0.0) {
                return Err(ParamsError::NotPositive(name, val));
            }
        }

        if self.sample_rate_hz < MIN_SAMPLE_RATE_HZ || self.sample_rate_hz > MAX_SAMPLE_RATE_HZ {
            return Err(ParamsError::SampleRateOutOfRange(self.sample_rate_hz));
        }

        Ok(())
    }

    /// Name of a topic in the robot's namespace, e.g. `/foxtrot/cmd_vel`.
    pub fn topic(&self, name: &str) -> String {
        format!("/{}/{}", self.robot_name, name)
    }

    /// The debounce window.
    pub fn debounce(&self) -> Duration {
        Duration::from_secs_f64(self.debounce_s)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = MowExecParams::default();

        assert_eq!(params.validate(), Ok(()));
        assert_eq!(params.topic("cmd_vel"), "/foxtrot/cmd_vel");
        assert!((params.debounce().as_secs_f64() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let params: MowExecParams = util::params::from_str(
            r#"
            bridge_host = "127.0.0.1"
            robot_name = "juliet"
            auto_colour = "Violet"
            idle_colour = "RgbCycle"
            "#,
        )
        .unwrap();

        assert_eq!(params.bridge_host, "127.0.0.1");
        assert_eq!(params.robot_name, "juliet");
        assert_eq!(params.auto_colour, Colour::Violet);
        assert_eq!(params.idle_colour, Colour::RgbCycle);
        assert_eq!(params.bridge_port, 9012);
        assert_eq!(params.straight_duration_s, 11.5);
    }

    #[test]
    fn test_unknown_colour_rejected() {
        let result: Result<MowExecParams, _> = util::params::from_str(r#"idle_colour = "Teal""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let params = MowExecParams {
            sample_rate_hz: 20.0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::SampleRateOutOfRange(20.0)));

        let params = MowExecParams {
            turn_duration_s: 0.0,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParamsError::NotPositive("turn_duration_s", 0.0))
        );

        let params = MowExecParams {
            robot_name: String::new(),
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ParamsError::EmptyRobotName));
    }
}
