//! # Velocity Command Message

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::RosMessage;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A 3D vector.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Velocity command for the robot base.
///
/// The Create is a differential drive platform so only `linear.x` and `angular.z` are
/// meaningful.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Default, PartialEq)]
pub struct Twist {
    /// Linear velocity.
    ///
    /// Units: meters/second
    pub linear: Vector3,

    /// Angular velocity, positive is a turn to the left.
    ///
    /// Units: radians/second
    pub angular: Vector3,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Twist {
    /// Create a planar velocity command from a forward speed and a turn rate.
    pub fn planar(linear_ms: f64, angular_rads: f64) -> Self {
        Self {
            linear: Vector3 {
                x: linear_ms,
                ..Default::default()
            },
            angular: Vector3 {
                z: angular_rads,
                ..Default::default()
            },
        }
    }

    /// A command which stops the robot.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Forward speed of the command.
    pub fn linear_ms(&self) -> f64 {
        self.linear.x
    }

    /// Turn rate of the command.
    pub fn angular_rads(&self) -> f64 {
        self.angular.z
    }
}

impl RosMessage for Twist {
    const TYPE: &'static str = "geometry_msgs/Twist";
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_planar_wire_shape() {
        let val = serde_json::to_value(Twist::planar(0.15, -1.0)).unwrap();

        assert_eq!(
            val,
            json!({
                "linear": {"x": 0.15, "y": 0.0, "z": 0.0},
                "angular": {"x": 0.0, "y": 0.0, "z": -1.0}
            })
        );
    }
}
