//! # Drive Driver
//!
//! Publishes the mode state's velocity target at a fixed rate. The robot treats silence on its
//! velocity topic as a fault, so the command is repeated every cycle even when unchanged.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{convert::Infallible, sync::Arc, time::Duration};
use comms_if::msg::Twist;
use log::trace;

use super::{DriverError, Outputs};
use crate::{
    mode_state::{ModeState, ModeStateReader},
    schedule::run_at_rate,
    shutdown::ShutdownToken,
};
use util::module::State;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Maps a mode state to the velocity command for this cycle.
///
/// While the mowing pattern is engaged it owns the velocity topic and no command is produced.
#[derive(Default)]
pub struct DriveCmd;

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

pub fn run(
    reader: ModeStateReader,
    outputs: Arc<Outputs>,
    period: Duration,
    token: ShutdownToken,
) -> Result<(), DriverError> {
    let mut cmd = DriveCmd;

    run_at_rate(period, &token, |_| {
        let twist = match cmd.proc(&reader.load()) {
            Ok(Some(t)) => t,
            Ok(None) => return Ok(()),
            Err(e) => match e {},
        };

        trace!(
            "Drive: linear {:.3} m/s, angular {:.3} rad/s",
            twist.linear_ms(),
            twist.angular_rads()
        );

        outputs
            .drive
            .publish(&twist)
            .map_err(|e| DriverError::PublishError("drive", e))
    })
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl State for DriveCmd {
    type InputData = ModeState;
    type OutputData = Option<Twist>;
    type ProcError = Infallible;

    fn proc(&mut self, state: &ModeState) -> Result<Option<Twist>, Infallible> {
        if state.is_auto_engaged() {
            return Ok(None);
        }

        Ok(Some(Twist::planar(state.linear_ms, state.angular_rads)))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode_state::Mode;

    #[test]
    fn test_manual_command_follows_state() {
        let state = ModeState {
            armed: true,
            blink: true,
            mode: Mode::Manual,
            linear_ms: 0.4,
            angular_rads: -0.2,
            ..Default::default()
        };

        assert_eq!(
            DriveCmd.proc(&state).unwrap(),
            Some(Twist::planar(0.4, -0.2))
        );
    }

    #[test]
    fn test_autonomous_hands_over_only_when_armed() {
        let mut state = ModeState {
            mode: Mode::Autonomous,
            ..Default::default()
        };

        // Unarmed the robot keeps receiving zero commands
        assert_eq!(DriveCmd.proc(&state).unwrap(), Some(Twist::zero()));

        state.armed = true;
        state.blink = true;
        assert_eq!(DriveCmd.proc(&state).unwrap(), None);
    }
}
