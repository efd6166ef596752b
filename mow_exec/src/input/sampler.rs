//! # Input Sampler
//!
//! Samples the joystick at a fixed rate and derives the mode state from it.
//!
//! Button layout:
//!
//! | Index | Button      | Action                      |
//! |-------|-------------|-----------------------------|
//! | 0     | A           | Toggle manual mode          |
//! | 1     | B           | Toggle autonomous mode      |
//! | 2     | X           | Return to idle              |
//! | 4     | Left bumper | Toggle arming               |
//!
//! In manual mode the left stick drives the robot: forward/back on the Y axis, turning on the X
//! axis.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    convert::Infallible,
    time::{Duration, Instant},
};
use log::info;

use super::{Debouncer, Joystick};
use crate::{
    mode_state::{Colour, Mode, ModeState, ModeStateWriter},
    params::MowExecParams,
    schedule::run_at_rate,
    shutdown::ShutdownToken,
};
use util::module::State;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

pub const BTN_MANUAL: usize = 0;
pub const BTN_AUTONOMOUS: usize = 1;
pub const BTN_IDLE: usize = 2;
pub const BTN_ARM: usize = 4;

pub const AXIS_TURN: usize = 0;
pub const AXIS_DRIVE: usize = 1;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The controller values read in one sampling cycle.
#[derive(Debug, Clone, Copy)]
pub struct ControllerSample {
    pub time: Instant,

    pub manual: bool,
    pub autonomous: bool,
    pub idle: bool,
    pub arm: bool,

    /// Left stick X, positive right
    pub turn_axis: f64,

    /// Left stick Y, positive down
    pub drive_axis: f64,
}

/// Parameters of the mode logic.
#[derive(Debug, Clone)]
pub struct SamplerParams {
    pub debounce: Duration,
    pub max_linear_ms: f64,
    pub max_angular_rads: f64,
    pub manual_colour: Colour,
    pub idle_colour: Colour,
    pub auto_colour: Colour,
}

/// Mode state machine fed by controller samples.
pub struct ModeLogic {
    params: SamplerParams,

    armed: bool,
    mode: Mode,

    manual_btn: Debouncer,
    autonomous_btn: Debouncer,
    idle_btn: Debouncer,
    arm_btn: Debouncer,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Run the sampler until the shutdown is triggered.
///
/// Each cycle polls the joystick, runs the mode logic and stores the resulting snapshot.
pub fn run<J: Joystick>(
    joystick: &mut J,
    logic: &mut ModeLogic,
    writer: &ModeStateWriter,
    period: Duration,
    token: &ShutdownToken,
) {
    let result = run_at_rate(period, token, |now| -> Result<(), Infallible> {
        joystick.poll();

        let sample = ControllerSample::read(&*joystick, now);
        writer.store(logic.proc(&sample)?);

        Ok(())
    });

    match result {
        Ok(()) => (),
        Err(e) => match e {},
    }
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ControllerSample {
    /// Read the current values from a joystick.
    pub fn read<J: Joystick + ?Sized>(joystick: &J, time: Instant) -> Self {
        Self {
            time,
            manual: joystick.button(BTN_MANUAL),
            autonomous: joystick.button(BTN_AUTONOMOUS),
            idle: joystick.button(BTN_IDLE),
            arm: joystick.button(BTN_ARM),
            turn_axis: joystick.axis(AXIS_TURN),
            drive_axis: joystick.axis(AXIS_DRIVE),
        }
    }

    /// A sample with nothing pressed and the sticks centred.
    pub fn released(time: Instant) -> Self {
        Self {
            time,
            manual: false,
            autonomous: false,
            idle: false,
            arm: false,
            turn_axis: 0.0,
            drive_axis: 0.0,
        }
    }
}

impl From<&MowExecParams> for SamplerParams {
    fn from(p: &MowExecParams) -> Self {
        Self {
            debounce: p.debounce(),
            max_linear_ms: p.max_linear_ms,
            max_angular_rads: p.max_angular_rads,
            manual_colour: p.manual_colour,
            idle_colour: p.idle_colour,
            auto_colour: p.auto_colour,
        }
    }
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self::from(&MowExecParams::default())
    }
}

impl ModeLogic {
    /// Start unarmed in idle.
    pub fn new(params: SamplerParams) -> Self {
        let window = params.debounce;

        Self {
            params,
            armed: false,
            mode: Mode::Idle,
            manual_btn: Debouncer::new(window),
            autonomous_btn: Debouncer::new(window),
            idle_btn: Debouncer::new(window),
            arm_btn: Debouncer::new(window),
        }
    }

    /// Switch to `mode`, or back to idle if `mode` is already active.
    fn toggle(&mut self, mode: Mode) {
        if self.mode == mode {
            info!("{:?} mode deactivated", mode);
            self.mode = Mode::Idle;
        } else {
            info!("{:?} mode activated", mode);
            self.mode = mode;
        }
    }
}

impl State for ModeLogic {
    type InputData = ControllerSample;
    type OutputData = ModeState;
    type ProcError = Infallible;

    fn proc(&mut self, sample: &ControllerSample) -> Result<ModeState, Infallible> {
        let t = sample.time;

        // ---- BUTTONS ----

        if self.manual_btn.update(sample.manual, t) {
            self.toggle(Mode::Manual);
        }

        if self.idle_btn.update(sample.idle, t) && self.mode != Mode::Idle {
            info!("Idle mode activated");
            self.mode = Mode::Idle;
        }

        if self.autonomous_btn.update(sample.autonomous, t) {
            self.toggle(Mode::Autonomous);
        }

        if self.arm_btn.update(sample.arm, t) {
            self.armed = !self.armed;
            info!("Robot {}", if self.armed { "armed" } else { "disarmed" });
        }

        // ---- OUTPUTS ----

        let mut state = ModeState {
            armed: self.armed,
            mode: self.mode,
            blink: self.armed,
            ..Default::default()
        };

        match self.mode {
            Mode::Manual => {
                state.linear_ms = -clamp_axis(sample.drive_axis) * self.params.max_linear_ms;
                state.angular_rads = -clamp_axis(sample.turn_axis) * self.params.max_angular_rads;
                state.colour = self.params.manual_colour;
            }
            Mode::Idle => state.colour = self.params.idle_colour,
            // Motion is commanded by the mowing pattern
            Mode::Autonomous => state.colour = self.params.auto_colour,
        }

        if !state.armed {
            state.linear_ms = 0.0;
            state.angular_rads = 0.0;
        }

        Ok(state)
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn clamp_axis(val: f64) -> f64 {
    if val.is_finite() {
        val.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mode_state, shutdown::Shutdown};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Drives a [`ModeLogic`] with a simulated 10 Hz clock.
    struct Rig {
        logic: ModeLogic,
        t0: Instant,
        cycle: u32,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                logic: ModeLogic::new(SamplerParams::default()),
                t0: Instant::now(),
                cycle: 0,
            }
        }

        fn step_with(&mut self, f: impl FnOnce(&mut ControllerSample)) -> ModeState {
            let mut sample =
                ControllerSample::released(self.t0 + Duration::from_millis(100) * self.cycle);
            f(&mut sample);
            self.cycle += 1;
            self.logic.proc(&sample).unwrap()
        }

        fn step(&mut self) -> ModeState {
            self.step_with(|_| ())
        }

        /// Press and release a button, returning the state after the press.
        fn tap(&mut self, f: impl FnOnce(&mut ControllerSample)) -> ModeState {
            let state = self.step_with(f);
            self.step();
            state
        }

        /// Let the debounce windows expire.
        fn wait(&mut self) {
            for _ in 0..3 {
                self.step();
            }
        }
    }

    #[test]
    fn test_idle_arm_manual_scenario() {
        let mut rig = Rig::new();

        // Start unarmed in idle
        let s = rig.step();
        assert_eq!(s.mode, Mode::Idle);
        assert_eq!(s.colour, Colour::Blue);
        assert_eq!((s.linear_ms, s.angular_rads), (0.0, 0.0));
        assert!(!s.blink);

        // Arm, still blue but blinking
        let s = rig.tap(|s| s.arm = true);
        assert!(s.armed);
        assert!(s.blink);
        assert_eq!(s.colour, Colour::Blue);
        rig.wait();

        // Manual, velocity follows the stick
        let s = rig.tap(|s| s.manual = true);
        assert_eq!(s.mode, Mode::Manual);
        assert_eq!(s.colour, Colour::Green);
        let s = rig.step_with(|s| {
            s.drive_axis = -0.5;
            s.turn_axis = 0.25;
        });
        assert_eq!(s.linear_ms, 0.5);
        assert_eq!(s.angular_rads, -0.25);
        rig.wait();

        // Disarm, the stick no longer moves the robot
        rig.tap(|s| s.arm = true);
        let s = rig.step_with(|s| {
            s.drive_axis = -1.0;
            s.turn_axis = 1.0;
        });
        assert_eq!(s.mode, Mode::Manual);
        assert!(!s.armed);
        assert!(!s.blink);
        assert_eq!((s.linear_ms, s.angular_rads), (0.0, 0.0));
    }

    #[test]
    fn test_disarm_zeroes_velocity_in_the_same_cycle() {
        let mut rig = Rig::new();
        rig.tap(|s| s.arm = true);
        rig.wait();
        rig.tap(|s| s.manual = true);
        rig.wait();

        let s = rig.step_with(|s| s.drive_axis = -1.0);
        assert_eq!(s.linear_ms, 1.0);

        let s = rig.step_with(|s| {
            s.drive_axis = -1.0;
            s.arm = true;
        });
        assert!(!s.armed);
        assert_eq!((s.linear_ms, s.angular_rads), (0.0, 0.0));
    }

    #[test]
    fn test_toggling_active_mode_returns_to_idle() {
        let mut rig = Rig::new();

        let s = rig.tap(|s| s.autonomous = true);
        assert_eq!(s.mode, Mode::Autonomous);
        assert_eq!(s.colour, Colour::Yellow);
        rig.wait();

        let s = rig.tap(|s| s.autonomous = true);
        assert_eq!(s.mode, Mode::Idle);
        rig.wait();

        // Selecting another mode replaces the active one
        rig.tap(|s| s.manual = true);
        rig.wait();
        let s = rig.tap(|s| s.autonomous = true);
        assert_eq!(s.mode, Mode::Autonomous);
        rig.wait();

        let s = rig.tap(|s| s.idle = true);
        assert_eq!(s.mode, Mode::Idle);
    }

    #[test]
    fn test_double_press_within_debounce_toggles_once() {
        let mut rig = Rig::new();

        // Pressed on cycle 0, released on 1, pressed again on 2 (0.2 s later)
        let s = rig.tap(|s| s.manual = true);
        assert_eq!(s.mode, Mode::Manual);
        let s = rig.step_with(|s| s.manual = true);
        assert_eq!(s.mode, Mode::Manual);
        rig.step();

        // Pressed after the window, toggles back
        rig.wait();
        let s = rig.step_with(|s| s.manual = true);
        assert_eq!(s.mode, Mode::Idle);
    }

    #[test]
    fn test_random_sequences_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(0x6d6f77);
        let mut rig = Rig::new();

        // Independent model of the expected mode and arming
        let mut mode = Mode::Idle;
        let mut armed = false;
        let mut last_accept: [Option<u32>; 4] = [None; 4];
        let mut held = [false; 4];

        for _ in 0..5_000 {
            let buttons: [bool; 4] = [
                rng.gen_bool(0.2),
                rng.gen_bool(0.2),
                rng.gen_bool(0.2),
                rng.gen_bool(0.2),
            ];
            let drive = rng.gen_range(-1.0..=1.0);
            let turn = rng.gen_range(-1.0..=1.0);
            let cycle = rig.cycle;

            // Model: rising edge at least 3 cycles (0.3 s) after the last accepted press
            let mut accepted = [false; 4];
            for i in 0..4 {
                if buttons[i] && !held[i] {
                    if last_accept[i].map_or(true, |t| cycle - t >= 3) {
                        accepted[i] = true;
                        last_accept[i] = Some(cycle);
                    }
                }
                held[i] = buttons[i];
            }
            if accepted[0] {
                mode = if mode == Mode::Manual { Mode::Idle } else { Mode::Manual };
            }
            if accepted[2] {
                mode = Mode::Idle;
            }
            if accepted[1] {
                mode = if mode == Mode::Autonomous { Mode::Idle } else { Mode::Autonomous };
            }
            if accepted[3] {
                armed = !armed;
            }

            let s = rig.step_with(|s| {
                s.manual = buttons[0];
                s.autonomous = buttons[1];
                s.idle = buttons[2];
                s.arm = buttons[3];
                s.drive_axis = drive;
                s.turn_axis = turn;
            });

            assert_eq!(s.mode, mode);
            assert_eq!(s.armed, armed);
            assert_eq!(s.blink, s.armed);
            if !s.armed || s.mode != Mode::Manual {
                assert_eq!((s.linear_ms, s.angular_rads), (0.0, 0.0));
            } else {
                assert_eq!(s.linear_ms, -drive);
                assert_eq!(s.angular_rads, -turn);
            }
        }
    }

    #[test]
    fn test_out_of_range_axes_are_clamped() {
        let mut rig = Rig::new();
        rig.tap(|s| s.arm = true);
        rig.wait();
        rig.tap(|s| s.manual = true);

        let s = rig.step_with(|s| {
            s.drive_axis = -3.0;
            s.turn_axis = f64::NAN;
        });
        assert_eq!(s.linear_ms, 1.0);
        assert_eq!(s.angular_rads, 0.0);
    }

    /// Joystick which holds the arm button for its first few polls.
    struct ScriptedJoystick {
        polls: usize,
        shutdown: Shutdown,
    }

    impl Joystick for ScriptedJoystick {
        fn poll(&mut self) {
            self.polls += 1;
            if self.polls == 5 {
                self.shutdown.trigger();
            }
        }

        fn button(&self, idx: usize) -> bool {
            idx == BTN_ARM && self.polls <= 2
        }

        fn axis(&self, _idx: usize) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_run_stores_snapshots_until_shutdown() {
        let shutdown = Shutdown::new();
        let (writer, reader) = mode_state::channel();
        let mut joystick = ScriptedJoystick {
            polls: 0,
            shutdown: shutdown.clone(),
        };
        let mut logic = ModeLogic::new(SamplerParams::default());

        run(
            &mut joystick,
            &mut logic,
            &writer,
            Duration::from_millis(1),
            &shutdown.token(),
        );

        let s = reader.load();
        assert_eq!(joystick.polls, 5);
        assert!(s.armed);
        assert_eq!(s.colour, Colour::Blue);
    }
}
