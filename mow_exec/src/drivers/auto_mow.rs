//! # Autonomous Mowing Driver
//!
//! Open-loop back-and-forth coverage pattern: drive straight, turn on the spot, pause, repeat,
//! alternating the turn direction each time. Timing is the only input, no sensors are used.
//!
//! The pattern only runs while the robot is armed in autonomous mode. Leaving that state stops
//! it immediately, and it restarts from the straight leg on the next activation. The turn
//! direction is kept across activations so the alternation carries on.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    convert::Infallible,
    sync::Arc,
    time::{Duration, Instant},
};
use comms_if::msg::Twist;
use log::{debug, info};

use super::{DriverError, Outputs};
use crate::{
    mode_state::{ModeState, ModeStateReader},
    params::MowExecParams,
    schedule::run_at_rate,
    shutdown::ShutdownToken,
};
use util::module::State;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TurnDirection {
    Left,
    Right,
}

/// A leg of the pattern.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Straight,
    Turn(TurnDirection),
    Pause,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the mowing pattern.
#[derive(Debug, Clone)]
pub struct MowParams {
    /// Units: meters/second
    pub straight_speed_ms: f64,
    pub straight_duration: Duration,

    /// Units: radians/second
    pub turn_rate_rads: f64,
    pub turn_duration: Duration,

    pub pause: Duration,
}

/// Input to one cycle of the pattern.
#[derive(Debug, Clone, Copy)]
pub struct AutoInput {
    pub time: Instant,
    pub state: ModeState,
}

/// The mowing pattern's phase machine.
pub struct MowPattern {
    params: MowParams,

    /// Current phase and the instant it started
    current: Option<(Phase, Instant)>,

    last_turn: TurnDirection,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

pub fn run(
    reader: ModeStateReader,
    outputs: Arc<Outputs>,
    params: MowParams,
    period: Duration,
    token: ShutdownToken,
) -> Result<(), DriverError> {
    let mut pattern = MowPattern::new(params);

    run_at_rate(period, &token, |now| {
        let input = AutoInput {
            time: now,
            state: reader.load(),
        };

        let twist = match pattern.proc(&input) {
            Ok(Some(t)) => t,
            Ok(None) => return Ok(()),
            Err(e) => match e {},
        };

        outputs
            .drive
            .publish(&twist)
            .map_err(|e| DriverError::PublishError("auto_mow", e))
    })
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TurnDirection {
    pub fn opposite(self) -> Self {
        match self {
            TurnDirection::Left => TurnDirection::Right,
            TurnDirection::Right => TurnDirection::Left,
        }
    }

    /// Sign of the turn rate, left turns are positive about Z+.
    pub fn sign(self) -> f64 {
        match self {
            TurnDirection::Left => 1.0,
            TurnDirection::Right => -1.0,
        }
    }
}

impl From<&MowExecParams> for MowParams {
    fn from(p: &MowExecParams) -> Self {
        Self {
            straight_speed_ms: p.straight_speed_ms,
            straight_duration: Duration::from_secs_f64(p.straight_duration_s),
            turn_rate_rads: p.turn_rate_rads,
            turn_duration: Duration::from_secs_f64(p.turn_duration_s),
            pause: Duration::from_secs_f64(p.pause_s),
        }
    }
}

impl MowPattern {
    /// Create the pattern. The first turn is to the right.
    pub fn new(params: MowParams) -> Self {
        Self {
            params,
            current: None,
            last_turn: TurnDirection::Left,
        }
    }

    /// The active phase, `None` while the pattern is not running.
    pub fn phase(&self) -> Option<Phase> {
        self.current.map(|(p, _)| p)
    }

    fn duration(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Straight => self.params.straight_duration,
            Phase::Turn(_) => self.params.turn_duration,
            Phase::Pause => self.params.pause,
        }
    }

    /// The phase following `phase`, flipping the turn direction when a turn starts.
    fn next(&mut self, phase: Phase) -> Phase {
        match phase {
            Phase::Straight => {
                self.last_turn = self.last_turn.opposite();
                Phase::Turn(self.last_turn)
            }
            Phase::Turn(_) => Phase::Pause,
            Phase::Pause => Phase::Straight,
        }
    }

    fn command(&self, phase: Phase) -> Twist {
        match phase {
            Phase::Straight => Twist::planar(self.params.straight_speed_ms, 0.0),
            Phase::Turn(d) => Twist::planar(0.0, d.sign() * self.params.turn_rate_rads),
            Phase::Pause => Twist::zero(),
        }
    }
}

impl State for MowPattern {
    type InputData = AutoInput;
    type OutputData = Option<Twist>;
    type ProcError = Infallible;

    fn proc(&mut self, input: &AutoInput) -> Result<Option<Twist>, Infallible> {
        if !input.state.is_auto_engaged() {
            if self.current.take().is_some() {
                info!("Mowing pattern stopped");
            }
            return Ok(None);
        }

        let (mut phase, mut started) = match self.current {
            Some(c) => c,
            None => {
                info!("Mowing pattern started");
                (Phase::Straight, input.time)
            }
        };

        // Phase boundaries follow the ideal schedule so tick jitter doesn't accumulate
        let duration = self.duration(phase);
        if input.time.saturating_duration_since(started) >= duration {
            started += duration;
            phase = self.next(phase);
            debug!("Mowing pattern entering {:?}", phase);
        }

        self.current = Some((phase, started));

        Ok(Some(self.command(phase)))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
