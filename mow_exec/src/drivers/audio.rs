//! # Audio Driver
//!
//! Plays a short cue when the robot changes mode. Unlike the drive and light drivers this one is
//! edge triggered: a cue is published once per transition, never repeated while the mode holds.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{convert::Infallible, sync::Arc, time::Duration};
use comms_if::msg::{AudioNote, AudioNoteVector};
use log::debug;

use super::{DriverError, Outputs};
use crate::{
    mode_state::{Mode, ModeState, ModeStateReader},
    schedule::run_at_rate,
    shutdown::ShutdownToken,
};
use util::module::State;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Audio cues played by the robot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cue {
    Manual,
    Idle,
    Autonomous,
    Armed,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Detects transitions and selects the cue to play for them.
#[derive(Default)]
pub struct CueSelector {
    /// Mode and arming seen on the previous cycle, `None` before the first
    last: Option<(Mode, bool)>,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

pub fn run(
    reader: ModeStateReader,
    outputs: Arc<Outputs>,
    period: Duration,
    token: ShutdownToken,
) -> Result<(), DriverError> {
    let mut selector = CueSelector::default();

    run_at_rate(period, &token, |_| {
        let cue = match selector.proc(&reader.load()) {
            Ok(Some(c)) => c,
            Ok(None) => return Ok(()),
            Err(e) => match e {},
        };

        debug!("Playing {:?} cue", cue);

        outputs
            .audio
            .publish(&cue.notes())
            .map_err(|e| DriverError::PublishError("audio", e))
    })
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Cue {
    /// The note sequence of this cue. Each cue replaces anything still playing.
    pub fn notes(&self) -> AudioNoteVector {
        let half = Duration::from_millis(500);
        let short = Duration::from_millis(300);

        let notes = match self {
            Cue::Manual => vec![AudioNote::new(600, half), AudioNote::new(750, half)],
            Cue::Idle => vec![AudioNote::new(600, half), AudioNote::new(450, half)],
            Cue::Autonomous => vec![
                AudioNote::new(600, short),
                AudioNote::new(750, short),
                AudioNote::new(900, short),
            ],
            Cue::Armed => vec![AudioNote::new(300, Duration::from_secs(3))],
        };

        AudioNoteVector::replacing(notes)
    }
}

impl From<Mode> for Cue {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Manual => Cue::Manual,
            Mode::Idle => Cue::Idle,
            Mode::Autonomous => Cue::Autonomous,
        }
    }
}

impl State for CueSelector {
    type InputData = ModeState;
    type OutputData = Option<Cue>;
    type ProcError = Infallible;

    fn proc(&mut self, state: &ModeState) -> Result<Option<Cue>, Infallible> {
        let cue = match self.last {
            None => Some(Cue::from(state.mode)),
            Some((mode, _)) if mode != state.mode => Some(Cue::from(state.mode)),
            Some((_, false)) if state.armed => Some(Cue::Armed),
            _ => None,
        };

        self.last = Some((state.mode, state.armed));

        Ok(cue)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn state(mode: Mode, armed: bool) -> ModeState {
        ModeState {
            mode,
            armed,
            blink: armed,
            ..Default::default()
        }
    }

    #[test]
    fn test_one_cue_per_transition() {
        let mut sel = CueSelector::default();

        let sequence = [
            (state(Mode::Idle, false), 20),
            (state(Mode::Idle, true), 15),
            (state(Mode::Manual, true), 30),
            (state(Mode::Autonomous, true), 10),
            (state(Mode::Autonomous, false), 10),
            (state(Mode::Idle, false), 5),
        ];

        let mut cues = Vec::new();
        for (s, cycles) in sequence.iter() {
            for _ in 0..*cycles {
                if let Some(c) = sel.proc(s).unwrap() {
                    cues.push(c);
                }
            }
        }

        // Disarming is silent
        assert_eq!(
            cues,
            vec![Cue::Idle, Cue::Armed, Cue::Manual, Cue::Autonomous, Cue::Idle]
        );
    }

    #[test]
    fn test_mode_change_wins_over_arming() {
        let mut sel = CueSelector::default();
        sel.proc(&state(Mode::Idle, false)).unwrap();

        assert_eq!(
            sel.proc(&state(Mode::Manual, true)).unwrap(),
            Some(Cue::Manual)
        );
    }

    #[test]
    fn test_cue_notes() {
        let notes = Cue::Autonomous.notes();
        assert!(!notes.append);
        assert_eq!(
            notes.notes.iter().map(|n| n.frequency).collect::<Vec<_>>(),
            vec![600, 750, 900]
        );

        let armed = Cue::Armed.notes();
        assert_eq!(armed.notes.len(), 1);
        assert_eq!(armed.notes[0].max_runtime.sec, 3);
    }
}
