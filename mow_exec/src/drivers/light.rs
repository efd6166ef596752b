//! # Light Driver
//!
//! Shows the mode state's colour on the light ring. The driver ticks every half second: even
//! ticks show the colour, odd ticks turn the ring off while blinking and are skipped otherwise,
//! giving a 1 Hz blink or a 1 Hz refresh of a held colour.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{convert::Infallible, sync::Arc, time::Duration};
use comms_if::msg::{LedColor, LightringLeds, NUM_LEDS};
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{DriverError, Outputs};
use crate::{
    mode_state::{Colour, ModeState, ModeStateReader},
    schedule::run_at_rate,
    shutdown::ShutdownToken,
};
use util::module::State;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Period of one light tick, half of the blink cycle.
pub const LIGHT_TICK_PERIOD: Duration = Duration::from_millis(500);

/// Colours shown in turn by `Colour::RgbCycle`.
const RGB_CYCLE: [LedColor; 3] = [
    LedColor::new(255, 0, 0),
    LedColor::new(0, 255, 0),
    LedColor::new(0, 0, 255),
];

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Produces the light ring command for each tick.
pub struct LightSequencer {
    tick: u64,

    rng: StdRng,
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
    let mut sequencer = LightSequencer::new();

    run_at_rate(period, &token, |_| {
        let state = reader.load();

        let leds = match sequencer.proc(&state) {
            Ok(Some(l)) => l,
            Ok(None) => return Ok(()),
            Err(e) => match e {},
        };

        trace!("Light: {:?} (blink {})", state.colour, state.blink);

        outputs
            .light
            .publish(&leds)
            .map_err(|e| DriverError::PublishError("light", e))
    })
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LightSequencer {
    pub fn new() -> Self {
        Self {
            tick: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a sequencer with reproducible `Colour::Random` output.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            tick: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn leds_for(&mut self, colour: Colour, second: u64) -> LightringLeds {
        match colour {
            Colour::RgbCycle => LightringLeds::solid(RGB_CYCLE[(second % 3) as usize]),
            Colour::Random => {
                let mut leds = [LedColor::default(); NUM_LEDS];
                for led in leds.iter_mut() {
                    *led = LedColor::new(self.rng.gen(), self.rng.gen(), self.rng.gen());
                }
                LightringLeds {
                    leds,
                    override_system: true,
                }
            }
            fixed => LightringLeds::solid(fixed.rgb().unwrap_or_default()),
        }
    }
}

impl Default for LightSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl State for LightSequencer {
    type InputData = ModeState;
    type OutputData = Option<LightringLeds>;
    type ProcError = Infallible;

    fn proc(&mut self, state: &ModeState) -> Result<Option<LightringLeds>, Infallible> {
        let tick = self.tick;
        self.tick += 1;

        if tick % 2 == 1 {
            return Ok(match state.blink {
                true => Some(LightringLeds::off()),
                false => None,
            });
        }

        Ok(Some(self.leds_for(state.colour, tick / 2)))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn state(colour: Colour, blink: bool) -> ModeState {
        ModeState {
            colour,
            blink,
            armed: blink,
            ..Default::default()
        }
    }

    #[test]
    fn test_held_colour_refreshes_at_1_hz() {
        let mut seq = LightSequencer::with_seed(1);
        let s = state(Colour::Blue, false);

        let out: Vec<_> = (0..6).map(|_| seq.proc(&s).unwrap()).collect();

        for (i, o) in out.iter().enumerate() {
            if i % 2 == 0 {
                assert_eq!(o, &Some(LightringLeds::solid(LedColor::new(0, 0, 255))));
            } else {
                assert_eq!(o, &None);
            }
        }
    }

    #[test]
    fn test_blink_alternates_with_off() {
        let mut seq = LightSequencer::with_seed(1);
        let s = state(Colour::Green, true);

        for i in 0..6 {
            let leds = seq.proc(&s).unwrap().unwrap();
            if i % 2 == 0 {
                assert_eq!(leds, LightringLeds::solid(LedColor::new(0, 255, 0)));
            } else {
                assert!(leds.is_off());
            }
        }
    }

    #[test]
    fn test_rgb_cycle_changes_each_second() {
        let mut seq = LightSequencer::with_seed(1);
        let s = state(Colour::RgbCycle, false);

        let shown: Vec<LightringLeds> = (0..8).filter_map(|_| seq.proc(&s).unwrap()).collect();

        assert_eq!(shown.len(), 4);
        assert_eq!(shown[0], LightringLeds::solid(RGB_CYCLE[0]));
        assert_eq!(shown[1], LightringLeds::solid(RGB_CYCLE[1]));
        assert_eq!(shown[2], LightringLeds::solid(RGB_CYCLE[2]));
        assert_eq!(shown[3], LightringLeds::solid(RGB_CYCLE[0]));
    }

    #[test]
    fn test_random_is_reproducible_from_seed() {
        let s = state(Colour::Random, false);

        let a = LightSequencer::with_seed(7).proc(&s).unwrap();
        let b = LightSequencer::with_seed(7).proc(&s).unwrap();

        assert!(a.is_some());
        assert_eq!(a, b);
    }
}
