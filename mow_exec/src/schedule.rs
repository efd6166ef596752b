//! # Fixed Rate Scheduling

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::{Duration, Instant};
use crossbeam_channel::select;

use crate::shutdown::ShutdownToken;

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Run `cycle` once every `period` until the shutdown is triggered or `cycle` returns an error.
///
/// The first cycle runs one period after the call. Each cycle receives the instant of its tick.
/// Ticks are not queued: a cycle which overruns causes the missed ticks to be skipped.
pub fn run_at_rate<F, E>(period: Duration, token: &ShutdownToken, mut cycle: F) -> Result<(), E>
where
    F: FnMut(Instant) -> Result<(), E>,
{
    let ticker = crossbeam_channel::tick(period);

    loop {
        // Check first so a tick which is ready at the same time can't delay the exit
        if token.is_triggered() {
            return Ok(());
        }

        select! {
            recv(ticker) -> tick => match tick {
                Ok(now) => cycle(now)?,
                Err(_) => return Ok(()),
            },
            recv(token.receiver()) -> _ => return Ok(()),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
