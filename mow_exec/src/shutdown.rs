//! # Shutdown Signal
//!
//! A single cancellation signal shared by every loop in the executable. Triggering disconnects a
//! channel, so any loop blocked in a `select!` on [`ShutdownToken::receiver`] wakes immediately
//! rather than at its next tick.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::{Arc, Mutex};
use crossbeam_channel::{Receiver, Sender, TryRecvError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Owner of the shutdown signal. Clones trigger the same signal.
#[derive(Clone)]
pub struct Shutdown {
    /// Dropping the sender is the signal
    sender: Arc<Mutex<Option<Sender<()>>>>,

    receiver: Receiver<()>,
}

/// A handle used by a loop to observe the shutdown signal.
#[derive(Clone)]
pub struct ShutdownToken {
    receiver: Receiver<()>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Shutdown {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(0);

        Self {
            sender: Arc::new(Mutex::new(Some(sender))),
            receiver,
        }
    }

    /// Get a token observing this signal.
    pub fn token(&self) -> ShutdownToken {
        ShutdownToken {
            receiver: self.receiver.clone(),
        }
    }

    /// Signal every token. Triggering more than once has no further effect.
    pub fn trigger(&self) {
        self.sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
    }

    pub fn is_triggered(&self) -> bool {
        self.token().is_triggered()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownToken {
    /// Returns true once the shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        matches!(self.receiver.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// The receiver to `select!` on. It never yields a message, it only becomes disconnected
    /// when the shutdown is triggered.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.receiver
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
