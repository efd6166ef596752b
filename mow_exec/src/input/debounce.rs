//! Per-button debouncing

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Edge detector with a refractory window for a single button.
///
/// A press is accepted on a released-to-pressed edge, and only if at least
/// `window` has passed since the last accepted press of this button. Holding
/// the button down yields a single press.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    pressed: bool,
    last_accepted: Option<Instant>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pressed: false,
            last_accepted: None,
        }
    }

    /// Feed the button's current level, returns true if a press registers.
    pub fn update(&mut self, pressed: bool, now: Instant) -> bool {
        let rising_edge = pressed && !self.pressed;
        self.pressed = pressed;

        if !rising_edge {
            return false;
        }

        match self.last_accepted {
            Some(t) if now.saturating_duration_since(t) < self.window => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    fn ms(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    #[test]
    fn test_held_button_registers_once() {
        let t0 = Instant::now();
        let mut db = Debouncer::new(WINDOW);

        let presses = (0..20)
            .filter(|i| db.update(true, ms(t0, i * 100)))
            .count();

        assert_eq!(presses, 1);
    }

    #[test]
    fn test_presses_inside_window_register_once() {
        let t0 = Instant::now();
        let mut db = Debouncer::new(WINDOW);

        assert!(db.update(true, ms(t0, 0)));
        assert!(!db.update(false, ms(t0, 100)));
        assert!(!db.update(true, ms(t0, 200)));
        assert!(!db.update(false, ms(t0, 250)));
        assert!(!db.update(true, ms(t0, 299)));
    }

    #[test]
    fn test_presses_outside_window_both_register() {
        let t0 = Instant::now();
        let mut db = Debouncer::new(WINDOW);

        assert!(db.update(true, ms(t0, 0)));
        assert!(!db.update(false, ms(t0, 100)));
        assert!(db.update(true, ms(t0, 300)));
        assert!(!db.update(false, ms(t0, 400)));
        assert!(db.update(true, ms(t0, 1000)));
    }
}
