//! Chop gesture state machine
//!
//! Converts a press/release input stream into crossfade flips with a
//! minimum hold time of one beat (by default) at the current effective
//! tempo. Press flips immediately; release flips back immediately when
//! the hold was long enough, otherwise the return flip is deferred to
//! the remainder of the beat. A chop shorter than its rhythmic unit
//! would be musically useless.
//!
//! The machine is single-threaded and poll-driven: it stores a deadline
//! instead of owning a timer, so hosts deliver the deferred flip from
//! their tick (or an exact wakeup via [`ChopGesture::next_deadline`])
//! and tests drive it with a manual clock.

use crate::types::beat_ms;

/// Default rhythmic unit for the minimum hold, in beats
pub const DEFAULT_CHOP_UNIT_BEATS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureState {
    /// No gesture in flight
    Idle,
    /// Button held since `pressed_at_ms`; `min_hold_ms` frozen at press
    Held {
        pressed_at_ms: f64,
        min_hold_ms: f64,
    },
}

/// Press/release gesture machine producing crossfade flips
///
/// The machine itself never touches the crossfader; its methods report
/// whether the caller must flip now, keeping the update flow explicit
/// and one-directional.
#[derive(Debug, Clone)]
pub struct ChopGesture {
    /// Minimum hold expressed in beats of the current tempo
    unit_beats: f64,
    state: GestureState,
    /// Deadline (clock ms) of the single pending deferred flip
    deferred_at_ms: Option<f64>,
}

impl ChopGesture {
    /// Create a gesture machine with the given rhythmic unit
    pub fn new(unit_beats: f64) -> Self {
        Self {
            unit_beats: if unit_beats > 0.0 {
                unit_beats
            } else {
                DEFAULT_CHOP_UNIT_BEATS
            },
            state: GestureState::Idle,
            deferred_at_ms: None,
        }
    }

    /// Minimum hold in milliseconds at the given tempo
    pub fn min_hold_ms(&self, bpm: f64) -> f64 {
        beat_ms(bpm) * self.unit_beats
    }

    /// Handle a gesture press; the caller flips the crossfader now
    ///
    /// Cancels any deferred flip left over from a previous gesture so a
    /// stale timer can never bleed into this one (last-writer-wins).
    pub fn press(&mut self, now_ms: f64, current_bpm: f64) {
        if self.deferred_at_ms.take().is_some() {
            log::debug!("chop press cancels stale deferred flip");
        }
        self.state = GestureState::Held {
            pressed_at_ms: now_ms,
            min_hold_ms: self.min_hold_ms(current_bpm),
        };
    }

    /// Handle a gesture release
    ///
    /// Returns `true` when the hold already lasted the minimum and the
    /// caller must flip back immediately. Otherwise the return flip is
    /// deferred to the remainder of the rhythmic unit and `false` is
    /// returned; [`poll`](Self::poll) delivers it.
    pub fn release(&mut self, now_ms: f64) -> bool {
        let GestureState::Held {
            pressed_at_ms,
            min_hold_ms,
        } = self.state
        else {
            // Release without a matching press (e.g. focus lost mid-gesture)
            return false;
        };
        self.state = GestureState::Idle;

        let elapsed = now_ms - pressed_at_ms;
        if elapsed >= min_hold_ms {
            true
        } else {
            self.deferred_at_ms = Some(pressed_at_ms + min_hold_ms);
            false
        }
    }

    /// Deliver a due deferred flip
    ///
    /// Returns `true` exactly once per deferred flip, when `now_ms` has
    /// reached the deadline; the caller flips the crossfader.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deferred_at_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deferred_at_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Deadline of the pending deferred flip, for hosts that schedule
    /// an exact wakeup instead of relying on the advisory tick
    pub fn next_deadline(&self) -> Option<f64> {
        self.deferred_at_ms
    }

    /// Whether a press is currently held
    pub fn is_held(&self) -> bool {
        matches!(self.state, GestureState::Held { .. })
    }
}

impl Default for ChopGesture {
    fn default() -> Self {
        Self::new(DEFAULT_CHOP_UNIT_BEATS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_hold_follows_tempo() {
        let chop = ChopGesture::default();
        assert_eq!(chop.min_hold_ms(120.0), 500.0);
        assert_eq!(chop.min_hold_ms(60.0), 1000.0);

        let half = ChopGesture::new(0.5);
        assert_eq!(half.min_hold_ms(120.0), 250.0);
    }

    #[test]
    fn test_short_hold_defers_flip() {
        // 120 bpm -> 500 ms minimum. Press at 0, release at 200:
        // the return flip fires at 500, not before.
        let mut chop = ChopGesture::default();
        chop.press(0.0, 120.0);
        assert!(chop.is_held());

        assert!(!chop.release(200.0));
        assert_eq!(chop.next_deadline(), Some(500.0));

        assert!(!chop.poll(499.0));
        assert!(chop.poll(501.0));
        // Delivered exactly once
        assert!(!chop.poll(600.0));
        assert_eq!(chop.next_deadline(), None);
    }

    #[test]
    fn test_long_hold_flips_immediately() {
        let mut chop = ChopGesture::default();
        chop.press(0.0, 120.0);
        assert!(chop.release(600.0));
        assert_eq!(chop.next_deadline(), None);
    }

    #[test]
    fn test_new_press_cancels_stale_deferred() {
        let mut chop = ChopGesture::default();
        chop.press(0.0, 120.0);
        assert!(!chop.release(100.0));
        assert_eq!(chop.next_deadline(), Some(500.0));

        // Re-press before the stale flip fires: it must be cancelled
        chop.press(300.0, 120.0);
        assert_eq!(chop.next_deadline(), None);
        assert!(!chop.poll(500.0));

        // The new gesture gets its own clean deferral
        assert!(!chop.release(400.0));
        assert_eq!(chop.next_deadline(), Some(800.0));
        assert!(chop.poll(800.0));
    }

    #[test]
    fn test_min_hold_uses_tempo_at_press() {
        // Hold duration is frozen at press; later tempo changes do not
        // retroactively stretch an in-flight gesture.
        let mut chop = ChopGesture::default();
        chop.press(0.0, 60.0); // 1000 ms minimum
        assert!(!chop.release(900.0));
        assert_eq!(chop.next_deadline(), Some(1000.0));
    }

    #[test]
    fn test_release_without_press_ignored() {
        let mut chop = ChopGesture::default();
        assert!(!chop.release(100.0));
        assert_eq!(chop.next_deadline(), None);
    }
}
