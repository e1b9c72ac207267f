//! Ammunition and reload state machine.
//!
//! ```text
//!   Idle ──request_reload() [not full]──▶ Reloading ──complete_reload()──▶ Idle
//! ```
//!
//! The controller never measures time itself: a granted reload is turned into a
//! scheduled clock event by the game loop, and `complete_reload` runs when that
//! event is applied at the start of a later frame.

use tracing::{debug, info};

use crate::entities::AmmoState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReloadPhase {
    Idle,
    Reloading,
}

#[derive(Clone, Debug)]
pub struct AmmunitionController {
    state: AmmoState,
    /// Latched ammo-changed notification, drained by the frame diff.
    changed: bool,
}

impl AmmunitionController {
    pub fn new(max: u32) -> Self {
        AmmunitionController {
            state: AmmoState::full(max),
            changed: false,
        }
    }

    pub fn state(&self) -> AmmoState {
        self.state
    }

    pub fn phase(&self) -> ReloadPhase {
        if self.state.reloading {
            ReloadPhase::Reloading
        } else {
            ReloadPhase::Idle
        }
    }

    /// Spend one round.  Returns `false` with no state change while reloading
    /// or when the magazine is empty.
    pub fn request_fire(&mut self) -> bool {
        if self.state.reloading {
            debug!("fire rejected: reloading");
            return false;
        }
        if self.state.current == 0 {
            debug!("fire rejected: magazine empty");
            return false;
        }
        self.state.current -= 1;
        self.changed = true;
        true
    }

    /// Enter `Reloading`.  Returns `true` only when the caller must schedule
    /// the completion; a full magazine or a reload already underway is ignored.
    pub fn request_reload(&mut self) -> bool {
        if self.state.reloading || self.state.current == self.state.max {
            return false;
        }
        self.state.reloading = true;
        self.changed = true;
        info!(current = self.state.current, max = self.state.max, "reload started");
        true
    }

    /// Refill and return to `Idle`.  Runs unconditionally once the reload delay
    /// has elapsed.
    pub fn complete_reload(&mut self) {
        self.state.current = self.state.max;
        self.state.reloading = false;
        self.changed = true;
        info!(max = self.state.max, "reload finished");
    }

    /// Returns whether ammo changed since the last call, clearing the latch.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}
