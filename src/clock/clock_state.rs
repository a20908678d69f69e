//! Dual countdown state machine
//!
//! `ClockState` owns both countdowns. Every mutation takes the instant at
//! which it happens, and elapsed time is always measured against the previous
//! tick or transition, so irregular tick scheduling never skews the result.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::ClockError;

/// Base time used when a game is requested without one.
pub const DEFAULT_BASE_SECONDS: f64 = 300.0;
/// Increment used when a game is requested without one.
pub const DEFAULT_INCREMENT_SECONDS: f64 = 0.0;

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "white" => Some(Side::White),
            "black" => Some(Side::Black),
            _ => None,
        }
    }
}

/// A value kept for each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerSide<T> {
    pub white: T,
    pub black: T,
}

impl<T: Clone> PerSide<T> {
    pub fn both(value: T) -> Self {
        Self {
            white: value.clone(),
            black: value,
        }
    }
}

impl<T> PerSide<T> {
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Side, &T) -> U) -> PerSide<U> {
        PerSide {
            white: f(Side::White, &self.white),
            black: f(Side::Black, &self.black),
        }
    }
}

/// Something observable that a transition did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockEvent {
    /// Opening press; `running` is the side whose clock started.
    Started { running: Side },
    /// The active side finished its move and received its increment.
    TurnPassed { from: Side, to: Side, increment: f64 },
    Paused,
    Resumed,
    Restarted,
    /// A side ran out of time. Terminal until restart.
    Expired { side: Side },
}

/// Authoritative state of one game.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockState {
    remaining: PerSide<f64>,
    turn: Option<Side>,
    paused: bool,
    expired: PerSide<bool>,
    base_seconds: f64,
    increment_seconds: f64,
    last_tick: Option<Instant>,
}

impl ClockState {
    /// Create a fresh game. Rejects a non-positive base or a negative increment.
    pub fn start(base_seconds: f64, increment_seconds: f64) -> Result<Self, ClockError> {
        if !base_seconds.is_finite() || base_seconds <= 0.0 {
            return Err(ClockError::InvalidBase(base_seconds));
        }
        if !increment_seconds.is_finite() || increment_seconds < 0.0 {
            return Err(ClockError::InvalidIncrement(increment_seconds));
        }
        Ok(Self::fresh(base_seconds, increment_seconds))
    }

    fn fresh(base_seconds: f64, increment_seconds: f64) -> Self {
        Self {
            remaining: PerSide::both(base_seconds),
            turn: None,
            paused: false,
            expired: PerSide::both(false),
            base_seconds,
            increment_seconds,
            last_tick: None,
        }
    }

    /// Handle a tap on `side`.
    ///
    /// The opening tap starts the opponent's clock. After that only the side
    /// whose clock is running may tap, which adds its increment and hands the
    /// turn over. Anything else is ignored and returns `None`.
    pub fn press_side(&mut self, side: Side, now: Instant) -> Option<ClockEvent> {
        if self.paused {
            return None;
        }

        match self.turn {
            None if self.is_concluded() => None,
            None => {
                let running = side.opposite();
                self.turn = Some(running);
                self.last_tick = Some(now);
                Some(ClockEvent::Started { running })
            }
            Some(active) if active == side => {
                *self.remaining.get_mut(side) += self.increment_seconds;
                let next = side.opposite();
                self.turn = Some(next);
                self.last_tick = Some(now);
                Some(ClockEvent::TurnPassed {
                    from: side,
                    to: next,
                    increment: self.increment_seconds,
                })
            }
            Some(_) => None,
        }
    }

    /// Account for the time elapsed since the previous tick or transition.
    ///
    /// Returns `Expired` the moment the running side hits zero.
    pub fn tick(&mut self, now: Instant) -> Option<ClockEvent> {
        let delta = match self.last_tick {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        // An instant older than the last one never rewinds the baseline.
        self.last_tick = Some(self.last_tick.map_or(now, |last| last.max(now)));

        let side = self.running_side()?;
        let remaining = self.remaining.get_mut(side);
        *remaining = (*remaining - delta).max(0.0);

        if *remaining <= 0.0 && !*self.expired.get(side) {
            *self.expired.get_mut(side) = true;
            self.turn = None;
            return Some(ClockEvent::Expired { side });
        }
        None
    }

    /// Flip the pause flag. Resuming restarts elapsed-time accounting at `now`.
    pub fn toggle_pause(&mut self, now: Instant) -> Option<ClockEvent> {
        self.paused = !self.paused;
        if self.paused {
            Some(ClockEvent::Paused)
        } else {
            if self.turn.is_some() {
                self.last_tick = Some(now);
            }
            Some(ClockEvent::Resumed)
        }
    }

    /// Back to the opening position with the original time control.
    pub fn restart(&mut self) -> Option<ClockEvent> {
        *self = Self::fresh(self.base_seconds, self.increment_seconds);
        Some(ClockEvent::Restarted)
    }

    /// Whether a periodic driver should currently be delivering ticks.
    pub fn should_tick(&self) -> bool {
        self.running_side().is_some()
    }

    fn running_side(&self) -> Option<Side> {
        self.turn
            .filter(|side| !self.paused && !*self.expired.get(*side))
    }

    /// A game with no turn and a side at zero is over until restart.
    pub fn is_concluded(&self) -> bool {
        self.expired.white
            || self.expired.black
            || self.remaining.white <= 0.0
            || self.remaining.black <= 0.0
    }

    pub fn remaining(&self, side: Side) -> f64 {
        *self.remaining.get(side)
    }

    pub fn remaining_both(&self) -> PerSide<f64> {
        self.remaining
    }

    pub fn turn(&self) -> Option<Side> {
        self.turn
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_expired(&self, side: Side) -> bool {
        *self.expired.get(side)
    }

    pub fn expired_both(&self) -> PerSide<bool> {
        self.expired
    }

    pub fn base_seconds(&self) -> f64 {
        self.base_seconds
    }

    pub fn increment_seconds(&self) -> f64 {
        self.increment_seconds
    }
}

impl Default for ClockState {
    fn default() -> Self {
        Self::fresh(DEFAULT_BASE_SECONDS, DEFAULT_INCREMENT_SECONDS)
    }
}
