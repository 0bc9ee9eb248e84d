// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door direction inference.
//!
//! The HomeAPI reports only `CLOSED`, `OPEN` or `MOVING`. While the door is
//! moving, its direction is taken from the previously resolved state:
//!
//! | previous            | raw      | resolved |
//! |---------------------|----------|----------|
//! | any                 | `CLOSED` | Closed   |
//! | any                 | `OPEN`   | Open     |
//! | Closed, Opening     | `MOVING` | Opening  |
//! | Open, Closing       | `MOVING` | Closing  |
//! | Unknown             | `MOVING` | Opening  |
//!
//! A missed poll can make the inferred direction wrong until the door
//! reaches an end position.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::control::ControlIdentity;
use crate::types::DoorPosition;

/// Resolved door state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DoorState {
    /// No position observed yet.
    #[default]
    Unknown,
    /// Fully closed.
    Closed,
    /// Fully open.
    Open,
    /// Moving towards open.
    Opening,
    /// Moving towards closed.
    Closing,
}

impl DoorState {
    /// Computes the next state from the previous one and a raw position.
    ///
    /// # Examples
    ///
    /// ```
    /// use liebherr_lib::resolver::DoorState;
    /// use liebherr_lib::types::DoorPosition;
    ///
    /// let s = DoorState::Open.resolve(DoorPosition::Moving);
    /// assert_eq!(s, DoorState::Closing);
    /// ```
    #[must_use]
    pub const fn resolve(self, raw: DoorPosition) -> Self {
        match raw {
            DoorPosition::Closed => Self::Closed,
            DoorPosition::Open => Self::Open,
            DoorPosition::Moving => match self {
                Self::Open | Self::Closing => Self::Closing,
                Self::Unknown | Self::Closed | Self::Opening => Self::Opening,
            },
        }
    }

    /// Returns `true` while the door is moving.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }

    /// Returns `Some(true)` when closed, `Some(false)` when not, `None` when unknown.
    #[must_use]
    pub const fn is_closed(&self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::Closed => Some(true),
            Self::Open | Self::Opening | Self::Closing => Some(false),
        }
    }

    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Closed => "closed",
            Self::Open => "open",
            Self::Opening => "opening",
            Self::Closing => "closing",
        }
    }
}

impl std::fmt::Display for DoorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side-table of resolved door states keyed by control identity.
///
/// Entries persist across polls. Identities never observed read as
/// [`DoorState::Unknown`].
#[derive(Debug, Default)]
pub struct DoorTracker {
    states: Mutex<HashMap<ControlIdentity, DoorState>>,
}

impl DoorTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a polled position and returns the resolved state.
    pub fn observe(&self, identity: &ControlIdentity, raw: DoorPosition) -> DoorState {
        let mut states = self.states.lock();
        let previous = states.get(identity).copied().unwrap_or_default();
        let next = previous.resolve(raw);
        if next != previous {
            tracing::debug!(control = %identity, from = %previous, to = %next, "Door state changed");
        }
        states.insert(identity.clone(), next);
        next
    }

    /// Returns the current resolved state.
    #[must_use]
    pub fn get(&self, identity: &ControlIdentity) -> DoorState {
        self.states.lock().get(identity).copied().unwrap_or_default()
    }

    /// Overrides the resolved state, e.g. after an accepted open/close command.
    pub fn force(&self, identity: &ControlIdentity, state: DoorState) {
        self.states.lock().insert(identity.clone(), state);
    }

    /// Adds an identity in the [`DoorState::Unknown`] state if absent.
    pub fn track(&self, identity: &ControlIdentity) {
        self.states.lock().entry(identity.clone()).or_default();
    }

    /// Drops the entry of a control that disappeared.
    pub fn remove(&self, identity: &ControlIdentity) -> bool {
        self.states.lock().remove(identity).is_some()
    }

    /// Returns the number of tracked doors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.lock().len()
    }

    /// Returns `true` if no door is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.lock().is_empty()
    }
}
