// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control change representation.
//!
//! A [`ControlChange`] is produced for every identity whose value differs
//! between two snapshots of the same device. Only the value is compared;
//! bounds and the fetch timestamp never produce a change.
//!
//! # Examples
//!
//! ```
//! use liebherr_lib::{ControlIdentity, ControlType, DeviceId};
//! use liebherr_lib::registry::ControlChange;
//!
//! let id = ControlIdentity::new(DeviceId::new("1"), ControlType::Toggle, 0, "nightmode");
//! let change = ControlChange::Updated(id.clone());
//! assert_eq!(change.identity(), &id);
//! assert!(change.is_updated());
//! ```

use crate::control::ControlIdentity;

/// A difference between two snapshots for one control.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlChange {
    /// The control appeared.
    Added(ControlIdentity),
    /// The control disappeared.
    Removed(ControlIdentity),
    /// The control's value changed.
    Updated(ControlIdentity),
}

impl ControlChange {
    /// Returns the identity of the changed control.
    #[must_use]
    pub fn identity(&self) -> &ControlIdentity {
        match self {
            Self::Added(id) | Self::Removed(id) | Self::Updated(id) => id,
        }
    }

    /// Returns `true` for [`ControlChange::Added`].
    #[must_use]
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    /// Returns `true` for [`ControlChange::Removed`].
    #[must_use]
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed(_))
    }

    /// Returns `true` for [`ControlChange::Updated`].
    #[must_use]
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}
