// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command validation, submission and optimistic update.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::{ControlCommand, ControlRequest};
use crate::control::{Control, ControlIdentity, ControlType, ControlValue, ToggleSpec};
use crate::device::{Device, DeviceId};
use crate::error::{Error, Result, ValueError};
use crate::protocol::ApplianceApi;
use crate::registry::ControlRegistry;
use crate::resolver::{BrightnessScale, DoorState, DoorTracker, percentage_to_mode};
use crate::subscription::Notifier;
use crate::types::{DoorPosition, HydroBreezeMode, IceMakerMode};

/// A validated command, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    /// Wire request.
    pub request: ControlRequest,
    /// Value to apply optimistically once the write succeeds.
    pub value: ControlValue,
    /// Door direction to seed, for door commands.
    pub door: Option<DoorState>,
}

/// Validates `command` against `control` and builds the write.
///
/// Never touches the network.
///
/// # Errors
///
/// Returns a [`ValueError`] if the command does not fit the control's
/// family, option set or bounds, or if the control is read-only.
pub fn prepare(
    control: &Control,
    command: &ControlCommand,
    scale: BrightnessScale,
) -> std::result::Result<Prepared, ValueError> {
    let zone_id = control.zone_id();
    let bounds = control.bounds();
    let unsupported = || ValueError::UnsupportedCommand {
        command: command.name(),
        control: control.control_type().to_string(),
    };

    let prepared = match (control.control_type(), command) {
        (ControlType::Temperature, ControlCommand::SetTemperature(target)) => {
            check_range(*target, bounds.min, bounds.max)?;
            let current = match control.value() {
                ControlValue::Temperature { current, .. } => *current,
                _ => None,
            };
            Prepared {
                request: ControlRequest::Temperature {
                    zone_id,
                    target: *target,
                    unit: bounds.unit.clone().unwrap_or_default(),
                },
                value: ControlValue::Temperature {
                    current,
                    target: Some(*target),
                },
                door: None,
            }
        }
        (ControlType::AutoDoor, ControlCommand::OpenDoor | ControlCommand::CloseDoor) => {
            let open = matches!(command, ControlCommand::OpenDoor);
            Prepared {
                request: ControlRequest::AutoDoor { zone_id, open },
                value: ControlValue::Door(DoorPosition::Moving),
                door: Some(if open {
                    DoorState::Opening
                } else {
                    DoorState::Closing
                }),
            }
        }
        (ControlType::Toggle, ControlCommand::SetToggle(on)) => {
            let Some(spec) = ToggleSpec::lookup(control.name()) else {
                tracing::error!(control = %control.name(), "Unknown toggle, refusing write");
                return Err(unsupported());
            };
            Prepared {
                request: ControlRequest::Toggle {
                    name: spec.name.to_string(),
                    zone_id: spec.zoned.then_some(zone_id),
                    value: *on,
                },
                value: ControlValue::Toggle(*on),
                door: None,
            }
        }
        (
            ControlType::HydroBreeze,
            ControlCommand::SetFanMode(_) | ControlCommand::SetFanPercentage(_) | ControlCommand::TurnOnFan,
        ) => {
            let mode = match command {
                ControlCommand::SetFanMode(mode) => *mode,
                ControlCommand::SetFanPercentage(percentage) => percentage_to_mode(*percentage),
                _ => HydroBreezeMode::Low,
            };
            if !bounds.supported_modes.is_empty() {
                check_option(mode.as_str(), &bounds.supported_modes)?;
            }
            Prepared {
                request: ControlRequest::HydroBreeze { zone_id, mode },
                value: ControlValue::HydroBreeze(mode),
                door: None,
            }
        }
        (ControlType::PresentationLight, ControlCommand::SetBrightness(brightness)) => {
            let level = scale.brightness_to_level(*brightness);
            Prepared {
                request: ControlRequest::PresentationLight { target: level },
                value: ControlValue::PresentationLight(level),
                door: None,
            }
        }
        (ControlType::PresentationLight, ControlCommand::SetLightLevel(level)) => {
            let max = bounds.max.unwrap_or_else(|| i32::from(scale.max()));
            check_range(i32::from(*level), Some(0), Some(max))?;
            Prepared {
                request: ControlRequest::PresentationLight { target: *level },
                value: ControlValue::PresentationLight(*level),
                door: None,
            }
        }
        (ControlType::IceMaker, ControlCommand::SelectOption(option)) => {
            let options = IceMakerMode::options(bounds.has_max_ice);
            let Some(mode) = options.iter().find(|m| m.as_str() == option).copied() else {
                return Err(ValueError::InvalidOption {
                    option: option.clone(),
                    allowed: options.iter().map(|m| m.as_str().to_string()).collect(),
                });
            };
            Prepared {
                request: ControlRequest::IceMaker { zone_id, mode },
                value: ControlValue::IceMaker(mode),
                door: None,
            }
        }
        (ControlType::BioFreshPlus, ControlCommand::SelectOption(option)) => {
            check_option(option, &bounds.supported_modes)?;
            Prepared {
                request: ControlRequest::BioFreshPlus {
                    zone_id,
                    mode: option.clone(),
                },
                value: ControlValue::BioFreshPlus(option.clone()),
                door: None,
            }
        }
        (ControlType::Other(_), _) => {
            return Err(ValueError::ReadOnly(control.name().to_string()));
        }
        _ => return Err(unsupported()),
    };

    Ok(prepared)
}

fn check_range(value: i32, min: Option<i32>, max: Option<i32>) -> std::result::Result<(), ValueError> {
    let below = min.is_some_and(|min| value < min);
    let above = max.is_some_and(|max| value > max);
    if below || above {
        return Err(ValueError::OutOfRange {
            min: i64::from(min.unwrap_or(i32::MIN)),
            max: i64::from(max.unwrap_or(i32::MAX)),
            actual: i64::from(value),
        });
    }
    Ok(())
}

fn check_option(option: &str, allowed: &[String]) -> std::result::Result<(), ValueError> {
    if allowed.iter().any(|candidate| candidate == option) {
        Ok(())
    } else {
        Err(ValueError::InvalidOption {
            option: option.to_string(),
            allowed: allowed.to_vec(),
        })
    }
}

/// Result of an accepted command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    identity: ControlIdentity,
    value: ControlValue,
    settle_delay: Option<Duration>,
}

impl CommandOutcome {
    /// Returns the written control.
    #[must_use]
    pub fn identity(&self) -> &ControlIdentity {
        &self.identity
    }

    /// Returns the value applied optimistically.
    #[must_use]
    pub fn value(&self) -> &ControlValue {
        &self.value
    }

    /// Returns how long to wait before trusting the next poll.
    ///
    /// Honouring it is up to the caller; a poll inside this window may still
    /// return the value from before the write.
    #[must_use]
    pub fn settle_delay(&self) -> Option<Duration> {
        self.settle_delay
    }
}

/// Validates, sends and optimistically applies control writes.
pub struct CommandPipeline<A> {
    api: Arc<A>,
    registry: Arc<ControlRegistry>,
    doors: Arc<DoorTracker>,
    notifier: Notifier,
    scales: HashMap<DeviceId, BrightnessScale>,
}

impl<A: ApplianceApi> CommandPipeline<A> {
    /// Creates a pipeline. Every device uses the default brightness scale
    /// until registered with [`with_devices`](Self::with_devices).
    #[must_use]
    pub fn new(
        api: Arc<A>,
        registry: Arc<ControlRegistry>,
        doors: Arc<DoorTracker>,
        notifier: Notifier,
    ) -> Self {
        Self {
            api,
            registry,
            doors,
            notifier,
            scales: HashMap::new(),
        }
    }

    /// Records each device's brightness scale from its model.
    #[must_use]
    pub fn with_devices(mut self, devices: &[Device]) -> Self {
        for device in devices {
            self.scales.insert(
                device.id().clone(),
                BrightnessScale::for_model(device.model()),
            );
        }
        self
    }

    /// Returns the brightness scale used for a device.
    #[must_use]
    pub fn brightness_scale(&self, device_id: &DeviceId) -> BrightnessScale {
        self.scales.get(device_id).copied().unwrap_or_default()
    }

    /// Submits a command for one control.
    ///
    /// On success the registry holds the new value, marked pending, and
    /// observers have been notified. If a poll removed the control while the
    /// write was in flight, the write still counts as accepted and only the
    /// local update is skipped. On failure nothing is changed.
    ///
    /// # Errors
    ///
    /// - [`Error::ControlNotFound`] if the control is not in the snapshot
    /// - [`Error::Value`] if validation fails (no request is sent)
    /// - any error from the API write
    pub async fn submit(&self, identity: &ControlIdentity, command: ControlCommand) -> Result<CommandOutcome> {
        let control = self
            .registry
            .get(identity)
            .ok_or_else(|| Error::ControlNotFound(identity.clone()))?;

        let prepared = prepare(
            &control,
            &command,
            self.brightness_scale(identity.device_id()),
        )
        .inspect_err(|e| {
            tracing::debug!(control = %identity, command = %command, error = %e, "Command rejected");
        })?;

        tracing::debug!(control = %identity, command = %command, "Sending command");

        if let Err(e) = self
            .api
            .set_value(identity.device_id(), &prepared.request)
            .await
        {
            tracing::warn!(control = %identity, error = %e, "Command failed");
            return Err(e);
        }

        match self
            .registry
            .apply_optimistic(identity, prepared.value.clone())
        {
            Ok(changed) => {
                if let Some(state) = prepared.door {
                    self.doors.force(identity, state);
                }
                if let Some(snapshot) = self.registry.snapshot(identity.device_id()) {
                    self.notifier
                        .command_applied(identity, prepared.value.clone(), changed, snapshot);
                }
            }
            Err(e) => {
                tracing::warn!(control = %identity, error = %e, "Command sent but control is gone, skipping local update");
            }
        }

        Ok(CommandOutcome {
            identity: identity.clone(),
            value: prepared.value,
            settle_delay: prepared.request.settle_delay(),
        })
    }
}

impl<A> std::fmt::Debug for CommandPipeline<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandPipeline")
            .field("devices", &self.scales.len())
            .finish_non_exhaustive()
    }
}
