// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scripted [`ApplianceApi`] for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::command::ControlRequest;
use crate::control::Control;
use crate::device::{Device, DeviceId};
use crate::error::{ApiError, Error, ErrorKind, Result, ValueError};
use crate::protocol::{ApplianceApi, CommandResponse};

/// One scripted answer to `get_controls`.
pub(crate) enum Scripted {
    Controls(Vec<Control>),
    Fail(ErrorKind),
}

pub(crate) fn error_of(kind: ErrorKind) -> Error {
    match kind {
        ErrorKind::Auth => ApiError::Authentication.into(),
        ErrorKind::RateLimit => ApiError::RateLimited.into(),
        ErrorKind::Fetch => ApiError::Status {
            status: 500,
            message: "Internal Server Error".to_string(),
        }
        .into(),
        ErrorKind::Validation => ValueError::ReadOnly("mock".to_string()).into(),
    }
}

/// Answers from scripts; once a device's script runs out, the last
/// successful control list is repeated.
#[derive(Default)]
pub(crate) struct MockApi {
    devices: Mutex<Vec<Device>>,
    list_error: Mutex<Option<ErrorKind>>,
    scripts: Mutex<HashMap<DeviceId, VecDeque<Scripted>>>,
    last: Mutex<HashMap<DeviceId, Vec<Control>>>,
    fetch_delay: Mutex<Option<Duration>>,
    write_error: Mutex<Option<ErrorKind>>,
    fetches: AtomicUsize,
    writes: Mutex<Vec<(DeviceId, ControlRequest)>>,
}

impl MockApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_device(self, device: Device, controls: Vec<Control>) -> Self {
        self.last.lock().insert(device.id().clone(), controls);
        self.devices.lock().push(device);
        self
    }

    pub(crate) fn fail_listing(&self, kind: ErrorKind) {
        *self.list_error.lock() = Some(kind);
    }

    pub(crate) fn script(&self, device_id: &DeviceId, answer: Scripted) {
        self.scripts
            .lock()
            .entry(device_id.clone())
            .or_default()
            .push_back(answer);
    }

    pub(crate) fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock() = Some(delay);
    }

    pub(crate) fn fail_writes(&self, kind: ErrorKind) {
        *self.write_error.lock() = Some(kind);
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn writes(&self) -> Vec<(DeviceId, ControlRequest)> {
        self.writes.lock().clone()
    }
}

impl ApplianceApi for MockApi {
    async fn list_appliances(&self) -> Result<Vec<Device>> {
        let error = *self.list_error.lock();
        if let Some(kind) = error {
            return Err(error_of(kind));
        }
        Ok(self.devices.lock().clone())
    }

    async fn get_controls(&self, device_id: &DeviceId) -> Result<Vec<Control>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let delay = *self.fetch_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .scripts
            .lock()
            .get_mut(device_id)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Fail(kind)) => Err(error_of(kind)),
            Some(Scripted::Controls(controls)) => {
                self.last.lock().insert(device_id.clone(), controls.clone());
                Ok(controls)
            }
            None => self
                .last
                .lock()
                .get(device_id)
                .cloned()
                .ok_or_else(|| error_of(ErrorKind::Fetch)),
        }
    }

    async fn set_value(&self, device_id: &DeviceId, request: &ControlRequest) -> Result<CommandResponse> {
        self.writes.lock().push((device_id.clone(), request.clone()));

        let error = *self.write_error.lock();
        if let Some(kind) = error {
            return Err(error_of(kind));
        }
        Ok(CommandResponse::default())
    }
}
