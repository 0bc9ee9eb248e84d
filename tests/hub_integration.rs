// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the hub through a custom `ApplianceApi`.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::time::Instant;

use liebherr_lib::command::{ControlCommand, ControlRequest};
use liebherr_lib::config::{PollStrategy, Settings};
use liebherr_lib::event::ApplianceEvent;
use liebherr_lib::manager::ApplianceHub;
use liebherr_lib::protocol::{ApplianceApi, CommandResponse};
use liebherr_lib::scheduler::MIN_POLL_INTERVAL;
use liebherr_lib::{
    ApiError, Control, ControlType, ControlValue, Device, DeviceId, DoorPosition, DoorState,
    Error, HydroBreezeMode, Result, SchedulerState,
};
use parking_lot::Mutex;

/// Account double: every device answers from a queue, then repeats its
/// last answer.
#[derive(Default)]
struct Account {
    devices: Vec<Device>,
    answers: Mutex<HashMap<DeviceId, VecDeque<Result<Vec<Control>>>>>,
    last: Mutex<HashMap<DeviceId, Vec<Control>>>,
    fetches: AtomicU32,
    fetched_at: Mutex<Vec<Instant>>,
    writes: Mutex<Vec<ControlRequest>>,
}

impl Account {
    fn with_device(mut self, id: &str, controls: Vec<Control>) -> Self {
        self.last.lock().insert(DeviceId::new(id), controls);
        self.devices.push(Device::new(id).with_name(format!("Fridge {id}")));
        self
    }

    fn answer(&self, id: &str, answer: Result<Vec<Control>>) {
        self.answers
            .lock()
            .entry(DeviceId::new(id))
            .or_default()
            .push_back(answer);
    }

    fn fetches(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    fn fetch_times(&self) -> Vec<Instant> {
        let mut times = self.fetched_at.lock().clone();
        times.sort();
        times
    }
}

impl ApplianceApi for Account {
    async fn list_appliances(&self) -> Result<Vec<Device>> {
        Ok(self.devices.clone())
    }

    async fn get_controls(&self, device_id: &DeviceId) -> Result<Vec<Control>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.fetched_at.lock().push(Instant::now());
        let next = self
            .answers
            .lock()
            .get_mut(device_id)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Ok(controls)) => {
                self.last.lock().insert(device_id.clone(), controls.clone());
                Ok(controls)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last.lock().get(device_id).cloned().unwrap_or_default()),
        }
    }

    async fn set_value(&self, _device_id: &DeviceId, request: &ControlRequest) -> Result<CommandResponse> {
        self.writes.lock().push(request.clone());
        Ok(CommandResponse::default())
    }
}

fn door(position: DoorPosition) -> Control {
    Control::new(ControlType::AutoDoor, "autodoor", ControlValue::Door(position))
}

fn fan(mode: HydroBreezeMode) -> Control {
    Control::new(ControlType::HydroBreeze, "hydrobreeze", ControlValue::HydroBreeze(mode))
}

/// Runs polling for `window` and returns the fetch times seen after setup.
async fn poll_for(devices: usize, settings: Settings, window: Duration) -> Vec<Instant> {
    let account = (0..devices).fold(Account::default(), |account, i| {
        account.with_device(&format!("d{i}"), vec![fan(HydroBreezeMode::Off)])
    });
    let account = Arc::new(account);
    let hub = ApplianceHub::setup(account.clone(), settings).await.unwrap();
    assert_eq!(account.fetches() as usize, devices);
    account.fetched_at.lock().clear();

    hub.start();
    tokio::time::sleep(window).await;
    hub.stop().await;
    account.fetch_times()
}

fn assert_account_rate(times: &[Instant], devices: usize, window: Duration) {
    for pair in times.windows(2) {
        assert!(
            pair[1] - pair[0] >= MIN_POLL_INTERVAL,
            "fetches {:?} apart",
            pair[1] - pair[0]
        );
    }
    let ceiling = window.as_secs() / MIN_POLL_INTERVAL.as_secs();
    assert!(times.len() as u64 <= ceiling, "{} fetches in {window:?}", times.len());
    assert!(times.len() >= devices, "only {} fetches for {devices} devices", times.len());
}

#[tokio::test(start_paused = true)]
async fn per_device_polling_respects_account_rate() {
    let window = Duration::from_secs(301);
    for devices in [1, 2, 10] {
        let times = poll_for(devices, Settings::default(), window).await;
        assert_account_rate(&times, devices, window);
    }
}

#[tokio::test(start_paused = true)]
async fn per_device_polling_within_one_base_interval() {
    let base = Settings::default().poll_interval();
    let window = base + Duration::from_millis(100);
    for devices in [1, 2, 10] {
        let times = poll_for(devices, Settings::default(), window).await;
        assert!(times.len() <= devices, "{} fetches for {devices} devices", times.len());
        assert!(times.len() as u64 <= base.as_secs() / MIN_POLL_INTERVAL.as_secs());
    }
}

#[tokio::test(start_paused = true)]
async fn sequential_polling_respects_account_rate() {
    let window = Duration::from_secs(301);
    let settings = Settings::default().with_poll_strategy(PollStrategy::Sequential);
    for devices in [1, 2, 10] {
        let times = poll_for(devices, settings.clone(), window).await;
        assert_account_rate(&times, devices, window);
    }
}

#[tokio::test(start_paused = true)]
async fn auth_failure_during_polling_marks_unavailable() {
    let account = Arc::new(Account::default().with_device("a", vec![fan(HydroBreezeMode::Low)]));
    let hub = ApplianceHub::setup(account.clone(), Settings::default())
        .await
        .unwrap();
    let device = DeviceId::new("a");
    let mut events = hub.subscribe_events();
    account.answer("a", Err(ApiError::Authentication.into()));

    hub.start();
    tokio::time::sleep(Duration::from_secs(31)).await;

    assert!(matches!(
        events.recv().await.unwrap(),
        ApplianceEvent::Unavailable { .. }
    ));
    assert_eq!(hub.scheduler_state(&device), Some(SchedulerState::Halted));
    assert!(!hub.is_available(&device));
    assert!(!hub.is_running());
    // last known controls stay readable
    assert_eq!(hub.snapshot(&device).unwrap().len(), 1);
    assert!(matches!(hub.refresh(&device).await, Err(Error::SchedulerHalted(_))));

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(account.fetches(), 2);
}

#[tokio::test(start_paused = true)]
async fn sequential_polling_spaces_devices() {
    let account = Arc::new(
        Account::default()
            .with_device("a", vec![])
            .with_device("b", vec![])
            .with_device("c", vec![]),
    );
    let settings = Settings::default()
        .with_poll_interval(Duration::from_secs(60))
        .with_poll_strategy(PollStrategy::Sequential);
    let hub = ApplianceHub::setup(account.clone(), settings).await.unwrap();
    assert_eq!(hub.poll_interval(), Duration::from_secs(20));
    assert_eq!(account.fetches(), 3);

    hub.start();
    // first round starts after 20 s, devices 60 s apart
    tokio::time::sleep(Duration::from_secs(21)).await;
    assert_eq!(account.fetches(), 4);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(account.fetches(), 5);
    hub.stop().await;
}

#[tokio::test]
async fn door_direction_is_inferred_across_polls() {
    let account = Arc::new(Account::default().with_device("a", vec![door(DoorPosition::Open)]));
    let hub = ApplianceHub::setup(account.clone(), Settings::default())
        .await
        .unwrap();
    let device = DeviceId::new("a");
    let id = door(DoorPosition::Open).identity(&device);

    account.answer("a", Ok(vec![door(DoorPosition::Moving)]));
    account.answer("a", Ok(vec![door(DoorPosition::Closed)]));

    assert_eq!(hub.door_state(&id), DoorState::Open);
    hub.refresh(&device).await.unwrap();
    assert_eq!(hub.door_state(&id), DoorState::Closing);
    hub.refresh(&device).await.unwrap();
    assert_eq!(hub.door_state(&id), DoorState::Closed);
}

#[tokio::test]
async fn fan_percentage_command() {
    let account = Arc::new(Account::default().with_device("a", vec![fan(HydroBreezeMode::Off)]));
    let hub = ApplianceHub::setup(account.clone(), Settings::default())
        .await
        .unwrap();
    let id = fan(HydroBreezeMode::Off).identity(&DeviceId::new("a"));

    let changed = Arc::new(AtomicU32::new(0));
    let counter = changed.clone();
    hub.callbacks().on_control_changed(id.clone(), move |entry| {
        assert!(entry.is_some_and(|e| e.is_pending()));
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let outcome = hub
        .submit(&id, ControlCommand::SetFanPercentage(50))
        .await
        .unwrap();

    assert_eq!(outcome.value(), &ControlValue::HydroBreeze(HydroBreezeMode::Medium));
    assert_eq!(outcome.settle_delay(), None);
    assert_eq!(changed.load(Ordering::SeqCst), 1);
    assert_eq!(
        account.writes.lock().as_slice(),
        &[ControlRequest::HydroBreeze {
            zone_id: 0,
            mode: HydroBreezeMode::Medium
        }]
    );
}

#[tokio::test]
async fn unsubscribe_stops_callbacks() {
    let account = Arc::new(Account::default().with_device("a", vec![fan(HydroBreezeMode::Off)]));
    let hub = ApplianceHub::setup(account.clone(), Settings::default())
        .await
        .unwrap();

    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let sub = hub.callbacks().on_device_changed(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    account.answer("a", Ok(vec![fan(HydroBreezeMode::High)]));
    hub.refresh(&DeviceId::new("a")).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    assert!(hub.callbacks().unsubscribe(sub));
    account.answer("a", Ok(vec![fan(HydroBreezeMode::Low)]));
    hub.refresh(&DeviceId::new("a")).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
