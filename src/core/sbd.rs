//! Watchdog (SBD) subsystem state and the stonith-watchdog-timeout policy.
//!
//! The `stonith-watchdog-timeout` cluster property is only meaningful in
//! certain live states of the SBD fencing subsystem, so validating it needs
//! an external query. The query is lazy and memoized per validation call:
//! [`SbdStateCell`] probes the service manager at most once no matter how
//! many code paths evaluate the policy.

use std::cell::OnceCell;

use crate::core::reports::{ReportItem, ReportMessage, SbdReason};
use crate::core::values::timeout_to_seconds;

/// Live-state queries against the local SBD subsystem. Implementations are
/// expected to be cheap to call but may perform I/O; validation snapshots
/// the answers through [`SbdStateCell`].
pub trait ServiceManager {
    fn is_sbd_enabled(&self) -> bool;
    fn local_sbd_devices(&self) -> Vec<String>;
    /// Only meaningful while SBD is enabled with no devices configured.
    fn local_watchdog_timeout(&self) -> u64;
}

/// Snapshot of the watchdog subsystem taken once per validation call.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchdogState {
    pub enabled: bool,
    pub device_list: Vec<String>,
    pub watchdog_timeout: u64,
}

/// Fetched-once cell scoped to one validation call. Keeps concurrent
/// validations independent: each call owns its own cell.
pub struct SbdStateCell<'a> {
    service_manager: &'a dyn ServiceManager,
    state: OnceCell<WatchdogState>,
}

impl<'a> SbdStateCell<'a> {
    pub fn new(service_manager: &'a dyn ServiceManager) -> Self {
        SbdStateCell {
            service_manager,
            state: OnceCell::new(),
        }
    }

    /// Probe the subsystem on first use, then serve the memoized snapshot.
    /// Device list and timeout are only queried in the states where they
    /// are meaningful.
    pub fn state(&self) -> &WatchdogState {
        self.state.get_or_init(|| {
            let enabled = self.service_manager.is_sbd_enabled();
            let device_list = if enabled {
                self.service_manager.local_sbd_devices()
            } else {
                Vec::new()
            };
            let watchdog_timeout = if enabled && device_list.is_empty() {
                self.service_manager.local_watchdog_timeout()
            } else {
                0
            };
            WatchdogState {
                enabled,
                device_list,
                watchdog_timeout,
            }
        })
    }
}

/// Cross-check a target `stonith-watchdog-timeout` value against live SBD
/// state. `target` is `None` when the property is being unset.
///
/// The state table is exhaustive:
///
/// | SBD state            | target          | result                    |
/// |----------------------|-----------------|---------------------------|
/// | disabled             | 0/unset         | ok                        |
/// | disabled             | anything else   | cannot-be-set             |
/// | enabled, no devices  | 0/unset         | cannot-be-unset           |
/// | enabled, no devices  | < local timeout | too-small                 |
/// | enabled, no devices  | >= local timeout| ok                        |
/// | enabled, devices     | 0/unset         | ok                        |
/// | enabled, devices     | anything else   | cannot-be-set             |
///
/// A target outside the time grammar is treated as too small rather than as
/// a type error; type validation runs separately and this policy stays
/// conservative.
pub fn validate_stonith_watchdog_timeout(
    sbd_state: &SbdStateCell<'_>,
    target: Option<&str>,
) -> Vec<ReportItem> {
    let seconds = match target {
        None | Some("") => Some(0),
        Some(value) => timeout_to_seconds(value),
    };
    let state = sbd_state.state();

    if !state.enabled {
        return if seconds == Some(0) {
            Vec::new()
        } else {
            vec![ReportItem::forceable(
                ReportMessage::StonithWatchdogTimeoutCannotBeSet {
                    reason: SbdReason::NotSetUp,
                },
            )]
        };
    }

    if state.device_list.is_empty() {
        return match seconds {
            Some(0) => vec![ReportItem::forceable(
                ReportMessage::StonithWatchdogTimeoutCannotBeUnset {
                    reason: SbdReason::SetUpWithoutDevices,
                },
            )],
            Some(value) if value >= state.watchdog_timeout => Vec::new(),
            _ => vec![ReportItem::forceable(
                ReportMessage::StonithWatchdogTimeoutTooSmall {
                    cluster_sbd_watchdog_timeout: state.watchdog_timeout,
                    entered_watchdog_timeout: target.unwrap_or("").to_string(),
                },
            )],
        };
    }

    if seconds == Some(0) {
        Vec::new()
    } else {
        vec![ReportItem::forceable(
            ReportMessage::StonithWatchdogTimeoutCannotBeSet {
                reason: SbdReason::SetUpWithDevices,
            },
        )]
    }
}
