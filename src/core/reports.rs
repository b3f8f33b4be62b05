//! The report model shared by every validator.
//!
//! Validators never raise domain failures; they return an ordered list of
//! [`ReportItem`]s and the caller decides how to render or abort. Emission
//! order is part of the contract. Severity changes happen in exactly one
//! place: [`apply_force_flag`], which downgrades Error to Warning for every
//! item carrying a force code. An item without a force code is a hard domain
//! invariant and stays blocking no matter what the operator passes.

use serde::{Deserialize, Serialize};

use crate::core::output::{format_list, plural_s, type_label};

/// Diagnostic codes, frozen vocabulary. Consumers match on these strings.
pub mod codes {
    pub const FORCE: &str = "FORCE";

    pub const INVALID_OPTIONS: &str = "INVALID_OPTIONS";
    pub const INVALID_OPTION_VALUE: &str = "INVALID_OPTION_VALUE";
    pub const ADD_REMOVE_ITEMS_NOT_SPECIFIED: &str = "ADD_REMOVE_ITEMS_NOT_SPECIFIED";
    pub const ADD_REMOVE_CANNOT_REMOVE_ITEMS_NOT_IN_THE_CONTAINER: &str =
        "ADD_REMOVE_CANNOT_REMOVE_ITEMS_NOT_IN_THE_CONTAINER";
    pub const CANNOT_DO_ACTION_WITH_FORBIDDEN_OPTIONS: &str =
        "CANNOT_DO_ACTION_WITH_FORBIDDEN_OPTIONS";
    pub const STONITH_WATCHDOG_TIMEOUT_CANNOT_BE_SET: &str =
        "STONITH_WATCHDOG_TIMEOUT_CANNOT_BE_SET";
    pub const STONITH_WATCHDOG_TIMEOUT_CANNOT_BE_UNSET: &str =
        "STONITH_WATCHDOG_TIMEOUT_CANNOT_BE_UNSET";
    pub const STONITH_WATCHDOG_TIMEOUT_TOO_SMALL: &str = "STONITH_WATCHDOG_TIMEOUT_TOO_SMALL";
    pub const DUPLICATE_CONSTRAINTS_EXIST: &str = "DUPLICATE_CONSTRAINTS_EXIST";
    /// Superseded by [`DUPLICATE_CONSTRAINTS_EXIST`]; still recognized so the
    /// display pipeline can drop it.
    pub const DUPLICATE_CONSTRAINTS_LIST: &str = "DUPLICATE_CONSTRAINTS_LIST";
}

// Payload type tokens.
pub const OPTION_TYPE_CLUSTER_PROPERTY: &str = "cluster property";
pub const ADD_REMOVE_CONTAINER_TYPE_PROPERTY_SET: &str = "property_set";
pub const ADD_REMOVE_ITEM_TYPE_PROPERTY: &str = "property";
pub const ACTION_REMOVE: &str = "remove";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
}

/// Override token attached to diagnostics an operator may downgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceCode {
    #[serde(rename = "FORCE")]
    Force,
}

/// Why the watchdog timeout property rejected a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SbdReason {
    #[serde(rename = "sbd_not_set_up")]
    NotSetUp,
    #[serde(rename = "sbd_set_up_without_devices")]
    SetUpWithoutDevices,
    #[serde(rename = "sbd_set_up_with_devices")]
    SetUpWithDevices,
}

impl SbdReason {
    pub fn describe(self) -> &'static str {
        match self {
            SbdReason::NotSetUp => "SBD is not set up",
            SbdReason::SetUpWithoutDevices => "SBD is set up without devices",
            SbdReason::SetUpWithDevices => "SBD is set up with devices",
        }
    }
}

/// The allowed-values part of a value diagnostic: either a free-text grammar
/// description or the enumerated candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowedValues {
    List(Vec<String>),
    Description(String),
}

/// Code-tagged diagnostic payloads. The serialized shape (`code` plus the
/// named fields) is the wire contract consumers depend on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportMessage {
    InvalidOptions {
        option_names: Vec<String>,
        allowed: Vec<String>,
        option_type: String,
    },
    InvalidOptionValue {
        option_name: String,
        option_value: String,
        allowed_values: AllowedValues,
    },
    AddRemoveItemsNotSpecified {
        container_type: String,
        item_type: String,
        container_id: String,
    },
    AddRemoveCannotRemoveItemsNotInTheContainer {
        container_type: String,
        item_type: String,
        container_id: String,
        item_list: Vec<String>,
    },
    CannotDoActionWithForbiddenOptions {
        action: String,
        specified_options: Vec<String>,
        forbidden_options: Vec<String>,
        option_type: String,
    },
    StonithWatchdogTimeoutCannotBeSet {
        reason: SbdReason,
    },
    StonithWatchdogTimeoutCannotBeUnset {
        reason: SbdReason,
    },
    StonithWatchdogTimeoutTooSmall {
        cluster_sbd_watchdog_timeout: u64,
        entered_watchdog_timeout: String,
    },
    DuplicateConstraintsExist {
        constraint_ids: Vec<String>,
    },
    /// Legacy structured duplicate-constraint payload. Superseded; the
    /// display pipeline drops it on sight.
    DuplicateConstraintsList {
        constraint_info_list: Vec<serde_json::Value>,
    },
}

impl ReportMessage {
    pub fn code(&self) -> &'static str {
        match self {
            ReportMessage::InvalidOptions { .. } => codes::INVALID_OPTIONS,
            ReportMessage::InvalidOptionValue { .. } => codes::INVALID_OPTION_VALUE,
            ReportMessage::AddRemoveItemsNotSpecified { .. } => {
                codes::ADD_REMOVE_ITEMS_NOT_SPECIFIED
            }
            ReportMessage::AddRemoveCannotRemoveItemsNotInTheContainer { .. } => {
                codes::ADD_REMOVE_CANNOT_REMOVE_ITEMS_NOT_IN_THE_CONTAINER
            }
            ReportMessage::CannotDoActionWithForbiddenOptions { .. } => {
                codes::CANNOT_DO_ACTION_WITH_FORBIDDEN_OPTIONS
            }
            ReportMessage::StonithWatchdogTimeoutCannotBeSet { .. } => {
                codes::STONITH_WATCHDOG_TIMEOUT_CANNOT_BE_SET
            }
            ReportMessage::StonithWatchdogTimeoutCannotBeUnset { .. } => {
                codes::STONITH_WATCHDOG_TIMEOUT_CANNOT_BE_UNSET
            }
            ReportMessage::StonithWatchdogTimeoutTooSmall { .. } => {
                codes::STONITH_WATCHDOG_TIMEOUT_TOO_SMALL
            }
            ReportMessage::DuplicateConstraintsExist { .. } => codes::DUPLICATE_CONSTRAINTS_EXIST,
            ReportMessage::DuplicateConstraintsList { .. } => codes::DUPLICATE_CONSTRAINTS_LIST,
        }
    }

    /// Human-readable one-line rendering of the payload.
    pub fn text(&self) -> String {
        match self {
            ReportMessage::InvalidOptions {
                option_names,
                allowed,
                option_type,
            } => {
                let mut line = format!(
                    "invalid {} option{} {}",
                    option_type,
                    plural_s(option_names.len()),
                    format_list(option_names)
                );
                if allowed.is_empty() {
                    line.push_str(", there are no options available");
                } else {
                    line.push_str(&format!(", allowed options are: {}", format_list(allowed)));
                }
                line
            }
            ReportMessage::InvalidOptionValue {
                option_name,
                option_value,
                allowed_values,
            } => {
                let allowed = match allowed_values {
                    AllowedValues::Description(description) => description.clone(),
                    AllowedValues::List(candidates) => format_list(candidates),
                };
                format!("'{option_value}' is not a valid {option_name} value, use {allowed}")
            }
            ReportMessage::AddRemoveItemsNotSpecified {
                container_type,
                item_type,
                container_id,
            } => format!(
                "no {} items to add or remove specified for {} '{}'",
                type_label(item_type),
                type_label(container_type),
                container_id
            ),
            ReportMessage::AddRemoveCannotRemoveItemsNotInTheContainer {
                container_type,
                item_type,
                container_id,
                item_list,
            } => format!(
                "unable to remove {} item{} {}, not present in {} '{}'",
                type_label(item_type),
                plural_s(item_list.len()),
                format_list(item_list),
                type_label(container_type),
                container_id
            ),
            ReportMessage::CannotDoActionWithForbiddenOptions {
                action,
                specified_options,
                forbidden_options,
                option_type,
            } => format!(
                "unable to {} {} option{} {}, the following options are protected: {}",
                action,
                option_type,
                plural_s(specified_options.len()),
                format_list(specified_options),
                format_list(forbidden_options)
            ),
            ReportMessage::StonithWatchdogTimeoutCannotBeSet { reason } => {
                format!("stonith-watchdog-timeout cannot be set when {}", reason.describe())
            }
            ReportMessage::StonithWatchdogTimeoutCannotBeUnset { reason } => {
                format!(
                    "stonith-watchdog-timeout cannot be unset or set to 0 when {}",
                    reason.describe()
                )
            }
            ReportMessage::StonithWatchdogTimeoutTooSmall {
                cluster_sbd_watchdog_timeout,
                entered_watchdog_timeout,
            } => format!(
                "entered stonith-watchdog-timeout '{entered_watchdog_timeout}' is smaller than \
                 the local SBD watchdog timeout {cluster_sbd_watchdog_timeout}"
            ),
            ReportMessage::DuplicateConstraintsExist { .. } => {
                "duplicate constraint already exists".to_string()
            }
            ReportMessage::DuplicateConstraintsList { .. } => {
                "duplicate constraints exist".to_string()
            }
        }
    }
}

/// One immutable diagnostic: severity, optional override token, payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    pub severity: Severity,
    pub force_code: Option<ForceCode>,
    #[serde(flatten)]
    pub message: ReportMessage,
}

impl ReportItem {
    /// A hard error. No override flag can downgrade it.
    pub fn error(message: ReportMessage) -> Self {
        ReportItem {
            severity: Severity::Error,
            force_code: None,
            message,
        }
    }

    /// An error the operator may downgrade with the force flag.
    pub fn forceable(message: ReportMessage) -> Self {
        ReportItem {
            severity: Severity::Error,
            force_code: Some(ForceCode::Force),
            message,
        }
    }

    pub fn warning(message: ReportMessage) -> Self {
        ReportItem {
            severity: Severity::Warning,
            force_code: None,
            message,
        }
    }

    pub fn code(&self) -> &'static str {
        self.message.code()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// The single place severities change. With the force flag set, every item
/// carrying a force code is downgraded to Warning and its code consumed;
/// everything else passes through untouched.
pub fn apply_force_flag(report_list: Vec<ReportItem>, force: bool) -> Vec<ReportItem> {
    if !force {
        return report_list;
    }
    report_list
        .into_iter()
        .map(|mut item| {
            if item.force_code.take().is_some() && item.severity == Severity::Error {
                item.severity = Severity::Warning;
            }
            item
        })
        .collect()
}

pub fn has_errors(report_list: &[ReportItem]) -> bool {
    report_list.iter().any(ReportItem::is_error)
}
