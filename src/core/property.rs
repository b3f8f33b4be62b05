//! Cluster property mutation gates.
//!
//! Validates proposed property assignments and removals against the merged
//! agent schema, the reserved-property list, and live watchdog state. Both
//! gates collect every finding in one pass (no short-circuiting) and return
//! them in a stable order; the force rewrite is applied once at the end.

use crate::core::metadata::{self, AgentMetadata};
use crate::core::reports::{
    self, ACTION_REMOVE, ADD_REMOVE_CONTAINER_TYPE_PROPERTY_SET, ADD_REMOVE_ITEM_TYPE_PROPERTY,
    OPTION_TYPE_CLUSTER_PROPERTY, ReportItem, ReportMessage,
};
use crate::core::sbd::{self, SbdStateCell, ServiceManager};
use crate::core::values;

/// Properties maintained exclusively by the cluster manager itself. Setting
/// or removing them is blocked absolutely; no override applies.
pub const FORBIDDEN_PROPERTIES: [&str; 4] = [
    "cluster-infrastructure",
    "cluster-name",
    "dc-version",
    "have-watchdog",
];

pub const STONITH_WATCHDOG_TIMEOUT: &str = "stonith-watchdog-timeout";

fn is_forbidden(name: &str) -> bool {
    FORBIDDEN_PROPERTIES.contains(&name)
}

fn sorted_unique(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names.dedup();
    names
}

/// Validate a proposed property assignment.
///
/// `new_properties` preserves the caller's entry order; value diagnostics
/// are emitted in that order. Report order: unknown-name report, reserved-name
/// report, per-value reports, watchdog policy reports, then the force
/// rewrite over the whole list. The watchdog subsystem is only probed when
/// `stonith-watchdog-timeout` participates in the change.
pub fn validate_set_cluster_properties(
    metadata_list: &[AgentMetadata],
    service_manager: &dyn ServiceManager,
    new_properties: &[(String, String)],
    force: bool,
) -> Vec<ReportItem> {
    let schema = metadata::merge_parameter_schemas(metadata_list);
    let mut allowed_names: Vec<String> = schema
        .keys()
        .copied()
        .filter(|name| !is_forbidden(name))
        .map(|name| name.to_string())
        .collect();
    allowed_names.sort();

    let mut report_list = Vec::new();

    let unknown_names = sorted_unique(
        new_properties
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| !is_forbidden(name) && !schema.contains_key(name))
            .map(|name| name.to_string())
            .collect(),
    );
    let forbidden_names = sorted_unique(
        new_properties
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| is_forbidden(name))
            .map(|name| name.to_string())
            .collect(),
    );

    if !unknown_names.is_empty() {
        report_list.push(ReportItem::forceable(ReportMessage::InvalidOptions {
            option_names: unknown_names,
            allowed: allowed_names.clone(),
            option_type: OPTION_TYPE_CLUSTER_PROPERTY.to_string(),
        }));
    }
    // Reserved names are rejected whether or not an agent declares them, and
    // never reach value validation.
    if !forbidden_names.is_empty() {
        report_list.push(ReportItem::error(ReportMessage::InvalidOptions {
            option_names: forbidden_names,
            allowed: allowed_names,
            option_type: OPTION_TYPE_CLUSTER_PROPERTY.to_string(),
        }));
    }

    for (name, value) in new_properties {
        if is_forbidden(name) {
            continue;
        }
        if let Some(definition) = schema.get(name.as_str())
            && let Some(report) = values::validate_parameter_value(definition, value)
        {
            report_list.push(report);
        }
    }

    if let Some((_, value)) = new_properties
        .iter()
        .rev()
        .find(|(name, _)| name == STONITH_WATCHDOG_TIMEOUT)
    {
        let sbd_state = SbdStateCell::new(service_manager);
        report_list.extend(sbd::validate_stonith_watchdog_timeout(
            &sbd_state,
            Some(value.as_str()),
        ));
    }

    reports::apply_force_flag(report_list, force)
}

/// Validate a proposed property removal from the property set
/// `properties_set_id`.
///
/// An empty request short-circuits with a single report. Otherwise the gate
/// reports names missing from the configuration and reserved names
/// independently: a reserved name that also happens to be unconfigured
/// produces both reports. The watchdog subsystem is only probed when
/// `stonith-watchdog-timeout` is both requested and currently configured.
pub fn validate_remove_cluster_properties(
    configured_properties: &[String],
    properties_set_id: &str,
    service_manager: &dyn ServiceManager,
    to_be_removed: &[String],
    force: bool,
) -> Vec<ReportItem> {
    if to_be_removed.is_empty() {
        let report = ReportItem::forceable(ReportMessage::AddRemoveItemsNotSpecified {
            container_type: ADD_REMOVE_CONTAINER_TYPE_PROPERTY_SET.to_string(),
            item_type: ADD_REMOVE_ITEM_TYPE_PROPERTY.to_string(),
            container_id: properties_set_id.to_string(),
        });
        return reports::apply_force_flag(vec![report], force);
    }

    let mut report_list = Vec::new();

    let missing_names = sorted_unique(
        to_be_removed
            .iter()
            .filter(|name| !configured_properties.contains(*name))
            .cloned()
            .collect(),
    );
    if !missing_names.is_empty() {
        report_list.push(ReportItem::forceable(
            ReportMessage::AddRemoveCannotRemoveItemsNotInTheContainer {
                container_type: ADD_REMOVE_CONTAINER_TYPE_PROPERTY_SET.to_string(),
                item_type: ADD_REMOVE_ITEM_TYPE_PROPERTY.to_string(),
                container_id: properties_set_id.to_string(),
                item_list: missing_names,
            },
        ));
    }

    let forbidden_requested = sorted_unique(
        to_be_removed
            .iter()
            .filter(|name| is_forbidden(name.as_str()))
            .cloned()
            .collect(),
    );
    if !forbidden_requested.is_empty() {
        report_list.push(ReportItem::error(
            ReportMessage::CannotDoActionWithForbiddenOptions {
                action: ACTION_REMOVE.to_string(),
                specified_options: forbidden_requested,
                forbidden_options: FORBIDDEN_PROPERTIES
                    .iter()
                    .map(|name| name.to_string())
                    .collect(),
                option_type: OPTION_TYPE_CLUSTER_PROPERTY.to_string(),
            },
        ));
    }

    if to_be_removed.iter().any(|name| name == STONITH_WATCHDOG_TIMEOUT)
        && configured_properties
            .iter()
            .any(|name| name == STONITH_WATCHDOG_TIMEOUT)
    {
        let sbd_state = SbdStateCell::new(service_manager);
        report_list.extend(sbd::validate_stonith_watchdog_timeout(&sbd_state, None));
    }

    reports::apply_force_flag(report_list, force)
}
