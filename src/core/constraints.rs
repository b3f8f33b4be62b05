//! Constraint configuration records and the fetch seam.
//!
//! The validation core never mutates constraints; it only looks them up to
//! enrich duplicate-constraint diagnostics. Records carry just enough
//! attributes to render a one-line description of each constraint, in plain
//! and resource-set form, across the four constraint families.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::reports::ReportItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConstraint {
    pub constraint_id: String,
    pub resource: String,
    pub node: String,
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColocationConstraint {
    pub constraint_id: String,
    pub resource: String,
    pub with_resource: String,
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConstraint {
    pub constraint_id: String,
    pub first: String,
    pub then: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketConstraint {
    pub constraint_id: String,
    pub resource: String,
    pub ticket: String,
    #[serde(default)]
    pub loss_policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSet {
    #[serde(default)]
    pub id: String,
    pub resources: Vec<String>,
}

/// Resource-set form shared by all four constraint families.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetConstraint {
    pub constraint_id: String,
    pub resource_sets: Vec<ResourceSet>,
}

impl LocationConstraint {
    pub fn to_text(&self, verbose: bool) -> Vec<String> {
        let preference = if self.score.starts_with('-') {
            "avoids"
        } else {
            "prefers"
        };
        let mut line = format!(
            "resource '{}' {} node '{}' with score {}",
            self.resource, preference, self.node, self.score
        );
        if verbose {
            line.push_str(&format!(" (id: {})", self.constraint_id));
        }
        vec![line]
    }
}

impl ColocationConstraint {
    pub fn to_text(&self, verbose: bool) -> Vec<String> {
        let mut line = format!(
            "resource '{}' colocated with resource '{}', score {}",
            self.resource, self.with_resource, self.score
        );
        if verbose {
            line.push_str(&format!(" (id: {})", self.constraint_id));
        }
        vec![line]
    }
}

impl OrderConstraint {
    pub fn to_text(&self, verbose: bool) -> Vec<String> {
        let mut line = format!(
            "start resource '{}' then start resource '{}'",
            self.first, self.then
        );
        if verbose {
            line.push_str(&format!(" (id: {})", self.constraint_id));
        }
        vec![line]
    }
}

impl TicketConstraint {
    pub fn to_text(&self, verbose: bool) -> Vec<String> {
        let mut line = format!(
            "resource '{}' depends on ticket '{}'",
            self.resource, self.ticket
        );
        if let Some(loss_policy) = &self.loss_policy {
            line.push_str(&format!(", loss policy {loss_policy}"));
        }
        if verbose {
            line.push_str(&format!(" (id: {})", self.constraint_id));
        }
        vec![line]
    }
}

impl SetConstraint {
    pub fn to_text(&self, verbose: bool) -> Vec<String> {
        let mut lines = Vec::new();
        if verbose {
            lines.push(format!("resource sets (id: {}):", self.constraint_id));
        } else {
            lines.push("resource sets:".to_string());
        }
        for set in &self.resource_sets {
            let mut line = format!("  set {}", set.resources.join(" "));
            if verbose && !set.id.is_empty() {
                line.push_str(&format!(" (id: {})", set.id));
            }
            lines.push(line);
        }
        lines
    }
}

/// The full constraint configuration, plain and set variants of all four
/// families. Categories are independent; an id appears in exactly one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CibConstraints {
    #[serde(default)]
    pub location: Vec<LocationConstraint>,
    #[serde(default)]
    pub location_set: Vec<SetConstraint>,
    #[serde(default)]
    pub colocation: Vec<ColocationConstraint>,
    #[serde(default)]
    pub colocation_set: Vec<SetConstraint>,
    #[serde(default)]
    pub order: Vec<OrderConstraint>,
    #[serde(default)]
    pub order_set: Vec<SetConstraint>,
    #[serde(default)]
    pub ticket: Vec<TicketConstraint>,
    #[serde(default)]
    pub ticket_set: Vec<SetConstraint>,
}

/// Failure of a constraint-configuration fetch. Carries whatever partial
/// output the collaborator produced plus any structured reports embedded in
/// the failure; both are rendered best-effort by the display pipeline.
#[derive(Debug, Clone, Error)]
#[error("unable to load constraint configuration")]
pub struct ConstraintFetchError {
    pub output: Option<String>,
    pub reports: Vec<ReportItem>,
}

/// Read access to the current constraint configuration.
pub trait ConstraintSource {
    fn constraint_config(&self, evaluate_rules: bool)
    -> Result<CibConstraints, ConstraintFetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_rendering_encodes_preference() {
        let prefers = LocationConstraint {
            constraint_id: "loc-1".to_string(),
            resource: "web".to_string(),
            node: "node1".to_string(),
            score: "INFINITY".to_string(),
        };
        assert_eq!(
            prefers.to_text(true),
            vec!["resource 'web' prefers node 'node1' with score INFINITY (id: loc-1)"]
        );

        let avoids = LocationConstraint {
            score: "-200".to_string(),
            ..prefers
        };
        assert_eq!(
            avoids.to_text(false),
            vec!["resource 'web' avoids node 'node1' with score -200"]
        );
    }

    #[test]
    fn test_set_rendering_lists_each_set() {
        let constraint = SetConstraint {
            constraint_id: "order-set-1".to_string(),
            resource_sets: vec![
                ResourceSet {
                    id: "order-set-1-set".to_string(),
                    resources: vec!["a".to_string(), "b".to_string()],
                },
                ResourceSet {
                    id: String::new(),
                    resources: vec!["c".to_string()],
                },
            ],
        };
        assert_eq!(
            constraint.to_text(true),
            vec![
                "resource sets (id: order-set-1):",
                "  set a b (id: order-set-1-set)",
                "  set c",
            ]
        );
    }

    #[test]
    fn test_ticket_rendering_appends_loss_policy() {
        let constraint = TicketConstraint {
            constraint_id: "tick-1".to_string(),
            resource: "db".to_string(),
            ticket: "ticket-a".to_string(),
            loss_policy: Some("fence".to_string()),
        };
        assert_eq!(
            constraint.to_text(false),
            vec!["resource 'db' depends on ticket 'ticket-a', loss policy fence"]
        );
    }
}
