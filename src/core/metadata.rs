//! Agent-metadata parameter descriptors and the schema merger.
//!
//! Cluster properties are declared by resource-agent metadata, one source per
//! agent. Validation works against the fold of all sources into a single
//! name-to-definition lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One configuration property as declared by a resource agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    /// Declared value type (`boolean`, `integer`, `percentage`, `time`,
    /// `select`, `string`, ...). Unrecognized types get no value validation.
    #[serde(rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub shortdesc: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
    /// Candidate values, present only for `select` parameters.
    #[serde(default)]
    pub enum_values: Option<Vec<String>>,
    #[serde(default)]
    pub advanced: bool,
    #[serde(default)]
    pub deprecated: bool,
}

/// The parameter declarations of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMetadata {
    pub agent_name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
}

/// Fold the parameter lists of all sources into one lookup. Every name from
/// every source is reachable; on a name collision the later source wins
/// (agent namespaces are disjoint in practice).
pub fn merge_parameter_schemas(
    sources: &[AgentMetadata],
) -> HashMap<&str, &ParameterDefinition> {
    let mut merged = HashMap::new();
    for source in sources {
        for parameter in &source.parameters {
            merged.insert(parameter.name.as_str(), parameter);
        }
    }
    merged
}
