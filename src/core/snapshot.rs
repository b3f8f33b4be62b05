//! Offline cluster snapshot used by the CLI surfaces.
//!
//! A snapshot is a JSON document capturing the pieces of cluster state the
//! validation engine consumes: agent parameter metadata, the currently
//! configured property names, SBD subsystem state, and optionally the
//! constraint configuration. The snapshot implements the collaborator
//! traits, so validators run against it exactly as they would against a
//! live cluster.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::constraints::{CibConstraints, ConstraintFetchError, ConstraintSource};
use crate::core::error::CibGuardError;
use crate::core::metadata::AgentMetadata;
use crate::core::sbd::ServiceManager;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SbdConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub device_list: Vec<String>,
    #[serde(default)]
    pub watchdog_timeout: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    #[serde(default)]
    pub agents: Vec<AgentMetadata>,
    #[serde(default)]
    pub configured_properties: Vec<String>,
    #[serde(default)]
    pub sbd: SbdConfig,
    #[serde(default)]
    pub constraints: Option<CibConstraints>,
}

impl ClusterSnapshot {
    pub fn load(path: &Path) -> Result<Self, CibGuardError> {
        let raw = fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&raw)?;
        Ok(snapshot)
    }
}

impl ServiceManager for ClusterSnapshot {
    fn is_sbd_enabled(&self) -> bool {
        self.sbd.enabled
    }

    fn local_sbd_devices(&self) -> Vec<String> {
        self.sbd.device_list.clone()
    }

    fn local_watchdog_timeout(&self) -> u64 {
        self.sbd.watchdog_timeout
    }
}

impl ConstraintSource for ClusterSnapshot {
    fn constraint_config(
        &self,
        _evaluate_rules: bool,
    ) -> Result<CibConstraints, ConstraintFetchError> {
        match &self.constraints {
            Some(config) => Ok(config.clone()),
            None => Err(ConstraintFetchError {
                output: Some("constraint configuration missing from snapshot".to_string()),
                reports: Vec::new(),
            }),
        }
    }
}
