//! Synthesis report and emitted artifacts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::synth::UnitState;

/// Deployable artifact emitted for one materialized unit.
///
/// Inputs are fully resolved: every reference has been substituted with the
/// concrete value produced upstream. Serialization format for downstream
/// deployment tooling is an external concern; the record itself is
/// serde-serializable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub unit_id: String,
    pub resolved_inputs: BTreeMap<String, serde_json::Value>,
    pub outputs: BTreeMap<String, serde_json::Value>,
    pub materialized_at: DateTime<Utc>,
}

/// A provisioning-time failure attributed to one unit.
#[derive(Debug)]
pub struct UnitFailure {
    pub unit_id: String,
    pub cause: CoreError,
}

impl UnitFailure {
    pub fn new(unit_id: impl Into<String>, cause: CoreError) -> Self {
        Self {
            unit_id: unit_id.into(),
            cause,
        }
    }
}

/// Outcome of one synthesis pass.
///
/// Artifacts appear in the deterministic topological order computed during
/// validation. Failures are collected across the whole pass so every
/// independently failing branch is visible in one run; a report with any
/// failed unit is an overall failure even if unrelated units materialized.
#[derive(Debug)]
pub struct SynthesisReport {
    /// Id of this synthesis run.
    pub run_id: Uuid,
    /// Emitted artifacts, in topological order.
    pub artifacts: Vec<Artifact>,
    /// Per-unit provisioning failures.
    pub failures: Vec<UnitFailure>,
    /// Terminal state of every unit in the graph.
    pub states: BTreeMap<String, UnitState>,
    /// Whether the run was cancelled before completing.
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SynthesisReport {
    /// True when every unit materialized and the run was not cancelled.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }

    /// Artifact emitted for the given unit, if it materialized.
    pub fn artifact(&self, unit_id: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.unit_id == unit_id)
    }

    /// Terminal state of the given unit.
    pub fn state(&self, unit_id: &str) -> Option<&UnitState> {
        self.states.get(unit_id)
    }

    /// Unit ids in the order they materialized.
    pub fn materialized_order(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.unit_id.as_str()).collect()
    }
}
