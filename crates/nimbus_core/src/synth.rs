//! Resolver/synthesizer: walks the graph in dependency order, materializes
//! each unit through the provisioning collaborator, and substitutes
//! references in downstream inputs with the concrete values produced
//! upstream.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::graph::CompositionGraph;
use crate::provision::Provisioner;
use crate::report::{Artifact, SynthesisReport, UnitFailure};
use crate::unit::Unit;
use crate::value::Value;

/// Per-unit state machine during one synthesis pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    /// Not yet considered; upstream references may still be unresolved.
    Pending,
    /// All dependencies materialized; inputs being resolved and provisioning
    /// in flight.
    Resolving,
    /// Terminal success: outputs populated and visible to dependents.
    Materialized,
    /// Terminal failure: provisioning reported an error, timed out, or was
    /// cancelled mid-flight.
    Failed,
    /// Terminal non-materialized state: an upstream dependency failed, or the
    /// run was cancelled before this unit started.
    Skipped,
}

/// Synthesizes a composition graph into deployable artifacts.
///
/// Processes units strictly in the deterministic topological order computed
/// by [`CompositionGraph::validate`]. Provisioning failures do not abort the
/// pass: the failed unit's transitive dependents are skipped while sibling
/// branches continue, and all failures are surfaced together in the report.
pub struct Synthesizer {
    provisioner: Arc<dyn Provisioner>,
    unit_timeout: Duration,
}

impl Synthesizer {
    /// Create a synthesizer backed by the given provisioning collaborator.
    pub fn new(provisioner: Arc<dyn Provisioner>) -> Self {
        Self {
            provisioner,
            unit_timeout: Duration::from_secs(300),
        }
    }

    /// Bound each provisioning call by the given timeout.
    ///
    /// A unit whose provisioning call exceeds the bound transitions to
    /// [`UnitState::Failed`] rather than leaving the pass stuck in
    /// `Resolving`.
    pub fn with_unit_timeout(mut self, timeout: Duration) -> Self {
        self.unit_timeout = timeout;
        self
    }

    /// Synthesize the graph.
    ///
    /// Construction- and validation-time errors (unknown units, undeclared
    /// outputs, cycles) surface immediately as `Err` and nothing is
    /// materialized. Provisioning-time failures are collected in the returned
    /// report instead.
    pub async fn synthesize(&self, graph: &CompositionGraph) -> CoreResult<SynthesisReport> {
        self.synthesize_with_cancel(graph, CancellationToken::new())
            .await
    }

    /// Synthesize the graph, honoring a cancellation token.
    ///
    /// Cancellation propagates to the in-flight provisioning call, marks that
    /// unit failed, and skips every unit that has not started yet.
    pub async fn synthesize_with_cancel(
        &self,
        graph: &CompositionGraph,
        cancel: CancellationToken,
    ) -> CoreResult<SynthesisReport> {
        let order = graph.validate()?;
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, units = order.len(), "starting synthesis pass");

        let mut states: BTreeMap<String, UnitState> = order
            .iter()
            .map(|id| (id.clone(), UnitState::Pending))
            .collect();
        let mut materialized: BTreeMap<String, BTreeMap<String, serde_json::Value>> =
            BTreeMap::new();
        let mut artifacts = Vec::new();
        let mut failures: Vec<UnitFailure> = Vec::new();
        let mut cancelled = false;

        for unit_id in &order {
            if cancelled || cancel.is_cancelled() {
                cancelled = true;
                states.insert(unit_id.clone(), UnitState::Skipped);
                debug!(unit = %unit_id, "skipping unit, synthesis cancelled");
                continue;
            }

            let unit = graph.get_required(unit_id)?;

            let blocked = unit
                .dependencies()
                .iter()
                .any(|dep| states.get(*dep) != Some(&UnitState::Materialized));
            if blocked {
                warn!(unit = %unit_id, "skipping unit, upstream dependency did not materialize");
                states.insert(unit_id.clone(), UnitState::Skipped);
                continue;
            }

            states.insert(unit_id.clone(), UnitState::Resolving);
            let resolved = resolve_inputs(unit, &materialized)?;
            debug!(unit = %unit_id, inputs = resolved.len(), "resolved unit inputs");

            let outcome = tokio::select! {
                _ = cancel.cancelled() => Err(CoreError::Cancelled),
                result = tokio::time::timeout(
                    self.unit_timeout,
                    self.provisioner.provision(unit_id, resolved.clone()),
                ) => match result {
                    Ok(Ok(outputs)) => Ok(outputs),
                    Ok(Err(e)) => Err(CoreError::Provisioning {
                        unit: unit_id.clone(),
                        message: e.to_string(),
                    }),
                    Err(_) => Err(CoreError::Timeout {
                        unit: unit_id.clone(),
                    }),
                },
            };

            match outcome {
                Ok(outputs) => {
                    info!(unit = %unit_id, outputs = outputs.len(), "unit materialized");
                    states.insert(unit_id.clone(), UnitState::Materialized);
                    artifacts.push(Artifact {
                        unit_id: unit_id.clone(),
                        resolved_inputs: resolved,
                        outputs: outputs.clone(),
                        materialized_at: Utc::now(),
                    });
                    materialized.insert(unit_id.clone(), outputs);
                }
                Err(CoreError::Cancelled) => {
                    error!(unit = %unit_id, "synthesis cancelled while provisioning");
                    states.insert(unit_id.clone(), UnitState::Failed);
                    failures.push(UnitFailure::new(unit_id, CoreError::Cancelled));
                    cancelled = true;
                }
                Err(cause) => {
                    error!(unit = %unit_id, error = %cause, "unit failed to provision");
                    states.insert(unit_id.clone(), UnitState::Failed);
                    failures.push(UnitFailure::new(unit_id, cause));
                }
            }
        }

        let report = SynthesisReport {
            run_id,
            artifacts,
            failures,
            states,
            cancelled,
            started_at,
            completed_at: Utc::now(),
        };

        if report.is_success() {
            info!(%run_id, artifacts = report.artifacts.len(), "synthesis pass completed");
        } else {
            error!(
                %run_id,
                failures = report.failures.len(),
                cancelled = report.cancelled,
                "synthesis pass finished with failures"
            );
        }
        Ok(report)
    }
}

/// Resolve every input of a unit against already-materialized outputs.
fn resolve_inputs(
    unit: &Unit,
    materialized: &BTreeMap<String, BTreeMap<String, serde_json::Value>>,
) -> CoreResult<BTreeMap<String, serde_json::Value>> {
    unit.inputs
        .iter()
        .map(|(name, value)| Ok((name.clone(), resolve_value(value, materialized)?)))
        .collect()
}

fn resolve_value(
    value: &Value,
    materialized: &BTreeMap<String, BTreeMap<String, serde_json::Value>>,
) -> CoreResult<serde_json::Value> {
    match value {
        Value::Literal(v) => Ok(v.clone()),
        Value::Reference(r) => materialized
            .get(&r.unit)
            .and_then(|outputs| outputs.get(&r.output))
            .cloned()
            .ok_or_else(|| CoreError::UnresolvedOutput {
                unit: r.unit.clone(),
                output: r.output.clone(),
            }),
        Value::Map(entries) => {
            let mut object = serde_json::Map::new();
            for (key, nested) in entries {
                object.insert(key.clone(), resolve_value(nested, materialized)?);
            }
            Ok(serde_json::Value::Object(object))
        }
    }
}
