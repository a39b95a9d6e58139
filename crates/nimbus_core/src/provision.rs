//! Provisioning collaborator trait.
//!
//! The core treats provisioning as opaque: for each unit it hands the
//! collaborator the unit id and fully resolved inputs, and expects concrete
//! outputs or an error back. What gets provisioned, and how, is entirely the
//! collaborator's concern.

use std::collections::BTreeMap;

use async_trait::async_trait;

/// Concrete output values produced by provisioning one unit.
pub type ProvisionedOutputs = BTreeMap<String, serde_json::Value>;

/// External collaborator that turns resolved inputs into live resources.
///
/// Implementations must be `Send + Sync` so a synthesizer can be shared
/// across tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Provision the unit and return its concrete outputs.
    ///
    /// Errors are reported at the graph level: the unit is marked failed and
    /// its transitive dependents are skipped, but sibling branches proceed.
    async fn provision(
        &self,
        unit_id: &str,
        inputs: BTreeMap<String, serde_json::Value>,
    ) -> anyhow::Result<ProvisionedOutputs>;
}
