//! Simulated provisioner.
//!
//! Produces deterministic, plausibly shaped outputs for every stack in the
//! catalog without touching any cloud backend. Used by tests and demos; the
//! real deployment backend is an external collaborator behind the same
//! trait.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tracing::debug;

use nimbus_core::{ProvisionedOutputs, Provisioner};
use serde_json::json;

use crate::stacks::{api, auth, database, hosting, storage};

/// In-memory provisioner with per-unit failure injection.
pub struct SimulatedProvisioner {
    environment: String,
    region: String,
    failures: BTreeSet<String>,
}

impl SimulatedProvisioner {
    /// Create a simulator for the given environment name.
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            region: "us-east-1".to_string(),
            failures: BTreeSet::new(),
        }
    }

    /// Override the simulated region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Make provisioning of the given unit fail.
    pub fn fail_unit(mut self, unit_id: impl Into<String>) -> Self {
        self.failures.insert(unit_id.into());
        self
    }
}

#[async_trait]
impl Provisioner for SimulatedProvisioner {
    async fn provision(
        &self,
        unit_id: &str,
        inputs: BTreeMap<String, serde_json::Value>,
    ) -> anyhow::Result<ProvisionedOutputs> {
        if self.failures.contains(unit_id) {
            anyhow::bail!("simulated provisioning failure for unit '{unit_id}'");
        }

        let env = &self.environment;
        let region = &self.region;
        let mut outputs = ProvisionedOutputs::new();

        match unit_id {
            auth::UNIT_ID => {
                outputs.insert(
                    auth::USER_POOL_ID.to_string(),
                    json!(format!("{region}_{env}UserPool")),
                );
                outputs.insert(
                    auth::USER_POOL_CLIENT_ID.to_string(),
                    json!(format!("{env}userpoolclient0001")),
                );
                outputs.insert(
                    auth::IDENTITY_POOL_ID.to_string(),
                    json!(format!("{region}:{env}-identity-pool")),
                );
                outputs.insert(
                    auth::AUTHENTICATED_ROLE_ARN.to_string(),
                    json!(format!("arn:aws:iam::000000000000:role/{env}-authenticated")),
                );
                outputs.insert(
                    auth::UNAUTHENTICATED_ROLE_ARN.to_string(),
                    json!(format!(
                        "arn:aws:iam::000000000000:role/{env}-unauthenticated"
                    )),
                );
            }
            database::UNIT_ID => {
                let table = inputs
                    .get("table_name")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{env}-products"));
                outputs.insert(
                    database::TABLE_ARN.to_string(),
                    json!(format!(
                        "arn:aws:dynamodb:{region}:000000000000:table/{table}"
                    )),
                );
                outputs.insert(database::TABLE_NAME.to_string(), json!(table));
            }
            api::UNIT_ID => {
                let api_id = format!("{env}api00000001");
                outputs.insert(
                    api::GRAPHQL_URL.to_string(),
                    json!(format!(
                        "https://{api_id}.appsync-api.{region}.amazonaws.com/graphql"
                    )),
                );
                outputs.insert(api::API_ID.to_string(), json!(api_id));
            }
            storage::UNIT_ID => {
                let bucket = format!("{env}-file-storage");
                outputs.insert(
                    storage::BUCKET_REGIONAL_DOMAIN.to_string(),
                    json!(format!("{bucket}.s3.{region}.amazonaws.com")),
                );
                outputs.insert(storage::BUCKET_NAME.to_string(), json!(bucket));
            }
            hosting::UNIT_ID => {
                let branch = inputs
                    .get("repository")
                    .and_then(|r| r.get("branch"))
                    .and_then(|b| b.as_str())
                    .unwrap_or("main");
                let domain = format!("{branch}.{env}.apps.nimbus.dev");
                outputs.insert(
                    hosting::APP_URL.to_string(),
                    json!(format!("https://{domain}")),
                );
                outputs.insert(hosting::DEFAULT_DOMAIN.to_string(), json!(domain));
            }
            other => anyhow::bail!("no simulation for unit '{other}'"),
        }

        debug!(unit = %unit_id, outputs = outputs.len(), "simulated provisioning");
        Ok(outputs)
    }
}
