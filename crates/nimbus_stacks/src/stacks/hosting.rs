//! Hosting stack for the web frontend.
//!
//! The frontend build needs the API endpoint and identity pool ids, which
//! only exist after those stacks provision. The environment-variable map
//! therefore mixes literal entries from the config with deferred references,
//! resolved entry by entry during synthesis.

use std::collections::BTreeMap;

use nimbus_core::{CompositionGraph, UnitHandle, UnitSpec, Value};
use serde_json::json;

use crate::config::EnvironmentConfig;
use crate::error::{StacksError, StacksResult};

pub const UNIT_ID: &str = "hosting";

pub const APP_URL: &str = "app_url";
pub const DEFAULT_DOMAIN: &str = "default_domain";

/// Declare the hosting stack, wired to the identity and API stacks.
pub fn declare(
    graph: &mut CompositionGraph,
    config: &EnvironmentConfig,
    auth: &UnitHandle,
    api: &UnitHandle,
) -> StacksResult<UnitHandle> {
    let repository = config
        .repository
        .as_ref()
        .ok_or(StacksError::MissingRepository)?;

    let mut environment: BTreeMap<String, Value> = config
        .environment_variables
        .iter()
        .map(|(key, value)| (key.clone(), Value::literal(value.as_str())))
        .collect();
    environment.insert(
        "GRAPHQL_URL".to_string(),
        api.output(super::api::GRAPHQL_URL)?,
    );
    environment.insert(
        "USER_POOL_ID".to_string(),
        auth.output(super::auth::USER_POOL_ID)?,
    );
    environment.insert(
        "USER_POOL_CLIENT_ID".to_string(),
        auth.output(super::auth::USER_POOL_CLIENT_ID)?,
    );
    environment.insert(
        "IDENTITY_POOL_ID".to_string(),
        auth.output(super::auth::IDENTITY_POOL_ID)?,
    );

    let spec = UnitSpec::new(UNIT_ID)
        .input(
            "repository",
            Value::literal(json!({
                "owner": repository.owner,
                "name": repository.name,
                "branch": repository.branch,
            })),
        )
        .input("environment", Value::map(environment))
        .output(APP_URL)
        .output(DEFAULT_DOMAIN);

    Ok(graph.declare(spec)?)
}
