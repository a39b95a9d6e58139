//! File storage stack.
//!
//! Grants the identity stack's roles access to the bucket; allowed origins
//! come straight from the environment config.

use nimbus_core::{CompositionGraph, UnitHandle, UnitSpec, Value};
use serde_json::json;

use crate::config::EnvironmentConfig;
use crate::error::StacksResult;

pub const UNIT_ID: &str = "storage";

pub const BUCKET_NAME: &str = "bucket_name";
pub const BUCKET_REGIONAL_DOMAIN: &str = "bucket_regional_domain";

/// Declare the file storage stack, wired to the identity stack's roles.
pub fn declare(
    graph: &mut CompositionGraph,
    config: &EnvironmentConfig,
    auth: &UnitHandle,
) -> StacksResult<UnitHandle> {
    let spec = UnitSpec::new(UNIT_ID)
        .input("allowed_origins", Value::literal(json!(config.allowed_origins)))
        .input(
            "authenticated_role_arn",
            auth.output(super::auth::AUTHENTICATED_ROLE_ARN)?,
        )
        .input(
            "unauthenticated_role_arn",
            auth.output(super::auth::UNAUTHENTICATED_ROLE_ARN)?,
        )
        .output(BUCKET_NAME)
        .output(BUCKET_REGIONAL_DOMAIN);

    Ok(graph.declare(spec)?)
}
