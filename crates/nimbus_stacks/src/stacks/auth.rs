//! Identity stack: user pool, user pool client and identity pool roles.

use nimbus_core::{CompositionGraph, UnitHandle, UnitSpec, Value};

use crate::config::EnvironmentConfig;
use crate::error::StacksResult;

pub const UNIT_ID: &str = "auth";

pub const USER_POOL_ID: &str = "user_pool_id";
pub const USER_POOL_CLIENT_ID: &str = "user_pool_client_id";
pub const IDENTITY_POOL_ID: &str = "identity_pool_id";
pub const AUTHENTICATED_ROLE_ARN: &str = "authenticated_role_arn";
pub const UNAUTHENTICATED_ROLE_ARN: &str = "unauthenticated_role_arn";

/// Declare the identity stack. No upstream dependencies.
pub fn declare(
    graph: &mut CompositionGraph,
    config: &EnvironmentConfig,
) -> StacksResult<UnitHandle> {
    let spec = UnitSpec::new(UNIT_ID)
        .input("app_name", Value::literal(config.app_name.as_str()))
        .input("self_sign_up_enabled", Value::literal(true))
        .input("allow_unauthenticated_identities", Value::literal(true))
        .output(USER_POOL_ID)
        .output(USER_POOL_CLIENT_ID)
        .output(IDENTITY_POOL_ID)
        .output(AUTHENTICATED_ROLE_ARN)
        .output(UNAUTHENTICATED_ROLE_ARN);

    Ok(graph.declare(spec)?)
}
