//! GraphQL API stack.
//!
//! Depends on the identity stack for its authorization config and on the
//! database stack for its data source; both arrive as deferred references
//! resolved during synthesis.

use nimbus_core::{CompositionGraph, UnitHandle, UnitSpec, Value};

use crate::config::EnvironmentConfig;
use crate::error::StacksResult;

pub const UNIT_ID: &str = "api";

pub const GRAPHQL_URL: &str = "graphql_url";
pub const API_ID: &str = "api_id";

/// Declare the API stack, wired to the identity and database stacks.
pub fn declare(
    graph: &mut CompositionGraph,
    config: &EnvironmentConfig,
    auth: &UnitHandle,
    database: &UnitHandle,
) -> StacksResult<UnitHandle> {
    let spec = UnitSpec::new(UNIT_ID)
        .input(
            "api_name",
            Value::literal(format!("{}-api", config.app_name)),
        )
        .input("user_pool_id", auth.output(super::auth::USER_POOL_ID)?)
        .input(
            "unauthenticated_role_arn",
            auth.output(super::auth::UNAUTHENTICATED_ROLE_ARN)?,
        )
        .input("table_name", database.output(super::database::TABLE_NAME)?)
        .output(GRAPHQL_URL)
        .output(API_ID);

    Ok(graph.declare(spec)?)
}
