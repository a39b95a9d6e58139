//! Database stack: the application's table.

use nimbus_core::{CompositionGraph, UnitHandle, UnitSpec, Value};

use crate::config::EnvironmentConfig;
use crate::error::StacksResult;

pub const UNIT_ID: &str = "database";

pub const TABLE_NAME: &str = "table_name";
pub const TABLE_ARN: &str = "table_arn";

/// Declare the database stack. No upstream dependencies.
pub fn declare(
    graph: &mut CompositionGraph,
    config: &EnvironmentConfig,
) -> StacksResult<UnitHandle> {
    let spec = UnitSpec::new(UNIT_ID)
        .input(
            "table_name",
            Value::literal(format!("{}-{}-products", config.app_name, config.name)),
        )
        .input("partition_key", Value::literal("id"))
        .output(TABLE_NAME)
        .output(TABLE_ARN);

    Ok(graph.declare(spec)?)
}
