//! Composition root for the multi-service application.
//!
//! Declares all enabled stacks with literals from the environment config and
//! wires references between them, returning the graph as a value. Nothing is
//! provisioned here; multiple independent compositions (one per environment)
//! can coexist without shared process state.

use nimbus_core::CompositionGraph;
use tracing::debug;

use crate::config::EnvironmentConfig;
use crate::error::StacksResult;
use crate::stacks;

/// Compose the application graph for one environment.
///
/// Identity, database and API stacks are always declared; file storage and
/// hosting are gated by the config's feature toggles.
pub fn compose(config: &EnvironmentConfig) -> StacksResult<CompositionGraph> {
    config.validate()?;

    let mut graph = CompositionGraph::new();

    let auth = stacks::auth::declare(&mut graph, config)?;
    let database = stacks::database::declare(&mut graph, config)?;
    let api = stacks::api::declare(&mut graph, config, &auth, &database)?;

    if config.features.storage {
        stacks::storage::declare(&mut graph, config, &auth)?;
    }
    if config.features.hosting {
        stacks::hosting::declare(&mut graph, config, &auth, &api)?;
    }

    debug!(
        environment = %config.name,
        units = graph.len(),
        "composed application graph"
    );
    Ok(graph)
}
