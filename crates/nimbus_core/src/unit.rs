//! Unit descriptors and handles.
//!
//! A unit is one independently provisionable infrastructure component. Its
//! descriptor names the unit, enumerates its inputs (literal or deferred) and
//! the outputs it promises to produce once materialized. Units are created
//! once at composition-root construction time and are immutable afterwards;
//! runtime output values live in the synthesizer's run state.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::value::{OutputRef, Value};

/// Declarative description of a unit, built before registration.
#[derive(Debug, Clone)]
pub struct UnitSpec {
    pub(crate) id: String,
    pub(crate) inputs: BTreeMap<String, Value>,
    pub(crate) outputs: Vec<String>,
}

impl UnitSpec {
    /// Start a descriptor for the unit with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            inputs: BTreeMap::new(),
            outputs: Vec::new(),
        }
    }

    /// Add an input parameter.
    pub fn input(mut self, name: impl Into<String>, value: Value) -> Self {
        self.inputs.insert(name.into(), value);
        self
    }

    /// Promise an output this unit will produce once materialized.
    pub fn output(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.outputs.contains(&name) {
            self.outputs.push(name);
        }
        self
    }
}

/// A registered unit in a composition graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Unique id within the graph.
    pub id: String,
    /// Input parameters, literal or deferred.
    pub inputs: BTreeMap<String, Value>,
    /// Names of outputs this unit promises to produce.
    pub outputs: Vec<String>,
}

impl Unit {
    pub(crate) fn from_spec(spec: UnitSpec) -> Self {
        Self {
            id: spec.id,
            inputs: spec.inputs,
            outputs: spec.outputs,
        }
    }

    /// Check whether this unit promises the named output.
    pub fn declares_output(&self, name: &str) -> bool {
        self.outputs.iter().any(|o| o == name)
    }

    /// Every reference appearing anywhere in this unit's inputs.
    pub fn references(&self) -> Vec<&OutputRef> {
        let mut refs = Vec::new();
        for value in self.inputs.values() {
            value.collect_references(&mut refs);
        }
        refs
    }

    /// Ids of the units this unit depends on, derived from its references.
    pub fn dependencies(&self) -> BTreeSet<&str> {
        self.references()
            .into_iter()
            .map(|r| r.unit.as_str())
            .collect()
    }
}

/// Handle returned by [`CompositionGraph::declare`].
///
/// The handle exposes accessors for the unit's declared outputs; each
/// accessor returns a [`Value::Reference`] usable as another unit's input
/// before the referenced unit has materialized.
///
/// [`CompositionGraph::declare`]: crate::graph::CompositionGraph::declare
#[derive(Debug, Clone)]
pub struct UnitHandle {
    id: String,
    outputs: Vec<String>,
}

impl UnitHandle {
    pub(crate) fn new(id: String, outputs: Vec<String>) -> Self {
        Self { id, outputs }
    }

    /// Id of the declared unit.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// A deferred reference to the named output.
    ///
    /// Fails with [`CoreError::UndeclaredOutput`] if the unit does not
    /// promise an output with this name.
    pub fn output(&self, name: &str) -> CoreResult<Value> {
        if !self.outputs.iter().any(|o| o == name) {
            return Err(CoreError::UndeclaredOutput {
                unit: self.id.clone(),
                output: name.to_string(),
            });
        }
        Ok(Value::reference(&self.id, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_spec_builder() {
        let spec = UnitSpec::new("database")
            .input("partition_key", Value::literal("id"))
            .output("table_name")
            .output("table_arn")
            .output("table_name");

        let unit = Unit::from_spec(spec);
        assert_eq!(unit.id, "database");
        assert_eq!(unit.outputs, vec!["table_name", "table_arn"]);
        assert!(unit.declares_output("table_arn"));
        assert!(!unit.declares_output("endpoint"));
    }

    #[test]
    fn test_unit_dependencies_derived_from_references() {
        let spec = UnitSpec::new("api")
            .input("api_name", Value::literal("samples-api"))
            .input("user_pool_id", Value::reference("auth", "user_pool_id"))
            .input("table_name", Value::reference("database", "table_name"))
            .input("log_retention", Value::reference("auth", "user_pool_id"))
            .output("graphql_url");

        let unit = Unit::from_spec(spec);
        let deps = unit.dependencies();
        assert_eq!(deps.len(), 2);
        assert!(deps.contains("auth"));
        assert!(deps.contains("database"));
    }

    #[test]
    fn test_handle_output_accessor() {
        let handle = UnitHandle::new("auth".to_string(), vec!["user_pool_id".to_string()]);

        let value = handle.output("user_pool_id").unwrap();
        assert_eq!(value, Value::reference("auth", "user_pool_id"));

        let err = handle.output("nonexistent").unwrap_err();
        assert!(matches!(err, CoreError::UndeclaredOutput { .. }));
    }
}
