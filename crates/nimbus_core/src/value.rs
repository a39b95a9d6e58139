//! Input values: concrete literals and deferred references.
//!
//! A [`Value`] is either already concrete or a placeholder for "output O of
//! unit U", resolvable only after U has materialized. References support no
//! operations besides being passed as another unit's input and being read by
//! the synthesizer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A deferred pointer to another unit's not-yet-known output value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputRef {
    /// Id of the unit that produces the output.
    pub unit: String,
    /// Name of the output on that unit.
    pub output: String,
}

impl OutputRef {
    pub fn new(unit: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            output: output.into(),
        }
    }
}

impl std::fmt::Display for OutputRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.unit, self.output)
    }
}

/// An input value for a unit.
///
/// `Map` carries nested values so that aggregate inputs (for example an
/// environment-variable map) can mix literal entries with references that are
/// resolved entry by entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// An already concrete value, passed through unchanged.
    Literal(serde_json::Value),
    /// A deferred reference to another unit's output.
    Reference(OutputRef),
    /// A mapping whose entries are themselves values.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Create a literal value.
    pub fn literal(value: impl Into<serde_json::Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Create a reference to `output` of `unit`.
    pub fn reference(unit: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Reference(OutputRef::new(unit, output))
    }

    /// Create a map value from nested entries.
    pub fn map(entries: BTreeMap<String, Value>) -> Self {
        Self::Map(entries)
    }

    /// Collect every reference contained in this value, recursing into maps.
    pub fn collect_references<'a>(&'a self, refs: &mut Vec<&'a OutputRef>) {
        match self {
            Value::Literal(_) => {}
            Value::Reference(r) => refs.push(r),
            Value::Map(entries) => {
                for value in entries.values() {
                    value.collect_references(refs);
                }
            }
        }
    }

    /// Check whether this value contains any deferred reference.
    pub fn is_deferred(&self) -> bool {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        !refs.is_empty()
    }
}
