//! Composition graph with derived edges and cycle detection.
//!
//! Nodes are unit descriptors; edges are induced by references passed as
//! inputs from one unit to another. The edge set is never hand-maintained:
//! it is recomputed from the current input set every time the graph is
//! validated, so declared references and the dependency graph cannot drift
//! apart.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::unit::{Unit, UnitHandle, UnitSpec};

/// The directed acyclic graph of units assembled by a composition root.
///
/// Units are registered in whatever order the composition root chooses;
/// materialization order follows from the derived dependency order, not the
/// declaration order. The graph lives for the duration of one synthesis pass.
#[derive(Debug, Default)]
pub struct CompositionGraph {
    units: Vec<Unit>,
    index: HashMap<String, usize>,
}

impl CompositionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit and return a handle to its declared outputs.
    ///
    /// Fails with [`CoreError::DuplicateUnit`] if the id collides with an
    /// existing unit; the graph is left unchanged in that case. Reference
    /// targets are checked later, by [`validate`](Self::validate), so that a
    /// declaration pass never partially registers a unit.
    pub fn declare(&mut self, spec: UnitSpec) -> CoreResult<UnitHandle> {
        if self.index.contains_key(&spec.id) {
            return Err(CoreError::DuplicateUnit(spec.id));
        }

        let unit = Unit::from_spec(spec);
        debug!(unit = %unit.id, outputs = unit.outputs.len(), "declared unit");

        let handle = UnitHandle::new(unit.id.clone(), unit.outputs.clone());
        self.index.insert(unit.id.clone(), self.units.len());
        self.units.push(unit);
        Ok(handle)
    }

    /// All registered units, in declaration order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Number of registered units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check whether the graph has no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Check whether a unit with the given id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Get a unit by id.
    pub fn get(&self, id: &str) -> Option<&Unit> {
        self.index.get(id).map(|&i| &self.units[i])
    }

    /// Get a unit by id, returning an error if not found.
    pub fn get_required(&self, id: &str) -> CoreResult<&Unit> {
        self.get(id)
            .ok_or_else(|| CoreError::UnknownUnit(id.to_string()))
    }

    /// The derived edge set as `(dependency, dependent)` pairs.
    ///
    /// Recomputed from the current input set on every call; deduplicated and
    /// ordered by the dependent's declaration order.
    pub fn edges(&self) -> Vec<(String, String)> {
        let mut edges = Vec::new();
        for unit in &self.units {
            for dep in unit.dependencies() {
                edges.push((dep.to_string(), unit.id.clone()));
            }
        }
        edges
    }

    /// Validate the graph and compute the deterministic topological order.
    ///
    /// Checks that every reference names a registered unit and a declared
    /// output, then orders units so each appears after all units it depends
    /// on. Units with no ordering constraint between them keep their
    /// declaration order, so the result is stable across runs with identical
    /// input. Fails with [`CoreError::CyclicDependency`] naming the cycle's
    /// unit sequence if a unit transitively depends on itself.
    pub fn validate(&self) -> CoreResult<Vec<String>> {
        let n = self.units.len();
        let mut dependencies: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (i, unit) in self.units.iter().enumerate() {
            for dep_id in unit.dependencies() {
                let dep = *self
                    .index
                    .get(dep_id)
                    .ok_or_else(|| CoreError::UnknownUnit(dep_id.to_string()))?;
                dependencies[i].push(dep);
                dependents[dep].push(i);
            }
            for r in unit.references() {
                let target = &self.units[self.index[&r.unit]];
                if !target.declares_output(&r.output) {
                    return Err(CoreError::UndeclaredOutput {
                        unit: r.unit.clone(),
                        output: r.output.clone(),
                    });
                }
            }
        }

        // Kahn's algorithm, always picking the lowest declaration index among
        // ready units to keep the order stable.
        let mut remaining: Vec<usize> = dependencies.iter().map(|d| d.len()).collect();
        let mut placed = vec![false; n];
        let mut order = Vec::with_capacity(n);

        for _ in 0..n {
            match (0..n).find(|&i| !placed[i] && remaining[i] == 0) {
                Some(i) => {
                    placed[i] = true;
                    order.push(self.units[i].id.clone());
                    for &d in &dependents[i] {
                        remaining[d] -= 1;
                    }
                }
                None => {
                    return Err(CoreError::CyclicDependency(
                        self.find_cycle(&dependencies, &placed),
                    ));
                }
            }
        }

        debug!(order = ?order, "validated composition graph");
        Ok(order)
    }

    /// Extract one cycle from the units left unplaced by the topological walk.
    fn find_cycle(&self, dependencies: &[Vec<usize>], placed: &[bool]) -> Vec<String> {
        let n = self.units.len();
        // 0 = unvisited, 1 = on the current path, 2 = exhausted
        let mut state = vec![0u8; n];
        let mut path = Vec::new();

        for start in 0..n {
            if placed[start] || state[start] != 0 {
                continue;
            }
            if let Some(cycle) = self.walk_cycle(start, dependencies, placed, &mut state, &mut path)
            {
                return cycle;
            }
        }
        Vec::new()
    }

    fn walk_cycle(
        &self,
        node: usize,
        dependencies: &[Vec<usize>],
        placed: &[bool],
        state: &mut Vec<u8>,
        path: &mut Vec<usize>,
    ) -> Option<Vec<String>> {
        state[node] = 1;
        path.push(node);

        for &next in &dependencies[node] {
            if placed[next] {
                continue;
            }
            match state[next] {
                0 => {
                    if let Some(cycle) = self.walk_cycle(next, dependencies, placed, state, path) {
                        return Some(cycle);
                    }
                }
                1 => {
                    let from = path.iter().position(|&i| i == next).unwrap_or(0);
                    return Some(
                        path[from..]
                            .iter()
                            .map(|&i| self.units[i].id.clone())
                            .collect(),
                    );
                }
                _ => {}
            }
        }

        path.pop();
        state[node] = 2;
        None
    }
}
