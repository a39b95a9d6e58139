//! # nimbus_core
//!
//! Composition graph and synthesis engine for nimbus.
//!
//! This crate provides the cross-stack dependency and reference-resolution
//! model: independently declared infrastructure units name their inputs and
//! promised outputs, deferred references thread one unit's runtime-only
//! outputs into another unit's construction parameters, and the synthesizer
//! materializes every unit only after all of its dependencies exist.
//!
//! # Architecture
//!
//! - **Units**: declarative descriptors of one provisionable component
//! - **Values**: literal inputs or deferred references to upstream outputs
//! - **Graph**: units plus edges derived from reference usage, with cycle
//!   detection and a deterministic topological order
//! - **Synthesizer**: walks the order, resolves references, invokes the
//!   provisioning collaborator and emits one artifact per materialized unit
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nimbus_core::{CompositionGraph, Synthesizer, UnitSpec, Value};
//!
//! let mut graph = CompositionGraph::new();
//! let auth = graph.declare(UnitSpec::new("auth").output("user_pool_id"))?;
//! graph.declare(
//!     UnitSpec::new("api")
//!         .input("user_pool_id", auth.output("user_pool_id")?)
//!         .output("graphql_url"),
//! )?;
//!
//! let synth = Synthesizer::new(Arc::new(my_provisioner));
//! let report = synth.synthesize(&graph).await?;
//! ```

pub mod error;
pub mod graph;
pub mod provision;
pub mod report;
pub mod synth;
pub mod unit;
pub mod value;

// Re-export main types for convenience
pub use error::{CoreError, CoreResult};
pub use graph::CompositionGraph;
pub use provision::{ProvisionedOutputs, Provisioner};
pub use report::{Artifact, SynthesisReport, UnitFailure};
pub use synth::{Synthesizer, UnitState};
pub use unit::{Unit, UnitHandle, UnitSpec};
pub use value::{OutputRef, Value};
