//! # nimbus_stacks
//!
//! The multi-service application composed on top of `nimbus_core`: identity,
//! database, GraphQL API, file storage and hosting stacks, wired together by
//! deferred references to each other's outputs.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nimbus_core::Synthesizer;
//! use nimbus_stacks::{compose, EnvironmentConfig, SimulatedProvisioner, StackFeatures};
//!
//! let config = EnvironmentConfig::new("dev", "samples")
//!     .with_features(StackFeatures::all());
//! let graph = compose(&config)?;
//!
//! let synth = Synthesizer::new(Arc::new(SimulatedProvisioner::new("dev")));
//! let report = synth.synthesize(&graph).await?;
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod simulate;
pub mod stacks;

// Re-export main types for convenience
pub use compose::compose;
pub use config::{EnvironmentConfig, RepositoryConfig, StackFeatures};
pub use error::{StacksError, StacksResult};
pub use simulate::SimulatedProvisioner;
