//! Stack declarations for the multi-service application.
//!
//! Each module declares one unit: its literal inputs taken from the
//! environment config, its deferred references to upstream stacks, and the
//! outputs it promises once provisioned. What each stack actually provisions
//! is the collaborator's concern; only the input/output contract lives here.

pub mod api;
pub mod auth;
pub mod database;
pub mod hosting;
pub mod storage;
