//! Shared definitions for the Taskdeck wire format.
//!
//! The domain model and the realtime event catalog live here so that the
//! server and any Rust client agree on one source of truth for entity
//! shapes and event names.

pub mod event;
pub mod model;
