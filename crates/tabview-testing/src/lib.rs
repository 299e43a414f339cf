//! Testing infrastructure for tabview integration tests.
//!
//! This crate provides:
//! - `fixtures`: sample CRM-style records (calls, scheduled events)
//! - `source`: in-memory `DataSource` implementations, including a
//!   scripted variant whose responses resolve in a controllable order

pub mod fixtures;
pub mod source;

pub use fixtures::{call, event, CallRecord, EventRecord};
pub use source::{ScriptedSource, StaticSource};
