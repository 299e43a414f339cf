// Runtime module - per-view orchestration over an external data source
// Owns the state machine, request ordering, debounce, and subscriptions

pub mod config;
pub mod debounce;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod source;

pub use config::{FetchMode, ViewConfig};
pub use debounce::SearchDebouncer;
pub use error::{Error, Result};
pub use events::{ViewEvent, ViewEvents, ViewSnapshot};
pub use orchestrator::{TableOrchestrator, ViewPhase};
pub use source::DataSource;
