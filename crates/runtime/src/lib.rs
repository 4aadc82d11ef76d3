//! Arena bootstrap runtime - module loading, run supervision, connection
//! lifecycle
//!
//! This crate is the initialization core that sits between a host UI and
//! the externally built engine module:
//!
//! - **Module loading**: fetch, compile, and activate the engine exactly
//!   once, shared across arbitrarily many concurrent callers
//! - **Run supervision**: drive the engine's run loop and tell an
//!   intentional sentinel exit apart from a real failure
//! - **Connection lifecycle**: establish and bind at most one connection
//!   at a time per client handle
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ arena-client │  Host-facing facade (AppContext, UI state)
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │arena-runtime │  This crate
//! │ ┌──────────┐ │
//! │ │ Loader   │ │  single-flight module activation
//! │ └──────────┘ │
//! │ ┌──────────┐ │
//! │ │Supervisor│ │  run loop start + exit classification
//! │ └──────────┘ │
//! │ ┌──────────┐ │
//! │ │ ConnMgr  │ │  handshake + bind, one attempt in flight
//! │ └──────────┘ │
//! └──────────────┘
//! ```
//!
//! # Decoupling via trait seams
//!
//! The engine module is consumed through the [`EngineModule`] and
//! [`ModuleSource`] traits, so the runtime never sees its wire protocol or
//! computation. Hosts also inject an [`ExecutionEnv`] describing where the
//! bootstrap runs, which decides how the module artifact is located.

pub mod connection;
pub mod error;
pub mod handle;
pub mod loader;
pub mod module;
pub mod supervisor;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types at crate root
pub use connection::{ConnectionManager, ConnectionOutcome, DEFAULT_HANDSHAKE_TIMEOUT};
pub use error::{ConnectError, Error, RUN_EXIT_MARKER, Result};
pub use handle::{ClientHandle, RunState};
pub use loader::ModuleLoader;
pub use module::{
    BoxFuture, ConnectionDescriptor, EngineModule, ExecutionContext, ExecutionEnv, ModuleSource,
    ResourceLocator,
};
pub use supervisor::{RunOutcome, RunSupervisor, StartSchedule};
