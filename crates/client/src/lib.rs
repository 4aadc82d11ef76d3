//! Arena client - host-facing facade for the engine bootstrap
//!
//! Wires the bootstrap core ([`arena_runtime`]) into the three operations a
//! host UI needs, plus the render-state glue the UI consumes:
//!
//! - [`AppContext::ensure_loaded`] — load the engine module once
//! - [`AppContext::start`] — start the run loop, obtain the client handle
//! - [`AppContext::connect`] — establish and bind a connection
//!
//! ```ignore
//! let ctx = AppContext::new(source, env, ContextConfig::new(locator));
//! ctx.ensure_loaded().await?;
//! let handle = ctx.start().await?;
//! let outcome = ctx.connect(&handle, "https://arena.example/signal").await;
//! let screen = ScreenState::after_connect(&outcome);
//! ```

pub mod context;
pub mod logging;
pub mod ui;

pub use context::{AppContext, ContextConfig};
pub use logging::init_logging;
pub use ui::ScreenState;

// Re-export the runtime surface hosts need to implement the trait seams.
pub use arena_runtime::{
	BoxFuture, ClientHandle, ConnectError, ConnectionDescriptor, ConnectionOutcome, EngineModule,
	Error, ExecutionContext, ExecutionEnv, ModuleSource, RUN_EXIT_MARKER, ResourceLocator, Result,
	RunState, StartSchedule,
};
