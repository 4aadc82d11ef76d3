//! Explicitly constructed application context.
//!
//! Nothing in the bootstrap is a process global: the context owns the
//! loader, the supervisor, and the connection manager, and embedders (or
//! tests) construct as many independent contexts as they need.

use std::sync::Arc;
use std::time::Duration;

use arena_runtime::{
	ClientHandle, ConnectionManager, ConnectionOutcome, DEFAULT_HANDSHAKE_TIMEOUT, ExecutionEnv,
	ModuleLoader, ModuleSource, ResourceLocator, Result, RunSupervisor, StartSchedule,
};

/// Tunables for one bootstrap context.
#[derive(Debug, Clone)]
pub struct ContextConfig {
	/// Where the engine module artifact lives, before any context-specific
	/// rewriting.
	pub locator: ResourceLocator,
	/// When the run loop is handed control after `start`.
	pub schedule: StartSchedule,
	/// Deadline for the connection handshake.
	pub handshake_timeout: Duration,
}

impl ContextConfig {
	pub fn new(locator: ResourceLocator) -> Self {
		Self {
			locator,
			schedule: StartSchedule::default(),
			handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
		}
	}
}

/// Owns the bootstrap state for one host application.
pub struct AppContext {
	loader: ModuleLoader,
	supervisor: RunSupervisor,
	connections: ConnectionManager,
}

impl AppContext {
	pub fn new(
		source: Arc<dyn ModuleSource>,
		env: Arc<dyn ExecutionEnv>,
		config: ContextConfig,
	) -> Self {
		Self {
			loader: ModuleLoader::new(source, env, config.locator),
			supervisor: RunSupervisor::new(config.schedule),
			connections: ConnectionManager::new(config.handshake_timeout),
		}
	}

	/// Load the engine module, sharing the attempt with every concurrent
	/// caller. Idempotent once it has succeeded.
	pub async fn ensure_loaded(&self) -> Result<()> {
		self.loader.ensure_loaded().await
	}

	/// Start the run loop and hand back the one client handle.
	///
	/// Requires a prior successful [`AppContext::ensure_loaded`].
	pub async fn start(&self) -> Result<ClientHandle> {
		self.supervisor.start(&self.loader).await
	}

	/// Establish and bind a connection for the given handle.
	pub async fn connect(&self, handle: &ClientHandle, endpoint: &str) -> ConnectionOutcome {
		self.connections.connect(handle, endpoint).await
	}
}
