//! Trait seams for the externally built engine module.
//!
//! The module's internals (wire protocol, simulation) are out of scope for
//! the bootstrap; the runtime consumes it through the narrow interfaces
//! here. Hosts inject the concrete implementations, which also keeps the
//! whole core testable with scripted modules.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use url::Url;

/// Boxed future alias used at the trait seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Where the bootstrap is executing.
///
/// Worker contexts resolve bundle-relative URLs differently from document
/// contexts, which changes how the module artifact is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Document,
    Worker,
}

/// Capability query answering which [`ExecutionContext`] we are in.
///
/// Supplied to the loader instead of inline environment sniffing, so the
/// detection can be swapped out per host.
pub trait ExecutionEnv: Send + Sync {
    fn current(&self) -> ExecutionContext;
}

/// A fixed answer is a valid detector; handy for hosts that know their
/// context up front.
impl ExecutionEnv for ExecutionContext {
    fn current(&self) -> ExecutionContext {
        *self
    }
}

/// Locator for the engine module artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    raw: String,
}

impl ResourceLocator {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Resolve the locator for the given execution context.
    ///
    /// Workers see bundle-relative URLs, so the `./assets` prefix that a
    /// document resolves does not exist there and is rewritten to the
    /// worker root.
    pub fn resolved_for(&self, ctx: ExecutionContext) -> Self {
        match ctx {
            ExecutionContext::Document => self.clone(),
            ExecutionContext::Worker => Self {
                raw: self.raw.replacen("./assets", ".", 1),
            },
        }
    }
}

/// Opaque token for an established connection, minted by the module once
/// the handshake succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    /// Endpoint the handshake was performed against.
    pub endpoint: Url,
    /// Module-assigned session identifier.
    pub session: String,
}

/// The activated engine module.
///
/// `run` drives the module's main loop and always exits by raising: either
/// a real fault, or an error whose message carries
/// [`RUN_EXIT_MARKER`](crate::error::RUN_EXIT_MARKER) for an intentional
/// stop. The supervisor makes that distinction; implementations should
/// simply surface whatever the engine raised.
pub trait EngineModule: Send + Sync {
    /// Drive the module's main loop to termination.
    fn run(&self) -> BoxFuture<'_, Result<()>>;

    /// Handshake with the remote service at `endpoint`.
    fn connect(&self, endpoint: Url) -> BoxFuture<'_, Result<ConnectionDescriptor>>;

    /// Deliver an established connection to the run loop.
    fn bind(&self, descriptor: ConnectionDescriptor) -> BoxFuture<'_, Result<()>>;
}

/// Fetches, compiles, and activates the engine module.
pub trait ModuleSource: Send + Sync {
    fn load(&self, locator: ResourceLocator) -> BoxFuture<'_, Result<Arc<dyn EngineModule>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_locator_is_unchanged() {
        let locator = ResourceLocator::new("./assets/engine.wasm");
        assert_eq!(
            locator.resolved_for(ExecutionContext::Document).as_str(),
            "./assets/engine.wasm"
        );
    }

    #[test]
    fn worker_locator_drops_assets_prefix() {
        let locator = ResourceLocator::new("./assets/engine.wasm");
        assert_eq!(
            locator.resolved_for(ExecutionContext::Worker).as_str(),
            "./engine.wasm"
        );
    }

    #[test]
    fn worker_rewrite_only_touches_first_occurrence() {
        let locator = ResourceLocator::new("./assets/nested/assets/engine.wasm");
        assert_eq!(
            locator.resolved_for(ExecutionContext::Worker).as_str(),
            "./nested/assets/engine.wasm"
        );
    }

    #[test]
    fn worker_locator_without_prefix_is_unchanged() {
        let locator = ResourceLocator::new("/opt/engine.wasm");
        assert_eq!(
            locator.resolved_for(ExecutionContext::Worker).as_str(),
            "/opt/engine.wasm"
        );
    }

    #[test]
    fn fixed_context_acts_as_env() {
        let env: &dyn ExecutionEnv = &ExecutionContext::Worker;
        assert_eq!(env.current(), ExecutionContext::Worker);
    }
}
