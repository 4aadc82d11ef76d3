//! One-time engine module loading.
//!
//! The expensive fetch/compile/activate sequence runs at most once per
//! loader, no matter how many tasks ask for it or in what order. The first
//! caller claims the load; everyone else awaits the same in-flight result.

use crate::error::{Error, Result};
use crate::module::{EngineModule, ExecutionEnv, ModuleSource, ResourceLocator};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

/// Load lifecycle for the engine module. Transitions only move forward;
/// `Failed` is terminal for this loader.
enum LoadPhase {
    Unstarted,
    Loading,
    Ready(Arc<dyn EngineModule>),
    Failed(Arc<str>),
}

/// Loads the engine module exactly once process-wide.
///
/// Owned by the application context; all `LoadPhase` mutation funnels
/// through [`ModuleLoader::ensure_loaded`].
pub struct ModuleLoader {
    source: Arc<dyn ModuleSource>,
    env: Arc<dyn ExecutionEnv>,
    locator: ResourceLocator,
    phase: Mutex<LoadPhase>,
    settled: Notify,
}

impl ModuleLoader {
    pub fn new(
        source: Arc<dyn ModuleSource>,
        env: Arc<dyn ExecutionEnv>,
        locator: ResourceLocator,
    ) -> Self {
        Self {
            source,
            env,
            locator,
            phase: Mutex::new(LoadPhase::Unstarted),
            settled: Notify::new(),
        }
    }

    /// Ensure the module is loaded, running the underlying load at most
    /// once.
    ///
    /// Concurrent callers share the in-flight attempt; once it settles,
    /// every present and future caller sees the same result. A failed load
    /// is not retried.
    pub async fn ensure_loaded(&self) -> Result<()> {
        let claimed = {
            let mut phase = self.phase.lock();
            match &*phase {
                LoadPhase::Unstarted => {
                    *phase = LoadPhase::Loading;
                    true
                }
                LoadPhase::Loading => false,
                LoadPhase::Ready(_) => return Ok(()),
                LoadPhase::Failed(reason) => return Err(Error::ModuleLoad(reason.to_string())),
            }
        };

        if claimed {
            self.load_once().await
        } else {
            self.await_settled().await
        }
    }

    /// The activated module, available once [`ModuleLoader::ensure_loaded`]
    /// has succeeded.
    pub fn module(&self) -> Result<Arc<dyn EngineModule>> {
        match &*self.phase.lock() {
            LoadPhase::Ready(module) => Ok(Arc::clone(module)),
            LoadPhase::Failed(reason) => Err(Error::ModuleLoad(reason.to_string())),
            LoadPhase::Unstarted | LoadPhase::Loading => Err(Error::ModuleNotLoaded),
        }
    }

    async fn load_once(&self) -> Result<()> {
        // Context detection happens once per load attempt, not per caller.
        let ctx = self.env.current();
        let locator = self.locator.resolved_for(ctx);
        tracing::debug!(context = ?ctx, locator = locator.as_str(), "loading engine module");

        match self.source.load(locator).await {
            Ok(module) => {
                *self.phase.lock() = LoadPhase::Ready(module);
                self.settled.notify_waiters();
                tracing::debug!("engine module ready");
                Ok(())
            }
            Err(e) => {
                let reason: Arc<str> = Arc::from(e.to_string().as_str());
                tracing::error!(reason = %reason, "engine module load failed");
                *self.phase.lock() = LoadPhase::Failed(Arc::clone(&reason));
                self.settled.notify_waiters();
                Err(Error::ModuleLoad(reason.to_string()))
            }
        }
    }

    async fn await_settled(&self) -> Result<()> {
        loop {
            // Register before re-checking so a notify landing between the
            // check and the await is not lost.
            let settled = self.settled.notified();
            match &*self.phase.lock() {
                LoadPhase::Ready(_) => return Ok(()),
                LoadPhase::Failed(reason) => return Err(Error::ModuleLoad(reason.to_string())),
                LoadPhase::Unstarted | LoadPhase::Loading => {}
            }
            settled.await;
        }
    }
}
