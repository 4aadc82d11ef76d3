//! Run-loop supervision.
//!
//! Starts the engine module's main loop and classifies its termination.
//! The loop below us exits by raising; the marker text tells an intentional
//! stop apart from a genuine failure, and only the former is suppressed.

use crate::error::{Error, Result};
use crate::handle::{ClientHandle, RunState};
use crate::loader::ModuleLoader;
use crate::module::EngineModule;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// When to hand control to the run loop after `start` is called.
///
/// A scheduling hint only; it changes timing, never correctness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartSchedule {
    /// Start the loop as soon as possible.
    #[default]
    Immediate,
    /// Yield to the host scheduler once before starting.
    Deferred,
}

impl StartSchedule {
    async fn settle(self) {
        if self == StartSchedule::Deferred {
            tokio::task::yield_now().await;
        }
    }
}

/// How a supervised run loop ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The loop stopped on purpose via the control-flow marker.
    SentinelExit,
    /// The loop died with a real fault, surfaced unchanged.
    Failure(Error),
}

/// Starts the engine module's run loop and produces the client handle.
pub struct RunSupervisor {
    schedule: StartSchedule,
    started: AtomicBool,
}

impl RunSupervisor {
    pub fn new(schedule: StartSchedule) -> Self {
        Self {
            schedule,
            started: AtomicBool::new(false),
        }
    }

    /// Start the module's run loop and hand back the one client handle.
    ///
    /// The handle is available immediately; the loop keeps running in a
    /// background task and reports its fate through
    /// [`ClientHandle::run_state`] / [`ClientHandle::finished`]. Fails with
    /// [`Error::ModuleNotLoaded`] before a successful load and with
    /// [`Error::AlreadyStarted`] on a second call.
    pub async fn start(&self, loader: &ModuleLoader) -> Result<ClientHandle> {
        let module = loader.module()?;
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyStarted);
        }

        self.schedule.settle().await;

        let (state_tx, state_rx) = watch::channel(RunState::Running);
        let loop_module = Arc::clone(&module);
        tokio::spawn(async move {
            let state = match Self::run(loop_module.as_ref()).await {
                RunOutcome::SentinelExit => RunState::Stopped,
                RunOutcome::Failure(e) => {
                    tracing::error!(error = %e, "run loop failed");
                    RunState::Failed(e.to_string())
                }
            };
            let _ = state_tx.send(state);
        });

        Ok(ClientHandle::new(module, state_rx))
    }

    /// Drive the module's loop to termination and classify the exit.
    ///
    /// An error carrying the control-flow marker is a normal, silent
    /// completion; anything else is a failure for this run instance.
    pub async fn run(module: &dyn EngineModule) -> RunOutcome {
        match module.run().await {
            // Engines are expected to raise on exit; a plain return is
            // still a clean stop.
            Ok(()) => RunOutcome::SentinelExit,
            Err(e) if e.is_run_exit_marker() => {
                tracing::debug!("run loop exited via control-flow marker");
                RunOutcome::SentinelExit
            }
            Err(e) => RunOutcome::Failure(e),
        }
    }
}
