//! The capability object handed to the UI after startup.

use crate::module::EngineModule;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// Fate of the supervised run loop, as observed through the handle.
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Running,
    /// The loop stopped on purpose (sentinel exit). Not an error.
    Stopped,
    /// The loop died with a real fault.
    Failed(String),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunState::Running)
    }
}

/// Capability token for a started engine module.
///
/// At most one exists per context. It is deliberately not `Clone`: the
/// handle is owned by whoever received it from the supervisor and shared
/// by reference, and it lives until process teardown (there is no explicit
/// close).
pub struct ClientHandle {
    module: Arc<dyn EngineModule>,
    run_state: watch::Receiver<RunState>,
    connecting: AtomicBool,
}

impl ClientHandle {
    pub(crate) fn new(module: Arc<dyn EngineModule>, run_state: watch::Receiver<RunState>) -> Self {
        Self {
            module,
            run_state,
            connecting: AtomicBool::new(false),
        }
    }

    /// Current fate of the run loop.
    pub fn run_state(&self) -> RunState {
        self.run_state.borrow().clone()
    }

    /// Wait until the run loop reaches a terminal state.
    pub async fn finished(&self) -> RunState {
        let mut rx = self.run_state.clone();
        loop {
            let state = rx.borrow_and_update().clone();
            if state.is_terminal() {
                return state;
            }
            if rx.changed().await.is_err() {
                // Publisher gone; whatever is in the channel is final.
                return rx.borrow().clone();
            }
        }
    }

    pub(crate) fn module(&self) -> &Arc<dyn EngineModule> {
        &self.module
    }

    /// Claim the single-flight connect gate. `None` while another attempt
    /// for this handle is in flight.
    pub(crate) fn begin_connect(&self) -> Option<ConnectGate<'_>> {
        if self.connecting.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(ConnectGate { handle: self })
        }
    }
}

/// RAII guard for the connect gate; releases on every exit path so the
/// caller can retry after a failed attempt.
pub(crate) struct ConnectGate<'a> {
    handle: &'a ClientHandle,
}

impl Drop for ConnectGate<'_> {
    fn drop(&mut self) {
        self.handle.connecting.store(false, Ordering::SeqCst);
    }
}
