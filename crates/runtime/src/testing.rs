//! Shared test doubles for the bootstrap core.

use crate::error::{Error, RUN_EXIT_MARKER, Result};
use crate::handle::{ClientHandle, RunState};
use crate::module::{
    BoxFuture, ConnectionDescriptor, EngineModule, ExecutionContext, ExecutionEnv, ModuleSource,
    ResourceLocator,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Notify, watch};
use url::Url;

/// What the scripted run loop does when driven.
#[derive(Debug, Clone, Default)]
pub(crate) enum RunScript {
    /// Never yields control back (a loop that runs for the process
    /// lifetime).
    Pend,
    /// Raises the control-flow marker, like the real engine on an
    /// intentional stop.
    #[default]
    SentinelExit,
    /// Dies with a real fault.
    Fail(String),
    /// Returns cleanly. Engines are not supposed to, but the signature
    /// allows it.
    Finish,
}

/// One scripted answer to a `connect` call.
#[derive(Debug, Clone)]
pub(crate) enum ConnectScript {
    Session(String),
    Fault(String),
}

/// Scripted engine module recording every interaction.
#[derive(Default)]
pub(crate) struct TestModule {
    pub run: RunScript,
    /// Answers consumed in order; an exhausted script leaves `connect`
    /// pending forever.
    pub connects: Mutex<VecDeque<ConnectScript>>,
    /// When set, every `connect` waits for one permit before answering.
    pub gate: Option<Arc<Notify>>,
    pub connect_calls: AtomicUsize,
    /// Consumed by the next `bind` call.
    pub bind_fault: Mutex<Option<String>>,
    pub bound: Mutex<Vec<ConnectionDescriptor>>,
}

impl TestModule {
    pub fn with_run(run: RunScript) -> Arc<Self> {
        Arc::new(Self {
            run,
            ..Self::default()
        })
    }

    pub fn with_connects(connects: impl IntoIterator<Item = ConnectScript>) -> Arc<Self> {
        Arc::new(Self {
            connects: Mutex::new(connects.into_iter().collect()),
            ..Self::default()
        })
    }

    /// The message the real engine raises on an intentional stop.
    pub fn sentinel_message() -> String {
        format!("{RUN_EXIT_MARKER}, don't mind me. This isn't actually an error!")
    }
}

impl EngineModule for TestModule {
    fn run(&self) -> BoxFuture<'_, Result<()>> {
        let script = self.run.clone();
        Box::pin(async move {
            match script {
                RunScript::Pend => std::future::pending().await,
                RunScript::SentinelExit => Err(Error::Module(Self::sentinel_message())),
                RunScript::Fail(message) => Err(Error::Module(message)),
                RunScript::Finish => Ok(()),
            }
        })
    }

    fn connect(&self, endpoint: Url) -> BoxFuture<'_, Result<ConnectionDescriptor>> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.connects.lock().pop_front();
        let gate = self.gate.clone();
        Box::pin(async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            match script {
                Some(ConnectScript::Session(session)) => {
                    Ok(ConnectionDescriptor { endpoint, session })
                }
                Some(ConnectScript::Fault(message)) => Err(Error::Module(message)),
                None => std::future::pending().await,
            }
        })
    }

    fn bind(&self, descriptor: ConnectionDescriptor) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if let Some(message) = self.bind_fault.lock().take() {
                return Err(Error::Module(message));
            }
            self.bound.lock().push(descriptor);
            Ok(())
        })
    }
}

/// Scripted module source counting load attempts.
pub(crate) struct TestSource {
    pub module: Arc<TestModule>,
    pub fail_with: Option<String>,
    /// When set, the load stalls until one permit arrives.
    pub hold: Option<Arc<Notify>>,
    pub loads: AtomicUsize,
    pub seen: Mutex<Vec<ResourceLocator>>,
}

impl TestSource {
    pub fn of(module: Arc<TestModule>) -> Self {
        Self {
            module,
            fail_with: None,
            hold: None,
            loads: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn shared(module: Arc<TestModule>) -> Arc<Self> {
        Arc::new(Self::of(module))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(message.to_string()),
            ..Self::of(Arc::new(TestModule::default()))
        })
    }
}

impl ModuleSource for TestSource {
    fn load(&self, locator: ResourceLocator) -> BoxFuture<'_, Result<Arc<dyn EngineModule>>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(locator);
        let hold = self.hold.clone();
        Box::pin(async move {
            if let Some(hold) = hold {
                hold.notified().await;
            }
            match &self.fail_with {
                Some(message) => Err(Error::Module(message.clone())),
                None => Ok(Arc::clone(&self.module) as Arc<dyn EngineModule>),
            }
        })
    }
}

/// Execution-context detector counting how often it is consulted.
pub(crate) struct CountingEnv {
    pub ctx: ExecutionContext,
    pub calls: AtomicUsize,
}

impl CountingEnv {
    pub fn worker() -> Arc<Self> {
        Arc::new(Self {
            ctx: ExecutionContext::Worker,
            calls: AtomicUsize::new(0),
        })
    }
}

impl ExecutionEnv for CountingEnv {
    fn current(&self) -> ExecutionContext {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.ctx
    }
}

/// A handle wired to the given module, with the run-state publisher kept
/// alive by the caller.
pub(crate) fn test_handle(module: Arc<TestModule>) -> (ClientHandle, watch::Sender<RunState>) {
    let (tx, rx) = watch::channel(RunState::Running);
    (ClientHandle::new(module, rx), tx)
}
