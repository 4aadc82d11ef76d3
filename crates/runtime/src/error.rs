//! Error types for the bootstrap runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Marker text the engine module raises when its run loop stops on purpose.
///
/// The engine's loop never returns control normally; an intentional stop
/// arrives as an error carrying this exact substring. The engine is an
/// external artifact, so the substring check is kept as a compatibility
/// shim and confined to [`Error::is_run_exit_marker`]. Everything above the
/// supervisor sees a typed outcome instead.
pub const RUN_EXIT_MARKER: &str = "Using exceptions for control flow";

/// Fatal errors from module loading and run supervision.
///
/// Recoverable per-attempt connection failures live in [`ConnectError`];
/// everything here ends the feature for this process absent a full reload.
#[derive(Debug, Error)]
pub enum Error {
    /// Engine module fetch/compile/activation failed. Terminal: the loader
    /// never retries on its own.
    #[error("module load failed: {0}")]
    ModuleLoad(String),

    /// The module has not been loaded yet; call `ensure_loaded()` first.
    #[error("engine module not loaded")]
    ModuleNotLoaded,

    /// The run loop was already started; at most one client handle exists
    /// per context.
    #[error("run loop already started")]
    AlreadyStarted,

    /// Fault raised by the engine module itself (run loop, handshake, or
    /// binding).
    #[error("module fault: {0}")]
    Module(String),

    /// I/O error while fetching the module artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True if this is the module's intentional stop signal rather than a
    /// real fault. Detection is by message substring only.
    pub fn is_run_exit_marker(&self) -> bool {
        self.to_string().contains(RUN_EXIT_MARKER)
    }
}

/// Recoverable failures from a single connection attempt.
///
/// None of these are fatal to the process; the caller may retry with a
/// fresh `connect()` call.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The endpoint did not parse as a URI. No I/O was attempted.
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Another attempt for the same handle has not resolved yet.
    #[error("a connection attempt is already in flight for this handle")]
    AttemptInFlight,

    /// The handshake with the remote service failed or timed out.
    #[error("handshake with '{endpoint}' failed: {reason}")]
    Handshake { endpoint: String, reason: String },

    /// The connection was established but could not be delivered to the
    /// run loop.
    #[error("failed to bind connection to the run loop: {0}")]
    Binding(String),
}
