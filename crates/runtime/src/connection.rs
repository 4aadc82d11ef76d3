//! Connection establishment and binding.
//!
//! Orchestrates the two-step connect protocol: handshake with the remote
//! service, then deliver the established connection to the handle's run
//! loop. At most one attempt is in flight per handle; every failure is
//! recoverable and the caller may simply call `connect` again.

use crate::error::ConnectError;
use crate::handle::ClientHandle;
use crate::module::ConnectionDescriptor;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

/// Deadline for the remote handshake.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a single connection attempt. Nothing is retained between
/// attempts.
#[derive(Debug)]
pub enum ConnectionOutcome {
    Established(ConnectionDescriptor),
    Failed(ConnectError),
}

impl ConnectionOutcome {
    pub fn is_established(&self) -> bool {
        matches!(self, ConnectionOutcome::Established(_))
    }

    pub fn descriptor(&self) -> Option<&ConnectionDescriptor> {
        match self {
            ConnectionOutcome::Established(descriptor) => Some(descriptor),
            ConnectionOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ConnectError> {
        match self {
            ConnectionOutcome::Established(_) => None,
            ConnectionOutcome::Failed(e) => Some(e),
        }
    }
}

/// Drives the protocol that establishes exactly one active connection at a
/// time per handle.
pub struct ConnectionManager {
    handshake_timeout: Duration,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(DEFAULT_HANDSHAKE_TIMEOUT)
    }
}

impl ConnectionManager {
    pub fn new(handshake_timeout: Duration) -> Self {
        Self { handshake_timeout }
    }

    /// Establish a connection to `endpoint` and bind it to the handle's
    /// run loop.
    ///
    /// Fails fast on an unparsable endpoint before any I/O, refuses to race
    /// a second attempt against one already in flight for the same handle,
    /// and reports every failure as a recoverable
    /// [`ConnectionOutcome::Failed`]. Handshake success happens-before
    /// binding; both must succeed for `Established`.
    pub async fn connect(&self, handle: &ClientHandle, endpoint: &str) -> ConnectionOutcome {
        let url = match Url::parse(endpoint) {
            Ok(url) => url,
            Err(e) => {
                return ConnectionOutcome::Failed(ConnectError::InvalidEndpoint {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        // Single-flight per handle: deny the newcomer, never race.
        let Some(_gate) = handle.begin_connect() else {
            tracing::debug!(%url, "connect denied, attempt already in flight");
            return ConnectionOutcome::Failed(ConnectError::AttemptInFlight);
        };

        tracing::debug!(%url, "starting connection handshake");
        let descriptor = match timeout(self.handshake_timeout, handle.module().connect(url.clone()))
            .await
        {
            Ok(Ok(descriptor)) => descriptor,
            Ok(Err(e)) => {
                return ConnectionOutcome::Failed(ConnectError::Handshake {
                    endpoint: url.to_string(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                return ConnectionOutcome::Failed(ConnectError::Handshake {
                    endpoint: url.to_string(),
                    reason: format!("no answer within {:?}", self.handshake_timeout),
                });
            }
        };

        // The run loop only learns about the connection through bind.
        if let Err(e) = handle.module().bind(descriptor.clone()).await {
            return ConnectionOutcome::Failed(ConnectError::Binding(e.to_string()));
        }

        tracing::debug!(session = %descriptor.session, "connection established and bound");
        ConnectionOutcome::Established(descriptor)
    }
}
