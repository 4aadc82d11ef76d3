//! Render-state model for the host UI.
//!
//! The rendering layer itself lives outside this crate. What it needs from
//! the core is a serializable snapshot saying what to draw and whether the
//! retry action should be enabled: connection failures are retryable,
//! load/run failures are terminal absent a full reload.

use arena_runtime::{ConnectionOutcome, Result, RunState};
use serde::Serialize;

/// What the host UI should currently show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ScreenState {
	/// Module load in progress.
	Booting,
	/// Load or run failure; only a full reload recovers.
	Fatal { message: String },
	/// Module running, no connection.
	Ready,
	/// Connection attempt in flight.
	Connecting { endpoint: String },
	Connected { endpoint: String, session: String },
	/// Connection attempt failed; the retry action stays enabled.
	ConnectFailed { message: String },
}

impl ScreenState {
	/// Fold a load (or start) result into the screen.
	pub fn after_load(result: &Result<()>) -> Self {
		match result {
			Ok(()) => Self::Ready,
			Err(e) => Self::Fatal {
				message: e.to_string(),
			},
		}
	}

	/// Fold the run loop's fate into the screen. A sentinel stop is benign
	/// and renders the same as a running loop.
	pub fn after_run_state(state: &RunState) -> Self {
		match state {
			RunState::Running | RunState::Stopped => Self::Ready,
			RunState::Failed(message) => Self::Fatal {
				message: message.clone(),
			},
		}
	}

	pub fn connecting(endpoint: &str) -> Self {
		Self::Connecting {
			endpoint: endpoint.to_string(),
		}
	}

	/// Fold a connection attempt's outcome into the screen.
	pub fn after_connect(outcome: &ConnectionOutcome) -> Self {
		match outcome {
			ConnectionOutcome::Established(descriptor) => Self::Connected {
				endpoint: descriptor.endpoint.to_string(),
				session: descriptor.session.clone(),
			},
			ConnectionOutcome::Failed(e) => Self::ConnectFailed {
				message: e.to_string(),
			},
		}
	}

	/// Whether the UI should offer a retry action in this state.
	pub fn retry_enabled(&self) -> bool {
		matches!(self, Self::ConnectFailed { .. })
	}

	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::Fatal { .. })
	}

	/// JSON snapshot for hosts that render out-of-process.
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
	}
}
