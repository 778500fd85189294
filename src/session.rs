//! Session gate: three-valued authentication state with subscriptions
//!
//! The gate is the only process-wide mutable value. It owns the current
//! auth status and publishes every transition over a watch channel; the
//! identity provider callback is the only writer. Dropping a receiver is
//! the unsubscribe.

use tokio::sync::watch;
use tracing::{info, warn};

/// Authentication status as reported by the identity provider.
///
/// `Unknown` means no provider callback has arrived yet. Making it a
/// variant, not a boolean flag, keeps "don't know yet" from ever reading
/// as "unauthenticated".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    /// No provider callback received yet
    #[default]
    Unknown,
    /// Provider reported a signed-in principal
    Authenticated,
    /// Provider reported no principal
    Unauthenticated,
}

/// Principal reported by the identity provider callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Provider-issued user id
    pub uid: String,
    /// Account email
    pub email: String,
    /// Whether the account completed email verification
    pub verified: bool,
}

/// Snapshot of the gate: status plus any pending status-check failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GateState {
    /// Current authentication status
    pub status: AuthStatus,
    /// Set when the provider status check itself failed; cleared by the
    /// next successful callback. While set and the status is `Unknown`,
    /// protected content stays hidden.
    pub error: Option<String>,
}

/// Tracks authentication status and gates protected views.
pub struct SessionGate {
    state: watch::Sender<GateState>,
}

impl SessionGate {
    /// Create a gate in the `Unknown` state
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(GateState::default());
        Self { state }
    }

    /// Subscribe to state transitions.
    ///
    /// The receiver yields the current state immediately and every change
    /// after it. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.state.subscribe()
    }

    /// Current gate snapshot
    #[must_use]
    pub fn current(&self) -> GateState {
        self.state.borrow().clone()
    }

    /// Provider callback: re-evaluate from the reported principal.
    ///
    /// Each invocation may transition between `Authenticated` and
    /// `Unauthenticated` at any time, e.g. on an external sign-out.
    pub fn report(&self, principal: Option<&Principal>) {
        let status = match principal {
            Some(principal) => {
                info!("Identity provider reported principal {}", principal.email);
                AuthStatus::Authenticated
            }
            None => {
                info!("Identity provider reported no principal");
                AuthStatus::Unauthenticated
            }
        };

        self.state.send_replace(GateState {
            status,
            error: None,
        });
    }

    /// The provider status check itself failed.
    ///
    /// The status is left untouched rather than guessed, so a gate that
    /// never resolved stays `Unknown` and protected content stays hidden.
    /// The message persists until a successful callback clears it.
    pub fn report_check_failure<S: Into<String>>(&self, message: S) {
        let message = message.into();
        warn!("Identity provider status check failed: {}", message);

        self.state.send_modify(|state| {
            state.error = Some(message);
        });
    }
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}
