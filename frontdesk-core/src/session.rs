use std::future::Future;

use log::info;
use parking_lot::Mutex;
use thiserror::Error;

use crate::{ApiError, ApiResult, ConsoleEvent, EventSender};

/// Whether a bearer token is currently held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// No token is held, so the call never reached the network
    #[error("No active session")]
    NoSession,
    /// The server rejected the token mid-call and the session was cleared
    #[error("Session has ended")]
    Expired,
    /// Any other failure of the underlying call, passed through unchanged
    #[error(transparent)]
    Api(ApiError),
}

/// Owns the bearer token and guards every remote call with it.
///
/// There is exactly one gate per console, shared via [std::sync::Arc].
/// Clearing the token is process-wide: every pending or future call observes
/// the cleared state immediately.
pub struct SessionGate {
    token: Mutex<Option<String>>,
    event_sender: EventSender,
}

impl SessionGate {
    pub fn new(event_sender: EventSender) -> Self {
        Self {
            token: Mutex::new(None),
            event_sender,
        }
    }

    /// Stores a freshly issued token, opening the session
    pub fn authenticate(&self, token: String) {
        *self.token.lock() = Some(token);
        self.emit_status();
    }

    /// Drops the token, on explicit logout or revocation
    pub fn clear(&self) {
        *self.token.lock() = None;
        self.emit_status();
    }

    pub fn status(&self) -> SessionStatus {
        if self.token.lock().is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Unauthenticated
        }
    }

    /// Runs a remote call with the current token.
    ///
    /// Without a token the call short-circuits as [SessionError::NoSession].
    /// A 401 or 403 response clears the token before the error surfaces as
    /// [SessionError::Expired].
    pub async fn with_session<T, F, Fut>(&self, call: F) -> Result<T, SessionError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let token = self.token.lock().clone().ok_or(SessionError::NoSession)?;

        match call(token).await {
            Ok(value) => Ok(value),
            Err(error) if error.is_auth_failure() => {
                info!("Session was revoked by the server");

                self.clear();
                Err(SessionError::Expired)
            }
            Err(error) => Err(SessionError::Api(error)),
        }
    }

    fn emit_status(&self) {
        self.event_sender
            .send(ConsoleEvent::SessionUpdate {
                status: self.status(),
            })
            .ok();
    }
}

#[cfg(test)]
mod test {
    use crossbeam::channel::unbounded;

    use super::*;

    fn gate() -> SessionGate {
        let (event_sender, _event_receiver) = unbounded();
        SessionGate::new(event_sender)
    }

    #[tokio::test]
    async fn test_short_circuit_without_token() {
        let gate = gate();
        let mut called = false;

        let result: Result<(), _> = gate
            .with_session(|_token| {
                called = true;
                async { Ok(()) }
            })
            .await;

        assert_eq!(result, Err(SessionError::NoSession));
        assert!(!called);
    }

    #[tokio::test]
    async fn test_auth_failure_clears_token_globally() {
        let gate = gate();
        gate.authenticate("secret".to_string());

        let result: Result<(), _> = gate
            .with_session(|_token| async {
                Err(ApiError::Http {
                    status: 401,
                    message: "Unauthorized".to_string(),
                })
            })
            .await;

        assert_eq!(result, Err(SessionError::Expired));
        assert_eq!(gate.status(), SessionStatus::Unauthenticated);

        // The next call must not reach the network
        let result: Result<(), _> = gate.with_session(|_token| async { Ok(()) }).await;
        assert_eq!(result, Err(SessionError::NoSession));
    }

    #[tokio::test]
    async fn test_other_errors_pass_through() {
        let gate = gate();
        gate.authenticate("secret".to_string());

        let error = ApiError::Http {
            status: 500,
            message: "Internal".to_string(),
        };

        let passed = error.clone();
        let result: Result<(), _> = gate.with_session(|_token| async { Err(passed) }).await;

        assert_eq!(result, Err(SessionError::Api(error)));
        assert_eq!(gate.status(), SessionStatus::Authenticated);
    }
}
