use crate::domain::ports::{HttpMethod, HttpRequest, HttpTransport, TransportError};
use crate::utils::error::{GrouperError, Result};
use std::time::Duration;

/// Attempt bookkeeping for a single HTTP call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub attempts: u32,
    pub max_attempts: u32,
}

impl RetryState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempts: 0,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Records a failed attempt and reports whether another one is allowed.
    pub fn record_failure(&mut self) -> bool {
        self.attempts += 1;
        self.attempts < self.max_attempts
    }
}

/// Sends requests through a transport, retrying connectivity failures only.
pub struct RetryingRequester<T: HttpTransport> {
    transport: T,
    timeout: Duration,
    max_attempts: u32,
}

impl<T: HttpTransport> RetryingRequester<T> {
    pub fn new(transport: T, timeout: Duration, max_attempts: u32) -> Self {
        Self {
            transport,
            timeout,
            max_attempts,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn request(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<String>,
    ) -> Result<serde_json::Value> {
        let mut state = RetryState::new(self.max_attempts);

        let raw = loop {
            let request = HttpRequest {
                method,
                path: path.to_string(),
                body: body.clone(),
                timeout: self.timeout,
            };

            tracing::debug!(
                "{} {} (attempt {}/{})",
                method,
                path,
                state.attempts + 1,
                state.max_attempts
            );

            match self.transport.send(request).await {
                Ok(raw) => break raw,
                Err(err @ TransportError::Connect(_)) => {
                    if state.record_failure() {
                        tracing::warn!(
                            "Connection to Grouper failed ({}), retrying {}/{}",
                            err,
                            state.attempts + 1,
                            state.max_attempts
                        );
                        continue;
                    }
                    tracing::error!(
                        "Giving up on {} {} after {} attempt(s): {}",
                        method,
                        path,
                        state.attempts,
                        err
                    );
                    return Err(GrouperError::ConnectionError {
                        attempts: state.attempts,
                        source: err,
                    });
                }
                Err(err @ TransportError::Other(_)) => {
                    return Err(GrouperError::unexpected(err.to_string()));
                }
            }
        };

        Ok(serde_json::from_str(&raw)?)
    }
}
