// ============================================================================
// frp-signals - Errors
// ============================================================================

use std::any::Any;

use thiserror::Error;

use super::types::SignalId;

/// Failures surfaced by a propagation pass.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PropagationError {
    #[error("{failures} subscriber(s) of signal {signal} panicked during propagation: {message}")]
    SubscriberPanicked {
        signal: SignalId,
        failures: usize,
        /// Message of the first captured panic
        message: String,
    },
}

pub type PropagationResult<T> = Result<T, PropagationError>;

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("<non-string panic payload>")
    }
}
