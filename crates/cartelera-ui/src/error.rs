//! Error types for the client core.

use thiserror::Error;

use crate::core::render::ComponentId;

/// Primary error type for client operations.
///
/// Nothing here is fatal: controllers catch gateway failures at their
/// boundary, keep the previously displayed state, and surface a scoped error
/// affordance for the affected view only.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure before an HTTP status was available.
    #[error("network failure for {endpoint}: {detail}")]
    Network {
        /// Endpoint that was being called.
        endpoint: String,
        /// Transport error detail.
        detail: String,
    },
    /// Upstream answered with a non-success HTTP status.
    #[error("upstream returned {status} for {endpoint}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Endpoint that produced the status.
        endpoint: String,
    },
    /// Response body could not be decoded into the expected shape.
    #[error("malformed response body for {endpoint}: {detail}")]
    Decode {
        /// Endpoint that produced the body.
        endpoint: String,
        /// Decode error detail.
        detail: String,
    },
    /// A request parameter was rejected before dispatch.
    #[error("invalid request: {reason}")]
    Validation {
        /// Human-readable reason for the rejection.
        reason: String,
    },
    /// A response arrived for a superseded request generation and was
    /// discarded. Logged by the app shell, never surfaced to the user.
    #[error("stale response discarded for {view} (generation {generation})")]
    StateConflict {
        /// Logical view the response belonged to.
        view: &'static str,
        /// Generation the response was issued under.
        generation: u64,
    },
    /// A paint function failed against the render target.
    #[error("render failed for {component:?}: {detail}")]
    Render {
        /// Component whose paint failed.
        component: ComponentId,
        /// Failure detail.
        detail: String,
    },
}

/// Convenience alias for client operation results.
pub type ClientResult<T> = Result<T, ClientError>;
