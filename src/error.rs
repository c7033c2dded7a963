//! Error types used by the connector and its remote collaborators.
//!
//! This module defines two error enums:
//!
//! - [`ConnectorError`]: results of the public connector entry points.
//! - [`RemoteError`]: failures reported by the remote display service.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//! No error here is fatal to the process: the worst case is a connector that
//! stays unbound and answers [`ConnectorError::NotInitialized`].

use thiserror::Error;

/// Step of the bind transaction that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindStage {
    /// Full lookup of the service by name.
    Lookup,
    /// Acquiring the callback registrar capability.
    Registrar,
    /// Registering the callback bridge with the registrar.
    Register,
    /// Acquiring the video-info provider capability.
    InfoProvider,
    /// Acquiring the connection-state notifier capability.
    ConnectionObserver,
}

impl BindStage {
    /// Returns a short stable label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            BindStage::Lookup => "lookup",
            BindStage::Registrar => "registrar",
            BindStage::Register => "register",
            BindStage::InfoProvider => "info_provider",
            BindStage::ConnectionObserver => "connection_observer",
        }
    }
}

impl std::fmt::Display for BindStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// # Errors returned by the remote display service.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The service (or the requested object) is not available.
    #[error("remote service unavailable")]
    Unavailable,

    /// The service answered with a non-zero status code.
    #[error("remote call returned status {code}")]
    Status {
        /// Raw status code reported by the service.
        code: i32,
    },

    /// The transport to the service failed.
    #[error("transport failure: {reason}")]
    Transport {
        /// Transport-level description.
        reason: String,
    },
}

impl RemoteError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RemoteError::Unavailable => "remote_unavailable",
            RemoteError::Status { .. } => "remote_status",
            RemoteError::Transport { .. } => "remote_transport",
        }
    }
}

/// # Errors produced by the service connector.
///
/// `RetryExhausted` is only ever published as an event; callers keep seeing
/// [`ConnectorError::NotInitialized`] once the retry budget is spent.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// The required capability has not been bound (yet).
    #[error("remote capability not bound")]
    NotInitialized,

    /// The caller supplied an unusable argument.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument.
        reason: &'static str,
    },

    /// The requested capability is deliberately not implemented.
    #[error("operation not supported: {operation}")]
    Unsupported {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// The service was reachable but a required capability could not be acquired.
    #[error("bind failed at {stage}: {reason}")]
    BindFailure {
        /// Failing step of the bind transaction.
        stage: BindStage,
        /// Underlying cause.
        reason: String,
    },

    /// The service never became reachable within the attempt budget.
    #[error("service not reachable after {attempts} attempts")]
    RetryExhausted {
        /// Number of failed reachability probes.
        attempts: u32,
    },

    /// A remote call on a bound capability failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl ConnectorError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use multidisplay::ConnectorError;
    ///
    /// let err = ConnectorError::Unsupported { operation: "set_hdmi_overscan" };
    /// assert_eq!(err.as_label(), "unsupported");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConnectorError::NotInitialized => "not_initialized",
            ConnectorError::InvalidArgument { .. } => "invalid_argument",
            ConnectorError::Unsupported { .. } => "unsupported",
            ConnectorError::BindFailure { .. } => "bind_failure",
            ConnectorError::RetryExhausted { .. } => "retry_exhausted",
            ConnectorError::Remote(e) => e.as_label(),
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConnectorError::NotInitialized => "not initialized".to_string(),
            ConnectorError::InvalidArgument { reason } => format!("invalid argument: {reason}"),
            ConnectorError::Unsupported { operation } => format!("unsupported: {operation}"),
            ConnectorError::BindFailure { stage, reason } => {
                format!("bind failed: stage={stage} reason={reason}")
            }
            ConnectorError::RetryExhausted { attempts } => {
                format!("retry exhausted after {attempts} attempts")
            }
            ConnectorError::Remote(e) => format!("remote: {e}"),
        }
    }

    /// True if the error means "deliberately not implemented" rather than "failed".
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ConnectorError::Unsupported { .. })
    }
}
