use std::fmt;
use thiserror::Error;

/// Which step of a swap failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Request rejected before any external call
    InvalidRequest,
    /// Mint decimals could not be read
    MetadataLookup,
    /// Jupiter unreachable or the request timed out
    Network,
    /// Jupiter answered with an error status or an unusable body
    Service,
    /// base64 or transaction envelope could not be decoded
    Decode,
    /// Wallet could not sign the transaction
    Signing,
    /// RPC node rejected the transaction, or its reply was lost
    Submission,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::InvalidRequest => "invalid request",
            FailureKind::MetadataLookup => "metadata lookup",
            FailureKind::Network => "network",
            FailureKind::Service => "service",
            FailureKind::Decode => "decode",
            FailureKind::Signing => "signing",
            FailureKind::Submission => "submission",
        };
        f.write_str(name)
    }
}

/// The single error returned by [`crate::SwapExecutor`].
///
/// No swap landed unless `kind` is [`FailureKind::Submission`], in which case
/// the transaction may or may not have been broadcast.
#[derive(Debug, Clone, Error)]
#[error("Swap failed: {message}")]
pub struct SwapFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SwapFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Flatten an error chain into the failure message
    pub fn from_error(kind: FailureKind, error: &anyhow::Error) -> Self {
        Self::new(kind, format!("{:#}", error))
    }
}

/// Error from a [`crate::jupiter::SwapApi`] call, tagged by origin
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Network(anyhow::Error),
    #[error(transparent)]
    Service(anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Network(_) => FailureKind::Network,
            ApiError::Service(_) => FailureKind::Service,
        }
    }
}

impl From<ApiError> for SwapFailure {
    fn from(error: ApiError) -> Self {
        match &error {
            ApiError::Network(inner) | ApiError::Service(inner) => {
                SwapFailure::from_error(error.kind(), inner)
            }
        }
    }
}
