/// Domain errors raised by the analysis core.
///
/// Upstream and transport failures live in `skinsight_vision`; this enum only
/// covers failures the core detects on its own, before or after the network
/// call.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The submitted image failed local validation and was never sent upstream.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The result store holds no analysis (results view opened directly).
    #[error("No analysis result is available")]
    NoResult,

    /// A session action was attempted from a state that does not allow it.
    #[error("Invalid session transition: {0}")]
    InvalidTransition(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build a validation error from any message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
