/// Convenience result type used across cardforge.
pub type CardforgeResult<T> = Result<T, CardforgeError>;

/// Top-level error taxonomy used by the generation pipeline.
///
/// Per-row variants (`MissingAsset`, `AssetLoad`, `RenderNotReady`) are caught at the row boundary
/// by the batch orchestrator. `Timeout` is fatal to a whole batch.
#[derive(thiserror::Error, Debug)]
pub enum CardforgeError {
    /// A CSV line whose field count does not match the header.
    #[error("malformed row: {0}")]
    MalformedRow(String),

    /// A frame, mask or catalog entry that could not be found.
    #[error("missing asset: {0}")]
    MissingAsset(String),

    /// An image that was found but failed to load or decode.
    #[error("asset load failure: {0}")]
    AssetLoad(String),

    /// A bounded wait that expired (frame catalog readiness).
    #[error("timeout: {0}")]
    Timeout(String),

    /// Art referenced by a card is still unusable after the readiness sweep.
    #[error("render not ready: {0}")]
    RenderNotReady(String),

    /// Invalid user-provided data (paths, configuration).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors raised by the rendering backend.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardforgeError {
    /// Build a [`CardforgeError::MalformedRow`] value.
    pub fn malformed_row(msg: impl Into<String>) -> Self {
        Self::MalformedRow(msg.into())
    }

    /// Build a [`CardforgeError::MissingAsset`] value.
    pub fn missing_asset(msg: impl Into<String>) -> Self {
        Self::MissingAsset(msg.into())
    }

    /// Build a [`CardforgeError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`CardforgeError::Timeout`] value.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Build a [`CardforgeError::RenderNotReady`] value.
    pub fn render_not_ready(msg: impl Into<String>) -> Self {
        Self::RenderNotReady(msg.into())
    }

    /// Build a [`CardforgeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardforgeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Whether this error aborts the whole batch rather than a single row.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
