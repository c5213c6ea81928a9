/// Crate-wide result alias.
pub type FramesmithResult<T> = Result<T, FramesmithError>;

/// Error type shared by every framesmith component.
#[derive(thiserror::Error, Debug)]
pub enum FramesmithError {
    /// Input or configuration rejected before any work was done.
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame image could not be fetched or decoded.
    #[error("resource load error: {0}")]
    ResourceLoad(String),

    /// Drawing into the canvas surface failed.
    #[error("render error: {0}")]
    Render(String),

    /// Encoding or saving an exported image failed.
    #[error("export error: {0}")]
    Export(String),

    /// Export was requested while the export control is disabled.
    #[error("export disabled: {0}")]
    ExportDisabled(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FramesmithError {
    /// Build a [`FramesmithError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FramesmithError::ResourceLoad`].
    pub fn resource_load(msg: impl Into<String>) -> Self {
        Self::ResourceLoad(msg.into())
    }

    /// Build a [`FramesmithError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FramesmithError::Export`].
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`FramesmithError::ExportDisabled`].
    pub fn export_disabled(msg: impl Into<String>) -> Self {
        Self::ExportDisabled(msg.into())
    }

    /// Build a [`FramesmithError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
