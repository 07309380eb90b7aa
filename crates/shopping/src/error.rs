#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("font unavailable: {0}")]
    FontUnavailable(String),

    #[error("text cannot be drawn with a standard PDF font: {0}")]
    Unencodable(String),

    #[error("pdf encoding failed: {0}")]
    Pdf(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("shopping cart could not be read: {0}")]
    DataAccess(#[source] anyhow::Error),

    #[error("shopping cart read timed out")]
    Timeout,

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ExportError {
    /// Whether the same request may succeed when sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DataAccess(_) | Self::Timeout)
    }
}
