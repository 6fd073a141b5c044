use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export failed rendering page {page}: {message}")]
    Page { page: usize, message: String },

    #[error("export task failed: {0}")]
    Task(String),
}

impl ExportError {
    pub fn page(page: usize, message: impl Into<String>) -> Self {
        Self::Page { page, message: message.into() }
    }
}
