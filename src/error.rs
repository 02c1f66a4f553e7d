#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fewer valid samples than the engine accepts.
    #[error("at least {required} numbers are required, got {found}")]
    InsufficientData { required: usize, found: usize },

    /// Degenerate call: empty median request, non-finite sample, bad parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
