use thiserror::Error;

/// Errors produced by the load → label → project pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The CSV parsed but contained zero data rows.
    #[error("the transaction file contains no data rows")]
    EmptyInput,

    /// The file could not be read or parsed as delimited data.
    #[error("could not parse transaction file: {0}")]
    Parse(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Not enough numeric feature columns survived selection for a 2-D projection.
    #[error("insufficient numeric features for analysis: found {found}, need at least 2")]
    InsufficientFeatures { found: usize },

    /// The PCA fit itself failed (e.g. fewer rows than components).
    #[error("projection failed: {0}")]
    Reduction(#[from] linfa_reduction::ReductionError),
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Parse(Box::new(err))
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Parse(Box::new(err))
    }
}

/// Errors produced while exporting the PDF summary.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The destination path is not writable.
    #[error("cannot write report: {0}")]
    Io(#[from] std::io::Error),

    /// The scatter plot could not be rendered or decoded for embedding.
    #[error("failed to render plot image: {0}")]
    Render(String),

    /// PDF composition failed.
    #[error("failed to compose PDF: {0}")]
    Pdf(String),
}
