use thiserror::Error;

#[derive(Error, Debug)]
pub enum BriefingError {
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Invalid canvas: {0}")]
    InvalidCanvas(String),

    #[error("PDF export is not available in this build")]
    PdfUnavailable,
}

pub type Result<T> = std::result::Result<T, BriefingError>;
