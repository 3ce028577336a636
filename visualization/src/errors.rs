//! Error types for striplog figure rendering

use plotters::drawing::DrawingAreaErrorKind;
use plotters_backend::DrawingErrorKind;
use striplog::StriplogError;
use thiserror::Error;

/// Result type alias for visualization operations
pub type Result<T> = std::result::Result<T, VisualizationError>;

/// Errors that can occur during visualization
#[derive(Error, Debug)]
pub enum VisualizationError {
    #[error(transparent)]
    Data(#[from] StriplogError),

    #[error("Chart rendering failed: {message}")]
    RenderingError { message: String },

    #[error("Font unavailable: {message}")]
    FontError { message: String },

    #[error("File I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Image processing error: {message}")]
    ImageError { message: String },

    #[error("Layout calculation error: {message}")]
    LayoutError { message: String },
}

impl From<image::ImageError> for VisualizationError {
    fn from(err: image::ImageError) -> Self {
        VisualizationError::ImageError {
            message: err.to_string(),
        }
    }
}

impl<T: std::error::Error + Send + Sync + 'static> From<DrawingAreaErrorKind<T>>
    for VisualizationError
{
    fn from(err: DrawingAreaErrorKind<T>) -> Self {
        match err {
            DrawingAreaErrorKind::BackendError(DrawingErrorKind::FontError(e)) => {
                VisualizationError::FontError {
                    message: e.to_string(),
                }
            }
            other => VisualizationError::RenderingError {
                message: format!("Drawing area error: {}", other),
            },
        }
    }
}
