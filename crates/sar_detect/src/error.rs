use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Failed to decode raster: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Raster is empty ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },

    #[error("Invalid detection parameters: {0}")]
    InvalidParams(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

pub type Result<T> = std::result::Result<T, DetectError>;
