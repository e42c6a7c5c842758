use thiserror::Error;

/// Errors returned by the API client.
#[derive(Debug, Error)]
pub enum Error {
    /// Static map options were rejected before any request was sent.
    #[error("invalid static map options: {0}")]
    Validation(#[from] ValidationError),

    /// The request could not be built or the transport failed.
    #[error("request to YOLP failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("failed to decode YOLP response: {0}")]
    Decode(#[from] DecodeError),
}

/// A violated [`StaticOptions`](crate::StaticOptions) constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("width must be greater than 0 if it isn't 0, got {0}")]
    Width(i32),

    #[error("height must be greater than 0 if it isn't 0, got {0}")]
    Height(i32),

    #[error("zoom must be between {min} and {max} if it isn't 0, got {zoom}")]
    Zoom { zoom: i32, min: i32, max: i32 },

    #[error("pin number must be between 0 and 99 for numbered pins, got {0}")]
    PinNumber(i32),

    #[error("pin letter must be between 'a' and 'z' for lettered pins, got {0:?}")]
    PinLetter(char),

    #[error("zoom must not exceed 15 with a rainfall overlay, got {0}")]
    RainfallZoom(i32),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed YDF document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unreadable map image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
