use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response too large (>{limit} bytes)")]
    TooLarge { limit: usize },

    #[error("you must be logged in to do that")]
    NotLoggedIn,

    #[error("no story with id {0}")]
    UnknownStory(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
