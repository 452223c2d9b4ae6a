use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("input text is empty")]
    EmptyInput,

    #[error("unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("extraction backend error: {0}")]
    Backend(anyhow::Error),

    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
