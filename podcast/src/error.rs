use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Agent error: {0}")]
    AgentError(#[from] agent::Error),

    #[error("Json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Http error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Wav error: {0}")]
    WavError(#[from] hound::Error),

    #[error("Base64 decode error: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("Speech provider error: {0}")]
    Provider(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
