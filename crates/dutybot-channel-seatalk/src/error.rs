#[derive(Debug, thiserror::Error)]
pub enum SeaTalkError {
    #[error("failed to execute HTTP request: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("API returned HTTP {status}")]
    Status { status: u16 },
    #[error("API returned an error: code {code}: {message}")]
    Api { code: i64, message: String },
}

pub type Result<T> = std::result::Result<T, SeaTalkError>;
