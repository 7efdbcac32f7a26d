pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse process data: {message}")]
    Parse { message: String },

    #[error("Upload rejected: {message}")]
    Validation { message: String },

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
