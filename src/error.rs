use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Enhancement failed: {message}")]
    Enhance { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
