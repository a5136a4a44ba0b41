use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocabError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid word source: expected {{ books: [...] }}")]
    MissingBooks,

    #[error("book not found: {0}")]
    BookNotFound(String),

    #[error("invalid hard-word key: {0}")]
    InvalidKey(String),
}

impl From<std::io::Error> for VocabError {
    fn from(error: std::io::Error) -> Self {
        VocabError::Io(Box::new(error))
    }
}

pub type Result<T> = std::result::Result<T, VocabError>;
