use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate key.")]
    DuplicateKey,

    #[error("Key {0} not found.")]
    KeyNotFound(u32),

    #[error("page number {0} is out of bounds")]
    PageOutOfBounds(u32),

    #[error("Corruption: {0}")]
    Corrupt(String),
}

impl DbError {
    /// Statement-level errors leave the store untouched and keep the session
    /// alive; everything else is fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DbError::DuplicateKey | DbError::KeyNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
