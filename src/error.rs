use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashTableError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Key does not exist in the hash table")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, HashTableError>;
