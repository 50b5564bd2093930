pub mod collaborators;
pub mod models;

#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    #[error("malformed upstream payload: {0}")]
    Malformed(String),
}

pub type CoreResult<T> = Result<T, CollaboratorError>;
