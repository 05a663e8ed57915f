use thiserror::Error;

use crate::model::ModelError;
use crate::tools::RegistryError;

/// Errors that stop startup or end a session.
///
/// Per-call tool failures are not here: they are reported to the model as
/// error results and the conversation continues.
#[derive(Debug, Error)]
pub enum Error {
    /// The model provider could not be reached or answered with garbage.
    #[error(transparent)]
    Provider(#[from] ModelError),

    /// A tool could not be registered (bad schema, duplicate name).
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, Error>;
