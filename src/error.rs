use crate::service::{client, configuration, export, session};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Engine(#[from] lexx_engine::Error),
    #[error(transparent)]
    Client(#[from] client::Error),
    #[error(transparent)]
    Session(#[from] session::Error),
    #[error(transparent)]
    Configuration(#[from] configuration::Error),
    #[error(transparent)]
    Export(#[from] export::Error),
    #[error("operation cancelled")]
    Cancelled,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
