use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid tile id")]
    InvalidTile,
}

pub type Result<T> = core::result::Result<T, GameError>;
