//! Error conditions shared by the Make 7 crates.

use crate::types::Move;

#[derive(thiserror::Error, Debug)]
pub enum Make7Error {
    #[error("invalid move notation: {0:?}")]
    InvalidNotation(String),

    #[error("illegal move {mv} at ply {ply}")]
    IllegalMove { mv: Move, ply: usize },

    #[error("move {mv} played after the game ended at ply {ply}")]
    GameOver { mv: Move, ply: usize },

    #[error("transposition table needs at least 2 entries, got {requested}")]
    TableTooSmall { requested: usize },

    #[error("transposition table allocation failed for {entries} entries")]
    TableAllocation { entries: usize },

    #[error("insufficient resources: could not start search worker: {0}")]
    InsufficientResources(#[from] std::io::Error),

    #[error("search tree allocation failed after {nodes} nodes")]
    NodeAllocation { nodes: usize },
}

pub type Make7Result<T> = Result<T, Make7Error>;
