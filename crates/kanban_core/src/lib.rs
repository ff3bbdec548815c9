//! Core board engine for a Kanban-style task board.
//! This crate is the single source of truth for hierarchy and ordering
//! invariants.

pub mod db;
pub mod id;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod seed;
pub mod storage;
pub mod store;

pub use id::generate_id;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::{Board, Card, Comment, EntityId, List};
pub use normalize::{
    normalize_board, normalize_boards, BoardEntity, CardEntity, ListEntity, NormalizedEntities,
};
pub use storage::{BoardStorage, StorageError, BOARD_STORAGE_KEY, SCHEMA_VERSION};
pub use store::BoardStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
