//! Domain model for the board hierarchy.
//!
//! # Responsibility
//! - Define the canonical entity tree: Board, List, Card, Comment.
//! - Keep ownership by value: every entity owns its ordered children.
//!
//! # Invariants
//! - Every entity is identified by a stable `EntityId`, never reused.
//! - `created_at` is assigned once at construction and never changes.
//! - `board_id`/`list_id` back-references mirror tree position; they never
//!   establish ownership on their own.

pub mod board;
