//! Identifier generation.
//!
//! # Responsibility
//! - Produce opaque string identifiers unique within one process.
//!
//! # Invariants
//! - Identifiers are never reused while the process lives.
//! - Callers must treat the returned value as opaque; only equality and
//!   uniqueness are part of the contract.

use crate::model::board::EntityId;
use chrono::Utc;
use uuid::Uuid;

const RANDOM_SUFFIX_LEN: usize = 8;

/// Generates a fresh opaque identifier.
///
/// Combines the current epoch-millisecond instant with a random suffix, so
/// ids sort roughly by creation time while collisions stay negligible.
pub fn generate_id() -> EntityId {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{millis}-{}", &suffix[..RANDOM_SUFFIX_LEN])
}
