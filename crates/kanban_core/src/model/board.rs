//! Board entity tree.
//!
//! # Responsibility
//! - Define the four entity types and their construction rules.
//! - Provide the small ordering helpers the store relies on.
//!
//! # Invariants
//! - Constructors assign a fresh id, an empty child sequence, and the
//!   caller-supplied creation instant; `updated_at` starts as `None`.
//! - `repack_*_orders` rewrites `order` to the contiguous range `0..n-1`
//!   matching positional index.

use crate::id::generate_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque string identifier, unique within one process.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntityId = String;

/// Leaf annotation on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Stable comment id.
    pub id: EntityId,
    /// Comment body.
    pub text: String,
    /// Creation instant; never changes after construction.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant. `None` until the first mutation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Task item owning an ordered sequence of comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Stable card id.
    pub id: EntityId,
    /// User-facing title.
    pub title: String,
    /// Back-reference to the list currently containing this card.
    pub list_id: EntityId,
    /// Positional sort key among sibling cards.
    pub order: i64,
    /// Owned comment sequence, oldest first.
    pub comments: Vec<Comment>,
    /// Creation instant; never changes after construction.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant. `None` until the first mutation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Named column owning an ordered sequence of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    /// Stable list id.
    pub id: EntityId,
    /// User-facing title.
    pub title: String,
    /// Back-reference to the owning board.
    pub board_id: EntityId,
    /// Positional sort key among sibling lists.
    pub order: i64,
    /// Owned card sequence, left to right.
    pub cards: Vec<Card>,
    /// Creation instant; never changes after construction.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant. `None` until the first mutation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Root entity owning an ordered sequence of lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Stable board id.
    pub id: EntityId,
    /// User-facing title.
    pub title: String,
    /// Owned list sequence, left to right.
    pub lists: Vec<List>,
    /// Creation instant; never changes after construction.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant. `None` until the first mutation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Creates a comment with a generated stable id and empty history.
    pub fn new(text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            text: text.into(),
            created_at,
            updated_at: None,
        }
    }

    /// Records a mutation instant on this comment.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

impl Card {
    /// Creates a card with a generated stable id and no comments.
    ///
    /// `order` is the caller-supplied positional hint; the store re-packs
    /// orders on the next structural change of the owning list.
    pub fn new(
        title: impl Into<String>,
        list_id: EntityId,
        order: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            list_id,
            order,
            comments: Vec::new(),
            created_at,
            updated_at: None,
        }
    }

    /// Records a mutation instant on this card.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

impl List {
    /// Creates a list with a generated stable id and no cards.
    pub fn new(
        title: impl Into<String>,
        board_id: EntityId,
        order: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            board_id,
            order,
            cards: Vec::new(),
            created_at,
            updated_at: None,
        }
    }

    /// Records a mutation instant on this list.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    /// Rewrites card `order` values to contiguous positional indices.
    pub fn repack_card_orders(&mut self) {
        for (index, card) in self.cards.iter_mut().enumerate() {
            card.order = index as i64;
        }
    }
}

impl Board {
    /// Creates a board with a generated stable id and no lists.
    pub fn new(title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            lists: Vec::new(),
            created_at,
            updated_at: None,
        }
    }

    /// Records a mutation instant on this board.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }

    /// Rewrites list `order` values to contiguous positional indices.
    pub fn repack_list_orders(&mut self) {
        for (index, list) in self.lists.iter_mut().enumerate() {
            list.order = index as i64;
        }
    }
}
