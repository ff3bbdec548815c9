//! Flattening projection of board trees.
//!
//! # Responsibility
//! - Project nested board snapshots into flat id-keyed entity maps.
//! - Keep child ordering recoverable through separate id-sequence tables.
//!
//! # Invariants
//! - Every entity reachable from the input appears exactly once, keyed by
//!   its own id, with its child sequence stripped from the flat record.
//! - The projection is pure: the input tree is neither mutated nor
//!   retained.

use crate::model::board::{Board, Card, Comment, EntityId, List};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Flat board record: [`Board`] without its list sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntity {
    pub id: EntityId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Flat list record: [`List`] without its card sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntity {
    pub id: EntityId,
    pub title: String,
    pub board_id: EntityId,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Flat card record: [`Card`] without its comment sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEntity {
    pub id: EntityId,
    pub title: String,
    pub list_id: EntityId,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Result of flattening one or more boards.
///
/// Entity maps give O(1) lookup by id; the `*_order` tables record each
/// parent's child ids in sequence order, since the flat records carry no
/// child collections of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedEntities {
    pub boards: HashMap<EntityId, BoardEntity>,
    pub lists: HashMap<EntityId, ListEntity>,
    pub cards: HashMap<EntityId, CardEntity>,
    pub comments: HashMap<EntityId, Comment>,
    /// Board id -> ordered list ids.
    pub board_lists: HashMap<EntityId, Vec<EntityId>>,
    /// List id -> ordered card ids.
    pub list_cards: HashMap<EntityId, Vec<EntityId>>,
    /// Card id -> ordered comment ids.
    pub card_comments: HashMap<EntityId, Vec<EntityId>>,
}

/// Flattens a slice of boards. An empty slice yields empty maps.
pub fn normalize_boards(boards: &[Board]) -> NormalizedEntities {
    let mut entities = NormalizedEntities::default();
    for board in boards {
        flatten_board(board, &mut entities);
    }
    entities
}

/// Flattens a single board.
pub fn normalize_board(board: &Board) -> NormalizedEntities {
    normalize_boards(std::slice::from_ref(board))
}

fn flatten_board(board: &Board, entities: &mut NormalizedEntities) {
    entities.board_lists.insert(
        board.id.clone(),
        board.lists.iter().map(|list| list.id.clone()).collect(),
    );
    entities.boards.insert(
        board.id.clone(),
        BoardEntity {
            id: board.id.clone(),
            title: board.title.clone(),
            created_at: board.created_at,
            updated_at: board.updated_at,
        },
    );

    for list in &board.lists {
        flatten_list(list, entities);
    }
}

fn flatten_list(list: &List, entities: &mut NormalizedEntities) {
    entities.list_cards.insert(
        list.id.clone(),
        list.cards.iter().map(|card| card.id.clone()).collect(),
    );
    entities.lists.insert(
        list.id.clone(),
        ListEntity {
            id: list.id.clone(),
            title: list.title.clone(),
            board_id: list.board_id.clone(),
            order: list.order,
            created_at: list.created_at,
            updated_at: list.updated_at,
        },
    );

    for card in &list.cards {
        flatten_card(card, entities);
    }
}

fn flatten_card(card: &Card, entities: &mut NormalizedEntities) {
    entities.card_comments.insert(
        card.id.clone(),
        card.comments
            .iter()
            .map(|comment| comment.id.clone())
            .collect(),
    );
    entities.cards.insert(
        card.id.clone(),
        CardEntity {
            id: card.id.clone(),
            title: card.title.clone(),
            list_id: card.list_id.clone(),
            order: card.order,
            created_at: card.created_at,
            updated_at: card.updated_at,
        },
    );

    for comment in &card.comments {
        entities
            .comments
            .insert(comment.id.clone(), comment.clone());
    }
}
