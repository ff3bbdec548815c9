//! Seed data for first-run initialization.
//!
//! # Responsibility
//! - Build the fixed demo board adopted when persistence yields nothing.
//!
//! # Invariants
//! - Back-references (`board_id`, `list_id`) match tree position.
//! - Sibling `order` values are contiguous from zero.

use crate::model::board::{Board, Card, List};
use chrono::Utc;

/// Builds the demo board used on a persistence miss.
///
/// Ids are generated fresh per call; the shape is fixed: three lists with a
/// couple of starter cards and no comments.
pub fn demo_board() -> Board {
    let now = Utc::now();
    let mut board = Board::new("Demo Board", now);

    let mut todo = List::new("Todo", board.id.clone(), 0, now);
    todo.cards
        .push(Card::new("Plan the board layout", todo.id.clone(), 0, now));
    todo.cards
        .push(Card::new("Wire up persistence", todo.id.clone(), 1, now));

    let mut in_progress = List::new("In Progress", board.id.clone(), 1, now);
    in_progress
        .cards
        .push(Card::new("Sketch the data model", in_progress.id.clone(), 0, now));

    let done = List::new("Done", board.id.clone(), 2, now);

    board.lists.push(todo);
    board.lists.push(in_progress);
    board.lists.push(done);
    board
}

#[cfg(test)]
mod tests {
    use super::demo_board;

    #[test]
    fn demo_board_keeps_back_references_consistent() {
        let board = demo_board();
        assert_eq!(board.lists.len(), 3);
        for (index, list) in board.lists.iter().enumerate() {
            assert_eq!(list.board_id, board.id);
            assert_eq!(list.order, index as i64);
            for (card_index, card) in list.cards.iter().enumerate() {
                assert_eq!(card.list_id, list.id);
                assert_eq!(card.order, card_index as i64);
                assert!(card.comments.is_empty());
            }
        }
    }
}
