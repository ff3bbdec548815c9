use chrono::Utc;
use kanban_core::db::open_db_in_memory;
use kanban_core::{Board, BoardStorage, BoardStore, EntityId, List};
use rusqlite::Connection;
use std::collections::HashSet;

fn store_with_board(conn: &Connection) -> BoardStore<'_> {
    let storage = BoardStorage::try_new(conn).unwrap();
    let mut store = BoardStore::new(storage);
    store.set_board(Board::new("Board", Utc::now()));
    store
}

fn add_list_with_cards(
    store: &mut BoardStore<'_>,
    title: &str,
    card_titles: &[&str],
) -> (EntityId, Vec<EntityId>) {
    let order = store.board().unwrap().lists.len() as i64;
    let list_id = store.add_list(title, order).unwrap();
    let card_ids = card_titles
        .iter()
        .enumerate()
        .map(|(index, card_title)| {
            store.add_card(&list_id, *card_title, index as i64).unwrap()
        })
        .collect();
    (list_id, card_ids)
}

fn list<'a>(board: &'a Board, id: &str) -> &'a List {
    board.lists.iter().find(|list| list.id == id).unwrap()
}

fn card_ids(board: &Board, list_id: &str) -> Vec<EntityId> {
    list(board, list_id)
        .cards
        .iter()
        .map(|card| card.id.clone())
        .collect()
}

fn assert_contiguous_orders(board: &Board, list_id: &str) {
    for (index, card) in list(board, list_id).cards.iter().enumerate() {
        assert_eq!(card.order, index as i64, "order mismatch at position {index}");
        assert_eq!(card.list_id, list_id);
    }
}

#[test]
fn move_within_one_list_to_front() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_with_board(&conn);
    let (list_a, cards) = add_list_with_cards(&mut store, "A", &["c1", "c2", "c3"]);

    store.move_card(&cards[2], &list_a, &list_a, 0);

    let board = store.board().unwrap();
    assert_eq!(
        card_ids(board, &list_a),
        vec![cards[2].clone(), cards[0].clone(), cards[1].clone()]
    );
    assert_contiguous_orders(board, &list_a);
}

#[test]
fn move_across_lists_updates_back_reference() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_with_board(&conn);
    let (list_a, cards) = add_list_with_cards(&mut store, "A", &["c1", "c2"]);
    let (list_b, _) = add_list_with_cards(&mut store, "B", &[]);

    store.move_card(&cards[0], &list_a, &list_b, 0);

    let board = store.board().unwrap();
    assert_eq!(card_ids(board, &list_a), vec![cards[1].clone()]);
    assert_eq!(card_ids(board, &list_b), vec![cards[0].clone()]);
    assert_contiguous_orders(board, &list_a);
    assert_contiguous_orders(board, &list_b);
    // One move shares one instant across the card, both lists, and the board.
    let at = list(board, &list_b).cards[0].updated_at.unwrap();
    assert_eq!(list(board, &list_a).updated_at.unwrap(), at);
    assert_eq!(list(board, &list_b).updated_at.unwrap(), at);
    assert_eq!(board.updated_at.unwrap(), at);
}

#[test]
fn move_to_index_past_end_appends() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_with_board(&conn);
    let (list_a, cards) = add_list_with_cards(&mut store, "A", &["c1", "c2", "c3"]);

    store.move_card(&cards[0], &list_a, &list_a, 99);

    let board = store.board().unwrap();
    assert_eq!(
        card_ids(board, &list_a),
        vec![cards[1].clone(), cards[2].clone(), cards[0].clone()]
    );
    assert_contiguous_orders(board, &list_a);
}

#[test]
fn move_to_current_position_keeps_sequence() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_with_board(&conn);
    let (list_a, cards) = add_list_with_cards(&mut store, "A", &["c1", "c2", "c3"]);
    let before = card_ids(store.board().unwrap(), &list_a);

    store.move_card(&cards[1], &list_a, &list_a, 1);

    let board = store.board().unwrap();
    assert_eq!(card_ids(board, &list_a), before);
    assert_contiguous_orders(board, &list_a);
    // Timestamps are still refreshed; only the sequence is unchanged.
    assert!(list(board, &list_a).updated_at.is_some());
}

#[test]
fn move_with_unknown_references_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_with_board(&conn);
    let (list_a, cards) = add_list_with_cards(&mut store, "A", &["c1"]);
    let before = store.board().unwrap().clone();

    store.move_card("missing-card", &list_a, &list_a, 0);
    store.move_card(&cards[0], "missing-list", &list_a, 0);
    store.move_card(&cards[0], &list_a, "missing-list", 0);

    assert_eq!(store.board().unwrap(), &before);
}

#[test]
fn delete_card_repacks_remaining_orders() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_with_board(&conn);
    let (list_a, cards) = add_list_with_cards(&mut store, "A", &["c1", "c2", "c3"]);

    store.delete_card(&list_a, &cards[1]);

    let board = store.board().unwrap();
    assert_eq!(
        card_ids(board, &list_a),
        vec![cards[0].clone(), cards[2].clone()]
    );
    assert_contiguous_orders(board, &list_a);
}

#[test]
fn delete_card_requires_the_owning_list() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_with_board(&conn);
    let (_list_a, cards) = add_list_with_cards(&mut store, "A", &["c1"]);
    let (list_b, _) = add_list_with_cards(&mut store, "B", &[]);
    let before = store.board().unwrap().clone();

    store.delete_card(&list_b, &cards[0]);

    assert_eq!(store.board().unwrap(), &before);
}

#[test]
fn mutation_sequence_preserves_contiguity_and_single_ownership() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_with_board(&conn);
    let (list_a, a_cards) = add_list_with_cards(&mut store, "A", &["a1", "a2", "a3"]);
    let (list_b, b_cards) = add_list_with_cards(&mut store, "B", &["b1", "b2"]);
    let (list_c, _) = add_list_with_cards(&mut store, "C", &[]);

    store.move_card(&a_cards[0], &list_a, &list_b, 1);
    store.move_card(&b_cards[1], &list_b, &list_c, 0);
    store.delete_card(&list_a, &a_cards[2]);
    store.move_card(&b_cards[0], &list_b, &list_b, 5);
    store.delete_card(&list_c, &b_cards[1]);

    let board = store.board().unwrap();
    let mut seen: HashSet<EntityId> = HashSet::new();
    for list in &board.lists {
        assert_contiguous_orders(board, &list.id);
        for card in &list.cards {
            assert!(seen.insert(card.id.clone()), "card owned twice: {}", card.id);
        }
    }
    assert_eq!(seen.len(), 3);
}
