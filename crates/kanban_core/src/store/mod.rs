//! Board entity store: mutation and ordering engine.
//!
//! # Responsibility
//! - Hold the single current board snapshot and apply all mutations.
//! - Keep sibling `order` values and back-references consistent.
//! - Persist every new snapshot best-effort after each mutation.
//!
//! # Invariants
//! - Operations targeting an id that does not exist are silent no-ops; the
//!   snapshot is left byte-for-byte unchanged (no timestamp refresh).
//! - Card `order` values within a list are re-packed to `0..n-1` after
//!   every deletion or move affecting that list.
//! - A card's `list_id` always names the list whose sequence contains it.
//! - `updated_at` is refreshed on the mutated entity and every strict
//!   ancestor with one shared instant per operation, read only after all
//!   reference lookups have succeeded.
//! - A failed persistence write never rolls back in-memory state.

use crate::model::board::{Board, Card, Comment, EntityId, List};
use crate::seed;
use crate::storage::BoardStorage;
use chrono::Utc;
use log::info;

/// In-memory store owning the current board snapshot.
///
/// Single-threaded by design: every operation runs to completion before the
/// next is observed, so each call replaces the snapshot atomically from the
/// caller's point of view.
pub struct BoardStore<'conn> {
    board: Option<Board>,
    storage: BoardStorage<'conn>,
}

impl<'conn> BoardStore<'conn> {
    /// Creates an empty store backed by the given persistence adapter.
    pub fn new(storage: BoardStorage<'conn>) -> Self {
        Self {
            board: None,
            storage,
        }
    }

    /// Returns the current snapshot, if initialized.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Adopts a persisted board, or the seed demo board on a miss.
    ///
    /// Does nothing when a snapshot is already held. A persistence miss
    /// (absent key, malformed payload, schema mismatch) uniformly falls
    /// back to the seed board, which is persisted immediately.
    pub fn initialize(&mut self) {
        if self.board.is_some() {
            return;
        }

        match self.storage.load() {
            Some(board) => {
                info!("event=board_init module=store status=ok source=storage");
                self.board = Some(board);
            }
            None => {
                info!("event=board_init module=store status=ok source=seed");
                self.board = Some(seed::demo_board());
                self.persist();
            }
        }
    }

    /// Replaces the snapshot unconditionally and persists it.
    pub fn set_board(&mut self, board: Board) {
        self.board = Some(board);
        self.persist();
    }

    /// Retitles the board.
    pub fn rename_board(&mut self, title: impl Into<String>) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let now = Utc::now();
        board.title = title.into();
        board.touch(now);
        self.persist();
    }

    /// Appends a new empty list and returns its id.
    ///
    /// `order` is a caller-supplied hint (conventionally the current
    /// sibling count); it is not validated until the next reorder.
    pub fn add_list(&mut self, title: impl Into<String>, order: i64) -> Option<EntityId> {
        let board = self.board.as_mut()?;
        let now = Utc::now();
        let list = List::new(title, board.id.clone(), order, now);
        let id = list.id.clone();
        board.lists.push(list);
        board.touch(now);
        self.persist();
        Some(id)
    }

    /// Retitles the matching list.
    pub fn rename_list(&mut self, id: &str, title: impl Into<String>) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let Some(list) = board.lists.iter_mut().find(|list| list.id == id) else {
            return;
        };
        let now = Utc::now();
        list.title = title.into();
        list.touch(now);
        board.touch(now);
        self.persist();
    }

    /// Removes the matching list with all its cards and comments.
    ///
    /// Remaining sibling lists are re-packed to contiguous orders, matching
    /// card deletion behavior.
    pub fn delete_list(&mut self, id: &str) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let Some(index) = board.lists.iter().position(|list| list.id == id) else {
            return;
        };
        let now = Utc::now();
        board.lists.remove(index);
        board.repack_list_orders();
        board.touch(now);
        self.persist();
    }

    /// Adopts the caller-supplied list sequence, reassigning each list's
    /// `order` to its new positional index.
    pub fn reorder_lists(&mut self, lists: Vec<List>) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let now = Utc::now();
        board.lists = lists;
        board.repack_list_orders();
        board.touch(now);
        self.persist();
    }

    /// Appends a new empty card to the matching list and returns its id.
    ///
    /// `order` is a caller-supplied hint, as for [`Self::add_list`].
    pub fn add_card(
        &mut self,
        list_id: &str,
        title: impl Into<String>,
        order: i64,
    ) -> Option<EntityId> {
        let board = self.board.as_mut()?;
        let list = board.lists.iter_mut().find(|list| list.id == list_id)?;
        let now = Utc::now();
        let card = Card::new(title, list.id.clone(), order, now);
        let id = card.id.clone();
        list.cards.push(card);
        list.touch(now);
        board.touch(now);
        self.persist();
        Some(id)
    }

    /// Retitles the card with the given id, wherever it currently lives.
    pub fn rename_card(&mut self, id: &str, title: impl Into<String>) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let Some(list) = board
            .lists
            .iter_mut()
            .find(|list| list.cards.iter().any(|card| card.id == id))
        else {
            return;
        };
        let Some(card) = list.cards.iter_mut().find(|card| card.id == id) else {
            return;
        };
        let now = Utc::now();
        card.title = title.into();
        card.touch(now);
        list.touch(now);
        board.touch(now);
        self.persist();
    }

    /// Removes the card (and its comments) from the owning list.
    ///
    /// Requires both the owning list id and the card id; remaining cards in
    /// that list are re-packed to contiguous orders.
    pub fn delete_card(&mut self, list_id: &str, card_id: &str) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let Some(list) = board.lists.iter_mut().find(|list| list.id == list_id) else {
            return;
        };
        let Some(index) = list.cards.iter().position(|card| card.id == card_id) else {
            return;
        };
        let now = Utc::now();
        list.cards.remove(index);
        list.repack_card_orders();
        list.touch(now);
        board.touch(now);
        self.persist();
    }

    /// Empties the card sequence of the matching list.
    pub fn delete_all_cards(&mut self, list_id: &str) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let Some(list) = board.lists.iter_mut().find(|list| list.id == list_id) else {
            return;
        };
        let now = Utc::now();
        list.cards.clear();
        list.touch(now);
        board.touch(now);
        self.persist();
    }

    /// Moves a card to `to_index` within the target list.
    ///
    /// Remove-then-insert-then-re-pack: the card leaves the source list
    /// first, so `to_index` is interpreted in the post-removal sequence and
    /// same-list reordering is the degenerate case of the single code path.
    /// `to_index` past the end appends. No-op when the card, the source
    /// list, or the target list cannot be found.
    pub fn move_card(
        &mut self,
        card_id: &str,
        from_list_id: &str,
        to_list_id: &str,
        to_index: usize,
    ) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let Some(from_index) = board.lists.iter().position(|list| list.id == from_list_id)
        else {
            return;
        };
        let Some(to_list_index) = board.lists.iter().position(|list| list.id == to_list_id)
        else {
            return;
        };
        let Some(card_index) = board.lists[from_index]
            .cards
            .iter()
            .position(|card| card.id == card_id)
        else {
            return;
        };

        let now = Utc::now();
        let mut card = board.lists[from_index].cards.remove(card_index);
        card.list_id = to_list_id.to_string();
        card.touch(now);

        let target = &mut board.lists[to_list_index];
        let insert_at = to_index.min(target.cards.len());
        target.cards.insert(insert_at, card);
        target.repack_card_orders();
        target.touch(now);

        if from_index != to_list_index {
            let source = &mut board.lists[from_index];
            source.repack_card_orders();
            source.touch(now);
        }

        board.touch(now);
        self.persist();
    }

    /// Appends a comment to the card with the given id and returns the
    /// comment id.
    ///
    /// The owning list is located by scanning card sequences (ownership
    /// search); board sizes keep the linear scan cheap.
    pub fn add_comment(&mut self, card_id: &str, text: impl Into<String>) -> Option<EntityId> {
        let board = self.board.as_mut()?;
        let list = board
            .lists
            .iter_mut()
            .find(|list| list.cards.iter().any(|card| card.id == card_id))?;
        let card = list.cards.iter_mut().find(|card| card.id == card_id)?;

        let now = Utc::now();
        let comment = Comment::new(text, now);
        let id = comment.id.clone();
        card.comments.push(comment);
        card.touch(now);
        list.touch(now);
        board.touch(now);
        self.persist();
        Some(id)
    }

    /// Rewrites the text of the matching comment.
    pub fn rename_comment(&mut self, card_id: &str, comment_id: &str, text: impl Into<String>) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let Some(list) = board
            .lists
            .iter_mut()
            .find(|list| list.cards.iter().any(|card| card.id == card_id))
        else {
            return;
        };
        let Some(card) = list.cards.iter_mut().find(|card| card.id == card_id) else {
            return;
        };
        let Some(comment) = card
            .comments
            .iter_mut()
            .find(|comment| comment.id == comment_id)
        else {
            return;
        };
        let now = Utc::now();
        comment.text = text.into();
        comment.touch(now);
        card.touch(now);
        list.touch(now);
        board.touch(now);
        self.persist();
    }

    /// Removes the matching comment from its card.
    pub fn delete_comment(&mut self, card_id: &str, comment_id: &str) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let Some(list) = board
            .lists
            .iter_mut()
            .find(|list| list.cards.iter().any(|card| card.id == card_id))
        else {
            return;
        };
        let Some(card) = list.cards.iter_mut().find(|card| card.id == card_id) else {
            return;
        };
        let Some(index) = card
            .comments
            .iter()
            .position(|comment| comment.id == comment_id)
        else {
            return;
        };
        let now = Utc::now();
        card.comments.remove(index);
        card.touch(now);
        list.touch(now);
        board.touch(now);
        self.persist();
    }

    /// Writes the current snapshot best-effort.
    ///
    /// In-memory state stays authoritative when the write fails; the
    /// adapter logs the failure.
    fn persist(&self) {
        if let Some(board) = self.board.as_ref() {
            let _ = self.storage.save(board);
        }
    }
}
