//! Linear undo history.
//!
//! The original editor declares an `Action`/`Undo` record pair (a flat ring
//! of actions plus head/tail/index counters) but never wires a commit or
//! revert path to it. This keeps the same shape — one record per edit,
//! pushed unconditionally — without inventing a merge/coalescing policy for
//! consecutive insertions; that decision is explicitly left open upstream.

use crate::FileId;

/// Whether an [`EditAction`] inserted or removed bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Delete,
}

/// One undoable edit: enough to reconstruct or reverse it against the file
/// it touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditAction {
    pub kind: EditKind,
    pub file: FileId,
    pub x: i32,
    pub y: i32,
    pub data: Vec<u8>,
}

impl EditAction {
    pub fn insert(file: FileId, x: i32, y: i32, data: Vec<u8>) -> Self {
        EditAction {
            kind: EditKind::Insert,
            file,
            x,
            y,
            data,
        }
    }

    pub fn delete(file: FileId, x: i32, y: i32, data: Vec<u8>) -> Self {
        EditAction {
            kind: EditKind::Delete,
            file,
            x,
            y,
            data,
        }
    }

    /// The inverse of this action, i.e. what undoing it amounts to.
    pub fn inverse(&self) -> EditAction {
        EditAction {
            kind: match self.kind {
                EditKind::Insert => EditKind::Delete,
                EditKind::Delete => EditKind::Insert,
            },
            file: self.file,
            x: self.x,
            y: self.y,
            data: self.data.clone(),
        }
    }
}

/// A linear, non-coalescing undo/redo stack.
///
/// Every edit is pushed as its own record; [`push`](UndoEngine::push)
/// unconditionally clears the redo stack, matching the usual editor
/// convention that a fresh edit invalidates whatever was undone before it.
#[derive(Debug, Default)]
pub struct UndoEngine {
    history: Vec<EditAction>,
    redo: Vec<EditAction>,
}

impl UndoEngine {
    pub fn new() -> Self {
        UndoEngine::default()
    }

    pub fn push(&mut self, action: EditAction) {
        tracing::trace!(?action, "undo: push");
        self.history.push(action);
        self.redo.clear();
    }

    /// Pops the most recent action and returns its inverse, pushing the
    /// original onto the redo stack.
    pub fn undo(&mut self) -> Option<EditAction> {
        let action = self.history.pop()?;
        let inverse = action.inverse();
        self.redo.push(action);
        Some(inverse)
    }

    /// Pops the most recently undone action and re-applies it.
    pub fn redo(&mut self) -> Option<EditAction> {
        let action = self.redo.pop()?;
        self.history.push(action.clone());
        Some(action)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_returns_inverse_and_enables_redo() {
        let mut engine = UndoEngine::new();
        engine.push(EditAction::insert(FileId(0), 3, 1, b"hi".to_vec()));
        assert!(engine.can_undo());
        let undone = engine.undo().unwrap();
        assert_eq!(undone.kind, EditKind::Delete);
        assert!(engine.can_redo());
        assert!(!engine.can_undo());
    }

    #[test]
    fn push_after_undo_clears_redo() {
        let mut engine = UndoEngine::new();
        engine.push(EditAction::insert(FileId(0), 0, 0, b"a".to_vec()));
        engine.undo();
        assert!(engine.can_redo());
        engine.push(EditAction::insert(FileId(0), 0, 0, b"b".to_vec()));
        assert!(!engine.can_redo());
    }

    #[test]
    fn redo_replays_original_action() {
        let mut engine = UndoEngine::new();
        let action = EditAction::delete(FileId(1), 2, 2, b"xy".to_vec());
        engine.push(action.clone());
        engine.undo();
        let redone = engine.redo().unwrap();
        assert_eq!(redone, action);
    }
}
