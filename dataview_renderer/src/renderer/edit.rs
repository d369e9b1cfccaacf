// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-place editing.
//!
//! At most one cell is edited at a time. Starting a new edition first
//! resolves the running one: it is committed if its editor can finish,
//! cancelled otherwise, and announced with
//! [`EditingEnded`](Notification::EditingEnded) marked `forced`.

use dataview_model::{DataModel, ItemFlags, ItemId, traverse};
use dataview_state::StateModel;
use kurbo::Rect;

use super::TreeModelRenderer;
use crate::cell::CellEditor;
use crate::notify::Notification;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ActiveEdit {
    pub(crate) item: ItemId,
    pub(crate) column: usize,
}

/// Why an edition could not start.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// No model is attached.
    #[error("no model is attached")]
    NoModel,
    /// The column index is out of range.
    #[error("column {0} does not exist")]
    UnknownColumn(usize),
    /// The column is hidden.
    #[error("column {0} is hidden")]
    HiddenColumn(usize),
    /// The column has no editor or the field is not editable for this item.
    #[error("the cell is not editable")]
    NotEditable,
    /// The item is disabled.
    #[error("the item is disabled")]
    Disabled,
    /// The item is not shown.
    #[error("the item is not shown")]
    NotShown,
    /// A listener vetoed the edition.
    #[error("a listener vetoed the edition")]
    Vetoed,
    /// The editor refused to start.
    #[error("the editor refused to start")]
    EditorRefused,
}

impl<M, S> TreeModelRenderer<M, S>
where
    M: DataModel,
    S: StateModel,
{
    /// Starts editing the cell of `id` in `column`.
    ///
    /// Returns `false` if the edition cannot start; see
    /// [`try_start_edition`](Self::try_start_edition) for the reason.
    pub fn start_edition(&mut self, id: &ItemId, column: usize) -> bool {
        match self.try_start_edition(id, column) {
            Ok(()) => true,
            Err(error) => {
                tracing::debug!(target: "dataview_renderer::edit", ?id, column, %error, "edition not started");
                false
            }
        }
    }

    /// Starts editing the cell of `id` in `column`, reporting why it could
    /// not start.
    pub fn try_start_edition(&mut self, id: &ItemId, column: usize) -> Result<(), EditError> {
        let model = self.model.as_ref().ok_or(EditError::NoModel)?;
        let col = self
            .columns
            .get(column)
            .ok_or(EditError::UnknownColumn(column))?;
        if col.hidden {
            return Err(EditError::HiddenColumn(column));
        }
        let field = col.field;
        if col.editor.is_none() || !model.item_flags(id, field).contains(ItemFlags::EDITABLE) {
            return Err(EditError::NotEditable);
        }
        if !traverse::is_reachable(model, &self.state, id)
            || (id.is_root() && self.config.hidden_ranks() > 0)
        {
            return Err(EditError::NotShown);
        }
        if !self.state.is_enabled(id) {
            return Err(EditError::Disabled);
        }

        if self.edit.is_some() {
            self.end_edition(false, true);
        }
        if !self.listeners.send(&Notification::EditingStarting {
            item: *id,
            column,
        }) {
            return Err(EditError::Vetoed);
        }
        let rect = self.item_rect(id, column).unwrap_or(Rect::ZERO);
        let value = self
            .model
            .as_ref()
            .map(|m| m.value(id, field))
            .unwrap_or_default();
        let started = self
            .columns
            .get_mut(column)
            .and_then(|c| c.editor.as_mut())
            .is_some_and(|editor| editor.start_editing(id, field, &value, rect));
        if !started {
            return Err(EditError::EditorRefused);
        }
        self.edit = Some(ActiveEdit { item: *id, column });
        tracing::debug!(target: "dataview_renderer::edit", ?id, column, "edition started");
        self.listeners.send(&Notification::EditingStarted {
            item: *id,
            column,
        });
        Ok(())
    }

    /// Ends the running edition.
    ///
    /// With `cancel` the model is left untouched. Otherwise the editor must
    /// be able to finish and the new value passes a vetoable
    /// [`ValueChanging`](Notification::ValueChanging) before it is written.
    /// Returns `false` if nothing was being edited, or if the commit was
    /// refused; the edition then keeps running.
    pub fn finish_edition(&mut self, cancel: bool) -> bool {
        self.end_edition(cancel, false)
    }

    /// The item and column being edited.
    pub fn editing(&self) -> Option<(ItemId, usize)> {
        self.edit.map(|e| (e.item, e.column))
    }

    /// The editor of the running edition.
    pub fn active_editor(&mut self) -> Option<&mut (dyn CellEditor + 'static)> {
        let edit = self.edit?;
        self.columns.get_mut(edit.column)?.editor.as_deref_mut()
    }

    /// Ends the running edition. A forced end never leaves it running: a
    /// refused commit becomes a cancel.
    pub(crate) fn end_edition(&mut self, cancel: bool, forced: bool) -> bool {
        let Some(ActiveEdit { item, column }) = self.edit else {
            return false;
        };
        let Some(col) = self.columns.get_mut(column) else {
            self.edit = None;
            return false;
        };
        let field = col.field;
        let Some(editor) = col.editor.as_mut() else {
            self.edit = None;
            return false;
        };

        let mut committed = false;
        if !cancel {
            let value = editor.value();
            let accepted = editor.can_finish()
                && self.listeners.send(&Notification::ValueChanging {
                    item,
                    field,
                    value: &value,
                });
            if accepted {
                committed = self
                    .model
                    .as_mut()
                    .is_some_and(|m| m.set_value(&item, field, value));
                if committed {
                    self.listeners
                        .send(&Notification::ValueChanged { item, field });
                }
            } else if !forced {
                tracing::debug!(target: "dataview_renderer::edit", ?item, column, "commit refused");
                return false;
            }
        }

        if let Some(editor) = self.columns.get_mut(column).and_then(|c| c.editor.as_mut()) {
            editor.finish();
        }
        self.edit = None;
        tracing::debug!(
            target: "dataview_renderer::edit",
            ?item,
            column,
            committed,
            forced,
            "edition ended"
        );
        self.listeners.send(&Notification::EditingEnded {
            item,
            column,
            cancelled: !committed,
            forced,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::TextEditor;
    use crate::column::Column;
    use crate::config::RendererConfig;
    use crate::notify::Response;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use dataview_model::{HierarchyProvider, TreeStore, Value};
    use kurbo::Size;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn editable() -> (TreeModelRenderer<TreeStore>, [ItemId; 2], Log) {
        let mut store = TreeStore::new(1).with_default_flags(
            ItemFlags::SELECTABLE | ItemFlags::ENABLED | ItemFlags::EDITABLE,
        );
        let root = store.root_item();
        let a = store.append(&root, [Value::from("a")].into());
        let b = store.append(&root, [Value::from("b")].into());
        let mut renderer = TreeModelRenderer::new(RendererConfig::default());
        renderer
            .columns_mut()
            .push(Column::new("Name", 0, 100.0).with_editor(TextEditor::non_empty()));
        renderer.columns_mut().push(Column::new("Plain", 0, 100.0));
        renderer.set_model(store);
        renderer.set_size(Size::new(300.0, 100.0));
        let log = Log::default();
        let sink = log.clone();
        renderer.add_listener(move |n| {
            let name = match n {
                Notification::EditingStarting { .. } => "starting",
                Notification::EditingStarted { .. } => "started",
                Notification::ValueChanging { .. } => "changing",
                Notification::ValueChanged { .. } => "changed",
                Notification::EditingEnded { forced: true, .. } => "ended-forced",
                Notification::EditingEnded { .. } => "ended",
                _ => return Response::Allow,
            };
            sink.borrow_mut().push(name);
            Response::Allow
        });
        (renderer, [a, b], log)
    }

    fn set_text(renderer: &mut TreeModelRenderer<TreeStore>, text: &str) {
        let editor = renderer.active_editor().unwrap();
        assert!(editor.set_value(Value::from(text)));
    }

    #[test]
    fn commit_writes_the_model() {
        let (mut renderer, [a, _], log) = editable();
        assert!(renderer.start_edition(&a, 0));
        assert_eq!(renderer.editing(), Some((a, 0)));
        set_text(&mut renderer, "renamed");
        assert!(renderer.finish_edition(false));
        assert_eq!(renderer.model().unwrap().value(&a, 0), Value::from("renamed"));
        assert_eq!(*log.borrow(), ["starting", "started", "changing", "changed", "ended"]);
        assert!(!renderer.finish_edition(false));
    }

    #[test]
    fn cancel_and_refusal() {
        let (mut renderer, [a, _], _) = editable();
        assert!(renderer.start_edition(&a, 0));
        set_text(&mut renderer, "");
        // The editor refuses empty text; the edition keeps running.
        assert!(!renderer.finish_edition(false));
        assert!(renderer.editing().is_some());
        assert!(renderer.finish_edition(true));
        assert_eq!(renderer.model().unwrap().value(&a, 0), Value::from("a"));
    }

    #[test]
    fn new_edition_forces_the_old_one() {
        let (mut renderer, [a, b], log) = editable();
        assert!(renderer.start_edition(&a, 0));
        set_text(&mut renderer, "first");
        assert!(renderer.start_edition(&b, 0));
        assert_eq!(renderer.editing(), Some((b, 0)));
        assert_eq!(renderer.model().unwrap().value(&a, 0), Value::from("first"));
        assert_eq!(
            *log.borrow(),
            ["starting", "started", "changing", "changed", "ended-forced", "starting", "started"]
        );
    }

    #[test]
    fn collapsing_cancels_a_hidden_edition() {
        let (mut renderer, [a, _], log) = editable();
        let child = renderer
            .model_mut()
            .map(|m| m.append(&a, [Value::from("child")].into()))
            .unwrap();
        renderer.on_data_model_changed();
        assert!(renderer.expand(&a));
        assert!(renderer.start_edition(&child, 0));
        assert!(renderer.collapse(&a));
        assert_eq!(renderer.editing(), None);
        assert_eq!(log.borrow().last(), Some(&"ended-forced"));
    }

    #[test]
    fn reasons() {
        let (mut renderer, [a, _], _) = editable();
        assert_eq!(renderer.try_start_edition(&a, 1), Err(EditError::NotEditable));
        assert_eq!(renderer.try_start_edition(&a, 7), Err(EditError::UnknownColumn(7)));
        renderer.state_mut().enable(&a, false);
        assert_eq!(renderer.try_start_edition(&a, 0), Err(EditError::Disabled));
        renderer.add_listener(|n| match n {
            Notification::EditingStarting { .. } => Response::Veto,
            _ => Response::Allow,
        });
        renderer.state_mut().enable(&a, true);
        assert_eq!(renderer.try_start_edition(&a, 0), Err(EditError::Vetoed));
        let mut empty: TreeModelRenderer<TreeStore> = TreeModelRenderer::new(RendererConfig::default());
        assert_eq!(empty.try_start_edition(&a, 0), Err(EditError::NoModel));
    }
}
