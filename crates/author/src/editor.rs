use std::sync::Arc;

use glam::Vec2;
use plumbfield_common::ObjectId;
use plumbfield_content::{
    ContentError, ContentFactory, EditorObject, LevelDocument, LevelHeader, RuntimeInstantiator,
    WorldObjectDescriptor,
};

/// An editing command that can be applied to the session and reversed.
///
/// Each command carries enough context to undo itself.
#[derive(Debug, Clone)]
pub enum EditCommand {
    /// Place an object at `index`. Undo = remove it.
    Insert { index: usize, object: EditorObject },
    /// Remove the object at `index`. Undo = put it back.
    Remove { index: usize, object: EditorObject },
    /// Swap the descriptor behind an object. Undo = swap the old one back.
    Replace {
        id: ObjectId,
        old: Arc<WorldObjectDescriptor>,
        new: Arc<WorldObjectDescriptor>,
    },
    /// Move an object within the draw order.
    Reorder { id: ObjectId, from: usize, to: usize },
}

impl EditCommand {
    /// Produce the inverse command (for undo).
    pub fn inverse(&self) -> Self {
        match self {
            Self::Insert { index, object } => Self::Remove {
                index: *index,
                object: object.clone(),
            },
            Self::Remove { index, object } => Self::Insert {
                index: *index,
                object: object.clone(),
            },
            Self::Replace { id, old, new } => Self::Replace {
                id: *id,
                old: Arc::clone(new),
                new: Arc::clone(old),
            },
            Self::Reorder { id, from, to } => Self::Reorder {
                id: *id,
                from: *to,
                to: *from,
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("object {0:?} not found")]
    ObjectNotFound(ObjectId),
    #[error("index {index} is out of range for {len} objects")]
    IndexOutOfRange { index: usize, len: usize },
}

/// An open level in the editor.
///
/// Objects are kept in draw order. Every edit goes through the undo stack.
pub struct EditorSession {
    header: LevelHeader,
    objects: Vec<EditorObject>,
    instantiator: RuntimeInstantiator,
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
}

impl EditorSession {
    /// Open a document with the default placement context.
    pub fn open(document: &LevelDocument) -> Self {
        Self::with_instantiator(document, RuntimeInstantiator::default())
    }

    pub fn with_instantiator(document: &LevelDocument, instantiator: RuntimeInstantiator) -> Self {
        let objects = instantiator.editor_objects(document);
        tracing::debug!(level = %document.header.id, objects = objects.len(), "editor opened");
        Self {
            header: document.header.clone(),
            objects,
            instantiator,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Level header, carried through unchanged.
    pub fn header(&self) -> &LevelHeader {
        &self.header
    }

    /// Objects in document order.
    pub fn objects(&self) -> &[EditorObject] {
        &self.objects
    }

    /// Number of objects in the level.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the level has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Look up an object by id.
    pub fn get(&self, id: ObjectId) -> Option<&EditorObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    fn index_of(&self, id: ObjectId) -> Result<usize, EditError> {
        self.objects
            .iter()
            .position(|o| o.id() == id)
            .ok_or(EditError::ObjectNotFound(id))
    }

    fn record(&mut self, cmd: EditCommand) {
        apply_command(&mut self.objects, &cmd);
        self.undo_stack.push(cmd);
        self.redo_stack.clear();
    }

    /// Place a new object on top of everything else.
    pub fn insert(&mut self, descriptor: impl Into<WorldObjectDescriptor>) -> ObjectId {
        let index = self.objects.len();
        let object = self.instantiator.to_editor(&Arc::new(descriptor.into()));
        let id = object.id();
        tracing::debug!(?id, tag = object.descriptor().tag(), "insert");
        self.record(EditCommand::Insert { index, object });
        id
    }

    /// Place a new object at a draw-order position.
    pub fn insert_at(
        &mut self,
        index: usize,
        descriptor: impl Into<WorldObjectDescriptor>,
    ) -> Result<ObjectId, EditError> {
        if index > self.objects.len() {
            return Err(EditError::IndexOutOfRange {
                index,
                len: self.objects.len(),
            });
        }
        let object = self.instantiator.to_editor(&Arc::new(descriptor.into()));
        let id = object.id();
        self.record(EditCommand::Insert { index, object });
        Ok(id)
    }

    /// Remove an object. Undo puts it back at the same index.
    pub fn remove(&mut self, id: ObjectId) -> Result<(), EditError> {
        let index = self.index_of(id)?;
        let object = self.objects[index].clone();
        tracing::debug!(?id, index, "remove");
        self.record(EditCommand::Remove { index, object });
        Ok(())
    }

    /// Swap in a replacement descriptor, keeping the object's identity.
    pub fn replace(
        &mut self,
        id: ObjectId,
        descriptor: impl Into<WorldObjectDescriptor>,
    ) -> Result<(), EditError> {
        let index = self.index_of(id)?;
        let old = Arc::clone(self.objects[index].descriptor());
        self.record(EditCommand::Replace {
            id,
            old,
            new: Arc::new(descriptor.into()),
        });
        Ok(())
    }

    /// Move an object. Recorded as a replace.
    pub fn move_to(&mut self, id: ObjectId, pos: Vec2) -> Result<(), EditError> {
        let index = self.index_of(id)?;
        let moved = self.objects[index].descriptor().with_position(pos);
        self.replace(id, moved)
    }

    /// Move an object to a new draw-order position.
    pub fn reorder(&mut self, id: ObjectId, to: usize) -> Result<(), EditError> {
        let from = self.index_of(id)?;
        if to >= self.objects.len() {
            return Err(EditError::IndexOutOfRange {
                index: to,
                len: self.objects.len(),
            });
        }
        if from != to {
            self.record(EditCommand::Reorder { id, from, to });
        }
        Ok(())
    }

    /// The topmost object under `point`.
    pub fn pick(&self, point: Vec2) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|o| o.bounds().contains(point))
            .map(EditorObject::id)
    }

    /// Undo the last edit. Returns true if an operation was undone.
    pub fn undo(&mut self) -> bool {
        let Some(cmd) = self.undo_stack.pop() else {
            return false;
        };
        apply_command(&mut self.objects, &cmd.inverse());
        self.redo_stack.push(cmd);
        true
    }

    /// Redo the last undone edit. Returns true if an operation was redone.
    pub fn redo(&mut self) -> bool {
        let Some(cmd) = self.redo_stack.pop() else {
            return false;
        };
        apply_command(&mut self.objects, &cmd);
        self.undo_stack.push(cmd);
        true
    }

    /// Number of operations on the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of operations on the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Returns true if there is an operation to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there is an operation to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The level as currently edited. Descriptors are shared, not copied.
    pub fn to_document(&self) -> LevelDocument {
        LevelDocument {
            header: self.header.clone(),
            objects: self
                .objects
                .iter()
                .map(|o| Arc::clone(o.descriptor()))
                .collect(),
        }
    }

    /// Write the edited level as a document.
    pub fn serialize(&self, factory: &ContentFactory) -> Result<String, ContentError> {
        factory.serialize(&self.to_document())
    }
}

// Commands on the stacks were valid when recorded, and undo/redo replay them
// in strict reverse order, so indices and ids always resolve.
fn apply_command(objects: &mut Vec<EditorObject>, cmd: &EditCommand) {
    match cmd {
        EditCommand::Insert { index, object } => {
            objects.insert(*index, object.clone());
        }
        EditCommand::Remove { index, .. } => {
            objects.remove(*index);
        }
        EditCommand::Replace { id, new, .. } => {
            if let Some(slot) = objects.iter_mut().find(|o| o.id() == *id) {
                *slot = slot.rebased(Arc::clone(new));
            }
        }
        EditCommand::Reorder { from, to, .. } => {
            let object = objects.remove(*from);
            objects.insert(*to, object);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plumbfield_common::{Color, Size};
    use plumbfield_content::{Direction, EditorMarker, Entrance, Exit, SolidColorBackground};

    fn level() -> LevelDocument {
        let mut doc = LevelDocument::new(LevelHeader::new("edit", Size::new(320, 200), 4, 2));
        doc.push(SolidColorBackground::new(Vec2::ZERO, Color::BLACK));
        doc.push(Entrance::new(Vec2::new(40.0, 100.0), Direction::Right, 30, 0));
        doc
    }

    #[test]
    fn insert_and_undo() {
        let mut editor = EditorSession::open(&level());
        let id = editor.insert(EditorMarker::new(Vec2::new(5.0, 5.0), "here"));
        assert_eq!(editor.len(), 3);
        assert!(editor.get(id).is_some());

        assert!(editor.undo());
        assert_eq!(editor.len(), 2);
        assert!(editor.get(id).is_none());
    }

    #[test]
    fn insert_undo_redo() {
        let mut editor = EditorSession::open(&level());
        let id = editor.insert(Exit::new(Vec2::new(300.0, 100.0), Exit::DEFAULT_SIZE, 0));
        editor.undo();
        editor.redo();
        assert_eq!(editor.len(), 3);
        assert_eq!(editor.objects()[2].id(), id);
    }

    #[test]
    fn remove_and_undo_restores_position_in_order() {
        let mut editor = EditorSession::open(&level());
        let first = editor.objects()[0].id();
        editor.remove(first).unwrap();
        assert_eq!(editor.len(), 1);

        editor.undo();
        assert_eq!(editor.objects()[0].id(), first);
    }

    #[test]
    fn move_swaps_descriptor_and_undo_restores_it() {
        let doc = level();
        let mut editor = EditorSession::open(&doc);
        let id = editor.objects()[1].id();

        editor.move_to(id, Vec2::new(60.0, 90.0)).unwrap();
        assert_eq!(editor.get(id).unwrap().pos(), Vec2::new(60.0, 90.0));
        // the loaded document is untouched
        assert_eq!(doc.objects[1].position(), Vec2::new(40.0, 100.0));

        editor.undo();
        let restored = editor.get(id).unwrap();
        assert!(Arc::ptr_eq(restored.descriptor(), &doc.objects[1]));
    }

    #[test]
    fn reorder_and_undo() {
        let mut editor = EditorSession::open(&level());
        let bg = editor.objects()[0].id();
        editor.reorder(bg, 1).unwrap();
        assert_eq!(editor.objects()[1].id(), bg);
        editor.undo();
        assert_eq!(editor.objects()[0].id(), bg);
        assert!(editor.reorder(bg, 2).is_err());
    }

    #[test]
    fn redo_cleared_on_new_edit() {
        let mut editor = EditorSession::open(&level());
        editor.insert(EditorMarker::new(Vec2::ZERO, ""));
        editor.undo();
        assert!(editor.can_redo());

        editor.insert(EditorMarker::new(Vec2::ZERO, ""));
        assert!(!editor.can_redo());
        assert_eq!(editor.undo_count(), 1);
    }

    #[test]
    fn undo_redo_empty_return_false() {
        let mut editor = EditorSession::open(&level());
        assert!(!editor.undo());
        assert!(!editor.redo());
        assert_eq!(editor.redo_count(), 0);
    }

    #[test]
    fn missing_object_is_an_error() {
        let mut editor = EditorSession::open(&level());
        let fake = ObjectId::new();
        assert!(matches!(
            editor.remove(fake),
            Err(EditError::ObjectNotFound(id)) if id == fake
        ));
        assert!(editor.move_to(fake, Vec2::ZERO).is_err());
        assert!(editor.insert_at(9, EditorMarker::new(Vec2::ZERO, "")).is_err());
        assert!(!editor.can_undo());
    }

    #[test]
    fn pick_prefers_topmost() {
        let mut editor = EditorSession::open(&level());
        let top = editor.insert(EditorMarker::new(Vec2::new(2.0, 2.0), "x"));
        assert_eq!(editor.pick(Vec2::new(4.0, 4.0)), Some(top));
        assert_eq!(
            editor.pick(Vec2::new(20.0, 20.0)),
            Some(editor.objects()[0].id())
        );
        assert_eq!(editor.pick(Vec2::new(-5.0, -5.0)), None);
    }

    #[test]
    fn serialized_session_reflects_edits() {
        let factory = ContentFactory::new();
        let mut editor = EditorSession::open(&level());
        let id = editor.objects()[1].id();
        editor.move_to(id, Vec2::new(10.0, 20.0)).unwrap();
        editor.insert(EditorMarker::new(Vec2::new(1.0, 1.0), "note"));

        let text = editor.serialize(&factory).unwrap();
        let report = factory.parse(&text).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.document, editor.to_document());
        assert_eq!(report.document.objects[1].position(), Vec2::new(10.0, 20.0));
        assert_eq!(report.document.count_of("editor-marker"), 1);
    }
}
