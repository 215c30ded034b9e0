use crate::id_generator::ShapeId;
use crate::shape::ShapeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedShape {
    pub id: ShapeId,
    pub kind: ShapeKind,
}

/// At most one selected shape
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<SelectedShape>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<SelectedShape> {
        self.selected
    }

    pub fn id(&self) -> Option<ShapeId> {
        self.selected.map(|s| s.id)
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.id() == Some(id)
    }

    pub fn set(&mut self, selected: SelectedShape) {
        self.selected = Some(selected);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Clears the selection if it points at `id`. Returns whether it did.
    pub fn forget(&mut self, id: ShapeId) -> bool {
        if self.is_selected(id) {
            self.selected = None;
            true
        } else {
            false
        }
    }
}
