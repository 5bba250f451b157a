// src/edit.rs
use thiserror::Error;

use crate::sync::SyncError;

#[derive(Error, Debug)]
pub enum EditError {
    #[error("Not in edit mode. Toggle editing on before changing fields.")]
    NotEditing,
    #[error("No row at index {0}")]
    NoSuchRow(usize),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Read-only / editable switch for one feature. Edits are applied live, so
/// leaving edit mode commits nothing and discards nothing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EditMode {
    editing: bool,
}

impl EditMode {
    pub const fn is_editing(self) -> bool {
        self.editing
    }

    /// Flips the mode and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.editing = !self.editing;
        self.editing
    }

    /// Caption of the toggle control.
    pub const fn toggle_label(self) -> &'static str {
        if self.editing {
            "Save"
        } else {
            "Edit"
        }
    }

    /// # Errors
    /// Returns `EditError::NotEditing` while read-only.
    pub fn ensure_editing(self) -> Result<(), EditError> {
        if self.editing {
            Ok(())
        } else {
            Err(EditError::NotEditing)
        }
    }
}
