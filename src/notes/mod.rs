//! Checklist-aware line editor.
//!
//! The note is an ordered list of lines. Each line owns its characters and
//! their inline styles, plus an optional checkbox fixed at creation time.
//! Enter always appends a new line; backspace at the start of a checklist
//! line removes the line instead of deleting text.

mod caret;
mod document;
mod editor;

pub use caret::{Caret, Direction, Selection};
pub use document::{Document, Format, Line, Run, StyledChar, TextStyle};
pub use editor::{BackspaceOutcome, CHECKLIST_ACTIVE_LABEL, CHECKLIST_LABEL, NoteEditor};
