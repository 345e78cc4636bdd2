//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`layout`]: Screen regions and mouse hit testing
//! - [`style`]: Theming and colors

pub mod layout;
pub mod style;

mod overlays;
mod render;
mod status;

pub use layout::{
    CHECKBOX_WIDTH, Control, NotesHit, ScreenLayout, control_at, notes_hit, notes_text_columns,
    notes_visible_rows, screen_layout, scroll_col_for_caret,
};
pub use render::{note_line, render};

#[cfg(test)]
mod tests;
