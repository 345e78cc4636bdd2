//! Screen geometry shared by rendering and mouse hit testing.
//!
//! The panel is a stack of rows: toolbar, timer row, the bordered notes
//! pane, an optional toast row and the status bar.

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{Focus, Model};
use crate::notes::{Format, Line};

/// Columns taken by a checkbox prefix (`[x] `).
pub const CHECKBOX_WIDTH: u16 = 4;
/// Columns of the prefix that toggle the checkbox when clicked.
const CHECKBOX_HIT_WIDTH: u16 = 3;
/// Minimum inner width of the duration field.
const DURATION_FIELD_WIDTH: usize = 8;

/// A clickable panel control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Checklist,
    Format(Format),
    FontSize,
    ClearAll,
    Help,
    Duration,
    PlayPause,
    Mute,
}

pub const TOOLBAR_CONTROLS: [Control; 8] = [
    Control::Checklist,
    Control::Format(Format::Bold),
    Control::Format(Format::Italic),
    Control::Format(Format::Underline),
    Control::Format(Format::Highlight),
    Control::FontSize,
    Control::ClearAll,
    Control::Help,
];

pub const TIMER_CONTROLS: [Control; 3] = [Control::Duration, Control::PlayPause, Control::Mute];

/// Where each screen region sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub toolbar: Rect,
    pub timer: Rect,
    pub notes: Rect,
    pub toast: Option<Rect>,
    pub status: Rect,
}

pub fn screen_layout(area: Rect, toast_active: bool) -> ScreenLayout {
    let row = |offset: u16| Rect {
        y: area.y + offset.min(area.height.saturating_sub(1)),
        height: area.height.min(1),
        ..area
    };
    let footer_rows = 1 + u16::from(toast_active);
    let notes_top = 2.min(area.height);
    let notes_height = area.height.saturating_sub(notes_top + footer_rows);
    ScreenLayout {
        toolbar: row(0),
        timer: row(1),
        notes: Rect {
            y: area.y + notes_top,
            height: notes_height,
            ..area
        },
        toast: toast_active.then(|| row(area.height.saturating_sub(2))),
        status: row(area.height.saturating_sub(1)),
    }
}

pub fn model_layout(model: &Model) -> ScreenLayout {
    screen_layout(
        Rect::new(0, 0, model.width, model.height),
        model.active_toast().is_some(),
    )
}

/// Text area of the notes pane (inside its border).
pub const fn notes_inner(notes: Rect) -> Rect {
    Rect {
        x: notes.x.saturating_add(1),
        y: notes.y.saturating_add(1),
        width: notes.width.saturating_sub(2),
        height: notes.height.saturating_sub(2),
    }
}

/// Number of document lines visible at once.
pub fn notes_visible_rows(width: u16, height: u16, toast_active: bool) -> usize {
    let layout = screen_layout(Rect::new(0, 0, width, height), toast_active);
    usize::from(notes_inner(layout.notes).height)
}

/// Text columns available to `line` in the notes pane, after its checkbox.
pub fn notes_text_columns(width: u16, height: u16, toast_active: bool, line: &Line) -> usize {
    let layout = screen_layout(Rect::new(0, 0, width, height), toast_active);
    let inner = notes_inner(layout.notes).width;
    let prefix = if line.has_checkbox() { CHECKBOX_WIDTH } else { 0 };
    usize::from(inner.saturating_sub(prefix))
}

/// Display column where the char at `offset` starts.
pub fn column_of_offset(line: &Line, offset: usize) -> usize {
    line.chars()
        .iter()
        .take(offset)
        .map(|styled| styled.ch.width().unwrap_or(0))
        .sum()
}

/// Horizontal scroll that keeps the caret cell inside `text_cols` columns.
///
/// The view only moves when the caret would leave it.
pub fn scroll_col_for_caret(
    line: &Line,
    offset: usize,
    scroll_col: usize,
    text_cols: usize,
) -> usize {
    if text_cols == 0 {
        return 0;
    }
    let caret_col = column_of_offset(line, offset);
    let caret_width = line
        .chars()
        .get(offset)
        .and_then(|styled| styled.ch.width())
        .unwrap_or(1)
        .max(1);
    if caret_col < scroll_col {
        caret_col
    } else if caret_col + caret_width > scroll_col + text_cols {
        (caret_col + caret_width).saturating_sub(text_cols)
    } else {
        scroll_col
    }
}

/// Label drawn inside a control button.
pub fn control_label(model: &Model, control: Control) -> String {
    match control {
        Control::Checklist => model.notes.checklist_label().to_string(),
        Control::Format(Format::Bold) => "B".to_string(),
        Control::Format(Format::Italic) => "I".to_string(),
        Control::Format(Format::Underline) => "U".to_string(),
        Control::Format(Format::Highlight) => "H".to_string(),
        Control::FontSize => "Size".to_string(),
        Control::ClearAll => "Clear".to_string(),
        Control::Help => "?".to_string(),
        Control::Duration => {
            let text = model.duration_text();
            let cursor = if model.focus == Focus::Duration && !model.timer.is_running() {
                "_"
            } else {
                ""
            };
            format!("{:<DURATION_FIELD_WIDTH$}", format!("{text}{cursor}"))
        }
        Control::PlayPause => model.timer.play_glyph().to_string(),
        Control::Mute => model.timer.mute_glyph().to_string(),
    }
}

/// Lay controls out left to right in `row`, one padded button each.
pub fn control_rects(model: &Model, row: Rect, controls: &[Control]) -> Vec<(Control, Rect)> {
    let right = row.x.saturating_add(row.width);
    let mut x = row.x.saturating_add(1);
    let mut rects = Vec::with_capacity(controls.len());
    for &control in controls {
        let width = u16::try_from(control_label(model, control).width() + 2).unwrap_or(u16::MAX);
        if x >= right {
            break;
        }
        let width = width.min(right - x);
        rects.push((control, Rect::new(x, row.y, width, row.height)));
        x = x.saturating_add(width).saturating_add(1);
    }
    rects
}

/// The control under a screen cell, if any.
pub fn control_at(model: &Model, column: u16, row: u16) -> Option<Control> {
    let layout = model_layout(model);
    control_rects(model, layout.toolbar, &TOOLBAR_CONTROLS)
        .into_iter()
        .chain(control_rects(model, layout.timer, &TIMER_CONTROLS))
        .find(|(_, rect)| point_in_rect(column, row, *rect))
        .map(|(control, _)| control)
}

/// What a click on the notes pane landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesHit {
    Checkbox(usize),
    Text { line: usize, offset: usize },
}

/// Resolve a screen cell inside the notes pane to a line and caret offset.
///
/// Rows below the last line resolve past the end of the document; the
/// editor clamps that to the end of the last line.
pub fn notes_hit(model: &Model, column: u16, row: u16) -> Option<NotesHit> {
    let inner = notes_inner(model_layout(model).notes);
    if !point_in_rect(column, row, inner) {
        return None;
    }
    let line_idx = model.notes_scroll_offset + usize::from(row - inner.y);
    let col = column - inner.x;
    let Some(line) = model.notes.document().line(line_idx) else {
        return Some(NotesHit::Text {
            line: line_idx,
            offset: usize::MAX,
        });
    };
    let text_col = if line.has_checkbox() {
        if col < CHECKBOX_HIT_WIDTH {
            return Some(NotesHit::Checkbox(line_idx));
        }
        col.saturating_sub(CHECKBOX_WIDTH)
    } else {
        col
    };
    Some(NotesHit::Text {
        line: line_idx,
        offset: offset_for_column(line, usize::from(text_col) + model.notes_scroll_col),
    })
}

/// Caret offset for a display column within a line's text.
pub fn offset_for_column(line: &Line, column: usize) -> usize {
    let mut used = 0;
    for (offset, styled) in line.chars().iter().enumerate() {
        used += styled.ch.width().unwrap_or(0);
        if used > column {
            return offset;
        }
    }
    line.len()
}

const fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
