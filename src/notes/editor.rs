use std::ops::Range;

use serde_json::Value;
use tracing::{debug, warn};

use crate::store::{KeyValueStore, NOTES_CONTENT};

use super::{Caret, Direction, Document, Format, Line, Selection, TextStyle};

/// Checklist control label while checklist mode is off.
pub const CHECKLIST_LABEL: &str = "Checklist";
/// Checklist control label while checklist mode is on.
pub const CHECKLIST_ACTIVE_LABEL: &str = "Checklist ✓";

/// Result of the checklist-aware backspace handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackspaceOutcome {
    /// The handler removed a checklist line; default deletion must not run.
    Handled,
    /// The handler did nothing; default deletion applies.
    Default,
}

/// Line-based note editor.
///
/// Owns the [`Document`], the caret and the session-only checklist flag.
/// Every mutating operation writes the document snapshot to the store it is
/// handed; malformed caret state turns an operation into a silent no-op.
#[derive(Debug, Clone, Default)]
pub struct NoteEditor {
    document: Document,
    caret: Option<Caret>,
    anchor: Option<Caret>,
    checklist_mode: bool,
    typing_style: TextStyle,
}

impl NoteEditor {
    /// An editor with an empty document and no caret.
    pub fn new() -> Self {
        Self::default()
    }

    /// An editor over `document` with the caret at the end of its last line.
    pub fn with_document(document: Document) -> Self {
        let caret = document
            .lines()
            .len()
            .checked_sub(1)
            .map(|last| Caret::at(last, document.line(last).map_or(0, Line::len)));
        let mut editor = Self {
            document,
            caret,
            ..Self::default()
        };
        editor.sync_typing_style();
        editor
    }

    /// Load the persisted document, or start with one fresh line.
    pub fn hydrate(store: &dyn KeyValueStore) -> Self {
        let restored = match store.get(NOTES_CONTENT) {
            Some(Value::String(snapshot)) if !snapshot.is_empty() => {
                match Document::from_snapshot(&snapshot) {
                    Ok(document) => Some(document),
                    Err(err) => {
                        warn!(%err, "stored notes are malformed; starting fresh");
                        None
                    }
                }
            }
            Some(_) | None => None,
        };
        match restored {
            Some(document) if !document.is_empty() => {
                debug!(lines = document.line_count(), "notes restored");
                Self::with_document(document)
            }
            _ => {
                let mut editor = Self::new();
                editor.create_line(store);
                editor
            }
        }
    }

    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The caret, clamped to its line. `None` when no line holds it.
    pub fn caret(&self) -> Option<Caret> {
        let caret = self.caret?;
        let line = self.document.line(caret.line)?;
        Some(Caret::at(caret.line, caret.offset.min(line.len())))
    }

    /// The active non-empty selection, if any.
    pub fn selection(&self) -> Option<Selection> {
        let head = self.caret()?;
        let anchor = self.anchor?;
        let line = self.document.line(anchor.line)?;
        let sel = Selection {
            anchor: Caret::at(anchor.line, anchor.offset.min(line.len())),
            head,
        };
        (!sel.is_collapsed()).then_some(sel)
    }

    pub const fn checklist_mode(&self) -> bool {
        self.checklist_mode
    }

    pub const fn set_checklist_mode(&mut self, enabled: bool) {
        self.checklist_mode = enabled;
    }

    pub const fn checklist_label(&self) -> &'static str {
        if self.checklist_mode {
            CHECKLIST_ACTIVE_LABEL
        } else {
            CHECKLIST_LABEL
        }
    }

    /// Style applied to the next typed character.
    pub const fn typing_style(&self) -> TextStyle {
        self.typing_style
    }

    /// Append a new line at the end of the document and put the caret at its start.
    ///
    /// The line gets a checkbox if checklist mode is on.
    pub fn create_line(&mut self, store: &dyn KeyValueStore) -> usize {
        let idx = self.document.push(Line::new(self.checklist_mode));
        self.caret = Some(Caret::at(idx, 0));
        self.anchor = None;
        self.typing_style = TextStyle::default();
        debug!(line = idx, checklist = self.checklist_mode, "line created");
        self.save(store);
        idx
    }

    /// Flip checklist mode. Existing lines keep their checkboxes as they are.
    pub const fn toggle_checklist_mode(&mut self) -> bool {
        self.checklist_mode = !self.checklist_mode;
        self.checklist_mode
    }

    /// Enter never inserts a newline; it creates a new line.
    pub fn handle_enter(&mut self, store: &dyn KeyValueStore) -> usize {
        self.create_line(store)
    }

    /// Remove a checklist line when backspace is pressed at its start.
    ///
    /// Acts only for a collapsed caret at offset 0 of a line with a checkbox.
    /// The caret moves to the end of the previous line when there is one.
    pub fn handle_backspace(&mut self, store: &dyn KeyValueStore) -> BackspaceOutcome {
        if self.selection().is_some() {
            return BackspaceOutcome::Default;
        }
        let Some(caret) = self.caret() else {
            return BackspaceOutcome::Default;
        };
        if caret.offset != 0
            || !self
                .document
                .line(caret.line)
                .is_some_and(Line::has_checkbox)
        {
            return BackspaceOutcome::Default;
        }

        self.document.remove(caret.line);
        self.anchor = None;
        self.caret = if caret.line > 0 {
            let prev = caret.line - 1;
            Some(Caret::at(prev, self.document.line(prev).map_or(0, Line::len)))
        } else if self.document.is_empty() {
            None
        } else {
            Some(Caret::at(0, 0))
        };
        self.sync_typing_style();
        debug!(line = caret.line, "checklist line removed");
        self.save(store);
        BackspaceOutcome::Handled
    }

    /// Full backspace key behavior: the checklist handler, then default deletion.
    pub fn backspace(&mut self, store: &dyn KeyValueStore) {
        if self.handle_backspace(store) == BackspaceOutcome::Default {
            self.delete_back(store);
        }
    }

    /// Default deletion: the selection, else the previous character, else a
    /// merge of this line's text into the previous line.
    ///
    /// Returns `true` if anything changed.
    pub fn delete_back(&mut self, store: &dyn KeyValueStore) -> bool {
        if self.delete_selection() {
            self.sync_typing_style();
            self.save(store);
            return true;
        }
        let Some(caret) = self.caret() else {
            return false;
        };
        if caret.offset > 0 {
            if let Some(line) = self.document.line_mut(caret.line) {
                line.remove(caret.offset - 1..caret.offset);
            }
            self.caret = Some(Caret::at(caret.line, caret.offset - 1));
        } else if caret.line > 0 {
            let tail = self
                .document
                .remove(caret.line)
                .map(|mut line| line.split_off(0))
                .unwrap_or_default();
            let prev = caret.line - 1;
            let Some(prev_line) = self.document.line_mut(prev) else {
                return false;
            };
            let join = prev_line.len();
            prev_line.append(tail);
            self.caret = Some(Caret::at(prev, join));
        } else {
            return false;
        }
        self.sync_typing_style();
        self.save(store);
        true
    }

    /// Insert a typed character at the caret, replacing any selection.
    ///
    /// Typing into an empty document first creates a line to hold it.
    pub fn insert_char(&mut self, ch: char, store: &dyn KeyValueStore) {
        if ch == '\n' || ch == '\r' {
            self.handle_enter(store);
            return;
        }
        self.ensure_line(store);
        self.delete_selection();
        let Some(caret) = self.caret() else {
            return;
        };
        let style = self.typing_style;
        let Some(line) = self.document.line_mut(caret.line) else {
            return;
        };
        line.insert(caret.offset, ch, style);
        self.caret = Some(Caret::at(caret.line, caret.offset + 1));
        self.save(store);
    }

    /// Toggle the checkbox of line `idx`. Plain lines are left alone.
    pub fn toggle_checkbox(&mut self, idx: usize, store: &dyn KeyValueStore) -> bool {
        let toggled = self
            .document
            .line_mut(idx)
            .is_some_and(Line::toggle_checkbox);
        if toggled {
            self.save(store);
        }
        toggled
    }

    /// Toggle the checkbox of the caret line.
    pub fn toggle_current_checkbox(&mut self, store: &dyn KeyValueStore) -> bool {
        self.caret()
            .is_some_and(|caret| self.toggle_checkbox(caret.line, store))
    }

    /// Toggle bold / italic / underline / highlight.
    ///
    /// With a selection, the format is turned on unless every selected
    /// character already has it. With a bare caret, the typing style flips.
    pub fn apply_formatting(&mut self, format: Format, store: &dyn KeyValueStore) {
        if let Some(sel) = self.selection() {
            let (start, end) = sel.ordered();
            let enable = !self.range_all(start, end, |style| style.has(format));
            self.restyle_range(start, end, |style| style.set(format, enable));
        } else {
            let enable = !self.typing_style.has(format);
            self.typing_style.set(format, enable);
        }
        debug!(?format, "formatting applied");
        self.save(store);
    }

    /// Set an explicit pixel font size from a form field value.
    ///
    /// Applies to the selection, or to the whole caret line when nothing is
    /// selected, then collapses the selection to its end. Non-numeric or
    /// non-positive input is ignored.
    pub fn apply_font_size(&mut self, input: &str, store: &dyn KeyValueStore) -> bool {
        let Some(size) = crate::fields::parse_int_prefix(input)
            .and_then(|value| u16::try_from(value).ok())
            .filter(|value| *value > 0)
        else {
            return false;
        };
        let (start, end) = if let Some(sel) = self.selection() {
            sel.ordered()
        } else {
            let Some(caret) = self.caret() else {
                return false;
            };
            let len = self.document.line(caret.line).map_or(0, Line::len);
            (Caret::at(caret.line, 0), Caret::at(caret.line, len))
        };
        self.restyle_range(start, end, |style| style.font_size = Some(size));
        self.caret = Some(end);
        self.anchor = None;
        self.sync_typing_style();
        self.typing_style.font_size = Some(size);
        debug!(size, "font size applied");
        self.save(store);
        true
    }

    /// Empty the document, drop the persisted snapshot, then start one fresh line.
    pub fn clear_all(&mut self, store: &dyn KeyValueStore) {
        self.document.clear();
        self.caret = None;
        self.anchor = None;
        store.remove(NOTES_CONTENT);
        debug!("notes cleared");
        self.create_line(store);
    }

    /// Create a line if the document has none. Returns `true` if one was created.
    pub fn ensure_line(&mut self, store: &dyn KeyValueStore) -> bool {
        if self.document.is_empty() {
            self.create_line(store);
            true
        } else {
            false
        }
    }

    /// Place the caret from a click on the editing surface.
    ///
    /// A click below the last line lands at the end of the last line.
    pub fn click(&mut self, line: usize, offset: usize, store: &dyn KeyValueStore) {
        self.ensure_line(store);
        let last = self.document.line_count().saturating_sub(1);
        if line > last {
            self.place_caret(last, usize::MAX);
        } else {
            self.place_caret(line, offset);
        }
    }

    /// Move the caret to `(line, offset)`, clamped. Clears the selection.
    pub fn place_caret(&mut self, line: usize, offset: usize) {
        let Some(target) = self.document.line(line) else {
            return;
        };
        self.caret = Some(Caret::at(line, offset.min(target.len())));
        self.anchor = None;
        self.sync_typing_style();
    }

    /// Move the caret one step; `extend` grows the selection instead of clearing it.
    pub fn move_caret(&mut self, direction: Direction, extend: bool) {
        let Some(caret) = self.caret() else {
            return;
        };
        self.begin_move(caret, extend);
        let line_len = |idx: usize| self.document.line(idx).map_or(0, Line::len);
        let last = self.document.line_count().saturating_sub(1);
        let next = match direction {
            Direction::Left if caret.offset > 0 => Caret::at(caret.line, caret.offset - 1),
            Direction::Left if caret.line > 0 => Caret::at(caret.line - 1, line_len(caret.line - 1)),
            Direction::Right if caret.offset < line_len(caret.line) => {
                Caret::at(caret.line, caret.offset + 1)
            }
            Direction::Right if caret.line < last => Caret::at(caret.line + 1, 0),
            Direction::Up if caret.line > 0 => {
                Caret::at(caret.line - 1, caret.offset.min(line_len(caret.line - 1)))
            }
            Direction::Up => Caret::at(caret.line, 0),
            Direction::Down if caret.line < last => {
                Caret::at(caret.line + 1, caret.offset.min(line_len(caret.line + 1)))
            }
            Direction::Down => Caret::at(caret.line, line_len(caret.line)),
            Direction::Left | Direction::Right => caret,
        };
        self.caret = Some(next);
        self.sync_typing_style();
    }

    /// Move to the start of the caret line.
    pub fn move_home(&mut self, extend: bool) {
        let Some(caret) = self.caret() else {
            return;
        };
        self.begin_move(caret, extend);
        self.caret = Some(Caret::at(caret.line, 0));
        self.sync_typing_style();
    }

    /// Move to the end of the caret line.
    pub fn move_end(&mut self, extend: bool) {
        let Some(caret) = self.caret() else {
            return;
        };
        self.begin_move(caret, extend);
        let len = self.document.line(caret.line).map_or(0, Line::len);
        self.caret = Some(Caret::at(caret.line, len));
        self.sync_typing_style();
    }

    // --- Private helpers ---

    const fn begin_move(&mut self, caret: Caret, extend: bool) {
        if !extend {
            self.anchor = None;
        } else if self.anchor.is_none() {
            self.anchor = Some(caret);
        }
    }

    /// Pick up the style of the character before the caret.
    fn sync_typing_style(&mut self) {
        self.typing_style = self
            .caret()
            .and_then(|caret| {
                let line = self.document.line(caret.line)?;
                line.style_at(caret.offset.saturating_sub(1))
            })
            .unwrap_or_default();
    }

    /// Per-line character ranges covered by `start..end`.
    fn line_ranges(&self, start: Caret, end: Caret) -> Vec<(usize, Range<usize>)> {
        (start.line..=end.line)
            .filter_map(|idx| {
                let len = self.document.line(idx)?.len();
                let from = if idx == start.line { start.offset } else { 0 };
                let to = if idx == end.line { end.offset } else { len };
                Some((idx, from.min(len)..to.min(len)))
            })
            .collect()
    }

    fn range_all(&self, start: Caret, end: Caret, pred: impl Fn(&TextStyle) -> bool) -> bool {
        self.line_ranges(start, end).into_iter().all(|(idx, range)| {
            self.document
                .line(idx)
                .is_some_and(|line| line.chars()[range].iter().all(|c| pred(&c.style)))
        })
    }

    fn restyle_range(&mut self, start: Caret, end: Caret, mut f: impl FnMut(&mut TextStyle)) {
        for (idx, range) in self.line_ranges(start, end) {
            if let Some(line) = self.document.line_mut(idx) {
                line.restyle(range, &mut f);
            }
        }
    }

    /// Remove the selected text. Returns `true` if there was a selection.
    fn delete_selection(&mut self) -> bool {
        let Some(sel) = self.selection() else {
            return false;
        };
        let (start, end) = sel.ordered();
        if start.line == end.line {
            if let Some(line) = self.document.line_mut(start.line) {
                line.remove(start.offset..end.offset);
            }
        } else {
            let tail = self
                .document
                .line_mut(end.line)
                .map(|line| line.split_off(end.offset))
                .unwrap_or_default();
            if let Some(line) = self.document.line_mut(start.line) {
                line.split_off(start.offset);
                line.append(tail);
            }
            self.document.drain(start.line + 1..end.line + 1);
        }
        self.caret = Some(start);
        self.anchor = None;
        true
    }

    fn save(&self, store: &dyn KeyValueStore) {
        match self.document.to_snapshot() {
            Ok(snapshot) => store.set(&[(NOTES_CONTENT, Value::String(snapshot))]),
            Err(err) => warn!(%err, "failed to encode notes"),
        }
    }
}
