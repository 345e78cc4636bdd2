use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Inline formatting that can be toggled on a character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Bold,
    Italic,
    Underline,
    Highlight,
}

impl Format {
    pub const ALL: [Self; 4] = [Self::Bold, Self::Italic, Self::Underline, Self::Highlight];
}

/// Style carried by every character of a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub highlight: bool,
    /// Explicit font size in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u16>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

impl TextStyle {
    pub const fn has(&self, format: Format) -> bool {
        match format {
            Format::Bold => self.bold,
            Format::Italic => self.italic,
            Format::Underline => self.underline,
            Format::Highlight => self.highlight,
        }
    }

    pub const fn set(&mut self, format: Format, on: bool) {
        match format {
            Format::Bold => self.bold = on,
            Format::Italic => self.italic = on,
            Format::Underline => self.underline = on,
            Format::Highlight => self.highlight = on,
        }
    }
}

/// A character together with its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledChar {
    pub ch: char,
    pub style: TextStyle,
}

/// A maximal run of equally styled characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default, skip_serializing_if = "is_default_style")]
    pub style: TextStyle,
}

fn is_default_style(style: &TextStyle) -> bool {
    *style == TextStyle::default()
}

/// One editable line, optionally prefixed with a checkbox.
///
/// Checkbox presence is decided when the line is created and never changes;
/// only its checked state can be toggled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    checkbox: Option<bool>,
    chars: Vec<StyledChar>,
}

impl Line {
    /// Create an empty line, with an unchecked checkbox if `checklist`.
    pub const fn new(checklist: bool) -> Self {
        Self {
            checkbox: if checklist { Some(false) } else { None },
            chars: Vec::new(),
        }
    }

    /// Create a line from unstyled text.
    pub fn from_text(text: &str, checkbox: Option<bool>) -> Self {
        Self {
            checkbox,
            chars: text
                .chars()
                .map(|ch| StyledChar {
                    ch,
                    style: TextStyle::default(),
                })
                .collect(),
        }
    }

    /// Checkbox state, `None` for a plain line.
    pub const fn checkbox(&self) -> Option<bool> {
        self.checkbox
    }

    pub const fn has_checkbox(&self) -> bool {
        self.checkbox.is_some()
    }

    /// Flip the checked state. Returns `false` for a plain line.
    pub const fn toggle_checkbox(&mut self) -> bool {
        match self.checkbox {
            Some(checked) => {
                self.checkbox = Some(!checked);
                true
            }
            None => false,
        }
    }

    /// Length in characters.
    pub const fn len(&self) -> usize {
        self.chars.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[StyledChar] {
        &self.chars
    }

    pub fn text(&self) -> String {
        self.chars.iter().map(|c| c.ch).collect()
    }

    pub fn style_at(&self, offset: usize) -> Option<TextStyle> {
        self.chars.get(offset).map(|c| c.style)
    }

    /// Insert a character at `offset` (clamped to the line end).
    pub fn insert(&mut self, offset: usize, ch: char, style: TextStyle) {
        let offset = offset.min(self.chars.len());
        self.chars.insert(offset, StyledChar { ch, style });
    }

    /// Remove a character range (clamped to the line).
    pub fn remove(&mut self, range: Range<usize>) {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);
        self.chars.drain(start..end);
    }

    /// Split off everything from `offset` onward.
    pub fn split_off(&mut self, offset: usize) -> Vec<StyledChar> {
        let offset = offset.min(self.chars.len());
        self.chars.split_off(offset)
    }

    /// Append characters to the end of the line.
    pub fn append(&mut self, chars: Vec<StyledChar>) {
        self.chars.extend(chars);
    }

    /// Apply `f` to the style of every character in `range`.
    pub fn restyle(&mut self, range: Range<usize>, mut f: impl FnMut(&mut TextStyle)) {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);
        for c in &mut self.chars[start..end] {
            f(&mut c.style);
        }
    }

    /// Coalesce characters into runs of equal style.
    pub fn runs(&self) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        for c in &self.chars {
            match runs.last_mut() {
                Some(run) if run.style == c.style => run.text.push(c.ch),
                _ => runs.push(Run {
                    text: c.ch.to_string(),
                    style: c.style,
                }),
            }
        }
        runs
    }

    fn from_runs(checkbox: Option<bool>, runs: Vec<Run>) -> Self {
        let chars = runs
            .into_iter()
            .flat_map(|run| {
                let style = run.style;
                run.text
                    .chars()
                    .filter(|ch| *ch != '\n' && *ch != '\r')
                    .map(move |ch| StyledChar { ch, style })
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { checkbox, chars }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LineSnapshot {
    #[serde(default)]
    checkbox: Option<bool>,
    #[serde(default)]
    runs: Vec<Run>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DocumentSnapshot {
    #[serde(default)]
    lines: Vec<LineSnapshot>,
}

/// The ordered list of lines making up the note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<Line>,
}

impl Document {
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub const fn from_lines(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    pub fn line_mut(&mut self, idx: usize) -> Option<&mut Line> {
        self.lines.get_mut(idx)
    }

    pub const fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append a line, returning its index.
    pub fn push(&mut self, line: Line) -> usize {
        self.lines.push(line);
        self.lines.len() - 1
    }

    /// Remove the line at `idx`, if present.
    pub fn remove(&mut self, idx: usize) -> Option<Line> {
        (idx < self.lines.len()).then(|| self.lines.remove(idx))
    }

    /// Remove a contiguous block of lines.
    pub fn drain(&mut self, range: Range<usize>) {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        self.lines.drain(start..end);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Plain text of the whole document, one line per row.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serialize into the persisted snapshot format.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding fails.
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        let snapshot = DocumentSnapshot {
            lines: self
                .lines
                .iter()
                .map(|line| LineSnapshot {
                    checkbox: line.checkbox,
                    runs: line.runs(),
                })
                .collect(),
        };
        serde_json::to_string(&snapshot)
    }

    /// Decode a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if `snapshot` is not a valid document encoding.
    pub fn from_snapshot(snapshot: &str) -> Result<Self, serde_json::Error> {
        let decoded: DocumentSnapshot = serde_json::from_str(snapshot)?;
        Ok(Self {
            lines: decoded
                .lines
                .into_iter()
                .map(|line| Line::from_runs(line.checkbox, line.runs))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> TextStyle {
        TextStyle {
            bold: true,
            ..TextStyle::default()
        }
    }

    #[test]
    fn test_new_line_checkbox_follows_mode() {
        assert_eq!(Line::new(true).checkbox(), Some(false));
        assert_eq!(Line::new(false).checkbox(), None);
    }

    #[test]
    fn test_toggle_checkbox_on_plain_line_is_noop() {
        let mut line = Line::from_text("milk", None);
        assert!(!line.toggle_checkbox());
        assert_eq!(line.checkbox(), None);
    }

    #[test]
    fn test_toggle_checkbox_flips_state() {
        let mut line = Line::new(true);
        assert!(line.toggle_checkbox());
        assert_eq!(line.checkbox(), Some(true));
        assert!(line.toggle_checkbox());
        assert_eq!(line.checkbox(), Some(false));
    }

    #[test]
    fn test_runs_coalesce_equal_styles() {
        let mut line = Line::from_text("hello world", None);
        line.restyle(0..5, |s| s.bold = true);
        let runs = line.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "hello");
        assert_eq!(runs[0].style, bold());
        assert_eq!(runs[1].text, " world");
    }

    #[test]
    fn test_remove_clamps_range() {
        let mut line = Line::from_text("abc", None);
        line.remove(1..10);
        assert_eq!(line.text(), "a");
    }

    #[test]
    fn test_snapshot_preserves_checkboxes_and_styles() {
        let mut first = Line::from_text("buy milk", Some(true));
        first.restyle(4..8, |s| {
            s.highlight = true;
            s.font_size = Some(18);
        });
        let doc = Document::from_lines(vec![first, Line::from_text("plain", None)]);

        let snapshot = doc.to_snapshot().unwrap();
        let restored = Document::from_snapshot(&snapshot).unwrap();

        assert_eq!(restored, doc);
        assert_eq!(restored.line(0).unwrap().style_at(5).unwrap().font_size, Some(18));
    }

    #[test]
    fn test_snapshot_omits_default_style_fields() {
        let doc = Document::from_lines(vec![Line::from_text("hi", None)]);
        let snapshot = doc.to_snapshot().unwrap();
        assert_eq!(snapshot, r#"{"lines":[{"checkbox":null,"runs":[{"text":"hi"}]}]}"#);
    }

    #[test]
    fn test_from_snapshot_rejects_garbage() {
        assert!(Document::from_snapshot("<div class=\"line\"></div>").is_err());
    }

    #[test]
    fn test_from_snapshot_strips_newlines_inside_runs() {
        let doc = Document::from_snapshot(r#"{"lines":[{"runs":[{"text":"a\nb"}]}]}"#).unwrap();
        assert_eq!(doc.line(0).unwrap().text(), "ab");
        assert_eq!(doc.line(0).unwrap().checkbox(), None);
    }
}
