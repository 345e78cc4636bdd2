use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::notes::NoteEditor;
use crate::store::{MemoryStore, SharedStore};
use crate::timer::Countdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which input receives typed keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Notes,
    Duration,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Line editor over the note document
    pub notes: NoteEditor,
    /// Countdown timer
    pub timer: Countdown,
    /// Persistence shared by both components
    pub store: SharedStore,
    /// Where typed keys go
    pub focus: Focus,
    /// Raw text of the duration field while it is being edited
    pub duration_input: String,
    /// Whether the duration field shows the countdown's own text.
    /// The first edit then replaces it instead of appending.
    pub duration_pristine: bool,
    /// Font size prompt contents; `Some` while the prompt is open
    pub font_size_input: Option<String>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Whether the clear-all confirmation is showing
    pub clear_confirm_visible: bool,
    toast: Option<Toast>,
    /// Terminal width
    pub width: u16,
    /// Terminal height
    pub height: u16,
    /// First document line shown in the notes pane
    pub notes_scroll_offset: usize,
    /// First text column shown in the notes pane
    pub notes_scroll_col: usize,
    /// Event loop clock, milliseconds since start
    pub now_ms: u64,
    /// Set when a finished countdown should sound the alarm
    alarm_pending: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Store file shown in help
    pub store_path: Option<PathBuf>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("focus", &self.focus)
            .field("lines", &self.notes.document().line_count())
            .field("timer", &self.timer)
            .field("store_path", &self.store_path)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model and hydrate both components from `store`.
    pub fn new(store: SharedStore, terminal_size: (u16, u16), now_ms: u64) -> Self {
        let notes = NoteEditor::hydrate(&*store);
        let timer = Countdown::hydrate(&*store, now_ms);
        let mut model = Self::from_parts(store, notes, timer, terminal_size, now_ms);
        model.ensure_caret_visible();
        model
    }

    fn from_parts(
        store: SharedStore,
        notes: NoteEditor,
        timer: Countdown,
        terminal_size: (u16, u16),
        now_ms: u64,
    ) -> Self {
        let duration_input = timer.display();
        Self {
            notes,
            timer,
            store,
            focus: Focus::Notes,
            duration_input,
            duration_pristine: true,
            font_size_input: None,
            help_visible: false,
            clear_confirm_visible: false,
            toast: None,
            width: terminal_size.0,
            height: terminal_size.1,
            notes_scroll_offset: 0,
            notes_scroll_col: 0,
            now_ms,
            alarm_pending: false,
            should_quit: false,
            config_global_path: None,
            config_local_path: None,
            store_path: None,
        }
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    pub(super) const fn request_alarm(&mut self) {
        self.alarm_pending = true;
    }

    /// Consume the pending alarm request.
    pub const fn take_alarm_pending(&mut self) -> bool {
        std::mem::replace(&mut self.alarm_pending, false)
    }

    /// Text shown in the duration field.
    pub fn duration_text(&self) -> &str {
        &self.duration_input
    }

    /// Show the countdown's formatted value in the duration field.
    pub(super) fn show_timer_display(&mut self) {
        self.duration_input = self.timer.display();
        self.duration_pristine = true;
    }

    /// Re-sync the duration field with the countdown unless it is being edited.
    pub(super) fn refresh_duration_field(&mut self) {
        if self.focus != Focus::Duration || self.timer.is_running() {
            self.show_timer_display();
        }
    }

    /// Whether any overlay is capturing input.
    pub const fn overlay_active(&self) -> bool {
        self.help_visible || self.clear_confirm_visible || self.font_size_input.is_some()
    }

    /// Scroll the notes pane so the caret cell is on screen.
    pub(super) fn ensure_caret_visible(&mut self) {
        let Some(caret) = self.notes.caret() else {
            self.notes_scroll_offset = 0;
            self.notes_scroll_col = 0;
            return;
        };
        let toast_active = self.toast.is_some();
        let visible = crate::ui::notes_visible_rows(self.width, self.height, toast_active);
        if visible > 0 {
            if caret.line < self.notes_scroll_offset {
                self.notes_scroll_offset = caret.line;
            } else if caret.line >= self.notes_scroll_offset + visible {
                self.notes_scroll_offset = caret.line + 1 - visible;
            }
            let max_start = self.notes.document().line_count().saturating_sub(visible);
            self.notes_scroll_offset = self.notes_scroll_offset.min(max_start);
        }

        let Some(line) = self.notes.document().line(caret.line) else {
            return;
        };
        let text_cols = crate::ui::notes_text_columns(self.width, self.height, toast_active, line);
        self.notes_scroll_col =
            crate::ui::scroll_col_for_caret(line, caret.offset, self.notes_scroll_col, text_cols);
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::from_parts(
            Rc::new(MemoryStore::new()),
            NoteEditor::new(),
            Countdown::new(),
            (80, 24),
            0,
        )
    }
}
