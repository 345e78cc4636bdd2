use crate::app::model::{Focus, Model, ToastLevel};
use crate::notes::{Direction, Format};
use crate::timer::TickOutcome;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Notes
    /// Type a character at the caret
    InsertChar(char),
    /// Enter: append a new line
    NewLine,
    /// Backspace in the notes pane
    Backspace,
    /// Move the caret; `true` extends the selection
    MoveCaret(Direction, bool),
    /// Caret to start of line
    MoveHome(bool),
    /// Caret to end of line
    MoveEnd(bool),
    /// Click on the editing surface at (line, offset)
    ClickNotes(usize, usize),
    /// Flip checklist mode for new lines
    ToggleChecklistMode,
    /// Toggle the checkbox on the caret line
    ToggleCheckbox,
    /// Toggle the checkbox on a specific line
    ToggleCheckboxAt(usize),
    /// Bold / italic / underline / highlight
    ApplyFormat(Format),

    // Font size prompt
    /// Open the font size prompt
    OpenFontSizePrompt,
    /// Replace the font size prompt text
    FontSizeInput(String),
    /// Apply the prompt value and close it
    ApplyFontSize,
    /// Close the prompt without applying
    CancelFontSizePrompt,

    // Clear all
    /// Ask for clear-all confirmation
    RequestClearAll,
    /// Clear the whole note
    ConfirmClearAll,
    /// Dismiss the confirmation
    CancelClearAll,

    // Timer
    /// Focus the duration field
    FocusDuration,
    /// Replace the duration field text
    DurationInput(String),
    /// Return focus to the notes pane
    LeaveDuration,
    /// Start or pause the countdown
    TogglePlay,
    /// Flip the alarm mute flag
    ToggleMute,
    /// One countdown second elapsed
    Tick,

    // Window
    /// Switch focus between notes and the duration field
    SwitchFocus,
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// All state transitions and persistence writes happen here. Terminal side
/// effects (the alarm bell) are requested through the model and carried out
/// by the event loop.
pub fn update(mut model: Model, msg: Message) -> Model {
    let store = model.store.clone();
    let store = &*store;

    match msg {
        // Notes
        Message::InsertChar(ch) => model.notes.insert_char(ch, store),
        Message::NewLine => {
            model.notes.handle_enter(store);
        }
        Message::Backspace => model.notes.backspace(store),
        Message::MoveCaret(direction, extend) => model.notes.move_caret(direction, extend),
        Message::MoveHome(extend) => model.notes.move_home(extend),
        Message::MoveEnd(extend) => model.notes.move_end(extend),
        Message::ClickNotes(line, offset) => {
            model.focus = Focus::Notes;
            model.refresh_duration_field();
            model.notes.click(line, offset, store);
        }
        Message::ToggleChecklistMode => {
            model.notes.toggle_checklist_mode();
        }
        Message::ToggleCheckbox => {
            model.notes.toggle_current_checkbox(store);
        }
        Message::ToggleCheckboxAt(idx) => {
            model.focus = Focus::Notes;
            model.refresh_duration_field();
            model.notes.toggle_checkbox(idx, store);
        }
        Message::ApplyFormat(format) => model.notes.apply_formatting(format, store),

        // Font size prompt
        Message::OpenFontSizePrompt => {
            model.font_size_input = Some(String::new());
        }
        Message::FontSizeInput(text) => {
            if model.font_size_input.is_some() {
                model.font_size_input = Some(text);
            }
        }
        Message::ApplyFontSize => {
            if let Some(text) = model.font_size_input.take() {
                model.notes.apply_font_size(&text, store);
            }
        }
        Message::CancelFontSizePrompt => {
            model.font_size_input = None;
        }

        // Clear all
        Message::RequestClearAll => {
            model.clear_confirm_visible = true;
        }
        Message::ConfirmClearAll => {
            if model.clear_confirm_visible {
                model.clear_confirm_visible = false;
                model.notes.clear_all(store);
                model.notes_scroll_offset = 0;
                model.notes_scroll_col = 0;
                model.show_toast(ToastLevel::Info, "Notes cleared");
            }
        }
        Message::CancelClearAll => {
            model.clear_confirm_visible = false;
        }

        // Timer
        Message::FocusDuration => {
            model.focus = Focus::Duration;
            model.show_timer_display();
        }
        Message::DurationInput(text) => {
            if model.focus == Focus::Duration && !model.timer.is_running() {
                model.timer.set_duration(&text, store);
                model.duration_input = text;
                model.duration_pristine = false;
            }
        }
        Message::LeaveDuration => {
            model.focus = Focus::Notes;
            model.refresh_duration_field();
        }
        Message::TogglePlay => {
            model.timer.toggle_play(model.now_ms, store);
            if model.timer.is_running() {
                model.show_timer_display();
            }
        }
        Message::ToggleMute => {
            model.timer.toggle_mute(store);
        }
        Message::Tick => match model.timer.tick(store) {
            TickOutcome::Idle => {}
            TickOutcome::Counting => {
                model.show_timer_display();
            }
            TickOutcome::Finished { alarm } => {
                model.show_timer_display();
                if alarm {
                    model.request_alarm();
                }
                model.show_toast(ToastLevel::Info, "Time's up");
            }
        },

        // Window
        Message::SwitchFocus => {
            model.focus = match model.focus {
                Focus::Notes => Focus::Duration,
                Focus::Duration => Focus::Notes,
            };
            if model.focus == Focus::Duration {
                model.show_timer_display();
            } else {
                model.refresh_duration_field();
            }
        }
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }
        Message::Resize(width, height) => {
            model.width = width;
            model.height = height;
        }
        Message::Redraw => {}

        // Application
        Message::Quit => {
            model.should_quit = true;
        }
    }

    model.ensure_caret_visible();
    model
}
