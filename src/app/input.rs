use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;

use crate::app::{App, Focus, Message, Model};
use crate::notes::{Direction, Format};
use crate::ui::{Control, NotesHit};

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        &self,
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(*key, model),
            Event::Mouse(mouse) => self.handle_mouse(*mouse, model),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(&self, mouse: MouseEvent, model: &Model) -> Option<Message> {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return match mouse.kind {
                MouseEventKind::ScrollUp if !model.overlay_active() => {
                    Some(Message::MoveCaret(Direction::Up, false))
                }
                MouseEventKind::ScrollDown if !model.overlay_active() => {
                    Some(Message::MoveCaret(Direction::Down, false))
                }
                _ => None,
            };
        }

        if model.help_visible {
            return Some(Message::HideHelp);
        }
        if model.clear_confirm_visible || model.font_size_input.is_some() {
            return None;
        }

        if let Some(control) = crate::ui::control_at(model, mouse.column, mouse.row) {
            return Some(match control {
                Control::Checklist => Message::ToggleChecklistMode,
                Control::Format(format) => Message::ApplyFormat(format),
                Control::FontSize => Message::OpenFontSizePrompt,
                Control::ClearAll => Message::RequestClearAll,
                Control::Help => Message::ToggleHelp,
                Control::Duration => Message::FocusDuration,
                Control::PlayPause => Message::TogglePlay,
                Control::Mute => Message::ToggleMute,
            });
        }

        match crate::ui::notes_hit(model, mouse.column, mouse.row)? {
            NotesHit::Checkbox(line) => Some(Message::ToggleCheckboxAt(line)),
            NotesHit::Text { line, offset } => Some(Message::ClickNotes(line, offset)),
        }
    }

    pub(super) fn handle_key(&self, key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if ctrl && matches!(key.code, KeyCode::Char('c' | 'q')) {
            return Some(Message::Quit);
        }

        if model.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::F(1) | KeyCode::Char('q' | '?') => {
                    Some(Message::HideHelp)
                }
                _ => None,
            };
        }

        if model.clear_confirm_visible {
            return match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Message::ConfirmClearAll),
                _ => Some(Message::CancelClearAll),
            };
        }

        if let Some(text) = model.font_size_input.as_ref() {
            return match key.code {
                KeyCode::Enter => Some(Message::ApplyFontSize),
                KeyCode::Esc => Some(Message::CancelFontSizePrompt),
                KeyCode::Backspace => {
                    let mut next = text.clone();
                    next.pop();
                    Some(Message::FontSizeInput(next))
                }
                KeyCode::Char(c) if !ctrl && !alt => {
                    let mut next = text.clone();
                    next.push(c);
                    Some(Message::FontSizeInput(next))
                }
                _ => None,
            };
        }

        // Global bindings
        match key.code {
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::F(5) => return Some(Message::TogglePlay),
            KeyCode::Tab | KeyCode::BackTab => return Some(Message::SwitchFocus),
            KeyCode::Char(c) if alt => return Self::alt_binding(c),
            _ => {}
        }

        match model.focus {
            Focus::Duration => Self::handle_duration_key(key.code, ctrl, model),
            Focus::Notes => Self::handle_notes_key(key.code, ctrl, shift),
        }
    }

    fn alt_binding(c: char) -> Option<Message> {
        match c.to_ascii_lowercase() {
            'b' => Some(Message::ApplyFormat(Format::Bold)),
            'i' => Some(Message::ApplyFormat(Format::Italic)),
            'u' => Some(Message::ApplyFormat(Format::Underline)),
            'h' => Some(Message::ApplyFormat(Format::Highlight)),
            's' => Some(Message::OpenFontSizePrompt),
            'l' => Some(Message::ToggleChecklistMode),
            'k' => Some(Message::ToggleCheckbox),
            'x' => Some(Message::RequestClearAll),
            'p' => Some(Message::TogglePlay),
            'm' => Some(Message::ToggleMute),
            _ => None,
        }
    }

    fn handle_duration_key(code: KeyCode, ctrl: bool, model: &Model) -> Option<Message> {
        match code {
            KeyCode::Enter | KeyCode::Esc => Some(Message::LeaveDuration),
            KeyCode::Char(' ') => Some(Message::TogglePlay),
            _ if model.timer.is_running() => None,
            KeyCode::Backspace if model.duration_pristine => {
                Some(Message::DurationInput(String::new()))
            }
            KeyCode::Char(c) if !ctrl && model.duration_pristine && is_duration_char(c) => {
                Some(Message::DurationInput(c.to_string()))
            }
            KeyCode::Backspace => {
                let mut next = model.duration_text().to_string();
                next.pop();
                Some(Message::DurationInput(next))
            }
            KeyCode::Char(c) if !ctrl && is_duration_char(c) => {
                let mut next = model.duration_text().to_string();
                next.push(c);
                Some(Message::DurationInput(next))
            }
            _ => None,
        }
    }

    fn handle_notes_key(code: KeyCode, ctrl: bool, shift: bool) -> Option<Message> {
        match code {
            KeyCode::Enter => Some(Message::NewLine),
            KeyCode::Backspace => Some(Message::Backspace),
            KeyCode::Left => Some(Message::MoveCaret(Direction::Left, shift)),
            KeyCode::Right => Some(Message::MoveCaret(Direction::Right, shift)),
            KeyCode::Up => Some(Message::MoveCaret(Direction::Up, shift)),
            KeyCode::Down => Some(Message::MoveCaret(Direction::Down, shift)),
            KeyCode::Home => Some(Message::MoveHome(shift)),
            KeyCode::End => Some(Message::MoveEnd(shift)),
            KeyCode::Char(c) if !ctrl => Some(Message::InsertChar(c)),
            _ => None,
        }
    }

    pub(super) fn view(&self, model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

const fn is_duration_char(c: char) -> bool {
    c.is_ascii_digit() || c == ':'
}
