use super::*;
use crate::app::{Focus, Message, Model, update};
use crate::notes::{Caret, Document, Format, Line as NoteLine};
use crate::store::{MemoryStore, NOTES_CONTENT, REMAINING_SECONDS};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::style::{Color, Modifier};
use serde_json::json;
use std::rc::Rc;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(60, 20);
    Terminal::new(backend).unwrap()
}

fn model_with_lines(lines: Vec<NoteLine>) -> Model {
    let snapshot = Document::from_lines(lines).to_snapshot().unwrap();
    let store = MemoryStore::with_entries([(NOTES_CONTENT, json!(snapshot))]);
    Model::new(Rc::new(store), (60, 20), 0)
}

fn draw(model: &Model) -> Terminal<TestBackend> {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal
}

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

#[test]
fn test_render_shows_toolbar_and_timer_controls() {
    let model = Model::default();
    let terminal = draw(&model);
    let toolbar = row_text(&terminal, 0);
    assert!(toolbar.contains("Checklist"));
    assert!(toolbar.contains(" B "));
    assert!(toolbar.contains("Size"));
    assert!(toolbar.contains("Clear"));
    let timer = row_text(&terminal, 1);
    assert!(timer.contains("00:00:00"));
    assert!(timer.contains("▶"));
}

#[test]
fn test_checklist_label_reflects_mode() {
    let mut model = Model::default();
    model = update(model, Message::ToggleChecklistMode);
    let terminal = draw(&model);
    assert!(row_text(&terminal, 0).contains("Checklist ✓"));
}

#[test]
fn test_render_note_lines_with_checkboxes() {
    let model = model_with_lines(vec![
        NoteLine::from_text("milk", Some(true)),
        NoteLine::from_text("eggs", Some(false)),
        NoteLine::from_text("plain", None),
    ]);
    let terminal = draw(&model);
    let content = buffer_text(&terminal);
    assert!(content.contains("[x] milk"));
    assert!(content.contains("[ ] eggs"));
    assert!(content.contains("plain"));
}

#[test]
fn test_caret_is_drawn_as_highlighted_cell() {
    let model = model_with_lines(vec![NoteLine::from_text("ab", None)]);
    // Caret lands at the end of the last line.
    let terminal = draw(&model);
    let inner = layout::notes_inner(layout::model_layout(&model).notes);
    let cell = &terminal.backend().buffer()[(inner.x + 2, inner.y)];
    assert_eq!(cell.bg, Color::White);
    assert_eq!(cell.fg, Color::Black);
}

#[test]
fn test_caret_hidden_while_duration_focused() {
    let mut model = model_with_lines(vec![NoteLine::from_text("ab", None)]);
    model = update(model, Message::FocusDuration);
    let terminal = draw(&model);
    let inner = layout::notes_inner(layout::model_layout(&model).notes);
    let cell = &terminal.backend().buffer()[(inner.x + 2, inner.y)];
    assert_ne!(cell.bg, Color::White);
}

#[test]
fn test_bold_text_renders_with_modifier() {
    let mut model = model_with_lines(vec![NoteLine::from_text("", None)]);
    model = update(model, Message::ApplyFormat(Format::Bold));
    model = update(model, Message::InsertChar('x'));
    model = update(model, Message::MoveHome(false));
    model = update(model, Message::FocusDuration);
    let terminal = draw(&model);
    let inner = layout::notes_inner(layout::model_layout(&model).notes);
    let cell = &terminal.backend().buffer()[(inner.x, inner.y)];
    assert_eq!(cell.symbol(), "x");
    assert!(cell.modifier.contains(Modifier::BOLD));
}

#[test]
fn test_empty_document_shows_start_hint() {
    let mut model = model_with_lines(vec![NoteLine::from_text("", Some(false))]);
    model = update(model, Message::Backspace);
    assert!(model.notes.document().is_empty());
    let terminal = draw(&model);
    assert!(buffer_text(&terminal).contains("Press Enter or click here"));
}

#[test]
fn test_help_overlay_lists_bindings_and_store() {
    let mut model = Model::default();
    model.store_path = Some(std::path::PathBuf::from("/tmp/notes.json"));
    model = update(model, Message::ToggleHelp);
    let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
    terminal.draw(|frame| render(&model, frame)).unwrap();
    let content = buffer_text(&terminal);
    assert!(content.contains("Help"));
    assert!(content.contains("Toggle checklist mode"));
    assert!(content.contains("/tmp/notes.json"));
}

#[test]
fn test_clear_confirmation_overlay() {
    let model = update(Model::default(), Message::RequestClearAll);
    let content = buffer_text(&draw(&model));
    assert!(content.contains("Clear all notes?"));
}

#[test]
fn test_font_size_prompt_shows_input() {
    let mut model = update(Model::default(), Message::OpenFontSizePrompt);
    model = update(model, Message::FontSizeInput("18".to_string()));
    let content = buffer_text(&draw(&model));
    assert!(content.contains("Size (px): 18"));
}

#[test]
fn test_running_timer_shows_pause_glyph_and_status() {
    let store = MemoryStore::with_entries([(REMAINING_SECONDS, json!(90))]);
    let mut model = Model::new(Rc::new(store), (60, 20), 0);
    model = update(model, Message::TogglePlay);
    let terminal = draw(&model);
    assert!(row_text(&terminal, 1).contains("00:01:30"));
    assert!(row_text(&terminal, 1).contains("⏸"));
    assert!(row_text(&terminal, 19).contains("[running]"));
}

#[test]
fn test_control_at_matches_rendered_buttons() {
    let model = Model::default();
    let screen = layout::model_layout(&model);
    for (control, rect) in layout::control_rects(&model, screen.toolbar, &layout::TOOLBAR_CONTROLS)
    {
        assert_eq!(control_at(&model, rect.x, rect.y), Some(control));
    }
    let timer = layout::control_rects(&model, screen.timer, &layout::TIMER_CONTROLS);
    assert_eq!(timer[0].0, Control::Duration);
    assert_eq!(
        control_at(&model, timer[1].1.x, timer[1].1.y),
        Some(Control::PlayPause)
    );
    assert_eq!(control_at(&model, 0, 0), None);
}

#[test]
fn test_notes_hit_resolves_checkbox_and_text() {
    let model = model_with_lines(vec![
        NoteLine::from_text("todo", Some(false)),
        NoteLine::from_text("hello", None),
    ]);
    let inner = layout::notes_inner(layout::model_layout(&model).notes);
    assert_eq!(
        notes_hit(&model, inner.x + 1, inner.y),
        Some(NotesHit::Checkbox(0))
    );
    assert_eq!(
        notes_hit(&model, inner.x + CHECKBOX_WIDTH + 2, inner.y),
        Some(NotesHit::Text { line: 0, offset: 2 })
    );
    assert_eq!(
        notes_hit(&model, inner.x + 3, inner.y + 1),
        Some(NotesHit::Text { line: 1, offset: 3 })
    );
    assert_eq!(
        notes_hit(&model, inner.x, inner.y + 5),
        Some(NotesHit::Text {
            line: 5,
            offset: usize::MAX
        })
    );
    assert_eq!(notes_hit(&model, 0, 0), None);
}

#[test]
fn test_note_line_marks_selection() {
    let line = NoteLine::from_text("abcd", None);
    let selection = crate::notes::Selection {
        anchor: Caret::at(0, 1),
        head: Caret::at(0, 3),
    };
    let rendered = note_line(&line, 0, None, Some(selection), 0);
    let reversed: String = rendered
        .spans
        .iter()
        .filter(|span| span.style.add_modifier.contains(Modifier::REVERSED))
        .map(|span| span.content.as_ref())
        .collect();
    assert_eq!(reversed, "bc");
}

#[test]
fn test_scrolls_to_keep_caret_visible() {
    let lines = (0..40)
        .map(|i| NoteLine::from_text(&format!("line {i}"), None))
        .collect();
    let model = model_with_lines(lines);
    let mut model = update(model, Message::Redraw);
    assert!(model.notes_scroll_offset > 0);
    let content = buffer_text(&draw(&model));
    assert!(content.contains("line 39"));
    model.focus = Focus::Notes;
    for _ in 0..39 {
        model = update(model, Message::MoveCaret(crate::notes::Direction::Up, false));
    }
    assert_eq!(model.notes_scroll_offset, 0);
}

#[test]
fn test_long_line_scrolls_horizontally_to_show_caret() {
    let model = model_with_lines(vec![NoteLine::from_text(&"x".repeat(70), None)]);
    let model = update(model, Message::MoveEnd(false));
    assert_eq!(model.notes.caret(), Some(Caret::at(0, 70)));
    assert_eq!(model.notes_scroll_col, 13);

    let terminal = draw(&model);
    let inner = layout::notes_inner(layout::model_layout(&model).notes);
    assert_eq!(inner.width, 58);
    let buffer = terminal.backend().buffer();
    let caret_cell = &buffer[(inner.x + 57, inner.y)];
    assert_eq!(caret_cell.bg, Color::White);
    assert_eq!(buffer[(inner.x, inner.y)].symbol(), "x");
    assert_eq!(buffer[(inner.x + 56, inner.y)].symbol(), "x");
    assert_eq!(
        notes_hit(&model, inner.x, inner.y),
        Some(NotesHit::Text {
            line: 0,
            offset: 13
        })
    );

    let model = update(model, Message::MoveHome(false));
    assert_eq!(model.notes_scroll_col, 0);
    let terminal = draw(&model);
    let buffer = terminal.backend().buffer();
    assert_eq!(buffer[(inner.x, inner.y)].bg, Color::White);
}

#[test]
fn test_checkbox_stays_fixed_while_text_scrolls() {
    let text = format!("{}END", "y".repeat(60));
    let model = model_with_lines(vec![NoteLine::from_text(&text, Some(false))]);
    let model = update(model, Message::MoveEnd(false));
    let terminal = draw(&model);
    let inner = layout::notes_inner(layout::model_layout(&model).notes);
    let row = row_text(&terminal, inner.y);
    assert!(row.contains("[ ] "), "{row}");
    assert!(row.contains("END"), "{row}");
}
