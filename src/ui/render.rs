use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::{Focus, Model};
use crate::notes::{Caret, Line as NoteLine, Selection};

use super::layout::{self, Control, TIMER_CONTROLS, TOOLBAR_CONTROLS};
use super::{overlays, status, style};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = layout::screen_layout(area, model.active_toast().is_some());

    render_controls(model, frame, layout.toolbar, &TOOLBAR_CONTROLS);
    render_controls(model, frame, layout.timer, &TIMER_CONTROLS);
    render_notes(model, frame, layout.notes);
    if let Some(toast_area) = layout.toast {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, layout.status);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if model.clear_confirm_visible {
        overlays::render_clear_confirm_overlay(frame, area);
    } else if model.font_size_input.is_some() {
        overlays::render_font_size_prompt(model, frame, area);
    }
}

fn render_controls(model: &Model, frame: &mut Frame, row: Rect, controls: &[Control]) {
    frame.render_widget(Clear, row);
    for (control, rect) in layout::control_rects(model, row, controls) {
        let label = layout::control_label(model, control);
        let button_style = match control {
            Control::Checklist => style::button_style(model.notes.checklist_mode()),
            Control::Format(format) => style::button_style(model.notes.typing_style().has(format)),
            Control::Duration => style::duration_field_style(
                model.focus == Focus::Duration,
                model.timer.is_running(),
            ),
            Control::PlayPause => style::button_style(model.timer.is_running()),
            Control::Mute => style::button_style(model.timer.is_muted()),
            Control::FontSize | Control::ClearAll | Control::Help => style::button_style(false),
        };
        frame.render_widget(
            Paragraph::new(format!(" {label} ")).style(button_style),
            rect,
        );
    }
}

fn render_notes(model: &Model, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title("Notes")
        .borders(Borders::ALL)
        .border_style(if model.focus == Focus::Notes {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let inner = layout::notes_inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let document = model.notes.document();
    if document.is_empty() {
        let hint = Line::styled(
            "Press Enter or click here to start a line",
            Style::default().fg(Color::Indexed(245)),
        );
        frame.render_widget(Paragraph::new(hint), inner);
        return;
    }

    let caret = (model.focus == Focus::Notes && !model.overlay_active())
        .then(|| model.notes.caret())
        .flatten();
    let selection = model.notes.selection();
    let visible = usize::from(inner.height);
    let content: Vec<Line> = document
        .lines()
        .iter()
        .enumerate()
        .skip(model.notes_scroll_offset)
        .take(visible)
        .map(|(idx, line)| note_line(line, idx, caret, selection, model.notes_scroll_col))
        .collect();
    frame.render_widget(Paragraph::new(content), inner);
}

/// Build the display line for one note line, with caret and selection cells.
///
/// Text starting left of `scroll_col` is hidden; the checkbox stays put.
pub fn note_line(
    line: &NoteLine,
    idx: usize,
    caret: Option<Caret>,
    selection: Option<Selection>,
    scroll_col: usize,
) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    if let Some(checked) = line.checkbox() {
        let glyph = if checked { "[x] " } else { "[ ] " };
        spans.push(Span::styled(glyph, style::checkbox_style(checked)));
    }

    let caret_offset = caret.filter(|c| c.line == idx).map(|c| c.offset);
    let mut run = String::new();
    let mut run_style: Option<Style> = None;
    let mut column = 0;
    for (offset, styled) in line.chars().iter().enumerate() {
        let start = column;
        column += styled.ch.width().unwrap_or(0);
        if start < scroll_col {
            continue;
        }
        let mut cell_style = style::style_for_text(Style::default(), styled.style);
        if selection.is_some_and(|sel| sel.contains(idx, offset)) {
            cell_style = style::selection_style(cell_style);
        }
        if caret_offset == Some(offset) {
            cell_style = style::caret_style();
        }
        if run_style.is_some_and(|s| s != cell_style) {
            spans.push(Span::styled(
                std::mem::take(&mut run),
                run_style.unwrap_or_default(),
            ));
        }
        run_style = Some(cell_style);
        run.push(styled.ch);
    }
    if let Some(run_style) = run_style {
        spans.push(Span::styled(run, run_style));
    }
    if caret_offset.is_some_and(|offset| offset >= line.len()) {
        spans.push(Span::styled(" ", style::caret_style()));
    }
    Line::from(spans)
}
