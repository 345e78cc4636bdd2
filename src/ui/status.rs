use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Focus, Model};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let focus = match model.focus {
        Focus::Notes => "NOTES",
        Focus::Duration => "TIMER",
    };

    let caret_info = model.notes.caret().map_or_else(
        || "  no line (Enter or click to start)".to_string(),
        |caret| {
            format!(
                "  Ln {}/{}, Col {}",
                caret.line + 1,
                model.notes.document().line_count(),
                caret.offset + 1
            )
        },
    );
    let size_info = model
        .notes
        .typing_style()
        .font_size
        .map(|px| format!("  {px}px"))
        .unwrap_or_default();
    let checklist_indicator = if model.notes.checklist_mode() {
        " [checklist]"
    } else {
        ""
    };
    let running_indicator = if model.timer.is_running() {
        " [running]"
    } else {
        ""
    };

    let status = format!(
        " {focus}{caret_info}{size_info}{checklist_indicator}{running_indicator}  F1:help"
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        crate::app::ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        crate::app::ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
