use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

pub fn render_clear_confirm_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_popup_rect(40, 7, area);
    let lines = vec![
        Line::styled(
            "Clear all notes?",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::from(vec![
            Span::styled(
                "y",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" clear · any other key cancels"),
        ]),
    ];
    let block = Block::default()
        .title("Clear")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_font_size_prompt(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(input) = model.font_size_input.as_deref() else {
        return;
    };
    let popup = centered_popup_rect(40, 7, area);
    let lines = vec![
        Line::from(vec![
            Span::raw("Size (px): "),
            Span::styled(
                input.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ", super::style::caret_style()),
        ]),
        Line::raw(""),
        Line::styled(
            "Enter applies · Esc cancels",
            Style::default().fg(Color::Indexed(245)),
        ),
    ];
    let block = Block::default()
        .title("Font Size")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(8).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());
    let store = model
        .store_path
        .as_ref()
        .map_or_else(|| "<memory>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut all_lines: Vec<Line> = Vec::new();

    all_lines.push(Line::styled("Notes", section_style));
    all_lines.push(Line::raw("  Enter               New line"));
    all_lines.push(Line::raw("  Backspace           Delete / remove checklist line"));
    all_lines.push(Line::raw("  Arrows, Home/End    Move caret (Shift selects)"));
    all_lines.push(Line::raw("  Alt-l               Toggle checklist mode"));
    all_lines.push(Line::raw("  Alt-k / click box   Toggle checkbox"));
    all_lines.push(Line::raw("  Alt-x               Clear all (asks first)"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Formatting", section_style));
    all_lines.push(Line::raw("  Alt-b / Alt-i       Bold / italic"));
    all_lines.push(Line::raw("  Alt-u / Alt-h       Underline / highlight"));
    all_lines.push(Line::raw("  Alt-s               Font size"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Timer", section_style));
    all_lines.push(Line::raw("  Tab                 Edit duration (HH:MM:SS)"));
    all_lines.push(Line::raw("  Alt-p / F5 / Space  Play / pause"));
    all_lines.push(Line::raw("  Alt-m               Mute alarm"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Other", section_style));
    all_lines.push(Line::raw("  F1                  Toggle help"));
    all_lines.push(Line::raw("  Ctrl-q / Ctrl-c     Quit"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Config", section_style));
    all_lines.push(Line::raw(format!("  Global: {global_cfg}")));
    all_lines.push(Line::raw(format!("  Local override: {local_cfg}")));
    all_lines.push(Line::raw(format!("  Store: {store}")));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height = inner.height.saturating_sub(1);
    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height);
    frame.render_widget(Paragraph::new(all_lines), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    let footer = Line::styled("Esc closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
