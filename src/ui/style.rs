//! Theming and color definitions.
//!
//! Maps note text styles and panel controls to terminal styles. Uses ANSI
//! colors that adapt to the terminal's color palette.

use ratatui::style::{Color, Modifier, Style};

use crate::notes::TextStyle;

/// Pixel sizes at or above this render bold.
pub const LARGE_FONT_PX: u16 = 20;
/// Pixel sizes at or below this render dim.
pub const SMALL_FONT_PX: u16 = 12;

/// Terminal style for a run of note text.
///
/// Terminals have one glyph size, so explicit pixel sizes are approximated
/// with weight: large text is bold, small text is dim.
pub fn style_for_text(base: Style, text: TextStyle) -> Style {
    let mut style = base;

    if text.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if text.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if text.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if text.highlight {
        style = style.bg(Color::Yellow).fg(Color::Black);
    }
    match text.font_size {
        Some(px) if px >= LARGE_FONT_PX => style = style.add_modifier(Modifier::BOLD),
        Some(px) if px <= SMALL_FONT_PX => style = style.add_modifier(Modifier::DIM),
        _ => {}
    }

    style
}

/// Character under the caret.
pub fn caret_style() -> Style {
    Style::default().bg(Color::White).fg(Color::Black)
}

/// Selected text.
pub fn selection_style(base: Style) -> Style {
    base.add_modifier(Modifier::REVERSED)
}

/// A toolbar button; `active` marks a toggle that is currently on.
pub fn button_style(active: bool) -> Style {
    if active {
        Style::default()
            .bg(Color::Yellow)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}

/// The duration field; dimmed while the countdown runs and editing is off.
pub fn duration_field_style(focused: bool, running: bool) -> Style {
    if running {
        Style::default()
            .fg(Color::Indexed(245))
            .add_modifier(Modifier::BOLD)
    } else if focused {
        Style::default()
            .bg(Color::White)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }
}

/// Checkbox glyph style.
pub fn checkbox_style(checked: bool) -> Style {
    if checked {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Indexed(245))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_for_text_maps_formats_to_modifiers() {
        let text = TextStyle {
            bold: true,
            italic: true,
            underline: true,
            ..TextStyle::default()
        };
        let style = style_for_text(Style::default(), text);
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(style.add_modifier.contains(Modifier::ITALIC));
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(style.bg, None);
    }

    #[test]
    fn test_highlight_uses_fixed_yellow_background() {
        let text = TextStyle {
            highlight: true,
            ..TextStyle::default()
        };
        let style = style_for_text(Style::default(), text);
        assert_eq!(style.bg, Some(Color::Yellow));
    }

    #[test]
    fn test_font_size_approximation() {
        let large = TextStyle {
            font_size: Some(24),
            ..TextStyle::default()
        };
        let small = TextStyle {
            font_size: Some(10),
            ..TextStyle::default()
        };
        let normal = TextStyle {
            font_size: Some(16),
            ..TextStyle::default()
        };
        assert!(
            style_for_text(Style::default(), large)
                .add_modifier
                .contains(Modifier::BOLD)
        );
        assert!(
            style_for_text(Style::default(), small)
                .add_modifier
                .contains(Modifier::DIM)
        );
        assert_eq!(style_for_text(Style::default(), normal), Style::default());
    }
}
