use crate::forms::TextField;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

fn field_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::White).bg(Color::Rgb(40, 40, 60))
    } else {
        Style::default().fg(Color::Gray).bg(Color::Rgb(30, 30, 30))
    }
}

fn label_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

/// Single-line input as `Label: value`. The value scrolls so the cursor
/// stays visible, and the terminal cursor is placed when focused.
pub fn render_input(f: &mut Frame, label: &str, field: &TextField, area: Rect, focused: bool) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let prefix = if label.is_empty() {
        String::new()
    } else {
        format!("{}: ", label)
    };
    let prefix_width = (prefix.chars().count() as u16).min(area.width);
    let room = area.width.saturating_sub(prefix_width).max(1) as usize;

    let chars: Vec<char> = field.value().chars().collect();
    let skip = field.cursor().saturating_sub(room - 1);
    let shown: String = chars.iter().skip(skip).take(room).collect();
    let padded = format!("{:<width$}", shown, width = room);

    let line = Line::from(vec![
        Span::styled(prefix, label_style(focused)),
        Span::styled(padded, field_style(focused)),
    ]);
    f.render_widget(Paragraph::new(line), area);

    if focused {
        let column = (field.cursor() - skip) as u16;
        f.set_cursor_position((area.x + prefix_width + column, area.y));
    }
}

/// Field label drawn on the row above `input`
pub fn render_label(f: &mut Frame, label: &str, input: Rect, focused: bool) {
    if input.height == 0 || input.y == 0 {
        return;
    }
    let area = Rect {
        y: input.y - 1,
        height: 1,
        ..input
    };
    f.render_widget(Paragraph::new(Span::styled(label, label_style(focused))), area);
}

/// Inline error message in red
pub fn render_error(f: &mut Frame, error: Option<&str>, area: Rect) {
    if let Some(error) = error {
        f.render_widget(
            Paragraph::new(Span::styled(error, Style::default().fg(Color::Red))),
            area,
        );
    }
}

/// Multi-line text area filling `area`, scrolled to keep the cursor line in view
pub fn render_textarea(f: &mut Frame, field: &TextField, area: Rect, focused: bool) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let (line, column) = field.cursor_position();
    let scroll = line.saturating_sub(area.height.saturating_sub(1));
    let text: Vec<Line> = field.value().split('\n').map(Line::from).collect();
    let paragraph = Paragraph::new(text)
        .style(field_style(focused))
        .scroll((scroll, 0))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);

    if focused {
        let x = area.x + column.min(area.width.saturating_sub(1));
        f.set_cursor_position((x, area.y + line - scroll));
    }
}
