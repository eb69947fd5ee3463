use crate::todos::TodoManager;
use crate::types::Todo;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

pub fn render_todo_list(f: &mut Frame, todos: &[Todo], selected: usize, area: Rect, focused: bool) {
    if todos.is_empty() {
        let empty_text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Nothing planned yet",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press 'n' to add a task",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(empty_text).alignment(Alignment::Center), area);
        return;
    }

    let items: Vec<ListItem> = todos
        .iter()
        .map(|todo| {
            let mut spans = Vec::new();
            if todo.priority {
                spans.push(Span::styled(
                    "! ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::raw(TodoManager::headline(todo)));
            if !todo.category.is_empty() {
                spans.push(Span::styled(
                    format!("  [{}]", todo.category),
                    Style::default().fg(Color::Magenta),
                ));
            }
            let mut lines = vec![Line::from(spans)];
            if !todo.memo.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", todo.memo),
                    Style::default().fg(Color::Gray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let highlight = if focused {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list = List::new(items)
        .highlight_style(highlight)
        .highlight_symbol(">> ");

    let mut list_state = ListState::default();
    list_state.select(Some(selected.min(todos.len() - 1)));
    f.render_stateful_widget(list, area, &mut list_state);
}
