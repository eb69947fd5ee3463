use crate::constants::CARD_HEIGHT;
use crate::memo;
use crate::types::Bookmark;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::collections::HashSet;

/// One page of bookmark cards: title and date, tag chips, memo preview
pub struct BookmarkList<'a> {
    bookmarks: &'a [&'a Bookmark],
    selected_idx: Option<usize>,
    checked: Option<&'a HashSet<u64>>,
    focused: bool,
}

impl<'a> BookmarkList<'a> {
    /// `checked` is `Some` while selection mode is on
    pub fn new(
        bookmarks: &'a [&'a Bookmark],
        selected_idx: Option<usize>,
        checked: Option<&'a HashSet<u64>>,
        focused: bool,
    ) -> Self {
        Self {
            bookmarks,
            selected_idx,
            checked,
            focused,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.bookmarks.is_empty() {
            let empty_text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "[No bookmarks]",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press 'n' to add one",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let paragraph = Paragraph::new(empty_text).alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }

        for (idx, bookmark) in self.bookmarks.iter().enumerate() {
            let y = area.y + idx as u16 * CARD_HEIGHT;
            if y + CARD_HEIGHT > area.bottom() {
                break;
            }
            let card = Rect::new(area.x, y, area.width, CARD_HEIGHT);
            self.render_card(frame, bookmark, card, self.selected_idx == Some(idx));
        }
    }

    fn render_card(&self, frame: &mut Frame, bookmark: &Bookmark, area: Rect, selected: bool) {
        let base = if selected && self.focused {
            Style::default().bg(Color::Rgb(40, 40, 50))
        } else {
            Style::default()
        };
        let marker = if selected { "▌" } else { " " };

        let mut title = vec![Span::styled(marker, Style::default().fg(Color::Cyan))];
        if let Some(checked) = self.checked {
            let check = if checked.contains(&bookmark.id) {
                "[x] "
            } else {
                "[ ] "
            };
            title.push(Span::styled(check, Style::default().fg(Color::Yellow)));
        }
        title.push(Span::styled(
            bookmark.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        if !bookmark.urls.is_empty() {
            title.push(Span::styled(
                format!("  ({} url{})", bookmark.urls.len(), plural(bookmark.urls.len())),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let mut tags = vec![Span::raw("  ")];
        for tag in &bookmark.tags {
            tags.push(Span::styled(
                format!("#{}", tag),
                Style::default().fg(Color::Magenta),
            ));
            tags.push(Span::raw(" "));
        }

        let width = area.width.saturating_sub(2) as usize;
        let preview = memo::preview_lines(&bookmark.memo, width, 1)
            .into_iter()
            .next()
            .unwrap_or_default();

        let lines = vec![
            Line::from(title),
            Line::from(tags),
            Line::from(Span::styled(
                format!("  {}", preview),
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).style(base), area);

        let date = Paragraph::new(bookmark.created.format("%y/%m/%d").to_string())
            .style(base.fg(Color::DarkGray))
            .alignment(Alignment::Right);
        frame.render_widget(date, Rect { height: 1, ..area });
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
