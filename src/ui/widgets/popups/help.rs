use crate::modal::{Document, ModalController};
use crate::ui::widgets::modal_frame::render_modal_frame;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

fn heading(text: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    )])
}

pub fn render(f: &mut Frame, modal: &ModalController, screen: Rect, doc: &Document) {
    let body = render_modal_frame(f, modal, screen, doc);

    let help_text = vec![
        heading("NAVIGATION"),
        Line::from(""),
        Line::from("  Tab / Shift-Tab    Move focus between sidebar, search and list"),
        Line::from("  ↑ / ↓ in sidebar   Choose a page, Enter to open"),
        Line::from("  /                  Focus the search field (Esc clears it)"),
        Line::from(""),
        heading("BOOKMARKS"),
        Line::from(""),
        Line::from("  j / k / ↑ / ↓      Move selection"),
        Line::from("  ← / → / PgUp/PgDn  Previous/next page"),
        Line::from("  Enter              Edit memo of the selected bookmark"),
        Line::from("  n                  Add bookmark"),
        Line::from("  d / Delete         Delete selected bookmark"),
        Line::from("  v                  Toggle selection mode"),
        Line::from("  Space / a / x      Toggle one / toggle all / delete selected"),
        Line::from("  search: #tag text  Filter by tags and title or memo text"),
        Line::from(""),
        heading("MODALS"),
        Line::from(""),
        Line::from("  Tab / Shift-Tab    Cycle focus inside the modal"),
        Line::from("  Enter / Space      Press the focused button"),
        Line::from("  Ctrl-s             Save the form"),
        Line::from("  Esc                Close the modal"),
        Line::from(""),
        heading("APPLICATION"),
        Line::from(""),
        Line::from("  ?                  Toggle this help"),
        Line::from("  q / Ctrl-c         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press Esc or ? to close",
            Style::default().fg(Color::Gray),
        )]),
    ];

    let paragraph = Paragraph::new(help_text)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, body);
}
