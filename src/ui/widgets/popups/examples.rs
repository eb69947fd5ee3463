use crate::gallery::{ExampleKind, FORM_EMAIL, FORM_NAME, Gallery, GallerySlot};
use crate::modal::Document;
use crate::ui::widgets::input::{render_input, render_label};
use crate::ui::widgets::modal_frame::render_modal_frame;
use crate::ui::widgets::popups::dialog;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

/// Example picker with the lifecycle event log underneath
pub fn render_examples_page(f: &mut Frame, gallery: &Gallery, area: Rect, focused: bool) {
    let [list_area, log_area] =
        Layout::vertical([Constraint::Length(ExampleKind::ALL.len() as u16 + 2), Constraint::Min(0)])
            .areas(area);

    let items: Vec<ListItem> = ExampleKind::ALL
        .iter()
        .map(|kind| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<24}", kind.label()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(kind.description(), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title(" Examples ")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");
    let mut state = ListState::default();
    state.select(Some(gallery.selected));
    f.render_stateful_widget(list, list_area, &mut state);

    let log: Vec<Line> = gallery
        .log()
        .map(|line| Line::from(Span::styled(line.clone(), Style::default().fg(Color::Gray))))
        .collect();
    let log = Paragraph::new(log).block(
        Block::default()
            .title(" Event log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(log, log_area);
}

pub fn render_modal(f: &mut Frame, gallery: &Gallery, slot: GallerySlot, screen: Rect, doc: &Document) {
    let entry = match slot {
        GallerySlot::Confirm => return dialog::render(f, &gallery.confirm, screen, doc),
        GallerySlot::Alert => return dialog::render(f, &gallery.alert, screen, doc),
        GallerySlot::Modal(i) => match gallery.entries.get(i) {
            Some(entry) => entry,
            None => return,
        },
    };

    let body = render_modal_frame(f, &entry.modal, screen, doc);
    match entry.kind {
        ExampleKind::ContactForm => {
            let (name, email) = Gallery::form_areas(body);
            render_label(f, "Name", name, doc.is_focused(FORM_NAME));
            render_input(f, "", &gallery.name, name, doc.is_focused(FORM_NAME));
            render_label(f, "Email", email, doc.is_focused(FORM_EMAIL));
            render_input(f, "", &gallery.email, email, doc.is_focused(FORM_EMAIL));
        }
        ExampleKind::Large => {
            let mut lines = vec![
                Line::from(Span::styled(
                    "Large modals hold long content.",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            lines.extend((1..=40).map(|n| {
                Line::from(format!(
                    "{:>2}. The page behind stays locked while this modal is open.",
                    n
                ))
            }));
            f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body);
        }
        ExampleKind::Custom => {
            let text = vec![
                Line::from(""),
                Line::from("This modal replaces the title bar with its own header."),
                Line::from("It has no [x] button; use Esc or the footer buttons."),
            ];
            f.render_widget(Paragraph::new(text), body);
        }
        ExampleKind::Basic | ExampleKind::Confirm | ExampleKind::Alert => {
            let text = vec![
                Line::from(""),
                Line::from("A small modal with default behavior."),
                Line::from("Close it with Esc, a click outside or [x]."),
            ];
            f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), body);
        }
    }
}
