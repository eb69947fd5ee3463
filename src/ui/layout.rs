use crate::app::{self, AppState, Slot};
use crate::bookmarks::BookmarkManager;
use crate::forms::{Rows, cells};
use crate::search::SearchEngine;
use crate::types::Page;
use crate::ui::widgets::bookmark_list::BookmarkList;
use crate::ui::widgets::popups;
use crate::ui::widgets::{input, sidebar, todo_list};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

const ADD_BUTTON_WIDTH: u16 = 16;

/// Screen regions of the page behind the modals
///
/// Regions a page does not use are zero-sized, which keeps their focus
/// nodes out of the tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub sidebar: Rect,
    pub main: Rect,
    pub statusbar: Rect,
    pub header: Rect,
    pub add_button: Rect,
    pub search: Rect,
    pub tags: Rect,
    pub summary: Rect,
    pub content: Rect,
}

impl PageLayout {
    pub fn new(screen: Rect, sidebar_width: u16, page: Page) -> Self {
        let [body, statusbar] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(screen);
        let [sidebar, main] =
            Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Min(0)])
                .areas(body);

        let inner = Rect {
            x: main.x.saturating_add(1),
            width: main.width.saturating_sub(2),
            ..main
        };
        let mut rows = Rows::new(inner);
        let header_row = rows.take(1);
        let header = match page {
            Page::ModalExamples => [header_row, Rect::default()],
            Page::Bookmarks | Page::MyDay => {
                let split = cells(header_row, &[0, ADD_BUTTON_WIDTH]);
                [split[0], split[1]]
            }
        };
        rows.skip(1);

        let (search, tags, summary) = if page == Page::Bookmarks {
            let search = rows.take(1);
            let tags = rows.take(1);
            let summary = rows.take(1);
            rows.skip(1);
            (search, tags, summary)
        } else {
            (Rect::default(), Rect::default(), Rect::default())
        };

        PageLayout {
            sidebar,
            main,
            statusbar,
            header: header[0],
            add_button: header[1],
            search,
            tags,
            summary,
            content: rows.rest(),
        }
    }
}

pub fn render(f: &mut Frame, app: &mut AppState) {
    let layout = app.page_layout();

    sidebar::render_sidebar(f, &mut app.nav, layout.sidebar, app.doc.is_focused(app::NAV));
    render_header(f, app, &layout);
    match app.page {
        Page::Bookmarks => render_bookmarks_page(f, app, &layout),
        Page::MyDay => todo_list::render_todo_list(
            f,
            &app.todos,
            app.todo_selected,
            layout.content,
            app.doc.is_focused(app::LIST),
        ),
        Page::ModalExamples => popups::examples::render_examples_page(
            f,
            &app.gallery,
            layout.content,
            app.doc.is_focused(app::LIST),
        ),
    }
    render_statusbar(f, app, layout.statusbar);

    // Portal pass: modals paint over the page from the lowest z-index up
    for slot in app.modal_stack() {
        render_slot(f, app, slot);
    }
}

fn render_header(f: &mut Frame, app: &AppState, layout: &PageLayout) {
    let title = Paragraph::new(Line::from(Span::styled(
        app.page.title(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));
    f.render_widget(title, layout.header);

    let label = match app.page {
        Page::Bookmarks => "[+ Add bookmark]",
        Page::MyDay => "[+ New task]",
        Page::ModalExamples => return,
    };
    let style = if app.doc.is_focused(app::ADD) {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    f.render_widget(
        Paragraph::new(Span::styled(label, style)).alignment(Alignment::Right),
        layout.add_button,
    );
}

fn render_bookmarks_page(f: &mut Frame, app: &AppState, layout: &PageLayout) {
    input::render_input(
        f,
        "Search",
        &app.search,
        layout.search,
        app.doc.is_focused(app::SEARCH),
    );

    let tags: Vec<Span> = BookmarkManager::all_tags(&app.bookmarks)
        .into_iter()
        .flat_map(|tag| {
            [
                Span::styled(format!("#{}", tag), Style::default().fg(Color::Magenta)),
                Span::raw(" "),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(tags)), layout.tags);

    let filtered = app.filtered();
    let (page, total) = app.pagination();
    let [summary, pages] = Layout::horizontal([Constraint::Min(0), Constraint::Length(12)])
        .areas(layout.summary);
    f.render_widget(
        Paragraph::new(SearchEngine::summary(filtered.len(), app.search.value()))
            .style(Style::default().fg(Color::Gray)),
        summary,
    );
    f.render_widget(
        Paragraph::new(format!("page {}/{}", page, total))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Right),
        pages,
    );

    let page_size = app.page_size().max(1);
    let start = (page - 1) * page_size;
    let visible: Vec<_> = filtered
        .iter()
        .skip(start)
        .take(page_size)
        .filter_map(|idx| app.bookmarks.get(*idx))
        .collect();
    BookmarkList::new(
        &visible,
        app.selected.checked_sub(start),
        app.selection_mode.then_some(&app.selected_ids),
        app.doc.is_focused(app::LIST),
    )
    .render(f, layout.content);
}

fn render_statusbar(f: &mut Frame, app: &AppState, area: Rect) {
    let hints = match app.page {
        Page::Bookmarks if app.selection_mode => {
            "Space toggle | a all | x delete selected | v done"
        }
        Page::Bookmarks => "Enter memo | n new | d delete | v select | / search | ? help | q quit",
        Page::MyDay => "n new task | ? help | q quit",
        Page::ModalExamples => "Enter open example | ? help | q quit",
    };
    let text = match &app.status {
        Some(status) => format!("{} | {}", status, hints),
        None => hints.to_string(),
    };
    let status = Paragraph::new(text).style(Style::default().fg(Color::White).bg(Color::DarkGray));
    f.render_widget(status, area);
}

fn render_slot(f: &mut Frame, app: &AppState, slot: Slot) {
    let screen = app.screen;
    let doc = &app.doc;
    match slot {
        Slot::Add => popups::add_bookmark::render(f, &app.add_modal, &app.add_form, screen, doc),
        Slot::Memo => popups::memo::render(f, &app.memo_modal, &app.memo_editor, screen, doc),
        Slot::Todo => popups::todo::render(f, &app.todo_modal, &app.todo_form, screen, doc),
        Slot::Help => popups::help::render(f, &app.help_modal, screen, doc),
        Slot::Delete => popups::dialog::render(f, &app.delete_dialog, screen, doc),
        Slot::Discard => popups::dialog::render(f, &app.discard_dialog, screen, doc),
        Slot::Notice => popups::dialog::render(f, &app.notice, screen, doc),
        Slot::Gallery(slot) => popups::examples::render_modal(f, &app.gallery, slot, screen, doc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmarks_layout_has_search_rows() {
        let layout = PageLayout::new(Rect::new(0, 0, 100, 30), 24, Page::Bookmarks);
        assert_eq!(layout.sidebar.width, 24);
        assert_eq!(layout.statusbar.y, 29);
        assert_eq!(layout.header.y, 0);
        assert_eq!(layout.add_button.width, ADD_BUTTON_WIDTH);
        assert_eq!(layout.search.y, 2);
        assert_eq!(layout.content.y, 6);
        assert_eq!(layout.content.bottom(), 29);
    }

    #[test]
    fn test_examples_layout_has_no_add_button() {
        let layout = PageLayout::new(Rect::new(0, 0, 100, 30), 24, Page::ModalExamples);
        assert_eq!(layout.add_button, Rect::default());
        assert_eq!(layout.search, Rect::default());
        assert_eq!(layout.content.y, 2);
    }
}
