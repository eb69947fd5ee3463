use crate::app::{self, AppState, Slot};
use crate::forms::FormAction;
use crate::modal::{ClickOutcome, CloseReason, FocusId, Layer};
use crate::types::Page;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::time::Instant;

pub struct InputHandler;

impl InputHandler {
    /// Route a key press to the topmost modal, or to the page when no modal
    /// is mounted
    pub fn handle_key(app: &mut AppState, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            tracing::info!("Quit requested");
            app.should_quit = true;
            return;
        }

        match app.top_slot() {
            Some(slot) => Self::handle_modal_key(app, slot, key, now),
            None => Self::handle_page_key(app, key),
        }
        app.process_events(now);
    }

    fn handle_modal_key(app: &mut AppState, slot: Slot, key: KeyEvent, now: Instant) {
        let focused = app.doc.active().cloned();
        match slot {
            Slot::Add => match app.add_form.handle_key(key, focused.as_ref()) {
                FormAction::Ignored => {
                    app.add_modal.handle_key(key, now, &mut app.doc);
                }
                action => app.apply_add_action(action, now),
            },
            Slot::Memo => {
                match app
                    .memo_editor
                    .handle_key(key, focused.as_ref(), &mut app.store)
                {
                    FormAction::Ignored => {
                        app.memo_modal.handle_key(key, now, &mut app.doc);
                    }
                    action => app.apply_memo_action(action),
                }
            }
            Slot::Todo => match app.todo_form.handle_key(key, focused.as_ref()) {
                FormAction::Ignored => {
                    app.todo_modal.handle_key(key, now, &mut app.doc);
                }
                action => app.apply_todo_action(action, now),
            },
            Slot::Help => {
                if key.code == KeyCode::Char('?') {
                    app.help_modal
                        .request_close(CloseReason::Action, now, &mut app.doc);
                } else {
                    app.help_modal.handle_key(key, now, &mut app.doc);
                }
            }
            Slot::Delete => {
                app.delete_dialog.handle_key(key, now, &mut app.doc);
            }
            Slot::Discard => {
                app.discard_dialog.handle_key(key, now, &mut app.doc);
            }
            Slot::Notice => {
                app.notice.handle_key(key, now, &mut app.doc);
            }
            Slot::Gallery(slot) => {
                app.gallery.handle_key(slot, key, now, &mut app.doc);
            }
        }
    }

    fn handle_page_key(app: &mut AppState, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                app.doc.cycle(Layer::Page, false);
                return;
            }
            KeyCode::BackTab => {
                app.doc.cycle(Layer::Page, true);
                return;
            }
            _ => {}
        }

        if app.doc.is_focused(app::SEARCH) {
            Self::handle_search(app, key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                app.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                app.open_help();
                return;
            }
            KeyCode::Char('/') if app.page == Page::Bookmarks => {
                app.doc.focus(&FocusId::new(app::SEARCH));
                return;
            }
            KeyCode::Char('n') => {
                app.open_add();
                return;
            }
            _ => {}
        }

        if app.doc.is_focused(app::NAV) {
            Self::handle_nav(app, key);
        } else if app.doc.is_focused(app::ADD) {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                app.open_add();
            }
        } else {
            match app.page {
                Page::Bookmarks => Self::handle_bookmark_list(app, key),
                Page::MyDay => Self::handle_todo_list(app, key),
                Page::ModalExamples => Self::handle_examples(app, key),
            }
        }
    }

    fn handle_search(app: &mut AppState, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                tracing::debug!("Search cleared");
                app.search.clear();
                app.search_changed();
                app.doc.focus(&FocusId::new(app::LIST));
            }
            KeyCode::Enter | KeyCode::Down => {
                app.doc.focus(&FocusId::new(app::LIST));
            }
            _ => {
                if app.search.handle_key(key) {
                    app.search_changed();
                }
            }
        }
    }

    fn handle_nav(app: &mut AppState, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                app.nav.tree_state.key_down();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.nav.tree_state.key_up();
            }
            KeyCode::Char('l') | KeyCode::Right => {
                app.nav.tree_state.key_right();
            }
            KeyCode::Char('h') | KeyCode::Left => {
                app.nav.tree_state.key_left();
            }
            KeyCode::Enter | KeyCode::Char(' ') => app.nav_activate(),
            _ => {}
        }
    }

    fn handle_bookmark_list(app: &mut AppState, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.select_next(),
            KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
            KeyCode::PageDown | KeyCode::Right => app.next_page(),
            KeyCode::PageUp | KeyCode::Left => app.previous_page(),
            KeyCode::Char('v') => app.toggle_selection_mode(),
            KeyCode::Char(' ') if app.selection_mode => app.toggle_selected(),
            KeyCode::Char('a') if app.selection_mode => app.toggle_select_all(),
            KeyCode::Char('x') if app.selection_mode => app.request_delete_selected(),
            KeyCode::Char('d') | KeyCode::Delete => app.request_delete_current(),
            KeyCode::Enter => app.open_memo(),
            _ => {}
        }
    }

    fn handle_todo_list(app: &mut AppState, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.todo_next(),
            KeyCode::Char('k') | KeyCode::Up => app.todo_previous(),
            _ => {}
        }
    }

    fn handle_examples(app: &mut AppState, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.gallery.select_next(),
            KeyCode::Char('k') | KeyCode::Up => app.gallery.select_previous(),
            KeyCode::Enter | KeyCode::Char(' ') => app.gallery.open_selected(),
            _ => {}
        }
    }

    pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent, now: Instant) {
        match mouse.kind {
            MouseEventKind::ScrollDown => app.scroll(true),
            MouseEventKind::ScrollUp => app.scroll(false),
            MouseEventKind::Down(MouseButton::Left) => {
                match app.top_slot() {
                    Some(slot) => Self::handle_modal_click(app, slot, mouse.column, mouse.row, now),
                    None => Self::handle_page_click(app, mouse.column, mouse.row),
                }
                app.process_events(now);
            }
            _ => {}
        }
    }

    fn handle_modal_click(app: &mut AppState, slot: Slot, column: u16, row: u16, now: Instant) {
        let screen = app.screen;
        let doc = &mut app.doc;
        let outcome = match slot {
            Slot::Add => app.add_modal.handle_click(column, row, screen, now, doc),
            Slot::Memo => app.memo_modal.handle_click(column, row, screen, now, doc),
            Slot::Todo => app.todo_modal.handle_click(column, row, screen, now, doc),
            Slot::Help => app.help_modal.handle_click(column, row, screen, now, doc),
            Slot::Delete => app.delete_dialog.handle_click(column, row, screen, now, doc),
            Slot::Discard => app.discard_dialog.handle_click(column, row, screen, now, doc),
            Slot::Notice => app.notice.handle_click(column, row, screen, now, doc),
            Slot::Gallery(slot) => app.gallery.handle_click(slot, column, row, screen, now, doc),
        };

        let ClickOutcome::Inside(Some(id)) = outcome else {
            return;
        };
        match slot {
            Slot::Add => {
                let action = app.add_form.activate(&id);
                app.apply_add_action(action, now);
            }
            Slot::Memo => {
                let action = app.memo_editor.activate(&id, &mut app.store);
                app.apply_memo_action(action);
            }
            Slot::Todo => {
                let action = app.todo_form.activate(&id);
                app.apply_todo_action(action, now);
            }
            _ => {}
        }
    }

    fn handle_page_click(app: &mut AppState, column: u16, row: u16) {
        let Some(id) = app
            .doc
            .hit_test(Layer::Page, column, row)
            .filter(|node| node.is_focusable())
            .map(|node| node.id.clone())
        else {
            return;
        };
        app.doc.focus(&id);

        match id.as_str() {
            app::ADD => app.open_add(),
            app::LIST if app.page == Page::Bookmarks => app.select_at_row(row),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SessionOverrides;
    use crate::persistence::PersistenceManager;
    use crate::types::Config;
    use crossterm::event::KeyEventKind;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let persistence = PersistenceManager::with_dir(dir.path()).unwrap();
        let config = Config {
            animation_ms: 0,
            ..Config::default()
        };
        let mut app = AppState::new(config, SessionOverrides::default(), persistence);
        app.update_screen(100, 40);
        app.tick(Instant::now());
        (app, dir)
    }

    fn type_str(app: &mut AppState, text: &str, now: Instant) {
        for c in text.chars() {
            InputHandler::handle_key(app, key(KeyCode::Char(c)), now);
        }
    }

    #[test]
    fn test_add_bookmark_with_keyboard() {
        let (mut app, _dir) = app();
        let now = Instant::now();

        InputHandler::handle_key(&mut app, key(KeyCode::Char('n')), now);
        app.tick(now);
        assert_eq!(app.top_slot(), Some(Slot::Add));

        type_str(&mut app, "Lifetimes", now);
        InputHandler::handle_key(&mut app, key(KeyCode::Tab), now);
        type_str(&mut app, "rust, types", now);
        InputHandler::handle_key(&mut app, key(KeyCode::Enter), now);
        app.tick(now);

        assert!(app.top_slot().is_none());
        assert_eq!(app.bookmarks.len(), 1);
        assert_eq!(app.bookmarks[0].title, "Lifetimes");
        assert_eq!(app.bookmarks[0].tags, vec!["rust", "types"]);
    }

    #[test]
    fn test_escape_closes_and_restores_focus() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        assert!(app.doc.is_focused(app::LIST));

        InputHandler::handle_key(&mut app, key(KeyCode::Char('?')), now);
        app.tick(now);
        assert_eq!(app.top_slot(), Some(Slot::Help));

        // Page shortcuts do not leak through the modal
        InputHandler::handle_key(&mut app, key(KeyCode::Char('q')), now);
        assert!(!app.should_quit);

        InputHandler::handle_key(&mut app, key(KeyCode::Esc), now);
        app.tick(now);
        assert!(app.top_slot().is_none());
        assert!(app.doc.is_focused(app::LIST));
    }

    #[test]
    fn test_tab_stays_inside_modal() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        app.open_add();
        app.tick(now);

        for _ in 0..20 {
            InputHandler::handle_key(&mut app, key(KeyCode::Tab), now);
            let active = app.doc.active().map(|id| id.as_str().to_string());
            assert!(active.is_some_and(|id| !id.starts_with("page.")));
        }
    }

    #[test]
    fn test_search_typing_and_escape() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        InputHandler::handle_key(&mut app, key(KeyCode::Char('/')), now);
        assert!(app.doc.is_focused(app::SEARCH));

        type_str(&mut app, "qn", now);
        assert_eq!(app.search.value(), "qn");
        assert!(!app.should_quit);

        InputHandler::handle_key(&mut app, key(KeyCode::Esc), now);
        assert!(app.search.value().is_empty());
        assert!(app.doc.is_focused(app::LIST));
    }

    #[test]
    fn test_overlay_click_closes_help() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        app.open_help();
        app.tick(now);

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        InputHandler::handle_mouse(&mut app, click, now);
        app.tick(now);
        assert!(app.top_slot().is_none());
    }

    #[test]
    fn test_ctrl_c_quits_even_with_modal() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        app.open_help();
        app.tick(now);
        let mut ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        ctrl_c.kind = KeyEventKind::Press;
        InputHandler::handle_key(&mut app, ctrl_c, now);
        assert!(app.should_quit);
    }
}
