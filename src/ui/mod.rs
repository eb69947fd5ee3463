pub mod input_handler;
pub mod layout;
pub mod widgets;

pub use input_handler::InputHandler;

#[cfg(test)]
mod tests {
    use crate::app::{AppState, SessionOverrides};
    use crate::bookmarks::BookmarkManager;
    use crate::persistence::PersistenceManager;
    use crate::types::{Config, NewBookmark};
    use chrono::Utc;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
    use std::time::Instant;
    use tempfile::TempDir;

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(app: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| super::layout::render(f, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn app() -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let persistence = PersistenceManager::with_dir(dir.path()).unwrap();
        let config = Config {
            animation_ms: 0,
            ..Config::default()
        };
        let mut app = AppState::new(config, SessionOverrides::default(), persistence);
        app.update_screen(100, 30);
        BookmarkManager::add_bookmark(
            &mut app.bookmarks,
            NewBookmark {
                title: "Async book".to_string(),
                tags: vec!["tokio".to_string()],
                url: Some("https://tokio.rs".to_string()),
                memo: "read chapter 3".to_string(),
            },
            Utc::now(),
        )
        .unwrap();
        app.tick(Instant::now());
        (app, dir)
    }

    #[test]
    fn test_render_bookmarks_page() {
        let (mut app, _dir) = app();
        let screen = draw(&mut app);
        assert!(screen.contains("Async book"));
        assert!(screen.contains("#tokio"));
        assert!(screen.contains("read chapter 3"));
        assert!(screen.contains("page 1/1"));
        assert!(screen.contains("1 bookmark"));
    }

    #[test]
    fn test_render_modal_over_page() {
        let (mut app, _dir) = app();
        app.open_memo();
        app.tick(Instant::now());
        let screen = draw(&mut app);
        assert!(screen.contains("Edit Memo"));
        assert!(screen.contains("[x]"));
        assert!(screen.contains("[ Save ]"));
        assert!(screen.contains("#tokio ×"));
    }

    #[test]
    fn test_render_dialog_above_modal() {
        let (mut app, _dir) = app();
        let now = Instant::now();
        app.open_help();
        app.tick(now);
        app.notice.show("Copied to clipboard");
        app.tick(now);
        let screen = draw(&mut app);
        assert!(screen.contains("Copied to clipboard"));
        assert!(screen.contains("[ OK ]"));
    }
}
