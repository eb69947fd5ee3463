use chrono::Utc;
use std::time::Instant;
use tagdan::app::{AppState, SessionOverrides};
use tagdan::bookmarks::BookmarkManager;
use tagdan::forms::FormAction;
use tagdan::persistence::{LocalStore, PersistenceManager, load_bookmark_urls};
use tagdan::types::{Config, NewBookmark};
use tempfile::TempDir;

fn new_app(dir: &TempDir) -> AppState {
    let persistence = PersistenceManager::with_dir(dir.path()).unwrap();
    let config = persistence.load_config().unwrap();
    let config = Config {
        animation_ms: 0,
        ..config
    };
    let mut app = AppState::new(config, SessionOverrides::default(), persistence);
    app.update_screen(100, 40);
    app
}

#[test]
fn bookmarks_and_memo_survive_restart() {
    let dir = TempDir::new().unwrap();
    let now = Instant::now();

    {
        let mut app = new_app(&dir);
        BookmarkManager::add_bookmark(
            &mut app.bookmarks,
            NewBookmark {
                title: "Pin and Unpin".to_string(),
                tags: vec!["async".to_string()],
                url: None,
                memo: String::new(),
            },
            Utc::now(),
        )
        .unwrap();
        app.tick(now);

        app.open_memo();
        app.tick(now);
        app.memo_editor.body.set_value("Self-referential futures");
        app.apply_memo_action(FormAction::Submit);
        app.save_state().unwrap();
    }

    let app = new_app(&dir);
    assert_eq!(app.bookmarks.len(), 1);
    assert_eq!(app.bookmarks[0].title, "Pin and Unpin");
    assert!(app.bookmarks[0].memo.contains("Self-referential futures"));
}

#[test]
fn url_edits_are_mirrored_to_local_store() {
    let dir = TempDir::new().unwrap();
    let now = Instant::now();
    let id;

    {
        let mut app = new_app(&dir);
        id = BookmarkManager::add_bookmark(
            &mut app.bookmarks,
            NewBookmark {
                title: "Tokio".to_string(),
                tags: Vec::new(),
                url: Some("https://tokio.rs".to_string()),
                memo: String::new(),
            },
            Utc::now(),
        )
        .unwrap();
        app.tick(now);
        app.open_memo();
        app.tick(now);

        // Never saved: the URL list still lands in local storage
        app.memo_editor.toggle_new_url();
        app.memo_editor.new_url.set_value("docs.rs/tokio");
        assert!(app.memo_editor.save_new_url(&mut app.store));
    }

    let store = LocalStore::open(dir.path());
    assert_eq!(
        load_bookmark_urls(&store, id),
        vec!["https://tokio.rs", "https://docs.rs/tokio"]
    );
}

#[test]
fn deleting_a_bookmark_drops_its_stored_urls() {
    let dir = TempDir::new().unwrap();
    let now = Instant::now();
    let mut app = new_app(&dir);
    let id = BookmarkManager::add_bookmark(
        &mut app.bookmarks,
        NewBookmark {
            title: "Serde".to_string(),
            tags: Vec::new(),
            url: Some("https://serde.rs".to_string()),
            memo: String::new(),
        },
        Utc::now(),
    )
    .unwrap();
    tagdan::persistence::save_bookmark_urls(&mut app.store, id, &["https://serde.rs".to_string()]);
    app.tick(now);

    app.request_delete_current();
    app.tick(now);
    app.delete_dialog.press_confirm(now, &mut app.doc);
    app.process_events(now);

    assert!(app.bookmarks.is_empty());
    assert!(load_bookmark_urls(&LocalStore::open(dir.path()), id).is_empty());
    assert!(
        PersistenceManager::with_dir(dir.path())
            .unwrap()
            .load_bookmarks()
            .unwrap()
            .is_empty()
    );
}

#[test]
fn malformed_files_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bookmarks.json"), "{ not json").unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"animation_ms": 9000, "page_size": 0, "sidebar_width": 24}"#).unwrap();

    let persistence = PersistenceManager::with_dir(dir.path()).unwrap();
    assert!(persistence.load_bookmarks().unwrap().is_empty());
    let config = persistence.load_config().unwrap();
    assert_eq!(config.animation_ms, 2000);
    assert_eq!(config.page_size, 1);
}
