use crate::constants::{DEFAULT_ANIMATION_MS, DEFAULT_PAGE_SIZE};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    /// Memo body, stored as simple HTML paragraphs
    #[serde(default)]
    pub memo: String,
    pub created: DateTime<Utc>,
}

/// Validated output of the add-bookmark form
#[derive(Debug, Clone, PartialEq)]
pub struct NewBookmark {
    pub title: String,
    pub tags: Vec<String>,
    pub url: Option<String>,
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub task: String,
    #[serde(default)]
    pub category: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub priority: bool,
    #[serde(default)]
    pub memo: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub animation_ms: u64,
    pub page_size: usize,
    pub sidebar_width: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            animation_ms: DEFAULT_ANIMATION_MS,
            page_size: DEFAULT_PAGE_SIZE,
            sidebar_width: 24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    MyDay,
    Bookmarks,
    ModalExamples,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::MyDay => "My Day",
            Page::Bookmarks => "My Bookmarks",
            Page::ModalExamples => "Modal Examples",
        }
    }

    /// Tree identifier used by the sidebar
    pub fn nav_id(self) -> &'static str {
        match self {
            Page::MyDay => "myday",
            Page::Bookmarks => "bookmarks",
            Page::ModalExamples => "examples",
        }
    }

    pub fn from_nav_id(id: &str) -> Option<Page> {
        match id {
            "myday" => Some(Page::MyDay),
            "bookmarks" => Some(Page::Bookmarks),
            "examples" => Some(Page::ModalExamples),
            _ => None,
        }
    }
}

/// Sidebar navigation tree
pub struct NavState {
    pub tree_state: tui_tree_widget::TreeState<String>,
    pub items: Vec<tui_tree_widget::TreeItem<'static, String>>,
}

impl NavState {
    pub fn new(page: Page) -> Self {
        use tui_tree_widget::TreeItem;

        let bookmarks = TreeItem::new_leaf(
            Page::Bookmarks.nav_id().to_string(),
            "Bookmarks".to_string(),
        );
        let study = match TreeItem::new("study".to_string(), "Study".to_string(), vec![bookmarks]) {
            Ok(item) => item,
            Err(e) => {
                tracing::error!("Failed to build study group: {}", e);
                TreeItem::new_leaf("study".to_string(), "Study".to_string())
            }
        };

        let mut nav = NavState {
            tree_state: tui_tree_widget::TreeState::default(),
            items: vec![
                TreeItem::new_leaf(Page::MyDay.nav_id().to_string(), Page::MyDay.title()),
                study,
                TreeItem::new_leaf(
                    Page::ModalExamples.nav_id().to_string(),
                    Page::ModalExamples.title(),
                ),
            ],
        };
        nav.tree_state.open(vec!["study".to_string()]);
        nav.select_page(page);
        nav
    }

    pub fn select_page(&mut self, page: Page) {
        let path = match page {
            Page::Bookmarks => vec!["study".to_string(), page.nav_id().to_string()],
            Page::MyDay | Page::ModalExamples => vec![page.nav_id().to_string()],
        };
        self.tree_state.select(path);
    }

    /// Page under the tree cursor, if the cursor is on a page entry
    pub fn selected_page(&self) -> Option<Page> {
        self.tree_state
            .selected()
            .last()
            .and_then(|id| Page::from_nav_id(id))
    }
}

impl std::fmt::Debug for NavState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavState")
            .field("selected", &self.tree_state.selected())
            .finish()
    }
}
