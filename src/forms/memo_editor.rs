//! Editor for an existing bookmark: title, URL list, tags and memo body.
//!
//! The editor keeps a baseline snapshot taken at load and after each save.
//! `has_changes` compares the live values against it. The URL list is
//! mirrored into the local store on every change so a half-finished edit
//! survives closing the app.

use super::{FormAction, Rows, TextField, cells};
use crate::bookmarks::BookmarkManager;
use crate::constants::{MAX_INPUT_LENGTH, MAX_TITLE_LENGTH};
use crate::memo;
use crate::modal::{ButtonStyle, FocusId, FocusKind, FocusNode, FooterButton};
use crate::persistence::{LocalStore, load_bookmark_urls, save_bookmark_urls};
use crate::types::Bookmark;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

const MEMO_BODY_LIMIT: usize = 10_000;
const TAG_INPUT_WIDTH: u16 = 20;

pub const RESET: &str = "memo.reset";
pub const SAVE: &str = "memo.save";

/// Focusable parts of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Title,
    UrlAdd,
    UrlToggle,
    UrlInput,
    Url(usize),
    UrlCopy(usize),
    UrlOpen(usize),
    UrlRemove(usize),
    TagInput,
    Tag(usize),
    Body,
    Reset,
    Save,
}

impl Target {
    pub fn id(self) -> FocusId {
        let id = match self {
            Target::Title => "memo.title".to_string(),
            Target::UrlAdd => "memo.url.add".to_string(),
            Target::UrlToggle => "memo.url.toggle".to_string(),
            Target::UrlInput => "memo.url.input".to_string(),
            Target::Url(i) => format!("memo.url.{}", i),
            Target::UrlCopy(i) => format!("memo.url.{}.copy", i),
            Target::UrlOpen(i) => format!("memo.url.{}.open", i),
            Target::UrlRemove(i) => format!("memo.url.{}.remove", i),
            Target::TagInput => "memo.tag.input".to_string(),
            Target::Tag(i) => format!("memo.tag.{}", i),
            Target::Body => "memo.body".to_string(),
            Target::Reset => RESET.to_string(),
            Target::Save => SAVE.to_string(),
        };
        FocusId::new(id)
    }

    pub fn parse(id: &str) -> Option<Target> {
        let parts: Vec<&str> = id.split('.').collect();
        let target = match parts.as_slice() {
            ["memo", "title"] => Target::Title,
            ["memo", "url", "add"] => Target::UrlAdd,
            ["memo", "url", "toggle"] => Target::UrlToggle,
            ["memo", "url", "input"] => Target::UrlInput,
            ["memo", "url", idx] => Target::Url(idx.parse().ok()?),
            ["memo", "url", idx, "copy"] => Target::UrlCopy(idx.parse().ok()?),
            ["memo", "url", idx, "open"] => Target::UrlOpen(idx.parse().ok()?),
            ["memo", "url", idx, "remove"] => Target::UrlRemove(idx.parse().ok()?),
            ["memo", "tag", "input"] => Target::TagInput,
            ["memo", "tag", idx] => Target::Tag(idx.parse().ok()?),
            ["memo", "body"] => Target::Body,
            ["memo", "reset"] => Target::Reset,
            ["memo", "save"] => Target::Save,
            _ => return None,
        };
        Some(target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Snapshot {
    title: String,
    urls: Vec<String>,
    tags: Vec<String>,
    body: String,
}

/// One row of the URL dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlRowAreas {
    pub url: Rect,
    pub copy: Rect,
    pub open: Rect,
    pub remove: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoAreas {
    pub title: Rect,
    pub url_label: Rect,
    pub url_add: Rect,
    pub url_toggle: Rect,
    pub url_input: Rect,
    pub url_rows: Vec<UrlRowAreas>,
    pub tag_label: Rect,
    pub tag_input: Rect,
    pub tags: Vec<Rect>,
    pub body_label: Rect,
    pub body: Rect,
}

#[derive(Debug, Clone)]
pub struct MemoEditor {
    bookmark: Option<Bookmark>,
    baseline: Snapshot,
    pub title: TextField,
    urls: Vec<TextField>,
    tags: Vec<String>,
    pub tag_input: TextField,
    pub new_url: TextField,
    show_new_url: bool,
    dropdown_open: bool,
    pub body: TextField,
    error: Option<String>,
}

impl Default for MemoEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoEditor {
    pub fn new() -> Self {
        MemoEditor {
            bookmark: None,
            baseline: Snapshot::default(),
            title: TextField::new(MAX_TITLE_LENGTH),
            urls: Vec::new(),
            tags: Vec::new(),
            tag_input: TextField::new(MAX_INPUT_LENGTH),
            new_url: TextField::new(MAX_INPUT_LENGTH),
            show_new_url: false,
            dropdown_open: false,
            body: TextField::multiline(MEMO_BODY_LIMIT),
            error: None,
        }
    }

    pub fn footer() -> Vec<FooterButton> {
        vec![
            FooterButton::new(RESET, "Reset", ButtonStyle::Secondary).disabled(true),
            FooterButton::new(SAVE, "Save", ButtonStyle::Primary).disabled(true),
        ]
    }

    /// Start editing a bookmark. Stored URLs win over the record's own list.
    pub fn load(&mut self, bookmark: &Bookmark, store: &LocalStore) {
        let stored = load_bookmark_urls(store, bookmark.id);
        let urls = if stored.is_empty() {
            bookmark.urls.clone()
        } else {
            stored
        };

        *self = Self::new();
        self.bookmark = Some(bookmark.clone());
        self.baseline = Snapshot {
            title: bookmark.title.clone(),
            urls,
            tags: bookmark.tags.clone(),
            body: memo::to_text(&bookmark.memo),
        };
        self.restore_baseline();
        tracing::debug!("Memo editor loaded bookmark {}", bookmark.id);
    }

    pub fn bookmark_id(&self) -> Option<u64> {
        self.bookmark.as_ref().map(|b| b.id)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.iter().map(|f| f.value().to_string()).collect()
    }

    pub fn url_field(&self, idx: usize) -> Option<&TextField> {
        self.urls.get(idx)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn show_new_url(&self) -> bool {
        self.show_new_url
    }

    pub fn dropdown_open(&self) -> bool {
        self.dropdown_open && !self.urls.is_empty()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn first_field() -> FocusId {
        Target::Title.id()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            title: self.title.value().to_string(),
            urls: self.urls(),
            tags: self.tags.clone(),
            body: self.body.value().to_string(),
        }
    }

    pub fn has_changes(&self) -> bool {
        self.bookmark.is_some() && self.snapshot() != self.baseline
    }

    fn restore_baseline(&mut self) {
        self.title.set_value(&self.baseline.title);
        self.urls = self
            .baseline
            .urls
            .iter()
            .map(|url| {
                let mut field = TextField::new(MAX_INPUT_LENGTH);
                field.set_value(url);
                field
            })
            .collect();
        self.tags = self.baseline.tags.clone();
        self.body.set_value(&self.baseline.body);
    }

    fn persist_urls(&self, store: &mut LocalStore) {
        if let Some(id) = self.bookmark_id() {
            save_bookmark_urls(store, id, &self.urls());
        }
    }

    pub fn add_tag(&mut self) -> bool {
        let added = BookmarkManager::add_tag(&mut self.tags, self.tag_input.value());
        if added {
            self.tag_input.clear();
        }
        added
    }

    pub fn remove_tag(&mut self, idx: usize) {
        if idx < self.tags.len() {
            let tag = self.tags.remove(idx);
            tracing::debug!("Removed tag '{}'", tag);
        }
    }

    pub fn toggle_new_url(&mut self) {
        self.show_new_url = !self.show_new_url;
        if self.show_new_url {
            self.new_url.clear();
        }
    }

    pub fn save_new_url(&mut self, store: &mut LocalStore) -> bool {
        let Some(url) = BookmarkManager::normalize_url(self.new_url.value()) else {
            return false;
        };
        let mut field = TextField::new(MAX_INPUT_LENGTH);
        field.set_value(&url);
        self.urls.push(field);
        self.new_url.clear();
        self.show_new_url = false;
        self.persist_urls(store);
        true
    }

    pub fn cancel_new_url(&mut self) {
        self.new_url.clear();
        self.show_new_url = false;
    }

    /// Edit one URL in place
    pub fn edit_url(&mut self, idx: usize, key: KeyEvent, store: &mut LocalStore) -> bool {
        let consumed = match self.urls.get_mut(idx) {
            Some(field) => field.handle_key(key),
            None => false,
        };
        if consumed {
            self.persist_urls(store);
        }
        consumed
    }

    pub fn remove_url(&mut self, idx: usize, store: &mut LocalStore) {
        if idx >= self.urls.len() {
            return;
        }
        self.urls.remove(idx);
        if self.urls.is_empty() {
            self.dropdown_open = false;
        }
        self.persist_urls(store);
    }

    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
    }

    /// Commit the edit and move the baseline to the saved values
    pub fn save(&mut self) -> Result<Bookmark, String> {
        let Some(original) = &self.bookmark else {
            return Err("No bookmark loaded".to_string());
        };
        let title = self.title.value().trim();
        if title.is_empty() {
            self.error = Some("Title is required".to_string());
            return Err("Title is required".to_string());
        }

        let updated = Bookmark {
            title: title.to_string(),
            urls: self.urls(),
            tags: self.tags.clone(),
            memo: memo::to_html(self.body.value()),
            ..original.clone()
        };
        self.bookmark = Some(updated.clone());
        self.baseline = self.snapshot();
        self.error = None;
        tracing::info!("Memo saved for bookmark {}", updated.id);
        Ok(updated)
    }

    /// Drop unsaved edits
    pub fn reset(&mut self, store: &mut LocalStore) {
        self.restore_baseline();
        self.error = None;
        self.persist_urls(store);
    }

    pub fn areas(&self, body: Rect) -> MemoAreas {
        let mut rows = Rows::new(body);

        rows.skip(1);
        let title = rows.take(1);
        rows.skip(1);

        let url_header = cells(rows.take(1), &[6, 3, 3]);
        let url_input = if self.show_new_url {
            rows.take(1)
        } else {
            rows.take(0)
        };
        let url_rows = if self.dropdown_open() {
            self.urls
                .iter()
                .map(|_| {
                    let row = cells(rows.take(1), &[0, 6, 6, 3]);
                    UrlRowAreas {
                        url: row[0],
                        copy: row[1],
                        open: row[2],
                        remove: row[3],
                    }
                })
                .collect()
        } else {
            Vec::new()
        };
        rows.skip(1);

        let tag_row = rows.take(1);
        let tag_label = cells(tag_row, &[6])[0];
        let mut widths = vec![6, TAG_INPUT_WIDTH];
        widths.extend(self.tags.iter().map(|t| t.chars().count() as u16 + 3));
        let tag_cells = cells(tag_row, &widths);
        rows.skip(1);

        let body_label = rows.take(1);
        let body = rows.rest();

        MemoAreas {
            title,
            url_label: url_header[0],
            url_add: url_header[1],
            url_toggle: url_header[2],
            url_input,
            url_rows,
            tag_label,
            tag_input: tag_cells[1],
            tags: tag_cells[2..].to_vec(),
            body_label,
            body,
        }
    }

    pub fn body_nodes(&self, body: Rect) -> Vec<FocusNode> {
        let areas = self.areas(body);
        let mut nodes = vec![
            FocusNode::new(Target::Title.id(), FocusKind::Input, areas.title),
            FocusNode::new(Target::UrlAdd.id(), FocusKind::Button, areas.url_add),
            FocusNode::new(Target::UrlToggle.id(), FocusKind::Button, areas.url_toggle)
                .disabled(self.urls.is_empty()),
            FocusNode::new(Target::UrlInput.id(), FocusKind::Input, areas.url_input),
        ];
        for (i, row) in areas.url_rows.iter().enumerate() {
            nodes.push(FocusNode::new(Target::Url(i).id(), FocusKind::Input, row.url));
            nodes.push(FocusNode::new(
                Target::UrlCopy(i).id(),
                FocusKind::Button,
                row.copy,
            ));
            nodes.push(FocusNode::new(
                Target::UrlOpen(i).id(),
                FocusKind::Link { has_target: true },
                row.open,
            ));
            nodes.push(FocusNode::new(
                Target::UrlRemove(i).id(),
                FocusKind::Button,
                row.remove,
            ));
        }
        nodes.push(FocusNode::new(
            Target::TagInput.id(),
            FocusKind::Input,
            areas.tag_input,
        ));
        for (i, area) in areas.tags.iter().enumerate() {
            nodes.push(FocusNode::new(Target::Tag(i).id(), FocusKind::Button, *area));
        }
        nodes.push(FocusNode::new(Target::Body.id(), FocusKind::Editable, areas.body));
        nodes
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        focused: Option<&FocusId>,
        store: &mut LocalStore,
    ) -> FormAction {
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.submit();
        }

        let Some(target) = focused.and_then(|id| Target::parse(id.as_str())) else {
            return FormAction::Ignored;
        };

        let pressed = matches!(key.code, KeyCode::Enter | KeyCode::Char(' '));
        match target {
            Target::Title => self.edit(key, |editor| &mut editor.title),
            Target::Body => self.edit(key, |editor| &mut editor.body),
            Target::UrlInput => match key.code {
                KeyCode::Enter => {
                    self.save_new_url(store);
                    FormAction::Handled
                }
                KeyCode::Esc => {
                    self.cancel_new_url();
                    FormAction::Handled
                }
                _ => self.edit(key, |editor| &mut editor.new_url),
            },
            Target::TagInput => match key.code {
                KeyCode::Enter => {
                    self.add_tag();
                    FormAction::Handled
                }
                _ => self.edit(key, |editor| &mut editor.tag_input),
            },
            Target::Url(idx) => {
                if key.code == KeyCode::Enter {
                    FormAction::Handled
                } else if self.edit_url(idx, key, store) {
                    FormAction::Handled
                } else {
                    FormAction::Ignored
                }
            }
            Target::Tag(idx) if matches!(key.code, KeyCode::Delete | KeyCode::Backspace) => {
                self.remove_tag(idx);
                FormAction::Handled
            }
            _ if pressed => self.activate_target(target, store),
            _ => FormAction::Ignored,
        }
    }

    fn edit(&mut self, key: KeyEvent, field: impl FnOnce(&mut Self) -> &mut TextField) -> FormAction {
        if field(self).handle_key(key) {
            self.error = None;
            FormAction::Handled
        } else {
            FormAction::Ignored
        }
    }

    /// Press a button by id
    pub fn activate(&mut self, id: &FocusId, store: &mut LocalStore) -> FormAction {
        match Target::parse(id.as_str()) {
            Some(target) => self.activate_target(target, store),
            None => FormAction::Ignored,
        }
    }

    fn activate_target(&mut self, target: Target, store: &mut LocalStore) -> FormAction {
        match target {
            Target::UrlAdd => {
                self.toggle_new_url();
                FormAction::Handled
            }
            Target::UrlToggle => {
                self.toggle_dropdown();
                FormAction::Handled
            }
            Target::UrlCopy(idx) => self
                .urls
                .get(idx)
                .map_or(FormAction::Ignored, |f| FormAction::CopyUrl(f.value().to_string())),
            Target::UrlOpen(idx) => self
                .urls
                .get(idx)
                .map_or(FormAction::Ignored, |f| FormAction::OpenUrl(f.value().to_string())),
            Target::UrlRemove(idx) => {
                self.remove_url(idx, store);
                FormAction::Handled
            }
            Target::Tag(idx) => {
                self.remove_tag(idx);
                FormAction::Handled
            }
            Target::Reset => {
                if self.has_changes() {
                    self.reset(store);
                }
                FormAction::Handled
            }
            Target::Save => self.submit(),
            Target::Title | Target::UrlInput | Target::Url(_) | Target::TagInput | Target::Body => {
                FormAction::Ignored
            }
        }
    }

    fn submit(&self) -> FormAction {
        if self.has_changes() {
            FormAction::Submit
        } else {
            FormAction::Handled
        }
    }
}
