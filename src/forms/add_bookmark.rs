use super::{FormAction, Rows, TextField};
use crate::bookmarks::BookmarkManager;
use crate::constants::{MAX_INPUT_LENGTH, MAX_QUICK_MEMO_LENGTH, MAX_TITLE_LENGTH};
use crate::modal::{ButtonStyle, FocusId, FocusKind, FocusNode, FooterButton};
use crate::types::NewBookmark;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

pub const TITLE: &str = "add.title";
pub const TAGS: &str = "add.tags";
pub const URL: &str = "add.url";
pub const MEMO: &str = "add.memo";
pub const CANCEL: &str = "add.cancel";
pub const SAVE: &str = "add.save";

/// Input row of each field, in tab order
pub struct AddBookmarkAreas {
    pub title: Rect,
    pub tags: Rect,
    pub url: Rect,
    pub memo: Rect,
    pub error: Rect,
}

#[derive(Debug, Clone)]
pub struct AddBookmarkForm {
    pub title: TextField,
    pub tags: TextField,
    pub url: TextField,
    pub memo: TextField,
    error: Option<String>,
}

impl Default for AddBookmarkForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AddBookmarkForm {
    pub fn new() -> Self {
        AddBookmarkForm {
            title: TextField::new(MAX_TITLE_LENGTH),
            tags: TextField::new(MAX_INPUT_LENGTH),
            url: TextField::new(MAX_INPUT_LENGTH),
            memo: TextField::new(MAX_QUICK_MEMO_LENGTH),
            error: None,
        }
    }

    pub fn footer() -> Vec<FooterButton> {
        vec![
            FooterButton::new(CANCEL, "Cancel", ButtonStyle::Secondary),
            FooterButton::new(SAVE, "Save", ButtonStyle::Primary).disabled(true),
        ]
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn can_save(&self) -> bool {
        !self.title.is_blank()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn first_field() -> FocusId {
        FocusId::new(TITLE)
    }

    /// Label, focus id and field for each row, top to bottom
    pub fn fields(&self) -> [(&'static str, &'static str, &TextField); 4] {
        [
            ("Title *", TITLE, &self.title),
            ("Tags (comma separated)", TAGS, &self.tags),
            ("URL", URL, &self.url),
            ("Quick memo (max 50)", MEMO, &self.memo),
        ]
    }

    pub fn areas(body: Rect) -> AddBookmarkAreas {
        let mut rows = Rows::new(body);
        let mut field = || {
            rows.skip(1);
            let input = rows.take(1);
            rows.skip(1);
            input
        };
        let title = field();
        let tags = field();
        let url = field();
        let memo = field();
        AddBookmarkAreas {
            title,
            tags,
            url,
            memo,
            error: rows.take(1),
        }
    }

    pub fn body_nodes(&self, body: Rect) -> Vec<FocusNode> {
        let areas = Self::areas(body);
        vec![
            FocusNode::new(TITLE, FocusKind::Input, areas.title),
            FocusNode::new(TAGS, FocusKind::Input, areas.tags),
            FocusNode::new(URL, FocusKind::Input, areas.url),
            FocusNode::new(MEMO, FocusKind::Input, areas.memo),
        ]
    }

    fn field_mut(&mut self, id: &str) -> Option<&mut TextField> {
        match id {
            TITLE => Some(&mut self.title),
            TAGS => Some(&mut self.tags),
            URL => Some(&mut self.url),
            MEMO => Some(&mut self.memo),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, focused: Option<&FocusId>) -> FormAction {
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.submit();
        }

        let Some(focused) = focused else {
            return FormAction::Ignored;
        };

        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
            && matches!(focused.as_str(), SAVE | CANCEL)
        {
            return self.activate(focused);
        }
        if key.code == KeyCode::Enter && self.field_mut(focused.as_str()).is_some() {
            return self.submit();
        }

        let consumed = match self.field_mut(focused.as_str()) {
            Some(field) => field.handle_key(key),
            None => false,
        };
        if consumed {
            self.error = None;
            FormAction::Handled
        } else {
            FormAction::Ignored
        }
    }

    /// Press a button by id
    pub fn activate(&mut self, id: &FocusId) -> FormAction {
        match id.as_str() {
            SAVE => self.submit(),
            CANCEL => FormAction::Cancel,
            _ => FormAction::Ignored,
        }
    }

    fn submit(&mut self) -> FormAction {
        if self.can_save() {
            FormAction::Submit
        } else {
            self.error = Some("Title is required".to_string());
            FormAction::Handled
        }
    }

    pub fn build(&self) -> Result<NewBookmark, String> {
        let title = self.title.value().trim();
        if title.is_empty() {
            return Err("Title is required".to_string());
        }
        Ok(NewBookmark {
            title: title.to_string(),
            tags: BookmarkManager::parse_tags(self.tags.value()),
            url: BookmarkManager::normalize_url(self.url.value()),
            memo: self.memo.value().trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_into(form: &mut AddBookmarkForm, id: &str, text: &str) {
        let id = FocusId::new(id);
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)), Some(&id));
        }
    }

    #[test]
    fn test_build_normalizes_input() {
        let mut form = AddBookmarkForm::new();
        type_into(&mut form, TITLE, " React docs ");
        type_into(&mut form, TAGS, "React, JS, ,React");
        type_into(&mut form, URL, "react.dev");
        type_into(&mut form, MEMO, "hooks");

        let draft = form.build().unwrap();
        assert_eq!(draft.title, "React docs");
        assert_eq!(draft.tags, vec!["React", "JS"]);
        assert_eq!(draft.url.as_deref(), Some("https://react.dev"));
        assert_eq!(draft.memo, "hooks");
    }

    #[test]
    fn test_save_requires_title() {
        let mut form = AddBookmarkForm::new();
        let save = FocusId::new(SAVE);
        assert_eq!(form.activate(&save), FormAction::Handled);
        assert_eq!(form.error(), Some("Title is required"));

        type_into(&mut form, TITLE, "x");
        assert!(form.error().is_none());
        assert_eq!(form.activate(&save), FormAction::Submit);
    }

    #[test]
    fn test_ctrl_s_and_enter_submit() {
        let mut form = AddBookmarkForm::new();
        type_into(&mut form, TITLE, "Rust");
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(form.handle_key(ctrl_s, None), FormAction::Submit);
        let url = FocusId::new(URL);
        assert_eq!(form.handle_key(key(KeyCode::Enter), Some(&url)), FormAction::Submit);
        let cancel = FocusId::new(CANCEL);
        assert_eq!(form.handle_key(key(KeyCode::Enter), Some(&cancel)), FormAction::Cancel);
    }

    #[test]
    fn test_typing_clears_error() {
        let mut form = AddBookmarkForm::new();
        form.set_error("Bookmark title cannot be empty");
        let title = FocusId::new(TITLE);
        assert_eq!(
            form.handle_key(key(KeyCode::Char('R')), Some(&title)),
            FormAction::Handled
        );
        assert!(form.error().is_none());
        assert_eq!(form.title.value(), "R");

        let elsewhere = FocusId::new("page.list");
        assert_eq!(
            form.handle_key(key(KeyCode::Char('x')), Some(&elsewhere)),
            FormAction::Ignored
        );
    }

    #[test]
    fn test_memo_capped() {
        let mut form = AddBookmarkForm::new();
        type_into(&mut form, MEMO, &"m".repeat(60));
        assert_eq!(form.memo.value().chars().count(), MAX_QUICK_MEMO_LENGTH);
    }

    #[test]
    fn test_nodes_hidden_when_body_is_short() {
        let form = AddBookmarkForm::new();
        let nodes = form.body_nodes(Rect::new(0, 0, 40, 5));
        assert!(nodes[0].is_visible());
        assert!(!nodes[3].is_visible());
    }
}
