use super::{FormAction, Rows, TextField, cells};
use crate::constants::MAX_INPUT_LENGTH;
use crate::modal::{ButtonStyle, FocusId, FocusKind, FocusNode, FooterButton};
use crate::todos::{TodoDraft, TodoManager};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

pub const TASK: &str = "todo.task";
pub const CATEGORY: &str = "todo.category";
pub const DATE: &str = "todo.date";
pub const TIME: &str = "todo.time";
pub const PRIORITY: &str = "todo.priority";
pub const MEMO: &str = "todo.memo";
pub const CANCEL: &str = "todo.cancel";
pub const SUBMIT: &str = "todo.submit";

pub struct TodoAreas {
    pub task: Rect,
    pub category: Rect,
    pub date: Rect,
    pub time: Rect,
    pub priority: Rect,
    pub memo: Rect,
    pub error: Rect,
}

#[derive(Debug, Clone)]
pub struct TodoForm {
    pub task: TextField,
    pub category: TextField,
    pub date: TextField,
    pub time: TextField,
    pub priority: bool,
    pub memo: TextField,
    error: Option<String>,
}

impl Default for TodoForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoForm {
    pub fn new() -> Self {
        TodoForm {
            task: TextField::new(MAX_INPUT_LENGTH),
            category: TextField::new(MAX_INPUT_LENGTH),
            date: TextField::new(10),
            time: TextField::new(5),
            priority: false,
            memo: TextField::new(MAX_INPUT_LENGTH),
            error: None,
        }
    }

    pub fn footer() -> Vec<FooterButton> {
        vec![
            FooterButton::new(CANCEL, "Cancel", ButtonStyle::Secondary),
            FooterButton::new(SUBMIT, "Add", ButtonStyle::Primary).disabled(true),
        ]
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn can_submit(&self) -> bool {
        !self.task.is_blank()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn first_field() -> FocusId {
        FocusId::new(TASK)
    }

    pub fn areas(body: Rect) -> TodoAreas {
        let mut rows = Rows::new(body);
        rows.skip(1);
        let task = rows.take(1);
        rows.skip(1);
        let category = rows.take(1);
        rows.skip(1);
        let when = cells(rows.take(1), &[12, 7]);
        rows.skip(1);
        let priority = cells(rows.take(1), &[16])[0];
        rows.skip(1);
        let memo = rows.take(1);
        rows.skip(1);
        TodoAreas {
            task,
            category,
            date: when[0],
            time: when[1],
            priority,
            memo,
            error: rows.take(1),
        }
    }

    pub fn body_nodes(&self, body: Rect) -> Vec<FocusNode> {
        let areas = Self::areas(body);
        vec![
            FocusNode::new(TASK, FocusKind::Input, areas.task),
            FocusNode::new(CATEGORY, FocusKind::Input, areas.category),
            FocusNode::new(DATE, FocusKind::Input, areas.date),
            FocusNode::new(TIME, FocusKind::Input, areas.time),
            FocusNode::new(PRIORITY, FocusKind::Button, areas.priority),
            FocusNode::new(MEMO, FocusKind::TextArea, areas.memo),
        ]
    }

    fn field_mut(&mut self, id: &str) -> Option<&mut TextField> {
        match id {
            TASK => Some(&mut self.task),
            CATEGORY => Some(&mut self.category),
            DATE => Some(&mut self.date),
            TIME => Some(&mut self.time),
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
            && matches!(focused.as_str(), PRIORITY | CANCEL | SUBMIT)
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

    pub fn activate(&mut self, id: &FocusId) -> FormAction {
        match id.as_str() {
            PRIORITY => {
                self.priority = !self.priority;
                FormAction::Handled
            }
            SUBMIT => self.submit(),
            CANCEL => FormAction::Cancel,
            _ => FormAction::Ignored,
        }
    }

    /// Validate everything up front so a bad date keeps the form open
    fn submit(&mut self) -> FormAction {
        match self.build() {
            Ok(_) => FormAction::Submit,
            Err(e) => {
                self.error = Some(e);
                FormAction::Handled
            }
        }
    }

    pub fn build(&self) -> Result<TodoDraft, String> {
        if !self.can_submit() {
            return Err("Task is required".to_string());
        }
        TodoManager::parse_date(self.date.value())?;
        TodoManager::parse_time(self.time.value())?;
        Ok(TodoDraft {
            task: self.task.value().to_string(),
            category: self.category.value().to_string(),
            date: self.date.value().to_string(),
            time: self.time.value().to_string(),
            priority: self.priority,
            memo: self.memo.value().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_validates_date() {
        let mut form = TodoForm::new();
        form.task.set_value("Review PR");
        form.date.set_value("2025-13-01");
        assert_eq!(form.activate(&FocusId::new(SUBMIT)), FormAction::Handled);
        assert!(form.error().is_some_and(|e| e.contains("2025-13-01")));

        form.date.set_value("2025-12-01");
        form.time.set_value("18:30");
        assert_eq!(form.activate(&FocusId::new(SUBMIT)), FormAction::Submit);
        let draft = form.build().unwrap();
        assert_eq!(draft.date, "2025-12-01");
    }

    #[test]
    fn test_priority_toggles() {
        let mut form = TodoForm::new();
        let priority = FocusId::new(PRIORITY);
        form.handle_key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE), Some(&priority));
        assert!(form.priority);
        form.activate(&priority);
        assert!(!form.priority);
    }

    #[test]
    fn test_typing_into_task_clears_error() {
        let mut form = TodoForm::new();
        form.set_error("Task is required");
        let task = FocusId::new(TASK);
        let outcome = form.handle_key(KeyEvent::new(KeyCode::Char('W'), KeyModifiers::NONE), Some(&task));
        assert_eq!(outcome, FormAction::Handled);
        assert!(form.error().is_none());
        assert_eq!(form.task.value(), "W");
    }

    #[test]
    fn test_time_field_capped() {
        let mut form = TodoForm::new();
        form.time.set_value("09:300");
        assert_eq!(form.time.value(), "09:30");
    }
}
