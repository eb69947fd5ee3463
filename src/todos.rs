use crate::types::Todo;
use chrono::{NaiveDate, NaiveTime};

/// Raw planner form input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoDraft {
    pub task: String,
    pub category: String,
    pub date: String,
    pub time: String,
    pub priority: bool,
    pub memo: String,
}

/// Utilities for the my-day planner
pub struct TodoManager;

impl TodoManager {
    /// Append a todo built from form input
    ///
    /// Date and time are optional; when given they must read `YYYY-MM-DD`
    /// and `HH:MM`.
    pub fn add_todo(todos: &mut Vec<Todo>, draft: TodoDraft) -> Result<u64, String> {
        let task = draft.task.trim();
        if task.is_empty() {
            return Err("Task cannot be empty".to_string());
        }

        let date = Self::parse_date(&draft.date)?;
        let time = Self::parse_time(&draft.time)?;
        let id = todos.iter().map(|t| t.id).max().map_or(1, |max| max + 1);

        todos.push(Todo {
            id,
            task: task.to_string(),
            category: draft.category.trim().to_string(),
            date,
            time,
            priority: draft.priority,
            memo: draft.memo.trim().to_string(),
        });
        tracing::info!("Todo added: '{}' ({} total)", task, todos.len());
        Ok(id)
    }

    pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("Invalid date '{}' (expected YYYY-MM-DD)", trimmed))
    }

    pub fn parse_time(input: &str) -> Result<Option<NaiveTime>, String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .map(Some)
            .map_err(|_| format!("Invalid time '{}' (expected HH:MM)", trimmed))
    }

    /// One-line summary: `task | 2025-08-03 09:30`
    pub fn headline(todo: &Todo) -> String {
        let mut when = Vec::new();
        if let Some(date) = todo.date {
            when.push(date.format("%Y-%m-%d").to_string());
        }
        if let Some(time) = todo.time {
            when.push(time.format("%H:%M").to_string());
        }
        if when.is_empty() {
            todo.task.clone()
        } else {
            format!("{} | {}", todo.task, when.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(task: &str, date: &str, time: &str) -> TodoDraft {
        TodoDraft {
            task: task.to_string(),
            category: " study ".to_string(),
            date: date.to_string(),
            time: time.to_string(),
            priority: true,
            memo: String::new(),
        }
    }

    #[test]
    fn test_add_todo() {
        let mut todos = Vec::new();
        let id = TodoManager::add_todo(&mut todos, draft("Read docs", "2025-08-03", "09:30"));
        assert_eq!(id, Ok(1));
        assert_eq!(todos[0].category, "study");
        assert_eq!(TodoManager::headline(&todos[0]), "Read docs | 2025-08-03 09:30");
    }

    #[test]
    fn test_optional_date_and_time() {
        let mut todos = Vec::new();
        TodoManager::add_todo(&mut todos, draft("Walk", "", "")).unwrap();
        assert_eq!(todos[0].date, None);
        assert_eq!(TodoManager::headline(&todos[0]), "Walk");
    }

    #[test]
    fn test_invalid_input_rejected() {
        let mut todos = Vec::new();
        assert!(TodoManager::add_todo(&mut todos, draft("", "", "")).is_err());
        assert!(TodoManager::add_todo(&mut todos, draft("x", "08/03/2025", "")).is_err());
        assert!(TodoManager::add_todo(&mut todos, draft("x", "", "25:00")).is_err());
        assert!(todos.is_empty());
    }
}
