use crate::constants::{MAX_BOOKMARKS, MAX_QUICK_MEMO_LENGTH, MAX_TITLE_LENGTH};
use crate::memo;
use crate::types::{Bookmark, NewBookmark};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref URL_SCHEME: Regex = Regex::new(r"(?i)^https?://").expect("valid scheme pattern");
}

/// Utilities for managing the bookmark collection
pub struct BookmarkManager;

impl BookmarkManager {
    /// Add a new bookmark to the front of the collection
    ///
    /// # Arguments
    /// * `bookmarks` - Mutable bookmark collection to add to
    /// * `draft` - Validated form output
    /// * `now` - Creation timestamp
    ///
    /// # Returns
    /// * `Ok(u64)` - Id of the new bookmark
    /// * `Err(String)` - Empty or overlong title, overlong memo, or limit reached
    pub fn add_bookmark(
        bookmarks: &mut Vec<Bookmark>,
        draft: NewBookmark,
        now: DateTime<Utc>,
    ) -> Result<u64, String> {
        tracing::debug!("Adding bookmark: title='{}'", draft.title);

        let title = draft.title.trim();
        if title.is_empty() {
            tracing::warn!("Bookmark creation failed: empty title");
            return Err("Bookmark title cannot be empty".to_string());
        }

        if title.chars().count() > MAX_TITLE_LENGTH {
            tracing::warn!(
                "Bookmark creation failed: title too long ({} > {})",
                title.chars().count(),
                MAX_TITLE_LENGTH
            );
            return Err(format!(
                "Bookmark title too long (max {} characters)",
                MAX_TITLE_LENGTH
            ));
        }

        if draft.memo.chars().count() > MAX_QUICK_MEMO_LENGTH {
            return Err(format!(
                "Memo too long (max {} characters)",
                MAX_QUICK_MEMO_LENGTH
            ));
        }

        if bookmarks.len() >= MAX_BOOKMARKS {
            tracing::warn!(
                "Bookmark creation failed: max bookmarks ({}) reached",
                MAX_BOOKMARKS
            );
            return Err(format!("Maximum bookmarks ({}) reached", MAX_BOOKMARKS));
        }

        let id = Self::next_id(bookmarks);
        let bookmark = Bookmark {
            id,
            title: title.to_string(),
            tags: draft.tags,
            urls: draft.url.into_iter().collect(),
            memo: memo::to_html(&draft.memo),
            created: now,
        };
        bookmarks.insert(0, bookmark);

        tracing::info!(
            "Bookmark added: '{}' (id {}, {} total bookmarks)",
            title,
            id,
            bookmarks.len()
        );
        Ok(id)
    }

    /// Replace the stored bookmark with the same id
    pub fn update_bookmark(bookmarks: &mut [Bookmark], updated: Bookmark) -> Result<(), String> {
        let title = updated.title.trim();
        if title.is_empty() {
            return Err("Bookmark title cannot be empty".to_string());
        }

        match bookmarks.iter_mut().find(|b| b.id == updated.id) {
            Some(slot) => {
                tracing::info!("Bookmark {} updated", updated.id);
                *slot = Bookmark {
                    title: title.to_string(),
                    ..updated
                };
                Ok(())
            }
            None => {
                tracing::warn!("Bookmark {} not found for update", updated.id);
                Err(format!("Bookmark {} no longer exists", updated.id))
            }
        }
    }

    pub fn delete_bookmark(bookmarks: &mut Vec<Bookmark>, id: u64) -> bool {
        let before = bookmarks.len();
        bookmarks.retain(|b| b.id != id);
        let removed = bookmarks.len() != before;
        if removed {
            tracing::info!("Bookmark {} deleted ({} remaining)", id, bookmarks.len());
        }
        removed
    }

    /// Delete every bookmark whose id is in `ids`, returning how many went
    pub fn delete_many(bookmarks: &mut Vec<Bookmark>, ids: &HashSet<u64>) -> usize {
        let before = bookmarks.len();
        bookmarks.retain(|b| !ids.contains(&b.id));
        let removed = before - bookmarks.len();
        tracing::info!("Deleted {} bookmarks", removed);
        removed
    }

    pub fn next_id(bookmarks: &[Bookmark]) -> u64 {
        bookmarks.iter().map(|b| b.id).max().map_or(1, |max| max + 1)
    }

    /// Trim a URL and prepend `https://` when it has no http(s) scheme
    ///
    /// Returns `None` for blank input.
    pub fn normalize_url(input: &str) -> Option<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if URL_SCHEME.is_match(trimmed) {
            Some(trimmed.to_string())
        } else {
            Some(format!("https://{}", trimmed))
        }
    }

    /// Split a comma separated tag list, dropping blanks and duplicates
    pub fn parse_tags(input: &str) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for raw in input.split(',') {
            let tag = raw.trim().trim_start_matches('#').trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        tags
    }

    /// Append a tag unless it is blank or already present
    pub fn add_tag(tags: &mut Vec<String>, input: &str) -> bool {
        let tag = input.trim().trim_start_matches('#').trim();
        if tag.is_empty() || tags.iter().any(|t| t == tag) {
            return false;
        }
        tags.push(tag.to_string());
        true
    }

    /// All tags in use, sorted and without duplicates
    pub fn all_tags(bookmarks: &[Bookmark]) -> Vec<String> {
        let mut tags: Vec<String> = bookmarks
            .iter()
            .flat_map(|b| b.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }
}
