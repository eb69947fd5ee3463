//! Bookmark search
//!
//! A query mixes free text and `#tag` tokens. Free text matches the title or
//! the memo text case-insensitively; every tag token must match one of the
//! bookmark's tags.

use crate::memo;
use crate::types::Bookmark;
use regex::Regex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkQuery {
    pub text: String,
    pub tags: Vec<String>,
}

impl BookmarkQuery {
    pub fn parse(input: &str) -> Self {
        let mut words = Vec::new();
        let mut tags = Vec::new();
        for token in input.split_whitespace() {
            match token.strip_prefix('#') {
                Some(tag) if !tag.is_empty() => tags.push(tag.to_string()),
                Some(_) => {}
                None => words.push(token),
            }
        }
        BookmarkQuery {
            text: words.join(" "),
            tags,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.tags.is_empty()
    }
}

/// Search helper over the bookmark collection
pub struct SearchEngine;

impl SearchEngine {
    /// Indices of bookmarks matching `input`, in collection order
    pub fn filter(bookmarks: &[Bookmark], input: &str) -> Vec<usize> {
        let query = BookmarkQuery::parse(input);
        if query.is_empty() {
            return (0..bookmarks.len()).collect();
        }

        let text_matcher = if query.text.is_empty() {
            None
        } else {
            match Regex::new(&format!("(?i){}", regex::escape(&query.text))) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!("Failed to build search pattern '{}': {}", query.text, e);
                    return Vec::new();
                }
            }
        };

        let results: Vec<usize> = bookmarks
            .iter()
            .enumerate()
            .filter(|(_, bookmark)| {
                let text_ok = text_matcher.as_ref().is_none_or(|regex| {
                    regex.is_match(&bookmark.title)
                        || regex.is_match(&memo::plain_text(&bookmark.memo))
                });
                let tags_ok = query.tags.iter().all(|wanted| {
                    bookmark
                        .tags
                        .iter()
                        .any(|tag| tag.eq_ignore_ascii_case(wanted))
                });
                text_ok && tags_ok
            })
            .map(|(idx, _)| idx)
            .collect();

        tracing::debug!("Search '{}' matched {} bookmarks", input, results.len());
        results
    }

    /// Status line such as `4 bookmarks | search: "hooks" | tags: #React`
    pub fn summary(matches: usize, input: &str) -> String {
        let query = BookmarkQuery::parse(input);
        let noun = if matches == 1 { "bookmark" } else { "bookmarks" };
        let mut summary = format!("{} {}", matches, noun);
        if !query.text.is_empty() {
            summary.push_str(&format!(" | search: \"{}\"", query.text));
        }
        if !query.tags.is_empty() {
            let tags: Vec<String> = query.tags.iter().map(|t| format!("#{}", t)).collect();
            summary.push_str(&format!(" | tags: {}", tags.join(" ")));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bookmark(id: u64, title: &str, tags: &[&str], memo: &str) -> Bookmark {
        Bookmark {
            id,
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            urls: Vec::new(),
            memo: memo.to_string(),
            created: Utc::now(),
        }
    }

    fn sample() -> Vec<Bookmark> {
        vec![
            bookmark(1, "React - useState", &["React"], "<p>study more</p>"),
            bookmark(2, "Rust book", &["Rust"], "<p>ownership chapter</p>"),
            bookmark(3, "TypeScript handbook", &["JS", "TypeScript"], ""),
        ]
    }

    #[test]
    fn test_parse_query() {
        let query = BookmarkQuery::parse("study  #React more #");
        assert_eq!(query.text, "study more");
        assert_eq!(query.tags, vec!["React".to_string()]);
    }

    #[test]
    fn test_empty_query_matches_all() {
        assert_eq!(SearchEngine::filter(&sample(), "  "), vec![0, 1, 2]);
    }

    #[test]
    fn test_text_matches_title_or_memo() {
        let bookmarks = sample();
        assert_eq!(SearchEngine::filter(&bookmarks, "RUST"), vec![1]);
        assert_eq!(SearchEngine::filter(&bookmarks, "ownership"), vec![1]);
    }

    #[test]
    fn test_regex_characters_are_literal() {
        let bookmarks = sample();
        assert_eq!(SearchEngine::filter(&bookmarks, "React - use"), vec![0]);
        assert!(SearchEngine::filter(&bookmarks, "(").is_empty());
    }

    #[test]
    fn test_tag_filter() {
        let bookmarks = sample();
        assert_eq!(SearchEngine::filter(&bookmarks, "#js"), vec![2]);
        assert!(SearchEngine::filter(&bookmarks, "#js #Rust").is_empty());
        assert_eq!(SearchEngine::filter(&bookmarks, "study #React"), vec![0]);
    }

    #[test]
    fn test_summary() {
        assert_eq!(SearchEngine::summary(1, ""), "1 bookmark");
        assert_eq!(
            SearchEngine::summary(4, "hooks #React"),
            "4 bookmarks | search: \"hooks\" | tags: #React"
        );
    }
}
