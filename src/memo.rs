//! Memo bodies are stored as a small HTML subset (paragraphs, line breaks,
//! list items) and edited as plain text lines.

use scraper::{ElementRef, Html};
use textwrap::wrap;

/// Convert editor text into stored HTML, one paragraph per line
pub fn to_html(text: &str) -> String {
    text.lines()
        .map(|line| format!("<p>{}</p>", escape(line)))
        .collect::<Vec<_>>()
        .join("")
}

/// Convert stored HTML back into editor lines
pub fn to_text(html: &str) -> String {
    if !html.contains('<') {
        return html.to_string();
    }

    let fragment = Html::parse_fragment(html);
    let mut lines = Vec::new();
    let mut current = String::new();
    collect_lines(fragment.root_element(), &mut lines, &mut current);
    if !current.is_empty() {
        lines.push(std::mem::take(&mut current));
    }
    lines.join("\n")
}

fn collect_lines(element: ElementRef, lines: &mut Vec<String>, current: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            current.push_str(text);
        } else if let Some(child_elem) = ElementRef::wrap(child) {
            match child_elem.value().name() {
                "br" => lines.push(std::mem::take(current)),
                "p" | "div" | "li" | "h1" | "h2" | "h3" | "blockquote" => {
                    if !current.is_empty() {
                        lines.push(std::mem::take(current));
                    }
                    collect_lines(child_elem, lines, current);
                    lines.push(std::mem::take(current));
                }
                _ => collect_lines(child_elem, lines, current),
            }
        }
    }
}

/// Single-line plain text of a memo, whitespace collapsed
pub fn plain_text(html: &str) -> String {
    to_text(html).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Wrapped preview of a memo for list cards
pub fn preview_lines(html: &str, width: usize, max_lines: usize) -> Vec<String> {
    let text = plain_text(html);
    if text.is_empty() || width == 0 {
        return Vec::new();
    }
    let mut lines: Vec<String> = wrap(&text, width)
        .into_iter()
        .map(|line| line.to_string())
        .collect();
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }
    lines
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_survive_storage() {
        let text = "useState basics\n<T> generics & more";
        assert_eq!(
            to_html(text),
            "<p>useState basics</p><p>&lt;T&gt; generics &amp; more</p>"
        );
        assert_eq!(to_text(&to_html(text)), text);
    }

    #[test]
    fn test_rich_markup_flattens() {
        let html = "<p>Study <strong>hooks</strong></p><ul><li>useState</li><li>useEffect</li></ul>";
        assert_eq!(to_text(html), "Study hooks\nuseState\nuseEffect");
        assert_eq!(plain_text(html), "Study hooks useState useEffect");
    }

    #[test]
    fn test_plain_input_passes_through() {
        assert_eq!(to_text("no markup"), "no markup");
    }

    #[test]
    fn test_preview_truncates() {
        let html = to_html(&"word ".repeat(40));
        let lines = preview_lines(&html, 20, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with('…'));
        assert!(preview_lines("", 20, 2).is_empty());
    }
}
