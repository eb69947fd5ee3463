use crate::forms::MemoEditor;
use crate::forms::memo_editor::Target;
use crate::modal::{Document, ModalController};
use crate::ui::widgets::input::{render_input, render_textarea};
use crate::ui::widgets::modal_frame::render_modal_frame;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

fn focused(doc: &Document, target: Target) -> bool {
    doc.active() == Some(&target.id())
}

fn render_button(f: &mut Frame, label: &str, area: Rect, focused: bool, color: Color) {
    let mut style = Style::default().fg(color);
    if focused {
        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
    }
    f.render_widget(Paragraph::new(Span::styled(label, style)), area);
}

pub fn render(
    f: &mut Frame,
    modal: &ModalController,
    editor: &MemoEditor,
    screen: Rect,
    doc: &Document,
) {
    let body = render_modal_frame(f, modal, screen, doc);
    let areas = editor.areas(body);
    let label = Style::default().fg(Color::Gray);

    render_input(
        f,
        "Title",
        &editor.title,
        areas.title,
        focused(doc, Target::Title),
    );

    let url_count = editor.urls().len();
    f.render_widget(
        Paragraph::new(Span::styled("URLs", label)),
        areas.url_label,
    );
    render_button(
        f,
        "[+]",
        areas.url_add,
        focused(doc, Target::UrlAdd),
        Color::Green,
    );
    let toggle = if editor.dropdown_open() { "[▾]" } else { "[▸]" };
    let toggle_color = if url_count == 0 {
        Color::DarkGray
    } else {
        Color::Cyan
    };
    render_button(
        f,
        toggle,
        areas.url_toggle,
        focused(doc, Target::UrlToggle),
        toggle_color,
    );

    if editor.show_new_url() {
        render_input(
            f,
            "New URL",
            &editor.new_url,
            areas.url_input,
            focused(doc, Target::UrlInput),
        );
    }

    for (i, row) in areas.url_rows.iter().enumerate() {
        if let Some(field) = editor.url_field(i) {
            render_input(f, "", field, row.url, focused(doc, Target::Url(i)));
        }
        render_button(f, "[Copy]", row.copy, focused(doc, Target::UrlCopy(i)), Color::Cyan);
        render_button(f, "[Open]", row.open, focused(doc, Target::UrlOpen(i)), Color::Blue);
        render_button(f, "[x]", row.remove, focused(doc, Target::UrlRemove(i)), Color::Red);
    }

    f.render_widget(
        Paragraph::new(Span::styled("Tags", label)),
        areas.tag_label,
    );
    render_input(
        f,
        "",
        &editor.tag_input,
        areas.tag_input,
        focused(doc, Target::TagInput),
    );
    for (i, (tag, area)) in editor.tags().iter().zip(&areas.tags).enumerate() {
        render_button(
            f,
            &format!("#{} ×", tag),
            *area,
            focused(doc, Target::Tag(i)),
            Color::Magenta,
        );
    }

    let mut heading = vec![Span::styled("Memo", label)];
    if editor.has_changes() {
        heading.push(Span::styled("  (modified)", Style::default().fg(Color::Yellow)));
    }
    if let Some(error) = editor.error() {
        heading.push(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(heading)), areas.body_label);
    render_textarea(f, &editor.body, areas.body, focused(doc, Target::Body));
}
