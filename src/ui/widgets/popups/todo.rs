use crate::forms::TodoForm;
use crate::forms::todo_form::{CATEGORY, DATE, MEMO, PRIORITY, TASK, TIME};
use crate::modal::{Document, ModalController};
use crate::ui::widgets::input::{render_error, render_input, render_label};
use crate::ui::widgets::modal_frame::render_modal_frame;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Paragraph,
};

pub fn render(f: &mut Frame, modal: &ModalController, form: &TodoForm, screen: Rect, doc: &Document) {
    let body = render_modal_frame(f, modal, screen, doc);
    let areas = TodoForm::areas(body);

    render_label(f, "Task *", areas.task, doc.is_focused(TASK));
    render_input(f, "", &form.task, areas.task, doc.is_focused(TASK));
    render_label(f, "Category", areas.category, doc.is_focused(CATEGORY));
    render_input(f, "", &form.category, areas.category, doc.is_focused(CATEGORY));
    render_label(f, "Date (YYYY-MM-DD)  Time", areas.date, doc.is_focused(DATE));
    render_input(f, "", &form.date, areas.date, doc.is_focused(DATE));
    render_input(f, "", &form.time, areas.time, doc.is_focused(TIME));

    let check = if form.priority { "[x]" } else { "[ ]" };
    let mut style = Style::default().fg(if form.priority { Color::Red } else { Color::Gray });
    if doc.is_focused(PRIORITY) {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    f.render_widget(
        Paragraph::new(Span::styled(format!("{} Priority", check), style)),
        areas.priority,
    );

    render_label(f, "Memo", areas.memo, doc.is_focused(MEMO));
    render_input(f, "", &form.memo, areas.memo, doc.is_focused(MEMO));
    render_error(f, form.error(), areas.error);
}
