use crate::forms::AddBookmarkForm;
use crate::modal::{Document, ModalController};
use crate::ui::widgets::input::{render_error, render_input, render_label};
use crate::ui::widgets::modal_frame::render_modal_frame;
use ratatui::{Frame, layout::Rect};

pub fn render(
    f: &mut Frame,
    modal: &ModalController,
    form: &AddBookmarkForm,
    screen: Rect,
    doc: &Document,
) {
    let body = render_modal_frame(f, modal, screen, doc);
    let areas = AddBookmarkForm::areas(body);
    let rects = [areas.title, areas.tags, areas.url, areas.memo];

    for ((label, id, field), area) in form.fields().into_iter().zip(rects) {
        let focused = doc.is_focused(id);
        render_label(f, label, area, focused);
        render_input(f, "", field, area, focused);
    }
    render_error(f, form.error(), areas.error);
}
