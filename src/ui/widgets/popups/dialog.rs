use crate::modal::{Dialog, DialogKind, Document};
use crate::ui::widgets::modal_frame::render_modal_frame;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Wrap},
};

pub fn render(f: &mut Frame, dialog: &Dialog, screen: Rect, doc: &Document) {
    let body = render_modal_frame(f, dialog.modal(), screen, doc);
    let color = match dialog.kind() {
        DialogKind::Confirm => Color::White,
        DialogKind::Alert => Color::Green,
    };
    let message = Paragraph::new(dialog.message())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);
    let area = Rect {
        y: body.y.saturating_add(1).min(body.bottom()),
        height: body.height.saturating_sub(1),
        ..body
    };
    f.render_widget(message, area);
}
