//! Shared chrome of every modal: dimmed overlay, cleared panel, title or
//! custom header, the `[x]` close button and the footer buttons.

use crate::modal::{ButtonStyle, Document, FooterButton, ModalController, ModalPhase};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph},
};

fn button_style(button: &FooterButton, focused: bool) -> Style {
    let style = if button.disabled {
        Style::default().fg(Color::DarkGray).bg(Color::Rgb(30, 30, 30))
    } else {
        match button.style {
            ButtonStyle::Primary => Style::default().fg(Color::Black).bg(Color::Cyan),
            ButtonStyle::Secondary => Style::default().fg(Color::White).bg(Color::DarkGray),
            ButtonStyle::Danger => Style::default().fg(Color::White).bg(Color::Red),
        }
    };
    if focused && !button.disabled {
        style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        style
    }
}

/// Draw the modal chrome and return the body rect for the content
pub fn render_modal_frame(
    f: &mut Frame,
    modal: &ModalController,
    screen: Rect,
    doc: &Document,
) -> Rect {
    let config = modal.config();
    let layout = modal.layout(screen);

    f.buffer_mut().set_style(
        screen,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM),
    );
    f.render_widget(Clear, layout.panel);

    let border_color = match modal.phase() {
        ModalPhase::Open => Color::Cyan,
        ModalPhase::Opening => Color::Gray,
        ModalPhase::Closing | ModalPhase::Closed => Color::DarkGray,
    };
    let title = match &config.header {
        Some(header) => Span::styled(
            format!(" {} ", header),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(
            format!(" {} ", config.title),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    f.render_widget(block, layout.panel);

    if let Some(area) = layout.close_button {
        let style = if doc.active() == Some(&modal.close_button_id()) {
            Style::default().fg(Color::Black).bg(Color::Red)
        } else {
            Style::default().fg(Color::Red)
        };
        f.render_widget(Paragraph::new(Span::styled("[x]", style)), area);
    }

    for (button, area) in config
        .footer
        .iter()
        .zip(modal.footer_button_areas(layout.footer))
    {
        let focused = doc.active() == Some(&button.id);
        let label = Paragraph::new(format!("[ {} ]", button.label))
            .style(button_style(button, focused))
            .alignment(Alignment::Center);
        f.render_widget(label, area);
    }

    layout.body
}
