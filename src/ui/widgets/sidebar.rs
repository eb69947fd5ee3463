use crate::types::NavState;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};
use tui_tree_widget::Tree;

pub fn render_sidebar(f: &mut Frame, nav: &mut NavState, area: Rect, focused: bool) {
    let border_style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(" tagdan ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let tree = match Tree::new(&nav.items) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::error!("Failed to build navigation tree: {}", e);
            f.render_widget(block, area);
            return;
        }
    };
    let tree = tree
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(tree, area, &mut nav.tree_state);
}
