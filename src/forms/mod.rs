//! Form state for the modal content views.
//!
//! Forms own their field values and lay out their focus nodes inside the
//! body rect handed over by the modal. Rendering lives in `ui::widgets::popups`
//! and uses the same area functions, so what is drawn is what is focusable.

pub mod add_bookmark;
pub mod memo_editor;
pub mod text_field;
pub mod todo_form;

pub use add_bookmark::AddBookmarkForm;
pub use memo_editor::MemoEditor;
pub use text_field::TextField;
pub use todo_form::TodoForm;

use ratatui::layout::Rect;

/// What the host should do after a form handled input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Ignored,
    Handled,
    Submit,
    Cancel,
    CopyUrl(String),
    OpenUrl(String),
}

/// Hands out rows top to bottom. Rows past the bottom edge come back with
/// zero height, which keeps their nodes out of the tab order.
pub struct Rows {
    area: Rect,
    y: u16,
}

impl Rows {
    pub fn new(area: Rect) -> Self {
        Rows { area, y: area.y }
    }

    pub fn take(&mut self, height: u16) -> Rect {
        let height = height.min(self.area.bottom().saturating_sub(self.y));
        let row = Rect::new(self.area.x, self.y, self.area.width, height);
        self.y += height;
        row
    }

    pub fn skip(&mut self, height: u16) {
        self.take(height);
    }

    pub fn rest(&mut self) -> Rect {
        self.take(self.area.bottom().saturating_sub(self.y))
    }
}

/// Split a row into fixed-width cells separated by one column
///
/// A width of zero takes whatever is left of the row.
pub fn cells(row: Rect, widths: &[u16]) -> Vec<Rect> {
    let fixed: u16 = widths.iter().filter(|w| **w > 0).map(|w| w + 1).sum();
    let mut x = row.x;
    widths
        .iter()
        .map(|&width| {
            let width = if width == 0 {
                row.width.saturating_sub(fixed + 1)
            } else {
                width
            };
            let width = width.min(row.right().saturating_sub(x));
            let cell = Rect::new(x, row.y, width, row.height);
            x = x.saturating_add(width + 1).min(row.right());
            cell
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_clip_at_bottom() {
        let mut rows = Rows::new(Rect::new(2, 1, 20, 3));
        assert_eq!(rows.take(2), Rect::new(2, 1, 20, 2));
        assert_eq!(rows.take(2), Rect::new(2, 3, 20, 1));
        assert_eq!(rows.take(1).height, 0);
    }

    #[test]
    fn test_cells_fill_and_clip() {
        let row = Rect::new(0, 0, 20, 1);
        let parts = cells(row, &[0, 3, 3]);
        assert_eq!(parts[0], Rect::new(0, 0, 11, 1));
        assert_eq!(parts[1], Rect::new(12, 0, 3, 1));
        assert_eq!(parts[2], Rect::new(16, 0, 3, 1));

        let narrow = cells(Rect::new(0, 0, 5, 1), &[3, 3]);
        assert_eq!(narrow[1].width, 1);
    }
}
