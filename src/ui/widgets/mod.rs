//! UI widget components
//!
//! Page widgets (sidebar, bookmark cards, todo list), the shared input
//! field renderer, the modal frame and the modal bodies under `popups`.

pub mod bookmark_list;
pub mod input;
pub mod modal_frame;
pub mod popups;
pub mod sidebar;
pub mod todo_list;
