//! Modal bodies
//!
//! Each popup draws the shared modal frame and then its own content into
//! the body rect, using the same area functions as its form.

pub mod add_bookmark;
pub mod dialog;
pub mod examples;
pub mod help;
pub mod memo;
pub mod todo;
