// Library exports for the binary and integration tests
pub mod app;
pub mod async_tasks;
pub mod bookmarks;
pub mod cli;
pub mod constants;
pub mod error;
pub mod forms;
pub mod gallery;
pub mod memo;
pub mod modal;
pub mod persistence;
pub mod search;
pub mod todos;
pub mod types;
pub mod ui;
