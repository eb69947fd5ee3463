//! Application-wide constants

/// Minimum terminal width required to run the application
pub const MIN_TERMINAL_WIDTH: u16 = 80;

/// Minimum terminal height required to run the application
pub const MIN_TERMINAL_HEIGHT: u16 = 24;

/// Frame duration in milliseconds for the UI render loop (targeting 60 FPS)
pub const FRAME_DURATION_MS: u64 = 16;

/// Default open/close transition length for modals
pub const DEFAULT_ANIMATION_MS: u64 = 300;

/// Upper bound accepted for the `--animation-ms` flag and config value
pub const MAX_ANIMATION_MS: u64 = 2000;

/// Stacking order of regular modals; dialogs stack above them
pub const DEFAULT_MODAL_Z_INDEX: u16 = 1000;

/// Stacking order of confirm/alert dialogs
pub const DIALOG_Z_INDEX: u16 = 1100;

/// Bookmarks shown per list page
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Bounds for the page size CLI parameter
pub const MIN_PAGE_SIZE: usize = 1;
pub const MAX_PAGE_SIZE: usize = 100;

/// Sidebar width bounds
pub const MIN_SIDEBAR_WIDTH: u16 = 18;
pub const MAX_SIDEBAR_WIDTH: u16 = 40;

/// Maximum length for a bookmark title (characters)
pub const MAX_TITLE_LENGTH: usize = 100;

/// Maximum length of the quick memo typed into the add form
pub const MAX_QUICK_MEMO_LENGTH: usize = 50;

/// Maximum number of stored bookmarks
pub const MAX_BOOKMARKS: usize = 1000;

/// Maximum length for search input buffer (characters)
pub const MAX_SEARCH_INPUT_LENGTH: usize = 200;

/// Maximum length for single-line form inputs (characters)
pub const MAX_INPUT_LENGTH: usize = 500;

/// Rows taken by one bookmark card in the list
pub const CARD_HEIGHT: u16 = 3;
