//! Modal system
//!
//! [`ModalState`] is the caller's open flag, [`ModalController`] runs the
//! open/close lifecycle with focus trapping and the page scroll lock, and
//! [`Dialog`] wraps a controller into confirm and alert variants.

pub mod controller;
pub mod dialog;
pub mod focus;
pub mod scroll_lock;
pub mod state;

pub use controller::{
    ButtonStyle, ClickOutcome, CloseReason, FooterButton, KeyOutcome, ModalConfig,
    ModalController, ModalEvent, ModalLayout, ModalPhase, ModalSize, TransitionTimer,
};
pub use dialog::{Dialog, DialogEvent, DialogKind};
pub use focus::{Document, FocusId, FocusKind, FocusNode, Layer};
pub use scroll_lock::{ScrollLock, ScrollLockGuard};
pub use state::ModalState;
