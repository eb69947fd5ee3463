//! Confirm and alert dialogs: small modals with a prebuilt footer

use super::controller::{
    ButtonStyle, ClickOutcome, CloseReason, FooterButton, KeyOutcome, ModalConfig,
    ModalController, ModalEvent, ModalPhase, ModalSize,
};
use super::focus::{Document, FocusId};
use super::scroll_lock::ScrollLock;
use super::state::ModalState;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Confirm,
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    /// The confirm button was pressed; always followed by `Closed`
    Confirmed,
    Closed,
    AfterClose,
}

#[derive(Debug)]
pub struct Dialog {
    kind: DialogKind,
    modal: ModalController,
    state: ModalState,
    message: String,
    confirm_id: FocusId,
    cancel_id: Option<FocusId>,
    events: Vec<DialogEvent>,
}

impl Dialog {
    pub fn confirm(
        id: u32,
        title: &str,
        confirm_text: &str,
        cancel_text: &str,
        danger: bool,
        scroll_lock: ScrollLock,
    ) -> Self {
        let confirm_id = FocusId::new(format!("dialog.{}.confirm", id));
        let cancel_id = FocusId::new(format!("dialog.{}.cancel", id));
        let style = if danger {
            ButtonStyle::Danger
        } else {
            ButtonStyle::Primary
        };
        let config = ModalConfig::new(title)
            .size(ModalSize::Small)
            .footer(vec![
                FooterButton::new(cancel_id.clone(), cancel_text, ButtonStyle::Secondary),
                FooterButton::new(confirm_id.clone(), confirm_text, style),
            ]);
        Dialog {
            kind: DialogKind::Confirm,
            modal: ModalController::new(id, config, scroll_lock),
            state: ModalState::default(),
            message: "Do you want to continue?".to_string(),
            confirm_id,
            cancel_id: Some(cancel_id),
            events: Vec::new(),
        }
    }

    pub fn alert(id: u32, title: &str, button_text: &str, scroll_lock: ScrollLock) -> Self {
        let confirm_id = FocusId::new(format!("dialog.{}.ok", id));
        let config = ModalConfig::new(title)
            .size(ModalSize::Small)
            .footer(vec![FooterButton::new(
                confirm_id.clone(),
                button_text,
                ButtonStyle::Primary,
            )]);
        Dialog {
            kind: DialogKind::Alert,
            modal: ModalController::new(id, config, scroll_lock),
            state: ModalState::default(),
            message: String::new(),
            confirm_id,
            cancel_id: None,
            events: Vec::new(),
        }
    }

    pub fn with_z_index(mut self, z_index: u16) -> Self {
        self.modal.config_mut().z_index = z_index;
        self
    }

    pub fn with_animation(mut self, animation: Duration) -> Self {
        self.modal.config_mut().animation = animation;
        self
    }

    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn is_mounted(&self) -> bool {
        self.modal.is_mounted()
    }

    pub fn show(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.state.open();
    }

    /// Per-frame step: follow the open flag, mount focus nodes, fire timers
    pub fn frame(&mut self, screen: Rect, now: Instant, doc: &mut Document) {
        self.modal.sync(self.state.is_open(), now, doc);
        self.modal.mount(screen, Vec::new(), doc);
        self.modal.tick(now, doc);
        self.collect();
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant, doc: &mut Document) -> KeyOutcome {
        if self.modal.handle_key(key, now, doc) == KeyOutcome::Handled {
            self.collect();
            return KeyOutcome::Handled;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                let pressed = match doc.active().cloned() {
                    Some(active) => self.activate(&active, now, doc),
                    None => false,
                };
                if pressed {
                    KeyOutcome::Handled
                } else {
                    KeyOutcome::Ignored
                }
            }
            _ => KeyOutcome::Ignored,
        }
    }

    pub fn handle_click(
        &mut self,
        column: u16,
        row: u16,
        screen: Rect,
        now: Instant,
        doc: &mut Document,
    ) -> ClickOutcome {
        let outcome = self.modal.handle_click(column, row, screen, now, doc);
        if let ClickOutcome::Inside(Some(id)) = &outcome {
            self.activate(id, now, doc);
        }
        self.collect();
        outcome
    }

    /// Press the button with this id. Returns false when it is not a dialog button.
    fn activate(&mut self, id: &FocusId, now: Instant, doc: &mut Document) -> bool {
        if *id == self.confirm_id {
            match self.kind {
                DialogKind::Confirm => self.press_confirm(now, doc),
                DialogKind::Alert => self.dismiss(now, doc),
            }
            true
        } else if self.cancel_id.as_ref() == Some(id) {
            self.dismiss(now, doc);
            true
        } else {
            false
        }
    }

    pub fn press_confirm(&mut self, now: Instant, doc: &mut Document) {
        if self.modal.phase() == ModalPhase::Closing || !self.modal.is_mounted() {
            return;
        }
        tracing::info!("Dialog '{}' confirmed", self.modal.config().title);
        self.events.push(DialogEvent::Confirmed);
        self.modal.request_close(CloseReason::Action, now, doc);
        self.collect();
    }

    pub fn dismiss(&mut self, now: Instant, doc: &mut Document) {
        self.modal.request_close(CloseReason::Action, now, doc);
        self.collect();
    }

    fn collect(&mut self) {
        for event in self.modal.drain_events() {
            match event {
                ModalEvent::Close(reason) => {
                    tracing::debug!("Dialog closing ({:?})", reason);
                    self.state.close();
                    self.events.push(DialogEvent::Closed);
                }
                ModalEvent::AfterClose => self.events.push(DialogEvent::AfterClose),
                ModalEvent::Open | ModalEvent::AfterOpen | ModalEvent::CloseBlocked(_) => {}
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<DialogEvent> {
        std::mem::take(&mut self.events)
    }
}
