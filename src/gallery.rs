//! Modal examples page
//!
//! One modal per size or feature variant plus a confirm and an alert dialog.
//! Every lifecycle event lands in a short log shown on the page.

use crate::constants::{DIALOG_Z_INDEX, MAX_INPUT_LENGTH};
use crate::forms::{Rows, TextField};
use crate::modal::{
    ButtonStyle, ClickOutcome, CloseReason, Dialog, DialogEvent, Document, FocusId, FocusKind,
    FocusNode, FooterButton, KeyOutcome, ModalConfig, ModalController, ModalEvent, ModalSize,
    ModalState, ScrollLock,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const GALLERY_BASE_ID: u32 = 10;
pub const CONFIRM_ID: u32 = 23;
pub const ALERT_ID: u32 = 24;
const LOG_CAPACITY: usize = 8;

pub const FORM_NAME: &str = "gallery.form.name";
pub const FORM_EMAIL: &str = "gallery.form.email";
const FORM_CANCEL: &str = "gallery.form.cancel";
const FORM_SUBMIT: &str = "gallery.form.submit";
const LARGE_BODY: &str = "gallery.large.body";
const LARGE_CLOSE: &str = "gallery.large.close";
const CUSTOM_CANCEL: &str = "gallery.custom.cancel";
const CUSTOM_OK: &str = "gallery.custom.ok";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleKind {
    Basic,
    ContactForm,
    Large,
    Custom,
    Confirm,
    Alert,
}

impl ExampleKind {
    pub const ALL: [ExampleKind; 6] = [
        ExampleKind::Basic,
        ExampleKind::ContactForm,
        ExampleKind::Large,
        ExampleKind::Custom,
        ExampleKind::Confirm,
        ExampleKind::Alert,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExampleKind::Basic => "Basic modal",
            ExampleKind::ContactForm => "Contact form",
            ExampleKind::Large => "Large modal",
            ExampleKind::Custom => "Custom header & footer",
            ExampleKind::Confirm => "Confirm dialog",
            ExampleKind::Alert => "Alert dialog",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExampleKind::Basic => "small size, closes on Esc, overlay click or [x]",
            ExampleKind::ContactForm => "default size with form fields and a footer",
            ExampleKind::Large => "large size with scrollable content",
            ExampleKind::Custom => "full screen, custom header, no close button",
            ExampleKind::Confirm => "confirm / cancel with a danger action",
            ExampleKind::Alert => "single OK button",
        }
    }

    fn config(self) -> ModalConfig {
        match self {
            ExampleKind::Basic => ModalConfig::new("Basic modal").size(ModalSize::Small),
            ExampleKind::ContactForm => ModalConfig::new("Contact form").footer(vec![
                FooterButton::new(FORM_CANCEL, "Cancel", ButtonStyle::Secondary),
                FooterButton::new(FORM_SUBMIT, "Submit", ButtonStyle::Primary),
            ]),
            ExampleKind::Large => ModalConfig::new("Large modal with rich content")
                .size(ModalSize::Large)
                .footer(vec![FooterButton::new(
                    LARGE_CLOSE,
                    "Close",
                    ButtonStyle::Secondary,
                )]),
            ExampleKind::Custom => ModalConfig::new("Custom modal")
                .size(ModalSize::Full)
                .header("★ Custom header  (Esc to leave)")
                .footer(vec![
                    FooterButton::new(CUSTOM_CANCEL, "Cancel", ButtonStyle::Secondary),
                    FooterButton::new(CUSTOM_OK, "Got it", ButtonStyle::Primary),
                ]),
            ExampleKind::Confirm | ExampleKind::Alert => {
                ModalConfig::new(self.label()).size(ModalSize::Small)
            }
        }
    }
}

/// Which gallery modal a caller is talking to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GallerySlot {
    Modal(usize),
    Confirm,
    Alert,
}

#[derive(Debug)]
pub struct GalleryModal {
    pub kind: ExampleKind,
    pub modal: ModalController,
    pub state: ModalState,
}

#[derive(Debug)]
pub struct Gallery {
    pub entries: Vec<GalleryModal>,
    pub confirm: Dialog,
    pub alert: Dialog,
    pub name: TextField,
    pub email: TextField,
    pub selected: usize,
    log: VecDeque<String>,
}

impl Gallery {
    pub fn new(scroll_lock: ScrollLock, animation: Duration) -> Self {
        let entries = [
            ExampleKind::Basic,
            ExampleKind::ContactForm,
            ExampleKind::Large,
            ExampleKind::Custom,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, kind)| GalleryModal {
            kind,
            modal: ModalController::new(
                GALLERY_BASE_ID + i as u32,
                kind.config().animation(animation),
                scroll_lock.clone(),
            ),
            state: ModalState::default(),
        })
        .collect();

        Gallery {
            entries,
            confirm: Dialog::confirm(
                CONFIRM_ID,
                "Delete item",
                "Delete",
                "Cancel",
                true,
                scroll_lock.clone(),
            )
            .with_z_index(DIALOG_Z_INDEX)
            .with_animation(animation),
            alert: Dialog::alert(ALERT_ID, "Notice", "OK", scroll_lock)
                .with_z_index(DIALOG_Z_INDEX)
                .with_animation(animation),
            name: TextField::new(MAX_INPUT_LENGTH),
            email: TextField::new(MAX_INPUT_LENGTH),
            selected: 0,
            log: VecDeque::with_capacity(LOG_CAPACITY),
        }
    }

    pub fn log(&self) -> impl Iterator<Item = &String> {
        self.log.iter()
    }

    fn record(&mut self, line: String) {
        tracing::debug!("Gallery: {}", line);
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }

    /// Mounted controllers with the slot that owns them
    pub fn controllers(&self) -> Vec<(GallerySlot, &ModalController)> {
        let mut controllers: Vec<(GallerySlot, &ModalController)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (GallerySlot::Modal(i), &entry.modal))
            .collect();
        controllers.push((GallerySlot::Confirm, self.confirm.modal()));
        controllers.push((GallerySlot::Alert, self.alert.modal()));
        controllers
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1).min(ExampleKind::ALL.len() - 1);
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn open_selected(&mut self) {
        if let Some(kind) = ExampleKind::ALL.get(self.selected) {
            self.open(*kind);
        }
    }

    pub fn open(&mut self, kind: ExampleKind) {
        tracing::info!("Opening example: {}", kind.label());
        match kind {
            ExampleKind::Confirm => self.confirm.show("This item will be deleted. Continue?"),
            ExampleKind::Alert => self.alert.show("Your changes were saved."),
            _ => {
                if let Some(entry) = self.entries.iter_mut().find(|e| e.kind == kind) {
                    entry.state.open();
                }
            }
        }
    }

    pub fn form_areas(body: Rect) -> (Rect, Rect) {
        let mut rows = Rows::new(body);
        rows.skip(1);
        let name = rows.take(1);
        rows.skip(1);
        let email = rows.take(1);
        (name, email)
    }

    fn body_nodes(&self, kind: ExampleKind, body: Rect) -> Vec<FocusNode> {
        match kind {
            ExampleKind::ContactForm => {
                let (name, email) = Self::form_areas(body);
                vec![
                    FocusNode::new(FORM_NAME, FocusKind::Input, name),
                    FocusNode::new(FORM_EMAIL, FocusKind::Input, email),
                ]
            }
            ExampleKind::Large => {
                vec![FocusNode::new(LARGE_BODY, FocusKind::Container, body).tab_index(0)]
            }
            _ => Vec::new(),
        }
    }

    pub fn frame(&mut self, screen: Rect, now: Instant, doc: &mut Document) {
        for i in 0..self.entries.len() {
            let kind = self.entries[i].kind;
            let body = self.entries[i].modal.layout(screen).body;
            let nodes = self.body_nodes(kind, body);
            let entry = &mut self.entries[i];
            entry.modal.sync(entry.state.is_open(), now, doc);
            entry.modal.mount(screen, nodes, doc);
            entry.modal.tick(now, doc);
        }
        self.confirm.frame(screen, now, doc);
        self.alert.frame(screen, now, doc);
        self.process_events(doc);
    }

    pub fn process_events(&mut self, doc: &mut Document) {
        for i in 0..self.entries.len() {
            let kind = self.entries[i].kind;
            for event in self.entries[i].modal.drain_events() {
                match event {
                    ModalEvent::Open => self.record(format!("{}: open", kind.label())),
                    ModalEvent::AfterOpen => {
                        if kind == ExampleKind::ContactForm {
                            doc.focus(&FocusId::new(FORM_NAME));
                        }
                        self.record(format!("{}: after open", kind.label()));
                    }
                    ModalEvent::Close(reason) => {
                        self.entries[i].state.close();
                        self.record(format!("{}: close ({:?})", kind.label(), reason));
                    }
                    ModalEvent::AfterClose => {
                        self.record(format!("{}: after close", kind.label()))
                    }
                    ModalEvent::CloseBlocked(_) => {}
                }
            }
        }

        for (label, events) in [
            ("Confirm dialog", self.confirm.drain_events()),
            ("Alert dialog", self.alert.drain_events()),
        ] {
            for event in events {
                let line = match event {
                    DialogEvent::Confirmed => format!("{}: confirmed", label),
                    DialogEvent::Closed => format!("{}: close", label),
                    DialogEvent::AfterClose => format!("{}: after close", label),
                };
                self.record(line);
            }
        }
    }

    pub fn handle_key(
        &mut self,
        slot: GallerySlot,
        key: KeyEvent,
        now: Instant,
        doc: &mut Document,
    ) -> KeyOutcome {
        let outcome = match slot {
            GallerySlot::Confirm => self.confirm.handle_key(key, now, doc),
            GallerySlot::Alert => self.alert.handle_key(key, now, doc),
            GallerySlot::Modal(i) => self.handle_modal_key(i, key, now, doc),
        };
        self.process_events(doc);
        outcome
    }

    fn handle_modal_key(
        &mut self,
        i: usize,
        key: KeyEvent,
        now: Instant,
        doc: &mut Document,
    ) -> KeyOutcome {
        let focused = doc.active().cloned();
        if let Some(id) = &focused {
            if key.code == KeyCode::Enter && matches!(id.as_str(), FORM_NAME | FORM_EMAIL) {
                self.activate(i, &FocusId::new(FORM_SUBMIT), now, doc);
                return KeyOutcome::Handled;
            }
            let field = match id.as_str() {
                FORM_NAME => Some(&mut self.name),
                FORM_EMAIL => Some(&mut self.email),
                _ => None,
            };
            if let Some(field) = field
                && field.handle_key(key)
            {
                return KeyOutcome::Handled;
            }
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
                && self.activate(i, id, now, doc)
            {
                return KeyOutcome::Handled;
            }
        }

        match self.entries.get_mut(i) {
            Some(entry) => entry.modal.handle_key(key, now, doc),
            None => KeyOutcome::Ignored,
        }
    }

    pub fn handle_click(
        &mut self,
        slot: GallerySlot,
        column: u16,
        row: u16,
        screen: Rect,
        now: Instant,
        doc: &mut Document,
    ) -> ClickOutcome {
        let outcome = match slot {
            GallerySlot::Confirm => self.confirm.handle_click(column, row, screen, now, doc),
            GallerySlot::Alert => self.alert.handle_click(column, row, screen, now, doc),
            GallerySlot::Modal(i) => match self.entries.get_mut(i) {
                Some(entry) => {
                    let outcome = entry.modal.handle_click(column, row, screen, now, doc);
                    if let ClickOutcome::Inside(Some(id)) = &outcome {
                        self.activate(i, id, now, doc);
                    }
                    outcome
                }
                None => ClickOutcome::Ignored,
            },
        };
        self.process_events(doc);
        outcome
    }

    /// Press a button inside an example modal. Returns false for non-buttons.
    fn activate(&mut self, i: usize, id: &FocusId, now: Instant, doc: &mut Document) -> bool {
        match id.as_str() {
            FORM_SUBMIT => {
                let line = format!(
                    "Contact form: submitted {} <{}>",
                    self.name.value().trim(),
                    self.email.value().trim()
                );
                self.record(line);
                self.name.clear();
                self.email.clear();
            }
            FORM_CANCEL | LARGE_CLOSE | CUSTOM_CANCEL | CUSTOM_OK => {}
            other => {
                let Some(entry) = self.entries.get_mut(i) else {
                    return false;
                };
                if other == entry.modal.close_button_id().as_str() {
                    entry.modal.request_close(CloseReason::CloseButton, now, doc);
                    return true;
                }
                return false;
            }
        }
        if let Some(entry) = self.entries.get_mut(i) {
            entry.modal.request_close(CloseReason::Action, now, doc);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 100,
        height: 40,
    };

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn settle(gallery: &mut Gallery, doc: &mut Document, now: Instant) {
        gallery.frame(SCREEN, now, doc);
        gallery.frame(SCREEN, now + Duration::from_millis(300), doc);
    }

    #[test]
    fn test_lifecycle_is_logged() {
        let mut doc = Document::new();
        let start = Instant::now();
        let mut gallery = Gallery::new(ScrollLock::new(), Duration::from_millis(300));
        gallery.open(ExampleKind::Basic);
        settle(&mut gallery, &mut doc, start);

        let later = start + Duration::from_millis(400);
        gallery.handle_key(GallerySlot::Modal(0), key(KeyCode::Esc), later, &mut doc);
        settle(&mut gallery, &mut doc, later);

        let log: Vec<&String> = gallery.log().collect();
        assert_eq!(
            log,
            vec![
                "Basic modal: open",
                "Basic modal: after open",
                "Basic modal: close (Escape)",
                "Basic modal: after close",
            ]
        );
        assert!(!gallery.entries[0].modal.is_mounted());
    }

    #[test]
    fn test_contact_form_submits_and_closes() {
        let mut doc = Document::new();
        let start = Instant::now();
        let mut gallery = Gallery::new(ScrollLock::new(), Duration::ZERO);
        gallery.open(ExampleKind::ContactForm);
        gallery.frame(SCREEN, start, &mut doc);
        assert!(doc.is_focused(FORM_NAME));

        for c in "Kim".chars() {
            gallery.handle_key(GallerySlot::Modal(1), key(KeyCode::Char(c)), start, &mut doc);
        }
        gallery.handle_key(GallerySlot::Modal(1), key(KeyCode::Enter), start, &mut doc);
        gallery.frame(SCREEN, start, &mut doc);

        assert!(gallery.log().any(|l| l == "Contact form: submitted Kim <>"));
        assert!(gallery.name.value().is_empty());
        assert!(!gallery.entries[1].modal.is_mounted());
    }

    #[test]
    fn test_confirm_logs_in_order() {
        let mut doc = Document::new();
        let start = Instant::now();
        let mut gallery = Gallery::new(ScrollLock::new(), Duration::ZERO);
        gallery.open(ExampleKind::Confirm);
        gallery.frame(SCREEN, start, &mut doc);

        doc.focus(&FocusId::new(format!("dialog.{}.confirm", CONFIRM_ID)));
        gallery.handle_key(GallerySlot::Confirm, key(KeyCode::Enter), start, &mut doc);
        gallery.frame(SCREEN, start, &mut doc);

        let log: Vec<&String> = gallery.log().collect();
        assert_eq!(
            log,
            vec![
                "Confirm dialog: confirmed",
                "Confirm dialog: close",
                "Confirm dialog: after close",
            ]
        );
    }

    #[test]
    fn test_log_is_bounded() {
        let mut gallery = Gallery::new(ScrollLock::new(), Duration::ZERO);
        for i in 0..20 {
            gallery.record(format!("line {}", i));
        }
        assert_eq!(gallery.log().count(), LOG_CAPACITY);
        assert_eq!(gallery.log().next().map(String::as_str), Some("line 12"));
    }
}
