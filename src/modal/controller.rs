//! Modal lifecycle controller
//!
//! A controller follows the caller's open flag through four phases:
//!
//! ```text
//!   Closed --open--> Opening --timer--> Open --close--> Closing --timer--> Closed
//!                                                          |
//!                       Open <--------reopen---------------+
//! ```
//!
//! Phase changes never call back into the host. They queue [`ModalEvent`]s
//! which the host drains after each interaction and each frame.

use super::focus::{Document, FocusId, FocusKind, FocusNode, Layer};
use super::scroll_lock::{ScrollLock, ScrollLockGuard};
use crate::constants::{DEFAULT_ANIMATION_MS, DEFAULT_MODAL_Z_INDEX};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Width of the `[x]` close affordance drawn on the top border
pub const CLOSE_BUTTON_WIDTH: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalSize {
    Small,
    #[default]
    Default,
    Large,
    Full,
}

impl ModalSize {
    /// Panel size as (width %, height %) of the screen
    fn percentages(self) -> (u16, u16) {
        match self {
            ModalSize::Small => (40, 30),
            ModalSize::Default => (60, 60),
            ModalSize::Large => (80, 85),
            ModalSize::Full => (100, 100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterButton {
    pub id: FocusId,
    pub label: String,
    pub style: ButtonStyle,
    pub disabled: bool,
}

impl FooterButton {
    pub fn new(id: impl Into<FocusId>, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            style,
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn width(&self) -> u16 {
        self.label.chars().count() as u16 + 4
    }
}

#[derive(Debug, Clone)]
pub struct ModalConfig {
    pub title: String,
    pub size: ModalSize,
    pub show_close_button: bool,
    pub close_on_overlay_click: bool,
    pub close_on_escape: bool,
    pub prevent_body_scroll: bool,
    pub z_index: u16,
    pub animation: Duration,
    /// Replaces the title and close button when set
    pub header: Option<String>,
    pub footer: Vec<FooterButton>,
}

impl Default for ModalConfig {
    fn default() -> Self {
        ModalConfig {
            title: String::new(),
            size: ModalSize::Default,
            show_close_button: true,
            close_on_overlay_click: true,
            close_on_escape: true,
            prevent_body_scroll: true,
            z_index: DEFAULT_MODAL_Z_INDEX,
            animation: Duration::from_millis(DEFAULT_ANIMATION_MS),
            header: None,
            footer: Vec::new(),
        }
    }
}

impl ModalConfig {
    pub fn new(title: impl Into<String>) -> Self {
        ModalConfig {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn size(mut self, size: ModalSize) -> Self {
        self.size = size;
        self
    }

    pub fn show_close_button(mut self, show: bool) -> Self {
        self.show_close_button = show;
        self
    }

    pub fn close_on_overlay_click(mut self, close: bool) -> Self {
        self.close_on_overlay_click = close;
        self
    }

    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    pub fn prevent_body_scroll(mut self, prevent: bool) -> Self {
        self.prevent_body_scroll = prevent;
        self
    }

    pub fn z_index(mut self, z_index: u16) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn animation(mut self, animation: Duration) -> Self {
        self.animation = animation;
        self
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn footer(mut self, footer: Vec<FooterButton>) -> Self {
        self.footer = footer;
        self
    }

    /// Enable or disable a footer button by id
    pub fn set_button_disabled(&mut self, id: &str, disabled: bool) {
        if let Some(button) = self.footer.iter_mut().find(|b| b.id.as_str() == id) {
            button.disabled = disabled;
        }
    }

    fn has_close_button(&self) -> bool {
        self.show_close_button && self.header.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Escape,
    Overlay,
    CloseButton,
    /// A footer or content action asked to close
    Action,
    /// The caller flipped its open flag
    Programmatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    Open,
    AfterOpen,
    Close(CloseReason),
    AfterClose,
    /// A dismissal was refused because a close guard is set
    CloseBlocked(CloseReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The modal is not mounted
    Ignored,
    CloseButton,
    /// The click landed on the overlay; `closed` tells whether it dismissed
    Overlay { closed: bool },
    /// The click landed inside the panel, possibly on a focus node
    Inside(Option<FocusId>),
}

/// Pending phase completion. Only the most recently armed timer can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTimer {
    generation: u64,
    due: Instant,
}

impl TransitionTimer {
    pub fn due(&self) -> Instant {
        self.due
    }
}

/// Screen regions of a mounted modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalLayout {
    pub panel: Rect,
    pub close_button: Option<Rect>,
    pub body: Rect,
    pub footer: Rect,
}

#[derive(Debug)]
pub struct ModalController {
    layer: Layer,
    config: ModalConfig,
    phase: ModalPhase,
    last_open_flag: bool,
    timer: Option<TransitionTimer>,
    generation: u64,
    previous_focus: Option<FocusId>,
    scroll_lock: ScrollLock,
    scroll_guard: Option<ScrollLockGuard>,
    close_guard: bool,
    close_emitted: bool,
    events: VecDeque<ModalEvent>,
}

impl ModalController {
    pub fn new(id: u32, config: ModalConfig, scroll_lock: ScrollLock) -> Self {
        ModalController {
            layer: Layer::Modal(id),
            config,
            phase: ModalPhase::Closed,
            last_open_flag: false,
            timer: None,
            generation: 0,
            previous_focus: None,
            scroll_lock,
            scroll_guard: None,
            close_guard: false,
            close_emitted: false,
            events: VecDeque::new(),
        }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ModalConfig {
        &mut self.config
    }

    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn is_mounted(&self) -> bool {
        self.phase != ModalPhase::Closed
    }

    pub fn is_closing(&self) -> bool {
        self.phase == ModalPhase::Closing
    }

    pub fn pending_timer(&self) -> Option<TransitionTimer> {
        self.timer
    }

    /// Refuse user dismissals while set; they emit `CloseBlocked` instead
    pub fn set_close_guard(&mut self, guard: bool) {
        self.close_guard = guard;
    }

    pub fn drain_events(&mut self) -> Vec<ModalEvent> {
        self.events.drain(..).collect()
    }

    /// Follow the caller's open flag. Only edges of the flag cause transitions.
    pub fn sync(&mut self, is_open: bool, now: Instant, doc: &mut Document) {
        let was_open = std::mem::replace(&mut self.last_open_flag, is_open);
        if was_open == is_open {
            return;
        }

        match (self.phase, is_open) {
            (ModalPhase::Closed, true) => self.begin_open(now, doc),
            (ModalPhase::Closing, true) => self.resume_open(),
            (ModalPhase::Opening, false) => {
                self.finish_open(doc);
                self.begin_close(CloseReason::Programmatic, now);
            }
            (ModalPhase::Open, false) => self.begin_close(CloseReason::Programmatic, now),
            _ => {}
        }
    }

    /// Complete the pending transition once its delay has elapsed
    pub fn tick(&mut self, now: Instant, doc: &mut Document) {
        if let Some(timer) = self.timer
            && now >= timer.due
        {
            self.fire(timer, doc);
        }
    }

    /// Fire a timer handle. Handles from a superseded transition do nothing.
    pub fn fire(&mut self, timer: TransitionTimer, doc: &mut Document) {
        if self.timer != Some(timer) || timer.generation != self.generation {
            tracing::debug!(
                "Ignoring stale transition timer (generation {})",
                timer.generation
            );
            return;
        }
        match self.phase {
            ModalPhase::Opening => self.finish_open(doc),
            ModalPhase::Closing => self.finish_close(doc),
            ModalPhase::Open | ModalPhase::Closed => self.timer = None,
        }
    }

    /// Dismiss the modal. Returns true if a close transition started.
    pub fn request_close(&mut self, reason: CloseReason, now: Instant, doc: &mut Document) -> bool {
        if matches!(self.phase, ModalPhase::Opening | ModalPhase::Open) && self.close_guard {
            tracing::debug!("Close of {:?} blocked ({:?})", self.layer, reason);
            self.events.push_back(ModalEvent::CloseBlocked(reason));
            return false;
        }
        self.close_now(reason, now, doc)
    }

    /// Dismiss regardless of the close guard
    pub fn force_close(&mut self, now: Instant, doc: &mut Document) -> bool {
        self.close_now(CloseReason::Action, now, doc)
    }

    fn close_now(&mut self, reason: CloseReason, now: Instant, doc: &mut Document) -> bool {
        match self.phase {
            ModalPhase::Opening => {
                self.finish_open(doc);
                self.begin_close(reason, now);
                true
            }
            ModalPhase::Open => {
                self.begin_close(reason, now);
                true
            }
            ModalPhase::Closing | ModalPhase::Closed => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant, doc: &mut Document) -> KeyOutcome {
        if !self.is_mounted() {
            return KeyOutcome::Ignored;
        }

        match key.code {
            KeyCode::Esc if self.config.close_on_escape && self.phase == ModalPhase::Open => {
                self.request_close(CloseReason::Escape, now, doc);
                KeyOutcome::Handled
            }
            KeyCode::Enter | KeyCode::Char(' ')
                if doc.active() == Some(&self.close_button_id()) =>
            {
                self.request_close(CloseReason::CloseButton, now, doc);
                KeyOutcome::Handled
            }
            KeyCode::BackTab => {
                doc.cycle(self.layer, true);
                KeyOutcome::Handled
            }
            KeyCode::Tab => {
                let backward = key.modifiers.contains(KeyModifiers::SHIFT);
                doc.cycle(self.layer, backward);
                KeyOutcome::Handled
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
        if !self.is_mounted() {
            return ClickOutcome::Ignored;
        }

        let layout = self.layout(screen);
        let position = (column, row).into();

        if let Some(close) = layout.close_button
            && close.contains(position)
        {
            self.request_close(CloseReason::CloseButton, now, doc);
            return ClickOutcome::CloseButton;
        }

        if layout.panel.contains(position) {
            let hit = doc
                .hit_test(self.layer, column, row)
                .filter(|node| node.is_focusable())
                .map(|node| node.id.clone());
            if let Some(id) = &hit {
                doc.focus(id);
            }
            return ClickOutcome::Inside(hit);
        }

        let closed = self.config.close_on_overlay_click
            && self.request_close(CloseReason::Overlay, now, doc);
        ClickOutcome::Overlay { closed }
    }

    pub fn panel_area(&self, screen: Rect) -> Rect {
        if self.config.size == ModalSize::Full {
            return screen;
        }
        let (percent_x, percent_y) = self.config.size.percentages();
        centered_rect(percent_x, percent_y, screen)
    }

    pub fn layout(&self, screen: Rect) -> ModalLayout {
        let panel = self.panel_area(screen);
        let close_button = (self.config.has_close_button()
            && panel.width > CLOSE_BUTTON_WIDTH + 2)
            .then(|| Rect {
                x: panel.x + panel.width - CLOSE_BUTTON_WIDTH - 1,
                y: panel.y,
                width: CLOSE_BUTTON_WIDTH,
                height: 1,
            });

        let inner = Rect {
            x: panel.x.saturating_add(1),
            y: panel.y.saturating_add(1),
            width: panel.width.saturating_sub(2),
            height: panel.height.saturating_sub(2),
        };
        let footer_height = if self.config.footer.is_empty() { 0 } else { 1 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
            .split(inner);

        ModalLayout {
            panel,
            close_button,
            body: chunks[0],
            footer: chunks[1],
        }
    }

    /// Right-aligned rects for the footer buttons, in declaration order
    pub fn footer_button_areas(&self, footer: Rect) -> Vec<Rect> {
        let total: u16 = self
            .config
            .footer
            .iter()
            .map(|b| b.width() + 1)
            .sum();
        let mut x = footer.x + footer.width.saturating_sub(total);
        self.config
            .footer
            .iter()
            .map(|button| {
                let width = button.width().min(footer.right().saturating_sub(x));
                let area = Rect::new(x, footer.y, width, footer.height);
                x = x.saturating_add(button.width() + 1);
                area
            })
            .collect()
    }

    /// Mount this modal's focus nodes: close button, body, then footer
    pub fn mount(&self, screen: Rect, body: Vec<FocusNode>, doc: &mut Document) {
        if !self.is_mounted() {
            return;
        }
        let layout = self.layout(screen);
        let mut nodes = Vec::with_capacity(body.len() + self.config.footer.len() + 1);
        if let Some(area) = layout.close_button {
            nodes.push(FocusNode::new(self.close_button_id(), FocusKind::Button, area));
        }
        nodes.extend(body);
        for (button, area) in self
            .config
            .footer
            .iter()
            .zip(self.footer_button_areas(layout.footer))
        {
            nodes.push(
                FocusNode::new(button.id.clone(), FocusKind::Button, area)
                    .disabled(button.disabled),
            );
        }
        doc.mount(self.layer, nodes);
    }

    pub fn close_button_id(&self) -> FocusId {
        match self.layer {
            Layer::Modal(id) => FocusId::new(format!("modal.{}.close", id)),
            Layer::Page => FocusId::new("modal.close"),
        }
    }

    fn arm(&mut self, now: Instant) {
        self.generation += 1;
        self.timer = Some(TransitionTimer {
            generation: self.generation,
            due: now + self.config.animation,
        });
    }

    fn begin_open(&mut self, now: Instant, doc: &Document) {
        tracing::debug!("Opening {:?} '{}'", self.layer, self.config.title);
        self.previous_focus = doc.active().cloned();
        if self.config.prevent_body_scroll && self.scroll_guard.is_none() {
            self.scroll_guard = Some(self.scroll_lock.acquire());
        }
        self.phase = ModalPhase::Opening;
        self.close_emitted = false;
        self.events.push_back(ModalEvent::Open);
        self.arm(now);
    }

    fn finish_open(&mut self, doc: &mut Document) {
        self.timer = None;
        self.phase = ModalPhase::Open;
        let first = doc.tabbable(self.layer).first().map(|n| n.id.clone());
        if let Some(id) = first {
            doc.focus(&id);
        }
        tracing::debug!("{:?} open", self.layer);
        self.events.push_back(ModalEvent::AfterOpen);
    }

    fn begin_close(&mut self, reason: CloseReason, now: Instant) {
        tracing::debug!("Closing {:?} ({:?})", self.layer, reason);
        // Hosts drop their flag on `Close`; a later raise must read as an edge
        if reason != CloseReason::Programmatic {
            self.last_open_flag = false;
        }
        self.phase = ModalPhase::Closing;
        if !self.close_emitted {
            self.close_emitted = true;
            self.events.push_back(ModalEvent::Close(reason));
        }
        self.arm(now);
    }

    fn resume_open(&mut self) {
        tracing::debug!("{:?} reopened while closing", self.layer);
        self.timer = None;
        self.generation += 1;
        self.phase = ModalPhase::Open;
        self.close_emitted = false;
    }

    fn finish_close(&mut self, doc: &mut Document) {
        self.timer = None;
        self.phase = ModalPhase::Closed;
        doc.unmount(self.layer);
        self.scroll_guard = None;

        if let Some(previous) = self.previous_focus.take() {
            if doc.is_attached(&previous) {
                doc.focus(&previous);
            } else {
                tracing::debug!("Previous focus {} detached, not restoring", previous);
            }
        }
        tracing::debug!("{:?} closed", self.layer);
        self.events.push_back(ModalEvent::AfterClose);
    }
}

/// Create a centered rect using a percentage of the available space
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 100,
        height: 40,
    };
    const ANIMATION: Duration = Duration::from_millis(300);

    struct Harness {
        modal: ModalController,
        doc: Document,
        lock: ScrollLock,
        start: Instant,
    }

    impl Harness {
        fn new(config: ModalConfig) -> Self {
            let lock = ScrollLock::new();
            let mut doc = Document::new();
            doc.mount(
                Layer::Page,
                vec![
                    FocusNode::new("page.list", FocusKind::Container, Rect::new(0, 0, 10, 5))
                        .tab_index(0),
                    FocusNode::new("page.add", FocusKind::Button, Rect::new(0, 6, 10, 1)),
                ],
            );
            doc.focus(&"page.add".into());
            Harness {
                modal: ModalController::new(1, config.animation(ANIMATION), lock.clone()),
                doc,
                lock,
                start: Instant::now(),
            }
        }

        fn at(&self, ms: u64) -> Instant {
            self.start + Duration::from_millis(ms)
        }

        fn body(&self) -> Vec<FocusNode> {
            let body = self.modal.layout(SCREEN).body;
            vec![
                FocusNode::new("body.title", FocusKind::Input, Rect::new(body.x, body.y, 20, 1)),
                FocusNode::new(
                    "body.memo",
                    FocusKind::TextArea,
                    Rect::new(body.x, body.y + 2, 20, 3),
                ),
            ]
        }

        /// Host frame: mount nodes, follow the flag, fire timers
        fn frame(&mut self, is_open: bool, ms: u64) {
            let now = self.at(ms);
            self.modal.sync(is_open, now, &mut self.doc);
            let body = self.body();
            self.modal.mount(SCREEN, body, &mut self.doc);
            self.modal.tick(now, &mut self.doc);
        }
    }

    fn open_modal(config: ModalConfig) -> Harness {
        let mut h = Harness::new(config);
        h.frame(true, 0);
        h.frame(true, 300);
        assert_eq!(h.modal.phase(), ModalPhase::Open);
        h.modal.drain_events();
        h
    }

    #[test]
    fn test_full_cycle_events_and_focus() {
        let mut h = Harness::new(ModalConfig::new("Basic"));
        h.frame(true, 0);
        assert_eq!(h.modal.phase(), ModalPhase::Opening);
        assert!(h.lock.is_locked());
        assert_eq!(h.modal.drain_events(), vec![ModalEvent::Open]);

        h.frame(true, 299);
        assert_eq!(h.modal.phase(), ModalPhase::Opening);
        h.frame(true, 300);
        assert_eq!(h.modal.phase(), ModalPhase::Open);
        assert_eq!(h.modal.drain_events(), vec![ModalEvent::AfterOpen]);
        assert_eq!(h.doc.active(), Some(&h.modal.close_button_id()));

        h.frame(false, 1000);
        assert_eq!(h.modal.phase(), ModalPhase::Closing);
        assert!(h.modal.is_mounted());
        h.frame(false, 1300);
        assert_eq!(h.modal.phase(), ModalPhase::Closed);
        assert_eq!(
            h.modal.drain_events(),
            vec![
                ModalEvent::Close(CloseReason::Programmatic),
                ModalEvent::AfterClose
            ]
        );
        assert!(!h.lock.is_locked());
        assert_eq!(h.doc.active(), Some(&"page.add".into()));
        assert!(h.doc.nodes(h.modal.layer()).is_empty());
    }

    #[test]
    fn test_mounted_iff_not_closed_for_toggle_sequences() {
        let mut h = Harness::new(ModalConfig::new("Toggle"));
        let flags = [true, false, true, true, false, false, true, false];
        let mut ms = 0;
        for flag in flags {
            for step in [0, 150, 300] {
                h.frame(flag, ms + step);
                assert_eq!(h.modal.is_mounted(), h.modal.phase() != ModalPhase::Closed);
                assert_eq!(
                    h.doc.nodes(h.modal.layer()).is_empty(),
                    !h.modal.is_mounted()
                );
            }
            ms += 400;
        }
        assert_eq!(h.modal.phase(), ModalPhase::Closed);
        assert!(!h.lock.is_locked());
    }

    #[test]
    fn test_close_before_open_completes() {
        let mut h = Harness::new(ModalConfig::new("Quick"));
        h.frame(true, 0);
        h.frame(false, 10);
        h.frame(false, 200);
        assert_eq!(h.modal.phase(), ModalPhase::Closing);
        h.frame(false, 310);
        assert_eq!(h.modal.phase(), ModalPhase::Closed);
        assert_eq!(
            h.modal.drain_events(),
            vec![
                ModalEvent::Open,
                ModalEvent::AfterOpen,
                ModalEvent::Close(CloseReason::Programmatic),
                ModalEvent::AfterClose,
            ]
        );
        assert_eq!(h.lock.holders(), 0);
        assert_eq!(h.doc.active(), Some(&"page.add".into()));
    }

    #[test]
    fn test_escape_only_when_open() {
        let mut h = Harness::new(ModalConfig::new("Esc"));
        let esc = KeyEvent::from(KeyCode::Esc);
        h.frame(true, 0);
        assert_eq!(h.modal.handle_key(esc, h.at(10), &mut h.doc), KeyOutcome::Ignored);
        assert_eq!(h.modal.phase(), ModalPhase::Opening);

        h.frame(true, 300);
        h.modal.drain_events();
        assert_eq!(h.modal.handle_key(esc, h.at(400), &mut h.doc), KeyOutcome::Handled);
        assert_eq!(h.modal.phase(), ModalPhase::Closing);
        assert_eq!(
            h.modal.drain_events(),
            vec![ModalEvent::Close(CloseReason::Escape)]
        );

        // Closing: a second escape is not another dismissal
        assert_eq!(h.modal.handle_key(esc, h.at(410), &mut h.doc), KeyOutcome::Ignored);
        assert!(h.modal.drain_events().is_empty());
    }

    #[test]
    fn test_escape_disabled() {
        let mut h = open_modal(ModalConfig::new("NoEsc").close_on_escape(false));
        let outcome = h
            .modal
            .handle_key(KeyEvent::from(KeyCode::Esc), h.at(500), &mut h.doc);
        assert_eq!(outcome, KeyOutcome::Ignored);
        assert_eq!(h.modal.phase(), ModalPhase::Open);
    }

    #[test]
    fn test_tab_wraps_inside_modal() {
        let mut h = open_modal(ModalConfig::new("Trap").footer(vec![
            FooterButton::new("f.cancel", "Cancel", ButtonStyle::Secondary),
            FooterButton::new("f.ok", "OK", ButtonStyle::Primary),
        ]));
        let tab = KeyEvent::from(KeyCode::Tab);
        let back = KeyEvent::from(KeyCode::BackTab);

        h.doc.focus(&"f.ok".into());
        h.modal.handle_key(tab, h.at(400), &mut h.doc);
        assert_eq!(h.doc.active(), Some(&h.modal.close_button_id()));

        h.modal.handle_key(back, h.at(401), &mut h.doc);
        assert_eq!(h.doc.active(), Some(&"f.ok".into()));

        let shift_tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT);
        h.modal.handle_key(shift_tab, h.at(402), &mut h.doc);
        assert_eq!(h.doc.active(), Some(&"f.cancel".into()));
    }

    #[test]
    fn test_focus_never_escapes_to_page() {
        let mut h = open_modal(ModalConfig::new("Trap"));
        let tab = KeyEvent::from(KeyCode::Tab);
        for step in 0..10 {
            h.modal.handle_key(tab, h.at(400 + step), &mut h.doc);
            let active = h.doc.active().expect("focus inside modal");
            assert!(!active.as_str().starts_with("page."));
        }
    }

    #[test]
    fn test_overlay_click_rules() {
        let mut h = open_modal(ModalConfig::new("Overlay"));
        let panel = h.modal.panel_area(SCREEN);

        let inside = h
            .modal
            .handle_click(panel.x + 2, panel.y + 2, SCREEN, h.at(400), &mut h.doc);
        assert!(matches!(inside, ClickOutcome::Inside(_)));
        assert_eq!(h.modal.phase(), ModalPhase::Open);

        let outside = h.modal.handle_click(0, 0, SCREEN, h.at(401), &mut h.doc);
        assert_eq!(outside, ClickOutcome::Overlay { closed: true });
        assert_eq!(
            h.modal.drain_events(),
            vec![ModalEvent::Close(CloseReason::Overlay)]
        );
    }

    #[test]
    fn test_overlay_click_disabled() {
        let mut h = open_modal(ModalConfig::new("Sticky").close_on_overlay_click(false));
        let outcome = h.modal.handle_click(0, 0, SCREEN, h.at(400), &mut h.doc);
        assert_eq!(outcome, ClickOutcome::Overlay { closed: false });
        assert_eq!(h.modal.phase(), ModalPhase::Open);
    }

    #[test]
    fn test_click_focuses_body_node() {
        let mut h = open_modal(ModalConfig::new("Click"));
        let body = h.modal.layout(SCREEN).body;
        let outcome = h
            .modal
            .handle_click(body.x + 1, body.y + 3, SCREEN, h.at(400), &mut h.doc);
        assert_eq!(outcome, ClickOutcome::Inside(Some("body.memo".into())));
        assert_eq!(h.doc.active(), Some(&"body.memo".into()));
    }

    #[test]
    fn test_close_button_click() {
        let mut h = open_modal(ModalConfig::new("X"));
        let close = h.modal.layout(SCREEN).close_button.expect("close button");
        let outcome = h
            .modal
            .handle_click(close.x, close.y, SCREEN, h.at(400), &mut h.doc);
        assert_eq!(outcome, ClickOutcome::CloseButton);
        assert_eq!(h.modal.phase(), ModalPhase::Closing);
    }

    #[test]
    fn test_custom_header_hides_close_button() {
        let h = Harness::new(ModalConfig::new("Custom").header("Custom header"));
        assert!(h.modal.layout(SCREEN).close_button.is_none());
    }

    #[test]
    fn test_reopen_while_closing_cancels_close() {
        let mut h = open_modal(ModalConfig::new("Reopen"));
        h.frame(false, 400);
        let stale = h.modal.pending_timer().expect("close timer armed");
        h.frame(true, 450);
        assert_eq!(h.modal.phase(), ModalPhase::Open);
        assert!(h.modal.pending_timer().is_none());

        h.modal.fire(stale, &mut h.doc);
        h.frame(true, 2000);
        assert_eq!(h.modal.phase(), ModalPhase::Open);
        assert!(h.lock.is_locked());
        assert_eq!(
            h.modal.drain_events(),
            vec![ModalEvent::Close(CloseReason::Programmatic)]
        );

        // A later dismissal is a new one and notifies again
        h.frame(false, 2100);
        h.frame(false, 2400);
        assert_eq!(
            h.modal.drain_events(),
            vec![
                ModalEvent::Close(CloseReason::Programmatic),
                ModalEvent::AfterClose
            ]
        );
        assert!(!h.lock.is_locked());
    }

    #[test]
    fn test_user_close_then_flag_flip_notifies_once() {
        let mut h = open_modal(ModalConfig::new("Once"));
        h.modal
            .request_close(CloseReason::CloseButton, h.at(400), &mut h.doc);
        h.frame(false, 401);
        h.frame(false, 700);
        assert_eq!(
            h.modal.drain_events(),
            vec![
                ModalEvent::Close(CloseReason::CloseButton),
                ModalEvent::AfterClose
            ]
        );
    }

    #[test]
    fn test_escape_then_reopen_before_next_frame() {
        let mut h = open_modal(ModalConfig::new("Again"));
        h.modal
            .handle_key(KeyEvent::from(KeyCode::Esc), h.at(400), &mut h.doc);
        assert_eq!(h.modal.phase(), ModalPhase::Closing);

        // Host drops and raises its flag between frames, so it still reads true
        h.frame(true, 410);
        assert_eq!(h.modal.phase(), ModalPhase::Open);
        h.frame(true, 1000);
        assert_eq!(h.modal.phase(), ModalPhase::Open);
        assert!(h.lock.is_locked());
        assert_eq!(
            h.modal.drain_events(),
            vec![ModalEvent::Close(CloseReason::Escape)]
        );
    }

    #[test]
    fn test_escape_then_reopen_after_close_finished() {
        let mut h = open_modal(ModalConfig::new("Later"));
        h.modal
            .handle_key(KeyEvent::from(KeyCode::Esc), h.at(400), &mut h.doc);
        h.modal.tick(h.at(700), &mut h.doc);
        assert_eq!(h.modal.phase(), ModalPhase::Closed);
        h.modal.drain_events();

        h.frame(true, 800);
        assert_eq!(h.modal.phase(), ModalPhase::Opening);
        h.frame(true, 1100);
        assert_eq!(h.modal.phase(), ModalPhase::Open);
        assert_eq!(
            h.modal.drain_events(),
            vec![ModalEvent::Open, ModalEvent::AfterOpen]
        );
    }

    #[test]
    fn test_close_guard_blocks_until_forced() {
        let mut h = open_modal(ModalConfig::new("Guarded"));
        h.modal.set_close_guard(true);
        let esc = KeyEvent::from(KeyCode::Esc);
        h.modal.handle_key(esc, h.at(400), &mut h.doc);
        assert_eq!(h.modal.phase(), ModalPhase::Open);
        assert_eq!(
            h.modal.drain_events(),
            vec![ModalEvent::CloseBlocked(CloseReason::Escape)]
        );

        assert!(h.modal.force_close(h.at(410), &mut h.doc));
        assert_eq!(h.modal.phase(), ModalPhase::Closing);
    }

    #[test]
    fn test_restore_skipped_when_detached() {
        let mut h = open_modal(ModalConfig::new("Detached"));
        h.doc.mount(Layer::Page, Vec::new());
        h.frame(false, 400);
        h.frame(false, 700);
        assert_eq!(h.modal.phase(), ModalPhase::Closed);
        assert!(h.doc.active().is_none());
    }

    #[test]
    fn test_no_prior_focus() {
        let mut h = Harness::new(ModalConfig::new("Fresh"));
        h.doc.blur();
        h.frame(true, 0);
        h.frame(true, 300);
        h.frame(false, 400);
        h.frame(false, 700);
        assert_eq!(h.modal.phase(), ModalPhase::Closed);
        assert!(h.doc.active().is_none());
    }

    #[test]
    fn test_drop_mid_animation_releases_lock() {
        let mut h = Harness::new(ModalConfig::new("Teardown"));
        h.frame(true, 0);
        assert!(h.lock.is_locked());
        let lock = h.lock.clone();
        drop(h);
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_scroll_lock_optional() {
        let mut h = Harness::new(ModalConfig::new("Scroll").prevent_body_scroll(false));
        h.frame(true, 0);
        assert!(!h.lock.is_locked());
    }

    #[test]
    fn test_panel_sizes() {
        let h = Harness::new(ModalConfig::new("Full").size(ModalSize::Full));
        assert_eq!(h.modal.panel_area(SCREEN), SCREEN);
        let small = Harness::new(ModalConfig::new("Small").size(ModalSize::Small));
        let large = Harness::new(ModalConfig::new("Large").size(ModalSize::Large));
        assert!(small.modal.panel_area(SCREEN).width < large.modal.panel_area(SCREEN).width);
    }
}
