use crate::async_tasks::TaskMessage;
use crate::bookmarks::BookmarkManager;
use crate::constants::{CARD_HEIGHT, DIALOG_Z_INDEX, MAX_SEARCH_INPUT_LENGTH};
use crate::forms::{AddBookmarkForm, FormAction, MemoEditor, TextField, TodoForm, add_bookmark};
use crate::forms::{memo_editor, todo_form};
use crate::gallery::{Gallery, GallerySlot};
use crate::modal::{
    CloseReason, Dialog, DialogEvent, Document, FocusId, FocusKind, FocusNode, Layer,
    ModalConfig, ModalController, ModalEvent, ModalSize, ModalState, ScrollLock,
};
use crate::persistence::{LocalStore, PersistenceManager, bookmark_urls_key};
use crate::search::SearchEngine;
use crate::todos::TodoManager;
use crate::types::{Bookmark, Config, NavState, Page, Todo};
use crate::ui::layout::PageLayout;
use chrono::Utc;
use ratatui::layout::Rect;
use std::collections::HashSet;
use std::time::{Duration, Instant};

pub const ADD_MODAL: u32 = 1;
pub const MEMO_MODAL: u32 = 2;
pub const TODO_MODAL: u32 = 3;
pub const HELP_MODAL: u32 = 4;
pub const DELETE_DIALOG: u32 = 20;
pub const DISCARD_DIALOG: u32 = 21;
pub const NOTICE_DIALOG: u32 = 22;

// Page focus nodes
pub const NAV: &str = "page.nav";
pub const SEARCH: &str = "page.search";
pub const LIST: &str = "page.list";
pub const ADD: &str = "page.add";

/// A mounted modal the host can route input to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Add,
    Memo,
    Todo,
    Help,
    Delete,
    Discard,
    Notice,
    Gallery(GallerySlot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    One(u64),
    Selected,
}

/// Work the event loop hands to the background task runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRequest {
    Copy(String),
    Open(String),
}

/// Session-only settings from the command line; never persisted
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOverrides {
    pub animation_ms: Option<u64>,
    pub page_size: Option<usize>,
}

pub struct AppState {
    pub config: Config,
    pub overrides: SessionOverrides,
    pub persistence: PersistenceManager,
    pub store: LocalStore,
    pub should_quit: bool,
    pub screen: Rect,

    // Pages
    pub page: Page,
    pub nav: NavState,
    pub status: Option<String>,

    // Bookmarks
    pub bookmarks: Vec<Bookmark>,
    pub search: TextField,
    pub selected: usize,
    pub selection_mode: bool,
    pub selected_ids: HashSet<u64>,

    // My day
    pub todos: Vec<Todo>,
    pub todo_selected: usize,

    // Focus and modals
    pub doc: Document,
    pub scroll_lock: ScrollLock,
    pub add_modal: ModalController,
    pub add_state: ModalState,
    pub add_form: AddBookmarkForm,
    pub memo_modal: ModalController,
    pub memo_state: ModalState,
    pub memo_editor: MemoEditor,
    pub todo_modal: ModalController,
    pub todo_state: ModalState,
    pub todo_form: TodoForm,
    pub help_modal: ModalController,
    pub help_state: ModalState,
    pub delete_dialog: Dialog,
    pub discard_dialog: Dialog,
    pub notice: Dialog,
    pub gallery: Gallery,
    pending_delete: Option<DeleteTarget>,
    requests: Vec<TaskRequest>,
}

impl AppState {
    pub fn new(config: Config, overrides: SessionOverrides, persistence: PersistenceManager) -> Self {
        let bookmarks = persistence.load_bookmarks().unwrap_or_else(|e| {
            tracing::warn!("Failed to load bookmarks: {:#}", e);
            Vec::new()
        });
        let todos = persistence.load_todos().unwrap_or_else(|e| {
            tracing::warn!("Failed to load todos: {:#}", e);
            Vec::new()
        });
        let store = LocalStore::open(persistence.data_dir());
        tracing::info!(
            "Loaded {} bookmarks and {} todos",
            bookmarks.len(),
            todos.len()
        );

        let animation =
            Duration::from_millis(overrides.animation_ms.unwrap_or(config.animation_ms));
        let scroll_lock = ScrollLock::new();
        let modal = |id: u32, config: ModalConfig| {
            ModalController::new(id, config.animation(animation), scroll_lock.clone())
        };
        let add_modal = modal(
            ADD_MODAL,
            ModalConfig::new("Add Bookmark").footer(AddBookmarkForm::footer()),
        );
        let memo_modal = modal(
            MEMO_MODAL,
            ModalConfig::new("Edit Memo")
                .size(ModalSize::Large)
                .footer(MemoEditor::footer()),
        );
        let todo_modal = modal(
            TODO_MODAL,
            ModalConfig::new("New Task").footer(TodoForm::footer()),
        );
        let help_modal = modal(
            HELP_MODAL,
            ModalConfig::new("Keyboard Shortcuts").size(ModalSize::Large),
        );

        let dialog = |dialog: Dialog| {
            dialog
                .with_z_index(DIALOG_Z_INDEX)
                .with_animation(animation)
        };
        let delete_dialog = dialog(Dialog::confirm(
            DELETE_DIALOG,
            "Delete bookmark",
            "Delete",
            "Cancel",
            true,
            scroll_lock.clone(),
        ));
        let discard_dialog = dialog(Dialog::confirm(
            DISCARD_DIALOG,
            "Unsaved changes",
            "Discard",
            "Keep editing",
            true,
            scroll_lock.clone(),
        ));
        let notice = dialog(Dialog::alert(
            NOTICE_DIALOG,
            "Notice",
            "OK",
            scroll_lock.clone(),
        ));

        AppState {
            config,
            overrides,
            persistence,
            store,
            should_quit: false,
            screen: Rect::new(0, 0, 80, 24),
            page: Page::Bookmarks,
            nav: NavState::new(Page::Bookmarks),
            status: None,
            bookmarks,
            search: TextField::new(MAX_SEARCH_INPUT_LENGTH),
            selected: 0,
            selection_mode: false,
            selected_ids: HashSet::new(),
            todos,
            todo_selected: 0,
            doc: Document::new(),
            gallery: Gallery::new(scroll_lock.clone(), animation),
            scroll_lock,
            add_modal,
            add_state: ModalState::default(),
            add_form: AddBookmarkForm::new(),
            memo_modal,
            memo_state: ModalState::default(),
            memo_editor: MemoEditor::new(),
            todo_modal,
            todo_state: ModalState::default(),
            todo_form: TodoForm::new(),
            help_modal,
            help_state: ModalState::default(),
            delete_dialog,
            discard_dialog,
            notice,
            pending_delete: None,
            requests: Vec::new(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.overrides.page_size.unwrap_or(self.config.page_size)
    }

    pub fn update_screen(&mut self, width: u16, height: u16) {
        tracing::debug!("Screen resized to {}x{}", width, height);
        self.screen = Rect::new(0, 0, width, height);
    }

    pub fn page_layout(&self) -> PageLayout {
        PageLayout::new(self.screen, self.config.sidebar_width, self.page)
    }

    // Frame step

    /// Advance every modal by one frame: follow open flags, mount focus
    /// nodes, fire due timers and react to the resulting events
    pub fn tick(&mut self, now: Instant) {
        let screen = self.screen;
        self.mount_page();

        self.add_modal
            .config_mut()
            .set_button_disabled(add_bookmark::SAVE, !self.add_form.can_save());
        let body = self.add_modal.layout(screen).body;
        let nodes = self.add_form.body_nodes(body);
        step(&mut self.add_modal, self.add_state, nodes, screen, now, &mut self.doc);

        let has_changes = self.memo_editor.has_changes();
        let footer = self.memo_modal.config_mut();
        footer.set_button_disabled(memo_editor::RESET, !has_changes);
        footer.set_button_disabled(memo_editor::SAVE, !has_changes);
        self.memo_modal.set_close_guard(has_changes);
        let body = self.memo_modal.layout(screen).body;
        let nodes = self.memo_editor.body_nodes(body);
        step(&mut self.memo_modal, self.memo_state, nodes, screen, now, &mut self.doc);

        self.todo_modal
            .config_mut()
            .set_button_disabled(todo_form::SUBMIT, !self.todo_form.can_submit());
        let body = self.todo_modal.layout(screen).body;
        let nodes = self.todo_form.body_nodes(body);
        step(&mut self.todo_modal, self.todo_state, nodes, screen, now, &mut self.doc);

        step(
            &mut self.help_modal,
            self.help_state,
            Vec::new(),
            screen,
            now,
            &mut self.doc,
        );

        self.gallery.frame(screen, now, &mut self.doc);
        self.delete_dialog.frame(screen, now, &mut self.doc);
        self.discard_dialog.frame(screen, now, &mut self.doc);
        self.notice.frame(screen, now, &mut self.doc);

        self.process_events(now);

        if self.doc.active().is_none() && self.top_slot().is_none() {
            self.doc.focus(&FocusId::new(LIST));
        }
    }

    fn mount_page(&mut self) {
        let layout = self.page_layout();
        let mut nodes =
            vec![FocusNode::new(NAV, FocusKind::Container, layout.sidebar).tab_index(0)];
        if self.page == Page::Bookmarks {
            nodes.push(FocusNode::new(SEARCH, FocusKind::Input, layout.search));
        }
        nodes.push(FocusNode::new(LIST, FocusKind::Container, layout.content).tab_index(0));
        if self.page != Page::ModalExamples {
            nodes.push(FocusNode::new(ADD, FocusKind::Button, layout.add_button));
        }
        self.doc.mount(Layer::Page, nodes);
    }

    /// React to queued modal and dialog events. Dialogs go first so a
    /// confirmed discard closes the memo editor in the same pass.
    pub fn process_events(&mut self, now: Instant) {
        for event in self.delete_dialog.drain_events() {
            match event {
                DialogEvent::Confirmed => self.confirm_delete(),
                DialogEvent::Closed => self.pending_delete = None,
                DialogEvent::AfterClose => {}
            }
        }

        for event in self.discard_dialog.drain_events() {
            if event == DialogEvent::Confirmed {
                tracing::info!("Unsaved memo changes discarded");
                self.memo_modal.force_close(now, &mut self.doc);
            }
        }

        // Notice only needs closing, which the dialog does itself
        self.notice.drain_events();

        for event in self.add_modal.drain_events() {
            match event {
                ModalEvent::AfterOpen => {
                    self.doc.focus(&AddBookmarkForm::first_field());
                }
                ModalEvent::Close(_) => self.add_state.close(),
                ModalEvent::AfterClose => self.add_form.reset(),
                _ => {}
            }
        }

        for event in self.memo_modal.drain_events() {
            match event {
                ModalEvent::AfterOpen => {
                    self.doc.focus(&MemoEditor::first_field());
                }
                ModalEvent::Close(_) => self.memo_state.close(),
                ModalEvent::CloseBlocked(reason) => {
                    tracing::info!("Memo close blocked by unsaved changes ({:?})", reason);
                    if !self.discard_dialog.is_open() {
                        self.discard_dialog
                            .show("You have unsaved changes. Close without saving?");
                    }
                }
                _ => {}
            }
        }

        for event in self.todo_modal.drain_events() {
            match event {
                ModalEvent::AfterOpen => {
                    self.doc.focus(&TodoForm::first_field());
                }
                ModalEvent::Close(_) => self.todo_state.close(),
                ModalEvent::AfterClose => self.todo_form.reset(),
                _ => {}
            }
        }

        for event in self.help_modal.drain_events() {
            if let ModalEvent::Close(_) = event {
                self.help_state.close();
            }
        }

        self.gallery.process_events(&mut self.doc);
    }

    /// Mounted modals from bottom to top
    pub fn modal_stack(&self) -> Vec<Slot> {
        let mut stack: Vec<(u16, Slot)> = Vec::new();
        let mut push = |modal: &ModalController, slot: Slot| {
            if modal.is_mounted() {
                stack.push((modal.config().z_index, slot));
            }
        };
        push(&self.add_modal, Slot::Add);
        push(&self.memo_modal, Slot::Memo);
        push(&self.todo_modal, Slot::Todo);
        push(&self.help_modal, Slot::Help);
        for (slot, modal) in self.gallery.controllers() {
            push(modal, Slot::Gallery(slot));
        }
        push(self.delete_dialog.modal(), Slot::Delete);
        push(self.discard_dialog.modal(), Slot::Discard);
        push(self.notice.modal(), Slot::Notice);

        stack.sort_by_key(|(z, _)| *z);
        stack.into_iter().map(|(_, slot)| slot).collect()
    }

    /// The modal that currently owns input
    pub fn top_slot(&self) -> Option<Slot> {
        self.modal_stack().last().copied()
    }

    // Pages

    pub fn switch_page(&mut self, page: Page) {
        if self.page == page {
            return;
        }
        tracing::info!("Switching to page: {}", page.title());
        self.page = page;
        self.nav.select_page(page);
        self.mount_page();
        self.doc.focus(&FocusId::new(LIST));
    }

    pub fn nav_activate(&mut self) {
        match self.nav.selected_page() {
            Some(page) => self.switch_page(page),
            None => {
                self.nav.tree_state.toggle_selected();
            }
        }
    }

    /// Page scroll input; ignored while any modal holds the scroll lock
    pub fn scroll(&mut self, down: bool) {
        if self.scroll_lock.is_locked() {
            tracing::trace!("Page scroll ignored while locked");
            return;
        }
        match (self.page, down) {
            (Page::Bookmarks, true) => self.select_next(),
            (Page::Bookmarks, false) => self.select_previous(),
            (Page::MyDay, true) => self.todo_next(),
            (Page::MyDay, false) => self.todo_previous(),
            (Page::ModalExamples, true) => self.gallery.select_next(),
            (Page::ModalExamples, false) => self.gallery.select_previous(),
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    // Bookmark list

    /// Indices into `bookmarks` matching the current search
    pub fn filtered(&self) -> Vec<usize> {
        SearchEngine::filter(&self.bookmarks, self.search.value())
    }

    pub fn current_bookmark(&self) -> Option<&Bookmark> {
        self.filtered()
            .get(self.selected)
            .and_then(|idx| self.bookmarks.get(*idx))
    }

    fn clamp_selection(&mut self) {
        let count = self.filtered().len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    pub fn search_changed(&mut self) {
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        let count = self.filtered().len();
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// (current page, total pages), both 1-based
    pub fn pagination(&self) -> (usize, usize) {
        let size = self.page_size().max(1);
        let total = self.filtered().len().div_ceil(size).max(1);
        (self.selected / size + 1, total)
    }

    pub fn next_page(&mut self) {
        let size = self.page_size().max(1);
        let count = self.filtered().len();
        let (page, total) = self.pagination();
        if page < total {
            self.selected = (page * size).min(count.saturating_sub(1));
        }
    }

    pub fn previous_page(&mut self) {
        let size = self.page_size().max(1);
        let (page, _) = self.pagination();
        if page > 1 {
            self.selected = (page - 2) * size;
        }
    }

    /// Select the card under a screen row of the list area
    pub fn select_at_row(&mut self, row: u16) {
        let content = self.page_layout().content;
        if row < content.y {
            return;
        }
        let size = self.page_size().max(1);
        let page_start = (self.selected / size) * size;
        let offset = ((row - content.y) / CARD_HEIGHT) as usize;
        let target = page_start + offset;
        if offset < size && target < self.filtered().len() {
            self.selected = target;
        }
    }

    pub fn toggle_selection_mode(&mut self) {
        self.selection_mode = !self.selection_mode;
        if !self.selection_mode {
            self.selected_ids.clear();
        }
        tracing::debug!("Selection mode: {}", self.selection_mode);
    }

    pub fn toggle_selected(&mut self) {
        let Some(id) = self.current_bookmark().map(|b| b.id) else {
            return;
        };
        if !self.selected_ids.remove(&id) {
            self.selected_ids.insert(id);
        }
    }

    /// Select every visible bookmark, or clear when all are selected already
    pub fn toggle_select_all(&mut self) {
        let visible: HashSet<u64> = self
            .filtered()
            .into_iter()
            .filter_map(|idx| self.bookmarks.get(idx).map(|b| b.id))
            .collect();
        if !visible.is_empty() && visible.is_subset(&self.selected_ids) {
            self.selected_ids.retain(|id| !visible.contains(id));
        } else {
            self.selected_ids.extend(visible);
        }
    }

    pub fn request_delete_current(&mut self) {
        let Some((id, title)) = self.current_bookmark().map(|b| (b.id, b.title.clone())) else {
            return;
        };
        self.pending_delete = Some(DeleteTarget::One(id));
        self.delete_dialog
            .show(format!("Delete \"{}\"? This cannot be undone.", title));
    }

    pub fn request_delete_selected(&mut self) {
        if self.selected_ids.is_empty() {
            self.set_status("No bookmarks selected");
            return;
        }
        self.pending_delete = Some(DeleteTarget::Selected);
        self.delete_dialog.show(format!(
            "Delete {} selected bookmarks? This cannot be undone.",
            self.selected_ids.len()
        ));
    }

    fn confirm_delete(&mut self) {
        let removed: Vec<u64> = match self.pending_delete.take() {
            Some(DeleteTarget::One(id)) => {
                if BookmarkManager::delete_bookmark(&mut self.bookmarks, id) {
                    vec![id]
                } else {
                    Vec::new()
                }
            }
            Some(DeleteTarget::Selected) => {
                let ids = std::mem::take(&mut self.selected_ids);
                BookmarkManager::delete_many(&mut self.bookmarks, &ids);
                self.selection_mode = false;
                ids.into_iter().collect()
            }
            None => return,
        };

        for id in &removed {
            self.store.remove_item(&bookmark_urls_key(*id));
        }
        self.clamp_selection();
        self.set_status(format!("Deleted {} bookmark(s)", removed.len()));
        self.persist_bookmarks();
    }

    // Modals

    pub fn open_add(&mut self) {
        match self.page {
            Page::Bookmarks => self.add_state.open(),
            Page::MyDay => self.todo_state.open(),
            Page::ModalExamples => {}
        }
    }

    pub fn open_memo(&mut self) {
        let Some(bookmark) = self.current_bookmark().cloned() else {
            return;
        };
        tracing::info!("Editing memo of bookmark {}", bookmark.id);
        self.memo_editor.load(&bookmark, &self.store);
        self.memo_state.open();
    }

    pub fn open_help(&mut self) {
        self.help_state.open();
    }

    pub fn apply_add_action(&mut self, action: FormAction, now: Instant) {
        match action {
            FormAction::Submit => {
                let draft = match self.add_form.build() {
                    Ok(draft) => draft,
                    Err(e) => return self.add_form.set_error(e),
                };
                match BookmarkManager::add_bookmark(&mut self.bookmarks, draft, Utc::now()) {
                    Ok(_) => {
                        self.search.clear();
                        self.selected = 0;
                        self.persist_bookmarks();
                        self.set_status("Bookmark added");
                        self.add_modal
                            .request_close(CloseReason::Action, now, &mut self.doc);
                    }
                    Err(e) => self.add_form.set_error(e),
                }
            }
            FormAction::Cancel => {
                self.add_modal
                    .request_close(CloseReason::Action, now, &mut self.doc);
            }
            _ => {}
        }
    }

    pub fn apply_memo_action(&mut self, action: FormAction) {
        match action {
            FormAction::Submit => match self.memo_editor.save() {
                Ok(updated) => {
                    match BookmarkManager::update_bookmark(&mut self.bookmarks, updated) {
                        Ok(()) => {
                            self.persist_bookmarks();
                            self.set_status("Memo saved");
                        }
                        Err(e) => self.set_status(e),
                    }
                }
                Err(e) => self.set_status(e),
            },
            FormAction::CopyUrl(url) => self.requests.push(TaskRequest::Copy(url)),
            FormAction::OpenUrl(url) => self.requests.push(TaskRequest::Open(url)),
            _ => {}
        }
    }

    pub fn apply_todo_action(&mut self, action: FormAction, now: Instant) {
        match action {
            FormAction::Submit => {
                let draft = match self.todo_form.build() {
                    Ok(draft) => draft,
                    Err(e) => return self.todo_form.set_error(e),
                };
                match TodoManager::add_todo(&mut self.todos, draft) {
                    Ok(_) => {
                        self.todo_selected = self.todos.len().saturating_sub(1);
                        self.persist_todos();
                        self.todo_modal
                            .request_close(CloseReason::Action, now, &mut self.doc);
                    }
                    Err(e) => self.todo_form.set_error(e),
                }
            }
            FormAction::Cancel => {
                self.todo_modal
                    .request_close(CloseReason::Action, now, &mut self.doc);
            }
            _ => {}
        }
    }

    // My day

    pub fn todo_next(&mut self) {
        if !self.todos.is_empty() {
            self.todo_selected = (self.todo_selected + 1).min(self.todos.len() - 1);
        }
    }

    pub fn todo_previous(&mut self) {
        self.todo_selected = self.todo_selected.saturating_sub(1);
    }

    // Background tasks

    pub fn take_requests(&mut self) -> Vec<TaskRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn handle_task_message(&mut self, message: TaskMessage) {
        match message {
            TaskMessage::UrlCopied { url } => {
                self.notice.show(format!("Copied to clipboard:\n{}", url));
            }
            TaskMessage::CopyFailed { error } => {
                self.set_status(format!("Copy failed: {}", error));
            }
            TaskMessage::UrlOpened { url } => self.set_status(format!("Opened {}", url)),
            TaskMessage::OpenFailed { url, error } => {
                self.set_status(format!("Could not open {}: {}", url, error));
            }
        }
    }

    // Persistence methods

    fn persist_bookmarks(&mut self) {
        if let Err(e) = self.persistence.save_bookmarks(&self.bookmarks) {
            tracing::error!("Failed to save bookmarks: {:#}", e);
            self.set_status("Failed to save bookmarks");
        }
    }

    fn persist_todos(&mut self) {
        if let Err(e) = self.persistence.save_todos(&self.todos) {
            tracing::error!("Failed to save todos: {:#}", e);
            self.set_status("Failed to save todos");
        }
    }

    pub fn save_state(&mut self) -> anyhow::Result<()> {
        self.persistence.save_bookmarks(&self.bookmarks)?;
        self.persistence.save_todos(&self.todos)?;
        self.persistence.save_config(&self.config)?;
        Ok(())
    }
}

/// Per-frame step shared by the content modals
fn step(
    modal: &mut ModalController,
    state: ModalState,
    body: Vec<FocusNode>,
    screen: Rect,
    now: Instant,
    doc: &mut Document,
) {
    modal.sync(state.is_open(), now, doc);
    modal.mount(screen, body, doc);
    modal.tick(now, doc);
}
