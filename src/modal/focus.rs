//! Focus model shared by the page and every mounted modal.
//!
//! The [`Document`] is the terminal counterpart of a DOM focus tree: each
//! layer (the page, or one modal) mounts an ordered list of [`FocusNode`]s
//! every frame, and exactly one node may be active. Nodes carry the `Rect`
//! they were laid out in, so a node with no area counts as hidden.

use ratatui::layout::Rect;
use std::fmt;

/// Identifies a focusable node, e.g. `"add.title"` or `"memo.url.2"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FocusId(String);

impl FocusId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FocusId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FocusId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for FocusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusKind {
    Button,
    Input,
    TextArea,
    Select,
    /// A link only takes focus when it points somewhere
    Link { has_target: bool },
    /// Free-form editable region (the memo body)
    Editable,
    /// Non-interactive container; focusable only through an explicit tab index
    Container,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusNode {
    pub id: FocusId,
    pub kind: FocusKind,
    pub disabled: bool,
    pub tab_index: Option<i32>,
    pub area: Rect,
}

impl FocusNode {
    pub fn new(id: impl Into<FocusId>, kind: FocusKind, area: Rect) -> Self {
        Self {
            id: id.into(),
            kind,
            disabled: false,
            tab_index: None,
            area,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = Some(index);
        self
    }

    /// Whether the node may take focus at all, ignoring visibility
    pub fn is_focusable(&self) -> bool {
        if matches!(self.tab_index, Some(idx) if idx < 0) {
            return false;
        }
        if self.tab_index.is_some() {
            return true;
        }
        match self.kind {
            FocusKind::Button | FocusKind::Input | FocusKind::TextArea | FocusKind::Select => {
                !self.disabled
            }
            FocusKind::Link { has_target } => has_target,
            FocusKind::Editable => true,
            FocusKind::Container => false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.area.width > 0 && self.area.height > 0
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.is_visible() && self.area.contains((column, row).into())
    }
}

/// A mount point in the document. The page is always beneath every modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Page,
    Modal(u32),
}

#[derive(Debug, Default)]
pub struct Document {
    layers: Vec<(Layer, Vec<FocusNode>)>,
    active: Option<FocusId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount or replace the nodes of a layer
    pub fn mount(&mut self, layer: Layer, nodes: Vec<FocusNode>) {
        if let Some(entry) = self.layers.iter_mut().find(|(l, _)| *l == layer) {
            entry.1 = nodes;
        } else {
            self.layers.push((layer, nodes));
        }
    }

    /// Remove a layer. Focus inside it is dropped.
    pub fn unmount(&mut self, layer: Layer) {
        let was_active = self
            .active
            .as_ref()
            .is_some_and(|id| self.layer_of(id) == Some(layer));
        self.layers.retain(|(l, _)| *l != layer);
        if was_active {
            self.active = None;
        }
    }

    pub fn nodes(&self, layer: Layer) -> &[FocusNode] {
        self.layers
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, nodes)| nodes.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_attached(&self, id: &FocusId) -> bool {
        self.layer_of(id).is_some()
    }

    fn layer_of(&self, id: &FocusId) -> Option<Layer> {
        self.layers
            .iter()
            .find(|(_, nodes)| nodes.iter().any(|n| &n.id == id))
            .map(|(layer, _)| *layer)
    }

    pub fn active(&self) -> Option<&FocusId> {
        self.active.as_ref()
    }

    pub fn is_focused(&self, id: &str) -> bool {
        self.active.as_ref().is_some_and(|a| a.as_str() == id)
    }

    /// Focus a node. Detached nodes are refused.
    pub fn focus(&mut self, id: &FocusId) -> bool {
        if !self.is_attached(id) {
            tracing::debug!("Refusing focus on detached node {}", id);
            return false;
        }
        self.active = Some(id.clone());
        true
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Focusable, visible nodes of a layer, in tree order
    pub fn tabbable(&self, layer: Layer) -> Vec<&FocusNode> {
        self.nodes(layer)
            .iter()
            .filter(|n| n.is_focusable() && n.is_visible())
            .collect()
    }

    /// Move focus within `layer`, wrapping at both ends
    ///
    /// Returns the newly focused node, or `None` when the layer has nothing
    /// to focus.
    pub fn cycle(&mut self, layer: Layer, backward: bool) -> Option<FocusId> {
        let target = {
            let ring = self.tabbable(layer);
            let first = ring.first()?;
            let last = ring.last()?;
            let position = self
                .active
                .as_ref()
                .and_then(|a| ring.iter().position(|n| &n.id == a));

            match (position, backward) {
                (None, false) => first.id.clone(),
                (None, true) => last.id.clone(),
                (Some(idx), false) if idx + 1 == ring.len() => first.id.clone(),
                (Some(0), true) => last.id.clone(),
                (Some(idx), false) => ring[idx + 1].id.clone(),
                (Some(idx), true) => ring[idx - 1].id.clone(),
            }
        };
        self.active = Some(target.clone());
        Some(target)
    }

    /// Topmost focus node under a screen position, if any
    pub fn hit_test(&self, layer: Layer, column: u16, row: u16) -> Option<&FocusNode> {
        self.nodes(layer)
            .iter()
            .rev()
            .find(|n| n.contains(column, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(y: u16) -> Rect {
        Rect::new(0, y, 10, 1)
    }

    fn sample_doc() -> Document {
        let mut doc = Document::new();
        doc.mount(
            Layer::Modal(1),
            vec![
                FocusNode::new("a", FocusKind::Input, row(0)),
                FocusNode::new("hidden", FocusKind::Button, Rect::default()),
                FocusNode::new("off", FocusKind::Button, row(1)).disabled(true),
                FocusNode::new("b", FocusKind::TextArea, row(2)),
                FocusNode::new("link", FocusKind::Link { has_target: false }, row(3)),
                FocusNode::new("c", FocusKind::Button, row(4)),
            ],
        );
        doc
    }

    #[test]
    fn test_tabbable_filters_hidden_and_disabled() {
        let doc = sample_doc();
        let ids: Vec<&str> = doc
            .tabbable(Layer::Modal(1))
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tab_index_rules() {
        let plain = FocusNode::new("x", FocusKind::Container, row(0));
        assert!(!plain.is_focusable());
        assert!(plain.clone().tab_index(0).is_focusable());
        let button = FocusNode::new("y", FocusKind::Button, row(0)).tab_index(-1);
        assert!(!button.is_focusable());
    }

    #[test]
    fn test_cycle_wraps_forward_and_backward() {
        let mut doc = sample_doc();
        let layer = Layer::Modal(1);
        doc.focus(&"c".into());
        assert_eq!(doc.cycle(layer, false), Some("a".into()));
        assert_eq!(doc.cycle(layer, true), Some("c".into()));
        assert_eq!(doc.cycle(layer, true), Some("b".into()));
    }

    #[test]
    fn test_cycle_from_outside_layer() {
        let mut doc = sample_doc();
        doc.mount(Layer::Page, vec![FocusNode::new("page", FocusKind::Button, row(9))]);
        doc.focus(&"page".into());
        assert_eq!(doc.cycle(Layer::Modal(1), false), Some("a".into()));
        doc.focus(&"page".into());
        assert_eq!(doc.cycle(Layer::Modal(1), true), Some("c".into()));
    }

    #[test]
    fn test_cycle_empty_layer() {
        let mut doc = Document::new();
        doc.mount(Layer::Modal(2), Vec::new());
        assert_eq!(doc.cycle(Layer::Modal(2), false), None);
        assert!(doc.active().is_none());
    }

    #[test]
    fn test_unmount_drops_focus_inside_layer() {
        let mut doc = sample_doc();
        doc.focus(&"b".into());
        doc.unmount(Layer::Modal(1));
        assert!(doc.active().is_none());
        assert!(!doc.is_attached(&"b".into()));
        assert!(!doc.focus(&"b".into()));
    }
}
