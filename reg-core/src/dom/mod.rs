//! In-memory document tree the form controller reads and mutates.
//!
//! The tree is an arena of [`Element`]s addressed by [`NodeId`]. It models
//! only the slice of a browser document the registration form needs:
//! element ids and names, form values, the `hidden` / `disabled` /
//! `checked` / `selected` flags, class lists, `data-*` attributes, the
//! inline `display` style and the focused element.
//!
//! Mutators silently ignore node ids that do not belong to the document;
//! readers return `None` or a neutral value for them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

mod markup;

pub use markup::{ActivityMarkup, ChoiceMarkup, ColorMarkup, PageMarkup};

/// Handle to an element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A single element of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub name: Option<String>,
    /// The `type` attribute of an `input` element.
    pub input_type: Option<String>,
    pub value: String,
    pub text: String,
    pub hidden: bool,
    pub disabled: bool,
    pub checked: bool,
    pub selected: bool,
    /// Inline `style.display`, `None` when no inline style is set.
    pub display: Option<String>,
    classes: Vec<String>,
    data: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Sets a `data-*` attribute; `key` is given without the `data-` prefix.
    pub fn with_data(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn is_checkbox(&self) -> bool {
        self.is_tag("input") && self.input_type.as_deref() == Some("checkbox")
    }
}

/// Arena-backed document tree.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Element>,
    ids: HashMap<String, NodeId>,
    active: Option<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached element (normally the root) and returns its handle.
    ///
    /// The first element carrying a given id wins lookups by that id.
    pub fn create(&mut self, element: Element) -> NodeId {
        let node = NodeId(self.nodes.len());
        if let Some(id) = &element.id {
            self.ids.entry(id.clone()).or_insert(node);
        }
        self.nodes.push(element);
        node
    }

    /// Creates `element` as the last child of `parent`.
    pub fn append(
        &mut self,
        parent: NodeId,
        mut element: Element,
    ) -> NodeId {
        element.parent = Some(parent);
        let node = self.create(element);
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.push(node);
        }
        node
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0)
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).and_then(Element::parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.element(node).map(Element::children).unwrap_or(&[])
    }

    pub fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&n| n == node)?;
        siblings.get(position + 1).copied()
    }

    /// Returns `true` when `node` is `ancestor` or lies somewhere below it.
    pub fn contains(
        &self,
        ancestor: NodeId,
        node: NodeId,
    ) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// All descendants of `root` with the given tag, in document order.
    pub fn descendants_by_tag(
        &self,
        root: NodeId,
        tag: &str,
    ) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.element(node).is_some_and(|e| e.is_tag(tag)) {
                found.push(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        found
    }

    /// The option elements of a `select`, in document order.
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants_by_tag(select, "option")
    }

    pub fn value(&self, node: NodeId) -> &str {
        self.element(node).map(|e| e.value.as_str()).unwrap_or("")
    }

    pub fn set_value(
        &mut self,
        node: NodeId,
        value: impl Into<String>,
    ) {
        if let Some(element) = self.element_mut(node) {
            element.value = value.into();
        }
    }

    pub fn text(&self, node: NodeId) -> &str {
        self.element(node).map(|e| e.text.as_str()).unwrap_or("")
    }

    pub fn set_text(
        &mut self,
        node: NodeId,
        text: impl Into<String>,
    ) {
        if let Some(element) = self.element_mut(node) {
            element.text = text.into();
        }
    }

    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| e.hidden)
    }

    pub fn set_hidden(
        &mut self,
        node: NodeId,
        hidden: bool,
    ) {
        if let Some(element) = self.element_mut(node) {
            element.hidden = hidden;
        }
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| e.disabled)
    }

    pub fn set_disabled(
        &mut self,
        node: NodeId,
        disabled: bool,
    ) {
        if let Some(element) = self.element_mut(node) {
            element.disabled = disabled;
        }
    }

    pub fn is_checked(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| e.checked)
    }

    pub fn set_checked(
        &mut self,
        node: NodeId,
        checked: bool,
    ) {
        if let Some(element) = self.element_mut(node) {
            element.checked = checked;
        }
    }

    pub fn is_selected(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| e.selected)
    }

    pub fn has_class(
        &self,
        node: NodeId,
        class: &str,
    ) -> bool {
        self.element(node).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(
        &mut self,
        node: NodeId,
        class: &str,
    ) {
        if let Some(element) = self.element_mut(node)
            && !element.has_class(class)
        {
            element.classes.push(class.to_string());
        }
    }

    pub fn remove_class(
        &mut self,
        node: NodeId,
        class: &str,
    ) {
        if let Some(element) = self.element_mut(node) {
            element.classes.retain(|c| c != class);
        }
    }

    pub fn data(
        &self,
        node: NodeId,
        key: &str,
    ) -> Option<&str> {
        self.element(node).and_then(|e| e.data(key))
    }

    pub fn display(&self, node: NodeId) -> Option<&str> {
        self.element(node).and_then(|e| e.display.as_deref())
    }

    pub fn set_display(
        &mut self,
        node: NodeId,
        display: &str,
    ) {
        if let Some(element) = self.element_mut(node) {
            element.display = Some(display.to_string());
        }
    }

    /// The value a `select` reports: its selected option's value, or the
    /// first option's value when nothing is selected.
    pub fn select_value(&self, select: NodeId) -> &str {
        let options = self.options(select);
        options
            .iter()
            .find(|&&option| self.is_selected(option))
            .or_else(|| options.first())
            .map(|&option| self.value(option))
            .unwrap_or("")
    }

    /// Selects the first option of `select` whose value is `value` and
    /// deselects every other option.
    ///
    /// Returns `false` (leaving no option selected) when nothing matches.
    pub fn select_by_value(
        &mut self,
        select: NodeId,
        value: &str,
    ) -> bool {
        let mut matched = false;
        for option in self.options(select) {
            let is_match = !matched && self.value(option) == value;
            matched |= is_match;
            if let Some(element) = self.element_mut(option) {
                element.selected = is_match;
            }
        }
        matched
    }

    /// Marks `option` selected and clears the flag on the other options of
    /// its `select`.
    pub fn select_option(&mut self, option: NodeId) {
        let select = self.parent(option);
        if let Some(select) = select {
            for sibling in self.options(select) {
                if let Some(element) = self.element_mut(sibling) {
                    element.selected = sibling == option;
                }
            }
        } else if let Some(element) = self.element_mut(option) {
            element.selected = true;
        }
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    /// Moves focus to `node`. Unknown nodes are ignored.
    pub fn focus(&mut self, node: NodeId) {
        if self.element(node).is_some() {
            self.active = Some(node);
        }
    }

    /// Clears focus if `node` currently holds it.
    pub fn blur(&mut self, node: NodeId) {
        if self.active == Some(node) {
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn color_select() -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new();
        let root = doc.create(Element::new("form"));
        let select = doc.append(root, Element::new("select").with_id("color"));
        let options = ["tomato", "gold", "tomato"]
            .into_iter()
            .map(|value| doc.append(select, Element::new("option").with_value(value)))
            .collect();
        (doc, select, options)
    }

    #[test]
    fn lookup_by_id_returns_first_registered_element() {
        let mut doc = Document::new();
        let root = doc.create(Element::new("div").with_id("dup"));
        let second = doc.append(root, Element::new("span").with_id("dup"));

        assert_eq!(doc.get_element_by_id("dup"), Some(root));
        assert_ne!(doc.get_element_by_id("dup"), Some(second));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn next_element_sibling_walks_parent_children() {
        let mut doc = Document::new();
        let root = doc.create(Element::new("div"));
        let first = doc.append(root, Element::new("select"));
        let second = doc.append(root, Element::new("input"));

        assert_eq!(doc.next_element_sibling(first), Some(second));
        assert_eq!(doc.next_element_sibling(second), None);
        assert_eq!(doc.next_element_sibling(root), None);
    }

    #[test]
    fn contains_includes_self_and_descendants() {
        let mut doc = Document::new();
        let root = doc.create(Element::new("fieldset"));
        let label = doc.append(root, Element::new("label"));
        let input = doc.append(label, Element::new("input"));
        let outside = doc.create(Element::new("div"));

        assert!(doc.contains(root, root));
        assert!(doc.contains(root, input));
        assert!(!doc.contains(label, root));
        assert!(!doc.contains(root, outside));
    }

    #[test]
    fn select_value_falls_back_to_first_option() {
        let (doc, select, _) = color_select();

        assert_eq!(doc.select_value(select), "tomato");
    }

    #[test]
    fn select_by_value_selects_only_first_match() {
        let (mut doc, select, options) = color_select();

        assert!(doc.select_by_value(select, "tomato"));
        assert!(doc.is_selected(options[0]));
        assert!(!doc.is_selected(options[2]));

        assert!(!doc.select_by_value(select, "steelblue"));
        assert!(options.iter().all(|&o| !doc.is_selected(o)));
    }

    #[test]
    fn select_option_is_exclusive() {
        let (mut doc, select, options) = color_select();

        doc.select_option(options[1]);
        doc.select_option(options[2]);

        assert!(!doc.is_selected(options[1]));
        assert!(doc.is_selected(options[2]));
        assert_eq!(doc.select_value(select), "tomato");
    }

    #[test]
    fn class_list_has_no_duplicates() {
        let mut doc = Document::new();
        let node = doc.create(Element::new("label"));

        doc.add_class(node, "valid");
        doc.add_class(node, "valid");
        assert_eq!(doc.element(node).unwrap().classes(), ["valid".to_string()]);

        doc.remove_class(node, "valid");
        assert!(!doc.has_class(node, "valid"));
    }

    #[test]
    fn blur_only_clears_matching_focus() {
        let mut doc = Document::new();
        let a = doc.create(Element::new("input"));
        let b = doc.create(Element::new("input"));

        doc.focus(a);
        doc.blur(b);
        assert_eq!(doc.active_element(), Some(a));

        doc.blur(a);
        assert_eq!(doc.active_element(), None);
    }
}
