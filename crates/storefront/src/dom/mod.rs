//! In-memory document model.
//!
//! Controllers never touch markup directly; they read and patch a
//! [`Document`] through a shared [`Page`] handle. The model covers what the
//! storefront scripts need from a browser DOM: element lookup by id and
//! selector, ancestor walks, class lists, attributes, text content and
//! `innerHTML` (fragments are parsed with `scraper`).
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Removing a node
//! frees its whole subtree for reuse; ids carry a generation, so a stale id
//! held by a controller or timer resolves to nothing instead of to whichever
//! node took over its slot.

mod html;
mod selector;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use selector::Selector;

/// Class toggled to show and hide elements.
pub const HIDDEN: &str = "hidden";

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

/// Tag, attributes and class list of an element node.
#[derive(Debug, Clone, Default)]
pub(crate) struct ElementData {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena slot. `generation` is bumped every time the slot is freed.
#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Detached element description used to build trees.
///
/// ```rust
/// use verzend_storefront::dom::{Document, Element};
///
/// let mut doc = Document::new();
/// let body = doc.body();
/// let badge = doc.append(body, Element::new("span").class("cart-count").text("0"));
/// assert_eq!(doc.text_content(badge), "0");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Element {
    data: ElementData,
    children: Vec<Child>,
}

#[derive(Debug, Clone)]
enum Child {
    Element(Element),
    Text(String),
}

impl Element {
    /// Start an element with the given tag name.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            data: ElementData {
                tag: tag.to_ascii_lowercase(),
                ..ElementData::default()
            },
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add one or more whitespace-separated classes.
    #[must_use]
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            push_class(&mut self.data.classes, class);
        }
        self
    }

    /// Set an attribute. `class` is routed into the class list.
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name == "class" {
            self.data.classes.clear();
            return self.class(value);
        }
        self.data.attributes.insert(name, value.to_string());
        self
    }

    /// Set a `data-*` attribute.
    #[must_use]
    pub fn data(self, key: &str, value: &str) -> Self {
        self.attr(&format!("data-{key}"), value)
    }

    /// Append a text child.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.children.push(Child::Text(text.to_string()));
        self
    }

    /// Append an element child.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(Child::Element(child));
        self
    }

    #[cfg(test)]
    pub(crate) fn into_data(self) -> ElementData {
        self.data
    }
}

fn push_class(classes: &mut Vec<String>, class: &str) {
    if !classes.iter().any(|c| c == class) {
        classes.push(class.to_string());
    }
}

/// An element tree rooted at `<body>`.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only `<body>`.
    #[must_use]
    pub fn new() -> Self {
        let body = Node {
            data: NodeData::Element(ElementData {
                tag: "body".to_string(),
                ..ElementData::default()
            }),
            parent: None,
            children: Vec::new(),
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(body),
            }],
            free: Vec::new(),
            body: NodeId {
                index: 0,
                generation: 0,
            },
        }
    }

    /// The root `<body>` element.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    // =========================================================================
    // Tree construction
    // =========================================================================

    /// Create a detached subtree and return its root.
    ///
    /// The subtree lives until it is appended and later removed, or until
    /// it is passed to [`Document::remove`] directly.
    pub fn create(&mut self, element: Element) -> NodeId {
        let id = self.push_node(NodeData::Element(element.data));
        for child in element.children {
            let child_id = match child {
                Child::Element(el) => self.create(el),
                Child::Text(text) => self.push_node(NodeData::Text(text)),
            };
            self.link(id, child_id);
        }
        id
    }

    /// Create a subtree and append it to `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.create(element);
        self.append_child(parent, id);
        id
    }

    /// Move `child` to the end of `parent`'s children.
    ///
    /// Appending a node into its own subtree is ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() || self.node(child).is_none() || self.contains(child, parent)
        {
            return;
        }
        self.detach(child);
        self.link(parent, child);
    }

    /// Remove a node and its subtree from the document and free them.
    ///
    /// Ids of removed nodes no longer resolve. `<body>` cannot be removed.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.body || self.node(node).is_none() {
            return;
        }
        self.detach(node);
        self.free_subtree(node);
    }

    /// Whether the node is connected to `<body>`.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.body, node)
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[], |n| n.children.as_slice())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// First attached element with the given id, in document order.
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body, true)
            .into_iter()
            .find(|n| self.attribute(*n, "id") == Some(id))
    }

    /// All attached elements (including `<body>`) matching `selector`, in
    /// document order.
    #[must_use]
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.filter_matching(self.descendants(self.body, true), selector)
    }

    /// Descendants of `root` (excluding `root`) matching `selector`.
    #[must_use]
    pub fn query_selector_all_in(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.filter_matching(self.descendants(root, false), selector)
    }

    /// First descendant of `root` matching `selector`.
    #[must_use]
    pub fn query_selector_in(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(root, false)
            .into_iter()
            .find(|n| self.matches(*n, selector))
    }

    /// Nearest inclusive ancestor of `node` matching `selector`.
    #[must_use]
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.matches(id, selector) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether `node` is an element matching `selector`.
    #[must_use]
    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        self.element(node).is_some_and(|el| selector.matches(el))
    }

    // =========================================================================
    // Element state
    // =========================================================================

    /// Attribute value. The class list is not exposed through this method;
    /// use [`Document::classes`].
    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|el| el.attributes.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Set an attribute. Setting `class` replaces the class list.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(el) = self.element_mut(node) {
            if name == "class" {
                el.classes.clear();
                for class in value.split_whitespace() {
                    push_class(&mut el.classes, class);
                }
            } else {
                el.attributes.insert(name, value.to_string());
            }
        }
    }

    /// Value of the `data-{key}` attribute.
    #[must_use]
    pub fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.attribute(node, &format!("data-{key}"))
    }

    /// Current value of a form control.
    #[must_use]
    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.attribute(node, "value")
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.set_attribute(node, "value", value);
    }

    #[must_use]
    pub fn classes(&self, node: NodeId) -> &[String] {
        self.element(node).map_or(&[], |el| el.classes.as_slice())
    }

    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            push_class(&mut el.classes, class);
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Flip a class and return whether it is now present.
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        let present = !self.has_class(node, class);
        self.set_class(node, class, present);
        present
    }

    /// Add `class` when `present` is true, remove it otherwise.
    pub fn set_class(&mut self, node: NodeId, class: &str, present: bool) {
        if present {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Concatenated text of the node and its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(NodeData::Text(existing)) = self.node_mut(node).map(|n| &mut n.data) {
            text.clone_into(existing);
            return;
        }
        self.clear_children(node);
        let text_node = self.push_node(NodeData::Text(text.to_string()));
        self.link(node, text_node);
    }

    /// Serialize the node's children as HTML.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.serialize(*child, &mut out);
        }
        out
    }

    /// Replace all children with the nodes parsed from `markup`.
    pub fn set_inner_html(&mut self, node: NodeId, markup: &str) {
        if self.element(node).is_none() {
            return;
        }
        self.clear_children(node);
        for child in html::parse_fragment(markup) {
            let child_id = match child {
                Child::Element(el) => self.create(el),
                Child::Text(text) => self.push_node(NodeData::Text(text)),
            };
            self.link(node, child_id);
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.node_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let node = Node {
            data,
            parent: None,
            children: Vec::new(),
        };
        if let Some(index) = self.free.pop()
            && let Some(slot) = self.slots.get_mut(index)
        {
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Unlink a node from its parent without freeing it.
    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != node);
        }
        if let Some(n) = self.node_mut(node) {
            n.parent = None;
        }
    }

    /// Free `root` and every node below it. `root` must already be detached.
    fn free_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(id.index)
                .filter(|slot| slot.generation == id.generation)
            else {
                continue;
            };
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            stack.extend(node.children);
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
    }

    fn clear_children(&mut self, node: NodeId) {
        let children = self
            .node_mut(node)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();
        for child in children {
            self.free_subtree(child);
        }
    }

    /// Number of live nodes and the arena capacity in slots.
    #[cfg(test)]
    pub(crate) fn arena_usage(&self) -> (usize, usize) {
        let live = self.slots.iter().filter(|s| s.node.is_some()).count();
        (live, self.slots.len())
    }

    /// Pre-order element descendants of `root`.
    fn descendants(&self, root: NodeId, include_root: bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if (include_root || id != root) && self.element(id).is_some() {
                out.push(id);
            }
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    fn filter_matching(&self, nodes: Vec<NodeId>, selector: &Selector) -> Vec<NodeId> {
        nodes
            .into_iter()
            .filter(|n| self.matches(*n, selector))
            .collect()
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match self.node(node).map(|n| &n.data) {
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Element(_)) => {
                for child in self.children(node) {
                    self.collect_text(*child, out);
                }
            }
            None => {}
        }
    }

    fn serialize(&self, node: NodeId, out: &mut String) {
        match self.node(node).map(|n| &n.data) {
            Some(NodeData::Text(text)) => out.push_str(&html::escape_text(text)),
            Some(NodeData::Element(el)) => {
                html::open_tag(el, out);
                if html::is_void(&el.tag) {
                    return;
                }
                for child in self.children(node) {
                    self.serialize(*child, out);
                }
                html::close_tag(el, out);
            }
            None => {}
        }
    }
}

/// Shared, cloneable handle to a [`Document`].
///
/// Every controller and every spawned timer task holds one. The lock is
/// never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct Page {
    inner: Arc<Mutex<Document>>,
}

impl Page {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            inner: Arc::new(Mutex::new(document)),
        }
    }

    /// Run `f` with shared access to the document.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.lock())
    }

    /// Run `f` with exclusive access to the document.
    pub fn write<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        // A panic inside a read/write closure leaves the tree structurally
        // valid, so a poisoned lock is still safe to use.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let wrapper = doc.append(
            body,
            Element::new("div")
                .data("quantity-wrapper", "")
                .data("product-id", "7")
                .child(
                    Element::new("button")
                        .data("quantity-btn", "increase")
                        .child(Element::new("span").text("+")),
                )
                .child(Element::new("input").attr("type", "number").attr("value", "3")),
        );
        let button = doc.children(wrapper)[0];
        let icon = doc.children(button)[0];
        (doc, wrapper, button, icon)
    }

    #[test]
    fn test_closest_walks_inclusive_ancestors() {
        let (doc, wrapper, button, icon) = sample();
        let btn = Selector::attr("data-quantity-btn");
        assert_eq!(doc.closest(icon, &btn), Some(button));
        assert_eq!(doc.closest(button, &btn), Some(button));
        assert_eq!(
            doc.closest(icon, &Selector::attr("data-quantity-wrapper")),
            Some(wrapper)
        );
        assert_eq!(doc.closest(wrapper, &btn), None);
    }

    #[test]
    fn test_query_selector_scoped_and_global() {
        let (doc, wrapper, _, _) = sample();
        let input = Selector::tag("input").with_attr_value("type", "number");
        let found = doc.query_selector_in(wrapper, &input).unwrap();
        assert_eq!(doc.value(found), Some("3"));
        assert_eq!(doc.query_selector_all(&input), vec![found]);
        assert!(doc.query_selector_all_in(found, &input).is_empty());
    }

    #[test]
    fn test_detached_nodes_do_not_match() {
        let (mut doc, wrapper, _, _) = sample();
        doc.remove(wrapper);
        assert!(!doc.is_attached(wrapper));
        assert!(doc.query_selector_all(&Selector::tag("input")).is_empty());
        assert!(doc.get_element_by_id("anything").is_none());
    }

    #[test]
    fn test_class_list_operations() {
        let mut doc = Document::new();
        let body = doc.body();
        let menu = doc.append(body, Element::new("nav").id("mobile-menu").class("hidden md:flex"));

        assert!(doc.has_class(menu, HIDDEN));
        assert!(!doc.toggle_class(menu, HIDDEN));
        assert!(!doc.has_class(menu, HIDDEN));
        assert!(doc.toggle_class(menu, HIDDEN));
        doc.add_class(menu, HIDDEN);
        assert_eq!(doc.classes(menu), ["md:flex", "hidden"]);
        doc.set_class(menu, HIDDEN, false);
        assert_eq!(doc.classes(menu), ["md:flex"]);
    }

    #[test]
    fn test_set_text_replaces_children() {
        let (mut doc, wrapper, _, _) = sample();
        doc.set_text(wrapper, "<b>5</b>");
        assert_eq!(doc.text_content(wrapper), "<b>5</b>");
        assert_eq!(doc.inner_html(wrapper), "&lt;b&gt;5&lt;/b&gt;");
        assert_eq!(doc.children(wrapper).len(), 1);
    }

    #[test]
    fn test_inner_html_parses_into_nodes() {
        let mut doc = Document::new();
        let body = doc.body();
        let results = doc.append(body, Element::new("div").id("search-results"));

        doc.set_inner_html(
            results,
            r#"<a href="/p/1" class="dropdown-item"><img src="/a.png" data-fallback-src="/x.svg"><p>Tent</p></a>"#,
        );

        let links = doc.query_selector_all_in(results, &Selector::class("dropdown-item"));
        assert_eq!(links.len(), 1);
        assert_eq!(doc.attribute(links[0], "href"), Some("/p/1"));
        assert_eq!(doc.text_content(results), "Tent");
        let img = doc.query_selector_in(results, &Selector::tag("img")).unwrap();
        assert_eq!(doc.data(img, "fallback-src"), Some("/x.svg"));
        assert!(doc.contains(results, img));
    }

    #[test]
    fn test_inner_html_serialization_escapes() {
        let mut doc = Document::new();
        let body = doc.body();
        let wrapper = doc.append(
            body,
            Element::new("div").child(
                Element::new("p")
                    .attr("title", "a \"quote\" & <tag>")
                    .text("1 < 2"),
            ),
        );
        assert_eq!(
            doc.inner_html(wrapper),
            "<p title=\"a &quot;quote&quot; &amp; &lt;tag&gt;\">1 &lt; 2</p>"
        );
    }

    #[test]
    fn test_append_child_moves_node() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.append(body, Element::new("div").id("a"));
        let b = doc.append(body, Element::new("div").id("b"));
        let leaf = doc.append(a, Element::new("span"));

        doc.append_child(b, leaf);
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.parent(leaf), Some(b));

        // Cycles are refused.
        doc.append_child(leaf, b);
        assert_eq!(doc.parent(b), Some(body));
    }

    #[test]
    fn test_removed_ids_go_stale() {
        let (mut doc, wrapper, button, _) = sample();
        doc.remove(wrapper);
        assert!(doc.children(wrapper).is_empty());
        assert_eq!(doc.data(button, "quantity-btn"), None);

        // The freed slots are reused, but the old ids stay dead.
        let body = doc.body();
        let fresh = doc.append(body, Element::new("div").id("fresh"));
        assert_ne!(fresh, wrapper);
        assert!(!doc.is_attached(wrapper));
        assert_eq!(doc.attribute(wrapper, "id"), None);
        assert_eq!(doc.get_element_by_id("fresh"), Some(fresh));
    }

    #[test]
    fn test_body_cannot_be_removed() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.remove(body);
        assert!(doc.is_attached(body));
    }

    #[test]
    fn test_repeated_renders_reuse_the_arena() {
        let mut doc = Document::new();
        let body = doc.body();
        let results = doc.append(body, Element::new("div").id("search-results"));
        let badge = doc.append(body, Element::new("span").class("cart-count"));
        let markup = r#"<a href="/p/1" class="dropdown-item"><img src="/a.png"><div><p>Tent</p><p>€5.00</p></div></a>"#;

        doc.set_inner_html(results, markup);
        doc.set_text(badge, "1");
        let (live_once, slots_once) = doc.arena_usage();

        for n in 0..1000 {
            doc.set_inner_html(results, markup);
            doc.set_text(badge, &n.to_string());
        }

        let (live, slots) = doc.arena_usage();
        assert_eq!(live, live_once);
        assert!(slots <= slots_once + 1, "arena grew to {slots} slots");
        assert_eq!(doc.text_content(badge), "999");
    }

    #[test]
    fn test_page_handle_shares_document() {
        let page = Page::new(Document::new());
        let clone = page.clone();
        let id = page.write(|doc| {
            let body = doc.body();
            doc.append(body, Element::new("span").id("badge"))
        });
        assert_eq!(clone.read(|doc| doc.get_element_by_id("badge")), Some(id));
    }
}
