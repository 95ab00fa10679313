//! Minimal DOM surface the editor patches through.
//!
//! [`Dom`] is the seam to a real document (a browser binding, a headless
//! renderer). [`MemoryDom`] is an arena-backed implementation used for
//! server-side previews and tests.

use std::collections::HashMap;

/// Handle to an element inside one [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// The subset of CSS selectors the editor needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// `[name]`
    HasAttr(&'a str),
    /// `[name="value"]`
    AttrEq(&'a str, &'a str),
    /// `tag`, case-insensitive.
    Tag(&'a str),
}

impl Selector<'_> {
    pub fn matches(&self, tag: &str, attribute: impl Fn(&str) -> Option<String>) -> bool {
        match self {
            Selector::HasAttr(name) => attribute(name).is_some(),
            Selector::AttrEq(name, value) => attribute(name).as_deref() == Some(*value),
            Selector::Tag(t) => tag.eq_ignore_ascii_case(t),
        }
    }
}

pub trait Dom {
    /// Matching descendants of `scope` in document order. `None` searches
    /// the whole document.
    fn query_all(&self, scope: Option<ElementId>, selector: &Selector<'_>) -> Vec<ElementId>;

    fn query(&self, scope: Option<ElementId>, selector: &Selector<'_>) -> Option<ElementId> {
        self.query_all(scope, selector).into_iter().next()
    }

    fn tag_name(&self, el: ElementId) -> Option<String>;
    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str);
    /// Replace all children with a single text node.
    fn set_text(&mut self, el: ElementId, text: &str);
    /// Replace all children with parsed markup.
    fn set_inner_html(&mut self, el: ElementId, html: &str);
    fn set_style(&mut self, el: ElementId, property: &str, value: &str);
    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> ElementId;
    /// Append `child` to `parent`, or to the document body when `None`.
    fn append_child(&mut self, parent: Option<ElementId>, child: ElementId);

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.query(None, &Selector::AttrEq("id", id))
    }
}

/// One element of a [`MemoryDom`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryElement {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    /// Inline style declarations in insertion order.
    pub style: Vec<(String, String)>,
    /// Text set through [`Dom::set_text`].
    pub text: Option<String>,
    /// Raw markup set through [`Dom::set_inner_html`]. Not parsed.
    pub inner_html: Option<String>,
    pub children: Vec<ElementId>,
    pub parent: Option<ElementId>,
}

impl MemoryElement {
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }
}

/// Arena-backed document. Element `0` is `<body>`. Elements are never
/// freed; replacing content only detaches the old children.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    elements: Vec<MemoryElement>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub const BODY: ElementId = ElementId(0);

    pub fn new() -> Self {
        Self {
            elements: vec![MemoryElement {
                tag: "body".to_string(),
                ..MemoryElement::default()
            }],
        }
    }

    pub fn element(&self, el: ElementId) -> Option<&MemoryElement> {
        self.elements.get(el.0)
    }

    fn element_mut(&mut self, el: ElementId) -> Option<&mut MemoryElement> {
        self.elements.get_mut(el.0)
    }

    /// Create an element with `attrs` and append it under `parent`.
    pub fn append(
        &mut self,
        parent: Option<ElementId>,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> ElementId {
        let el = self.create_element(tag);
        for (name, value) in attrs {
            self.set_attribute(el, name, value);
        }
        self.append_child(parent, el);
        el
    }

    /// Text content as last set, or `None` when never set.
    pub fn text(&self, el: ElementId) -> Option<&str> {
        self.element(el).and_then(|e| e.text.as_deref())
    }

    pub fn inner_html(&self, el: ElementId) -> Option<&str> {
        self.element(el).and_then(|e| e.inner_html.as_deref())
    }

    fn detach_children(&mut self, el: ElementId) {
        let children = match self.element_mut(el) {
            Some(e) => std::mem::take(&mut e.children),
            None => return,
        };
        for child in children {
            if let Some(c) = self.element_mut(child) {
                c.parent = None;
            }
        }
    }

    fn collect(&self, root: ElementId, selector: &Selector<'_>, out: &mut Vec<ElementId>) {
        let Some(node) = self.element(root) else {
            return;
        };
        for &child in &node.children {
            if let Some(c) = self.element(child) {
                if selector.matches(&c.tag, |name| c.attributes.get(name).cloned()) {
                    out.push(child);
                }
            }
            self.collect(child, selector, out);
        }
    }
}

impl Dom for MemoryDom {
    fn query_all(&self, scope: Option<ElementId>, selector: &Selector<'_>) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect(scope.unwrap_or(Self::BODY), selector, &mut out);
        out
    }

    fn tag_name(&self, el: ElementId) -> Option<String> {
        self.element(el).map(|e| e.tag.clone())
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.element(el).and_then(|e| e.attributes.get(name).cloned())
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(e) = self.element_mut(el) {
            e.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        self.detach_children(el);
        if let Some(e) = self.element_mut(el) {
            e.text = Some(text.to_string());
            e.inner_html = None;
        }
    }

    fn set_inner_html(&mut self, el: ElementId, html: &str) {
        self.detach_children(el);
        if let Some(e) = self.element_mut(el) {
            e.inner_html = Some(html.to_string());
            e.text = None;
        }
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        if let Some(e) = self.element_mut(el) {
            match e.style.iter_mut().find(|(p, _)| p == property) {
                Some(slot) => slot.1 = value.to_string(),
                None => e.style.push((property.to_string(), value.to_string())),
            }
        }
    }

    fn create_element(&mut self, tag: &str) -> ElementId {
        self.elements.push(MemoryElement {
            tag: tag.to_ascii_lowercase(),
            ..MemoryElement::default()
        });
        ElementId(self.elements.len() - 1)
    }

    fn append_child(&mut self, parent: Option<ElementId>, child: ElementId) {
        let parent = parent.unwrap_or(Self::BODY);
        if parent == child || self.element(parent).is_none() || self.element(child).is_none() {
            return;
        }
        if let Some(old) = self.element(child).and_then(|c| c.parent) {
            if let Some(p) = self.element_mut(old) {
                p.children.retain(|&c| c != child);
            }
        }
        if let Some(p) = self.element_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.element_mut(child) {
            c.parent = Some(parent);
        }
    }
}
