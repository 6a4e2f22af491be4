//! Declarative object model: the in-memory application tree.
//!
//! An `Application` owns an ordered sequence of `Page`s; a `Page` owns an
//! ordered sequence of `Element`s. Every node has a stable `id` (assigned at
//! creation, never reused), a human-readable `name` (may repeat across
//! nodes), and a property bag. Child ordering is significant and preserved
//! through edits, serialization, and generation.
//!
//! The tree is a pure data structure: construction performs no validation
//! and no evaluation. Id uniqueness within a tree is a caller obligation;
//! the editor that builds the tree upholds it, and can check explicitly via
//! [`Application::verify_unique_ids`] after building or reloading. The
//! generator and type engine only ever read the tree.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ═══════════════════════════════════════════════════════════════════════════════
// PROPERTY VALUES
// ═══════════════════════════════════════════════════════════════════════════════

/// A property is either a literal of a declared kind or an expression string
/// in the target language's syntax. Expression content is opaque to the
/// core: it is carried and emitted verbatim, never parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PropertyValue {
    Literal(serde_json::Value),
    Expression(String),
}

impl PropertyValue {
    pub fn literal(value: impl Into<serde_json::Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn expression(code: impl Into<String>) -> Self {
        Self::Expression(code.into())
    }
}

/// Ordered property bag. A `BTreeMap` keeps iteration deterministic, which
/// in turn keeps generated output byte-stable for value-equal trees.
pub type PropertyBag = BTreeMap<String, PropertyValue>;

// ═══════════════════════════════════════════════════════════════════════════════
// NODES
// ═══════════════════════════════════════════════════════════════════════════════

/// Root of the tree: the application, owning its pages in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: PropertyBag,
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// A page, owning its elements in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: PropertyBag,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// Leaf element kinds. A closed variant set: the generator and the schema
/// layer dispatch over the tag exhaustively, so adding a kind is a
/// compile-checked change everywhere it matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Element {
    Text(TextElement),
    Button(ButtonElement),
    Image(ImageElement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: PropertyBag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonElement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: PropertyBag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: PropertyBag,
}

impl Element {
    pub fn id(&self) -> &str {
        match self {
            Element::Text(e) => &e.id,
            Element::Button(e) => &e.id,
            Element::Image(e) => &e.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Element::Text(e) => &e.name,
            Element::Button(e) => &e.name,
            Element::Image(e) => &e.name,
        }
    }

    pub fn properties(&self) -> &PropertyBag {
        match self {
            Element::Text(e) => &e.properties,
            Element::Button(e) => &e.properties,
            Element::Image(e) => &e.properties,
        }
    }

    /// Tag used for the construct factory in generated output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Text(_) => "text",
            Element::Button(_) => "button",
            Element::Image(_) => "image",
        }
    }
}

/// Borrowed reference to any node in a tree, as returned by
/// [`Application::find`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Application(&'a Application),
    Page(&'a Page),
    Element(&'a Element),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &str {
        match self {
            NodeRef::Application(a) => &a.id,
            NodeRef::Page(p) => &p.id,
            NodeRef::Element(e) => e.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            NodeRef::Application(a) => &a.name,
            NodeRef::Page(p) => &p.name,
            NodeRef::Element(e) => e.name(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONSTRUCTION & QUERIES
// ═══════════════════════════════════════════════════════════════════════════════

impl Application {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties: PropertyBag::new(),
            pages: Vec::new(),
        }
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    /// Depth-first lookup by id. Node identity is its id; this is the cheap
    /// query surface collaborators use instead of scanning themselves.
    pub fn find(&self, id: &str) -> Option<NodeRef<'_>> {
        if self.id == id {
            return Some(NodeRef::Application(self));
        }
        for page in &self.pages {
            if page.id == id {
                return Some(NodeRef::Page(page));
            }
            for element in &page.elements {
                if element.id() == id {
                    return Some(NodeRef::Element(element));
                }
            }
        }
        None
    }

    /// Full-tree scan for duplicate ids. Construction never runs this
    /// implicitly; the editor invokes it after building or reloading a
    /// tree. Returns the first duplicate encountered in document order.
    pub fn verify_unique_ids(&self) -> Result<(), ModelError> {
        let mut ids: Vec<&str> = vec![self.id.as_str()];
        for page in &self.pages {
            ids.push(page.id.as_str());
            for element in &page.elements {
                ids.push(element.id());
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                return Err(ModelError::DuplicateId { id: id.to_string() });
            }
        }
        Ok(())
    }
}

impl Page {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties: PropertyBag::new(),
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }
}

impl TextElement {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties: PropertyBag::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }
}

impl ButtonElement {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties: PropertyBag::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }
}

impl ImageElement {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties: PropertyBag::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_app() -> Application {
        Application::new("app-1", "test1").with_page(
            Page::new("page-1", "Page 1")
                .with_element(Element::Text(
                    TextElement::new("el-1", "Text 1")
                        .with_property("text", PropertyValue::expression("\"Hi there!\"")),
                ))
                .with_element(Element::Button(
                    ButtonElement::new("el-2", "Button 1")
                        .with_property("label", PropertyValue::literal("Go")),
                )),
        )
    }

    #[test]
    fn find_locates_nodes_at_every_depth() {
        let app = sample_app();
        assert!(matches!(app.find("app-1"), Some(NodeRef::Application(_))));
        assert!(matches!(app.find("page-1"), Some(NodeRef::Page(_))));
        match app.find("el-2") {
            Some(NodeRef::Element(e)) => assert_eq!(e.name(), "Button 1"),
            other => panic!("expected element, got {:?}", other),
        }
        assert!(app.find("missing").is_none());
    }

    #[test]
    fn verify_unique_ids_accepts_a_well_formed_tree() {
        assert_eq!(sample_app().verify_unique_ids(), Ok(()));
    }

    #[test]
    fn verify_unique_ids_reports_the_first_duplicate() {
        let mut app = sample_app();
        app.pages[0]
            .elements
            .push(Element::Text(TextElement::new("el-1", "Shadow")));
        assert_eq!(
            app.verify_unique_ids(),
            Err(crate::error::ModelError::DuplicateId {
                id: "el-1".to_string()
            })
        );
    }

    #[test]
    fn element_order_survives_serialization() {
        let app = sample_app();
        let serialized = serde_json::to_string(&app).unwrap();
        let reloaded: Application = serde_json::from_str(&serialized).unwrap();
        assert_eq!(app, reloaded);
        assert_eq!(reloaded.pages[0].elements[0].name(), "Text 1");
        assert_eq!(reloaded.pages[0].elements[1].name(), "Button 1");
    }

    #[test]
    fn property_values_tag_literals_and_expressions() {
        let literal = serde_json::to_value(PropertyValue::literal(json!(4))).unwrap();
        assert_eq!(literal, json!({"type": "literal", "value": 4}));

        let expression = serde_json::to_value(PropertyValue::expression("2 + 2")).unwrap();
        assert_eq!(expression, json!({"type": "expression", "value": "2 + 2"}));
    }
}
