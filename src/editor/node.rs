//! Typed content tree for visual-editor snapshots.
//!
//! The CMS sends schema-free JSON. [`ContentNode::parse`] resolves it once:
//! known component tags become dedicated [`Block`] variants, anything else
//! keeps a generic field map, and the child list is fixed in lookup order.
//!
//! ## Lookup order
//! Preorder. A node's own `_uid` is checked first, then the elements of its
//! `body` sequence in order, then every other field in document order whose
//! value is a node with a truthy `_uid` (or a sequence of such nodes). A
//! sequence nested directly in `body` is searched through its uid-carrying
//! items. Only string identifiers can match a lookup, but any truthy `_uid`
//! makes a node reachable.
//!
//! Identifiers are expected to be unique within one snapshot. When they are
//! not, [`ContentNode::find_by_uid`] returns the first node in that order and
//! later duplicates are unreachable.

use serde_json::{Map, Value};

pub const UID_FIELD: &str = "_uid";
pub const COMPONENT_FIELD: &str = "component";
pub const BODY_FIELD: &str = "body";

/// An asset reference such as `{ "filename": "https://...", "alt": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub filename: String,
    pub alt: Option<String>,
}

impl Asset {
    /// `None` unless `value` is an object with a non-empty `filename`.
    pub fn from_json(value: &Value) -> Option<Asset> {
        let obj = value.as_object()?;
        let filename = obj
            .get("filename")
            .and_then(Value::as_str)
            .filter(|f| !f.is_empty())?;
        Some(Asset {
            filename: filename.to_string(),
            alt: obj.get("alt").and_then(Value::as_str).map(str::to_string),
        })
    }

    pub fn alt_or_empty(&self) -> &str {
        self.alt.as_deref().unwrap_or("")
    }
}

/// JavaScript truthiness: null, `false`, `""`, zero and NaN are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => !n.as_f64().is_some_and(|f| f == 0.0 || f.is_nan()),
        _ => true,
    }
}

/// A field value that is present, i.e. neither null, `false`, `""` nor zero.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Strings, non-zero numbers and `true`, rendered as text.
    Text(String),
    Asset(Asset),
    /// Any other object or array.
    Structured(Value),
}

impl FieldValue {
    pub fn from_json(value: &Value) -> Option<FieldValue> {
        if !is_truthy(value) {
            return None;
        }
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(FieldValue::Text(b.to_string())),
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Number(n) => Some(FieldValue::Text(n.to_string())),
            Value::Object(_) => Some(
                Asset::from_json(value)
                    .map(FieldValue::Asset)
                    .unwrap_or_else(|| FieldValue::Structured(value.clone())),
            ),
            Value::Array(_) => Some(FieldValue::Structured(value.clone())),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_asset(&self) -> Option<&Asset> {
        match self {
            FieldValue::Asset(a) => Some(a),
            _ => None,
        }
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(FieldValue::from_json)
        .and_then(|v| v.as_text().map(str::to_string))
}

fn asset_field(obj: &Map<String, Value>, key: &str) -> Option<Asset> {
    obj.get(key).and_then(Asset::from_json)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeroFields {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub background_image: Option<Asset>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlockFields {
    /// Rich text, applied as HTML.
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBlockFields {
    pub image: Option<Asset>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogPostFields {
    pub title: Option<String>,
    /// Rich text, applied as HTML.
    pub content: Option<String>,
    /// `author.name` of a resolved author relation.
    pub author_name: Option<String>,
}

/// Component payload, resolved from the `component` tag at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Hero(HeroFields),
    TextBlock(TextBlockFields),
    ImageBlock(ImageBlockFields),
    BlogPost(BlogPostFields),
    /// Unknown or missing tag. Only present fields are kept.
    Generic {
        component: Option<String>,
        fields: Map<String, Value>,
    },
}

impl Block {
    fn from_object(obj: &Map<String, Value>) -> Block {
        let component = obj.get(COMPONENT_FIELD).and_then(Value::as_str);
        match component {
            Some("hero") => Block::Hero(HeroFields {
                title: text_field(obj, "title"),
                subtitle: text_field(obj, "subtitle"),
                background_image: asset_field(obj, "background_image"),
            }),
            Some("text_block") => Block::TextBlock(TextBlockFields {
                text: text_field(obj, "text"),
            }),
            Some("image_block") => Block::ImageBlock(ImageBlockFields {
                image: asset_field(obj, "image"),
            }),
            Some("blog_post") => Block::BlogPost(BlogPostFields {
                title: text_field(obj, "title"),
                content: text_field(obj, "content"),
                author_name: obj
                    .get("author")
                    .and_then(Value::as_object)
                    .and_then(|a| text_field(a, "name")),
            }),
            other => Block::Generic {
                component: other.map(str::to_string),
                fields: obj
                    .iter()
                    .filter(|(_, v)| FieldValue::from_json(v).is_some())
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            },
        }
    }

    /// The component tag this block was resolved from.
    pub fn component(&self) -> Option<&str> {
        match self {
            Block::Hero(_) => Some("hero"),
            Block::TextBlock(_) => Some("text_block"),
            Block::ImageBlock(_) => Some("image_block"),
            Block::BlogPost(_) => Some("blog_post"),
            Block::Generic { component, .. } => component.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentNode {
    pub uid: Option<String>,
    pub block: Block,
    /// Child nodes in lookup order.
    pub children: Vec<ContentNode>,
}

/// An object whose `_uid` is truthy, whatever its type.
fn carries_uid(value: &Value) -> bool {
    value.is_object() && value.get(UID_FIELD).is_some_and(is_truthy)
}

/// Nodes reachable through `fields`: objects carrying a `_uid`, and the
/// uid-carrying items of arrays.
fn uid_children<'a>(fields: impl Iterator<Item = &'a Value>) -> Vec<ContentNode> {
    let mut children = Vec::new();
    for field in fields {
        match field {
            Value::Array(items) => children.extend(
                items
                    .iter()
                    .filter(|item| carries_uid(item))
                    .map(ContentNode::parse),
            ),
            Value::Object(_) if carries_uid(field) => children.push(ContentNode::parse(field)),
            _ => {}
        }
    }
    children
}

fn empty_block() -> Block {
    Block::Generic {
        component: None,
        fields: Map::new(),
    }
}

impl ContentNode {
    pub fn parse(value: &Value) -> ContentNode {
        let obj = match value {
            Value::Object(obj) => obj,
            // A bare sequence is searched through its elements like the
            // fields of an anonymous node.
            Value::Array(items) => {
                return ContentNode {
                    uid: None,
                    block: empty_block(),
                    children: uid_children(items.iter()),
                }
            }
            _ => {
                return ContentNode {
                    uid: None,
                    block: empty_block(),
                    children: Vec::new(),
                }
            }
        };

        let mut children = Vec::new();
        if let Some(body) = obj.get(BODY_FIELD).and_then(Value::as_array) {
            children.extend(
                body.iter()
                    .filter(|v| v.is_object() || v.is_array())
                    .map(ContentNode::parse),
            );
        }
        children.extend(uid_children(
            obj.iter()
                .filter(|(key, field)| !(key.as_str() == BODY_FIELD && field.is_array()))
                .map(|(_, field)| field),
        ));

        ContentNode {
            uid: obj.get(UID_FIELD).and_then(Value::as_str).map(str::to_string),
            block: Block::from_object(obj),
            children,
        }
    }

    /// First node, in lookup order, whose `_uid` equals `uid`.
    pub fn find_by_uid(&self, uid: &str) -> Option<&ContentNode> {
        if self.uid.as_deref() == Some(uid) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_uid(uid))
    }

    pub fn component(&self) -> Option<&str> {
        self.block.component()
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ContentNode::node_count).sum::<usize>()
    }
}
