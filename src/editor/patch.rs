//! Per-component DOM patching.
//!
//! Each handler overwrites only the fields that are present in the node.
//! Absent fields and missing sub-elements are skipped, so whatever the DOM
//! showed before stays in place. Nothing is diffed or rolled back.

use serde_json::{Map, Value};

use super::dom::{Dom, ElementId, Selector};
use super::node::{
    Asset, BlogPostFields, Block, ContentNode, FieldValue, HeroFields, ImageBlockFields,
    TextBlockFields,
};

/// Marker attribute naming the content field an element renders.
pub const FIELD_ATTR: &str = "data-field";

/// Apply `node` to `el`. Returns how many sub-elements were written.
pub fn patch_element<D: Dom>(dom: &mut D, el: ElementId, node: &ContentNode) -> usize {
    match &node.block {
        Block::Hero(fields) => patch_hero(dom, el, fields),
        Block::TextBlock(fields) => patch_text_block(dom, el, fields),
        Block::ImageBlock(fields) => patch_image_block(dom, el, fields),
        Block::BlogPost(fields) => patch_blog_post(dom, el, fields),
        Block::Generic { fields, .. } => patch_generic(dom, el, fields),
    }
}

fn field_element<D: Dom>(dom: &D, el: ElementId, field: &str) -> Option<ElementId> {
    dom.query(Some(el), &Selector::AttrEq(FIELD_ATTR, field))
}

fn write_text<D: Dom>(dom: &mut D, target: Option<ElementId>, value: Option<&str>) -> usize {
    match (target, value) {
        (Some(t), Some(v)) => {
            dom.set_text(t, v);
            1
        }
        _ => 0,
    }
}

fn write_html<D: Dom>(dom: &mut D, target: Option<ElementId>, value: Option<&str>) -> usize {
    match (target, value) {
        (Some(t), Some(v)) => {
            dom.set_inner_html(t, v);
            1
        }
        _ => 0,
    }
}

fn write_image<D: Dom>(dom: &mut D, target: Option<ElementId>, asset: Option<&Asset>) -> usize {
    match (target, asset) {
        (Some(t), Some(a)) => {
            dom.set_attribute(t, "src", &a.filename);
            dom.set_attribute(t, "alt", a.alt_or_empty());
            1
        }
        _ => 0,
    }
}

fn patch_hero<D: Dom>(dom: &mut D, el: ElementId, f: &HeroFields) -> usize {
    let title = field_element(dom, el, "title");
    let subtitle = field_element(dom, el, "subtitle");
    let image = field_element(dom, el, "background_image");

    write_text(dom, title, f.title.as_deref())
        + write_text(dom, subtitle, f.subtitle.as_deref())
        + write_image(dom, image, f.background_image.as_ref())
}

fn patch_text_block<D: Dom>(dom: &mut D, el: ElementId, f: &TextBlockFields) -> usize {
    let text = field_element(dom, el, "text");
    write_html(dom, text, f.text.as_deref())
}

fn patch_image_block<D: Dom>(dom: &mut D, el: ElementId, f: &ImageBlockFields) -> usize {
    let img = dom.query(Some(el), &Selector::Tag("img"));
    write_image(dom, img, f.image.as_ref())
}

fn patch_blog_post<D: Dom>(dom: &mut D, el: ElementId, f: &BlogPostFields) -> usize {
    // Resolve all targets before writing: rich-text content replaces the
    // children of its element.
    let title = field_element(dom, el, "title");
    let content = field_element(dom, el, "content");
    let author = field_element(dom, el, "author");

    write_text(dom, title, f.title.as_deref())
        + write_html(dom, content, f.content.as_deref())
        + write_text(dom, author, f.author_name.as_deref())
}

/// Fallback for unknown component tags: every `[data-field]` descendant gets
/// the matching field. Images take `src`/`alt` from asset objects only;
/// other elements take scalar values as text. Structured values on text
/// elements are skipped.
fn patch_generic<D: Dom>(dom: &mut D, el: ElementId, fields: &Map<String, Value>) -> usize {
    let mut written = 0;
    for target in dom.query_all(Some(el), &Selector::HasAttr(FIELD_ATTR)) {
        let Some(name) = dom.attribute(target, FIELD_ATTR) else {
            continue;
        };
        let Some(value) = fields.get(&name).and_then(FieldValue::from_json) else {
            continue;
        };
        let is_image = dom
            .tag_name(target)
            .is_some_and(|t| t.eq_ignore_ascii_case("img"));

        written += if is_image {
            write_image(dom, Some(target), value.as_asset())
        } else {
            write_text(dom, Some(target), value.as_text())
        };
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::dom::MemoryDom;
    use serde_json::json;

    struct HeroFixture {
        dom: MemoryDom,
        root: ElementId,
        title: ElementId,
        subtitle: ElementId,
        image: ElementId,
    }

    fn hero_fixture() -> HeroFixture {
        let mut dom = MemoryDom::new();
        let root = dom.append(None, "section", &[("data-blok-uid", "h1")]);
        let title = dom.append(Some(root), "h1", &[(FIELD_ATTR, "title")]);
        let subtitle = dom.append(Some(root), "p", &[(FIELD_ATTR, "subtitle")]);
        let image = dom.append(Some(root), "img", &[(FIELD_ATTR, "background_image")]);
        dom.set_text(title, "Old title");
        dom.set_text(subtitle, "Old subtitle");
        dom.set_attribute(image, "src", "old.jpg");
        HeroFixture { dom, root, title, subtitle, image }
    }

    #[test]
    fn test_hero_updates_all_present_fields() {
        let mut fx = hero_fixture();
        let node = ContentNode::parse(&json!({
            "_uid": "h1", "component": "hero", "title": "New", "subtitle": "Sub",
            "background_image": {"filename": "new.jpg", "alt": "Mountains"}
        }));
        assert_eq!(patch_element(&mut fx.dom, fx.root, &node), 3);
        assert_eq!(fx.dom.text(fx.title), Some("New"));
        assert_eq!(fx.dom.text(fx.subtitle), Some("Sub"));
        assert_eq!(fx.dom.attribute(fx.image, "src").as_deref(), Some("new.jpg"));
        assert_eq!(fx.dom.attribute(fx.image, "alt").as_deref(), Some("Mountains"));
    }

    #[test]
    fn test_hero_subset_leaves_other_fields_untouched() {
        let mut fx = hero_fixture();
        let node = ContentNode::parse(&json!({
            "_uid": "h1", "component": "hero", "subtitle": "Only this", "title": ""
        }));
        assert_eq!(patch_element(&mut fx.dom, fx.root, &node), 1);
        assert_eq!(fx.dom.text(fx.title), Some("Old title"));
        assert_eq!(fx.dom.text(fx.subtitle), Some("Only this"));
        assert_eq!(fx.dom.attribute(fx.image, "src").as_deref(), Some("old.jpg"));
        assert_eq!(fx.dom.attribute(fx.image, "alt"), None);
    }

    #[test]
    fn test_hero_image_without_alt_gets_empty_alt() {
        let mut fx = hero_fixture();
        let node = ContentNode::parse(&json!({
            "component": "hero", "background_image": {"filename": "x.jpg"}
        }));
        patch_element(&mut fx.dom, fx.root, &node);
        assert_eq!(fx.dom.attribute(fx.image, "alt").as_deref(), Some(""));
    }

    #[test]
    fn test_text_block_sets_inner_html() {
        let mut dom = MemoryDom::new();
        let root = dom.append(None, "div", &[]);
        let text = dom.append(Some(root), "div", &[(FIELD_ATTR, "text")]);
        let node = ContentNode::parse(&json!({"component": "text_block", "text": "<p>Hi</p>"}));
        assert_eq!(patch_element(&mut dom, root, &node), 1);
        assert_eq!(dom.inner_html(text), Some("<p>Hi</p>"));
    }

    #[test]
    fn test_text_block_missing_target_is_noop() {
        let mut dom = MemoryDom::new();
        let root = dom.append(None, "div", &[]);
        let node = ContentNode::parse(&json!({"component": "text_block", "text": "<p>Hi</p>"}));
        assert_eq!(patch_element(&mut dom, root, &node), 0);
    }

    #[test]
    fn test_text_block_absent_text_keeps_dom() {
        let mut dom = MemoryDom::new();
        let root = dom.append(None, "div", &[]);
        let text = dom.append(Some(root), "div", &[(FIELD_ATTR, "text")]);
        dom.set_inner_html(text, "<p>Before</p>");

        let missing = ContentNode::parse(&json!({"component": "text_block"}));
        assert_eq!(patch_element(&mut dom, root, &missing), 0);
        let empty = ContentNode::parse(&json!({"component": "text_block", "text": ""}));
        assert_eq!(patch_element(&mut dom, root, &empty), 0);

        assert_eq!(dom.inner_html(text), Some("<p>Before</p>"));
    }

    #[test]
    fn test_image_block_targets_first_img() {
        let mut dom = MemoryDom::new();
        let root = dom.append(None, "figure", &[]);
        let first = dom.append(Some(root), "img", &[]);
        let second = dom.append(Some(root), "img", &[]);
        let node = ContentNode::parse(&json!({
            "component": "image_block", "image": {"filename": "a.png", "alt": "A"}
        }));
        patch_element(&mut dom, root, &node);
        assert_eq!(dom.attribute(first, "src").as_deref(), Some("a.png"));
        assert_eq!(dom.attribute(second, "src"), None);
    }

    #[test]
    fn test_image_block_without_filename_is_noop() {
        let mut dom = MemoryDom::new();
        let root = dom.append(None, "figure", &[]);
        let img = dom.append(Some(root), "img", &[("src", "keep.png")]);
        let node = ContentNode::parse(&json!({"component": "image_block", "image": {"alt": "x"}}));
        assert_eq!(patch_element(&mut dom, root, &node), 0);
        assert_eq!(dom.attribute(img, "src").as_deref(), Some("keep.png"));
    }

    #[test]
    fn test_blog_post_subset_leaves_other_fields_untouched() {
        let mut dom = MemoryDom::new();
        let root = dom.append(None, "article", &[]);
        let title = dom.append(Some(root), "h1", &[(FIELD_ATTR, "title")]);
        let content = dom.append(Some(root), "div", &[(FIELD_ATTR, "content")]);
        let author = dom.append(Some(root), "span", &[(FIELD_ATTR, "author")]);
        dom.set_text(title, "T0");
        dom.set_inner_html(content, "<p>C0</p>");
        dom.set_text(author, "A0");

        let node = ContentNode::parse(&json!({
            "component": "blog_post", "author": {"name": "Jane"}, "content": null
        }));
        assert_eq!(patch_element(&mut dom, root, &node), 1);
        assert_eq!(dom.text(title), Some("T0"));
        assert_eq!(dom.inner_html(content), Some("<p>C0</p>"));
        assert_eq!(dom.text(author), Some("Jane"));
    }

    #[test]
    fn test_generic_updates_only_matching_keys() {
        let mut dom = MemoryDom::new();
        let root = dom.append(None, "div", &[]);
        let quote = dom.append(Some(root), "blockquote", &[(FIELD_ATTR, "quote")]);
        let cite = dom.append(Some(root), "cite", &[(FIELD_ATTR, "cite")]);
        dom.set_text(cite, "Old cite");

        let node = ContentNode::parse(&json!({"component": "quote", "quote": "Be brief", "extra": "x"}));
        assert_eq!(patch_element(&mut dom, root, &node), 1);
        assert_eq!(dom.text(quote), Some("Be brief"));
        assert_eq!(dom.text(cite), Some("Old cite"));
    }

    #[test]
    fn test_generic_distinguishes_image_and_scalar_fields() {
        let mut dom = MemoryDom::new();
        let root = dom.append(None, "div", &[]);
        let photo = dom.append(Some(root), "img", &[(FIELD_ATTR, "photo")]);
        let caption_img = dom.append(Some(root), "img", &[(FIELD_ATTR, "caption")]);
        let label = dom.append(Some(root), "span", &[(FIELD_ATTR, "label")]);
        let meta = dom.append(Some(root), "span", &[(FIELD_ATTR, "meta")]);
        let count = dom.append(Some(root), "span", &[(FIELD_ATTR, "count")]);
        dom.set_text(meta, "keep");

        let node = ContentNode::parse(&json!({
            "component": "card",
            "photo": {"filename": "p.jpg", "alt": "P"},
            "caption": "scalar on an image is ignored",
            "label": "Label",
            "meta": {"nested": true},
            "count": 7
        }));
        assert_eq!(patch_element(&mut dom, root, &node), 3);
        assert_eq!(dom.attribute(photo, "src").as_deref(), Some("p.jpg"));
        assert_eq!(dom.attribute(photo, "alt").as_deref(), Some("P"));
        assert_eq!(dom.attribute(caption_img, "src"), None);
        assert_eq!(dom.text(caption_img), None);
        assert_eq!(dom.text(label), Some("Label"));
        assert_eq!(dom.text(meta), Some("keep"));
        assert_eq!(dom.text(count), Some("7"));
    }

    #[test]
    fn test_generic_falsy_values_skip_update() {
        let mut dom = MemoryDom::new();
        let root = dom.append(None, "div", &[]);
        let a = dom.append(Some(root), "span", &[(FIELD_ATTR, "a")]);
        dom.set_text(a, "before");
        let node = ContentNode::parse(&json!({"component": "x", "a": false}));
        assert_eq!(patch_element(&mut dom, root, &node), 0);
        assert_eq!(dom.text(a), Some("before"));
    }
}
