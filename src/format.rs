//! Display-ready projection of a blog [`Story`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::story::Story;

pub const WORDS_PER_MINUTE: usize = 200;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedPost {
    pub id: u64,
    pub slug: String,
    pub title: Option<String>,
    pub excerpt: String,
    pub content: String,
    pub author: Option<AuthorSummary>,
    pub category: Option<CategorySummary>,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub published_at: Option<String>,
    /// Estimated minutes, see [`reading_time`].
    pub reading_time: usize,
    pub url: String,
}

/// Non-empty string at `value[key]`.
fn text(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Project a raw story into the shape templates render.
///
/// `author` and `category` are only summarised when the relation was
/// resolved into an object; an unresolved UUID string yields `None`.
pub fn format_post(post: &Story) -> FormattedPost {
    let c = &post.content;

    let excerpt = text(c, "excerpt")
        .or_else(|| text(c, "intro"))
        .unwrap_or_default();
    let body = text(c, "content").or_else(|| text(c, "body")).unwrap_or_default();
    let reading = reading_time(&text(c, "content").unwrap_or_default());

    let author = c.get("author").filter(|a| a.is_object()).map(|a| AuthorSummary {
        name: text(a, "name"),
        slug: text(a, "slug"),
        avatar: a
            .get("content")
            .and_then(|ac| ac.get("avatar"))
            .and_then(|av| text(av, "filename")),
    });

    let category = c.get("category").filter(|a| a.is_object()).map(|cat| CategorySummary {
        name: text(cat, "name"),
        slug: text(cat, "slug"),
        color: cat.get("content").and_then(|cc| text(cc, "color")),
    });

    FormattedPost {
        id: post.id,
        slug: post.slug.clone(),
        title: text(c, "title"),
        excerpt,
        content: body,
        author,
        category,
        tags: post.tag_list.clone(),
        featured_image: c.get("featured_image").and_then(|img| text(img, "filename")),
        published_at: post.published_at.clone(),
        reading_time: reading,
        url: format!("/blog/{}", post.slug),
    }
}

/// Minutes to read `content` at [`WORDS_PER_MINUTE`], after stripping HTML
/// tags. Words are the pieces between whitespace runs, so empty content
/// still counts as one word and reads as one minute.
pub fn reading_time(content: &str) -> usize {
    let stripped = HTML_TAG.replace_all(content, "");
    let words = WHITESPACE.split(&stripped).count();
    words.div_ceil(WORDS_PER_MINUTE)
}
