//! Story envelope returned by the delivery API.
//!
//! `content` stays untyped here: blog components are schema-free and the
//! editor parses them separately (see [`crate::editor::node`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub full_slug: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub tag_list: Vec<String>,
    #[serde(default)]
    pub content: Value,
}

/// `{ "stories": [...] }`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StoriesEnvelope {
    #[serde(default)]
    pub stories: Vec<Story>,
}

/// `{ "story": {...} }`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StoryEnvelope {
    pub story: Story,
}
