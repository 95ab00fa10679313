//! Events delivered by the visual-editor bridge.

use serde::Deserialize;
use serde_json::Value;

use super::node::ContentNode;
use crate::error::EditorError;

/// Actions the bridge is subscribed to, in the vendor's spelling.
pub const SUBSCRIBED_ACTIONS: [&str; 4] = ["change", "published", "input", "enterEditmode"];

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// A draft was saved. Carries the story's content tree when present.
    Change(Option<ContentNode>),
    /// The story was published; the host should reload.
    Published,
    /// Live keystroke-level edit.
    Input(Option<ContentNode>),
    EnterEditMode { story_id: Option<u64> },
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    action: String,
    #[serde(default)]
    story: Option<RawStory>,
    #[serde(default, rename = "storyId")]
    story_id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawStory {
    #[serde(default)]
    content: Option<Value>,
}

impl BridgeEvent {
    /// Parse a vendor payload such as
    /// `{"action":"input","story":{"content":{...}}}`. The content tree is
    /// resolved here, once per event.
    pub fn from_json(raw: &str) -> Result<BridgeEvent, EditorError> {
        let raw: RawEvent = serde_json::from_str(raw)?;
        let content = || {
            raw.story
                .as_ref()
                .and_then(|s| s.content.as_ref())
                .filter(|c| !c.is_null())
                .map(ContentNode::parse)
        };
        match raw.action.as_str() {
            "change" => Ok(BridgeEvent::Change(content())),
            "published" => Ok(BridgeEvent::Published),
            "input" => Ok(BridgeEvent::Input(content())),
            "enterEditmode" => Ok(BridgeEvent::EnterEditMode {
                // The bridge sends the id as a number or a numeric string.
                story_id: raw.story_id.as_ref().and_then(|v| match v {
                    Value::Number(n) => n.as_u64(),
                    Value::String(s) => s.parse().ok(),
                    _ => None,
                }),
            }),
            other => Err(EditorError::UnknownAction(other.to_string())),
        }
    }

    /// The content snapshot this event carries, if any.
    pub fn snapshot(&self) -> Option<&ContentNode> {
        match self {
            BridgeEvent::Change(c) | BridgeEvent::Input(c) => c.as_ref(),
            _ => None,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            BridgeEvent::Change(_) => "change",
            BridgeEvent::Published => "published",
            BridgeEvent::Input(_) => "input",
            BridgeEvent::EnterEditMode { .. } => "enterEditmode",
        }
    }
}

/// Collapse a backlog of events: each run of consecutive snapshot events
/// keeps only its last one, content-less change/input events are dropped,
/// and `published` / `enterEditmode` are kept in place.
pub fn coalesce(events: Vec<BridgeEvent>) -> Vec<BridgeEvent> {
    let mut out: Vec<BridgeEvent> = Vec::with_capacity(events.len());
    for event in events {
        let is_snapshot = event.snapshot().is_some();
        if !is_snapshot && matches!(event, BridgeEvent::Change(_) | BridgeEvent::Input(_)) {
            continue;
        }
        match out.last_mut() {
            Some(last) if is_snapshot && last.snapshot().is_some() => *last = event,
            _ => out.push(event),
        }
    }
    out
}
