//! Visual-editor bridge: turns bridge events into DOM patches.
//!
//! ## Lifecycle
//! 1. The host builds an [`EditorContext`] once and constructs an
//!    [`EditorBridge`] around its DOM.
//! 2. [`EditorBridge::init_plan`] says whether the vendor script must be
//!    loaded first; once it is available the host calls
//!    [`EditorBridge::activate`] and passes the returned [`BridgeInitConfig`]
//!    to the vendor `init`.
//! 3. Events are handled one at a time in arrival order, either directly
//!    through [`EditorBridge::handle`] or by feeding a channel into
//!    [`EditorBridge::run`], which collapses queued snapshots to the latest.

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::context::EditorContext;
use super::dom::{Dom, ElementId, Selector};
use super::event::{coalesce, BridgeEvent, SUBSCRIBED_ACTIONS};
use super::node::{ContentNode, UID_FIELD};
use super::patch::patch_element;
use crate::error::EditorError;

pub const BRIDGE_SCRIPT_URL: &str = "https://app.storyblok.com/f/storyblok-v2-latest.js";

/// Identifier of the content node an element renders.
pub const UID_ATTR: &str = "data-blok-uid";
/// Serialized component payload the vendor bridge reads for click-to-edit.
pub const COMPONENT_ATTR: &str = "data-blok-c";

pub const INDICATOR_ID: &str = "storyblok-editor-indicator";
pub const INDICATOR_TEXT: &str = "✏️ Edit Mode Active";
const INDICATOR_STYLE: [(&str, &str); 10] = [
    ("position", "fixed"),
    ("top", "10px"),
    ("right", "10px"),
    ("background", "#00b3b0"),
    ("color", "white"),
    ("padding", "8px 12px"),
    ("border-radius", "4px"),
    ("font-size", "12px"),
    ("font-family", "sans-serif"),
    ("z-index", "9999"),
];
const INDICATOR_SHADOW: &str = "0 2px 8px rgba(0,0,0,0.15)";

const HIGHLIGHT_OUTLINE: &str = "2px dashed #00b3b0";
const HIGHLIGHT_OFFSET: &str = "2px";
const HIGHLIGHT_TITLE: &str = "Click to edit in Storyblok";

/// What the host must do before events can flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeInit {
    /// Not inside the editor; nothing to do.
    Inactive,
    /// Inject the vendor script from `url`, then call `activate`.
    LoadScript { url: &'static str },
    /// The vendor bridge is already on the page; call `activate`.
    Ready,
}

/// Payload for the vendor bridge's `init` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeInitConfig {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeOutcome {
    /// Content was applied; `elements` tagged elements matched a node.
    Patched { elements: usize },
    /// Content was published; the host should reload the page.
    ReloadRequested,
    /// Edit mode entered; `highlighted` elements were outlined.
    EditModeShown { highlighted: usize },
    /// Inactive bridge or event without content.
    Ignored,
}

/// Tally of a [`EditorBridge::run`] session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub received: usize,
    pub handled: usize,
    pub coalesced: usize,
    pub reloads_requested: usize,
}

pub struct EditorBridge<D: Dom> {
    access_token: String,
    context: EditorContext,
    dom: D,
    active: bool,
}

impl<D: Dom> EditorBridge<D> {
    pub fn new(access_token: impl Into<String>, context: EditorContext, dom: D) -> Self {
        Self {
            access_token: access_token.into(),
            context,
            dom,
            active: false,
        }
    }

    pub fn context(&self) -> EditorContext {
        self.context
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn into_dom(self) -> D {
        self.dom
    }

    /// Decide how to bring the vendor bridge up.
    pub fn init_plan(&self, vendor_bridge_present: bool) -> BridgeInit {
        if !self.context.is_editor_mode() {
            BridgeInit::Inactive
        } else if vendor_bridge_present {
            BridgeInit::Ready
        } else {
            BridgeInit::LoadScript {
                url: BRIDGE_SCRIPT_URL,
            }
        }
    }

    /// Mark the bridge ready to receive events. Returns the vendor `init`
    /// payload, or `None` outside editor mode.
    pub fn activate(&mut self) -> Option<BridgeInitConfig> {
        if !self.context.is_editor_mode() {
            return None;
        }
        self.active = true;
        info!(actions = ?SUBSCRIBED_ACTIONS, "visual editor bridge initialized");
        Some(BridgeInitConfig {
            access_token: self.access_token.clone(),
        })
    }

    /// Parse and handle one raw vendor payload.
    pub fn handle_json(&mut self, raw: &str) -> Result<BridgeOutcome, EditorError> {
        let event = BridgeEvent::from_json(raw)?;
        Ok(self.handle(event))
    }

    pub fn handle(&mut self, event: BridgeEvent) -> BridgeOutcome {
        if !self.active {
            debug!(action = event.action(), "bridge inactive, event ignored");
            return BridgeOutcome::Ignored;
        }
        debug!(action = event.action(), "bridge event");

        match event {
            BridgeEvent::Change(Some(content)) | BridgeEvent::Input(Some(content)) => {
                BridgeOutcome::Patched {
                    elements: self.update_page_content(&content),
                }
            }
            BridgeEvent::Change(None) | BridgeEvent::Input(None) => BridgeOutcome::Ignored,
            BridgeEvent::Published => BridgeOutcome::ReloadRequested,
            BridgeEvent::EnterEditMode { story_id } => {
                let highlighted = self.highlight_editable_areas();
                self.show_editor_ui();
                info!(?story_id, highlighted, "entered edit mode");
                BridgeOutcome::EditModeShown { highlighted }
            }
        }
    }

    /// Patch every `[data-blok-uid]` element whose node is in `content`.
    /// Returns the number of elements that matched a node.
    pub fn update_page_content(&mut self, content: &ContentNode) -> usize {
        let mut matched = 0;
        for el in self.dom.query_all(None, &Selector::HasAttr(UID_ATTR)) {
            let Some(uid) = self.dom.attribute(el, UID_ATTR) else {
                continue;
            };
            if let Some(node) = content.find_by_uid(&uid) {
                let fields = patch_element(&mut self.dom, el, node);
                debug!(uid = %uid, component = ?node.component(), fields, "element patched");
                matched += 1;
            }
        }
        matched
    }

    /// Outline every editable element. Returns how many were outlined.
    pub fn highlight_editable_areas(&mut self) -> usize {
        let editable = self.dom.query_all(None, &Selector::HasAttr(UID_ATTR));
        for &el in &editable {
            self.dom.set_style(el, "outline", HIGHLIGHT_OUTLINE);
            self.dom.set_style(el, "outline-offset", HIGHLIGHT_OFFSET);
            self.dom.set_attribute(el, "title", HIGHLIGHT_TITLE);
        }
        editable.len()
    }

    /// Show the fixed "edit mode" badge. Re-entering edit mode reuses the
    /// existing badge.
    pub fn show_editor_ui(&mut self) -> ElementId {
        if let Some(existing) = self.dom.element_by_id(INDICATOR_ID) {
            return existing;
        }
        let indicator = self.dom.create_element("div");
        self.dom.set_attribute(indicator, "id", INDICATOR_ID);
        for (property, value) in INDICATOR_STYLE {
            self.dom.set_style(indicator, property, value);
        }
        self.dom.set_style(indicator, "box-shadow", INDICATOR_SHADOW);
        self.dom.set_text(indicator, INDICATOR_TEXT);
        self.dom.append_child(None, indicator);
        indicator
    }

    /// Handle events from `rx` until the channel closes.
    ///
    /// Whatever is queued when the bridge becomes free is handled as one
    /// batch, collapsed by [`coalesce`]: only the newest of consecutive
    /// content snapshots is applied.
    pub async fn run(&mut self, mut rx: mpsc::UnboundedReceiver<BridgeEvent>) -> RunSummary {
        let mut summary = RunSummary::default();
        while let Some(first) = rx.recv().await {
            let mut batch = vec![first];
            while let Ok(next) = rx.try_recv() {
                batch.push(next);
            }
            let received = batch.len();
            let batch = coalesce(batch);
            summary.received += received;
            summary.coalesced += received - batch.len();

            for event in batch {
                if self.handle(event) == BridgeOutcome::ReloadRequested {
                    summary.reloads_requested += 1;
                }
                summary.handled += 1;
            }
        }
        if summary.coalesced > 0 {
            warn!(dropped = summary.coalesced, "stale editor snapshots were skipped");
        }
        summary
    }
}

/// Tag `el` so the vendor bridge can map clicks back to `component`.
/// Returns `false` (and leaves `el` alone) when the component has no `_uid`.
pub fn add_editor_attributes<D: Dom>(dom: &mut D, el: ElementId, component: &Value) -> bool {
    let Some(uid) = component
        .get(UID_FIELD)
        .and_then(Value::as_str)
        .filter(|uid| !uid.is_empty())
    else {
        return false;
    };
    dom.set_attribute(el, COMPONENT_ATTR, &component.to_string());
    dom.set_attribute(el, UID_ATTR, uid);
    true
}

/// Create a detached `tag` element with `attributes`, tagged for the editor
/// when `component` carries a `_uid`.
pub fn create_element<D: Dom>(
    dom: &mut D,
    tag: &str,
    component: Option<&Value>,
    attributes: &[(&str, &str)],
) -> ElementId {
    let el = dom.create_element(tag);
    for (name, value) in attributes {
        dom.set_attribute(el, name, value);
    }
    if let Some(component) = component {
        add_editor_attributes(dom, el, component);
    }
    el
}
