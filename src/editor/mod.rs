//! # Visual editor
//!
//! Live preview support for pages rendered inside the Storyblok visual
//! editor.
//!
//! ## What It Does
//!
//! 1. **Context**: decides once, from injected host facts, whether the page
//!    is running inside the editor ([`EditorContext`]).
//! 2. **Events**: parses bridge payloads (`change`, `published`, `input`,
//!    `enterEditmode`) into [`BridgeEvent`]s carrying a typed content tree.
//! 3. **Patching**: finds each `[data-blok-uid]` element's node in the tree
//!    and overwrites its fields in place ([`patch_element`]).
//!
//! ## Usage
//!
//! ```rust,ignore
//! let ctx = EditorContext::detect(&location_search, is_framed);
//! let mut bridge = EditorBridge::new(token, ctx, dom);
//! if let Some(init) = bridge.activate() {
//!     vendor_init(serde_json::to_string(&init)?);
//! }
//! let summary = bridge.run(events_rx).await;
//! ```

pub mod bridge;
pub mod context;
pub mod dom;
pub mod event;
pub mod node;
pub mod patch;

pub use bridge::{
    add_editor_attributes, create_element, BridgeInit, BridgeInitConfig, BridgeOutcome,
    EditorBridge, RunSummary,
};
pub use context::EditorContext;
pub use dom::{Dom, ElementId, MemoryDom, Selector};
pub use event::{coalesce, BridgeEvent};
pub use node::{Asset, Block, ContentNode, FieldValue};
pub use patch::patch_element;
