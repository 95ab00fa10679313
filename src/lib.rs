//! Blog content fetching and live visual-editor patching for the Storyblok
//! headless CMS.
//!
//! - [`blog::BlogManager`] wraps the content-delivery API with blog-shaped
//!   queries (pagination, categories, authors, search, related posts,
//!   statistics).
//! - [`editor::EditorBridge`] applies visual-editor events to a DOM.

pub mod blog;
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod format;
pub mod query;
pub mod story;
pub mod transport;

pub use blog::{BlogManager, BlogStats, PostPage};
pub use config::{BlogConfig, ContentVersion};
pub use error::{BlogError, ConfigError, EditorError, TransportError};
pub use format::{format_post, reading_time, FormattedPost};
pub use query::StoryQuery;
pub use story::Story;
pub use transport::{ApiResponse, ContentTransport, HttpTransport};
