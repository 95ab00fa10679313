//! Host-context detection, done once at startup.
//!
//! Instead of sniffing globals on every call, the host passes in what it
//! knows (the page's query string and whether it is framed) and the result
//! is threaded through as an [`EditorContext`].

use crate::config::ContentVersion;

/// Query marker present on every editor-driven page load.
pub const EDITOR_PARAM: &str = "_storyblok";
/// Query marker carrying the preview token.
pub const PREVIEW_TOKEN_PARAM: &str = "_storyblok_tk";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorContext {
    editor: bool,
    preview: bool,
}

impl EditorContext {
    /// Decide from `location_search` (e.g. `"?_storyblok=123&_storyblok_tk[token]=..."`)
    /// and whether the page runs inside a parent frame.
    pub fn detect(location_search: &str, framed: bool) -> Self {
        let preview = location_search.contains(PREVIEW_TOKEN_PARAM);
        let editor = preview || location_search.contains(EDITOR_PARAM) || framed;
        Self { editor, preview }
    }

    /// A context outside any editor: plain published rendering.
    pub fn standalone() -> Self {
        Self::default()
    }

    pub fn is_editor_mode(&self) -> bool {
        self.editor
    }

    pub fn is_preview_mode(&self) -> bool {
        self.preview
    }

    /// Draft content inside the editor or a preview, published otherwise.
    pub fn content_version(&self) -> ContentVersion {
        if self.editor || self.preview {
            ContentVersion::Draft
        } else {
            ContentVersion::Published
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_page_is_standalone() {
        let ctx = EditorContext::detect("?page=2", false);
        assert_eq!(ctx, EditorContext::standalone());
        assert!(!ctx.is_editor_mode());
        assert_eq!(ctx.content_version(), ContentVersion::Published);
    }

    #[test]
    fn test_editor_param_enables_editor_mode() {
        let ctx = EditorContext::detect("?_storyblok=12345", false);
        assert!(ctx.is_editor_mode());
        assert!(!ctx.is_preview_mode());
        assert_eq!(ctx.content_version(), ContentVersion::Draft);
    }

    #[test]
    fn test_preview_token_enables_both() {
        let ctx = EditorContext::detect("?_storyblok_tk[token]=abc", false);
        assert!(ctx.is_editor_mode());
        assert!(ctx.is_preview_mode());
    }

    #[test]
    fn test_framed_page_is_editor_mode_without_params() {
        let ctx = EditorContext::detect("", true);
        assert!(ctx.is_editor_mode());
        assert!(!ctx.is_preview_mode());
        assert_eq!(ctx.content_version(), ContentVersion::Draft);
    }
}
