//! # BlogManager
//!
//! Blog-shaped facade over the `cdn/stories` delivery endpoints.
//!
//! ## Error policy
//! - **Hard-fail**: listings, single-post fetch, category/author listings,
//!   search and featured posts log the transport error and return
//!   [`BlogError::Fetch`] carrying the original message.
//! - **Soft-fail**: a 404 on [`BlogManager::get_post`] yields `Ok(None)`;
//!   [`BlogManager::related_posts`] yields an empty list and
//!   [`BlogManager::blog_stats`] yields [`BlogStats::zero`] on any failure.
//!
//! No retries, no backoff.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::config::{BlogConfig, ContentVersion};
use crate::error::BlogError;
use crate::query::StoryQuery;
use crate::story::{StoriesEnvelope, Story, StoryEnvelope};
use crate::transport::{ApiResponse, ContentTransport, HttpTransport};

pub const STORIES_PATH: &str = "cdn/stories";
pub const BLOG_PREFIX: &str = "blog";
pub const CATEGORIES_PREFIX: &str = "categories";
pub const AUTHORS_PREFIX: &str = "authors";

const LIST_RELATIONS: [&str; 2] = ["author", "category"];
const POST_RELATIONS: [&str; 3] = ["author", "category", "related_posts"];
const NEWEST_FIRST: &str = "published_at:desc";
const BY_NAME: &str = "name:asc";

/// Minimum trimmed length of a search query before any request is issued.
pub const MIN_SEARCH_LEN: usize = 2;

/// One page of blog posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPage {
    pub posts: Vec<Story>,
    pub total: u64,
    /// `true` when the page came back full. A full last page still reports
    /// `true`; the next request simply returns an empty page.
    pub has_next: bool,
}

/// Aggregate counts across the blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogStats {
    pub total_posts: u64,
    pub total_categories: usize,
    pub total_authors: usize,
    /// RFC 3339 timestamp of when the stats were computed.
    pub last_updated: String,
}

impl BlogStats {
    pub fn zero() -> Self {
        Self {
            total_posts: 0,
            total_categories: 0,
            total_authors: 0,
            last_updated: now_rfc3339(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total_posts == 0 && self.total_categories == 0 && self.total_authors == 0
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct BlogManager<T: ContentTransport = HttpTransport> {
    transport: Arc<T>,
    version: ContentVersion,
}

impl BlogManager<HttpTransport> {
    /// Manager over the HTTP transport described by `config`.
    pub fn from_config(config: &BlogConfig) -> Self {
        Self::new(Arc::new(HttpTransport::new(config)), config.version)
    }
}

impl<T: ContentTransport> BlogManager<T> {
    pub fn new(transport: Arc<T>, version: ContentVersion) -> Self {
        Self { transport, version }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    fn blog_query(&self) -> StoryQuery {
        StoryQuery::new()
            .starts_with(BLOG_PREFIX)
            .resolve_relations(LIST_RELATIONS)
            .version(self.version)
    }

    async fn fetch_stories(
        &self,
        operation: &'static str,
        query: &StoryQuery,
    ) -> Result<(Vec<Story>, Option<u64>), BlogError> {
        let resp = self.transport.get(STORIES_PATH, query).await.map_err(|e| {
            error!(operation, error = %e, "story listing failed");
            BlogError::fetch(operation, &e)
        })?;
        let total = resp.total;
        let stories = decode_stories(operation, resp)?;
        debug!(operation, count = stories.len(), "stories fetched");
        Ok((stories, total))
    }

    /// Paginated posts, newest first. `page` is 1-based.
    pub async fn get_posts(&self, page: u32, per_page: u32) -> Result<PostPage, BlogError> {
        let query = self
            .blog_query()
            .sort_by(NEWEST_FIRST)
            .per_page(per_page)
            .page(page);
        let (posts, total) = self.fetch_stories("fetch blog posts", &query).await?;
        let has_next = posts.len() == per_page as usize;
        Ok(PostPage {
            posts,
            total: total.unwrap_or(0),
            has_next,
        })
    }

    /// A single post by slug. A 404 is not an error: it yields `Ok(None)`.
    pub async fn get_post(&self, slug: &str) -> Result<Option<Story>, BlogError> {
        const OPERATION: &str = "fetch post";
        let path = format!("{STORIES_PATH}/{BLOG_PREFIX}/{slug}");
        let query = StoryQuery::new()
            .resolve_relations(POST_RELATIONS)
            .version(self.version);

        let resp = match self.transport.get(&path, &query).await {
            Ok(resp) => resp,
            Err(e) if e.is_not_found() => {
                debug!(slug, "post not found");
                return Ok(None);
            }
            Err(e) => {
                error!(operation = OPERATION, slug, error = %e, "post fetch failed");
                return Err(BlogError::fetch(OPERATION, &e));
            }
        };

        serde_json::from_value::<StoryEnvelope>(resp.body)
            .map(|env| Some(env.story))
            .map_err(|e| {
                error!(operation = OPERATION, slug, error = %e, "unexpected post shape");
                BlogError::Shape {
                    operation: OPERATION,
                    detail: e.to_string(),
                }
            })
    }

    pub async fn posts_by_category(&self, category_slug: &str) -> Result<Vec<Story>, BlogError> {
        let query = self
            .blog_query()
            .filter(
                "category.full_slug",
                "in",
                format!("{CATEGORIES_PREFIX}/{category_slug}"),
            )
            .sort_by(NEWEST_FIRST);
        self.fetch_stories("fetch posts by category", &query)
            .await
            .map(|(stories, _)| stories)
    }

    pub async fn posts_by_author(&self, author_slug: &str) -> Result<Vec<Story>, BlogError> {
        let query = self
            .blog_query()
            .filter(
                "author.full_slug",
                "in",
                format!("{AUTHORS_PREFIX}/{author_slug}"),
            )
            .sort_by(NEWEST_FIRST);
        self.fetch_stories("fetch posts by author", &query)
            .await
            .map(|(stories, _)| stories)
    }

    /// Full-text search. Queries shorter than [`MIN_SEARCH_LEN`] characters
    /// after trimming return an empty list without touching the transport.
    pub async fn search_posts(&self, query: &str, limit: u32) -> Result<Vec<Story>, BlogError> {
        let term = query.trim();
        if term.chars().count() < MIN_SEARCH_LEN {
            return Ok(Vec::new());
        }
        let query = self.blog_query().search_term(term).per_page(limit);
        self.fetch_stories("search posts", &query)
            .await
            .map(|(stories, _)| stories)
    }

    pub async fn featured_posts(&self, limit: u32) -> Result<Vec<Story>, BlogError> {
        let query = self
            .blog_query()
            .filter("featured", "is", "true")
            .sort_by(NEWEST_FIRST)
            .per_page(limit);
        self.fetch_stories("fetch featured posts", &query)
            .await
            .map(|(stories, _)| stories)
    }

    pub async fn categories(&self) -> Result<Vec<Story>, BlogError> {
        let query = StoryQuery::new()
            .starts_with(CATEGORIES_PREFIX)
            .version(self.version)
            .sort_by(BY_NAME);
        self.fetch_stories("fetch categories", &query)
            .await
            .map(|(stories, _)| stories)
    }

    pub async fn authors(&self) -> Result<Vec<Story>, BlogError> {
        let query = StoryQuery::new()
            .starts_with(AUTHORS_PREFIX)
            .version(self.version)
            .sort_by(BY_NAME);
        self.fetch_stories("fetch authors", &query)
            .await
            .map(|(stories, _)| stories)
    }

    /// Posts sharing at least one tag with `current`, excluding `current`
    /// itself. Soft-fails to an empty list.
    pub async fn related_posts(&self, current: Option<&Story>, limit: u32) -> Vec<Story> {
        let Some(current) = current.filter(|p| !p.tag_list.is_empty()) else {
            return Vec::new();
        };

        let query = self
            .blog_query()
            .excluding_id(current.id)
            .filter("tag_list", "any_in_array", current.tag_list.join(","))
            .sort_by(NEWEST_FIRST)
            .per_page(limit);

        match self.fetch_stories("fetch related posts", &query).await {
            Ok((stories, _)) => stories,
            Err(e) => {
                warn!(post_id = current.id, error = %e, "related posts unavailable, returning none");
                Vec::new()
            }
        }
    }

    /// Post, category and author counts, fetched concurrently. Any single
    /// failure yields [`BlogStats::zero`] rather than a partial result.
    pub async fn blog_stats(&self) -> BlogStats {
        let count_query = StoryQuery::new()
            .starts_with(BLOG_PREFIX)
            .version(self.version)
            .per_page(1);

        let posts = async {
            self.transport
                .get(STORIES_PATH, &count_query)
                .await
                .map_err(|e| BlogError::fetch("count posts", &e))
        };

        match tokio::try_join!(posts, self.categories(), self.authors()) {
            Ok((posts, categories, authors)) => BlogStats {
                total_posts: posts.total.unwrap_or(0),
                total_categories: categories.len(),
                total_authors: authors.len(),
                last_updated: now_rfc3339(),
            },
            Err(e) => {
                error!(error = %e, "blog stats unavailable, returning zeros");
                BlogStats::zero()
            }
        }
    }

    /// Drop every response cached by the transport.
    pub fn clear_cache(&self) {
        self.transport.flush_cache();
    }
}

fn decode_stories(operation: &'static str, resp: ApiResponse) -> Result<Vec<Story>, BlogError> {
    serde_json::from_value::<StoriesEnvelope>(resp.body)
        .map(|env| env.stories)
        .map_err(|e| {
            error!(operation, error = %e, "unexpected listing shape");
            BlogError::Shape {
                operation,
                detail: e.to_string(),
            }
        })
}
