use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use colored::*;

use crate::blog::{BlogStats, PostPage};
use crate::format::FormattedPost;

#[derive(Parser)]
#[command(name = "blok-blog")]
#[command(version)]
#[command(about = "Query blog content from the Storyblok delivery API")]
pub struct Args {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Delivery API access token (overrides the config file)
    #[arg(long, env = "STORYBLOK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Print raw JSON instead of a summary
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List posts, newest first
    Posts {
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=100))]
        per_page: u32,
    },
    /// Show a single post by slug
    Post { slug: String },
    /// List posts in a category
    Category { slug: String },
    /// List posts by an author
    Author { slug: String },
    /// Full-text search over posts
    Search {
        query: String,
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// List featured posts
    Featured {
        #[arg(long, default_value = "5")]
        limit: u32,
    },
    /// List all categories
    Categories,
    /// List all authors
    Authors,
    /// Posts sharing tags with the given post
    Related {
        slug: String,
        #[arg(long, default_value = "3")]
        limit: u32,
    },
    /// Post, category and author counts
    Stats,
    /// Print shell completions
    Completions { shell: Shell },
}

/// One summary line per post: title, date, reading time, url.
pub fn render_post_line(post: &FormattedPost) -> String {
    let title = post.title.as_deref().unwrap_or(&post.slug);
    let date = post
        .published_at
        .as_deref()
        .and_then(|d| d.get(..10))
        .unwrap_or("unpublished");
    format!(
        "{} {} {} {}",
        title.bold(),
        date.dimmed(),
        format!("{} min", post.reading_time).cyan(),
        post.url.bright_blue()
    )
}

pub fn render_page_footer(page: &PostPage, current: u32) -> String {
    let more = if page.has_next { "more available" } else { "last page" };
    format!(
        "{} page {} · {} of {} posts · {}",
        "--".dimmed(),
        current,
        page.posts.len(),
        page.total,
        more
    )
}

pub fn render_stats(stats: &BlogStats) -> String {
    format!(
        "{} {}\n{} {}\n{} {}\n{} {}",
        "posts:".bold(),
        stats.total_posts,
        "categories:".bold(),
        stats.total_categories,
        "authors:".bold(),
        stats.total_authors,
        "updated:".bold(),
        stats.last_updated.dimmed()
    )
}
