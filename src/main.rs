use clap::{CommandFactory, Parser};
use colored::*;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blok_blog::cli::{render_page_footer, render_post_line, render_stats, Args, Command};
use blok_blog::{format_post, BlogConfig, BlogManager, Story};

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_posts(posts: &[Story]) {
    if posts.is_empty() {
        println!("{}", "no posts".dimmed());
    }
    for post in posts {
        println!("{}", render_post_line(&format_post(post)));
    }
}

fn print_entries(entries: &[Story]) {
    for entry in entries {
        println!("{} {}", entry.name.bold(), entry.full_slug.dimmed());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Command::Completions { shell } = args.command {
        clap_complete::generate(shell, &mut Args::command(), "blok-blog", &mut std::io::stdout());
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blok_blog=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = BlogConfig::load(args.config.as_deref(), args.token.clone())?;
    tracing::debug!(base_url = %config.base_url, version = %config.version, "loaded config");
    let blog = BlogManager::from_config(&config);

    match args.command {
        Command::Posts { page, per_page } => {
            let result = blog.get_posts(page, per_page).await?;
            if args.json {
                return print_json(&result);
            }
            print_posts(&result.posts);
            println!("{}", render_page_footer(&result, page));
        }
        Command::Post { slug } => match blog.get_post(&slug).await? {
            Some(story) if args.json => print_json(&format_post(&story))?,
            Some(story) => {
                let post = format_post(&story);
                println!("{}", render_post_line(&post));
                if let Some(author) = post.author.as_ref().and_then(|a| a.name.as_deref()) {
                    println!("{} {}", "by".dimmed(), author);
                }
                if !post.tags.is_empty() {
                    println!("{} {}", "tags:".dimmed(), post.tags.join(", "));
                }
                if !post.excerpt.is_empty() {
                    println!("\n{}", post.excerpt);
                }
            }
            None => {
                eprintln!("{} no post with slug '{}'", "not found:".red(), slug);
                std::process::exit(1);
            }
        },
        Command::Category { slug } => {
            let posts = blog.posts_by_category(&slug).await?;
            if args.json {
                return print_json(&posts);
            }
            print_posts(&posts);
        }
        Command::Author { slug } => {
            let posts = blog.posts_by_author(&slug).await?;
            if args.json {
                return print_json(&posts);
            }
            print_posts(&posts);
        }
        Command::Search { query, limit } => {
            let posts = blog.search_posts(&query, limit).await?;
            if args.json {
                return print_json(&posts);
            }
            print_posts(&posts);
        }
        Command::Featured { limit } => {
            let posts = blog.featured_posts(limit).await?;
            if args.json {
                return print_json(&posts);
            }
            print_posts(&posts);
        }
        Command::Categories => {
            let entries = blog.categories().await?;
            if args.json {
                return print_json(&entries);
            }
            print_entries(&entries);
        }
        Command::Authors => {
            let entries = blog.authors().await?;
            if args.json {
                return print_json(&entries);
            }
            print_entries(&entries);
        }
        Command::Related { slug, limit } => {
            let current = blog.get_post(&slug).await?;
            let posts = blog.related_posts(current.as_ref(), limit).await;
            if args.json {
                return print_json(&posts);
            }
            print_posts(&posts);
        }
        Command::Stats => {
            let stats = blog.blog_stats().await;
            if args.json {
                return print_json(&stats);
            }
            println!("{}", render_stats(&stats));
        }
        Command::Completions { .. } => {}
    }

    Ok(())
}
