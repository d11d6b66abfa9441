//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary. Every page gets `site`, `head` and
//! `version`; home and post pages add their own data on top.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::{AuthorConfig, LinksConfig, SiteConfig};
use crate::content::{Post, PostSummary};
use crate::helpers::{
    absolute_url, build_query, filter_posts, full_date, full_url_for, html_escape,
    published_xml, script_safe_json, tag_counts, HomeQuery, ShareLinks,
};

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Escaping is explicit through the `esc` filter so URLs stay readable
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("post.html", include_str!("site/post.html")),
            ("not_found.html", include_str!("site/not_found.html")),
        ])?;

        tera.register_filter("esc", esc_filter);
        tera.register_filter("long_date", long_date_filter);

        Ok(Self { tera })
    }

    /// Render the home page for a listing and its query
    pub fn render_home(
        &self,
        config: &SiteConfig,
        posts: &[PostSummary],
        query: &HomeQuery,
    ) -> Result<String> {
        let latest = posts.first();
        let filtered = filter_posts(posts, query);
        let has_filters = query.has_filters();
        let shown: Vec<&PostSummary> = if has_filters {
            filtered
        } else {
            posts.iter().take(config.home.featured).collect()
        };

        let active_tag = query.tag().to_lowercase();
        let categories: Vec<CategoryChip> = tag_counts(posts)
            .into_iter()
            .map(|tag| CategoryChip {
                href: build_query(&[("q", query.search()), ("tag", &tag.name)]),
                active: !active_tag.is_empty() && tag.name.to_lowercase() == active_tag,
                name: tag.name,
                count: tag.count,
            })
            .collect();

        let head = HeadData {
            title: config.title.clone(),
            description: config.description.clone(),
            canonical: full_url_for(config, "/"),
            og_type: "website",
            og_title: config.title.clone(),
            images: latest
                .map(|post| {
                    vec![ImageData {
                        url: absolute_url(config, &post.cover_image),
                        alt: config.title.clone(),
                    }]
                })
                .unwrap_or_default(),
            published_time: None,
            tags: Vec::new(),
        };

        let mut context = self.base_context(config, &head);
        context.insert("result_count", &shown.len());
        context.insert("posts", &shown);
        context.insert("has_filters", &has_filters);
        context.insert("search", query.search());
        context.insert("active_tag", query.tag());
        context.insert("categories", &categories);
        context.insert(
            "latest_href",
            &latest.map(|post| post.path()).unwrap_or_else(|| "/".to_string()),
        );
        context.insert("posts_dir", &config.posts_dir);

        Ok(self.tera.render("home.html", &context)?)
    }

    /// Render a single post page
    pub fn render_post(&self, config: &SiteConfig, post: &Post) -> Result<String> {
        let url = full_url_for(config, &post.path());
        let published = published_xml(post.date);
        let cover = absolute_url(config, &post.cover_image);

        let head = HeadData {
            title: format!("{} | {}", post.title, config.title),
            description: post.description.clone(),
            canonical: url.clone(),
            og_type: "article",
            og_title: post.title.clone(),
            images: vec![ImageData {
                url: cover.clone(),
                alt: format!("Cover image for {}", post.title),
            }],
            published_time: Some(published.clone()),
            tags: post.tags.clone(),
        };

        let schema = serde_json::json!({
            "@context": "https://schema.org",
            "@type": "BlogPosting",
            "headline": post.title,
            "description": post.description,
            "datePublished": published,
            "dateModified": published,
            "url": url,
            "image": cover,
            "author": {
                "@type": "Person",
                "name": config.author.name,
            },
            "keywords": post.tags.join(", "),
        });

        let mut context = self.base_context(config, &head);
        context.insert("post", post);
        context.insert("share", &ShareLinks::new(&post.title, &url));
        context.insert("schema", &script_safe_json(&schema.to_string()));

        Ok(self.tera.render("post.html", &context)?)
    }

    /// Render the page shown for unknown slugs
    pub fn render_not_found(&self, config: &SiteConfig) -> Result<String> {
        let head = HeadData {
            title: format!("Post Not Found | {}", config.title),
            description: "The requested post could not be found.".to_string(),
            canonical: full_url_for(config, "/"),
            og_type: "website",
            og_title: "Post Not Found".to_string(),
            images: Vec::new(),
            published_time: None,
            tags: Vec::new(),
        };

        let context = self.base_context(config, &head);
        Ok(self.tera.render("not_found.html", &context)?)
    }

    fn base_context(&self, config: &SiteConfig, head: &HeadData) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::from(config));
        context.insert("head", head);
        context.insert("version", env!("CARGO_PKG_VERSION"));
        context
    }
}

/// Tera filter: HTML-escape a value (leaves `/` alone, unlike the built-in)
fn esc_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = match value {
        tera::Value::String(s) => s.clone(),
        tera::Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(tera::Value::String(html_escape(&s)))
}

/// Tera filter: "2024-01-05" -> "January 5, 2024"
fn long_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("long_date", "value", String, value);
    match chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        Ok(date) => Ok(tera::Value::String(full_date(date))),
        Err(_) => Ok(tera::Value::String(s)),
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub tagline: String,
    pub url: String,
    pub author: AuthorConfig,
    pub links: LinksConfig,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            tagline: config.tagline.clone(),
            url: config.base_url().to_string(),
            author: config.author.clone(),
            links: config.links.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadData {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub og_type: &'static str,
    pub og_title: String,
    pub images: Vec<ImageData>,
    pub published_time: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageData {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryChip {
    pub name: String,
    pub count: usize,
    pub href: String,
    pub active: bool,
}
