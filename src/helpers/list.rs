//! Listing helpers for the home page: search, tag filter, tag counts

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::content::PostSummary;

/// Query parameters accepted by the home page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HomeQuery {
    /// Free-text search
    pub q: String,
    /// Tag filter
    pub tag: String,
}

impl HomeQuery {
    pub fn search(&self) -> &str {
        self.q.trim()
    }

    pub fn tag(&self) -> &str {
        self.tag.trim()
    }

    pub fn has_filters(&self) -> bool {
        !self.search().is_empty() || !self.tag().is_empty()
    }
}

/// A tag and how many posts carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

/// Posts matching the query's tag (case-insensitive, exact) and search text
/// (case-insensitive substring of title, description and tags)
pub fn filter_posts<'a>(posts: &'a [PostSummary], query: &HomeQuery) -> Vec<&'a PostSummary> {
    let tag = query.tag().to_lowercase();
    let search = query.search().to_lowercase();

    posts
        .iter()
        .filter(|post| tag.is_empty() || post.tags.iter().any(|t| t.to_lowercase() == tag))
        .filter(|post| search.is_empty() || haystack(post).contains(&search))
        .collect()
}

fn haystack(post: &PostSummary) -> String {
    let mut parts = vec![post.title.as_str(), post.description.as_str()];
    parts.extend(post.tags.iter().map(String::as_str));
    parts.join(" ").to_lowercase()
}

/// Every tag with its post count, most used first, then by name
pub fn tag_counts(posts: &[PostSummary]) -> Vec<TagCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    let mut tags: Vec<TagCount> = counts
        .into_iter()
        .map(|(name, count)| TagCount {
            name: name.to_string(),
            count,
        })
        .collect();

    tags.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
    tags
}
