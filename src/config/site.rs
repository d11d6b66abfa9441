//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable that overrides `url`
pub const SITE_URL_ENV: &str = "SITE_URL";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub tagline: String,
    pub url: String,
    #[serde(default)]
    pub author: AuthorConfig,

    // Directory
    pub posts_dir: String,
    pub static_dir: String,
    pub public_dir: String,

    // Output
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub home: HomeConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub links: LinksConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "blog.rook.works".to_string(),
            description: "Posts from blog.rook.works".to_string(),
            tagline: "Tools, writing, workflows, and ideas from the edge of craft.".to_string(),
            url: "https://blog.rook.works".to_string(),
            author: AuthorConfig::default(),

            posts_dir: "content/posts".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            feed: FeedConfig::default(),
            home: HomeConfig::default(),
            highlight: HighlightConfig::default(),
            links: LinksConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(SITE_URL_ENV) {
            self.set_url_override(&url);
        }
    }

    fn set_url_override(&mut self, url: &str) {
        let url = url.trim();
        if !url.is_empty() {
            tracing::debug!("Using site url from {}: {}", SITE_URL_ENV, url);
            self.url = url.to_string();
        }
    }

    /// Site url without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// Who writes the blog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorConfig {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub avatar: String,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            name: "Jacob Herrmann".to_string(),
            role: "Primary Contributor".to_string(),
            bio: "Economic systems, tools, and working notes from the craft edge.".to_string(),
            avatar: "/images/authors/jacob-herrmann.png".to_string(),
        }
    }
}

/// RSS feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub max_items: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { max_items: 20 }
    }
}

/// Home page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    /// Posts shown when no search or tag filter is active
    pub featured: usize,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self { featured: 6 }
    }
}

/// Code block highlighting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: false,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Footer links
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub repository: String,
    pub social: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            repository: "https://github.com/JJHerrmann/blog.rook.works".to_string(),
            social: "https://github.com/JJHerrmann".to_string(),
        }
    }
}
