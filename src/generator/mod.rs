//! Generator module - writes the site into the public directory using the
//! built-in Tera templates

pub mod feed;

use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::{PostStore, PostSummary};
use crate::helpers::HomeQuery;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Static site generator
pub struct Generator {
    blog: Blog,
    store: PostStore,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            store: blog.store(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Generate the entire site. Returns the number of post pages written.
    pub async fn generate(&self) -> Result<usize> {
        let config = &self.blog.config;
        fs::create_dir_all(&self.blog.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.blog.public_dir))?;

        // Static assets first so generated pages win on name clashes
        let copied = self.copy_static_assets()?;
        tracing::debug!("Copied {} static files", copied);

        // One pass over the files; pages render from the same parse
        let parsed = self.store.parsed_posts()?;
        let mut posts: Vec<PostSummary> = parsed.iter().map(|p| p.summary.clone()).collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        tracing::info!("Loaded {} posts", posts.len());

        if let Some(bad) = posts.iter().find(|post| !is_path_safe(&post.slug)) {
            anyhow::bail!("Slug {:?} cannot be used as a page path", bad.slug);
        }

        let home = self
            .renderer
            .render_home(config, &posts, &HomeQuery::default())?;
        self.write("index.html", &home)?;

        let mut written = HashSet::new();
        for item in parsed {
            let slug = item.summary.slug.clone();
            // Same post the server would pick: the first one discovered
            if !written.insert(slug.clone()) {
                tracing::warn!("Duplicate slug {:?}, keeping the first post", slug);
                continue;
            }

            let post = self.store.render(item).await?;
            let html = self.renderer.render_post(config, &post)?;
            self.write(&format!("posts/{}/index.html", slug), &html)?;
        }

        self.write("404.html", &self.renderer.render_not_found(config)?)?;

        let now = Utc::now();
        self.write("rss.xml", &feed::rss_xml(config, &posts, now))?;
        self.write("sitemap.xml", &feed::sitemap_xml(config, &posts, now))?;
        self.write("robots.txt", &feed::robots_txt(config))?;

        Ok(written.len())
    }

    /// Write a file below the public directory
    fn write(&self, relative: &str, contents: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, contents)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Copy everything under the static directory into the public directory
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir).follow_links(true) {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || is_hidden(path) {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.blog.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest).with_context(|| format!("Failed to copy {:?}", path))?;
            copied += 1;
        }

        Ok(copied)
    }
}

/// A slug must stay a single path segment below `posts/`
fn is_path_safe(slug: &str) -> bool {
    !slug.contains(['/', '\\']) && slug != "." && slug != ".."
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    const POST: &str = "---\ntitle: Hello\nslug: hello\ndate: 2024-01-05\ndescription: First\ntags: [intro]\ncoverImage: /c.png\n---\n# Hello there\n";

    fn blog(dir: &Path) -> Blog {
        let config = SiteConfig {
            url: "https://blog.test".to_string(),
            ..Default::default()
        };
        Blog::with_config(dir, config)
    }

    #[tokio::test]
    async fn test_generate_writes_site() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        fs::create_dir_all(&blog.posts_dir).unwrap();
        fs::write(blog.posts_dir.join("hello.md"), POST).unwrap();
        fs::create_dir_all(blog.static_dir.join("images")).unwrap();
        fs::write(blog.static_dir.join("images/a.png"), b"png").unwrap();
        fs::write(blog.static_dir.join(".DS_Store"), b"").unwrap();

        let count = Generator::new(&blog).unwrap().generate().await.unwrap();
        assert_eq!(count, 1);

        let public = &blog.public_dir;
        let post = fs::read_to_string(public.join("posts/hello/index.html")).unwrap();
        assert!(post.contains("<h1>Hello there</h1>"));
        assert!(fs::read_to_string(public.join("index.html"))
            .unwrap()
            .contains(r#"href="/posts/hello""#));
        assert!(fs::read_to_string(public.join("rss.xml"))
            .unwrap()
            .contains("<link>https://blog.test/posts/hello</link>"));
        assert!(public.join("sitemap.xml").exists());
        assert!(public.join("robots.txt").exists());
        assert!(public.join("404.html").exists());
        assert_eq!(fs::read(public.join("images/a.png")).unwrap(), b"png");
        assert!(!public.join(".DS_Store").exists());
    }

    #[tokio::test]
    async fn test_generate_fails_on_invalid_post() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        fs::create_dir_all(&blog.posts_dir).unwrap();
        fs::write(blog.posts_dir.join("bad.md"), "---\ntitle: Bad\n---\n").unwrap();

        let err = Generator::new(&blog).unwrap().generate().await.unwrap_err();
        assert!(err.to_string().contains("bad.md"));
    }

    #[tokio::test]
    async fn test_generate_rejects_slug_leaving_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        fs::create_dir_all(&blog.posts_dir).unwrap();
        fs::write(
            blog.posts_dir.join("escape.md"),
            POST.replace("slug: hello", "slug: ../../escaped"),
        )
        .unwrap();

        let err = Generator::new(&blog).unwrap().generate().await.unwrap_err();
        assert!(err.to_string().contains("../../escaped"));
        assert!(!dir.path().join("escaped").exists());
        assert!(!blog.public_dir.join("index.html").exists());
    }

    #[tokio::test]
    async fn test_generate_duplicate_slugs_keep_first() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        fs::create_dir_all(&blog.posts_dir).unwrap();
        fs::write(blog.posts_dir.join("one.md"), POST).unwrap();
        fs::write(
            blog.posts_dir.join("two.md"),
            POST.replace("# Hello there", "# Second"),
        )
        .unwrap();

        let count = Generator::new(&blog).unwrap().generate().await.unwrap();
        assert_eq!(count, 1);

        let first = blog.store().post_by_slug("hello").await.unwrap().unwrap();
        let page = fs::read_to_string(blog.public_dir.join("posts/hello/index.html")).unwrap();
        assert!(page.contains(&first.html));
    }

    #[test]
    fn test_path_safe_slugs() {
        assert!(is_path_safe("hello-world"));
        assert!(is_path_safe("v1.2"));
        for slug in ["a/b", "..", ".", "a\\b"] {
            assert!(!is_path_safe(slug), "{}", slug);
        }
    }
}
