//! Post store - discovers, parses and collects posts from the posts directory

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, Post, PostSummary};
use crate::error::{ContentError, Result};
use crate::Blog;

/// A post fresh from disk: validated record plus its raw body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPost {
    pub summary: PostSummary,
    pub content: String,
}

/// Reads posts from a directory. Every call goes back to disk.
#[derive(Clone)]
pub struct PostStore {
    posts_dir: PathBuf,
    renderer: Arc<MarkdownRenderer>,
}

impl PostStore {
    /// Create a store over the blog's posts directory
    pub fn new(blog: &Blog) -> Self {
        let renderer = MarkdownRenderer::with_options(&blog.config.highlight);
        Self::with_renderer(&blog.posts_dir, renderer)
    }

    /// Create a store over any directory
    pub fn with_renderer<P: AsRef<Path>>(posts_dir: P, renderer: MarkdownRenderer) -> Self {
        Self {
            posts_dir: posts_dir.as_ref().to_path_buf(),
            renderer: Arc::new(renderer),
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// Names of the Markdown files directly inside the posts directory.
    /// A missing directory simply means there are no posts yet.
    pub fn list_source_files(&self) -> Result<Vec<String>> {
        if !self.posts_dir.exists() {
            tracing::debug!("Posts directory {:?} does not exist", self.posts_dir);
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.posts_dir)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(&self.posts_dir).to_path_buf();
                    // Broken links and unreadable entries only matter for posts
                    if e.depth() > 0 && !path_is_markdown(&path) {
                        tracing::debug!("Skipping unreadable entry {:?}: {}", path, e);
                        continue;
                    }
                    return Err(ContentError::io(path, e.into()));
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                if is_markdown_file(name) {
                    names.push(name.to_string());
                }
            }
        }

        Ok(names)
    }

    /// Read and validate a single post file
    pub fn parse_record(&self, file_name: &str) -> Result<ParsedPost> {
        let path = self.posts_dir.join(file_name);
        let source = fs::read_to_string(&path).map_err(|e| ContentError::io(&path, e))?;
        parse_post(file_name, &source)
    }

    /// All posts, newest first. One invalid post fails the whole listing.
    pub fn all_posts(&self) -> Result<Vec<PostSummary>> {
        let mut posts = self
            .parsed_posts()?
            .into_iter()
            .map(|parsed| parsed.summary)
            .collect::<Vec<_>>();

        // Stable: posts sharing a date keep discovery order
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.posts_dir);
        Ok(posts)
    }

    /// Slugs of all posts, newest first
    pub fn all_slugs(&self) -> Result<Vec<String>> {
        Ok(self
            .all_posts()?
            .into_iter()
            .map(|post| post.record.slug)
            .collect())
    }

    /// Find a post by exact slug and render its body.
    /// Returns `Ok(None)` when no post has that slug.
    pub async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let Some(parsed) = self
            .parsed_posts()?
            .into_iter()
            .find(|parsed| parsed.summary.slug == slug)
        else {
            return Ok(None);
        };

        Ok(Some(self.render(parsed).await?))
    }

    /// Render a parsed post's body into a full post
    pub async fn render(&self, parsed: ParsedPost) -> Result<Post> {
        let html = self.render_html(&parsed.content).await?;

        Ok(Post {
            summary: parsed.summary,
            content: parsed.content,
            html,
        })
    }

    /// Convert Markdown to HTML on the blocking pool
    pub async fn render_html(&self, markdown: &str) -> Result<String> {
        let renderer = Arc::clone(&self.renderer);
        let markdown = markdown.to_string();
        let html = tokio::task::spawn_blocking(move || renderer.render(&markdown)).await?;
        Ok(html)
    }

    /// Every post file parsed, in discovery order, bodies not yet rendered
    pub fn parsed_posts(&self) -> Result<Vec<ParsedPost>> {
        self.list_source_files()?
            .iter()
            .map(|name| self.parse_record(name))
            .collect()
    }
}

/// Parse a post's source text. `file_name` is only used in error messages.
pub fn parse_post(file_name: &str, source: &str) -> Result<ParsedPost> {
    let (front_matter, body) = FrontMatter::parse(file_name, source)?;
    let record = front_matter.validate(file_name)?;

    Ok(ParsedPost {
        summary: PostSummary::new(record, body),
        content: body.to_string(),
    })
}

/// Check if a file name is a markdown file
fn is_markdown_file(name: &str) -> bool {
    name.ends_with(".md")
}

fn path_is_markdown(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(is_markdown_file)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrorKind;
    use tempfile::TempDir;

    fn post_source(slug: &str, date: &str, body: &str) -> String {
        format!(
            "---\ntitle: Post {slug}\nslug: {slug}\ndate: {date}\ndescription: About {slug}\ntags: [one]\ncoverImage: /images/{slug}.png\n---\n{body}"
        )
    }

    fn store_with(files: &[(&str, String)]) -> (TempDir, PostStore) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let store = PostStore::with_renderer(dir.path(), MarkdownRenderer::new());
        (dir, store)
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = PostStore::with_renderer(dir.path().join("nope"), MarkdownRenderer::new());
        assert!(store.list_source_files().unwrap().is_empty());
        assert!(store.all_posts().unwrap().is_empty());
        assert!(store.all_slugs().unwrap().is_empty());
    }

    #[test]
    fn test_lists_only_top_level_markdown() {
        let (dir, store) = store_with(&[
            ("a.md", post_source("a", "2024-01-01", "")),
            ("notes.txt", "not a post".to_string()),
            ("draft.markdown", "ignored".to_string()),
        ]);
        fs::create_dir(dir.path().join("nested.md")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.md"), post_source("b", "2024-01-02", "")).unwrap();

        assert_eq!(store.list_source_files().unwrap(), vec!["a.md"]);
    }

    #[test]
    fn test_example_post() {
        let body = "word ".repeat(230);
        let source = format!(
            "---\ntitle: \"Hello\"\nslug: \"hello\"\ndate: 2024-01-05\ndescription: \"First post\"\ntags: [\"intro\"]\ncoverImage: \"/img.png\"\n---\n{}",
            body
        );
        let parsed = parse_post("hello.md", &source).unwrap();

        assert_eq!(parsed.summary.reading_time_minutes, 2);
        assert_eq!(parsed.summary.date.to_string(), "2024-01-05");
        assert_eq!(parsed.summary.title, "Hello");
        assert_eq!(parsed.summary.tags, vec!["intro"]);
        assert_eq!(parsed.content, body);
    }

    #[test]
    fn test_all_posts_sorted_newest_first_and_stable() {
        let (_dir, store) = store_with(&[
            ("old.md", post_source("old", "2023-05-01", "")),
            ("new.md", post_source("new", "2024-03-01", "")),
            ("mid-a.md", post_source("mid-a", "2024-01-01", "")),
            ("mid-b.md", post_source("mid-b", "2024-01-01", "")),
        ]);

        let discovered = store.list_source_files().unwrap();
        let mids: Vec<_> = discovered
            .iter()
            .filter(|n| n.starts_with("mid"))
            .map(|n| n.trim_end_matches(".md").to_string())
            .collect();

        let slugs = store.all_slugs().unwrap();
        assert_eq!(slugs[0], "new");
        assert_eq!(&slugs[1..3], &mids[..]);
        assert_eq!(slugs[3], "old");
    }

    #[test]
    fn test_one_bad_post_aborts_listing() {
        let (_dir, store) = store_with(&[
            ("good.md", post_source("good", "2024-01-01", "")),
            ("bad.md", post_source("bad", "2024-02-30", "")),
        ]);

        let err = store.all_posts().unwrap_err();
        let validation = err.as_validation().unwrap();
        assert_eq!(validation.kind, ValidationErrorKind::InvalidDateValue);
        assert_eq!(validation.file, "bad.md");
        assert!(store.all_slugs().is_err());
    }

    #[tokio::test]
    async fn test_post_by_slug_renders_html() {
        let (_dir, store) = store_with(&[
            ("a.md", post_source("a", "2024-01-01", "# Heading\n\nSome *text*.\n")),
            ("b.md", post_source("b", "2024-01-02", "")),
        ]);

        let post = store.post_by_slug("a").await.unwrap().unwrap();
        assert_eq!(post.slug, "a");
        assert_eq!(post.content, "# Heading\n\nSome *text*.\n");
        assert!(post.html.contains("<h1>Heading</h1>"));
        assert!(post.html.contains("<em>text</em>"));
    }

    #[tokio::test]
    async fn test_post_by_slug_missing_and_case_sensitive() {
        let (_dir, store) = store_with(&[("a.md", post_source("hello", "2024-01-01", ""))]);

        assert!(store.post_by_slug("nonexistent").await.unwrap().is_none());
        assert!(store.post_by_slug("Hello").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_post_by_slug_on_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = PostStore::with_renderer(dir.path().join("absent"), MarkdownRenderer::new());
        assert!(store.post_by_slug("anything").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_post_by_slug_fails_on_invalid_sibling() {
        let (_dir, store) = store_with(&[
            ("a.md", post_source("a", "2024-01-01", "")),
            ("b.md", "---\ntitle: broken\n---\n".to_string()),
        ]);

        let err = store.post_by_slug("a").await.unwrap_err();
        assert_eq!(err.as_validation().unwrap().field, "slug");
    }

    #[test]
    fn test_native_timestamp_date() {
        let source = post_source("late", "2024-01-05T23:30:00-05:00", "");
        let parsed = parse_post("late.md", &source).unwrap();
        assert_eq!(parsed.summary.date.to_string(), "2024-01-06");

        let source = post_source("tagged", "!!timestamp 2024-01-05T23:30:00-05:00", "");
        let parsed = parse_post("tagged.md", &source).unwrap();
        assert_eq!(parsed.summary.date.to_string(), "2024-01-06");

        let source = post_source("spaced", "2024-01-05 10:00:00", "");
        let parsed = parse_post("spaced.md", &source).unwrap();
        assert_eq!(parsed.summary.date.to_string(), "2024-01-05");
    }

    #[test]
    fn test_unterminated_header_is_all_header() {
        let source = post_source("solo", "2024-01-05", "");
        let source = source.trim_end_matches("---\n");
        let parsed = parse_post("solo.md", source).unwrap();
        assert_eq!(parsed.summary.slug, "solo");
        assert_eq!(parsed.content, "");
    }

    #[tokio::test]
    async fn test_render_parsed_posts() {
        let (_dir, store) = store_with(&[
            ("a.md", post_source("a", "2024-01-01", "*one*")),
            ("b.md", post_source("b", "2024-01-02", "two")),
        ]);

        let parsed = store.parsed_posts().unwrap();
        assert_eq!(parsed.len(), 2);
        for item in parsed {
            let post = store.render(item).await.unwrap();
            assert!(post.html.starts_with("<p>"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_links() {
        let (dir, store) = store_with(&[("a.md", post_source("a", "2024-01-01", ""))]);
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("link.txt"))
            .unwrap();
        assert_eq!(store.list_source_files().unwrap(), vec!["a.md"]);

        std::os::unix::fs::symlink(dir.path().join("gone.md"), dir.path().join("ghost.md"))
            .unwrap();
        assert!(matches!(
            store.list_source_files(),
            Err(ContentError::Io { .. })
        ));
    }
}
