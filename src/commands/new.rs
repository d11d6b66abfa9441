//! Create a new post

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::Blog;

const DEFAULT_TAG: &str = "notes";
const PLACEHOLDER_COVER: &str = "/images/placeholder-cover.png";
const PLACEHOLDER_DESCRIPTION: &str = "A short summary of this post.";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Scaffold<'a> {
    title: &'a str,
    slug: &'a str,
    date: String,
    description: &'a str,
    tags: Vec<&'a str>,
    cover_image: &'a str,
}

/// Create a post file whose front matter already validates
pub fn create_post(
    blog: &Blog,
    title: &str,
    slug: Option<&str>,
    tags: &[String],
) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("A post needs a title");
    }

    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Could not derive a slug from {:?}; pass --slug", title);
    }

    let mut tags: Vec<&str> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        tags.push(DEFAULT_TAG);
    }

    let scaffold = Scaffold {
        title,
        slug: &slug,
        date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
        description: PLACEHOLDER_DESCRIPTION,
        tags,
        cover_image: PLACEHOLDER_COVER,
    };
    let header = serde_yaml::to_string(&scaffold)?;
    let content = format!("---\n{}---\n\nWrite your post here.\n", header);

    fs::create_dir_all(&blog.posts_dir)?;
    let file_path = blog.posts_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, content).with_context(|| format!("Failed to write {:?}", file_path))?;
    println!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_post;

    fn blog() -> (tempfile::TempDir, Blog) {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), Default::default());
        (dir, blog)
    }

    #[test]
    fn test_new_post_validates() {
        let (_dir, blog) = blog();
        let path = create_post(&blog, "Hello: A \"Quoted\" World", None, &[]).unwrap();
        assert_eq!(path, blog.posts_dir.join("hello-a-quoted-world.md"));

        let source = fs::read_to_string(&path).unwrap();
        let parsed = parse_post("hello-a-quoted-world.md", &source).unwrap();
        assert_eq!(parsed.summary.title, "Hello: A \"Quoted\" World");
        assert_eq!(parsed.summary.slug, "hello-a-quoted-world");
        assert_eq!(parsed.summary.tags, vec!["notes"]);
        assert_eq!(parsed.summary.date, Utc::now().date_naive());
        assert_eq!(parsed.summary.cover_image, PLACEHOLDER_COVER);
    }

    #[test]
    fn test_new_post_with_slug_and_tags() {
        let (_dir, blog) = blog();
        let tags = vec!["rust".to_string(), " ".to_string(), "cli".to_string()];
        let path = create_post(&blog, "Anything", Some("Custom Slug"), &tags).unwrap();

        let source = fs::read_to_string(&path).unwrap();
        let parsed = parse_post("custom-slug.md", &source).unwrap();
        assert_eq!(parsed.summary.slug, "custom-slug");
        assert_eq!(parsed.summary.tags, vec!["rust", "cli"]);
    }

    #[test]
    fn test_new_post_refuses_overwrite() {
        let (_dir, blog) = blog();
        create_post(&blog, "Twice", None, &[]).unwrap();
        let err = create_post(&blog, "Twice", None, &[]).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
