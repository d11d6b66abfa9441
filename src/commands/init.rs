//! Initialize a new blog

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# rookblog configuration
# Every key is optional. SITE_URL in the environment overrides `url`.

title: My Blog
description: Posts from my blog
tagline: Notes, tools and ideas.
url: http://localhost:4000

author:
  name: Your Name
  role: Author
  bio: A few words about you.
  avatar: /images/avatar.png

# Directories, relative to this file
posts_dir: content/posts
static_dir: static
public_dir: public

feed:
  max_items: 20

home:
  featured: 6

highlight:
  enable: false
  theme: base16-ocean.dark
  line_number: false

links:
  repository: https://github.com/you/blog
  social: https://github.com/you
"#;

const STYLESHEET: &str = r#"body {
  margin: 0;
  font-family: system-ui, sans-serif;
  line-height: 1.6;
  color: #1d1d1f;
}

.container {
  max-width: 960px;
  margin: 0 auto;
  padding: 0 1rem;
}

.coverImage,
.coverImageLarge {
  width: 100%;
  height: auto;
  border-radius: 8px;
}

.tagList {
  display: flex;
  gap: 0.5rem;
  padding: 0;
  list-style: none;
}

.srOnly {
  position: absolute;
  width: 1px;
  height: 1px;
  overflow: hidden;
  clip: rect(0, 0, 0, 0);
}
"#;

/// Initialize a new blog in the given directory. Existing files are kept.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("static/images"))?;

    let date = Utc::now().date_naive().format("%Y-%m-%d");
    let sample_post = format!(
        r#"---
title: Hello World
slug: hello-world
date: {date}
description: The first post on this blog.
tags:
  - notes
coverImage: /images/placeholder-cover.png
---

Welcome! This post lives in `content/posts/hello-world.md`.

## Quick Start

```bash
$ rookblog new "My New Post"
$ rookblog server
$ rookblog generate
```
"#
    );

    write_if_missing(&target_dir.join("_config.yml"), CONFIG_TEMPLATE)?;
    write_if_missing(&target_dir.join("content/posts/hello-world.md"), &sample_post)?;
    write_if_missing(&target_dir.join("static/globals.css"), STYLESHEET)?;

    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        tracing::warn!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Created: {:?}", path);
    Ok(())
}
