//! Generate static files

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::generator::Generator;
use crate::Blog;

/// Generate the static site
pub async fn run(blog: &Blog) -> Result<()> {
    let start = Instant::now();

    let generator = Generator::new(blog)?;
    let count = generator.generate().await?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} posts into {:?} in {:.2}s",
        count,
        blog.public_dir,
        duration.as_secs_f64()
    );

    Ok(())
}

/// Watch posts, static files and the config, regenerating on change.
/// The configuration is re-read before every rebuild.
pub async fn watch(blog: &Blog) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for dir in [&blog.posts_dir, &blog.static_dir] {
        if dir.exists() {
            watcher.watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = blog.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();
    while let Some(event) = rx.recv().await {
        let relevant = event.paths.iter().any(|path| {
            let path = path.to_string_lossy();
            !path.contains(".git") && !path.contains(".DS_Store") && !path.ends_with('~')
        });

        // Debounce: editors emit bursts of events per save
        if !relevant || last_rebuild.elapsed() < Duration::from_millis(500) {
            continue;
        }

        tracing::info!("File changed, regenerating...");
        let result = match Blog::new(&blog.base_dir) {
            Ok(current) => run(&current).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::error!("Generation failed: {:#}", e);
        }
        last_rebuild = Instant::now();
    }

    Ok(())
}
