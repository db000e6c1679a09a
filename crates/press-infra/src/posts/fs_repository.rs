//! Markdown-file post repository.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tokio::fs;

use press_core::codec::{Document, decode_post, encode_post, summarize};
use press_core::domain::{Post, PostSummary, SavedPost};
use press_core::error::{DomainError, RepoError};
use press_core::ports::PostRepository;
use press_core::slug::is_safe_key;

const EXTENSION: &str = "md";
const LIST_CONCURRENCY: usize = 16;

/// Stores each post as `<slug>.md` in a single directory.
#[derive(Debug, Clone)]
pub struct FsPostRepository {
    dir: PathBuf,
    atomic_writes: bool,
}

impl FsPostRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            atomic_writes: true,
        }
    }

    /// Write through a temporary sibling and rename, so readers never see a
    /// half-written file.
    pub fn with_atomic_writes(mut self, enabled: bool) -> Self {
        self.atomic_writes = enabled;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, slug: &str) -> Result<PathBuf, RepoError> {
        if !is_safe_key(slug) {
            return Err(DomainError::Validation(format!("Invalid slug '{slug}'")).into());
        }
        Ok(self.dir.join(format!("{slug}.{EXTENSION}")))
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<(), RepoError> {
        if !self.atomic_writes {
            fs::write(path, contents).await?;
            return Ok(());
        }

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let temp = path.with_file_name(format!(".{file_name}.tmp"));

        fs::write(&temp, contents).await?;
        if let Err(e) = fs::rename(&temp, path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn markdown_files(&self) -> Result<Vec<PathBuf>, RepoError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_markdown = path.extension().is_some_and(|ext| ext == EXTENSION);
            if is_markdown && entry.file_type().await?.is_file() {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

async fn summarize_file(path: PathBuf) -> Result<PostSummary, RepoError> {
    let slug = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let metadata = fs::metadata(&path).await?;
    let modified: DateTime<Utc> = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH).into();
    let bytes = fs::read(&path).await?;
    let text = String::from_utf8_lossy(&bytes);

    let document = Document::split(&text).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Listing post with unreadable frontmatter");
        Document::headerless(&text)
    });

    Ok(summarize(&slug, &document, modified, metadata.len()))
}

#[async_trait]
impl PostRepository for FsPostRepository {
    async fn list(&self) -> Result<Vec<PostSummary>, RepoError> {
        let paths = self.markdown_files().await?;

        let results: Vec<_> = stream::iter(paths)
            .map(summarize_file)
            .buffer_unordered(LIST_CONCURRENCY)
            .collect()
            .await;

        let mut posts = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(summary) => posts.push(summary),
                // Removed between read_dir and read.
                Err(RepoError::Io(e)) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }

        posts.sort_by(|a, b| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| a.slug.cmp(&b.slug))
        });

        tracing::debug!(count = posts.len(), dir = %self.dir.display(), "Listed posts");
        Ok(posts)
    }

    async fn load(&self, slug: &str) -> Result<Post, RepoError> {
        let path = self.path_for(slug)?;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RepoError::not_found("Post", slug));
            }
            Err(e) => return Err(e.into()),
        };
        let text = String::from_utf8(bytes)
            .map_err(|e| DomainError::InvalidFormat(format!("file is not valid UTF-8: {e}")))?;

        Ok(decode_post(slug, &text)?)
    }

    async fn save(&self, mut post: Post) -> Result<SavedPost, RepoError> {
        post.validate()?;
        let slug = post.resolve_slug()?;
        let path = self.path_for(&slug)?;

        post.slug = slug.clone();
        post.apply_defaults();
        post.publish_date = Some(Utc::now().date_naive());

        let contents = encode_post(&post);

        fs::create_dir_all(&self.dir).await?;
        self.write(&path, &contents).await?;

        tracing::info!(
            slug = %slug,
            status = ?post.status,
            bytes = contents.len(),
            "Saved post"
        );

        Ok(SavedPost {
            slug,
            path,
            status: post.status,
        })
    }

    async fn delete(&self, slug: &str) -> Result<(), RepoError> {
        let path = self.path_for(slug)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(slug = %slug, "Deleted post");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(RepoError::not_found("Post", slug)),
            Err(e) => Err(e.into()),
        }
    }
}
