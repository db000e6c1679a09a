use std::time::Duration;

use press_core::domain::{Post, PostStatus};
use press_core::error::{DomainError, RepoError};
use press_core::ports::PostRepository;
use tempfile::TempDir;

use super::FsPostRepository;

fn repo() -> (TempDir, FsPostRepository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = FsPostRepository::new(dir.path().join("blog"));
    (dir, repo)
}

fn draft(title: &str) -> Post {
    let mut post = Post::new(title, "Jane", "<p>Hi</p>");
    post.status = PostStatus::Draft;
    post
}

#[tokio::test]
async fn test_save_writes_markdown_file() {
    let (_dir, repo) = repo();

    let saved = repo.save(draft("Hello World")).await.unwrap();

    assert_eq!(saved.slug, "hello-world");
    assert_eq!(saved.status, PostStatus::Draft);
    assert!(saved.path.ends_with("hello-world.md"));

    let text = tokio::fs::read_to_string(&saved.path).await.unwrap();
    assert!(text.starts_with("---\ntitle: \"Hello World\"\n"));
    assert!(text.contains("\ndraft: true\n"));
    assert!(text.ends_with("---\n\nHi\n\n"));
}

#[tokio::test]
async fn test_save_then_load() {
    let (_dir, repo) = repo();
    let mut post = draft("Round Trip");
    post.tags = vec!["rust".to_string(), "cms".to_string()];
    post.featured_image = Some("/images/uploads/a.png".to_string());

    repo.save(post).await.unwrap();
    let loaded = repo.load("round-trip").await.unwrap();

    assert_eq!(loaded.slug, "round-trip");
    assert_eq!(loaded.title, "Round Trip");
    assert_eq!(loaded.content, "<p>Hi</p>");
    assert_eq!(loaded.tags, vec!["rust", "cms"]);
    assert_eq!(loaded.og_image, "/images/uploads/a.png");
    assert_eq!(loaded.status, PostStatus::Draft);
    assert_eq!(loaded.publish_date, Some(chrono::Utc::now().date_naive()));
}

#[tokio::test]
async fn test_save_rejects_missing_fields_without_writing() {
    let (_dir, repo) = repo();
    let post = Post::new("No body", "Jane", "");

    let err = repo.save(post).await.unwrap_err();

    assert!(matches!(err, RepoError::Domain(DomainError::Validation(_))));
    assert!(!repo.dir().exists());
}

#[tokio::test]
async fn test_save_overwrites_existing_post() {
    let (_dir, repo) = repo();
    repo.save(draft("Same Title")).await.unwrap();

    let mut updated = draft("Same Title");
    updated.content = "<p>Second</p>".to_string();
    updated.status = PostStatus::Published;
    repo.save(updated).await.unwrap();

    let loaded = repo.load("same-title").await.unwrap();
    assert_eq!(loaded.content, "<p>Second</p>");
    assert_eq!(loaded.status, PostStatus::Published);
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_atomic_writes() {
    let (_dir, repo) = repo();
    let repo = repo.with_atomic_writes(false);

    repo.save(draft("Plain")).await.unwrap();

    assert!(repo.load("plain").await.is_ok());
}

#[tokio::test]
async fn test_list_orders_by_modification_time() {
    let (_dir, repo) = repo();
    repo.save(draft("Older")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;
    repo.save(draft("Newer")).await.unwrap();

    let posts = repo.list().await.unwrap();

    let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["newer", "older"]);
    assert!(posts[0].draft);
    assert_eq!(posts[0].preview, "Hi");
}

#[tokio::test]
async fn test_list_missing_directory_is_empty() {
    let (_dir, repo) = repo();
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_keeps_files_without_frontmatter() {
    let (_dir, repo) = repo();
    tokio::fs::create_dir_all(repo.dir()).await.unwrap();
    tokio::fs::write(repo.dir().join("loose-notes.md"), "Just text").await.unwrap();
    tokio::fs::write(repo.dir().join("ignored.txt"), "---\n---\n").await.unwrap();

    let posts = repo.list().await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].slug, "loose-notes");
    assert_eq!(posts[0].title, "loose-notes");
    assert_eq!(posts[0].category, "general");
    assert_eq!(posts[0].preview, "Just text");
}

#[tokio::test]
async fn test_list_tolerates_non_utf8_file() {
    let (_dir, repo) = repo();
    repo.save(draft("Good Post")).await.unwrap();
    tokio::fs::write(
        repo.dir().join("legacy.md"),
        b"---\ntitle: \"Caf\xe9\"\n---\n\nCr\xe8me\n".as_slice(),
    )
    .await
    .unwrap();

    let posts = repo.list().await.unwrap();

    assert_eq!(posts.len(), 2);
    let legacy = posts.iter().find(|post| post.slug == "legacy").unwrap();
    assert_eq!(legacy.title, "Caf\u{fffd}");

    let err = repo.load("legacy").await.unwrap_err();
    assert!(matches!(err, RepoError::Domain(DomainError::InvalidFormat(_))));
    assert!(repo.load("good-post").await.is_ok());
}

#[tokio::test]
async fn test_load_missing_is_not_found() {
    let (_dir, repo) = repo();
    let err = repo.load("nope").await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[tokio::test]
async fn test_unsafe_slugs_are_rejected() {
    let (_dir, repo) = repo();

    let err = repo.load("../secret").await.unwrap_err();
    assert!(matches!(err, RepoError::Domain(DomainError::Validation(_))));

    let err = repo.delete("a/b").await.unwrap_err();
    assert!(matches!(err, RepoError::Domain(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_delete() {
    let (_dir, repo) = repo();
    repo.save(draft("Doomed")).await.unwrap();

    repo.delete("doomed").await.unwrap();

    assert!(matches!(
        repo.load("doomed").await,
        Err(RepoError::NotFound { .. })
    ));
    assert!(matches!(
        repo.delete("doomed").await,
        Err(RepoError::NotFound { .. })
    ));
}
