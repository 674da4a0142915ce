mod common;

use common::Blog;
use quill_core::DomainError;
use quill_core::services::{NO_TAG, PostDraft};

fn draft(title: &str, tag_id: Option<i32>) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        description: "words".to_string(),
        thumbnail_url: Some("/img/cover.png".to_string()),
        tag_id,
    }
}

#[tokio::test]
async fn test_view_post_counts_views_and_resolves_names() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;
    let tag = blog.tags.create("engines").await.unwrap();
    let post = blog
        .posts
        .create_post(ada.id, draft("Analytical Engine", Some(tag.id)))
        .await
        .unwrap();
    blog.comments
        .add_comment(post.id, ada.id, "notes".into())
        .await
        .unwrap();

    let first = blog.posts.view_post("analytical-engine").await.unwrap();
    let second = blog.posts.view_post("analytical-engine").await.unwrap();

    assert_eq!(first.view_count, 1);
    assert_eq!(second.view_count, 2);
    assert_eq!(second.tag_name, "engines");
    assert_eq!(second.author_name, "Ada Lovelace");
    assert_eq!(second.thumbnail_url.as_deref(), Some("/img/cover.png"));
    assert_eq!(second.comments.len(), 1);
}

#[tokio::test]
async fn test_view_missing_post() {
    let blog = Blog::new();

    match blog.posts.view_post("nope").await {
        Err(DomainError::NotFound(msg)) => assert_eq!(msg, "Post not found!"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_deleted_tag_reads_as_none_tag() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;
    let tag = blog.tags.create("temporary").await.unwrap();
    blog.posts
        .create_post(ada.id, draft("Tagged", Some(tag.id)))
        .await
        .unwrap();

    blog.tags.delete(tag.id).await.unwrap();

    let view = blog.posts.view_post("tagged").await.unwrap();
    assert_eq!(view.tag_name, NO_TAG);
}

#[tokio::test]
async fn test_slugs_stay_unique() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;

    let a = blog.post(&ada, "Same Title").await;
    let b = blog.post(&ada, "Same Title").await;
    let c = blog.post(&ada, "Same  Title!").await;

    assert_eq!(a.slug, "same-title");
    assert_eq!(b.slug, "same-title-2");
    assert_eq!(c.slug, "same-title-3");
}

#[tokio::test]
async fn test_create_post_checks_title_and_tag() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;

    assert!(matches!(
        blog.posts.create_post(ada.id, draft("   ", None)).await,
        Err(DomainError::Validation(_))
    ));
    assert!(matches!(
        blog.posts.create_post(ada.id, draft("Fine", Some(77))).await,
        Err(DomainError::NotFound(_))
    ));
    assert_eq!(blog.store.post_count().await, 0);
}

#[tokio::test]
async fn test_recent_lists_newest_first() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;
    let older = blog.post(&ada, "Older").await;
    let newer = blog.post(&ada, "Newer").await;

    let recent = blog.posts.recent(10).await.unwrap();
    let ids: Vec<i32> = recent.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    assert_eq!(blog.posts.recent(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_tag_administration() {
    let blog = Blog::new();

    blog.tags.create(" rust ").await.unwrap();
    blog.tags.create("web").await.unwrap();

    match blog.tags.create("rust").await {
        Err(DomainError::Duplicate(msg)) => assert_eq!(msg, "This Tag Has Already Exist!"),
        other => panic!("expected Duplicate, got {other:?}"),
    }
    assert!(matches!(
        blog.tags.create("  ").await,
        Err(DomainError::Validation(_))
    ));

    let names: Vec<String> = blog
        .tags
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["rust".to_string(), "web".to_string()]);

    match blog.tags.delete(999).await {
        Err(DomainError::NotFound(msg)) => assert_eq!(msg, "Tag not found!"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}
