mod common;

use common::Blog;
use quill_core::DomainError;
use quill_core::domain::Comment;
use quill_core::ports::BaseRepository;
use quill_core::services::UNKNOWN_AUTHOR;

#[tokio::test]
async fn test_added_comment_appears_top_level() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;
    let post = blog.post(&ada, "Hello World").await;

    let (target, comment) = blog
        .comments
        .add_comment(post.id, ada.id, "first!".to_string())
        .await
        .unwrap();

    assert_eq!(target.slug, "hello-world");
    assert!(comment.is_top_level());

    let tree = blog.comments.build_tree(post.id).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].comment.description, "first!");
    assert_eq!(tree[0].comment.parent_comment_id, None);
    assert_eq!(tree[0].author_name, "Ada Lovelace");
    assert!(tree[0].replies.is_empty());
}

#[tokio::test]
async fn test_reply_nests_under_parent() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;
    let bob = blog.user("Bob", "Builder").await;
    let post = blog.post(&ada, "Threads").await;

    let (_, parent) = blog
        .comments
        .add_comment(post.id, ada.id, "question".to_string())
        .await
        .unwrap();
    let (_, reply) = blog
        .comments
        .add_reply(parent.id, post.id, bob.id, "answer".to_string())
        .await
        .unwrap();

    let tree = blog.comments.build_tree(post.id).await.unwrap();
    assert_eq!(tree.len(), 1, "reply must not show up as a top-level entry");
    assert_eq!(tree[0].comment.id, parent.id);
    assert_eq!(tree[0].replies.len(), 1);
    assert_eq!(tree[0].replies[0].comment.id, reply.id);
    assert_eq!(tree[0].replies[0].author_name, "Bob Builder");
}

#[tokio::test]
async fn test_grandchild_is_listed_with_its_top_level_ancestor() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;
    let post = blog.post(&ada, "Deep").await;

    let (_, root) = blog.comments.add_comment(post.id, ada.id, "root".into()).await.unwrap();
    let (_, child) = blog.comments.add_reply(root.id, post.id, ada.id, "child".into()).await.unwrap();
    let (_, grandchild) = blog
        .comments
        .add_reply(child.id, post.id, ada.id, "grandchild".into())
        .await
        .unwrap();

    let tree = blog.comments.build_tree(post.id).await.unwrap();
    assert_eq!(tree.len(), 1);
    let ids: Vec<i32> = tree[0].replies.iter().map(|r| r.comment.id).collect();
    assert_eq!(ids, vec![child.id, grandchild.id]);
    assert_eq!(tree[0].replies[1].comment.parent_comment_id, Some(child.id));
}

#[tokio::test]
async fn test_reply_to_missing_parent_writes_nothing() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;
    let post = blog.post(&ada, "Lonely").await;

    let result = blog
        .comments
        .add_reply(404, post.id, ada.id, "into the void".into())
        .await;

    match result {
        Err(DomainError::NotFound(msg)) => assert_eq!(msg, "Parent comment not found!"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(blog.store.comment_count().await, 0);
}

#[tokio::test]
async fn test_reply_across_posts_is_rejected() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;
    let first = blog.post(&ada, "First").await;
    let second = blog.post(&ada, "Second").await;

    let (_, parent) = blog.comments.add_comment(first.id, ada.id, "here".into()).await.unwrap();
    let result = blog
        .comments
        .add_reply(parent.id, second.id, ada.id, "there".into())
        .await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
    assert_eq!(blog.store.comment_count().await, 1);
}

#[tokio::test]
async fn test_comment_on_missing_post_writes_nothing() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;

    let result = blog.comments.add_comment(7, ada.id, "hi".into()).await;

    match result {
        Err(DomainError::NotFound(msg)) => assert_eq!(msg, "Post not found!"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(blog.store.comment_count().await, 0);
}

#[tokio::test]
async fn test_delete_comment_removes_replies_and_spares_siblings() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;
    let bob = blog.user("Bob", "Builder").await;
    let filler_post = blog.post(&ada, "Filler").await;
    let post = blog.post(&ada, "Hello World").await;

    // Burn ids 1..=9 so the thread under test gets ids 10..=13.
    for i in 0..9 {
        blog.comments
            .add_comment(filler_post.id, bob.id, format!("filler {i}"))
            .await
            .unwrap();
    }

    let (_, c10) = blog.comments.add_comment(post.id, ada.id, "ten".into()).await.unwrap();
    let (_, c11) = blog.comments.add_reply(c10.id, post.id, bob.id, "eleven".into()).await.unwrap();
    let (_, c12) = blog.comments.add_reply(c10.id, post.id, bob.id, "twelve".into()).await.unwrap();
    let (_, c13) = blog.comments.add_comment(post.id, bob.id, "thirteen".into()).await.unwrap();
    assert_eq!((c10.id, c11.id, c12.id, c13.id), (10, 11, 12, 13));

    let removal = blog.comments.delete_comment(10).await.unwrap();

    assert_eq!(removal.post_id, post.id);
    assert_eq!(removal.replies_removed, 2);
    for id in [10, 11, 12] {
        let gone: Option<Comment> = BaseRepository::<Comment, i32>::find_by_id(blog.store.as_ref(), id)
            .await
            .unwrap();
        assert!(gone.is_none(), "comment {id} should be gone");
    }

    let tree = blog.comments.build_tree(post.id).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].comment.id, 13);
    assert_eq!(blog.comments.build_tree(filler_post.id).await.unwrap().len(), 9);
}

#[tokio::test]
async fn test_delete_comment_clears_nested_chain() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;
    let post = blog.post(&ada, "Chain").await;

    let (_, root) = blog.comments.add_comment(post.id, ada.id, "a".into()).await.unwrap();
    let (_, b) = blog.comments.add_reply(root.id, post.id, ada.id, "b".into()).await.unwrap();
    let (_, c) = blog.comments.add_reply(b.id, post.id, ada.id, "c".into()).await.unwrap();
    blog.comments.add_reply(c.id, post.id, ada.id, "d".into()).await.unwrap();
    blog.comments.add_reply(root.id, post.id, ada.id, "e".into()).await.unwrap();

    let removal = blog.comments.delete_comment(root.id).await.unwrap();

    assert_eq!(removal.replies_removed, 4);
    assert_eq!(blog.store.comment_count().await, 0);
}

#[tokio::test]
async fn test_delete_missing_comment() {
    let blog = Blog::new();

    let result = blog.comments.delete_comment(99).await;

    assert!(matches!(result, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_unknown_author_placeholder() {
    let blog = Blog::new();
    let ada = blog.user("Ada", "Lovelace").await;
    let post = blog.post(&ada, "Ghosts").await;

    let ghost = uuid::Uuid::new_v4();
    blog.comments.add_comment(post.id, ghost, "boo".into()).await.unwrap();

    let tree = blog.comments.build_tree(post.id).await.unwrap();
    assert_eq!(tree[0].author_name, UNKNOWN_AUTHOR);
}
