#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::database::entity::{comment, post, tag};
    use crate::database::postgres_repo::{
        PostgresCommentRepository, PostgresForumRepository, PostgresPostRepository,
        PostgresTagRepository,
    };
    use quill_core::domain::{Comment, Post};
    use quill_core::error::RepoError;
    use quill_core::ports::{
        BaseRepository, CommentRepository, ForumRepository, PostRepository, TagRepository,
    };
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn post_model(id: i32, view_count: i32) -> post::Model {
        post::Model {
            id,
            user_id: uuid::Uuid::new_v4(),
            tag_id: None,
            title: "Test Post".to_owned(),
            slug: "test-post".to_owned(),
            description: "Content".to_owned(),
            thumbnail_url: None,
            view_count,
            created_at: chrono::Utc::now().into(),
        }
    }

    fn comment_model(id: i32, parent: Option<i32>) -> comment::Model {
        comment::Model {
            id,
            post_id: 1,
            user_id: uuid::Uuid::new_v4(),
            description: format!("comment {id}"),
            parent_comment_id: parent,
            created_at: chrono::Utc::now().into(),
        }
    }

    /// Rows of a single `id` column, as returned by `select_only().into_tuple()`.
    fn id_rows(ids: &[i32]) -> Vec<BTreeMap<&'static str, Value>> {
        ids.iter()
            .map(|id| BTreeMap::from([("id", Value::from(*id))]))
            .collect()
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    /// Position of `needle` in the debug-rendered transaction log.
    fn position(log: &str, needle: &str) -> usize {
        log.find(needle)
            .unwrap_or_else(|| panic!("{needle} not found in {log}"))
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(7, 3)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(7).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, 7);
        assert_eq!(post.view_count, 3);
    }

    #[tokio::test]
    async fn test_increment_view_count_returns_new_value() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results(vec![vec![post_model(7, 4)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert_eq!(repo.increment_view_count(7).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_increment_view_count_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(matches!(
            repo.increment_view_count(99).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_find_comments_by_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                comment_model(10, None),
                comment_model(11, Some(10)),
            ]])
            .into_connection();

        let repo = PostgresCommentRepository::new(db);

        let comments: Vec<Comment> = repo.find_by_post(1).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert!(comments[0].is_top_level());
        assert_eq!(comments[1].parent_comment_id, Some(10));
    }

    #[tokio::test]
    async fn test_delete_by_parent_reports_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();

        let repo = PostgresCommentRepository::new(db);

        assert_eq!(repo.delete_by_parent(10).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_comment_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresCommentRepository::new(db);

        let result = BaseRepository::<Comment, i32>::delete(&repo, 42).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_tags() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                tag::Model {
                    id: 1,
                    name: "rust".to_owned(),
                },
                tag::Model {
                    id: 2,
                    name: "web".to_owned(),
                },
            ]])
            .into_connection();

        let repo = PostgresTagRepository::new(db);

        let tags = TagRepository::list(&repo).await.unwrap();
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["rust", "web"]);
    }

    #[tokio::test]
    async fn test_delete_posts_by_owner_clears_comments_first() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![id_rows(&[3, 4])])
            .append_exec_results(vec![exec(5), exec(2)])
            .into_connection();

        let repo = PostgresPostRepository::new(db.clone());

        assert_eq!(repo.delete_by_owner(uuid::Uuid::new_v4()).await.unwrap(), 2);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(
            position(&log, r#"DELETE FROM \"comments\""#)
                < position(&log, r#"DELETE FROM \"posts\""#)
        );
    }

    #[tokio::test]
    async fn test_delete_posts_by_owner_without_posts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![id_rows(&[])])
            .into_connection();

        let repo = PostgresPostRepository::new(db.clone());

        assert_eq!(repo.delete_by_owner(uuid::Uuid::new_v4()).await.unwrap(), 0);
        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("DELETE"));
    }

    #[tokio::test]
    async fn test_delete_by_author_promotes_replies_before_delete() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![id_rows(&[10, 12])])
            .append_exec_results(vec![exec(1), exec(2)])
            .into_connection();

        let repo = PostgresCommentRepository::new(db.clone());

        assert_eq!(repo.delete_by_author(uuid::Uuid::new_v4()).await.unwrap(), 2);

        let log = format!("{:?}", db.into_transaction_log());
        let update = position(&log, r#"UPDATE \"comments\" SET \"parent_comment_id\""#);
        let delete = position(&log, r#"DELETE FROM \"comments\" WHERE \"comments\".\"user_id\" ="#);
        assert!(update < delete);
    }

    #[tokio::test]
    async fn test_delete_by_author_without_comments() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![id_rows(&[])])
            .into_connection();

        let repo = PostgresCommentRepository::new(db.clone());

        assert_eq!(repo.delete_by_author(uuid::Uuid::new_v4()).await.unwrap(), 0);
        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("UPDATE"));
        assert!(!log.contains("DELETE"));
    }

    #[tokio::test]
    async fn test_delete_forum_by_owner_clears_answers_first() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![id_rows(&[8])])
            .append_exec_results(vec![exec(3), exec(1)])
            .into_connection();

        let repo = PostgresForumRepository::new(db.clone());

        assert_eq!(repo.delete_by_owner(uuid::Uuid::new_v4()).await.unwrap(), 1);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(
            position(&log, r#"DELETE FROM \"answers\""#)
                < position(&log, r#"DELETE FROM \"forum_posts\""#)
        );
    }
}
