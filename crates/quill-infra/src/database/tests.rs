use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
use uuid::Uuid;

use quill_core::domain::{Post, PostDraft, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};

use crate::database::entity::{post, user};
use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};

fn post_model(id: Uuid, author_id: Uuid, title: &str) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id,
        title: title.to_owned(),
        summary: "Summary".to_owned(),
        content: "<p>Content</p>".to_owned(),
        cover: "public/uploads/a.png".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn user_model(username: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        password_hash: "$argon2id$hash".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, author_id, "Test Post")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = post.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, author_id);
}

#[tokio::test]
async fn test_find_user_by_username() {
    let model = user_model("writer");
    let id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let user = repo.find_by_username("writer").await.unwrap().unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.username, "writer");
}

#[tokio::test]
async fn test_create_user_returns_inserted_row() {
    let model = user_model("writer");
    let domain: User = model.clone().into();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);

    let saved = repo.create(domain.clone()).await.unwrap();
    assert_eq!(saved.id, domain.id);
    assert_eq!(saved.password_hash, "$argon2id$hash");
}

#[tokio::test]
async fn test_list_posts_orders_by_created_at_desc() {
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            post_model(Uuid::new_v4(), author_id, "Newer"),
            post_model(Uuid::new_v4(), author_id, "Older"),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let posts = repo.list_newest_first().await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].title, "Newer");

    let Ok(db) = Arc::try_unwrap(repo.db) else {
        panic!("repository is the only connection owner");
    };
    let log = db.into_transaction_log();
    let sql = log[0].statements()[0].sql.clone();
    assert!(sql.contains(r#"ORDER BY "posts"."created_at" DESC"#), "{sql}");
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_update_post_surfaces_query_errors() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors(vec![DbErr::Custom("boom".to_owned())])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = Post::new(Uuid::new_v4(), PostDraft::default(), "c.png".to_owned());

    let result = repo.update(post).await;
    assert!(matches!(result, Err(RepoError::Query(_))));
}

#[tokio::test]
async fn test_user_and_post_repositories_share_one_connection() {
    let model = user_model("writer");
    let author_id = model.id;

    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .append_query_results(vec![vec![post_model(Uuid::new_v4(), author_id, "Mine")]])
            .into_connection(),
    );

    let users = PostgresUserRepository::shared(db.clone());
    let posts = PostgresPostRepository::shared(db);

    let user = users.find_by_username("writer").await.unwrap().unwrap();
    let by_author = posts.find_by_author(user.id).await.unwrap();

    assert_eq!(by_author.len(), 1);
    assert_eq!(by_author[0].author_id, author_id);
}
