//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};

/// Users keyed by id. Usernames are kept unique like the `users` table does.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        if store.contains_key(&user.id) {
            return Err(RepoError::Constraint("users_pkey".to_string()));
        }
        if store.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("users_username_key".to_string()));
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        if !store.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if store
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(RepoError::Constraint("users_username_key".to_string()));
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.username == username).cloned())
    }
}

/// Posts keyed by id.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn newest_first<F>(&self, keep: F) -> Vec<Post>
    where
        F: Fn(&Post) -> bool + Send,
    {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store.values().filter(|p| keep(p)).cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint("posts_pkey".to_string()));
        }

        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        match store.get_mut(&post.id) {
            Some(existing) => {
                *existing = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.newest_first(|_| true).await)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self.newest_first(|p| p.author_id == author_id).await)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use quill_core::domain::PostDraft;

    use super::*;

    fn post_at(author_id: Uuid, title: &str, minutes_ago: i64) -> Post {
        let mut post = Post::new(
            author_id,
            PostDraft {
                title: title.to_string(),
                ..PostDraft::default()
            },
            "cover.png".to_string(),
        );
        post.created_at = Utc::now() - TimeDelta::minutes(minutes_ago);
        post
    }

    #[tokio::test]
    async fn test_username_is_unique() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("writer".to_string(), "h1".to_string()))
            .await
            .unwrap();

        let result = repo
            .create(User::new("writer".to_string(), "h2".to_string()))
            .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .create(User::new("writer".to_string(), "h".to_string()))
            .await
            .unwrap();

        let found = repo.find_by_username("writer").await.unwrap().unwrap();

        assert_eq!(found.id, user.id);
        assert!(repo.find_by_username("reader").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_posts_listed_newest_first() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        repo.create(post_at(author, "old", 60)).await.unwrap();
        repo.create(post_at(author, "new", 1)).await.unwrap();
        repo.create(post_at(Uuid::new_v4(), "other", 5)).await.unwrap();

        let all: Vec<String> = repo
            .list_newest_first()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(all, vec!["new", "other", "old"]);

        let mine: Vec<String> = repo
            .find_by_author(author)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(mine, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_post() {
        let repo = InMemoryPostRepository::new();
        let post = post_at(Uuid::new_v4(), "ghost", 0);

        assert!(matches!(repo.update(post.clone()).await, Err(RepoError::NotFound)));
        assert!(matches!(repo.delete(post.id).await, Err(RepoError::NotFound)));
    }
}
