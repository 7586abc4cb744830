//! In-crate fakes for service tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;
use crate::ports::{
    AuthError, BaseRepository, CoverStorage, HtmlSanitizer, PasswordService, PostRepository,
    StorageError, TokenClaims, TokenService, UserRepository,
};

#[derive(Default)]
pub struct FakeUsers {
    rows: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for FakeUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("username".to_string()));
        }
        rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for FakeUsers {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[derive(Default)]
pub struct FakePosts {
    rows: Mutex<HashMap<Uuid, Post>>,
}

impl FakePosts {
    fn sorted(&self, filter: impl Fn(&Post) -> bool) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|p| filter(p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for FakePosts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        self.rows.lock().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        rows.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for FakePosts {
    async fn list_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.sorted(|_| true))
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self.sorted(|p| p.author_id == author_id))
    }
}

/// "Hashes" by prefixing, so tests can see the hash step happened.
pub struct FakePasswords;

impl PasswordService for FakePasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("hashed:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Tokens of the form `tok:<user_id>:<username>`.
pub struct FakeTokens;

impl TokenService for FakeTokens {
    fn issue(&self, user_id: Uuid, username: &str) -> Result<String, AuthError> {
        Ok(format!("tok:{user_id}:{username}"))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut parts = token.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("tok"), Some(id), Some(username)) => Ok(TokenClaims {
                user_id: id
                    .parse()
                    .map_err(|_| AuthError::InvalidToken("bad id".to_string()))?,
                username: username.to_string(),
                iat: 0,
                exp: i64::MAX,
            }),
            _ => Err(AuthError::InvalidToken("malformed".to_string())),
        }
    }

    fn expiration_seconds(&self) -> i64 {
        3600
    }
}

/// Drops `<script>` elements and nothing else.
pub struct FakeSanitizer;

impl HtmlSanitizer for FakeSanitizer {
    fn sanitize(&self, html: &str) -> String {
        let mut out = html.to_string();
        while let Some(start) = out.find("<script") {
            let end = out[start..]
                .find("</script>")
                .map(|i| start + i + "</script>".len())
                .unwrap_or(out.len());
            out.replace_range(start..end, "");
        }
        out
    }
}

#[derive(Default)]
pub struct FakeCovers {
    stored: AtomicUsize,
}

impl FakeCovers {
    pub fn stored_count(&self) -> usize {
        self.stored.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CoverStorage for FakeCovers {
    async fn store(&self, original_name: &str, _bytes: &[u8]) -> Result<String, StorageError> {
        let n = self.stored.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("uploads/{n}-{original_name}"))
    }
}
