use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// Post entity - a blog post with a cover image, owned by its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub summary: String,
    pub content: String,
    /// Path of the uploaded cover image, relative to the server root.
    pub cover: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post. `content` is stored as given; sanitize before calling.
    pub fn new(author_id: Uuid, draft: PostDraft, cover: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: draft.title,
            summary: draft.summary,
            content: draft.content,
            cover,
            created_at: now,
            updated_at: now,
        }
    }

    /// Ownership check. Identifiers are compared by value.
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Overwrite the editable fields. The cover is kept unless a new one is given.
    pub fn apply(&mut self, draft: PostDraft, cover: Option<String>) {
        self.title = draft.title;
        self.summary = draft.summary;
        self.content = draft.content;
        if let Some(cover) = cover {
            self.cover = cover;
        }
        self.updated_at = Utc::now();
    }
}

/// Editable text fields of a post, as submitted by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub summary: String,
    pub content: String,
}

/// An uploaded cover image that has not been stored yet.
#[derive(Debug, Clone)]
pub struct CoverUpload {
    /// File name as sent by the client; only its extension is kept.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The public face of a post author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for AuthorRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// A post with its author resolved for display.
///
/// `author` is `None` when the referenced user no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithAuthor {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<AuthorRef>,
}

/// All posts by one author, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorPosts {
    pub user: AuthorRef,
    pub posts: Vec<PostWithAuthor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            summary: "summary".to_string(),
            content: "<p>body</p>".to_string(),
        }
    }

    #[test]
    fn test_is_authored_by_compares_ids() {
        let author = Uuid::new_v4();
        let post = Post::new(author, draft("First"), "public/uploads/a.png".to_string());

        assert!(post.is_authored_by(author));
        assert!(!post.is_authored_by(Uuid::new_v4()));
    }

    #[test]
    fn test_apply_keeps_cover_without_upload() {
        let mut post = Post::new(Uuid::new_v4(), draft("First"), "old.png".to_string());

        post.apply(draft("Second"), None);
        assert_eq!(post.title, "Second");
        assert_eq!(post.cover, "old.png");

        post.apply(draft("Third"), Some("new.png".to_string()));
        assert_eq!(post.cover, "new.png");
    }

    #[test]
    fn test_post_with_author_flattens_post_fields() {
        let user = User::new("writer".to_string(), "hash".to_string());
        let post = Post::new(user.id, draft("Hello"), "c.jpg".to_string());
        let view = PostWithAuthor {
            post,
            author: Some(AuthorRef::from(&user)),
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["title"], "Hello");
        assert_eq!(json["author"]["username"], "writer");
    }
}
