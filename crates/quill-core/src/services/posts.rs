//! Post store: author-scoped mutation and author-joined reads.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthorPosts, AuthorRef, CoverUpload, Post, PostDraft, PostWithAuthor};
use crate::error::{DomainError, RepoError};
use crate::ports::{CoverStorage, HtmlSanitizer, PostRepository, UserRepository};

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    sanitizer: Arc<dyn HtmlSanitizer>,
    covers: Arc<dyn CoverStorage>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        sanitizer: Arc<dyn HtmlSanitizer>,
        covers: Arc<dyn CoverStorage>,
    ) -> Self {
        Self {
            posts,
            users,
            sanitizer,
            covers,
        }
    }

    /// Create a post owned by `author_id`. Content is sanitized before storage.
    pub async fn create(
        &self,
        author_id: Uuid,
        mut draft: PostDraft,
        cover: CoverUpload,
    ) -> Result<PostWithAuthor, DomainError> {
        draft.content = self.sanitizer.sanitize(&draft.content);
        let cover_path = self.covers.store(&cover.file_name, &cover.bytes).await?;

        let post = self.posts.create(Post::new(author_id, draft, cover_path)).await?;
        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");

        self.with_author(post).await
    }

    /// Update a post. Only its author may do this; anyone else gets `NotAuthor`.
    ///
    /// The new cover, if any, is stored only after the ownership check passes.
    pub async fn update(
        &self,
        actor_id: Uuid,
        id: Uuid,
        mut draft: PostDraft,
        cover: Option<CoverUpload>,
    ) -> Result<PostWithAuthor, DomainError> {
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        if !post.is_authored_by(actor_id) {
            tracing::warn!(post_id = %id, actor_id = %actor_id, "Update rejected: not author");
            return Err(DomainError::NotAuthor);
        }

        draft.content = self.sanitizer.sanitize(&draft.content);
        let cover_path = match cover {
            Some(upload) => Some(self.covers.store(&upload.file_name, &upload.bytes).await?),
            None => None,
        };
        post.apply(draft, cover_path);

        let post = self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post", id),
            other => other.into(),
        })?;

        self.with_author(post).await
    }

    /// Delete a post by id.
    ///
    /// Any authenticated user may delete any post; no ownership check is made.
    /// An id that matches no post deletes nothing and still succeeds.
    pub async fn delete(&self, actor_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        match self.posts.delete(id).await {
            Ok(()) => {
                tracing::info!(post_id = %id, actor_id = %actor_id, "Post deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => {
                tracing::debug!(post_id = %id, actor_id = %actor_id, "No post to delete");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Every post, newest first, with authors joined.
    pub async fn list(&self) -> Result<Vec<PostWithAuthor>, DomainError> {
        let posts = self.posts.list_newest_first().await?;
        self.join_authors(posts).await
    }

    pub async fn get(&self, id: Uuid) -> Result<PostWithAuthor, DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        self.with_author(post).await
    }

    /// One author's posts, newest first, alongside the author.
    pub async fn list_by_author(&self, author_id: Uuid) -> Result<AuthorPosts, DomainError> {
        let user = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", author_id))?;
        let author = AuthorRef::from(&user);

        let posts = self
            .posts
            .find_by_author(author_id)
            .await?
            .into_iter()
            .map(|post| PostWithAuthor {
                post,
                author: Some(author.clone()),
            })
            .collect();

        Ok(AuthorPosts {
            user: author,
            posts,
        })
    }

    async fn with_author(&self, post: Post) -> Result<PostWithAuthor, DomainError> {
        let author = self
            .users
            .find_by_id(post.author_id)
            .await?
            .map(|u| AuthorRef::from(&u));

        Ok(PostWithAuthor { post, author })
    }

    /// Resolve each distinct author once; order of `posts` is preserved.
    async fn join_authors(&self, posts: Vec<Post>) -> Result<Vec<PostWithAuthor>, DomainError> {
        let mut authors: HashMap<Uuid, Option<AuthorRef>> = HashMap::new();

        for post in &posts {
            if !authors.contains_key(&post.author_id) {
                let author = self
                    .users
                    .find_by_id(post.author_id)
                    .await?
                    .map(|u| AuthorRef::from(&u));
                authors.insert(post.author_id, author);
            }
        }

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned().flatten();
                PostWithAuthor { post, author }
            })
            .collect())
    }
}
