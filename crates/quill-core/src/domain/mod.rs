//! Domain entities - the core business objects.

mod user;

mod post;

pub use post::{AuthorPosts, AuthorRef, CoverUpload, Post, PostDraft, PostWithAuthor};
pub use user::{MIN_PASSWORD_LEN, MIN_USERNAME_LEN, User, validate_credentials};
