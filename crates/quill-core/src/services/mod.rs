//! Application services - the credential store and the post store.

mod account;
mod posts;

#[cfg(test)]
mod testing;

pub use account::{AccountService, LoginOutcome};
pub use posts::PostService;
