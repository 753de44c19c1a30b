//! Repository contract and its two backends.
//!
//! Handlers only see the [`Store`] trait; the in-memory backend serves
//! tests and local runs, the Postgres backend serves durable deployments.

mod memory;
mod postgres;
mod types;

pub use memory::MemStore;
pub use postgres::PgStore;
pub use types::{FoodEntry, NewFoodEntry, NewUser, ProfileUpdate, User};

use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait Store: Send + Sync {
    async fn user_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    /// Assigns the next sequential id and stamps `created_at`.
    async fn create_user(&self, new: NewUser) -> anyhow::Result<User>;
    /// Applies only the supplied fields; `None` if the user is missing.
    async fn update_user(&self, id: i64, update: ProfileUpdate) -> anyhow::Result<Option<User>>;

    async fn entry_by_id(&self, id: i64) -> anyhow::Result<Option<FoodEntry>>;
    async fn entries_by_user(&self, user_id: i64) -> anyhow::Result<Vec<FoodEntry>>;
    /// Entries created on the given local calendar day (see [`crate::clock`]).
    async fn entries_by_user_on(
        &self,
        user_id: i64,
        day: NaiveDate,
    ) -> anyhow::Result<Vec<FoodEntry>>;
    async fn create_entry(&self, new: NewFoodEntry) -> anyhow::Result<FoodEntry>;
    /// Removes the entry only if it exists and `user_id` owns it.
    /// A miss or foreign owner is a `false` return, not an error.
    async fn delete_entry(&self, id: i64, user_id: i64) -> anyhow::Result<bool>;
}
