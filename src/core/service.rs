//! Store traits behind which the persistence backends sit
//!
//! Handlers and the order composer only ever see these traits; the MongoDB
//! and in-memory backends both implement them, which is what lets the HTTP
//! test suite run without a database.

use crate::core::order::{Comment, EntityRef, Order, OrderFields, OrderFilter};
use crate::core::user::User;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Storage operations on the `orders` collection.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// List orders passing the given exact-match filters.
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>>;

    /// Fetch one order by id. `Ok(None)` when absent.
    async fn get(&self, id: &Uuid) -> Result<Option<Order>>;

    /// Insert a freshly composed order.
    async fn insert(&self, order: Order) -> Result<()>;

    /// Replace every order field except comments.
    ///
    /// Returns `false` when no order matched the id.
    async fn replace_fields(&self, id: &Uuid, fields: OrderFields) -> Result<bool>;

    /// Append one comment to an order.
    ///
    /// Returns `false` when no order matched the id.
    async fn push_comment(&self, id: &Uuid, comment: Comment) -> Result<bool>;

    /// Delete one order by id. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &Uuid) -> Result<bool>;
}

/// Read access to the two reference collections.
///
/// These are read-only from the service's perspective; nothing in the HTTP
/// surface creates, renames, or deletes a brand or a service.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    /// Exact-name brand lookup.
    async fn brand_by_name(&self, name: &str) -> Result<Option<EntityRef>>;

    /// Set-style service lookup: duplicates in `names` collapse in the
    /// result, and unknown names are simply absent from it.
    async fn services_by_names(&self, names: &[String]) -> Result<Vec<EntityRef>>;
}

/// Storage operations on the `users` collection.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: User) -> Result<()>;

    /// Username is the natural lookup key.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}
