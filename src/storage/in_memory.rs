//! In-memory implementation of the store traits for testing and development
//!
//! Mirrors the MongoDB backend's observable behavior (exact-match filters,
//! set-style service lookups, comment-preserving field replaces) using
//! `RwLock`-guarded maps.

use crate::core::order::{Comment, EntityRef, Order, OrderFields, OrderFilter};
use crate::core::service::{OrderStore, ReferenceStore, UserStore};
use crate::core::user::User;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory store over all four collections.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
    brands: Arc<RwLock<Vec<EntityRef>>>,
    services: Arc<RwLock<Vec<EntityRef>>>,
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with reference entities.
    pub fn with_references(brands: Vec<EntityRef>, services: Vec<EntityRef>) -> Self {
        Self {
            brands: Arc::new(RwLock::new(brands)),
            services: Arc::new(RwLock::new(services)),
            ..Self::default()
        }
    }

    /// Number of stored orders. Test helper.
    pub fn order_count(&self) -> usize {
        self.orders.read().map(|orders| orders.len()).unwrap_or(0)
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("failed to acquire read lock: {e}"))?;

        Ok(orders
            .values()
            .filter(|order| filter.matches(order))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Order>> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("failed to acquire read lock: {e}"))?;

        Ok(orders.get(id).cloned())
    }

    async fn insert(&self, order: Order) -> Result<()> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("failed to acquire write lock: {e}"))?;

        orders.insert(order.id, order);
        Ok(())
    }

    async fn replace_fields(&self, id: &Uuid, fields: OrderFields) -> Result<bool> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("failed to acquire write lock: {e}"))?;

        match orders.get_mut(id) {
            Some(order) => {
                order.fields = fields;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn push_comment(&self, id: &Uuid, comment: Comment) -> Result<bool> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("failed to acquire write lock: {e}"))?;

        match orders.get_mut(id) {
            Some(order) => {
                order.comments.push(comment);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("failed to acquire write lock: {e}"))?;

        Ok(orders.remove(id).is_some())
    }
}

#[async_trait]
impl ReferenceStore for InMemoryStore {
    async fn brand_by_name(&self, name: &str) -> Result<Option<EntityRef>> {
        let brands = self
            .brands
            .read()
            .map_err(|e| anyhow!("failed to acquire read lock: {e}"))?;

        Ok(brands.iter().find(|b| b.name == name).cloned())
    }

    async fn services_by_names(&self, names: &[String]) -> Result<Vec<EntityRef>> {
        let services = self
            .services
            .read()
            .map_err(|e| anyhow!("failed to acquire read lock: {e}"))?;

        // One hit per stored entity, so duplicate requested names collapse
        Ok(services
            .iter()
            .filter(|s| names.contains(&s.name))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert(&self, user: User) -> Result<()> {
        let mut users = self
            .users
            .write()
            .map_err(|e| anyhow!("failed to acquire write lock: {e}"))?;

        users.push(user);
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|e| anyhow!("failed to acquire read lock: {e}"))?;

        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryStore {
        InMemoryStore::with_references(
            vec![EntityRef::new("Brompton")],
            vec![EntityRef::new("Wash"), EntityRef::new("Tune Up")],
        )
    }

    fn sample_order(store: &InMemoryStore) -> Order {
        let brands = store.brands.read().unwrap();
        let services = store.services.read().unwrap();
        Order::new(OrderFields {
            name: "Ah Kow".to_string(),
            brand: brands[0].clone(),
            year: 2021,
            received_date: "11-03-2024".to_string(),
            breakdown: "worn brake pads".to_string(),
            services: vec![services[0].clone()],
        })
    }

    #[tokio::test]
    async fn test_insert_get_delete() {
        let store = store();
        let order = sample_order(&store);
        let id = order.id;

        OrderStore::insert(&store, order).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_some());

        assert!(store.delete(&id).await.unwrap());
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(!store.delete(&id).await.unwrap(), "second delete misses");
    }

    #[tokio::test]
    async fn test_replace_fields_preserves_comments() {
        let store = store();
        let order = sample_order(&store);
        let id = order.id;
        OrderStore::insert(&store, order).await.unwrap();

        store
            .push_comment(&id, Comment::new("mei".into(), "checked in".into()))
            .await
            .unwrap();

        let mut fields = store.get(&id).await.unwrap().unwrap().fields;
        fields.breakdown = "also a bent derailleur hanger".to_string();
        assert!(store.replace_fields(&id, fields).await.unwrap());

        let updated = store.get(&id).await.unwrap().unwrap();
        assert_eq!(updated.comments.len(), 1);
        assert_eq!(updated.fields.breakdown, "also a bent derailleur hanger");
    }

    #[tokio::test]
    async fn test_replace_and_comment_miss_on_unknown_id() {
        let store = store();
        let order = sample_order(&store);
        let fields = order.fields.clone();

        assert!(!store.replace_fields(&Uuid::new_v4(), fields).await.unwrap());
        assert!(
            !store
                .push_comment(&Uuid::new_v4(), Comment::new("mei".into(), "hi".into()))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_services_by_names_collapses_duplicates() {
        let store = store();
        let names = vec!["Wash".to_string(), "Wash".to_string()];

        let resolved = store.services_by_names(&names).await.unwrap();
        assert_eq!(resolved.len(), 1);
    }

    #[tokio::test]
    async fn test_list_applies_filters() {
        let store = store();
        let order = sample_order(&store);
        OrderStore::insert(&store, order).await.unwrap();

        let all = store.list(&OrderFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);

        let filtered = store
            .list(&OrderFilter {
                brand: Some("Nonesuch".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(filtered.is_empty());
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let store = store();
        let user = User {
            id: Uuid::new_v4(),
            username: "mei".to_string(),
            full_name: "Mei Lin".to_string(),
            password_hash: "hash".to_string(),
        };
        UserStore::insert(&store, user).await.unwrap();

        assert!(store.find_by_username("mei").await.unwrap().is_some());
        assert!(store.find_by_username("nobody").await.unwrap().is_none());
    }
}
