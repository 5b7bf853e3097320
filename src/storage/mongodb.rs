//! MongoDB persistence gateway using the official async driver
//!
//! One [`MongoStore`] wraps a `mongodb::Database` handle and implements the
//! three store traits over the service's four collections. The underlying
//! driver pools connections itself, so a single handle is shared across all
//! in-flight requests.
//!
//! # Serialization strategy
//!
//! Documents are serialized via `serde_json::Value` as an intermediate
//! format, then converted to BSON. UUIDs are stored as strings and comment
//! timestamps as ISO 8601 strings. The top-level `id` field is mapped to
//! MongoDB's `_id` convention; ids embedded in brand/service references are
//! kept as plain `id` fields.

use crate::core::order::{Comment, EntityRef, Order, OrderFields, OrderFilter};
use crate::core::service::{OrderStore, ReferenceStore, UserStore};
use crate::core::user::User;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Collection, Database};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

const ORDERS: &str = "orders";
const BRANDS: &str = "bicycle-brands";
const SERVICES: &str = "services";
const USERS: &str = "users";

/// Open a connection and verify the server is reachable.
///
/// Called once at startup; an unreachable store is a process-terminating
/// error, not something requests retry against.
pub async fn connect(uri: &str, db_name: &str) -> Result<Database> {
    let client = Client::with_uri_str(uri)
        .await
        .context("failed to parse MongoDB connection string")?;
    let database = client.database(db_name);

    database
        .run_command(doc! { "ping": 1 })
        .await
        .context("MongoDB is unreachable")?;

    Ok(database)
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Serialize a value into a BSON document, renaming top-level `id` → `_id`.
fn to_document<T: Serialize>(value: &T) -> Result<Document> {
    let json = serde_json::to_value(value).context("failed to serialize document")?;
    let bson = mongodb::bson::to_bson(&json).context("failed to convert JSON to BSON")?;

    let Bson::Document(mut doc) = bson else {
        return Err(anyhow!("expected a BSON document, got a non-object value"));
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Deserialize a BSON document, renaming top-level `_id` → `id`.
fn from_document<T: DeserializeOwned>(mut doc: Document) -> Result<T> {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    let json = Bson::Document(doc).into_relaxed_extjson();
    serde_json::from_value(json).context("failed to deserialize document")
}

fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// Translate listing filters into a MongoDB query document.
///
/// Embedded-name filters use dotted paths into the brand and service
/// references.
fn filter_query(filter: &OrderFilter) -> Document {
    let mut query = Document::new();

    if let Some(name) = &filter.name {
        query.insert("name", name.as_str());
    }
    if let Some(brand) = &filter.brand {
        query.insert("brand.name", brand.as_str());
    }
    if let Some(year) = filter.year {
        query.insert("year", year);
    }
    if let Some(date) = &filter.received_date {
        query.insert("receivedDate", date.as_str());
    }
    if let Some(service) = &filter.services {
        query.insert("services.name", service.as_str());
    }

    query
}

// ---------------------------------------------------------------------------
// MongoStore
// ---------------------------------------------------------------------------

/// Persistence gateway over the four service collections.
#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn orders(&self) -> Collection<Document> {
        self.database.collection(ORDERS)
    }

    fn brands(&self) -> Collection<Document> {
        self.database.collection(BRANDS)
    }

    fn services(&self) -> Collection<Document> {
        self.database.collection(SERVICES)
    }

    fn users(&self) -> Collection<Document> {
        self.database.collection(USERS)
    }

    /// Insert a brand unless one with the same name exists.
    ///
    /// Reference collections have no HTTP mutation surface; this is only
    /// used by the development seeding binary. Idempotent by name.
    pub async fn ensure_brand(&self, name: &str) -> Result<bool> {
        Self::ensure_reference(self.brands(), name).await
    }

    /// Insert a service unless one with the same name exists. See
    /// [`MongoStore::ensure_brand`].
    pub async fn ensure_service(&self, name: &str) -> Result<bool> {
        Self::ensure_reference(self.services(), name).await
    }

    async fn ensure_reference(collection: Collection<Document>, name: &str) -> Result<bool> {
        let existing = collection
            .find_one(doc! { "name": name })
            .await
            .context("failed to look up reference entity")?;
        if existing.is_some() {
            return Ok(false);
        }

        let doc = to_document(&EntityRef::new(name))?;
        collection
            .insert_one(doc)
            .await
            .context("failed to insert reference entity")?;
        Ok(true)
    }
}

#[async_trait]
impl OrderStore for MongoStore {
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let cursor = self
            .orders()
            .find(filter_query(filter))
            .await
            .context("failed to list orders")?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .context("failed to collect orders")?;

        docs.into_iter().map(from_document).collect()
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Order>> {
        let doc = self
            .orders()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .context("failed to get order")?;

        doc.map(from_document).transpose()
    }

    async fn insert(&self, order: Order) -> Result<()> {
        self.orders()
            .insert_one(to_document(&order)?)
            .await
            .context("failed to insert order")?;

        Ok(())
    }

    async fn replace_fields(&self, id: &Uuid, fields: OrderFields) -> Result<bool> {
        // $set of the composed fields only, so comments survive the replace
        let result = self
            .orders()
            .update_one(
                doc! { "_id": uuid_bson(id) },
                doc! { "$set": to_document(&fields)? },
            )
            .await
            .context("failed to update order")?;

        Ok(result.matched_count > 0)
    }

    async fn push_comment(&self, id: &Uuid, comment: Comment) -> Result<bool> {
        let result = self
            .orders()
            .update_one(
                doc! { "_id": uuid_bson(id) },
                doc! { "$push": { "comments": to_document(&comment)? } },
            )
            .await
            .context("failed to append comment")?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = self
            .orders()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .context("failed to delete order")?;

        Ok(result.deleted_count > 0)
    }
}

#[async_trait]
impl ReferenceStore for MongoStore {
    async fn brand_by_name(&self, name: &str) -> Result<Option<EntityRef>> {
        let doc = self
            .brands()
            .find_one(doc! { "name": name })
            .await
            .context("failed to look up brand")?;

        doc.map(from_document).transpose()
    }

    async fn services_by_names(&self, names: &[String]) -> Result<Vec<EntityRef>> {
        let cursor = self
            .services()
            .find(doc! { "name": { "$in": names.to_vec() } })
            .await
            .context("failed to look up services")?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .context("failed to collect services")?;

        docs.into_iter().map(from_document).collect()
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn insert(&self, user: User) -> Result<()> {
        self.users()
            .insert_one(to_document(&user)?)
            .await
            .context("failed to insert user")?;

        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let doc = self
            .users()
            .find_one(doc! { "username": username })
            .await
            .context("failed to look up user")?;

        doc.map(from_document).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> OrderFields {
        OrderFields {
            name: "Ah Kow".to_string(),
            brand: EntityRef::new("Brompton"),
            year: 2021,
            received_date: "11-03-2024".to_string(),
            breakdown: "worn brake pads".to_string(),
            services: vec![EntityRef::new("Wash")],
        }
    }

    #[test]
    fn test_order_document_uses_underscore_id() {
        let order = Order::new(sample_fields());
        let doc = to_document(&order).unwrap();

        assert_eq!(doc.get_str("_id").unwrap(), order.id.to_string());
        assert!(!doc.contains_key("id"));
        assert_eq!(doc.get_str("receivedDate").unwrap(), "11-03-2024");
    }

    #[test]
    fn test_embedded_reference_ids_stay_plain() {
        let order = Order::new(sample_fields());
        let doc = to_document(&order).unwrap();

        let brand = doc.get_document("brand").unwrap();
        assert!(brand.contains_key("id"), "embedded ids are not renamed");
        assert!(!brand.contains_key("_id"));
    }

    #[test]
    fn test_order_document_roundtrip() {
        let order = Order::new(sample_fields());
        let doc = to_document(&order).unwrap();
        let back: Order = from_document(doc).unwrap();

        assert_eq!(back.id, order.id);
        assert_eq!(back.fields.brand, order.fields.brand);
        assert_eq!(back.fields.services, order.fields.services);
        assert!(back.comments.is_empty());
    }

    #[test]
    fn test_comment_document_keeps_timestamp_readable() {
        let comment = Comment::new("mei".to_string(), "rear wheel trued".to_string());
        let doc = to_document(&comment).unwrap();

        assert_eq!(doc.get_str("user").unwrap(), "mei");
        // chrono serializes through serde_json as an RFC 3339 string
        assert!(doc.get_str("date").is_ok());
    }

    #[test]
    fn test_fields_document_has_no_id() {
        let doc = to_document(&sample_fields()).unwrap();
        assert!(!doc.contains_key("_id"));
        assert!(!doc.contains_key("id"));
    }

    #[test]
    fn test_filter_query_empty() {
        let query = filter_query(&OrderFilter::default());
        assert!(query.is_empty());
    }

    #[test]
    fn test_filter_query_uses_dotted_paths() {
        let filter = OrderFilter {
            name: Some("Ah Kow".to_string()),
            brand: Some("Brompton".to_string()),
            year: Some(2021),
            received_date: Some("11-03-2024".to_string()),
            services: Some("Wash".to_string()),
        };
        let query = filter_query(&filter);

        assert_eq!(query.get_str("name").unwrap(), "Ah Kow");
        assert_eq!(query.get_str("brand.name").unwrap(), "Brompton");
        assert_eq!(query.get_i32("year").unwrap(), 2021);
        assert_eq!(query.get_str("receivedDate").unwrap(), "11-03-2024");
        assert_eq!(query.get_str("services.name").unwrap(), "Wash");
    }

    #[test]
    fn test_user_document_roundtrip() {
        let user = User {
            id: Uuid::new_v4(),
            username: "mei".to_string(),
            full_name: "Mei Lin".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
        };
        let doc = to_document(&user).unwrap();

        assert_eq!(doc.get_str("_id").unwrap(), user.id.to_string());
        assert_eq!(doc.get_str("fullName").unwrap(), "Mei Lin");

        let back: User = from_document(doc).unwrap();
        assert_eq!(back.id, user.id);
        assert_eq!(back.password_hash, user.password_hash);
    }

    #[test]
    fn test_to_document_rejects_non_object() {
        let result = to_document(&"just a string");
        assert!(result.is_err());
    }
}
