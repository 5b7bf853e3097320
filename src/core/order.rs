//! Order domain types and the wire shapes used to submit them
//!
//! An order embeds resolved `{id, name}` pairs for its brand and services.
//! The embedded pairs reflect the reference collections as they existed at
//! write time; a later rename of a brand does not touch existing orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A resolved reference entity: a bicycle brand or a repair service.
///
/// Also the shape of the documents in the two reference collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: Uuid,
    pub name: String,
}

impl EntityRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A staff comment appended to an order.
///
/// Identifier and timestamp are assigned server-side at append time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_id: Uuid,
    pub user: String,
    pub comment: String,
    pub date: DateTime<Utc>,
}

impl Comment {
    pub fn new(user: String, comment: String) -> Self {
        Self {
            comment_id: Uuid::new_v4(),
            user,
            comment,
            date: Utc::now(),
        }
    }
}

/// The mutable portion of an order, replaced wholesale on update.
///
/// Comments live outside this struct so an update never clobbers them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFields {
    pub name: String,
    pub brand: EntityRef,
    pub year: i32,
    pub received_date: String,
    pub breakdown: String,
    pub services: Vec<EntityRef>,
}

/// One repair job as stored in the `orders` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,

    #[serde(flatten)]
    pub fields: OrderFields,

    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Order {
    /// Assemble a fresh order from composed fields.
    pub fn new(fields: OrderFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            fields,
            comments: Vec::new(),
        }
    }
}

/// A reference given by name on the wire.
///
/// Creation sends plain strings (`"services": ["Wash"]`) while updates send
/// objects (`"services": [{"name": "Wash"}]`, `"brand": {"name": "..."}`).
/// Both shapes are accepted on both endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NameRef {
    Plain(String),
    Object { name: String },
}

impl NameRef {
    pub fn as_str(&self) -> &str {
        match self {
            NameRef::Plain(name) => name,
            NameRef::Object { name } => name,
        }
    }

    pub fn into_name(self) -> String {
        match self {
            NameRef::Plain(name) => name,
            NameRef::Object { name } => name,
        }
    }
}

/// Raw field set submitted to the create and update endpoints.
///
/// Everything is optional at the deserialization layer; the composer is
/// responsible for the presence checks so that a missing field yields the
/// service's own 400 rather than a deserializer rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderSubmission {
    pub name: Option<String>,
    pub brand: Option<NameRef>,
    pub year: Option<i32>,
    pub received_date: Option<String>,
    pub breakdown: Option<String>,
    pub services: Option<Vec<NameRef>>,
}

/// Optional exact-match filters for the order listing.
///
/// All filters are conjunctive. `brand` and `services` match the embedded
/// reference names, not ids.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderFilter {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub year: Option<i32>,
    pub received_date: Option<String>,
    pub services: Option<String>,
}

impl OrderFilter {
    /// True when the order passes every set filter.
    pub fn matches(&self, order: &Order) -> bool {
        let fields = &order.fields;

        self.name.as_ref().is_none_or(|n| &fields.name == n)
            && self.brand.as_ref().is_none_or(|b| &fields.brand.name == b)
            && self.year.is_none_or(|y| fields.year == y)
            && self
                .received_date
                .as_ref()
                .is_none_or(|d| &fields.received_date == d)
            && self
                .services
                .as_ref()
                .is_none_or(|s| fields.services.iter().any(|svc| &svc.name == s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_order() -> Order {
        Order::new(OrderFields {
            name: "Ah Kow".to_string(),
            brand: EntityRef::new("Brompton"),
            year: 2021,
            received_date: "11-03-2024".to_string(),
            breakdown: "worn brake pads".to_string(),
            services: vec![EntityRef::new("Brake Replacement"), EntityRef::new("Wash")],
        })
    }

    #[test]
    fn test_name_ref_accepts_both_shapes() {
        let plain: NameRef = serde_json::from_value(json!("Wash")).unwrap();
        assert_eq!(plain.as_str(), "Wash");

        let object: NameRef = serde_json::from_value(json!({"name": "Wash"})).unwrap();
        assert_eq!(object.as_str(), "Wash");
    }

    #[test]
    fn test_submission_tolerates_missing_fields() {
        let submission: OrderSubmission = serde_json::from_value(json!({
            "name": "Ah Kow"
        }))
        .unwrap();

        assert_eq!(submission.name.as_deref(), Some("Ah Kow"));
        assert!(submission.brand.is_none());
        assert!(submission.services.is_none());
    }

    #[test]
    fn test_order_serializes_flattened_with_camel_case() {
        let order = sample_order();
        let value = serde_json::to_value(&order).unwrap();

        assert!(value.get("id").is_some());
        assert!(value.get("receivedDate").is_some());
        assert!(value.get("fields").is_none(), "fields should be flattened");
        assert_eq!(value["brand"]["name"], "Brompton");
        assert_eq!(value["services"][0]["name"], "Brake Replacement");
        assert_eq!(value["comments"], json!([]));
    }

    #[test]
    fn test_order_deserializes_without_comments() {
        let value = json!({
            "id": Uuid::new_v4(),
            "name": "Ah Kow",
            "brand": {"id": Uuid::new_v4(), "name": "Brompton"},
            "year": 2021,
            "receivedDate": "11-03-2024",
            "breakdown": "flat tyre",
            "services": []
        });

        let order: Order = serde_json::from_value(value).unwrap();
        assert!(order.comments.is_empty());
    }

    #[test]
    fn test_filter_matches_on_embedded_names() {
        let order = sample_order();

        let mut filter = OrderFilter::default();
        assert!(filter.matches(&order), "empty filter matches everything");

        filter.brand = Some("Brompton".to_string());
        filter.services = Some("Wash".to_string());
        filter.year = Some(2021);
        assert!(filter.matches(&order));

        filter.services = Some("Respray".to_string());
        assert!(!filter.matches(&order));
    }

    #[test]
    fn test_filter_is_exact_match() {
        let order = sample_order();

        let filter = OrderFilter {
            name: Some("Ah".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&order), "prefixes must not match");
    }
}
