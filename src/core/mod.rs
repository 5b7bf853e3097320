//! Core module containing domain types, auth, errors, and validation

pub mod auth;
pub mod error;
pub mod order;
pub mod service;
pub mod user;
pub mod validation;

pub use auth::{AuthUser, TokenSigner};
pub use error::ApiError;
pub use order::{Comment, EntityRef, Order, OrderFields, OrderFilter, OrderSubmission};
pub use service::{OrderStore, ReferenceStore, UserStore};
pub use user::User;
